// tests/session_properties.rs
//! Property tests over randomly seeded sessions

use imd_sim::config::SignalConfig;
use imd_sim::utils::conversion::{sample_count, sampling_interval_ms};
use imd_sim::{
    generate_session, render_segment, OperatingMode, RngSource, SegmentSpec, SelfTestOutcome,
    SessionTrace, SimulationConfig, VoltageLevel,
};
use proptest::prelude::*;

fn config(total_ms: u32, rate: u32) -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.session.total_duration_s = total_ms as f64 / 1000.0;
    config.signal.sample_rate_hz = rate;
    config
}

fn segment_slices(trace: &SessionTrace) -> Vec<&[imd_sim::SampleRecord]> {
    let mut offset = 0;
    trace
        .segments
        .iter()
        .map(|segment| {
            let slice = &trace.records[offset..offset + segment.sample_count];
            offset += segment.sample_count;
            slice
        })
        .collect()
}

/// Duty cycles at the edges of every default band, plus arbitrary interior values
fn duty_percent() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(5.0),
        Just(10.0),
        Just(47.5),
        Just(52.5),
        Just(90.0),
        Just(95.0),
        5.0f64..95.0,
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn high_samples_per_period_track_duty(
        frequency_hz in 1u64..=50,
        duty in duty_percent(),
        okhs in prop::sample::select(vec![VoltageLevel::High, VoltageLevel::Low]),
    ) {
        let signal = SignalConfig::default();
        let rate = signal.sample_rate_hz as u64;
        let segment = SegmentSpec {
            mode: OperatingMode::Normal,
            frequency_hz: frequency_hz as f64,
            duty_cycle_percent: duty,
            okhs,
            duration_s: 2.0,
            self_test: None,
        };
        let records = render_segment(&segment, 0, &signal).unwrap().records;

        // period k covers samples [ceil(k * rate / f), ceil((k + 1) * rate / f)),
        // computed in integers so 30 Hz (33.3 samples) splits exactly
        let boundary = |k: u64| ((k * rate + frequency_hz - 1) / frequency_hz) as usize;
        let expected = duty / 100.0 * rate as f64 / frequency_hz as f64;

        let mut k = 0;
        while boundary(k + 1) <= records.len() {
            let period = &records[boundary(k)..boundary(k + 1)];
            let high = period.iter().filter(|r| r.mhs_voltage == 5.0).count() as f64;
            prop_assert!(
                (high - expected).abs() <= 1.0 + 1e-9,
                "period {} at {} Hz, duty {}: {} high, expected {}",
                k, frequency_hz, duty, high, expected
            );
            k += 1;
        }
        prop_assert!(k >= 2);
    }

    #[test]
    fn budget_is_spent_exactly(
        seed in any::<u64>(),
        total_ms in 500u32..40_000,
        rate in prop::sample::select(vec![100u32, 250, 500, 1000]),
        start_ms in 0u64..2_000_000_000_000,
    ) {
        let config = config(total_ms, rate);
        let expected = sample_count(config.session.total_duration_s, rate);
        let interval = sampling_interval_ms(rate).unwrap();

        let trace = generate_session(config, RngSource::seeded(seed), start_ms).unwrap();

        prop_assert_eq!(trace.sample_count(), expected);
        prop_assert_eq!(trace.segments.iter().map(|s| s.sample_count).sum::<usize>(), expected);
        prop_assert_eq!(trace.end_ms, start_ms + expected as u64 * interval);
        prop_assert_eq!(trace.records[0].timestamp, start_ms);

        for pair in trace.records.windows(2) {
            prop_assert_eq!(pair[1].timestamp - pair[0].timestamp, interval);
        }
    }

    #[test]
    fn session_opens_with_startup_self_test(seed in any::<u64>(), total_ms in 500u32..20_000) {
        let config = config(total_ms, 1000);
        let startup_s = config.self_test.startup_duration_s;
        let budget_s = config.session.total_duration_s;

        let trace = generate_session(config, RngSource::seeded(seed), 0).unwrap();
        let first = &trace.segments[0];

        prop_assert_eq!(first.mode, OperatingMode::SelfTest);
        prop_assert_eq!(first.frequency_hz, 30.0);
        prop_assert_eq!(first.start_ms, 0);
        prop_assert!((first.duration_s - startup_s.min(budget_s)).abs() < 1e-9);
        prop_assert!(first.self_test.is_some());
    }

    #[test]
    fn segments_respect_mode_tables(seed in any::<u64>(), total_ms in 10_000u32..60_000) {
        let config = config(total_ms, 1000);
        let trace = generate_session(config.clone(), RngSource::seeded(seed), 0).unwrap();
        let last = trace.segments.len() - 1;

        for (i, (segment, records)) in trace.segments.iter().zip(segment_slices(&trace)).enumerate() {
            let okhs = records[0].okhs_voltage;
            prop_assert!(records.iter().all(|r| r.okhs_voltage == okhs));
            prop_assert!(records.iter().all(|r| r.mhs_voltage == 5.0 || r.mhs_voltage == 0.0));

            let (freq, _) = config.frequency_and_weight(segment.mode);
            prop_assert_eq!(segment.frequency_hz, freq);

            match segment.mode {
                OperatingMode::Normal => {
                    prop_assert_eq!(segment.okhs, VoltageLevel::High);
                    prop_assert!(config.modes.normal.duty_cycle.contains(segment.duty_cycle_percent));
                }
                OperatingMode::Undervoltage => {
                    prop_assert_eq!(segment.okhs, VoltageLevel::Low);
                    prop_assert!(config.modes.undervoltage.duty_cycle.contains(segment.duty_cycle_percent));
                }
                OperatingMode::DeviceError => {
                    prop_assert_eq!(segment.okhs, VoltageLevel::Low);
                    prop_assert!(config.modes.device_error.duty_cycle.contains(segment.duty_cycle_percent));
                }
                OperatingMode::GroundFault => {
                    prop_assert_eq!(segment.okhs, VoltageLevel::Low);
                    prop_assert!(config.modes.ground_fault.duty_cycle.contains(segment.duty_cycle_percent));
                }
                OperatingMode::SelfTest => match segment.self_test {
                    Some(SelfTestOutcome::Good) => {
                        prop_assert_eq!(segment.okhs, VoltageLevel::High);
                        prop_assert!(config.self_test.good_duty.contains(segment.duty_cycle_percent));
                    }
                    Some(SelfTestOutcome::Bad) => {
                        prop_assert_eq!(segment.okhs, VoltageLevel::Low);
                        prop_assert!(config.self_test.bad_duty.contains(segment.duty_cycle_percent));
                    }
                    None => prop_assert!(false, "self-test segment without outcome"),
                },
            }

            let expected_okhs = match segment.okhs {
                VoltageLevel::High => 5.0,
                VoltageLevel::Low => 0.0,
            };
            prop_assert_eq!(okhs, expected_okhs);

            if i > 0 && i < last {
                prop_assert!((3.0..=10.0).contains(&segment.duration_s));
            }
        }
    }
}

#[test]
fn default_session_is_two_minutes() {
    let trace = generate_session(SimulationConfig::default(), RngSource::seeded(7), 1_000).unwrap();

    assert_eq!(trace.sample_count(), 120_000);
    assert_eq!(trace.records.last().unwrap().timestamp, 1_000 + 119_999);
    assert!(trace.segments.len() >= 13);
}
