// demos/basic_usage.rs
//! Basic usage example for the IMD simulator

use imd_sim::export::{export_to_path, ExportFormat};
use imd_sim::{
    current_timestamp_millis, render_segment, ConfigLoader, ModeScheduler, OperatingMode,
    RngSource, SegmentSpec, VoltageLevel,
};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("IMD Simulator Basic Usage Example");
    println!("=================================");

    // Load configuration (defaults plus any IMD_SIM__* overrides)
    let mut config = ConfigLoader::new().load()?;
    config.session.total_duration_s = 30.0;
    println!("Configuration loaded successfully");
    println!("  - Sampling rate: {} Hz", config.signal.sample_rate_hz);
    println!("  - Session length: {} s", config.session.total_duration_s);
    println!("  - Self-test p_good: {}", config.self_test.p_good);

    // Render one segment directly
    println!("\nRendering a single ground-fault segment...");
    let segment = SegmentSpec {
        mode: OperatingMode::GroundFault,
        frequency_hz: 50.0,
        duty_cycle_percent: 50.0,
        okhs: VoltageLevel::Low,
        duration_s: 0.1,
        self_test: None,
    };
    let rendered = render_segment(&segment, 0, &config.signal)?;
    let pattern: String = rendered
        .records
        .iter()
        .take(40)
        .map(|r| if r.mhs_voltage > 0.0 { '#' } else { '_' })
        .collect();
    println!("  {} samples, first 40 ms: {}", rendered.records.len(), pattern);

    // Run a full seeded session
    println!("\nRunning a seeded session...");
    let mut scheduler = ModeScheduler::new(config, RngSource::seeded(42))?;
    let trace = scheduler.run(current_timestamp_millis())?;

    for summary in &trace.segments {
        println!(
            "  {:>10}  {:>4.0} Hz  duty {:>5.1} %  OKHS {}  {:>6.3} s",
            summary.mode.to_string(),
            summary.frequency_hz,
            summary.duty_cycle_percent,
            summary.okhs,
            summary.duration_s
        );
    }
    println!("Total: {} samples over {:.3} s", trace.sample_count(), trace.total_duration_s());

    let path = Path::new("target/demo_trace.csv");
    export_to_path(&trace.records, path, ExportFormat::Csv)?;
    println!("\nTrace written to {}", path.display());

    Ok(())
}
