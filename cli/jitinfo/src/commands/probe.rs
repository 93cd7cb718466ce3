//! `jitinfo probe`: run the CPU detector once and show what it found.

use anyhow::{bail, Result};
use jitinfo_targets::probe::parse_march;
use jitinfo_targets::{CpuDetector, DriverCpuDetector};

/// Query `driver` for the local CPU and print the descriptor and architecture.
pub fn run(driver: &str, bits: u32) -> Result<()> {
    let width = match bits {
        64 => "64",
        32 => "32",
        other => bail!("unsupported ABI width {other} (expected 32 or 64)"),
    };
    report(&DriverCpuDetector::new(driver), &["arch", width])
}

fn report(detector: &dyn CpuDetector, params: &[&str]) -> Result<()> {
    let Some(buffer) = detector.detect_local_cpu(params) else {
        println!("CPU detection is not supported on this host.");
        return Ok(());
    };
    println!("Descriptor:   {}", buffer.as_str());
    match parse_march(buffer.as_str()) {
        Some(arch) => println!("Architecture: {arch}"),
        None => println!("Architecture: (no -march= token)"),
    }
    Ok(())
}
