//! `jitinfo info`: run one request's registration phase and print the result.

use anyhow::{bail, Result};
use jitinfo_session::JitBackend;
use jitinfo_targets::{NoCpuDetector, TargetInfo};

use super::load_target;

/// Register target info for a fresh request and print it.
pub fn run(target: Option<&str>, format: Option<&str>, no_probe: bool) -> Result<()> {
    let info = register(target, no_probe)?;
    match format {
        Some("json") => println!("{}", serde_json::to_string_pretty(&info)?),
        Some(other) => bail!("unknown format '{other}' (expected 'json')"),
        None => print_info(&info),
    }
    Ok(())
}

fn register(target: Option<&str>, no_probe: bool) -> Result<TargetInfo> {
    let config = load_target(target)?;
    let mut backend = JitBackend::new(config);
    if no_probe {
        backend = backend.with_detector(Box::new(NoCpuDetector));
    }
    backend.init_target()?;
    Ok(backend.take_target_info())
}

fn print_info(info: &TargetInfo) {
    println!(
        "Architecture: {}",
        info.arch().unwrap_or("(not probed)")
    );
    println!(
        "128-bit int:  {}",
        if info.supports_128bit_int() { "yes" } else { "no" }
    );
    println!();

    for key in info.feature_keys() {
        let values: Vec<&str> = info.feature_values(key).collect();
        println!("--- {key} ({}) ---", values.len());
        for chunk in values.chunks(8) {
            println!("  {}", chunk.join(" "));
        }
        println!();
    }

    println!("--- supported types ---");
    for ty in info.supported_types() {
        println!("  {ty}");
    }
}

#[cfg(test)]
mod tests {
    use jitinfo_targets::{TARGET_ARCH, TARGET_FEATURE};

    use super::*;

    #[test]
    fn registers_preset_without_probe() {
        let info = register(Some("x86_64-haswell"), true).unwrap();
        assert!(info.arch().is_none());
        assert!(info.has_feature(TARGET_ARCH, "x86_64"));
        assert!(info.has_feature(TARGET_FEATURE, "avx2"));
        assert!(info.supports_128bit_int());
    }

    #[test]
    fn prints_both_formats() {
        assert!(run(Some("aarch64-generic"), None, true).is_ok());
        assert!(run(Some("i686-generic"), Some("json"), true).is_ok());
        assert!(run(Some("i686-generic"), Some("xml"), true).is_err());
    }

    #[test]
    fn unknown_target_fails() {
        assert!(run(Some("no-such-target"), None, true).is_err());
    }
}
