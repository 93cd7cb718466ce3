//! `jitinfo target`: preset listing, description and validation.

use std::path::Path;

use anyhow::{bail, Result};
use jitinfo_targets::parse::{builtin_targets, discover_targets, target_to_toml, validate_target};
use jitinfo_targets::{FeatureTable, TargetCapabilities, TargetConfig};

use super::load_target;

/// List built-in presets and any targets found under `project_dir/targets`.
pub fn list(project_dir: Option<&Path>) -> Result<()> {
    println!("Built-in targets:");
    println!();
    for config in builtin_targets() {
        println!("  {:<20} {}", config.name, summary(&config));
    }

    if let Some(dir) = project_dir {
        let custom = discover_targets(dir)?;
        if !custom.is_empty() {
            println!();
            println!("Project targets:");
            println!();
            for (name, path) in custom {
                println!("  {name:<20} {}", path.display());
            }
        }
    }
    println!();
    println!("Use 'jitinfo target describe <name>' for details.");
    Ok(())
}

fn summary(config: &TargetConfig) -> String {
    format!(
        "{} {}-bit, {}",
        config.family,
        config.pointer_width,
        config.processor.as_deref().unwrap_or("no processor")
    )
}

/// Describe a target in detail.
pub fn describe(name: &str, format: Option<&str>) -> Result<()> {
    let config = load_target(Some(name))?;
    match format {
        Some("toml") => {
            print!("{}", target_to_toml(&config)?);
            return Ok(());
        }
        Some(other) => bail!("unknown format '{other}' (expected 'toml')"),
        None => {}
    }

    println!("=== Target: {} ===", config.name);
    println!("Family:        {}", config.family);
    println!("Pointer width: {} bits", config.pointer_width);
    if let Some(processor) = &config.processor {
        println!("Processor:     {processor}");
    }
    println!();

    println!("--- ISA options ---");
    let known = FeatureTable::for_family(config.family);
    for option in &config.isa {
        let marker = if known.knows_isa(option) { "" } else { "  (unknown)" };
        println!("  {option}{marker}");
    }
    println!();

    println!("--- Scalar modes ---");
    for mode in config.effective_scalar_modes() {
        println!("  {mode:?}");
    }
    println!();

    let model = config.data_model();
    println!("--- Data model ---");
    println!("  int:       {} bytes", model.int_bytes);
    println!("  long:      {} bytes", model.long_bytes);
    println!("  long long: {} bytes", model.long_long_bytes);
    println!("  pointer:   {} bytes", model.pointer_bytes);
    println!();

    println!("--- Probe ---");
    if config.probe.enabled {
        println!("  driver: {}", config.probe.driver);
    } else {
        println!("  disabled");
    }
    Ok(())
}

/// Validate a target and print every issue found.
///
/// Fails only if there is at least one error; warnings are reported.
pub fn validate(name: &str) -> Result<()> {
    let config = load_target(Some(name))?;
    let issues = match validate_target(&config) {
        Ok(()) => {
            println!("{}: ok", config.name);
            return Ok(());
        }
        Err(issues) => issues,
    };

    for issue in &issues {
        println!("{}: {}: {}", config.name, issue.severity, issue.message);
    }
    let errors = issues.iter().filter(|i| i.severity == "error").count();
    if errors > 0 {
        bail!("{} has {errors} error(s)", config.name);
    }
    Ok(())
}
