pub mod builtins;
pub mod info;
pub mod probe;
pub mod target;

use anyhow::{Context, Result};
use jitinfo_targets::parse::resolve_target;
use jitinfo_targets::TargetConfig;

/// The named target, or the host preset when none is given.
pub(crate) fn load_target(name: Option<&str>) -> Result<TargetConfig> {
    let config = match name {
        Some(name) => resolve_target(name).with_context(|| {
            format!("cannot load target '{name}'. Use 'jitinfo target list' to see available targets.")
        })?,
        None => TargetConfig::host(),
    };
    log::debug!("using target '{}'", config.name);
    Ok(config)
}
