//! `jitinfo builtins`: resolve built-in signatures the way a client would.

use std::sync::Arc;

use anyhow::{bail, Result};
use jitinfo_builtins::BuiltinSignature;
use jitinfo_session::{CompileRequest, JitBackend};
use jitinfo_targets::NoCpuDetector;

use super::load_target;

/// One built-in and its signature, if usable.
type Resolution = (String, Option<Arc<BuiltinSignature>>);

/// Resolve one built-in, or every declared one, and print the signatures.
pub fn run(target: Option<&str>, name: Option<&str>, format: Option<&str>) -> Result<()> {
    if let Some(other) = format.filter(|f| *f != "json") {
        bail!("unknown format '{other}' (expected 'json')");
    }
    let mut request = start(target)?;
    let resolved = resolve(&mut request, name)?;

    if format.is_some() {
        let usable: Vec<&BuiltinSignature> = resolved
            .iter()
            .filter_map(|(_, sig)| sig.as_deref())
            .collect();
        println!("{}", serde_json::to_string_pretty(&usable)?);
        return Ok(());
    }

    for (name, sig) in &resolved {
        match sig {
            Some(sig) => println!("  {sig}"),
            None => println!("  {name}: not usable on this target"),
        }
    }
    let stats = request.cache_stats();
    println!();
    println!(
        "{} of {} usable ({} translated, {} unresolved)",
        resolved.iter().filter(|(_, sig)| sig.is_some()).count(),
        resolved.len(),
        stats.translations,
        stats.unresolved
    );
    Ok(())
}

/// Built-in signatures depend only on the configured ISA, so no probe runs.
fn start(target: Option<&str>) -> Result<CompileRequest> {
    let config = load_target(target)?;
    let mut backend = JitBackend::new(config).with_detector(Box::new(NoCpuDetector));
    Ok(backend.start_request()?)
}

fn resolve(request: &mut CompileRequest, name: Option<&str>) -> Result<Vec<Resolution>> {
    let names: Vec<String> = match name {
        Some(name) => {
            if !request.builtin_names().any(|n| n == name) {
                bail!(
                    "'{name}' is not a built-in of target '{}'",
                    request.target_name()
                );
            }
            vec![name.to_string()]
        }
        None => request.builtin_names().map(str::to_string).collect(),
    };

    let mut resolved = Vec::with_capacity(names.len());
    for name in names {
        let sig = request.resolve_builtin(&name)?;
        resolved.push((name, sig));
    }
    Ok(resolved)
}
