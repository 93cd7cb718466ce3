//! TOML parsing, serialization, validation, and discovery for target descriptions.
//!
//! Target descriptions are stored as `.target.toml` files in a `targets/`
//! directory. Built-in presets are available by name without any file.

use std::path::{Path, PathBuf};

use crate::capabilities::{ScalarMode, TargetFamily};
use crate::config::TargetConfig;
use crate::error::{Result, TargetError};
use crate::features::FeatureTable;

/// A validation issue found in a target description.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity: "error" or "warning".
    pub severity: &'static str,
    /// Human-readable description.
    pub message: String,
}

/// Load a target from a `.target.toml` file.
pub fn load_target_toml(path: &Path) -> Result<TargetConfig> {
    if !path.exists() {
        return Err(TargetError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    parse_target_toml(&content)
}

/// Parse a target from a TOML string.
pub fn parse_target_toml(toml_str: &str) -> Result<TargetConfig> {
    let config: TargetConfig = toml::from_str(toml_str)?;
    Ok(config)
}

/// Serialize a target to pretty TOML.
pub fn target_to_toml(config: &TargetConfig) -> Result<String> {
    let toml_str = toml::to_string_pretty(config)?;
    Ok(toml_str)
}

/// Validate a target description for consistency.
///
/// Returns `Ok(())` if valid, or `Err(issues)` with a list of problems.
/// Warnings alone still make the result `Err`; callers filter by severity.
pub fn validate_target(config: &TargetConfig) -> std::result::Result<(), Vec<ValidationIssue>> {
    let mut issues = Vec::new();

    if config.name.trim().is_empty() {
        issues.push(ValidationIssue {
            severity: "error",
            message: "target name is empty".into(),
        });
    }

    if config.pointer_width != 32 && config.pointer_width != 64 {
        issues.push(ValidationIssue {
            severity: "error",
            message: format!(
                "pointer width {} is not supported (expected 32 or 64)",
                config.pointer_width
            ),
        });
    }

    if config.family == TargetFamily::AArch64 && config.pointer_width != 64 {
        issues.push(ValidationIssue {
            severity: "error",
            message: "aarch64 targets must use 64-bit pointers".into(),
        });
    }

    let table = FeatureTable::for_family(config.family);
    for option in &config.isa {
        if !table.knows_isa(option) {
            issues.push(ValidationIssue {
                severity: "error",
                message: format!("unknown {} ISA option '{}'", config.family, option),
            });
        }
    }

    let modes = config.effective_scalar_modes();
    if config.family == TargetFamily::X86
        && config.pointer_width == 32
        && modes.contains(&ScalarMode::Ti)
    {
        issues.push(ValidationIssue {
            severity: "error",
            message: "scalar mode 'ti' requires a 64-bit x86 target".into(),
        });
    }
    if config.family == TargetFamily::AArch64 && modes.contains(&ScalarMode::Xf) {
        issues.push(ValidationIssue {
            severity: "warning",
            message: "scalar mode 'xf' has no effect on aarch64".into(),
        });
    }

    if config.probe.enabled && config.probe.driver.trim().is_empty() {
        issues.push(ValidationIssue {
            severity: "error",
            message: "probing is enabled but the probe driver is empty".into(),
        });
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Reject a description that has validation errors. Warnings pass.
pub fn ensure_valid(config: &TargetConfig) -> Result<()> {
    let Err(issues) = validate_target(config) else {
        return Ok(());
    };
    let errors: Vec<String> = issues
        .into_iter()
        .filter(|issue| issue.severity == "error")
        .map(|issue| issue.message)
        .collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(TargetError::Validation {
            detail: format!("{}: {}", config.name, errors.join("; ")),
        })
    }
}

/// All built-in presets.
pub fn builtin_targets() -> Vec<TargetConfig> {
    TargetConfig::presets()
}

/// Resolve a target by preset name, or else by path to a `.target.toml` file.
pub fn resolve_target(name: &str) -> Result<TargetConfig> {
    if let Some(preset) = builtin_targets().into_iter().find(|p| p.name == name) {
        return Ok(preset);
    }
    let path = Path::new(name);
    if path.is_file() {
        return load_target_toml(path);
    }
    Err(TargetError::UnknownTarget { name: name.into() })
}

/// Discover all `.target.toml` files in a directory's `targets/` subdirectory.
///
/// Returns a list of (target_name, file_path) pairs, sorted by name.
pub fn discover_targets(project_dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let targets_dir = project_dir.join("targets");
    if !targets_dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut targets = Vec::new();
    for entry in std::fs::read_dir(&targets_dir)? {
        let path = entry?.path();
        let stem = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(".target.toml"))
            .map(str::to_string);
        if let Some(name) = stem {
            targets.push((name, path));
        }
    }
    targets.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_presets() {
        for original in builtin_targets() {
            let toml_str = target_to_toml(&original).unwrap();
            let parsed = parse_target_toml(&toml_str).unwrap();
            assert_eq!(original, parsed, "{}", original.name);
        }
    }

    #[test]
    fn parse_minimal_toml() {
        let toml_str = r#"
name = "minimal"
family = "x86"
pointer-width = 64
isa = ["sse2", "avx"]
"#;
        let config = parse_target_toml(toml_str).unwrap();
        assert_eq!(config.name, "minimal");
        assert_eq!(config.family, TargetFamily::X86);
        assert!(config.isa.contains("avx"));
        assert!(config.processor.is_none());
        assert!(config.scalar_modes.is_none());
        assert_eq!(config.probe.driver, "cc");
        assert!(config.probe.enabled);
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
name = "custom-arm"
family = "aarch64"
pointer-width = 64
processor = "cortex-a72"
isa = ["simd", "crc"]
scalar-modes = ["ti", "tf"]

[probe]
driver = "clang"
enabled = false
"#;
        let config = parse_target_toml(toml_str).unwrap();
        assert_eq!(config.processor.as_deref(), Some("cortex-a72"));
        assert_eq!(
            config.effective_scalar_modes().into_iter().collect::<Vec<_>>(),
            vec![ScalarMode::Ti, ScalarMode::Tf]
        );
        assert_eq!(config.probe.driver, "clang");
        assert!(!config.probe.enabled);
    }

    #[test]
    fn parse_invalid_returns_error() {
        assert!(parse_target_toml("this is not valid toml [[[").is_err());
    }

    #[test]
    fn parse_missing_field_returns_error() {
        assert!(parse_target_toml("name = \"incomplete\"\n").is_err());
    }

    #[test]
    fn parse_unknown_family_returns_error() {
        let toml_str = "name = \"x\"\nfamily = \"mips\"\npointer-width = 32\n";
        assert!(matches!(
            parse_target_toml(toml_str),
            Err(TargetError::Toml(_))
        ));
    }

    #[test]
    fn presets_validate() {
        for preset in builtin_targets() {
            assert!(validate_target(&preset).is_ok(), "{}", preset.name);
        }
    }

    #[test]
    fn validate_unknown_isa() {
        let config = TargetConfig::aarch64_generic().with_isa(&["avx2"]);
        let issues = validate_target(&config).unwrap_err();
        assert!(issues.iter().any(|i| i.message.contains("'avx2'")));
    }

    #[test]
    fn validate_bad_pointer_width() {
        let mut config = TargetConfig::x86_64_generic();
        config.pointer_width = 48;
        let issues = validate_target(&config).unwrap_err();
        assert!(issues.iter().any(|i| i.message.contains("pointer width 48")));
    }

    #[test]
    fn validate_narrow_aarch64() {
        let mut config = TargetConfig::aarch64_generic();
        config.pointer_width = 32;
        let issues = validate_target(&config).unwrap_err();
        assert!(issues.iter().any(|i| i.message.contains("64-bit pointers")));
    }

    #[test]
    fn validate_ti_on_32bit() {
        let mut config = TargetConfig::i686_generic();
        config.scalar_modes = Some([ScalarMode::Ti].into());
        let issues = validate_target(&config).unwrap_err();
        assert!(issues.iter().any(|i| i.message.contains("'ti'")));
    }

    #[test]
    fn validate_xf_on_aarch64_is_warning() {
        let mut config = TargetConfig::aarch64_generic();
        config.scalar_modes = Some([ScalarMode::Xf].into());
        let issues = validate_target(&config).unwrap_err();
        assert!(issues.iter().all(|i| i.severity == "warning"));
    }

    #[test]
    fn ensure_valid_ignores_warnings() {
        let mut config = TargetConfig::aarch64_generic();
        config.scalar_modes = Some([ScalarMode::Xf].into());
        assert!(ensure_valid(&config).is_ok());

        config.pointer_width = 32;
        let err = ensure_valid(&config).unwrap_err();
        assert!(matches!(err, TargetError::Validation { .. }));
        assert!(err.to_string().contains("64-bit pointers"));
    }

    #[test]
    fn resolve_preset_and_unknown() {
        assert_eq!(resolve_target("x86_64-haswell").unwrap().name, "x86_64-haswell");
        assert!(matches!(
            resolve_target("no-such-target"),
            Err(TargetError::UnknownTarget { .. })
        ));
    }

    #[test]
    fn resolve_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mine.target.toml");
        let mut config = TargetConfig::x86_64_generic();
        config.name = "mine".into();
        std::fs::write(&path, target_to_toml(&config).unwrap()).unwrap();

        let resolved = resolve_target(path.to_str().unwrap()).unwrap();
        assert_eq!(resolved.name, "mine");
    }

    #[test]
    fn discover_targets_finds_files() {
        let dir = tempfile::tempdir().unwrap();
        let targets_dir = dir.path().join("targets");
        std::fs::create_dir_all(&targets_dir).unwrap();

        let body = target_to_toml(&TargetConfig::aarch64_generic()).unwrap();
        std::fs::write(targets_dir.join("board-b.target.toml"), &body).unwrap();
        std::fs::write(targets_dir.join("board-a.target.toml"), &body).unwrap();
        std::fs::write(targets_dir.join("notes.txt"), "ignore me").unwrap();

        let targets = discover_targets(dir.path()).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].0, "board-a");
        assert_eq!(targets[1].0, "board-b");
    }

    #[test]
    fn discover_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_targets(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn load_not_found() {
        let result = load_target_toml(Path::new("/nonexistent/path.target.toml"));
        assert!(matches!(result, Err(TargetError::NotFound { .. })));
    }
}
