//! Target descriptions.
//!
//! A [`TargetConfig`] is what the back end was configured for: family,
//! pointer width, processor, enabled ISA options and supported scalar
//! modes. It is the concrete [`TargetCapabilities`] the feature tables are
//! swept against, and it round-trips through `.target.toml` files.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::capabilities::{ScalarMode, TargetCapabilities, TargetFamily};

/// How the CPU prober should run for this target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProbeSettings {
    /// Compiler driver asked to describe the host CPU.
    #[serde(default = "ProbeSettings::default_driver")]
    pub driver: String,
    /// When false, probing is skipped and the architecture stays unset.
    #[serde(default = "ProbeSettings::default_enabled")]
    pub enabled: bool,
}

impl ProbeSettings {
    fn default_driver() -> String {
        "cc".into()
    }

    fn default_enabled() -> bool {
        true
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            driver: Self::default_driver(),
            enabled: Self::default_enabled(),
        }
    }
}

/// A complete target description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetConfig {
    /// Target name (e.g. "x86_64-haswell").
    pub name: String,
    pub family: TargetFamily,
    /// Pointer width in bits: 32 or 64.
    pub pointer_width: u32,
    /// Processor the back end was configured for, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,
    /// Enabled ISA option names.
    #[serde(default)]
    pub isa: BTreeSet<String>,
    /// Supported machine scalar modes. Derived from family and width when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scalar_modes: Option<BTreeSet<ScalarMode>>,
    #[serde(default)]
    pub probe: ProbeSettings,
}

impl TargetConfig {
    pub fn new(name: impl Into<String>, family: TargetFamily, pointer_width: u32) -> Self {
        Self {
            name: name.into(),
            family,
            pointer_width,
            processor: None,
            isa: BTreeSet::new(),
            scalar_modes: None,
            probe: ProbeSettings::default(),
        }
    }

    pub fn with_processor(mut self, processor: impl Into<String>) -> Self {
        self.processor = Some(processor.into());
        self
    }

    pub fn with_isa(mut self, options: &[&str]) -> Self {
        self.isa.extend(options.iter().map(|o| o.to_string()));
        self
    }

    pub fn with_probe(mut self, probe: ProbeSettings) -> Self {
        self.probe = probe;
        self
    }

    /// The scalar modes in effect: the explicit list, or the family default.
    pub fn effective_scalar_modes(&self) -> BTreeSet<ScalarMode> {
        match &self.scalar_modes {
            Some(modes) => modes.clone(),
            None => self.default_scalar_modes(),
        }
    }

    fn default_scalar_modes(&self) -> BTreeSet<ScalarMode> {
        let mut modes = BTreeSet::new();
        match self.family {
            TargetFamily::X86 => {
                if self.pointer_width == 64 {
                    modes.insert(ScalarMode::Ti);
                }
                // Half and bfloat16 ride on SSE2 registers.
                if self.isa.contains("sse2") {
                    modes.insert(ScalarMode::Hf);
                    modes.insert(ScalarMode::Bf);
                }
                modes.insert(ScalarMode::Xf);
                modes.insert(ScalarMode::Tf);
            }
            TargetFamily::AArch64 => {
                modes.extend([ScalarMode::Ti, ScalarMode::Hf, ScalarMode::Bf, ScalarMode::Tf]);
            }
        }
        modes
    }

    /// Generic x86-64: the SSE2 baseline.
    pub fn x86_64_generic() -> Self {
        Self::new("x86_64-generic", TargetFamily::X86, 64)
            .with_processor("x86-64")
            .with_isa(&["mmx", "sse", "sse2", "fxsr", "cx16"])
    }

    /// x86-64 tuned for Haswell.
    pub fn x86_64_haswell() -> Self {
        Self::new("x86_64-haswell", TargetFamily::X86, 64)
            .with_processor("haswell")
            .with_isa(&[
                "mmx", "sse", "sse2", "sse3", "ssse3", "sse4.1", "sse4.2", "popcnt", "aes",
                "pclmul", "avx", "avx2", "fma", "bmi", "bmi2", "lzcnt", "movbe", "f16c", "rdrnd",
                "fsgsbase", "xsave", "xsaveopt", "cx16", "sahf", "fxsr",
            ])
    }

    /// 32-bit x86 without vector extensions.
    pub fn i686_generic() -> Self {
        Self::new("i686-generic", TargetFamily::X86, 32)
            .with_processor("i686")
            .with_isa(&["fxsr"])
    }

    /// Generic Armv8-A.
    pub fn aarch64_generic() -> Self {
        Self::new("aarch64-generic", TargetFamily::AArch64, 64)
            .with_processor("generic")
            .with_isa(&["simd"])
    }

    /// Armv8.2-A with the usual server extensions.
    pub fn aarch64_armv8_2() -> Self {
        Self::new("aarch64-armv8.2", TargetFamily::AArch64, 64)
            .with_processor("neoverse-n1")
            .with_isa(&[
                "simd", "crc", "lse", "rdma", "rcpc", "fp16", "dotprod", "aes", "sha2", "v8.1a",
                "v8.2a",
            ])
    }

    /// All built-in presets, in a stable order.
    pub fn presets() -> Vec<TargetConfig> {
        vec![
            Self::x86_64_generic(),
            Self::x86_64_haswell(),
            Self::i686_generic(),
            Self::aarch64_generic(),
            Self::aarch64_armv8_2(),
        ]
    }

    /// The preset for the machine this binary was built for, falling back to x86-64.
    pub fn host() -> Self {
        match (std::env::consts::ARCH, cfg!(target_pointer_width = "64")) {
            ("aarch64", _) => Self::aarch64_generic(),
            ("x86", _) | (_, false) => Self::i686_generic(),
            _ => Self::x86_64_generic(),
        }
    }
}

impl TargetCapabilities for TargetConfig {
    fn family(&self) -> TargetFamily {
        self.family
    }

    fn is_64bit(&self) -> bool {
        self.pointer_width == 64
    }

    fn has_isa(&self, option: &str) -> bool {
        self.isa.contains(option)
    }

    fn processor(&self) -> Option<&str> {
        self.processor.as_deref()
    }

    fn supports_scalar_mode(&self, mode: ScalarMode) -> bool {
        match &self.scalar_modes {
            Some(modes) => modes.contains(&mode),
            None => self.default_scalar_modes().contains(&mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use jitinfo_types::DataModel;

    use super::*;

    #[test]
    fn presets_have_unique_names() {
        let presets = TargetConfig::presets();
        let names: BTreeSet<_> = presets.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names.len(), presets.len());
    }

    #[test]
    fn capabilities_from_config() {
        let haswell = TargetConfig::x86_64_haswell();
        assert!(haswell.is_64bit());
        assert!(haswell.has_isa("avx2"));
        assert!(!haswell.has_isa("avx512f"));
        assert_eq!(haswell.processor(), Some("haswell"));
        assert_eq!(haswell.data_model(), DataModel::lp64_x86());
    }

    #[test]
    fn default_scalar_modes_follow_width() {
        let wide = TargetConfig::x86_64_generic();
        assert!(wide.supports_scalar_mode(ScalarMode::Ti));
        assert!(wide.supports_scalar_mode(ScalarMode::Hf));

        let narrow = TargetConfig::i686_generic();
        assert!(!narrow.supports_scalar_mode(ScalarMode::Ti));
        assert!(!narrow.supports_scalar_mode(ScalarMode::Hf));
        assert!(narrow.supports_scalar_mode(ScalarMode::Xf));
        assert_eq!(narrow.data_model(), DataModel::ilp32_x86());

        let arm = TargetConfig::aarch64_generic();
        assert!(arm.supports_scalar_mode(ScalarMode::Tf));
        assert!(!arm.supports_scalar_mode(ScalarMode::Xf));
    }

    #[test]
    fn explicit_scalar_modes_override_defaults() {
        let mut config = TargetConfig::x86_64_generic();
        config.scalar_modes = Some(BTreeSet::from([ScalarMode::Xf]));
        assert!(!config.supports_scalar_mode(ScalarMode::Ti));
        assert!(config.supports_scalar_mode(ScalarMode::Xf));
        assert_eq!(config.effective_scalar_modes().len(), 1);
    }

    #[test]
    fn probe_defaults() {
        let probe = ProbeSettings::default();
        assert_eq!(probe.driver, "cc");
        assert!(probe.enabled);
        assert!(!ProbeSettings::disabled().enabled);
    }
}
