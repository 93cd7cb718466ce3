//! Target capability predicates.
//!
//! The back end's view of the active target: which architecture family it
//! belongs to, which ISA options are enabled and which machine scalar modes
//! it supports. Feature tables are evaluated against this trait; every
//! query is a pure read.

use serde::{Deserialize, Serialize};

use jitinfo_types::DataModel;

/// Architecture family of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFamily {
    X86,
    AArch64,
}

impl TargetFamily {
    pub fn name(self) -> &'static str {
        match self {
            TargetFamily::X86 => "x86",
            TargetFamily::AArch64 => "aarch64",
        }
    }
}

impl std::fmt::Display for TargetFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Machine scalar modes whose support varies between targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarMode {
    /// 128-bit integer.
    Ti,
    /// IEEE half precision.
    Hf,
    /// bfloat16.
    Bf,
    /// x87 extended precision.
    Xf,
    /// IEEE quad precision.
    Tf,
}

/// Read-only capability queries against the active target configuration.
pub trait TargetCapabilities {
    fn family(&self) -> TargetFamily;

    fn is_64bit(&self) -> bool;

    /// Whether the named ISA option (e.g. `"avx2"`, `"sve"`) is enabled.
    fn has_isa(&self, option: &str) -> bool;

    /// The processor the back end was configured for, if known.
    fn processor(&self) -> Option<&str>;

    fn supports_scalar_mode(&self, mode: ScalarMode) -> bool;

    /// Widths of the C scalar types under this target.
    fn data_model(&self) -> DataModel {
        match (self.family(), self.is_64bit()) {
            (TargetFamily::X86, true) => DataModel::lp64_x86(),
            (TargetFamily::X86, false) => DataModel::ilp32_x86(),
            (TargetFamily::AArch64, _) => DataModel::lp64_aarch64(),
        }
    }
}
