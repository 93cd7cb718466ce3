//! Target capability discovery for the JIT back end.
//!
//! Describes the active target ([`TargetConfig`]), probes the host CPU,
//! sweeps the per-family feature tables and collects everything into a
//! per-request [`TargetInfo`].

pub mod capabilities;
pub mod config;
pub mod error;
pub mod features;
pub mod info;
pub mod os;
pub mod parse;
pub mod probe;

pub use capabilities::{ScalarMode, TargetCapabilities, TargetFamily};
pub use config::{ProbeSettings, TargetConfig};
pub use error::{Result, TargetError};
pub use features::{FeatureRule, FeatureTable, Predicate, SupportedType, TypeRule};
pub use features::{TARGET_ARCH, TARGET_FEATURE};
pub use info::TargetInfo;
pub use os::{LinuxOsHooks, OsHooks};
pub use probe::{CpuDetector, DriverCpuDetector, NoCpuDetector, ProbeBuffer};
