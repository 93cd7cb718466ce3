//! The back-end object.
//!
//! Owns the target configuration, the CPU detector, the OS hooks and the
//! live target-info slot. Each compile request goes through
//! reset -> probe -> feature sweep -> OS hooks -> move out.

use jitinfo_targets::probe::{detector_for, probe_architecture};
use jitinfo_targets::{CpuDetector, FeatureTable, LinuxOsHooks, OsHooks, TargetConfig, TargetInfo};

use crate::error::Result;
use crate::lifecycle::TargetInfoSlot;
use crate::request::CompileRequest;

pub struct JitBackend {
    config: TargetConfig,
    detector: Box<dyn CpuDetector>,
    os_hooks: Box<dyn OsHooks>,
    slot: TargetInfoSlot,
}

impl JitBackend {
    /// A back end for `config`, probing as its `[probe]` settings say.
    pub fn new(config: TargetConfig) -> Self {
        let detector = detector_for(&config.probe);
        Self {
            config,
            detector,
            os_hooks: Box::new(LinuxOsHooks),
            slot: TargetInfoSlot::new(),
        }
    }

    pub fn with_detector(mut self, detector: Box<dyn CpuDetector>) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_os_hooks(mut self, os_hooks: Box<dyn OsHooks>) -> Self {
        self.os_hooks = os_hooks;
        self
    }

    pub fn config(&self) -> &TargetConfig {
        &self.config
    }

    /// The slot's current contents, for inspection between init and take.
    pub fn pending_target_info(&self) -> &TargetInfo {
        self.slot.info()
    }

    /// Run the registration phase for a new request.
    ///
    /// Fails if the previous request's target info was never taken.
    pub fn init_target(&mut self) -> Result<()> {
        let info = self.slot.begin()?;
        probe_architecture(self.detector.as_ref(), &self.config, info);
        FeatureTable::for_family(self.config.family).sweep(&self.config, info);
        self.os_hooks.register_os_target_info(info);
        log::debug!(
            "{}: registered {} features, {} supported types",
            self.config.name,
            info.feature_count(),
            info.supported_types().len()
        );
        Ok(())
    }

    /// Move the registered target info out, leaving the slot empty.
    pub fn take_target_info(&mut self) -> TargetInfo {
        self.slot.take()
    }

    /// Register, take the result and build a request around it.
    pub fn start_request(&mut self) -> Result<CompileRequest> {
        self.init_target()?;
        let info = self.take_target_info();
        CompileRequest::new(info, &self.config)
    }
}

impl std::fmt::Debug for JitBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JitBackend")
            .field("config", &self.config.name)
            .field("slot", &self.slot)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use jitinfo_targets::{NoCpuDetector, TARGET_ARCH, TARGET_FEATURE};

    use super::*;
    use crate::error::SessionError;

    fn backend(config: TargetConfig) -> JitBackend {
        JitBackend::new(config).with_detector(Box::new(NoCpuDetector))
    }

    #[test]
    fn init_sweeps_features() {
        let mut backend = backend(TargetConfig::x86_64_haswell());
        backend.init_target().unwrap();
        let info = backend.take_target_info();
        assert!(info.has_feature(TARGET_FEATURE, "avx2"));
        assert!(info.has_feature(TARGET_FEATURE, "ermsbd"));
        assert!(info.has_feature(TARGET_ARCH, "x86_64"));
        assert!(info.supports_128bit_int());
        assert!(info.arch().is_none());
    }

    #[test]
    fn second_init_without_take_fails() {
        let mut backend = backend(TargetConfig::aarch64_generic());
        backend.init_target().unwrap();
        assert!(matches!(
            backend.init_target(),
            Err(SessionError::UnconsumedTargetInfo)
        ));
        backend.take_target_info();
        assert!(backend.pending_target_info().is_empty());
        backend.init_target().unwrap();
    }

    #[test]
    fn requests_do_not_share_state() {
        let mut backend = backend(TargetConfig::x86_64_haswell());
        let first = backend.start_request().unwrap();
        let second = backend.start_request().unwrap();
        assert_eq!(first.target_info(), second.target_info());
        assert!(backend.pending_target_info().is_empty());
    }
}
