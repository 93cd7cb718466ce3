//! Operating-system target info hooks.
//!
//! Run after the CPU sweep so an OS can add its own `(key, value)` pairs.

use crate::info::TargetInfo;

pub trait OsHooks {
    fn register_os_target_info(&self, info: &mut TargetInfo);
}

/// Linux contributes nothing beyond the CPU tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinuxOsHooks;

impl OsHooks for LinuxOsHooks {
    fn register_os_target_info(&self, _info: &mut TargetInfo) {}
}
