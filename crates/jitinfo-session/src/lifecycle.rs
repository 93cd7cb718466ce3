//! The single live target-info slot.
//!
//! At most one request registers at a time. Registration begins with
//! [`TargetInfoSlot::begin`] and ends when [`TargetInfoSlot::take`] moves
//! the accumulated state out, leaving a fresh empty registry behind.

use jitinfo_targets::TargetInfo;

use crate::error::{Result, SessionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotState {
    Idle,
    Registering,
}

/// Holder of the active request's [`TargetInfo`]. Never empty-handed:
/// between `begin` and `take` insertion is always valid.
#[derive(Debug, Clone)]
pub struct TargetInfoSlot {
    info: TargetInfo,
    state: SlotState,
}

impl TargetInfoSlot {
    pub fn new() -> Self {
        Self {
            info: TargetInfo::new(),
            state: SlotState::Idle,
        }
    }

    /// Start registering for a new request.
    ///
    /// Fails if the previous registration was never taken, so two
    /// targets' data can never merge.
    pub fn begin(&mut self) -> Result<&mut TargetInfo> {
        if self.state == SlotState::Registering {
            return Err(SessionError::UnconsumedTargetInfo);
        }
        self.info = TargetInfo::new();
        self.state = SlotState::Registering;
        log::debug!("target info: registration started");
        Ok(&mut self.info)
    }

    pub fn is_registering(&self) -> bool {
        self.state == SlotState::Registering
    }

    pub fn info(&self) -> &TargetInfo {
        &self.info
    }

    pub fn info_mut(&mut self) -> &mut TargetInfo {
        &mut self.info
    }

    /// Move the accumulated state out and reset the slot to empty.
    pub fn take(&mut self) -> TargetInfo {
        self.state = SlotState::Idle;
        log::debug!("target info: moved out");
        std::mem::take(&mut self.info)
    }
}

impl Default for TargetInfoSlot {
    fn default() -> Self {
        Self::new()
    }
}
