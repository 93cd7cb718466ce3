//! Host CPU probing.
//!
//! A [`CpuDetector`] is asked once per request to describe the local CPU.
//! It answers with a [`ProbeBuffer`] of space-separated `-key=value`
//! tokens, or `None` when detection is unsupported. The architecture is
//! the value of the `-march=` token.

use std::fmt;
use std::process::{Command, Stdio};

use crate::capabilities::{TargetCapabilities, TargetFamily};
use crate::config::ProbeSettings;
use crate::info::TargetInfo;

/// A descriptor returned by a detector.
///
/// Owns the text and an optional release action. The action runs exactly
/// once, when the buffer is dropped, whatever path the caller took.
pub struct ProbeBuffer {
    text: String,
    release: Option<Box<dyn FnOnce()>>,
}

impl ProbeBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            release: None,
        }
    }

    /// A buffer whose backing resource is freed by `release` on drop.
    pub fn with_release(text: impl Into<String>, release: impl FnOnce() + 'static) -> Self {
        Self {
            text: text.into(),
            release: Some(Box::new(release)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Drop for ProbeBuffer {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for ProbeBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeBuffer")
            .field("text", &self.text)
            .field("release", &self.release.is_some())
            .finish()
    }
}

/// Something that can describe the local CPU.
pub trait CpuDetector {
    /// Describe the local CPU. `params` name the requested info kind and,
    /// on some families, the ABI width. `None` means detection is
    /// unsupported on this host.
    fn detect_local_cpu(&self, params: &[&str]) -> Option<ProbeBuffer>;
}

/// A detector for hosts where probing is disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCpuDetector;

impl CpuDetector for NoCpuDetector {
    fn detect_local_cpu(&self, _params: &[&str]) -> Option<ProbeBuffer> {
        None
    }
}

/// Asks a C compiler driver what `-march=native` expands to.
#[derive(Debug, Clone)]
pub struct DriverCpuDetector {
    driver: String,
}

impl DriverCpuDetector {
    pub fn new(driver: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
        }
    }

    pub fn driver(&self) -> &str {
        &self.driver
    }
}

impl CpuDetector for DriverCpuDetector {
    fn detect_local_cpu(&self, params: &[&str]) -> Option<ProbeBuffer> {
        let mut command = Command::new(&self.driver);
        match params.first().copied() {
            Some("cpu") => command.arg("-mcpu=native"),
            _ => command.arg("-march=native"),
        };
        match params.get(1).copied() {
            Some("64") => {
                command.arg("-m64");
            }
            Some("32") => {
                command.arg("-m32");
            }
            _ => {}
        }
        command
            .args(["-###", "-x", "c", "-E", "-"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        let output = match command.output() {
            Ok(output) => output,
            Err(e) => {
                log::debug!("cpu probe: cannot run '{}': {}", self.driver, e);
                return None;
            }
        };
        let diagnostics = String::from_utf8_lossy(&output.stderr);
        let flags = collect_machine_flags(&diagnostics);
        if flags.is_empty() {
            log::debug!("cpu probe: '{}' reported no machine flags", self.driver);
            None
        } else {
            Some(ProbeBuffer::new(flags))
        }
    }
}

/// Pick the `-m<name>=<value>` tokens out of a driver's `-###` output.
fn collect_machine_flags(diagnostics: &str) -> String {
    let mut flags: Vec<&str> = Vec::new();
    for token in diagnostics.split_whitespace() {
        let token = token.trim_matches('"');
        if token.starts_with("-m") && token.contains('=') && !flags.contains(&token) {
            flags.push(token);
        }
    }
    flags.join(" ")
}

/// A detector built from a target's probe settings.
pub fn detector_for(settings: &ProbeSettings) -> Box<dyn CpuDetector> {
    if settings.enabled {
        Box::new(DriverCpuDetector::new(settings.driver.clone()))
    } else {
        Box::new(NoCpuDetector)
    }
}

/// The query parameters a family passes to the detector.
pub fn probe_params(caps: &dyn TargetCapabilities) -> Vec<&'static str> {
    match caps.family() {
        TargetFamily::X86 => vec!["arch", if caps.is_64bit() { "64" } else { "32" }],
        TargetFamily::AArch64 => vec!["arch"],
    }
}

/// The value of the `-march=` token, up to the next space or end of string.
///
/// An absent token or an empty value yields `None`.
pub fn parse_march(descriptor: &str) -> Option<&str> {
    descriptor
        .split(' ')
        .find_map(|token| token.strip_prefix("-march="))
        .filter(|value| !value.is_empty())
}

/// Probe the host CPU and record its architecture.
///
/// Writes the architecture at most once and returns whether it did. A
/// failed probe leaves `info` untouched.
pub fn probe_architecture(
    detector: &dyn CpuDetector,
    caps: &dyn TargetCapabilities,
    info: &mut TargetInfo,
) -> bool {
    let params = probe_params(caps);
    log::debug!("cpu probe: detecting local cpu with {:?}", params);
    let Some(buffer) = detector.detect_local_cpu(&params) else {
        log::debug!("cpu probe: detection unsupported on this host");
        return false;
    };
    match parse_march(buffer.as_str()) {
        Some(arch) => {
            log::debug!("cpu probe: architecture '{}'", arch);
            info.set_arch(arch);
            true
        }
        None => {
            log::warn!("cpu probe: no -march= token in '{}'", buffer.as_str());
            false
        }
    }
}
