//! Run-time and memory reporting for the command-line tools.

use std::fmt;
use std::time::{Duration, Instant};

/// Elapsed time and peak resident memory of the current process.
#[derive(Debug, Clone, Copy)]
pub struct ResourceUsage {
    pub elapsed: Duration,
    pub peak_memory: Option<u64>,
}

impl ResourceUsage {
    /// Measures from `start` until now.
    #[must_use]
    pub fn since(start: Instant) -> Self {
        Self {
            elapsed: start.elapsed(),
            peak_memory: peak_memory_bytes(),
        }
    }
}

impl fmt::Display for ResourceUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let memory = self
            .peak_memory
            .map_or_else(|| "N/A".to_string(), format_bytes);
        write!(f, "{} elapsed, {memory} peak", format_elapsed(self.elapsed))
    }
}

/// Formats a duration as HH:MM:SS.d.
#[must_use]
pub fn format_elapsed(d: Duration) -> String {
    let secs = d.as_secs();
    format!(
        "{:02}:{:02}:{:02}.{}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60,
        d.subsec_millis() / 100
    )
}

/// Peak resident set size in bytes, if the platform reports it.
#[must_use]
pub fn peak_memory_bytes() -> Option<u64> {
    #[cfg(any(target_os = "macos", target_os = "linux"))]
    {
        use std::mem::MaybeUninit;
        let mut usage = MaybeUninit::<libc::rusage>::uninit();
        // SAFETY: RUSAGE_SELF with a pointer to properly sized and aligned storage.
        let ret = unsafe { libc::getrusage(libc::RUSAGE_SELF, usage.as_mut_ptr()) };
        if ret == 0 {
            // SAFETY: getrusage succeeded and filled the struct.
            let usage = unsafe { usage.assume_init() };
            let max_rss = usage.ru_maxrss as u64;
            // ru_maxrss is bytes on macOS, kilobytes on Linux
            return Some(if cfg!(target_os = "macos") { max_rss } else { max_rss * 1024 });
        }
    }
    None
}

/// Formats a byte count with a binary unit suffix.
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
