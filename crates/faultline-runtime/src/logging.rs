//! Fault event logging
//!
//! Structured records of every fault a reporter handles. Hosts pick a backend
//! (memory for tests and tooling, stderr for servers, null to silence) and
//! share it across fault handlers.

use std::fmt;
use std::sync::{Arc, Mutex};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Fault event types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaultEvent {
    /// A fault was reported
    FaultRaised {
        script: Option<String>,
        code: i32,
        message: String,
    },
    /// The fault came from inside a native call
    NativeFault {
        index: u32,
        name: Option<String>,
        error: i32,
    },
    /// Frames could only be shown as raw addresses
    DebugInfoMissing { script: Option<String> },
    /// The report omitted frames beyond the configured limit
    TraceTruncated { shown: usize, total: usize },
}

impl fmt::Display for FaultEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultEvent::FaultRaised {
                script,
                code,
                message,
            } => match script {
                Some(script) => write!(f, "Fault {} in {}: {}", code, script, message),
                None => write!(f, "Fault {}: {}", code, message),
            },
            FaultEvent::NativeFault { index, name, error } => match name {
                Some(name) => write!(f, "Native \"{}\" (#{}) failed with error {}", name, index, error),
                None => write!(f, "Native #{} failed with error {}", index, error),
            },
            FaultEvent::DebugInfoMissing { script } => match script {
                Some(script) => write!(f, "No debug info for {}; trace shows raw addresses", script),
                None => write!(f, "No debug info; trace shows raw addresses"),
            },
            FaultEvent::TraceTruncated { shown, total } => {
                write!(f, "Trace truncated: showing {} of {} frames", shown, total)
            }
        }
    }
}

/// Log entry with timestamp
#[derive(Debug, Clone)]
pub struct FaultEntry {
    /// Event timestamp (Unix timestamp in milliseconds)
    pub timestamp: u64,
    pub event: FaultEvent,
}

impl FaultEntry {
    /// Create a new entry stamped with the current time
    pub fn new(event: FaultEvent) -> Self {
        Self {
            timestamp: current_timestamp_ms(),
            event,
        }
    }

    /// Format as log line
    pub fn to_log_line(&self) -> String {
        format!(
            "[{}.{:03}] {}",
            self.timestamp / 1000,
            self.timestamp % 1000,
            self.event
        )
    }
}

fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Logger trait for customizable backends
pub trait FaultLogger: Send + Sync {
    /// Log a fault event
    fn log(&self, event: FaultEvent);

    /// Get all retained entries (empty for streaming backends)
    fn entries(&self) -> Vec<FaultEntry>;

    /// Drop all retained entries
    fn clear(&self);
}

/// In-memory logger
#[derive(Debug, Clone, Default)]
pub struct MemoryFaultLogger {
    entries: Arc<Mutex<Vec<FaultEntry>>>,
}

impl MemoryFaultLogger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FaultLogger for MemoryFaultLogger {
    fn log(&self, event: FaultEvent) {
        let entry = FaultEntry::new(event);
        // A poisoned lock only means another thread panicked mid-push
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push(entry);
    }

    fn entries(&self) -> Vec<FaultEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

/// Writes each event to stderr as it is logged
#[derive(Debug, Clone, Copy)]
pub struct StderrFaultLogger {
    color: ColorChoice,
}

impl StderrFaultLogger {
    pub fn new(color: ColorChoice) -> Self {
        Self { color }
    }

    fn write_entry(&self, w: &mut impl WriteColor, entry: &FaultEntry) -> std::io::Result<()> {
        w.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
        write!(w, "fault")?;
        w.reset()?;
        writeln!(w, " {}", entry.to_log_line())
    }
}

impl Default for StderrFaultLogger {
    fn default() -> Self {
        Self::new(ColorChoice::Auto)
    }
}

impl FaultLogger for StderrFaultLogger {
    fn log(&self, event: FaultEvent) {
        let mut stream = StandardStream::stderr(self.color);
        let _ = self.write_entry(&mut stream, &FaultEntry::new(event));
    }

    fn entries(&self) -> Vec<FaultEntry> {
        Vec::new()
    }

    fn clear(&self) {}
}

/// No-op logger
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFaultLogger;

impl FaultLogger for NullFaultLogger {
    fn log(&self, _event: FaultEvent) {}

    fn entries(&self) -> Vec<FaultEntry> {
        Vec::new()
    }

    fn clear(&self) {}
}

/// Logger backend names accepted in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogBackend {
    Stderr,
    Memory,
    None,
}

impl LogBackend {
    /// Parse a configured backend name; unknown names fall back to stderr
    pub fn from_name(name: &str) -> Self {
        match name {
            "memory" => LogBackend::Memory,
            "none" => LogBackend::None,
            _ => LogBackend::Stderr,
        }
    }

    /// Instantiate the backend
    pub fn create(self, color: ColorChoice) -> Arc<dyn FaultLogger> {
        match self {
            LogBackend::Stderr => Arc::new(StderrFaultLogger::new(color)),
            LogBackend::Memory => Arc::new(MemoryFaultLogger::new()),
            LogBackend::None => Arc::new(NullFaultLogger),
        }
    }
}
