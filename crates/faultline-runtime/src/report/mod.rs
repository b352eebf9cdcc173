//! Fault reports
//!
//! A [`FaultReport`] is an owned copy of everything a trace session exposes,
//! taken so the report can outlive the session (and the runtime borrow) that
//! produced it. [`FaultReporter`] is the fault handler's entry point: it drains
//! a session into a report, logs what happened, and renders it.

pub mod formatter;

pub use formatter::{ColorMode, ReportFormatter};

use crate::fault::CodeAddr;
use crate::logging::{FaultEvent, FaultLogger, LogBackend, NullFaultLogger};
use crate::trace::{CallFrameInfo, NativeFaultInfo, StackTraceWalker};
use faultline_config::Config;
use serde::Serialize;
use std::sync::Arc;

/// An owned call frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportFrame {
    pub level: usize,
    pub address: CodeAddr,
    pub filename: Option<String>,
    pub function: Option<String>,
    pub line: Option<u32>,
}

impl From<CallFrameInfo<'_>> for ReportFrame {
    fn from(frame: CallFrameInfo<'_>) -> Self {
        Self {
            level: frame.level,
            address: frame.address,
            filename: frame.filename.map(str::to_string),
            function: frame.function.map(str::to_string),
            line: frame.line,
        }
    }
}

/// An owned native fault
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportNative {
    pub index: u32,
    pub name: Option<String>,
    pub error: i32,
}

impl From<NativeFaultInfo<'_>> for ReportNative {
    fn from(native: NativeFaultInfo<'_>) -> Self {
        Self {
            index: native.native_index,
            name: native.native_name.map(str::to_string),
            error: native.native_error,
        }
    }
}

/// Everything known about one fault
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaultReport {
    pub script: Option<String>,
    pub error_code: i32,
    pub error_string: String,
    pub custom_message: Option<String>,
    pub native: Option<ReportNative>,
    pub debug_info_available: bool,
    pub frames: Vec<ReportFrame>,
    /// Frames the session could surface, including any not collected
    pub total_frames: usize,
}

impl FaultReport {
    /// Drain `walker` from the fault point outwards, keeping at most
    /// `max_frames` frames. The walker is rewound first.
    pub fn collect(walker: &mut StackTraceWalker<'_>, max_frames: Option<usize>) -> Self {
        walker.reset_trace();
        let total_frames = walker.frame_count();
        let limit = max_frames.unwrap_or(usize::MAX);

        let mut frames = Vec::with_capacity(total_frames.min(limit));
        while frames.len() < limit {
            match walker.next_frame() {
                Some(frame) => frames.push(ReportFrame::from(frame)),
                None => break,
            }
        }

        Self {
            script: walker.script_name().map(str::to_string),
            error_code: walker.error_code(),
            error_string: walker.error_string().to_string(),
            custom_message: walker.custom_error_string().map(str::to_string),
            native: walker.last_native().map(ReportNative::from),
            debug_info_available: walker.debug_info_available(),
            frames,
            total_frames,
        }
    }

    /// The fault's message: the raiser's own text if given, else the code's text
    pub fn message(&self) -> &str {
        self.custom_message.as_deref().unwrap_or(&self.error_string)
    }

    /// One-line summary, naming the native when the fault came from one
    pub fn headline(&self) -> String {
        match &self.native {
            Some(ReportNative {
                name: Some(name), ..
            }) => format!("Native \"{}\" reported: {}", name, self.message()),
            Some(ReportNative { index, .. }) => {
                format!("Native #{} reported: {}", index, self.message())
            }
            None => format!("Exception reported: {}", self.message()),
        }
    }

    /// True if frames were left out because of the frame limit
    pub fn truncated(&self) -> bool {
        self.frames.len() < self.total_frames
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// How reports are collected and rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Frame limit per report (`None` = all frames)
    pub max_frames: Option<usize>,
    /// Print raw addresses next to resolved frames
    pub show_addresses: bool,
    pub color: ColorMode,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            max_frames: None,
            show_addresses: false,
            color: ColorMode::Auto,
        }
    }
}

impl ReportOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_frames: config.max_frames(),
            show_addresses: config.show_addresses(),
            color: ColorMode::from_name(config.color()),
        }
    }
}

/// Turns trace sessions into logged, rendered reports
pub struct FaultReporter {
    options: ReportOptions,
    logger: Arc<dyn FaultLogger>,
}

impl FaultReporter {
    /// A reporter that logs nowhere
    pub fn new(options: ReportOptions) -> Self {
        Self {
            options,
            logger: Arc::new(NullFaultLogger),
        }
    }

    /// A reporter set up from loaded configuration
    pub fn from_config(config: &Config) -> Self {
        let options = ReportOptions::from_config(config);
        let logger = LogBackend::from_name(config.log_backend()).create(options.color.to_color_choice());
        Self { options, logger }
    }

    pub fn with_logger(mut self, logger: Arc<dyn FaultLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    pub fn logger(&self) -> &Arc<dyn FaultLogger> {
        &self.logger
    }

    pub fn formatter(&self) -> ReportFormatter {
        ReportFormatter::new(self.options.color).show_addresses(self.options.show_addresses)
    }

    /// Collect a report from `walker` and log it
    pub fn report(&self, walker: &mut StackTraceWalker<'_>) -> FaultReport {
        let report = FaultReport::collect(walker, self.options.max_frames);

        self.logger.log(FaultEvent::FaultRaised {
            script: report.script.clone(),
            code: report.error_code,
            message: report.headline(),
        });
        if let Some(native) = &report.native {
            self.logger.log(FaultEvent::NativeFault {
                index: native.index,
                name: native.name.clone(),
                error: native.error,
            });
        }
        if !report.debug_info_available {
            self.logger.log(FaultEvent::DebugInfoMissing {
                script: report.script.clone(),
            });
        }
        if report.truncated() {
            self.logger.log(FaultEvent::TraceTruncated {
                shown: report.frames.len(),
                total: report.total_frames,
            });
        }

        report
    }

    /// Collect, log, and print a report to stderr
    pub fn report_and_emit(&self, walker: &mut StackTraceWalker<'_>) -> FaultReport {
        let report = self.report(walker);
        self.formatter().emit(&report);
        report
    }
}
