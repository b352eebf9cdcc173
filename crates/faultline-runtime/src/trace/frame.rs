//! Records produced by a trace session

use crate::fault::CodeAddr;
use serde::Serialize;

/// One logical call frame.
///
/// Level 0 is the fault point itself; higher levels are the callers, outwards.
/// `filename`, `function` and `line` are resolved independently, so any subset
/// of them may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CallFrameInfo<'a> {
    pub level: usize,
    /// Code address the frame is executing (or will resume) at
    pub address: CodeAddr,
    pub filename: Option<&'a str>,
    pub function: Option<&'a str>,
    pub line: Option<u32>,
}

impl<'a> CallFrameInfo<'a> {
    /// A frame with nothing resolved
    pub fn unresolved(level: usize, address: CodeAddr) -> Self {
        Self {
            level,
            address,
            filename: None,
            function: None,
            line: None,
        }
    }

    /// Line number, with 0 standing in for "unknown"
    pub fn line_number(&self) -> u32 {
        self.line.unwrap_or(0)
    }

    /// True if no symbol could be resolved for this frame
    pub fn is_unresolved(&self) -> bool {
        self.filename.is_none() && self.function.is_none() && self.line.is_none()
    }
}

/// The native call a fault was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NativeFaultInfo<'a> {
    pub native_index: u32,
    /// `None` when the registry has no native at `native_index`
    pub native_name: Option<&'a str>,
    /// Error code the native reported
    pub native_error: i32,
}
