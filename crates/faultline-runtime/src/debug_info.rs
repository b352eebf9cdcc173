//! Debug symbol resolution
//!
//! Maps code addresses back to the source file, function and line they were
//! compiled from. Each of the three lookups stands on its own: stripped or
//! partial debug sections are common, and a trace should show whatever is
//! still known about a frame.

use crate::fault::CodeAddr;
use thiserror::Error;

/// Address → source symbol lookups.
///
/// Every method may independently report "not found" with `None`.
pub trait SymbolResolver {
    /// File containing the code at `addr`
    fn lookup_file(&self, addr: CodeAddr) -> Option<&str>;

    /// Function containing the code at `addr`
    fn lookup_function(&self, addr: CodeAddr) -> Option<&str>;

    /// 1-based source line for the code at `addr`
    fn lookup_line(&self, addr: CodeAddr) -> Option<u32>;
}

/// Errors raised while assembling debug tables
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DebugInfoError {
    #[error("function '{name}' has an empty code range {start:#x}..{end:#x}")]
    EmptyRange {
        name: String,
        start: CodeAddr,
        end: CodeAddr,
    },

    #[error("function '{first}' overlaps function '{second}' at {at:#x}")]
    OverlappingFunctions {
        first: String,
        second: String,
        at: CodeAddr,
    },

    #[error("conflicting line entries at {addr:#x}: {first} and {second}")]
    ConflictingLines {
        addr: CodeAddr,
        first: u32,
        second: u32,
    },

    #[error("files '{first}' and '{second}' both start at {addr:#x}")]
    ConflictingFiles {
        addr: CodeAddr,
        first: String,
        second: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FileEntry {
    start: CodeAddr,
    name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FunctionEntry {
    start: CodeAddr,
    end: CodeAddr,
    name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LineEntry {
    addr: CodeAddr,
    line: u32,
}

/// Sorted debug tables for one bytecode image.
///
/// - files: each file owns the code from its start address up to the next file
/// - functions: half-open `[start, end)` ranges, non-overlapping
/// - lines: each entry covers code from its address up to the next entry,
///   and never leaks across a function's start
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DebugInfo {
    files: Vec<FileEntry>,
    functions: Vec<FunctionEntry>,
    lines: Vec<LineEntry>,
}

impl DebugInfo {
    /// Start building a debug table
    pub fn builder() -> DebugInfoBuilder {
        DebugInfoBuilder::default()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.functions.is_empty() && self.lines.is_empty()
    }

    fn function_at(&self, addr: CodeAddr) -> Option<&FunctionEntry> {
        let i = self.functions.partition_point(|f| f.start <= addr);
        let candidate = self.functions.get(i.checked_sub(1)?)?;
        (addr < candidate.end).then_some(candidate)
    }
}

impl SymbolResolver for DebugInfo {
    fn lookup_file(&self, addr: CodeAddr) -> Option<&str> {
        let i = self.files.partition_point(|f| f.start <= addr);
        self.files
            .get(i.checked_sub(1)?)
            .map(|f| f.name.as_str())
    }

    fn lookup_function(&self, addr: CodeAddr) -> Option<&str> {
        self.function_at(addr).map(|f| f.name.as_str())
    }

    fn lookup_line(&self, addr: CodeAddr) -> Option<u32> {
        let i = self.lines.partition_point(|l| l.addr <= addr);
        let entry = self.lines.get(i.checked_sub(1)?)?;

        // A line recorded before the enclosing function belongs to other code
        if let Some(function) = self.function_at(addr) {
            if entry.addr < function.start {
                return None;
            }
        }
        Some(entry.line)
    }
}

/// Collects debug entries in any order and validates them on `build`.
///
/// ```
/// use faultline_runtime::debug_info::{DebugInfo, SymbolResolver};
///
/// let debug = DebugInfo::builder()
///     .add_file(0x00, "timers.sp")
///     .add_function(0x00, 0x40, "OnTimer")
///     .add_line(0x00, 12)
///     .add_line(0x18, 13)
///     .build()
///     .unwrap();
///
/// assert_eq!(debug.lookup_function(0x20), Some("OnTimer"));
/// assert_eq!(debug.lookup_line(0x20), Some(13));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DebugInfoBuilder {
    files: Vec<FileEntry>,
    functions: Vec<FunctionEntry>,
    lines: Vec<LineEntry>,
}

impl DebugInfoBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that code from `start` onwards was compiled from `name`
    pub fn add_file(mut self, start: CodeAddr, name: impl Into<String>) -> Self {
        self.files.push(FileEntry {
            start,
            name: name.into(),
        });
        self
    }

    /// Declare a function occupying `[start, end)`
    pub fn add_function(mut self, start: CodeAddr, end: CodeAddr, name: impl Into<String>) -> Self {
        self.functions.push(FunctionEntry {
            start,
            end,
            name: name.into(),
        });
        self
    }

    /// Declare that code from `addr` onwards belongs to source `line` (1-based)
    pub fn add_line(mut self, addr: CodeAddr, line: u32) -> Self {
        self.lines.push(LineEntry { addr, line });
        self
    }

    /// Sort and validate the collected tables
    pub fn build(mut self) -> Result<DebugInfo, DebugInfoError> {
        if let Some(f) = self.functions.iter().find(|f| f.start >= f.end) {
            return Err(DebugInfoError::EmptyRange {
                name: f.name.clone(),
                start: f.start,
                end: f.end,
            });
        }

        self.functions.sort_by_key(|f| f.start);
        for pair in self.functions.windows(2) {
            if pair[0].end > pair[1].start {
                return Err(DebugInfoError::OverlappingFunctions {
                    first: pair[0].name.clone(),
                    second: pair[1].name.clone(),
                    at: pair[1].start,
                });
            }
        }

        self.files.sort_by_key(|f| f.start);
        for pair in self.files.windows(2) {
            if pair[0].start == pair[1].start && pair[0].name != pair[1].name {
                return Err(DebugInfoError::ConflictingFiles {
                    addr: pair[0].start,
                    first: pair[0].name.clone(),
                    second: pair[1].name.clone(),
                });
            }
        }
        self.files.dedup();

        self.lines.sort_by_key(|l| l.addr);
        for pair in self.lines.windows(2) {
            if pair[0].addr == pair[1].addr && pair[0].line != pair[1].line {
                return Err(DebugInfoError::ConflictingLines {
                    addr: pair[0].addr,
                    first: pair[0].line,
                    second: pair[1].line,
                });
            }
        }
        self.lines.dedup();

        Ok(DebugInfo {
            files: self.files,
            functions: self.functions,
            lines: self.lines,
        })
    }
}
