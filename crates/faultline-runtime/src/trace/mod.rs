//! Stack trace reconstruction
//!
//! A [`StackTraceWalker`] turns the interpreter's return-pointer stack into a
//! sequence of logical call frames, innermost first:
//!
//! ```text
//! level 0  ->  cip                       (the faulting instruction)
//! level 1  ->  return_stack[depth - 1]   (the most recent caller)
//! level 2  ->  return_stack[depth - 2]
//! ...
//! level n  ->  return_stack[start_marker]
//! ```
//!
//! The start marker is the stack depth at which the faulting top-level
//! invocation began. Entries below it belong to whatever invoked that call
//! (possibly another script invocation further up the host's stack) and are
//! never surfaced. The entry at exactly `start_marker` is the invocation's
//! own outermost frame and is included.
//!
//! Frames are resolved lazily: [`StackTraceWalker::skip_frame`] advances past a
//! frame without touching debug symbols, [`StackTraceWalker::next_frame`]
//! resolves file, function and line independently of one another.

mod frame;

pub use frame::{CallFrameInfo, NativeFaultInfo};

use crate::debug_info::SymbolResolver;
use crate::error_codes::{ErrorTable, INVALID_ERROR_CODE};
use crate::fault::{CodeAddr, FaultContext};
use crate::native::NativeRegistry;
use crate::runtime::FaultHost;
use std::fmt;

/// A trace session over one fault.
///
/// Borrows the faulting runtime for `'a`; the runtime cannot record a new fault
/// (or be dropped) while a session is open.
///
/// # Examples
///
/// ```
/// use faultline_runtime::error_codes::ERROR_ARRAY_BOUNDS;
/// use faultline_runtime::fault::FaultSnapshot;
/// use faultline_runtime::native::NativeTable;
/// use faultline_runtime::runtime::Runtime;
///
/// // Five recorded calls; the faulting invocation started at depth 2.
/// let runtime = Runtime::new("game.smx", NativeTable::new())
///     .with_context(FaultSnapshot::new(0xf0, vec![0xa0, 0xa1, 0xa2, 0xa3, 0xa4]));
///
/// let mut trace = runtime.trace(ERROR_ARRAY_BOUNDS, None, 2);
/// let addresses: Vec<u32> = trace.by_ref().map(|f| f.address).collect();
/// assert_eq!(addresses, vec![0xf0, 0xa4, 0xa3, 0xa2]);
/// assert_eq!(trace.error_string(), "Array index is out of bounds");
/// ```
pub struct StackTraceWalker<'a> {
    runtime: &'a dyn FaultHost,
    context: &'a dyn FaultContext,
    debug: Option<&'a dyn SymbolResolver>,
    natives: &'a dyn NativeRegistry,
    errors: &'a dyn ErrorTable,
    error_code: i32,
    custom_message: Option<&'a str>,
    start_marker: usize,
    level: usize,
}

impl<'a> StackTraceWalker<'a> {
    /// Open a session over `runtime`'s current fault.
    ///
    /// `start_marker` is the return-stack depth recorded when the faulting
    /// top-level invocation was entered. Error text comes from the host's
    /// [`error_table`](FaultHost::error_table) unless
    /// [`with_error_table`](Self::with_error_table) replaces it.
    pub fn new(
        runtime: &'a dyn FaultHost,
        error_code: i32,
        custom_message: Option<&'a str>,
        start_marker: usize,
    ) -> Self {
        Self {
            runtime,
            context: runtime.fault_context(),
            debug: runtime.symbol_resolver(),
            natives: runtime.natives(),
            errors: runtime.error_table(),
            error_code,
            custom_message,
            start_marker,
            level: 0,
        }
    }

    /// Resolve error text through `table` instead of the standard table
    pub fn with_error_table(mut self, table: &'a dyn ErrorTable) -> Self {
        self.errors = table;
        self
    }

    /// Whether frames can be resolved to source symbols.
    ///
    /// Without debug info, frames still step but only carry their address.
    pub fn debug_info_available(&self) -> bool {
        self.debug.is_some()
    }

    pub fn error_code(&self) -> i32 {
        self.error_code
    }

    /// Message supplied by whoever raised the fault, if any
    pub fn custom_error_string(&self) -> Option<&'a str> {
        self.custom_message
    }

    /// Text for the error code, looked up on every call
    pub fn error_string(&self) -> &'a str {
        self.errors
            .error_string(self.error_code)
            .unwrap_or(INVALID_ERROR_CODE)
    }

    /// Name of the faulting script, when the runtime has one
    pub fn script_name(&self) -> Option<&'a str> {
        self.runtime.script_name()
    }

    pub fn start_marker(&self) -> usize {
        self.start_marker
    }

    /// Number of frames already stepped past
    pub fn level(&self) -> usize {
        self.level
    }

    /// Rewind to the fault point
    pub fn reset_trace(&mut self) {
        self.level = 0;
    }

    /// Code address of the frame at `level`, or `None` once the walk has left
    /// the invocation's frames.
    fn address_at(&self, level: usize) -> Option<CodeAddr> {
        if level == 0 {
            return Some(self.context.cip());
        }

        let depth = self.context.depth();
        if depth == 0 {
            return None;
        }

        // Entries run from depth - 1 down to start_marker
        let offset = level - 1;
        let index = (depth - 1).checked_sub(offset)?;
        if index < self.start_marker {
            return None;
        }

        self.context.return_cip(index)
    }

    /// Would the next step produce a frame? Does not move the cursor.
    pub fn has_more_frames(&self) -> bool {
        self.address_at(self.level).is_some()
    }

    /// Step past the next frame without resolving it.
    ///
    /// Advances the cursor exactly like [`next_frame`](Self::next_frame), so
    /// callers can count or skip frames cheaply.
    pub fn skip_frame(&mut self) -> bool {
        if self.address_at(self.level).is_none() {
            return false;
        }
        self.level += 1;
        true
    }

    /// Step to the next frame, resolving its symbols.
    ///
    /// Returns `None` once the invocation's frames are exhausted. File,
    /// function and line are looked up separately; a failed lookup leaves just
    /// that field empty.
    pub fn next_frame(&mut self) -> Option<CallFrameInfo<'a>> {
        let address = self.address_at(self.level)?;

        let mut frame = CallFrameInfo::unresolved(self.level, address);
        if let Some(debug) = self.debug {
            frame.filename = debug.lookup_file(address);
            frame.function = debug.lookup_function(address);
            frame.line = debug.lookup_line(address);
        }

        self.level += 1;
        Some(frame)
    }

    /// Total frames this session surfaces, independent of the cursor
    pub fn frame_count(&self) -> usize {
        let mut count = 0;
        while self.address_at(count).is_some() {
            count += 1;
        }
        count
    }

    /// The native call the fault was raised from.
    ///
    /// `None` unless the fault context records a native fault. The index is
    /// always reported; the name is `None` if the registry does not know it.
    pub fn last_native(&self) -> Option<NativeFaultInfo<'a>> {
        let fault = self.context.native_fault()?;
        Some(NativeFaultInfo {
            native_index: fault.index,
            native_name: self.natives.native_name(fault.index),
            native_error: fault.error,
        })
    }

    /// Name of the native the fault was raised from, if known
    pub fn last_native_name(&self) -> Option<&'a str> {
        self.last_native().and_then(|n| n.native_name)
    }
}

impl<'a> Iterator for StackTraceWalker<'a> {
    type Item = CallFrameInfo<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame()
    }
}

impl fmt::Debug for StackTraceWalker<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackTraceWalker")
            .field("error_code", &self.error_code)
            .field("custom_message", &self.custom_message)
            .field("start_marker", &self.start_marker)
            .field("level", &self.level)
            .field("debug_info_available", &self.debug.is_some())
            .finish()
    }
}
