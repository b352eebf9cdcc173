//! The runtime a fault is traced against

use crate::debug_info::{DebugInfo, SymbolResolver};
use crate::error_codes::{ErrorTable, STANDARD_ERRORS};
use crate::fault::{FaultContext, FaultSnapshot};
use crate::native::{NativeRegistry, NativeTable};
use crate::trace::StackTraceWalker;
use std::fmt;
use std::sync::Arc;

/// Everything a trace session needs to borrow from the faulting runtime.
pub trait FaultHost {
    /// Call state captured when the fault was raised
    fn fault_context(&self) -> &dyn FaultContext;

    /// Debug symbols, if the loaded image carries any
    fn symbol_resolver(&self) -> Option<&dyn SymbolResolver>;

    /// Natives bound to the loaded image
    fn natives(&self) -> &dyn NativeRegistry;

    /// Display name of the loaded script, for report headers
    fn script_name(&self) -> Option<&str> {
        None
    }

    /// Text table for error codes raised by this host
    fn error_table(&self) -> &dyn ErrorTable {
        &STANDARD_ERRORS
    }
}

/// A loaded script image plus the call state of its most recent fault.
///
/// # Examples
///
/// ```
/// use faultline_runtime::fault::FaultSnapshot;
/// use faultline_runtime::native::NativeTable;
/// use faultline_runtime::runtime::Runtime;
/// use faultline_runtime::error_codes::ERROR_DIVIDE_BY_ZERO;
///
/// let runtime = Runtime::new("admin.smx", NativeTable::new())
///     .with_context(FaultSnapshot::new(0x40, vec![0x10]));
///
/// let mut trace = runtime.trace(ERROR_DIVIDE_BY_ZERO, None, 0);
/// assert_eq!(trace.by_ref().count(), 2);
/// ```
#[derive(Clone)]
pub struct Runtime {
    name: String,
    natives: NativeTable,
    debug: Option<DebugInfo>,
    errors: Option<Arc<dyn ErrorTable + Send + Sync>>,
    context: FaultSnapshot,
}

impl Runtime {
    /// Create a runtime with no debug symbols and an empty call state
    pub fn new(name: impl Into<String>, natives: NativeTable) -> Self {
        Self {
            name: name.into(),
            natives,
            debug: None,
            errors: None,
            context: FaultSnapshot::new(0, Vec::new()),
        }
    }

    /// Attach debug symbols
    pub fn with_debug_info(mut self, debug: DebugInfo) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Resolve error text through `table` in every session this runtime opens
    pub fn with_error_table(mut self, table: Arc<dyn ErrorTable + Send + Sync>) -> Self {
        self.errors = Some(table);
        self
    }

    /// Replace the recorded call state
    pub fn with_context(mut self, context: FaultSnapshot) -> Self {
        self.context = context;
        self
    }

    /// Record the call state of a new fault, replacing the previous one.
    ///
    /// Takes `&mut self`, so no trace session of an earlier fault can still
    /// be borrowing the old state.
    pub fn record_fault(&mut self, context: FaultSnapshot) {
        self.context = context;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn debug_info(&self) -> Option<&DebugInfo> {
        self.debug.as_ref()
    }

    pub fn native_table(&self) -> &NativeTable {
        &self.natives
    }

    pub fn context(&self) -> &FaultSnapshot {
        &self.context
    }

    /// Open a trace session for the recorded fault
    pub fn trace<'a>(
        &'a self,
        error_code: i32,
        custom_message: Option<&'a str>,
        start_marker: usize,
    ) -> StackTraceWalker<'a> {
        StackTraceWalker::new(self, error_code, custom_message, start_marker)
    }
}

impl FaultHost for Runtime {
    fn fault_context(&self) -> &dyn FaultContext {
        &self.context
    }

    fn symbol_resolver(&self) -> Option<&dyn SymbolResolver> {
        self.debug.as_ref().map(|d| d as &dyn SymbolResolver)
    }

    fn natives(&self) -> &dyn NativeRegistry {
        &self.natives
    }

    fn script_name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn error_table(&self) -> &dyn ErrorTable {
        match &self.errors {
            Some(table) => table.as_ref(),
            None => &STANDARD_ERRORS,
        }
    }
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("name", &self.name)
            .field("natives", &self.natives)
            .field("debug", &self.debug)
            .field("custom_errors", &self.errors.is_some())
            .field("context", &self.context)
            .finish()
    }
}
