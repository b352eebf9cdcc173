//! Interpreter state captured at the moment of a fault

/// A code address inside the loaded bytecode image
pub type CodeAddr = u32;

/// A native call that reported an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeFault {
    /// Index into the runtime's native registry
    pub index: u32,
    /// Error code the native reported
    pub error: i32,
}

/// Read-only view of the interpreter's call state at fault time.
///
/// The return-pointer stack holds, per nested call, the address to resume at
/// once that call returns. Entry `depth() - 1` is the most recent call.
pub trait FaultContext {
    /// The instruction pointer at the fault itself
    fn cip(&self) -> CodeAddr;

    /// Number of entries on the return-pointer stack
    fn depth(&self) -> usize;

    /// Return address recorded at `index`, if `index < depth()`
    fn return_cip(&self, index: usize) -> Option<CodeAddr>;

    /// The native invocation the fault occurred in, if any
    fn native_fault(&self) -> Option<NativeFault>;
}

/// Immutable copy of the interpreter's call state.
///
/// ```
/// use faultline_runtime::fault::{FaultContext, FaultSnapshot};
///
/// let snapshot = FaultSnapshot::new(0x80, vec![0x10, 0x24]);
/// assert_eq!(snapshot.depth(), 2);
/// assert_eq!(snapshot.return_cip(1), Some(0x24));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultSnapshot {
    cip: CodeAddr,
    return_stack: Vec<CodeAddr>,
    native: Option<NativeFault>,
}

impl FaultSnapshot {
    /// Capture `cip` and the return-pointer stack (oldest entry first)
    pub fn new(cip: CodeAddr, return_stack: Vec<CodeAddr>) -> Self {
        Self {
            cip,
            return_stack,
            native: None,
        }
    }

    /// Record that the fault was raised by native `index` with `error`
    pub fn with_native_fault(mut self, index: u32, error: i32) -> Self {
        self.native = Some(NativeFault { index, error });
        self
    }

    /// Current stack depth.
    ///
    /// An interpreter records this when it enters a top-level invocation and
    /// passes it as the start marker of any trace raised inside that call.
    pub fn capture_depth(&self) -> usize {
        self.return_stack.len()
    }

    /// The recorded return addresses, oldest first
    pub fn return_stack(&self) -> &[CodeAddr] {
        &self.return_stack
    }
}

impl FaultContext for FaultSnapshot {
    fn cip(&self) -> CodeAddr {
        self.cip
    }

    fn depth(&self) -> usize {
        self.return_stack.len()
    }

    fn return_cip(&self, index: usize) -> Option<CodeAddr> {
        self.return_stack.get(index).copied()
    }

    fn native_fault(&self) -> Option<NativeFault> {
        self.native
    }
}
