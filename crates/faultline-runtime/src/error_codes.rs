//! VM error code registry
//!
//! Fault classifications raised by the interpreter. Codes are small integers so
//! they can travel through the VM's cell-sized registers; the display text for a
//! code is looked up through an [`ErrorTable`] on demand.
//!
//! Ranges:
//! - 0: no error
//! - 1-2: loading errors
//! - 3-22: interpreter faults
//! - 23: failure reported by a native
//! - 24-32: invocation and resource errors

// === Error Code Constants ===

pub const ERROR_NONE: i32 = 0;
pub const ERROR_FILE_FORMAT: i32 = 1;
pub const ERROR_DECOMPRESSOR: i32 = 2;
pub const ERROR_HEAP_LOW: i32 = 3;
pub const ERROR_PARAM: i32 = 4;
pub const ERROR_INVALID_ADDRESS: i32 = 5;
pub const ERROR_NOT_FOUND: i32 = 6;
pub const ERROR_INDEX: i32 = 7;
pub const ERROR_STACK_LOW: i32 = 8;
pub const ERROR_NOT_DEBUGGING: i32 = 9;
pub const ERROR_INVALID_INSTRUCTION: i32 = 10;
pub const ERROR_MEMORY_ACCESS: i32 = 11;
pub const ERROR_STACK_MIN: i32 = 12;
pub const ERROR_HEAP_MIN: i32 = 13;
pub const ERROR_DIVIDE_BY_ZERO: i32 = 14;
pub const ERROR_ARRAY_BOUNDS: i32 = 15;
pub const ERROR_INSTRUCTION_PARAM: i32 = 16;
pub const ERROR_STACK_LEAK: i32 = 17;
pub const ERROR_HEAP_LEAK: i32 = 18;
pub const ERROR_ARRAY_TOO_BIG: i32 = 19;
pub const ERROR_TRACKER_BOUNDS: i32 = 20;
pub const ERROR_INVALID_NATIVE: i32 = 21;
pub const ERROR_PARAMS_MAX: i32 = 22;
pub const ERROR_NATIVE: i32 = 23;
pub const ERROR_NOT_RUNNABLE: i32 = 24;
pub const ERROR_ABORTED: i32 = 25;
pub const ERROR_CODE_TOO_OLD: i32 = 26;
pub const ERROR_CODE_TOO_NEW: i32 = 27;
pub const ERROR_OUT_OF_MEMORY: i32 = 28;
pub const ERROR_INTEGER_OVERFLOW: i32 = 29;
pub const ERROR_TIMEOUT: i32 = 30;
pub const ERROR_USER: i32 = 31;
pub const ERROR_FATAL: i32 = 32;

/// Text shown when a code has no entry in the active table
pub const INVALID_ERROR_CODE: &str = "Invalid error code";

// === Error Table ===

/// Code → display text lookup, injected into trace sessions.
pub trait ErrorTable {
    /// Text for `code`, or `None` if the table does not know it.
    fn error_string(&self, code: i32) -> Option<&str>;
}

/// Error code descriptor
#[derive(Debug, Clone)]
pub struct ErrorCodeInfo {
    pub code: i32,
    /// Constant-style name (e.g. "DIVIDE_BY_ZERO")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
}

/// Get info for an error code, if known
pub fn lookup(code: i32) -> Option<&'static ErrorCodeInfo> {
    ERROR_CODES.iter().find(|e| e.code == code)
}

/// Get description for an error code
pub fn description_for(code: i32) -> Option<&'static str> {
    lookup(code).map(|e| e.description)
}

/// The VM's built-in error table, backed by [`ERROR_CODES`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardErrorTable;

impl ErrorTable for StandardErrorTable {
    fn error_string(&self, code: i32) -> Option<&str> {
        description_for(code)
    }
}

/// Shared instance used when a session is not given a table explicitly
pub static STANDARD_ERRORS: StandardErrorTable = StandardErrorTable;

macro_rules! code {
    ($code:expr, $name:literal, $desc:literal) => {
        ErrorCodeInfo {
            code: $code,
            name: $name,
            description: $desc,
        }
    };
}

/// All known error codes
pub static ERROR_CODES: &[ErrorCodeInfo] = &[
    code!(ERROR_NONE, "NONE", "No error occurred"),
    code!(ERROR_FILE_FORMAT, "FILE_FORMAT", "Unrecognizable file format"),
    code!(ERROR_DECOMPRESSOR, "DECOMPRESSOR", "Decompressor was not found"),
    code!(ERROR_HEAP_LOW, "HEAP_LOW", "Not enough space on the heap"),
    code!(ERROR_PARAM, "PARAM", "Invalid parameter or parameter type"),
    code!(ERROR_INVALID_ADDRESS, "INVALID_ADDRESS", "Invalid script address"),
    code!(ERROR_NOT_FOUND, "NOT_FOUND", "Object or index not found"),
    code!(ERROR_INDEX, "INDEX", "Invalid index or index not found"),
    code!(ERROR_STACK_LOW, "STACK_LOW", "Not enough space on the stack"),
    code!(
        ERROR_NOT_DEBUGGING,
        "NOT_DEBUGGING",
        "Debug section not found or debug not enabled"
    ),
    code!(ERROR_INVALID_INSTRUCTION, "INVALID_INSTRUCTION", "Invalid instruction"),
    code!(ERROR_MEMORY_ACCESS, "MEMORY_ACCESS", "Invalid memory access"),
    code!(ERROR_STACK_MIN, "STACK_MIN", "Stack went below stack boundary"),
    code!(ERROR_HEAP_MIN, "HEAP_MIN", "Heap went below heap boundary"),
    code!(ERROR_DIVIDE_BY_ZERO, "DIVIDE_BY_ZERO", "Divide by zero"),
    code!(ERROR_ARRAY_BOUNDS, "ARRAY_BOUNDS", "Array index is out of bounds"),
    code!(
        ERROR_INSTRUCTION_PARAM,
        "INSTRUCTION_PARAM",
        "Instruction contained invalid parameter"
    ),
    code!(ERROR_STACK_LEAK, "STACK_LEAK", "Stack memory leaked by native"),
    code!(ERROR_HEAP_LEAK, "HEAP_LEAK", "Heap memory leaked by native"),
    code!(ERROR_ARRAY_TOO_BIG, "ARRAY_TOO_BIG", "Dynamic array is too big"),
    code!(ERROR_TRACKER_BOUNDS, "TRACKER_BOUNDS", "Tracker stack is out of bounds"),
    code!(ERROR_INVALID_NATIVE, "INVALID_NATIVE", "Native is not bound"),
    code!(ERROR_PARAMS_MAX, "PARAMS_MAX", "Maximum number of parameters reached"),
    code!(ERROR_NATIVE, "NATIVE", "Native detected error"),
    code!(ERROR_NOT_RUNNABLE, "NOT_RUNNABLE", "Script not runnable"),
    code!(ERROR_ABORTED, "ABORTED", "Call was aborted"),
    code!(ERROR_CODE_TOO_OLD, "CODE_TOO_OLD", "Bytecode format is too old"),
    code!(ERROR_CODE_TOO_NEW, "CODE_TOO_NEW", "Bytecode format is too new"),
    code!(ERROR_OUT_OF_MEMORY, "OUT_OF_MEMORY", "Out of memory"),
    code!(ERROR_INTEGER_OVERFLOW, "INTEGER_OVERFLOW", "Integer overflow"),
    code!(ERROR_TIMEOUT, "TIMEOUT", "Script execution timed out"),
    code!(ERROR_USER, "USER", "Custom error"),
    code!(ERROR_FATAL, "FATAL", "Fatal error"),
];
