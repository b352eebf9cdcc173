//! Faultline Runtime - post-fault call-stack inspection
//!
//! When a script running in the bytecode VM faults, this crate reconstructs
//! the logical call frames of the faulting invocation:
//! - Fault state capture (instruction pointer, return-pointer stack, native fault)
//! - Debug symbol resolution (file, function, line per code address)
//! - Native registry and error-code tables
//! - Stack trace sessions, fault reports and fault logging
//!
//! # Example
//!
//! ```
//! use faultline_runtime::{DebugInfo, FaultSnapshot, NativeTable, Runtime};
//! use faultline_runtime::error_codes::ERROR_DIVIDE_BY_ZERO;
//!
//! let debug = DebugInfo::builder()
//!     .add_file(0x00, "stats.sp")
//!     .add_function(0x00, 0x40, "OnRoundEnd")
//!     .add_function(0x40, 0x80, "Ratio")
//!     .add_line(0x10, 8)
//!     .add_line(0x48, 21)
//!     .build()
//!     .unwrap();
//!
//! let runtime = Runtime::new("stats.smx", NativeTable::new())
//!     .with_debug_info(debug)
//!     .with_context(FaultSnapshot::new(0x48, vec![0x14]));
//!
//! let frames: Vec<_> = runtime
//!     .trace(ERROR_DIVIDE_BY_ZERO, None, 0)
//!     .map(|f| (f.function, f.line))
//!     .collect();
//! assert_eq!(frames, vec![(Some("Ratio"), Some(21)), (Some("OnRoundEnd"), Some(8))]);
//! ```

/// Faultline runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod debug_info;
pub mod error_codes;
pub mod fault;
pub mod logging;
pub mod native;
pub mod report;
pub mod runtime;
pub mod trace;

pub use debug_info::{DebugInfo, DebugInfoBuilder, DebugInfoError, SymbolResolver};
pub use error_codes::{ErrorTable, StandardErrorTable};
pub use fault::{CodeAddr, FaultContext, FaultSnapshot, NativeFault};
pub use logging::{FaultEvent, FaultLogger, MemoryFaultLogger, NullFaultLogger, StderrFaultLogger};
pub use native::{NativeError, NativeRegistry, NativeTable};
pub use report::{ColorMode, FaultReport, FaultReporter, ReportFormatter, ReportOptions};
pub use runtime::{FaultHost, Runtime};
pub use trace::{CallFrameInfo, NativeFaultInfo, StackTraceWalker};
