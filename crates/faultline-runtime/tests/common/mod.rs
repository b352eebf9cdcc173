//! Shared fixtures for trace and report tests
#![allow(dead_code)]

use faultline_runtime::{
    CodeAddr, DebugInfo, FaultContext, FaultHost, FaultSnapshot, NativeRegistry, NativeTable,
    Runtime, SymbolResolver,
};

pub const CIP: CodeAddr = 0xf0;
pub const A0: CodeAddr = 0xa0;
pub const A1: CodeAddr = 0xa1;
pub const A2: CodeAddr = 0xa2;
pub const A3: CodeAddr = 0xa3;
pub const A4: CodeAddr = 0xa4;

/// Five recorded return addresses, A4 most recent
pub fn five_deep() -> FaultSnapshot {
    FaultSnapshot::new(CIP, vec![A0, A1, A2, A3, A4])
}

/// A runtime over `snapshot` without debug symbols
pub fn bare_runtime(snapshot: FaultSnapshot) -> Runtime {
    Runtime::new("fixture.smx", NativeTable::new()).with_context(snapshot)
}

/// Debug info covering every fixture address with its own function and line
pub fn full_debug_info() -> DebugInfo {
    DebugInfo::builder()
        .add_file(0x00, "fixture.sp")
        .add_function(0xa0, 0xa1, "Main")
        .add_function(0xa1, 0xa2, "Dispatch")
        .add_function(0xa2, 0xa3, "HandleEvent")
        .add_function(0xa3, 0xa4, "Notify")
        .add_function(0xa4, 0xa5, "OnFrame")
        .add_function(0xf0, 0xf1, "Divide")
        .add_line(0xa0, 1)
        .add_line(0xa1, 2)
        .add_line(0xa2, 3)
        .add_line(0xa3, 4)
        .add_line(0xa4, 5)
        .add_line(0xf0, 99)
        .build()
        .expect("fixture debug info is valid")
}

/// A resolver that knows function names and nothing else
pub struct FunctionsOnly;

impl SymbolResolver for FunctionsOnly {
    fn lookup_file(&self, _addr: CodeAddr) -> Option<&str> {
        None
    }

    fn lookup_function(&self, addr: CodeAddr) -> Option<&str> {
        match addr {
            A4 => Some("OnFrame"),
            CIP => Some("Divide"),
            _ => None,
        }
    }

    fn lookup_line(&self, _addr: CodeAddr) -> Option<u32> {
        None
    }
}

/// A host assembled from arbitrary collaborators
pub struct TestHost<R: SymbolResolver + 'static> {
    pub context: FaultSnapshot,
    pub resolver: Option<R>,
    pub natives: NativeTable,
}

impl<R: SymbolResolver + 'static> FaultHost for TestHost<R> {
    fn fault_context(&self) -> &dyn FaultContext {
        &self.context
    }

    fn symbol_resolver(&self) -> Option<&dyn SymbolResolver> {
        self.resolver.as_ref().map(|r| r as &dyn SymbolResolver)
    }

    fn natives(&self) -> &dyn NativeRegistry {
        &self.natives
    }
}
