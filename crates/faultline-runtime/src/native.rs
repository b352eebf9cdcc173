//! Native function registry
//!
//! Scripts call host functions ("natives") by index. When a native fails, the
//! interpreter records that index in the fault context; the registry turns it
//! back into a name for the fault report.

use thiserror::Error;

/// Index → native name lookup
pub trait NativeRegistry {
    /// Display name of native `index`, or `None` if no such native exists
    fn native_name(&self, index: u32) -> Option<&str>;
}

/// Errors raised while registering natives
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NativeError {
    #[error("native '{name}' is already registered at index {index}")]
    Duplicate { name: String, index: u32 },

    #[error("native name must not be empty")]
    EmptyName,
}

/// Natives in registration order; a native's index is its position.
///
/// ```
/// use faultline_runtime::native::{NativeRegistry, NativeTable};
///
/// let mut natives = NativeTable::new();
/// let idx = natives.register("PrintToServer").unwrap();
/// assert_eq!(natives.native_name(idx), Some("PrintToServer"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NativeTable {
    names: Vec<String>,
}

impl NativeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from names in index order
    pub fn from_names<I, S>(names: I) -> Result<Self, NativeError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new();
        for name in names {
            table.register(name)?;
        }
        Ok(table)
    }

    /// Append a native and return its index
    pub fn register(&mut self, name: impl Into<String>) -> Result<u32, NativeError> {
        let name = name.into();
        if name.is_empty() {
            return Err(NativeError::EmptyName);
        }
        if let Some(index) = self.index_of(&name) {
            return Err(NativeError::Duplicate { name, index });
        }
        self.names.push(name);
        Ok((self.names.len() - 1) as u32)
    }

    /// Index of the native called `name`
    pub fn index_of(&self, name: &str) -> Option<u32> {
        self.names.iter().position(|n| n == name).map(|i| i as u32)
    }

    pub fn get(&self, index: u32) -> Option<&str> {
        self.names.get(index as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl NativeRegistry for NativeTable {
    fn native_name(&self, index: u32) -> Option<&str> {
        self.get(index)
    }
}
