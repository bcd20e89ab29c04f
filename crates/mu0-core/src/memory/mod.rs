//! Sparse data memory.
//!
//! Only cells that were initialized by `INI` or written by `STORE` exist.
//! Reading any other cell is a fault, never an implicit zero.

use std::collections::BTreeMap;

use crate::{Address, FaultCode, Value};

/// Sparse map from 12-bit address to signed value, ordered by address.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Memory {
    cells: BTreeMap<Address, Value>,
}

impl Memory {
    /// Creates an empty memory image.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cells: BTreeMap::new(),
        }
    }

    /// Returns the value stored at `address`, if the cell exists.
    #[must_use]
    pub fn get(&self, address: Address) -> Option<Value> {
        self.cells.get(&address).copied()
    }

    /// Reads a cell that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`FaultCode::InvalidMemoryAccess`] when the cell was never
    /// initialized or written.
    pub fn read(&self, address: Address) -> Result<Value, FaultCode> {
        self.get(address).ok_or(FaultCode::InvalidMemoryAccess)
    }

    /// Writes a cell, creating it when absent. Returns the previous value.
    pub fn write(&mut self, address: Address, value: Value) -> Option<Value> {
        self.cells.insert(address, value)
    }

    /// Returns `true` when the cell exists.
    #[must_use]
    pub fn contains(&self, address: Address) -> bool {
        self.cells.contains_key(&address)
    }

    /// Number of populated cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` when no cell is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Populated cells in ascending address order.
    pub fn iter(&self) -> impl Iterator<Item = (Address, Value)> + '_ {
        self.cells.iter().map(|(address, value)| (*address, *value))
    }
}

impl FromIterator<(Address, Value)> for Memory {
    fn from_iter<I: IntoIterator<Item = (Address, Value)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl Extend<(Address, Value)> for Memory {
    fn extend<I: IntoIterator<Item = (Address, Value)>>(&mut self, iter: I) {
        self.cells.extend(iter);
    }
}
