//! Non-volatile parameter store seam.
//!
//! Mirrors a flash-emulated EEPROM: 16-bit virtual addresses mapping to
//! 32-bit values.

use heapless::FnvIndexMap;

use crate::error::StoreError;

/// Virtual address of the move frequency.
pub const KEY_FREQ: u16 = 0x0001;

/// Virtual address of the current threshold (i16 bit pattern).
pub const KEY_THRESHOLD: u16 = 0x0002;

/// Virtual address of the STATUS debug level.
pub const KEY_DEBUG_LEVEL: u16 = 0x0003;

/// Key/value storage for persisted parameters.
pub trait ParameterStore {
    /// Read a value; `Ok(None)` when the address was never written.
    fn read(&mut self, key: u16) -> Result<Option<u32>, StoreError>;

    /// Write a value.
    fn write(&mut self, key: u16, value: u32) -> Result<(), StoreError>;
}

impl<S: ParameterStore + ?Sized> ParameterStore for &mut S {
    fn read(&mut self, key: u16) -> Result<Option<u32>, StoreError> {
        (**self).read(key)
    }

    fn write(&mut self, key: u16, value: u32) -> Result<(), StoreError> {
        (**self).write(key, value)
    }
}

/// RAM-backed store, for tests and boards without flash emulation.
#[derive(Debug, Default)]
pub struct MemoryStore<const N: usize = 8> {
    values: FnvIndexMap<u16, u32, N>,
}

impl<const N: usize> MemoryStore<N> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            values: FnvIndexMap::new(),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<const N: usize> ParameterStore for MemoryStore<N> {
    fn read(&mut self, key: u16) -> Result<Option<u32>, StoreError> {
        Ok(self.values.get(&key).copied())
    }

    fn write(&mut self, key: u16, value: u32) -> Result<(), StoreError> {
        self.values
            .insert(key, value)
            .map(|_| ())
            .map_err(|_| StoreError::Full)
    }
}
