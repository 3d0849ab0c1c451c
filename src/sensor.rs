//! INA236 current monitor over I2C.

use embedded_hal::i2c::{Error as _, I2c};

use crate::error::SensorError;

/// Default 7-bit address (A0 tied to GND).
pub const INA236_DEFAULT_ADDRESS: u8 = 0x40;

/// Register map.
pub mod register {
    /// Configuration.
    pub const CONFIG: u8 = 0x00;
    /// Shunt voltage.
    pub const SHUNT_VOLTAGE: u8 = 0x01;
    /// Bus voltage.
    pub const BUS_VOLTAGE: u8 = 0x02;
    /// Power.
    pub const POWER: u8 = 0x03;
    /// Current.
    pub const CURRENT: u8 = 0x04;
    /// Calibration.
    pub const CALIBRATION: u8 = 0x05;
}

/// Configuration word: continuous shunt and bus conversion.
pub const CONFIG_VALUE: u16 = 0x8127;

/// Current LSB of 0.25 uA, in nanoamps.
pub const CURRENT_LSB_NA: u32 = 250;

/// Shunt calibration factor used by the board.
pub const SHUNT_FACTOR: u32 = 5;

/// `0.00512 / (current_lsb * shunt)` with the constants above.
pub const CALIBRATION_VALUE: u16 = (5_120_000 / (CURRENT_LSB_NA * SHUNT_FACTOR)) as u16;

/// INA236 driver.
///
/// Owns the bus; use [`release`](Self::release) to get it back.
pub struct Ina236<I2C> {
    i2c: I2C,
    address: u8,
    initialized: bool,
}

impl<I2C: I2c> Ina236<I2C> {
    /// Create a driver at [`INA236_DEFAULT_ADDRESS`].
    pub fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, INA236_DEFAULT_ADDRESS)
    }

    /// Create a driver at a custom 7-bit address.
    pub fn with_address(i2c: I2C, address: u8) -> Self {
        Self {
            i2c,
            address,
            initialized: false,
        }
    }

    /// Write the configuration and calibration registers.
    pub fn init(&mut self) -> Result<(), SensorError> {
        self.initialized = false;
        self.write_register(register::CONFIG, CONFIG_VALUE)?;
        self.write_register(register::CALIBRATION, CALIBRATION_VALUE)?;
        self.initialized = true;
        debug!("ina236 ready at {:#x}", self.address);
        Ok(())
    }

    /// Whether `init` has succeeded.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Read the signed current register in LSB units.
    pub fn read_current_raw(&mut self) -> Result<i16, SensorError> {
        if !self.initialized {
            return Err(SensorError::NotInitialized);
        }
        let raw = self.read_register(register::CURRENT)?;
        Ok(raw as i16)
    }

    /// Take the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn write_register(&mut self, reg: u8, value: u16) -> Result<(), SensorError> {
        let [msb, lsb] = value.to_be_bytes();
        self.i2c
            .write(self.address, &[reg, msb, lsb])
            .map_err(|e| SensorError::Bus(e.kind()))
    }

    fn read_register(&mut self, reg: u8) -> Result<u16, SensorError> {
        let mut buffer = [0u8; 2];
        self.i2c
            .write_read(self.address, &[reg], &mut buffer)
            .map_err(|e| SensorError::Bus(e.kind()))?;
        Ok(u16::from_be_bytes(buffer))
    }
}

/// Source of raw current samples.
pub trait CurrentSensor {
    /// Read one sample.
    fn read_current(&mut self) -> Result<i16, SensorError>;
}

impl<I2C: I2c> CurrentSensor for Ina236<I2C> {
    fn read_current(&mut self) -> Result<i16, SensorError> {
        self.read_current_raw()
    }
}
