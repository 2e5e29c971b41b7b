//! Driver for the SIMB3 one-wire controller.
//!
//! The controller is an I2C peripheral that polls the sensor strings on its own one-wire
//! buses. A command stages a string's (or the air sensor's) registers, which are then read
//! back in chunks. The driver does no retries; bus failures are returned to the caller.

pub mod commands;
mod error;

use embedded_hal::{
    blocking::{
        delay::DelayMs,
        i2c::{Read, Write},
    },
    digital::v2::OutputPin,
};

pub use self::error::*;
use crate::{
    ds28ea00::RawReading, message::Message, packing, STRING_PACKED_LEN, STRING_RAW_LEN,
    STRING_SENSORS,
};

/// 7-bit I2C address the controller firmware listens on
pub const DEFAULT_ADDRESS: u8 = 11;

/// Largest read the controller serves in one request
pub const CHUNK_LEN: usize = 32;

static_assertions::const_assert_eq!(STRING_RAW_LEN % CHUNK_LEN, 0);

/// One of the two sensor strings on the controller
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TempString {
    Top,
    Bottom,
}

impl TempString {
    pub const fn command(self) -> u8 {
        match self {
            Self::Top => commands::READ_TOP_STRING,
            Self::Bottom => commands::READ_BOTTOM_STRING,
        }
    }
}

/// Bus address and reset timings of a controller
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// 7-bit I2C address
    pub address: u8,
    /// How long the power enable line is held low on reset
    pub power_off_ms: u32,
    /// How long the controller needs to boot once power is restored
    pub boot_ms: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            power_off_ms: 1_000,
            boot_ms: 6_000,
        }
    }
}

/// SIMB3 controller on an I2C bus, with its 5 V enable line
pub struct Controller<I2C, EN, D> {
    i2c: I2C,
    enable: EN,
    delay: D,
    config: Config,
}

impl<I2C, EN, D, E> Controller<I2C, EN, D>
where
    I2C: Write<Error = E> + Read<Error = E>,
    EN: OutputPin,
    D: DelayMs<u32>,
{
    /// Creates a driver with the default [`Config`]. The enable pin is left as is.
    pub fn new(i2c: I2C, enable: EN, delay: D) -> Self {
        Self::with_config(i2c, enable, delay, Config::default())
    }

    pub const fn with_config(i2c: I2C, enable: EN, delay: D, config: Config) -> Self {
        Self {
            i2c,
            enable,
            delay,
            config,
        }
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Gives back the bus, pin and delay
    pub fn release(self) -> (I2C, EN, D) {
        (self.i2c, self.enable, self.delay)
    }

    /// Power-cycles the controller
    ///
    /// Pulls the enable line low, restores it, and blocks until the controller has booted.
    pub fn reset(&mut self) -> Result<(), Error<E, EN::Error>> {
        debug!("resetting controller");

        self.enable.set_low().map_err(Error::Pin)?;
        self.delay.delay_ms(self.config.power_off_ms);

        self.enable.set_high().map_err(Error::Pin)?;
        self.delay.delay_ms(self.config.boot_ms);

        Ok(())
    }

    fn send_command(&mut self, command: u8) -> Result<(), Error<E, EN::Error>> {
        trace!("command {=u8}", command);
        self.i2c
            .write(self.config.address, &[command, 0])
            .map_err(Error::I2c)
    }

    /// Fetches the raw registers of every sensor on a string
    ///
    /// The buffer holds [`STRING_SENSORS`] readings, each as (LSB, MSB).
    pub fn read_string(
        &mut self,
        string: TempString,
    ) -> Result<[u8; STRING_RAW_LEN], Error<E, EN::Error>> {
        self.send_command(string.command())?;

        let mut buf = [0u8; STRING_RAW_LEN];
        for chunk in buf.chunks_mut(CHUNK_LEN) {
            self.i2c
                .read(self.config.address, chunk)
                .map_err(Error::I2c)?;
        }

        debug!("read {} string", string);
        Ok(buf)
    }

    /// Fetches a string and packs it for transmission
    pub fn read_packed_string(
        &mut self,
        string: TempString,
    ) -> Result<[u8; STRING_PACKED_LEN], Error<E, EN::Error>> {
        let raw = self.read_string(string)?;

        let mut packed = [0u8; STRING_PACKED_LEN];
        packing::pack(&raw, STRING_SENSORS, &mut packed)?;
        Ok(packed)
    }

    /// Fetches the air sensor's register
    pub fn read_air_temperature(&mut self) -> Result<RawReading, Error<E, EN::Error>> {
        self.send_command(commands::READ_AIR_TEMPERATURE)?;

        let mut buf = [0u8; packing::READING_LEN];
        self.i2c
            .read(self.config.address, &mut buf)
            .map_err(Error::I2c)?;

        let reading = RawReading::from_le_bytes(buf);
        debug!("air register {=u16:#x}", reading.bits());
        Ok(reading)
    }

    /// Fetches the air sensor and both strings as one message
    pub fn read_message(&mut self) -> Result<Message, Error<E, EN::Error>> {
        let air = self.read_air_temperature()?;
        let top = self.read_packed_string(TempString::Top)?;
        let bottom = self.read_packed_string(TempString::Bottom)?;
        Ok(Message { air, top, bottom })
    }
}
