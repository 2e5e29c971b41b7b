//! Temperature register decoding for the DS28EA00 sensors on a string.

use core::fmt;

use crate::thermometer::{to_celsius, Temperature};

/// Register bits weighed by the controller firmware: bits 10..0.
const MAGNITUDE_MASK: u16 = 0x07FF;

/// MSB bits that survive packing.
pub const MSB_PACKED_MASK: u8 = 0x0F;

/// Bit 11 of the register as seen in the MSB
const SIGN_BIT_12: u8 = 0x08;

/// How a raw register is turned into a temperature.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeMode {
    /// Bit-exact controller behaviour.
    ///
    /// Bits 15..11 are skipped and bits 10..0 are summed with weights 2^6 down to 2^-4.
    /// The sign bit is never applied, so sub-zero readings decode to large positive
    /// values (e.g. -0.5 °C reads as 127.5).
    #[default]
    Reference,
    /// The register as a signed 16-bit value with 4 fractional bits, per the datasheet.
    TwosComplement,
}

/// The 2-byte temperature register of one sensor, in bus order.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawReading {
    lsb: u8,
    msb: u8,
}

impl RawReading {
    #[inline]
    pub const fn new(lsb: u8, msb: u8) -> Self {
        Self { lsb, msb }
    }

    #[inline]
    pub const fn from_le_bytes(bytes: [u8; 2]) -> Self {
        Self::new(bytes[0], bytes[1])
    }

    #[inline]
    pub const fn to_le_bytes(self) -> [u8; 2] {
        [self.lsb, self.msb]
    }

    #[inline]
    pub const fn lsb(self) -> u8 {
        self.lsb
    }

    #[inline]
    pub const fn msb(self) -> u8 {
        self.msb
    }

    /// The register as a 16-bit value
    #[inline]
    pub const fn bits(self) -> u16 {
        u16::from_le_bytes([self.lsb, self.msb])
    }

    /// Clears the MSB's high nibble, leaving only what a packed block carries.
    #[inline]
    #[must_use]
    pub const fn masked_to_12_bits(self) -> Self {
        Self::new(self.lsb, self.msb & MSB_PACKED_MASK)
    }

    /// Copies bit 11 into the MSB's high nibble.
    ///
    /// Undoes the loss of sign extension in a reading recovered from a packed block.
    #[inline]
    #[must_use]
    pub const fn sign_extended_from_12_bits(self) -> Self {
        if self.msb & SIGN_BIT_12 == 0 {
            self.masked_to_12_bits()
        } else {
            Self::new(self.lsb, self.msb | !MSB_PACKED_MASK)
        }
    }

    /// Decodes the register into a fixed point temperature.
    pub fn temperature(self, mode: DecodeMode) -> Temperature {
        let bits = match mode {
            DecodeMode::Reference => i32::from(self.bits() & MAGNITUDE_MASK),
            DecodeMode::TwosComplement => i32::from(i16::from_le_bytes(self.to_le_bytes())),
        };
        Temperature::from_bits(bits)
    }

    /// Decodes the register into degrees Celsius.
    #[inline]
    pub fn celsius(self, mode: DecodeMode) -> f32 {
        to_celsius(self.temperature(mode))
    }
}

impl From<[u8; 2]> for RawReading {
    fn from(bytes: [u8; 2]) -> Self {
        Self::from_le_bytes(bytes)
    }
}

impl From<RawReading> for [u8; 2] {
    fn from(reading: RawReading) -> Self {
        reading.to_le_bytes()
    }
}

impl fmt::Debug for RawReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RawReading({:04X})", self.bits())
    }
}

/// Decodes a register pair the way the controller firmware does.
///
/// Total over all inputs. See [`DecodeMode::Reference`] for the lack of sign handling.
#[inline]
pub fn decode(lsb: u8, msb: u8) -> f32 {
    decode_with(lsb, msb, DecodeMode::Reference)
}

/// Decodes a register pair with an explicit [`DecodeMode`].
#[inline]
pub fn decode_with(lsb: u8, msb: u8, mode: DecodeMode) -> f32 {
    RawReading::new(lsb, msb).celsius(mode)
}
