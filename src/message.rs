//! Temperature section of the satellite message.
//!
//! ```text
//! | air (2, LSB first) | top string packed (120) | bottom string packed (120) |
//! ```

use crate::{
    ds28ea00::{DecodeMode, RawReading},
    packing::{self, InvalidLengthError, PackedBlock},
    thermometer::to_celsius,
    STRING_PACKED_LEN, STRING_SENSORS,
};

/// Encoded size of a [`Message`]
pub const MESSAGE_LEN: usize = packing::READING_LEN + 2 * STRING_PACKED_LEN;

static_assertions::const_assert_eq!(MESSAGE_LEN, 242);

/// Air temperature plus both strings, packed
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Message {
    /// Air sensor register, sent unpacked
    pub air: RawReading,
    pub top: [u8; STRING_PACKED_LEN],
    pub bottom: [u8; STRING_PACKED_LEN],
}

impl Message {
    /// Builds a message from raw string buffers of [`STRING_SENSORS`] readings each.
    pub fn from_raw(air: RawReading, top: &[u8], bottom: &[u8]) -> packing::Result<Self> {
        let mut message = Self {
            air,
            top: [0; STRING_PACKED_LEN],
            bottom: [0; STRING_PACKED_LEN],
        };
        packing::pack(top, STRING_SENSORS, &mut message.top)?;
        packing::pack(bottom, STRING_SENSORS, &mut message.bottom)?;
        Ok(message)
    }

    pub fn to_bytes(&self) -> [u8; MESSAGE_LEN] {
        let mut out = [0u8; MESSAGE_LEN];
        let (air, strings) = out.split_at_mut(packing::READING_LEN);
        let (top, bottom) = strings.split_at_mut(STRING_PACKED_LEN);
        air.copy_from_slice(&self.air.to_le_bytes());
        top.copy_from_slice(&self.top);
        bottom.copy_from_slice(&self.bottom);
        out
    }

    /// Writes the message to the start of `out`, returning the bytes written.
    pub fn encode(&self, out: &mut [u8]) -> packing::Result<usize> {
        let actual = out.len();
        let dst = out
            .get_mut(..MESSAGE_LEN)
            .ok_or(InvalidLengthError::OutputTooShort {
                required: MESSAGE_LEN,
                actual,
            })?;
        dst.copy_from_slice(&self.to_bytes());
        Ok(MESSAGE_LEN)
    }

    /// Reads a message from the start of `bytes`. Trailing bytes are ignored.
    pub fn decode(bytes: &[u8]) -> packing::Result<Self> {
        if bytes.len() < MESSAGE_LEN {
            return Err(InvalidLengthError::InputTooShort {
                required: MESSAGE_LEN,
                actual: bytes.len(),
            });
        }

        let (air, strings) = bytes.split_at(packing::READING_LEN);
        let mut message = Self {
            air: RawReading::new(air[0], air[1]),
            top: [0; STRING_PACKED_LEN],
            bottom: [0; STRING_PACKED_LEN],
        };
        message.top.copy_from_slice(&strings[..STRING_PACKED_LEN]);
        message
            .bottom
            .copy_from_slice(&strings[STRING_PACKED_LEN..2 * STRING_PACKED_LEN]);
        Ok(message)
    }

    /// Air temperature. The register is a signed count of sixteenths.
    pub fn air_celsius(&self) -> f32 {
        to_celsius(self.air.temperature(DecodeMode::TwosComplement))
    }

    /// Top string readings, low 12 bits only
    pub fn top_readings(&self) -> impl Iterator<Item = RawReading> + '_ {
        readings(&self.top)
    }

    /// Bottom string readings in transmitted order, low 12 bits only
    pub fn bottom_readings(&self) -> impl DoubleEndedIterator<Item = RawReading> + '_ {
        readings(&self.bottom)
    }

    /// Top string temperatures, with the sign restored from bit 11
    pub fn top_temperatures(&self, mode: DecodeMode) -> impl Iterator<Item = f32> + '_ {
        self.top_readings().map(move |r| r.sign_extended_from_12_bits().celsius(mode))
    }

    /// Bottom string temperatures, with the sign restored from bit 11.
    ///
    /// The bottom string is wired from its far end, so this yields the last sensor in the
    /// packed data first.
    pub fn bottom_temperatures(&self, mode: DecodeMode) -> impl Iterator<Item = f32> + '_ {
        self.bottom_readings()
            .rev()
            .map(move |r| r.sign_extended_from_12_bits().celsius(mode))
    }
}

fn readings(packed: &[u8]) -> impl DoubleEndedIterator<Item = RawReading> + '_ {
    packed
        .chunks_exact(packing::BLOCK_LEN)
        .flat_map(|block| PackedBlock([block[0], block[1], block[2]]).readings())
}
