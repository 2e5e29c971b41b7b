//! 12-bit packing of raw readings for transmission.
//!
//! Every two readings (4 bytes) become one 3-byte block:
//!
//! ```text
//! [LSB1, MSB1, LSB2, MSB2] -> [LSB1, (MSB1 & 0x0F) << 4 | (MSB2 & 0x0F), LSB2]
//! ```
//!
//! The high nibble of each MSB is dropped, so unpacking only restores the low 12 bits.

mod error;

use heapless::Vec;

pub use self::error::*;
use crate::ds28ea00::{RawReading, MSB_PACKED_MASK};

pub type Result<T> = core::result::Result<T, InvalidLengthError>;

/// Bytes per raw reading
pub const READING_LEN: usize = 2;
/// Bytes per packed block
pub const BLOCK_LEN: usize = 3;
/// Readings per packed block
pub const READINGS_PER_BLOCK: usize = 2;

const GROUP_LEN: usize = READING_LEN * READINGS_PER_BLOCK;

/// Packed size of `reading_count` readings. `reading_count` must be even.
#[inline]
pub const fn packed_len(reading_count: usize) -> usize {
    reading_count / READINGS_PER_BLOCK * BLOCK_LEN
}

/// Raw size, in bytes, of `packed_len` bytes of whole blocks.
#[inline]
pub const fn unpacked_len(packed_len: usize) -> usize {
    packed_len / BLOCK_LEN * GROUP_LEN
}

/// Two readings' low 12 bits in 3 bytes
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PackedBlock(pub [u8; BLOCK_LEN]);

impl PackedBlock {
    pub const fn from_readings(first: RawReading, second: RawReading) -> Self {
        Self([
            first.lsb(),
            ((first.msb() & MSB_PACKED_MASK) << 4) | (second.msb() & MSB_PACKED_MASK),
            second.lsb(),
        ])
    }

    /// Restores both readings, with the MSB high nibbles zeroed.
    pub const fn readings(self) -> [RawReading; READINGS_PER_BLOCK] {
        let [lsb1, nibbles, lsb2] = self.0;
        [
            RawReading::new(lsb1, nibbles >> 4),
            RawReading::new(lsb2, nibbles & MSB_PACKED_MASK),
        ]
    }

    #[inline]
    pub const fn to_bytes(self) -> [u8; BLOCK_LEN] {
        self.0
    }
}

impl From<[u8; BLOCK_LEN]> for PackedBlock {
    fn from(bytes: [u8; BLOCK_LEN]) -> Self {
        Self(bytes)
    }
}

fn check_reading_count(reading_count: usize) -> Result<()> {
    if reading_count % READINGS_PER_BLOCK == 0 {
        Ok(())
    } else {
        Err(InvalidLengthError::OddReadingCount(reading_count))
    }
}

fn check_block_aligned(packed_len: usize) -> Result<()> {
    if packed_len % BLOCK_LEN == 0 {
        Ok(())
    } else {
        Err(InvalidLengthError::NotBlockAligned(packed_len))
    }
}

const fn check_output(required: usize, actual: usize) -> Result<()> {
    if actual < required {
        Err(InvalidLengthError::OutputTooShort { required, actual })
    } else {
        Ok(())
    }
}

/// Packs the first `reading_count` readings of `raw` into `out`.
///
/// Returns the number of bytes written. Bytes of `raw` past the declared readings are
/// ignored, as are bytes of `out` past the packed length.
pub fn pack(raw: &[u8], reading_count: usize, out: &mut [u8]) -> Result<usize> {
    check_reading_count(reading_count)?;

    let input_len = reading_count.saturating_mul(READING_LEN);
    if raw.len() < input_len {
        return Err(InvalidLengthError::InputTooShort {
            required: input_len,
            actual: raw.len(),
        });
    }

    let output_len = packed_len(reading_count);
    check_output(output_len, out.len())?;

    for (group, block) in raw[..input_len]
        .chunks_exact(GROUP_LEN)
        .zip(out.chunks_exact_mut(BLOCK_LEN))
    {
        let packed = PackedBlock::from_readings(
            RawReading::new(group[0], group[1]),
            RawReading::new(group[2], group[3]),
        );
        block.copy_from_slice(&packed.to_bytes());
    }

    Ok(output_len)
}

/// Unpacks whole blocks from `packed` into raw readings in `out`.
///
/// Returns the number of bytes written. Each restored MSB has its high nibble zeroed.
pub fn unpack(packed: &[u8], out: &mut [u8]) -> Result<usize> {
    check_block_aligned(packed.len())?;

    let output_len = unpacked_len(packed.len());
    check_output(output_len, out.len())?;

    for (block, group) in packed
        .chunks_exact(BLOCK_LEN)
        .zip(out.chunks_exact_mut(GROUP_LEN))
    {
        let [first, second] = PackedBlock([block[0], block[1], block[2]]).readings();
        group[..READING_LEN].copy_from_slice(&first.to_le_bytes());
        group[READING_LEN..].copy_from_slice(&second.to_le_bytes());
    }

    Ok(output_len)
}

/// Packs readings into an owned buffer of at most `N` bytes.
pub fn pack_readings<const N: usize>(readings: &[RawReading]) -> Result<Vec<u8, N>> {
    check_reading_count(readings.len())?;
    check_output(packed_len(readings.len()), N)?;

    let mut out = Vec::new();
    for pair in readings.chunks_exact(READINGS_PER_BLOCK) {
        let block = PackedBlock::from_readings(pair[0], pair[1]);
        out.extend_from_slice(&block.to_bytes())
            .map_err(|()| InvalidLengthError::OutputTooShort {
                required: packed_len(readings.len()),
                actual: N,
            })?;
    }

    Ok(out)
}

/// Unpacks whole blocks into an owned buffer of at most `N` readings.
pub fn unpack_readings<const N: usize>(packed: &[u8]) -> Result<Vec<RawReading, N>> {
    check_block_aligned(packed.len())?;

    let required = packed.len() / BLOCK_LEN * READINGS_PER_BLOCK;
    check_output(required, N)?;

    Ok(packed
        .chunks_exact(BLOCK_LEN)
        .flat_map(|block| PackedBlock([block[0], block[1], block[2]]).readings())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic byte stream for exercising arbitrary register contents
    fn noise(seed: u32, len: usize) -> std::vec::Vec<u8> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                (state >> 16) as u8
            })
            .collect()
    }

    fn zero_high_nibbles(raw: &mut [u8]) {
        for msb in raw.iter_mut().skip(1).step_by(READING_LEN) {
            *msb &= MSB_PACKED_MASK;
        }
    }

    #[test]
    fn packs_one_block() {
        let mut out = [0u8; 3];
        assert_eq!(pack(&[0x12, 0x34, 0x56, 0x78], 2, &mut out), Ok(3));
        assert_eq!(out, [0x12, 0x48, 0x56]);
    }

    #[test]
    fn unpacks_one_block() {
        let mut out = [0u8; 4];
        assert_eq!(unpack(&[0x12, 0x48, 0x56], &mut out), Ok(4));
        assert_eq!(out, [0x12, 0x04, 0x56, 0x08]);
    }

    #[test]
    fn round_trip_restores_low_twelve_bits() {
        for seed in 0..16 {
            let raw = noise(seed, 160);
            let mut packed = [0u8; 120];
            let mut unpacked = [0u8; 160];

            assert_eq!(pack(&raw, 80, &mut packed), Ok(120));
            assert_eq!(unpack(&packed, &mut unpacked), Ok(160));

            let mut expected = raw.clone();
            zero_high_nibbles(&mut expected);
            assert_eq!(&unpacked[..], &expected[..]);
        }
    }

    #[test]
    fn round_trip_is_exact_for_twelve_bit_input() {
        let mut raw = noise(7, 40);
        zero_high_nibbles(&mut raw);

        let mut packed = [0u8; 30];
        let mut unpacked = [0u8; 40];
        pack(&raw, 20, &mut packed).unwrap();
        unpack(&packed, &mut unpacked).unwrap();
        assert_eq!(&unpacked[..], &raw[..]);
    }

    #[test]
    fn packed_length_is_three_quarters() {
        let raw = noise(3, 200);
        let mut out = [0u8; 150];
        for count in (0..=100).step_by(2) {
            assert_eq!(pack(&raw, count, &mut out), Ok(count / 2 * 3));
            assert_eq!(packed_len(count), count / 2 * 3);
        }
        assert_eq!(unpacked_len(120), 160);
    }

    #[test]
    fn rejects_odd_reading_count() {
        let mut out = [0xAAu8; 6];
        assert_eq!(
            pack(&[0u8; 6], 3, &mut out),
            Err(InvalidLengthError::OddReadingCount(3))
        );
        assert_eq!(out, [0xAA; 6]);
        assert_eq!(
            pack_readings::<6>(&[RawReading::default(); 3]),
            Err(InvalidLengthError::OddReadingCount(3))
        );
    }

    #[test]
    fn rejects_short_input() {
        let mut out = [0xAAu8; 6];
        assert_eq!(
            pack(&[0u8; 6], 4, &mut out),
            Err(InvalidLengthError::InputTooShort {
                required: 8,
                actual: 6
            })
        );
        assert_eq!(out, [0xAA; 6]);
    }

    #[test]
    fn rejects_short_output_without_writing() {
        let mut out = [0xAAu8; 5];
        assert_eq!(
            pack(&[0u8; 8], 4, &mut out),
            Err(InvalidLengthError::OutputTooShort {
                required: 6,
                actual: 5
            })
        );
        assert_eq!(out, [0xAA; 5]);

        let mut out = [0xAAu8; 7];
        assert_eq!(
            unpack(&[0u8; 6], &mut out),
            Err(InvalidLengthError::OutputTooShort {
                required: 8,
                actual: 7
            })
        );
        assert_eq!(out, [0xAA; 7]);
    }

    #[test]
    fn rejects_unaligned_packed_input() {
        let mut out = [0xAAu8; 8];
        for len in [1, 2, 4, 5, 7] {
            assert_eq!(
                unpack(&[0u8; 7][..len], &mut out),
                Err(InvalidLengthError::NotBlockAligned(len))
            );
        }
        assert_eq!(out, [0xAA; 8]);
        assert_eq!(
            unpack_readings::<8>(&[0u8; 4]),
            Err(InvalidLengthError::NotBlockAligned(4))
        );
    }

    #[test]
    fn empty_input_is_valid() {
        assert_eq!(pack(&[], 0, &mut []), Ok(0));
        assert_eq!(unpack(&[], &mut []), Ok(0));
    }

    #[test]
    fn ignores_bytes_past_declared_readings() {
        let mut out = [0u8; 3];
        assert_eq!(pack(&[0x12, 0x34, 0x56, 0x78, 0x9A], 2, &mut out), Ok(3));
        assert_eq!(out, [0x12, 0x48, 0x56]);
    }

    #[test]
    fn owned_buffers_match_slice_codec() {
        let raw = noise(11, 16);
        let readings: std::vec::Vec<RawReading> = raw
            .chunks_exact(READING_LEN)
            .map(|r| RawReading::new(r[0], r[1]))
            .collect();

        let packed = pack_readings::<12>(&readings).unwrap();
        let mut expected = [0u8; 12];
        pack(&raw, 8, &mut expected).unwrap();
        assert_eq!(&packed[..], &expected[..]);

        let restored = unpack_readings::<8>(&packed).unwrap();
        let masked: std::vec::Vec<RawReading> =
            readings.iter().map(|r| r.masked_to_12_bits()).collect();
        assert_eq!(&restored[..], &masked[..]);

        assert_eq!(
            pack_readings::<11>(&readings),
            Err(InvalidLengthError::OutputTooShort {
                required: 12,
                actual: 11
            })
        );
        assert_eq!(
            unpack_readings::<7>(&packed),
            Err(InvalidLengthError::OutputTooShort {
                required: 8,
                actual: 7
            })
        );
    }

    #[test]
    fn block_holds_both_readings() {
        let block =
            PackedBlock::from_readings(RawReading::new(0xA2, 0x00), RawReading::new(0x5E, 0xFF));
        assert_eq!(block.to_bytes(), [0xA2, 0x0F, 0x5E]);
        assert_eq!(
            block.readings(),
            [RawReading::new(0xA2, 0x00), RawReading::new(0x5E, 0x0F)]
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(InvalidLengthError::OddReadingCount(3).as_str(), "Odd reading count");
        assert_eq!(
            format!("{}", InvalidLengthError::NotBlockAligned(4)),
            "Packed length not a multiple of 3: 4"
        );
    }
}
