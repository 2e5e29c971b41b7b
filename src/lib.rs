//! Codec and driver for the SIMB3 one-wire temperature-string controller.
//!
//! The controller sits on an I²C bus and polls two strings of DS28EA00 thermometers plus
//! an air sensor. Each sensor hands back a 2-byte register (LSB, MSB). This crate decodes
//! those registers into Celsius, packs a string's readings at 12 bits each for the
//! satellite uplink, unpacks them again, and issues the controller's commands.
//!
//! ```
//! use simb3_tempstring::{decode, pack, unpack};
//!
//! assert_eq!(decode(0xA2, 0x00), 10.125);
//!
//! let mut packed = [0u8; 3];
//! pack(&[0x12, 0x34, 0x56, 0x78], 2, &mut packed).unwrap();
//! assert_eq!(packed, [0x12, 0x48, 0x56]);
//!
//! let mut raw = [0u8; 4];
//! unpack(&packed, &mut raw).unwrap();
//! assert_eq!(raw, [0x12, 0x04, 0x56, 0x08]);
//! ```
#![cfg_attr(not(test), no_std)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

#[macro_use]
mod fmt;

pub mod controller;
pub mod ds28ea00;
pub mod message;
pub mod packing;
pub mod thermometer;

pub use self::{
    ds28ea00::{decode, decode_with, DecodeMode, RawReading},
    message::Message,
    packing::{pack, unpack, InvalidLengthError, PackedBlock},
    thermometer::Temperature,
};

/// Number of DS28EA00 sensors on one temperature string
pub const STRING_SENSORS: usize = 80;

/// Size of one string's raw registers as fetched from the controller
pub const STRING_RAW_LEN: usize = STRING_SENSORS * packing::READING_LEN;

/// Size of one string once packed for transmission
pub const STRING_PACKED_LEN: usize = packing::packed_len(STRING_SENSORS);

static_assertions::const_assert_eq!(STRING_SENSORS % packing::READINGS_PER_BLOCK, 0);
static_assertions::const_assert_eq!(STRING_PACKED_LEN, 120);
