//! Temperature value type

use fixed::types::I28F4;

/// I28F4 is a fixed point number with 4 fractional bits and 28 integer bits.
/// This gives us a precision of 0.0625 degrees Celsius & a range of (-2^27, 2^27 - 0.0625),
/// wide enough for any 16-bit register with 4 fractional bits.
pub type Temperature = I28F4;

/// Converts a temperature to `f32` degrees Celsius.
///
/// Every value a 16-bit register can produce is exactly representable.
#[inline]
pub fn to_celsius(temp: Temperature) -> f32 {
    temp.to_num::<f32>()
}
