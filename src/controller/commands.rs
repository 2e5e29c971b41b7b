//! Command codes understood by the controller. Each is sent as `[code, 0]`.

/// Poll the top (upper) string and stage its registers for reading
pub const READ_TOP_STRING: u8 = 0x01;
/// Poll the bottom (lower) string and stage its registers for reading
pub const READ_BOTTOM_STRING: u8 = 0x02;
/// Poll the air sensor and stage its register for reading
pub const READ_AIR_TEMPERATURE: u8 = 0x03;
