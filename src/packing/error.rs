use core::fmt;

/// A buffer handed to the packer or unpacker has the wrong size.
///
/// Raised before anything is written, so output buffers are left untouched.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvalidLengthError {
    /// Readings are packed two at a time, so the count must be even
    OddReadingCount(usize),

    /// The input holds fewer bytes than the declared reading count needs
    InputTooShort { required: usize, actual: usize },

    /// The output cannot hold the result. Counted in the output's element type.
    OutputTooShort { required: usize, actual: usize },

    /// Packed data must be whole 3-byte blocks
    NotBlockAligned(usize),
}

impl InvalidLengthError {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OddReadingCount(_) => "Odd reading count",
            Self::InputTooShort { .. } => "Input too short",
            Self::OutputTooShort { .. } => "Output too short",
            Self::NotBlockAligned(_) => "Packed length not a multiple of 3",
        }
    }
}

impl fmt::Display for InvalidLengthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::OddReadingCount(count) => write!(f, "{}: {count}", self.as_str()),
            Self::InputTooShort { required, actual } | Self::OutputTooShort { required, actual } => {
                write!(f, "{}: need {required}, got {actual}", self.as_str())
            }
            Self::NotBlockAligned(len) => write!(f, "{}: {len}", self.as_str()),
        }
    }
}
