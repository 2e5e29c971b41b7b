use crate::packing::InvalidLengthError;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E, P> {
    /// An I2C transfer with the controller failed
    I2c(E),

    /// The power enable pin could not be driven
    Pin(P),

    /// A fetched string could not be packed
    Packing(InvalidLengthError),
}

impl<E, P> Error<E, P> {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::I2c(_) => "I2C error",
            Self::Pin(_) => "Pin error",
            Self::Packing(e) => e.as_str(),
        }
    }
}

impl<E, P> From<InvalidLengthError> for Error<E, P> {
    fn from(value: InvalidLengthError) -> Self {
        Self::Packing(value)
    }
}
