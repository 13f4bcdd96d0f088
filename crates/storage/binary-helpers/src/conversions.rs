use thiserror::Error;

/// Checked narrowing of `usize` values before they are stored in fixed-width fields.
pub trait UsizeConversion {
    fn to_u32(self) -> Result<u32, ConversionError>;
}

impl UsizeConversion for usize {
    fn to_u32(self) -> Result<u32, ConversionError> {
        u32::try_from(self).map_err(|_| ConversionError::Overflow)
    }
}

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Value exceeds maximum for target type")]
    Overflow,
}
