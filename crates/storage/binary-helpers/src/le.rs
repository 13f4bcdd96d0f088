use crate::bin_error::BinaryError;
use paste::paste;

pub trait LittleEndianInteger: Sized + Copy {
    const SIZE: usize;

    /// Convert `bytes` to the target integer type. `bytes` must be exactly `Self::SIZE` long.
    fn from_le(bytes: &[u8]) -> Result<Self, BinaryError>;

    /// Write `Self` to `target`, which must be exactly `Self::SIZE` long.
    fn to_le(self, target: &mut [u8]) -> Result<(), BinaryError>;
}

/// Implements `LittleEndianInteger` for `$t` and generates the `read_$t` / `write_$t` shorthands.
macro_rules! impl_little_endian_integer {
    ($t:ident) => {
        impl LittleEndianInteger for $t {
            const SIZE: usize = std::mem::size_of::<$t>();

            fn from_le(bytes: &[u8]) -> Result<Self, BinaryError> {
                if bytes.len() != Self::SIZE {
                    return Err(BinaryError::RangeOutOfBounds {
                        expected: Self::SIZE,
                        from_offset: 0,
                        available: bytes.len(),
                    });
                }

                Ok(<$t>::from_le_bytes(bytes.try_into()?))
            }

            fn to_le(self, target: &mut [u8]) -> Result<(), BinaryError> {
                let self_bytes = &self.to_le_bytes();

                if self_bytes.len() != target.len() {
                    return Err(BinaryError::WriteErrorSliceSizeMismatch {
                        src: self_bytes.len(),
                        target: target.len(),
                    });
                }

                target.copy_from_slice(self_bytes);
                Ok(())
            }
        }

        paste! {
            #[doc = "Reads a little-endian `" $t "` from `bytes` at `start_offset`."]
            pub fn [<read_ $t>](bytes: &[u8], start_offset: usize) -> Result<$t, BinaryError> {
                read_le::<$t>(bytes, start_offset)
            }

            #[doc = "Writes `value` as a little-endian `" $t "` into `bytes` at `start_offset`."]
            pub fn [<write_ $t>](bytes: &mut [u8], start_offset: usize, value: $t) -> Result<(), BinaryError> {
                write_le::<$t>(bytes, start_offset, value)
            }
        }
    };
}

impl_little_endian_integer!(u32);
impl_little_endian_integer!(u64);

/// Reads a little-endian integer from the `bytes` array, starting at `start_offset`.
pub fn read_le<T: LittleEndianInteger>(bytes: &[u8], start_offset: usize) -> Result<T, BinaryError> {
    let Some(slice) = start_offset
        .checked_add(T::SIZE)
        .and_then(|end| bytes.get(start_offset..end))
    else {
        return Err(BinaryError::RangeOutOfBounds {
            expected: T::SIZE,
            from_offset: start_offset,
            available: bytes.len(),
        });
    };

    T::from_le(slice)
}

/// Converts the provided `value` to bytes and writes them at `start_offset` in the `bytes` array.
pub fn write_le<T: LittleEndianInteger>(
    bytes: &mut [u8],
    start_offset: usize,
    value: T,
) -> Result<(), BinaryError> {
    let available = bytes.len();
    let Some(slice) = start_offset
        .checked_add(T::SIZE)
        .and_then(|end| bytes.get_mut(start_offset..end))
    else {
        return Err(BinaryError::RangeOutOfBounds {
            expected: T::SIZE,
            from_offset: start_offset,
            available,
        });
    };

    value.to_le(slice)
}
