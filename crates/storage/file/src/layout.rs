use std::num::NonZeroUsize;

/// Size of the ciphertext length prefix at the start of every page record.
pub const RECORD_PREFIX_SIZE: usize = 4;

/// Bytes reserved in every slot on top of the page size, for envelope expansion and the prefix.
pub const DEFAULT_SLOT_ALLOWANCE: usize = 500;

/// Geometry of the page records in a store file.
///
/// Every page occupies a fixed slot of `stride = page_size + slot_allowance` bytes, so page `n`
/// starts at `data_offset + n * stride` regardless of how large its ciphertext turned out to be.
/// The allowance is part of the file format: a file must always be reopened with the layout it
/// was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    page_size: usize,
    slot_allowance: usize,
}

impl PageLayout {
    pub fn new(page_size: NonZeroUsize, slot_allowance: usize) -> Self {
        Self {
            page_size: page_size.get(),
            slot_allowance,
        }
    }

    pub fn with_default_allowance(page_size: NonZeroUsize) -> Self {
        Self::new(page_size, DEFAULT_SLOT_ALLOWANCE)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn slot_allowance(&self) -> usize {
        self.slot_allowance
    }

    /// Physical bytes reserved per page.
    pub fn stride(&self) -> u64 {
        self.page_size as u64 + self.slot_allowance as u64
    }

    /// Largest ciphertext a slot can hold.
    pub fn record_capacity(&self) -> usize {
        (self.page_size + self.slot_allowance).saturating_sub(RECORD_PREFIX_SIZE)
    }

    /// File offset of the slot holding `page_number`, or `None` if it does not fit in a `u64`.
    pub fn slot_offset(&self, data_offset: u64, page_number: u64) -> Option<u64> {
        page_number
            .checked_mul(self.stride())?
            .checked_add(data_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(page_size: usize, allowance: usize) -> PageLayout {
        PageLayout::new(NonZeroUsize::new(page_size).unwrap(), allowance)
    }

    #[test]
    fn stride_includes_allowance() {
        let layout = PageLayout::with_default_allowance(NonZeroUsize::new(4096).unwrap());
        assert_eq!(layout.stride(), 4596);
        assert_eq!(layout.record_capacity(), 4592);
    }

    #[test]
    fn slot_offsets_are_evenly_spaced_after_data_offset() {
        let layout = layout(100, 60);
        assert_eq!(layout.slot_offset(12, 0), Some(12));
        assert_eq!(layout.slot_offset(12, 1), Some(172));
        assert_eq!(layout.slot_offset(12, 3), Some(492));
    }

    #[test]
    fn slot_offset_overflow_is_reported() {
        let layout = layout(4096, 500);
        assert_eq!(layout.slot_offset(12, u64::MAX), None);
    }
}
