use crate::api::PageFile;
use crate::errors::FileError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct Pages {
    pages: HashMap<u64, Box<[u8]>>,
    length: u64,
    reads: usize,
    writes: usize,
}

/// Plaintext page file held in memory.
///
/// Clones made with [`PageFile::clone_shared`] see the same pages. The number of physical page
/// reads and writes is counted, which lets callers verify how often the engine actually hits
/// storage.
#[derive(Debug)]
pub struct InMemoryPageFile {
    page_size: usize,
    inner: Arc<Mutex<Pages>>,
    closed: bool,
}

impl InMemoryPageFile {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            inner: Arc::new(Mutex::new(Pages::default())),
            closed: false,
        }
    }

    /// Number of `read_page` calls that reached storage.
    pub fn reads(&self) -> usize {
        self.lock().reads
    }

    /// Number of `write_page` calls that reached storage.
    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    /// Copy of the stored page, if it was ever written.
    pub fn stored_page(&self, page_number: u64) -> Option<Vec<u8>> {
        self.lock().pages.get(&page_number).map(|p| p.to_vec())
    }

    fn lock(&self) -> MutexGuard<'_, Pages> {
        self.inner
            .lock()
            .expect("InMemoryPageFile poisoned: another thread panicked while holding the lock")
    }

    fn check(&self, page_number: u64, actual: usize) -> Result<(), FileError> {
        if self.closed {
            return Err(FileError::Closed);
        }
        if actual != self.page_size {
            return Err(FileError::PageSizeMismatch {
                page_number,
                expected: self.page_size,
                actual,
            });
        }
        Ok(())
    }
}

impl PageFile for InMemoryPageFile {
    type Error = FileError;

    fn read_page(&self, page_number: u64, destination: &mut [u8]) -> Result<(), FileError> {
        self.check(page_number, destination.len())?;
        let mut inner = self.lock();
        inner.reads += 1;
        match inner.pages.get(&page_number) {
            Some(page) => destination.copy_from_slice(page),
            None => destination.fill(0),
        }
        Ok(())
    }

    fn write_page(
        &mut self,
        page_number: u64,
        page_data: &[u8],
        logical_length: u64,
    ) -> Result<(), FileError> {
        self.check(page_number, page_data.len())?;
        let mut inner = self.lock();
        inner.writes += 1;
        inner
            .pages
            .insert(page_number, page_data.to_vec().into_boxed_slice());
        inner.length = inner.length.max(logical_length);
        Ok(())
    }

    fn length(&self) -> u64 {
        self.lock().length
    }

    fn clone_shared(&self) -> Self {
        Self {
            page_size: self.page_size,
            inner: Arc::clone(&self.inner),
            closed: self.closed,
        }
    }

    fn close(&mut self) -> Result<(), FileError> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritten_page_is_zeroed() {
        let file = InMemoryPageFile::new(8);
        let mut destination = [0xFFu8; 8];

        file.read_page(4, &mut destination).unwrap();

        assert_eq!(destination, [0u8; 8]);
        assert_eq!(file.reads(), 1);
    }

    #[test]
    fn clones_share_pages_and_counters() {
        let mut file = InMemoryPageFile::new(4);
        let clone = file.clone_shared();

        file.write_page(0, &[1, 2, 3, 4], 3).unwrap();

        let mut destination = [0u8; 4];
        clone.read_page(0, &mut destination).unwrap();
        assert_eq!(destination, [1, 2, 3, 4]);
        assert_eq!(clone.length(), 3);
        assert_eq!(file.writes(), 1);
        assert_eq!(file.reads(), 1);
    }

    #[test]
    fn closed_file_rejects_io() {
        let mut file = InMemoryPageFile::new(4);
        file.close().unwrap();
        assert!(matches!(
            file.write_page(0, &[0; 4], 1),
            Err(FileError::Closed)
        ));
    }
}
