//! A disk based page file that seals every page with envelope encryption.
//!
//! # Physical layout
//!
//! ```text
//!   ┌────────────────────────────────────────────┐ 0
//!   │ FileHeader (marker, version, length)       │
//!   ├────────────────────────────────────────────┤ data_offset
//!   │ slot 0: [u32 len][ciphertext][padding]     │
//!   ├────────────────────────────────────────────┤ data_offset + stride
//!   │ slot 1: [u32 len][ciphertext][padding]     │
//!   ├────────────────────────────────────────────┤
//!   │ ...                                        │
//!   └────────────────────────────────────────────┘
//! ```
//!
//! A slot whose length prefix is zero, or that lies past the end of the file, was never written
//! and reads back as a zeroed page.
//!
//! # Shared handles
//!
//! [`EncryptedPageFile::clone_shared`] hands out a second instance over the same `Arc<File>`.
//! Physical I/O is positional, so clones never disturb each other's reads. A clone is a read
//! cursor: it rejects `write_page` with [`FileError::ReadOnly`] and always takes the logical length
//! from the header, so it sees growth written through the owner.

use crate::api::PageFile;
use crate::errors::{FileError, FormatError};
use crate::header::{DATA_OFFSET, FileHeader, HEADER_SIZE, LENGTH_OFFSET};
use crate::layout::{PageLayout, RECORD_PREFIX_SIZE};
use crate::positional_io::{read_full_at, write_all_at};
use binary_helpers::conversions::UsizeConversion;
use binary_helpers::le::{read_u32, read_u64, write_u32, write_u64};
use envelope::Envelope;
use std::fs;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// How a store file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// Existing file, pages can only be read. The envelope may lack a private key only if no page
    /// is ever read.
    Read,
    /// File is created if missing, pages can be read and written.
    ReadWrite,
}

/// Page file sealing each page with an [`Envelope`] before it reaches the disk.
#[derive(Debug)]
pub struct EncryptedPageFile<E: Envelope> {
    path: PathBuf,
    handle: Option<Arc<File>>,
    envelope: Arc<E>,
    layout: PageLayout,
    mode: OpenMode,
    version: u8,
    length_offset: u64,
    data_offset: u64,
    /// Length last written to (or confirmed against) the header by this instance.
    committed_length: Option<u64>,
    is_clone: bool,
}

impl<E: Envelope> EncryptedPageFile<E> {
    /// Definition
    /// Opens (or, in `ReadWrite` mode, creates) the store file at `path`.
    ///
    /// Params
    /// - `path`: location of the store file. Missing parent directories are created in
    ///   `ReadWrite` mode.
    /// - `mode`: read-only or read-write access.
    /// - `envelope`: cryptographic identity used to seal and open pages.
    /// - `layout`: page size and slot allowance. Must match the layout the file was written with.
    ///
    /// Return
    /// - The opened file, with its header either freshly written (new or too-short writable
    ///   files) or read and validated.
    /// - `FileError::Format` if the header is missing or its marker does not match.
    /// - `FileError::SlotTooSmall` if the slot allowance cannot hold the envelope overhead.
    pub fn open(
        path: impl Into<PathBuf>,
        mode: OpenMode,
        envelope: Arc<E>,
        layout: PageLayout,
    ) -> Result<Self, FileError> {
        let path = path.into();

        let required = envelope.overhead() + RECORD_PREFIX_SIZE;
        if layout.slot_allowance() < required {
            return Err(FileError::SlotTooSmall {
                slot_allowance: layout.slot_allowance(),
                required,
            });
        }

        let file = match mode {
            OpenMode::Read => OpenOptions::new().read(true).open(&path)?,
            OpenMode::ReadWrite => {
                Self::ensure_parent_dir(&path)?;
                OpenOptions::new()
                    .read(true)
                    .write(true)
                    .create(true)
                    .truncate(false)
                    .open(&path)?
            }
        };

        let physical_len = file.metadata()?.len();
        let (header, committed_length) =
            if mode == OpenMode::ReadWrite && physical_len < HEADER_SIZE as u64 {
                let header = FileHeader::new();
                write_all_at(&file, &header.encode()?, 0)?;
                debug!(path = %path.display(), "created store header");
                (header, Some(header.logical_length))
            } else {
                (FileHeader::read_from(&file)?, None)
            };

        debug!(
            path = %path.display(),
            ?mode,
            version = header.version,
            logical_length = header.logical_length,
            page_size = layout.page_size(),
            stride = layout.stride(),
            "opened encrypted page file"
        );

        Ok(Self {
            path,
            handle: Some(Arc::new(file)),
            envelope,
            layout,
            mode,
            version: header.version,
            length_offset: LENGTH_OFFSET as u64,
            data_offset: DATA_OFFSET,
            committed_length,
            is_clone: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn layout(&self) -> PageLayout {
        self.layout
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Format version found in (or written to) the header.
    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn is_clone(&self) -> bool {
        self.is_clone
    }

    fn handle(&self) -> Result<&Arc<File>, FileError> {
        self.handle.as_ref().ok_or(FileError::Closed)
    }

    fn slot_offset(&self, page_number: u64) -> Result<u64, FileError> {
        self.layout
            .slot_offset(self.data_offset, page_number)
            .ok_or(FileError::OffsetOverflow { page_number })
    }

    /// Pages are bound to their slot through the associated data.
    fn aad(page_number: u64) -> [u8; 8] {
        page_number.to_le_bytes()
    }

    fn check_page_size(&self, page_number: u64, actual: usize) -> Result<(), FileError> {
        if actual != self.layout.page_size() {
            return Err(FileError::PageSizeMismatch {
                page_number,
                expected: self.layout.page_size(),
                actual,
            });
        }
        Ok(())
    }

    fn read_header_length(&self) -> Result<u64, FileError> {
        let file = self.handle()?;
        let mut bytes = [0u8; 8];
        let read = read_full_at(file, &mut bytes, self.length_offset)?;
        if read < bytes.len() {
            return Err(FormatError::TruncatedHeader {
                actual: self.length_offset + read as u64,
            }
            .into());
        }
        Ok(read_u64(&bytes, 0)?)
    }

    fn write_header_length(&mut self, logical_length: u64) -> Result<(), FileError> {
        let mut bytes = [0u8; 8];
        write_u64(&mut bytes, 0, logical_length)?;
        write_all_at(self.handle()?, &bytes, self.length_offset)?;
        self.committed_length = Some(logical_length);
        debug!(path = %self.path.display(), logical_length, "header length updated");
        Ok(())
    }

    fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
            _ => Ok(()),
        }
    }
}

impl<E: Envelope> PageFile for EncryptedPageFile<E> {
    type Error = FileError;

    fn read_page(&self, page_number: u64, destination: &mut [u8]) -> Result<(), FileError> {
        self.check_page_size(page_number, destination.len())?;
        let file = self.handle()?;
        let slot = self.slot_offset(page_number)?;

        let mut prefix = [0u8; RECORD_PREFIX_SIZE];
        let read = read_full_at(file, &mut prefix, slot)?;
        if read == 0 {
            trace!(page_number, "slot past end of file, returning zeroed page");
            destination.fill(0);
            return Ok(());
        }

        let capacity = self.layout.record_capacity();
        if read < RECORD_PREFIX_SIZE {
            return Err(FileError::CorruptRecord {
                page_number,
                record_len: read,
                capacity,
            });
        }

        let record_len = read_u32(&prefix, 0)? as usize;
        if record_len == 0 {
            trace!(page_number, "slot never written, returning zeroed page");
            destination.fill(0);
            return Ok(());
        }
        if record_len > capacity {
            return Err(FileError::CorruptRecord {
                page_number,
                record_len,
                capacity,
            });
        }

        let mut ciphertext = vec![0u8; record_len];
        let read = read_full_at(file, &mut ciphertext, slot + RECORD_PREFIX_SIZE as u64)?;
        if read < record_len {
            return Err(FileError::CorruptRecord {
                page_number,
                record_len,
                capacity: read,
            });
        }

        let plaintext = self
            .envelope
            .open(&Self::aad(page_number), &ciphertext)
            .map_err(|source| FileError::Crypto {
                page_number,
                source,
            })?;
        self.check_page_size(page_number, plaintext.len())?;

        destination.copy_from_slice(&plaintext);
        trace!(page_number, record_len, "page read");
        Ok(())
    }

    fn write_page(
        &mut self,
        page_number: u64,
        page_data: &[u8],
        logical_length: u64,
    ) -> Result<(), FileError> {
        if self.mode == OpenMode::Read || self.is_clone {
            return Err(FileError::ReadOnly);
        }
        self.check_page_size(page_number, page_data.len())?;
        let slot = self.slot_offset(page_number)?;

        let ciphertext = self
            .envelope
            .seal(&Self::aad(page_number), page_data)
            .map_err(|source| FileError::Crypto {
                page_number,
                source,
            })?;

        let capacity = self.layout.record_capacity();
        if ciphertext.len() > capacity {
            return Err(FileError::SlotOverflow {
                page_number,
                ciphertext_len: ciphertext.len(),
                capacity,
            });
        }

        let mut record = vec![0u8; RECORD_PREFIX_SIZE + ciphertext.len()];
        write_u32(&mut record, 0, ciphertext.len().to_u32()?)?;
        record[RECORD_PREFIX_SIZE..].copy_from_slice(&ciphertext);
        write_all_at(self.handle()?, &record, slot)?;
        trace!(page_number, record_len = ciphertext.len(), "page written");

        let recorded = match self.committed_length {
            Some(length) => length,
            None => self.read_header_length()?,
        };
        if logical_length > recorded {
            self.write_header_length(logical_length)?;
        } else {
            self.committed_length = Some(recorded);
        }
        Ok(())
    }

    /// Cached committed length when known, otherwise the header field. A failed header read is
    /// reported as a length of 0.
    fn length(&self) -> u64 {
        if let Some(length) = self.committed_length {
            return length;
        }
        match self.read_header_length() {
            Ok(length) => length,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read logical length from header");
                0
            }
        }
    }

    fn clone_shared(&self) -> Self {
        Self {
            path: self.path.clone(),
            handle: self.handle.clone(),
            envelope: Arc::clone(&self.envelope),
            layout: self.layout,
            mode: self.mode,
            version: self.version,
            length_offset: self.length_offset,
            data_offset: self.data_offset,
            committed_length: None,
            is_clone: true,
        }
    }

    fn close(&mut self) -> Result<(), FileError> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };

        if self.is_clone {
            trace!(path = %self.path.display(), "clone released shared handle");
            return Ok(());
        }

        if self.mode == OpenMode::ReadWrite {
            handle.sync_data()?;
        }
        debug!(path = %self.path.display(), "closed encrypted page file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::MARKER;
    use envelope::{Certificate, CryptoError, SEAL_OVERHEAD};
    use std::num::NonZeroUsize;
    use tempfile::TempDir;

    const PAGE_SIZE: usize = 64;

    fn layout() -> PageLayout {
        PageLayout::new(NonZeroUsize::new(PAGE_SIZE).unwrap(), 60)
    }

    fn open(
        path: &Path,
        mode: OpenMode,
        cert: &Arc<Certificate>,
    ) -> Result<EncryptedPageFile<Certificate>, FileError> {
        EncryptedPageFile::open(path, mode, Arc::clone(cert), layout())
    }

    fn setup() -> (TempDir, PathBuf, Arc<Certificate>) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index").join("segment.pvx");
        (dir, path, Arc::new(Certificate::generate()))
    }

    /// Envelope that leaves data in the clear but pads it by more than it admits to.
    #[derive(Debug)]
    struct UnderstatedEnvelope;

    impl Envelope for UnderstatedEnvelope {
        fn seal(&self, _: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
            let mut out = plaintext.to_vec();
            out.extend_from_slice(&[0u8; 200]);
            Ok(out)
        }

        fn open(&self, _: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
            Ok(ciphertext[..ciphertext.len() - 200].to_vec())
        }

        fn overhead(&self) -> usize {
            8
        }
    }

    #[test]
    fn open_read_write_creates_file_and_header() {
        // Arrange
        let (_dir, path, cert) = setup();

        // Act
        let file = open(&path, OpenMode::ReadWrite, &cert).unwrap();

        // Assert
        let on_disk = fs::read(&path).unwrap();
        assert_eq!(on_disk.len(), HEADER_SIZE);
        assert_eq!(&on_disk[..3], &MARKER);
        assert_eq!(file.length(), 0);
        assert_eq!(file.version(), crate::header::FORMAT_VERSION);
        assert!(!file.is_clone());
    }

    #[test]
    fn open_read_only_missing_file_is_io_error() {
        let (_dir, path, cert) = setup();
        let result = open(&path, OpenMode::Read, &cert);
        assert!(matches!(result, Err(FileError::Io(_))));
    }

    #[test]
    fn open_read_only_empty_file_is_format_error() {
        let (_dir, path, cert) = setup();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"").unwrap();

        let result = open(&path, OpenMode::Read, &cert);

        assert!(matches!(
            result,
            Err(FileError::Format(FormatError::TruncatedHeader { actual: 0 }))
        ));
    }

    #[test]
    fn open_with_corrupted_marker_fails() {
        let (_dir, path, cert) = setup();
        drop(open(&path, OpenMode::ReadWrite, &cert).unwrap());
        let mut bytes = fs::read(&path).unwrap();
        bytes[0] = b'X';
        fs::write(&path, &bytes).unwrap();

        for mode in [OpenMode::Read, OpenMode::ReadWrite] {
            let result = open(&path, mode, &cert);
            assert!(matches!(
                result,
                Err(FileError::Format(FormatError::BadMarker { .. }))
            ));
        }
    }

    #[test]
    fn open_rejects_allowance_smaller_than_overhead() {
        let (_dir, path, cert) = setup();
        let tight = PageLayout::new(
            NonZeroUsize::new(PAGE_SIZE).unwrap(),
            SEAL_OVERHEAD + RECORD_PREFIX_SIZE - 1,
        );

        let result = EncryptedPageFile::open(&path, OpenMode::ReadWrite, cert, tight);

        assert!(matches!(
            result,
            Err(FileError::SlotTooSmall {
                slot_allowance: 51,
                required: 52
            })
        ));
        assert!(!path.exists());
    }

    #[test]
    fn written_page_reads_back_after_reopen() {
        // Arrange
        let (_dir, path, cert) = setup();
        let page: Vec<u8> = (0..PAGE_SIZE as u8).collect();
        {
            let mut file = open(&path, OpenMode::ReadWrite, &cert).unwrap();
            file.write_page(1, &page, 100).unwrap();
            file.close().unwrap();
        }

        // Act
        let file = open(&path, OpenMode::Read, &cert).unwrap();
        let mut destination = vec![0u8; PAGE_SIZE];
        file.read_page(1, &mut destination).unwrap();

        // Assert
        assert_eq!(destination, page);
        assert_eq!(file.length(), 100);
    }

    #[test]
    fn page_is_not_stored_in_plaintext() {
        let (_dir, path, cert) = setup();
        let page = vec![0x5Au8; PAGE_SIZE];
        let mut file = open(&path, OpenMode::ReadWrite, &cert).unwrap();
        file.write_page(0, &page, PAGE_SIZE as u64).unwrap();

        let on_disk = fs::read(&path).unwrap();
        assert!(!on_disk.windows(16).any(|w| w == &page[..16]));
    }

    #[test]
    fn record_is_prefixed_with_ciphertext_length_at_its_slot() {
        let (_dir, path, cert) = setup();
        let mut file = open(&path, OpenMode::ReadWrite, &cert).unwrap();
        file.write_page(2, &[1u8; PAGE_SIZE], 10).unwrap();

        let on_disk = fs::read(&path).unwrap();
        let slot = (DATA_OFFSET + 2 * layout().stride()) as usize;
        let record_len = read_u32(&on_disk, slot).unwrap() as usize;
        assert_eq!(record_len, PAGE_SIZE + SEAL_OVERHEAD);
        assert_eq!(on_disk.len(), slot + RECORD_PREFIX_SIZE + record_len);
    }

    #[test]
    fn unwritten_slots_read_as_zero_pages() {
        let (_dir, path, cert) = setup();
        let mut file = open(&path, OpenMode::ReadWrite, &cert).unwrap();
        file.write_page(3, &[9u8; PAGE_SIZE], 4 * PAGE_SIZE as u64).unwrap();

        let mut destination = vec![0xFFu8; PAGE_SIZE];
        // hole inside the file
        file.read_page(1, &mut destination).unwrap();
        assert_eq!(destination, vec![0u8; PAGE_SIZE]);

        // slot past the physical end
        destination.fill(0xFF);
        file.read_page(10, &mut destination).unwrap();
        assert_eq!(destination, vec![0u8; PAGE_SIZE]);
    }

    #[test]
    fn header_length_only_grows() {
        let (_dir, path, cert) = setup();
        let mut file = open(&path, OpenMode::ReadWrite, &cert).unwrap();

        file.write_page(1, &[0u8; PAGE_SIZE], 120).unwrap();
        file.write_page(0, &[0u8; PAGE_SIZE], 64).unwrap();

        assert_eq!(file.length(), 120);
        let header = FileHeader::read_from(&File::open(&path).unwrap()).unwrap();
        assert_eq!(header.logical_length, 120);
    }

    #[test]
    fn length_is_read_from_header_when_not_cached() {
        let (_dir, path, cert) = setup();
        {
            let mut writer = open(&path, OpenMode::ReadWrite, &cert).unwrap();
            writer.write_page(0, &[0u8; PAGE_SIZE], 33).unwrap();
        }

        let reader = open(&path, OpenMode::Read, &cert).unwrap();

        assert_eq!(reader.committed_length, None);
        assert_eq!(reader.length(), 33);
    }

    #[test]
    fn length_of_closed_file_is_zero() {
        let (_dir, path, cert) = setup();
        drop(open(&path, OpenMode::ReadWrite, &cert).unwrap());
        let mut reader = open(&path, OpenMode::Read, &cert).unwrap();

        reader.close().unwrap();

        assert_eq!(reader.length(), 0);
    }

    #[test]
    fn read_with_wrong_certificate_fails() {
        let (_dir, path, cert) = setup();
        let mut file = open(&path, OpenMode::ReadWrite, &cert).unwrap();
        file.write_page(0, &[3u8; PAGE_SIZE], 1).unwrap();

        let stranger = Arc::new(Certificate::generate());
        let other = open(&path, OpenMode::Read, &stranger).unwrap();
        let mut destination = vec![0u8; PAGE_SIZE];

        let result = other.read_page(0, &mut destination);

        assert!(matches!(
            result,
            Err(FileError::Crypto {
                page_number: 0,
                source: CryptoError::Decrypt
            })
        ));
    }

    #[test]
    fn record_moved_to_another_slot_fails_authentication() {
        let (_dir, path, cert) = setup();
        let mut file = open(&path, OpenMode::ReadWrite, &cert).unwrap();
        file.write_page(0, &[4u8; PAGE_SIZE], 128).unwrap();
        file.close().unwrap();

        let mut bytes = fs::read(&path).unwrap();
        let stride = layout().stride() as usize;
        let slot0 = DATA_OFFSET as usize;
        bytes.resize(slot0 + 2 * stride, 0);
        let record: Vec<u8> = bytes[slot0..slot0 + stride].to_vec();
        bytes[slot0 + stride..].copy_from_slice(&record);
        fs::write(&path, &bytes).unwrap();

        let file = open(&path, OpenMode::Read, &cert).unwrap();
        let mut destination = vec![0u8; PAGE_SIZE];
        assert!(matches!(
            file.read_page(1, &mut destination),
            Err(FileError::Crypto { page_number: 1, .. })
        ));
    }

    #[test]
    fn oversized_length_prefix_is_corrupt_record() {
        let (_dir, path, cert) = setup();
        let mut file = open(&path, OpenMode::ReadWrite, &cert).unwrap();
        file.write_page(0, &[4u8; PAGE_SIZE], 1).unwrap();
        write_all_at(
            file.handle().unwrap(),
            &u32::MAX.to_le_bytes(),
            DATA_OFFSET,
        )
        .unwrap();

        let mut destination = vec![0u8; PAGE_SIZE];
        assert!(matches!(
            file.read_page(0, &mut destination),
            Err(FileError::CorruptRecord { page_number: 0, .. })
        ));
    }

    #[test]
    fn public_only_certificate_writes_but_cannot_read() {
        let (_dir, path, cert) = setup();
        let public = Arc::new(cert.public_only());
        let mut writer = open(&path, OpenMode::ReadWrite, &public).unwrap();
        writer.write_page(0, &[8u8; PAGE_SIZE], 64).unwrap();

        let mut destination = vec![0u8; PAGE_SIZE];
        assert!(matches!(
            writer.read_page(0, &mut destination),
            Err(FileError::Crypto {
                source: CryptoError::MissingPrivateKey,
                ..
            })
        ));

        let owner = open(&path, OpenMode::Read, &cert).unwrap();
        owner.read_page(0, &mut destination).unwrap();
        assert_eq!(destination, vec![8u8; PAGE_SIZE]);
    }

    #[test]
    fn read_only_file_rejects_writes() {
        let (_dir, path, cert) = setup();
        drop(open(&path, OpenMode::ReadWrite, &cert).unwrap());
        let mut reader = open(&path, OpenMode::Read, &cert).unwrap();

        let result = reader.write_page(0, &[0u8; PAGE_SIZE], 1);

        assert!(matches!(result, Err(FileError::ReadOnly)));
    }

    #[test]
    fn wrong_buffer_size_is_rejected() {
        let (_dir, path, cert) = setup();
        let mut file = open(&path, OpenMode::ReadWrite, &cert).unwrap();

        let result = file.write_page(0, &[0u8; PAGE_SIZE - 1], 1);

        assert!(matches!(
            result,
            Err(FileError::PageSizeMismatch {
                page_number: 0,
                expected: PAGE_SIZE,
                actual: 63
            })
        ));
    }

    #[test]
    fn ciphertext_larger_than_slot_is_rejected() {
        let (_dir, path, _) = setup();
        let mut file = EncryptedPageFile::open(
            &path,
            OpenMode::ReadWrite,
            Arc::new(UnderstatedEnvelope),
            layout(),
        )
        .unwrap();

        let result = file.write_page(0, &[0u8; PAGE_SIZE], 1);

        assert!(matches!(
            result,
            Err(FileError::SlotOverflow {
                page_number: 0,
                ciphertext_len: 264,
                capacity: 120
            })
        ));
        assert_eq!(file.length(), 0);
    }

    #[test]
    fn clone_shares_handle_and_survives_original_close() {
        let (_dir, path, cert) = setup();
        let mut original = open(&path, OpenMode::ReadWrite, &cert).unwrap();
        original.write_page(0, &[6u8; PAGE_SIZE], 64).unwrap();

        let clone = original.clone_shared();
        assert!(clone.is_clone());
        assert!(Arc::ptr_eq(
            original.handle().unwrap(),
            clone.handle().unwrap()
        ));

        original.close().unwrap();
        assert!(matches!(original.handle(), Err(FileError::Closed)));

        let mut destination = vec![0u8; PAGE_SIZE];
        clone.read_page(0, &mut destination).unwrap();
        assert_eq!(destination, vec![6u8; PAGE_SIZE]);
    }

    #[test]
    fn clone_rejects_writes_and_follows_header_length() {
        // Arrange
        let (_dir, path, cert) = setup();
        let mut original = open(&path, OpenMode::ReadWrite, &cert).unwrap();
        original.write_page(0, &[1u8; PAGE_SIZE], 64).unwrap();
        let mut clone = original.clone_shared();

        // Act
        original.write_page(1, &[2u8; PAGE_SIZE], 128).unwrap();
        let result = clone.write_page(0, &[3u8; PAGE_SIZE], 10);

        // Assert
        assert!(matches!(result, Err(FileError::ReadOnly)));
        assert_eq!(clone.length(), 128);
        let header = FileHeader::read_from(original.handle().unwrap()).unwrap();
        assert_eq!(header.logical_length, 128);
        let mut destination = vec![0u8; PAGE_SIZE];
        clone.read_page(0, &mut destination).unwrap();
        assert_eq!(destination, vec![1u8; PAGE_SIZE]);
    }

    #[test]
    fn closing_clone_leaves_original_usable() {
        let (_dir, path, cert) = setup();
        let mut original = open(&path, OpenMode::ReadWrite, &cert).unwrap();
        let mut clone = original.clone_shared();

        clone.close().unwrap();
        clone.close().unwrap();

        original.write_page(0, &[1u8; PAGE_SIZE], 64).unwrap();
        let mut destination = vec![0u8; PAGE_SIZE];
        assert!(matches!(
            clone.read_page(0, &mut destination),
            Err(FileError::Closed)
        ));
    }
}
