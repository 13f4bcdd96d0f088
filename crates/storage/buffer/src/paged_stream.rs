//! Byte-stream view over a page file, with a single resident page.
//!
//! The stream translates a logical offset into `(page_number, offset_in_page)` and keeps the page
//! holding the cursor in memory. Physical page I/O happens only when the cursor crosses into a
//! different page, or on an explicit flush.
//!
//! # Invariants
//!
//! - A dirty page is always flushed before another page replaces it in the buffer. Loading a page
//!   while the buffer is dirty is an engine bug and panics.
//! - `file_pointer == page_number * page_size + buffer_pointer` whenever the cursor is at rest,
//!   with `0 <= buffer_pointer <= page_size`.
//! - `file_size` only grows, and only as a side effect of writing past the previous end.

use crate::api::{IndexInput, IndexOutput};
use crate::errors::PagingError;
use file::api::PageFile;
use std::num::NonZeroUsize;
use tracing::{trace, warn};

type PagingResult<T, F> = Result<T, PagingError<<F as PageFile>::Error>>;

/// Seekable byte stream stored in fixed-size pages of a [`PageFile`].
///
/// Not safe for concurrent use: every cursor-moving operation takes `&mut self`. Independent
/// cursors over the same file are created with [`PagedStream::clone_stream`].
#[derive(Debug)]
pub struct PagedStream<F: PageFile> {
    file: F,
    page_size: usize,
    page: Box<[u8]>,
    page_number: u64,
    /// `false` after a failed load; the page is fetched again before the buffer is touched.
    page_loaded: bool,
    buffer_pointer: usize,
    file_pointer: u64,
    file_size: u64,
    dirty: bool,
    closed: bool,
}

impl<F: PageFile> PagedStream<F> {
    /// Wraps `file` into a stream positioned at offset 0, with page 0 loaded.
    pub fn open(file: F, page_size: NonZeroUsize) -> PagingResult<Self, F> {
        let page_size = page_size.get();
        let file_size = file.length();
        let mut stream = Self {
            file,
            page_size,
            page: vec![0u8; page_size].into_boxed_slice(),
            page_number: 0,
            page_loaded: false,
            buffer_pointer: 0,
            file_pointer: 0,
            file_size,
            dirty: false,
            closed: false,
        };
        stream.read_current_page()?;
        Ok(stream)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Logical length: the larger of what this stream has written and what the file records.
    pub fn length(&self) -> u64 {
        self.file_size.max(self.file.length())
    }

    pub fn position(&self) -> u64 {
        self.file_pointer
    }

    /// Whether the resident page holds writes that have not been flushed.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The underlying page file.
    pub fn file(&self) -> &F {
        &self.file
    }

    pub fn read_byte(&mut self) -> PagingResult<u8, F> {
        self.ensure_readable(1)?;
        if self.buffer_pointer == self.page_size {
            self.advance_page()?;
        }

        let byte = self.page[self.buffer_pointer];
        self.buffer_pointer += 1;
        self.file_pointer += 1;
        Ok(byte)
    }

    /// Same as calling [`PagedStream::read_byte`] once per byte of `destination`, copied a page
    /// at a time.
    pub fn read_bytes(&mut self, destination: &mut [u8]) -> PagingResult<(), F> {
        self.ensure_readable(destination.len() as u64)?;

        let mut copied = 0;
        while copied < destination.len() {
            if self.buffer_pointer == self.page_size {
                self.advance_page()?;
            }
            let n = (self.page_size - self.buffer_pointer).min(destination.len() - copied);
            destination[copied..copied + n]
                .copy_from_slice(&self.page[self.buffer_pointer..self.buffer_pointer + n]);
            self.buffer_pointer += n;
            self.file_pointer += n as u64;
            copied += n;
        }
        Ok(())
    }

    pub fn write_byte(&mut self, byte: u8) -> PagingResult<(), F> {
        self.ensure_writable()?;
        if self.buffer_pointer == self.page_size {
            self.advance_page()?;
        }

        self.page[self.buffer_pointer] = byte;
        self.buffer_pointer += 1;
        self.mark_written(1);
        Ok(())
    }

    /// Same as calling [`PagedStream::write_byte`] once per byte of `source`, copied a page at a
    /// time.
    pub fn write_bytes(&mut self, source: &[u8]) -> PagingResult<(), F> {
        self.ensure_writable()?;

        let mut copied = 0;
        while copied < source.len() {
            if self.buffer_pointer == self.page_size {
                self.advance_page()?;
            }
            let n = (self.page_size - self.buffer_pointer).min(source.len() - copied);
            self.page[self.buffer_pointer..self.buffer_pointer + n]
                .copy_from_slice(&source[copied..copied + n]);
            self.buffer_pointer += n;
            self.mark_written(n);
            copied += n;
        }
        Ok(())
    }

    /// Moves the cursor to `position`, which may lie past the end of the stream.
    ///
    /// The resident page is always flushed first. It stays in the buffer when `position` falls
    /// on the same page; otherwise the target page is loaded.
    pub fn seek(&mut self, position: u64) -> PagingResult<(), F> {
        self.ensure_open()?;
        self.flush()?;

        let page_size = self.page_size as u64;
        let target_page = position / page_size;
        let reload = target_page != self.page_number || !self.page_loaded;

        self.page_number = target_page;
        self.buffer_pointer = (position % page_size) as usize;
        self.file_pointer = position;

        if reload {
            self.read_current_page()?;
        }
        Ok(())
    }

    /// Writes the resident page if it is dirty. A clean page causes no I/O.
    pub fn flush(&mut self) -> PagingResult<(), F> {
        self.ensure_open()?;
        if !self.dirty {
            return Ok(());
        }

        self.file
            .write_page(self.page_number, &self.page, self.file_size)?;
        self.dirty = false;
        trace!(page_number = self.page_number, file_size = self.file_size, "page flushed");
        Ok(())
    }

    /// Independent read cursor over the same page file.
    ///
    /// The copy starts with this stream's position and a private copy of the resident page,
    /// including writes this stream has not flushed yet. The copy starts clean: flushing those
    /// writes stays the job of this stream, so the clone never writes a stale page over newer data.
    pub fn clone_stream(&self) -> Self {
        Self {
            file: self.file.clone_shared(),
            page_size: self.page_size,
            page: self.page.clone(),
            page_number: self.page_number,
            page_loaded: self.page_loaded,
            buffer_pointer: self.buffer_pointer,
            file_pointer: self.file_pointer,
            file_size: self.file_size,
            dirty: false,
            closed: self.closed,
        }
    }

    /// Flushes the resident page and closes the page file. Calling it again is a no-op.
    pub fn close(&mut self) -> PagingResult<(), F> {
        if self.closed {
            return Ok(());
        }
        self.flush()?;
        self.closed = true;
        self.file.close()?;
        Ok(())
    }

    fn ensure_open(&self) -> PagingResult<(), F> {
        if self.closed {
            return Err(PagingError::Closed);
        }
        Ok(())
    }

    fn ensure_writable(&mut self) -> PagingResult<(), F> {
        self.ensure_open()?;
        if !self.page_loaded {
            self.read_current_page()?;
        }
        Ok(())
    }

    /// Checks that `requested` bytes are available from the cursor. The file's recorded length
    /// is consulted only when the locally known size is not enough, so other writers' growth is
    /// picked up.
    fn ensure_readable(&mut self, requested: u64) -> PagingResult<(), F> {
        self.ensure_open()?;

        let end = self.file_pointer.saturating_add(requested);
        if end > self.file_size {
            self.file_size = self.file_size.max(self.file.length());
            if end > self.file_size {
                return Err(PagingError::ReadPastEnd {
                    position: self.file_pointer,
                    requested,
                    length: self.file_size,
                });
            }
        }

        if !self.page_loaded {
            self.read_current_page()?;
        }
        Ok(())
    }

    fn mark_written(&mut self, count: usize) {
        self.dirty = true;
        self.file_pointer += count as u64;
        if self.file_pointer > self.file_size {
            self.file_size = self.file_pointer;
        }
    }

    /// Flushes the full resident page and moves the buffer to the next one.
    fn advance_page(&mut self) -> PagingResult<(), F> {
        self.flush()?;
        self.page_number += 1;
        self.buffer_pointer = 0;
        self.read_current_page()
    }

    /// Loads `page_number` into the buffer. Pages starting at or past the logical end are
    /// synthesized as zeros without touching the page data.
    fn read_current_page(&mut self) -> PagingResult<(), F> {
        assert!(
            !self.dirty,
            "page {} is dirty and must be flushed before another page is loaded",
            self.page_number
        );

        self.page_loaded = false;
        let page_start = self.page_number.saturating_mul(self.page_size as u64);
        if page_start >= self.file_size {
            // another stream over the same file may have grown it
            self.file_size = self.file_size.max(self.file.length());
        }
        if page_start >= self.file_size {
            self.page.fill(0);
            trace!(page_number = self.page_number, "page past end, zero-filled");
        } else {
            self.file.read_page(self.page_number, &mut self.page)?;
            trace!(page_number = self.page_number, "page loaded");
        }
        self.page_loaded = true;
        Ok(())
    }
}

impl<F: PageFile> Drop for PagedStream<F> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(
                page_number = self.page_number,
                error = %e,
                "failed to flush page while dropping stream"
            );
        }
    }
}

impl<F: PageFile> IndexInput for PagedStream<F> {
    type Error = PagingError<F::Error>;

    fn length(&self) -> u64 {
        PagedStream::length(self)
    }

    fn position(&self) -> u64 {
        PagedStream::position(self)
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        PagedStream::read_byte(self)
    }

    fn read_bytes(&mut self, destination: &mut [u8]) -> Result<(), Self::Error> {
        PagedStream::read_bytes(self, destination)
    }

    fn seek(&mut self, position: u64) -> Result<(), Self::Error> {
        PagedStream::seek(self, position)
    }

    fn clone_input(&self) -> Self {
        self.clone_stream()
    }
}

impl<F: PageFile> IndexOutput for PagedStream<F> {
    type Error = PagingError<F::Error>;

    fn length(&self) -> u64 {
        PagedStream::length(self)
    }

    fn position(&self) -> u64 {
        PagedStream::position(self)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        PagedStream::write_byte(self, byte)
    }

    fn write_bytes(&mut self, source: &[u8]) -> Result<(), Self::Error> {
        PagedStream::write_bytes(self, source)
    }

    fn seek(&mut self, position: u64) -> Result<(), Self::Error> {
        PagedStream::seek(self, position)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        PagedStream::flush(self)
    }
}
