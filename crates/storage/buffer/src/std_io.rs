//! `std::io` adapters, so a stream can be handed to `io::copy`, `BufReader` and friends.

use crate::errors::PagingError;
use crate::paged_stream::PagedStream;
use file::api::PageFile;
use std::io;
use std::io::{Read, Seek, SeekFrom, Write};

impl<E> From<PagingError<E>> for io::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(err: PagingError<E>) -> Self {
        match err {
            PagingError::ReadPastEnd { .. } => io::Error::new(io::ErrorKind::UnexpectedEof, err),
            other => io::Error::other(other),
        }
    }
}

impl<F: PageFile> Read for PagedStream<F> {
    /// Reads up to the end of the stream; returns `Ok(0)` once the cursor is at or past it.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.length().saturating_sub(self.position());
        let n = (buf.len() as u64).min(remaining) as usize;
        if n == 0 {
            return Ok(0);
        }
        self.read_bytes(&mut buf[..n])?;
        Ok(n)
    }
}

impl<F: PageFile> Write for PagedStream<F> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        PagedStream::flush(self)?;
        Ok(())
    }
}

impl<F: PageFile> Seek for PagedStream<F> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::End(delta) => self.length().checked_add_signed(delta),
            SeekFrom::Current(delta) => self.position().checked_add_signed(delta),
        };
        let Some(target) = target else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            ));
        };

        PagedStream::seek(self, target)?;
        Ok(target)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use file::in_memory_page_file::InMemoryPageFile;
    use std::num::NonZeroUsize;

    fn create_stream() -> PagedStream<InMemoryPageFile> {
        PagedStream::open(InMemoryPageFile::new(8), NonZeroUsize::new(8).unwrap()).unwrap()
    }

    #[test]
    fn io_copy_round_trip() {
        let mut stream = create_stream();
        let source: Vec<u8> = (0u8..50).collect();

        io::copy(&mut source.as_slice(), &mut stream).unwrap();
        Write::flush(&mut stream).unwrap();
        stream.rewind().unwrap();
        let mut out = Vec::new();
        stream.read_to_end(&mut out).unwrap();

        assert_eq!(out, source);
    }

    #[test]
    fn read_at_end_returns_zero() {
        let mut stream = create_stream();
        stream.write_all(b"abc").unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(stream.read(&mut buf).unwrap(), 0);

        Seek::seek(&mut stream, SeekFrom::Start(1)).unwrap();
        assert_eq!(stream.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"bc");
    }

    #[test]
    fn seek_relative_to_end_and_current() {
        let mut stream = create_stream();
        stream.write_all(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]).unwrap();

        assert_eq!(Seek::seek(&mut stream, SeekFrom::End(-3)).unwrap(), 7);
        assert_eq!(Seek::seek(&mut stream, SeekFrom::Current(-2)).unwrap(), 5);
        let mut buf = [0u8; 1];
        stream.read_exact(&mut buf).unwrap();
        assert_eq!(buf[0], 6);
    }

    #[test]
    fn seek_before_start_is_invalid_input() {
        let mut stream = create_stream();

        let err = Seek::seek(&mut stream, SeekFrom::Current(-1)).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn read_past_end_maps_to_unexpected_eof() {
        let err: io::Error = PagingError::<io::Error>::ReadPastEnd {
            position: 0,
            requested: 1,
            length: 0,
        }
        .into();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
