use std::io::{ErrorKind, Read, Write};

use crate::error::{Result, TransportError};

/// Something bytes arrive from.
///
/// A read may legitimately return zero bytes (nothing pending, read timeout
/// elapsed). Implementations report "no data right now" as `Ok(0)`, never as
/// an error; errors mean the link itself failed.
pub trait ByteSource {
    /// Read whatever is available into `buf`, returning the byte count.
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize>;
}

/// Something bytes are written to.
pub trait ByteSink {
    /// Write all of `bytes` (blocking until accepted by the link).
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;
}

/// Local line-speed control.
pub trait SpeedControl {
    /// Reconfigure the local end of the link.
    fn set_baud_rate(&mut self, rate: u32) -> Result<()>;

    /// The currently configured local rate, if the link has one.
    fn baud_rate(&self) -> Option<u32>;
}

/// A full duplex receiver link.
pub trait Transport: ByteSource + ByteSink + SpeedControl {}

impl<T: ByteSource + ByteSink + SpeedControl + ?Sized> Transport for T {}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read_chunk(buf)
    }
}

impl<T: ByteSink + ?Sized> ByteSink for &mut T {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_bytes(bytes)
    }
}

impl<T: SpeedControl + ?Sized> SpeedControl for &mut T {
    fn set_baud_rate(&mut self, rate: u32) -> Result<()> {
        (**self).set_baud_rate(rate)
    }

    fn baud_rate(&self) -> Option<u32> {
        (**self).baud_rate()
    }
}

impl<T: ByteSource + ?Sized> ByteSource for Box<T> {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read_chunk(buf)
    }
}

impl<T: ByteSink + ?Sized> ByteSink for Box<T> {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write_bytes(bytes)
    }
}

impl<T: SpeedControl + ?Sized> SpeedControl for Box<T> {
    fn set_baud_rate(&mut self, rate: u32) -> Result<()> {
        (**self).set_baud_rate(rate)
    }

    fn baud_rate(&self) -> Option<u32> {
        (**self).baud_rate()
    }
}

/// Adapts any `Read + Write` stream (file, socket, pipe, in-memory cursor).
///
/// Line speed is tracked but not applied; use this for captures, pipes and
/// tests rather than real serial devices.
#[derive(Debug)]
pub struct IoTransport<T> {
    inner: T,
    rate: Option<u32>,
}

impl<T> IoTransport<T> {
    /// Wrap a stream with no nominal line speed.
    pub fn new(inner: T) -> Self {
        Self { inner, rate: None }
    }

    /// Wrap a stream and record a nominal line speed.
    pub fn with_baud_rate(inner: T, rate: u32) -> Self {
        Self {
            inner,
            rate: Some(rate),
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the adapter and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read> ByteSource for IoTransport<T> {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.inner.read(buf) {
            Ok(n) => Ok(n),
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::Interrupted | ErrorKind::WouldBlock | ErrorKind::TimedOut
                ) =>
            {
                Ok(0)
            }
            Err(err) => Err(TransportError::Io(err)),
        }
    }
}

impl<T: Write> ByteSink for IoTransport<T> {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let mut offset = 0usize;
        while offset < bytes.len() {
            match self.inner.write(&bytes[offset..]) {
                Ok(0) => return Err(TransportError::Disconnected),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }
}

impl<T> SpeedControl for IoTransport<T> {
    fn set_baud_rate(&mut self, rate: u32) -> Result<()> {
        self.rate = Some(rate);
        Ok(())
    }

    fn baud_rate(&self) -> Option<u32> {
        self.rate
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn reads_from_cursor_until_exhausted() {
        let mut link = IoTransport::new(Cursor::new(b"abc".to_vec()));
        let mut buf = [0u8; 8];

        assert_eq!(link.read_chunk(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], b"abc");
        assert_eq!(link.read_chunk(&mut buf).unwrap(), 0);
    }

    #[test]
    fn writes_everything_to_inner() {
        let mut link = IoTransport::new(Cursor::new(Vec::<u8>::new()));
        link.write_bytes(b"\xb5\x62").unwrap();
        link.write_bytes(b"\x06\x00").unwrap();

        assert_eq!(link.into_inner().into_inner(), b"\xb5\x62\x06\x00".to_vec());
    }

    #[test]
    fn tracks_nominal_baud_rate() {
        let mut link = IoTransport::with_baud_rate(Cursor::new(Vec::<u8>::new()), 9600);
        assert_eq!(link.baud_rate(), Some(9600));
        link.set_baud_rate(115_200).unwrap();
        assert_eq!(link.baud_rate(), Some(115_200));
    }

    #[test]
    fn would_block_is_reported_as_empty_read() {
        let mut link = IoTransport::new(WouldBlockReader);
        let mut buf = [0u8; 4];
        assert_eq!(link.read_chunk(&mut buf).unwrap(), 0);
    }

    #[test]
    fn hard_read_error_propagates() {
        let mut link = IoTransport::new(BrokenReader);
        let mut buf = [0u8; 4];
        let err = link.read_chunk(&mut buf).unwrap_err();
        assert!(matches!(err, TransportError::Io(_)));
        assert!(!err.is_idle());
    }

    #[test]
    fn zero_length_write_means_disconnected() {
        let mut link = IoTransport::new(ClosedWriter);
        let err = link.write_bytes(b"x").unwrap_err();
        assert!(matches!(err, TransportError::Disconnected));
    }

    #[test]
    fn boxed_transport_forwards() {
        let mut boxed: Box<dyn Transport> =
            Box::new(IoTransport::new(Cursor::new(b"z".to_vec())));
        let mut buf = [0u8; 1];
        assert_eq!(boxed.read_chunk(&mut buf).unwrap(), 1);
        boxed.set_baud_rate(38_400).unwrap();
        assert_eq!(boxed.baud_rate(), Some(38_400));
    }

    struct WouldBlockReader;

    impl Read for WouldBlockReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::WouldBlock))
        }
    }

    struct BrokenReader;

    impl Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::BrokenPipe))
        }
    }

    struct ClosedWriter;

    impl Write for ClosedWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
