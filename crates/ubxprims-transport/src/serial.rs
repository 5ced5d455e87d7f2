use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use serialport::{ClearBuffer, SerialPort};
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::{ByteSink, ByteSource, SpeedControl};

/// Serial line transport backed by the `serialport` crate.
///
/// Reads use a short timeout so that a silent receiver shows up as empty
/// reads rather than a blocked caller.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
    device: String,
}

impl SerialTransport {
    /// Default read timeout for a single `read_chunk` call.
    pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(50);

    /// Open `device` in raw 8N1 mode at `baud_rate`.
    pub fn open(device: &str, baud_rate: u32) -> Result<Self> {
        Self::open_with_timeout(device, baud_rate, Self::DEFAULT_READ_TIMEOUT)
    }

    /// Open `device` with an explicit per-read timeout.
    pub fn open_with_timeout(device: &str, baud_rate: u32, timeout: Duration) -> Result<Self> {
        let port = serialport::new(device, baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(timeout)
            .open()
            .map_err(|err| TransportError::Open {
                device: device.to_string(),
                message: err.to_string(),
            })?;

        info!(device, baud_rate, "opened serial device");

        let mut transport = Self {
            port,
            device: device.to_string(),
        };
        transport.discard_input();
        Ok(transport)
    }

    /// Device path this transport was opened on.
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Clone a second handle on the same device for a reader thread.
    pub fn try_clone(&self) -> Result<Self> {
        let port = self.port.try_clone().map_err(|err| TransportError::Open {
            device: self.device.clone(),
            message: err.to_string(),
        })?;
        Ok(Self {
            port,
            device: self.device.clone(),
        })
    }

    fn discard_input(&mut self) {
        // Stale bytes from the previous line speed are noise.
        if let Err(err) = self.port.clear(ClearBuffer::Input) {
            debug!(device = %self.device, %err, "failed to flush input buffer");
        }
    }
}

impl ByteSource for SerialTransport {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.port.read(buf) {
            Ok(n) => Ok(n),
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                ) =>
            {
                Ok(0)
            }
            Err(err) => Err(TransportError::Io(err)),
        }
    }
}

impl ByteSink for SerialTransport {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.port.write_all(bytes)?;
        self.port.flush()?;
        Ok(())
    }
}

impl SpeedControl for SerialTransport {
    fn set_baud_rate(&mut self, rate: u32) -> Result<()> {
        self.port
            .set_baud_rate(rate)
            .map_err(|err| TransportError::Speed {
                rate,
                message: err.to_string(),
            })?;
        debug!(device = %self.device, rate, "local line speed changed");
        self.discard_input();
        Ok(())
    }

    fn baud_rate(&self) -> Option<u32> {
        self.port.baud_rate().ok()
    }
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("device", &self.device)
            .finish()
    }
}
