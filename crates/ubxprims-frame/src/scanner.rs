use bytes::{Buf, Bytes, BytesMut};
use tracing::{trace, warn};

use crate::codec::{checksum, Frame, FrameConfig, Identity, FRAME_OVERHEAD, HEADER_SIZE, SYNC};

const INITIAL_BUFFER_CAPACITY: usize = 4 * 1024;

/// Why a frame candidate was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorruptReason {
    /// Trailing checksum did not match.
    Checksum,
    /// Declared length exceeds the configured maximum.
    Oversized,
}

/// A checksum-valid frame plus the exact wire bytes it occupied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFrame {
    pub frame: Frame,
    pub raw: Bytes,
}

/// One unit of progress produced by [`FrameScanner::next_event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// A complete, checksum-valid frame.
    Frame(ScannedFrame),
    /// Bytes that are not part of any binary frame (text sentences, noise).
    NonProtocol(Bytes),
    /// A frame candidate at the head of the buffer was rejected; the scanner
    /// skipped exactly the two sync bytes and resumes after them.
    Corrupt {
        identity: Identity,
        length: usize,
        reason: CorruptReason,
    },
}

/// Scanner position, exposed for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// No sync marker at the head of the buffer.
    Scanning,
    /// Sync marker at the head, waiting for the rest of the frame.
    Accumulating { needed: usize },
}

/// Recovers frame boundaries from an arbitrarily chunked byte stream.
///
/// Feed bytes with [`push`](Self::push), then drain [`next_event`](Self::next_event)
/// until it returns `None`. The buffer only ever holds the frame in progress
/// plus unexamined data; everything else is handed out as an event.
#[derive(Debug)]
pub struct FrameScanner {
    buf: BytesMut,
    max_payload: usize,
}

impl FrameScanner {
    pub fn new() -> Self {
        Self::with_config(&FrameConfig::default())
    }

    pub fn with_config(config: &FrameConfig) -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            max_payload: config.max_payload_size,
        }
    }

    /// Append newly arrived bytes.
    pub fn push(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Bytes held but not yet resolved into an event.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Drop everything buffered (used after a local line-speed change).
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Current position of the state machine.
    pub fn state(&self) -> ScanState {
        if self.buf.len() >= 2 && self.buf[..2] == SYNC {
            let needed = if self.buf.len() < HEADER_SIZE {
                HEADER_SIZE
            } else {
                declared_length(&self.buf) + FRAME_OVERHEAD
            };
            ScanState::Accumulating { needed }
        } else {
            ScanState::Scanning
        }
    }

    /// Resolve the next event from buffered bytes, or `None` if more input is
    /// needed.
    pub fn next_event(&mut self) -> Option<ScanEvent> {
        if self.buf.is_empty() {
            return None;
        }

        match find_sync(&self.buf) {
            Some(0) => self.frame_at_head(),
            Some(pos) => Some(ScanEvent::NonProtocol(self.buf.split_to(pos).freeze())),
            None => {
                // A trailing 0xB5 may be the first half of a marker split
                // across chunks.
                let keep = usize::from(self.buf.last() == Some(&SYNC[0]));
                let release = self.buf.len() - keep;
                if release == 0 {
                    return None;
                }
                Some(ScanEvent::NonProtocol(self.buf.split_to(release).freeze()))
            }
        }
    }

    /// Flush whatever is left as non-protocol data (end of a capture).
    pub fn finish(&mut self) -> Option<Bytes> {
        if self.buf.is_empty() {
            None
        } else {
            Some(self.buf.split().freeze())
        }
    }

    fn frame_at_head(&mut self) -> Option<ScanEvent> {
        if self.buf.len() < HEADER_SIZE {
            return None;
        }

        let identity = Identity::new(self.buf[2], self.buf[3]);
        let length = declared_length(&self.buf);

        if length > self.max_payload {
            warn!(%identity, length, max = self.max_payload, "declared length over limit, resyncing");
            self.buf.advance(SYNC.len());
            return Some(ScanEvent::Corrupt {
                identity,
                length,
                reason: CorruptReason::Oversized,
            });
        }

        let total = length + FRAME_OVERHEAD;
        if self.buf.len() < total {
            trace!(%identity, have = self.buf.len(), need = total, "frame incomplete");
            return None;
        }

        let end = HEADER_SIZE + length;
        if checksum(&self.buf[2..end]) != [self.buf[end], self.buf[end + 1]] {
            warn!(%identity, length, "checksum mismatch, resyncing");
            self.buf.advance(SYNC.len());
            return Some(ScanEvent::Corrupt {
                identity,
                length,
                reason: CorruptReason::Checksum,
            });
        }

        let raw = self.buf.split_to(total).freeze();
        let payload = raw.slice(HEADER_SIZE..end);
        Some(ScanEvent::Frame(ScannedFrame {
            frame: Frame { identity, payload },
            raw,
        }))
    }
}

impl Default for FrameScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn declared_length(buf: &[u8]) -> usize {
    u16::from_le_bytes([buf[4], buf[5]]) as usize
}

fn find_sync(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|pair| pair == SYNC)
}
