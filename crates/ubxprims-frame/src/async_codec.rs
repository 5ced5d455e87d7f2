//! `tokio_util::codec` adapter over [`FrameScanner`].
//!
//! Lets the scanner sit inside a `FramedRead`/`FramedWrite` pair when the
//! byte source is an async stream. No runtime is needed to use the codec
//! itself.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{encode_frame, Frame, FrameConfig};
use crate::error::FrameError;
use crate::scanner::{FrameScanner, ScanEvent};

/// Decodes scan events and encodes frames.
#[derive(Debug, Default)]
pub struct UbxCodec {
    scanner: FrameScanner,
}

impl UbxCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &FrameConfig) -> Self {
        Self {
            scanner: FrameScanner::with_config(config),
        }
    }
}

impl Decoder for UbxCodec {
    type Item = ScanEvent;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if !src.is_empty() {
            let incoming = src.split();
            self.scanner.push(&incoming);
        }
        Ok(self.scanner.next_event())
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(event) = self.decode(src)? {
            return Ok(Some(event));
        }
        Ok(self.scanner.finish().map(ScanEvent::NonProtocol))
    }
}

impl Encoder<Frame> for UbxCodec {
    type Error = FrameError;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        encode_frame(item.identity, &item.payload, dst)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::codec::Identity;

    #[test]
    fn decodes_frames_from_split_input() {
        let mut wire = BytesMut::new();
        encode_frame(Identity::new(0x05, 0x01), &[0x06, 0x00], &mut wire).unwrap();
        let tail = wire.split_off(5);

        let mut codec = UbxCodec::new();
        let mut src = wire;
        assert!(codec.decode(&mut src).unwrap().is_none());
        assert!(src.is_empty());

        let mut src = tail;
        match codec.decode(&mut src).unwrap() {
            Some(ScanEvent::Frame(scanned)) => {
                assert_eq!(scanned.frame.identity, Identity::new(0x05, 0x01));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn encoder_matches_encode_frame() {
        let frame = Frame::new(Identity::new(0x06, 0x08), Bytes::from_static(&[0xE8, 0x03]));
        let mut codec = UbxCodec::new();
        let mut dst = BytesMut::new();
        codec.encode(frame.clone(), &mut dst).unwrap();
        assert_eq!(dst.freeze(), frame.to_bytes().unwrap());
    }

    #[test]
    fn eof_flushes_leftover_bytes() {
        let mut codec = UbxCodec::new();
        let mut src = BytesMut::from(&[0xB5, 0x62, 0x01][..]);
        assert!(codec.decode(&mut src).unwrap().is_none());
        let event = codec.decode_eof(&mut src).unwrap();
        assert_eq!(
            event,
            Some(ScanEvent::NonProtocol(Bytes::from_static(&[0xB5, 0x62, 0x01])))
        );
        assert!(codec.decode_eof(&mut src).unwrap().is_none());
    }
}
