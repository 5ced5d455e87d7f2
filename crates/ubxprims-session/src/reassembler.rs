//! Turns arbitrarily chunked link bytes into decoded messages.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;
use ubxprims_frame::{
    CorruptReason, Frame, FrameConfig, FrameScanner, Identity, NmeaExtractor, ScanEvent,
    ScannedFrame, ScanState, TextItem,
};
use ubxprims_message::{DecodedMessage, FormatRegistry, MessageError};

/// Receives everything the reassembler produces.
///
/// All methods default to doing nothing. They run on the byte-delivery path,
/// so implementations should hand expensive work off (to a channel, say)
/// rather than do it inline.
pub trait EventSink {
    /// A frame decoded against the registry.
    fn message(&mut self, message: DecodedMessage) {
        let _ = message;
    }

    /// A checksum-valid frame that could not be decoded.
    fn undecodable(&mut self, frame: &Frame, error: &MessageError) {
        let _ = (frame, error);
    }

    /// A text sentence or unclassified non-protocol bytes.
    fn text(&mut self, item: TextItem) {
        let _ = item;
    }

    /// Exact wire bytes of each completed frame.
    fn raw(&mut self, bytes: &[u8]) {
        let _ = bytes;
    }

    /// A frame candidate was discarded and the scanner resynchronised.
    fn corrupt(&mut self, identity: Identity, length: usize, reason: CorruptReason) {
        let _ = (identity, length, reason);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn message(&mut self, message: DecodedMessage) {
        (**self).message(message);
    }

    fn undecodable(&mut self, frame: &Frame, error: &MessageError) {
        (**self).undecodable(frame, error);
    }

    fn text(&mut self, item: TextItem) {
        (**self).text(item);
    }

    fn raw(&mut self, bytes: &[u8]) {
        (**self).raw(bytes);
    }

    fn corrupt(&mut self, identity: Identity, length: usize, reason: CorruptReason) {
        (**self).corrupt(identity, length, reason);
    }
}

/// Sink that drops everything.
impl EventSink for () {}

type MessageHandler = Box<dyn FnMut(&DecodedMessage) + Send>;
type UndecodableHandler = Box<dyn FnMut(&Frame, &MessageError) + Send>;
type TextHandler = Box<dyn FnMut(&TextItem) + Send>;
type RawHandler = Box<dyn FnMut(&[u8]) + Send>;

/// Closure-based [`EventSink`].
#[derive(Default)]
pub struct Handlers {
    message: Option<MessageHandler>,
    undecodable: Option<UndecodableHandler>,
    text: Option<TextHandler>,
    raw: Option<RawHandler>,
}

impl Handlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_message(mut self, handler: impl FnMut(&DecodedMessage) + Send + 'static) -> Self {
        self.message = Some(Box::new(handler));
        self
    }

    pub fn on_undecodable(
        mut self,
        handler: impl FnMut(&Frame, &MessageError) + Send + 'static,
    ) -> Self {
        self.undecodable = Some(Box::new(handler));
        self
    }

    pub fn on_text(mut self, handler: impl FnMut(&TextItem) + Send + 'static) -> Self {
        self.text = Some(Box::new(handler));
        self
    }

    pub fn on_raw(mut self, handler: impl FnMut(&[u8]) + Send + 'static) -> Self {
        self.raw = Some(Box::new(handler));
        self
    }
}

impl std::fmt::Debug for Handlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handlers")
            .field("message", &self.message.is_some())
            .field("undecodable", &self.undecodable.is_some())
            .field("text", &self.text.is_some())
            .field("raw", &self.raw.is_some())
            .finish()
    }
}

impl EventSink for Handlers {
    fn message(&mut self, message: DecodedMessage) {
        if let Some(handler) = self.message.as_mut() {
            handler(&message);
        }
    }

    fn undecodable(&mut self, frame: &Frame, error: &MessageError) {
        if let Some(handler) = self.undecodable.as_mut() {
            handler(frame, error);
        }
    }

    fn text(&mut self, item: TextItem) {
        if let Some(handler) = self.text.as_mut() {
            handler(&item);
        }
    }

    fn raw(&mut self, bytes: &[u8]) {
        if let Some(handler) = self.raw.as_mut() {
            handler(bytes);
        }
    }
}

/// Running counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReassemblerStats {
    /// Bytes fed in.
    pub bytes: u64,
    /// Checksum-valid frames.
    pub frames: u64,
    /// Frames decoded into messages.
    pub decoded: u64,
    pub zero_length: u64,
    pub checksum_failures: u64,
    pub oversized: u64,
    pub unknown: u64,
    pub malformed: u64,
    /// Text sentences with a valid checksum.
    pub sentences: u64,
    /// Text sentences whose checksum did not match.
    pub bad_sentences: u64,
    /// Bytes that were neither frames nor sentences.
    pub unrecognized_bytes: u64,
}

/// Frame scanner plus text extraction plus registry decode.
#[derive(Debug)]
pub struct Reassembler {
    scanner: FrameScanner,
    text: NmeaExtractor,
    registry: Arc<FormatRegistry>,
    stats: ReassemblerStats,
}

impl Reassembler {
    pub fn new(registry: Arc<FormatRegistry>) -> Self {
        Self::with_config(registry, &FrameConfig::default())
    }

    pub fn with_config(registry: Arc<FormatRegistry>, config: &FrameConfig) -> Self {
        Self {
            scanner: FrameScanner::with_config(config),
            text: NmeaExtractor::new(),
            registry,
            stats: ReassemblerStats::default(),
        }
    }

    /// Append a chunk and deliver every event it completes.
    ///
    /// Returns the number of messages delivered.
    pub fn feed<S: EventSink + ?Sized>(&mut self, chunk: &[u8], sink: &mut S) -> usize {
        self.stats.bytes += chunk.len() as u64;
        self.scanner.push(chunk);
        self.drain(sink)
    }

    /// Flush partial data at end of input (captures, closed links).
    pub fn finish<S: EventSink + ?Sized>(&mut self, sink: &mut S) {
        if let Some(rest) = self.scanner.finish() {
            for item in self.text.extract(&rest) {
                self.deliver_text(item, sink);
            }
        }
        for item in self.text.flush() {
            self.deliver_text(item, sink);
        }
    }

    /// Drop buffered bytes without delivering them.
    pub fn reset(&mut self) {
        self.scanner.clear();
        self.text = NmeaExtractor::new();
    }

    /// Scanner position.
    pub fn state(&self) -> ScanState {
        self.scanner.state()
    }

    /// Bytes held waiting for more input.
    pub fn pending(&self) -> usize {
        self.scanner.pending() + self.text.pending()
    }

    pub fn stats(&self) -> &ReassemblerStats {
        &self.stats
    }

    pub fn registry(&self) -> &Arc<FormatRegistry> {
        &self.registry
    }

    fn drain<S: EventSink + ?Sized>(&mut self, sink: &mut S) -> usize {
        let mut delivered = 0;
        while let Some(event) = self.scanner.next_event() {
            match event {
                ScanEvent::Frame(scanned) => {
                    if self.deliver_frame(scanned, sink) {
                        delivered += 1;
                    }
                }
                ScanEvent::NonProtocol(bytes) => {
                    for item in self.text.extract(&bytes) {
                        self.deliver_text(item, sink);
                    }
                }
                ScanEvent::Corrupt {
                    identity,
                    length,
                    reason,
                } => {
                    match reason {
                        CorruptReason::Checksum => self.stats.checksum_failures += 1,
                        CorruptReason::Oversized => self.stats.oversized += 1,
                    }
                    sink.corrupt(identity, length, reason);
                }
            }
        }
        delivered
    }

    fn deliver_frame<S: EventSink + ?Sized>(&mut self, scanned: ScannedFrame, sink: &mut S) -> bool {
        let ScannedFrame { frame, raw } = scanned;
        self.stats.frames += 1;
        if frame.payload.is_empty() {
            self.stats.zero_length += 1;
        }
        sink.raw(&raw);

        match self.registry.decode_frame(&frame) {
            Ok(message) => {
                self.stats.decoded += 1;
                debug!(message = message.name(), length = frame.payload.len(), "message");
                sink.message(message);
                true
            }
            Err(err) => {
                match err {
                    MessageError::MalformedMessage { .. } => self.stats.malformed += 1,
                    _ => self.stats.unknown += 1,
                }
                debug!(identity = %frame.identity, %err, "undecodable frame");
                sink.undecodable(&frame, &err);
                false
            }
        }
    }

    fn deliver_text<S: EventSink + ?Sized>(&mut self, item: TextItem, sink: &mut S) {
        match &item {
            TextItem::Sentence(sentence) if sentence.checksum_ok() => self.stats.sentences += 1,
            TextItem::Sentence(_) => self.stats.bad_sentences += 1,
            TextItem::Unrecognized(bytes) => self.stats.unrecognized_bytes += bytes.len() as u64,
        }
        sink.text(item);
    }
}

#[cfg(test)]
mod tests {
    use bytes::BytesMut;
    use ubxprims_frame::encode_frame;
    use ubxprims_message::MessageId;

    use super::*;

    #[derive(Default)]
    struct Collect {
        messages: Vec<DecodedMessage>,
        undecodable: Vec<Identity>,
        text: Vec<TextItem>,
        raw: Vec<usize>,
        corrupt: Vec<(Identity, CorruptReason)>,
    }

    impl EventSink for Collect {
        fn message(&mut self, message: DecodedMessage) {
            self.messages.push(message);
        }

        fn undecodable(&mut self, frame: &Frame, _error: &MessageError) {
            self.undecodable.push(frame.identity);
        }

        fn text(&mut self, item: TextItem) {
            self.text.push(item);
        }

        fn raw(&mut self, bytes: &[u8]) {
            self.raw.push(bytes.len());
        }

        fn corrupt(&mut self, identity: Identity, _length: usize, reason: CorruptReason) {
            self.corrupt.push((identity, reason));
        }
    }

    fn reassembler() -> Reassembler {
        Reassembler::new(Arc::new(FormatRegistry::builtin().unwrap()))
    }

    fn frame(id: MessageId, payload: &[u8]) -> Vec<u8> {
        let mut out = BytesMut::new();
        encode_frame(id.identity(), payload, &mut out).unwrap();
        out.to_vec()
    }

    fn ack_for(class: u8, id: u8) -> Vec<u8> {
        frame(MessageId::AckAck, &[class, id])
    }

    #[test]
    fn decodes_every_split_point() {
        let bytes = ack_for(0x06, 0x00);
        for split in 0..=bytes.len() {
            let mut reassembler = reassembler();
            let mut sink = Collect::default();
            reassembler.feed(&bytes[..split], &mut sink);
            reassembler.feed(&bytes[split..], &mut sink);
            assert_eq!(sink.messages.len(), 1, "split at {split}");
            assert_eq!(sink.messages[0].id, MessageId::AckAck);
            assert_eq!(sink.raw, vec![10]);
        }
    }

    #[test]
    fn stray_sync_bytes_do_not_produce_messages() {
        let mut stream = ack_for(0x06, 0x00);
        stream.extend_from_slice(&[0x10, 0xB5, 0x62, 0x20, 0x30, 0x01, 0x00, 0x44]);
        stream.extend_from_slice(&ack_for(0x06, 0x01));

        let mut reassembler = reassembler();
        let mut sink = Collect::default();
        reassembler.feed(&stream, &mut sink);

        assert_eq!(sink.messages.len(), 2);
        assert_eq!(sink.messages[0].header.get_u64("msgID"), Some(0));
        assert_eq!(sink.messages[1].header.get_u64("msgID"), Some(1));
        assert_eq!(reassembler.stats().checksum_failures, 1);
        assert_eq!(reassembler.stats().decoded, 2);
    }

    #[test]
    fn nmea_between_frames_is_segregated() {
        let mut stream = b"$GPGGA,092750.000,5321.6802,N,00630.3372,W,1,8,1.03,61.7,M,55.2,M,,*76\r\n"
            .to_vec();
        stream.extend_from_slice(&ack_for(0x06, 0x00));
        stream.extend_from_slice(b"$GPTXT,bad*00\r\n");

        let mut reassembler = reassembler();
        let mut sink = Collect::default();
        reassembler.feed(&stream, &mut sink);

        assert_eq!(sink.messages.len(), 1);
        assert_eq!(sink.text.len(), 2);
        assert!(matches!(&sink.text[0], TextItem::Sentence(s) if s.checksum_ok()));
        assert_eq!(reassembler.stats().sentences, 1);
        assert_eq!(reassembler.stats().bad_sentences, 1);
    }

    #[test]
    fn unknown_and_malformed_frames_are_reported_not_fatal() {
        let mut stream = frame(MessageId::NavPvt, &[0u8; 10]);
        stream.extend_from_slice(&frame(MessageId::CfgPrt, &[0u8; 21]));
        let mut odd = BytesMut::new();
        encode_frame(Identity::new(0x77, 0x01), &[1], &mut odd).unwrap();
        stream.extend_from_slice(&odd);
        stream.extend_from_slice(&ack_for(0x06, 0x00));

        let mut reassembler = reassembler();
        let mut sink = Collect::default();
        let delivered = reassembler.feed(&stream, &mut sink);

        assert_eq!(delivered, 1);
        assert_eq!(sink.undecodable.len(), 3);
        assert_eq!(reassembler.stats().unknown, 2);
        assert_eq!(reassembler.stats().malformed, 1);
        assert_eq!(reassembler.stats().frames, 4);
    }

    #[test]
    fn zero_length_frame_decodes_to_empty_body() {
        let mut reassembler = reassembler();
        let mut sink = Collect::default();
        reassembler.feed(&frame(MessageId::AidData, &[]), &mut sink);
        assert_eq!(sink.messages.len(), 1);
        assert!(sink.messages[0].is_empty());
        assert_eq!(reassembler.stats().zero_length, 1);
    }

    #[test]
    fn finish_flushes_trailing_text() {
        let mut reassembler = reassembler();
        let mut sink = Collect::default();
        reassembler.feed(b"noise\xB5", &mut sink);
        assert!(reassembler.pending() > 0);
        reassembler.finish(&mut sink);
        assert_eq!(reassembler.pending(), 0);
        let total: usize = sink
            .text
            .iter()
            .map(|item| match item {
                TextItem::Unrecognized(bytes) => bytes.len(),
                TextItem::Sentence(s) => s.as_str().len(),
            })
            .sum();
        assert_eq!(total, 6);
    }

    #[test]
    fn handlers_receive_events() {
        use std::sync::Mutex;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let bytes = Arc::new(Mutex::new(0usize));
        let mut handlers = {
            let seen = Arc::clone(&seen);
            let bytes = Arc::clone(&bytes);
            Handlers::new()
                .on_message(move |msg| seen.lock().unwrap().push(msg.name()))
                .on_raw(move |raw| *bytes.lock().unwrap() += raw.len())
        };

        let mut reassembler = reassembler();
        reassembler.feed(&ack_for(0x06, 0x00), &mut handlers);
        assert_eq!(*seen.lock().unwrap(), vec!["ACK-ACK"]);
        assert_eq!(*bytes.lock().unwrap(), 10);
    }

    #[test]
    fn reset_drops_partial_frame() {
        let bytes = ack_for(0x06, 0x00);
        let mut reassembler = reassembler();
        let mut sink = Collect::default();
        reassembler.feed(&bytes[..5], &mut sink);
        assert!(matches!(reassembler.state(), ScanState::Accumulating { .. }));
        reassembler.reset();
        assert_eq!(reassembler.pending(), 0);
        reassembler.feed(&bytes, &mut sink);
        assert_eq!(sink.messages.len(), 1);
    }
}
