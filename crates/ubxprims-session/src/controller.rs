//! Synchronous poll and configuration calls over a push-delivered stream.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};
use ubxprims_frame::{FrameWriter, Identity};
use ubxprims_message::{Ack, DecodedMessage, FormatRegistry, MessageError, MessageId, MessageKind};
use ubxprims_transport::{ByteSource, Transport, TransportError};

use crate::clock::{Clock, SystemClock};
use crate::config::{RetryPolicy, SessionConfig};
use crate::error::{Result, SessionError};
use crate::exchange::{Awaited, Outcome, PendingExchange, Shared};
use crate::reader::ReaderThread;
use crate::reassembler::{Handlers, Reassembler, ReassemblerStats};

/// How link bytes reach the reassembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The calling thread reads while it waits.
    Inline,
    /// A reader thread feeds the session; callers wait on a condition
    /// variable.
    Background,
}

/// Request/response controller for one receiver link.
///
/// At most one request is in flight. Messages that do not resolve it go to
/// the handlers installed with [`set_handlers`](Self::set_handlers).
pub struct Controller<T, C = SystemClock> {
    link: FrameWriter<T>,
    shared: Arc<Shared>,
    registry: Arc<FormatRegistry>,
    config: SessionConfig,
    clock: C,
    reader: Option<ReaderThread>,
    buf: Vec<u8>,
}

impl<T: Transport> Controller<T, SystemClock> {
    /// Inline delivery with default config.
    pub fn new(link: T, registry: Arc<FormatRegistry>) -> Self {
        Self::with_config(link, registry, SessionConfig::default())
    }

    /// Inline delivery with explicit config.
    pub fn with_config(link: T, registry: Arc<FormatRegistry>, config: SessionConfig) -> Self {
        let reassembler = Reassembler::with_config(Arc::clone(&registry), &config.frame);
        Self {
            link: FrameWriter::with_config(link, config.frame.clone()),
            shared: Arc::new(Shared::new(reassembler)),
            registry,
            buf: vec![0u8; config.frame.read_chunk_size.max(1)],
            config,
            clock: SystemClock,
            reader: None,
        }
    }

    /// Background delivery: `source` is read on its own thread (typically a
    /// clone of the link's device handle) and `link` is used only to write
    /// and to change line speed.
    pub fn spawn<S>(
        link: T,
        source: S,
        registry: Arc<FormatRegistry>,
        config: SessionConfig,
    ) -> Result<Self>
    where
        S: ByteSource + Send + 'static,
    {
        let mut controller = Self::with_config(link, registry, config);
        controller.reader = Some(ReaderThread::spawn(
            source,
            Arc::clone(&controller.shared),
            controller.config.frame.read_chunk_size,
            controller.config.idle_interval,
        )?);
        Ok(controller)
    }
}

impl<T: Transport, C: Clock> Controller<T, C> {
    /// Replace the time source.
    pub fn with_clock<D: Clock>(self, clock: D) -> Controller<T, D> {
        Controller {
            link: self.link,
            shared: self.shared,
            registry: self.registry,
            config: self.config,
            clock,
            reader: self.reader,
            buf: self.buf,
        }
    }

    pub fn delivery(&self) -> Delivery {
        if self.reader.is_some() {
            Delivery::Background
        } else {
            Delivery::Inline
        }
    }

    /// Install the observers for messages no request is waiting for.
    pub fn set_handlers(&mut self, handlers: Handlers) {
        self.shared.set_handlers(handlers);
    }

    /// Request `id` with an empty payload using the session retry policy.
    pub fn poll(&mut self, id: MessageId) -> Result<DecodedMessage> {
        self.poll_with(id, &[], self.config.retry)
    }

    /// Request `id` with `payload`, waiting for a message of exactly that type.
    pub fn poll_with(
        &mut self,
        id: MessageId,
        payload: &[u8],
        policy: RetryPolicy,
    ) -> Result<DecodedMessage> {
        match self.exchange(id.identity(), payload, Awaited::Reply(id), policy)? {
            Outcome::Reply(message) => Ok(message),
            Outcome::Ack(_) => Err(MessageError::UnexpectedMessage {
                expected: id.name(),
                found: MessageId::AckAck.name(),
            }
            .into()),
        }
    }

    /// Send a configuration message using the session retry policy.
    pub fn configure(&mut self, id: MessageId, payload: &[u8]) -> Result<Ack> {
        self.send_configuration(id, payload, self.config.retry)
    }

    /// Send a configuration message and wait for its acknowledgement.
    ///
    /// Acknowledgements naming another message are passed to the handlers
    /// and the wait continues. ACK-NACK fails with
    /// [`SessionError::Rejected`].
    pub fn send_configuration(
        &mut self,
        id: MessageId,
        payload: &[u8],
        policy: RetryPolicy,
    ) -> Result<Ack> {
        let identity = id.identity();
        match self.exchange(identity, payload, Awaited::Ack(identity), policy)? {
            Outcome::Ack(ack) if ack.positive => {
                info!(message = id.name(), "configuration acknowledged");
                Ok(ack)
            }
            Outcome::Ack(ack) => {
                warn!(message = id.name(), "configuration rejected");
                Err(SessionError::Rejected {
                    request: id.name().to_string(),
                    acknowledged: ack.acknowledged,
                })
            }
            Outcome::Reply(message) => Err(MessageError::UnexpectedMessage {
                expected: MessageId::AckAck.name(),
                found: message.name(),
            }
            .into()),
        }
    }

    /// Write a frame without waiting for anything (e.g. CFG-RST, which the
    /// receiver never acknowledges).
    pub fn send(&mut self, identity: Identity, payload: &[u8]) -> Result<()> {
        self.write(identity, payload)
    }

    /// Deliver incoming messages to the handlers for `duration`.
    pub fn listen(&mut self, duration: Duration) -> Result<()> {
        let deadline = self.clock.now() + duration;
        self.wait(deadline).map(|_| ())
    }

    /// Change the local line speed and drop bytes received at the old one.
    pub fn set_baud_rate(&mut self, rate: u32) -> Result<()> {
        self.link.get_mut().set_baud_rate(rate)?;
        self.shared.reset_stream();
        debug!(rate, "local line speed changed");
        Ok(())
    }

    pub fn baud_rate(&self) -> Option<u32> {
        self.link.get_ref().baud_rate()
    }

    /// Flush partial input through the handlers.
    pub fn finish(&mut self) {
        self.shared.finish();
    }

    pub fn stats(&self) -> ReassemblerStats {
        self.shared.stats()
    }

    pub fn registry(&self) -> &Arc<FormatRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn get_ref(&self) -> &T {
        self.link.get_ref()
    }

    pub fn get_mut(&mut self) -> &mut T {
        self.link.get_mut()
    }

    /// Stop any reader thread and return the link.
    pub fn into_inner(self) -> T {
        drop(self.reader);
        self.link.into_inner()
    }

    fn exchange(
        &mut self,
        identity: Identity,
        payload: &[u8],
        awaited: Awaited,
        policy: RetryPolicy,
    ) -> Result<Outcome> {
        let attempts = policy.attempts();
        for attempt in 1..=attempts {
            let deadline = self.clock.now() + policy.timeout;
            self.shared
                .begin(PendingExchange::new(awaited, deadline, attempt));
            info!(request = %MessageKind::of(identity), %awaited, attempt, attempts, "sending request");

            let result = self
                .write(identity, payload)
                .and_then(|()| self.wait(deadline));
            match result {
                Ok(Some(outcome)) => return Ok(outcome),
                Ok(None) => warn!(
                    %awaited,
                    attempt,
                    timeout_ms = policy.timeout.as_millis() as u64,
                    "no reply before deadline"
                ),
                Err(err) => {
                    self.shared.abandon();
                    return Err(err);
                }
            }
        }

        self.shared.abandon();
        Err(SessionError::NoResponse {
            request: awaited.to_string(),
            attempts,
        })
    }

    fn write(&mut self, identity: Identity, payload: &[u8]) -> Result<()> {
        self.link.send(identity, payload)?;
        Ok(())
    }

    /// Wait until the pending exchange resolves or `deadline` passes.
    fn wait(&mut self, deadline: Instant) -> Result<Option<Outcome>> {
        if self.reader.is_some() {
            self.wait_background(deadline)
        } else {
            self.wait_inline(deadline)
        }
    }

    fn wait_inline(&mut self, deadline: Instant) -> Result<Option<Outcome>> {
        loop {
            if let Some(outcome) = Shared::take_outcome(&mut self.shared.lock()) {
                return Ok(Some(outcome));
            }
            if self.clock.now() >= deadline {
                return Ok(None);
            }
            match self.link.get_mut().read_chunk(&mut self.buf) {
                Ok(0) => self.clock.sleep(self.config.idle_interval),
                Ok(n) => self.shared.feed(&self.buf[..n]),
                Err(err) if err.is_idle() => self.clock.sleep(self.config.idle_interval),
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn wait_background(&mut self, deadline: Instant) -> Result<Option<Outcome>> {
        let mut state = self.shared.lock();
        loop {
            if let Some(outcome) = Shared::take_outcome(&mut state) {
                return Ok(Some(outcome));
            }
            if let Some(err) = state.failure.take() {
                return Err(err.into());
            }
            if !state.reader_running {
                return Err(TransportError::Disconnected.into());
            }
            let now = self.clock.now();
            if now >= deadline {
                return Ok(None);
            }
            let slice = (deadline - now).min(self.config.idle_interval.max(Duration::from_millis(1)));
            state = self.clock.wait(self.shared.signal(), state, slice);
        }
    }
}

impl<T: Transport, C: Clock> std::fmt::Debug for Controller<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("delivery", &self.delivery())
            .field(
                "reader_finished",
                &self.reader.as_ref().map(ReaderThread::is_finished),
            )
            .field("retry", &self.config.retry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use bytes::BytesMut;
    use ubxprims_frame::{encode_frame, FrameConfig, FrameError, MAX_PAYLOAD};
    use ubxprims_transport::{ByteSink, Result as TransportResult, SpeedControl};

    use super::*;
    use crate::clock::ManualClock;

    /// Replies from a script, one list per written frame.
    #[derive(Default)]
    struct Scripted {
        replies: VecDeque<Vec<u8>>,
        inbox: VecDeque<u8>,
        written: Vec<Vec<u8>>,
        rate: Option<u32>,
        fail_reads: bool,
    }

    impl Scripted {
        fn reply(mut self, bytes: Vec<u8>) -> Self {
            self.replies.push_back(bytes);
            self
        }
    }

    impl ByteSource for Scripted {
        fn read_chunk(&mut self, buf: &mut [u8]) -> TransportResult<usize> {
            if self.fail_reads {
                return Err(TransportError::Disconnected);
            }
            let n = buf.len().min(self.inbox.len()).min(7);
            for slot in buf.iter_mut().take(n) {
                *slot = self.inbox.pop_front().unwrap_or_default();
            }
            Ok(n)
        }
    }

    impl ByteSink for Scripted {
        fn write_bytes(&mut self, bytes: &[u8]) -> TransportResult<()> {
            self.written.push(bytes.to_vec());
            if let Some(reply) = self.replies.pop_front() {
                self.inbox.extend(reply);
            }
            Ok(())
        }
    }

    impl SpeedControl for Scripted {
        fn set_baud_rate(&mut self, rate: u32) -> TransportResult<()> {
            self.rate = Some(rate);
            Ok(())
        }

        fn baud_rate(&self) -> Option<u32> {
            self.rate
        }
    }

    fn frame(id: MessageId, payload: &[u8]) -> Vec<u8> {
        let mut out = BytesMut::new();
        encode_frame(id.identity(), payload, &mut out).unwrap();
        out.to_vec()
    }

    fn controller(link: Scripted) -> Controller<Scripted, ManualClock> {
        let registry = Arc::new(FormatRegistry::builtin().unwrap());
        Controller::new(link, registry).with_clock(ManualClock::new())
    }

    #[test]
    fn poll_returns_matching_reply() {
        let mut reply = frame(MessageId::NavPvt, &[0u8; 10]);
        reply.extend(frame(MessageId::MonVer, &[0u8; 40]));
        let mut controller = controller(Scripted::default().reply(reply));

        let message = controller.poll(MessageId::MonVer).unwrap();
        assert_eq!(message.id, MessageId::MonVer);
        assert_eq!(controller.get_ref().written, vec![frame(MessageId::MonVer, &[])]);
        assert_eq!(controller.stats().unknown, 1);
    }

    #[test]
    fn poll_retries_then_gives_up() {
        let mut controller = controller(Scripted::default());
        let policy = RetryPolicy::new(2, Duration::from_millis(500));

        let err = controller.poll_with(MessageId::MonVer, &[], policy).unwrap_err();
        assert!(matches!(err, SessionError::NoResponse { attempts: 3, .. }));
        assert_eq!(controller.get_ref().written.len(), 3);
        assert!(controller.clock().elapsed() >= Duration::from_millis(1500));
    }

    #[test]
    fn reply_on_second_attempt() {
        let link = Scripted::default()
            .reply(Vec::new())
            .reply(frame(MessageId::MonVer, &[0u8; 40]));
        let mut controller = controller(link);
        let message = controller
            .poll_with(MessageId::MonVer, &[], RetryPolicy::new(3, Duration::from_millis(100)))
            .unwrap();
        assert_eq!(message.id, MessageId::MonVer);
        assert_eq!(controller.get_ref().written.len(), 2);
    }

    #[test]
    fn ack_for_other_message_is_forwarded_and_wait_continues() {
        let mut reply = frame(MessageId::AckAck, &[0x06, 0x01]);
        reply.extend(frame(MessageId::AckAck, &[0x06, 0x08]));
        let mut controller = controller(Scripted::default().reply(reply));

        let forwarded = Arc::new(Mutex::new(Vec::new()));
        {
            let forwarded = Arc::clone(&forwarded);
            controller.set_handlers(Handlers::new().on_message(move |msg| {
                forwarded
                    .lock()
                    .unwrap()
                    .push(msg.header.get_u64("msgID").unwrap_or_default())
            }));
        }

        let ack = controller
            .send_configuration(MessageId::CfgRate, &[0xE8, 0x03, 1, 0, 0, 0], RetryPolicy::default())
            .unwrap();
        assert!(ack.positive);
        assert_eq!(ack.acknowledged, MessageId::CfgRate.identity());
        assert_eq!(*forwarded.lock().unwrap(), vec![0x01]);
        assert_eq!(controller.get_ref().written.len(), 1);
    }

    #[test]
    fn nack_is_rejected_without_retry() {
        let link = Scripted::default().reply(frame(MessageId::AckNack, &[0x06, 0x08]));
        let mut controller = controller(link);
        let err = controller
            .configure(MessageId::CfgRate, &[0xE8, 0x03, 1, 0, 0, 0])
            .unwrap_err();
        match err {
            SessionError::Rejected { request, acknowledged } => {
                assert_eq!(request, "CFG-RATE");
                assert_eq!(acknowledged, Identity::new(0x06, 0x08));
            }
            other => panic!("unexpected error {other}"),
        }
        assert_eq!(controller.get_ref().written.len(), 1);
    }

    #[test]
    fn transport_error_is_not_retried() {
        let link = Scripted {
            fail_reads: true,
            ..Scripted::default()
        };
        let mut controller = controller(link);
        let err = controller.poll(MessageId::MonVer).unwrap_err();
        assert!(matches!(err, SessionError::Transport(TransportError::Disconnected)));
        assert_eq!(controller.get_ref().written.len(), 1);
    }

    #[test]
    fn baud_change_drops_buffered_bytes() {
        let reply = frame(MessageId::MonVer, &[0u8; 40]);
        let mut controller = controller(Scripted::default());
        controller.shared.feed(&reply[..10]);
        controller.set_baud_rate(115_200).unwrap();
        assert_eq!(controller.baud_rate(), Some(115_200));
        assert_eq!(controller.shared.lock().reassembler.pending(), 0);
    }

    #[test]
    fn listen_passes_everything_to_handlers() {
        let mut link = Scripted::default();
        link.inbox.extend(frame(MessageId::AckAck, &[1, 2]));
        link.inbox.extend(b"$GPTXT,bad*00\r\n".iter().copied());
        let mut controller = controller(link);

        let count = Arc::new(Mutex::new((0usize, 0usize)));
        {
            let messages = Arc::clone(&count);
            let text = Arc::clone(&count);
            controller.set_handlers(
                Handlers::new()
                    .on_message(move |_| messages.lock().unwrap().0 += 1)
                    .on_text(move |_| text.lock().unwrap().1 += 1),
            );
        }
        controller.listen(Duration::from_millis(50)).unwrap();
        assert_eq!(*count.lock().unwrap(), (1, 1));
        assert_eq!(controller.delivery(), Delivery::Inline);
    }

    #[test]
    fn oversized_payload_is_refused_before_writing() {
        let mut controller = controller(Scripted::default());
        let err = controller
            .send(Identity::new(0x06, 0x00), &vec![0u8; MAX_PAYLOAD + 1])
            .unwrap_err();
        assert!(matches!(err, SessionError::Frame(_)));
        assert!(controller.get_ref().written.is_empty());
    }

    #[test]
    fn writes_respect_configured_payload_limit() {
        let config = SessionConfig {
            frame: FrameConfig {
                max_payload_size: 8,
                ..FrameConfig::default()
            },
            ..SessionConfig::default()
        };
        let registry = Arc::new(FormatRegistry::builtin().unwrap());
        let mut controller = Controller::with_config(Scripted::default(), registry, config)
            .with_clock(ManualClock::new());

        let err = controller.send(MessageId::CfgMsg.identity(), &[0u8; 9]).unwrap_err();
        assert!(matches!(
            err,
            SessionError::Frame(FrameError::PayloadTooLarge { size: 9, max: 8 })
        ));
        assert!(controller.get_ref().written.is_empty());

        controller.send(MessageId::CfgMsg.identity(), &[0u8; 8]).unwrap();
        assert_eq!(controller.get_ref().written, vec![frame(MessageId::CfgMsg, &[0u8; 8])]);
    }
}
