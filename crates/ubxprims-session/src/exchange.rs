//! The single outstanding request and the state shared with the reader.

use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tracing::{debug, trace};
use ubxprims_frame::{CorruptReason, Frame, Identity, TextItem};
use ubxprims_message::{Ack, DecodedMessage, MessageError, MessageId, MessageKind};
use ubxprims_transport::TransportError;

use crate::reassembler::{EventSink, Handlers, Reassembler, ReassemblerStats};

/// What the pending request is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Awaited {
    /// Any message of exactly this type.
    Reply(MessageId),
    /// ACK-ACK or ACK-NACK naming this identity.
    Ack(Identity),
}

impl Awaited {
    fn accepts(&self, message: &DecodedMessage) -> Option<Outcome> {
        match *self {
            Awaited::Reply(id) => (message.id == id).then(|| Outcome::Reply(message.clone())),
            Awaited::Ack(identity) => {
                if !matches!(message.id, MessageId::AckAck | MessageId::AckNack) {
                    return None;
                }
                match Ack::from_message(message) {
                    Ok(ack) if ack.acknowledges(identity) => Some(Outcome::Ack(ack)),
                    Ok(ack) => {
                        debug!(
                            awaiting = %identity,
                            acknowledged = %ack.acknowledged,
                            "ignoring acknowledgement for another message"
                        );
                        None
                    }
                    Err(_) => None,
                }
            }
        }
    }
}

impl fmt::Display for Awaited {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Awaited::Reply(id) => write!(f, "{id}"),
            Awaited::Ack(identity) => write!(f, "ACK for {}", MessageKind::of(*identity)),
        }
    }
}

/// How a pending request was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Reply(DecodedMessage),
    Ack(Ack),
}

/// The controller's only cross-call state: one request in flight.
#[derive(Debug, Clone)]
pub struct PendingExchange {
    pub awaited: Awaited,
    pub deadline: Instant,
    /// 1-based attempt number.
    pub attempt: u32,
    pub outcome: Option<Outcome>,
}

impl PendingExchange {
    pub fn new(awaited: Awaited, deadline: Instant, attempt: u32) -> Self {
        Self {
            awaited,
            deadline,
            attempt,
            outcome: None,
        }
    }

    /// Claim `message` if it resolves this exchange; otherwise hand it back.
    pub fn offer(&mut self, message: DecodedMessage) -> Option<DecodedMessage> {
        if self.outcome.is_some() {
            return Some(message);
        }
        match self.awaited.accepts(&message) {
            Some(outcome) => {
                trace!(awaited = %self.awaited, attempt = self.attempt, "exchange resolved");
                self.outcome = Some(outcome);
                None
            }
            None => Some(message),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Routes reassembler output: the pending exchange first, handlers second.
struct Dispatch<'a> {
    pending: &'a mut Option<PendingExchange>,
    handlers: &'a mut Handlers,
}

impl EventSink for Dispatch<'_> {
    fn message(&mut self, message: DecodedMessage) {
        let unclaimed = match self.pending.as_mut() {
            Some(pending) => pending.offer(message),
            None => Some(message),
        };
        if let Some(message) = unclaimed {
            self.handlers.message(message);
        }
    }

    fn undecodable(&mut self, frame: &Frame, error: &MessageError) {
        self.handlers.undecodable(frame, error);
    }

    fn text(&mut self, item: TextItem) {
        self.handlers.text(item);
    }

    fn raw(&mut self, bytes: &[u8]) {
        self.handlers.raw(bytes);
    }

    fn corrupt(&mut self, identity: Identity, length: usize, reason: CorruptReason) {
        self.handlers.corrupt(identity, length, reason);
    }
}

/// Everything behind the session mutex.
#[derive(Debug)]
pub(crate) struct State {
    pub reassembler: Reassembler,
    pub pending: Option<PendingExchange>,
    pub handlers: Handlers,
    /// Error that stopped the background reader, not yet reported.
    pub failure: Option<TransportError>,
    pub reader_running: bool,
}

/// Buffer, pending slot and handlers under one mutex, plus the signal from
/// the decode path to a waiting caller.
#[derive(Debug)]
pub(crate) struct Shared {
    state: Mutex<State>,
    signal: Condvar,
}

impl Shared {
    pub fn new(reassembler: Reassembler) -> Self {
        Self {
            state: Mutex::new(State {
                reassembler,
                pending: None,
                handlers: Handlers::new(),
                failure: None,
                reader_running: false,
            }),
            signal: Condvar::new(),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn signal(&self) -> &Condvar {
        &self.signal
    }

    /// Push link bytes through the reassembler and wake any waiter.
    pub fn feed(&self, chunk: &[u8]) {
        let mut state = self.lock();
        let State {
            reassembler,
            pending,
            handlers,
            ..
        } = &mut *state;
        let mut dispatch = Dispatch { pending, handlers };
        reassembler.feed(chunk, &mut dispatch);
        let resolved = state.pending.as_ref().is_some_and(PendingExchange::is_resolved);
        drop(state);
        if resolved {
            self.signal.notify_all();
        }
    }

    /// Flush the reassembler at end of input.
    pub fn finish(&self) {
        let mut state = self.lock();
        let State {
            reassembler,
            pending,
            handlers,
            ..
        } = &mut *state;
        reassembler.finish(&mut Dispatch { pending, handlers });
    }

    pub fn begin(&self, exchange: PendingExchange) {
        self.lock().pending = Some(exchange);
    }

    pub fn abandon(&self) {
        self.lock().pending = None;
    }

    /// Take the outcome if the pending exchange is resolved.
    pub fn take_outcome(state: &mut State) -> Option<Outcome> {
        if state.pending.as_ref().is_some_and(PendingExchange::is_resolved) {
            state.pending.take().and_then(|pending| pending.outcome)
        } else {
            None
        }
    }

    pub fn set_handlers(&self, handlers: Handlers) {
        self.lock().handlers = handlers;
    }

    pub fn reset_stream(&self) {
        self.lock().reassembler.reset();
    }

    pub fn stats(&self) -> ReassemblerStats {
        *self.lock().reassembler.stats()
    }

    pub fn reader_started(&self) {
        self.lock().reader_running = true;
    }

    /// Record why the background reader stopped and wake any waiter.
    pub fn reader_stopped(&self, failure: Option<TransportError>) {
        let mut state = self.lock();
        state.reader_running = false;
        if failure.is_some() {
            state.failure = failure;
        }
        drop(state);
        self.signal.notify_all();
    }
}
