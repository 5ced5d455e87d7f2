#![allow(dead_code)]

//! In-memory receiver for session tests.
//!
//! The receiver only understands the host when both sides use the same line
//! speed. Bytes sent at another speed are heard as noise.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use bytes::BytesMut;
use ubxprims_frame::{decode_frame, encode_frame, Identity};
use ubxprims_transport::{ByteSink, ByteSource, Result, SpeedControl, TransportError};

const CFG_PRT: Identity = Identity::new(0x06, 0x00);
const CFG_MSG: Identity = Identity::new(0x06, 0x01);
const MON_VER: Identity = Identity::new(0x0A, 0x04);
const ACK_ACK: Identity = Identity::new(0x05, 0x01);
const ACK_NACK: Identity = Identity::new(0x05, 0x00);

/// How the receiver answers configuration messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckMode {
    Ack,
    Nack,
    /// Apply the change but send the ACK at the new speed.
    Lost,
    /// ACK, but keep the old port settings.
    Ignore,
}

#[derive(Debug)]
struct Inner {
    receiver_rate: u32,
    host_rate: Option<u32>,
    /// Pending output, each chunk tagged with the speed it was sent at.
    outbox: VecDeque<(u32, Vec<u8>)>,
    silent: bool,
    ack_mode: AckMode,
    ack_other_first: bool,
    broken: bool,
    received: Vec<(Identity, usize)>,
}

/// Handle to a simulated receiver. Clones share the same device.
#[derive(Debug, Clone)]
pub struct SimReceiver {
    inner: Arc<Mutex<Inner>>,
}

impl SimReceiver {
    pub fn new(receiver_rate: u32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                receiver_rate,
                host_rate: None,
                outbox: VecDeque::new(),
                silent: false,
                ack_mode: AckMode::Ack,
                ack_other_first: false,
                broken: false,
                received: Vec::new(),
            })),
        }
    }

    pub fn silent(self) -> Self {
        self.inner.lock().unwrap().silent = true;
        self
    }

    pub fn ack_mode(self, mode: AckMode) -> Self {
        self.inner.lock().unwrap().ack_mode = mode;
        self
    }

    /// Send an ACK for CFG-MSG before every real acknowledgement.
    pub fn ack_other_first(self) -> Self {
        self.inner.lock().unwrap().ack_other_first = true;
        self
    }

    /// Make every later read fail.
    pub fn disconnect(&self) {
        self.inner.lock().unwrap().broken = true;
    }

    pub fn receiver_rate(&self) -> u32 {
        self.inner.lock().unwrap().receiver_rate
    }

    pub fn host_rate(&self) -> Option<u32> {
        self.inner.lock().unwrap().host_rate
    }

    /// Frames the receiver understood, as (identity, payload length).
    pub fn received(&self) -> Vec<(Identity, usize)> {
        self.inner.lock().unwrap().received.clone()
    }

    pub fn count(&self, identity: Identity, length: usize) -> usize {
        self.received()
            .iter()
            .filter(|(id, len)| *id == identity && *len == length)
            .count()
    }
}

impl Inner {
    fn emit(&mut self, identity: Identity, payload: &[u8]) {
        let mut out = BytesMut::new();
        encode_frame(identity, payload, &mut out).unwrap();
        self.outbox.push_back((self.receiver_rate, out.to_vec()));
    }

    fn acknowledge(&mut self, identity: Identity, positive: bool) {
        if self.ack_other_first {
            self.emit(ACK_ACK, &[CFG_MSG.class, CFG_MSG.id]);
        }
        let ack = if positive { ACK_ACK } else { ACK_NACK };
        self.emit(ack, &[identity.class, identity.id]);
    }

    fn port_block(&self) -> Vec<u8> {
        let mut block = vec![0u8; 20];
        block[0] = 1;
        block[4..8].copy_from_slice(&0x0000_08D0u32.to_le_bytes());
        block[8..12].copy_from_slice(&self.receiver_rate.to_le_bytes());
        block[12..14].copy_from_slice(&0x0007u16.to_le_bytes());
        block[14..16].copy_from_slice(&0x0003u16.to_le_bytes());
        block
    }

    fn handle(&mut self, identity: Identity, payload: &[u8]) {
        self.received.push((identity, payload.len()));
        if self.silent {
            return;
        }
        match (identity, payload.len()) {
            (CFG_PRT, 0) | (CFG_PRT, 1) => {
                let block = self.port_block();
                self.emit(CFG_PRT, &block);
            }
            (CFG_PRT, 20) => {
                let rate = u32::from_le_bytes([payload[8], payload[9], payload[10], payload[11]]);
                match self.ack_mode {
                    AckMode::Ack => {
                        self.acknowledge(identity, true);
                        self.receiver_rate = rate;
                    }
                    AckMode::Nack => self.acknowledge(identity, false),
                    AckMode::Lost => {
                        self.receiver_rate = rate;
                        self.acknowledge(identity, true);
                    }
                    AckMode::Ignore => self.acknowledge(identity, true),
                }
            }
            (MON_VER, 0) => {
                let mut payload = vec![0u8; 70];
                payload[..22].copy_from_slice(b"ROM CORE 3.01 (107888)");
                payload[30..38].copy_from_slice(b"00080000");
                payload[40..53].copy_from_slice(b"PROTVER 18.00");
                self.emit(MON_VER, &payload);
            }
            (id, len) if id.class == 0x06 && len > 0 => {
                let positive = self.ack_mode != AckMode::Nack;
                self.acknowledge(id, positive);
            }
            _ => {}
        }
    }
}

impl ByteSource for SimReceiver {
    fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut inner = self.inner.lock().unwrap();
        if inner.broken {
            return Err(TransportError::Disconnected);
        }
        let host_rate = inner.host_rate;
        let Some((rate, mut chunk)) = inner.outbox.pop_front() else {
            return Ok(0);
        };
        let n = buf.len().min(chunk.len()).min(64);
        if Some(rate) == host_rate {
            buf[..n].copy_from_slice(&chunk[..n]);
        } else {
            buf[..n].fill(0x00);
        }
        if n < chunk.len() {
            chunk.drain(..n);
            inner.outbox.push_front((rate, chunk));
        }
        Ok(n)
    }
}

impl ByteSink for SimReceiver {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.host_rate != Some(inner.receiver_rate) {
            return Ok(());
        }
        let mut rest = bytes;
        while let Ok((frame, used)) = decode_frame(rest) {
            inner.handle(frame.identity, &frame.payload);
            rest = &rest[used..];
        }
        Ok(())
    }
}

impl SpeedControl for SimReceiver {
    fn set_baud_rate(&mut self, rate: u32) -> Result<()> {
        self.inner.lock().unwrap().host_rate = Some(rate);
        Ok(())
    }

    fn baud_rate(&self) -> Option<u32> {
        self.inner.lock().unwrap().host_rate
    }
}
