//! Background delivery: a thread that feeds link bytes into the session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, error};
use ubxprims_transport::{ByteSource, TransportError};

use crate::exchange::Shared;

/// Owns the reader thread; stops and joins it on drop.
#[derive(Debug)]
pub(crate) struct ReaderThread {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ReaderThread {
    pub fn spawn<S>(
        mut source: S,
        shared: Arc<Shared>,
        chunk_size: usize,
        idle: Duration,
    ) -> Result<Self, TransportError>
    where
        S: ByteSource + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        shared.reader_started();

        let spawned = thread::Builder::new()
            .name("ubxprims-reader".into())
            .spawn(move || {
                let mut buf = vec![0u8; chunk_size.max(1)];
                let mut failure = None;
                while !flag.load(Ordering::Relaxed) {
                    match source.read_chunk(&mut buf) {
                        Ok(0) => thread::sleep(idle),
                        Ok(n) => shared.feed(&buf[..n]),
                        Err(err) if err.is_idle() => thread::sleep(idle),
                        Err(err) => {
                            error!(%err, "reader stopped");
                            failure = Some(err);
                            break;
                        }
                    }
                }
                debug!("reader thread exiting");
                shared.reader_stopped(failure);
            });

        match spawned {
            Ok(handle) => Ok(Self {
                stop,
                handle: Some(handle),
            }),
            Err(err) => Err(TransportError::Io(err)),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for ReaderThread {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::time::Instant;

    use bytes::BytesMut;
    use ubxprims_frame::encode_frame;
    use ubxprims_message::{FormatRegistry, MessageId};
    use ubxprims_transport::Result as TransportResult;

    use super::*;
    use crate::reassembler::Reassembler;

    struct Failing;

    impl ByteSource for Failing {
        fn read_chunk(&mut self, _buf: &mut [u8]) -> TransportResult<usize> {
            Err(TransportError::Disconnected)
        }
    }

    fn shared() -> Arc<Shared> {
        let registry = Arc::new(FormatRegistry::builtin().unwrap());
        Arc::new(Shared::new(Reassembler::new(registry)))
    }

    fn wait_until(deadline: Duration, mut done: impl FnMut() -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < deadline {
            if done() {
                return true;
            }
            thread::sleep(Duration::from_millis(1));
        }
        done()
    }

    #[test]
    fn feeds_bytes_into_session() {
        let mut bytes = BytesMut::new();
        encode_frame(MessageId::AckAck.identity(), &[0x06, 0x00], &mut bytes).unwrap();
        let source = ubxprims_transport::IoTransport::new(Cursor::new(bytes.to_vec()));

        let shared = shared();
        let reader =
            ReaderThread::spawn(source, Arc::clone(&shared), 4, Duration::from_millis(1)).unwrap();
        assert!(wait_until(Duration::from_secs(2), || shared.stats().decoded == 1));
        drop(reader);
        assert!(!shared.lock().reader_running);
    }

    #[test]
    fn hard_error_is_recorded_and_thread_ends() {
        let shared = shared();
        let reader =
            ReaderThread::spawn(Failing, Arc::clone(&shared), 16, Duration::from_millis(1)).unwrap();
        assert!(wait_until(Duration::from_secs(2), || reader.is_finished()));
        let state = shared.lock();
        assert!(!state.reader_running);
        assert!(matches!(state.failure, Some(TransportError::Disconnected)));
    }
}
