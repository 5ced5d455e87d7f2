use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::info;
use ubxprims_frame::TextItem;
use ubxprims_message::{DecodedMessage, MessageId};
use ubxprims_session::{Controller, Handlers};

use crate::cmd::{message_id, registry, LinkArgs, StreamArgs};
use crate::exit::{session_error, transport_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_message, OutputFormat};

/// How often the main thread prints queued output and checks for Ctrl-C and
/// the exit conditions.
const TICK: Duration = Duration::from_millis(200);

/// Output handed from the decode path to the printing loop.
enum Event {
    Message(DecodedMessage),
    Sentence(String),
}

pub fn run(args: StreamArgs, link: &LinkArgs, format: OutputFormat) -> CliResult<i32> {
    let filter = args
        .messages
        .as_deref()
        .map(|names| {
            names
                .iter()
                .map(|name| message_id(name))
                .collect::<CliResult<Vec<_>>>()
        })
        .transpose()?;

    let transport = link.open_transport()?;
    let source = transport
        .try_clone()
        .map_err(|err| transport_error("clone failed", err))?;
    let mut controller =
        Controller::spawn(transport, source, registry()?, link.session_config())
            .map_err(|err| session_error("reader start failed", err))?;

    let (events, queue) = mpsc::channel();
    let frame_bytes = Arc::new(AtomicU64::new(0));
    controller.set_handlers(handlers(filter, args.nmea, events, &frame_bytes));

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let started = Instant::now();
    let mut printed = 0;
    while running.load(Ordering::SeqCst) {
        controller
            .listen(TICK)
            .map_err(|err| session_error("stream failed", err))?;
        printed += drain(&queue, format, args.count.map(|count| count.saturating_sub(printed)));
        if args.count.is_some_and(|count| printed >= count) {
            break;
        }
        if args.duration.is_some_and(|limit| started.elapsed() >= limit) {
            break;
        }
    }

    let elapsed = started.elapsed().as_secs_f64();
    let bytes = frame_bytes.load(Ordering::SeqCst);
    let stats = controller.stats();
    info!(
        frames = stats.frames,
        checksum_failures = stats.checksum_failures,
        sentences = stats.sentences,
        bytes_per_second = if elapsed > 0.0 { bytes as f64 / elapsed } else { 0.0 },
        "stream finished"
    );
    Ok(SUCCESS)
}

fn handlers(
    filter: Option<Vec<MessageId>>,
    nmea: bool,
    events: Sender<Event>,
    frame_bytes: &Arc<AtomicU64>,
) -> Handlers {
    let text_events = events.clone();
    let frame_bytes = Arc::clone(frame_bytes);
    // A closed queue means the printing loop is gone; dropping is fine.
    Handlers::new()
        .on_message(move |message: &DecodedMessage| {
            if filter.as_ref().is_none_or(|ids| ids.contains(&message.id)) {
                let _ = events.send(Event::Message(message.clone()));
            }
        })
        .on_text(move |item: &TextItem| {
            if let TextItem::Sentence(sentence) = item {
                if nmea && sentence.checksum_ok() {
                    let _ = text_events.send(Event::Sentence(sentence.as_str().to_string()));
                }
            }
        })
        .on_raw(move |bytes: &[u8]| {
            frame_bytes.fetch_add(bytes.len() as u64, Ordering::SeqCst);
        })
}

/// Print everything queued so far, stopping after `limit` messages. Returns
/// the number of messages printed.
fn drain(queue: &Receiver<Event>, format: OutputFormat, limit: Option<usize>) -> usize {
    let mut printed = 0;
    while limit.is_none_or(|limit| printed < limit) {
        match queue.try_recv() {
            Ok(Event::Message(message)) => {
                print_message(&message, format);
                printed += 1;
            }
            Ok(Event::Sentence(line)) => println!("{line}"),
            Err(_) => break,
        }
    }
    printed
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}

#[cfg(test)]
mod tests {
    use bytes::BytesMut;
    use ubxprims_frame::encode_frame;
    use ubxprims_session::Reassembler;

    use super::*;

    fn frame(id: MessageId, payload: &[u8]) -> Vec<u8> {
        let mut out = BytesMut::new();
        encode_frame(id.identity(), payload, &mut out).unwrap();
        out.to_vec()
    }

    #[test]
    fn decode_path_only_queues_output() {
        let (events, queue) = mpsc::channel();
        let frame_bytes = Arc::new(AtomicU64::new(0));
        let mut sink = handlers(Some(vec![MessageId::AckAck]), true, events, &frame_bytes);

        let mut stream = b"$GPTXT,f*05\r\n".to_vec();
        stream.extend(frame(MessageId::AckAck, &[0x06, 0x08]));
        stream.extend(frame(MessageId::CfgRate, &[0xE8, 0x03, 0x01, 0x00, 0x00, 0x00]));
        let mut reassembler = Reassembler::new(registry().unwrap());
        reassembler.feed(&stream, &mut sink);

        let queued: Vec<Event> = queue.try_iter().collect();
        assert_eq!(queued.len(), 2);
        assert!(matches!(&queued[0], Event::Sentence(line) if line == "$GPTXT,f*05"));
        assert!(matches!(&queued[1], Event::Message(m) if m.id == MessageId::AckAck));
        assert_eq!(frame_bytes.load(Ordering::SeqCst), 10 + 14);
    }

    #[test]
    fn drain_stops_at_the_message_limit() {
        let (events, queue) = mpsc::channel();
        for _ in 0..3 {
            events
                .send(Event::Message(DecodedMessage::empty(MessageId::NavPvt)))
                .unwrap();
        }

        assert_eq!(drain(&queue, OutputFormat::Pretty, Some(2)), 2);
        assert_eq!(drain(&queue, OutputFormat::Pretty, None), 1);
        assert_eq!(drain(&queue, OutputFormat::Pretty, None), 0);
    }
}
