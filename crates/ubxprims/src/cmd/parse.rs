use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;

use serde::Serialize;
use tracing::warn;
use ubxprims_frame::{CorruptReason, Frame, FrameConfig, Identity, TextItem};
use ubxprims_message::{DecodedMessage, MessageError, MessageKind};
use ubxprims_session::{EventSink, Reassembler, ReassemblerStats};

use crate::cmd::{registry, ParseArgs};
use crate::exit::{io_error, CliResult, SUCCESS};
use crate::output::{print_json, print_message, table, OutputFormat};

#[derive(Serialize)]
struct ParseSummary {
    file: String,
    counts: BTreeMap<String, u64>,
    stats: ReassemblerStats,
}

/// Tallies messages by name and optionally prints each one.
struct Tally {
    counts: BTreeMap<String, u64>,
    print: Option<OutputFormat>,
}

impl Tally {
    fn bump(&mut self, name: String) {
        *self.counts.entry(name).or_default() += 1;
    }
}

impl EventSink for Tally {
    fn message(&mut self, message: DecodedMessage) {
        if let Some(format) = self.print {
            print_message(&message, format);
        }
        self.bump(message.name().to_string());
    }

    fn undecodable(&mut self, frame: &Frame, error: &MessageError) {
        warn!(%error, "frame not decoded");
        self.bump(MessageKind::of(frame.identity).to_string());
    }

    fn text(&mut self, item: TextItem) {
        if let TextItem::Sentence(sentence) = item {
            self.bump(format!("${}", sentence.address()));
        }
    }

    fn corrupt(&mut self, identity: Identity, length: usize, reason: CorruptReason) {
        warn!(%identity, length, ?reason, "discarded frame candidate");
    }
}

pub fn run(args: ParseArgs, format: OutputFormat) -> CliResult<i32> {
    let display = args.path.display().to_string();
    let mut file =
        File::open(&args.path).map_err(|err| io_error(&format!("failed opening {display}"), err))?;

    let frame_config = FrameConfig::default();
    let mut reassembler = Reassembler::with_config(registry()?, &frame_config);
    let mut tally = Tally {
        counts: BTreeMap::new(),
        print: args.messages.then_some(format),
    };

    let mut buf = vec![0u8; frame_config.read_chunk_size];
    loop {
        let n = file
            .read(&mut buf)
            .map_err(|err| io_error(&format!("failed reading {display}"), err))?;
        if n == 0 {
            break;
        }
        reassembler.feed(&buf[..n], &mut tally);
    }
    reassembler.finish(&mut tally);

    let summary = ParseSummary {
        file: display,
        counts: tally.counts,
        stats: *reassembler.stats(),
    };
    print_summary(&summary, format);
    Ok(SUCCESS)
}

fn print_summary(summary: &ParseSummary, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(summary),
        OutputFormat::Table => {
            let mut out = table(&["MESSAGE", "COUNT"]);
            for (name, count) in &summary.counts {
                out.add_row(vec![name.clone(), count.to_string()]);
            }
            println!("{out}");
            print_stats(&summary.stats);
        }
        OutputFormat::Pretty => {
            for (name, count) in &summary.counts {
                println!("{name}: {count}");
            }
            print_stats(&summary.stats);
        }
    }
}

fn print_stats(stats: &ReassemblerStats) {
    println!(
        "{} bytes, {} frames ({} decoded), {} checksum failures, {} unknown, {} malformed, {} sentences",
        stats.bytes,
        stats.frames,
        stats.decoded,
        stats.checksum_failures,
        stats.unknown,
        stats.malformed,
        stats.sentences
    );
}
