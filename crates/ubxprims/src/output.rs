use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use ubxprims_message::{DecodedMessage, Record};

#[derive(Clone, Debug, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.to_vec());
    table
}

pub fn print_message(message: &DecodedMessage, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(message),
        OutputFormat::Table => {
            let mut table = table(&["FIELD", "VALUE"]);
            for (name, value) in fields(message) {
                table.add_row(vec![name, value]);
            }
            println!("{}", message.name());
            println!("{table}");
        }
        OutputFormat::Pretty => println!("{}", pretty_line(message)),
    }
}

/// One line: the message name followed by `field=value` pairs.
pub fn pretty_line(message: &DecodedMessage) -> String {
    let mut line = message.name().to_string();
    for (name, value) in fields(message) {
        line.push(' ');
        line.push_str(&name);
        line.push('=');
        line.push_str(&value);
    }
    line
}

/// Header fields by name, block fields as `name[i]`.
fn fields(message: &DecodedMessage) -> Vec<(String, String)> {
    let mut out = record_fields(&message.header, None);
    for (index, block) in message.blocks.iter().enumerate() {
        out.extend(record_fields(block, Some(index)));
    }
    out
}

fn record_fields(record: &Record, index: Option<usize>) -> Vec<(String, String)> {
    record
        .iter()
        .filter(|(name, _)| !name.starts_with("reserved"))
        .map(|(name, value)| {
            let name = match index {
                Some(i) => format!("{name}[{i}]"),
                None => name.to_string(),
            };
            (name, value.to_string())
        })
        .collect()
}
