use serde::Serialize;
use ubxprims_message::{FormatDescriptor, Layout};

use crate::cmd::{registry, CatalogArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_json, table, OutputFormat};

#[derive(Serialize)]
struct CatalogEntry {
    name: &'static str,
    class: u8,
    id: u8,
    layout: String,
    fields: Vec<&'static str>,
}

pub fn run(args: CatalogArgs, format: OutputFormat) -> CliResult<i32> {
    let registry = registry()?;
    let entries: Vec<CatalogEntry> = registry
        .descriptors()
        .into_iter()
        .filter(|desc| {
            args.class
                .as_deref()
                .is_none_or(|class| desc.id.class_name().eq_ignore_ascii_case(class))
        })
        .map(entry)
        .collect();

    match format {
        OutputFormat::Json => print_json(&entries),
        OutputFormat::Table => {
            let mut out = table(&["MESSAGE", "CLASS/ID", "LAYOUT", "FIELDS"]);
            for e in &entries {
                out.add_row(vec![
                    e.name.to_string(),
                    format!("0x{:02X}/0x{:02X}", e.class, e.id),
                    e.layout.clone(),
                    e.fields.len().to_string(),
                ]);
            }
            println!("{out}");
        }
        OutputFormat::Pretty => {
            for e in &entries {
                println!("{:<20} {}  {}", e.name, e.layout, e.fields.join(","));
            }
        }
    }
    Ok(SUCCESS)
}

fn entry(desc: &FormatDescriptor) -> CatalogEntry {
    let identity = desc.id.identity();
    let layout = match desc.layout {
        Layout::Fixed(block) => format!("fixed {}", block.len),
        Layout::Repeating { header, block } => format!("{} + {}*n", header.len, block.len),
    };
    let mut fields: Vec<&'static str> = desc.header().fields.iter().map(|f| f.name).collect();
    if let Some(block) = desc.repeat() {
        fields.extend(block.fields.iter().map(|f| f.name));
    }
    CatalogEntry {
        name: desc.id.name(),
        class: identity.class,
        id: identity.id,
        layout,
        fields,
    }
}
