use ubxprims_message::{MessageId, VersionInfo};

use crate::cmd::LinkArgs;
use crate::exit::{message_error, session_error, CliResult, SUCCESS};
use crate::output::{print_json, table, OutputFormat};

pub fn run(link: &LinkArgs, format: OutputFormat) -> CliResult<i32> {
    let mut controller = link.open()?;
    let message = controller
        .poll(MessageId::MonVer)
        .map_err(|err| session_error("version poll failed", err))?;
    let version =
        VersionInfo::from_message(&message).map_err(|err| message_error("MON-VER", err))?;

    print_version(&version, format);
    Ok(SUCCESS)
}

fn print_version(version: &VersionInfo, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(version),
        OutputFormat::Table => {
            let mut out = table(&["ITEM", "VALUE"]);
            out.add_row(vec!["software", version.software.as_str()]);
            out.add_row(vec!["hardware", version.hardware.as_str()]);
            for extension in &version.extensions {
                out.add_row(vec!["extension", extension.as_str()]);
            }
            println!("{out}");
        }
        OutputFormat::Pretty => {
            println!("Software version: {}", version.software);
            println!("Hardware version: {}", version.hardware);
            for extension in &version.extensions {
                println!("  {extension}");
            }
        }
    }
}
