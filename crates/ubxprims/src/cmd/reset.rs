use ubxprims_message::masks::{build_mask, value_of, NAV_BBR_SECTIONS, RESET_MODES};
use ubxprims_message::{MessageId, Record, StartType};

use crate::cmd::{registry, LinkArgs, ResetArgs};
use crate::exit::{message_error, session_error, CliError, CliResult, SUCCESS, USAGE};

pub fn run(args: ResetArgs, link: &LinkArgs) -> CliResult<i32> {
    let nav_bbr_mask = nav_bbr_mask(&args)?;
    let reset_mode = value_of(&args.mode, RESET_MODES).map_err(|err| message_error("--mode", err))?;

    let record = Record::new()
        .with("navBbrMask", nav_bbr_mask)
        .with("resetMode", reset_mode);
    let payload = registry()?
        .encode(MessageId::CfgRst, &record, &[])
        .map_err(|err| message_error("CFG-RST", err))?;

    let mut controller = link.open()?;
    controller
        .send(MessageId::CfgRst.identity(), &payload)
        .map_err(|err| session_error("reset failed", err))?;

    println!(
        "Sent CFG-RST (navBbrMask=0x{nav_bbr_mask:04x}, mode={}); the receiver does not acknowledge restarts.",
        args.mode
    );
    Ok(SUCCESS)
}

fn nav_bbr_mask(args: &ResetArgs) -> CliResult<u16> {
    match &args.clear {
        Some(sections) => {
            let mask = build_mask(sections.as_slice(), NAV_BBR_SECTIONS)
                .map_err(|err| message_error("--clear", err))?;
            u16::try_from(mask)
                .map_err(|_| CliError::new(USAGE, format!("--clear mask 0x{mask:x} exceeds 16 bits")))
        }
        None => Ok(StartType::from(args.start).nav_bbr_mask()),
    }
}
