use tracing::info;
use ubxprims_message::masks::{value_of, RESET_MODES};
use ubxprims_message::{GnssConfig, MessageId, Record};

use crate::cmd::{GnssArgs, LinkArgs};
use crate::exit::{message_error, session_error, CliResult, SUCCESS};
use crate::output::{print_json, table, OutputFormat};

/// Clear everything on restart so the new system set starts from scratch.
const RESTART_NAV_BBR_MASK: u16 = 0xFFFF;

pub fn run(args: GnssArgs, link: &LinkArgs, format: OutputFormat) -> CliResult<i32> {
    let mut controller = link.open()?;
    let current = controller
        .poll(MessageId::CfgGnss)
        .map_err(|err| session_error("CFG-GNSS poll failed", err))?;
    let mut config =
        GnssConfig::from_message(&current).map_err(|err| message_error("CFG-GNSS", err))?;

    let Some(enable) = args.enable else {
        print_config(&config, format);
        return Ok(SUCCESS);
    };

    config
        .set_enabled(enable.as_slice())
        .map_err(|err| message_error("--enable", err))?;
    let (header, blocks) = config.to_records();
    let payload = controller
        .registry()
        .encode(MessageId::CfgGnss, &header, &blocks)
        .map_err(|err| message_error("CFG-GNSS", err))?;
    controller
        .configure(MessageId::CfgGnss, &payload)
        .map_err(|err| session_error("CFG-GNSS update failed", err))?;

    if !args.no_restart {
        let mode = value_of("swGnssOnly", RESET_MODES).map_err(|err| message_error("CFG-RST", err))?;
        let restart = controller
            .registry()
            .encode(
                MessageId::CfgRst,
                &Record::new()
                    .with("navBbrMask", RESTART_NAV_BBR_MASK)
                    .with("resetMode", mode),
                &[],
            )
            .map_err(|err| message_error("CFG-RST", err))?;
        controller
            .send(MessageId::CfgRst.identity(), &restart)
            .map_err(|err| session_error("restart failed", err))?;
        info!("GNSS restart requested to apply the new selection");
    }

    print_config(&config, format);
    Ok(SUCCESS)
}

fn print_config(config: &GnssConfig, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(config),
        OutputFormat::Table => {
            let mut out = table(&["SYSTEM", "ENABLED", "MIN CH", "MAX CH", "SIGNALS"]);
            for system in &config.systems {
                out.add_row(vec![
                    system.name.to_string(),
                    system.enabled().to_string(),
                    system.reserved_channels.to_string(),
                    system.max_channels.to_string(),
                    system.signals().join(", "),
                ]);
            }
            println!(
                "tracking channels: {} available, {} used",
                config.hw_channels, config.used_channels
            );
            println!("{out}");
        }
        OutputFormat::Pretty => {
            println!(
                "msgVer={} hw_channels={} used_channels={}",
                config.msg_ver, config.hw_channels, config.used_channels
            );
            for system in &config.systems {
                println!(
                    "{}: enabled={} channels={}..{} signals=[{}]",
                    system.name,
                    system.enabled(),
                    system.reserved_channels,
                    system.max_channels,
                    system.signals().join(", ")
                );
            }
        }
    }
}
