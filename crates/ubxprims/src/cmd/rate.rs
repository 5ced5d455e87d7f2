use ubxprims_message::{DecodedMessage, MessageId, Record};

use crate::cmd::{message_id, LinkArgs, RateArgs};
use crate::exit::{message_error, session_error, CliResult, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: RateArgs, link: &LinkArgs, format: OutputFormat) -> CliResult<i32> {
    let target = message_id(&args.message)?;
    let identity = target.identity();

    let mut controller = link.open()?;
    let current = controller
        .poll_with(MessageId::CfgMsg, &[identity.class, identity.id], link.retry())
        .map_err(|err| session_error("CFG-MSG poll failed", err))?;

    let Some(rate) = args.rate else {
        print_message(&current, format);
        return Ok(SUCCESS);
    };

    let blocks = with_rate(&current, rate);
    let payload = controller
        .registry()
        .encode(MessageId::CfgMsg, &current.header, &blocks)
        .map_err(|err| message_error("CFG-MSG", err))?;
    controller
        .configure(MessageId::CfgMsg, &payload)
        .map_err(|err| session_error("CFG-MSG update failed", err))?;

    print_message(
        &DecodedMessage::new(MessageId::CfgMsg, current.header, blocks),
        format,
    );
    Ok(SUCCESS)
}

/// Per-port blocks with every port set to `rate`.
fn with_rate(current: &DecodedMessage, rate: u8) -> Vec<Record> {
    current
        .blocks
        .iter()
        .map(|block| block.clone().with("rate", rate))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_port_gets_the_new_rate() {
        let current = DecodedMessage::new(
            MessageId::CfgMsg,
            Record::new().with("msgClass", 0xF0u8).with("msgID", 0x00u8),
            vec![Record::new().with("rate", 0u8); 6],
        );
        let blocks = with_rate(&current, 5);
        assert_eq!(blocks.len(), 6);
        assert!(blocks.iter().all(|b| b.get_u64("rate") == Some(5)));
    }
}
