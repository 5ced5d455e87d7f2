use crate::cmd::{message_id, LinkArgs, PollArgs};
use crate::exit::{session_error, CliResult, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: PollArgs, link: &LinkArgs, format: OutputFormat) -> CliResult<i32> {
    let id = message_id(&args.message)?;
    let payload = args.payload.map(|hex| hex.0).unwrap_or_default();

    let mut controller = link.open()?;
    let message = controller
        .poll_with(id, &payload, link.retry())
        .map_err(|err| session_error("poll failed", err))?;

    print_message(&message, format);
    Ok(SUCCESS)
}
