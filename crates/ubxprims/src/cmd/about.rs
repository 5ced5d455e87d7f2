use serde::Serialize;

use crate::cmd::{registry, AboutArgs};
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_json, OutputFormat};

#[derive(Serialize)]
struct AboutOutput {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    build: Option<BuildInfo>,
}

#[derive(Serialize)]
struct BuildInfo {
    target: String,
    git_hash: &'static str,
    features: Vec<&'static str>,
    message_formats: usize,
}

pub fn run(args: AboutArgs, format: OutputFormat) -> CliResult<i32> {
    let build = if args.extended {
        Some(BuildInfo {
            target: target_triple(),
            git_hash: option_env!("UBXPRIMS_GIT_HASH").unwrap_or("unknown"),
            features: active_features(),
            message_formats: registry()?.len(),
        })
    } else {
        None
    };
    let out = AboutOutput {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        build,
    };

    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("{} {}", out.name, out.version);
            if let Some(build) = &out.build {
                println!("target: {}", build.target);
                println!("git_hash: {}", build.git_hash);
                println!("features: {}", build.features.join(", "));
                println!("message formats: {}", build.message_formats);
            }
        }
    }
    Ok(SUCCESS)
}

fn target_triple() -> String {
    if let Some(target) = option_env!("UBXPRIMS_BUILD_TARGET") {
        return target.to_string();
    }
    format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS)
}

fn active_features() -> Vec<&'static str> {
    let mut features = vec!["cli"];
    if cfg!(feature = "session") {
        features.push("session");
    }
    if cfg!(feature = "serial") {
        features.push("serial");
    }
    if cfg!(feature = "async") {
        features.push("async");
    }
    features
}
