use std::path::{Path, PathBuf};

use anyhow::{self, format_err};
use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::append::file::FileAppender;
use log4rs::append::Append;
use log4rs::config::{Appender, Config, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Handle;

use crate::io::format::qbasis_output;

const VERSION: Option<&str> = option_env!("CARGO_PKG_VERSION");

/// Logs a nicely formatted qbasis heading to the `qbasis-output` logger.
pub fn log_heading() {
    let version = if let Some(ver) = VERSION {
        format!("v{ver}")
    } else {
        "v unknown".to_string()
    };
    qbasis_output!("╭───────────────────────────────────────────────────────────────╮");
    qbasis_output!("│                  __                 _                         │");
    qbasis_output!("│         __ _    / /_   __ _   ___  (_) ___                    │");
    qbasis_output!("│        / _` |  | '_ \\ / _` | / __| | |/ __|                   │");
    qbasis_output!("│       | (_| |  | |_) | (_| | \\__ \\ | |\\__ \\                   │");
    qbasis_output!("│        \\__, |  |_.__/ \\__,_| |___/ |_||___/                   │");
    qbasis_output!("│           |_|                                                 │");
    qbasis_output!("│                                                               │");
    qbasis_output!("│   Gaussian basis sets and ECPs across file formats            │");
    qbasis_output!("│                                                 {version:>13} │");
    qbasis_output!("╰───────────────────────────────────────────────────────────────╯");
    qbasis_output!("");
}

#[derive(Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// The YAML configuration file listing the conversions to run. If absent, a template
    /// configuration file is written instead.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// The file to which the main output is written. If absent, the main output goes to the
    /// standard output.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Logs diagnostic messages, including the offending lines of malformed input.
    #[arg(short, long)]
    pub debug: bool,
}

/// Configures the loggers: the `qbasis-output` logger writes plain lines to `output` (or the
/// standard output), and every other record goes to the standard error.
///
/// # Arguments
///
/// * `output` - The file to receive the main output, if any.
/// * `debug` - Boolean indicating if records down to the debug level are to be shown.
///
/// # Returns
///
/// A handle to the installed logger.
pub fn configure_logging(output: Option<&Path>, debug: bool) -> Result<Handle, anyhow::Error> {
    let output_appender: Box<dyn Append> = match output {
        Some(path) => Box::new(
            FileAppender::builder()
                .encoder(Box::new(PatternEncoder::new("{m}{n}")))
                .append(false)
                .build(path)
                .map_err(|err| format_err!("Unable to open `{}`: {err}", path.display()))?,
        ),
        None => Box::new(
            ConsoleAppender::builder()
                .encoder(Box::new(PatternEncoder::new("{m}{n}")))
                .build(),
        ),
    };
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{h({l:<5})} {t} - {m}{n}")))
        .build();
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let config = Config::builder()
        .appender(Appender::builder().build("qbasis-output", output_appender))
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .logger(
            Logger::builder()
                .appender("qbasis-output")
                .additive(false)
                .build("qbasis-output", LevelFilter::Info),
        )
        .build(Root::builder().appender("stderr").build(level))
        .map_err(|err| format_err!(err))?;
    log4rs::init_config(config).map_err(|err| format_err!(err))
}
