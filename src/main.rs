use anyhow;
use clap::Parser;
use log;

use qbasis::interfaces::cli::{configure_logging, log_heading, Cli};
use qbasis::interfaces::input::Input;
use qbasis::interfaces::InputHandle;
use qbasis::io::{read_qbasis_yaml, write_qbasis_yaml};

const TEMPLATE_NAME: &str = "qbasis_template";

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    configure_logging(cli.output.as_deref(), cli.debug)?;
    log_heading();

    match cli.config.as_ref() {
        Some(config) => {
            let mut input: Input = read_qbasis_yaml(config)?;
            if cli.debug {
                input
                    .conversions
                    .iter_mut()
                    .for_each(|params| params.debug = true);
            }
            input.handle()
        }
        None => {
            write_qbasis_yaml(TEMPLATE_NAME, &Input::default())?;
            log::info!(
                target: "qbasis-output",
                "No configuration given. A template has been written to `{TEMPLATE_NAME}.yml`."
            );
            Ok(())
        }
    }
}
