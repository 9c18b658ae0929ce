use crate::CLAP_STYLING;
use clap::{arg, command};

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("newswire")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("newswire")
        .styles(CLAP_STYLING)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            command!("init")
                .about("Initializes the newswire database on your filesystem")
                .arg(
                    arg!([PATH])
                        .required(false)
                        .help("Location to store the newswire database")
                        .default_value("~/.config/newswire/"),
                )
                .arg(
                    arg!(-f - -"force")
                        .help("Overwrites any existing database at the specified location.")
                        .required(false),
                ),
        )
        .subcommand(
            command!("serve").about(
                "Runs the scraper daemon: scrapes the configured sources on a fixed \
                interval and serves the stored articles over HTTP.",
            ),
        )
        .subcommand(
            command!("scrape")
                .about("Runs a single scrape cycle against the configured sources and exits."),
        )
}
