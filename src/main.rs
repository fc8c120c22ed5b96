use anyhow::Context;
use backtrace::Backtrace;
use clap::{value_parser, Arg, ArgAction, Command};
use systeminfo::disks;
use systeminfo::smbios::{self, FileSource, TableSource};
use systeminfo::SystemInfo;

use std::path::PathBuf;

#[macro_use]
extern crate log;

mod config;

use config::Config;

fn main() {
    // custom panic hook to terminate whole process after unwinding
    std::panic::set_hook(Box::new(|s| {
        eprintln!("{s}");
        eprintln!("{:?}", Backtrace::new());
        std::process::exit(101);
    }));

    let config = match Config::try_from(command().get_matches()) {
        Ok(c) => c,
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    };

    if let Err(error) = init_logging(&config) {
        eprintln!("failed to initialize logging: {error}");
        std::process::exit(1);
    }

    if let Err(error) = run(&config) {
        error!("{error:#}");
        std::process::exit(1);
    }
}

pub fn command() -> Command {
    Command::new(env!("CARGO_BIN_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_about(
            "Reports the hardware identity of this machine as JSON, decoded from the \
            SMBIOS table and the operating system's disk list.",
        )
        .arg(
            Arg::new("CONFIG")
                .help("Configuration file")
                .action(ArgAction::Set)
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("VERBOSE")
                .long("verbose")
                .short('v')
                .help("Increase the verbosity")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("PRETTY")
                .long("pretty")
                .help("Pretty print the report")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("NO_DISKS")
                .long("no-disks")
                .help("Skip disk enumeration")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("ENTRY_POINT")
                .long("entry-point")
                .help("Read the SMBIOS entry point from this file")
                .action(ArgAction::Set)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("TABLE")
                .long("table")
                .help("Read the SMBIOS structure table from this file")
                .action(ArgAction::Set)
                .value_parser(value_parser!(PathBuf)),
        )
}

fn init_logging(config: &Config) -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::from(config.log().level()))
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install the log subscriber")?;

    // the library logs through the `log` facade
    tracing_log::LogTracer::init().context("failed to bridge log records")?;

    Ok(())
}

fn run(config: &Config) -> anyhow::Result<()> {
    let source: Box<dyn TableSource> = match config.smbios().files() {
        Some((entry_point, table)) => {
            debug!(
                "reading smbios from {} and {}",
                entry_point.display(),
                table.display()
            );
            Box::new(FileSource::new(entry_point, table))
        }
        None => smbios::platform(),
    };

    let disks = config.disks().enabled().then(disks::platform);

    let info = SystemInfo::collect(source.as_ref(), disks.as_deref())
        .context("failed to collect the hardware inventory")?;

    let json = if config.output().pretty() {
        serde_json::to_string_pretty(&info)
    } else {
        serde_json::to_string(&info)
    }
    .context("failed to serialize the report")?;

    println!("{json}");

    Ok(())
}
