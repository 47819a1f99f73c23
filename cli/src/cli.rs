// SPDX-License-Identifier: GPL-3.0-only

use std::process;

use getopts::{Options, ParsingStyle};
use kbdx::time::Unit;
use log::LevelFilter;
use thiserror::Error;

use crate::config;

const BIN_NAME: &str = env!("CARGO_BIN_NAME");
const PKG_NAME: &str = env!("CARGO_PKG_NAME");
const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid element count \"{0}\"")]
    InvalidElements(String),
    #[error("Invalid unit \"{0}\"")]
    InvalidUnit(String),
    #[error("Unknown command \"{0}\"")]
    UnknownCommand(String),
    #[error("Missing command, see --help")]
    MissingCommand,
    #[error(transparent)]
    Options(#[from] getopts::Fail),
}

#[derive(Debug, Default, PartialEq, Eq)]
pub enum Command {
    Parse(Vec<String>),
    Format(Vec<String>),
    #[default]
    Laps,
}

#[derive(Debug, Default)]
pub struct Cli {
    pub log_level: Option<LevelFilter>,
    pub config_path: Option<Box<str>>,
    pub elements: Option<usize>,
    pub long: bool,
    pub zeros: bool,
    pub min: Option<Unit>,
    pub max: Option<Unit>,
    pub command: Command,
}

fn options() -> Options {
    let mut opts = Options::new();
    opts.parsing_style(ParsingStyle::StopAtFirstFree);
    opts.optflag("h", "help", "print usage help");
    opts.optflag("v", "version", "print program version");
    let log_help =
        "logging level [default: warn(2)]\nLEVEL: 0-5, off, error, warn, info, debug, trace";
    opts.optopt("l", "log", log_help, "LEVEL");
    let config_help = format!("config path [default: {}]", config::DEFAULT_CONFIG_PATH);
    opts.optopt("c", "config", &config_help, "PATH");
    let elements_help = format!(
        "maximum printed components, 0 for all [default: {}]",
        config::DEFAULT_ELEMENTS
    );
    opts.optopt("e", "elements", &elements_help, "N");
    opts.optflag("L", "long", "print full unit names");
    opts.optflag("z", "zeros", "print components with zero value");
    opts.optopt("", "min", "smallest printed unit [default: ms]", "UNIT");
    opts.optopt("", "max", "largest printed unit [default: years]", "UNIT");
    opts
}

fn print_usage(opts: Options) {
    let brief = format!(
        "Usage: {0} [options] parse TEXT...\n       \
                {0} [options] format MS...\n       \
                {0} [options] laps",
        BIN_NAME
    );
    print!("{}", opts.usage(&brief));
}

fn print_version() {
    println!("{} v{}", PKG_NAME, PKG_VERSION);
}

fn parse_unit(s: String) -> Result<Unit, Error> {
    Unit::lookup(&s).ok_or(Error::InvalidUnit(s))
}

fn parse_command(mut free: Vec<String>) -> Result<Command, Error> {
    if free.is_empty() {
        return Err(Error::MissingCommand);
    }
    let name = free.remove(0);
    match name.as_str() {
        "parse" => Ok(Command::Parse(free)),
        "format" => Ok(Command::Format(free)),
        "laps" => Ok(Command::Laps),
        _ => Err(Error::UnknownCommand(name)),
    }
}

fn parse_args(args: &[String]) -> Result<Cli, Error> {
    let mut cli = Cli::default();

    let opts = options();
    let matches = opts.parse(args)?;

    if matches.opt_present("help") {
        print_usage(opts);
        process::exit(0);
    }

    if matches.opt_present("version") {
        print_version();
        process::exit(0);
    }

    if let Some(value) = matches.opt_str("log") {
        match config::parse_log_level(value.as_ref()) {
            Some(level) => cli.log_level = Some(level),
            None => {
                eprintln!("Invalid value for log option: \"{}\"", value);
                process::exit(1);
            }
        }
    }

    if let Some(s) = matches.opt_str("config") {
        cli.config_path = Some(s.into_boxed_str());
    }

    if let Some(s) = matches.opt_str("elements") {
        cli.elements = Some(s.parse().map_err(|_| Error::InvalidElements(s))?);
    }

    cli.long = matches.opt_present("long");
    cli.zeros = matches.opt_present("zeros");

    if let Some(s) = matches.opt_str("min") {
        cli.min = Some(parse_unit(s)?);
    }

    if let Some(s) = matches.opt_str("max") {
        cli.max = Some(parse_unit(s)?);
    }

    cli.command = parse_command(matches.free)?;

    Ok(cli)
}

pub fn parse() -> Result<Cli, Error> {
    let args: Vec<_> = std::env::args().collect();
    parse_args(&args[1..])
}
