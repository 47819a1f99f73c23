// SPDX-License-Identifier: GPL-3.0-only

mod cli;
mod config;

use std::io::{self, BufRead, Write};
use std::process;

use kbdx::{time, Logger, Stopwatch, Table};
use log::{debug, error};

use crate::cli::{Cli, Command};
use crate::config::Config;

fn init_logger(cfg: &config::LogConfig) {
    let logger = Logger::with_writer(env!("CARGO_BIN_NAME"), io::stderr());
    logger.set_print_time(cfg.time);
    if let Err(e) = logger.install(cfg.level) {
        eprintln!("Failed to initialize logger: {}", e);
    }
}

fn load_config(cli: &Cli) -> Config {
    match &cli.config_path {
        Some(path) => config::load(&**path).unwrap_or_else(|e| {
            eprintln!("Failed to load config \"{}\": {}", path, e);
            process::exit(1);
        }),
        None => match config::load(config::DEFAULT_CONFIG_PATH) {
            Ok(cfg) => cfg,
            Err(config::Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => Config::default(),
            Err(e) => {
                eprintln!(
                    "Failed to load config \"{}\": {}",
                    config::DEFAULT_CONFIG_PATH,
                    e
                );
                process::exit(1);
            }
        },
    }
}

fn run_parse(texts: &[String]) -> bool {
    let mut ok = true;
    for text in texts {
        match time::parse(text) {
            Ok(ms) => println!("{}", ms),
            Err(e) => {
                error!("\"{}\": {}", text, e);
                ok = false;
            }
        }
    }
    ok
}

fn run_format(cfg: &Config, values: &[String]) -> bool {
    let fmt = cfg.format.to_format();
    let mut ok = true;
    for value in values {
        let res = value
            .parse::<i64>()
            .map_err(|_| kbdx::Error::InvalidNumber(value.as_str().into()))
            .and_then(|ms| fmt.format(ms));
        match res {
            Ok(s) => println!("{}", s),
            Err(e) => {
                error!("\"{}\": {}", value, e);
                ok = false;
            }
        }
    }
    ok
}

fn laps_table(cfg: &Config, sw: &Stopwatch) -> kbdx::Result<Table> {
    let fmt = cfg.format.to_format();
    let mut table = Table::with_width(3);
    table.set_splitter("  ");
    table.set(0, 0, "label")?.set(1, 0, "total")?.set(2, 0, "lap")?;

    let start = sw.entries().next().map_or(0, |(_, ms)| ms);
    let mut prev = start;
    for (row, (label, ms)) in sw.entries().enumerate() {
        table
            .set(0, row + 1, label)?
            .set(1, row + 1, &fmt.format(ms - start)?)?
            .set(2, row + 1, &fmt.format(ms - prev)?)?;
        prev = ms;
    }
    Ok(table)
}

fn run_laps(cfg: &Config) -> io::Result<bool> {
    let mut sw = Stopwatch::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        let label = line.trim();
        if !label.is_empty() {
            sw.set(label);
            debug!("lap \"{}\"", label);
        }
    }

    let elements = match cfg.format.elements {
        0 => None,
        n => Some(n),
    };
    let res = sw
        .report_with(elements, &cfg.report.template)
        .and_then(|report| laps_table(cfg, &sw).map(|table| (report, table)));
    let (report, table) = match res {
        Ok(res) => res,
        Err(e) => {
            error!("{}", e);
            return Ok(false);
        }
    };

    let mut out = io::stdout().lock();
    if !report.is_empty() {
        writeln!(out, "{}", report)?;
        writeln!(out)?;
    }
    writeln!(out, "{}", table)?;
    Ok(true)
}

fn main() {
    let cli = cli::parse().unwrap_or_else(|e| {
        eprintln!("{}", e);
        process::exit(1);
    });

    let mut cfg = load_config(&cli);

    if let Some(level) = cli.log_level {
        cfg.log.level = level;
    }

    if let Some(elements) = cli.elements {
        cfg.format.elements = elements;
    }

    cfg.format.long |= cli.long;
    cfg.format.zeros |= cli.zeros;

    if let Some(unit) = cli.min {
        cfg.format.min = unit;
    }

    if let Some(unit) = cli.max {
        cfg.format.max = unit;
    }

    init_logger(&cfg.log);

    let ok = match &cli.command {
        Command::Parse(texts) => run_parse(texts),
        Command::Format(values) => run_format(&cfg, values),
        Command::Laps => run_laps(&cfg).unwrap_or_else(|e| {
            error!("{}", e);
            false
        }),
    };

    log::logger().flush();

    if !ok {
        process::exit(1);
    }
}
