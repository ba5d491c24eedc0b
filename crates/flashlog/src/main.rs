//! `flashlog` - CLI for the flash record log
//!
//! Every invocation opens the flash image, scans it for the current record
//! and runs one command, so consecutive invocations behave like power cycles
//! of the device.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;

use flashlog::cli::{Cli, Command, ConfigCommand, OutputFormat};
use flashlog::{
    init_logging, record_sample, Config, Entry, Error, FileMedium, FixedSensor, LogHandle,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    match cli.command {
        Command::Append(cmd) => {
            let mut log = open_log(&config)?;
            log.append(&cmd.text).map_err(with_hint)?;
            println!("Stored \"{}\" at slot {}", cmd.text, log.cursor_slot());
            Ok(())
        }
        Command::Replay(cmd) => handle_replay(&config, cmd.format),
        Command::Erase(cmd) => {
            if !cmd.yes {
                println!("This will erase every record in the log region.");
                println!("Use --yes to confirm.");
                return Ok(());
            }
            let mut log = open_log(&config)?;
            log.erase()?;
            println!(
                "Erased region at {:#010x} at {}",
                log.region().base(),
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
            );
            Ok(())
        }
        Command::Status(cmd) => handle_status(&config, cmd.json),
        Command::Sample(cmd) => {
            let mut log = open_log(&config)?;
            let reading =
                record_sample(&mut log, &mut FixedSensor::new(cmd.raw)).map_err(with_hint)?;
            println!("Recorded {} °C", reading.celsius);
            Ok(())
        }
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_log(config: &Config) -> Result<LogHandle<FileMedium>> {
    let geometry = config.device_geometry()?;
    let (base, size) = config.region_bounds()?;
    let path = config.image_path();

    let medium = FileMedium::open(&path, base, size)
        .with_context(|| format!("opening flash image {}", path.display()))?
        .with_write_latency(config.medium.write_latency_polls);
    let mut log = LogHandle::open(medium, &geometry)?;

    if config.log.erase_on_open {
        log.erase()?;
    }
    Ok(log)
}

fn with_hint(err: Error) -> anyhow::Error {
    if err.requires_erase() {
        anyhow::Error::new(err).context("run `flashlog erase --yes` to reclaim the region")
    } else {
        err.into()
    }
}

fn handle_replay(config: &Config, format: OutputFormat) -> Result<()> {
    let log = open_log(config)?;

    let replay = match log.replay() {
        Ok(replay) => replay,
        Err(err) if err.is_empty_log() => {
            println!("Please write something first.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let mut entries: Vec<Entry> = Vec::new();
    let mut failure = None;
    for item in replay {
        match item {
            Ok(entry) => entries.push(entry),
            Err(err) => failure = Some(err),
        }
    }

    match format {
        OutputFormat::Table => {
            println!("{:<6} {:<8} PAYLOAD", "SLOT", "STATE");
            for entry in &entries {
                println!("{:<6} {:<8} {}", entry.slot, entry.state, entry.payload);
            }
        }
        OutputFormat::Plain => {
            for entry in &entries {
                println!("{}", entry.payload);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }

    match failure {
        Some(err) => Err(with_hint(err)),
        None => Ok(()),
    }
}

fn handle_status(config: &Config, json: bool) -> Result<()> {
    let log = open_log(config)?;
    let status = log.status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        let head = status
            .head_state
            .map_or_else(|| "corrupted".to_string(), |state| state.to_string());
        println!("flashlog status");
        println!("---------------");
        println!("Image:         {}", config.image_path().display());
        println!(
            "Region:        {:#010x} ({} bytes)",
            status.region_base, status.region_size
        );
        println!("Record size:   {} bytes", status.record_size);
        println!(
            "Cursor:        slot {} ({:#010x})",
            status.cursor_slot, status.cursor_address
        );
        println!("Head state:    {head} ({:#010x})", status.head_word);
        println!(
            "Slots:         {} used, {} free of {}",
            status.used_slots, status.free_slots, status.capacity
        );
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                let (base, size) = config.region_bounds()?;
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Geometry]");
                println!("  Page size:          {}", config.geometry.page_size);
                println!("  Page count:         {}", config.geometry.page_count);
                println!("  Log region:         {base:#010x} ({size} bytes)");
                println!();
                println!("[Medium]");
                println!("  Image path:         {}", config.image_path().display());
                println!(
                    "  Write latency:      {} polls",
                    config.medium.write_latency_polls
                );
                println!();
                println!("[Log]");
                println!("  Erase on open:      {}", config.log.erase_on_open);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
