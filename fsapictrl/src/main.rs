#[macro_use]
extern crate tracing;

use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fsapi::{ClientConfig, FsapiClient};
use tracing_subscriber::prelude::*;

mod list;
mod parser;

#[derive(Parser)]
#[clap(author, version, about)]
struct Args {
    #[clap(short, long, action)]
    verbose: bool,
    #[clap(long, env = "FSAPI_URL", help = "device url, e.g. http://192.168.1.20/device")]
    url: String,
    #[clap(long, env = "FSAPI_PIN", default_value = "1234")]
    pin: String,
    #[clap(long, env = "FSAPI_TIMEOUT", default_value_t = 15, help = "request timeout in seconds")]
    timeout: u64,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Name, version and what is currently playing
    Info,
    /// Shows or switches the power state
    Power {
        #[clap(value_parser = parser::parse_switch)]
        state: Option<bool>,
    },
    /// Shows or sets the volume
    Volume { value: Option<u8> },
    /// Shows or sets muting
    Mute {
        #[clap(value_parser = parser::parse_switch)]
        state: Option<bool>,
    },
    Play,
    Pause,
    Next,
    Prev,
    /// Lists the modes of the device
    Modes,
    /// Shows or selects the mode
    Mode { key: Option<String> },
    /// Lists the equaliser presets
    Eq,
    /// Lists the stored presets of the current mode
    Presets,
    /// Selects a stored preset
    Preset { key: u32 },
    /// Browses the folders of the current mode
    Nav {
        #[clap(subcommand)]
        command: NavCommand,
    },
}

#[derive(Subcommand)]
enum NavCommand {
    /// Lists the folder at PATH, or the current folder
    Ls { path: Option<String> },
    /// Selects the item at PATH (comma separated keys)
    Select { path: String },
}

fn main() {
    dotenv::dotenv().ok();

    let args = Args::parse();

    let log_level = if args.verbose {
        "info,fsapi=trace,reqwest=debug"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::builder().parse_lossy(log_level))
        .with(tracing_forest::ForestLayer::default())
        .init();

    if let Err(err) = run(args) {
        error!("{err:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = ClientConfig::default().with_timeout(Duration::from_secs(args.timeout));
    let client = FsapiClient::connect(&args.url, &args.pin, config)?;

    match args.command {
        Command::Info => print_info(&client)?,
        Command::Power { state: Some(on) } => report(client.set_power(on)?),
        Command::Power { state: None } => println!("{}", on_off(client.power()?)),
        Command::Volume { value: Some(value) } => {
            if let Some(steps) = client.volume_steps()? {
                if value >= steps {
                    anyhow::bail!("volume must be below {steps}");
                }
            }
            report(client.set_volume(value)?)
        }
        Command::Volume { value: None } => println!("{}", display(client.volume()?)),
        Command::Mute { state: Some(muted) } => report(client.set_mute(muted)?),
        Command::Mute { state: None } => println!("{}", on_off(client.mute()?)),
        Command::Play => report(client.play()?),
        Command::Pause => report(client.pause()?),
        Command::Next => report(client.forward()?),
        Command::Prev => report(client.rewind()?),
        Command::Modes => list::print_modes(&client)?,
        Command::Mode { key: Some(key) } => {
            if !client.modes()?.iter().any(|mode| mode.key == key) {
                anyhow::bail!("Cannot find mode with key {key:?}");
            }
            report(client.set_mode(&key)?)
        }
        Command::Mode { key: None } => match client.mode()? {
            Some(mode) => println!("{} ({})", mode.label, mode.key),
            None => println!("-"),
        },
        Command::Eq => list::print_equalisers(&client)?,
        Command::Presets => list::print_presets(&client)?,
        Command::Preset { key } => report(client.select_preset(key)?),
        Command::Nav { command } => nav(&client, command)?,
    }

    Ok(())
}

fn nav(client: &FsapiClient, command: NavCommand) -> Result<()> {
    match command {
        NavCommand::Ls { path } => {
            if let Some(path) = path {
                let path = parser::parse_path(&path).map_err(anyhow::Error::msg)?;
                client.nav_select_folder_via_path(&path)?;
            }
            list::print_folder(client)
        }
        NavCommand::Select { path } => {
            let path = parser::parse_path(&path).map_err(anyhow::Error::msg)?;
            if path.is_empty() {
                anyhow::bail!("PATH must name an item");
            }
            report(client.nav_select_item_via_path(&path)?);
            Ok(())
        }
    }
}

fn print_info(client: &FsapiClient) -> Result<()> {
    println!("name:    {}", display(client.friendly_name()?));
    println!("version: {}", display(client.version()?));
    println!("power:   {}", on_off(client.power()?));
    println!("volume:  {}", display(client.volume()?));
    println!("mode:    {}", display(client.mode()?.map(|mode| mode.label)));
    println!("status:  {}", display(client.play_status()?));
    println!("playing: {}", display(client.play_name()?));
    if let Some(text) = client.play_text()? {
        println!("         {}", text);
    }
    Ok(())
}

fn report(accepted: bool) {
    if accepted {
        debug!("device accepted the change");
    } else {
        warn!("device did not confirm the change");
    }
}

fn display<T: ToString>(value: Option<T>) -> String {
    value.map(|value| value.to_string()).unwrap_or_else(|| "-".to_string())
}

fn on_off(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "on",
        Some(false) => "off",
        None => "-",
    }
}
