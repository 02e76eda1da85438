use anyhow::Result;
use clap::{Arg, ArgAction, Command};
use colored::*;
use std::path::{Path, PathBuf};

use oledsense::core::runtime;
use oledsense::core::Settings;
use oledsense::gamesense::{CorePropsLocator, GameSenseClient};
use oledsense::platform::{export_sensors, AccessMode, HardwareProvider, SysinfoProvider};

const GAME_NAME: &str = "OLEDSENSE";
const GAME_DISPLAY_NAME: &str = "OledSense Hardware Monitor";

fn build_cli() -> Command {
    Command::new("oledsense")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Rotates hardware sensor readings on SteelSeries OLED displays")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("run")
                .about("Run the telemetry daemon (default)")
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .value_name("PATH")
                        .help("Path to the settings file"),
                )
                .arg(
                    Arg::new("safe")
                        .long("safe")
                        .help("Open the hardware provider in safe mode (skip sensors that need elevated drivers)")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("export")
                        .long("export")
                        .value_name("PATH")
                        .help("Export all discovered sensors to a JSON file at startup"),
                ),
        )
        .subcommand(
            Command::new("sensors")
                .about("List discovered sensors and exit")
                .arg(
                    Arg::new("safe")
                        .long("safe")
                        .help("Open the hardware provider in safe mode")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("export")
                        .long("export")
                        .value_name("PATH")
                        .help("Also write the sensor list to a JSON file"),
                ),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    oledsense::init_logging(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("sensors", sub)) => {
            let mode = access_mode(sub.get_flag("safe"));
            let export = sub.get_one::<String>("export").map(PathBuf::from);
            cmd_sensors(mode, export.as_deref())
        }
        Some(("run", sub)) => {
            let config = sub.get_one::<String>("config").map(PathBuf::from);
            let mode = access_mode(sub.get_flag("safe"));
            let export = sub.get_one::<String>("export").map(PathBuf::from);
            cmd_run(config.as_deref(), mode, export.as_deref()).await
        }
        _ => cmd_run(None, AccessMode::Full, None).await,
    }
}

fn access_mode(safe: bool) -> AccessMode {
    if safe {
        AccessMode::Safe
    } else {
        AccessMode::Full
    }
}

async fn cmd_run(config: Option<&Path>, mode: AccessMode, export: Option<&Path>) -> Result<()> {
    let settings = Settings::load(config)?;

    let provider = Box::new(SysinfoProvider::open(mode));
    let mut client =
        GameSenseClient::new(GAME_NAME, GAME_DISPLAY_NAME, CorePropsLocator::default());
    client.set_retry_interval(settings.retry_interval_ms);
    client.set_heartbeat_interval(settings.heartbeat_interval_ms);

    log::info!(
        "starting oledsense: {} pages, {}ms update interval",
        settings.pages.len(),
        settings.update_interval_ms()
    );
    runtime::run(&settings, provider, client, export).await?;
    Ok(())
}

fn cmd_sensors(mode: AccessMode, export: Option<&Path>) -> Result<()> {
    let provider = SysinfoProvider::open(mode);
    let sensors = provider.all_sensors();

    if sensors.is_empty() {
        println!("{}", "No sensors discovered".yellow());
    } else {
        println!(
            "{} {}",
            sensors.len().to_string().bold(),
            "sensors discovered:".cyan()
        );
        for sensor in &sensors {
            println!(
                "  {}  {} / {}",
                sensor.name.bold(),
                sensor.hardware.green(),
                sensor.sensor_type.dimmed()
            );
        }
    }

    if let Some(path) = export {
        export_sensors(&provider, path)?;
        println!("{} {}", "Exported to".cyan(), path.display());
    }
    Ok(())
}
