/*
 * AWG Probe Tool
 *
 * Connects to the arbitrary waveform generator described by the configuration
 * file, prints its *IDN? identity and optionally sends one raw SCPI command
 * or query. Every exchange goes through the normal dispatcher, so it also
 * lands in the session command log.
 *
 * Examples:
 *   awg_probe --address 192.168.1.50
 *   awg_probe --query ":TRAC1:CAT?"
 *   awg_probe --write ":OUTP1 ON"
 */

use anyhow::{Context, Result};
use awg_scpi::{logging, Awg, AwgConfig};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "awg_probe")]
#[command(about = "Identify an AWG and optionally send one SCPI command", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = awg_scpi::config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Instrument IP address (overrides the configuration)
    #[arg(long)]
    address: Option<String>,

    /// SCPI command to send without reading a reply
    #[arg(long, conflicts_with = "query")]
    write: Option<String>,

    /// SCPI query to send; the reply is printed
    #[arg(long)]
    query: Option<String>,

    /// Do not write a command log file
    #[arg(long)]
    no_log: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AwgConfig::load_from(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(address) = cli.address {
        config.connection.address = address;
    }
    if cli.no_log {
        config.command_log.enabled = false;
    }

    logging::init_from_config(&config).context("logging setup failed")?;

    let mut awg = Awg::open(&config)
        .with_context(|| format!("connecting to {}", config.connection.address))?;

    match awg.identity() {
        Some(id) => {
            println!("Manufacturer: {}", id.manufacturer);
            println!("Model:        {}", id.model);
            println!("Serial:       {}", id.serial);
            println!("Firmware:     {}", id.firmware);
        }
        None => println!("Connected (no identity)"),
    }

    let outcome = send(&mut awg, cli.write.as_deref(), cli.query.as_deref());

    if let Some(path) = awg.log().path() {
        println!("Command log:  {}", path.display());
    }
    awg.disconnect().context("disconnecting")?;
    outcome
}

fn send<S: awg_scpi::Session>(
    awg: &mut Awg<S>,
    write: Option<&str>,
    query: Option<&str>,
) -> Result<()> {
    if let Some(command) = write {
        let elapsed = awg.dispatcher().write(command, "OK")?;
        println!("{command} -> OK ({:.3} ms)", elapsed.as_secs_f64() * 1000.0);
    }
    if let Some(command) = query {
        let reply = awg.dispatcher().query(command)?;
        println!("{command} -> {} ({:.3} ms)", reply.value, reply.millis());
    }
    Ok(())
}
