mod cutout;

use std::process;

use clap::error::ErrorKind;
use clap::Parser;
use ipnetwork::IpNetwork;
use tracing::{error, warn, Level};
use tracing_subscriber::EnvFilter;

use cutout::{compute_cutouts, parse_network};

/// Cover a network with the maximal CIDR blocks left after carving out the
/// given sub-networks.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// Network to carve from, in CIDR notation (e.g. 10.0.0.0/8)
    network: String,

    /// Sub-networks to leave out of the result, same address family
    exclusions: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::try_parse().unwrap_or_else(|err| {
        let _ = err.print();
        match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => process::exit(0),
            _ => process::exit(1),
        }
    });

    for line in run(&cli) {
        println!("{}", line);
    }
}

/// One output line per resulting block.
///
/// A base network that does not parse is echoed back as the sole line and
/// reported on the diagnostic stream; exclusions that do not parse are
/// dropped one by one. Neither failure is fatal.
fn run(cli: &Cli) -> Vec<String> {
    let base = match parse_network(&cli.network) {
        Ok(base) => base,
        Err(err) => {
            error!("{}; echoing the input back unchanged", err);
            return vec![cli.network.clone()];
        }
    };

    let exclusions: Vec<IpNetwork> = cli
        .exclusions
        .iter()
        .filter_map(|raw| match parse_network(raw) {
            Ok(network) => Some(network),
            Err(err) => {
                warn!("dropping exclusion: {}", err);
                None
            }
        })
        .collect();

    compute_cutouts(base, &exclusions)
        .into_iter()
        .map(|network| network.to_string())
        .collect()
}
