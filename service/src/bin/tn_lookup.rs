//! Look up the state legislators for a Tennessee address from the terminal.
//!
//! Usage: `tn-lookup --street "123 Main St" --zip 37203 [--json]`

#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]
#![allow(clippy::print_stdout)]

use clap::Parser;
use tnlegis_api::{
    config::Config,
    directory::LegislatorRecord,
    lookup::{LegislatorLookup, LookupOutcome},
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "tn-lookup",
    version,
    about = "Find the Tennessee legislators for an address"
)]
struct Args {
    /// Street address, e.g. "123 Main St"
    #[arg(long)]
    street: String,

    /// Five-digit Tennessee ZIP code
    #[arg(long)]
    zip: String,

    /// YAML config file (TNL_ environment variables still apply)
    #[arg(long, default_value = "config.yaml")]
    config: String,

    /// Print the full outcome as JSON
    #[arg(long)]
    json: bool,
}

fn print_legislator(title: &str, record: Option<&LegislatorRecord>) {
    let Some(record) = record else {
        println!("{title}: not found");
        return;
    };
    println!(
        "{title}: {} ({:?}, District {})",
        record.name, record.party, record.district
    );
    if let Some(phone) = &record.contact_info.phone {
        println!("  Phone: {phone}");
    }
    if let Some(email) = &record.contact_info.email {
        println!("  Email: {email}");
    }
}

fn print_outcome(outcome: &LookupOutcome) {
    if let Some(address) = &outcome.formatted_address {
        println!("Address: {address}");
    }
    if let Some(districts) = &outcome.districts {
        println!(
            "Senate district: {}  House district: {}",
            districts.senate.as_deref().unwrap_or("?"),
            districts.house.as_deref().unwrap_or("?")
        );
    }
    print_legislator("State Senator", outcome.legislators.senator.as_ref());
    print_legislator(
        "State Representative",
        outcome.legislators.representative.as_ref(),
    );
    if let Some(card) = &outcome.contact_card {
        println!("QR code: {}", card.qr_code_url);
    }
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    let config = Config::load_from(&args.config).map_err(|e| anyhow::anyhow!("{e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.level))
        .with_writer(std::io::stderr)
        .init();

    let lookup = LegislatorLookup::from_config(&config)?;
    let context = lookup.submit_address(&args.street, &args.zip).await?;
    let outcome = lookup.find_legislators(context).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }
    Ok(())
}
