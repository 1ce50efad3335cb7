use std::net::IpAddr;
use std::str::FromStr;
use std::sync::Arc;

use clap::Parser;
use log::info;
use nsd_broadcast::sim::SimContext;
use nsd_broadcast::{Broadcast, Capabilities, ServiceType, TxtRecord};

/// Broadcast a service over a simulated NSD manager and print the
/// registration lifecycle.
#[derive(Parser)]
struct Args {
    /// Service type to broadcast, e.g. `_http._tcp`
    #[arg(short = 't', long, default_value = "_http._tcp")]
    service_type: String,

    /// Port the advertised service listens on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Name to advertise the service under
    #[arg(short, long, default_value = "demo")]
    name: String,

    /// Address to advertise; resolved from the local routing table when
    /// omitted
    #[arg(short, long)]
    address: Option<IpAddr>,

    /// TXT entries as `key=value`
    #[arg(short = 'x', long = "txt")]
    txt: Vec<String>,

    /// Pretend the platform has no TXT attribute support
    #[arg(long)]
    no_txt_support: bool,
}

fn main() -> nsd_broadcast::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut broadcast = Broadcast::new(ServiceType::from_str(&args.service_type)?, args.port);
    broadcast.set_name(&args.name);

    if let Some(address) = args.address {
        broadcast.add_address(address);
    }

    let mut txt_record = TxtRecord::new();
    for entry in &args.txt {
        let (key, value) = entry.split_once('=').unwrap_or((entry.as_str(), ""));
        txt_record.insert(key, value)?;
    }
    broadcast.set_txt_record(txt_record);

    let context = Arc::new(SimContext::new(Capabilities::new(!args.no_txt_support)));

    info!("starting broadcast of `{}`", args.name);
    let mut stream = broadcast.start(&context);

    if let Some(event) = stream.recv() {
        println!("Broadcast event: {:?}", event?);
    }

    stream.cancel();

    while let Some(event) = stream.recv() {
        println!("Broadcast event: {:?}", event?);
    }

    Ok(())
}
