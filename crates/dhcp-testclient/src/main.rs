#![forbid(unsafe_code)]

use clap::Parser;
use dhcp_testclient::config::Cli;
use dhcp_testclient::transport::Transport;
use dhcp_testclient::{v4, v6};
use dhcp_wire::v4::HwAddr;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_tracing(cli: &Cli) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let directive = match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        EnvFilter::new(directive)
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run_v6(cli: &Cli) -> anyhow::Result<()> {
    let transport = Transport::bind(cli.local6, cli.server6, cli.reply_timeout()).await?;
    info!(local = %cli.local6, server = %cli.server6, "starting DHCPv6 exchange");
    let reply = v6::exchange(&transport, cli.mac, cli.circuit_id.as_bytes()).await?;
    info!("DHCPv6 exchange complete: {reply}");
    Ok(())
}

async fn run_v4(cli: &Cli) -> anyhow::Result<()> {
    let transport = Transport::bind(cli.local4, cli.server4, cli.reply_timeout()).await?;
    info!(local = %cli.local4, server = %cli.server4, giaddr = %cli.giaddr, "starting DHCPv4 exchange");
    let relay = v4::RelayParams {
        giaddr: cli.giaddr,
        circuit_id: cli.circuit_id.as_bytes().to_vec(),
    };
    let xid = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    let ack = v4::exchange(&transport, cli.mac, xid, &relay).await?;
    info!(
        "DHCPv4 exchange complete: MAC {} allocated {}",
        HwAddr(&cli.mac),
        ack.yiaddr
    );
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if cli.family.runs_v6() {
        if let Err(e) = run_v6(&cli).await {
            error!("DHCPv6 exchange failed: {e:#}");
            std::process::exit(1);
        }
    }
    if cli.family.runs_v4() {
        if let Err(e) = run_v4(&cli).await {
            error!("DHCPv4 exchange failed: {e:#}");
            std::process::exit(1);
        }
    }
}
