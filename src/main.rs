mod handlers;
mod state;
mod domain;
mod tick;
mod utils;
mod server;

use std::sync::Arc;
use crate::utils::config::Config;
use crate::state::server_state::ServerState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging()?;

    let config = Arc::new(Config::default());

    // Create server state (partitioned by match)
    let state = Arc::new(ServerState::new());

    // Create UDP socket shared by all match tick loops
    let udp_socket = Arc::new(
        tokio::net::UdpSocket::bind(format!("0.0.0.0:{}", config.udp_port)).await?
    );

    // Create the default match
    server::create_match_with_tick(
        state.clone(),
        "main".to_string(),
        4,
        config.clone(),
        udp_socket.clone(),
    );

    log::info!("Created default match 'main'");

    // Start HTTP and UDP servers
    server::start_servers(state, config, udp_socket).await?;

    Ok(())
}

fn setup_logging() -> Result<(), Box<dyn std::error::Error>> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Utc::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Debug)
        .chain(std::io::stdout())
        .chain(fern::log_file("arenaserver.log")?)
        .apply()?;
    Ok(())
}
