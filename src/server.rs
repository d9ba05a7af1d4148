use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use log::info;
use tokio::net::{TcpListener, UdpSocket};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use crate::state::server_state::{ServerState, MatchHandle};
use crate::state::world::World;
use crate::handlers::http::{create_match, list_matches, join_match, get_match, AppState};
use crate::handlers::udp::handle_udp_packet;
use crate::tick::match_tick::match_tick_loop;
use crate::utils::config::Config;
use crate::utils::tuning::MatchTuning;

/// Start HTTP and UDP servers
pub async fn start_servers(
    state: Arc<ServerState>,
    config: Arc<Config>,
    udp_socket: Arc<UdpSocket>,
) -> Result<(), Box<dyn std::error::Error>> {
    let http_server = init_http_server(state.clone(), config.clone(), udp_socket.clone());
    let udp_server = init_udp_server(state.clone(), udp_socket.clone());

    tokio::try_join!(http_server, udp_server)?;
    Ok(())
}

/// Initialize HTTP server
fn init_http_server(
    state: Arc<ServerState>,
    config: Arc<Config>,
    udp_socket: Arc<UdpSocket>,
) -> tokio::task::JoinHandle<()> {
    let http_port = config.http_port;
    let app_state = AppState {
        state,
        config,
        udp_socket,
    };

    let app = Router::new()
        .route("/matches", post(create_match))
        .route("/matches", get(list_matches))
        .route("/matches/:code/join", post(join_match))
        .route("/matches/:code", get(get_match))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let http_addr = format!("0.0.0.0:{}", http_port);
    info!("Starting HTTP server on {}", http_addr);

    tokio::spawn(async move {
        let listener = match TcpListener::bind(&http_addr).await {
            Ok(listener) => {
                info!("HTTP server successfully bound to {}", http_addr);
                listener
            }
            Err(e) => {
                eprintln!("Failed to bind HTTP server to {}: {}", http_addr, e);
                return;
            }
        };

        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("HTTP server error: {}", e);
        }
    })
}

/// Initialize UDP server
fn init_udp_server(
    state: Arc<ServerState>,
    socket: Arc<UdpSocket>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut buf = [0u8; 1024];

        loop {
            match socket.recv_from(&mut buf).await {
                Ok((len, addr)) => {
                    let data = &buf[..len];
                    if let Ok(packet) = serde_json::from_slice::<serde_json::Value>(data) {
                        handle_udp_packet(packet, addr, &state).await;
                    }
                }
                Err(e) => {
                    log::error!("UDP recv error: {}", e);
                }
            }
        }
    })
}

/// Create a new match and spawn its tick loop
pub fn create_match_with_tick(
    state: Arc<ServerState>,
    code: String,
    max_players: u32,
    config: Arc<Config>,
    socket: Arc<UdpSocket>,
) {
    if state.match_exists(&code) {
        return;
    }

    let world = Arc::new(RwLock::new(World::new(MatchTuning::default())));

    let (tx, rx) = mpsc::channel::<crate::state::commands::MatchCommand>(1000);

    let tick_world = world.clone();
    let tick_socket = socket.clone();
    let tick_config = config.clone();
    let tick_code = code.clone();
    let task_handle = tokio::spawn(async move {
        match_tick_loop(tick_code, tick_world, rx, tick_socket, tick_config, max_players).await;
    });

    let handle = MatchHandle {
        world,
        command_tx: tx,
        task_handle,
        max_players,
    };

    state.insert_match(code, handle);
}
