use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use crate::handlers::models::{CreateMatchRequest, JoinMatchResponse, MatchInfo, PlayerInfo};
use crate::state::server_state::ServerState;
use crate::state::world::{MatchPhase, World};
use crate::utils::config::Config;
use std::sync::Arc;
use tokio::net::UdpSocket;

/// App state for HTTP handlers (includes server state and dependencies)
#[derive(Clone)]
pub struct AppState {
    pub state: Arc<ServerState>,
    pub config: Arc<Config>,
    pub udp_socket: Arc<UdpSocket>,
}

fn match_info(code: &str, world: &World, max_players: u32, config: &Config) -> MatchInfo {
    let phase = match world.phase {
        MatchPhase::Idle => "idle",
        MatchPhase::Running => "running",
        MatchPhase::Ended { .. } => "ended",
    };
    MatchInfo {
        code: code.to_string(),
        player_count: world.players.len(),
        max_players,
        players: world.players.iter().map(|p| PlayerInfo {
            id: p.id,
            name: p.name.clone(),
            kill_count: p.kill_count,
            death_count: p.death_count,
        }).collect(),
        phase: phase.to_string(),
        server_ip: "127.0.0.1".to_string(),
        udp_port: config.udp_port,
    }
}

/// Thin HTTP handler: Create match
pub async fn create_match(
    State(app_state): State<AppState>,
    Json(request): Json<CreateMatchRequest>,
) -> Result<Json<MatchInfo>, StatusCode> {
    if app_state.state.match_exists(&request.code) {
        return Err(StatusCode::CONFLICT);
    }
    if app_state.state.match_count() >= app_state.config.max_matches {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    let max_players = request.max_players.unwrap_or(4);

    // Create match and spawn its tick loop
    crate::server::create_match_with_tick(
        app_state.state.clone(),
        request.code.clone(),
        max_players,
        app_state.config.clone(),
        app_state.udp_socket.clone(),
    );

    let world_arc = app_state.state.get_match(&request.code)
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    let world = world_arc.read().await;
    Ok(Json(match_info(&request.code, &world, max_players, &app_state.config)))
}

/// Thin HTTP handler: Join match. Allocates the player id and registers the
/// player directly; the UDP return address is learned from the client's
/// first connect datagram.
pub async fn join_match(
    State(app_state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<JoinMatchResponse>, StatusCode> {
    let world_arc = app_state.state.get_match(&code)
        .ok_or(StatusCode::NOT_FOUND)?;
    let max_players = app_state.state.get_max_players(&code)
        .ok_or(StatusCode::NOT_FOUND)?;

    let player_id = app_state.state.next_player_id();

    let mut world = world_arc.write().await;
    if world.players.len() >= max_players as usize {
        return Err(StatusCode::CONFLICT);
    }
    world.connect_player(player_id);

    Ok(Json(JoinMatchResponse {
        match_info: match_info(&code, &world, max_players, &app_state.config),
        player_id,
    }))
}

/// Thin HTTP handler: Get match info
pub async fn get_match(
    State(app_state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<MatchInfo>, StatusCode> {
    let world_arc = app_state.state.get_match(&code)
        .ok_or(StatusCode::NOT_FOUND)?;
    let max_players = app_state.state.get_max_players(&code)
        .ok_or(StatusCode::NOT_FOUND)?;

    let world = world_arc.read().await;
    Ok(Json(match_info(&code, &world, max_players, &app_state.config)))
}

/// Thin HTTP handler: List all matches
pub async fn list_matches(
    State(app_state): State<AppState>,
) -> Json<Vec<MatchInfo>> {
    let mut infos = Vec::new();

    for entry in app_state.state.iter_matches() {
        let world = entry.world.read().await;
        infos.push(match_info(entry.key(), &world, entry.max_players, &app_state.config));
    }

    Json(infos)
}
