use serde::{Deserialize, Serialize};

/// Request to create a new match
#[derive(Debug, Deserialize)]
pub struct CreateMatchRequest {
    pub code: String,
    pub max_players: Option<u32>,
}

/// Match info returned to clients
#[derive(Debug, Serialize)]
pub struct MatchInfo {
    pub code: String,
    pub player_count: usize,
    pub max_players: u32,
    pub players: Vec<PlayerInfo>,
    pub phase: String,
    pub server_ip: String,
    pub udp_port: u16,
}

/// Player info for match listings
#[derive(Debug, Serialize)]
pub struct PlayerInfo {
    pub id: u32,
    pub name: String,
    pub kill_count: u32,
    pub death_count: u32,
}

/// Response after joining a match
#[derive(Debug, Serialize)]
pub struct JoinMatchResponse {
    #[serde(rename = "match")]
    pub match_info: MatchInfo,
    pub player_id: u32,
}
