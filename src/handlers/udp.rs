use serde_json::Value;
use std::net::SocketAddr;
use crate::state::server_state::ServerState;
use crate::state::commands::{ActionKey, MatchCommand};
use std::sync::Arc;

/// Ultra-thin UDP packet handler - no locks in hot path
/// Parses the packet and enqueues a command to the match's queue
pub async fn handle_udp_packet(
    packet: Value,
    addr: SocketAddr,
    state: &Arc<ServerState>,
) {
    let match_code = packet.get("match_code").and_then(|v| v.as_str());

    // Command sender lookup is a read-only DashMap access, no lock
    let Some(tx) = match_code.and_then(|code| state.get_match_tx(code)) else {
        log::debug!("UDP packet for unknown match: {:?}", match_code);
        return;
    };

    let Some(cmd) = parse_command(&packet, addr) else {
        log::debug!("malformed packet from {}: {:?}", addr, packet.get("type"));
        return;
    };

    // Non-blocking send - drop if queue is full (prevents backpressure)
    if tx.try_send(cmd).is_err() {
        log::debug!(
            "command queue full for match {}, dropping packet",
            match_code.unwrap_or("unknown")
        );
    }
}

/// Parse a UDP packet into a MatchCommand. Returns None for packets a
/// well-behaved client never sends: unknown types, missing ids, unbound
/// action keys, non-finite aim angles.
fn parse_command(packet: &Value, addr: SocketAddr) -> Option<MatchCommand> {
    let player_id = packet.get("player_id")
        .and_then(|v| v.as_u64())
        .map(|v| v as u32);

    match packet.get("type").and_then(|v| v.as_str()) {
        Some("connect") => Some(MatchCommand::Connect {
            player_id: player_id?,
            addr: Some(addr),
        }),
        Some("start_game") => {
            let mode = packet.get("mode")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string());
            Some(MatchCommand::StartGame { mode })
        }
        Some("start_action") => Some(MatchCommand::StartAction {
            player_id: player_id?,
            key: parse_key(packet)?,
        }),
        Some("end_action") => Some(MatchCommand::EndAction {
            player_id: player_id?,
            key: parse_key(packet)?,
        }),
        Some("update_direction") => {
            let angle = packet.get("angle").and_then(|v| v.as_f64())?;
            if !angle.is_finite() {
                return None;
            }
            Some(MatchCommand::UpdateDirection {
                player_id: player_id?,
                angle,
            })
        }
        _ => None,
    }
}

fn parse_key(packet: &Value) -> Option<ActionKey> {
    packet.get("key").and_then(|v| v.as_str()).and_then(ActionKey::parse)
}
