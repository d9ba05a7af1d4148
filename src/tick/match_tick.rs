use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::net::UdpSocket;
use tokio::sync::{RwLock, mpsc};
use tokio::time::interval;

use crate::domain::{combat, simulation};
use crate::state::commands::{ActionKey, MatchCommand, drain_and_coalesce};
use crate::state::world::{MatchPhase, World};
use crate::tick::snapshot::render_snapshot;
use crate::utils::buffers::PacketBuffer;
use crate::utils::config::Config;
use crate::utils::tuning::MatchTuning;

/// Per-match tick task. Owns the world: drains queued commands, steps the
/// simulation while the match is running, then broadcasts the snapshot and
/// audio cues over UDP. Exits after emitting exactly one end packet.
pub async fn match_tick_loop(
    match_code: String,
    world: Arc<RwLock<World>>,
    mut command_rx: mpsc::Receiver<MatchCommand>,
    socket: Arc<UdpSocket>,
    config: Arc<Config>,
    max_players: u32,
) {
    let mut tick_timer = interval(Duration::from_millis(config.tick_interval_ms()));
    let dt = config.tick_dt();
    let mut send_buffer = PacketBuffer::default();

    log::info!("match {} tick loop started", match_code);

    loop {
        tick_timer.tick().await;

        let commands = drain_and_coalesce(&mut command_rx);

        let mut world_guard = world.write().await;
        for command in commands {
            process_command(&mut world_guard, max_players, command);
        }

        if world_guard.phase != MatchPhase::Running {
            continue;
        }

        let winner = simulation::simulate_tick(&mut world_guard, dt, config.win_kill_count);
        let snapshot = render_snapshot(&world_guard);
        let cues = world_guard.drain_audio();
        let addresses: Vec<SocketAddr> = world_guard.client_addresses.values().copied().collect();
        drop(world_guard);

        if let Some(winner) = winner {
            let packet = json!({ "type": "end", "winner": winner });
            broadcast(&socket, &addresses, &packet, &mut send_buffer).await;
            log::info!("match {} ended, winner {}", match_code, winner);
            return;
        }

        let packet = json!({ "type": "snapshot", "data": snapshot });
        broadcast(&socket, &addresses, &packet, &mut send_buffer).await;

        for cue in cues {
            let packet = json!({ "type": "audio", "sound": cue.sound, "x": cue.x, "y": cue.y });
            broadcast(&socket, &addresses, &packet, &mut send_buffer).await;
        }
    }
}

async fn broadcast(
    socket: &UdpSocket,
    addresses: &[SocketAddr],
    packet: &serde_json::Value,
    buffer: &mut PacketBuffer,
) {
    let bytes = match serde_json::to_vec(packet) {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("packet serialization failed: {}", e);
            return;
        }
    };
    buffer.clear();
    buffer.extend_from_slice(&bytes);
    for addr in addresses {
        if let Err(e) = socket.send_to(buffer.as_slice(), addr).await {
            log::debug!("send to {} failed: {}", addr, e);
        }
    }
}

/// Apply one queued command to the world. Commands referencing unknown
/// players are dropped.
pub fn process_command(world: &mut World, max_players: u32, command: MatchCommand) {
    match command {
        MatchCommand::Connect { player_id, addr } => {
            if world.player_index(player_id).is_none()
                && world.players.len() >= max_players as usize
            {
                log::warn!("connect {} rejected, match full", player_id);
                return;
            }
            world.connect_player(player_id);
            if let Some(addr) = addr {
                world.client_addresses.insert(player_id, addr);
            }
        }
        MatchCommand::StartGame { mode } => {
            if world.phase != MatchPhase::Idle {
                log::debug!("start ignored, match already started");
                return;
            }
            world.apply_tuning(MatchTuning::for_mode(mode.as_deref()));
            world.phase = MatchPhase::Running;
            log::info!("match started, mode {:?}", mode);
        }
        MatchCommand::StartAction { player_id, key } => {
            if key == ActionKey::Reload {
                if let Some(index) = world.player_index(player_id) {
                    combat::reload(world, index);
                }
                return;
            }
            set_action_flag(world, player_id, key, true);
        }
        MatchCommand::EndAction { player_id, key } => {
            if key == ActionKey::Reload {
                return;
            }
            set_action_flag(world, player_id, key, false);
        }
        MatchCommand::UpdateDirection { player_id, angle } => {
            if let Some(player) = world.player_mut(player_id) {
                player.facing_angle = angle;
            } else {
                log::debug!("aim from unknown player {}", player_id);
            }
        }
    }
}

fn set_action_flag(world: &mut World, player_id: u32, key: ActionKey, engaged: bool) {
    let Some(player) = world.player_mut(player_id) else {
        log::debug!("action from unknown player {}", player_id);
        return;
    };
    match key {
        ActionKey::MoveUp => player.movement.up = engaged,
        ActionKey::MoveDown => player.movement.down = engaged,
        ActionKey::MoveLeft => player.movement.left = engaged,
        ActionKey::MoveRight => player.movement.right = engaged,
        ActionKey::Fire => player.firing = engaged,
        ActionKey::Reload => unreachable!("reload handled before flag dispatch"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    fn test_addr(port: u16) -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), port)
    }

    #[test]
    fn test_connect_registers_player_and_address() {
        let mut world = World::new(MatchTuning::default());
        process_command(
            &mut world,
            4,
            MatchCommand::Connect {
                player_id: 1,
                addr: Some(test_addr(9001)),
            },
        );
        assert_eq!(world.players.len(), 1);
        assert_eq!(world.client_addresses.get(&1), Some(&test_addr(9001)));
    }

    #[test]
    fn test_connect_respects_capacity() {
        let mut world = World::new(MatchTuning::default());
        for id in 0..3 {
            process_command(&mut world, 2, MatchCommand::Connect { player_id: id, addr: None });
        }
        assert_eq!(world.players.len(), 2);

        // Reconnects of known players pass the capacity check
        process_command(
            &mut world,
            2,
            MatchCommand::Connect {
                player_id: 0,
                addr: Some(test_addr(9002)),
            },
        );
        assert_eq!(world.players.len(), 2);
        assert_eq!(world.client_addresses.get(&0), Some(&test_addr(9002)));
    }

    #[test]
    fn test_start_game_transitions_once() {
        let mut world = World::new(MatchTuning::default());
        world.connect_player(0);

        process_command(
            &mut world,
            4,
            MatchCommand::StartGame {
                mode: Some("bullethell-mode".to_string()),
            },
        );
        assert_eq!(world.phase, MatchPhase::Running);
        assert_eq!(world.players[0].weapon.max_clip, 125);

        // A second start is a no-op, it cannot swap tuning mid-match
        process_command(
            &mut world,
            4,
            MatchCommand::StartGame {
                mode: Some("slowmo-mode".to_string()),
            },
        );
        assert_eq!(world.players[0].weapon.max_clip, 125);
    }

    #[test]
    fn test_action_flags() {
        let mut world = World::new(MatchTuning::default());
        world.connect_player(1);

        process_command(&mut world, 4, MatchCommand::StartAction { player_id: 1, key: ActionKey::MoveUp });
        process_command(&mut world, 4, MatchCommand::StartAction { player_id: 1, key: ActionKey::Fire });
        assert!(world.players[0].movement.up);
        assert!(world.players[0].firing);

        process_command(&mut world, 4, MatchCommand::EndAction { player_id: 1, key: ActionKey::MoveUp });
        process_command(&mut world, 4, MatchCommand::EndAction { player_id: 1, key: ActionKey::Fire });
        assert!(!world.players[0].movement.up);
        assert!(!world.players[0].firing);
    }

    #[test]
    fn test_reload_key_triggers_reload() {
        let mut world = World::new(MatchTuning::default());
        world.connect_player(1);
        world.players[0].weapon.clip = 10;

        process_command(&mut world, 4, MatchCommand::StartAction { player_id: 1, key: ActionKey::Reload });
        assert!(world.players[0].weapon.reloading);
    }

    #[test]
    fn test_aim_update() {
        let mut world = World::new(MatchTuning::default());
        world.connect_player(1);

        process_command(&mut world, 4, MatchCommand::UpdateDirection { player_id: 1, angle: 1.25 });
        assert!((world.players[0].facing_angle - 1.25).abs() < 1e-12);

        // Unknown players are dropped without panicking
        process_command(&mut world, 4, MatchCommand::UpdateDirection { player_id: 9, angle: 0.5 });
    }
}
