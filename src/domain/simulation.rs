//! The per-tick world update, run in a strict fixed order: players in
//! index order (win check, respawn or move/reload/cooldown/fire), then
//! projectiles in creation order, then the dead-projectile sweep, then
//! powerup cooldowns. The order is part of the observable contract - it
//! decides tie-breaking between simultaneous contacts.

use crate::domain::combat::{advance_projectile, cooldown_tick, fire, reload, respawn_tick};
use crate::domain::movement::move_player;
use crate::state::world::{MatchPhase, World};

/// Advance the world by one tick. Returns the winner's id as soon as any
/// player has reached `win_kill_count`; from that point the world is
/// `Ended` and must not be ticked again.
pub fn simulate_tick(world: &mut World, dt: f64, win_kill_count: u32) -> Option<u32> {
    for index in 0..world.players.len() {
        if world.players[index].kill_count >= win_kill_count {
            let winner = world.players[index].id;
            world.phase = MatchPhase::Ended { winner };
            return Some(winner);
        }

        if !world.players[index].alive {
            respawn_tick(&mut world.players[index], dt);
            continue;
        }

        move_player(world, index, dt);
        if world.players[index].weapon.clip == 0 {
            reload(world, index);
        }
        cooldown_tick(&mut world.players[index].weapon, dt);
        if world.players[index].firing {
            fire(world, index);
        }
    }

    for index in 0..world.projectiles.len() {
        if world.projectiles[index].alive {
            advance_projectile(world, index, dt);
        }
    }
    world.projectiles.retain(|p| p.alive);

    world.arena.advance_cooldowns(dt);
    None
}
