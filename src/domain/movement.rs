//! Player movement resolution.
//!
//! The per-tick resolution order is part of the observable contract and is
//! kept exactly as shipped: powerup overlap first (never blocks motion),
//! terrain second (first contact clamps and ends the tick's movement,
//! skipping the player test), player contact last. The powerup and player
//! probes are offset by a tenth of the frame displacement, a numerical
//! stabilization convention rather than a gameplay rule.

use glam::DVec2;

use crate::domain::combat::consume_powerup;
use crate::domain::geometry::{sweep_circle_circle, sweep_circle_segment};
use crate::state::world::World;

/// Resolve one tick of movement for the player at `index`
pub fn move_player(world: &mut World, index: usize, dt: f64) {
    let (start, speed, radius, flags, self_id) = {
        let player = &world.players[index];
        (
            player.position,
            player.armor.move_speed,
            player.armor.collision_radius,
            player.movement,
            player.id,
        )
    };

    let mut velocity = DVec2::ZERO;
    if flags.up {
        velocity.y -= speed * dt;
    }
    if flags.down {
        velocity.y += speed * dt;
    }
    if flags.left {
        velocity.x -= speed * dt;
    }
    if flags.right {
        velocity.x += speed * dt;
    }
    if velocity == DVec2::ZERO {
        return;
    }
    let epsilon = velocity / 10.0;

    // Powerup overlap: triggers consumption, never blocks motion
    for powerup_index in 0..world.arena.powerups.len() {
        let (position, powerup_radius) = {
            let powerup = &world.arena.powerups[powerup_index];
            (powerup.position, powerup.radius)
        };
        if sweep_circle_circle(start + epsilon, radius, position, powerup_radius, velocity)
            .is_some()
        {
            consume_powerup(world, powerup_index, index);
        }
    }

    // Terrain: first contact wins, clamps the player and skips the player
    // test this tick
    let probe = start + velocity;
    let mut terrain_hit = None;
    for &(seg_start, seg_end) in world.arena.segments() {
        if let Some(hit) = sweep_circle_segment(probe, radius, seg_start, seg_end, velocity) {
            terrain_hit = Some(hit);
            break;
        }
    }
    if let Some(hit) = terrain_hit {
        world.players[index].position = hit.position;
        return;
    }

    // Full displacement, then contact against every other alive player
    world.players[index].position = start + velocity;
    let others: Vec<(DVec2, f64)> = world
        .players
        .iter()
        .filter(|p| p.id != self_id && p.alive)
        .map(|p| (p.position, p.armor.collision_radius))
        .collect();
    let moved = world.players[index].position;
    for (other_position, other_radius) in others {
        if let Some(hit) =
            sweep_circle_circle(moved + epsilon, radius, other_position, other_radius, velocity)
        {
            world.players[index].position = hit.position - epsilon;
            break;
        }
    }
}
