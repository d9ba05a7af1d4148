//! Damage, weapons, projectiles and powerup effects.

use glam::DVec2;

use crate::domain::geometry::{reflect, sweep_circle_circle, sweep_circle_segment};
use crate::state::entities::{spawn_point, Player, Projectile, Weapon};
use crate::state::world::{World, OFF_ARENA};

/// Damage a player. No-op on the already dead. Lethal damage clamps
/// health to zero, parks the body off-arena, bumps both kill counters and
/// arms the respawn countdown.
pub fn apply_damage(world: &mut World, target_index: usize, attacker_id: u32, amount: f64) {
    let (position, died) = {
        let target = &mut world.players[target_index];
        if !target.alive {
            return;
        }
        let position = target.position;
        target.armor.health -= amount;
        let died = target.armor.health <= 0.0;
        if died {
            target.armor.health = 0.0;
            target.alive = false;
            target.position = OFF_ARENA;
            target.death_count += 1;
            target.respawn_remaining = target.respawn_time;
        }
        (position, died)
    };

    world.play_sound("hit", position);
    if died {
        world.play_sound("oof", position);
        if let Some(attacker) = world.player_mut(attacker_id) {
            attacker.kill_count += 1;
        }
    }
}

/// Advance a dead player's respawn countdown; at zero the player comes
/// back at its fixed spawn slot with full health and ammo.
pub fn respawn_tick(player: &mut Player, dt: f64) {
    if player.alive {
        return;
    }
    player.respawn_remaining -= dt;
    if player.respawn_remaining <= 0.0 {
        player.alive = true;
        player.respawn_remaining = player.respawn_time;
        player.armor.health = player.armor.max_health;
        player.weapon.refill();
        player.position = spawn_point(player.id);
    }
}

/// Advance the fire cooldown and, independently, a running reload. A
/// completed reload transfers up to the clip shortfall from spare ammo.
pub fn cooldown_tick(weapon: &mut Weapon, dt: f64) {
    if !weapon.ready {
        weapon.cooldown_remaining -= dt;
        if weapon.cooldown_remaining <= 0.0 {
            weapon.ready = true;
            weapon.cooldown_remaining = weapon.fire_interval;
        }
    }

    if weapon.reloading {
        weapon.reload_remaining -= dt;
        if weapon.reload_remaining <= 0.0 {
            let shortfall = weapon.max_clip - weapon.clip;
            let transferred = shortfall.min(weapon.spare_ammo);
            weapon.spare_ammo -= transferred;
            weapon.clip += transferred;
            weapon.reloading = false;
            weapon.reload_remaining = weapon.reload_time;
        }
    }
}

/// Start a reload. No-op on a full clip, empty spares, or a reload
/// already in progress.
pub fn reload(world: &mut World, player_index: usize) {
    let position = {
        let player = &mut world.players[player_index];
        let weapon = &mut player.weapon;
        if weapon.clip >= weapon.max_clip || weapon.spare_ammo == 0 || weapon.reloading {
            return;
        }
        weapon.reloading = true;
        player.position
    };
    world.play_sound("reload", position);
}

/// Fire the player's weapon along its aim angle, spawning a projectile
/// just outside the player's collision radius. No-op while cooling down,
/// reloading, or with an empty clip.
pub fn fire(world: &mut World, player_index: usize) {
    {
        let weapon = &world.players[player_index].weapon;
        if !weapon.ready || weapon.reloading || weapon.clip == 0 {
            return;
        }
    }
    let projectile_id = world.allocate_projectile_id();
    let (projectile, position) = {
        let player = &mut world.players[player_index];
        let weapon = &mut player.weapon;
        weapon.clip -= 1;
        weapon.ready = false;

        let direction = DVec2::new(player.facing_angle.cos(), player.facing_angle.sin());
        let muzzle_offset = player.armor.collision_radius + weapon.projectile_radius;
        let projectile = Projectile {
            id: projectile_id,
            position: player.position + muzzle_offset * direction,
            velocity: weapon.projectile_speed * direction,
            owner_id: player.id,
            damage: weapon.damage,
            radius: weapon.projectile_radius,
            remaining_ricochets: weapon.ricochet_count,
            ricochet_bonus: weapon.ricochet_bonus,
            alive: true,
        };
        (projectile, player.position)
    };
    world.projectiles.push(projectile);
    world.play_sound("pew", position);
}

/// Advance one projectile by one tick: enemy players are tested before
/// terrain; a terrain contact reflects the velocity, charges the ricochet
/// bonus and ends this tick's motion. Only a collision-free tick applies
/// the displacement.
pub fn advance_projectile(world: &mut World, projectile_index: usize, dt: f64) {
    let (position, full_velocity, radius, owner_id, damage) = {
        let projectile = &world.projectiles[projectile_index];
        (
            projectile.position,
            projectile.velocity,
            projectile.radius,
            projectile.owner_id,
            projectile.damage,
        )
    };
    let velocity = full_velocity * dt;
    let epsilon = velocity / 10.0;

    // Enemy players; a hit consumes the projectile before any terrain test
    let targets: Vec<(usize, DVec2, f64)> = world
        .players
        .iter()
        .enumerate()
        .filter(|(_, p)| p.alive && p.id != owner_id)
        .map(|(i, p)| (i, p.position, p.armor.collision_radius))
        .collect();
    for (target_index, target_position, target_radius) in targets {
        if sweep_circle_circle(
            position + epsilon,
            radius,
            target_position,
            target_radius,
            velocity,
        )
        .is_some()
        {
            apply_damage(world, target_index, owner_id, damage);
            world.projectiles[projectile_index].alive = false;
            return;
        }
    }

    // Terrain ricochet
    let mut terrain_hit = None;
    for &(seg_start, seg_end) in world.arena.segments() {
        if let Some(hit) =
            sweep_circle_segment(position + epsilon, radius, seg_start, seg_end, velocity)
        {
            terrain_hit = Some(hit);
            break;
        }
    }
    if let Some(hit) = terrain_hit {
        let contact = {
            let projectile = &mut world.projectiles[projectile_index];
            projectile.position = hit.position;
            projectile.velocity = reflect(full_velocity, hit.normal_slope);
            projectile.remaining_ricochets = projectile.remaining_ricochets.saturating_sub(1);
            projectile.damage *= 1.0 + projectile.ricochet_bonus;
            projectile.radius *= 1.0 + 0.1 * projectile.ricochet_bonus;
            if projectile.remaining_ricochets == 0 {
                projectile.alive = false;
            }
            projectile.position
        };
        world.play_sound("ding", contact);
        return;
    }

    world.projectiles[projectile_index].position = position + velocity;
}

/// Apply a powerup to a player: health restores half of max health, ammo
/// half of max spare ammo, both clamped. No-op when the powerup is dead
/// or the stat is already full; a successful pickup kills the powerup so
/// its cooldown can respawn it.
pub fn consume_powerup(world: &mut World, powerup_index: usize, player_index: usize) {
    let (kind, position, alive) = {
        let powerup = &world.arena.powerups[powerup_index];
        (powerup.kind, powerup.position, powerup.alive)
    };
    if !alive {
        return;
    }

    let consumed = {
        let player = &mut world.players[player_index];
        match kind {
            crate::state::entities::PowerupKind::Health => {
                if player.armor.health >= player.armor.max_health {
                    false
                } else {
                    player.armor.health = (player.armor.health + player.armor.max_health / 2.0)
                        .min(player.armor.max_health);
                    true
                }
            }
            crate::state::entities::PowerupKind::Ammo => {
                let weapon = &mut player.weapon;
                if weapon.spare_ammo >= weapon.max_spare_ammo {
                    false
                } else {
                    weapon.spare_ammo =
                        (weapon.spare_ammo + weapon.max_spare_ammo / 2).min(weapon.max_spare_ammo);
                    true
                }
            }
        }
    };

    if consumed {
        world.play_sound("recover", position);
        world.arena.powerups[powerup_index].alive = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::world::{MatchPhase, World};
    use crate::utils::tuning::MatchTuning;

    const DT: f64 = 1.0 / 60.0;

    fn world_with_players(count: u32) -> World {
        let mut world = World::new(MatchTuning::default());
        for id in 0..count {
            world.connect_player(id);
        }
        world
    }

    #[test]
    fn test_damage_reduces_health_and_cues_hit() {
        let mut world = world_with_players(2);
        apply_damage(&mut world, 1, 0, 30.0);

        assert!((world.players[1].armor.health - 70.0).abs() < 1e-9);
        assert!(world.players[1].alive);
        let cues = world.drain_audio();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].sound, "hit");
    }

    #[test]
    fn test_lethal_damage_kills_and_scores() {
        let mut world = world_with_players(2);
        world.players[1].armor.health = 10.0;
        apply_damage(&mut world, 1, 0, 25.0);

        let target = &world.players[1];
        assert!(!target.alive);
        assert_eq!(target.armor.health, 0.0);
        assert_eq!(target.position, OFF_ARENA);
        assert_eq!(target.death_count, 1);
        assert_eq!(world.players[0].kill_count, 1);

        let cues = world.drain_audio();
        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].sound, "hit");
        assert_eq!(cues[1].sound, "oof");
    }

    #[test]
    fn test_damage_on_dead_player_is_noop() {
        let mut world = world_with_players(2);
        world.players[1].alive = false;
        world.players[1].armor.health = 0.0;
        apply_damage(&mut world, 1, 0, 25.0);

        assert_eq!(world.players[1].armor.health, 0.0);
        assert_eq!(world.players[1].death_count, 0);
        assert_eq!(world.players[0].kill_count, 0);
        assert!(world.drain_audio().is_empty());
    }

    #[test]
    fn test_respawn_restores_player() {
        let mut world = world_with_players(2);
        apply_damage(&mut world, 1, 0, 1000.0);
        let player = &mut world.players[1];
        player.weapon.clip = 0;
        player.weapon.spare_ammo = 0;

        // 1.75s countdown at 60Hz
        for _ in 0..104 {
            respawn_tick(player, DT);
        }
        assert!(!player.alive);
        for _ in 0..10 {
            respawn_tick(player, DT);
        }
        assert!(player.alive);
        assert_eq!(player.armor.health, player.armor.max_health);
        assert_eq!(player.weapon.clip, player.weapon.max_clip);
        assert_eq!(player.weapon.spare_ammo, player.weapon.max_spare_ammo);
        assert_eq!(player.position, spawn_point(1));
    }

    #[test]
    fn test_fire_spawns_projectile() {
        let mut world = world_with_players(1);
        world.players[0].facing_angle = 0.0;
        let origin = world.players[0].position;

        fire(&mut world, 0);

        assert_eq!(world.projectiles.len(), 1);
        let projectile = &world.projectiles[0];
        assert_eq!(projectile.owner_id, 0);
        assert_eq!(projectile.id, 0);
        // Muzzle sits one combined radius along the aim direction
        assert!((projectile.position.x - (origin.x + 16.0 + 3.0)).abs() < 1e-9);
        assert!((projectile.velocity.x - 800.0).abs() < 1e-9);
        assert_eq!(world.players[0].weapon.clip, 24);
        assert!(!world.players[0].weapon.ready);
        assert_eq!(world.drain_audio()[0].sound, "pew");
    }

    #[test]
    fn test_last_round_then_dry_weapon() {
        let mut world = world_with_players(1);
        world.players[0].weapon.clip = 1;
        world.players[0].weapon.spare_ammo = 0;

        fire(&mut world, 0);
        assert_eq!(world.players[0].weapon.clip, 0);
        assert_eq!(world.projectiles.len(), 1);

        // Empty clip: firing is a no-op even once the cooldown clears
        cooldown_tick(&mut world.players[0].weapon, 1.0);
        fire(&mut world, 0);
        assert_eq!(world.projectiles.len(), 1);

        // And reloading with no spare ammo is a no-op too
        world.drain_audio();
        reload(&mut world, 0);
        assert!(!world.players[0].weapon.reloading);
        assert!(world.drain_audio().is_empty());
    }

    #[test]
    fn test_reload_transfers_partial_spare() {
        let mut world = world_with_players(1);
        {
            let weapon = &mut world.players[0].weapon;
            weapon.clip = 20;
            weapon.spare_ammo = 3;
        }
        reload(&mut world, 0);
        assert!(world.players[0].weapon.reloading);
        assert_eq!(world.drain_audio()[0].sound, "reload");

        // Starting again mid-reload is a no-op
        reload(&mut world, 0);
        assert!(world.drain_audio().is_empty());

        let weapon = &mut world.players[0].weapon;
        for _ in 0..91 {
            cooldown_tick(weapon, DT);
        }
        assert!(!weapon.reloading);
        assert_eq!(weapon.clip, 23);
        assert_eq!(weapon.spare_ammo, 0);
    }

    #[test]
    fn test_fire_cooldown_cycle() {
        let mut world = world_with_players(1);
        fire(&mut world, 0);
        fire(&mut world, 0);
        assert_eq!(world.projectiles.len(), 1, "second shot gated by cooldown");

        // 0.1s fire interval at 60Hz
        let weapon = &mut world.players[0].weapon;
        for _ in 0..7 {
            cooldown_tick(weapon, DT);
        }
        assert!(weapon.ready);
        fire(&mut world, 0);
        assert_eq!(world.projectiles.len(), 2);
    }

    #[test]
    fn test_projectile_hits_enemy() {
        let mut world = world_with_players(2);
        world.players[1].position = DVec2::new(500.0, 450.0);
        world.projectiles.push(Projectile {
            id: 0,
            position: DVec2::new(470.0, 450.0),
            velocity: DVec2::new(800.0, 0.0),
            owner_id: 0,
            damage: 3.0,
            radius: 3.0,
            remaining_ricochets: 4,
            ricochet_bonus: 1.5,
            alive: true,
        });

        advance_projectile(&mut world, 0, DT);

        assert!(!world.projectiles[0].alive);
        assert!((world.players[1].armor.health - 97.0).abs() < 1e-9);
        assert_eq!(world.drain_audio()[0].sound, "hit");
    }

    #[test]
    fn test_projectile_ignores_owner_and_dead() {
        let mut world = world_with_players(2);
        world.players[0].position = DVec2::new(470.0, 450.0);
        world.players[1].position = DVec2::new(500.0, 450.0);
        world.players[1].alive = false;
        world.projectiles.push(Projectile {
            id: 0,
            position: DVec2::new(470.0, 450.0),
            velocity: DVec2::new(800.0, 0.0),
            owner_id: 0,
            damage: 3.0,
            radius: 3.0,
            remaining_ricochets: 4,
            ricochet_bonus: 1.5,
            alive: true,
        });

        advance_projectile(&mut world, 0, DT);

        assert!(world.projectiles[0].alive);
        assert_eq!(world.players[1].armor.health, 100.0);
    }

    #[test]
    fn test_ricochet_reflects_and_charges_bonus() {
        let mut world = world_with_players(1);
        world.players[0].position = DVec2::new(450.0, 450.0);
        // Flying left into the x = 0 boundary wall
        world.projectiles.push(Projectile {
            id: 0,
            position: DVec2::new(10.0, 450.0),
            velocity: DVec2::new(-800.0, 0.0),
            owner_id: 0,
            damage: 3.0,
            radius: 3.0,
            remaining_ricochets: 2,
            ricochet_bonus: 1.5,
            alive: true,
        });

        advance_projectile(&mut world, 0, DT);

        let projectile = &world.projectiles[0];
        assert!(projectile.alive);
        assert_eq!(projectile.remaining_ricochets, 1);
        assert!(projectile.velocity.x > 0.0, "bounced back off the wall");
        let speed = projectile.velocity.length();
        assert!((speed - 800.0).abs() / 800.0 < 1e-3, "ricochet keeps speed");
        assert!((projectile.damage - 7.5).abs() < 1e-9);
        assert!((projectile.radius - 3.45).abs() < 1e-9);
        assert_eq!(world.drain_audio()[0].sound, "ding");
    }

    #[test]
    fn test_final_ricochet_kills_projectile() {
        let mut world = world_with_players(1);
        world.players[0].position = DVec2::new(450.0, 450.0);
        world.projectiles.push(Projectile {
            id: 0,
            position: DVec2::new(10.0, 450.0),
            velocity: DVec2::new(-800.0, 0.0),
            owner_id: 0,
            damage: 3.0,
            radius: 3.0,
            remaining_ricochets: 1,
            ricochet_bonus: 1.5,
            alive: true,
        });

        advance_projectile(&mut world, 0, DT);

        let projectile = &world.projectiles[0];
        assert_eq!(projectile.remaining_ricochets, 0);
        assert!(!projectile.alive);
        // Motion ends at the contact; the bounce is not followed this tick
        assert!(projectile.position.x < 20.0);
    }

    #[test]
    fn test_health_powerup_caps_at_max() {
        let mut world = world_with_players(1);
        world.players[0].armor.health = 80.0;
        consume_powerup(&mut world, 0, 0);
        assert_eq!(world.players[0].armor.health, 100.0);
        assert!(!world.arena.powerups[0].alive);
        assert_eq!(world.drain_audio()[0].sound, "recover");
    }

    #[test]
    fn test_full_health_leaves_powerup_alive() {
        let mut world = world_with_players(1);
        consume_powerup(&mut world, 0, 0);
        assert_eq!(world.players[0].armor.health, 100.0);
        assert!(world.arena.powerups[0].alive);
        assert!(world.drain_audio().is_empty());
    }

    #[test]
    fn test_ammo_powerup_restores_spares() {
        let mut world = world_with_players(1);
        world.players[0].weapon.spare_ammo = 5;
        // Powerup index 2 is an ammo site
        consume_powerup(&mut world, 2, 0);
        assert_eq!(world.players[0].weapon.spare_ammo, 25);
        assert!(!world.arena.powerups[2].alive);
    }

    #[test]
    fn test_dead_powerup_is_noop() {
        let mut world = world_with_players(1);
        world.players[0].armor.health = 10.0;
        world.arena.powerups[0].alive = false;
        consume_powerup(&mut world, 0, 0);
        assert_eq!(world.players[0].armor.health, 10.0);
    }

    #[test]
    fn test_phase_untouched_by_combat() {
        let mut world = world_with_players(2);
        apply_damage(&mut world, 1, 0, 1000.0);
        assert_eq!(world.phase, MatchPhase::Idle);
    }
}
