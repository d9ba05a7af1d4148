use glam::DVec2;

use crate::utils::tuning::{ArmorTuning, WeaponTuning};

pub const POWERUP_RADIUS: f64 = 16.0;
pub const POWERUP_RESPAWN_TIME: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerupKind {
    Health,
    Ammo,
}

impl PowerupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerupKind::Health => "health",
            PowerupKind::Ammo => "ammo",
        }
    }
}

/// Timed pickup. Created once at arena init and toggled alive/dead on
/// consumption and respawn, never destroyed.
#[derive(Debug, Clone)]
pub struct Powerup {
    pub kind: PowerupKind,
    pub position: DVec2,
    pub radius: f64,
    pub alive: bool,
    pub respawn_time: f64,
    pub cooldown_remaining: f64,
}

impl Powerup {
    pub fn new(kind: PowerupKind, position: DVec2) -> Self {
        Self {
            kind,
            position,
            radius: POWERUP_RADIUS,
            alive: true,
            respawn_time: POWERUP_RESPAWN_TIME,
            cooldown_remaining: POWERUP_RESPAWN_TIME,
        }
    }

    /// Tick the respawn countdown of a consumed powerup
    pub fn advance_cooldown(&mut self, dt: f64) {
        if self.alive {
            return;
        }
        self.cooldown_remaining -= dt;
        if self.cooldown_remaining <= 0.0 {
            self.alive = true;
            self.cooldown_remaining = self.respawn_time;
        }
    }
}

#[derive(Debug, Clone)]
pub struct Armor {
    pub max_health: f64,
    pub health: f64,
    pub move_speed: f64,
    pub collision_radius: f64,
}

impl Armor {
    pub fn new(tuning: &ArmorTuning) -> Self {
        Self {
            max_health: tuning.max_health,
            health: tuning.max_health,
            move_speed: tuning.move_speed,
            collision_radius: tuning.collision_radius,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Weapon {
    pub damage: f64,
    pub fire_interval: f64,
    pub cooldown_remaining: f64,
    pub ready: bool,
    pub projectile_radius: f64,
    pub projectile_speed: f64,
    pub ricochet_count: u32,
    pub ricochet_bonus: f64,
    pub max_clip: u32,
    pub clip: u32,
    pub max_spare_ammo: u32,
    pub spare_ammo: u32,
    pub reloading: bool,
    pub reload_time: f64,
    pub reload_remaining: f64,
}

impl Weapon {
    pub fn new(tuning: &WeaponTuning) -> Self {
        let fire_interval = 1.0 / tuning.fire_rate;
        Self {
            damage: tuning.damage,
            fire_interval,
            cooldown_remaining: fire_interval,
            ready: true,
            projectile_radius: tuning.projectile_radius,
            projectile_speed: tuning.projectile_speed,
            ricochet_count: tuning.ricochet_count,
            ricochet_bonus: tuning.ricochet_bonus,
            max_clip: tuning.clip,
            clip: tuning.clip,
            max_spare_ammo: tuning.spare_ammo,
            spare_ammo: tuning.spare_ammo,
            reloading: false,
            reload_time: tuning.reload_time,
            reload_remaining: tuning.reload_time,
        }
    }

    pub fn refill(&mut self) {
        self.clip = self.max_clip;
        self.spare_ammo = self.max_spare_ammo;
        self.reloading = false;
        self.reload_remaining = self.reload_time;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MovementFlags {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementFlags {
    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// Player entity. Created on connect, persists for the match lifetime;
/// death only toggles `alive` and relocates the body off-arena.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub position: DVec2,
    pub facing_angle: f64,
    pub movement: MovementFlags,
    pub firing: bool,
    pub alive: bool,
    pub kill_count: u32,
    pub death_count: u32,
    pub respawn_time: f64,
    pub respawn_remaining: f64,
    pub armor: Armor,
    pub weapon: Weapon,
}

impl Player {
    pub fn new(id: u32, armor: Armor, weapon: Weapon, respawn_time: f64) -> Self {
        Self {
            id,
            name: format!("Player{}", id),
            position: spawn_point(id),
            facing_angle: 0.0,
            movement: MovementFlags::default(),
            firing: false,
            alive: true,
            kill_count: 0,
            death_count: 0,
            respawn_time,
            respawn_remaining: respawn_time,
            armor,
            weapon,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.movement.any()
    }
}

/// Fixed spawn coordinate for a player slot (four predefined slots)
pub fn spawn_point(player_id: u32) -> DVec2 {
    match player_id % 4 {
        0 => DVec2::new(200.0, 700.0),
        1 => DVec2::new(700.0, 200.0),
        2 => DVec2::new(200.0, 200.0),
        _ => DVec2::new(700.0, 700.0),
    }
}

/// Live projectile. Removed from the world when it hits an enemy or runs
/// out of ricochets.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u64,
    pub position: DVec2,
    pub velocity: DVec2,
    pub owner_id: u32,
    pub damage: f64,
    pub radius: f64,
    pub remaining_ricochets: u32,
    pub ricochet_bonus: f64,
    pub alive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::tuning::MatchTuning;

    fn default_player(id: u32) -> Player {
        let tuning = MatchTuning::default();
        Player::new(
            id,
            Armor::new(&tuning.armor),
            Weapon::new(&tuning.weapon),
            tuning.respawn_time,
        )
    }

    #[test]
    fn test_spawn_slots_wrap() {
        assert_eq!(spawn_point(0), DVec2::new(200.0, 700.0));
        assert_eq!(spawn_point(1), DVec2::new(700.0, 200.0));
        assert_eq!(spawn_point(2), DVec2::new(200.0, 200.0));
        assert_eq!(spawn_point(3), DVec2::new(700.0, 700.0));
        assert_eq!(spawn_point(5), spawn_point(1));
    }

    #[test]
    fn test_new_player_defaults() {
        let player = default_player(2);
        assert_eq!(player.name, "Player2");
        assert_eq!(player.position, spawn_point(2));
        assert!(player.alive);
        assert!(!player.is_moving());
        assert_eq!(player.weapon.clip, 25);
        assert!((player.armor.health - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_powerup_cooldown_cycle() {
        let mut powerup = Powerup::new(PowerupKind::Health, DVec2::new(450.0, 800.0));
        powerup.alive = false;
        for _ in 0..187 {
            powerup.advance_cooldown(0.016);
        }
        assert!(!powerup.alive, "3s cooldown should not elapse in 2.99s");
        powerup.advance_cooldown(0.016);
        assert!(powerup.alive);
        assert!((powerup.cooldown_remaining - POWERUP_RESPAWN_TIME).abs() < f64::EPSILON);
    }

    #[test]
    fn test_weapon_refill() {
        let tuning = MatchTuning::default();
        let mut weapon = Weapon::new(&tuning.weapon);
        weapon.clip = 0;
        weapon.spare_ammo = 3;
        weapon.reloading = true;
        weapon.refill();
        assert_eq!(weapon.clip, weapon.max_clip);
        assert_eq!(weapon.spare_ammo, weapon.max_spare_ammo);
        assert!(!weapon.reloading);
    }
}
