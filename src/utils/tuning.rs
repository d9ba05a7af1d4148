/// Weapon constants threaded into every `Weapon` built for a match
#[derive(Debug, Clone)]
pub struct WeaponTuning {
    pub damage: f64,
    /// Shots per second; the fire interval is `1 / fire_rate`
    pub fire_rate: f64,
    pub projectile_radius: f64,
    pub projectile_speed: f64,
    pub ricochet_count: u32,
    /// Damage multiplier gained per terrain bounce
    pub ricochet_bonus: f64,
    pub clip: u32,
    pub spare_ammo: u32,
    pub reload_time: f64,
}

/// Armor constants for the default loadout
#[derive(Debug, Clone)]
pub struct ArmorTuning {
    pub max_health: f64,
    pub move_speed: f64,
    pub collision_radius: f64,
}

/// Immutable per-match tuning, selected once at match start.
/// Never shared mutably: every match owns its own copy, so a mode applied
/// to one match cannot leak into another.
#[derive(Debug, Clone)]
pub struct MatchTuning {
    pub weapon: WeaponTuning,
    pub armor: ArmorTuning,
    pub respawn_time: f64,
}

impl Default for MatchTuning {
    fn default() -> Self {
        Self {
            weapon: WeaponTuning {
                damage: 3.0,
                fire_rate: 10.0,
                projectile_radius: 3.0,
                projectile_speed: 800.0,
                ricochet_count: 4,
                ricochet_bonus: 1.5,
                clip: 25,
                spare_ammo: 40,
                reload_time: 1.5,
            },
            armor: ArmorTuning {
                max_health: 100.0,
                move_speed: 240.0,
                collision_radius: 16.0,
            },
            respawn_time: 1.75,
        }
    }
}

impl MatchTuning {
    /// Resolve a named mode into a tuning preset. Unrecognized names keep
    /// the defaults unchanged.
    pub fn for_mode(mode: Option<&str>) -> Self {
        let mut tuning = Self::default();
        match mode {
            Some("slowmo-mode") => {
                tuning.weapon.projectile_speed = 400.0;
                tuning.weapon.damage = 8.0;
                tuning.weapon.fire_rate = 8.0;
            }
            Some("bullethell-mode") => {
                tuning.weapon.damage = 2.0;
                tuning.weapon.fire_rate = 20.0;
                tuning.weapon.clip = 125;
                tuning.weapon.spare_ammo = 400;
            }
            _ => {}
        }
        tuning
    }

    pub fn fire_interval(&self) -> f64 {
        1.0 / self.weapon.fire_rate
    }
}
