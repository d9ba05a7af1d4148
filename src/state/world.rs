use std::collections::HashMap;
use std::net::SocketAddr;

use glam::DVec2;
use smallvec::SmallVec;

use crate::state::entities::{Armor, Player, Powerup, PowerupKind, Projectile, Weapon};
use crate::utils::buffers::{AudioCue, SmallAudioVec};
use crate::utils::tuning::MatchTuning;

pub const ARENA_WIDTH: f64 = 900.0;
pub const ARENA_HEIGHT: f64 = 900.0;

/// Position dead players are parked at so they cannot take part in any
/// collision test
pub const OFF_ARENA: DVec2 = DVec2::new(-10_000.0, -10_000.0);

/// Match lifecycle. `Idle` accepts connections, `Running` ticks the
/// simulation, `Ended` halts it for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    Idle,
    Running,
    Ended { winner: u32 },
}

/// Static terrain plus the powerup set. Geometry is immutable; only
/// powerup liveness ever changes.
#[derive(Debug, Clone)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
    terrain: Vec<(DVec2, DVec2)>,
    pub powerups: Vec<Powerup>,
}

impl Arena {
    pub fn new() -> Self {
        let p = |x: f64, y: f64| DVec2::new(x, y);
        // Octagonal boundary plus an eight-pointed star in the middle
        let terrain = vec![
            (p(700.0, 0.0), p(900.0, 200.0)),
            (p(0.0, 200.0), p(0.0, 700.0)),
            (p(0.0, 700.0), p(200.0, 900.0)),
            (p(700.0, 0.0), p(200.0, 0.0)),
            (p(200.0, 900.0), p(700.0, 900.0)),
            (p(700.0, 900.0), p(900.0, 700.0)),
            (p(900.0, 700.0), p(900.0, 200.0)),
            (p(200.0, 0.0), p(0.0, 200.0)),
            (p(200.0, 450.0), p(375.0, 375.0)),
            (p(375.0, 375.0), p(450.0, 200.0)),
            (p(450.0, 200.0), p(525.0, 375.0)),
            (p(525.0, 375.0), p(700.0, 450.0)),
            (p(700.0, 450.0), p(525.0, 525.0)),
            (p(525.0, 525.0), p(450.0, 700.0)),
            (p(450.0, 700.0), p(375.0, 525.0)),
            (p(375.0, 525.0), p(200.0, 450.0)),
        ];
        let powerups = vec![
            Powerup::new(PowerupKind::Health, p(450.0, 800.0)),
            Powerup::new(PowerupKind::Health, p(450.0, 100.0)),
            Powerup::new(PowerupKind::Ammo, p(100.0, 450.0)),
            Powerup::new(PowerupKind::Ammo, p(800.0, 450.0)),
        ];
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            terrain,
            powerups,
        }
    }

    pub fn segments(&self) -> &[(DVec2, DVec2)] {
        &self.terrain
    }

    /// Tick every consumed powerup's respawn countdown
    pub fn advance_cooldowns(&mut self, dt: f64) {
        for powerup in &mut self.powerups {
            powerup.advance_cooldown(dt);
        }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

/// The single simulation context: the only place world state lives, owned
/// by the match tick task and passed by reference into the domain logic.
#[derive(Debug)]
pub struct World {
    pub phase: MatchPhase,
    pub tuning: MatchTuning,
    pub players: Vec<Player>,
    pub arena: Arena,
    pub projectiles: Vec<Projectile>,
    pub next_projectile_id: u64,
    pub audio: SmallAudioVec,
    pub client_addresses: HashMap<u32, SocketAddr>,
}

impl World {
    pub fn new(tuning: MatchTuning) -> Self {
        Self {
            phase: MatchPhase::Idle,
            tuning,
            players: Vec::new(),
            arena: Arena::new(),
            projectiles: Vec::new(),
            next_projectile_id: 0,
            audio: SmallVec::new(),
            client_addresses: HashMap::new(),
        }
    }

    /// Instantiate a player with the match's current tuning. Duplicate ids
    /// are ignored.
    pub fn connect_player(&mut self, player_id: u32) {
        if self.player_index(player_id).is_some() {
            return;
        }
        let player = Player::new(
            player_id,
            Armor::new(&self.tuning.armor),
            Weapon::new(&self.tuning.weapon),
            self.tuning.respawn_time,
        );
        self.players.push(player);
    }

    pub fn player_index(&self, player_id: u32) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    pub fn player_mut(&mut self, player_id: u32) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == player_id)
    }

    /// Swap in a tuning preset at match start: current players get fresh
    /// weapons built from it, future connects inherit it.
    pub fn apply_tuning(&mut self, tuning: MatchTuning) {
        for player in &mut self.players {
            player.weapon = Weapon::new(&tuning.weapon);
        }
        self.tuning = tuning;
    }

    pub fn play_sound(&mut self, sound: &'static str, position: DVec2) {
        self.audio.push(AudioCue::new(sound, position.x, position.y));
    }

    /// Take this tick's audio cues, leaving the buffer empty
    pub fn drain_audio(&mut self) -> SmallAudioVec {
        std::mem::take(&mut self.audio)
    }

    pub fn allocate_projectile_id(&mut self) -> u64 {
        let id = self.next_projectile_id;
        self.next_projectile_id += 1;
        id
    }
}
