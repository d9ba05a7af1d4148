use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinHandle;
use crate::state::commands::MatchCommand;
use crate::state::world::World;

pub type MatchCode = String;

/// Handle to a match with its command queue and tick task
pub struct MatchHandle {
    pub world: Arc<RwLock<World>>,
    pub command_tx: mpsc::Sender<MatchCommand>,
    pub task_handle: JoinHandle<()>,
    pub max_players: u32,
}

/// Server state partitioned by match
/// Uses DashMap for concurrent access without global locks
pub struct ServerState {
    matches: DashMap<MatchCode, MatchHandle>,
    next_player_id: AtomicU32,
}

impl ServerState {
    pub fn new() -> Self {
        Self {
            matches: DashMap::new(),
            next_player_id: AtomicU32::new(1),
        }
    }

    /// Get command sender for a match (for UDP handlers)
    /// Returns None if the match doesn't exist
    pub fn get_match_tx(&self, match_code: &str) -> Option<mpsc::Sender<MatchCommand>> {
        self.matches.get(match_code)
            .map(|entry| entry.command_tx.clone())
    }

    /// Get match world handle (for HTTP handlers)
    pub fn get_match(&self, match_code: &str) -> Option<Arc<RwLock<World>>> {
        self.matches.get(match_code)
            .map(|entry| entry.world.clone())
    }

    pub fn get_max_players(&self, match_code: &str) -> Option<u32> {
        self.matches.get(match_code)
            .map(|entry| entry.max_players)
    }

    /// Check if a match exists
    pub fn match_exists(&self, match_code: &str) -> bool {
        self.matches.contains_key(match_code)
    }

    /// Generate next player ID (lock-free)
    pub fn next_player_id(&self) -> u32 {
        self.next_player_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Insert a new match handle
    pub fn insert_match(&self, code: MatchCode, handle: MatchHandle) {
        self.matches.insert(code, handle);
    }

    /// Remove a match (graceful shutdown)
    pub fn remove_match(&self, match_code: &str) -> Option<MatchHandle> {
        self.matches.remove(match_code).map(|(_, handle)| handle)
    }

    /// Iterate over all matches (for listings and cleanup)
    pub fn iter_matches(&self) -> dashmap::iter::Iter<'_, MatchCode, MatchHandle> {
        self.matches.iter()
    }

    /// Get match count
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}
