use std::collections::HashMap;
use std::net::SocketAddr;
use tokio::sync::mpsc;

/// One of the bindable actions a client can start or end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKey {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Fire,
    Reload,
}

impl ActionKey {
    /// Wire names are the original client key bindings
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "W" => Some(ActionKey::MoveUp),
            "S" => Some(ActionKey::MoveDown),
            "A" => Some(ActionKey::MoveLeft),
            "D" => Some(ActionKey::MoveRight),
            "R" => Some(ActionKey::Reload),
            "0" => Some(ActionKey::Fire),
            _ => None,
        }
    }
}

/// Command sent from the network handlers to a match tick loop
#[derive(Debug, Clone)]
pub enum MatchCommand {
    Connect {
        player_id: u32,
        /// UDP return address for broadcasts; absent on HTTP joins until
        /// the client's first datagram arrives
        addr: Option<SocketAddr>,
    },
    StartGame {
        mode: Option<String>,
    },
    StartAction {
        player_id: u32,
        key: ActionKey,
    },
    EndAction {
        player_id: u32,
        key: ActionKey,
    },
    // Aim updates (only latest kept per player)
    UpdateDirection {
        player_id: u32,
        angle: f64,
    },
}

/// Coalesce queued commands, keeping only the latest aim update per
/// player. Intent flags are latest-known-value state, so stale aim
/// packets can be dropped without changing the observable behavior.
pub fn drain_and_coalesce(rx: &mut mpsc::Receiver<MatchCommand>) -> Vec<MatchCommand> {
    let mut latest_aims: HashMap<u32, MatchCommand> = HashMap::new();
    let mut other_commands: Vec<MatchCommand> = Vec::new();

    while let Ok(cmd) = rx.try_recv() {
        match cmd {
            MatchCommand::UpdateDirection { player_id, .. } => {
                latest_aims.insert(player_id, cmd);
            }
            _ => other_commands.push(cmd),
        }
    }

    other_commands.extend(latest_aims.into_values());
    other_commands
}
