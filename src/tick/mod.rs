pub mod match_tick;
pub mod snapshot;
