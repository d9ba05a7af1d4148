pub mod commands;
pub mod entities;
pub mod server_state;
pub mod world;
