pub mod combat;
pub mod geometry;
pub mod movement;
pub mod simulation;
