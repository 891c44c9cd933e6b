pub mod config;
pub mod players;
pub mod scheduler;
pub mod surface;
pub mod utils;
