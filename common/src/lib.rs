pub mod config;
pub mod emission;
pub mod error;
pub mod network;
pub mod utils;
