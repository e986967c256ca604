//! Integration tests for the emission worker, driven by scripted
//! collaborators instead of raw sockets.

pub mod utils;

mod emission;
