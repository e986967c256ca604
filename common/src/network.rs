pub mod interface;
pub mod target;
