pub mod resolver;
pub mod transport;
