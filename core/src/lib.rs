pub mod emitter;
pub mod network;
