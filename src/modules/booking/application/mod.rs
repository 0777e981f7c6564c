pub mod conversation;
pub mod ports;
