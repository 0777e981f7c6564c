pub mod auth;
pub mod booking;
pub mod content;
pub mod remote;
pub mod storage;
