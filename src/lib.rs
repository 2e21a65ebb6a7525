pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod network;
pub mod notify;
pub mod protocol;
pub mod session;
pub mod storage;
