pub mod client;
pub mod http_api;

pub use client::SaveClient;
