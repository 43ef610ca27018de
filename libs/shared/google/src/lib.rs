pub mod client;

pub use client::GoogleApiClient;
