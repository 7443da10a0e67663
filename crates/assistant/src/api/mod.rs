//! Backend REST API client and wire types

pub mod types;

mod client;

pub use client::ApiClient;
