//! Chat interaction controller

mod controller;

pub use controller::{ChatController, PendingSend};
