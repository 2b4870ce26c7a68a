//! Platform abstraction layer
//!
//! The simulation and scheduler are platform-free; this module holds the
//! browser host. The native host lives in `main.rs`.

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebGame;
