//! gamelink - hand a game title to the recommendation page
//!
//! The title is percent-encoded into `?game=` and either loaded in the current
//! page or opened in the user's default browser.

pub mod submission;

#[cfg(not(target_arch = "wasm32"))]
pub mod api_routes;
#[cfg(not(target_arch = "wasm32"))]
pub mod catalog;
#[cfg(not(target_arch = "wasm32"))]
pub mod config;
#[cfg(not(target_arch = "wasm32"))]
pub mod server;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;
