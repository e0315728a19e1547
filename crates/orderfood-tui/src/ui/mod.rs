//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, title/status bars and overlays
//! - `input`: keyboard handling
//! - `styles`: colors and text styles
//! - `screens`: one renderer per route (menu, forms, cart, orders)

pub mod input;
pub mod render;
pub mod screens;
pub mod styles;
