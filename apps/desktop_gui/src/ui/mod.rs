//! UI layer for the desktop GUI: app shell and view rendering.

pub mod app;
pub mod views;

pub use app::LateShowApp;
