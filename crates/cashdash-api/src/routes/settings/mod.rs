//! Settings routes - Configuration display and theme preference

pub mod api;

pub use api::{api_set_theme, api_settings, api_theme, api_toggle_theme};
