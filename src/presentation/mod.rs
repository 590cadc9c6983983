// Presentation layer - HTTP handlers and response views
pub mod app_state;
pub mod handlers;
pub mod views;
