// Presentation layer - HTTP surface hosting the tide chart
pub mod app_state;
pub mod handlers;
