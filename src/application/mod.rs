// Application layer - Use cases and ports
pub mod renderer;
pub mod tide_provider;
pub mod tide_service;
pub mod tide_view;
