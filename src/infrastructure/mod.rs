// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod http_response;
pub mod json_mapper;
pub mod noaa_client;
pub mod scene_renderer;
pub mod svg_renderer;
