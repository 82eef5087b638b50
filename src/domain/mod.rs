// Domain layer - Tide data, transforms and derived chart models
pub mod chart;
pub mod error;
pub mod extrema;
pub mod fishing;
pub mod nearest;
pub mod scale;
pub mod station;
pub mod tide;
