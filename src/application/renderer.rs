// Draw stage contract
use crate::domain::chart::ChartFrame;

/// Turns a laid-out frame into some drawable output.
///
/// Implementations never touch the data pipeline: they receive a finished,
/// immutable frame and produce a fresh output for it.
pub trait Renderer {
    type Output;

    fn draw(&self, frame: &ChartFrame) -> Self::Output;
}
