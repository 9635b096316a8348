pub mod animation;
pub mod clock;
pub mod input_adapter;
pub mod render_loop;

pub use animation::AnimationState;
pub use render_loop::{LoopState, RenderLoop, StopHandle, TickOutcome};
