pub mod binding_host;
pub mod controls;
pub mod renderer;
pub mod scheduler;

pub use binding_host::*;
pub use controls::*;
pub use renderer::*;
pub use scheduler::*;
