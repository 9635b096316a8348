pub mod binding;
pub mod camera;
pub mod cli;
pub mod config;
pub mod controls;
pub mod core;
pub mod error;
pub mod math;
pub mod panel;
pub mod renderer;
pub mod scene;
pub mod state;
pub mod traits;
pub mod types;
pub mod viewer;
pub mod window;

pub use error::{Result, ViewerError};
pub use viewer::Viewer;
