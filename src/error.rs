use thiserror::Error;

use crate::binding::{AttributeId, Range, Target};
use crate::scene::NodeId;

/// Errors raised by the viewer core and its collaborators
#[derive(Error, Debug)]
pub enum ViewerError {
    /// Binding range with `min > max`
    #[error("invalid range: min {min} is greater than max {max}")]
    InvalidRange { min: f32, max: f32 },

    /// `start()` called while the render loop is already running
    #[error("render loop is already running")]
    AlreadyRunning,

    /// The renderer lost its drawing surface mid-loop
    #[error("render surface lost")]
    SurfaceLost,

    #[error("node {0} is already in the scene graph")]
    DuplicateNode(NodeId),

    #[error("node {0} is not in the scene graph")]
    UnknownNode(NodeId),

    #[error("{target} has no attribute {attribute}")]
    UnknownAttribute { target: Target, attribute: AttributeId },

    /// Current value lies outside the range it is being bound to
    #[error("value {value} is outside {range}")]
    ValueOutOfRange { value: f32, range: Range },

    /// Any other GPU failure
    #[error("render error: {0}")]
    Render(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
