use crate::camera::Camera;
use crate::error::Result;
use crate::scene::SceneGraph;

/// Scene renderer - draws every node of a scene graph through a camera
pub trait Renderer {
    /// Resize the drawing surface in physical pixels
    fn resize(&mut self, width: u32, height: u32);

    /// Current drawing surface size in physical pixels
    fn size(&self) -> (u32, u32);

    /// Draw the nodes yielded by [`SceneGraph::all_nodes`], in order
    fn render(&mut self, scene: &SceneGraph, camera: &Camera) -> Result<()>;
}
