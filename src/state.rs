use crate::binding::{AttributeId, Target};
use crate::core::animation::AnimationState;
use crate::error::{Result, ViewerError};
use crate::scene::SceneGraph;
use crate::traits::AttributeStore;

/// Mutable scene data shared by the render loop and the binding host
#[derive(Debug, Clone, Default)]
pub struct SceneState {
    pub scene: SceneGraph,
    pub animation: AnimationState,
}

impl SceneState {
    pub fn new(scene: SceneGraph, animation: AnimationState) -> Self {
        Self { scene, animation }
    }
}

impl AttributeStore for SceneState {
    fn read(&self, target: Target, attribute: AttributeId) -> Result<f32> {
        match (target, attribute) {
            (Target::Animation, AttributeId::RotationRate) => Ok(self.animation.rate),
            (Target::Node(id), attribute) => {
                let node = self.scene.node(id).ok_or(ViewerError::UnknownNode(id))?;
                attribute
                    .read_node(node)
                    .ok_or(ViewerError::UnknownAttribute { target, attribute })
            }
            _ => Err(ViewerError::UnknownAttribute { target, attribute }),
        }
    }

    fn write(&mut self, target: Target, attribute: AttributeId, value: f32) -> Result<()> {
        match (target, attribute) {
            (Target::Animation, AttributeId::RotationRate) => {
                self.animation.rate = value;
                Ok(())
            }
            (Target::Node(id), attribute) => {
                let node = self.scene.node_mut(id).ok_or(ViewerError::UnknownNode(id))?;
                if attribute.write_node(node, value) {
                    Ok(())
                } else {
                    Err(ViewerError::UnknownAttribute { target, attribute })
                }
            }
            _ => Err(ViewerError::UnknownAttribute { target, attribute }),
        }
    }
}
