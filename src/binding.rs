//! Registration of interactively adjustable scene attributes.
//!
//! The registry only records *what* is adjustable and within which range. Drawing a control
//! and writing values back is the job of a [`BindingHost`], which goes through an
//! [`AttributeStore`] so that every attribute kind shares one code path.

use std::fmt;

use glam::Vec3;

use crate::error::{Result, ViewerError};
use crate::math::Color;
use crate::scene::{Node, NodeId, NodeKind};
use crate::traits::{AttributeStore, BindingHost};

/// Weak reference to the owner of a bound attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Viewer-wide animation state
    Animation,
    Node(NodeId),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Animation => write!(f, "animation"),
            Target::Node(id) => write!(f, "node {}", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    R,
    G,
    B,
}

impl Channel {
    pub fn get(&self, color: &Color) -> f32 {
        match self {
            Channel::R => color.r,
            Channel::G => color.g,
            Channel::B => color.b,
        }
    }

    pub fn set(&self, color: &mut Color, value: f32) {
        match self {
            Channel::R => color.r = value,
            Channel::G => color.g = value,
            Channel::B => color.b = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn get(&self, v: Vec3) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
            Axis::Z => v.z,
        }
    }

    pub fn set(&self, v: &mut Vec3, value: f32) {
        match self {
            Axis::X => v.x = value,
            Axis::Y => v.y = value,
            Axis::Z => v.z = value,
        }
    }
}

/// Broad family an attribute belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Scalar,
    ColorChannel,
    VectorComponent,
}

/// Attribute selector. Closed set; each variant knows how to reach its storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeId {
    RotationRate,
    Intensity,
    Color(Channel),
    Position(Axis),
}

impl AttributeId {
    pub fn kind(&self) -> BindingKind {
        match self {
            AttributeId::RotationRate | AttributeId::Intensity => BindingKind::Scalar,
            AttributeId::Color(_) => BindingKind::ColorChannel,
            AttributeId::Position(_) => BindingKind::VectorComponent,
        }
    }

    /// Short control label
    pub fn label(&self) -> &'static str {
        match self {
            AttributeId::RotationRate => "rate",
            AttributeId::Intensity => "intensity",
            AttributeId::Color(Channel::R) => "r",
            AttributeId::Color(Channel::G) => "g",
            AttributeId::Color(Channel::B) => "b",
            AttributeId::Position(Axis::X) => "x",
            AttributeId::Position(Axis::Y) => "y",
            AttributeId::Position(Axis::Z) => "z",
        }
    }

    /// Read this attribute from a node, `None` if the node has no such attribute
    pub fn read_node(&self, node: &Node) -> Option<f32> {
        match (self, &node.kind) {
            (AttributeId::Intensity, NodeKind::AmbientLight(light)) => Some(light.intensity),
            (AttributeId::Intensity, NodeKind::DirectionalLight(light)) => Some(light.intensity),
            (AttributeId::Color(ch), NodeKind::Mesh(mesh)) => Some(ch.get(&mesh.color)),
            (AttributeId::Color(ch), NodeKind::AmbientLight(light)) => Some(ch.get(&light.color)),
            (AttributeId::Color(ch), NodeKind::DirectionalLight(light)) => {
                Some(ch.get(&light.color))
            }
            (AttributeId::Position(axis), _) => Some(axis.get(node.transform.position)),
            _ => None,
        }
    }

    /// Write this attribute on a node. Returns false if the node has no such attribute.
    pub fn write_node(&self, node: &mut Node, value: f32) -> bool {
        match (self, &mut node.kind) {
            (AttributeId::Intensity, NodeKind::AmbientLight(light)) => light.intensity = value,
            (AttributeId::Intensity, NodeKind::DirectionalLight(light)) => light.intensity = value,
            (AttributeId::Color(ch), NodeKind::Mesh(mesh)) => ch.set(&mut mesh.color, value),
            (AttributeId::Color(ch), NodeKind::AmbientLight(light)) => ch.set(&mut light.color, value),
            (AttributeId::Color(ch), NodeKind::DirectionalLight(light)) => {
                ch.set(&mut light.color, value)
            }
            (AttributeId::Position(axis), _) => axis.set(&mut node.transform.position, value),
            _ => return false,
        }
        true
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Closed interval `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    min: f32,
    max: f32,
}

impl Range {
    /// Fails with `InvalidRange` when `min > max` or either bound is NaN
    pub fn new(min: f32, max: f32) -> Result<Self> {
        if !(min <= max) {
            return Err(ViewerError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// A registered (target, attribute, range) triple
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    target: Target,
    attribute: AttributeId,
    range: Range,
    group: Option<String>,
}

impl Binding {
    pub fn target(&self) -> Target {
        self.target
    }

    pub fn attribute(&self) -> AttributeId {
        self.attribute
    }

    pub fn range(&self) -> Range {
        self.range
    }

    /// Presentation-only folder path, segments separated by `/`
    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    /// Clamp `value` into range and write it through `store`, the way a host applies an edit.
    /// NaN and infinities are rejected and leave the attribute untouched.
    pub fn apply(&self, store: &mut dyn AttributeStore, value: f32) -> Result<f32> {
        if !value.is_finite() {
            return Err(ViewerError::ValueOutOfRange {
                value,
                range: self.range,
            });
        }
        let value = self.range.clamp(value);
        store.write(self.target, self.attribute, value)?;
        Ok(value)
    }
}

/// Records bound attributes in registration order
#[derive(Debug, Default)]
pub struct BindingRegistry {
    bindings: Vec<Binding>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind without a group label
    pub fn bind(
        &mut self,
        store: &dyn AttributeStore,
        target: Target,
        attribute: AttributeId,
        min: f32,
        max: f32,
    ) -> Result<()> {
        self.record(None, store, target, attribute, min, max)
    }

    /// Scope subsequent binds under a group label
    pub fn group<'r>(&'r mut self, label: &str) -> Group<'r> {
        Group {
            registry: self,
            label: label.to_string(),
        }
    }

    fn record(
        &mut self,
        group: Option<String>,
        store: &dyn AttributeStore,
        target: Target,
        attribute: AttributeId,
        min: f32,
        max: f32,
    ) -> Result<()> {
        let range = Range::new(min, max)?;
        let value = store.read(target, attribute)?;
        if !range.contains(value) {
            return Err(ViewerError::ValueOutOfRange { value, range });
        }

        log::debug!(
            "bound {} on {} to {}{}",
            attribute,
            target,
            range,
            group.as_deref().map(|g| format!(" in {}", g)).unwrap_or_default()
        );
        self.bindings.push(Binding {
            target,
            attribute,
            range,
            group,
        });
        Ok(())
    }

    /// Hand every binding to `host`, in registration order
    pub fn publish(&self, host: &mut dyn BindingHost) {
        for binding in &self.bindings {
            host.register(binding);
        }
    }

    pub fn bindings(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    pub fn find(&self, target: Target, attribute: AttributeId) -> Option<&Binding> {
        self.bindings
            .iter()
            .find(|b| b.target == target && b.attribute == attribute)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Binder that stamps a group label on everything it registers
pub struct Group<'r> {
    registry: &'r mut BindingRegistry,
    label: String,
}

impl Group<'_> {
    pub fn bind(
        &mut self,
        store: &dyn AttributeStore,
        target: Target,
        attribute: AttributeId,
        min: f32,
        max: f32,
    ) -> Result<&mut Self> {
        self.registry
            .record(Some(self.label.clone()), store, target, attribute, min, max)?;
        Ok(self)
    }
}
