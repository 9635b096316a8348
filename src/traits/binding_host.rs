use crate::binding::{AttributeId, Binding, Target};
use crate::error::Result;

/// Explicit getter/setter access to bindable attribute storage
pub trait AttributeStore {
    /// Current value of `attribute` on `target`
    fn read(&self, target: Target, attribute: AttributeId) -> Result<f32>;

    /// Overwrite `attribute` on `target`. No clamping happens here.
    fn write(&mut self, target: Target, attribute: AttributeId, value: f32) -> Result<()>;
}

/// Binding host - renders a control per binding and writes edits through an [`AttributeStore`]
pub trait BindingHost {
    /// Register a control for a binding
    fn register(&mut self, binding: &Binding);
}
