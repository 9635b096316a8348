use winit::window::Window;

use crate::binding::{AttributeId, Binding, BindingKind};
use crate::error::{Result, ViewerError};
use crate::traits::{AttributeStore, BindingHost};

/// Window title of the parameter panel
pub const PANEL_TITLE: &str = "Debug";

/// Tessellated panel output, ready for the renderer's overlay pass
pub struct PanelFrame {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

/// One folder of controls; nested by the `/`-separated group path of each binding
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Folder {
    pub name: String,
    pub controls: Vec<Binding>,
    pub children: Vec<Folder>,
}

impl Folder {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn insert(&mut self, path: &[&str], binding: Binding) {
        match path.split_first() {
            None => self.controls.push(binding),
            Some((head, rest)) => {
                let index = match self.children.iter().position(|c| c.name == *head) {
                    Some(index) => index,
                    None => {
                        self.children.push(Folder::named(head));
                        self.children.len() - 1
                    }
                };
                self.children[index].insert(rest, binding);
            }
        }
    }

    pub fn child(&self, name: &str) -> Option<&Folder> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Walk a `/`-separated path
    pub fn find(&self, path: &str) -> Option<&Folder> {
        path.split('/')
            .filter(|s| !s.is_empty())
            .try_fold(self, |folder, name| folder.child(name))
    }

    /// Controls in this folder and all sub-folders
    pub fn control_count(&self) -> usize {
        self.controls.len() + self.children.iter().map(Folder::control_count).sum::<usize>()
    }
}

/// Folder tree of registered bindings, independent of any UI toolkit
#[derive(Debug, Clone, Default)]
pub struct PanelLayout {
    root: Folder,
}

impl PanelLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &Folder {
        &self.root
    }
}

impl BindingHost for PanelLayout {
    fn register(&mut self, binding: &Binding) {
        let path: Vec<&str> = binding
            .group()
            .map(|g| g.split('/').filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();
        self.root.insert(&path, binding.clone());
    }
}

/// egui debug panel: one slider per binding, grouped into collapsible folders.
///
/// Slider edits are clamped to the binding range by egui and written straight
/// through the [`AttributeStore`] in the same frame.
pub struct DebugPanel {
    layout: PanelLayout,
    title: String,
    ctx: egui::Context,
    state: egui_winit::State,
}

impl DebugPanel {
    pub fn new(window: &Window, title: &str) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        Self {
            layout: PanelLayout::new(),
            title: title.to_string(),
            ctx,
            state,
        }
    }

    /// Returns true when egui consumed the event
    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Build the panel for this frame, applying any slider edits to `store`
    pub fn run(
        &mut self,
        window: &Window,
        store: &mut dyn AttributeStore,
        fps: f32,
    ) -> Result<PanelFrame> {
        let raw_input = self.state.take_egui_input(window);
        let root = &self.layout.root;
        let title = &self.title;
        let mut failure: Option<ViewerError> = None;

        let full_output = self.ctx.run(raw_input, |ctx| {
            egui::Window::new(title.as_str())
                .title_bar(true)
                .resizable(false)
                .default_pos(egui::pos2(10.0, 10.0))
                .default_width(260.0)
                .show(ctx, |ui| {
                    ui.label(
                        egui::RichText::new(format!("{:.0} FPS", fps))
                            .size(14.0)
                            .color(egui::Color32::GRAY),
                    );
                    ui.separator();
                    draw_folder(ui, root, "", store, &mut failure);
                });
        });

        self.state
            .handle_platform_output(window, full_output.platform_output);

        if let Some(e) = failure {
            return Err(e);
        }

        let primitives = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        Ok(PanelFrame {
            primitives,
            textures_delta: full_output.textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        })
    }
}

impl BindingHost for DebugPanel {
    fn register(&mut self, binding: &Binding) {
        self.layout.register(binding);
    }
}

fn draw_folder(
    ui: &mut egui::Ui,
    folder: &Folder,
    path: &str,
    store: &mut dyn AttributeStore,
    failure: &mut Option<ViewerError>,
) {
    for binding in &folder.controls {
        draw_control(ui, binding, store, failure);
    }

    for child in &folder.children {
        let child_path = format!("{}/{}", path, child.name);
        egui::CollapsingHeader::new(child.name.as_str())
            .id_salt(&child_path)
            .default_open(true)
            .show(ui, |ui| draw_folder(ui, child, &child_path, store, failure));
    }
}

fn draw_control(
    ui: &mut egui::Ui,
    binding: &Binding,
    store: &mut dyn AttributeStore,
    failure: &mut Option<ViewerError>,
) {
    let label = binding.attribute().label();
    let mut value = match store.read(binding.target(), binding.attribute()) {
        Ok(value) => value,
        Err(e) => {
            ui.label(format!("{}: unavailable", label));
            failure.get_or_insert(e);
            return;
        }
    };

    let range = binding.range();
    let response = ui.add(
        egui::Slider::new(&mut value, range.min()..=range.max())
            .step_by(slider_step(binding.attribute()))
            .text(label),
    );
    if response.changed() {
        if let Err(e) = store.write(binding.target(), binding.attribute(), value) {
            failure.get_or_insert(e);
        }
    }
}

/// Slider increment for an attribute; 0 means continuous
fn slider_step(attribute: AttributeId) -> f64 {
    match attribute.kind() {
        BindingKind::Scalar => 0.0,
        BindingKind::ColorChannel => 1.0 / 255.0,
        BindingKind::VectorComponent => 0.01,
    }
}
