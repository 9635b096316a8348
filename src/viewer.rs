use glam::Vec3;

use crate::binding::{AttributeId, Axis, BindingRegistry, Channel, Target};
use crate::camera::{Camera, DEFAULT_FAR, DEFAULT_FOV_DEGREES, DEFAULT_NEAR};
use crate::config::ViewerConfig;
use crate::core::animation::AnimationState;
use crate::core::render_loop::{RenderLoop, StopHandle, TickOutcome};
use crate::error::Result;
use crate::math::Color;
use crate::scene::{BoxGeometry, Node, NodeId, SceneGraph};
use crate::state::SceneState;
use crate::traits::{AttributeStore, BindingHost, Controls, FrameScheduler, Renderer};

const COLOR_CHANNELS: [Channel; 3] = [Channel::R, Channel::G, Channel::B];
const AXES: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

/// Node ids of the default scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneNodes {
    pub mesh: NodeId,
    pub ambient: NodeId,
    pub directional: NodeId,
}

/// Spinning box, two lights, a camera and a slider per tweakable value.
///
/// Owns every node and the camera. The binding host only ever sees
/// [`Binding`](crate::binding::Binding)s and writes back through the
/// viewer's [`AttributeStore`] impl.
pub struct Viewer<R, C, S> {
    state: SceneState,
    camera: Camera,
    registry: BindingRegistry,
    nodes: SceneNodes,
    render_loop: RenderLoop<R, C, S>,
}

impl<R: Renderer, C: Controls, S: FrameScheduler> Viewer<R, C, S> {
    /// Build the scene, register bindings, publish them to `host` and start the loop
    pub fn new(
        renderer: R,
        controls: C,
        scheduler: S,
        host: &mut dyn BindingHost,
        config: &ViewerConfig,
    ) -> Result<Self> {
        let (state, nodes) = Self::build_scene(config)?;

        let (width, height) = renderer.size();
        let mut camera = Camera::perspective(
            DEFAULT_FOV_DEGREES,
            Camera::aspect_for(width, height),
            DEFAULT_NEAR,
            DEFAULT_FAR,
        );
        camera.position = Vec3::new(0.0, 0.0, config.camera_distance);
        camera.look_at(Vec3::ZERO);

        let registry = Self::register_bindings(&state, &nodes)?;
        log::info!(
            "scene ready: {} nodes, {} bindings",
            state.scene.len(),
            registry.len()
        );
        registry.publish(host);

        let mut viewer = Self {
            state,
            camera,
            registry,
            nodes,
            render_loop: RenderLoop::new(renderer, controls, scheduler),
        };
        viewer.start()?;
        Ok(viewer)
    }

    fn build_scene(config: &ViewerConfig) -> Result<(SceneState, SceneNodes)> {
        let mut scene = SceneGraph::new();
        scene.background = Color::from_hex(config.background);

        let cube = Node::mesh(
            "cube",
            BoxGeometry::new(1.0, 1.0, 1.0),
            Color::from_hex(config.mesh_color),
        )
        .animated();
        let cube_position = cube.transform.position;
        let mesh = scene.add_node(cube)?;

        let ambient = scene.add_node(Node::ambient_light("ambient", Color::WHITE, 1.0))?;

        let mut sun = Node::directional_light("directional", Color::WHITE, 1.0, Vec3::Y);
        sun.look_at(cube_position);
        let directional = scene.add_node(sun)?;

        let state = SceneState::new(scene, AnimationState::new(config.rotation_rate));
        Ok((
            state,
            SceneNodes {
                mesh,
                ambient,
                directional,
            },
        ))
    }

    fn register_bindings(state: &SceneState, nodes: &SceneNodes) -> Result<BindingRegistry> {
        let mut registry = BindingRegistry::new();

        let mut cube = registry.group("Cube");
        cube.bind(state, Target::Animation, AttributeId::RotationRate, 0.0, 0.5)?;
        for ch in COLOR_CHANNELS {
            cube.bind(state, Target::Node(nodes.mesh), AttributeId::Color(ch), 0.0, 1.0)?;
        }

        for (id, folder) in [
            (nodes.ambient, "Lights/Ambient"),
            (nodes.directional, "Lights/Directional"),
        ] {
            let target = Target::Node(id);
            registry
                .group(folder)
                .bind(state, target, AttributeId::Intensity, 0.0, 1.0)?;

            let mut color = registry.group(&format!("{}/Color", folder));
            for ch in COLOR_CHANNELS {
                color.bind(state, target, AttributeId::Color(ch), 0.0, 1.0)?;
            }
        }

        let mut position = registry.group("Lights/Directional/Position");
        for axis in AXES {
            position.bind(
                state,
                Target::Node(nodes.directional),
                AttributeId::Position(axis),
                -10.0,
                10.0,
            )?;
        }

        Ok(registry)
    }

    pub fn start(&mut self) -> Result<()> {
        self.render_loop.start()
    }

    pub fn stop(&self) {
        self.render_loop.stop();
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.render_loop.stop_handle()
    }

    /// Handle one frame callback from the host
    pub fn tick(&mut self) -> Result<TickOutcome> {
        self.render_loop.tick(&mut self.state, &mut self.camera)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.set_aspect(width, height);
        self.render_loop.renderer_mut().resize(width, height);
    }

    pub fn is_running(&self) -> bool {
        self.render_loop.is_running()
    }

    pub fn ticks(&self) -> u64 {
        self.render_loop.ticks()
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.state.scene
    }

    pub fn animation(&self) -> &AnimationState {
        &self.state.animation
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn nodes(&self) -> SceneNodes {
        self.nodes
    }

    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    pub fn renderer(&self) -> &R {
        self.render_loop.renderer()
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        self.render_loop.renderer_mut()
    }

    pub fn controls(&self) -> &C {
        self.render_loop.controls()
    }

    pub fn controls_mut(&mut self) -> &mut C {
        self.render_loop.controls_mut()
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        self.render_loop.scheduler_mut()
    }
}

impl<R, C, S> AttributeStore for Viewer<R, C, S> {
    fn read(&self, target: Target, attribute: AttributeId) -> Result<f32> {
        self.state.read(target, attribute)
    }

    fn write(&mut self, target: Target, attribute: AttributeId, value: f32) -> Result<()> {
        self.state.write(target, attribute, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::Binding;
    use crate::error::ViewerError;
    use crate::scene::NodeKind;
    use crate::traits::ManualScheduler;

    struct NullRenderer {
        size: (u32, u32),
        renders: usize,
    }

    impl Renderer for NullRenderer {
        fn resize(&mut self, width: u32, height: u32) {
            self.size = (width, height);
        }

        fn size(&self) -> (u32, u32) {
            self.size
        }

        fn render(&mut self, _scene: &SceneGraph, _camera: &Camera) -> Result<()> {
            self.renders += 1;
            Ok(())
        }
    }

    struct StillControls;

    impl Controls for StillControls {
        fn update(&mut self, _camera: &mut Camera) {}
    }

    #[derive(Default)]
    struct CollectingHost {
        bindings: Vec<Binding>,
    }

    impl BindingHost for CollectingHost {
        fn register(&mut self, binding: &Binding) {
            self.bindings.push(binding.clone());
        }
    }

    fn viewer(
        config: &ViewerConfig,
    ) -> Result<(Viewer<NullRenderer, StillControls, ManualScheduler>, CollectingHost)> {
        let mut host = CollectingHost::default();
        let viewer = Viewer::new(
            NullRenderer {
                size: (800, 400),
                renders: 0,
            },
            StillControls,
            ManualScheduler::new(),
            &mut host,
            config,
        )?;
        Ok((viewer, host))
    }

    #[test]
    fn test_default_scene() {
        let (viewer, _) = viewer(&ViewerConfig::default()).unwrap();
        let kinds: Vec<_> = viewer
            .scene()
            .all_nodes()
            .map(|n| match &n.kind {
                NodeKind::Mesh(_) => "mesh",
                NodeKind::AmbientLight(_) => "ambient",
                NodeKind::DirectionalLight(_) => "directional",
            })
            .collect();
        assert_eq!(kinds, ["mesh", "ambient", "directional"]);
        assert_eq!(viewer.scene().background, Color::WHITE);

        let sun = viewer.scene().node(viewer.nodes().directional).unwrap();
        assert_eq!(sun.transform.position, Vec3::Y);
        let NodeKind::DirectionalLight(light) = &sun.kind else {
            panic!("expected directional light");
        };
        assert_eq!(light.target, Vec3::ZERO);
    }

    #[test]
    fn test_camera_setup() {
        let (viewer, _) = viewer(&ViewerConfig::default()).unwrap();
        let camera = viewer.camera();
        assert_eq!(camera.fov_y, 75.0);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 1000.0);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(camera.target, Vec3::ZERO);
        assert_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn test_bindings_published_before_start() {
        let (viewer, host) = viewer(&ViewerConfig::default()).unwrap();
        // rate + 3 mesh channels + 2 * (intensity + 3 channels) + 3 axes
        assert_eq!(viewer.registry().len(), 15);
        assert_eq!(host.bindings.len(), 15);
        assert!(viewer.is_running());
        assert_eq!(viewer.render_loop.scheduler().pending(), 1);

        let groups: Vec<_> = host.bindings.iter().filter_map(|b| b.group()).collect();
        assert_eq!(groups.len(), 15);
        assert!(groups.contains(&"Lights/Directional/Position"));
        assert!(groups.contains(&"Lights/Ambient/Color"));
    }

    #[test]
    fn test_rate_out_of_range_aborts_setup() {
        let config = ViewerConfig {
            rotation_rate: 0.9,
            ..Default::default()
        };
        let err = viewer(&config).err().unwrap();
        assert!(matches!(err, ViewerError::ValueOutOfRange { .. }));
    }

    #[test]
    fn test_resize_updates_aspect() {
        let (mut viewer, _) = viewer(&ViewerConfig::default()).unwrap();
        viewer.resize(300, 300);
        assert_eq!(viewer.camera().aspect, 1.0);
        assert_eq!(viewer.renderer().size(), (300, 300));
    }

    #[test]
    fn test_write_through_store() {
        let (mut viewer, _) = viewer(&ViewerConfig::default()).unwrap();
        let target = Target::Node(viewer.nodes().ambient);
        viewer.write(target, AttributeId::Intensity, 0.25).unwrap();
        assert_eq!(viewer.read(target, AttributeId::Intensity).unwrap(), 0.25);
    }

    #[test]
    fn test_tick_renders() {
        let (mut viewer, _) = viewer(&ViewerConfig::default()).unwrap();
        assert_eq!(viewer.tick().unwrap(), TickOutcome::Rendered);
        assert_eq!(viewer.renderer().renders, 1);
        assert_eq!(viewer.ticks(), 1);
    }
}
