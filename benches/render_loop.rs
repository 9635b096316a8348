use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cube_viewer::camera::Camera;
use cube_viewer::config::ViewerConfig;
use cube_viewer::core::animation;
use cube_viewer::scene::{SceneGraph, Transform};
use cube_viewer::traits::{BindingHost, Controls, ManualScheduler, Renderer};
use cube_viewer::binding::Binding;
use cube_viewer::types::LightsUniform;
use cube_viewer::{Result, Viewer};

/// Renderer that only walks the scene
struct NullRenderer;

impl Renderer for NullRenderer {
    fn resize(&mut self, _width: u32, _height: u32) {}

    fn size(&self) -> (u32, u32) {
        (1280, 720)
    }

    fn render(&mut self, scene: &SceneGraph, camera: &Camera) -> Result<()> {
        black_box(camera.view_projection());
        black_box(LightsUniform::from_scene(scene));
        Ok(())
    }
}

struct NoControls;

impl Controls for NoControls {
    fn update(&mut self, _camera: &mut Camera) {}
}

struct NoHost;

impl BindingHost for NoHost {
    fn register(&mut self, _binding: &Binding) {}
}

/// Benchmark: one full tick (controls, animation, draw) through the viewer
fn bench_viewer_tick(c: &mut Criterion) {
    let mut viewer = Viewer::new(
        NullRenderer,
        NoControls,
        ManualScheduler::new(),
        &mut NoHost,
        &ViewerConfig::default(),
    )
    .unwrap();

    c.bench_function("viewer_tick", |b| {
        b.iter(|| black_box(viewer.tick().unwrap()))
    });
}

/// Benchmark: animation step over many transforms
fn bench_animation_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("animation_step");
    for count in [1usize, 100, 10_000] {
        let mut transforms = vec![Transform::default(); count];
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                for t in transforms.iter_mut() {
                    animation::step(t, black_box(0.005));
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_viewer_tick, bench_animation_step);
criterion_main!(benches);
