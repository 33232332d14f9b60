//! Renders an OBJ mesh (or the built-in cube) to a PNG file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use meshview::camera::{Camera, Projection};
use meshview::math::vec3::Vec3;
use meshview::mesh::{cube, Mesh};
use meshview::pipeline::DrawOptions;
use meshview::render::{RenderOptions, Renderer};
use meshview::{load_obj, MeshModel, Scene};

#[derive(Parser)]
#[command(name = "meshview")]
#[command(author, version, about = "Software-rendered mesh viewer")]
struct Args {
    /// OBJ file to render (renders a cube when omitted)
    input: Option<PathBuf>,

    /// Output PNG path
    #[arg(long, short = 'o', default_value = "render.png")]
    output: PathBuf,

    #[arg(long, default_value = "800")]
    width: u32,

    #[arg(long, default_value = "600")]
    height: u32,

    /// Vertical field of view in degrees
    #[arg(long, default_value = "45")]
    fov: f32,

    /// World rotation in degrees, as X,Y,Z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true, default_value = "0,0,0")]
    rotate: Vec3,

    /// Uniform world scale
    #[arg(long, default_value = "1")]
    scale: f32,

    /// World translation, as X,Y,Z
    #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true, default_value = "0,0,0")]
    translate: Vec3,

    /// Fill faces before drawing edges
    #[arg(long)]
    fill: bool,

    /// Skip the mesh edges
    #[arg(long)]
    no_edges: bool,

    /// Outline each face's screen bounding box instead of filling it
    #[arg(long)]
    triangle_boxes: bool,

    #[arg(long)]
    vertex_normals: bool,

    #[arg(long)]
    face_normals: bool,

    /// Length multiplier for normal indicators
    #[arg(long, default_value = "0.1")]
    normal_scale: f32,

    #[arg(long)]
    bounding_box: bool,

    #[arg(long)]
    axis: bool,

    /// Rotate the axis indicator with the object
    #[arg(long)]
    axis_tracks_object: bool,
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("'{p}': {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match parts[..] {
        [x, y, z] => Ok(Vec3::new(x, y, z)),
        _ => Err(format!("expected X,Y,Z, got '{s}'")),
    }
}

/// Per-axis bounds over every mesh.
fn combined_bounds(meshes: &[Mesh]) -> (Vec3, Vec3) {
    meshes
        .iter()
        .map(|m| (m.min_coordinates(), m.max_coordinates()))
        .reduce(|(lo, hi), (min, max)| (lo.min(min), hi.max(max)))
        .unwrap_or((Vec3::ZERO, Vec3::ZERO))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let meshes = match &args.input {
        Some(path) => load_obj(path).with_context(|| format!("loading {}", path.display()))?,
        None => vec![cube()],
    };

    // The local tier centers the whole file on the origin at unit size; the
    // world tier carries the user's placement.
    let (min, max) = combined_bounds(&meshes);
    let extent = (max - min).max_element();
    let center = (min + max) * 0.5;

    let mut scene = Scene::new();
    for mesh in meshes {
        let mut model = MeshModel::new(mesh);
        let state = model.transform_mut();
        state.local.fit_uniform(extent);
        let fit = state.local.effective_scale().x;
        state.local.set_translation(-center * fit);
        state
            .world
            .set_rotation(args.rotate)
            .lock_scale(args.scale)
            .set_translation(args.translate);
        scene.add_model(model);
    }

    let projection = Projection::from_degrees(args.fov, 1.0, 0.1, 100.0);
    // sqrt(3) covers the unit cube's diagonal, so any rotation stays in view.
    let camera = Camera::framing(Vec3::ZERO, 3f32.sqrt() * args.scale.abs(), projection);

    let draw = DrawOptions {
        draw_vertex_normals: args.vertex_normals,
        draw_face_normals: args.face_normals,
        draw_bounding_box: args.bounding_box,
        draw_axis: args.axis,
        axis_tracks_object: args.axis_tracks_object,
        vertex_normals_scale: args.normal_scale,
        face_normals_scale: args.normal_scale,
    };
    let options = RenderOptions {
        fill: args.fill,
        draw_edges: !args.no_edges,
        triangle_bounding_boxes: args.triangle_boxes,
        ..RenderOptions::default()
    };

    let mut renderer = Renderer::new(args.width, args.height)?;
    renderer.render(
        &mut scene,
        &camera.transform(args.width, args.height),
        &draw,
        &options,
    );
    renderer
        .save_png(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    info!(
        "rendered {} model(s) at {}x{} to {}",
        scene.model_count(),
        args.width,
        args.height,
        args.output.display()
    );
    Ok(())
}
