//! AR wireframe overlay over a simulated frame stream.
//!
//! Reproduces a live capture loop without any camera hardware: a
//! "detector" observes a hidden ground-truth camera, a few frames are
//! saved into a calibration session, and every subsequent frame gets the
//! target pose estimated and wireframe solids projected onto it.
//!
//! The overlay geometry is deliberately example content: a hexagonal
//! prism with two cubes attached to its sides, a sphere shell hovering
//! above the board, and a model parsed from OBJ-style text.
//!
//! Run with: `cargo run -p arcal --example ar_overlay`

use std::f64::consts::PI;

use anyhow::Result;
use arcal::core::synthetic::project_view_all;
use arcal::core::{synthetic::poses_yaw_y_z, Iso3};
use arcal::prelude::*;

/// Stand-in for the external corner search: "detects" the chessboard by
/// projecting it through the hidden ground-truth camera at the frame's
/// true pose.
struct SyntheticDetector {
    true_camera: PinholeCamera,
    target: ChessboardTarget,
}

impl PatternDetector for SyntheticDetector {
    type Frame = Iso3;

    fn detect(&mut self, frame: &Iso3, shape: GridShape) -> Detection {
        if shape.point_count() != self.target.point_count() {
            return Detection::NotFound;
        }
        match project_view_all(&self.true_camera, frame, &self.target.object_points()) {
            Ok(view) => Detection::Found(view.points_2d),
            Err(_) => Detection::NotFound,
        }
    }
}

/// Hexagonal prism with a cube attached to each side.
fn prism_with_cubes() -> Result<WireframeModel> {
    let hexagon = [
        (0.0, 0.0),
        (1.0, 0.0),
        (1.5, 0.866),
        (1.0, 1.732),
        (0.0, 1.732),
        (-0.5, 0.866),
    ];

    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    // Prism: bottom ring, top ring, vertical edges.
    for &(x, y) in &hexagon {
        vertices.push(Pt3::new(x, y, 0.0));
    }
    for &(x, y) in &hexagon {
        vertices.push(Pt3::new(x, y, 1.0));
    }
    faces.push((0..6).collect());
    faces.push((6..12).collect());
    for i in 0..6 {
        faces.push(vec![i, i + 6]);
    }

    // Two unit cubes, shifted to opposite sides of the prism.
    for shift in [0.75, -0.75] {
        let base = vertices.len();
        for z in [0.0, 1.0] {
            for &(x, y) in &[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
                vertices.push(Pt3::new(x + shift, y, z));
            }
        }
        faces.push((base..base + 4).collect());
        faces.push((base + 4..base + 8).collect());
        for i in 0..4 {
            faces.push(vec![base + i, base + i + 4]);
        }
    }

    WireframeModel::new(vertices, faces)
}

/// Latitude rings of a sphere shell hovering above the board.
fn floating_ball() -> Result<WireframeModel> {
    let (shift_x, shift_y, shift_z) = (5.0, -0.4, 3.0);
    let n_rings = 9;
    let n_points = 20;

    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    for ring in 1..n_rings {
        let theta = PI * ring as Real / n_rings as Real;
        let base = vertices.len();
        for step in 0..n_points {
            let phi = 2.0 * PI * step as Real / n_points as Real;
            vertices.push(Pt3::new(
                phi.cos() * theta.sin() + shift_x,
                phi.sin() * theta.sin() + shift_y,
                theta.cos() + shift_z,
            ));
        }
        faces.push((base..base + n_points).collect());
    }

    WireframeModel::new(vertices, faces)
}

/// Minimal OBJ-style reader: `v x y z` vertex records and `f i j k ...`
/// face records with 1-based indices; texture/normal sub-indices after a
/// slash are ignored. Model-file parsing is demo glue, not pipeline
/// functionality.
fn parse_obj(text: &str) -> Result<WireframeModel> {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let mut coord = || -> Result<Real> {
                    Ok(tokens
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("truncated vertex record"))?
                        .parse()?)
                };
                let (x, y, z) = (coord()?, coord()?, coord()?);
                vertices.push(Pt3::new(x, y, z));
            }
            Some("f") => {
                let mut face = Vec::new();
                for token in tokens {
                    let index: usize = token
                        .split('/')
                        .next()
                        .unwrap_or(token)
                        .parse()?;
                    face.push(index - 1);
                }
                faces.push(face);
            }
            _ => {}
        }
    }

    WireframeModel::new(vertices, faces)
}

const PYRAMID_OBJ: &str = "\
v 2.0 -3.0 0.0
v 4.0 -3.0 0.0
v 4.0 -5.0 0.0
v 2.0 -5.0 0.0
v 3.0 -4.0 2.0
f 1 2 3 4
f 1/1 2/2 5/5
f 2 3 5
f 3 4 5
f 4 1 5
";

fn overlay_stats(camera: &PinholeCamera, pose: &Pose, model: &WireframeModel) -> (usize, usize) {
    let faces = project_model(camera, pose, model);
    let segments: usize = faces.iter().map(|f| polyline_segments(f).len()).sum();
    let dropped = faces
        .iter()
        .flat_map(|f| f.iter())
        .filter(|p| p.is_none())
        .count();
    (segments, dropped)
}

fn main() -> Result<()> {
    env_logger::init();

    let target = ChessboardTarget::new(9, 6, 1.0);
    let shape = GridShape::new(target.rows, target.cols);

    // Hidden ground truth the detector observes.
    let true_camera = PinholeCamera::new(
        Intrinsics::new(850.0, 830.0, 640.0, 360.0),
        Distortion::from_coefficients(&[-0.08, 0.006, 0.001, -0.0005]),
    );
    let mut detector = SyntheticDetector {
        true_camera,
        target,
    };

    let mut session = CalibrationSession::new(target, 1280, 720);

    // "Press 's'" on four differently oriented frames.
    for frame in poses_yaw_y_z(4, -0.25, 0.15, 9.0, 1.5) {
        match detector.detect(&frame, shape) {
            detection @ Detection::Found(_) => session.add_detection(detection)?,
            Detection::NotFound => println!("Chessboard not found in the frame."),
        }
    }

    let rms = session.calibrate(&CalibrateOptions::default())?.rms_error;
    println!(
        "Calibrated from {} saved frames, rms {:.2e} px\n",
        session.sample_count(),
        rms
    );

    let solids = vec![
        ("prism+cubes", prism_with_cubes()?),
        ("ball", floating_ball()?),
        ("obj pyramid", parse_obj(PYRAMID_OBJ)?),
    ];

    // Live loop: fresh viewpoints, pose per frame, overlay per frame.
    for (frame_idx, frame) in poses_yaw_y_z(3, 0.1, 0.2, 10.0, 2.0).iter().enumerate() {
        let corners = match detector.detect(frame, shape) {
            Detection::Found(points) => points,
            Detection::NotFound => {
                println!("frame {frame_idx}: chessboard not found, skipped");
                continue;
            }
        };

        let estimate = session.estimate_pose(&corners, &SolveOptions::default())?;
        println!(
            "frame {frame_idx}: pose rms {:.2e} px, tz {:.2}",
            estimate.rms_error, estimate.pose.tvec.z
        );

        for (name, model) in &solids {
            let (segments, dropped) = overlay_stats(session.camera(), &estimate.pose, model);
            println!("  {name}: {segments} segments drawn, {dropped} vertices skipped");
        }
    }

    Ok(())
}
