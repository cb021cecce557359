use std::{error::Error, fs, path::Path};

use arcal_core::CorrespondenceView;
use arcal_pipeline::{calibrate, CalibrateOptions, CalibrationExport};
use clap::Parser;

/// Calibration CLI for planar camera intrinsics.
#[derive(Debug, Parser)]
#[command(author, version, about = "Planar camera calibration from recorded views")]
struct Args {
    /// Path to a JSON file containing an array of correspondence views.
    #[arg(long)]
    input: String,

    /// Optional path to write the calibration document to. Printed to
    /// stdout when omitted.
    #[arg(long)]
    output: Option<String>,
}

fn load_views(path: &Path) -> Result<Vec<CorrespondenceView>, Box<dyn Error>> {
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

fn run_calibration(input_path: &str) -> Result<String, Box<dyn Error>> {
    let views = load_views(Path::new(input_path))?;
    let result = calibrate(&views, &CalibrateOptions::default())?;

    eprintln!(
        "calibrated {} views, rms {:.4} px",
        views.len(),
        result.rms_error
    );
    Ok(CalibrationExport::from(&result).to_json()?)
}

fn main() {
    env_logger::init();
    if let Err(err) = try_main() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let json = run_calibration(&args.input)?;

    match &args.output {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcal_core::synthetic::{poses_yaw_y_z, project_views_all};
    use arcal_core::{ChessboardTarget, Distortion, Intrinsics, PinholeCamera};
    use tempfile::NamedTempFile;

    fn synthetic_views() -> Vec<CorrespondenceView> {
        let cam_gt = PinholeCamera::new(
            Intrinsics::new(800.0, 780.0, 640.0, 360.0),
            Distortion::zero(),
        );
        let board = ChessboardTarget::new(5, 4, 0.05).object_points();
        let poses = poses_yaw_y_z(3, -0.1, 0.1, 0.6, 0.1);
        project_views_all(&cam_gt, &board, &poses).unwrap()
    }

    #[test]
    fn calibrates_from_a_views_file() {
        let input_file = NamedTempFile::new().unwrap();
        serde_json::to_writer_pretty(
            fs::File::create(input_file.path()).unwrap(),
            &synthetic_views(),
        )
        .unwrap();

        let json = run_calibration(input_file.path().to_str().unwrap())
            .expect("cli helper should succeed");

        let export = CalibrationExport::from_json(&json).unwrap();
        assert!((export.camera_matrix[0][0] - 800.0).abs() < 1.0);
        assert!((export.camera_matrix[1][1] - 780.0).abs() < 1.0);
        assert_eq!(export.rotation_vectors.len(), 3);
        assert_eq!(export.distortion_coefficients.len(), 5);
    }

    #[test]
    fn missing_input_reports_error() {
        assert!(run_calibration("/nonexistent/views.json").is_err());
    }
}
