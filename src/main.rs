use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rs_ccd_kinematics::ccd::{CorrectionMode, SolverSettings};
use rs_ccd_kinematics::kinematic_traits::{Joints, Kinematics, Position, JOINTS_AT_ZERO, JOINT_COUNT};
use rs_ccd_kinematics::kinematics_impl::DHKinematics;
use rs_ccd_kinematics::parameters::dh_kinematics::Parameters;
use rs_ccd_kinematics::utils::{dump_pose, dump_position, format_joints, format_joints_radians};

/// Forward and inverse kinematics of a 5 joint DH manipulator.
#[derive(Parser)]
#[command(name = "rs-ccd-kinematics", version, about)]
struct Cli {
    /// YAML file with DH parameters and optional solver settings (default: UR3, 5 joints)
    #[arg(long, short, global = true)]
    parameters: Option<PathBuf>,

    /// Joint angles are read and printed in degrees rather than radians
    #[arg(long, global = true)]
    degrees: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Position and transform of the end effector (or of the joint given by --limit)
    Forward {
        #[arg(num_args = JOINT_COUNT, value_name = "JOINT", required = true, allow_negative_numbers = true)]
        joints: Vec<f64>,

        /// Evaluate only the first N joints
        #[arg(long, value_name = "N")]
        limit: Option<usize>,

        /// Also print the transform of every joint
        #[arg(long, short)]
        verbose: bool,
    },
    /// Joint angles that move the end effector to the target position
    Inverse {
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], required = true, allow_negative_numbers = true)]
        target: Vec<f64>,

        /// Initial joint angles (default: all zero)
        #[arg(long, num_args = JOINT_COUNT, value_name = "JOINT", allow_negative_numbers = true)]
        from: Option<Vec<f64>>,

        #[arg(long, value_enum)]
        mode: Option<Mode>,

        #[arg(long)]
        max_iterations: Option<usize>,

        #[arg(long)]
        tolerance: Option<f64>,
    },
    /// Print the active parameters as YAML
    Parameters,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Broadcast,
    SingleAxis,
}

impl From<Mode> for CorrectionMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Broadcast => CorrectionMode::Broadcast,
            Mode::SingleAxis => CorrectionMode::SingleAxis,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let robot = match &cli.parameters {
        Some(path) => DHKinematics::from_yaml_file(path)
            .with_context(|| format!("Failed to load parameters from {}", path.display()))?,
        None => DHKinematics::new(Parameters::ur3_5dof()),
    };

    match cli.command {
        Command::Forward { joints, limit, verbose } => {
            let qs = to_joints(&joints, cli.degrees)?;
            let evaluation = robot.evaluate(&qs, limit);

            println!("End effector position:");
            dump_position(&evaluation.position);
            println!("Transform:");
            dump_pose(&evaluation.transform);

            if verbose {
                for (i, transform) in evaluation.joint_transforms.iter().enumerate() {
                    println!("Joint {}:", i + 1);
                    dump_pose(transform);
                }
            }
        }
        Command::Inverse { target, from, mode, max_iterations, tolerance } => {
            ensure!(target.len() == 3, "target needs 3 coordinates, got {}", target.len());
            let target = Position::new(target[0], target[1], target[2]);
            let initial = match from {
                Some(values) => to_joints(&values, cli.degrees)?,
                None => JOINTS_AT_ZERO,
            };

            let settings = override_settings(*robot.settings(), mode, max_iterations, tolerance)?;
            let robot = DHKinematics::new_with_settings(*robot.parameters(), settings);
            let solution = robot.solve(&initial, &target);
            info!(
                iterations = solution.iterations,
                residual = solution.residual,
                "inverse kinematics done"
            );

            println!("Joint angles:");
            println!("{}", show_joints(&solution.joints, cli.degrees));
            println!(
                "Iterations: {}, residual: {:.6}, converged: {}",
                solution.iterations, solution.residual, solution.converged
            );
            println!("Reached position:");
            dump_position(&robot.forward_position(&solution.joints));
        }
        Command::Parameters => {
            print!("{}", robot.to_yaml());
        }
    }
    Ok(())
}

/// Applies the command line overrides, with the same limits as the `ccd_solver` YAML section.
fn override_settings(
    mut settings: SolverSettings,
    mode: Option<Mode>,
    max_iterations: Option<usize>,
    tolerance: Option<f64>,
) -> Result<SolverSettings> {
    if let Some(mode) = mode {
        settings.mode = mode.into();
    }
    if let Some(max_iterations) = max_iterations {
        ensure!(max_iterations > 0, "max iterations must be positive, got {}", max_iterations);
        settings.max_iterations = max_iterations;
    }
    if let Some(tolerance) = tolerance {
        ensure!(tolerance > 0.0, "tolerance must be positive, got {}", tolerance);
        settings.tolerance = tolerance;
    }
    Ok(settings)
}

fn to_joints(values: &[f64], degrees: bool) -> Result<Joints> {
    ensure!(
        values.len() == JOINT_COUNT,
        "expected {} joint values, got {}",
        JOINT_COUNT,
        values.len()
    );
    Ok(std::array::from_fn(|i| {
        if degrees { values[i].to_radians() } else { values[i] }
    }))
}

fn show_joints(joints: &Joints, degrees: bool) -> String {
    if degrees { format_joints(joints) } else { format_joints_radians(joints) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_settings() {
        let settings =
            override_settings(SolverSettings::default(), Some(Mode::SingleAxis), Some(7), Some(0.01)).unwrap();
        assert_eq!(settings.mode, CorrectionMode::SingleAxis);
        assert_eq!(settings.max_iterations, 7);
        assert_eq!(settings.tolerance, 0.01);
        assert_eq!(settings.min_correction, SolverSettings::default().min_correction);
    }

    #[test]
    fn test_override_rejects_zero_iterations() {
        assert!(override_settings(SolverSettings::default(), None, Some(0), None).is_err());
    }

    #[test]
    fn test_override_rejects_non_positive_tolerance() {
        assert!(override_settings(SolverSettings::default(), None, None, Some(0.0)).is_err());
        assert!(override_settings(SolverSettings::default(), None, None, Some(-1.0)).is_err());
    }

    #[test]
    fn test_zero_iterations_flag_is_rejected() {
        let cli = Cli::try_parse_from(["rs-ccd-kinematics", "inverse", "--target", "0.1", "0.2", "0.3", "--max-iterations", "0"])
            .unwrap();
        let Command::Inverse { mode, max_iterations, tolerance, .. } = cli.command else {
            panic!("expected the inverse subcommand");
        };
        assert!(override_settings(SolverSettings::default(), mode, max_iterations, tolerance).is_err());
    }
}
