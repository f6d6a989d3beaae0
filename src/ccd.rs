//! Cyclic coordinate descent (CCD) solver for the end effector position.
//!
//! The solver walks the chain from the end effector towards the base and, for every joint,
//! turns the direction "joint -> end effector" towards the direction "joint -> target".
//! It stops when the end effector is closer to the target than the tolerance or when the
//! iteration budget is spent. It never fails: for unreachable targets the last iterate
//! is returned, and [`CcdSolution`] tells how far from the target it is.
//!
//! Two correction modes exist:
//!
//! - [`CorrectionMode::Broadcast`] composes the correction with a product of per-joint axis
//!   rotations up to the current joint, decomposes the result into Z-Y-X Euler angles and
//!   assigns these three angles to all five joints. This reproduces the behaviour of the
//!   slider demo the robot parameters come from. It is a heuristic and often does not get
//!   anywhere close to the target.
//! - [`CorrectionMode::SingleAxis`] is the textbook CCD: only the current joint is rotated,
//!   about its own DH axis, by the signed angle between the projected directions.

use nalgebra::{Rotation3, Unit, UnitQuaternion, Vector3};
use tracing::{debug, trace};

use crate::chain;
use crate::kinematic_traits::{position_of, Joints, Position, JOINT_COUNT};
use crate::parameters::dh_kinematics::Parameters;
use crate::utils::dh_kinematics::is_valid;

/// Default iteration budget.
pub const MAX_ITERATIONS: usize = 100;

/// Default distance to the target (meters) below which the solver stops.
pub const TOLERANCE: f64 = 1e-3;

/// Default smallest correction angle (radians) that is still applied.
pub const MIN_CORRECTION: f64 = 0.01;

/// Directions shorter than this have no usable direction.
const DEGENERATE: f64 = 1e-12;

/// Above this |m31| the Euler extraction is in gimbal lock.
const GIMBAL_LOCK: f64 = 0.9999999;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionMode {
    /// Decompose the corrected rotation into Euler angles and assign them to all joints.
    Broadcast,
    /// Rotate only the current joint about its own axis.
    SingleAxis,
}

impl CorrectionMode {
    /// Name as used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            CorrectionMode::Broadcast => "broadcast",
            CorrectionMode::SingleAxis => "single_axis",
        }
    }

    /// Parses the configuration file name, accepting '-' in place of '_'.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "broadcast" => Some(CorrectionMode::Broadcast),
            "single_axis" => Some(CorrectionMode::SingleAxis),
            _ => None,
        }
    }
}

/// Principal axis a joint rotates about in the broadcast correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointAxis {
    X,
    Y,
    Z,
}

impl JointAxis {
    pub fn rotation(self, angle: f64) -> Rotation3<f64> {
        let axis = match self {
            JointAxis::X => Vector3::x_axis(),
            JointAxis::Y => Vector3::y_axis(),
            JointAxis::Z => Vector3::z_axis(),
        };
        Rotation3::from_axis_angle(&axis, angle)
    }
}

/// Axes of the joints for the broadcast correction: base about Y, shoulder and elbow
/// about Z, then the two wrist joints about Y and X.
pub const BROADCAST_AXES: [JointAxis; JOINT_COUNT] =
    [JointAxis::Y, JointAxis::Z, JointAxis::Z, JointAxis::Y, JointAxis::X];

/// Convergence control of the solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverSettings {
    /// Maximal number of passes over the chain.
    pub max_iterations: usize,

    /// Stop when the end effector is closer to the target than this (meters).
    pub tolerance: f64,

    /// Corrections not larger than this angle (radians) are skipped.
    pub min_correction: f64,

    pub mode: CorrectionMode,
}

impl Default for SolverSettings {
    fn default() -> Self {
        SolverSettings {
            max_iterations: MAX_ITERATIONS,
            tolerance: TOLERANCE,
            min_correction: MIN_CORRECTION,
            mode: CorrectionMode::Broadcast,
        }
    }
}

impl SolverSettings {
    /// Default budget and thresholds with the single axis correction.
    pub fn single_axis() -> Self {
        SolverSettings {
            mode: CorrectionMode::SingleAxis,
            ..Self::default()
        }
    }

    pub fn to_yaml(&self) -> String {
        format!(
            "ccd_solver:\n  \
              max_iterations: {}\n  \
              tolerance: {}\n  \
              min_correction: {}\n  \
              mode: {}\n",
            self.max_iterations,
            self.tolerance,
            self.min_correction,
            self.mode.name()
        )
    }
}

/// Outcome of the solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CcdSolution {
    /// Joint angles after the last iteration.
    pub joints: Joints,

    /// Completed passes over the chain, 0 if the initial joints were already at the target.
    pub iterations: usize,

    /// Distance between the end effector at `joints` and the target.
    pub residual: f64,

    /// True if `residual` is below the tolerance.
    pub converged: bool,
}

pub struct CcdSolver<'a> {
    parameters: &'a Parameters,
    settings: SolverSettings,
}

impl<'a> CcdSolver<'a> {
    pub fn new(parameters: &'a Parameters, settings: SolverSettings) -> Self {
        CcdSolver { parameters, settings }
    }

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    /// Iterates from the initial joint angles until the end effector reaches the target
    /// or the iteration budget is spent. The initial joints are not modified.
    pub fn solve(&self, initial: &Joints, target: &Position) -> CcdSolution {
        let mut theta = *initial;
        let mut iterations = 0;

        while iterations < self.settings.max_iterations {
            let end = chain::position(self.parameters, &theta, None);
            let error = nalgebra::distance(target, &end);
            trace!(iterations, error, "ccd pass");
            if error < self.settings.tolerance {
                break;
            }

            match self.settings.mode {
                CorrectionMode::Broadcast => self.broadcast_pass(&mut theta, &end, target),
                CorrectionMode::SingleAxis => self.single_axis_pass(&mut theta, end, target),
            }
            iterations += 1;
            debug_assert!(is_valid(&theta), "ccd produced {:?}", theta);
        }

        let residual = nalgebra::distance(target, &chain::position(self.parameters, &theta, None));
        let converged = residual < self.settings.tolerance;
        debug!(
            iterations,
            residual,
            converged,
            mode = self.settings.mode.name(),
            "ccd finished"
        );

        CcdSolution {
            joints: theta,
            iterations,
            residual,
            converged,
        }
    }

    /// One pass from the last joint to the base. The end effector position is taken
    /// from before the pass and not updated while the joints change.
    fn broadcast_pass(&self, theta: &mut Joints, end: &Position, target: &Position) {
        for i in (0..JOINT_COUNT).rev() {
            let joint = chain::position(self.parameters, theta, Some(i));
            let Some((to_end, to_target)) = directions(*end - joint, *target - joint) else {
                trace!(joint = i, "target or end effector at the joint origin, skipping");
                continue;
            };

            let angle = to_end.dot(&to_target).clamp(-1.0, 1.0).acos();
            if angle <= self.settings.min_correction {
                continue;
            }

            // Antiparallel directions have no defined rotation axis
            let Some(axis) = Unit::try_new(to_end.cross(&to_target), DEGENERATE) else {
                trace!(joint = i, angle, "no rotation axis, skipping");
                continue;
            };

            let correction = UnitQuaternion::from_axis_angle(&axis, angle).to_rotation_matrix();
            let current = BROADCAST_AXES
                .iter()
                .zip(theta.iter())
                .take(i + 1)
                .fold(Rotation3::identity(), |acc, (axis, &q)| acc * axis.rotation(q));

            let (x, y, z) = euler_zyx(&(correction * current));
            *theta = [y, z, z, y, x];
        }
    }

    /// One pass from the last joint to the base, rotating each joint about the z axis
    /// of the frame it is attached to. The end effector is re-evaluated after every change.
    fn single_axis_pass(&self, theta: &mut Joints, mut end: Position, target: &Position) {
        for i in (0..JOINT_COUNT).rev() {
            let frame = chain::evaluate(self.parameters, theta, Some(i)).transform;
            let pivot = position_of(&frame);
            let axis = Vector3::new(frame[(0, 2)], frame[(1, 2)], frame[(2, 2)]).normalize();

            let Some((to_end, to_target)) = directions(
                project(end - pivot, &axis),
                project(*target - pivot, &axis),
            ) else {
                // The end effector or the target is on the joint axis
                trace!(joint = i, "no lever about the joint axis, skipping");
                continue;
            };

            let angle = to_end.cross(&to_target).dot(&axis).atan2(to_end.dot(&to_target));
            if angle.abs() <= self.settings.min_correction {
                continue;
            }

            theta[i] += angle;
            end = chain::position(self.parameters, theta, None);
        }
    }
}

/// Normalizes both vectors, `None` if any of them is too short to have a direction.
fn directions(to_end: Vector3<f64>, to_target: Vector3<f64>) -> Option<(Vector3<f64>, Vector3<f64>)> {
    Some((
        to_end.try_normalize(DEGENERATE)?,
        to_target.try_normalize(DEGENERATE)?,
    ))
}

/// Component of v orthogonal to the unit axis.
fn project(v: Vector3<f64>, axis: &Vector3<f64>) -> Vector3<f64> {
    v - axis * v.dot(axis)
}

/// Decomposes the rotation R = Rz(z) * Ry(y) * Rx(x) and returns (x, y, z).
/// In gimbal lock (y at +-90 degrees) x is set to zero and z takes all the rotation.
pub fn euler_zyx(rotation: &Rotation3<f64>) -> (f64, f64, f64) {
    let m = rotation.matrix();
    let m31 = m[(2, 0)];
    let y = (-m31.clamp(-1.0, 1.0)).asin();

    if m31.abs() < GIMBAL_LOCK {
        (m[(2, 1)].atan2(m[(2, 2)]), y, m[(1, 0)].atan2(m[(0, 0)]))
    } else {
        (0.0, y, (-m[(0, 1)]).atan2(m[(1, 1)]))
    }
}
