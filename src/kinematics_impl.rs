use crate::ccd::{CcdSolution, CcdSolver, SolverSettings};
use crate::chain::{self, ChainEvaluation};
use crate::kinematic_traits::{Joints, Kinematics, Pose, Position, JOINT_COUNT};
use crate::parameters::dh_kinematics::Parameters;

/// Kinematics of the 5 joint DH chain: closed form forward kinematics and
/// iterative (CCD) inverse kinematics for the end effector position.
#[derive(Debug, Clone, Copy)]
pub struct DHKinematics {
    /// The parameters that were used to construct this solver.
    parameters: Parameters,
    settings: SolverSettings,
}

impl DHKinematics {
    /// Creates a new `DHKinematics` instance with the given parameters and
    /// the default solver settings.
    pub fn new(parameters: Parameters) -> Self {
        Self::new_with_settings(parameters, SolverSettings::default())
    }

    /// Creates a new `DHKinematics` instance with the given parameters and solver settings.
    pub fn new_with_settings(parameters: Parameters, settings: SolverSettings) -> Self {
        DHKinematics { parameters, settings }
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    /// Evaluates the first `limit` joints of the chain (all if `None`).
    pub fn evaluate(&self, qs: &Joints, limit: Option<usize>) -> ChainEvaluation {
        chain::evaluate(&self.parameters, qs, limit)
    }

    /// Pose of every joint frame relative to the base, the last one being the end effector.
    pub fn forward_with_joint_poses(&self, qs: &Joints) -> [Pose; JOINT_COUNT] {
        let mut poses = [Pose::identity(); JOINT_COUNT];
        let mut pose = Pose::identity();
        for (i, local) in self.evaluate(qs, None).joint_transforms.iter().enumerate() {
            pose *= *local;
            poses[i] = pose;
        }
        poses
    }

    /// Runs the solver and reports iterations and residual error along with the joints.
    pub fn solve(&self, initial: &Joints, target: &Position) -> CcdSolution {
        CcdSolver::new(&self.parameters, self.settings).solve(initial, target)
    }
}

impl Kinematics for DHKinematics {
    fn inverse(&self, target: &Position, initial: &Joints) -> Joints {
        self.solve(initial, target).joints
    }

    fn forward(&self, qs: &Joints) -> Pose {
        self.evaluate(qs, None).transform
    }
}
