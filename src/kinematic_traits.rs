//! Defines the types shared by forward and inverse kinematics

extern crate nalgebra as na;

use na::{Matrix4, Point3};

/// Pose is a homogeneous 4x4 transform, rotation block plus translation column.
/// The bottom row is always [0, 0, 0, 1].
/// ```
/// extern crate nalgebra as na;
/// use na::Matrix4;
///
/// type Pose = Matrix4<f64>;
///
/// let pose = Pose::new_translation(&na::Vector3::new(1.0, 0.0, 0.0));
/// assert_eq!(pose[(0, 3)], 1.0);
/// ```
pub type Pose = Matrix4<f64>;

/// Cartesian position in meters, used both for the end effector and for the target.
pub type Position = Point3<f64>;

/// Five joint rotations in radians, joint 1 (base) first.
pub type Joints = [f64; 5];

/// Number of joints in the chain.
pub const JOINT_COUNT: usize = 5;

/// All joints at zero.
pub const JOINTS_AT_ZERO: Joints = [0.0; JOINT_COUNT];

pub trait Kinematics {
    /// Joint positions that bring the end effector to the target, found iteratively
    /// starting from the initial joint positions. The result is best effort: the target may
    /// be unreachable and then the last iterate is returned.
    fn inverse(&self, target: &Position, initial: &Joints) -> Joints;

    /// Composed transform from the base to the end effector.
    fn forward(&self, qs: &Joints) -> Pose;

    /// Translation column of the composed transform.
    fn forward_position(&self, qs: &Joints) -> Position {
        position_of(&self.forward(qs))
    }
}

/// Extracts the translation column of the pose as a point.
pub fn position_of(pose: &Pose) -> Position {
    Position::new(pose[(0, 3)], pose[(1, 3)], pose[(2, 3)])
}
