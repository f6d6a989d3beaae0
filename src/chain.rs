//! Evaluates the chain of DH joint transforms (forward kinematics)

use crate::kinematic_traits::{position_of, Joints, Pose, Position, JOINT_COUNT};
use crate::parameters::dh_kinematics::{DhParameter, Parameters};

/// Result of evaluating the chain, possibly only its first joints.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainEvaluation {
    /// Local transform of every evaluated joint, relative to the previous joint frame.
    pub joint_transforms: Vec<Pose>,

    /// Product of all local transforms, from the base to the last evaluated joint.
    pub transform: Pose,

    /// Translation column of `transform`.
    pub position: Position,
}

impl ChainEvaluation {
    /// Elements of the composed transform in storage order (column major),
    /// so elements 12, 13, 14 are the position.
    pub fn column_major(&self) -> [f64; 16] {
        let mut elements = [0.0; 16];
        elements.copy_from_slice(self.transform.as_slice());
        elements
    }
}

/// Local transform of a single joint rotated by `theta`:
/// rotation about the joint axis, link offset along it, then twist and link length
/// along the common normal.
pub fn joint_transform(parameter: &DhParameter, theta: f64) -> Pose {
    let (st, ct) = theta.sin_cos();
    let (sa, ca) = parameter.twist.sin_cos();
    let a = parameter.link_length;
    let d = parameter.link_offset;

    Pose::new(
        ct, -st * ca, st * sa, a * ct,
        st, ct * ca, -ct * sa, a * st,
        0.0, sa, ca, d,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Composes the first `limit` joint transforms (all if `None`), post-multiplying in
/// ascending joint order. A limit above the joint count evaluates the whole chain,
/// `Some(0)` gives the identity.
pub fn evaluate(parameters: &Parameters, qs: &Joints, limit: Option<usize>) -> ChainEvaluation {
    let limit = limit.map_or(JOINT_COUNT, |l| l.min(JOINT_COUNT));

    let mut transform = Pose::identity();
    let mut joint_transforms = Vec::with_capacity(limit);

    for (parameter, &theta) in parameters.joints.iter().zip(qs.iter()).take(limit) {
        let local = joint_transform(parameter, theta);
        transform *= local;
        joint_transforms.push(local);
    }

    ChainEvaluation {
        joint_transforms,
        position: position_of(&transform),
        transform,
    }
}

/// Position only, for callers that do not need the transforms.
pub fn position(parameters: &Parameters, qs: &Joints, limit: Option<usize>) -> Position {
    evaluate(parameters, qs, limit).position
}
