//! Rust implementation of forward kinematics and iterative inverse kinematics for a
//! five joint serial manipulator described by Denavit-Hartenberg (DH) parameters.
//!
//! Forward kinematics multiplies the five joint transforms
//! ```text
//! | cosθ  -sinθ·cosα   sinθ·sinα  a·cosθ |
//! | sinθ   cosθ·cosα  -cosθ·sinα  a·sinθ |
//! | 0      sinα        cosα       d      |
//! | 0      0           0          1      |
//! ```
//! in joint order, starting from the base. Any prefix of the chain can be evaluated, this is
//! what the inverse kinematics uses to find the position of every joint.
//!
//! Inverse kinematics is cyclic coordinate descent (CCD) for the end effector position
//! (orientation is not controlled). It is a heuristic: it always returns, within a fixed
//! iteration budget, and reports how far from the target the end effector remains.
//!
//! # Features
//!
//! - Per joint transforms, composed transform and end effector position from one call.
//! - CCD solver with two correction modes: the "broadcast" correction that reproduces the
//!   original slider demo of the UR3 arm, and the textbook single axis correction.
//! - Robot geometry and solver settings can be read from YAML (feature `allow_filesystem`).
//! - Command line tool `rs-ccd-kinematics` for quick forward and inverse computations.
//!
//! # Parameters
//!
//! Each joint has a twist (alpha), link length (a) and link offset (d). The geometry of the
//! five first joints of the UR3 arm is available as `Parameters::ur3_5dof()`.
//!
//! ```
//! use rs_ccd_kinematics::kinematic_traits::{Kinematics, Position, JOINTS_AT_ZERO};
//! use rs_ccd_kinematics::kinematics_impl::DHKinematics;
//! use rs_ccd_kinematics::parameters::dh_kinematics::Parameters;
//!
//! let robot = DHKinematics::new(Parameters::ur3_5dof());
//! let at_zero = robot.forward_position(&JOINTS_AT_ZERO);
//! assert!((at_zero.x + 0.4569).abs() < 1e-9);
//!
//! let target = Position::new(-0.35, -0.15, -0.05);
//! let joints = robot.inverse(&target, &JOINTS_AT_ZERO);
//! assert!(joints.iter().all(|q| q.is_finite()));
//! ```

pub mod parameters;
pub mod parameters_robots;

#[cfg(feature = "allow_filesystem")]
pub mod parameters_from_file;

#[cfg(feature = "allow_filesystem")]
pub mod parameter_error;

pub mod utils;
pub mod kinematic_traits;
pub mod kinematics_impl;

pub mod chain;
pub mod ccd;

#[cfg(test)]
#[cfg(feature = "allow_filesystem")]
mod tests;
