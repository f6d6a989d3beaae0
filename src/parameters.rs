//! Defines the DH parameter data structure

pub mod dh_kinematics {
    use crate::kinematic_traits::JOINT_COUNT;
    use crate::utils::deg;

    /// Geometry of a single joint in the Denavit-Hartenberg convention. The joint angle
    /// itself is not part of it, it comes with every call.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct DhParameter {
        /// Twist (alpha) between the previous and this joint axis, radians.
        pub twist: f64,

        /// Link length (a) along the common normal, meters.
        pub link_length: f64,

        /// Link offset (d) along the previous joint axis, meters.
        pub link_offset: f64,
    }

    impl DhParameter {
        pub const fn new(twist: f64, link_length: f64, link_offset: f64) -> Self {
            DhParameter { twist, link_length, link_offset }
        }
    }

    /// Parameters for the kinematic model of the robot. See
    /// [parameters_robots.rs](parameters_robots.rs) for the concrete robot model.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct Parameters {
        /// One entry per joint, joint 1 (base) first.
        pub joints: [DhParameter; JOINT_COUNT],
    }

    impl Parameters {
        /// Convert to string yaml representation (quick viewing, etc).
        /// The output can be read back with `Parameters::from_yaml_file`.
        pub fn to_yaml(&self) -> String {
            let mut yaml = String::from("dh_parameters:\n");
            for joint in &self.joints {
                yaml.push_str(&format!(
                    "  - {{ alpha: {}, a: {}, d: {} }}\n",
                    deg(&joint.twist),
                    joint.link_length,
                    joint.link_offset
                ));
            }
            yaml
        }

        /// Largest distance the end effector can ever be from the base origin.
        pub fn reach(&self) -> f64 {
            self.joints
                .iter()
                .map(|j| j.link_length.abs() + j.link_offset.abs())
                .sum()
        }
    }
}
