//! Hardcoded DH parameters for the supported robot

pub mod dh_kinematics {
    use crate::parameters::dh_kinematics::{DhParameter, Parameters};
    use std::f64::consts::PI;

    impl Parameters {
        /// Universal Robots UR3 arm with the last wrist joint left out, as used by the
        /// slider demo this crate was written for. Only the first five joints are modelled,
        /// the end effector is the flange of the fifth joint.
        pub fn ur3_5dof() -> Self {
            Parameters {
                joints: [
                    DhParameter::new(PI / 2.0, 0.0, 0.1519),
                    DhParameter::new(0.0, -0.24365, 0.0),
                    DhParameter::new(0.0, -0.21325, 0.0),
                    DhParameter::new(PI / 2.0, 0.0, 0.11235),
                    DhParameter::new(-PI / 2.0, 0.0, 0.08535),
                ],
            }
        }
    }

    impl Default for Parameters {
        fn default() -> Self {
            Self::ur3_5dof()
        }
    }
}
