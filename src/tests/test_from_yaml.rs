#[cfg(test)]
mod tests {
    use crate::ccd::{CorrectionMode, SolverSettings};
    use crate::kinematic_traits::{Kinematics, JOINTS_AT_ZERO};
    use crate::kinematics_impl::DHKinematics;
    use crate::parameter_error::ParameterError;
    use crate::parameters::dh_kinematics::Parameters;
    use crate::tests::test_utils::{are_positions_approx_equal, load_robot};

    const READ_ERROR: &str = "Failed to load parameters from file";
    const SMALL: f64 = 1e-12;

    fn assert_parameters_eq(expected: &Parameters, loaded: &Parameters) {
        for (i, (e, l)) in expected.joints.iter().zip(loaded.joints.iter()).enumerate() {
            assert!((e.twist - l.twist).abs() < SMALL, "twist of joint {}", i + 1);
            assert!((e.link_length - l.link_length).abs() < SMALL, "a of joint {}", i + 1);
            assert!((e.link_offset - l.link_offset).abs() < SMALL, "d of joint {}", i + 1);
        }
    }

    #[test]
    fn test_parameters_from_yaml() {
        let loaded = Parameters::from_yaml_file("src/tests/data/ur3_5dof.yaml").expect(READ_ERROR);
        assert_parameters_eq(&Parameters::ur3_5dof(), &loaded);

        // Solver section is optional
        let settings = SolverSettings::from_yaml_file("src/tests/data/ur3_5dof.yaml").expect(READ_ERROR);
        assert_eq!(settings, SolverSettings::default());
    }

    #[test]
    fn test_robot_from_yaml_with_solver() {
        let robot = load_robot("src/tests/data/ur3_5dof_single_axis.yaml").expect(READ_ERROR);
        assert_parameters_eq(&Parameters::ur3_5dof(), robot.parameters());

        let settings = robot.settings();
        assert_eq!(settings.max_iterations, 250);
        assert_eq!(settings.tolerance, 0.0005);
        assert!((settings.min_correction - 0.5_f64.to_radians()).abs() < SMALL);
        assert_eq!(settings.mode, CorrectionMode::SingleAxis);

        let reference = DHKinematics::new(Parameters::ur3_5dof());
        let qs = [0.2, -0.3, 0.4, -0.5, 0.6];
        assert!(are_positions_approx_equal(
            &robot.forward_position(&qs),
            &reference.forward_position(&qs),
            SMALL
        ));
    }

    #[test]
    fn test_wrong_joint_count() {
        let result = Parameters::from_yaml_file("src/tests/data/four_joints.yaml");
        assert!(matches!(result, Err(ParameterError::InvalidLength { expected: 5, found: 4 })));
    }

    #[test]
    fn test_missing_field() {
        match Parameters::from_yaml_file("src/tests/data/missing_offset.yaml") {
            Err(ParameterError::MissingField(field)) => assert_eq!(field, "dh_parameters[2].d"),
            other => panic!("Expected missing field, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_angle() {
        let result = Parameters::from_yaml_file("src/tests/data/wrong_angle.yaml");
        assert!(matches!(result, Err(ParameterError::WrongAngle(_))));
    }

    #[test]
    fn test_unknown_solver_mode() {
        let result = DHKinematics::from_yaml_file("src/tests/data/bad_solver.yaml");
        assert!(matches!(result, Err(ParameterError::InvalidValue(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = Parameters::from_yaml_file("src/tests/data/no_such_robot.yaml");
        assert!(matches!(result, Err(ParameterError::IoError(_))));
    }

    #[test]
    fn test_not_yaml() {
        let result = Parameters::from_yaml_str("dh_parameters: [ { alpha: 0");
        assert!(matches!(result, Err(ParameterError::ParseError(_))));
        let result = Parameters::from_yaml_str("robot: ur3");
        assert!(matches!(result, Err(ParameterError::MissingField(_))));
    }

    #[test]
    fn test_invalid_solver_values() {
        let base = Parameters::ur3_5dof().to_yaml();
        for section in [
            "ccd_solver:\n  max_iterations: 0\n",
            "ccd_solver:\n  max_iterations: many\n",
            "ccd_solver:\n  tolerance: -0.1\n",
            "ccd_solver:\n  min_correction: -1\n",
            "ccd_solver:\n  mode: 3\n",
        ] {
            let yaml = format!("{}{}", base, section);
            assert!(
                matches!(SolverSettings::from_yaml_str(&yaml), Err(ParameterError::InvalidValue(_))),
                "Accepted {}",
                section
            );
        }
    }

    #[test]
    fn test_yaml_round_trip() {
        let robot = DHKinematics::new_with_settings(Parameters::ur3_5dof(), SolverSettings::single_axis());
        let yaml = robot.to_yaml();
        let parameters = Parameters::from_yaml_str(&yaml).expect("to_yaml output must be readable");
        let settings = SolverSettings::from_yaml_str(&yaml).expect("to_yaml output must be readable");

        // deg(...) is written with 4 decimals
        for (e, l) in Parameters::ur3_5dof().joints.iter().zip(parameters.joints.iter()) {
            assert!((e.twist - l.twist).abs() < 1e-6);
            assert_eq!(e.link_length, l.link_length);
            assert_eq!(e.link_offset, l.link_offset);
        }
        assert_eq!(settings, SolverSettings::single_axis());

        let loaded = DHKinematics::new_with_settings(parameters, settings);
        let target = robot.forward_position(&[0.1, 0.2, 0.3, 0.4, 0.5]);
        assert!(loaded.solve(&JOINTS_AT_ZERO, &target).converged);
    }
}
