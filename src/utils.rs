//! Helper functions

use crate::kinematic_traits::{Joints, Pose, Position, JOINT_COUNT};

/// Checks the solution for validity.
pub(crate) mod dh_kinematics {
    use crate::kinematic_traits::Joints;

    /// Checks if all elements in the array are finite
    pub fn is_valid(qs: &Joints) -> bool {
        qs.iter().all(|&q| q.is_finite())
    }
}

/// Format joint values, converting radians to degrees.
pub fn format_joints(joints: &Joints) -> String {
    let mut row_str = String::new();
    for joint_idx in 0..JOINT_COUNT {
        let computed = joints[joint_idx];
        row_str.push_str(&format!("{:5.2} ", computed.to_degrees()));
    }
    format!("[{}]", row_str.trim_end())
}

/// Print joint values, converting radians to degrees.
pub fn dump_joints(joints: &Joints) {
    println!("{}", format_joints(joints));
}

/// Format joint values in radians, 3 decimals.
pub fn format_joints_radians(joints: &Joints) -> String {
    let row: Vec<String> = joints.iter().map(|q| format!("{:.3}", q)).collect();
    format!("[{}]", row.join(" "))
}

/// Four rows of four values, 3 decimals. Row r holds the stored elements
/// r, r + 4, r + 8 and r + 12, so the translation is the last column.
pub fn format_pose(pose: &Pose) -> String {
    let mut table = String::new();
    for row in 0..4 {
        let cells: Vec<String> = (0..4).map(|col| format!("{:8.3}", pose[(row, col)])).collect();
        table.push_str(&cells.join(" "));
        table.push('\n');
    }
    table
}

pub fn dump_pose(pose: &Pose) {
    print!("{}", format_pose(pose));
}

pub fn format_position(position: &Position) -> String {
    format!("x: {:.3}, y: {:.3}, z: {:.3}", position.x, position.y, position.z)
}

pub fn dump_position(position: &Position) {
    println!("{}", format_position(position));
}

/// Allows to specify joint values in degrees (converts to radians)
pub fn as_radians(degrees: [i32; JOINT_COUNT]) -> Joints {
    std::array::from_fn(|i| (degrees[i] as f64).to_radians())
}

/// formatting for YAML output
pub(crate) fn deg(x: &f64) -> String {
    if *x == 0.0 {
        return "0".to_string();
    }
    format!("deg({:.4})", x.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::dh_kinematics::*;
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_is_valid_with_all_finite() {
        let qs = [0.0, 1.0, -1.0, 0.5, PI];
        assert!(is_valid(&qs));
    }

    #[test]
    fn test_is_valid_with_nan() {
        let qs = [0.0, f64::NAN, 1.0, -1.0, 0.5];
        assert!(!is_valid(&qs));
    }

    #[test]
    fn test_is_valid_with_infinity() {
        let qs = [0.0, f64::INFINITY, 1.0, -1.0, 0.5];
        assert!(!is_valid(&qs));
    }

    #[test]
    fn test_format_pose_rows() {
        let pose = Pose::new_translation(&nalgebra::Vector3::new(1.0, -2.0, 0.5));
        let table = format_pose(&pose);
        let rows: Vec<&str> = table.lines().collect();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].split_whitespace().collect::<Vec<_>>(), ["1.000", "0.000", "0.000", "1.000"]);
        assert_eq!(rows[1].split_whitespace().last(), Some("-2.000"));
        assert_eq!(rows[3].split_whitespace().collect::<Vec<_>>(), ["0.000", "0.000", "0.000", "1.000"]);
    }

    #[test]
    fn test_format_joints_degrees() {
        assert_eq!(format_joints(&as_radians([90, 0, -45, 180, 10])), "[90.00  0.00 -45.00 180.00 10.00]");
    }

    #[test]
    fn test_format_joints_radians() {
        assert_eq!(format_joints_radians(&[0.0, -1.5, 0.25, 3.0, 0.1234]), "[0.000 -1.500 0.250 3.000 0.123]");
    }

    #[test]
    fn test_deg() {
        assert_eq!(deg(&0.0), "0");
        assert_eq!(deg(&(PI / 2.0)), "deg(90.0000)");
    }
}
