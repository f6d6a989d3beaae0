//! Supports extracting DH parameters and solver settings from YAML file (optional)

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use yaml_rust2::{Yaml, YamlLoader};

use crate::ccd::{CorrectionMode, SolverSettings};
use crate::kinematic_traits::JOINT_COUNT;
use crate::kinematics_impl::DHKinematics;
use crate::parameter_error::ParameterError;
use crate::parameters::dh_kinematics::{DhParameter, Parameters};

static DEG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^deg\(\s*([-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)\s*\)$")
        .expect("deg() pattern is valid")
});

impl Parameters {
    /// Read the robot geometry from YAML file. YAML file like this is supported:
    /// ```yaml
    /// # UR3, first five joints
    /// dh_parameters:
    ///   - { alpha: deg(90), a: 0.0, d: 0.1519 }
    ///   - { alpha: 0, a: -0.24365, d: 0 }
    ///   - { alpha: 0, a: -0.21325, d: 0 }
    ///   - { alpha: deg(90), a: 0, d: 0.11235 }
    ///   - { alpha: deg(-90), a: 0, d: 0.08535 }
    /// ```
    /// Angles are in radians unless written as deg(angle). Lengths are in meters.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ParameterError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ParameterError> {
        let doc = load(contents)?;
        let entries = doc["dh_parameters"]
            .as_vec()
            .ok_or_else(|| ParameterError::MissingField("dh_parameters".to_string()))?;

        if entries.len() != JOINT_COUNT {
            return Err(ParameterError::InvalidLength {
                expected: JOINT_COUNT,
                found: entries.len(),
            });
        }

        let mut joints = [DhParameter::new(0.0, 0.0, 0.0); JOINT_COUNT];
        for (i, entry) in entries.iter().enumerate() {
            joints[i] = DhParameter {
                twist: angle(&entry["alpha"], &format!("dh_parameters[{}].alpha", i))?,
                link_length: number(&entry["a"], &format!("dh_parameters[{}].a", i))?,
                link_offset: number(&entry["d"], &format!("dh_parameters[{}].d", i))?,
            };
        }

        Ok(Parameters { joints })
    }
}

impl SolverSettings {
    /// Reads the optional `ccd_solver` section. Missing section or missing keys
    /// take the default values:
    /// ```yaml
    /// ccd_solver:
    ///   max_iterations: 100
    ///   tolerance: 0.001
    ///   min_correction: 0.01
    ///   mode: broadcast # or single_axis
    /// ```
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ParameterError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, ParameterError> {
        let doc = load(contents)?;
        let section = &doc["ccd_solver"];
        let mut settings = SolverSettings::default();
        if section.is_badvalue() || section.is_null() {
            return Ok(settings);
        }

        let max_iterations = &section["max_iterations"];
        if !max_iterations.is_badvalue() {
            settings.max_iterations = match max_iterations.as_i64() {
                Some(n) if n > 0 => n as usize,
                _ => {
                    return Err(ParameterError::InvalidValue(format!(
                        "ccd_solver.max_iterations must be a positive integer (got {:?})",
                        max_iterations
                    )));
                }
            };
        }

        let tolerance = &section["tolerance"];
        if !tolerance.is_badvalue() {
            settings.tolerance = number(tolerance, "ccd_solver.tolerance")?;
            if settings.tolerance <= 0.0 {
                return Err(ParameterError::InvalidValue(format!(
                    "ccd_solver.tolerance must be positive (got {})",
                    settings.tolerance
                )));
            }
        }

        let min_correction = &section["min_correction"];
        if !min_correction.is_badvalue() {
            settings.min_correction = angle(min_correction, "ccd_solver.min_correction")?;
            if settings.min_correction < 0.0 {
                return Err(ParameterError::InvalidValue(format!(
                    "ccd_solver.min_correction must not be negative (got {})",
                    settings.min_correction
                )));
            }
        }

        let mode = &section["mode"];
        if !mode.is_badvalue() {
            let name = mode.as_str().ok_or_else(|| {
                ParameterError::InvalidValue(format!("ccd_solver.mode must be a string (got {:?})", mode))
            })?;
            settings.mode = CorrectionMode::from_name(name).ok_or_else(|| {
                ParameterError::InvalidValue(format!(
                    "unknown ccd_solver.mode '{}' (expected broadcast or single_axis)",
                    name
                ))
            })?;
        }

        Ok(settings)
    }
}

impl DHKinematics {
    /// Robot geometry and solver settings from the same YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ParameterError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(DHKinematics::new_with_settings(
            Parameters::from_yaml_str(&contents)?,
            SolverSettings::from_yaml_str(&contents)?,
        ))
    }

    /// YAML representation that `from_yaml_file` reads back.
    pub fn to_yaml(&self) -> String {
        format!("{}{}", self.parameters().to_yaml(), self.settings().to_yaml())
    }
}

fn load(contents: &str) -> Result<Yaml, ParameterError> {
    let mut docs = YamlLoader::load_from_str(contents)
        .map_err(|e| ParameterError::ParseError(format!("{}", e)))?;
    if docs.is_empty() {
        return Err(ParameterError::ParseError("empty YAML document".to_string()));
    }
    Ok(docs.swap_remove(0))
}

/// Finite number, integer or real.
fn number(value: &Yaml, label: &str) -> Result<f64, ParameterError> {
    let parsed = match value {
        Yaml::BadValue => return Err(ParameterError::MissingField(label.to_string())),
        Yaml::Integer(i) => *i as f64,
        Yaml::Real(_) => value
            .as_f64()
            .ok_or_else(|| ParameterError::ParseError(format!("{}: not a number", label)))?,
        Yaml::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ParameterError::ParseError(format!("{}: '{}' is not a number", label, s)))?,
        other => {
            return Err(ParameterError::ParseError(format!(
                "{}: expected a number, found {:?}",
                label, other
            )));
        }
    };
    if !parsed.is_finite() {
        return Err(ParameterError::InvalidValue(format!(
            "{} must be finite (got {})",
            label, parsed
        )));
    }
    Ok(parsed)
}

/// Angle in radians, or in degrees if written as deg(angle).
fn angle(value: &Yaml, label: &str) -> Result<f64, ParameterError> {
    if let Yaml::String(s) = value {
        let s = s.trim();
        if s.starts_with("deg") {
            let captures = DEG
                .captures(s)
                .ok_or_else(|| ParameterError::WrongAngle(format!("{}: '{}'", label, s)))?;
            let degrees: f64 = captures[1]
                .parse()
                .map_err(|_| ParameterError::WrongAngle(format!("{}: '{}'", label, s)))?;
            return Ok(degrees.to_radians());
        }
    }
    number(value, label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_in_degrees() {
        let value = Yaml::String("deg(-90)".to_string());
        let radians = angle(&value, "alpha").expect("deg(-90) is a valid angle");
        assert!((radians + std::f64::consts::FRAC_PI_2).abs() < 1e-15);

        let value = Yaml::String("deg( 45.5 )".to_string());
        assert!((angle(&value, "alpha").expect("valid") - 45.5_f64.to_radians()).abs() < 1e-15);
    }

    #[test]
    fn test_angle_in_radians() {
        assert_eq!(angle(&Yaml::Integer(0), "alpha").expect("valid"), 0.0);
        assert_eq!(angle(&Yaml::Real("1.5".to_string()), "alpha").expect("valid"), 1.5);
    }

    #[test]
    fn test_wrong_angle() {
        let value = Yaml::String("deg(ninety)".to_string());
        assert!(matches!(angle(&value, "alpha"), Err(ParameterError::WrongAngle(_))));
    }

    #[test]
    fn test_missing_number() {
        assert!(matches!(number(&Yaml::BadValue, "a"), Err(ParameterError::MissingField(_))));
        assert!(matches!(number(&Yaml::Boolean(true), "a"), Err(ParameterError::ParseError(_))));
    }

    #[test]
    fn test_not_finite() {
        assert!(matches!(
            number(&Yaml::Real(".inf".to_string()), "d"),
            Err(ParameterError::InvalidValue(_))
        ));
    }
}
