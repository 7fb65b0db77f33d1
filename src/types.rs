use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One decoded IMU reading from the ball.
///
/// Field order matches the wire format: timestamp, yaw, pitch, roll,
/// accel XYZ, gyro XYZ. Yaw/pitch/roll are degrees, accel is m/s²,
/// gyro is rad/s.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImuSample {
    pub timestamp: f64,
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
    pub accel_x: f64,
    pub accel_y: f64,
    pub accel_z: f64,
    pub gyro_x: f64,
    pub gyro_y: f64,
    pub gyro_z: f64,
}

impl ImuSample {
    pub fn accel(&self) -> Vector3<f64> {
        Vector3::new(self.accel_x, self.accel_y, self.accel_z)
    }

    pub fn gyro(&self) -> Vector3<f64> {
        Vector3::new(self.gyro_x, self.gyro_y, self.gyro_z)
    }

    pub fn total_acceleration(&self) -> f64 {
        self.accel().norm()
    }
}

/// Per-axis calibration bias, estimated once from the initial sample
/// window and held constant for the session. Timestamp has no offset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
    pub accel_x: f64,
    pub accel_y: f64,
    pub accel_z: f64,
    pub gyro_x: f64,
    pub gyro_y: f64,
    pub gyro_z: f64,
}

/// Coarse spin classification from the dominant angular-rate axis.
///
/// Z-dominance and exact ties both map to `TopSpin`; this matches the
/// shipped classifier and is kept as-is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpinDirection {
    #[serde(rename = "no-spin")]
    NoSpin,
    #[serde(rename = "Off-spin")]
    OffSpin,
    #[serde(rename = "Leg-spin")]
    LegSpin,
    #[serde(rename = "Top-spin")]
    TopSpin,
}

impl SpinDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpinDirection::NoSpin => "no-spin",
            SpinDirection::OffSpin => "Off-spin",
            SpinDirection::LegSpin => "Leg-spin",
            SpinDirection::TopSpin => "Top-spin",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "no-spin" => Some(SpinDirection::NoSpin),
            "Off-spin" => Some(SpinDirection::OffSpin),
            "Leg-spin" => Some(SpinDirection::LegSpin),
            "Top-spin" => Some(SpinDirection::TopSpin),
            _ => None,
        }
    }
}

impl fmt::Display for SpinDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A conditioned sample augmented with the derived kinematic and spin
/// metrics. Row schema of the calculated artifact (18 fields).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalculatedSample {
    #[serde(flatten)]
    pub sample: ImuSample,
    pub total_acceleration: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
    pub velocity_z: f64,
    pub speed: f64,
    pub total_distance: f64,
    pub spin_rate: f64,
    pub spin_direction: SpinDirection,
}

impl CalculatedSample {
    pub fn velocity(&self) -> Vector3<f64> {
        Vector3::new(self.velocity_x, self.velocity_y, self.velocity_z)
    }
}

/// Summary statistics over one calculated session.
///
/// `dominant_spin` is `None` when the session has no data; the numeric
/// fields are zero in that case rather than NaN.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionSummary {
    pub sample_count: usize,
    pub max_speed: f64,
    pub avg_speed: f64,
    pub max_spin_rate: f64,
    pub avg_spin_rate: f64,
    pub total_distance: f64,
    pub dominant_spin: Option<SpinDirection>,
    pub max_total_acceleration: f64,
    pub max_gyro_magnitude: f64,
}

impl SessionSummary {
    /// The well-defined "no data" summary.
    pub fn empty() -> Self {
        SessionSummary {
            sample_count: 0,
            max_speed: 0.0,
            avg_speed: 0.0,
            max_spin_rate: 0.0,
            avg_spin_rate: 0.0,
            total_distance: 0.0,
            dominant_spin: None,
            max_total_acceleration: 0.0,
            max_gyro_magnitude: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accel_magnitude() {
        let sample = ImuSample {
            timestamp: 0.0,
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
            accel_x: 3.0,
            accel_y: 4.0,
            accel_z: 0.0,
            gyro_x: 0.0,
            gyro_y: 0.0,
            gyro_z: 0.0,
        };
        assert_eq!(sample.total_acceleration(), 5.0);
    }

    #[test]
    fn test_spin_direction_tokens_round_trip() {
        for dir in [
            SpinDirection::NoSpin,
            SpinDirection::OffSpin,
            SpinDirection::LegSpin,
            SpinDirection::TopSpin,
        ] {
            assert_eq!(SpinDirection::parse(dir.as_str()), Some(dir));
        }
        assert_eq!(SpinDirection::parse("sidespin"), None);
    }
}
