use crate::types::{ImuSample, SpinDirection};
use std::f64::consts::PI;

/// Spin rate in revolutions per minute from the angular-rate vector
/// norm, rounded to 2 decimal places. Gyro axes are rad/s.
pub fn spin_rate_rpm(sample: &ImuSample) -> f64 {
    let rad_per_sec = sample.gyro().norm();
    let rpm = rad_per_sec * 60.0 / (2.0 * PI);
    (rpm * 100.0).round() / 100.0
}

/// Classify the spin direction of one conditioned sample.
///
/// Stateless per-sample rule: an exactly zero orientation means no spin;
/// otherwise the strictly largest gyro-axis magnitude picks the label.
/// Z-dominance and ties both fall through to `TopSpin`; the shipped
/// classifier behaves this way and the labels are kept compatible.
pub fn classify(sample: &ImuSample) -> SpinDirection {
    if sample.yaw == 0.0 && sample.pitch == 0.0 && sample.roll == 0.0 {
        return SpinDirection::NoSpin;
    }

    let x = sample.gyro_x.abs();
    let y = sample.gyro_y.abs();
    let z = sample.gyro_z.abs();

    if x > y && x > z {
        SpinDirection::OffSpin
    } else if y > x && y > z {
        SpinDirection::LegSpin
    } else {
        SpinDirection::TopSpin
    }
}
