use crate::types::{ImuSample, Offset};

/// Maximum number of leading samples used to estimate the bias.
pub const CALIBRATION_WINDOW: usize = 1000;

/// Estimate the per-axis calibration offset from the start of a raw
/// sequence.
///
/// Uses the arithmetic mean of each axis over the first
/// `min(CALIBRATION_WINDOW, N)` samples. An empty sequence yields the
/// zero offset so the pipeline stays total on zero-row sessions.
pub fn estimate_offset(samples: &[ImuSample]) -> Offset {
    let count = samples.len().min(CALIBRATION_WINDOW);
    if count == 0 {
        return Offset::default();
    }

    let mut offset = Offset::default();
    for sample in &samples[..count] {
        offset.yaw += sample.yaw;
        offset.pitch += sample.pitch;
        offset.roll += sample.roll;
        offset.accel_x += sample.accel_x;
        offset.accel_y += sample.accel_y;
        offset.accel_z += sample.accel_z;
        offset.gyro_x += sample.gyro_x;
        offset.gyro_y += sample.gyro_y;
        offset.gyro_z += sample.gyro_z;
    }

    let n = count as f64;
    offset.yaw /= n;
    offset.pitch /= n;
    offset.roll /= n;
    offset.accel_x /= n;
    offset.accel_y /= n;
    offset.accel_z /= n;
    offset.gyro_x /= n;
    offset.gyro_y /= n;
    offset.gyro_z /= n;
    offset
}
