use crate::types::{ImuSample, Offset};

/// Smoothing factor for the low-pass filter.
pub const ALPHA: f64 = 0.1;

/// Remove the calibration offset and low-pass filter a raw sequence.
///
/// The filter is a causal feedback EMA: the first offset-removed sample
/// is emitted unchanged as the initial state, then each output is
/// `ALPHA * current + (1 - ALPHA) * previous_output` per axis. The
/// recurrence feeds back the filter's own output, so smoothing compounds
/// across the whole sequence; it must run strictly in arrival order.
/// Timestamps pass through untouched.
pub fn condition(samples: &[ImuSample], offset: &Offset) -> Vec<ImuSample> {
    let mut conditioned = Vec::with_capacity(samples.len());
    let mut previous: Option<ImuSample> = None;

    for sample in samples {
        let adjusted = subtract_offset(sample, offset);
        let smoothed = match previous {
            None => adjusted,
            Some(prev) => ImuSample {
                timestamp: adjusted.timestamp,
                yaw: ema(adjusted.yaw, prev.yaw),
                pitch: ema(adjusted.pitch, prev.pitch),
                roll: ema(adjusted.roll, prev.roll),
                accel_x: ema(adjusted.accel_x, prev.accel_x),
                accel_y: ema(adjusted.accel_y, prev.accel_y),
                accel_z: ema(adjusted.accel_z, prev.accel_z),
                gyro_x: ema(adjusted.gyro_x, prev.gyro_x),
                gyro_y: ema(adjusted.gyro_y, prev.gyro_y),
                gyro_z: ema(adjusted.gyro_z, prev.gyro_z),
            },
        };
        conditioned.push(smoothed);
        previous = Some(smoothed);
    }

    conditioned
}

fn ema(current: f64, previous_filtered: f64) -> f64 {
    ALPHA * current + (1.0 - ALPHA) * previous_filtered
}

fn subtract_offset(sample: &ImuSample, offset: &Offset) -> ImuSample {
    ImuSample {
        timestamp: sample.timestamp,
        yaw: sample.yaw - offset.yaw,
        pitch: sample.pitch - offset.pitch,
        roll: sample.roll - offset.roll,
        accel_x: sample.accel_x - offset.accel_x,
        accel_y: sample.accel_y - offset.accel_y,
        accel_z: sample.accel_z - offset.accel_z,
        gyro_x: sample.gyro_x - offset.gyro_x,
        gyro_y: sample.gyro_y - offset.gyro_y,
        gyro_z: sample.gyro_z - offset.gyro_z,
    }
}
