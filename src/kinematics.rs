use crate::types::ImuSample;
use log::warn;
use nalgebra::Vector3;

/// Damping applied to the whole accumulated velocity at every step, not
/// just the incremental term. Both integrations (accel -> velocity ->
/// distance) therefore bleed the trajectory exponentially.
pub const VELOCITY_DAMPING: f64 = 0.9;

/// Per-sample kinematic outputs, index-aligned with the input sequence.
#[derive(Clone, Debug)]
pub struct KinematicSeries {
    pub velocity: Vec<Vector3<f64>>,
    pub speed: Vec<f64>,
    pub total_distance: Vec<f64>,
    /// Number of samples whose time delta was non-positive.
    pub invalid_dt_count: usize,
}

/// Integrate a conditioned acceleration sequence into velocity, speed,
/// and cumulative distance.
///
/// Velocity recurrence per axis:
/// `v[i] = DAMPING * (v[i-1] + (a[i] + a[i-1]) / 2 * dt)`, with
/// `v[0] = 0`. Distance is the norm of the velocity trapezoid:
/// `d[i] = d[i-1] + ‖(v[i] + v[i-1]) / 2 * dt‖`, with `d[0] = 0`.
///
/// A sample with `dt <= 0` carries the previous velocity and distance
/// forward unchanged, so the output series always has one entry per
/// input sample and velocity and distance never desynchronize.
pub fn integrate(samples: &[ImuSample]) -> KinematicSeries {
    let mut series = KinematicSeries {
        velocity: Vec::with_capacity(samples.len()),
        speed: Vec::with_capacity(samples.len()),
        total_distance: Vec::with_capacity(samples.len()),
        invalid_dt_count: 0,
    };

    if samples.is_empty() {
        return series;
    }

    series.velocity.push(Vector3::zeros());
    series.speed.push(0.0);
    series.total_distance.push(0.0);

    for i in 1..samples.len() {
        let dt = samples[i].timestamp - samples[i - 1].timestamp;
        let prev_velocity = series.velocity[i - 1];
        let prev_distance = series.total_distance[i - 1];

        if dt <= 0.0 {
            series.invalid_dt_count += 1;
            warn!(
                "non-positive time delta at sample {} (dt = {:.6}); carrying forward",
                i, dt
            );
            series.velocity.push(prev_velocity);
            series.speed.push(prev_velocity.norm());
            series.total_distance.push(prev_distance);
            continue;
        }

        let accel_mid = (samples[i].accel() + samples[i - 1].accel()) / 2.0;
        let velocity = (prev_velocity + accel_mid * dt) * VELOCITY_DAMPING;
        let step = (velocity + prev_velocity) / 2.0 * dt;

        series.velocity.push(velocity);
        series.speed.push(velocity.norm());
        series.total_distance.push(prev_distance + step.norm());
    }

    series
}
