use crate::types::{CalculatedSample, SessionSummary, SpinDirection};

/// Reduce a calculated sequence to its summary statistics.
///
/// The dominant spin direction is the mode, computed in one
/// left-to-right pass; on a tie the label that reached the winning count
/// first keeps it. An empty sequence yields the "no data" summary.
pub fn summarize(samples: &[CalculatedSample]) -> SessionSummary {
    if samples.is_empty() {
        return SessionSummary::empty();
    }

    let n = samples.len() as f64;
    let mut summary = SessionSummary::empty();
    summary.sample_count = samples.len();

    let mut speed_sum = 0.0;
    let mut spin_sum = 0.0;
    // First-seen order, so tie-breaking stays stable.
    let mut direction_counts: Vec<(SpinDirection, usize)> = Vec::with_capacity(4);

    for sample in samples {
        speed_sum += sample.speed;
        spin_sum += sample.spin_rate;
        summary.max_speed = summary.max_speed.max(sample.speed);
        summary.max_spin_rate = summary.max_spin_rate.max(sample.spin_rate);
        summary.max_total_acceleration =
            summary.max_total_acceleration.max(sample.total_acceleration);
        summary.max_gyro_magnitude = summary.max_gyro_magnitude.max(sample.sample.gyro().norm());

        match direction_counts
            .iter_mut()
            .find(|(dir, _)| *dir == sample.spin_direction)
        {
            Some((_, count)) => *count += 1,
            None => direction_counts.push((sample.spin_direction, 1)),
        }
    }

    summary.avg_speed = speed_sum / n;
    summary.avg_spin_rate = spin_sum / n;
    // Distance is cumulative and non-decreasing; the last row holds the
    // session total.
    summary.total_distance = samples[samples.len() - 1].total_distance;

    let mut dominant = direction_counts[0];
    for &entry in &direction_counts[1..] {
        if entry.1 > dominant.1 {
            dominant = entry;
        }
    }
    summary.dominant_spin = Some(dominant.0);

    summary
}
