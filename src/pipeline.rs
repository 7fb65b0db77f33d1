use crate::calibration::estimate_offset;
use crate::conditioning::condition;
use crate::error::Result;
use crate::kinematics::integrate;
use crate::metrics::summarize;
use crate::session::{Session, SessionState};
use crate::spin::{classify, spin_rate_rpm};
use crate::storage::ArtifactStore;
use crate::types::{CalculatedSample, SessionSummary};
use log::{info, warn};

/// Run the full offline stage for one raw artifact: calibrate,
/// condition, integrate, classify, aggregate, persist.
///
/// A zero-row raw artifact is not an error: the run still writes
/// zero-row conditioned and calculated artifacts and returns the
/// "no data" summary. Sequence-level failures (missing raw artifact,
/// write failures) abort the run and leave no calculated artifact
/// behind for this attempt.
pub fn process_raw(store: &ArtifactStore, session_name: &str) -> Result<SessionSummary> {
    let raw = store.read_raw(session_name)?;
    info!("processing session {session_name}: {} raw samples", raw.len());

    let offset = estimate_offset(&raw);
    let conditioned = condition(&raw, &offset);
    let kinematics = integrate(&conditioned);
    if kinematics.invalid_dt_count > 0 {
        warn!(
            "session {session_name}: {} samples with non-positive time deltas carried forward",
            kinematics.invalid_dt_count
        );
    }

    let calculated: Vec<CalculatedSample> = conditioned
        .iter()
        .enumerate()
        .map(|(i, sample)| CalculatedSample {
            sample: *sample,
            total_acceleration: sample.total_acceleration(),
            velocity_x: kinematics.velocity[i].x,
            velocity_y: kinematics.velocity[i].y,
            velocity_z: kinematics.velocity[i].z,
            speed: kinematics.speed[i],
            total_distance: kinematics.total_distance[i],
            spin_rate: spin_rate_rpm(sample),
            spin_direction: classify(sample),
        })
        .collect();

    let summary = summarize(&calculated);

    store.write_conditioned(session_name, &conditioned)?;
    store.write_calculated(session_name, &calculated)?;
    store.write_summary(session_name, &summary)?;

    info!(
        "session {session_name} processed: {} samples, total distance {:.4} m",
        summary.sample_count, summary.total_distance
    );
    Ok(summary)
}

/// [`process_raw`] plus the session state transition: the session moves
/// to `Processed` only when every stage and write has succeeded;
/// otherwise it stays `Stopped` with no calculated artifact from this
/// run.
pub fn process_session(store: &ArtifactStore, session: &mut Session) -> Result<SessionSummary> {
    let summary = process_raw(store, &session.name)?;
    session.state = SessionState::Processed;
    Ok(summary)
}
