//! Acquisition-to-metrics pipeline for a wireless IMU cricket ball.
//!
//! The ball streams base64-encoded ten-field samples over the wireless
//! link; this crate buffers them into recording sessions, persists each
//! session as a raw CSV artifact, and runs the offline processing
//! stage: calibration-offset estimation, low-pass conditioning,
//! kinematic integration (velocity, speed, cumulative distance), spin
//! rate and direction classification, and summary aggregation.
//!
//! Link pairing, presentation, and auth live outside this crate; the
//! core is driven programmatically through [`SessionRecorder`],
//! [`ArtifactStore`], and [`pipeline::process_session`].

pub mod calibration;
pub mod conditioning;
pub mod decoder;
pub mod error;
pub mod ingest;
pub mod kinematics;
pub mod metrics;
pub mod pipeline;
pub mod session;
pub mod spin;
pub mod storage;
pub mod types;

pub use error::{Result, TrackerError};
pub use session::{Session, SessionRecorder, SessionState};
pub use storage::{ArtifactStore, SessionInfo};
pub use types::{CalculatedSample, ImuSample, Offset, SessionSummary, SpinDirection};
