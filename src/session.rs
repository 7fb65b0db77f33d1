use crate::error::{Result, TrackerError};
use crate::storage::ArtifactStore;
use crate::types::ImuSample;
use chrono::Local;
use log::info;

/// Session lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting appended samples
    Recording,
    /// Raw artifact persisted, pipeline not yet run
    Stopped,
    /// Full pipeline completed for this session
    Processed,
}

/// A finished recording session. Produced by [`SessionRecorder::end`];
/// the pipeline flips it to `Processed` only after every stage and write
/// has succeeded.
#[derive(Debug, Clone)]
pub struct Session {
    pub name: String,
    pub state: SessionState,
    pub sample_count: usize,
}

struct ActiveSession {
    name: String,
    samples: Vec<ImuSample>,
}

/// Accumulates decoded samples for one recording session in arrival
/// order.
///
/// The buffer is exclusively owned here until `end()` hands it to the
/// artifact store; nothing is shared across session boundaries. Arrival
/// order is preserved as-is - samples are assumed roughly
/// timestamp-ordered but are never re-sorted.
pub struct SessionRecorder {
    active: Option<ActiveSession>,
    last_name: Option<String>,
    duplicate_counter: u32,
}

impl SessionRecorder {
    pub fn new() -> Self {
        SessionRecorder {
            active: None,
            last_name: None,
            duplicate_counter: 0,
        }
    }

    /// Start a new recording session and return its name.
    ///
    /// The name encodes the creation time at second granularity; two
    /// sessions begun within the same second of one process run get a
    /// numeric suffix so names stay unique.
    pub fn begin(&mut self) -> Result<&str> {
        if self.active.is_some() {
            return Err(TrackerError::AlreadyRecording);
        }

        let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
        let name = if self.last_name.as_deref().is_some_and(|last| {
            last == stamp || last.starts_with(&format!("{stamp}_"))
        }) {
            self.duplicate_counter += 1;
            format!("{}_{}", stamp, self.duplicate_counter + 1)
        } else {
            self.duplicate_counter = 0;
            stamp
        };

        info!("recording session {name} started");
        self.last_name = Some(name.clone());
        let session = self.active.insert(ActiveSession {
            name,
            samples: Vec::new(),
        });
        Ok(&session.name)
    }

    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    /// Append one decoded sample to the active session.
    ///
    /// Valid only while recording; otherwise reports `NotRecording` and
    /// the caller drops the sample (non-fatal).
    pub fn append(&mut self, sample: ImuSample) -> Result<()> {
        match self.active.as_mut() {
            Some(session) => {
                session.samples.push(sample);
                Ok(())
            }
            None => Err(TrackerError::NotRecording),
        }
    }

    /// Stop recording, persist the raw artifact, and clear the buffer.
    ///
    /// A session with zero samples still produces a zero-row raw
    /// artifact; downstream treats zero rows as "no data", not an error.
    pub fn end(&mut self, store: &ArtifactStore) -> Result<Session> {
        let session = self.active.take().ok_or(TrackerError::NotRecording)?;
        let sample_count = session.samples.len();

        store.write_raw(&session.name, &session.samples)?;
        info!(
            "recording session {} stopped with {} samples",
            session.name, sample_count
        );

        Ok(Session {
            name: session.name,
            state: SessionState::Stopped,
            sample_count,
        })
    }
}

impl Default for SessionRecorder {
    fn default() -> Self {
        Self::new()
    }
}
