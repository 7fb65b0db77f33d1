use crate::decoder::decode_payload;
use crate::error::TrackerError;
use crate::session::SessionRecorder;
use log::warn;
use tokio::sync::mpsc::Receiver;

/// Counters for one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub decoded: u64,
    pub dropped: u64,
}

/// Consume encoded notification payloads from the link until the sender
/// side closes.
///
/// The wireless link pushes payloads into the channel from its own
/// callback context; consuming them here keeps appends on one logical
/// stream in arrival order with no shared-memory races. Malformed
/// payloads are dropped and counted, never fatal. When the link
/// disconnects mid-recording the channel closes, the loop returns, and
/// whatever was buffered stays eligible for `end()`.
pub async fn ingest_loop(
    mut rx: Receiver<Vec<u8>>,
    recorder: &mut SessionRecorder,
) -> IngestStats {
    let mut stats = IngestStats::default();

    while let Some(payload) = rx.recv().await {
        let sample = match decode_payload(&payload) {
            Ok(sample) => sample,
            Err(e) => {
                stats.dropped += 1;
                warn!("dropping record: {e}");
                continue;
            }
        };

        match recorder.append(sample) {
            Ok(()) => stats.decoded += 1,
            Err(TrackerError::NotRecording) => {
                stats.dropped += 1;
                warn!("dropping record: no active recording session");
            }
            Err(e) => {
                stats.dropped += 1;
                warn!("dropping record: {e}");
            }
        }
    }

    stats
}
