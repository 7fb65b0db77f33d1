use crate::decoder::parse_record;
use crate::error::{Result, TrackerError};
use crate::types::{CalculatedSample, ImuSample, SessionSummary, SpinDirection};
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};

const RAW_PREFIX: &str = "imu_data_";
const CONDITIONED_PREFIX: &str = "processed_";
const CALCULATED_PREFIX: &str = "calculated_";
const SUMMARY_PREFIX: &str = "summary_";
const CSV_EXT: &str = ".csv";

const RAW_HEADER: &str = "timestamp,yaw,pitch,roll,accelX,accelY,accelZ,gyroX,gyroY,gyroZ";
const CALCULATED_HEADER: &str = "timestamp,yaw,pitch,roll,accelX,accelY,accelZ,gyroX,gyroY,gyroZ,\
totalAcceleration,velocityX,velocityY,velocityZ,speed,totalDistance,spinRate,spinDirection";

/// A raw session artifact and whether its calculated counterpart exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub name: String,
    pub has_calculated: bool,
}

/// Directory-backed store for the three per-session artifacts.
///
/// Naming: raw is `imu_data_<session>.csv`, conditioned is
/// `processed_imu_data_<session>.csv`, calculated is
/// `calculated_imu_data_<session>.csv`. Raw artifacts are write-once;
/// conditioned and calculated are whole-file replaced on reprocessing.
/// Every write lands in a `.tmp` sibling first and is renamed into
/// place, so a failed write never leaves a truncated file that reads as
/// valid.
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| TrackerError::WriteFailure {
            name: root.display().to_string(),
            source,
        })?;
        Ok(ArtifactStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn raw_file(&self, session: &str) -> PathBuf {
        self.root.join(format!("{RAW_PREFIX}{session}{CSV_EXT}"))
    }

    fn conditioned_file(&self, session: &str) -> PathBuf {
        self.root
            .join(format!("{CONDITIONED_PREFIX}{RAW_PREFIX}{session}{CSV_EXT}"))
    }

    fn calculated_file(&self, session: &str) -> PathBuf {
        self.root
            .join(format!("{CALCULATED_PREFIX}{RAW_PREFIX}{session}{CSV_EXT}"))
    }

    fn summary_file(&self, session: &str) -> PathBuf {
        self.root
            .join(format!("{SUMMARY_PREFIX}{RAW_PREFIX}{session}.json"))
    }

    /// Persist the raw sample sequence for a session. Raw artifacts are
    /// write-once; a second write for the same session is an error.
    pub fn write_raw(&self, session: &str, samples: &[ImuSample]) -> Result<PathBuf> {
        let path = self.raw_file(session);
        if path.exists() {
            return Err(TrackerError::RawArtifactExists(
                path.display().to_string(),
            ));
        }

        let mut content = String::with_capacity(32 + samples.len() * 96);
        content.push_str(RAW_HEADER);
        content.push('\n');
        for sample in samples {
            content.push_str(&format_sample_row(sample));
            content.push('\n');
        }
        self.publish(&path, &content)?;
        Ok(path)
    }

    /// Read the raw sample sequence back. Malformed rows are dropped
    /// with a warning, matching decode-time semantics; a missing file is
    /// `ArtifactNotFound`.
    pub fn read_raw(&self, session: &str) -> Result<Vec<ImuSample>> {
        let path = self.raw_file(session);
        if !path.exists() {
            return Err(TrackerError::ArtifactNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(&path).map_err(|source| TrackerError::ReadFailure {
            name: path.display().to_string(),
            source,
        })?;

        let mut samples = Vec::new();
        for line in content.lines().skip(1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_record(line) {
                Ok(sample) => samples.push(sample),
                Err(e) => warn!("dropping malformed row in {}: {e}", path.display()),
            }
        }
        Ok(samples)
    }

    /// Replace the conditioned artifact for a session. Same schema as
    /// raw, values are post-calibration and post-filter. Derived
    /// artifacts may only exist alongside their raw artifact.
    pub fn write_conditioned(&self, session: &str, samples: &[ImuSample]) -> Result<PathBuf> {
        self.require_raw(session)?;
        let path = self.conditioned_file(session);
        let mut content = String::with_capacity(32 + samples.len() * 96);
        content.push_str(RAW_HEADER);
        content.push('\n');
        for sample in samples {
            content.push_str(&format_sample_row(sample));
            content.push('\n');
        }
        self.publish(&path, &content)?;
        Ok(path)
    }

    /// Replace the calculated artifact for a session (18-field schema).
    pub fn write_calculated(&self, session: &str, samples: &[CalculatedSample]) -> Result<PathBuf> {
        self.require_raw(session)?;
        let path = self.calculated_file(session);
        let mut content = String::with_capacity(64 + samples.len() * 160);
        content.push_str(CALCULATED_HEADER);
        content.push('\n');
        for row in samples {
            let s = &row.sample;
            content.push_str(&format!(
                "{},{:.2},{:.4},{:.4},{:.4},{:.4},{:.4},{:.2},{}\n",
                format_sample_row(s),
                row.total_acceleration,
                row.velocity_x,
                row.velocity_y,
                row.velocity_z,
                row.speed,
                row.total_distance,
                row.spin_rate,
                row.spin_direction,
            ));
        }
        self.publish(&path, &content)?;
        Ok(path)
    }

    /// Read and re-parse a calculated artifact. Malformed rows are
    /// dropped with a warning.
    pub fn read_calculated(&self, session: &str) -> Result<Vec<CalculatedSample>> {
        let path = self.calculated_file(session);
        if !path.exists() {
            return Err(TrackerError::ArtifactNotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(&path).map_err(|source| TrackerError::ReadFailure {
            name: path.display().to_string(),
            source,
        })?;

        let mut samples = Vec::new();
        for line in content.lines().skip(1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match parse_calculated_row(line) {
                Ok(sample) => samples.push(sample),
                Err(e) => warn!("dropping malformed row in {}: {e}", path.display()),
            }
        }
        Ok(samples)
    }

    /// Persist the aggregated summary as JSON alongside the artifacts.
    pub fn write_summary(&self, session: &str, summary: &SessionSummary) -> Result<PathBuf> {
        let path = self.summary_file(session);
        let json = serde_json::to_string_pretty(summary).map_err(|e| {
            TrackerError::WriteFailure {
                name: path.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            }
        })?;
        self.publish(&path, &json)?;
        Ok(path)
    }

    /// A raw artifact counts as processed iff its calculated counterpart
    /// exists.
    pub fn has_calculated(&self, session: &str) -> bool {
        self.calculated_file(session).exists()
    }

    /// Enumerate recorded sessions and their processed state, sorted by
    /// name (names encode the creation time, so this is chronological).
    pub fn list_sessions(&self) -> Result<Vec<SessionInfo>> {
        let entries = fs::read_dir(&self.root).map_err(|source| TrackerError::ReadFailure {
            name: self.root.display().to_string(),
            source,
        })?;

        let mut sessions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| TrackerError::ReadFailure {
                name: self.root.display().to_string(),
                source,
            })?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if let Some(stem) = file_name
                .strip_prefix(RAW_PREFIX)
                .and_then(|rest| rest.strip_suffix(CSV_EXT))
            {
                sessions.push(SessionInfo {
                    name: stem.to_string(),
                    has_calculated: self.has_calculated(stem),
                });
            }
        }
        sessions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sessions)
    }

    fn require_raw(&self, session: &str) -> Result<()> {
        let raw = self.raw_file(session);
        if raw.exists() {
            Ok(())
        } else {
            Err(TrackerError::ArtifactNotFound(raw.display().to_string()))
        }
    }

    /// Write-to-temp then rename, so readers never observe a partially
    /// written artifact.
    fn publish(&self, path: &Path, content: &str) -> Result<()> {
        let name = path.display().to_string();
        let tmp = path.with_extension("tmp");
        if let Err(source) = fs::write(&tmp, content) {
            let _ = fs::remove_file(&tmp);
            return Err(TrackerError::WriteFailure { name, source });
        }
        if let Err(source) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(TrackerError::WriteFailure { name, source });
        }
        Ok(())
    }
}

/// Fixed-precision row shared by the raw and conditioned artifacts:
/// timestamp 6 decimals, orientation 4, accel/gyro 2.
fn format_sample_row(sample: &ImuSample) -> String {
    format!(
        "{:.6},{:.4},{:.4},{:.4},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
        sample.timestamp,
        sample.yaw,
        sample.pitch,
        sample.roll,
        sample.accel_x,
        sample.accel_y,
        sample.accel_z,
        sample.gyro_x,
        sample.gyro_y,
        sample.gyro_z,
    )
}

fn parse_calculated_row(line: &str) -> Result<CalculatedSample> {
    let tokens: Vec<&str> = line.split(',').collect();
    if tokens.len() != 18 {
        return Err(TrackerError::MalformedSample(format!(
            "expected 18 fields, got {}",
            tokens.len()
        )));
    }

    let sample = parse_record(&tokens[..10].join(","))?;
    let mut numeric = [0.0f64; 7];
    for (slot, token) in numeric.iter_mut().zip(tokens[10..17].iter()) {
        *slot = token.trim().parse().map_err(|_| {
            TrackerError::MalformedSample(format!("non-numeric token: {token:?}"))
        })?;
    }
    let spin_direction = SpinDirection::parse(tokens[17].trim()).ok_or_else(|| {
        TrackerError::MalformedSample(format!("unknown spin direction: {:?}", tokens[17]))
    })?;

    Ok(CalculatedSample {
        sample,
        total_acceleration: numeric[0],
        velocity_x: numeric[1],
        velocity_y: numeric[2],
        velocity_z: numeric[3],
        speed: numeric[4],
        total_distance: numeric[5],
        spin_rate: numeric[6],
        spin_direction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn test_store(tag: &str) -> (ArtifactStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!(
            "spin_tracker_storage_test_{tag}_{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        (ArtifactStore::new(&dir).unwrap(), dir)
    }

    fn sample(t: f64) -> ImuSample {
        ImuSample {
            timestamp: t,
            yaw: 12.3456,
            pitch: -0.5,
            roll: 1.25,
            accel_x: 0.11,
            accel_y: -9.81,
            accel_z: 0.5,
            gyro_x: 1.5,
            gyro_y: -2.25,
            gyro_z: 0.75,
        }
    }

    #[test]
    fn test_raw_round_trip_within_precision() {
        let (store, dir) = test_store("raw_round_trip");
        let samples = vec![sample(0.123456), sample(0.223456)];
        store.write_raw("s1", &samples).unwrap();

        let read = store.read_raw("s1").unwrap();
        assert_eq!(read.len(), 2);
        assert_relative_eq!(read[0].timestamp, 0.123456, epsilon = 1e-6);
        assert_relative_eq!(read[0].yaw, 12.3456, epsilon = 1e-4);
        assert_relative_eq!(read[0].accel_y, -9.81, epsilon = 1e-2);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_raw_is_write_once() {
        let (store, dir) = test_store("raw_write_once");
        store.write_raw("s1", &[sample(0.0)]).unwrap();
        assert!(matches!(
            store.write_raw("s1", &[sample(1.0)]),
            Err(TrackerError::RawArtifactExists(_))
        ));
        // Conditioned and calculated may be replaced.
        store.write_conditioned("s1", &[sample(0.0)]).unwrap();
        store.write_conditioned("s1", &[sample(1.0)]).unwrap();

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_read_missing_raw_is_not_found() {
        let (store, dir) = test_store("missing_raw");
        assert!(matches!(
            store.read_raw("nope"),
            Err(TrackerError::ArtifactNotFound(_))
        ));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_malformed_rows_are_dropped_on_read() {
        let (store, dir) = test_store("malformed_rows");
        store.write_raw("s1", &[sample(0.0), sample(1.0)]).unwrap();

        // Corrupt the file: inject a short row and a non-numeric row.
        let path = dir.join("imu_data_s1.csv");
        let mut content = fs::read_to_string(&path).unwrap();
        content.push_str("1.0,2.0,3.0\n");
        content.push_str("x,1,2,3,4,5,6,7,8,9\n");
        fs::write(&path, content).unwrap();

        let read = store.read_raw("s1").unwrap();
        assert_eq!(read.len(), 2);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_calculated_round_trip_within_precision() {
        let (store, dir) = test_store("calc_round_trip");
        store.write_raw("s1", &[sample(1.234567)]).unwrap();
        let rows = vec![CalculatedSample {
            sample: sample(1.234567),
            total_acceleration: 9.8167,
            velocity_x: 0.91234,
            velocity_y: -0.25,
            velocity_z: 0.0,
            speed: 0.94601,
            total_distance: 1.75501,
            spin_rate: 57.29,
            spin_direction: SpinDirection::LegSpin,
        }];
        store.write_calculated("s1", &rows).unwrap();

        let read = store.read_calculated("s1").unwrap();
        assert_eq!(read.len(), 1);
        assert_relative_eq!(read[0].total_acceleration, 9.8167, epsilon = 1e-2);
        assert_relative_eq!(read[0].velocity_x, 0.91234, epsilon = 1e-4);
        assert_relative_eq!(read[0].speed, 0.94601, epsilon = 1e-4);
        assert_relative_eq!(read[0].total_distance, 1.75501, epsilon = 1e-4);
        assert_eq!(read[0].spin_rate, 57.29);
        assert_eq!(read[0].spin_direction, SpinDirection::LegSpin);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_calculated_header_and_bare_direction_token() {
        let (store, dir) = test_store("calc_format");
        store.write_raw("s1", &[sample(0.0)]).unwrap();
        let rows = vec![CalculatedSample {
            sample: sample(0.0),
            total_acceleration: 1.0,
            velocity_x: 0.0,
            velocity_y: 0.0,
            velocity_z: 0.0,
            speed: 0.0,
            total_distance: 0.0,
            spin_rate: 0.0,
            spin_direction: SpinDirection::NoSpin,
        }];
        let path = store.write_calculated("s1", &rows).unwrap();
        let content = fs::read_to_string(path).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next().unwrap(), CALCULATED_HEADER);
        let row = lines.next().unwrap();
        assert!(row.ends_with(",no-spin"));
        assert!(!row.contains('"'));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_list_sessions_and_processed_flag() {
        let (store, dir) = test_store("list_sessions");
        store.write_raw("a", &[sample(0.0)]).unwrap();
        store.write_raw("b", &[sample(0.0)]).unwrap();
        store.write_calculated("b", &[]).unwrap();
        // Conditioned-only must not mark a session processed.
        store.write_conditioned("a", &[]).unwrap();

        let sessions = store.list_sessions().unwrap();
        assert_eq!(
            sessions,
            vec![
                SessionInfo {
                    name: "a".to_string(),
                    has_calculated: false
                },
                SessionInfo {
                    name: "b".to_string(),
                    has_calculated: true
                },
            ]
        );

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_zero_row_artifacts() {
        let (store, dir) = test_store("zero_rows");
        store.write_raw("empty", &[]).unwrap();
        assert!(store.read_raw("empty").unwrap().is_empty());
        store.write_calculated("empty", &[]).unwrap();
        assert!(store.read_calculated("empty").unwrap().is_empty());
        assert!(store.has_calculated("empty"));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_derived_artifacts_require_raw() {
        let (store, dir) = test_store("derived_require_raw");
        assert!(matches!(
            store.write_conditioned("ghost", &[]),
            Err(TrackerError::ArtifactNotFound(_))
        ));
        assert!(matches!(
            store.write_calculated("ghost", &[]),
            Err(TrackerError::ArtifactNotFound(_))
        ));
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_no_tmp_files_left_behind() {
        let (store, dir) = test_store("tmp_cleanup");
        store.write_raw("s1", &[sample(0.0)]).unwrap();
        store.write_summary("s1", &SessionSummary::empty()).unwrap();
        let leftovers: Vec<_> = fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmp"))
            .collect();
        assert!(leftovers.is_empty());

        let _ = fs::remove_dir_all(dir);
    }
}
