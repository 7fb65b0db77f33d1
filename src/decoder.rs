use crate::error::{Result, TrackerError};
use crate::types::ImuSample;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Number of scalar fields in one wire record.
pub const FIELD_COUNT: usize = 10;

/// Decode one inbound notification payload into a sample.
///
/// The ball sends base64-encoded ASCII: a comma-separated list of exactly
/// ten decimal numbers in the order timestamp, yaw, pitch, roll,
/// accelX/Y/Z, gyroX/Y/Z. Anything else is `MalformedSample` and the
/// caller must drop the record; there is no partial or padded result.
pub fn decode_payload(payload: &[u8]) -> Result<ImuSample> {
    let decoded = STANDARD
        .decode(payload)
        .map_err(|e| TrackerError::MalformedSample(format!("invalid base64: {e}")))?;
    let text = String::from_utf8(decoded)
        .map_err(|_| TrackerError::MalformedSample("payload is not valid UTF-8".to_string()))?;
    parse_record(text.trim())
}

/// Parse a ten-field comma-separated record. Shared between the wire
/// decoder and the raw artifact reader.
pub fn parse_record(line: &str) -> Result<ImuSample> {
    let tokens: Vec<&str> = line.split(',').collect();
    if tokens.len() != FIELD_COUNT {
        return Err(TrackerError::MalformedSample(format!(
            "expected {} fields, got {}",
            FIELD_COUNT,
            tokens.len()
        )));
    }

    let mut values = [0.0f64; FIELD_COUNT];
    for (slot, token) in values.iter_mut().zip(tokens.iter()) {
        let parsed: f64 = token.trim().parse().map_err(|_| {
            TrackerError::MalformedSample(format!("non-numeric token: {token:?}"))
        })?;
        if !parsed.is_finite() {
            return Err(TrackerError::MalformedSample(format!(
                "non-finite value: {token:?}"
            )));
        }
        *slot = parsed;
    }

    Ok(ImuSample {
        timestamp: values[0],
        yaw: values[1],
        pitch: values[2],
        roll: values[3],
        accel_x: values[4],
        accel_y: values[5],
        accel_z: values[6],
        gyro_x: values[7],
        gyro_y: values[8],
        gyro_z: values[9],
    })
}
