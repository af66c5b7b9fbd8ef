//! Media probing via ffprobe
//!
//! Extracts stream and container metadata as JSON and handles rotated
//! streams the way players report them.

use crate::media::{locate, MediaError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;

/// Metadata for a single video file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub duration_ms: u64,
    pub fps: f64,
    pub codec: String,
    pub size_bytes: u64,
    /// Rotation metadata in degrees, if the container carries it
    pub rotation: Option<i64>,
}

impl VideoMetadata {
    /// Dimensions as a player displays them: ±90/±270 rotation metadata
    /// swaps the axes
    pub fn displayed_dimensions(&self) -> (u32, u32) {
        match self.rotation.map(|r| r.rem_euclid(360)) {
            Some(90) | Some(270) => (self.height, self.width),
            _ => (self.width, self.height),
        }
    }
}

/// Probe a video file for stream and container metadata
pub fn probe_video(path: &Path) -> Result<VideoMetadata, MediaError> {
    let ffprobe = locate::ffprobe_path()?;

    let output = Command::new(&ffprobe)
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
            "-select_streams",
            "v:0",
        ])
        .arg(path)
        .output()?;

    if !output.status.success() {
        return Err(MediaError::Probe(format!(
            "ffprobe failed for {:?}: {}",
            path,
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)
        .map_err(|e| MediaError::Probe(format!("unparsable ffprobe output: {}", e)))?;

    parse_metadata(&json).map_err(|reason| MediaError::Probe(format!("{} for {:?}", reason, path)))
}

/// Probe only the container duration, in milliseconds
pub fn video_duration_ms(path: &Path) -> Result<u64, MediaError> {
    let ffprobe = locate::ffprobe_path()?;

    let output = Command::new(&ffprobe)
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .output()?;

    if !output.status.success() {
        return Err(MediaError::Probe(format!(
            "ffprobe failed for {:?}: {}",
            path,
            String::from_utf8_lossy(&output.stderr)
        )));
    }

    let text = String::from_utf8_lossy(&output.stdout);
    parse_duration_ms(text.trim()).ok_or_else(|| {
        MediaError::Probe(format!(
            "unparsable duration {:?} for {:?}",
            text.trim(),
            path
        ))
    })
}

fn parse_metadata(json: &serde_json::Value) -> Result<VideoMetadata, String> {
    let streams = json
        .get("streams")
        .and_then(|s| s.as_array())
        .ok_or("no streams in ffprobe output")?;
    let stream = streams.first().ok_or("no video stream")?;

    let width = stream
        .get("width")
        .and_then(|v| v.as_u64())
        .ok_or("missing width")? as u32;
    let height = stream
        .get("height")
        .and_then(|v| v.as_u64())
        .ok_or("missing height")? as u32;

    let codec = stream
        .get("codec_name")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string();

    let fps = stream
        .get("r_frame_rate")
        .and_then(|v| v.as_str())
        .map(parse_frame_rate)
        .unwrap_or(0.0);

    let format = json.get("format");
    let duration_ms = format
        .and_then(|f| f.get("duration"))
        .and_then(|v| v.as_str())
        .and_then(parse_duration_ms)
        .unwrap_or(0);
    let size_bytes = format
        .and_then(|f| f.get("size"))
        .and_then(|v| v.as_str())
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);

    Ok(VideoMetadata {
        width,
        height,
        duration_ms,
        fps,
        codec,
        size_bytes,
        rotation: parse_rotation(stream),
    })
}

/// Parse "12.345" seconds into milliseconds
fn parse_duration_ms(raw: &str) -> Option<u64> {
    raw.parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(|secs| (secs * 1000.0) as u64)
}

/// Parse a frame rate such as "30/1" or "30000/1001"
fn parse_frame_rate(raw: &str) -> f64 {
    if let Some((num, den)) = raw.split_once('/') {
        let num: f64 = num.parse().unwrap_or(0.0);
        let den: f64 = den.parse().unwrap_or(1.0);
        if den > 0.0 {
            num / den
        } else {
            0.0
        }
    } else {
        raw.parse().unwrap_or(0.0)
    }
}

/// Rotation metadata lives either in side data (modern muxers) or in the
/// legacy `rotate` stream tag
fn parse_rotation(stream: &serde_json::Value) -> Option<i64> {
    if let Some(side_data) = stream.get("side_data_list").and_then(|v| v.as_array()) {
        for entry in side_data {
            if let Some(rotation) = entry.get("rotation").and_then(|v| v.as_i64()) {
                return Some(rotation);
            }
        }
    }

    stream
        .get("tags")
        .and_then(|t| t.get("rotate"))
        .and_then(|v| v.as_str())
        .and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_frame_rate_rational() {
        assert!((parse_frame_rate("30000/1001") - 29.97).abs() < 0.01);
        assert_eq!(parse_frame_rate("30/1"), 30.0);
    }

    #[test]
    fn test_parse_frame_rate_plain_and_invalid() {
        assert_eq!(parse_frame_rate("25"), 25.0);
        assert_eq!(parse_frame_rate("0/0"), 0.0);
        assert_eq!(parse_frame_rate("garbage"), 0.0);
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration_ms("12.345"), Some(12345));
        assert_eq!(parse_duration_ms("0"), Some(0));
        assert_eq!(parse_duration_ms("N/A"), None);
        assert_eq!(parse_duration_ms("-3"), None);
    }

    #[test]
    fn test_parse_metadata_full() {
        let json = json!({
            "streams": [{
                "width": 1920,
                "height": 1080,
                "codec_name": "h264",
                "r_frame_rate": "30000/1001",
                "side_data_list": [{"side_data_type": "Display Matrix", "rotation": -90}]
            }],
            "format": {"duration": "5.5", "size": "1048576"}
        });

        let meta = parse_metadata(&json).unwrap();
        assert_eq!(meta.width, 1920);
        assert_eq!(meta.height, 1080);
        assert_eq!(meta.duration_ms, 5500);
        assert_eq!(meta.codec, "h264");
        assert_eq!(meta.size_bytes, 1048576);
        assert_eq!(meta.rotation, Some(-90));
    }

    #[test]
    fn test_parse_metadata_rejects_missing_stream() {
        let json = json!({"streams": [], "format": {}});
        assert!(parse_metadata(&json).is_err());
    }

    #[test]
    fn test_parse_rotation_legacy_tag() {
        let stream = json!({"tags": {"rotate": "90"}});
        assert_eq!(parse_rotation(&stream), Some(90));
    }

    #[test]
    fn test_displayed_dimensions_swap() {
        let mut meta = VideoMetadata {
            width: 1920,
            height: 1080,
            duration_ms: 0,
            fps: 30.0,
            codec: "h264".to_string(),
            size_bytes: 0,
            rotation: Some(-90),
        };
        assert_eq!(meta.displayed_dimensions(), (1080, 1920));

        meta.rotation = Some(180);
        assert_eq!(meta.displayed_dimensions(), (1920, 1080));

        meta.rotation = None;
        assert_eq!(meta.displayed_dimensions(), (1920, 1080));
    }
}
