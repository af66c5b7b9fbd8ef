//! Single-file rotation via ffmpeg
//!
//! Spawns one ffmpeg process per input and follows its machine-readable
//! progress stream on stdout.

use crate::rotation::types::{RotationError, RotationOptions};
use std::ffi::OsString;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};

/// How many trailing stderr lines to keep for error reports
const STDERR_TAIL_LINES: usize = 12;

/// Rotate a single file.
///
/// `duration_ms` drives the progress fraction; pass 0 when unknown and the
/// callback only fires at start and completion. The cancel flag is checked
/// on every progress line; cancelling kills ffmpeg and removes the partial
/// output file.
pub fn rotate_file(
    ffmpeg: &Path,
    input: &Path,
    output: &Path,
    options: &RotationOptions,
    duration_ms: u64,
    cancel: &AtomicBool,
    mut on_progress: impl FnMut(f64),
) -> Result<(), RotationError> {
    tracing::info!(
        "Rotating {:?} -> {:?} with filter {}",
        input,
        output,
        options.angle.filter()
    );

    let mut child = Command::new(ffmpeg)
        .args(build_args(input, output, options))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| RotationError::Ffmpeg(format!("failed to start ffmpeg: {}", e)))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| RotationError::Ffmpeg("failed to capture ffmpeg stdout".to_string()))?;

    on_progress(0.0);

    let reader = BufReader::new(stdout);
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };

        if cancel.load(Ordering::Relaxed) {
            let _ = child.kill();
            let _ = child.wait();
            remove_partial_output(output);
            return Err(RotationError::Cancelled);
        }

        if let Some(fraction) = progress_fraction(&line, duration_ms) {
            on_progress(fraction);
        }
    }

    let mut stderr_text = String::new();
    if let Some(mut stderr) = child.stderr.take() {
        let _ = stderr.read_to_string(&mut stderr_text);
    }

    let status = child
        .wait()
        .map_err(|e| RotationError::Ffmpeg(format!("failed to wait for ffmpeg: {}", e)))?;

    if !status.success() {
        remove_partial_output(output);
        return Err(RotationError::Ffmpeg(format!(
            "ffmpeg exited with {}: {}",
            status,
            stderr_tail(&stderr_text, STDERR_TAIL_LINES)
        )));
    }

    on_progress(1.0);
    Ok(())
}

/// Assemble the full argument list for one rotation run
fn build_args(input: &Path, output: &Path, options: &RotationOptions) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        // Global flags: overwrite, keep stderr down to real errors
        "-y".into(),
        "-v".into(),
        "error".into(),
        "-hide_banner".into(),
        "-nostats".into(),
        "-nostdin".into(),
        "-i".into(),
        OsString::from(input),
        "-vf".into(),
        options.angle.filter().into(),
        "-c:v".into(),
        "libx264".into(),
        "-crf".into(),
        options.quality.crf().to_string().into(),
        "-preset".into(),
        options.quality.h264_preset().into(),
    ];

    if options.preserve_audio {
        args.push("-c:a".into());
        args.push("copy".into());
    } else {
        args.push("-c:a".into());
        args.push("aac".into());
    }

    // Machine-readable progress on stdout
    args.push("-progress".into());
    args.push("pipe:1".into());

    args.push(OsString::from(output));
    args
}

/// Parse one `-progress` stream line into a 0..1 fraction
fn progress_fraction(line: &str, duration_ms: u64) -> Option<f64> {
    if line.trim() == "progress=end" {
        return Some(1.0);
    }
    if duration_ms == 0 {
        return None;
    }
    let micros: f64 = line.trim().strip_prefix("out_time_us=")?.parse().ok()?;
    Some((micros / 1000.0 / duration_ms as f64).clamp(0.0, 1.0))
}

fn remove_partial_output(output: &Path) {
    if output.exists() {
        if let Err(e) = std::fs::remove_file(output) {
            tracing::warn!("Failed to remove partial output {:?}: {}", output, e);
        }
    }
}

/// Last non-empty stderr lines, for error reports
fn stderr_tail(stderr: &str, lines: usize) -> String {
    let all: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::types::{OverwritePolicy, RotationAngle, RotationQuality};

    fn options(angle: RotationAngle, preserve_audio: bool) -> RotationOptions {
        RotationOptions {
            angle,
            output_dir: None,
            quality: RotationQuality::Lossless,
            overwrite: OverwritePolicy::Rename,
            preserve_audio,
        }
    }

    fn arg_strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().to_string()).collect()
    }

    #[test]
    fn test_build_args_lossless_defaults() {
        let opts = options(RotationAngle::Cw90, true);
        let args = arg_strings(&build_args(
            Path::new("in.mp4"),
            Path::new("out.mp4"),
            &opts,
        ));

        let vf = args.iter().position(|a| a == "-vf").unwrap();
        assert_eq!(args[vf + 1], "transpose=1");

        let crf = args.iter().position(|a| a == "-crf").unwrap();
        assert_eq!(args[crf + 1], "0");

        let preset = args.iter().position(|a| a == "-preset").unwrap();
        assert_eq!(args[preset + 1], "ultrafast");

        let audio = args.iter().position(|a| a == "-c:a").unwrap();
        assert_eq!(args[audio + 1], "copy");

        assert_eq!(args.last().unwrap(), "out.mp4");
    }

    #[test]
    fn test_build_args_reencodes_audio_on_request() {
        let opts = options(RotationAngle::Cw180, false);
        let args = arg_strings(&build_args(
            Path::new("in.mov"),
            Path::new("out.mov"),
            &opts,
        ));

        let audio = args.iter().position(|a| a == "-c:a").unwrap();
        assert_eq!(args[audio + 1], "aac");
    }

    #[test]
    fn test_progress_fraction_out_time() {
        // 5 of 10 seconds
        assert_eq!(progress_fraction("out_time_us=5000000", 10_000), Some(0.5));
        // Values past the probed duration clamp to 1.0
        assert_eq!(progress_fraction("out_time_us=20000000", 10_000), Some(1.0));
    }

    #[test]
    fn test_progress_fraction_end_marker() {
        assert_eq!(progress_fraction("progress=end", 10_000), Some(1.0));
        assert_eq!(progress_fraction("progress=end", 0), Some(1.0));
    }

    #[test]
    fn test_progress_fraction_ignores_noise() {
        assert_eq!(progress_fraction("frame=42", 10_000), None);
        assert_eq!(progress_fraction("out_time_us=N/A", 10_000), None);
        // Unknown duration disables intra-file fractions
        assert_eq!(progress_fraction("out_time_us=5000000", 0), None);
    }

    #[test]
    fn test_stderr_tail() {
        let text = "one\n\ntwo\nthree\n";
        assert_eq!(stderr_tail(text, 2), "two\nthree");
        assert_eq!(stderr_tail(text, 10), "one\ntwo\nthree");
        assert_eq!(stderr_tail("", 3), "");
    }
}
