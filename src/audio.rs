//! Voice message container conversion.
//!
//! Shells out to `ffmpeg`. The conversion result is not used by the
//! translation pipeline yet.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Converts an OGG/Opus voice note into MP3.
///
/// Returns `true` when `ffmpeg` exits successfully and the output file exists.
pub async fn convert_ogg_to_mp3(input_path: &Path, output_path: &Path) -> bool {
    let status = Command::new("ffmpeg")
        .arg("-y")
        .args(["-loglevel", "error"])
        .arg("-i")
        .arg(input_path)
        .args(["-codec:a", "libmp3lame", "-q:a", "4"])
        .arg(output_path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status()
        .await;

    match status {
        Ok(status) if status.success() => {
            let exists = tokio::fs::try_exists(output_path).await.unwrap_or(false);
            debug!(output = %output_path.display(), exists, "ffmpeg conversion finished");
            exists
        }
        Ok(status) => {
            warn!("ffmpeg exited with {status}");
            false
        }
        Err(e) => {
            warn!("Failed to run ffmpeg: {e}");
            false
        }
    }
}
