//! Placeholder video generation with ffmpeg.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use tracing::info;

use crate::domain::VideoAsset;
use crate::error::{PublishError, Result};

/// Encoding parameters for the generated clip.
///
/// The defaults meet the Reels minimums: vertical 9:16, H.264 + AAC, and an
/// audio track, even if silent.
#[derive(Debug, Clone)]
pub struct VideoSpec {
    pub duration_secs: u32,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub audio_bitrate: &'static str,
    pub sample_rate: u32,
}

impl Default for VideoSpec {
    fn default() -> Self {
        Self {
            duration_secs: 10,
            width: 1080,
            height: 1920,
            fps: 25,
            audio_bitrate: "128k",
            sample_rate: 44100,
        }
    }
}

impl VideoSpec {
    /// ffmpeg arguments that render a black clip with a silent stereo track.
    pub fn ffmpeg_args(&self, out_path: &Path) -> Vec<String> {
        let color = format!(
            "color=c=black:s={}x{}:d={}",
            self.width, self.height, self.duration_secs
        );
        let silence = format!(
            "anullsrc=channel_layout=stereo:sample_rate={}",
            self.sample_rate
        );

        let mut args =
            Vec::from(["-hide_banner", "-loglevel", "error", "-nostdin", "-y"].map(String::from));
        args.extend(["-f", "lavfi", "-i"].map(String::from));
        args.push(color);
        args.extend(["-f", "lavfi", "-i"].map(String::from));
        args.push(silence);
        args.push("-shortest".into());
        args.extend(["-c:v", "libx264", "-pix_fmt", "yuv420p", "-r"].map(String::from));
        args.push(self.fps.to_string());
        args.extend(["-movflags", "+faststart"].map(String::from));
        args.extend(["-c:a", "aac", "-b:a"].map(String::from));
        args.push(self.audio_bitrate.to_string());
        args.push(out_path.to_string_lossy().into_owned());
        args
    }

    /// Render the clip to `out_path`, overwriting any existing file.
    pub async fn synthesize(&self, out_path: &Path) -> Result<VideoAsset> {
        info!(
            path = %out_path.display(),
            duration_secs = self.duration_secs,
            "generating {}x{} MP4",
            self.width,
            self.height
        );

        let output = Command::new("ffmpeg")
            .args(self.ffmpeg_args(out_path))
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(PublishError::Encoder {
                status: output.status.to_string(),
                stderr,
            });
        }

        info!(path = %out_path.display(), "video ready");
        Ok(self.asset(out_path.to_path_buf()))
    }

    /// Describe an existing file as if it had been rendered with these settings.
    pub fn asset(&self, path: PathBuf) -> VideoAsset {
        VideoAsset {
            path,
            duration_secs: self.duration_secs,
            width: self.width,
            height: self.height,
            fps: self.fps,
            video_codec: "h264",
            audio_codec: "aac",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_after<'a>(args: &'a [String], flag: &str) -> Vec<&'a str> {
        args.windows(2)
            .filter(|w| w[0] == flag)
            .map(|w| w[1].as_str())
            .collect()
    }

    #[test]
    fn default_args_match_reels_requirements() {
        let args = VideoSpec::default().ffmpeg_args(Path::new("/tmp/reel.mp4"));

        assert_eq!(
            value_after(&args, "-i"),
            vec![
                "color=c=black:s=1080x1920:d=10",
                "anullsrc=channel_layout=stereo:sample_rate=44100"
            ]
        );
        assert_eq!(value_after(&args, "-c:v"), vec!["libx264"]);
        assert_eq!(value_after(&args, "-pix_fmt"), vec!["yuv420p"]);
        assert_eq!(value_after(&args, "-r"), vec!["25"]);
        assert_eq!(value_after(&args, "-movflags"), vec!["+faststart"]);
        assert_eq!(value_after(&args, "-c:a"), vec!["aac"]);
        assert_eq!(value_after(&args, "-b:a"), vec!["128k"]);
        assert!(args.contains(&"-shortest".to_string()));
        assert!(args.contains(&"-y".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/reel.mp4"));
    }

    #[test]
    fn asset_carries_encoding_parameters() {
        let asset = VideoSpec::default().asset(PathBuf::from("clip.mp4"));
        assert_eq!((asset.width, asset.height, asset.fps), (1080, 1920, 25));
        assert_eq!(asset.duration_secs, 10);
        assert_eq!(asset.video_codec, "h264");
    }
}
