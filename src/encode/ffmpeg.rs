use std::io::Read;
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{TripError, TripResult};
use crate::render::frame::FrameRGB;

/// ffmpeg encoder selected for a FourCC-style codec id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncoderChoice {
    pub encoder: &'static str,
    pub pix_fmt: &'static str,
    pub extra_args: &'static [&'static str],
}

/// Resolve a codec id (case-insensitive) to an ffmpeg encoder.
pub fn encoder_for_codec(codec_id: &str) -> Option<EncoderChoice> {
    let choice = match codec_id.trim().to_ascii_lowercase().as_str() {
        "mp4v" | "mpeg4" | "fmp4" | "xvid" | "divx" => EncoderChoice {
            encoder: "mpeg4",
            pix_fmt: "yuv420p",
            extra_args: &["-q:v", "3"],
        },
        "avc1" | "h264" | "x264" => EncoderChoice {
            encoder: "libx264",
            pix_fmt: "yuv420p",
            extra_args: &[],
        },
        "hevc" | "hvc1" | "hev1" | "h265" => EncoderChoice {
            encoder: "libx265",
            pix_fmt: "yuv420p",
            extra_args: &[],
        },
        "mjpg" | "mjpeg" => EncoderChoice {
            encoder: "mjpeg",
            pix_fmt: "yuvj420p",
            extra_args: &["-q:v", "3"],
        },
        "vp09" | "vp9" => EncoderChoice {
            encoder: "libvpx-vp9",
            pix_fmt: "yuv420p",
            extra_args: &["-b:v", "0", "-crf", "32"],
        },
        _ => return None,
    };
    Some(choice)
}

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Overwrite the output file if it already exists.
    pub overwrite: bool,
}

impl Default for FfmpegSinkOpts {
    fn default() -> Self {
        Self { overwrite: true }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw RGB24 frames to its stdin.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            cfg: None,
            last_idx: None,
        }
    }

    fn build_command(cfg: &SinkConfig, enc: EncoderChoice) -> Command {
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        // `begin` has already applied the overwrite policy and created the file.
        cmd.arg("-y");
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "-s",
            &cfg.resolution.to_string(),
            "-r",
            &cfg.fps.get().to_string(),
            "-i",
            "pipe:0",
            "-an",
            // 4:2:0 chroma needs even dimensions.
            "-vf",
            "pad=ceil(iw/2)*2:ceil(ih/2)*2",
            "-c:v",
            enc.encoder,
            "-pix_fmt",
            enc.pix_fmt,
        ]);
        cmd.args(enc.extra_args);
        if wants_faststart(&cfg.path) {
            cmd.args(["-movflags", "+faststart"]);
        }
        cmd.arg(&cfg.path);
        cmd
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> TripResult<()> {
        if cfg.fps.get() == 0 {
            return Err(TripError::writer_open("fps must be non-zero"));
        }
        let enc = encoder_for_codec(&cfg.codec_id).ok_or_else(|| {
            TripError::writer_open(format!("unsupported codec id '{}'", cfg.codec_id))
        })?;

        ensure_parent_dir(&cfg.path).map_err(|e| TripError::writer_open(e.to_string()))?;
        if !self.opts.overwrite && cfg.path.exists() {
            return Err(TripError::writer_open(format!(
                "output file '{}' already exists",
                cfg.path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(TripError::writer_open(
                "ffmpeg is required for encoding, but was not found on PATH",
            ));
        }

        // Surface an unwritable destination now rather than as a broken pipe mid-stream.
        std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&cfg.path)
            .map_err(|e| {
                TripError::writer_open(format!("cannot create '{}': {e}", cfg.path.display()))
            })?;

        let mut child = Self::build_command(&cfg, enc).spawn().map_err(|e| {
            TripError::writer_open(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let Some(stdin) = child.stdin.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(TripError::writer_open("failed to open ffmpeg stdin"));
        };
        let Some(mut stderr) = child.stderr.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(TripError::writer_open("failed to open ffmpeg stderr"));
        };
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(
            path = %cfg.path.display(),
            encoder = enc.encoder,
            resolution = %cfg.resolution,
            fps = cfg.fps.get(),
            "ffmpeg sink opened"
        );
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGB) -> TripResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| TripError::encode("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(TripError::encode(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.resolution() != cfg.resolution {
            return Err(TripError::encode(format!(
                "frame size mismatch: got {}, expected {}",
                frame.resolution(),
                cfg.resolution
            )));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(TripError::encode("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        stdin
            .write_all(&frame.data)
            .map_err(|e| TripError::encode(format!("failed to write frame to ffmpeg stdin: {e}")))
    }

    fn end(&mut self) -> TripResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| TripError::encode("ffmpeg sink not started"))?;

        let status = child
            .wait()
            .map_err(|e| TripError::encode(format!("failed to wait for ffmpeg to finish: {e}")))?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| TripError::encode("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| TripError::encode(format!("ffmpeg stderr read failed: {e}")))?,
            None => Vec::new(),
        };
        self.cfg = None;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(TripError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

fn wants_faststart(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e.to_ascii_lowercase().as_str(), "mp4" | "mov" | "m4v"))
        .unwrap_or(false)
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> TripResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
