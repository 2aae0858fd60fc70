use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::thread::JoinHandle;

use crate::foundation::core::Fps;
use crate::foundation::error::{TripError, TripResult};

#[derive(Clone, Debug)]
pub struct VideoSourceInfo {
    pub source_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps_num: u32,
    pub fps_den: u32,
    pub duration_sec: f64,
}

impl VideoSourceInfo {
    pub fn source_fps(&self) -> f64 {
        if self.fps_den == 0 {
            0.0
        } else {
            f64::from(self.fps_num) / f64::from(self.fps_den)
        }
    }

    /// Bytes in one decoded RGB24 frame.
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 3
    }
}

#[cfg(feature = "media-ffmpeg")]
pub fn probe_video(source_path: &Path) -> TripResult<VideoSourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| TripError::media(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(TripError::media(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| TripError::media(format!("ffprobe json parse failed: {e}")))?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| TripError::media("no video stream found"))?;
    let width = video_stream
        .width
        .filter(|w| *w > 0)
        .ok_or_else(|| TripError::media("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .filter(|h| *h > 0)
        .ok_or_else(|| TripError::media("missing video height from ffprobe"))?;

    let (fps_num, fps_den) = parse_ff_ratio(video_stream.r_frame_rate.as_deref().unwrap_or("0/1"))
        .ok_or_else(|| TripError::media("invalid video r_frame_rate"))?;
    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        fps_num,
        fps_den,
        duration_sec,
    })
}

#[cfg(not(feature = "media-ffmpeg"))]
pub fn probe_video(_source_path: &Path) -> TripResult<VideoSourceInfo> {
    Err(TripError::media(
        "video clips require the 'media-ffmpeg' feature",
    ))
}

/// Sequential RGB24 frame reader over an `ffmpeg` decode process.
///
/// Frames are resampled to the run's frame rate and the stream stops after `max_frames`.
/// At end of stream the process exit status is checked, so a decoder that dies is reported
/// as a media error carrying the tail of its stderr rather than as a short clip.
pub struct ClipDecoder {
    child: Child,
    stdout: BufReader<ChildStdout>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
    source: PathBuf,
    width: u32,
    height: u32,
    remaining: u64,
    deferred: Option<TripError>,
}

impl ClipDecoder {
    #[cfg(feature = "media-ffmpeg")]
    pub fn open(info: &VideoSourceInfo, fps: Fps, max_frames: u64) -> TripResult<Self> {
        let mut cmd = Command::new("ffmpeg");
        cmd.args(["-v", "error", "-noautorotate", "-i"])
            .arg(&info.source_path)
            .args([
                "-an",
                "-vf",
                &format!("fps={}", fps.get()),
                "-frames:v",
                &max_frames.to_string(),
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgb24",
                "pipe:1",
            ]);
        Self::spawn(cmd, &info.source_path, info.width, info.height, max_frames)
    }

    #[cfg(not(feature = "media-ffmpeg"))]
    pub fn open(_info: &VideoSourceInfo, _fps: Fps, _max_frames: u64) -> TripResult<Self> {
        Err(TripError::media(
            "video clips require the 'media-ffmpeg' feature",
        ))
    }

    /// Read `width x height` rgb24 frames from the stdout of `cmd`.
    #[cfg_attr(not(feature = "media-ffmpeg"), allow(dead_code))]
    pub(crate) fn spawn(
        mut cmd: Command,
        source: &Path,
        width: u32,
        height: u32,
        max_frames: u64,
    ) -> TripResult<Self> {
        let mut child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| TripError::media(format!("failed to spawn ffmpeg for decode: {e}")))?;

        let (Some(stdout), Some(mut stderr)) = (child.stdout.take(), child.stderr.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(TripError::media("failed to open ffmpeg decode pipes"));
        };
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        let frame_len = width as usize * height as usize * 3;
        Ok(Self {
            child,
            stdout: BufReader::with_capacity(frame_len.max(8192), stdout),
            stderr_drain: Some(stderr_drain),
            source: source.to_path_buf(),
            width,
            height,
            remaining: max_frames,
            deferred: None,
        })
    }

    /// Next frame, or `None` at a clean end of stream.
    pub fn next_frame(&mut self) -> TripResult<Option<image::RgbImage>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        let mut buf = vec![0u8; self.width as usize * self.height as usize * 3];
        match self.stdout.read_exact(&mut buf) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                self.remaining = 0;
                self.finish()?;
                return Ok(None);
            }
            Err(e) => {
                self.remaining = 0;
                return Err(TripError::media(format!("read decoded frame: {e}")));
            }
        }
        self.remaining -= 1;
        image::RgbImage::from_raw(self.width, self.height, buf)
            .map(Some)
            .ok_or_else(|| TripError::media("decoded frame has unexpected size"))
    }

    /// Up to `n` next frames in stream order. An empty batch means end of stream.
    ///
    /// An error hit after some frames of the batch were read is returned by the following call.
    pub fn next_batch(&mut self, n: usize) -> TripResult<Vec<image::RgbImage>> {
        if let Some(e) = self.deferred.take() {
            return Err(e);
        }
        let mut out = Vec::with_capacity(n);
        while out.len() < n {
            match self.next_frame() {
                Ok(Some(f)) => out.push(f),
                Ok(None) => break,
                Err(e) if !out.is_empty() => {
                    self.deferred = Some(e);
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(out)
    }

    fn finish(&mut self) -> TripResult<()> {
        let status = self
            .child
            .wait()
            .map_err(|e| TripError::media(format!("failed to wait for ffmpeg decode: {e}")))?;
        let stderr_bytes = self.join_stderr();
        if status.success() {
            return Ok(());
        }
        Err(TripError::media(format!(
            "ffmpeg decode of '{}' exited with status {}: {}",
            self.source.display(),
            status,
            stderr_tail(&stderr_bytes)
        )))
    }

    fn join_stderr(&mut self) -> Vec<u8> {
        self.stderr_drain
            .take()
            .and_then(|handle| handle.join().ok())
            .and_then(Result::ok)
            .unwrap_or_default()
    }
}

impl Drop for ClipDecoder {
    fn drop(&mut self) {
        // The stream may be abandoned before ffmpeg exits on its own.
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = self.join_stderr();
    }
}

/// Last few non-empty lines of a process's stderr.
fn stderr_tail(bytes: &[u8]) -> String {
    const TAIL_LINES: usize = 4;
    let text = String::from_utf8_lossy(bytes);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return "no diagnostics".to_string();
    }
    lines[lines.len().saturating_sub(TAIL_LINES)..].join(" | ")
}

#[cfg(feature = "media-ffmpeg")]
fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let mut parts = s.split('/');
    let a = parts.next()?.parse::<u32>().ok()?;
    let b = parts.next()?.parse::<u32>().ok()?;
    if b == 0 {
        return None;
    }
    Some((a, b))
}
