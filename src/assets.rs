//! Source media access: still-image decoding and ffmpeg-backed clip decoding.

pub mod decode;
pub mod media;
