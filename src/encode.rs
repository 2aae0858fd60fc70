//! Container writing: the frame sink contract and its ffmpeg and in-memory implementations.

pub mod ffmpeg;
pub mod sink;
