//! Run inputs: media descriptors, run configuration and JSON manifests.

pub mod config;
pub mod media;
