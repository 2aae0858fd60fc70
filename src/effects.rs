//! Pixel effects: color grading styles, fades and alpha compositing.

pub(crate) mod clahe;
pub(crate) mod color;
pub mod composite;
pub mod styles;
pub mod transitions;
