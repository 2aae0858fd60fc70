//! Background generation jobs and their status records.

pub mod generator;
pub mod store;
