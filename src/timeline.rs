//! Timeline assembly: per-item media adapters and the ordered intro/items/outro sequence.

pub mod adapters;
pub mod assembler;
