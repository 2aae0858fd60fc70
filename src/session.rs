//! Run orchestration: one media list in, one container file out.

pub mod run;
