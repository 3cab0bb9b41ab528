//! Role-classification seam.
//!
//! Keyword heuristics live outside this crate; transformers consume the
//! classifier as a black box while building canonical jobs.

use crate::types::Classification;

/// The fields a classifier may read, borrowed from the job under
/// construction.
#[derive(Debug, Clone, Copy)]
pub struct RoleSignals<'a> {
    pub title: &'a str,
    pub department: Option<&'a str>,
    pub team: Option<&'a str>,
    pub tags: &'a [String],
}

pub trait JobClassifier: Send + Sync {
    fn classify(&self, signals: RoleSignals<'_>) -> Classification;
}
