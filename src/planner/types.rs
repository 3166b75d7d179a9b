use crate::api::ApiError;
use crate::rename::FormatOptions;
use crate::scanner::ScannerError;
use std::path::PathBuf;
use thiserror::Error;

/// One planned rename, kept in directory-listing order
#[derive(Debug, Clone)]
pub struct PlanItem {
    pub from: PathBuf,
    pub to: PathBuf,
    pub reason: &'static str,
    pub season: u32,
    pub episode: u32,
    pub episode2: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub items: Vec<PlanItem>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Plan-time counters reported alongside the preview
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Candidate renames that made it into the plan
    pub total: usize,
    /// Destinations already occupied or claimed twice within the plan
    pub collisions: usize,
    /// Files whose name already matched the computed destination
    pub skipped: usize,
}

/// Inputs that hold for one planning run
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    pub order: String,
    pub lang: String,
    pub format: FormatOptions,
    /// Overrides the season inferred from the directory name
    pub season_override: Option<u32>,
}

/// Outcome of applying a plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyResult {
    pub total: usize,
    /// Items skipped because the destination existed at apply time
    pub skipped: usize,
    pub errors: usize,
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Scanner(#[from] ScannerError),

    #[error("No TVDB results for {query:?}")]
    SeriesNotFound { query: String },
}
