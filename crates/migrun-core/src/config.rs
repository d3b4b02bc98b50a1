//! Run configuration
//!
//! The CLI builds one `RunConfig` and hands it to every entry point. Nothing
//! here reads the process environment.

use crate::errors::{MigrunError, Result};
use std::path::PathBuf;

/// Sentinel accepted from the outside world meaning "no step limit"
pub const UNLIMITED_STEPS: i64 = -1;

/// Longest application identity the ledger column accepts
pub const MAX_APP_ID_LEN: usize = 64;

/// Cap on how many pending files one run marks for application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepLimit {
    #[default]
    Unlimited,
    Max(usize),
}

impl StepLimit {
    /// Convert the external integer form, where `-1` means unlimited
    pub fn from_steps(steps: i64) -> Result<Self> {
        match steps {
            UNLIMITED_STEPS => Ok(StepLimit::Unlimited),
            n if n < 0 => Err(MigrunError::InvalidConfig {
                reason: format!(
                    "steps must be {} (unlimited) or a non-negative number, got {}",
                    UNLIMITED_STEPS, n
                ),
            }),
            n => usize::try_from(n)
                .map(StepLimit::Max)
                .map_err(|_| MigrunError::InvalidConfig {
                    reason: format!("steps value {} is too large", n),
                }),
        }
    }

    /// True once `marked` files have used up the limit
    pub fn is_reached(&self, marked: usize) -> bool {
        match self {
            StepLimit::Unlimited => false,
            StepLimit::Max(max) => marked >= *max,
        }
    }
}

/// Everything a migration run needs besides the database connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Scopes ledger rows to one logical application
    pub app_id: String,

    /// Root directory searched for `.sql` files
    pub migrations_dir: PathBuf,

    /// How many pending files to apply in this run
    pub steps: StepLimit,

    /// Trust the ledger when an applied file's hash changed
    pub skip_file_validation: bool,

    /// Recorded in every ledger row written by this run
    pub tool_version: String,
}

impl RunConfig {
    pub fn new(app_id: impl Into<String>, migrations_dir: impl Into<PathBuf>) -> Self {
        Self {
            app_id: app_id.into(),
            migrations_dir: migrations_dir.into(),
            steps: StepLimit::Unlimited,
            skip_file_validation: false,
            tool_version: String::from("dev"),
        }
    }

    pub fn with_steps(mut self, steps: StepLimit) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_skip_file_validation(mut self, skip: bool) -> Self {
        self.skip_file_validation = skip;
        self
    }

    pub fn with_tool_version(mut self, version: impl Into<String>) -> Self {
        self.tool_version = version.into();
        self
    }

    /// Reject configurations the run cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.app_id.trim().is_empty() {
            return Err(MigrunError::InvalidConfig {
                reason: "app-id is required".to_string(),
            });
        }
        if self.app_id.chars().count() > MAX_APP_ID_LEN {
            return Err(MigrunError::InvalidConfig {
                reason: format!("app-id must be at most {} characters", MAX_APP_ID_LEN),
            });
        }

        let dir = &self.migrations_dir;
        if dir.as_os_str().is_empty() {
            return Err(MigrunError::InvalidConfig {
                reason: "migrations-dir is required".to_string(),
            });
        }
        let metadata = std::fs::metadata(dir).map_err(|_| MigrunError::InvalidConfig {
            reason: format!("dir {} does not exist", dir.display()),
        })?;
        if !metadata.is_dir() {
            return Err(MigrunError::InvalidConfig {
                reason: format!("dir {} is not a directory", dir.display()),
            });
        }

        Ok(())
    }
}
