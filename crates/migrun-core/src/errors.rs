use thiserror::Error;

/// Result type alias using MigrunError
pub type Result<T> = std::result::Result<T, MigrunError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure of a run maps to exactly one kind. Each kind has a stable
/// error code for log assertions and a process exit code for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Configuration
    InvalidConfig,

    // Discovery
    InvalidFileName,
    SnapshotOutOfPlace,
    Io,

    // Drift between disk and ledger
    MigrationMoved,
    MigrationMissing,
    MigrationChanged,

    // Execution
    MigrationFailed,
    /// SQL ran but its ledger row could not be written
    LedgerDesync,

    // Database plumbing
    Persistence,
    Timeout,

    // Process
    Cancelled,
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::InvalidFileName => "ERR_INVALID_FILE_NAME",
            ExErrorKind::SnapshotOutOfPlace => "ERR_SNAPSHOT_OUT_OF_PLACE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::MigrationMoved => "ERR_MIGRATION_MOVED",
            ExErrorKind::MigrationMissing => "ERR_MIGRATION_MISSING",
            ExErrorKind::MigrationChanged => "ERR_MIGRATION_CHANGED",
            ExErrorKind::MigrationFailed => "ERR_MIGRATION_FAILED",
            ExErrorKind::LedgerDesync => "ERR_LEDGER_DESYNC",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Cancelled => "ERR_CANCELLED",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Process exit code reported by the CLI for this kind
    pub fn exit_code(&self) -> i32 {
        match self {
            ExErrorKind::Internal => 1,
            ExErrorKind::InvalidConfig => 2,
            ExErrorKind::InvalidFileName | ExErrorKind::SnapshotOutOfPlace | ExErrorKind::Io => 3,
            ExErrorKind::MigrationMoved
            | ExErrorKind::MigrationMissing
            | ExErrorKind::MigrationChanged => 4,
            ExErrorKind::MigrationFailed => 5,
            ExErrorKind::LedgerDesync => 6,
            ExErrorKind::Persistence => 7,
            ExErrorKind::Timeout => 8,
            ExErrorKind::Cancelled => 130,
        }
    }
}

/// Canonical structured error type
///
/// Classification fields for programmatic handling plus the context needed
/// to diagnose a failed run without re-running it.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add migration file path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the process exit code
    pub fn exit_code(&self) -> i32 {
        self.kind.exit_code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the migration file path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (file: {})", path)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|s| s as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for migration runs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MigrunError {
    // ===== Configuration =====
    /// Run configuration rejected before any work started
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // ===== Discovery =====
    /// File ends in `.sql` but does not follow the naming rule
    #[error("The file name '{path}' which has .sql extension contains invalid characters")]
    InvalidFileName { path: String },

    /// `.snapshot` marker deeper than the first directory level
    #[error(".snapshot file can only be placed in a first level directory, invalid location: {path}")]
    SnapshotOutOfPlace { path: String },

    /// Unreadable directory or file
    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    // ===== Drift =====
    /// Ledger and file list disagree on the file at this position
    #[error("File {path} does not match applied migration {applied_path}; files were moved, renamed or removed since they were applied")]
    MigrationMoved { path: String, applied_path: String },

    /// Ledger has entries past the end of the file list
    #[error("Applied migration {applied_path} is no longer present on disk")]
    MigrationMissing { applied_path: String },

    /// Content hash differs from the one recorded at apply time
    #[error("File {path} has changed since it was applied (applied hash {applied_hash}, current hash {current_hash})")]
    MigrationChanged {
        path: String,
        applied_hash: String,
        current_hash: String,
    },

    // ===== Database =====
    /// Database call failed outside of migration execution
    #[error("Database error during {op}: {message}")]
    Database { op: String, message: String },

    /// Migration SQL failed; nothing was recorded for this file
    #[error("Error while executing migration {path}: {source}")]
    MigrationFailed {
        path: String,
        #[source]
        source: Box<MigrunError>,
    },

    /// Migration SQL succeeded but the ledger row was not written
    #[error("Migration {path} was executed but could not be recorded in the ledger, the database may be in an inconsistent state: {source}")]
    LedgerDesync {
        path: String,
        #[source]
        source: Box<MigrunError>,
    },

    /// Connect phase exceeded its deadline
    #[error("Timed out connecting to the database after {seconds}s")]
    ConnectionTimeout { seconds: u64 },

    // ===== Process =====
    /// Interrupt or terminate signal observed at a checkpoint
    #[error("Run cancelled before completion")]
    Cancelled,

    /// Unexpected failure in the tool itself
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl MigrunError {
    /// Build an I/O error for the given path
    pub fn io(path: impl AsRef<std::path::Path>, err: std::io::Error) -> Self {
        MigrunError::Io {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }

    /// Build a database error for the given operation
    pub fn database(op: impl Into<String>, message: impl ToString) -> Self {
        MigrunError::Database {
            op: op.into(),
            message: message.to_string(),
        }
    }

    /// Get the canonical kind of this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            MigrunError::InvalidConfig { .. } => ExErrorKind::InvalidConfig,
            MigrunError::InvalidFileName { .. } => ExErrorKind::InvalidFileName,
            MigrunError::SnapshotOutOfPlace { .. } => ExErrorKind::SnapshotOutOfPlace,
            MigrunError::Io { .. } => ExErrorKind::Io,
            MigrunError::MigrationMoved { .. } => ExErrorKind::MigrationMoved,
            MigrunError::MigrationMissing { .. } => ExErrorKind::MigrationMissing,
            MigrunError::MigrationChanged { .. } => ExErrorKind::MigrationChanged,
            MigrunError::Database { .. } => ExErrorKind::Persistence,
            MigrunError::MigrationFailed { .. } => ExErrorKind::MigrationFailed,
            MigrunError::LedgerDesync { .. } => ExErrorKind::LedgerDesync,
            MigrunError::ConnectionTimeout { .. } => ExErrorKind::Timeout,
            MigrunError::Cancelled => ExErrorKind::Cancelled,
            MigrunError::Internal { .. } => ExErrorKind::Internal,
        }
    }
}

/// Conversion from MigrunError to ExError
impl From<MigrunError> for ExError {
    fn from(err: MigrunError) -> Self {
        let kind = err.kind();
        match err {
            MigrunError::InvalidConfig { reason } => ExError::new(kind)
                .with_op("load_config")
                .with_message(reason),

            MigrunError::InvalidFileName { path } => ExError::new(kind)
                .with_op("walk")
                .with_path(path)
                .with_message("File name with .sql extension contains invalid characters"),

            MigrunError::SnapshotOutOfPlace { path } => ExError::new(kind)
                .with_op("walk")
                .with_path(path)
                .with_message(".snapshot marker below the first directory level"),

            MigrunError::Io { path, message } => ExError::new(kind)
                .with_path(path)
                .with_message(message),

            MigrunError::MigrationMoved { path, applied_path } => ExError::new(kind)
                .with_op("reconcile")
                .with_path(path)
                .with_message(format!("Applied migration at this position is {}", applied_path)),

            MigrunError::MigrationMissing { applied_path } => ExError::new(kind)
                .with_op("reconcile")
                .with_path(applied_path)
                .with_message("Applied migration is no longer present on disk"),

            MigrunError::MigrationChanged {
                path,
                applied_hash,
                current_hash,
            } => ExError::new(kind)
                .with_op("reconcile")
                .with_path(path)
                .with_message(format!(
                    "Hash changed from {} to {}",
                    applied_hash, current_hash
                )),

            MigrunError::Database { op, message } => {
                ExError::new(kind).with_op(op).with_message(message)
            }

            MigrunError::MigrationFailed { path, source } => ExError::new(kind)
                .with_op("apply")
                .with_path(path)
                .with_message("Error while executing migration")
                .with_source((*source).into()),

            MigrunError::LedgerDesync { path, source } => ExError::new(kind)
                .with_op("apply")
                .with_path(path)
                .with_message("Migration executed but not recorded, database may be inconsistent")
                .with_source((*source).into()),

            MigrunError::ConnectionTimeout { seconds } => ExError::new(kind)
                .with_op("connect")
                .with_message(format!("No connection after {}s", seconds)),

            MigrunError::Cancelled => ExError::new(kind).with_message("Run cancelled by signal"),

            MigrunError::Internal { message } => ExError::new(kind).with_message(message),
        }
    }
}
