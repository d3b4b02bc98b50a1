use migrun_core::errors::{ExError, ExErrorKind, MigrunError};
use std::error::Error;

#[test]
fn test_drift_errors_share_exit_code() {
    let moved: ExError = MigrunError::MigrationMoved {
        path: "002.sql".to_string(),
        applied_path: "001.sql".to_string(),
    }
    .into();
    let missing: ExError = MigrunError::MigrationMissing {
        applied_path: "003.sql".to_string(),
    }
    .into();
    let changed: ExError = MigrunError::MigrationChanged {
        path: "001.sql".to_string(),
        applied_hash: "a".to_string(),
        current_hash: "b".to_string(),
    }
    .into();

    assert_eq!(moved.exit_code(), 4);
    assert_eq!(missing.exit_code(), 4);
    assert_eq!(changed.exit_code(), 4);
    assert_eq!(moved.path(), Some("002.sql"));
    assert_eq!(missing.path(), Some("003.sql"));
    assert!(moved.message().contains("001.sql"));
}

#[test]
fn test_invalid_file_name_structured_fields() {
    let ex_err: ExError = MigrunError::InvalidFileName {
        path: "core/Init.sql".to_string(),
    }
    .into();

    assert_eq!(ex_err.kind(), ExErrorKind::InvalidFileName);
    assert_eq!(ex_err.code(), "ERR_INVALID_FILE_NAME");
    assert_eq!(ex_err.op(), Some("walk"));
    assert_eq!(ex_err.path(), Some("core/Init.sql"));
}

#[test]
fn test_migration_failure_keeps_driver_message() {
    let err = MigrunError::MigrationFailed {
        path: "001.sql".to_string(),
        source: Box::new(MigrunError::database(
            "execute_script",
            "near \"CREAT\": syntax error",
        )),
    };

    assert!(err.to_string().contains("syntax error"));
    assert!(err.source().is_some());

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.exit_code(), 5);
    assert_eq!(
        ex_err.source_error().map(ExError::kind),
        Some(ExErrorKind::Persistence)
    );
}

#[test]
fn test_error_kind_codes_are_unique() {
    let kinds = [
        ExErrorKind::InvalidConfig,
        ExErrorKind::InvalidFileName,
        ExErrorKind::SnapshotOutOfPlace,
        ExErrorKind::Io,
        ExErrorKind::MigrationMoved,
        ExErrorKind::MigrationMissing,
        ExErrorKind::MigrationChanged,
        ExErrorKind::MigrationFailed,
        ExErrorKind::LedgerDesync,
        ExErrorKind::Persistence,
        ExErrorKind::Timeout,
        ExErrorKind::Cancelled,
        ExErrorKind::Internal,
    ];

    let mut codes: Vec<_> = kinds.iter().map(|k| k.code()).collect();
    codes.sort_unstable();
    codes.dedup();
    assert_eq!(codes.len(), kinds.len());
}

#[test]
fn test_process_level_exit_codes() {
    assert_eq!(MigrunError::Cancelled.kind().exit_code(), 130);
    assert_eq!(
        MigrunError::ConnectionTimeout { seconds: 45 }.kind().exit_code(),
        8
    );
    assert_eq!(
        MigrunError::InvalidConfig {
            reason: "x".to_string()
        }
        .kind()
        .exit_code(),
        2
    );
}
