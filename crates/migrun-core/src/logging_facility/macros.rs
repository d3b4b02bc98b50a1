//! Operation boundary macros
//!
//! An operation logs one `start` event and then exactly one of `end` or
//! `end_error`. Each event carries `component`, `op` and `event`; extra
//! fields follow in `tracing` syntax. Callers need `tracing` in their own
//! dependency list.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:ident, $op:expr, $event:ident; $($field:tt)*) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::$event,
            $($field)*
        )
    };
}

/// Log the start of an operation
///
/// ```
/// # use migrun_core::log_op_start;
/// log_op_start!("migrate");
/// log_op_start!("migrate", app_id = "billing");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(info, $op, EVENT_START; $($($field)*)?)
    };
}

/// Log the successful end of an operation with its duration
///
/// ```
/// # use migrun_core::log_op_end;
/// log_op_end!("migrate", duration_ms = 42_u64, applied = 3);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info, $op, EVENT_END;
            duration_ms = $duration,
            $($($field)*)?
        )
    };
}

/// Log the failed end of an operation
///
/// The error is converted to `ExError`. Its kind, code and migration file
/// become fields and its display form becomes the message.
///
/// ```
/// # use migrun_core::{log_op_error, errors::MigrunError};
/// log_op_error!("migrate", MigrunError::Cancelled, duration_ms = 10_u64);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__log_op_event!(
            error, $op, EVENT_END_ERROR;
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            file = ex_err.path(),
            $($($field)*,)?
            "{}",
            ex_err
        )
    }};
}
