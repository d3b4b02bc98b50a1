//! Field keys and event names shared by emitters and the test capture

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_MESSAGE: &str = "message";

// Run context
pub const FIELD_APP_ID: &str = "app_id";
pub const FIELD_FILE: &str = "file";
pub const FIELD_SNAPSHOT_DIR: &str = "snapshot_dir";

pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Operation boundaries
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
