use std::fmt::{Debug, Display};

#[derive(Debug, Clone, PartialEq)]
pub enum AppErrorCode {
    Unknown,
    MissingSysBasePath,
    MissingAppBasePath,
    MissingConfigPath,
    InvalidJsonFormat,
    MissingAliasLogHdlerCfg,
    MissingAliasLoggerCfg,
    NoLogHandlerCfg,
    NoLoggerCfg,
    NoHandlerInLoggerCfg,
    InvalidHandlerLoggerCfg,
    NoDatabaseCfg,
    InvalidInput,
    ExceedingMaxLimit,
    AcquireLockFailure,
    DatastoreUnavailable,
    DataTableNotExist,
    DataCorruption,
    RecordNotExist,
    ConstraintViolation,
    IOerror(std::io::ErrorKind),
} // end of AppErrorCode

#[derive(Debug, Clone)]
pub struct AppError {
    pub code: AppErrorCode,
    pub detail: Option<String>,
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let default_detail = "none";
        let dp = if let Some(s) = &self.detail {
            s.as_str()
        } else {
            default_detail
        };
        write!(f, "code:{:?}, detail:{}", self.code, dp)
    }
}

impl std::error::Error for AppError {}

impl From<(AppErrorCode, String)> for AppError {
    fn from(value: (AppErrorCode, String)) -> Self {
        AppError {
            code: value.0,
            detail: Some(value.1),
        }
    }
}

impl AppError {
    /// errors which indicate the underlying datastore cannot serve the
    /// request at all, callers are not expected to recover locally.
    pub fn is_datastore_unavailable(&self) -> bool {
        matches!(
            self.code,
            AppErrorCode::DatastoreUnavailable
                | AppErrorCode::AcquireLockFailure
                | AppErrorCode::DataTableNotExist
        )
    }
}
