use serde::Serialize;

/// All application errors, categorized by domain.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ── Data / Providers ──
    #[error("Insufficient data: need {needed} bars, got {available}")]
    InsufficientData { needed: usize, available: usize },

    #[error("Market data source unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Malformed bar at index {index}: {reason}")]
    MalformedBar { index: usize, reason: String },

    // ── Files ──
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read file: {0}")]
    FileRead(String),

    #[error("Failed to write file: {0}")]
    FileWrite(String),

    #[error("CSV parse error at row {row}: {message}")]
    CsvParseError { row: usize, message: String },

    // ── Configuration ──
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Serialization ──
    #[error("Serialization error: {0}")]
    Serialization(String),

    // ── General ──
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code for the error.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InsufficientData { .. } => "INSUFFICIENT_DATA",
            AppError::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            AppError::MalformedBar { .. } => "MALFORMED_BAR",
            AppError::FileNotFound(_) => "FILE_NOT_FOUND",
            AppError::FileRead(_) => "FILE_READ",
            AppError::FileWrite(_) => "FILE_WRITE",
            AppError::CsvParseError { .. } => "CSV_PARSE_ERROR",
            AppError::InvalidConfig(_) => "INVALID_CONFIG",
            AppError::Serialization(_) => "SERIALIZATION",
            AppError::Internal(_) => "INTERNAL",
        }
    }

    /// HTTP status an outer web layer should answer with.
    pub fn status(&self) -> u16 {
        match self {
            AppError::UpstreamUnavailable(_) => 502,
            AppError::FileNotFound(_) => 404,
            AppError::InsufficientData { .. }
            | AppError::MalformedBar { .. }
            | AppError::CsvParseError { .. } => 422,
            AppError::InvalidConfig(_) => 400,
            AppError::FileRead(_)
            | AppError::FileWrite(_)
            | AppError::Serialization(_)
            | AppError::Internal(_) => 500,
        }
    }
}

/// Serializable error response for callers.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ErrorResponse {
    pub code: String,
    pub status: u16,
    pub message: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        ErrorResponse {
            code: err.code().to_string(),
            status: err.status(),
            message: err.to_string(),
        }
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let response = ErrorResponse::from(self);
        response.serialize(serializer)
    }
}

// ── Conversions from external errors ──

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileRead(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::UpstreamUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::UpstreamUnavailable("x".into()).status(), 502);
        assert_eq!(AppError::FileNotFound("btc.csv".into()).status(), 404);
        assert_eq!(
            AppError::InsufficientData { needed: 2, available: 1 }.status(),
            422
        );
        assert_eq!(AppError::InvalidConfig("span".into()).status(), 400);
    }

    #[test]
    fn test_serializes_as_error_response() {
        let err = AppError::InsufficientData { needed: 2, available: 1 };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "INSUFFICIENT_DATA");
        assert_eq!(json["status"], 422);
        assert_eq!(json["message"], "Insufficient data: need 2 bars, got 1");
    }
}
