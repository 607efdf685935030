use thiserror::Error;

pub type IsbeResult<T> = Result<T, IsbeError>;

#[derive(Error, Debug)]
pub enum IsbeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid grade range '{0}': expected 'grade' or 'first-last'")]
    GradeRange(String),

    #[error("Record {rcd:?} has no '{field}' field")]
    MissingField { field: String, rcd: String },

    #[error("Record {rcd:?} has no address, delivery_address or mailing_address")]
    MissingAddress { rcd: String },

    #[error("Record {rcd:?} has no value for column '{column}'")]
    MissingColumn { column: String, rcd: String },

    #[error("Fetch error: {0}")]
    Fetch(String),
}

impl From<calamine::Error> for IsbeError {
    fn from(e: calamine::Error) -> Self {
        IsbeError::Workbook(e.to_string())
    }
}
