use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Unknown jurisdiction: {code}")]
    UnknownJurisdiction { code: String },

    #[error("No rate for material '{material_type}' effective {on_date} in {jurisdiction}")]
    RateNotFound {
        jurisdiction: String,
        material_type: String,
        on_date: NaiveDate,
    },

    #[error("Material type '{material_type}' is not in the {jurisdiction} rate catalog")]
    UnknownMaterialType {
        jurisdiction: String,
        material_type: String,
    },

    #[error("Invalid weight for component '{component_name}': {reason}")]
    InvalidWeight {
        component_name: String,
        reason: String,
    },

    #[error("Calculation request contains no packaging components")]
    EmptyCalculation,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Snapshot parse error: {0}")]
    SnapshotParseError(#[from] toml::de::Error),

    #[error("Invalid snapshot: {message}")]
    InvalidSnapshot { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
