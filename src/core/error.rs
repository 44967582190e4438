use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Unit '{0}' is not known")]
    UnknownUnit(String),

    #[error("Unit {unit} is listed twice ('{first}' and '{second}')")]
    DuplicateUnit {
        unit: String,
        first: String,
        second: String,
    },

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Invalid time window: 'to' ({to}) is before 'from' ({from})")]
    InvalidTimeWindow { from: String, to: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("None of the {0} tab templates is usable")]
    NoValidTemplates(usize),

    #[error("None of the {0} time windows is valid")]
    NoValidTimeWindows(usize),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PlannerError>;
