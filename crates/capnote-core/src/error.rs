use thiserror::Error;

#[derive(Debug, Error)]
pub enum CapnoteError {
    #[error("lineage cycle on issue {issue_id}: {repeated} appears more than once")]
    LineageCycle { issue_id: String, repeated: String },

    #[error("issue {0} is marked as merged but has no merge target")]
    MergeWithoutTarget(String),

    #[error("issue {0} cannot be merged into itself")]
    SelfMerge(String),

    #[error("weekly note for {project} on {date} does not follow the previous note ({previous})")]
    NoteOutOfOrder {
        project: String,
        date: chrono::NaiveDate,
        previous: chrono::NaiveDate,
    },

    #[error("reflection index {index} out of range ({len} prompts)")]
    InvalidReflectionIndex { index: usize, len: usize },

    #[error("outcome has not been resolved yet")]
    OutcomePending,

    #[error("outcome was already resolved as did_happen={0}")]
    OutcomeAlreadyResolved(bool),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, CapnoteError>;
