use thiserror::Error;

/// Generator-side errors. All of these are fatal by design: the whole point
/// of the dataset is trustworthy ground truth, so a builder that would emit
/// a degenerate pattern aborts instead of emitting.
#[derive(Error, Debug)]
pub enum GenError {
    #[error("Scenario '{scenario}' has invalid parameters: {reason}")]
    InvalidScenario { scenario: String, reason: String },

    #[error("Scenario '{scenario}' attempted a self-loop on {account}")]
    SelfLoop { scenario: String, account: String },

    #[error("Account prefix '{prefix}' claimed by both '{first}' and '{second}' without a declared overlap")]
    PrefixCollision {
        prefix: String,
        first: String,
        second: String,
    },

    #[error("Account {account} used by both '{first}' and '{second}' without a declared overlap")]
    AccountOverlap {
        account: String,
        first: String,
        second: String,
    },

    #[error("Conflicting verdicts for {account}: '{first}' vs '{second}'")]
    ConflictingExpectation {
        account: String,
        first: String,
        second: String,
    },

    #[error("Malformed dataset row {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Timestamp parse error: {0}")]
    Timestamp(#[from] chrono::ParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type GenResult<T> = Result<T, GenError>;
