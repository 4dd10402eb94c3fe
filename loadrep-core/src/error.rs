pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("`keep_factor` must be > 0")]
    InvalidKeepFactor,

    #[error("`keep_percentage` must be in [0, 100)")]
    InvalidKeepPercentage,

    #[error("invalid pattern for `{name}`: {source}")]
    InvalidPattern {
        name: String,
        source: regex::Error,
    },

    #[error("results store error: {0}")]
    Store(#[from] loadrep_store::Error),

    #[error("results store contains no runs")]
    NoRuns,

    #[error("blade `{blade}` raised an alarm with unknown severity code {code}")]
    UnknownSeverity { blade: String, code: i64 },

    #[error("moving statistic error: {0}")]
    Moving(#[from] loadrep_stats::moving::Error),
}
