pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("results store i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown run '{0}'")]
    MissingRun(String),

    #[error("unknown blade '{blade}' in run '{run}'")]
    MissingBlade { run: String, blade: String },

    #[error("unknown event type '{event}' for blade '{blade}'")]
    MissingEventType { blade: String, event: String },

    #[error("malformed blade descriptor in {path} (line {line}): {reason}")]
    MalformedDescriptor {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("malformed event record in {path} (line {line}): {reason}")]
    MalformedEvent {
        path: String,
        line: usize,
        reason: String,
    },
}
