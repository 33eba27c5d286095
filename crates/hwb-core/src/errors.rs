/// Core error type for the bot.
///
/// Adapter crates map their library errors into this type so the poll loop
/// can classify failures consistently (fatal config vs. recoverable
/// iteration errors).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected HTTP status: {0}")]
    UnexpectedStatus(u16),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("unexpected response shape: {0}")]
    Shape(String),

    #[error("unknown homework status: {0}")]
    UnknownStatus(String),

    #[error("notify error: {0}")]
    Notify(String),
}

pub type Result<T> = std::result::Result<T, Error>;
