use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failure kinds shared by the repository, the delivery client and the handlers
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("a client with the same email or cpf already exists")]
    Duplicate,

    #[error("record not found")]
    NotFound,

    #[error("storage failure: {0}")]
    Storage(#[source] anyhow::Error),

    /// Delivery service answered with an unexpected status, or could not be
    /// reached at all (`status` is `None`).
    #[error("delivery service error (status {status:?}): {message}")]
    Upstream { status: Option<u16>, message: String },
}

impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => Error::NotFound,
            other => Error::Storage(other.into()),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Upstream {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}
