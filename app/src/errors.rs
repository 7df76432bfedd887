use err_derive::Error;

/// Why the validator refused a submission. Clients only ever see
/// `Invalid request body`; the reason is kept for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error(display = "missing or empty field")]
    MissingOrEmptyField,
    #[error(display = "malformed ingredient list")]
    MalformedIngredientList,
    #[error(display = "photo url is not url-shaped")]
    InvalidUrl,
    #[error(display = "alcoholic flag must be a boolean literal")]
    InvalidBooleanFlag,
}

/// Everything a resource operation can fail with, each mapping to a status
/// and a client-facing message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(display = "{} with given id not found", _0)]
    NotFound(&'static str),
    #[error(display = "{} with given id already exists", _0)]
    AlreadyExists(&'static str),
    #[error(display = "{} with given id does not exist", _0)]
    DoesNotExist(&'static str),
    #[error(display = "Invalid identifier")]
    InvalidKey,
    #[error(display = "Invalid request body")]
    InvalidBody(#[error(source)] Rejection),
    #[error(display = "One or more ingredients do not exist")]
    UnknownIngredients,
    #[error(display = "Invalid {} query parameter", _0)]
    InvalidQuery(&'static str),
    #[error(display = "Internal server error")]
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::NotFound(_) => 404,
            ApiError::AlreadyExists(_)
            | ApiError::DoesNotExist(_)
            | ApiError::InvalidKey
            | ApiError::InvalidBody(_)
            | ApiError::InvalidQuery(_) => 400,
            ApiError::UnknownIngredients => 401,
            ApiError::Internal(_) => 500,
        }
    }

    pub(crate) fn internal<E: Into<anyhow::Error>>(cause: E) -> Self {
        ApiError::Internal(cause.into())
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(cause: anyhow::Error) -> Self {
        ApiError::Internal(cause)
    }
}
