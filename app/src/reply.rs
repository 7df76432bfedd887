use log::*;
use serde_json::Value;

use crate::errors::ApiError;

/// A finished response: status plus a payload ready for serialization.
/// The routing layer only has to put it on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(Value),
    Text(String),
}

impl Reply {
    pub fn json(status: u16, value: Value) -> Self {
        Reply {
            status,
            body: Body::Json(value),
        }
    }

    pub fn text(status: u16, text: impl Into<String>) -> Self {
        Reply {
            status,
            body: Body::Text(text.into()),
        }
    }
}

impl From<ApiError> for Reply {
    fn from(err: ApiError) -> Self {
        if let ApiError::Internal(cause) = &err {
            // The cause stays out of the payload; callers get the opaque line.
            error!("internal failure: {:?}", cause);
        }
        Reply::text(err.status(), err.to_string())
    }
}
