use reqwest::{Response, StatusCode};
use serde::Deserialize;

use common::prelude::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("{kind}: {msg}")]
    Service { kind: ErrorKind, msg: String },
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
}

#[derive(Deserialize)]
struct ErrorBody {
    kind: ErrorKind,
    msg: String,
}

impl ApiError {
    /// Decode a `{kind, msg}` error body, falling back to the raw status and text.
    pub async fn from_response(response: Response) -> Self {
        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return ApiError::Reqwest(e),
        };
        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(body) => ApiError::Service {
                kind: body.kind,
                msg: body.msg,
            },
            Err(_) => ApiError::HttpStatus(status, text),
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ApiError::Service { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}
