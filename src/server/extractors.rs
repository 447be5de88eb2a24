//! Custom extractors for the HTTP server.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use crate::error::{ErrorDetail, ErrorResponse};

/// Rejection type for `MsgPackExtractor`
#[derive(Debug)]
pub struct MsgPackRejection {
    message: String,
}

impl IntoResponse for MsgPackRejection {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorDetail {
                code: "DESERIALIZATION_ERROR".to_string(),
                message: self.message.clone(),
            },
        };

        match rmp_serde::to_vec_named(&body) {
            Ok(bytes) => (
                StatusCode::BAD_REQUEST,
                [("content-type", "application/msgpack")],
                bytes,
            )
                .into_response(),
            Err(_) => (StatusCode::BAD_REQUEST, self.message).into_response(),
        }
    }
}

/// Extractor for `MessagePack` request bodies.
///
/// Accepts `application/msgpack` and `application/x-msgpack`; a missing
/// content type is treated as msgpack.
pub struct MsgPackExtractor<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for MsgPackExtractor<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = MsgPackRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.contains("msgpack") && !content_type.is_empty() {
            return Err(MsgPackRejection {
                message: format!(
                    "Invalid content type: expected application/msgpack, got {content_type}"
                ),
            });
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| MsgPackRejection {
                message: format!("Failed to read request body: {e}"),
            })?;

        decode(&bytes).map(MsgPackExtractor)
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, MsgPackRejection> {
    rmp_serde::from_slice(bytes).map_err(|e| MsgPackRejection {
        message: format!("Failed to deserialize MessagePack: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AnalyzeRequest;

    #[test]
    fn test_decode_named_body() {
        let bytes = rmp_serde::to_vec_named(&AnalyzeRequest {
            text: "아침에 일어났다.".to_string(),
        })
        .unwrap();

        let req: AnalyzeRequest = decode(&bytes).unwrap();
        assert_eq!(req.text, "아침에 일어났다.");
    }

    #[test]
    fn test_decode_garbage_is_rejected() {
        let err = decode::<AnalyzeRequest>(&[0xc1]).unwrap_err();
        assert!(err.message.contains("MessagePack"));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
