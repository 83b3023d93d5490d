//! 路径参数安全提取器
//!
//! actix 默认的路径解析失败时返回纯文本 400，这里统一换成
//! ApiResponse 结构，并顺带做取值校验。

use actix_web::error::InternalError;
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload};
use std::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(message: &str) -> actix_web::Error {
    let response = HttpResponse::BadRequest()
        .json(ApiResponse::error_empty(ErrorCode::BadRequest, message));
    InternalError::from_response(message.to_string(), response).into()
}

/// 路径中的 `{id}`，必须是正整数
pub struct SafeIDI64(pub i64);

impl FromRequest for SafeIDI64 {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("id").unwrap_or_default();
        let parsed = match raw.parse::<i64>() {
            Ok(id) if id > 0 => Ok(SafeIDI64(id)),
            _ => Err(bad_request("Path parameter 'id' must be a positive integer")),
        };
        ready(parsed)
    }
}

/// 路径中的 `{code}`，学号或工号
pub struct SafeCode(pub String);

impl FromRequest for SafeCode {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("code").unwrap_or_default();
        let parsed = if raw.is_empty() || raw.len() > 20 {
            Err(bad_request(
                "Path parameter 'code' must be between 1 and 20 characters",
            ))
        } else {
            Ok(SafeCode(raw.to_string()))
        };
        ready(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_safe_id_accepts_positive() {
        let req = TestRequest::default()
            .param("id", "42")
            .to_http_request();
        let id = SafeIDI64::from_request(&req, &mut Payload::None)
            .await
            .unwrap();
        assert_eq!(id.0, 42);
    }

    #[actix_web::test]
    async fn test_safe_id_rejects_garbage() {
        for raw in ["0", "-3", "abc", ""] {
            let req = TestRequest::default()
                .param("id", raw.to_string())
                .to_http_request();
            assert!(
                SafeIDI64::from_request(&req, &mut Payload::None)
                    .await
                    .is_err()
            );
        }
    }

    #[actix_web::test]
    async fn test_safe_code_bounds() {
        let req = TestRequest::default()
            .param("code", "STU000001")
            .to_http_request();
        let code = SafeCode::from_request(&req, &mut Payload::None)
            .await
            .unwrap();
        assert_eq!(code.0, "STU000001");

        let req = TestRequest::default()
            .param("code", "A".repeat(21))
            .to_http_request();
        assert!(
            SafeCode::from_request(&req, &mut Payload::None)
                .await
                .is_err()
        );
    }
}
