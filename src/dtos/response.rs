use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// 统一响应信封：`{"code": 200, "msg": "success", "data": ...}`。
/// 错误响应同样使用它，只是没有 `data` 字段。
#[derive(Debug, Serialize)]
pub struct Res<T> {
    pub code: u16,
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Res<T>
where
    T: Serialize,
{
    pub fn with_data(data: T) -> Self {
        Self {
            code: StatusCode::OK.as_u16(),
            msg: "success".to_string(),
            data: Some(data),
        }
    }

    /// 201 Created，用于注册、新建商品等写操作。
    pub fn created(msg: &str, data: T) -> Self {
        Self {
            code: StatusCode::CREATED.as_u16(),
            msg: msg.to_string(),
            data: Some(data),
        }
    }
}

impl Res<()> {
    pub fn with_msg(msg: &str) -> Self {
        Self {
            code: StatusCode::OK.as_u16(),
            msg: msg.to_string(),
            data: None,
        }
    }

    pub fn with_error(code: StatusCode, msg: &str) -> Self {
        Self {
            code: code.as_u16(),
            msg: msg.to_string(),
            data: None,
        }
    }
}

impl<T> IntoResponse for Res<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
