use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{web, Error, HttpResponse};
use serde_derive::Serialize;

/// Envelope shared by every endpoint: `{message, id?, item?, list?}`.
#[derive(Serialize, Debug)]
pub struct JsonResponse<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<Vec<T>>,
}

pub struct JsonResponseBuilder<T> {
    id: Option<i32>,
    item: Option<T>,
    list: Option<Vec<T>>,
}

impl<T> Default for JsonResponseBuilder<T> {
    fn default() -> Self {
        Self {
            id: None,
            item: None,
            list: None,
        }
    }
}

impl<T> JsonResponseBuilder<T>
where
    T: serde::Serialize,
{
    pub fn set_id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn set_item(mut self, item: T) -> Self {
        self.item = Some(item);
        self
    }

    pub fn set_list(mut self, list: Vec<T>) -> Self {
        self.list = Some(list);
        self
    }

    pub fn to_json_response<S: Into<String>>(self, message: S) -> JsonResponse<T> {
        JsonResponse {
            message: message.into(),
            id: self.id,
            item: self.item,
            list: self.list,
        }
    }

    pub fn ok<S: Into<String>>(self, message: S) -> web::Json<JsonResponse<T>> {
        web::Json(self.to_json_response(message))
    }

    pub fn to_error<S: Into<String>>(self, message: S, status: StatusCode) -> Error {
        let message = message.into();
        let response = HttpResponse::build(status).json(self.to_json_response(message.clone()));

        InternalError::from_response(message, response).into()
    }

    pub fn bad_request<S: Into<String>>(self, message: S) -> Error {
        self.to_error(message, StatusCode::BAD_REQUEST)
    }

    pub fn form_error<S: Into<String>>(self, message: S) -> Error {
        self.to_error(message, StatusCode::BAD_REQUEST)
    }
}

impl<T> JsonResponse<T>
where
    T: serde::Serialize,
{
    pub fn build() -> JsonResponseBuilder<T> {
        JsonResponseBuilder::default()
    }
}
