//! User resource handlers.
//!
//! ```text
//! GET    /api/users
//! GET    /api/users/{id}
//! POST   /api/users {"name":"Ada","email":"ada@example.com"}
//! PUT    /api/users/{id}
//! DELETE /api/users/{id}
//! ```
//!
//! Nothing is persisted: every response is derived from the request alone.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::debug;

use super::ApiResult;
use super::envelope::{created, ok};
use super::state::HttpState;
use crate::domain::user::{MAX_CREATED_USER_ID, roster};
use crate::domain::{Error, NewUser, User, UserId, UserValidationError};

/// Body accepted by `POST /api/users`.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct CreateUserRequest {
    /// Display name.
    pub name: Option<String>,
    /// E-mail address.
    pub email: Option<String>,
}

pub(crate) fn map_user_validation_error(err: &UserValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": err.field(), "code": err.reason() }))
}

fn parse_id(raw: &str) -> ApiResult<UserId> {
    UserId::parse(raw).map_err(|err| map_user_validation_error(&err))
}

/// List the fixed roster.
#[get("/users")]
pub async fn list_users() -> HttpResponse {
    ok(roster())
}

/// Synthesise the user for `id`.
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    Ok(ok(User::synthesised(id, state.now())))
}

/// Validate and acknowledge a new user under a random id.
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner();
    let new_user = NewUser::try_from_parts(request.name.as_deref(), request.email.as_deref())
        .map_err(|err| map_user_validation_error(&err))?;
    let raw_id = state.randomness.in_range(1..MAX_CREATED_USER_ID + 1);
    let id = UserId::new(raw_id)
        .map_err(|err| Error::internal(format!("drew an invalid user id: {err}")))?;
    debug!(user_id = %id, "acknowledged user creation");
    Ok(created(new_user.into_user(id, state.now())))
}

/// Echo the submitted fields with `id` and `updatedAt`.
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    let Value::Object(mut fields) = payload.into_inner() else {
        return Err(Error::invalid_request("request body must be a JSON object"));
    };
    fields.insert("id".to_owned(), json!(id));
    fields.insert("updatedAt".to_owned(), json!(state.now()));
    Ok(ok(Value::Object(fields)))
}

/// Acknowledge a deletion.
#[delete("/users/{id}")]
pub async fn delete_user(path: web::Path<String>) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    Ok(ok(json!({ "id": id, "deleted": true })))
}
