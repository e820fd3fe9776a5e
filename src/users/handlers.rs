//! User CRUD handlers.
//!
//! Each handler logs a business event tagged with the request's correlation
//! ID before and after touching the store, and maps store failures to
//! [`ApiError`]s: missing users become 404, anything else a generic 500.

use axum::{
    extract::{FromRequestParts, Path, State},
    http::request::Parts,
    Json,
};
use serde::Serialize;

use crate::http::request::{CorrelationId, ValidatedJson};
use crate::http::response::{ApiError, FieldViolation};
use crate::http::server::AppState;
use crate::users::model::{User, UserId, UserPayload};
use crate::users::store::StoreError;

const USER_NOT_FOUND: &str = "User not found";

/// `{user_id}` path segment.
///
/// A non-integer segment is a 422 like any other bad input. An integer the
/// store can never have issued (negative, or past [`UserId::MAX`]) is a 404.
#[derive(Debug, Clone, Copy)]
pub struct UserIdParam(pub UserId);

impl<S> FromRequestParts<S> for UserIdParam
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| invalid_user_id(rejection.body_text()))?;

        match raw.parse::<UserId>() {
            Ok(id) => Ok(Self(id)),
            Err(_) if is_integer(&raw) => {
                let correlation_id = CorrelationId::from_request_parts(parts, state)
                    .await
                    .unwrap_or_else(|never| match never {});
                tracing::warn!(correlation_id = %correlation_id, user_id = %raw, "User not found");
                Err(ApiError::not_found(USER_NOT_FOUND))
            }
            Err(e) => Err(invalid_user_id(format!("cannot parse {raw:?} as an integer: {e}"))),
        }
    }
}

fn invalid_user_id(message: impl Into<String>) -> ApiError {
    ApiError::Validation(vec![FieldViolation::new("user_id", message)])
}

/// Optional sign followed by at least one ASCII digit.
fn is_integer(raw: &str) -> bool {
    let digits = raw
        .strip_prefix('-')
        .or_else(|| raw.strip_prefix('+'))
        .unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Body of a successful delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

pub async fn create_user(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    ValidatedJson(new_user): ValidatedJson<UserPayload>,
) -> Result<Json<User>, ApiError> {
    tracing::info!(
        correlation_id = %correlation_id,
        user_name = %new_user.name,
        user_email = %new_user.email,
        user_age = ?new_user.age,
        "Creating new user"
    );

    let user = state.store.create(new_user).map_err(|e| {
        tracing::error!(correlation_id = %correlation_id, error = %e, "Error creating user");
        ApiError::internal("Failed to create user", e)
    })?;

    tracing::info!(
        correlation_id = %correlation_id,
        user_id = user.id,
        user_name = %user.name,
        "User created successfully"
    );

    Ok(Json(user))
}

pub async fn get_user(
    State(state): State<AppState>,
    UserIdParam(user_id): UserIdParam,
    correlation_id: CorrelationId,
) -> Result<Json<User>, ApiError> {
    tracing::info!(correlation_id = %correlation_id, user_id, "Fetching user details");

    let user = match state.store.get(user_id) {
        Ok(user) => user,
        Err(StoreError::NotFound(_)) => {
            tracing::warn!(correlation_id = %correlation_id, user_id, "User not found");
            return Err(ApiError::not_found(USER_NOT_FOUND));
        }
        Err(e) => {
            tracing::error!(
                correlation_id = %correlation_id,
                user_id,
                error = %e,
                "Error fetching user"
            );
            return Err(ApiError::internal("Failed to fetch user", e));
        }
    };

    tracing::info!(
        correlation_id = %correlation_id,
        user_id,
        user_name = %user.name,
        "User retrieved successfully"
    );

    Ok(Json(user))
}

pub async fn list_users(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
) -> Result<Json<Vec<User>>, ApiError> {
    tracing::info!(correlation_id = %correlation_id, "Fetching all users");

    let users = state.store.list().map_err(|e| {
        tracing::error!(correlation_id = %correlation_id, error = %e, "Error listing users");
        ApiError::internal("Failed to list users", e)
    })?;

    tracing::info!(correlation_id = %correlation_id, total_users = users.len(), "Users listed");

    Ok(Json(users))
}

pub async fn update_user(
    State(state): State<AppState>,
    UserIdParam(user_id): UserIdParam,
    correlation_id: CorrelationId,
    ValidatedJson(new_user): ValidatedJson<UserPayload>,
) -> Result<Json<User>, ApiError> {
    tracing::info!(
        correlation_id = %correlation_id,
        user_id,
        new_name = %new_user.name,
        new_email = %new_user.email,
        "Updating user"
    );

    let user = match state.store.update(user_id, new_user) {
        Ok(user) => user,
        Err(StoreError::NotFound(_)) => {
            tracing::warn!(
                correlation_id = %correlation_id,
                user_id,
                "Cannot update - user not found"
            );
            return Err(ApiError::not_found(USER_NOT_FOUND));
        }
        Err(e) => {
            tracing::error!(
                correlation_id = %correlation_id,
                user_id,
                error = %e,
                "Error updating user"
            );
            return Err(ApiError::internal("Failed to update user", e));
        }
    };

    tracing::info!(correlation_id = %correlation_id, user_id, "User updated successfully");

    Ok(Json(user))
}

pub async fn delete_user(
    State(state): State<AppState>,
    UserIdParam(user_id): UserIdParam,
    correlation_id: CorrelationId,
) -> Result<Json<DeleteResponse>, ApiError> {
    tracing::info!(correlation_id = %correlation_id, user_id, "Deleting user");

    match state.store.delete(user_id) {
        Ok(()) => {}
        Err(StoreError::NotFound(_)) => {
            tracing::warn!(
                correlation_id = %correlation_id,
                user_id,
                "Cannot delete - user not found"
            );
            return Err(ApiError::not_found(USER_NOT_FOUND));
        }
        Err(e) => {
            tracing::error!(
                correlation_id = %correlation_id,
                user_id,
                error = %e,
                "Error deleting user"
            );
            return Err(ApiError::internal("Failed to delete user", e));
        }
    }

    tracing::info!(correlation_id = %correlation_id, user_id, "User deleted successfully");

    Ok(Json(DeleteResponse {
        message: format!("User {user_id} deleted successfully"),
    }))
}
