//! User handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateUserRequest, ListUsersParams, UpdateUserRequest, UserDto};
use crate::domain::DomainError;
use crate::interfaces::http::common::response::EmptyData;
use crate::interfaces::http::common::{ApiResponse, ApiResult, IdPath, ValidatedJson};
use crate::interfaces::http::router::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/user",
    tag = "Users",
    params(ListUsersParams),
    responses(
        (status = 200, description = "User list", body = ApiResponse<Vec<UserDto>>)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListUsersParams>,
) -> ApiResult<Json<ApiResponse<Vec<UserDto>>>> {
    let users = state.repos.users().find_all(&params.into()).await?;
    Ok(Json(ApiResponse::list(
        users.into_iter().map(UserDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/user/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<UserDto>>> {
    let user = state
        .repos
        .users()
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("User", id))?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/user",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<UserDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Service not found"),
        (status = 409, description = "Plate number already registered")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserDto>>)> {
    let created = state.repos.users().create(request.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from(created)).with_message("User created")),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/user/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<UserDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User or service not found"),
        (status = 409, description = "Plate number already registered")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<ApiResponse<UserDto>>> {
    let mut user = state
        .repos
        .users()
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("User", id))?;
    user.apply(request.into())?;
    let updated = state.repos.users().update(&user).await?;
    Ok(Json(ApiResponse::success(UserDto::from(updated)).with_message("User updated")))
}

#[utoipa::path(
    delete,
    path = "/api/v1/user/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Activities or payments still reference the user")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<EmptyData>>> {
    state.repos.users().delete(id).await?;
    Ok(Json(ApiResponse::success(EmptyData {}).with_message("User deleted")))
}
