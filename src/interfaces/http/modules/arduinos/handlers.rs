//! Arduino hub handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{ArduinoDto, CreateArduinoRequest, ListArduinosParams, UpdateArduinoRequest};
use crate::domain::DomainError;
use crate::interfaces::http::common::response::EmptyData;
use crate::interfaces::http::common::{ApiResponse, ApiResult, IdPath, ValidatedJson};
use crate::interfaces::http::modules::sensors::SensorDto;
use crate::interfaces::http::router::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/arduino",
    tag = "Arduinos",
    params(ListArduinosParams),
    responses(
        (status = 200, description = "Arduino list", body = ApiResponse<Vec<ArduinoDto>>),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn list_arduinos(
    State(state): State<AppState>,
    Query(params): Query<ListArduinosParams>,
) -> ApiResult<Json<ApiResponse<Vec<ArduinoDto>>>> {
    let filter = params.into_filter()?;
    let arduinos = state.repos.arduinos().find_all(&filter).await?;
    let items = arduinos.into_iter().map(ArduinoDto::from).collect();
    Ok(Json(ApiResponse::list(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/arduino/{id}",
    tag = "Arduinos",
    params(("id" = i32, Path, description = "Arduino id")),
    responses(
        (status = 200, description = "Arduino details", body = ApiResponse<ArduinoDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_arduino(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<ArduinoDto>>> {
    let arduino = state
        .repos
        .arduinos()
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Arduino", id))?;
    Ok(Json(ApiResponse::success(arduino.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/arduino",
    tag = "Arduinos",
    request_body = CreateArduinoRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<ArduinoDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "IP address already registered")
    )
)]
pub async fn create_arduino(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateArduinoRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ArduinoDto>>)> {
    let created = state.repos.arduinos().create(request.into_new()?).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ArduinoDto::from(created)).with_message("Arduino created")),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/arduino/{id}",
    tag = "Arduinos",
    params(("id" = i32, Path, description = "Arduino id")),
    request_body = UpdateArduinoRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<ArduinoDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Not found"),
        (status = 409, description = "IP address already registered")
    )
)]
pub async fn update_arduino(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateArduinoRequest>,
) -> ApiResult<Json<ApiResponse<ArduinoDto>>> {
    let updated = state.devices.update_arduino(id, request.into_patch()?).await?;
    Ok(Json(
        ApiResponse::success(ArduinoDto::from(updated)).with_message("Arduino updated"),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/arduino/{id}",
    tag = "Arduinos",
    params(("id" = i32, Path, description = "Arduino id")),
    responses(
        (status = 200, description = "Deleted, sensors detached", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_arduino(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<EmptyData>>> {
    state.repos.arduinos().delete(id).await?;
    Ok(Json(
        ApiResponse::success(EmptyData {}).with_message("Arduino deleted"),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/arduino/{id}/sensors",
    tag = "Arduinos",
    params(("id" = i32, Path, description = "Arduino id")),
    responses(
        (status = 200, description = "Sensors attached to the Arduino", body = ApiResponse<Vec<SensorDto>>),
        (status = 404, description = "Arduino not found")
    )
)]
pub async fn list_arduino_sensors(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<Vec<SensorDto>>>> {
    if state.repos.arduinos().find_by_id(id).await?.is_none() {
        return Err(DomainError::not_found("Arduino", id).into());
    }
    let sensors = state.repos.sensors().find_by_arduino(id).await?;
    let items = sensors.into_iter().map(SensorDto::from).collect();
    Ok(Json(ApiResponse::list(items)))
}
