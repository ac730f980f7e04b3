//! Sensor handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    CreateSensorRequest, ListSensorsParams, SensorDto, SlotOutcomeDto, UpdateSensorRequest,
};
use crate::domain::DomainError;
use crate::interfaces::http::common::response::EmptyData;
use crate::interfaces::http::common::{ApiResponse, ApiResult, IdPath, ValidatedJson};
use crate::interfaces::http::router::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/sensor",
    tag = "Sensors",
    params(ListSensorsParams),
    responses(
        (status = 200, description = "Sensor list", body = ApiResponse<Vec<SensorDto>>),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn list_sensors(
    State(state): State<AppState>,
    Query(params): Query<ListSensorsParams>,
) -> ApiResult<Json<ApiResponse<Vec<SensorDto>>>> {
    let filter = params.into_filter()?;
    let sensors = state.repos.sensors().find_all(&filter).await?;
    Ok(Json(ApiResponse::list(
        sensors.into_iter().map(SensorDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/sensor/{id}",
    tag = "Sensors",
    params(("id" = i32, Path, description = "Sensor id")),
    responses(
        (status = 200, description = "Sensor details", body = ApiResponse<SensorDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_sensor(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<SensorDto>>> {
    let sensor = state
        .repos
        .sensors()
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Sensor", id))?;
    Ok(Json(ApiResponse::success(sensor.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/sensor",
    tag = "Sensors",
    request_body = CreateSensorRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<SensorDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Arduino not found")
    )
)]
pub async fn create_sensor(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateSensorRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<SensorDto>>)> {
    let created = state.repos.sensors().create(request.into_new()?).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(SensorDto::from(created)).with_message("Sensor created")),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/sensor/{id}",
    tag = "Sensors",
    params(("id" = i32, Path, description = "Sensor id")),
    request_body = UpdateSensorRequest,
    responses(
        (status = 200, description = "Updated; monitored slots are reconciled in the background", body = ApiResponse<SensorDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Sensor or Arduino not found")
    )
)]
pub async fn update_sensor(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateSensorRequest>,
) -> ApiResult<Json<ApiResponse<SensorDto>>> {
    let updated = state.devices.update_sensor(id, request.into_patch()?).await?;
    Ok(Json(
        ApiResponse::success(SensorDto::from(updated)).with_message("Sensor updated"),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/sensor/{id}",
    tag = "Sensors",
    params(("id" = i32, Path, description = "Sensor id")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Still monitoring parking slots")
    )
)]
pub async fn delete_sensor(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<EmptyData>>> {
    state.repos.sensors().delete(id).await?;
    Ok(Json(ApiResponse::success(EmptyData {}).with_message("Sensor deleted")))
}

#[utoipa::path(
    post,
    path = "/api/v1/sensor/{id}/reconcile",
    tag = "Sensors",
    params(("id" = i32, Path, description = "Sensor id")),
    responses(
        (status = 200, description = "One outcome per monitored slot", body = ApiResponse<Vec<SlotOutcomeDto>>),
        (status = 404, description = "Sensor not found")
    )
)]
pub async fn reconcile_sensor(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<Vec<SlotOutcomeDto>>>> {
    let outcomes = state.devices.reconcile_sensor(id).await?;
    Ok(Json(ApiResponse::list(
        outcomes.into_iter().map(SlotOutcomeDto::from).collect(),
    )))
}
