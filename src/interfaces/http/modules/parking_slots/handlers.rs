//! Parking slot handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use super::dto::{
    CreateParkingSlotRequest, ListParkingSlotsParams, ParkingSlotDto, SlotReconciliationDto,
    SlotSensorUpdateRequest, SlotStatsDto, UpdateParkingSlotRequest,
};
use crate::domain::DomainError;
use crate::interfaces::http::common::response::EmptyData;
use crate::interfaces::http::common::{ApiResponse, ApiResult, IdPath, ValidatedJson};
use crate::interfaces::http::router::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/parking-slot",
    tag = "Parking Slots",
    params(ListParkingSlotsParams),
    responses(
        (status = 200, description = "Slot list", body = ApiResponse<Vec<ParkingSlotDto>>),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn list_parking_slots(
    State(state): State<AppState>,
    Query(params): Query<ListParkingSlotsParams>,
) -> ApiResult<Json<ApiResponse<Vec<ParkingSlotDto>>>> {
    let filter = params.into_filter()?;
    let slots = state.repos.parking_slots().find_all(&filter).await?;
    Ok(Json(ApiResponse::list(
        slots.into_iter().map(ParkingSlotDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/parking-slot/stats",
    tag = "Parking Slots",
    responses(
        (status = 200, description = "Slot counts per status", body = ApiResponse<SlotStatsDto>)
    )
)]
pub async fn get_parking_slot_stats(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<SlotStatsDto>>> {
    let stats = state.repos.parking_slots().stats().await?;
    Ok(Json(ApiResponse::success(stats.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/parking-slot/{id}",
    tag = "Parking Slots",
    params(("id" = i32, Path, description = "Slot id")),
    responses(
        (status = 200, description = "Slot details", body = ApiResponse<ParkingSlotDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_parking_slot(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<ParkingSlotDto>>> {
    let slot = state
        .repos
        .parking_slots()
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("ParkingSlot", id))?;
    Ok(Json(ApiResponse::success(slot.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/parking-slot",
    tag = "Parking Slots",
    request_body = CreateParkingSlotRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<ParkingSlotDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Sensor not found")
    )
)]
pub async fn create_parking_slot(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateParkingSlotRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ParkingSlotDto>>)> {
    let created = state.repos.parking_slots().create(request.into_new()?).await?;
    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::success(ParkingSlotDto::from(created))
                .with_message("Parking slot created"),
        ),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/parking-slot/{id}",
    tag = "Parking Slots",
    params(("id" = i32, Path, description = "Slot id")),
    request_body = UpdateParkingSlotRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<ParkingSlotDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Slot or sensor not found")
    )
)]
pub async fn update_parking_slot(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateParkingSlotRequest>,
) -> ApiResult<Json<ApiResponse<ParkingSlotDto>>> {
    let patch = request.into_patch()?;
    let updated = state.repos.parking_slots().update(id, &patch).await?;
    Ok(Json(
        ApiResponse::success(ParkingSlotDto::from(updated)).with_message("Parking slot updated"),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/parking-slot/{id}/sensor-update",
    tag = "Parking Slots",
    params(("id" = i32, Path, description = "Slot id")),
    request_body = SlotSensorUpdateRequest,
    responses(
        (status = 200, description = "Slot reconciled against the reading", body = ApiResponse<SlotReconciliationDto>),
        (status = 400, description = "Unknown status or distance outside 0..=1000"),
        (status = 404, description = "Slot not found")
    )
)]
pub async fn update_slot_from_sensor(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<SlotSensorUpdateRequest>,
) -> ApiResult<Json<ApiResponse<SlotReconciliationDto>>> {
    let reading = request.into_reading()?;
    let (slot, outcome) = state.reconciler.reconcile_slot_by_id(id, &reading).await?;
    info!(
        slot_id = id,
        status = %outcome.status,
        changed = outcome.changed,
        "Slot updated from sensor reading"
    );
    Ok(Json(ApiResponse::success(SlotReconciliationDto::new(
        slot, outcome,
    ))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/parking-slot/{id}",
    tag = "Parking Slots",
    params(("id" = i32, Path, description = "Slot id")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_parking_slot(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<EmptyData>>> {
    state.repos.parking_slots().delete(id).await?;
    Ok(Json(
        ApiResponse::success(EmptyData {}).with_message("Parking slot deleted"),
    ))
}
