//! Parking activity handlers, including the start/end lifecycle

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;

use super::dto::{
    ActivityStatsDto, CreateParkingActivityRequest, ListParkingActivitiesParams,
    ParkingActivityDto, StartParkingActivityRequest, UpdateParkingActivityRequest,
};
use crate::domain::parking_activity::{ActivityStats, NewParkingActivity};
use crate::domain::DomainError;
use crate::interfaces::http::common::response::EmptyData;
use crate::interfaces::http::common::{ApiResponse, ApiResult, IdPath, ValidatedJson};
use crate::interfaces::http::router::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/parking-activity",
    tag = "Parking Activities",
    params(ListParkingActivitiesParams),
    responses(
        (status = 200, description = "Activity list", body = ApiResponse<Vec<ParkingActivityDto>>),
        (status = 400, description = "Invalid date range")
    )
)]
pub async fn list_parking_activities(
    State(state): State<AppState>,
    Query(params): Query<ListParkingActivitiesParams>,
) -> ApiResult<Json<ApiResponse<Vec<ParkingActivityDto>>>> {
    let activities = state
        .repos
        .parking_activities()
        .find_all(&params.into())
        .await?;
    Ok(Json(ApiResponse::list(
        activities.into_iter().map(ParkingActivityDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/parking-activity/stats",
    tag = "Parking Activities",
    params(ListParkingActivitiesParams),
    responses(
        (status = 200, description = "Active and completed session counts", body = ApiResponse<ActivityStatsDto>)
    )
)]
pub async fn get_parking_activity_stats(
    State(state): State<AppState>,
    Query(params): Query<ListParkingActivitiesParams>,
) -> ApiResult<Json<ApiResponse<ActivityStatsDto>>> {
    let activities = state
        .repos
        .parking_activities()
        .find_all(&params.into())
        .await?;
    let stats = ActivityStats::from_activities(&activities);
    Ok(Json(ApiResponse::success(stats.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/parking-activity/{id}",
    tag = "Parking Activities",
    params(("id" = i32, Path, description = "Activity id")),
    responses(
        (status = 200, description = "Activity details", body = ApiResponse<ParkingActivityDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_parking_activity(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<ParkingActivityDto>>> {
    let activity = state
        .repos
        .parking_activities()
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("ParkingActivity", id))?;
    Ok(Json(ApiResponse::success(activity.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/parking-activity",
    tag = "Parking Activities",
    request_body = CreateParkingActivityRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<ParkingActivityDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "User or slot not found"),
        (status = 409, description = "User already has a running session")
    )
)]
pub async fn create_parking_activity(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateParkingActivityRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ParkingActivityDto>>)> {
    let created = state
        .repos
        .parking_activities()
        .create(request.into())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::success(ParkingActivityDto::from(created))
                .with_message("Parking activity created"),
        ),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/parking-activity/start",
    tag = "Parking Activities",
    request_body = StartParkingActivityRequest,
    responses(
        (status = 201, description = "Session started", body = ApiResponse<ParkingActivityDto>),
        (status = 404, description = "User or slot not found"),
        (status = 409, description = "User already has a running session")
    )
)]
pub async fn start_parking_activity(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<StartParkingActivityRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ParkingActivityDto>>)> {
    let started = state
        .repos
        .parking_activities()
        .create(NewParkingActivity::start_now(request.user_id, request.slot_id))
        .await?;
    info!(
        activity_id = started.id,
        user_id = started.user_id,
        "Parking session started"
    );
    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::success(ParkingActivityDto::from(started))
                .with_message("Parking session started"),
        ),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/parking-activity/{id}/end",
    tag = "Parking Activities",
    params(("id" = i32, Path, description = "Activity id")),
    responses(
        (status = 200, description = "Session ended now", body = ApiResponse<ParkingActivityDto>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Session already ended")
    )
)]
pub async fn end_parking_activity(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<ParkingActivityDto>>> {
    let mut activity = state
        .repos
        .parking_activities()
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("ParkingActivity", id))?;
    activity.finish(Utc::now())?;
    let ended = state.repos.parking_activities().update(&activity).await?;
    info!(
        activity_id = id,
        duration_minutes = ended.duration_minutes(),
        "Parking session ended"
    );
    Ok(Json(
        ApiResponse::success(ParkingActivityDto::from(ended))
            .with_message("Parking session ended"),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/parking-activity/{id}",
    tag = "Parking Activities",
    params(("id" = i32, Path, description = "Activity id")),
    request_body = UpdateParkingActivityRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<ParkingActivityDto>),
        (status = 400, description = "End before start"),
        (status = 404, description = "Activity or slot not found"),
        (status = 409, description = "Reopening would give the user two running sessions")
    )
)]
pub async fn update_parking_activity(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateParkingActivityRequest>,
) -> ApiResult<Json<ApiResponse<ParkingActivityDto>>> {
    let mut activity = state
        .repos
        .parking_activities()
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("ParkingActivity", id))?;
    activity.apply(request.into())?;
    let updated = state.repos.parking_activities().update(&activity).await?;
    Ok(Json(
        ApiResponse::success(ParkingActivityDto::from(updated))
            .with_message("Parking activity updated"),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/parking-activity/{id}",
    tag = "Parking Activities",
    params(("id" = i32, Path, description = "Activity id")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Parking payments still reference the activity")
    )
)]
pub async fn delete_parking_activity(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<EmptyData>>> {
    state.repos.parking_activities().delete(id).await?;
    Ok(Json(
        ApiResponse::success(EmptyData {}).with_message("Parking activity deleted"),
    ))
}
