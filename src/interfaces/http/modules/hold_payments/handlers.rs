//! Hold payment handlers
//!
//! Creation goes through the admission controller; everything else is
//! plain storage access.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    AdmittedHoldDto, AvailabilityDto, CreateHoldPaymentRequest, HoldPaymentDto,
    HoldPaymentStatsDto, ListHoldPaymentsParams, UpdateHoldPaymentRequest,
};
use crate::domain::hold_payment::HoldPaymentStats;
use crate::domain::DomainError;
use crate::interfaces::http::common::response::EmptyData;
use crate::interfaces::http::common::{ApiResponse, ApiResult, IdPath, ValidatedJson};
use crate::interfaces::http::router::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/hold-payment",
    tag = "Hold Payments",
    params(ListHoldPaymentsParams),
    responses(
        (status = 200, description = "Hold payment list", body = ApiResponse<Vec<HoldPaymentDto>>),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn list_hold_payments(
    State(state): State<AppState>,
    Query(params): Query<ListHoldPaymentsParams>,
) -> ApiResult<Json<ApiResponse<Vec<HoldPaymentDto>>>> {
    let filter = params.into_filter()?;
    let holds = state.repos.hold_payments().find_all(&filter).await?;
    Ok(Json(ApiResponse::list(
        holds.into_iter().map(HoldPaymentDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/hold-payment/availability",
    tag = "Hold Payments",
    responses(
        (status = 200, description = "Current slot budget", body = ApiResponse<AvailabilityDto>)
    )
)]
pub async fn get_hold_availability(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<AvailabilityDto>>> {
    let snapshot = state.admission.availability().await?;
    Ok(Json(ApiResponse::success(snapshot.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/hold-payment/stats",
    tag = "Hold Payments",
    params(ListHoldPaymentsParams),
    responses(
        (status = 200, description = "Pending and completed totals", body = ApiResponse<HoldPaymentStatsDto>)
    )
)]
pub async fn get_hold_payment_stats(
    State(state): State<AppState>,
    Query(params): Query<ListHoldPaymentsParams>,
) -> ApiResult<Json<ApiResponse<HoldPaymentStatsDto>>> {
    let filter = params.into_filter()?;
    let holds = state.repos.hold_payments().find_all(&filter).await?;
    let stats = HoldPaymentStats::from_payments(&holds);
    Ok(Json(ApiResponse::success(stats.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/hold-payment/{id}",
    tag = "Hold Payments",
    params(("id" = i32, Path, description = "Hold payment id")),
    responses(
        (status = 200, description = "Hold payment details", body = ApiResponse<HoldPaymentDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_hold_payment(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<HoldPaymentDto>>> {
    let hold = state
        .repos
        .hold_payments()
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("HoldPayment", id))?;
    Ok(Json(ApiResponse::success(hold.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/hold-payment",
    tag = "Hold Payments",
    request_body = CreateHoldPaymentRequest,
    responses(
        (status = 201, description = "Admitted and created", body = ApiResponse<AdmittedHoldDto>),
        (status = 400, description = "Invalid amount or payment method"),
        (status = 404, description = "User not found"),
        (status = 409, description = "No parking slot available")
    )
)]
pub async fn create_hold_payment(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateHoldPaymentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AdmittedHoldDto>>)> {
    let (hold, snapshot) = state
        .admission
        .check_and_create_hold(request.user_id, request.amount, &request.payment_method)
        .await?;
    let body = AdmittedHoldDto {
        hold_payment: hold.into(),
        availability: snapshot.into(),
    };
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(body).with_message("Hold payment created")),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/hold-payment/{id}",
    tag = "Hold Payments",
    params(("id" = i32, Path, description = "Hold payment id")),
    request_body = UpdateHoldPaymentRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<HoldPaymentDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Done hold cannot return to pending")
    )
)]
pub async fn update_hold_payment(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateHoldPaymentRequest>,
) -> ApiResult<Json<ApiResponse<HoldPaymentDto>>> {
    let patch = request.into_patch()?;
    let mut hold = state
        .repos
        .hold_payments()
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("HoldPayment", id))?;
    hold.apply(patch)?;
    let updated = state.repos.hold_payments().update(&hold).await?;
    Ok(Json(
        ApiResponse::success(HoldPaymentDto::from(updated)).with_message("Hold payment updated"),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/hold-payment/{id}",
    tag = "Hold Payments",
    params(("id" = i32, Path, description = "Hold payment id")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_hold_payment(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<EmptyData>>> {
    state.repos.hold_payments().delete(id).await?;
    Ok(Json(
        ApiResponse::success(EmptyData {}).with_message("Hold payment deleted"),
    ))
}
