//! Parking payment handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    CreateParkingPaymentRequest, ListParkingPaymentsParams, ParkingPaymentDto, PaymentStatsDto,
    UpdateParkingPaymentRequest,
};
use crate::domain::parking_payment::PaymentStats;
use crate::domain::DomainError;
use crate::interfaces::http::common::response::EmptyData;
use crate::interfaces::http::common::{ApiResponse, ApiResult, IdPath, ValidatedJson};
use crate::interfaces::http::router::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/parking-payment",
    tag = "Parking Payments",
    params(ListParkingPaymentsParams),
    responses(
        (status = 200, description = "Payment list", body = ApiResponse<Vec<ParkingPaymentDto>>),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn list_parking_payments(
    State(state): State<AppState>,
    Query(params): Query<ListParkingPaymentsParams>,
) -> ApiResult<Json<ApiResponse<Vec<ParkingPaymentDto>>>> {
    let filter = params.into_filter()?;
    let payments = state.repos.parking_payments().find_all(&filter).await?;
    Ok(Json(ApiResponse::list(
        payments.into_iter().map(ParkingPaymentDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/parking-payment/stats",
    tag = "Parking Payments",
    params(ListParkingPaymentsParams),
    responses(
        (status = 200, description = "Revenue statistics", body = ApiResponse<PaymentStatsDto>)
    )
)]
pub async fn get_parking_payment_stats(
    State(state): State<AppState>,
    Query(params): Query<ListParkingPaymentsParams>,
) -> ApiResult<Json<ApiResponse<PaymentStatsDto>>> {
    let filter = params.into_filter()?;
    let payments = state.repos.parking_payments().find_all(&filter).await?;
    let stats = PaymentStats::from_payments(&payments);
    Ok(Json(ApiResponse::success(stats.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/parking-payment/{id}",
    tag = "Parking Payments",
    params(("id" = i32, Path, description = "Payment id")),
    responses(
        (status = 200, description = "Payment details", body = ApiResponse<ParkingPaymentDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_parking_payment(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<ParkingPaymentDto>>> {
    let payment = state
        .repos
        .parking_payments()
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("ParkingPayment", id))?;
    Ok(Json(ApiResponse::success(payment.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/parking-payment",
    tag = "Parking Payments",
    request_body = CreateParkingPaymentRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<ParkingPaymentDto>),
        (status = 400, description = "Invalid amount or payment method"),
        (status = 404, description = "User or activity not found")
    )
)]
pub async fn create_parking_payment(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateParkingPaymentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ParkingPaymentDto>>)> {
    let created = state
        .repos
        .parking_payments()
        .create(request.into_new()?)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::success(ParkingPaymentDto::from(created))
                .with_message("Parking payment recorded"),
        ),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/parking-payment/{id}",
    tag = "Parking Payments",
    params(("id" = i32, Path, description = "Payment id")),
    request_body = UpdateParkingPaymentRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<ParkingPaymentDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Payment or activity not found")
    )
)]
pub async fn update_parking_payment(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateParkingPaymentRequest>,
) -> ApiResult<Json<ApiResponse<ParkingPaymentDto>>> {
    let patch = request.into_patch()?;
    let mut payment = state
        .repos
        .parking_payments()
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("ParkingPayment", id))?;
    payment.apply(patch)?;
    let updated = state.repos.parking_payments().update(&payment).await?;
    Ok(Json(
        ApiResponse::success(ParkingPaymentDto::from(updated))
            .with_message("Parking payment updated"),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/parking-payment/{id}",
    tag = "Parking Payments",
    params(("id" = i32, Path, description = "Payment id")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_parking_payment(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<EmptyData>>> {
    state.repos.parking_payments().delete(id).await?;
    Ok(Json(
        ApiResponse::success(EmptyData {}).with_message("Parking payment deleted"),
    ))
}
