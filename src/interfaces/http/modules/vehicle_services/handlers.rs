//! Vehicle service handlers

use axum::{extract::State, http::StatusCode, Json};

use super::dto::{
    CreateVehicleServiceRequest, ServiceUsageDto, UpdateVehicleServiceRequest, VehicleServiceDto,
};
use crate::domain::DomainError;
use crate::interfaces::http::common::response::EmptyData;
use crate::interfaces::http::common::{ApiResponse, ApiResult, IdPath, ValidatedJson};
use crate::interfaces::http::router::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/service",
    tag = "Services",
    responses(
        (status = 200, description = "Service list", body = ApiResponse<Vec<VehicleServiceDto>>)
    )
)]
pub async fn list_vehicle_services(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<VehicleServiceDto>>>> {
    let services = state.repos.vehicle_services().find_all().await?;
    Ok(Json(ApiResponse::list(
        services.into_iter().map(VehicleServiceDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/service/stats",
    tag = "Services",
    responses(
        (status = 200, description = "Enrolled users per service", body = ApiResponse<Vec<ServiceUsageDto>>)
    )
)]
pub async fn get_vehicle_service_stats(
    State(state): State<AppState>,
) -> ApiResult<Json<ApiResponse<Vec<ServiceUsageDto>>>> {
    let usage = state.repos.vehicle_services().usage().await?;
    Ok(Json(ApiResponse::list(
        usage.into_iter().map(ServiceUsageDto::from).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/service/{id}",
    tag = "Services",
    params(("id" = i32, Path, description = "Service id")),
    responses(
        (status = 200, description = "Service details", body = ApiResponse<VehicleServiceDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_vehicle_service(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<VehicleServiceDto>>> {
    let service = state
        .repos
        .vehicle_services()
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Service", id))?;
    Ok(Json(ApiResponse::success(service.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/service",
    tag = "Services",
    request_body = CreateVehicleServiceRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<VehicleServiceDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Vehicle type already priced")
    )
)]
pub async fn create_vehicle_service(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateVehicleServiceRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<VehicleServiceDto>>)> {
    let created = state.repos.vehicle_services().create(request.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(VehicleServiceDto::from(created)).with_message("Service created")),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/service/{id}",
    tag = "Services",
    params(("id" = i32, Path, description = "Service id")),
    request_body = UpdateVehicleServiceRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<VehicleServiceDto>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Vehicle type already priced")
    )
)]
pub async fn update_vehicle_service(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateVehicleServiceRequest>,
) -> ApiResult<Json<ApiResponse<VehicleServiceDto>>> {
    let mut service = state
        .repos
        .vehicle_services()
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Service", id))?;
    service.apply(request.into())?;
    let updated = state.repos.vehicle_services().update(&service).await?;
    Ok(Json(
        ApiResponse::success(VehicleServiceDto::from(updated)).with_message("Service updated"),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/service/{id}",
    tag = "Services",
    params(("id" = i32, Path, description = "Service id")),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<EmptyData>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Users are still enrolled")
    )
)]
pub async fn delete_vehicle_service(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ApiResponse<EmptyData>>> {
    state.repos.vehicle_services().delete(id).await?;
    Ok(Json(ApiResponse::success(EmptyData {}).with_message("Service deleted")))
}
