//! API router with Swagger UI

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::common::response::EmptyData;
use super::common::ApiResponse;
use super::modules::health::{self, HealthState};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::modules::request_id::request_id_middleware;
use super::modules::{
    arduinos, hold_payments, parking_activities, parking_payments, parking_slots, sensors, users,
    vehicle_services,
};
use crate::application::{
    DeviceService, HoldAdmissionService, SharedEventBus, SlotReconciliationService,
};
use crate::domain::RepositoryProvider;

/// State shared by every resource handler
#[derive(Clone)]
pub struct AppState {
    pub repos: Arc<dyn RepositoryProvider>,
    pub reconciler: Arc<SlotReconciliationService>,
    pub admission: Arc<HoldAdmissionService>,
    pub devices: Arc<DeviceService>,
    pub event_bus: SharedEventBus,
}

impl AppState {
    /// Wire the services around one repository provider and event bus.
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        event_bus: SharedEventBus,
        occupancy_threshold_cm: i32,
    ) -> Self {
        let reconciler = Arc::new(
            SlotReconciliationService::new(repos.clone(), occupancy_threshold_cm)
                .with_event_bus(event_bus.clone()),
        );
        let admission =
            Arc::new(HoldAdmissionService::new(repos.clone()).with_event_bus(event_bus.clone()));
        let devices = Arc::new(DeviceService::new(
            repos.clone(),
            reconciler.clone(),
            event_bus.clone(),
        ));
        Self {
            repos,
            reconciler,
            admission,
            devices,
            event_bus,
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        // Arduinos
        arduinos::list_arduinos,
        arduinos::get_arduino,
        arduinos::create_arduino,
        arduinos::update_arduino,
        arduinos::delete_arduino,
        arduinos::list_arduino_sensors,
        // Sensors
        sensors::list_sensors,
        sensors::get_sensor,
        sensors::create_sensor,
        sensors::update_sensor,
        sensors::delete_sensor,
        sensors::reconcile_sensor,
        // Parking slots
        parking_slots::list_parking_slots,
        parking_slots::get_parking_slot_stats,
        parking_slots::get_parking_slot,
        parking_slots::create_parking_slot,
        parking_slots::update_parking_slot,
        parking_slots::update_slot_from_sensor,
        parking_slots::delete_parking_slot,
        // Services
        vehicle_services::list_vehicle_services,
        vehicle_services::get_vehicle_service_stats,
        vehicle_services::get_vehicle_service,
        vehicle_services::create_vehicle_service,
        vehicle_services::update_vehicle_service,
        vehicle_services::delete_vehicle_service,
        // Users
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        // Parking activities
        parking_activities::list_parking_activities,
        parking_activities::get_parking_activity_stats,
        parking_activities::get_parking_activity,
        parking_activities::create_parking_activity,
        parking_activities::start_parking_activity,
        parking_activities::end_parking_activity,
        parking_activities::update_parking_activity,
        parking_activities::delete_parking_activity,
        // Hold payments
        hold_payments::list_hold_payments,
        hold_payments::get_hold_availability,
        hold_payments::get_hold_payment_stats,
        hold_payments::get_hold_payment,
        hold_payments::create_hold_payment,
        hold_payments::update_hold_payment,
        hold_payments::delete_hold_payment,
        // Parking payments
        parking_payments::list_parking_payments,
        parking_payments::get_parking_payment_stats,
        parking_payments::get_parking_payment,
        parking_payments::create_parking_payment,
        parking_payments::update_parking_payment,
        parking_payments::delete_parking_payment,
    ),
    components(
        schemas(
            ApiResponse<EmptyData>,
            EmptyData,
            health::HealthResponse,
            health::ComponentHealth,
            arduinos::ArduinoDto,
            arduinos::CreateArduinoRequest,
            arduinos::UpdateArduinoRequest,
            sensors::SensorDto,
            sensors::CreateSensorRequest,
            sensors::UpdateSensorRequest,
            sensors::SlotOutcomeDto,
            parking_slots::ParkingSlotDto,
            parking_slots::CreateParkingSlotRequest,
            parking_slots::UpdateParkingSlotRequest,
            parking_slots::SlotSensorUpdateRequest,
            parking_slots::SlotReconciliationDto,
            parking_slots::SlotStatsDto,
            vehicle_services::VehicleServiceDto,
            vehicle_services::CreateVehicleServiceRequest,
            vehicle_services::UpdateVehicleServiceRequest,
            vehicle_services::ServiceUsageDto,
            users::UserDto,
            users::CreateUserRequest,
            users::UpdateUserRequest,
            parking_activities::ParkingActivityDto,
            parking_activities::CreateParkingActivityRequest,
            parking_activities::StartParkingActivityRequest,
            parking_activities::UpdateParkingActivityRequest,
            parking_activities::ActivityStatsDto,
            hold_payments::HoldPaymentDto,
            hold_payments::CreateHoldPaymentRequest,
            hold_payments::UpdateHoldPaymentRequest,
            hold_payments::AvailabilityDto,
            hold_payments::AdmittedHoldDto,
            hold_payments::HoldPaymentStatsDto,
            parking_payments::ParkingPaymentDto,
            parking_payments::CreateParkingPaymentRequest,
            parking_payments::UpdateParkingPaymentRequest,
            parking_payments::PaymentStatsDto,
            parking_payments::MethodTotalDto,
        )
    ),
    tags(
        (name = "Health", description = "Service and database health"),
        (name = "Arduinos", description = "Sensor hubs; maintenance cascades to their sensors"),
        (name = "Sensors", description = "Distance sensors; readings reconcile the slots they monitor"),
        (name = "Parking Slots", description = "Slots and their sensor-derived occupancy"),
        (name = "Services", description = "Parking prices per vehicle type"),
        (name = "Users", description = "Vehicle owners"),
        (name = "Parking Activities", description = "Parking sessions"),
        (name = "Hold Payments", description = "Pre-payments gated by available slot capacity"),
        (name = "Parking Payments", description = "Payments settling parking sessions"),
    ),
    info(
        title = "Smart Parking API",
        version = "0.1.0",
        description = "REST API for sensor-driven parking slot management"
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes.
///
/// `/metrics` is mounted only when a Prometheus handle is supplied.
pub fn create_api_router(
    state: AppState,
    health_state: HealthState,
    prometheus: Option<PrometheusHandle>,
) -> Router {
    let arduino_routes = Router::new()
        .route(
            "/",
            get(arduinos::list_arduinos).post(arduinos::create_arduino),
        )
        .route(
            "/{id}",
            get(arduinos::get_arduino)
                .put(arduinos::update_arduino)
                .delete(arduinos::delete_arduino),
        )
        .route("/{id}/sensors", get(arduinos::list_arduino_sensors));

    let sensor_routes = Router::new()
        .route("/", get(sensors::list_sensors).post(sensors::create_sensor))
        .route(
            "/{id}",
            get(sensors::get_sensor)
                .put(sensors::update_sensor)
                .delete(sensors::delete_sensor),
        )
        .route("/{id}/reconcile", post(sensors::reconcile_sensor));

    let slot_routes = Router::new()
        .route(
            "/",
            get(parking_slots::list_parking_slots).post(parking_slots::create_parking_slot),
        )
        .route("/stats", get(parking_slots::get_parking_slot_stats))
        .route(
            "/{id}",
            get(parking_slots::get_parking_slot)
                .put(parking_slots::update_parking_slot)
                .delete(parking_slots::delete_parking_slot),
        )
        .route(
            "/{id}/sensor-update",
            put(parking_slots::update_slot_from_sensor),
        );

    let service_routes = Router::new()
        .route(
            "/",
            get(vehicle_services::list_vehicle_services)
                .post(vehicle_services::create_vehicle_service),
        )
        .route("/stats", get(vehicle_services::get_vehicle_service_stats))
        .route(
            "/{id}",
            get(vehicle_services::get_vehicle_service)
                .put(vehicle_services::update_vehicle_service)
                .delete(vehicle_services::delete_vehicle_service),
        );

    let user_routes = Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        );

    let activity_routes = Router::new()
        .route(
            "/",
            get(parking_activities::list_parking_activities)
                .post(parking_activities::create_parking_activity),
        )
        .route("/stats", get(parking_activities::get_parking_activity_stats))
        .route("/start", post(parking_activities::start_parking_activity))
        .route(
            "/{id}",
            get(parking_activities::get_parking_activity)
                .put(parking_activities::update_parking_activity)
                .delete(parking_activities::delete_parking_activity),
        )
        .route("/{id}/end", post(parking_activities::end_parking_activity));

    let hold_routes = Router::new()
        .route(
            "/",
            get(hold_payments::list_hold_payments).post(hold_payments::create_hold_payment),
        )
        .route("/availability", get(hold_payments::get_hold_availability))
        .route("/stats", get(hold_payments::get_hold_payment_stats))
        .route(
            "/{id}",
            get(hold_payments::get_hold_payment)
                .put(hold_payments::update_hold_payment)
                .delete(hold_payments::delete_hold_payment),
        );

    let payment_routes = Router::new()
        .route(
            "/",
            get(parking_payments::list_parking_payments)
                .post(parking_payments::create_parking_payment),
        )
        .route("/stats", get(parking_payments::get_parking_payment_stats))
        .route(
            "/{id}",
            get(parking_payments::get_parking_payment)
                .put(parking_payments::update_parking_payment)
                .delete(parking_payments::delete_parking_payment),
        );

    let api_routes = Router::new()
        .nest("/arduino", arduino_routes)
        .nest("/sensor", sensor_routes)
        .nest("/parking-slot", slot_routes)
        .nest("/service", service_routes)
        .nest("/user", user_routes)
        .nest("/parking-activity", activity_routes)
        .nest("/hold-payment", hold_routes)
        .nest("/parking-payment", payment_routes)
        .with_state(state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health_state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(health_routes)
        .nest("/api/v1", api_routes);

    if let Some(handle) = prometheus {
        router = router.merge(
            Router::new()
                .route("/metrics", get(prometheus_metrics))
                .with_state(MetricsState { handle }),
        );
    }

    router
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::Service;

    use crate::application::create_event_bus;
    use crate::infrastructure::database::repositories::test_support::memory_store;
    use crate::infrastructure::SeaOrmRepositoryProvider;

    async fn app() -> Router {
        let store = memory_store().await;
        let health = HealthState::new(store.connection().clone());
        let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(store));
        let state = AppState::new(repos, create_event_bus(), 3);
        create_api_router(state, health, None)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(b) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&b).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let mut svc = app.clone().into_service();
        let resp = svc.call(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn create(app: &Router, uri: &str, body: Value) -> i64 {
        let (status, resp) = send(app, "POST", uri, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{}", resp);
        resp["data"]["id"]
            .as_i64()
            .or_else(|| resp["data"]["hold_payment"]["id"].as_i64())
            .unwrap()
    }

    #[tokio::test]
    async fn duplicate_arduino_ip_is_409_envelope() {
        let app = app().await;
        create(
            &app,
            "/api/v1/arduino",
            json!({"ip_address": "10.0.0.5", "location": "Gate A"}),
        )
        .await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/arduino",
            Some(json!({"ip_address": "10.0.0.5", "location": "Gate B"})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn bad_ids_are_400_and_missing_rows_404() {
        let app = app().await;
        for uri in ["/api/v1/sensor/abc", "/api/v1/sensor/0", "/api/v1/sensor/-2"] {
            let (status, body) = send(&app, "GET", uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(body["success"], false);
        }
        let (status, body) = send(&app, "GET", "/api/v1/sensor/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Sensor not found");
    }

    #[tokio::test]
    async fn list_envelope_carries_count() {
        let app = app().await;
        create(&app, "/api/v1/parking-slot", json!({"location": "A1"})).await;
        create(&app, "/api/v1/parking-slot", json!({"location": "A2"})).await;

        let (status, body) = send(&app, "GET", "/api/v1/parking-slot", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(body["data"][0]["status"], "available");
    }

    #[tokio::test]
    async fn slot_sensor_update_reconciles_once() {
        let app = app().await;
        let sensor = create(
            &app,
            "/api/v1/sensor",
            json!({"sensor_type": "HC-SR04", "sensor_range": 120}),
        )
        .await;
        let slot = create(
            &app,
            "/api/v1/parking-slot",
            json!({"location": "B4", "sensor_id": sensor}),
        )
        .await;
        let uri = format!("/api/v1/parking-slot/{}/sensor-update", slot);
        let reading = json!({"sensor_status": "working", "sensor_range": 1});

        let (status, body) = send(&app, "PUT", &uri, Some(reading.clone())).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["data"]["status"], "occupied");
        assert_eq!(body["data"]["previous"], "available");
        assert_eq!(body["data"]["changed"], true);
        assert_eq!(body["data"]["slot"]["status"], "occupied");

        let (_, body) = send(&app, "PUT", &uri, Some(reading)).await;
        assert_eq!(body["data"]["changed"], false);

        let (status, _) = send(
            &app,
            "PUT",
            &uri,
            Some(json!({"sensor_status": "working", "sensor_range": 1001})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            "PUT",
            &uri,
            Some(json!({"sensor_status": "broken", "sensor_range": 10})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("status"));
    }

    #[tokio::test]
    async fn sensor_reconcile_reports_every_slot() {
        let app = app().await;
        let sensor = create(
            &app,
            "/api/v1/sensor",
            json!({"sensor_type": "HC-SR04", "sensor_range": 2}),
        )
        .await;
        for location in ["C1", "C2"] {
            create(
                &app,
                "/api/v1/parking-slot",
                json!({"location": location, "sensor_id": sensor}),
            )
            .await;
        }

        let (status, body) = send(
            &app,
            "POST",
            &format!("/api/v1/sensor/{}/reconcile", sensor),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        for outcome in body["data"].as_array().unwrap() {
            assert_eq!(outcome["success"], true);
            assert_eq!(outcome["status"], "occupied");
        }
    }

    #[tokio::test]
    async fn referenced_sensor_cannot_be_deleted() {
        let app = app().await;
        let sensor = create(&app, "/api/v1/sensor", json!({"sensor_type": "HC-SR04"})).await;
        let slot = create(
            &app,
            "/api/v1/parking-slot",
            json!({"location": "D1", "sensor_id": sensor}),
        )
        .await;

        let sensor_uri = format!("/api/v1/sensor/{}", sensor);
        let (status, _) = send(&app, "DELETE", &sensor_uri, None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(
            &app,
            "DELETE",
            &format!("/api/v1/parking-slot/{}", slot),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, "DELETE", &sensor_uri, None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn hold_payment_admission_over_http() {
        let app = app().await;
        create(&app, "/api/v1/parking-slot", json!({"location": "E1"})).await;
        let user = create(
            &app,
            "/api/v1/user",
            json!({"first_name": "Ana", "last_name": "Reyes", "plate_number": "nbc 123"}),
        )
        .await;
        let hold = json!({"user_id": user, "amount": 50.0, "payment_method": "gcash"});

        let (status, body) = send(&app, "POST", "/api/v1/hold-payment", Some(hold.clone())).await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert_eq!(body["data"]["availability"]["remaining"], 0);
        assert_eq!(body["data"]["hold_payment"]["is_done"], false);

        let (status, body) = send(&app, "POST", "/api/v1/hold-payment", Some(hold)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/hold-payment",
            Some(json!({"user_id": user, "amount": 50.0, "payment_method": "cash"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(&app, "GET", "/api/v1/hold-payment/availability", None).await;
        assert_eq!(body["data"]["available_count"], 1);
        assert_eq!(body["data"]["pending_count"], 1);
    }

    #[tokio::test]
    async fn second_running_session_is_409() {
        let app = app().await;
        let user = create(
            &app,
            "/api/v1/user",
            json!({"first_name": "Ben", "last_name": "Cruz", "plate_number": "XYZ-9"}),
        )
        .await;
        let activity = create(&app, "/api/v1/parking-activity/start", json!({"user_id": user})).await;

        let (status, _) = send(
            &app,
            "POST",
            "/api/v1/parking-activity/start",
            Some(json!({"user_id": user})),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let end_uri = format!("/api/v1/parking-activity/{}/end", activity);
        let (status, body) = send(&app, "POST", &end_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["active"], false);
        let (status, _) = send(&app, "POST", &end_uri, None).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn request_id_is_echoed() {
        let app = app().await;
        let req = Request::builder()
            .uri("/health")
            .header("x-request-id", "trace-me")
            .body(Body::empty())
            .unwrap();
        let mut svc = app.into_service();
        let resp = svc.call(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["x-request-id"], "trace-me");
    }

    #[tokio::test]
    async fn openapi_document_lists_core_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc
            .paths
            .paths
            .contains_key("/api/v1/parking-slot/{id}/sensor-update"));
        assert!(doc.paths.paths.contains_key("/api/v1/hold-payment"));
    }
}
