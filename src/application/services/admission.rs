//! Hold-payment admission controller
//!
//! A new hold is accepted only while pending holds are fewer than available
//! slots. The count-and-insert is delegated to
//! [`HoldPaymentRepository::create_admitted`](crate::domain::HoldPaymentRepository::create_admitted),
//! which performs it atomically.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::application::events::{Event, HoldPaymentAdmittedEvent, SharedEventBus};
use crate::domain::hold_payment::{AvailabilitySnapshot, HoldPayment, NewHoldPayment};
use crate::domain::payment::PaymentMethod;
use crate::domain::{DomainError, DomainResult, RepositoryProvider};

pub struct HoldAdmissionService {
    repos: Arc<dyn RepositoryProvider>,
    event_bus: Option<SharedEventBus>,
}

impl HoldAdmissionService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self {
            repos,
            event_bus: None,
        }
    }

    pub fn with_event_bus(mut self, event_bus: SharedEventBus) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Validate the request, then admit and insert the hold if a slot is free.
    ///
    /// Invalid input fails before any slot count is taken.
    pub async fn check_and_create_hold(
        &self,
        user_id: i32,
        amount: f64,
        payment_method: &str,
    ) -> DomainResult<(HoldPayment, AvailabilitySnapshot)> {
        let method: PaymentMethod = payment_method.parse()?;
        let new = NewHoldPayment::new(user_id, amount, method)?;

        match self.repos.hold_payments().create_admitted(new).await {
            Ok((hold, snapshot)) => {
                metrics::counter!("hold_admissions_total", "result" => "admitted").increment(1);
                if let Some(bus) = &self.event_bus {
                    bus.publish(Event::HoldPaymentAdmitted(HoldPaymentAdmittedEvent {
                        hold_payment_id: hold.id,
                        user_id: hold.user_id,
                        available_count: snapshot.available_count,
                        pending_count: snapshot.pending_count,
                        remaining: snapshot.remaining,
                        timestamp: Utc::now(),
                    }));
                }
                Ok((hold, snapshot))
            }
            Err(e @ DomainError::AdmissionDenied { .. }) => {
                metrics::counter!("hold_admissions_total", "result" => "denied").increment(1);
                warn!(user_id, error = %e, "Hold payment denied");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Current slot budget without admitting anything.
    pub async fn availability(&self) -> DomainResult<AvailabilitySnapshot> {
        let (available, pending) = self.repos.hold_payments().availability().await?;
        let snapshot = AvailabilitySnapshot::current(available, pending);
        info!(
            available = snapshot.available_count,
            pending = snapshot.pending_count,
            "Hold availability read"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::events::EventBus;
    use crate::domain::hold_payment::HoldPaymentFilter;
    use crate::domain::parking_slot::{NewParkingSlot, SlotStatus};
    use crate::domain::user::NewUser;
    use crate::infrastructure::database::repositories::test_support::memory_store;
    use crate::infrastructure::SeaOrmRepositoryProvider;

    async fn setup(available: usize) -> (Arc<SeaOrmRepositoryProvider>, i32) {
        let repos = Arc::new(SeaOrmRepositoryProvider::new(memory_store().await));
        for n in 0..available {
            repos
                .parking_slots()
                .create(NewParkingSlot {
                    location: format!("P{}", n),
                    status: SlotStatus::Available,
                    sensor_id: None,
                })
                .await
                .unwrap();
        }
        let user = repos
            .users()
            .create(NewUser {
                first_name: "Ken".into(),
                last_name: "Uy".into(),
                plate_number: "KEN 10".into(),
                contact_number: None,
                service_id: None,
            })
            .await
            .unwrap();
        (repos, user.id)
    }

    async fn hold_count(repos: &SeaOrmRepositoryProvider) -> usize {
        repos
            .hold_payments()
            .find_all(&HoldPaymentFilter::default())
            .await
            .unwrap()
            .len()
    }

    #[tokio::test]
    async fn validation_fails_before_any_slot_check() {
        let (repos, user_id) = setup(0).await;
        let service = HoldAdmissionService::new(repos.clone());

        // Zero slots would deny admission, but validation is reported first.
        let err = service
            .check_and_create_hold(user_id, 50.0, "cash")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = service
            .check_and_create_hold(user_id, 1000.0, "gcash")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(hold_count(&repos).await, 0);
    }

    #[tokio::test]
    async fn full_budget_denies_without_inserting() {
        let (repos, user_id) = setup(2).await;
        let service = HoldAdmissionService::new(repos.clone());
        service.check_and_create_hold(user_id, 20.0, "gcash").await.unwrap();
        service.check_and_create_hold(user_id, 20.0, "paymaya").await.unwrap();

        let err = service
            .check_and_create_hold(user_id, 20.0, "gcash")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DomainError::AdmissionDenied {
                available: 2,
                pending: 2
            }
        ));
        assert_eq!(hold_count(&repos).await, 2);
        assert_eq!(
            service.availability().await.unwrap(),
            AvailabilitySnapshot {
                available_count: 2,
                pending_count: 2,
                remaining: 0
            }
        );
    }

    #[tokio::test]
    async fn admission_is_published() {
        let (repos, user_id) = setup(1).await;
        let bus = Arc::new(EventBus::new());
        let mut sub = bus.subscribe();
        let service = HoldAdmissionService::new(repos).with_event_bus(bus.clone());

        let (hold, snapshot) = service
            .check_and_create_hold(user_id, 99.5, "GCash")
            .await
            .unwrap();
        assert_eq!(snapshot.remaining, 0);
        assert_eq!(hold.payment_method, PaymentMethod::Gcash);
        assert!(hold.is_pending());

        let msg = sub.recv().await.unwrap();
        assert_eq!(msg.event.event_type(), "hold_payment_admitted");
        assert_eq!(msg.event.subject_id(), hold.id);
    }
}
