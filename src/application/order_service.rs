use crate::domain::errors::DomainError;
use crate::domain::order::{timestamp_now, CreateOrderInput, Order, OrderStatus};
use crate::domain::ports::OrderRepository;

/// Service type shared with the HTTP layer; the repository is boxed so the
/// handlers do not depend on a concrete adapter.
pub type DynOrderService = OrderService<Box<dyn OrderRepository>>;

pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validate `input`, fill in defaults and persist it. Returns the id of
    /// the stored order.
    pub fn create_order(&self, input: CreateOrderInput) -> Result<String, DomainError> {
        let order = input.into_order(timestamp_now()).inspect_err(|e| {
            log::warn!("Rejected order: {}", e);
        })?;
        self.repo.insert(&order)?;

        log::info!("Created order {} for {}", order.id, order.customer);
        Ok(order.id)
    }

    pub fn list_orders(&self) -> Result<Vec<Order>, DomainError> {
        self.repo.list()
    }

    pub fn get_order(&self, id: &str) -> Result<Order, DomainError> {
        self.repo.find_by_id(id)?.ok_or(DomainError::NotFound)
    }

    /// Set the status of order `id` and refresh its `updated_at`. The store
    /// never moves `updated_at` backwards.
    ///
    /// An unknown status is rejected before the store is touched, and an
    /// update that matches no row is reported as [`DomainError::NotFound`].
    pub fn update_status(&self, id: &str, status: &str) -> Result<OrderStatus, DomainError> {
        let status: OrderStatus = status.parse().inspect_err(|e| {
            log::warn!("Rejected status update for order {}: {}", id, e);
        })?;

        let affected = self.repo.update_status(id, status, timestamp_now())?;
        if affected == 0 {
            return Err(DomainError::NotFound);
        }

        log::info!("Order {} set to {}", id, status);
        Ok(status)
    }

    /// Delete order `id`; deleting an unknown id is [`DomainError::NotFound`].
    pub fn delete_order(&self, id: &str) -> Result<(), DomainError> {
        if self.repo.delete(id)? == 0 {
            return Err(DomainError::NotFound);
        }

        log::info!("Deleted order {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;
    use chrono::{DateTime, Timelike, Utc};

    use super::*;
    use crate::domain::order::Item;
    use crate::domain::ports::MockOrderRepository;

    fn input(email: &str) -> CreateOrderInput {
        CreateOrderInput {
            id: None,
            customer: "Ana".to_string(),
            email: email.to_string(),
            items: vec![Item {
                product: "Book".to_string(),
                quantity: 2,
                price: BigDecimal::from_str("10.0").unwrap(),
            }],
            total: BigDecimal::from_str("20.0").unwrap(),
            status: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn stored_order(id: &str) -> Order {
        input("ana@example.com")
            .into_order(Utc::now())
            .map(|o| Order {
                id: id.to_string(),
                ..o
            })
            .unwrap()
    }

    #[test]
    fn create_persists_the_validated_order() {
        let mut repo = MockOrderRepository::new();
        repo.expect_insert()
            .withf(|order: &Order| {
                order.customer == "Ana"
                    && order.status == OrderStatus::Pending
                    && order.items.len() == 1
                    && order.created_at == order.updated_at
            })
            .times(1)
            .returning(|_| Ok(()));

        let id = OrderService::new(repo)
            .create_order(input("ana@example.com"))
            .expect("create failed");

        assert!(!id.is_empty());
    }

    #[test]
    fn create_with_invalid_email_never_reaches_the_store() {
        let mut repo = MockOrderRepository::new();
        repo.expect_insert().never();

        let result = OrderService::new(repo).create_order(input("not-an-email"));

        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn create_with_invalid_status_never_reaches_the_store() {
        let mut repo = MockOrderRepository::new();
        repo.expect_insert().never();

        let result = OrderService::new(repo).create_order(CreateOrderInput {
            status: Some("shipped".to_string()),
            ..input("ana@example.com")
        });

        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn create_propagates_storage_conflicts() {
        let mut repo = MockOrderRepository::new();
        repo.expect_insert()
            .returning(|o| Err(DomainError::Conflict(format!("order '{}' already exists", o.id))));

        let result = OrderService::new(repo).create_order(CreateOrderInput {
            id: Some("dup".to_string()),
            ..input("ana@example.com")
        });

        assert!(matches!(result, Err(DomainError::Conflict(msg)) if msg.contains("dup")));
    }

    #[test]
    fn get_maps_missing_row_to_not_found() {
        let mut repo = MockOrderRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let result = OrderService::new(repo).get_order("missing");

        assert!(matches!(result, Err(DomainError::NotFound)));
    }

    #[test]
    fn get_returns_the_stored_order() {
        let mut repo = MockOrderRepository::new();
        repo.expect_find_by_id()
            .withf(|id: &str| id == "o-1")
            .returning(|id| Ok(Some(stored_order(id))));

        let order = OrderService::new(repo).get_order("o-1").unwrap();

        assert_eq!(order.id, "o-1");
        assert_eq!(order.customer, "Ana");
    }

    #[test]
    fn get_keeps_storage_failures_distinct_from_not_found() {
        let mut repo = MockOrderRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Err(DomainError::Internal("connection refused".to_string())));

        let result = OrderService::new(repo).get_order("o-1");

        assert!(matches!(result, Err(DomainError::Internal(_))));
    }

    #[test]
    fn list_returns_every_row() {
        let mut repo = MockOrderRepository::new();
        repo.expect_list()
            .returning(|| Ok(vec![stored_order("a"), stored_order("b")]));

        let orders = OrderService::new(repo).list_orders().unwrap();

        assert_eq!(orders.len(), 2);
    }

    #[test]
    fn update_status_writes_parsed_status_and_fresh_timestamp() {
        let before = timestamp_now();
        let mut repo = MockOrderRepository::new();
        repo.expect_update_status()
            .withf(move |id: &str, status: &OrderStatus, at: &DateTime<Utc>| {
                id == "o-1"
                    && *status == OrderStatus::Approved
                    && *at >= before
                    && at.nanosecond() % 1_000 == 0
            })
            .times(1)
            .returning(|_, _, _| Ok(1));

        let status = OrderService::new(repo)
            .update_status("o-1", "approved")
            .unwrap();

        assert_eq!(status, OrderStatus::Approved);
    }

    #[test]
    fn update_status_rejects_unknown_status_before_storage() {
        let mut repo = MockOrderRepository::new();
        repo.expect_update_status().never();

        let result = OrderService::new(repo).update_status("o-1", "shipped");

        assert!(matches!(result, Err(DomainError::InvalidInput(_))));
    }

    #[test]
    fn update_status_on_unknown_id_is_not_found() {
        let mut repo = MockOrderRepository::new();
        repo.expect_update_status().returning(|_, _, _| Ok(0));

        let result = OrderService::new(repo).update_status("missing", "cancelled");

        assert!(matches!(result, Err(DomainError::NotFound)));
    }

    #[test]
    fn delete_on_unknown_id_is_not_found() {
        let mut repo = MockOrderRepository::new();
        repo.expect_delete().returning(|_| Ok(0));

        let result = OrderService::new(repo).delete_order("missing");

        assert!(matches!(result, Err(DomainError::NotFound)));
    }

    #[test]
    fn delete_succeeds_when_a_row_is_removed() {
        let mut repo = MockOrderRepository::new();
        repo.expect_delete()
            .withf(|id: &str| id == "o-1")
            .times(1)
            .returning(|_| Ok(1));

        assert!(OrderService::new(repo).delete_order("o-1").is_ok());
    }
}
