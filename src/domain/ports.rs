use chrono::{DateTime, Utc};

use super::errors::DomainError;
use super::order::{Order, OrderStatus};

/// Storage port for orders. Every call is a single statement; the
/// mutating calls return the number of rows they affected.
#[cfg_attr(test, mockall::automock)]
pub trait OrderRepository: Send + Sync + 'static {
    fn insert(&self, order: &Order) -> Result<(), DomainError>;
    fn list(&self) -> Result<Vec<Order>, DomainError>;
    fn find_by_id(&self, id: &str) -> Result<Option<Order>, DomainError>;
    fn update_status(
        &self,
        id: &str,
        status: OrderStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<usize, DomainError>;
    fn delete(&self, id: &str) -> Result<usize, DomainError>;
}

impl<R: OrderRepository + ?Sized> OrderRepository for Box<R> {
    fn insert(&self, order: &Order) -> Result<(), DomainError> {
        (**self).insert(order)
    }

    fn list(&self) -> Result<Vec<Order>, DomainError> {
        (**self).list()
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Order>, DomainError> {
        (**self).find_by_id(id)
    }

    fn update_status(
        &self,
        id: &str,
        status: OrderStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        (**self).update_status(id, status, updated_at)
    }

    fn delete(&self, id: &str) -> Result<usize, DomainError> {
        (**self).delete(id)
    }
}
