use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::Timestamptz;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{Order, OrderStatus};
use crate::domain::ports::OrderRepository;
use crate::schema::orders;

use super::models::{NewOrderRow, OrderRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<DieselError> for DomainError {
    fn from(e: DieselError) -> Self {
        DomainError::Internal(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Internal(format!("could not acquire a database connection: {}", e))
    }
}

diesel::define_sql_function! {
    /// PostgreSQL `GREATEST` over two timestamps.
    fn greatest(a: Timestamptz, b: Timestamptz) -> Timestamptz;
}

// ── Repository ────────────────────────────────────────────────────────────────

/// Diesel adapter for [`OrderRepository`]. Each call checks one connection
/// out of the pool for a single statement; dropping it returns it to the
/// pool on every exit path.
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn insert(&self, order: &Order) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        diesel::insert_into(orders::table)
            .values(&NewOrderRow::from(order))
            .execute(&mut conn)
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    DomainError::Conflict(format!("order '{}' already exists", order.id))
                }
                other => other.into(),
            })?;

        Ok(())
    }

    fn list(&self) -> Result<Vec<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        orders::table
            .select(OrderRow::as_select())
            .load::<OrderRow>(&mut conn)?
            .into_iter()
            .map(Order::try_from)
            .collect()
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Order>, DomainError> {
        let mut conn = self.pool.get()?;

        orders::table
            .find(id)
            .select(OrderRow::as_select())
            .first::<OrderRow>(&mut conn)
            .optional()?
            .map(Order::try_from)
            .transpose()
    }

    fn update_status(
        &self,
        id: &str,
        status: OrderStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<usize, DomainError> {
        let mut conn = self.pool.get()?;

        let affected = diesel::update(orders::table.find(id))
            .set((
                orders::status.eq(status.as_str()),
                orders::updated_at.eq(greatest(orders::updated_at, updated_at)),
            ))
            .execute(&mut conn)?;
        Ok(affected)
    }

    fn delete(&self, id: &str) -> Result<usize, DomainError> {
        let mut conn = self.pool.get()?;

        let affected = diesel::delete(orders::table.find(id)).execute(&mut conn)?;
        Ok(affected)
    }
}
