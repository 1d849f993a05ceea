use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::domain::errors::DomainError;
use crate::domain::order::{parse_decimal, Item, Order, OrderStatus};
use crate::schema::orders;

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: String,
    pub customer: String,
    pub email: String,
    pub items: Value,
    pub total: BigDecimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow {
    pub id: String,
    pub customer: String,
    pub email: String,
    pub items: Value,
    pub total: BigDecimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Shape of one element of the `items` jsonb column. Prices are stored as
/// strings so the decimal scale survives the round trip.
#[derive(Debug, Deserialize)]
struct ItemRecord {
    product: String,
    quantity: i32,
    price: String,
}

impl From<&Order> for NewOrderRow {
    fn from(order: &Order) -> Self {
        let items: Vec<Value> = order
            .items
            .iter()
            .map(|i| {
                json!({
                    "product": i.product,
                    "quantity": i.quantity,
                    "price": i.price.to_string()
                })
            })
            .collect();

        Self {
            id: order.id.clone(),
            customer: order.customer.clone(),
            email: order.email.clone(),
            items: Value::Array(items),
            total: order.total.clone(),
            status: order.status.as_str().to_string(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

impl TryFrom<OrderRow> for Order {
    type Error = DomainError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let records: Vec<ItemRecord> = serde_json::from_value(row.items).map_err(|e| {
            DomainError::Internal(format!("order {} has malformed items: {}", row.id, e))
        })?;

        let items = records
            .into_iter()
            .map(|r| {
                Ok(Item {
                    price: parse_decimal("price", &r.price)
                        .map_err(|e| DomainError::Internal(format!("order {}: {}", row.id, e)))?,
                    product: r.product,
                    quantity: r.quantity,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        let status: OrderStatus = row.status.parse().map_err(|e: DomainError| {
            DomainError::Internal(format!("order {}: {}", row.id, e))
        })?;

        Ok(Order {
            id: row.id,
            customer: row.customer,
            email: row.email,
            items,
            total: row.total,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
