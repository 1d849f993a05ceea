use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::{DateTime, SubsecRound, Timelike, Utc};
use uuid::Uuid;
use validator::ValidateEmail;

use super::errors::DomainError;

/// Lifecycle state of an order. Any status may be set to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Approved,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 3] = [
        OrderStatus::Pending,
        OrderStatus::Approved,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                DomainError::InvalidInput(format!(
                    "invalid status '{}', expected one of pending, approved, cancelled",
                    s
                ))
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub product: String,
    pub quantity: i32,
    pub price: BigDecimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    pub customer: String,
    pub email: String,
    pub items: Vec<Item>,
    pub total: BigDecimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order payload as received from a client. `id`, `status` and the
/// timestamps are optional and defaulted by [`CreateOrderInput::into_order`].
#[derive(Debug, Clone)]
pub struct CreateOrderInput {
    pub id: Option<String>,
    pub customer: String,
    pub email: String,
    pub items: Vec<Item>,
    pub total: BigDecimal,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CreateOrderInput {
    /// Validate the payload and fill in defaults, using `now` for any
    /// missing timestamp. A missing `created_at` follows a supplied
    /// `updated_at`.
    pub fn into_order(self, now: DateTime<Utc>) -> Result<Order, DomainError> {
        let now = now.trunc_subsecs(6);
        if !self.email.validate_email() {
            return Err(DomainError::InvalidInput(format!(
                "invalid email address '{}'",
                self.email
            )));
        }

        let status = match self.status.as_deref() {
            Some(s) => s.parse()?,
            None => OrderStatus::default(),
        };

        let id = match self.id {
            Some(id) if id.trim().is_empty() => {
                return Err(DomainError::InvalidInput("id must not be blank".to_string()));
            }
            Some(id) => id,
            None => Uuid::new_v4().to_string(),
        };

        let zero = BigDecimal::from(0);
        for (idx, item) in self.items.iter().enumerate() {
            if item.quantity <= 0 {
                return Err(DomainError::InvalidInput(format!(
                    "items[{}].quantity must be positive, got {}",
                    idx, item.quantity
                )));
            }
            if item.price < zero {
                return Err(DomainError::InvalidInput(format!(
                    "items[{}].price must not be negative, got {}",
                    idx, item.price
                )));
            }
        }

        for (field, ts) in [("created_at", self.created_at), ("updated_at", self.updated_at)] {
            let Some(ts) = ts else { continue };
            if ts > now {
                return Err(DomainError::InvalidInput(format!(
                    "{} must not be in the future, got {}",
                    field,
                    ts.to_rfc3339()
                )));
            }
            if ts.nanosecond() % 1_000 != 0 {
                return Err(DomainError::InvalidInput(format!(
                    "{} supports at most microsecond precision, got {}",
                    field,
                    ts.to_rfc3339()
                )));
            }
        }

        let updated_at = self.updated_at.unwrap_or(now);
        let created_at = self.created_at.unwrap_or(updated_at);
        if updated_at < created_at {
            return Err(DomainError::InvalidInput(format!(
                "updated_at {} is earlier than created_at {}",
                updated_at.to_rfc3339(),
                created_at.to_rfc3339()
            )));
        }

        Ok(Order {
            id,
            customer: self.customer,
            email: self.email,
            items: self.items,
            total: self.total,
            status,
            created_at,
            updated_at,
        })
    }
}

/// Current time at the precision the order table stores (microseconds).
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Parse a decimal supplied as text, naming the offending field on failure.
pub fn parse_decimal(field: &str, raw: &str) -> Result<BigDecimal, DomainError> {
    BigDecimal::from_str(raw.trim()).map_err(|e| {
        DomainError::InvalidInput(format!("{} must be a decimal, got '{}': {}", field, raw, e))
    })
}
