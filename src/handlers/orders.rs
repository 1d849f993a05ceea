use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::order_service::DynOrderService;
use crate::domain::errors::DomainError;
use crate::domain::order::{parse_decimal, CreateOrderInput, Item, Order};
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

/// A decimal given either as a JSON number (`10.0`) or a string (`"10.0"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DecimalValue {
    Number(serde_json::Number),
    Text(String),
}

impl DecimalValue {
    fn parse(&self, field: &str) -> Result<bigdecimal::BigDecimal, DomainError> {
        match self {
            DecimalValue::Number(n) => parse_decimal(field, &n.to_string()),
            DecimalValue::Text(s) => parse_decimal(field, s),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ItemRequest {
    pub product: String,
    pub quantity: i32,
    #[schema(value_type = String, example = "10.0")]
    pub price: DecimalValue,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    /// Generated when omitted.
    pub id: Option<String>,
    pub customer: String,
    pub email: String,
    pub items: Vec<ItemRequest>,
    #[schema(value_type = String, example = "20.0")]
    pub total: DecimalValue,
    /// One of `pending`, `approved`, `cancelled`. Defaults to `pending`.
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CreateOrderRequest {
    fn into_input(self) -> Result<CreateOrderInput, DomainError> {
        let items = self
            .items
            .into_iter()
            .enumerate()
            .map(|(idx, i)| {
                Ok(Item {
                    price: i.price.parse(&format!("items[{}].price", idx))?,
                    product: i.product,
                    quantity: i.quantity,
                })
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        Ok(CreateOrderInput {
            id: self.id,
            customer: self.customer,
            email: self.email,
            items,
            total: self.total.parse("total")?,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub id: String,
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemResponse {
    pub product: String,
    pub quantity: i32,
    pub price: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: String,
    pub customer: String,
    pub email: String,
    pub items: Vec<ItemResponse>,
    pub total: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            customer: o.customer,
            email: o.email,
            items: o
                .items
                .into_iter()
                .map(|i| ItemResponse {
                    product: i.product,
                    quantity: i.quantity,
                    price: i.price.to_string(),
                })
                .collect(),
            total: o.total.to_string(),
            status: o.status.to_string(),
            created_at: o.created_at.to_rfc3339(),
            updated_at: o.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderEnvelope {
    pub order: OrderResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderListResponse {
    pub orders: Vec<OrderResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UpdateStatusParams {
    /// New status: `pending`, `approved` or `cancelled`.
    pub status: String,
}

// ── Routing ──────────────────────────────────────────────────────────────────

/// Register the `/pedidos` routes and the extractor configs that turn
/// malformed bodies and query strings into JSON 400 responses.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::scope("/pedidos")
            .service(
                web::resource(["", "/"])
                    .route(web::post().to(create_order))
                    .route(web::get().to(list_orders)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_order))
                    .route(web::put().to(update_order_status))
                    .route(web::delete().to(delete_order)),
            ),
    );
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /pedidos/
///
/// Validates the payload, fills in the id, status and timestamps when they
/// are missing, and stores the order.
#[utoipa::path(
    post,
    path = "/pedidos/",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created successfully", body = CreateOrderResponse),
        (status = 400, description = "Invalid email, status, id, item or timestamp"),
        (status = 409, description = "An order with this id already exists"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    service: web::Data<DynOrderService>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner().into_input()?;

    let id = web::block(move || service.create_order(input)).await??;

    Ok(HttpResponse::Created().json(CreateOrderResponse {
        id,
        message: "Order created successfully".to_string(),
    }))
}

/// GET /pedidos/
///
/// Returns every stored order, unpaginated.
#[utoipa::path(
    get,
    path = "/pedidos/",
    responses(
        (status = 200, description = "All orders", body = OrderListResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_orders(service: web::Data<DynOrderService>) -> Result<HttpResponse, AppError> {
    let orders = web::block(move || service.list_orders()).await??;

    Ok(HttpResponse::Ok().json(OrderListResponse {
        orders: orders.into_iter().map(OrderResponse::from).collect(),
    }))
}

/// GET /pedidos/{id}
#[utoipa::path(
    get,
    path = "/pedidos/{id}",
    params(
        ("id" = String, Path, description = "Order id"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderEnvelope),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order(
    service: web::Data<DynOrderService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    let order = web::block(move || service.get_order(&id)).await??;

    Ok(HttpResponse::Ok().json(OrderEnvelope {
        order: order.into(),
    }))
}

/// PUT /pedidos/{id}?status=...
#[utoipa::path(
    put,
    path = "/pedidos/{id}",
    params(
        ("id" = String, Path, description = "Order id"),
        UpdateStatusParams,
    ),
    responses(
        (status = 200, description = "Status updated", body = MessageResponse),
        (status = 400, description = "Missing or invalid status"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    service: web::Data<DynOrderService>,
    path: web::Path<String>,
    query: web::Query<UpdateStatusParams>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let status = query.into_inner().status;

    web::block(move || service.update_status(&id, &status)).await??;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Order updated successfully".to_string(),
    }))
}

/// DELETE /pedidos/{id}
#[utoipa::path(
    delete,
    path = "/pedidos/{id}",
    params(
        ("id" = String, Path, description = "Order id"),
    ),
    responses(
        (status = 200, description = "Order deleted", body = MessageResponse),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn delete_order(
    service: web::Data<DynOrderService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();

    web::block(move || service.delete_order(&id)).await??;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Order deleted successfully".to_string(),
    }))
}
