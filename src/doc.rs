//! OpenAPI document for the `/pedidos` API, served alongside Swagger UI.

use utoipa::OpenApi;

use crate::handlers::orders::{
    CreateOrderRequest, CreateOrderResponse, ItemRequest, ItemResponse, MessageResponse,
    OrderEnvelope, OrderListResponse, OrderResponse,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pedidos service API",
        description = "Create, list, fetch, update the status of, and delete orders."
    ),
    paths(
        crate::handlers::orders::create_order,
        crate::handlers::orders::list_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::update_order_status,
        crate::handlers::orders::delete_order,
    ),
    components(schemas(
        CreateOrderRequest,
        ItemRequest,
        CreateOrderResponse,
        OrderEnvelope,
        OrderListResponse,
        OrderResponse,
        ItemResponse,
        MessageResponse,
    )),
    tags((name = "orders", description = "Order management"))
)]
pub struct ApiDoc;
