use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{AuthResponse, LoginRequest, RegisterRequest},
        menu::{CategoryMenu, MenuResponse, ProductView, RestaurantInfo, TableInfo},
        orders::{
            CreateOrderRequest, OrderItemRequest, OrderItemResponse, OrderList, OrderResponse,
            UpdateOrderStatusRequest,
        },
    },
    models::{OrderStatus, Role},
    response::{ApiResponse, Meta},
    routes::{auth, health, menu, orders, params},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::register,
        auth::login,
        menu::get_menu,
        orders::create_order,
        orders::list_orders,
        orders::get_order,
        orders::update_order_status,
    ),
    components(
        schemas(
            Role,
            OrderStatus,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            MenuResponse,
            TableInfo,
            RestaurantInfo,
            CategoryMenu,
            ProductView,
            CreateOrderRequest,
            OrderItemRequest,
            UpdateOrderStatusRequest,
            OrderResponse,
            OrderItemResponse,
            OrderList,
            params::SortOrder,
            params::OrderListQuery,
            Meta,
            ApiResponse<AuthResponse>,
            ApiResponse<MenuResponse>,
            ApiResponse<OrderResponse>,
            ApiResponse<OrderList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Menu", description = "Aggregate menu view"),
        (name = "Orders", description = "Order lifecycle endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
