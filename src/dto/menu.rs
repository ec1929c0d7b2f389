use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Aggregate read view served to a client that scanned a table QR code.
#[derive(Debug, Serialize, ToSchema)]
pub struct MenuResponse {
    pub table: Option<TableInfo>,
    pub restaurant: Option<RestaurantInfo>,
    pub categories: Vec<CategoryMenu>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TableInfo {
    pub id: Uuid,
    pub number: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RestaurantInfo {
    pub name: String,
    pub logo_url: Option<String>,
    pub address: Option<String>,
    pub working_hours: Option<String>,
    pub facebook_url: Option<String>,
    pub whatsapp_number: Option<String>,
    pub phone_number: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryMenu {
    pub id: Uuid,
    pub name: String,
    pub products: Vec<ProductView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductView {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub price: Decimal,
}
