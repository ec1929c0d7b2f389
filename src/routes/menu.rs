use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::menu::MenuResponse,
    error::AppResult,
    response::ApiResponse,
    routes::params::MenuQuery,
    services::menu_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/menu", get(get_menu))
}

#[utoipa::path(
    get,
    path = "/api/menu",
    params(
        ("table_id" = Option<Uuid>, Query, description = "Table the QR code was scanned at")
    ),
    responses(
        (status = 200, description = "Aggregate menu view", body = ApiResponse<MenuResponse>),
        (status = 404, description = "Table not found"),
    ),
    tag = "Menu"
)]
pub async fn get_menu(
    State(state): State<AppState>,
    Query(query): Query<MenuQuery>,
) -> AppResult<Json<ApiResponse<MenuResponse>>> {
    let resp = menu_service::get_menu(&state, query.table_id).await?;
    Ok(Json(resp))
}
