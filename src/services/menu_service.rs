use sea_orm::{EntityTrait, QueryOrder};
use uuid::Uuid;

use crate::{
    dto::menu::{CategoryMenu, MenuResponse, ProductView, RestaurantInfo, TableInfo},
    entity::{
        categories::{Column as CategoryCol, Entity as Categories},
        products::Entity as Products,
        restaurant_tables::Entity as RestaurantTables,
        settings::Entity as Settings,
    },
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Join table + settings + categorized products into one read view.
/// No table id means a menu without table context, not an error; a
/// missing settings row just omits the restaurant block.
pub async fn get_menu(
    state: &AppState,
    table_id: Option<Uuid>,
) -> AppResult<ApiResponse<MenuResponse>> {
    let table = match table_id {
        Some(id) => {
            let table = RestaurantTables::find_by_id(id)
                .one(&state.orm)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Table not found: {id}")))?;
            Some(TableInfo {
                id: table.id,
                number: table.number,
            })
        }
        None => None,
    };

    let restaurant = Settings::find()
        .one(&state.orm)
        .await?
        .map(|settings| RestaurantInfo {
            name: settings.name,
            logo_url: settings.logo_url,
            address: settings.address,
            working_hours: settings.working_hours,
            facebook_url: settings.facebook_url,
            whatsapp_number: settings.whatsapp_number,
            phone_number: settings.phone_number,
        });

    let categories = Categories::find()
        .order_by_asc(CategoryCol::Id)
        .find_with_related(Products)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|(category, products)| CategoryMenu {
            id: category.id,
            name: category.name,
            products: products
                .into_iter()
                .map(|product| ProductView {
                    id: product.id,
                    name: product.name,
                    description: product.description,
                    image_url: product.image_url,
                    price: product.price,
                })
                .collect(),
        })
        .collect();

    let menu = MenuResponse {
        table,
        restaurant,
        categories,
    };
    Ok(ApiResponse::success("Menu", menu, Some(Meta::empty())))
}
