use qr_ordering_api::{
    db::{create_orm_conn, create_pool, run_migrations},
    entity::{
        categories::ActiveModel as CategoryActive, products::ActiveModel as ProductActive,
        restaurant_tables::ActiveModel as TableActive, settings::ActiveModel as SettingsActive,
    },
    error::AppError,
    services::menu_service,
    state::AppState,
};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use uuid::Uuid;

fn dec(s: &str) -> Decimal {
    s.parse().expect("decimal literal")
}

// Aggregate view: table + restaurant info + categorized products.
#[tokio::test]
async fn menu_aggregate_view() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let starters_id = create_category(&state, "Starters").await?;
    let drinks_id = create_category(&state, "Drinks").await?;
    create_product(&state, starters_id, "Spring Rolls", "6.50").await?;
    create_product(&state, drinks_id, "Lemonade", "3.20").await?;
    create_product(&state, drinks_id, "Espresso", "2.10").await?;

    let table_id = create_table(&state, 7).await?;

    // No settings row yet: restaurant info is omitted, not an error.
    let menu = menu_service::get_menu(&state, None).await?;
    let menu = menu.data.expect("menu response");
    assert!(menu.table.is_none());
    assert!(menu.restaurant.is_none());
    assert_eq!(menu.categories.len(), 2);

    // Categories come back ordered by id ascending, products intact.
    let mut expected = [starters_id, drinks_id];
    expected.sort();
    let got: Vec<Uuid> = menu.categories.iter().map(|c| c.id).collect();
    assert_eq!(got, expected);

    let drinks = menu
        .categories
        .iter()
        .find(|c| c.id == drinks_id)
        .expect("drinks category");
    assert_eq!(drinks.name, "Drinks");
    assert_eq!(drinks.products.len(), 2);
    assert!(drinks
        .products
        .iter()
        .any(|p| p.name == "Lemonade" && p.price == dec("3.20")));

    // With settings present the restaurant block appears.
    SettingsActive {
        id: Set(Uuid::new_v4()),
        name: Set("QR Code Restaurant".into()),
        logo_url: Set(Some("https://example.com/logo.png".into())),
        address: Set(Some("123 Main Street".into())),
        working_hours: Set(Some("Mon-Sun 10:00-22:00".into())),
        about_image_url: Set(None),
        about_description: Set(None),
        terms_and_conditions: Set(None),
        facebook_url: Set(None),
        whatsapp_number: Set(None),
        phone_number: Set(Some("+1234567890".into())),
        second_phone_number: Set(None),
    }
    .insert(&state.orm)
    .await?;

    let menu = menu_service::get_menu(&state, Some(table_id)).await?;
    let menu = menu.data.expect("menu response");
    let table = menu.table.expect("table info");
    assert_eq!(table.id, table_id);
    assert_eq!(table.number, 7);
    let restaurant = menu.restaurant.expect("restaurant info");
    assert_eq!(restaurant.name, "QR Code Restaurant");
    assert_eq!(restaurant.phone_number.as_deref(), Some("+1234567890"));

    // Unknown table id is an error, unlike a missing one.
    let err = menu_service::get_menu(&state, Some(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "unknown table: {err}");

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE order_status_changes, order_items, orders, products, categories, restaurant_tables, settings, audit_logs, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    Ok(AppState { pool, orm })
}

async fn create_category(state: &AppState, name: &str) -> anyhow::Result<Uuid> {
    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
    }
    .insert(&state.orm)
    .await?;
    Ok(category.id)
}

async fn create_product(
    state: &AppState,
    category_id: Uuid,
    name: &str,
    price: &str,
) -> anyhow::Result<Uuid> {
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(None),
        price: Set(dec(price)),
        image_url: Set(None),
        category_id: Set(category_id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(product.id)
}

async fn create_table(state: &AppState, number: i32) -> anyhow::Result<Uuid> {
    let table = TableActive {
        id: Set(Uuid::new_v4()),
        number: Set(number),
        qr_code_url: Set(Some(format!("https://example.com/qr/table/{number}"))),
    }
    .insert(&state.orm)
    .await?;
    Ok(table.id)
}
