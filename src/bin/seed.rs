use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use qr_ordering_api::{config::AppConfig, db::create_pool};
use rust_decimal::Decimal;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    ensure_user(
        &pool,
        "System Administrator",
        "admin@qrlocator.com",
        "+1234567890",
        "Admin@123",
        "ADMIN",
    )
    .await?;
    ensure_user(
        &pool,
        "John Cashier",
        "cashier@qrlocator.com",
        "+1234567891",
        "Cashier@123",
        "CASHIER",
    )
    .await?;
    ensure_user(
        &pool,
        "Alice Customer",
        "alice@example.com",
        "+1234567892",
        "Customer@123",
        "CUSTOMER",
    )
    .await?;

    seed_tables(&pool).await?;
    seed_catalog(&pool).await?;
    seed_settings(&pool).await?;

    println!("Seed completed");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    name: &str,
    email: &str,
    phone: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, name, email, phone, password_hash, role)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email)
    .bind(phone)
    .bind(password_hash)
    .bind(role)
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_tables(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    for number in 1..=10 {
        sqlx::query(
            r#"
            INSERT INTO restaurant_tables (id, number, qr_code_url)
            VALUES ($1, $2, $3)
            ON CONFLICT (number) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(number)
        .bind(format!("https://example.com/qr/table/{number}"))
        .execute(pool)
        .await?;
    }

    println!("Seeded tables");
    Ok(())
}

async fn seed_catalog(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let categories = [
        "Appetizers",
        "Main Courses",
        "Desserts",
        "Beverages",
        "Salads",
    ];
    for name in categories {
        sqlx::query(
            r#"
            INSERT INTO categories (id, name)
            VALUES ($1, $2)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .execute(pool)
        .await?;
    }

    let products = [
        ("Chicken Wings", "Spicy buffalo wings with ranch dip", "12.99", "Appetizers"),
        ("Mozzarella Sticks", "Crispy mozzarella with marinara sauce", "8.99", "Appetizers"),
        ("Grilled Chicken", "Herb-seasoned grilled chicken breast", "18.99", "Main Courses"),
        ("Beef Burger", "Juicy beef patty with lettuce and tomato", "15.99", "Main Courses"),
        ("Fish & Chips", "Beer-battered fish with crispy fries", "16.99", "Main Courses"),
        ("Chocolate Cake", "Rich chocolate layer cake", "6.99", "Desserts"),
        ("Ice Cream", "Vanilla ice cream with chocolate sauce", "4.99", "Desserts"),
        ("Coca Cola", "Classic soft drink", "2.99", "Beverages"),
        ("Fresh Orange Juice", "Freshly squeezed orange juice", "3.99", "Beverages"),
        ("Coffee", "Premium roasted coffee", "2.49", "Beverages"),
    ];

    for (name, description, price, category) in products {
        let price: Decimal = price.parse()?;
        let image_url = format!(
            "https://example.com/images/{}.jpg",
            name.to_lowercase().replace(' ', "-")
        );
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, image_url, category_id)
            SELECT $1, $2, $3, $4, $5, c.id FROM categories c WHERE c.name = $6
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(image_url)
        .bind(category)
        .execute(pool)
        .await?;
    }

    println!("Seeded catalog");
    Ok(())
}

async fn seed_settings(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (
            id, name, logo_url, address, working_hours,
            about_description, terms_and_conditions,
            facebook_url, whatsapp_number, phone_number, second_phone_number
        )
        SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11
        WHERE NOT EXISTS (SELECT 1 FROM settings)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind("QR Code Restaurant")
    .bind("https://example.com/images/logo.png")
    .bind("123 Main Street, City, State 12345")
    .bind("Mon-Sun 10:00-22:00")
    .bind("Family restaurant serving fresh food since 2010.")
    .bind("All orders are final once delivered.")
    .bind("https://facebook.com/qrcoderestaurant")
    .bind("+1234567890")
    .bind("+1234567890")
    .bind("+1234567891")
    .execute(pool)
    .await?;

    println!("Seeded settings");
    Ok(())
}
