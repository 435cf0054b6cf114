use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use event_items_api::{config::AppConfig, db::create_pool};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "events@vellummortgage.com", "admin123", true).await?;
    seed_items(&pool).await?;
    seed_templates(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    is_admin: bool,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let row: (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, is_admin)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET is_admin = EXCLUDED.is_admin
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(is_admin)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (admin={is_admin})");
    Ok(row.0)
}

async fn seed_items(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let items = vec![
        (
            "Step and Repeat Banner",
            "8x8 backdrop banner with stand",
            2,
            "signage",
        ),
        (
            "Branded Table Runner",
            "Fits standard 6ft folding table",
            6,
            "signage",
        ),
        ("Engraved Travel Mug", "20 oz insulated mug", 24, "drinkware"),
        ("Event Polo Shirt", "Unisex, assorted sizes", 40, "apparel"),
        ("Tri-fold Brochure Pack", "Box of 250", 10, "print"),
        ("Sticker Pack", "Assorted die-cut stickers", 100, "giveaway"),
    ];

    for (name, desc, quantity, category) in items {
        sqlx::query(
            r#"
            INSERT INTO items (id, name, description, total_quantity, available_quantity, category)
            VALUES ($1, $2, $3, $4, $4, $5)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(desc)
        .bind(quantity)
        .bind(category)
        .execute(pool)
        .await?;
    }

    println!("Seeded items");
    Ok(())
}

async fn seed_templates(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let defaults = [
        (
            "order_notification",
            "New event item order from {{userName}}",
            "<p>{{userName}} ({{userEmail}}) placed an order.</p>\
             <p>Items: {{items}}</p>\
             <p>Pickup: {{pickupDate}} &mdash; Return: {{returnDate}}</p>",
        ),
        (
            "user_confirmation",
            "Your event item request was received",
            "<p>Hi {{userName}},</p>\
             <p>We received your request: {{items}}.</p>\
             <p>Pickup: {{pickupDate}} &mdash; Return: {{returnDate}}</p>\
             <p><a href=\"{{storeLink}}\">View the store</a></p>",
        ),
        (
            "pickup_confirmation",
            "Your event items were picked up",
            "<p>Hi {{userName}}, your order was picked up on {{pickupDate}}.</p>",
        ),
        (
            "return_confirmation",
            "Thanks for returning your event items",
            "<p>Hi {{userName}}, we received your return. Thanks!</p>",
        ),
        (
            "cancel_confirmation",
            "Your event item order was cancelled",
            "<p>Hi {{userName}}, your order has been cancelled.</p>",
        ),
        (
            "wishlist_available_notification",
            "Good news: {{itemName}} is now reserved for you",
            "<p>Hi {{userName}},</p>\
             <p>{{fulfilledQuantity}} x {{itemName}} from your wishlist is now part of your order.</p>\
             <p><a href=\"{{storeLink}}\">View the store</a></p>",
        ),
        (
            "calendar_invite",
            "Reminder: {{eventTitle}} on {{eventDate}}",
            "<p>Hi {{userName}}, this is a reminder for {{eventTitle}} on {{eventDate}}.</p>\
             <p>A calendar file is attached.</p>",
        ),
    ];

    for (template_id, subject, body_html) in defaults {
        sqlx::query(
            r#"
            INSERT INTO email_templates (template_id, subject, body_html)
            VALUES ($1, $2, $3)
            ON CONFLICT (template_id) DO NOTHING
            "#,
        )
        .bind(template_id)
        .bind(subject)
        .bind(body_html)
        .execute(pool)
        .await?;
    }

    println!("Seeded email templates");
    Ok(())
}
