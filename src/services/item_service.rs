use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::items::{CreateItemRequest, ItemList, UpdateItemRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Item, ItemCategory},
    response::{ApiResponse, Meta},
    routes::params::ItemQuery,
    state::AppState,
};

#[derive(Debug, FromRow)]
struct ItemRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    image_url: Option<String>,
    total_quantity: i32,
    available_quantity: i32,
    category: String,
    created_at: DateTime<Utc>,
}

/// Storefront catalog, ordered by name like the store page renders it.
pub async fn list_items(state: &AppState, query: ItemQuery) -> AppResult<ApiResponse<ItemList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let category = query.category.map(|c| c.as_str().to_string());

    let rows: Vec<ItemRow> = sqlx::query_as(
        r#"
        SELECT * FROM items
        WHERE ($1::text IS NULL OR category = $1)
        ORDER BY name
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(category.as_deref())
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM items WHERE ($1::text IS NULL OR category = $1)")
            .bind(category.as_deref())
            .fetch_one(&state.pool)
            .await?;

    let items = rows
        .into_iter()
        .map(item_from_row)
        .collect::<AppResult<Vec<_>>>()?;

    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success("Items", ItemList { items }, Some(meta)))
}

pub async fn get_item(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Item>> {
    let row: Option<ItemRow> = sqlx::query_as("SELECT * FROM items WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    match row {
        Some(row) => Ok(ApiResponse::success("Item", item_from_row(row)?, None)),
        None => Err(AppError::NotFound),
    }
}

/// New items start fully stocked: available mirrors total.
pub async fn create_item(
    state: &AppState,
    user: &AuthUser,
    payload: CreateItemRequest,
) -> AppResult<ApiResponse<Item>> {
    ensure_admin(user)?;

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    if payload.total_quantity < 0 {
        return Err(AppError::Validation(
            "total quantity cannot be negative".into(),
        ));
    }

    let row: ItemRow = sqlx::query_as(
        r#"
        INSERT INTO items (id, name, description, image_url, total_quantity, available_quantity, category)
        VALUES ($1, $2, $3, $4, $5, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(payload.description.as_deref().map(str::trim))
    .bind(payload.image_url.as_deref().map(str::trim))
    .bind(payload.total_quantity)
    .bind(payload.category.as_str())
    .fetch_one(&state.pool)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "item_create",
        Some("items"),
        Some(serde_json::json!({ "item_id": row.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Item created",
        item_from_row(row)?,
        Some(Meta::empty()),
    ))
}

/// Partial update. After merging, available is clamped so it never exceeds
/// total, which also covers an admin lowering total below current stock.
pub async fn update_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateItemRequest,
) -> AppResult<ApiResponse<Item>> {
    ensure_admin(user)?;

    let existing: Option<ItemRow> = sqlx::query_as("SELECT * FROM items WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    let existing = match existing {
        Some(row) => row,
        None => return Err(AppError::NotFound),
    };

    let name = payload.name.unwrap_or(existing.name);
    if name.trim().is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    let description = payload.description.or(existing.description);
    let image_url = payload.image_url.or(existing.image_url);
    let total_quantity = payload.total_quantity.unwrap_or(existing.total_quantity);
    let available_quantity = payload
        .available_quantity
        .unwrap_or(existing.available_quantity);
    let category = payload
        .category
        .map(|c| c.as_str().to_string())
        .unwrap_or(existing.category);

    if total_quantity < 0 {
        return Err(AppError::Validation(
            "total quantity cannot be negative".into(),
        ));
    }
    if available_quantity < 0 {
        return Err(AppError::Validation(
            "available quantity cannot be negative".into(),
        ));
    }
    let available_quantity = available_quantity.min(total_quantity);

    let row: ItemRow = sqlx::query_as(
        r#"
        UPDATE items
        SET name = $2, description = $3, image_url = $4,
            total_quantity = $5, available_quantity = $6, category = $7
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(name.trim())
    .bind(description)
    .bind(image_url)
    .bind(total_quantity)
    .bind(available_quantity)
    .bind(category)
    .fetch_one(&state.pool)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "item_update",
        Some("items"),
        Some(serde_json::json!({ "item_id": row.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Item updated",
        item_from_row(row)?,
        Some(Meta::empty()),
    ))
}

pub async fn delete_item(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let result = sqlx::query("DELETE FROM items WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "item_delete",
        Some("items"),
        Some(serde_json::json!({ "item_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Item deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn item_from_row(row: ItemRow) -> AppResult<Item> {
    let category = row
        .category
        .parse::<ItemCategory>()
        .map_err(|err| AppError::Internal(anyhow::anyhow!(err)))?;
    Ok(Item {
        id: row.id,
        name: row.name,
        description: row.description,
        image_url: row.image_url,
        total_quantity: row.total_quantity,
        available_quantity: row.available_quantity,
        category,
        created_at: row.created_at,
    })
}
