use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Card {
    pub id: i64,
    pub title: String,
    pub image: String,
}

pub async fn list(db: &PgPool, skip: i64, limit: i64) -> anyhow::Result<Vec<Card>> {
    let rows = sqlx::query_as::<_, Card>(
        r#"
        SELECT id, title, image
        FROM cards
        ORDER BY id
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(skip)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn get(db: &PgPool, card_id: i64) -> anyhow::Result<Option<Card>> {
    let card = sqlx::query_as::<_, Card>(
        r#"
        SELECT id, title, image
        FROM cards
        WHERE id = $1
        "#,
    )
    .bind(card_id)
    .fetch_optional(db)
    .await?;
    Ok(card)
}

pub async fn create(db: &PgPool, title: &str, image: &str) -> anyhow::Result<Card> {
    let card = sqlx::query_as::<_, Card>(
        r#"
        INSERT INTO cards (title, image)
        VALUES ($1, $2)
        RETURNING id, title, image
        "#,
    )
    .bind(title)
    .bind(image)
    .fetch_one(db)
    .await?;
    Ok(card)
}

pub async fn update(
    db: &PgPool,
    card_id: i64,
    title: &str,
    image: &str,
) -> anyhow::Result<Option<Card>> {
    let card = sqlx::query_as::<_, Card>(
        r#"
        UPDATE cards
        SET title = $2, image = $3
        WHERE id = $1
        RETURNING id, title, image
        "#,
    )
    .bind(card_id)
    .bind(title)
    .bind(image)
    .fetch_optional(db)
    .await?;
    Ok(card)
}

pub async fn delete(db: &PgPool, card_id: i64) -> anyhow::Result<Option<Card>> {
    let card = sqlx::query_as::<_, Card>(
        r#"
        DELETE FROM cards
        WHERE id = $1
        RETURNING id, title, image
        "#,
    )
    .bind(card_id)
    .fetch_optional(db)
    .await?;
    Ok(card)
}
