use serde::Deserialize;

/// Request body for creating or replacing a card.
#[derive(Debug, Deserialize)]
pub struct CardRequest {
    pub title: String,
    pub image: String,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    10
}
