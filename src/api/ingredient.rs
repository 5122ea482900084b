// Ingredient endpoints
// Catalog browsing, search, seasonal picks, AI recognition

use serde_json::{json, Value};

use crate::error::Result;
use crate::http_client::{ApiClient, RequestSpec};

/// Browse the ingredient catalog. Public endpoint.
pub async fn ingredient_list(
    client: &ApiClient,
    category: Option<&str>,
    page: Option<u32>,
) -> Result<Value> {
    let mut spec = RequestSpec::get("/ingredient/");
    if let Some(category) = category {
        spec = spec.query("category", category);
    }
    if let Some(page) = page {
        spec = spec.query("page", page);
    }
    client.send(spec.no_auth()).await
}

/// Public endpoint.
pub async fn ingredient_detail(client: &ApiClient, id: u64) -> Result<Value> {
    client
        .send(RequestSpec::get(&format!("/ingredient/{}/", id)).no_auth())
        .await
}

/// Keyword search over ingredients. Public endpoint.
pub async fn search_ingredients(client: &ApiClient, q: &str) -> Result<Value> {
    client
        .send(
            RequestSpec::get("/ingredient/search/")
                .query("q", q)
                .no_auth(),
        )
        .await
}

/// Ingredients in season for the given month (1-12), or the current month
/// when unset. Public endpoint.
pub async fn seasonal_ingredients(client: &ApiClient, month: Option<u32>) -> Result<Value> {
    let mut spec = RequestSpec::get("/ingredient/seasonal/");
    if let Some(month) = month {
        spec = spec.query("month", month);
    }
    client.send(spec.no_auth()).await
}

/// Recognize ingredients in a photo
pub async fn recognize_ingredient(client: &ApiClient, image_url: &str) -> Result<Value> {
    client
        .send(RequestSpec::post("/ingredient/recognize/").json(json!({"image_url": image_url})))
        .await
}

/// Nutrition facts for a quantity (grams) of an ingredient. Public endpoint.
pub async fn calculate_nutrition(
    client: &ApiClient,
    ingredient_id: u64,
    quantity: f64,
) -> Result<Value> {
    client
        .send(
            RequestSpec::post("/ingredient/nutrition-calculate/")
                .json(json!({"ingredient_id": ingredient_id, "quantity": quantity}))
                .no_auth(),
        )
        .await
}
