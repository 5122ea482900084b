// Shopping list endpoints

use serde_json::{json, Value};

use crate::error::Result;
use crate::http_client::{ApiClient, RequestSpec};

pub async fn shopping_list(client: &ApiClient) -> Result<Value> {
    client.send(RequestSpec::get("/shopping-list/")).await
}

/// Add an ingredient to the list
pub async fn add_shopping_item(
    client: &ApiClient,
    ingredient: u64,
    quantity: f64,
    unit: &str,
) -> Result<Value> {
    client
        .send(RequestSpec::post("/shopping-list/").json(json!({
            "ingredient": ingredient,
            "quantity": quantity,
            "unit": unit,
        })))
        .await
}

/// Partial update of a list item (e.g. mark purchased)
pub async fn update_shopping_item(client: &ApiClient, id: u64, data: Value) -> Result<Value> {
    client
        .send(RequestSpec::patch(&format!("/shopping-list/{}/", id)).json(data))
        .await
}

pub async fn delete_shopping_item(client: &ApiClient, id: u64) -> Result<Value> {
    client
        .send(RequestSpec::delete(&format!("/shopping-list/{}/", id)))
        .await
}

/// Add every ingredient of a recipe to the list; existing items accumulate
pub async fn generate_shopping_list(client: &ApiClient, recipe_id: u64) -> Result<Value> {
    client
        .send(RequestSpec::post("/shopping-list/generate/").json(json!({"recipe_id": recipe_id})))
        .await
}
