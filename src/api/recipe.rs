// Recipe endpoints
// Listing, CRUD, likes/favorites, search, comments

use serde_json::Value;

use crate::error::Result;
use crate::http_client::{ApiClient, RequestSpec};

/// Filters for the recipe list. All fields optional; unset ones stay off
/// the query string.
#[derive(Debug, Clone, Default)]
pub struct RecipeQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub search: Option<String>,
}

impl RecipeQuery {
    fn apply(&self, mut spec: RequestSpec) -> RequestSpec {
        if let Some(page) = self.page {
            spec = spec.query("page", page);
        }
        if let Some(page_size) = self.page_size {
            spec = spec.query("page_size", page_size);
        }
        if let Some(category) = &self.category {
            spec = spec.query("category", category);
        }
        if let Some(difficulty) = &self.difficulty {
            spec = spec.query("difficulty", difficulty);
        }
        if let Some(search) = &self.search {
            spec = spec.query("search", search);
        }
        spec
    }
}

/// Browse recipes. Public endpoint.
pub async fn recipe_list(client: &ApiClient, query: &RecipeQuery) -> Result<Value> {
    client
        .send(query.apply(RequestSpec::get("/recipe/")).no_auth())
        .await
}

pub async fn recipe_detail(client: &ApiClient, id: u64) -> Result<Value> {
    client
        .send(RequestSpec::get(&format!("/recipe/{}/", id)))
        .await
}

pub async fn create_recipe(client: &ApiClient, data: Value) -> Result<Value> {
    client.send(RequestSpec::post("/recipe/").json(data)).await
}

pub async fn update_recipe(client: &ApiClient, id: u64, data: Value) -> Result<Value> {
    client
        .send(RequestSpec::put(&format!("/recipe/{}/update/", id)).json(data))
        .await
}

pub async fn delete_recipe(client: &ApiClient, id: u64) -> Result<Value> {
    client
        .send(RequestSpec::delete(&format!("/recipe/{}/delete/", id)))
        .await
}

pub async fn like_recipe(client: &ApiClient, id: u64) -> Result<Value> {
    client
        .send(RequestSpec::post(&format!("/recipe/{}/like/", id)))
        .await
}

pub async fn favorite_recipe(client: &ApiClient, id: u64) -> Result<Value> {
    client
        .send(RequestSpec::post(&format!("/recipe/{}/favorite/", id)))
        .await
}

pub async fn my_recipes(client: &ApiClient) -> Result<Value> {
    client.send(RequestSpec::get("/recipe/my-recipes/")).await
}

pub async fn favorites(client: &ApiClient) -> Result<Value> {
    client.send(RequestSpec::get("/recipe/favorites/")).await
}

pub async fn liked(client: &ApiClient, page: Option<u32>) -> Result<Value> {
    let mut spec = RequestSpec::get("/recipe/liked/");
    if let Some(page) = page {
        spec = spec.query("page", page);
    }
    client.send(spec).await
}

/// Keyword search over recipes. Public endpoint.
pub async fn search_recipes(client: &ApiClient, keyword: &str, page: Option<u32>) -> Result<Value> {
    let mut spec = RequestSpec::get("/recipe/").query("search", keyword);
    if let Some(page) = page {
        spec = spec.query("page", page);
    }
    client.send(spec.no_auth()).await
}

/// Comments on a recipe. Public endpoint.
pub async fn recipe_comments(client: &ApiClient, id: u64) -> Result<Value> {
    client
        .send(RequestSpec::get(&format!("/community/posts/{}/comments/", id)).no_auth())
        .await
}

pub async fn create_recipe_comment(client: &ApiClient, id: u64, data: Value) -> Result<Value> {
    client
        .send(RequestSpec::post(&format!("/community/posts/{}/comments/", id)).json(data))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_query_skips_unset_fields() {
        let query = RecipeQuery {
            page: Some(2),
            search: Some("soup".to_string()),
            ..Default::default()
        };
        let spec = query.apply(RequestSpec::get("/recipe/"));
        assert_eq!(
            spec.params,
            vec![
                ("page".to_string(), "2".to_string()),
                ("search".to_string(), "soup".to_string()),
            ]
        );
    }

    #[test]
    fn test_recipe_query_default_is_empty() {
        let spec = RecipeQuery::default().apply(RequestSpec::get("/recipe/"));
        assert!(spec.params.is_empty());
    }
}
