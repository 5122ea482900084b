// Community feed endpoints

use serde_json::Value;

use crate::error::Result;
use crate::http_client::{ApiClient, RequestSpec};

/// Feed of community posts. Public endpoint.
pub async fn post_list(client: &ApiClient, page: Option<u32>, page_size: Option<u32>) -> Result<Value> {
    let mut spec = RequestSpec::get("/community/posts/");
    if let Some(page) = page {
        spec = spec.query("page", page);
    }
    if let Some(page_size) = page_size {
        spec = spec.query("page_size", page_size);
    }
    client.send(spec.no_auth()).await
}

/// Public endpoint.
pub async fn post_detail(client: &ApiClient, id: u64) -> Result<Value> {
    client
        .send(RequestSpec::get(&format!("/community/posts/{}/", id)).no_auth())
        .await
}

/// Publish a post: content, image URLs, optional linked recipe id
pub async fn create_post(client: &ApiClient, data: Value) -> Result<Value> {
    client
        .send(RequestSpec::post("/community/posts/").json(data))
        .await
}

pub async fn like_post(client: &ApiClient, id: u64) -> Result<Value> {
    client
        .send(RequestSpec::post(&format!("/community/posts/{}/like/", id)))
        .await
}

/// Public endpoint.
pub async fn post_comments(client: &ApiClient, id: u64) -> Result<Value> {
    client
        .send(RequestSpec::get(&format!("/community/posts/{}/comments/", id)).no_auth())
        .await
}

/// Comment on a post; `parent` in the body threads a reply
pub async fn create_post_comment(client: &ApiClient, id: u64, data: Value) -> Result<Value> {
    client
        .send(RequestSpec::post(&format!("/community/posts/{}/comments/", id)).json(data))
        .await
}
