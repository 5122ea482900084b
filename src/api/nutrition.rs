// Nutrition diary endpoints

use serde_json::Value;

use crate::error::Result;
use crate::http_client::{ApiClient, RequestSpec};

/// Diary entries for a day (YYYY-MM-DD)
pub async fn diary_by_date(client: &ApiClient, date: &str) -> Result<Value> {
    client
        .send(RequestSpec::get("/nutrition/diary/").query("date", date))
        .await
}

pub async fn add_diary_record(client: &ApiClient, data: Value) -> Result<Value> {
    client
        .send(RequestSpec::post("/nutrition/diary/").json(data))
        .await
}

pub async fn delete_diary_record(client: &ApiClient, id: u64) -> Result<Value> {
    client
        .send(RequestSpec::delete(&format!("/nutrition/diary/{}/", id)))
        .await
}

/// Aggregated report over a period ("week" by default upstream)
pub async fn nutrition_report(client: &ApiClient, period: &str) -> Result<Value> {
    client
        .send(RequestSpec::get("/nutrition/report/").query("period", period))
        .await
}

pub async fn nutrition_advice(client: &ApiClient) -> Result<Value> {
    client.send(RequestSpec::get("/nutrition/advice/")).await
}
