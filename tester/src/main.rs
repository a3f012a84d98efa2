use reqwest::Client;
use serde_json::{json, Value};

const BASE: &str = "http://localhost:1111";

/// Fires one of each form submission at a locally running server.
#[tokio::main]
async fn main() {
    let client = Client::new();

    let quote = json!({
        "name": "Test Buyer",
        "email": "buyer@example.com",
        "quantity": 150,
        "company": "Obras Norte",
        "product": "glove-pro-5",
        "message": "Need a bulk offer for next month."
    });

    post(&client, "/api/quotes", &quote).await;
    post(&client, "/api/newsletter", &json!({ "email": "buyer@example.com" })).await;
    post(&client, "/api/chat", &json!({ "message": "Do you ship to Portugal?" })).await;
}

async fn post(client: &Client, path: &str, payload: &Value) {
    match client.post(format!("{BASE}{path}")).json(payload).send().await {
        Ok(response) => {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            println!("{path}: {status} {body}");
        }
        Err(e) => println!("{path}: request failed: {e}"),
    }
}
