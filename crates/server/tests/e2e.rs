use std::net::SocketAddr;

use configs::{AppConfig, DatabaseConfig};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

struct TestApp {
    base_url: String,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let cfg = AppConfig {
        database: DatabaseConfig {
            url: "sqlite::memory:".into(),
            max_connections: 1,
            min_connections: 1,
            ..DatabaseConfig::default()
        },
        ..AppConfig::default()
    };
    let app = server::startup::build_app(&cfg).await?;

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url })
}

#[tokio::test]
async fn e2e_organization_lifecycle() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = reqwest::Client::new();

    let res = c.get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c
        .post(format!("{}/organizations", app.base_url))
        .json(&json!({"name": "Harbor Pilates", "businessType": "PILATES_STUDIO", "email": "Front@Harbor.example"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let org = res.json::<Value>().await?;
    assert_eq!(org["email"], "front@harbor.example");
    let org_id = org["id"].as_str().unwrap_or_default().to_string();

    let res = c
        .patch(format!("{}/organizations/{org_id}", app.base_url))
        .json(&json!({"description": "Reformer classes", "subscriptionTier": "BASIC"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let patched = res.json::<Value>().await?;
    assert_eq!(patched["description"], "Reformer classes");
    assert_eq!(patched["subscriptionTier"], "BASIC");

    let res = c
        .get(format!("{}/organizations?search=harbor&businessType=PILATES_STUDIO", app.base_url))
        .send()
        .await?;
    let page = res.json::<Value>().await?;
    assert_eq!(page["total"], 1);

    let res = c.delete(format!("{}/organizations/{org_id}", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    // inactive organizations take no new locations
    let res = c
        .post(format!("{}/organizations/{org_id}/locations", app.base_url))
        .json(&json!({"name": "Late", "address": "9 Pier", "city": "Boston"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}
