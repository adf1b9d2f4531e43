use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use common::types::ServiceKind;
use models::{Product, ProductField, ProductId};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::json;
use service::product::{repo::memory::RepoCall, InMemoryProductRepository};
use tokio::net::TcpListener;

use server::routes;

struct TestApp {
    base_url: String,
    repo: Arc<InMemoryProductRepository>,
}

async fn start_server(kind: ServiceKind) -> anyhow::Result<TestApp> {
    let repo = Arc::new(InMemoryProductRepository::new());
    let app: Router = routes::build_router(kind, Arc::clone(&repo));
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, repo })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn health_is_plain_text_for_every_service() -> anyhow::Result<()> {
    for kind in ServiceKind::ALL {
        let app = start_server(kind).await?;
        // store outage does not affect health
        app.repo.fail_with("error de conexión");
        let res = client().get(format!("{}/health", app.base_url)).send().await?;
        assert_eq!(res.status(), HttpStatusCode::OK);
        assert!(res.headers()["content-type"].to_str()?.starts_with("text/plain"));
        assert_eq!(res.text().await?, kind.health_message());
    }
    Ok(())
}

#[tokio::test]
async fn create_returns_201_and_echoes_product() -> anyhow::Result<()> {
    let app = start_server(ServiceKind::Create).await?;
    let body = json!({"name": "Laptop", "description": "High performance laptop", "price": 1500.0, "stock": 10});

    let res = client().post(format!("{}/products", app.base_url)).json(&body).send().await?;

    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let echoed = res.json::<serde_json::Value>().await?;
    assert_eq!(echoed, body);
    assert_eq!(app.repo.len().await, 1);
    Ok(())
}

#[tokio::test]
async fn create_drops_client_supplied_id() -> anyhow::Result<()> {
    let app = start_server(ServiceKind::Create).await?;
    let client_id = ProductId::generate();
    let body = json!({"_id": client_id.to_hex(), "name": "Mouse", "description": "", "price": 25.0, "stock": 50});

    let res = client().post(format!("{}/products", app.base_url)).json(&body).send().await?;

    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let echoed = res.json::<serde_json::Value>().await?;
    assert!(echoed.get("_id").is_none());
    assert!(echoed.get("id").is_none());
    assert_eq!(echoed["name"], "Mouse");
    match app.repo.calls().as_slice() {
        [RepoCall::Create(p)] => assert_eq!(p.id, None),
        other => panic!("unexpected calls: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn create_rejects_malformed_json_without_store_call() -> anyhow::Result<()> {
    let app = start_server(ServiceKind::Create).await?;

    let res = client()
        .post(format!("{}/products", app.base_url))
        .header("content-type", "application/json")
        .body("{\"name\": ")
        .send()
        .await?;

    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let err = res.json::<serde_json::Value>().await?;
    assert!(err["detail"].as_str().unwrap_or_default().starts_with("invalid json"));
    assert!(app.repo.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn create_store_error_is_500_with_message() -> anyhow::Result<()> {
    let app = start_server(ServiceKind::Create).await?;
    app.repo.fail_with("precio no puede ser negativo");

    let res = client()
        .post(format!("{}/products", app.base_url))
        .json(&json!({"name": "Invalid Product", "price": -100.0, "stock": 5}))
        .send()
        .await?;

    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    let err = res.json::<serde_json::Value>().await?;
    assert!(err["detail"].as_str().unwrap_or_default().contains("precio no puede ser negativo"));
    Ok(())
}

#[tokio::test]
async fn wrong_method_is_405() -> anyhow::Result<()> {
    let app = start_server(ServiceKind::Create).await?;
    let res = client().get(format!("{}/products", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::METHOD_NOT_ALLOWED);

    let app = start_server(ServiceKind::Delete).await?;
    let res = client()
        .put(format!("{}/products/{}", app.base_url, ProductId::generate()))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::METHOD_NOT_ALLOWED);
    Ok(())
}

#[tokio::test]
async fn read_empty_store_returns_empty_array() -> anyhow::Result<()> {
    let app = start_server(ServiceKind::Read).await?;
    let res = client().get(format!("{}/products", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.text().await?, "[]");
    Ok(())
}

#[tokio::test]
async fn read_lists_products_with_ids() -> anyhow::Result<()> {
    let app = start_server(ServiceKind::Read).await?;
    let ids = app.repo.seed([Product::new("Laptop", "a", 1500.0, 2), Product::new("Mouse", "b", 25.0, 1)]).await;

    let res = client().get(format!("{}/products", app.base_url)).send().await?;

    assert_eq!(res.status(), HttpStatusCode::OK);
    let products = res.json::<Vec<Product>>().await?;
    assert_eq!(products.len(), 2);
    for id in ids {
        assert!(products.iter().any(|p| p.id == Some(id)));
    }
    Ok(())
}

#[tokio::test]
async fn read_store_error_is_500() -> anyhow::Result<()> {
    let app = start_server(ServiceKind::Read).await?;
    app.repo.fail_with("timeout de conexión");
    let res = client().get(format!("{}/products", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    Ok(())
}

#[tokio::test]
async fn update_applies_partial_fields() -> anyhow::Result<()> {
    let app = start_server(ServiceKind::Update).await?;
    let ids = app.repo.seed([Product::new("Laptop", "old", 1500.0, 10)]).await;

    let res = client()
        .put(format!("{}/products/{}", app.base_url, ids[0]))
        .json(&json!({"name": "", "description": "Only description updated"}))
        .send()
        .await?;

    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<serde_json::Value>().await?, json!({"status": "updated"}));
    let stored = app.repo.get(&ids[0]).await.expect("still stored");
    assert_eq!(stored.name, "Laptop");
    assert_eq!(stored.description, "Only description updated");
    Ok(())
}

#[tokio::test]
async fn update_missing_description_clears_it() -> anyhow::Result<()> {
    let app = start_server(ServiceKind::Update).await?;
    let ids = app.repo.seed([Product::new("Laptop", "old", 1500.0, 10)]).await;

    let res = client()
        .put(format!("{}/products/{}", app.base_url, ids[0]))
        .json(&json!({"name": "Laptop Pro"}))
        .send()
        .await?;

    assert_eq!(res.status(), HttpStatusCode::OK);
    match app.repo.calls().as_slice() {
        [RepoCall::UpdateById(id, fields)] => {
            assert_eq!(*id, ids[0]);
            assert_eq!(fields.get(ProductField::Name), Some("Laptop Pro"));
            assert_eq!(fields.get(ProductField::Description), Some(""));
        }
        other => panic!("unexpected calls: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn update_rejects_bad_id_before_body() -> anyhow::Result<()> {
    let app = start_server(ServiceKind::Update).await?;

    let res = client()
        .put(format!("{}/products/not-an-object-id", app.base_url))
        .body("not json either")
        .send()
        .await?;

    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let err = res.json::<serde_json::Value>().await?;
    assert_eq!(err["detail"], "invalid id format");
    assert!(app.repo.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn empty_id_is_bad_request() -> anyhow::Result<()> {
    let app = start_server(ServiceKind::Update).await?;
    let res = client()
        .put(format!("{}/products/", app.base_url))
        .json(&json!({"name": "X"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<serde_json::Value>().await?["detail"], "invalid id format");

    let app = start_server(ServiceKind::Delete).await?;
    let res = client().delete(format!("{}/products/", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<serde_json::Value>().await?["detail"], "invalid id format");
    assert!(app.repo.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn update_rejects_bad_json() -> anyhow::Result<()> {
    let app = start_server(ServiceKind::Update).await?;
    let res = client()
        .put(format!("{}/products/{}", app.base_url, ProductId::generate()))
        .body("{")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert!(app.repo.calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn update_nonexistent_and_store_failure() -> anyhow::Result<()> {
    let app = start_server(ServiceKind::Update).await?;
    let url = format!("{}/products/{}", app.base_url, ProductId::generate());
    let body = json!({"name": "New Name", "description": "New Description"});

    let res = client().put(&url).json(&body).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    app.repo.fail_with("fallo de escritura");
    let res = client().put(&url).json(&body).send().await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    let err = res.json::<serde_json::Value>().await?;
    assert_eq!(err["detail"], "update error: fallo de escritura");
    Ok(())
}

#[tokio::test]
async fn delete_twice_is_idempotent() -> anyhow::Result<()> {
    let app = start_server(ServiceKind::Delete).await?;
    let ids = app.repo.seed([Product::new("Laptop", "", 1500.0, 10)]).await;
    let url = format!("{}/products/{}", app.base_url, ids[0]);

    for _ in 0..2 {
        let res = client().delete(&url).send().await?;
        assert_eq!(res.status(), HttpStatusCode::OK);
        assert_eq!(res.json::<serde_json::Value>().await?, json!({"status": "deleted"}));
    }
    assert!(app.repo.is_empty().await);
    Ok(())
}

#[tokio::test]
async fn delete_bad_id_and_store_failure() -> anyhow::Result<()> {
    let app = start_server(ServiceKind::Delete).await?;

    let res = client().delete(format!("{}/products/123", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    app.repo.fail_with("error de conexión");
    let res = client()
        .delete(format!("{}/products/{}", app.base_url, ProductId::generate()))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    let err = res.json::<serde_json::Value>().await?;
    assert!(err["detail"].as_str().unwrap_or_default().contains("conexión"));
    Ok(())
}

#[tokio::test]
async fn metrics_count_requests() -> anyhow::Result<()> {
    let app = start_server(ServiceKind::Read).await?;
    let _ = client().get(format!("{}/products", app.base_url)).send().await?;

    let res = client().get(format!("{}/metrics", app.base_url)).send().await?;

    assert_eq!(res.status(), HttpStatusCode::OK);
    let text = res.text().await?;
    assert!(text.contains("products_requests_total"));
    assert!(text.contains("route=\"/products\""));
    Ok(())
}
