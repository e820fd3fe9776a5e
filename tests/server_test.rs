//! End-to-end tests over a real TCP listener.

use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_crud_over_the_wire() {
    let (addr, shutdown) = common::start_server(common::test_config()).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let base = format!("http://{addr}/api");

    let res = client
        .post(format!("{base}/users"))
        .header("X-Correlation-ID", "e2e-1")
        .json(&json!({"name": "John Doe", "email": "john@example.com", "age": 30}))
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["x-correlation-id"], "e2e-1");
    let created: Value = res.json().await.unwrap();
    assert_eq!(created["id"], 1);

    let res = client.get(format!("{base}/users/1")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert!(!res.headers()["x-correlation-id"].is_empty());

    let res = client.delete(format!("{base}/users/1")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    let res = client.get(format!("{base}/users/1")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    shutdown.send(()).unwrap();
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_ids() {
    let (addr, shutdown) = common::start_server(common::test_config()).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let url = format!("http://{addr}/api/users");

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let client = client.clone();
            let url = url.clone();
            tokio::spawn(async move {
                let res = client
                    .post(&url)
                    .json(&json!({"name": format!("user-{i}"), "email": "x@y"}))
                    .send()
                    .await
                    .unwrap();
                res.json::<Value>().await.unwrap()["id"].as_u64().unwrap()
            })
        })
        .collect();

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.unwrap());
    }
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids, (1..=20).collect::<Vec<u64>>());

    shutdown.send(()).unwrap();
}

#[tokio::test]
async fn test_custom_prefix() {
    let mut config = common::test_config();
    config.api_prefix = "/v1".to_string();
    let (addr, shutdown) = common::start_server(config).await;
    let client = reqwest::Client::builder().no_proxy().build().unwrap();

    let res = client.get(format!("http://{addr}/v1/health")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    let res = client.get(format!("http://{addr}/api/health")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    shutdown.send(()).unwrap();
}
