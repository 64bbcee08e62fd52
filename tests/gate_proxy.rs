//! End-to-end behavior of the gate: local answers, forwarding, failures.

use std::time::Duration;

use axum::Router;
use gate_proxy::GateConfig;

mod common;

const GATE: &str = "/sadfh9obdfe1";

#[tokio::test]
async fn test_flagged_request_never_reaches_upstream() {
    let upstream = common::start_mock_upstream().await;
    let (proxy, shutdown) = common::start_proxy(common::config_for(&upstream.address())).await;

    let res = common::client()
        .get(format!("http://{proxy}{GATE}"))
        .header("abc", "1")
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "you are the hacker");
    assert_eq!(upstream.count(), 0);

    shutdown.trigger();
}

#[tokio::test]
async fn test_unflagged_request_is_rewritten_and_relayed() {
    let upstream = common::start_mock_upstream().await;
    let (proxy, shutdown) = common::start_proxy(common::config_for(&upstream.address())).await;

    let res = common::client()
        .get(format!("http://{proxy}{GATE}?page=2"))
        .header("x-caller", "kept")
        .body("payload")
        .send()
        .await
        .expect("Proxy unreachable");

    assert_eq!(res.status(), 201);
    assert_eq!(res.headers().get("x-upstream").unwrap(), "mock");
    let cookies: Vec<&str> = res
        .headers()
        .get_all("set-cookie")
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();
    assert_eq!(cookies, ["a=1", "b=2"]);
    assert_eq!(res.text().await.unwrap(), "upstream saw GET /sendsend");

    let seen = upstream.requests();
    assert_eq!(seen.len(), 1);
    let req = &seen[0];
    assert_eq!(req.method.as_str(), "GET");
    assert_eq!(req.uri.path(), "/sendsend");
    assert_eq!(req.uri.query(), Some("page=2"));
    assert_eq!(req.headers.get("host").unwrap().to_str().unwrap(), upstream.addr.to_string());
    assert_eq!(req.headers.get("x-caller").unwrap(), "kept");
    assert_eq!(req.headers.get("x-forwarded-for").unwrap(), "127.0.0.1");
    assert!(req.headers.get("x-request-id").is_some());
    assert_eq!(&req.body[..], b"payload");

    shutdown.trigger();
}

#[tokio::test]
async fn test_empty_flag_is_forwarded() {
    let upstream = common::start_mock_upstream().await;
    let (proxy, shutdown) = common::start_proxy(common::config_for(&upstream.address())).await;

    let res = common::client()
        .get(format!("http://{proxy}{GATE}"))
        .header("abc", "")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 201);
    assert_eq!(upstream.count(), 1);

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    let dead = common::unused_address().await;
    let (proxy, shutdown) = common::start_proxy(common::config_for(&format!("http://{dead}"))).await;

    let res = common::client()
        .get(format!("http://{proxy}{GATE}"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 502);

    shutdown.trigger();
}

#[tokio::test]
async fn test_invalid_upstream_is_internal_error() {
    let (proxy, shutdown) = common::start_proxy(common::config_for("not a url")).await;

    let res = common::client()
        .get(format!("http://{proxy}{GATE}"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);

    shutdown.trigger();
}

#[tokio::test]
async fn test_slow_upstream_hits_deadline() {
    let slow = common::serve(Router::new().fallback(|| async {
        tokio::time::sleep(Duration::from_secs(10)).await;
        "too late"
    }))
    .await;

    let mut config: GateConfig = common::config_for(&format!("http://{slow}"));
    config.upstream.timeout_secs = Some(1);
    let (proxy, shutdown) = common::start_proxy(config).await;

    let res = common::client()
        .get(format!("http://{proxy}{GATE}"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 504);

    shutdown.trigger();
}

#[tokio::test]
async fn test_concurrent_requests_do_not_interfere() {
    let upstream = common::start_mock_upstream().await;
    let (proxy, shutdown) = common::start_proxy(common::config_for(&upstream.address())).await;
    let client = common::client();

    let mut handles = Vec::new();
    for i in 0..20 {
        let client = client.clone();
        let url = format!("http://{proxy}{GATE}");
        handles.push(tokio::spawn(async move {
            let flagged = i % 2 == 0;
            let mut req = client.get(url);
            if flagged {
                req = req.header("abc", format!("caller-{i}"));
            }
            let res = req.send().await.unwrap();
            (flagged, res.status().as_u16(), res.text().await.unwrap())
        }));
    }

    for handle in handles {
        let (flagged, status, body) = handle.await.unwrap();
        if flagged {
            assert_eq!((status, body.as_str()), (200, "you are the hacker"));
        } else {
            assert_eq!((status, body.as_str()), (201, "upstream saw GET /sendsend"));
        }
    }
    assert_eq!(upstream.count(), 10);

    shutdown.trigger();
}
