// Shared test helpers: in-process fake collector and poller wiring
#![allow(dead_code)]

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::IntoResponse,
    routing::get,
};
use hostpulse::collector::CollectorClient;
use hostpulse::config::CollectorConfig;
use hostpulse::models::DashboardSnapshot;
use hostpulse::poller::{HostPoller, PollerConfig};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::time::Duration;

pub const SCENARIO_PAYLOAD: &str = r#"{"hostid":"10105","host":"db1","status":"0","metrics":{"cpu":95,"memory":40,"disk":10,"uptime":"3d"}}"#;

pub const FLEET_PAYLOAD: &str = r#"[
  {"hostid":"1","host":"web1","name":"Web 1","status":"0","ip":"10.0.0.1",
   "hostgroups":[{"groupid":"2","name":"Linux servers"},{"groupid":"7","name":"Web"}],
   "metrics":{"cpu":12.5,"memory":40,"disk":55,"uptime":"12d 4h"},"timestamp":"2026-10-16T08:00:00Z"},
  {"hostid":"2","host":"db1","status":"0","ip":"10.0.0.2",
   "hostgroups":[{"groupid":"5","name":"Databases"}],
   "metrics":{"cpu":75,"memory":60,"disk":80,"uptime":"3d"}},
  {"hostid":"3","host":"edge1","status":"1","hostgroups":[]}
]"#;

struct FakeState {
    status: u16,
    body: String,
    requests: usize,
    last_content_type: Option<String>,
    delay: Duration,
}

/// Collector stand-in. The response can be swapped between polls.
#[derive(Clone)]
pub struct FakeCollector {
    pub url: String,
    inner: Arc<Mutex<FakeState>>,
}

impl FakeCollector {
    pub async fn spawn(status: u16, body: &str) -> Self {
        let inner = Arc::new(Mutex::new(FakeState {
            status,
            body: body.to_string(),
            requests: 0,
            last_content_type: None,
            delay: Duration::ZERO,
        }));
        let app = Router::new()
            .route("/api/hosts", get(serve_hosts))
            .with_state(inner.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Self {
            url: format!("http://{}/api/hosts", addr),
            inner,
        }
    }

    pub fn respond(&self, status: u16, body: &str) {
        let mut s = self.inner.lock().unwrap();
        s.status = status;
        s.body = body.to_string();
    }

    /// Hold every subsequent response for `delay` before answering.
    pub fn set_delay(&self, delay: Duration) {
        self.inner.lock().unwrap().delay = delay;
    }

    pub fn requests(&self) -> usize {
        self.inner.lock().unwrap().requests
    }

    pub fn last_content_type(&self) -> Option<String> {
        self.inner.lock().unwrap().last_content_type.clone()
    }
}

async fn serve_hosts(
    State(inner): State<Arc<Mutex<FakeState>>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let (status, body, delay) = {
        let mut s = inner.lock().unwrap();
        s.requests += 1;
        s.last_content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        (s.status, s.body.clone(), s.delay)
    };
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    (
        StatusCode::from_u16(status).unwrap(),
        [(CONTENT_TYPE, "application/json")],
        body,
    )
}

pub fn collector_config(url: &str) -> CollectorConfig {
    CollectorConfig {
        url: url.to_string(),
        poll_interval_ms: 5000,
        request_timeout_ms: Some(2000),
    }
}

pub fn start_poller(url: &str, poll_interval_ms: u64) -> HostPoller {
    let client = CollectorClient::new(&collector_config(url)).unwrap();
    HostPoller::start(client, PollerConfig { poll_interval_ms })
}

/// Wait (bounded) until a published snapshot satisfies `pred`.
pub async fn wait_for(
    rx: &mut watch::Receiver<DashboardSnapshot>,
    pred: impl FnMut(&DashboardSnapshot) -> bool,
) -> DashboardSnapshot {
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(pred))
        .await
        .expect("timed out waiting for snapshot")
        .expect("poller dropped")
        .clone()
}

/// Wait for the first fetch (visible) to settle.
pub async fn wait_settled(poller: &HostPoller) -> DashboardSnapshot {
    let mut rx = poller.subscribe();
    wait_for(&mut rx, |s| !s.loading).await
}

/// URL of a collector that accepts connections and never answers.
pub async fn silent_collector_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    format!("http://{}/api/hosts", addr)
}

/// Poller whose client has no request timeout.
pub fn start_poller_without_timeout(url: &str, poll_interval_ms: u64) -> HostPoller {
    let config = CollectorConfig {
        request_timeout_ms: None,
        ..collector_config(url)
    };
    let client = CollectorClient::new(&config).unwrap();
    HostPoller::start(client, PollerConfig { poll_interval_ms })
}

/// URL on which nothing listens.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api/hosts", addr)
}
