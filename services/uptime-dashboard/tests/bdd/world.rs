//! BDD test world for the uptime dashboard

use std::sync::Arc;

use cucumber::World;
use tokio::sync::broadcast;
use tokio::sync::RwLock;

use uptime_dashboard::io::{HttpClient, HttpRequest, HttpResponse, Method};
use uptime_dashboard::models::Service;
use uptime_dashboard::session::{MemoryTokenStore, TokenStore};
use uptime_dashboard::stats::DashboardSummary;
use uptime_dashboard::views::{AddServiceView, ServiceListView};
use uptime_dashboard::{Config, Dashboard, DashboardBuilder, DashboardEvent};

/// A canned answer for requests matching a method and URL suffix
#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub path: String,
    pub status: u16,
    pub body: String,
}

/// An HTTP client that records every request and answers from its routes
///
/// Unrouted requests get a 404.
#[derive(Debug, Default)]
pub struct ScriptedHttpClient {
    pub routes: RwLock<Vec<Route>>,
    pub requests: RwLock<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub async fn route(&self, method: Method, path: &str, status: u16, body: impl Into<String>) {
        self.routes.write().await.push(Route {
            method,
            path: path.to_string(),
            status,
            body: body.into(),
        });
    }

    pub async fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .read()
            .await
            .iter()
            .filter(|r| r.method == method && r.url.ends_with(path))
            .count()
    }
}

#[async_trait::async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn send(&self, request: HttpRequest) -> uptime_dashboard::Result<HttpResponse> {
        let response = self
            .routes
            .read()
            .await
            .iter()
            .find(|r| r.method == request.method && request.url.ends_with(&r.path))
            .map(|r| HttpResponse {
                status: r.status,
                body: r.body.clone(),
            })
            .unwrap_or(HttpResponse {
                status: 404,
                body: r#"{"detail":"Not Found"}"#.to_string(),
            });
        self.requests.write().await.push(request);
        Ok(response)
    }
}

#[derive(Debug, Default, World)]
pub struct DashboardWorld {
    // Aggregation
    pub services: Vec<Service>,
    pub summary: Option<DashboardSummary>,

    // Backend double and the clients built on it
    pub http: Arc<ScriptedHttpClient>,
    pub store: Arc<MemoryTokenStore>,
    pub dashboard: Option<Dashboard>,
    pub events: Option<broadcast::Receiver<DashboardEvent>>,

    // Views
    pub list: Option<ServiceListView>,
    pub add_service: Option<AddServiceView>,
    pub fetches_before: usize,
    pub last_error: Option<uptime_dashboard::DashboardError>,
}

impl DashboardWorld {
    /// Build the clients on first use; later calls return the same instance
    pub fn dashboard(&mut self) -> &Dashboard {
        if self.dashboard.is_none() {
            let dashboard = DashboardBuilder::new(Config::default())
                .with_http_client(Arc::clone(&self.http) as Arc<dyn HttpClient>)
                .with_token_store(Arc::clone(&self.store) as Arc<dyn TokenStore>)
                .build();
            self.events = Some(dashboard.events().subscribe());
            self.dashboard = Some(dashboard);
        }
        self.dashboard.as_ref().expect("dashboard built above")
    }

    /// Everything published on the bus since the last drain
    pub fn drain_events(&mut self) -> Vec<DashboardEvent> {
        let mut drained = Vec::new();
        if let Some(rx) = self.events.as_mut() {
            while let Ok(event) = rx.try_recv() {
                drained.push(event);
            }
        }
        drained
    }
}
