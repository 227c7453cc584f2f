//! Uptime Dashboard - client for a service-uptime monitoring backend
//!
//! Holds the session token, talks to the backend's JSON API, aggregates
//! statistics and drives the headless views that the terminal front end renders.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod forms;
pub mod io;
pub mod models;
pub mod render;
pub mod session;
pub mod stats;
pub mod views;

pub use api::ServiceApiClient;
pub use auth::AuthClient;
pub use config::{load_config, Config};
pub use error::{DashboardError, Result};
pub use events::{DashboardEvent, EventBus};
pub use session::Session;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::io::{HttpClient, ReqwestHttpClient};
use crate::session::{FileTokenStore, TokenStore};
use crate::views::{ServiceListView, StatsCardsView};

/// Wires the clients together from a [`Config`]
pub struct DashboardBuilder {
    config: Config,
    http: Option<Arc<dyn HttpClient>>,
    store: Option<Arc<dyn TokenStore>>,
    events: Option<EventBus>,
}

impl DashboardBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: None,
            store: None,
            events: None,
        }
    }

    pub fn with_http_client(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    pub fn with_token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    pub fn build(self) -> Dashboard {
        let http = self
            .http
            .unwrap_or_else(|| Arc::new(ReqwestHttpClient::new()));
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(FileTokenStore::new(&self.config.storage.token_dir)));
        let events = self.events.unwrap_or_default();
        let session = Session::new(store);

        tracing::debug!("Building dashboard for {}", self.config.api.base_url);

        let auth = Arc::new(AuthClient::new(
            self.config.api.base_url.clone(),
            Arc::clone(&http),
            session.clone(),
        ));
        let api = Arc::new(ServiceApiClient::new(
            self.config.api.base_url.clone(),
            http,
            session,
            events,
        ));

        Dashboard {
            config: self.config,
            auth,
            api,
        }
    }
}

/// The assembled clients sharing one session and one event bus
#[derive(Debug)]
pub struct Dashboard {
    config: Config,
    auth: Arc<AuthClient>,
    api: Arc<ServiceApiClient>,
}

impl Dashboard {
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn auth(&self) -> Arc<AuthClient> {
        Arc::clone(&self.auth)
    }

    pub fn api(&self) -> Arc<ServiceApiClient> {
        Arc::clone(&self.api)
    }

    pub fn events(&self) -> &EventBus {
        self.api.events()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.config.dashboard.chart_poll_interval_seconds.max(1))
    }

    /// Live summary and service table
    ///
    /// Both views load once, then refetch on bus events and on every poll
    /// interval. `on_render` runs after each change. Returns when `cancel`
    /// fires or the session expires.
    pub async fn watch<F>(&self, cancel: CancellationToken, on_render: F)
    where
        F: FnMut(&StatsCardsView, &ServiceListView),
    {
        self.watch_every(self.poll_interval(), cancel, on_render).await
    }

    async fn watch_every<F>(&self, period: Duration, cancel: CancellationToken, mut on_render: F)
    where
        F: FnMut(&StatsCardsView, &ServiceListView),
    {
        let mut events = self.events().subscribe();
        let mut cards = StatsCardsView::new(self.api());
        let mut list = ServiceListView::new(self.api());

        cards.load().await;
        list.load().await;
        on_render(&cards, &list);

        // the first tick is one period out; events never reset it
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                received = events.recv() => {
                    match received {
                        Ok(DashboardEvent::SessionExpired) => {
                            list.handle_event(&DashboardEvent::SessionExpired).await;
                            on_render(&cards, &list);
                            tracing::info!("Session expired, stopping live view");
                            break;
                        }
                        Ok(event) => {
                            let cards_changed = cards.handle_event(&event).await;
                            let list_changed = list.handle_event(&event).await;
                            if cards_changed || list_changed {
                                on_render(&cards, &list);
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!("Live view missed {} events, reloading", skipped);
                            cards.load().await;
                            list.load().await;
                            on_render(&cards, &list);
                        }
                        Err(RecvError::Closed) => break,
                    }
                }
                _ = ticker.tick() => {
                    cards.load().await;
                    list.load().await;
                    on_render(&cards, &list);
                }
                _ = cancel.cancelled() => {
                    tracing::debug!("Live view cancelled");
                    break;
                }
            }
        }
    }
}
