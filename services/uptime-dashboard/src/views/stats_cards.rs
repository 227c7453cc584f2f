//! Summary cards: total services, uptime and average response time

use std::sync::Arc;

use crate::api::ServiceApiClient;
use crate::events::DashboardEvent;
use crate::stats::{summarize, DashboardSummary};

use super::ViewState;

#[derive(Debug)]
pub struct StatsCardsView {
    api: Arc<ServiceApiClient>,
    state: ViewState<DashboardSummary>,
    fetch_count: usize,
}

impl StatsCardsView {
    pub fn new(api: Arc<ServiceApiClient>) -> Self {
        Self {
            api,
            state: ViewState::Loading,
            fetch_count: 0,
        }
    }

    pub fn state(&self) -> &ViewState<DashboardSummary> {
        &self.state
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count
    }

    pub async fn load(&mut self) {
        self.fetch_count += 1;
        self.state = match self.api.list_services().await {
            Ok(services) if services.is_empty() => ViewState::Empty,
            Ok(services) => ViewState::Ready(summarize(&services)),
            Err(e) => {
                tracing::warn!("Failed to load dashboard summary: {}", e);
                ViewState::Error(e.inline_message())
            }
        };
    }

    pub async fn handle_event(&mut self, event: &DashboardEvent) -> bool {
        if *event == DashboardEvent::ServicesChanged {
            self.load().await;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventBus;
    use crate::io::{HttpResponse, MockHttpClient};
    use crate::models::AuthToken;
    use crate::session::{MemoryTokenStore, Session};

    fn view_with(body: &'static str) -> StatsCardsView {
        let mut mock = MockHttpClient::new();
        mock.expect_send().returning(move |_| {
            Box::pin(async move {
                Ok(HttpResponse {
                    status: 200,
                    body: body.to_string(),
                })
            })
        });
        let session = Session::new(Arc::new(MemoryTokenStore::with_token(AuthToken {
            access_token: "X".to_string(),
            token_type: "Bearer".to_string(),
        })));
        StatsCardsView::new(Arc::new(ServiceApiClient::new(
            "http://api",
            Arc::new(mock),
            session,
            EventBus::default(),
        )))
    }

    #[tokio::test]
    async fn summarizes_latest_samples() {
        let mut view = view_with(
            r#"[
            {"id":"a","name":"A","refresh_frequency":"1 minute","stats":[
                {"status":false,"response_time":null,"ping_date":"2024-05-01T09:00:00Z"},
                {"status":true,"response_time":200.0,"ping_date":"2024-05-01T10:00:00Z"}]},
            {"id":"b","name":"B","refresh_frequency":"1 minute","stats":[
                {"status":false,"response_time":400.0,"ping_date":"2024-05-01T10:00:00Z"}]},
            {"id":"c","name":"C","refresh_frequency":"1 hour"}
        ]"#,
        );
        view.load().await;

        let summary = view.state().data().copied().unwrap();
        assert_eq!(summary.total_services, 3);
        assert_eq!(summary.up_percentage, 50);
        assert_eq!(summary.avg_response_time, 300);
    }

    #[tokio::test]
    async fn no_services_is_empty() {
        let mut view = view_with("[]");
        view.load().await;
        assert_eq!(*view.state(), ViewState::Empty);
    }

    #[tokio::test]
    async fn ignores_notification_changes() {
        let mut view = view_with("[]");
        let event = DashboardEvent::NotificationsChanged {
            service_id: "a".to_string(),
        };
        assert!(!view.handle_event(&event).await);
        assert!(view.state().is_loading());
    }
}
