//! Headless view models
//!
//! Each view owns its data and exposes it as a [`ViewState`]; the renderer
//! only reads state, it never calls the backend itself.

pub mod auth;
pub mod chart;
pub mod notification;
pub mod service_form;
pub mod service_list;
pub mod stats_cards;

pub use auth::{LoginView, SignUpView};
pub use chart::{ChartPoint, ChartSnapshot, ChartView};
pub use notification::NotificationView;
pub use service_form::AddServiceView;
pub use service_list::ServiceListView;
pub use stats_cards::StatsCardsView;

/// What a list or chart view currently has to show
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewState<T> {
    #[default]
    Loading,
    Error(String),
    Empty,
    Ready(T),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Where the front end should go after a form submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Dashboard,
    Login { registered: bool },
}
