pub mod aggregate;
pub mod api;
pub mod config;
pub mod metrics_server;
pub mod observability;
pub mod receipt;
pub mod store;

pub use api::{router, AppState, Settings};
pub use store::{DashboardStore, QuestDbStore, StoreError};
