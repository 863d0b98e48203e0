use std::{future::Future, sync::Arc, time::Duration, time::Instant};

use time::UtcOffset;

use super::error::ApiError;
use crate::{
    config::{AppConfig, MeterMapConfig, TariffConfig},
    metrics_server,
    store::{DashboardStore, StoreError},
};

/// Request-independent settings resolved once at start-up.
#[derive(Debug, Clone)]
pub struct Settings {
    pub request_timeout: Duration,
    pub reporting_offset: UtcOffset,
    pub meter_map: MeterMapConfig,
    pub tariff: TariffConfig,
}

impl Settings {
    pub fn from_config(cfg: &AppConfig, reporting_offset: UtcOffset) -> Self {
        Self {
            request_timeout: Duration::from_millis(cfg.http.request_timeout_ms),
            reporting_offset,
            meter_map: cfg.meter_map.clone(),
            tariff: cfg.tariff.clone(),
        }
    }
}

pub struct AppState {
    pub store: Arc<dyn DashboardStore>,
    pub settings: Settings,
}

impl AppState {
    pub fn new(store: Arc<dyn DashboardStore>, settings: Settings) -> Arc<Self> {
        Arc::new(Self { store, settings })
    }

    /// Run one endpoint's work under the request deadline, recording metrics
    /// and logging failures.
    pub async fn run<T, F>(&self, endpoint: &'static str, work: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        let started = Instant::now();
        let outcome = match tokio::time::timeout(self.settings.request_timeout, work).await {
            Ok(res) => res.map_err(ApiError::from),
            Err(_) => Err(ApiError::DataAccessFailure(format!(
                "request deadline of {} ms exceeded",
                self.settings.request_timeout.as_millis()
            ))),
        };

        metrics_server::record_request(endpoint, started.elapsed(), outcome.is_ok());
        if let Err(e) = &outcome {
            tracing::error!(endpoint, error = %e, "request failed");
        }
        outcome
    }
}
