mod config;
mod models;
mod routes;
mod service;
mod store;
mod zoho;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use talentsync_api::db::create_pool;
use talentsync_api::llm_client::LlmClient;

use crate::config::Config;
use crate::routes::{build_router, SyncState};
use crate::service::run_cycle;
use crate::zoho::ZohoClient;

/// Pause before retrying after a failed cycle, instead of waiting a whole
/// interval.
const ERROR_RETRY_SECS: u64 = 60;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("talentsync_sync={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TalentSync sync service v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;
    // Shared schema with the API; the migration ledger makes this a no-op
    // when the API already ran it.
    sqlx::migrate!("../api/migrations").run(&db).await?;

    let state = SyncState {
        db,
        zoho: ZohoClient::new(config.zoho_api_base.clone(), config.zoho_access_token.clone()),
        llm: LlmClient::new(config.anthropic_api_key.clone()),
        interval_minutes: config.sync_interval_minutes,
        sync_lock: Arc::new(Mutex::new(())),
    };

    spawn_periodic_sync(state.clone());

    let app = build_router(state).layer(TraceLayer::new_for_http());
    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Background sync driver. The first cycle runs immediately on startup;
/// waiting happens after each cycle, not before.
fn spawn_periodic_sync(state: SyncState) {
    tokio::spawn(async move {
        let interval = Duration::from_secs(state.interval_minutes.max(1) as u64 * 60);
        periodic_loop(interval, move || {
            let state = state.clone();
            async move {
                let _guard = state.sync_lock.lock().await;
                run_cycle(&state.db, &state.zoho, &state.llm, state.interval_minutes).await
            }
        })
        .await;
    });
}

/// Cycle-then-wait loop. A fetch-level failure shortens the next wait to
/// [`ERROR_RETRY_SECS`].
async fn periodic_loop<F, Fut>(interval: Duration, mut cycle: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<service::SyncReport>>,
{
    loop {
        let wait = match cycle().await {
            Ok(report) => {
                if !report.errors.is_empty() {
                    error!(
                        "Periodic sync finished with {} per-employee errors",
                        report.errors.len()
                    );
                }
                interval
            }
            Err(e) => {
                error!("Periodic sync failed: {e:?}");
                Duration::from_secs(ERROR_RETRY_SECS)
            }
        };
        tokio::time::sleep(wait).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;
    use tokio::sync::Mutex;

    use crate::service::SyncReport;

    fn empty_report() -> SyncReport {
        SyncReport {
            timestamp: Utc::now(),
            employees_fetched: 0,
            employees_processed: 0,
            candidates_created: 0,
            errors: Vec::new(),
        }
    }

    /// Records, in paused-clock time, when each cycle begins.
    fn recording_cycle(
        times: Arc<Mutex<Vec<Duration>>>,
        start: tokio::time::Instant,
        fail_first: bool,
    ) -> impl FnMut() -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<SyncReport>> + Send>>
    {
        let mut calls = 0u32;
        move || {
            calls += 1;
            let times = times.clone();
            let fail = fail_first && calls == 1;
            Box::pin(async move {
                times.lock().await.push(start.elapsed());
                if fail {
                    anyhow::bail!("upstream unavailable");
                }
                Ok(empty_report())
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn first_cycle_runs_before_any_wait() {
        let times = Arc::new(Mutex::new(Vec::new()));
        let start = tokio::time::Instant::now();
        let interval = Duration::from_secs(300);

        let driver = tokio::spawn(periodic_loop(
            interval,
            recording_cycle(times.clone(), start, false),
        ));
        tokio::time::sleep(interval + Duration::from_secs(1)).await;
        driver.abort();

        let times = times.lock().await;
        assert!(times.len() >= 2, "expected two cycles, saw {}", times.len());
        assert_eq!(times[0], Duration::ZERO);
        assert_eq!(times[1], interval);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_cycle_retries_after_the_short_wait() {
        let times = Arc::new(Mutex::new(Vec::new()));
        let start = tokio::time::Instant::now();

        let driver = tokio::spawn(periodic_loop(
            Duration::from_secs(300),
            recording_cycle(times.clone(), start, true),
        ));
        tokio::time::sleep(Duration::from_secs(ERROR_RETRY_SECS + 1)).await;
        driver.abort();

        let times = times.lock().await;
        assert!(times.len() >= 2, "expected a retry, saw {}", times.len());
        assert_eq!(times[1], Duration::from_secs(ERROR_RETRY_SECS));
    }
}
