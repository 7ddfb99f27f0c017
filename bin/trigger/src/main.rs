mod config;

use crate::config::{RunMode, TriggerConfig};
use chrono::Utc;
use collection_trigger_scheduler::{ScheduledEvent, TriggerHandler, TriggerOutcome};
use std::process::ExitCode;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match TriggerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let client = match config.dispatch_client() {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "failed to build dispatch client");
            return ExitCode::FAILURE;
        }
    };

    let handler = TriggerHandler::new(client, config.dispatch_request());
    let force = config.trigger_force;

    match config.run_mode() {
        RunMode::Once => invoke(&handler, force).await,
        RunMode::Every(period) => {
            run_every(&handler, period, force).await;
            ExitCode::SUCCESS
        }
    }
}

/// Handles a single firing stamped with the current time.
async fn invoke(handler: &TriggerHandler, force: bool) -> ExitCode {
    let now = Utc::now();
    let event = if force {
        ScheduledEvent::manual(now)
    } else {
        ScheduledEvent::scheduled(now)
    };

    match handler.handle(event).await {
        Ok(TriggerOutcome::Dispatched { attempts }) => {
            tracing::info!(attempts, "invocation dispatched workflow");
            ExitCode::SUCCESS
        }
        Ok(TriggerOutcome::Skipped { .. }) => ExitCode::SUCCESS,
        Err(report) => {
            tracing::error!(error = %report, "invocation failed");
            ExitCode::FAILURE
        }
    }
}

/// Fires every `period` until interrupted.
///
/// Each tick is awaited to completion before the next one is taken, and a
/// failed tick does not stop the loop. An interrupt also cancels a tick
/// that is still in flight.
async fn run_every(handler: &TriggerHandler, period: Duration, force: bool) {
    tracing::info!(period_seconds = period.as_secs(), "running on interval");

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("received interrupt, shutting down");
                break;
            }
            _ = async {
                interval.tick().await;
                invoke(handler, force).await;
            } => {}
        }
    }
}
