//! Handling of a single trigger invocation: gate, then dispatch.

use crate::error::TriggerError;
use crate::event::{ScheduledEvent, TriggerSource};
use collection_trigger_core::{InvocationId, Result};
use collection_trigger_dispatch::{DispatchClient, DispatchRequest};
use collection_trigger_window::{LocalDateParts, WindowGate};
use tracing::{Instrument, debug, info, info_span};

/// What an invocation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The firing was outside the collection window; nothing was sent.
    Skipped { local: LocalDateParts },
    /// The workflow was dispatched after `attempts` HTTP calls.
    Dispatched { attempts: u32 },
}

/// Evaluates the collection window and dispatches the workflow when open.
///
/// The handler keeps no state between invocations. Two overlapping
/// invocations may both dispatch; nothing here deduplicates them.
#[derive(Debug, Clone)]
pub struct TriggerHandler {
    gate: WindowGate,
    client: DispatchClient,
    request: DispatchRequest,
}

impl TriggerHandler {
    /// Creates a handler using the Singapore collection window.
    #[must_use]
    pub fn new(client: DispatchClient, request: DispatchRequest) -> Self {
        Self {
            gate: WindowGate::new(),
            client,
            request,
        }
    }

    /// Handles one firing.
    ///
    /// Scheduled events outside the window are skipped. Manual events are
    /// always dispatched.
    ///
    /// # Errors
    ///
    /// Returns [`TriggerError::DispatchFailed`] on top of the dispatch
    /// report when the dispatch fails.
    pub async fn handle(&self, event: ScheduledEvent) -> Result<TriggerOutcome, TriggerError> {
        let invocation = InvocationId::new();
        let span = info_span!(
            "trigger",
            %invocation,
            source = %event.source,
            scheduled_time = %event.scheduled_time
        );

        self.run(invocation, event).instrument(span).await
    }

    async fn run(
        &self,
        invocation: InvocationId,
        event: ScheduledEvent,
    ) -> Result<TriggerOutcome, TriggerError> {
        let local = self.gate.local_parts(event.scheduled_time);
        debug!(%local, "evaluated collection window");

        if event.source == TriggerSource::Scheduled && !WindowGate::contains(&local) {
            info!(%local, "outside collection window, skipping dispatch");
            return Ok(TriggerOutcome::Skipped { local });
        }

        match self.client.dispatch(&self.request).await {
            Ok(receipt) => Ok(TriggerOutcome::Dispatched {
                attempts: receipt.attempts,
            }),
            Err(report) => {
                let cause = report.current_context();
                let context = TriggerError::DispatchFailed {
                    invocation,
                    status: cause.status(),
                    reason: cause.to_string(),
                };
                Err(report.context(context))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use wiremock::matchers::{any, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> DispatchRequest {
        DispatchRequest::new("octo", "tracker", "scheduled-update.yml", "ghp_secret")
            .with_max_retries(0)
    }

    fn handler(server: &MockServer) -> TriggerHandler {
        TriggerHandler::new(
            DispatchClient::new()
                .expect("http client")
                .with_api_base(server.uri()),
            request(),
        )
    }

    /// 2026-02-05 12:00 in Singapore.
    fn inside() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 5, 4, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    /// 2026-02-05 23:00 in Singapore.
    fn outside() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 5, 15, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[tokio::test]
    async fn skips_outside_window_without_calling_api() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let outcome = handler(&server)
            .handle(ScheduledEvent::scheduled(outside()))
            .await
            .expect("skip is not an error");

        match outcome {
            TriggerOutcome::Skipped { local } => {
                assert_eq!((local.day, local.hour), (5, 23));
            }
            other => panic!("expected Skipped, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn dispatches_inside_window() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = handler(&server)
            .handle(ScheduledEvent::scheduled(inside()))
            .await
            .expect("dispatch should succeed");

        assert_eq!(outcome, TriggerOutcome::Dispatched { attempts: 1 });
    }

    #[tokio::test]
    async fn manual_run_bypasses_window() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = handler(&server)
            .handle(ScheduledEvent::manual(outside()))
            .await
            .expect("dispatch should succeed");

        assert_eq!(outcome, TriggerOutcome::Dispatched { attempts: 1 });
    }

    #[tokio::test]
    async fn dispatch_failure_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .expect(1)
            .mount(&server)
            .await;

        let err = handler(&server)
            .handle(ScheduledEvent::scheduled(inside()))
            .await
            .unwrap_err();

        match err.current_context() {
            TriggerError::DispatchFailed { status, reason, .. } => {
                assert_eq!(*status, Some(404));
                assert!(reason.contains("Not Found"), "got: {reason}");
            }
        }
    }

    #[tokio::test]
    async fn configuration_failure_has_no_status() {
        let server = MockServer::start().await;
        Mock::given(any())
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let handler = TriggerHandler::new(
            DispatchClient::new()
                .expect("http client")
                .with_api_base(server.uri()),
            DispatchRequest::default(),
        );
        let err = handler
            .handle(ScheduledEvent::scheduled(inside()))
            .await
            .unwrap_err();

        match err.current_context() {
            TriggerError::DispatchFailed { status, reason, .. } => {
                assert_eq!(*status, None);
                assert!(reason.contains("owner"), "got: {reason}");
            }
        }
    }
}
