//! Per-request task that waits on the external item generator.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::{GenerationError, GenerationRequest, ItemGenerator};

/// Raw result handed back to the simulation worker.
#[derive(Debug)]
pub struct GenerationOutcome {
    pub request: GenerationRequest,
    /// Session run the request was charged under.
    pub run_id: u64,
    pub result: Result<Value, GenerationError>,
}

pub struct GenerationWorker {
    generator: Arc<dyn ItemGenerator>,
    request: GenerationRequest,
    run_id: u64,
    timeout: Option<Duration>,
    results_tx: mpsc::UnboundedSender<GenerationOutcome>,
}

impl GenerationWorker {
    pub fn new(
        generator: Arc<dyn ItemGenerator>,
        request: GenerationRequest,
        run_id: u64,
        timeout: Option<Duration>,
        results_tx: mpsc::UnboundedSender<GenerationOutcome>,
    ) -> Self {
        Self {
            generator,
            request,
            run_id,
            timeout,
            results_tx,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        let call = self.generator.generate(&self.request);
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .unwrap_or_else(|_| Err(GenerationError::Timeout(limit.as_millis() as u64))),
            None => call.await,
        };

        let outcome = GenerationOutcome {
            request: self.request,
            run_id: self.run_id,
            result,
        };
        if self.results_tx.send(outcome).is_err() {
            debug!(
                target: "runtime::generation",
                "simulation worker stopped before generation finished"
            );
        }
    }
}
