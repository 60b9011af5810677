//! Gate construction and per-request decisions.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{evaluator_source, validate_gate, GateConfig};
use crate::decision::{
    ClientMetadata, Decision, DecisionBackend, EvaluationOutcome, RedisBackend, ScriptHandle,
};
use crate::fingerprint::{Fingerprint, InboundRequest};
use crate::gate::error::GateError;
use crate::http::TrustedProxies;
use crate::observability::{metrics, LoggerHandle};

/// Terminal state of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Hand the request to the next stage.
    Continue,
    /// Short-circuit with the block response.
    Reject,
}

/// The decision pipeline shared by every in-flight request.
pub struct Gate {
    backend: Arc<dyn DecisionBackend>,
    handle: ScriptHandle,
    timeout: Duration,
    quiet_mode: bool,
    trusted_proxies: TrustedProxies,
    logger: LoggerHandle,
}

impl Gate {
    /// Connect to Redis and register the evaluator.
    ///
    /// # Errors
    /// Returns `GateError` if the config is invalid, Redis is unreachable
    /// within the timeout, or the script cannot be loaded.
    pub async fn connect(config: GateConfig) -> Result<Self, GateError> {
        validate_gate(&config).map_err(GateError::Config)?;
        let backend = RedisBackend::connect(
            &config.backend_url,
            config.timeout(),
            config.pool_options(),
        )
        .await?;
        Self::build(config, Arc::new(backend)).await
    }

    /// Build a gate over any decision backend.
    ///
    /// # Errors
    /// Returns `GateError` if the config is invalid or registration fails.
    pub async fn with_backend(
        config: GateConfig,
        backend: Arc<dyn DecisionBackend>,
    ) -> Result<Self, GateError> {
        validate_gate(&config).map_err(GateError::Config)?;
        Self::build(config, backend).await
    }

    async fn build(config: GateConfig, backend: Arc<dyn DecisionBackend>) -> Result<Self, GateError> {
        let source = evaluator_source(&config)?;
        let handle = backend.register(&source, config.timeout()).await?;

        let gate = Self {
            backend,
            handle,
            timeout: config.timeout(),
            quiet_mode: config.quiet_mode,
            trusted_proxies: TrustedProxies::from_config(&config.trusted_proxies),
            logger: config.logger,
        };

        tracing::info!(
            handle = %gate.handle,
            timeout_ms = config.timeout_ms,
            quiet_mode = gate.quiet_mode,
            "Gate ready"
        );

        if config.announce {
            gate.spawn_announce();
        }
        Ok(gate)
    }

    /// Run one request through the pipeline.
    pub async fn check<R>(&self, request: &R) -> Verdict
    where
        R: InboundRequest + Sync + ?Sized,
    {
        if !self.quiet_mode {
            self.logger.debug("Processing request");
        }

        let fingerprint = Fingerprint::build(request, &*self.logger);
        let started = Instant::now();
        let result = self
            .backend
            .evaluate(&self.handle, &fingerprint.to_args(), self.timeout)
            .await;
        metrics::record_evaluation(started);

        self.decide(&fingerprint, EvaluationOutcome::from(result))
    }

    /// Map an evaluation outcome to a verdict, logging as it goes.
    fn decide(&self, fingerprint: &Fingerprint, outcome: EvaluationOutcome) -> Verdict {
        match outcome {
            EvaluationOutcome::Decision(Decision::Blocked) => {
                metrics::record_decision("blocked");
                self.logger.warn(&format!(
                    "Blocked {} {} from {}",
                    fingerprint.method, fingerprint.path, fingerprint.ip
                ));
                Verdict::Reject
            }
            EvaluationOutcome::Decision(decision) => {
                metrics::record_decision(decision.label());
                Verdict::Continue
            }
            EvaluationOutcome::TimedOut => {
                metrics::record_decision("timeout");
                self.logger.error(
                    "Rules check timed out during processing. Request passed without rules check.",
                );
                Verdict::Continue
            }
            EvaluationOutcome::Failed(info) => {
                metrics::record_decision("error");
                self.logger.error(&format!(
                    "An unexpected {} error occurred: {}. Request passed without rules check.",
                    info.category, info.message
                ));
                Verdict::Continue
            }
        }
    }

    fn spawn_announce(&self) {
        let backend = Arc::clone(&self.backend);
        let deadline = self.timeout;
        tokio::spawn(async move {
            let metadata = ClientMetadata::current();
            match backend.announce(&metadata, deadline).await {
                Ok(()) => tracing::info!(
                    name = %metadata.name,
                    version = %metadata.version,
                    "Startup announcement written"
                ),
                Err(e) => tracing::warn!(error = %e, "Startup announcement failed"),
            }
        });
    }

    pub fn handle(&self) -> &ScriptHandle {
        &self.handle
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn trusted_proxies(&self) -> &TrustedProxies {
        &self.trusted_proxies
    }
}

impl fmt::Debug for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate")
            .field("handle", &self.handle)
            .field("timeout", &self.timeout)
            .field("quiet_mode", &self.quiet_mode)
            .field("trusted_proxies", &self.trusted_proxies)
            .finish()
    }
}
