//! Anonymization orchestrator
//!
//! The [`Anonymizer`] drives one request through its phases:
//!
//! ```text
//! Idle -> BuildingPlan -> AlteringRegistry (first use only) -> Observing
//!      -> Applying -> Persisting -> Done
//! ```
//!
//! Any phase may end in `Failed`. Values are transformed in memory and handed
//! to the [`FieldDataAdapter`] in a single commit, so a request either
//! persists every value or none.
//!
//! # Examples
//!
//! ```no_run
//! use gdpr_eraser::adapters::InMemoryEntityStore;
//! use gdpr_eraser::anonymization::engine::{Anonymizer, EngineOptions};
//! use gdpr_eraser::anonymization::models::{PropertyAnonymizationSpec, StrategyKind};
//! use gdpr_eraser::anonymization::registry::PropertyRegistry;
//! use gdpr_eraser::domain::{EntityId, EntityTypeKey};
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let user = EntityTypeKey::new("user").map_err(anyhow::Error::msg)?;
//! let mut registry = PropertyRegistry::new();
//! let specs = vec![PropertyAnonymizationSpec::new("mail", StrategyKind::Hash)];
//! registry.register_type(&user, specs)?;
//!
//! let store = Arc::new(InMemoryEntityStore::new());
//! let engine = Anonymizer::new(registry, store.clone(), store, EngineOptions::default());
//!
//! let outcome = engine.anonymize(&user, &EntityId::from(42)).await?;
//! println!("{} values anonymized", outcome.applied_spec_count);
//! # Ok(())
//! # }
//! ```

use crate::adapters::store::{EntityStore, FieldDataAdapter, StorePair};
use crate::anonymization::audit::AuditLogger;
use crate::anonymization::extension::{
    ExtensionRegistry, PreAnonymizeObserver, RegistryAlter, StrategyOverrideAlter,
};
use crate::anonymization::models::{
    AnonymizationOutcome, FieldAnonymizationSpec, PropertyAnonymizationSpec,
};
use crate::anonymization::plan::AnonymizationPlan;
use crate::anonymization::registry::PropertyRegistry;
use crate::config::EraserConfig;
use crate::domain::{EntityId, EntityTypeKey, EraserError, Result};
use crate::{log_anonymization_complete, log_anonymization_start, log_phase_transition};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Phase of an anonymization request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnonymizationPhase {
    Idle,
    BuildingPlan,
    AlteringRegistry,
    Observing,
    Applying,
    Persisting,
    Done,
    Failed,
}

impl fmt::Display for AnonymizationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::BuildingPlan => "building_plan",
            Self::AlteringRegistry => "altering_registry",
            Self::Observing => "observing",
            Self::Applying => "applying",
            Self::Persisting => "persisting",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Runtime options of the engine
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Deadline for one request, including time spent waiting on a
    /// coalesced request for the same entity
    pub request_timeout: Duration,

    /// Run every phase except persistence
    pub dry_run: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            dry_run: false,
        }
    }
}

type RequestKey = (EntityTypeKey, EntityId);
type SharedOutcome = Option<Result<AnonymizationOutcome>>;

/// Removes an in-flight entry when the leading request ends or is dropped
struct InflightGuard<'a> {
    inflight: &'a Mutex<HashMap<RequestKey, watch::Receiver<SharedOutcome>>>,
    key: RequestKey,
}

impl Drop for InflightGuard<'_> {
    fn drop(&mut self) {
        self.inflight.lock().remove(&self.key);
    }
}

enum Role {
    Leader(watch::Sender<SharedOutcome>),
    Follower(watch::Receiver<SharedOutcome>),
}

/// Entity anonymization orchestrator
///
/// # Thread Safety
///
/// The engine is shared across tasks behind an `Arc`. Requests for different
/// entities run in parallel; concurrent requests for the same entity are
/// coalesced so its strategies run exactly once.
pub struct Anonymizer {
    base_registry: RwLock<PropertyRegistry>,
    effective_registry: RwLock<Option<Arc<PropertyRegistry>>>,
    extensions: ExtensionRegistry,
    store: Arc<dyn EntityStore>,
    writer: Arc<dyn FieldDataAdapter>,
    audit_logger: Option<AuditLogger>,
    options: EngineOptions,
    inflight: Mutex<HashMap<RequestKey, watch::Receiver<SharedOutcome>>>,
}

impl Anonymizer {
    /// Create an engine over a seeded registry and host store
    pub fn new(
        registry: PropertyRegistry,
        store: Arc<dyn EntityStore>,
        writer: Arc<dyn FieldDataAdapter>,
        options: EngineOptions,
    ) -> Self {
        Self {
            base_registry: RwLock::new(registry),
            effective_registry: RwLock::new(None),
            extensions: ExtensionRegistry::new(),
            store,
            writer,
            audit_logger: None,
            options,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Create an engine from configuration
    ///
    /// Seeds the registry from `[registry.<type>]` tables, registers the
    /// configured strategy overrides as the first alter callback and opens
    /// the audit log when enabled.
    ///
    /// # Errors
    ///
    /// Returns [`EraserError::Configuration`] for an invalid registry table or
    /// an audit log that cannot be created.
    pub fn from_config(config: &EraserConfig, (store, writer): StorePair) -> Result<Self> {
        let registry = config.build_registry()?;
        let options = EngineOptions {
            request_timeout: Duration::from_secs(config.anonymization.request_timeout_seconds),
            dry_run: config.application.dry_run,
        };

        let mut engine = Self::new(registry, store, writer, options);

        if !config.anonymization.overrides.is_empty() {
            engine.register_alter_callback(Arc::new(StrategyOverrideAlter::new(
                config.anonymization.overrides.clone(),
            )));
        }

        if config.audit.enabled {
            let logger = AuditLogger::new(
                config.audit.log_path.clone(),
                config.audit.json_format,
                true,
            )
            .map_err(|e| EraserError::Configuration(format!("Audit log: {e:#}")))?;
            engine = engine.with_audit_logger(logger);
        }

        Ok(engine)
    }

    /// Record every completed request in an audit log
    pub fn with_audit_logger(mut self, logger: AuditLogger) -> Self {
        self.audit_logger = Some(logger);
        self
    }

    /// Engine options
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Extension callbacks registered on this engine
    pub fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }

    /// Append an alter callback; the registry is rebuilt on next use
    pub fn register_alter_callback(&self, callback: Arc<dyn RegistryAlter>) {
        self.extensions.register_alter_callback(callback);
        self.invalidate_registry();
    }

    /// Append a pre-anonymization observer
    pub fn register_observer_callback(&self, callback: Arc<dyn PreAnonymizeObserver>) {
        self.extensions.register_observer_callback(callback);
    }

    /// Register property specs in the base registry
    ///
    /// # Errors
    ///
    /// See [`PropertyRegistry::register_type`].
    pub fn register_type(
        &self,
        key: &EntityTypeKey,
        specs: Vec<PropertyAnonymizationSpec>,
    ) -> Result<()> {
        self.base_registry.write().register_type(key, specs)?;
        self.invalidate_registry();
        Ok(())
    }

    /// Register field specs in the base registry
    ///
    /// # Errors
    ///
    /// See [`PropertyRegistry::register_fields`].
    pub fn register_fields(
        &self,
        key: &EntityTypeKey,
        specs: Vec<FieldAnonymizationSpec>,
    ) -> Result<()> {
        self.base_registry.write().register_fields(key, specs)?;
        self.invalidate_registry();
        Ok(())
    }

    /// Drop the effective registry so the next request rebuilds it
    pub fn invalidate_registry(&self) {
        if self.effective_registry.write().take().is_some() {
            tracing::debug!("Effective registry invalidated");
        }
    }

    /// The effective registry (base registry plus alterations)
    ///
    /// Built on first use; concurrent callers wait for the one build.
    ///
    /// # Errors
    ///
    /// Returns [`EraserError::RegistryAlter`] to the caller that triggered a
    /// build in which an alter callback failed. The partially altered
    /// registry is kept and served to later callers.
    pub fn registry(&self) -> Result<Arc<PropertyRegistry>> {
        if let Some(registry) = self.effective_registry.read().as_ref() {
            return Ok(Arc::clone(registry));
        }

        let mut slot = self.effective_registry.write();
        if let Some(registry) = slot.as_ref() {
            return Ok(Arc::clone(registry));
        }

        let mut registry = self.base_registry.read().clone();
        let altered = registry.apply_alterations(&self.extensions);
        let registry = Arc::new(registry);
        *slot = Some(Arc::clone(&registry));

        tracing::info!(
            entity_types = registry.len(),
            alter_callbacks = self.extensions.alter_count(),
            "Effective registry built"
        );
        altered.map(|()| registry)
    }

    /// Anonymize one entity within the configured request timeout
    ///
    /// # Errors
    ///
    /// Returns the [`EraserError`] of the phase that failed;
    /// [`EraserError::Timeout`] when the deadline expires.
    pub async fn anonymize(
        &self,
        entity_type: &EntityTypeKey,
        entity_id: &EntityId,
    ) -> Result<AnonymizationOutcome> {
        self.with_deadline(entity_type, entity_id, None).await
    }

    /// Anonymize one entity, giving up when `cancel` turns `true`
    ///
    /// A cancellation observed before the persisting phase fails the request
    /// with [`EraserError::Timeout`] and nothing is written.
    ///
    /// # Errors
    ///
    /// Same as [`anonymize`](Self::anonymize).
    pub async fn anonymize_with_cancel(
        &self,
        entity_type: &EntityTypeKey,
        entity_id: &EntityId,
        cancel: watch::Receiver<bool>,
    ) -> Result<AnonymizationOutcome> {
        self.with_deadline(entity_type, entity_id, Some(cancel)).await
    }

    /// Anonymize several entities of one type concurrently
    ///
    /// Returns one result per id, in input order. A failure never stops the
    /// other requests.
    pub async fn anonymize_batch(
        &self,
        entity_type: &EntityTypeKey,
        entity_ids: &[EntityId],
    ) -> Vec<Result<AnonymizationOutcome>> {
        tracing::info!(
            entity_type = %entity_type,
            count = entity_ids.len(),
            "Starting batch anonymization"
        );

        let requests = entity_ids
            .iter()
            .map(|entity_id| self.anonymize(entity_type, entity_id));
        let results = futures::future::join_all(requests).await;

        let failed = results.iter().filter(|r| r.is_err()).count();
        tracing::info!(
            entity_type = %entity_type,
            succeeded = results.len() - failed,
            failed,
            "Batch anonymization finished"
        );
        results
    }

    async fn with_deadline(
        &self,
        entity_type: &EntityTypeKey,
        entity_id: &EntityId,
        cancel: Option<watch::Receiver<bool>>,
    ) -> Result<AnonymizationOutcome> {
        let deadline = self.options.request_timeout;
        match tokio::time::timeout(deadline, self.coalesced(entity_type, entity_id, cancel)).await
        {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    entity_type = %entity_type,
                    entity_id = %entity_id,
                    timeout_ms = deadline.as_millis() as u64,
                    "Anonymization request timed out"
                );
                Err(EraserError::Timeout(format!(
                    "Anonymization of {entity_type}/{entity_id} exceeded {}ms",
                    deadline.as_millis()
                )))
            }
        }
    }

    async fn coalesced(
        &self,
        entity_type: &EntityTypeKey,
        entity_id: &EntityId,
        cancel: Option<watch::Receiver<bool>>,
    ) -> Result<AnonymizationOutcome> {
        let key = (entity_type.clone(), entity_id.clone());

        let role = {
            let mut inflight = self.inflight.lock();
            match inflight.get(&key) {
                Some(receiver) => Role::Follower(receiver.clone()),
                None => {
                    let (sender, receiver) = watch::channel(None);
                    inflight.insert(key.clone(), receiver);
                    Role::Leader(sender)
                }
            }
        };

        match role {
            Role::Follower(receiver) => {
                tracing::debug!(
                    entity_type = %entity_type,
                    entity_id = %entity_id,
                    "Joining in-flight request"
                );
                await_leader(receiver).await
            }
            Role::Leader(sender) => {
                let _guard = InflightGuard {
                    inflight: &self.inflight,
                    key,
                };
                let result = self.execute(entity_type, entity_id, cancel.as_ref()).await;
                sender.send_replace(Some(result.clone()));
                result
            }
        }
    }

    async fn execute(
        &self,
        entity_type: &EntityTypeKey,
        entity_id: &EntityId,
        cancel: Option<&watch::Receiver<bool>>,
    ) -> Result<AnonymizationOutcome> {
        let start = Instant::now();
        log_anonymization_start!(entity_type, entity_id);
        log_phase_transition!(entity_type, entity_id, AnonymizationPhase::Idle);

        let result = self.run_phases(entity_type, entity_id, cancel, start).await;

        match &result {
            Ok(outcome) => {
                log_phase_transition!(entity_type, entity_id, AnonymizationPhase::Done);
                log_anonymization_complete!(outcome);
            }
            Err(e) => {
                log_phase_transition!(entity_type, entity_id, AnonymizationPhase::Failed);
                tracing::error!(
                    entity_type = %entity_type,
                    entity_id = %entity_id,
                    kind = e.kind(),
                    error = %e,
                    "Anonymization failed"
                );
            }
        }
        result
    }

    async fn run_phases(
        &self,
        entity_type: &EntityTypeKey,
        entity_id: &EntityId,
        cancel: Option<&watch::Receiver<bool>>,
        start: Instant,
    ) -> Result<AnonymizationOutcome> {
        log_phase_transition!(entity_type, entity_id, AnonymizationPhase::BuildingPlan);
        let cached = self.effective_registry.read().clone();
        let registry = match cached {
            Some(registry) => registry,
            None => {
                log_phase_transition!(entity_type, entity_id, AnonymizationPhase::AlteringRegistry);
                self.registry()?
            }
        };

        let plan = AnonymizationPlan::build(&registry, entity_type, entity_id)?;
        if self.store.is_bound_to_parent(entity_type, entity_id).await? {
            return Err(EraserError::Configuration(format!(
                "Entity {entity_type}/{entity_id} is bound to a parent record and cannot be anonymized on its own"
            )));
        }
        let entity = self.store.load_entity(entity_type, entity_id).await?;
        ensure_not_cancelled(cancel, entity_type, entity_id)?;

        log_phase_transition!(entity_type, entity_id, AnonymizationPhase::Observing);
        let observer_failures = self.extensions.run_observer_phase(&entity, &plan);

        log_phase_transition!(entity_type, entity_id, AnonymizationPhase::Applying);
        let resolution = plan.resolve(&entity)?;
        ensure_not_cancelled(cancel, entity_type, entity_id)?;

        if self.options.dry_run {
            tracing::info!(
                entity_type = %entity_type,
                entity_id = %entity_id,
                values = resolution.applied(),
                "Dry run: skipping persistence"
            );
        } else {
            log_phase_transition!(entity_type, entity_id, AnonymizationPhase::Persisting);
            self.writer
                .commit_fields(entity_type, entity_id, &resolution.write_set())
                .await
                .map_err(|e| match e {
                    EraserError::Persistence(_) => e,
                    other => EraserError::Persistence(other.to_string()),
                })?;
        }

        let outcome = AnonymizationOutcome {
            entity_type: entity_type.clone(),
            entity_id: entity_id.clone(),
            applied_spec_count: resolution.applied(),
            skipped_spec_count: resolution.skipped,
            observer_failures: observer_failures.iter().map(ToString::to_string).collect(),
            dry_run: self.options.dry_run,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        if let Some(ref logger) = self.audit_logger {
            // Persistence is done or skipped by now; an audit failure is reported only
            if let Err(e) = logger.log_anonymization(&outcome, &resolution) {
                tracing::warn!(
                    entity_type = %entity_type,
                    entity_id = %entity_id,
                    error = %e,
                    "Failed to write audit record"
                );
            }
        }

        Ok(outcome)
    }
}

fn ensure_not_cancelled(
    cancel: Option<&watch::Receiver<bool>>,
    entity_type: &EntityTypeKey,
    entity_id: &EntityId,
) -> Result<()> {
    if cancel.is_some_and(|receiver| *receiver.borrow()) {
        return Err(EraserError::Timeout(format!(
            "Anonymization of {entity_type}/{entity_id} was cancelled"
        )));
    }
    Ok(())
}

async fn await_leader(
    mut receiver: watch::Receiver<SharedOutcome>,
) -> Result<AnonymizationOutcome> {
    loop {
        let current = receiver.borrow_and_update().clone();
        if let Some(result) = current {
            return result;
        }
        if receiver.changed().await.is_err() {
            let last = receiver.borrow().clone();
            return last.unwrap_or_else(|| {
                Err(EraserError::Timeout(
                    "In-flight request for this entity was abandoned".to_string(),
                ))
            });
        }
    }
}
