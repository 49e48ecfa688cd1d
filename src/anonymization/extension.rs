//! Extension registry
//!
//! Two kinds of callbacks can plug into the engine:
//!
//! - [`RegistryAlter`] callbacks change the property registry once, before
//!   the first request is served.
//! - [`PreAnonymizeObserver`] callbacks see every entity and its plan right
//!   before values are transformed, e.g. to purge rows kept elsewhere.
//!
//! Both lists are append-only and invoked in registration order.

use crate::anonymization::config::StrategyOverride;
use crate::anonymization::plan::AnonymizationPlan;
use crate::anonymization::registry::RegistryView;
use crate::domain::{EntitySnapshot, EraserError, Result};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Callback allowed to alter the property registry
pub trait RegistryAlter: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Alter the registry
    ///
    /// Called once per registry build. Implementations must produce the same
    /// registry when run again on a freshly seeded registry.
    fn alter(&self, registry: &mut RegistryView<'_>) -> anyhow::Result<()>;
}

/// Callback invoked right before an entity is anonymized
pub trait PreAnonymizeObserver: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// React to an upcoming anonymization
    ///
    /// Errors are logged and reported on the outcome; they never stop the
    /// request.
    fn before_anonymize(
        &self,
        entity: &EntitySnapshot,
        plan: &AnonymizationPlan,
    ) -> anyhow::Result<()>;
}

/// A failed observer invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserverFailure {
    /// Observer name
    pub callback: String,
    /// Error message
    pub message: String,
}

impl fmt::Display for ObserverFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.callback, self.message)
    }
}

/// Ordered registry of extension callbacks
#[derive(Default)]
pub struct ExtensionRegistry {
    alters: RwLock<Vec<Arc<dyn RegistryAlter>>>,
    observers: RwLock<Vec<Arc<dyn PreAnonymizeObserver>>>,
}

impl ExtensionRegistry {
    /// Create an empty extension registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an alter callback
    pub fn register_alter_callback(&self, callback: Arc<dyn RegistryAlter>) {
        tracing::info!(callback = %callback.name(), "Registering registry alter callback");
        self.alters.write().push(callback);
    }

    /// Append a pre-anonymization observer
    pub fn register_observer_callback(&self, callback: Arc<dyn PreAnonymizeObserver>) {
        tracing::info!(callback = %callback.name(), "Registering pre-anonymize observer");
        self.observers.write().push(callback);
    }

    /// Number of alter callbacks
    pub fn alter_count(&self) -> usize {
        self.alters.read().len()
    }

    /// Number of observers
    pub fn observer_count(&self) -> usize {
        self.observers.read().len()
    }

    /// Run all alter callbacks in order
    ///
    /// # Errors
    ///
    /// The first failing callback stops the phase with
    /// [`EraserError::RegistryAlter`]; changes made before it are kept.
    pub fn run_alter_phase(&self, registry: &mut RegistryView<'_>) -> Result<()> {
        // Callbacks run without the list lock held so they may be slow.
        let alters: Vec<_> = self.alters.read().iter().cloned().collect();

        for (position, callback) in alters.iter().enumerate() {
            tracing::debug!(callback = %callback.name(), position, "Running alter callback");
            if let Err(e) = callback.alter(registry) {
                tracing::error!(
                    callback = %callback.name(),
                    position,
                    error = %e,
                    "Alter callback failed, skipping remaining callbacks"
                );
                return Err(EraserError::RegistryAlter {
                    callback: callback.name().to_string(),
                    message: e.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Run all observers in order, collecting failures
    pub fn run_observer_phase(
        &self,
        entity: &EntitySnapshot,
        plan: &AnonymizationPlan,
    ) -> Vec<ObserverFailure> {
        let observers: Vec<_> = self.observers.read().iter().cloned().collect();
        let mut failures = Vec::new();

        for observer in observers {
            if let Err(e) = observer.before_anonymize(entity, plan) {
                tracing::warn!(
                    callback = %observer.name(),
                    entity_type = %entity.entity_type,
                    entity_id = %entity.entity_id,
                    error = %e,
                    "Pre-anonymize observer failed, continuing"
                );
                failures.push(ObserverFailure {
                    callback: observer.name().to_string(),
                    message: e.to_string(),
                });
            }
        }

        failures
    }
}

/// Alter callback applying strategy overrides from configuration
///
/// Each override adds a property or retypes an existing one, the same way a
/// site would retype `user.mail` to `clear`.
pub struct StrategyOverrideAlter {
    overrides: Vec<StrategyOverride>,
}

impl StrategyOverrideAlter {
    /// Create the callback from configured overrides
    pub fn new(overrides: Vec<StrategyOverride>) -> Self {
        Self { overrides }
    }
}

impl RegistryAlter for StrategyOverrideAlter {
    fn name(&self) -> &str {
        "config_strategy_overrides"
    }

    fn alter(&self, registry: &mut RegistryView<'_>) -> anyhow::Result<()> {
        for entry in &self.overrides {
            registry.set_property_strategy(&entry.entity_type, &entry.property, entry.strategy);
        }
        Ok(())
    }
}
