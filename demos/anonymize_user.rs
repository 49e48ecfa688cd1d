//! Example anonymizing a user with an alter callback and an observer
//!
//! This example shows how to:
//! - Initialize structured logging
//! - Seed the property registry and alter it through a callback
//! - Observe entities right before they are anonymized
//!
//! Run with:
//! ```bash
//! cargo run --example anonymize_user
//! ```

use gdpr_eraser::adapters::InMemoryEntityStore;
use gdpr_eraser::anonymization::{
    AnonymizationPlan, Anonymizer, EngineOptions, PreAnonymizeObserver,
    PropertyAnonymizationSpec, PropertyRegistry, RegistryAlter, RegistryView, StrategyKind,
};
use gdpr_eraser::config::LoggingConfig;
use gdpr_eraser::domain::{EntityId, EntitySnapshot, EntityTypeKey};
use gdpr_eraser::logging::init_logging;
use serde_json::json;
use std::sync::Arc;

/// Retype `user.mail` from hash to clear
struct ClearUserMail;

impl RegistryAlter for ClearUserMail {
    fn name(&self) -> &str {
        "clear_user_mail"
    }

    fn alter(&self, registry: &mut RegistryView<'_>) -> anyhow::Result<()> {
        let user = EntityTypeKey::new("user").map_err(anyhow::Error::msg)?;
        registry.set_property_strategy(&user, "mail", StrategyKind::Clear);
        Ok(())
    }
}

/// Print what is about to be anonymized
struct PrintPlan;

impl PreAnonymizeObserver for PrintPlan {
    fn name(&self) -> &str {
        "print_plan"
    }

    fn before_anonymize(
        &self,
        entity: &EntitySnapshot,
        plan: &AnonymizationPlan,
    ) -> anyhow::Result<()> {
        println!(
            "About to anonymize {}/{}: {} properties, {} fields",
            entity.entity_type,
            entity.entity_id,
            plan.properties.len(),
            plan.fields.len()
        );
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = LoggingConfig {
        local_enabled: true,
        local_path: "/tmp/gdpr_eraser_example".to_string(),
        local_rotation: "daily".to_string(),
    };

    // Keep the guard alive so file logs are flushed
    let _guard = init_logging("debug", &config)?;

    let user = EntityTypeKey::new("user")?;
    let mut registry = PropertyRegistry::new();
    registry.register_type(
        &user,
        vec![
            PropertyAnonymizationSpec::new("mail", StrategyKind::Hash),
            PropertyAnonymizationSpec::new("name", StrategyKind::Randomize),
        ],
    )?;

    let store = Arc::new(InMemoryEntityStore::new());
    store.insert(
        EntitySnapshot::builder()
            .entity_type("user")?
            .entity_id("42")?
            .property("mail", json!("jane@example.com"))
            .property("name", json!("Jane Doe"))
            .build()?,
    );

    let engine = Anonymizer::new(registry, store.clone(), store.clone(), EngineOptions::default());
    engine.register_alter_callback(Arc::new(ClearUserMail));
    engine.register_observer_callback(Arc::new(PrintPlan));

    let outcome = engine.anonymize(&user, &EntityId::from(42)).await?;
    println!("Outcome: {}", serde_json::to_string_pretty(&outcome)?);

    if let Some(entity) = store.get(&user, &EntityId::from(42)) {
        println!("Stored: {}", serde_json::to_string_pretty(&entity.properties)?);
    }

    println!("\nLogs written to: {}", config.local_path);
    Ok(())
}
