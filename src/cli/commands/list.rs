//! List-properties command implementation
//!
//! Prints the effective anonymization registry: the `[registry.<type>]`
//! tables with the configured strategy overrides applied.

use crate::anonymization::extension::{ExtensionRegistry, StrategyOverrideAlter};
use crate::anonymization::models::{EntityTypeSpecs, FieldScope};
use crate::anonymization::registry::PropertyRegistry;
use crate::config::{load_config, EraserConfig};
use crate::domain::Result;
use clap::Args;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Arguments for the list-properties command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only show this entity type
    #[arg(short = 't', long)]
    pub entity_type: Option<String>,

    /// Print the registry as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    /// Execute the list-properties command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Failed to load configuration: {e}");
                return Ok(e.exit_code());
            }
        };

        let registry = match effective_registry(&config) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("❌ Failed to build registry: {e}");
                return Ok(e.exit_code());
            }
        };

        let selected: BTreeMap<&str, &EntityTypeSpecs> = registry
            .iter()
            .filter(|(key, _)| {
                self.entity_type
                    .as_deref()
                    .map_or(true, |wanted| key.as_str() == wanted)
            })
            .map(|(key, specs)| (key.as_str(), specs))
            .collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&selected)?);
            return Ok(0);
        }

        if selected.is_empty() {
            match &self.entity_type {
                Some(t) => println!("⚠️  No anonymizable properties registered for '{t}'"),
                None => println!("⚠️  The registry is empty"),
            }
            return Ok(0);
        }

        println!("📋 Effective anonymization registry");
        for (entity_type, specs) in selected {
            println!();
            println!("{entity_type}");
            for spec in &specs.properties {
                println!("  property  {:<24} {}", spec.property_name, spec.strategy);
            }
            for spec in &specs.fields {
                let scope = match spec.scope {
                    FieldScope::SingleValue => "",
                    FieldScope::Multivalue => " (multivalue)",
                };
                println!("  field     {:<24} {}{scope}", spec.field_name, spec.strategy);
            }
        }
        println!();
        Ok(0)
    }
}

/// Seed the registry from configuration and apply the configured overrides
fn effective_registry(config: &EraserConfig) -> Result<PropertyRegistry> {
    let mut registry = config.build_registry()?;
    let extensions = ExtensionRegistry::new();
    if !config.anonymization.overrides.is_empty() {
        extensions.register_alter_callback(Arc::new(StrategyOverrideAlter::new(
            config.anonymization.overrides.clone(),
        )));
    }
    registry.apply_alterations(&extensions)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::models::StrategyKind;
    use crate::domain::EntityTypeKey;

    const CONFIG: &str = r#"
[[anonymization.overrides]]
entity_type = "user"
property = "mail"
strategy = "clear"

[registry.user]
properties = [
    { name = "mail", strategy = "hash" },
    { name = "name", strategy = "randomize" },
]
"#;

    #[test]
    fn test_effective_registry_applies_overrides() {
        let config: EraserConfig = toml::from_str(CONFIG).unwrap();
        let registry = effective_registry(&config).unwrap();
        let user = EntityTypeKey::new("user").unwrap();

        let strategies: Vec<_> = registry
            .specs(&user)
            .iter()
            .map(|s| (s.property_name.as_str(), s.strategy))
            .collect();
        assert_eq!(
            strategies,
            [("mail", StrategyKind::Clear), ("name", StrategyKind::Randomize)]
        );
    }

    #[tokio::test]
    async fn test_execute_missing_config() {
        let args = ListArgs {
            entity_type: None,
            json: false,
        };
        assert_eq!(args.execute("does-not-exist.toml").await.unwrap(), 2);
    }
}
