//! Field registry
//!
//! A closed, enumerable catalog of field kinds keyed by canonical name,
//! plus an alias table mapping alternate names (e.g. probe-specific
//! property names) onto canonical ones.
//!
//! - Built once through `FieldRegistryBuilder`, read-only afterwards
//! - Registered kinds are immutable; re-registering a name is rejected
//! - Extending a registry copies it, existing entries are untouched

use std::collections::HashMap;
use std::path::Path;

use crate::observability::{log_event_with_fields, Event};
use crate::validation::{ValidationError, ValidationResult};

use super::kind::FieldKind;

/// Read-only catalog of field kinds and aliases.
#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    /// Kinds in registration order
    kinds: Vec<FieldKind>,
    /// Canonical name -> position in `kinds`
    index: HashMap<String, usize>,
    /// Alias -> canonical name
    aliases: HashMap<String, String>,
}

impl FieldRegistry {
    /// Starts an empty registry
    pub fn builder() -> FieldRegistryBuilder {
        FieldRegistryBuilder {
            registry: FieldRegistry::default(),
        }
    }

    /// Starts a builder holding a copy of every kind and alias in `self`.
    pub fn extend(&self) -> FieldRegistryBuilder {
        FieldRegistryBuilder {
            registry: self.clone(),
        }
    }

    /// Loads kinds from a JSON file containing an array of field kinds.
    ///
    /// Kinds are checked when registered through `FieldRegistryBuilder::kinds`.
    pub fn load_kinds(path: &Path) -> ValidationResult<Vec<FieldKind>> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::configuration(format!(
                "Failed to read field kinds '{}': {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            ValidationError::configuration(format!(
                "Invalid field kinds JSON '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Gets a kind by canonical name
    pub fn get(&self, canonical: &str) -> Option<&FieldKind> {
        self.index.get(canonical).map(|&i| &self.kinds[i])
    }

    /// Resolves a canonical name or alias to the canonical name
    pub fn canonical_name(&self, name: &str) -> Option<&str> {
        if let Some(kind) = self.get(name) {
            return Some(&kind.name);
        }
        self.aliases.get(name).map(String::as_str)
    }

    /// Resolves a canonical name or alias to its kind
    pub fn resolve(&self, name: &str) -> Option<&FieldKind> {
        self.canonical_name(name).and_then(|canonical| self.get(canonical))
    }

    /// Checks if a name (canonical or alias) is known
    pub fn contains(&self, name: &str) -> bool {
        self.canonical_name(name).is_some()
    }

    /// Returns all kinds in registration order
    pub fn kinds(&self) -> impl Iterator<Item = &FieldKind> {
        self.kinds.iter()
    }

    /// Returns the aliases of a canonical name, sorted
    pub fn aliases_of(&self, canonical: &str) -> Vec<&str> {
        let mut aliases: Vec<&str> = self
            .aliases
            .iter()
            .filter(|(_, target)| target.as_str() == canonical)
            .map(|(alias, _)| alias.as_str())
            .collect();
        aliases.sort_unstable();
        aliases
    }

    /// Returns the number of registered kinds
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

/// Builder for [`FieldRegistry`]
#[derive(Debug)]
pub struct FieldRegistryBuilder {
    registry: FieldRegistry,
}

impl FieldRegistryBuilder {
    /// Registers a kind.
    ///
    /// # Errors
    ///
    /// `Configuration` if the name is already a kind or an alias, or if the
    /// kind's validator parameters are inconsistent.
    pub fn kind(mut self, kind: FieldKind) -> ValidationResult<Self> {
        if self.registry.contains(&kind.name) {
            return Err(ValidationError::configuration(format!(
                "Field kind '{}' is already registered",
                kind.name
            ))
            .for_field(&kind.name));
        }
        kind.validator()?;

        self.registry
            .index
            .insert(kind.name.clone(), self.registry.kinds.len());
        self.registry.kinds.push(kind);
        Ok(self)
    }

    /// Registers every kind in order
    pub fn kinds<I>(self, kinds: I) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = FieldKind>,
    {
        kinds.into_iter().try_fold(self, |builder, kind| builder.kind(kind))
    }

    /// Maps `alias` onto the canonical name `canonical`.
    ///
    /// # Errors
    ///
    /// `Configuration` if `canonical` is not a registered kind, or if
    /// `alias` is already a kind or an alias.
    pub fn alias(mut self, alias: impl Into<String>, canonical: &str) -> ValidationResult<Self> {
        let alias = alias.into();
        if self.registry.get(canonical).is_none() {
            return Err(ValidationError::configuration(format!(
                "Alias '{}' targets unknown field kind '{}'",
                alias, canonical
            ))
            .for_field(&alias));
        }
        if self.registry.contains(&alias) {
            return Err(ValidationError::configuration(format!(
                "Alias '{}' collides with an existing name",
                alias
            ))
            .for_field(&alias));
        }

        self.registry.aliases.insert(alias, canonical.to_string());
        Ok(self)
    }

    /// Finishes the registry
    pub fn build(self) -> FieldRegistry {
        let kinds = self.registry.len().to_string();
        let aliases = self.registry.aliases.len().to_string();
        log_event_with_fields(
            Event::RegistryBuilt,
            &[("kinds", kinds.as_str()), ("aliases", aliases.as_str())],
        );
        self.registry
    }
}
