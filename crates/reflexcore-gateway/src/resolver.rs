//! Resolves a candidate goal's template name into concrete task steps.
//!
//! Adapted from the heuristic command generator's template-lookup
//! shape: a fixed consultation order, falling through to the next
//! strategy only when the previous one has nothing to offer.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reflexcore_types::{Task, TaskStep, TaskStepMeta};
use thiserror::Error;

/// Errors raised while resolving a template into task steps.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolverError {
    /// No consultation strategy produced a leaf for this template.
    #[error("no actuator leaf is registered for template {template_name:?}")]
    UnresolvedTemplate {
        /// The template name that could not be resolved.
        template_name: String,
    },
}

/// Resolves a template name (plus an optional candidate item) into a
/// [`Task`] ready for dispatch.
#[async_trait]
pub trait TaskActionResolver: Send + Sync {
    /// Performs the resolution.
    ///
    /// # Errors
    ///
    /// Returns [`ResolverError::UnresolvedTemplate`] if no strategy in
    /// the consultation order recognizes `template_name`.
    async fn resolve(
        &self,
        template_name: &str,
        description: &str,
        candidate_item: Option<&str>,
    ) -> Result<Task, ResolverError>;
}

/// Resolves templates in three steps, each consulted only if the
/// previous one declined: an exact registry match, a known-alias
/// table, then a keyword heuristic over the description. If none
/// recognize the template the resolution fails closed rather than
/// guessing at a leaf.
#[derive(Debug, Default)]
pub struct HeuristicTaskResolver {
    registry: BTreeMap<String, String>,
}

impl HeuristicTaskResolver {
    /// Builds a resolver with an empty registry (aliases and the
    /// keyword/fallback steps still apply).
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: BTreeMap::new(),
        }
    }

    /// Registers an exact template-name to leaf mapping, consulted
    /// first and taking priority over aliases and heuristics.
    #[must_use]
    pub fn with_registered(mut self, template_name: impl Into<String>, leaf: impl Into<String>) -> Self {
        self.registry.insert(template_name.into(), leaf.into());
        self
    }

    fn alias_leaf(template_name: &str) -> Option<&'static str> {
        match template_name {
            "eat" | "consume" => Some("consume_food"),
            "rest" | "sleep" => Some("rest_at_shelter"),
            "explore" | "scout" => Some("explore_area"),
            "socialize" | "greet" => Some("initiate_social_contact"),
            "craft" | "build" => Some("craft_item"),
            _ => None,
        }
    }

    fn keyword_leaf(description: &str) -> Option<&'static str> {
        let lower = description.to_lowercase();
        if lower.contains("food") || lower.contains("hungry") || lower.contains("eat") {
            Some("consume_food")
        } else if lower.contains("shelter") || lower.contains("warm") {
            Some("seek_shelter")
        } else if lower.contains("danger") || lower.contains("threat") {
            Some("retreat_to_safety")
        } else {
            None
        }
    }
}

#[async_trait]
impl TaskActionResolver for HeuristicTaskResolver {
    async fn resolve(
        &self,
        template_name: &str,
        description: &str,
        candidate_item: Option<&str>,
    ) -> Result<Task, ResolverError> {
        let leaf = self
            .registry
            .get(template_name)
            .cloned()
            .or_else(|| Self::alias_leaf(template_name).map(ToOwned::to_owned))
            .or_else(|| Self::keyword_leaf(description).map(ToOwned::to_owned))
            .ok_or_else(|| ResolverError::UnresolvedTemplate {
                template_name: template_name.to_owned(),
            })?;

        let mut args = BTreeMap::new();
        if let Some(item) = candidate_item {
            args.insert("item".to_owned(), serde_json::Value::String(item.to_owned()));
        }

        Ok(Task {
            description: description.to_owned(),
            steps: vec![TaskStep {
                meta: TaskStepMeta { leaf },
                args,
            }],
        })
    }
}
