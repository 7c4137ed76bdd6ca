#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

//! Environment-derived runtime configuration.
//!
//! Parsed and validated once, at first access, the way the rest of
//! this stack reads its `env::var` knobs: every variable has a
//! default, is parsed eagerly, and invalid or contradictory
//! combinations fail fast rather than surfacing as a confusing
//! runtime error three layers down.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

/// Execution gateway arming mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayMode {
    /// Actions are planned and logged but never actually dispatched.
    Shadow,
    /// Actions are dispatched for real.
    Live,
}

/// Which environment the process is running in, gating which optional
/// capabilities are legal to enable at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// Live, user-facing operation. Most capabilities are forbidden here.
    Production,
    /// Local development. Dev-only capabilities are permitted.
    Dev,
    /// Recorded/replayed runs used to produce comparison artifacts.
    Golden,
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// A variable was present but failed to parse as its expected type.
    #[error("{var} could not be parsed: {value:?}")]
    InvalidValue {
        /// The offending variable name.
        var: &'static str,
        /// The raw value that failed to parse.
        value: String,
    },
    /// Live mode was requested without the explicit confirmation flag.
    #[error("REFLEXCORE_GATEWAY_MODE=live requires REFLEXCORE_GATEWAY_LIVE_CONFIRM=true")]
    LiveModeNotConfirmed,
    /// The accumulator map was configured with zero capacity.
    #[error("REFLEXCORE_ACCUMULATOR_MAX must be at least 1")]
    ZeroAccumulatorCapacity,
    /// The hysteresis margin is not smaller than the arming threshold,
    /// which would make the disarm threshold zero or negative.
    #[error("REFLEXCORE_HYSTERESIS_MARGIN ({margin}) must be smaller than REFLEXCORE_DRIVE_THRESHOLD ({threshold})")]
    HysteresisMarginTooLarge {
        /// Configured margin.
        margin: f64,
        /// Configured threshold.
        threshold: f64,
    },
    /// Hashing the canonical configuration subset failed.
    #[error("failed to compute configuration digest: {0}")]
    Digest(#[from] reflexcore_canon::CanonError),
    /// `executor_mode=live` was combined with `skip_readiness=true`.
    #[error("REFLEXCORE_SKIP_READINESS cannot be set when the executor runs live")]
    LiveModeForbidsSkipReadiness,
    /// `executor_mode=live` was combined with `task_type_bridge=true`.
    #[error("REFLEXCORE_TASK_TYPE_BRIDGE cannot be set when the executor runs live")]
    LiveModeForbidsTaskTypeBridge,
    /// `skip_readiness=true` without dev endpoints enabled or a golden run.
    #[error("REFLEXCORE_SKIP_READINESS requires REFLEXCORE_DEV_ENDPOINTS_ENABLED or a golden run")]
    SkipReadinessRequiresDevOrGolden,
    /// `skip_readiness=true` while running in production.
    #[error("REFLEXCORE_SKIP_READINESS cannot be set in production run mode")]
    SkipReadinessForbiddenInProduction,
    /// `task_type_bridge=true` outside dev or golden run mode.
    #[error("REFLEXCORE_TASK_TYPE_BRIDGE requires dev or golden run mode")]
    TaskTypeBridgeRequiresDevOrGolden,
}

/// Validated runtime configuration for one reflex core process.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanningRuntimeConfig {
    /// Drive level at which the reflex gate arms.
    pub drive_threshold: f64,
    /// Gap between the arm threshold and the disarm threshold.
    pub hysteresis_margin: f64,
    /// Milliseconds before an unfinished accumulator is evicted.
    pub accumulator_ttl_ms: i64,
    /// Maximum number of in-flight accumulators retained at once.
    pub accumulator_max: usize,
    /// Maximum number of lifecycle events retained at once.
    pub event_buffer_max: usize,
    /// Whether the gateway actually dispatches actions.
    pub gateway_mode: GatewayMode,
    /// Path the JSON logger appends to.
    pub log_path: String,
    /// Maximum reflex firings allowed in flight simultaneously.
    pub max_concurrent_firings: usize,
    /// Which environment this process considers itself to be running in.
    pub run_mode: RunMode,
    /// Whether the executor is allowed to skip its readiness preflight.
    pub skip_readiness: bool,
    /// Whether dev-only HTTP endpoints are exposed.
    pub dev_endpoints_enabled: bool,
    /// Whether the legacy task-type bridge is active.
    pub task_type_bridge: bool,
    /// Whether legacy leaf names are rewritten to their current form.
    pub legacy_leaf_rewrite: bool,
    /// Whether the planning executor runs at all.
    pub executor_enabled: bool,
    /// Content digest over the allowlisted canonical configuration
    /// subset, truncated to 16 hex characters. Not itself hashed.
    #[serde(skip)]
    pub digest: String,
}

/// Canonicalizable, allowlisted subset of configuration used to
/// compute the startup digest. `log_path` is excluded: it is a local
/// filesystem detail, not part of the process's logical identity.
#[derive(Serialize)]
struct DigestSubset {
    drive_threshold: f64,
    hysteresis_margin: f64,
    accumulator_ttl_ms: i64,
    accumulator_max: usize,
    event_buffer_max: usize,
    gateway_mode: GatewayMode,
    max_concurrent_firings: usize,
    run_mode: RunMode,
    executor_enabled: bool,
    skip_readiness: bool,
    task_type_bridge: bool,
    legacy_leaf_rewrite: bool,
}

impl PlanningRuntimeConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Self::from_map`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = [
            "REFLEXCORE_DRIVE_THRESHOLD",
            "REFLEXCORE_HYSTERESIS_MARGIN",
            "REFLEXCORE_ACCUMULATOR_TTL_MS",
            "REFLEXCORE_ACCUMULATOR_MAX",
            "REFLEXCORE_EVENT_BUFFER_MAX",
            "REFLEXCORE_GATEWAY_MODE",
            "REFLEXCORE_GATEWAY_LIVE_CONFIRM",
            "REFLEXCORE_LOG_PATH",
            "REFLEXCORE_MAX_CONCURRENT_FIRINGS",
            "REFLEXCORE_RUN_MODE",
            "REFLEXCORE_SKIP_READINESS",
            "REFLEXCORE_DEV_ENDPOINTS_ENABLED",
            "REFLEXCORE_TASK_TYPE_BRIDGE",
            "REFLEXCORE_LEGACY_LEAF_REWRITE",
            "REFLEXCORE_EXECUTOR_ENABLED",
        ]
        .into_iter()
        .filter_map(|name| std::env::var(name).ok().map(|value| (name.to_owned(), value)))
        .collect();
        Self::from_map(&vars)
    }

    /// Parses and validates configuration from an explicit map,
    /// applying defaults for any variable not present. Production code
    /// uses [`Self::from_env`]; tests use this directly to avoid
    /// mutating process-global environment state.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a present variable
    /// fails to parse, [`ConfigError::LiveModeNotConfirmed`] if live
    /// mode is requested without confirmation,
    /// [`ConfigError::ZeroAccumulatorCapacity`] if the accumulator map
    /// is sized to zero, [`ConfigError::HysteresisMarginTooLarge`] if
    /// the margin would make the disarm threshold non-positive, or one
    /// of the `LiveModeForbids*`/`*Requires*` variants if the run mode,
    /// executor mode, and capability flags form one of the three
    /// forbidden combinations.
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let drive_threshold = parse_or_default(vars, "REFLEXCORE_DRIVE_THRESHOLD", 0.7)?;
        let hysteresis_margin = parse_or_default(vars, "REFLEXCORE_HYSTERESIS_MARGIN", 0.05)?;
        let accumulator_ttl_ms =
            parse_or_default(vars, "REFLEXCORE_ACCUMULATOR_TTL_MS", 1_800_000_i64)?;
        let accumulator_max: usize = parse_or_default(vars, "REFLEXCORE_ACCUMULATOR_MAX", 50)?;
        let event_buffer_max: usize = parse_or_default(vars, "REFLEXCORE_EVENT_BUFFER_MAX", 500)?;
        let gateway_mode = parse_gateway_mode(vars)?;
        let live_confirmed = parse_or_default(vars, "REFLEXCORE_GATEWAY_LIVE_CONFIRM", false)?;
        let log_path = vars
            .get("REFLEXCORE_LOG_PATH")
            .cloned()
            .unwrap_or_else(|| "./reflexcore.log".to_owned());
        let max_concurrent_firings: usize =
            parse_or_default(vars, "REFLEXCORE_MAX_CONCURRENT_FIRINGS", 4)?;
        let run_mode = parse_run_mode(vars)?;
        let skip_readiness = parse_or_default(vars, "REFLEXCORE_SKIP_READINESS", false)?;
        let dev_endpoints_enabled =
            parse_or_default(vars, "REFLEXCORE_DEV_ENDPOINTS_ENABLED", false)?;
        let task_type_bridge = parse_or_default(vars, "REFLEXCORE_TASK_TYPE_BRIDGE", false)?;
        let legacy_leaf_rewrite = parse_or_default(vars, "REFLEXCORE_LEGACY_LEAF_REWRITE", false)?;
        let executor_enabled = parse_or_default(vars, "REFLEXCORE_EXECUTOR_ENABLED", true)?;

        if gateway_mode == GatewayMode::Live && !live_confirmed {
            return Err(ConfigError::LiveModeNotConfirmed);
        }
        if accumulator_max == 0 {
            return Err(ConfigError::ZeroAccumulatorCapacity);
        }
        if hysteresis_margin >= drive_threshold {
            return Err(ConfigError::HysteresisMarginTooLarge {
                margin: hysteresis_margin,
                threshold: drive_threshold,
            });
        }
        if gateway_mode == GatewayMode::Live {
            if skip_readiness {
                return Err(ConfigError::LiveModeForbidsSkipReadiness);
            }
            if task_type_bridge {
                return Err(ConfigError::LiveModeForbidsTaskTypeBridge);
            }
        }
        if skip_readiness {
            if !dev_endpoints_enabled && run_mode != RunMode::Golden {
                return Err(ConfigError::SkipReadinessRequiresDevOrGolden);
            }
            if run_mode == RunMode::Production {
                return Err(ConfigError::SkipReadinessForbiddenInProduction);
            }
        }
        // `task_type_bridge` requiring shadow mode is already covered above:
        // live mode rejects `task_type_bridge=true` outright, so reaching
        // this point with the bridge enabled means the executor is shadowed.
        if task_type_bridge && !matches!(run_mode, RunMode::Dev | RunMode::Golden) {
            return Err(ConfigError::TaskTypeBridgeRequiresDevOrGolden);
        }

        let subset = DigestSubset {
            drive_threshold,
            hysteresis_margin,
            accumulator_ttl_ms,
            accumulator_max,
            event_buffer_max,
            gateway_mode,
            max_concurrent_firings,
            run_mode,
            executor_enabled,
            skip_readiness,
            task_type_bridge,
            legacy_leaf_rewrite,
        };
        let full_digest = reflexcore_canon::content_hash(&subset)?;
        let digest = full_digest[..16].to_owned();

        Ok(Self {
            drive_threshold,
            hysteresis_margin,
            accumulator_ttl_ms,
            accumulator_max,
            event_buffer_max,
            gateway_mode,
            log_path,
            max_concurrent_firings,
            run_mode,
            skip_readiness,
            dev_endpoints_enabled,
            task_type_bridge,
            legacy_leaf_rewrite,
            executor_enabled,
            digest,
        })
    }

    /// The drive level below which the armed gate disarms.
    #[must_use]
    pub fn disarm_threshold(&self) -> f64 {
        self.drive_threshold - self.hysteresis_margin
    }

    /// Renders a human-readable startup banner.
    #[must_use]
    pub fn startup_banner(&self) -> String {
        format!(
            "reflexcore config digest={} run_mode={:?} mode={:?} threshold={} margin={} accumulator_max={} event_buffer_max={} max_concurrent_firings={} skip_readiness={} task_type_bridge={} legacy_leaf_rewrite={} executor_enabled={}",
            self.digest,
            self.run_mode,
            self.gateway_mode,
            self.drive_threshold,
            self.hysteresis_margin,
            self.accumulator_max,
            self.event_buffer_max,
            self.max_concurrent_firings,
            self.skip_readiness,
            self.task_type_bridge,
            self.legacy_leaf_rewrite,
            self.executor_enabled,
        )
    }
}

fn parse_gateway_mode(vars: &HashMap<String, String>) -> Result<GatewayMode, ConfigError> {
    match vars.get("REFLEXCORE_GATEWAY_MODE").map(String::as_str) {
        None | Some("shadow") => Ok(GatewayMode::Shadow),
        Some("live") => Ok(GatewayMode::Live),
        Some(other) => Err(ConfigError::InvalidValue {
            var: "REFLEXCORE_GATEWAY_MODE",
            value: other.to_owned(),
        }),
    }
}

fn parse_run_mode(vars: &HashMap<String, String>) -> Result<RunMode, ConfigError> {
    match vars.get("REFLEXCORE_RUN_MODE").map(String::as_str) {
        None | Some("production") => Ok(RunMode::Production),
        Some("dev") => Ok(RunMode::Dev),
        Some("golden") => Ok(RunMode::Golden),
        Some(other) => Err(ConfigError::InvalidValue {
            var: "REFLEXCORE_RUN_MODE",
            value: other.to_owned(),
        }),
    }
}

trait ParsableDefault: Sized {
    fn parse_value(raw: &str) -> Option<Self>;
}

impl ParsableDefault for f64 {
    fn parse_value(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}
impl ParsableDefault for i64 {
    fn parse_value(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}
impl ParsableDefault for usize {
    fn parse_value(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}
impl ParsableDefault for bool {
    fn parse_value(raw: &str) -> Option<Self> {
        raw.parse().ok()
    }
}

fn parse_or_default<T: ParsableDefault>(
    vars: &HashMap<String, String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match vars.get(name) {
        None => Ok(default),
        Some(raw) => T::parse_value(raw).ok_or_else(|| ConfigError::InvalidValue {
            var: name,
            value: raw.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, GatewayMode, PlanningRuntimeConfig, RunMode};
    use std::collections::HashMap;

    #[test]
    fn defaults_are_valid() {
        let config = PlanningRuntimeConfig::from_map(&HashMap::new()).unwrap();
        assert_eq!(config.gateway_mode, GatewayMode::Shadow);
        assert_eq!(config.digest.len(), 16);
    }

    #[test]
    fn live_mode_without_confirmation_is_rejected() {
        let mut vars = HashMap::new();
        vars.insert("REFLEXCORE_GATEWAY_MODE".to_owned(), "live".to_owned());
        let result = PlanningRuntimeConfig::from_map(&vars);
        assert_eq!(result, Err(ConfigError::LiveModeNotConfirmed));
    }

    #[test]
    fn live_mode_with_confirmation_is_accepted() {
        let mut vars = HashMap::new();
        vars.insert("REFLEXCORE_GATEWAY_MODE".to_owned(), "live".to_owned());
        vars.insert("REFLEXCORE_GATEWAY_LIVE_CONFIRM".to_owned(), "true".to_owned());
        let config = PlanningRuntimeConfig::from_map(&vars).unwrap();
        assert_eq!(config.gateway_mode, GatewayMode::Live);
    }

    #[test]
    fn zero_accumulator_capacity_is_rejected() {
        let mut vars = HashMap::new();
        vars.insert("REFLEXCORE_ACCUMULATOR_MAX".to_owned(), "0".to_owned());
        let result = PlanningRuntimeConfig::from_map(&vars);
        assert_eq!(result, Err(ConfigError::ZeroAccumulatorCapacity));
    }

    #[test]
    fn oversized_hysteresis_margin_is_rejected() {
        let mut vars = HashMap::new();
        vars.insert("REFLEXCORE_DRIVE_THRESHOLD".to_owned(), "0.5".to_owned());
        vars.insert("REFLEXCORE_HYSTERESIS_MARGIN".to_owned(), "0.5".to_owned());
        let result = PlanningRuntimeConfig::from_map(&vars);
        assert!(matches!(
            result,
            Err(ConfigError::HysteresisMarginTooLarge { .. })
        ));
    }

    #[test]
    fn digest_is_stable_across_equal_configurations() {
        let a = PlanningRuntimeConfig::from_map(&HashMap::new()).unwrap();
        let b = PlanningRuntimeConfig::from_map(&HashMap::new()).unwrap();
        assert_eq!(a.digest, b.digest);
    }

    #[test]
    fn defaults_pick_production_run_mode() {
        let config = PlanningRuntimeConfig::from_map(&HashMap::new()).unwrap();
        assert_eq!(config.run_mode, RunMode::Production);
    }

    #[test]
    fn live_mode_forbids_skip_readiness() {
        let mut vars = HashMap::new();
        vars.insert("REFLEXCORE_GATEWAY_MODE".to_owned(), "live".to_owned());
        vars.insert("REFLEXCORE_GATEWAY_LIVE_CONFIRM".to_owned(), "true".to_owned());
        vars.insert("REFLEXCORE_SKIP_READINESS".to_owned(), "true".to_owned());
        let result = PlanningRuntimeConfig::from_map(&vars);
        assert_eq!(result, Err(ConfigError::LiveModeForbidsSkipReadiness));
    }

    #[test]
    fn live_mode_forbids_task_type_bridge() {
        let mut vars = HashMap::new();
        vars.insert("REFLEXCORE_GATEWAY_MODE".to_owned(), "live".to_owned());
        vars.insert("REFLEXCORE_GATEWAY_LIVE_CONFIRM".to_owned(), "true".to_owned());
        vars.insert("REFLEXCORE_TASK_TYPE_BRIDGE".to_owned(), "true".to_owned());
        let result = PlanningRuntimeConfig::from_map(&vars);
        assert_eq!(result, Err(ConfigError::LiveModeForbidsTaskTypeBridge));
    }

    #[test]
    fn skip_readiness_requires_dev_endpoints_or_golden_run() {
        let mut vars = HashMap::new();
        vars.insert("REFLEXCORE_SKIP_READINESS".to_owned(), "true".to_owned());
        let result = PlanningRuntimeConfig::from_map(&vars);
        assert_eq!(result, Err(ConfigError::SkipReadinessRequiresDevOrGolden));
    }

    #[test]
    fn skip_readiness_is_permitted_on_a_golden_run() {
        let mut vars = HashMap::new();
        vars.insert("REFLEXCORE_SKIP_READINESS".to_owned(), "true".to_owned());
        vars.insert("REFLEXCORE_RUN_MODE".to_owned(), "golden".to_owned());
        let config = PlanningRuntimeConfig::from_map(&vars).unwrap();
        assert!(config.skip_readiness);
    }

    #[test]
    fn task_type_bridge_requires_dev_or_golden_run_mode() {
        let mut vars = HashMap::new();
        vars.insert("REFLEXCORE_TASK_TYPE_BRIDGE".to_owned(), "true".to_owned());
        let result = PlanningRuntimeConfig::from_map(&vars);
        assert_eq!(result, Err(ConfigError::TaskTypeBridgeRequiresDevOrGolden));
    }

    #[test]
    fn task_type_bridge_is_permitted_in_shadow_dev_mode() {
        let mut vars = HashMap::new();
        vars.insert("REFLEXCORE_TASK_TYPE_BRIDGE".to_owned(), "true".to_owned());
        vars.insert("REFLEXCORE_RUN_MODE".to_owned(), "dev".to_owned());
        let config = PlanningRuntimeConfig::from_map(&vars).unwrap();
        assert!(config.task_type_bridge);
    }
}
