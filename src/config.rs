//! # Configuration Module
//!
//! Tunables for the spatial core, deserializable from JSON so hosts can ship
//! them alongside other engine settings.

use log::warn;
use serde::{Deserialize, Serialize};

/// Tunables for physics, selection, and meshing.
///
/// All fields have engine defaults; a host typically loads overrides with
/// `serde_json` and passes the result to [`crate::scene::Scene::with_config`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Fixed physics step in milliseconds.
    pub physics_tick_ms: u64,
    /// Default reach of selection rays, in world units.
    pub selection_max_distance: f32,
    /// Overlap below this threshold is treated as touching, not colliding.
    pub contact_epsilon: f32,
}

impl Default for CoreConfig {
    fn default() -> Self {
        CoreConfig {
            physics_tick_ms: 20,
            selection_max_distance: 20.0,
            contact_epsilon: 1e-5,
        }
    }
}

impl CoreConfig {
    /// The fixed physics step in seconds.
    pub fn physics_dt(&self) -> f32 {
        self.physics_tick_ms as f32 / 1000.0
    }

    /// Parses a JSON override document. Absent fields keep their defaults;
    /// a document that fails to parse at all is logged and replaced by the
    /// full defaults, since bad settings should not stop the engine.
    pub fn from_json_str(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(config) => config,
            Err(error) => {
                warn!("invalid core config, using defaults: {error}");
                CoreConfig::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_values() {
        let config = CoreConfig::default();
        assert_eq!(config.physics_tick_ms, 20);
        assert!((config.physics_dt() - 0.02).abs() < 1e-9);
        assert_eq!(config.selection_max_distance, 20.0);
    }

    #[test]
    fn partial_json_overrides_keep_defaults() {
        let config = CoreConfig::from_json_str(r#"{"physics_tick_ms": 10}"#);
        assert_eq!(config.physics_tick_ms, 10);
        assert_eq!(config.selection_max_distance, 20.0);
    }

    #[test]
    fn unparseable_json_falls_back_to_defaults() {
        let config = CoreConfig::from_json_str("not json");
        assert_eq!(config, CoreConfig::default());
    }
}
