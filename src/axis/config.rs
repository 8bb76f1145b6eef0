use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_UNIT: &str = "mm";
pub const DEFAULT_SPEED: f64 = 10.0;

pub fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

pub fn default_speed() -> f64 {
    DEFAULT_SPEED
}

/// Static configuration of an axis. Only `unit` is interpreted today; other
/// keys ride along in `custom`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub custom: HashMap<String, String>,
}

impl AxisConfig {
    pub fn new(unit: impl Into<String>) -> Self {
        Self {
            unit: unit.into(),
            custom: HashMap::new(),
        }
    }

    pub fn with_custom(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "unit" => Some(self.unit.as_str()),
            _ => self.custom.get(key).map(String::as_str),
        }
    }
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self::new(DEFAULT_UNIT)
    }
}
