use std::{collections::HashMap, path::Path, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    axis::{
        config::{default_speed, default_unit, AxisConfig},
        simulated::SimulatedAxis,
        Axis,
    },
    clock::Clock,
    runner::outcome::AxisMove,
};

/// A batch of simulated axes and the positions to drive them to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub poll_interval_ms: Option<u64>,
    pub axes: Vec<AxisSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub name: String,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub position: f64,
    #[serde(default = "default_speed")]
    pub speed: f64,
    pub target: f64,
    #[serde(default)]
    pub custom: HashMap<String, String>,
}

impl AxisSpec {
    pub fn new(name: &str, unit: &str, position: f64, speed: f64, target: f64) -> Self {
        Self {
            name: name.to_string(),
            unit: unit.to_string(),
            position,
            speed,
            target,
            custom: HashMap::new(),
        }
    }

    fn config(&self) -> AxisConfig {
        let mut config = AxisConfig::new(self.unit.clone());
        config.custom = self.custom.clone();
        config
    }
}

const BUILTIN_NAMES: [&str; 3] = ["demo0", "demo1", "demo2"];

impl Scenario {
    pub fn builtin_names() -> &'static [&'static str] {
        &BUILTIN_NAMES
    }

    pub fn builtin(name: &str) -> Option<Scenario> {
        let axes = match name {
            "demo0" => vec![AxisSpec::new("th", "deg", 5.0, 10.0, 50.0)],
            "demo1" => vec![
                AxisSpec::new("tth", "deg", 24.0, 5.0, 30.0),
                AxisSpec::new("th", "deg", 5.0, 10.0, 40.0),
            ],
            "demo2" => vec![
                AxisSpec::new("th", "deg", 10.0, 9.0, 90.5),
                AxisSpec::new("tth", "deg", 10.0, 8.0, 45.5),
                AxisSpec::new("chi", "deg", 10.0, 7.0, 55.2),
                AxisSpec::new("phi", "deg", 10.0, 6.0, 35.5),
                AxisSpec::new("mu", "deg", 10.0, 5.0, 27.9),
                AxisSpec::new("gam", "deg", 10.0, 4.0, 12.4),
            ],
            _ => return None,
        };
        Some(Scenario {
            name: Some(name.to_string()),
            poll_interval_ms: None,
            axes,
        })
    }

    pub fn from_json_str(json: &str) -> Result<Scenario> {
        let scenario: Scenario = serde_json::from_str(json).context("Invalid scenario JSON")?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Scenario> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("Failed to load scenario from {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.axes.is_empty() {
            anyhow::bail!("Scenario has no axes");
        }
        for (i, spec) in self.axes.iter().enumerate() {
            if self.axes[..i].iter().any(|other| other.name == spec.name) {
                anyhow::bail!("Axis {} appears more than once", spec.name);
            }
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval_ms.map(Duration::from_millis)
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("custom")
    }

    /// Builds fresh simulated axes on `clock`, paired with their targets.
    pub fn build(&self, clock: Arc<dyn Clock>) -> Result<Vec<AxisMove>> {
        self.validate()?;
        let mut moves = Vec::with_capacity(self.axes.len());
        for spec in &self.axes {
            let axis = SimulatedAxis::new(
                spec.name.clone(),
                spec.config(),
                spec.position,
                spec.speed,
                clock.clone(),
            )
            .with_context(|| format!("Failed to build axis {}", spec.name))?;
            let axis: Arc<dyn Axis> = Arc::new(axis);
            moves.push(AxisMove::new(axis, spec.target));
        }
        Ok(moves)
    }
}
