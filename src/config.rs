//! Effect configuration: turns a loosely typed option table (from a TOML
//! file and the command line) into a validated [`EffectConfig`].
//!
//! The option table mirrors the shape users write by hand:
//!
//! ```toml
//! interval = 3000
//!
//! [transition]
//! time = 400
//! curve = "ease"
//!
//! [effects]
//! fade = true
//! direction = "left"
//! ```
//!
//! Unknown keys are dropped with a warning and keys of the wrong type fall
//! back to the preset default. Values of the right type but outside their
//! allowed range are errors.

use std::fs;
use std::path::Path;
use std::time::Duration;

use clap::ValueEnum;
use log::{error, warn};
use serde::Serialize;
use toml::{Table, Value};

use crate::constants::{DEFAULT_TICK_INTERVAL_MS, DEFAULT_TRANSITION_MS};
use crate::error::ConfigurationError;
use crate::rotator::posture::Axis;

/// Fully resolved settings for one rotator. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectConfig {
    /// Always greater than zero.
    pub tick_interval_ms: u64,
    pub transition_ms: u64,
    /// Easing curve name, only type-checked here.
    pub transition_curve: String,
    pub fade: bool,
    pub axis: Axis,
}

impl EffectConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}

/// Default effect sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Cross-fading slides pushed in from the right
    Slideshow,
    /// Opaque slides pushed up from the bottom
    Banner,
}

impl Preset {
    pub fn defaults(self) -> EffectConfig {
        let (fade, axis) = match self {
            Preset::Slideshow => (true, Axis::Left),
            Preset::Banner => (false, Axis::Bottom),
        };
        EffectConfig {
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            transition_ms: DEFAULT_TRANSITION_MS,
            transition_curve: String::new(),
            fade,
            axis,
        }
    }
}

/// Command-line overrides, applied on top of the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub interval: Option<i64>,
    pub transition: Option<i64>,
    pub curve: Option<String>,
    pub fade: Option<bool>,
    pub axis: Option<String>,
}

impl Overrides {
    /// The overrides as an option table, so they go through the same
    /// checks as the config file.
    pub fn to_table(&self) -> Table {
        let mut root = Table::new();
        if let Some(interval) = self.interval {
            root.insert("interval".into(), Value::Integer(interval));
        }

        let mut transition = Table::new();
        if let Some(time) = self.transition {
            transition.insert("time".into(), Value::Integer(time));
        }
        if let Some(curve) = &self.curve {
            transition.insert("curve".into(), Value::String(curve.clone()));
        }
        if !transition.is_empty() {
            root.insert("transition".into(), Value::Table(transition));
        }

        let mut effects = Table::new();
        if let Some(fade) = self.fade {
            effects.insert("fade".into(), Value::Boolean(fade));
        }
        if let Some(axis) = &self.axis {
            effects.insert("direction".into(), Value::String(axis.clone()));
        }
        if !effects.is_empty() {
            root.insert("effects".into(), Value::Table(effects));
        }

        root
    }
}

pub fn load_from_path(path: &Path) -> Result<Table, ConfigurationError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Preset defaults, then the config file (if any), then the overrides.
pub fn load(preset: Preset, path: Option<&Path>, overrides: &Overrides) -> Result<EffectConfig, ConfigurationError> {
    let mut options = match path {
        Some(path) => load_from_path(path)?,
        None => Table::new(),
    };
    merge(&mut options, overrides.to_table());
    resolve(&options, preset)
}

/// Deep-merges `overrides` into `base`; sub-tables are merged key by key,
/// everything else is replaced.
pub fn merge(base: &mut Table, overrides: Table) {
    for (key, value) in overrides {
        match value {
            Value::Table(incoming) => match base.get_mut(&key) {
                Some(Value::Table(existing)) => merge(existing, incoming),
                _ => {
                    base.insert(key, Value::Table(incoming));
                }
            },
            value => {
                base.insert(key, value);
            }
        }
    }
}

pub fn resolve(options: &Table, preset: Preset) -> Result<EffectConfig, ConfigurationError> {
    let mut config = preset.defaults();
    let root = permit(options, &["interval", "transition", "effects"], "options");

    if let Some(interval) = clean(&root, "interval", "options.interval", "number", as_millis) {
        if interval <= 0 {
            return Err(ConfigurationError::NonPositiveInterval(interval));
        }
        config.tick_interval_ms = interval as u64;
    }

    if let Some(transition) = clean(&root, "transition", "options.transition", "table", Value::as_table) {
        let transition = permit(transition, &["time", "curve"], "transition");
        if let Some(time) = clean(&transition, "time", "transition.time", "number", as_millis) {
            if time < 0 {
                return Err(ConfigurationError::NegativeTransition(time));
            }
            config.transition_ms = time as u64;
        }
        if let Some(curve) = clean(&transition, "curve", "transition.curve", "string", Value::as_str) {
            config.transition_curve = curve.to_string();
        }
    }

    if let Some(effects) = clean(&root, "effects", "options.effects", "table", Value::as_table) {
        let effects = permit(effects, &["fade", "direction"], "effects");
        if let Some(fade) = clean(&effects, "fade", "effects.fade", "boolean", Value::as_bool) {
            config.fade = fade;
        }
        if let Some(direction) = clean(&effects, "direction", "effects.direction", "string", Value::as_str) {
            config.axis = direction.parse()?;
        }
    }

    Ok(config)
}

/// Copy of `table` holding only the `allowed` keys.
fn permit(table: &Table, allowed: &[&str], scope: &str) -> Table {
    let mut permitted = Table::new();
    for (key, value) in table {
        if allowed.contains(&key.as_str()) {
            permitted.insert(key.clone(), value.clone());
        } else {
            warn!("ignoring unknown option {scope}.{key}");
        }
    }
    permitted
}

/// Reads `key` with `extract`, treating a value of the wrong type as absent.
fn clean<'a, T>(
    table: &'a Table,
    key: &str,
    name: &str,
    expected: &str,
    extract: impl Fn(&'a Value) -> Option<T>,
) -> Option<T> {
    let value = table.get(key)?;
    let extracted = extract(value);
    if extracted.is_none() {
        error!("{name} must be of type {expected}");
    }
    extracted
}

fn as_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(ms) => Some(*ms),
        Value::Float(ms) => Some(ms.round() as i64),
        _ => None,
    }
}
