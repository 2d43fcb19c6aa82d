//! Rule severities, rule entries and rule-name ordering

use crate::error::ForgeError;
use crate::result::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// Rule severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    /// Disable the rule
    Off,
    /// Warning (doesn't fail the lint run)
    Warn,
    /// Error (fails the lint run)
    Error,
}

impl RuleSeverity {
    /// Numeric level used by the engine's resolved configuration
    pub fn level(&self) -> u8 {
        match self {
            RuleSeverity::Off => 0,
            RuleSeverity::Warn => 1,
            RuleSeverity::Error => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleSeverity::Off => "off",
            RuleSeverity::Warn => "warn",
            RuleSeverity::Error => "error",
        }
    }

    pub fn from_level(level: u64) -> Option<Self> {
        match level {
            0 => Some(RuleSeverity::Off),
            1 => Some(RuleSeverity::Warn),
            2 => Some(RuleSeverity::Error),
            _ => None,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "off" => Some(RuleSeverity::Off),
            "warn" | "warning" => Some(RuleSeverity::Warn),
            "error" => Some(RuleSeverity::Error),
            _ => None,
        }
    }

    /// Parse a severity given either as a number or as a name
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().and_then(Self::from_level),
            Value::String(s) => Self::from_name(s),
            _ => None,
        }
    }
}

/// A rule setting: severity plus the rule's positional options
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEntry {
    pub severity: RuleSeverity,
    pub options: Vec<Value>,
}

impl RuleEntry {
    pub fn new(severity: RuleSeverity) -> Self {
        Self {
            severity,
            options: Vec::new(),
        }
    }

    pub fn with_options(severity: RuleSeverity, options: Vec<Value>) -> Self {
        Self { severity, options }
    }

    /// Parse any accepted rule form: `2`, `"error"`, `[2, {..}]`, `["error", ..]`
    pub fn parse(rule: &str, value: &Value) -> Result<Self> {
        let invalid = || {
            ForgeError::config_error(format!("Invalid severity for rule '{rule}': {value}"))
        };

        match value {
            Value::Array(items) => {
                let (first, rest) = items.split_first().ok_or_else(invalid)?;
                let severity = RuleSeverity::from_value(first).ok_or_else(invalid)?;
                Ok(Self::with_options(severity, rest.to_vec()))
            }
            other => RuleSeverity::from_value(other)
                .map(Self::new)
                .ok_or_else(invalid),
        }
    }

    /// Engine form: `[level, ...options]`
    pub fn to_raw(&self) -> Value {
        let mut items = Vec::with_capacity(self.options.len() + 1);
        items.push(Value::from(self.severity.level()));
        items.extend(self.options.iter().cloned());
        Value::Array(items)
    }

    /// Canonical form: bare severity name, or `[name, ...options]`
    pub fn to_canonical(&self) -> Value {
        if self.options.is_empty() {
            return Value::from(self.severity.as_str());
        }
        let mut items = Vec::with_capacity(self.options.len() + 1);
        items.push(Value::from(self.severity.as_str()));
        items.extend(self.options.iter().cloned());
        Value::Array(items)
    }

    pub fn is_off(&self) -> bool {
        self.severity == RuleSeverity::Off
    }
}

/// Rule-name ordering: bare names before namespaced names, lexicographic within each group
pub fn rule_order(a: &str, b: &str) -> Ordering {
    match (a.contains('/'), b.contains('/')) {
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        _ => a.cmp(b),
    }
}

/// Namespace of a rule name (`"react"` for `"react/jsx-key"`), if any
pub fn rule_namespace(rule: &str) -> Option<&str> {
    rule.rsplit_once('/').map(|(namespace, _)| namespace)
}
