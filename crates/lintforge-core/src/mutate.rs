//! Rule mutation helpers for loaded configurations
//!
//! Adding and modifying are separate contracts: [`add_rule`] refuses to touch
//! a configured rule, the others refuse to create one.

use crate::error::ForgeError;
use crate::layer::Configuration;
use crate::result::Result;
use crate::rule::{RuleEntry, RuleSeverity};
use serde_json::{Map, Value};

fn rules_mut(config: &mut Configuration) -> Result<&mut Map<String, Value>> {
    config
        .rules
        .as_mut()
        .ok_or_else(|| ForgeError::rule_mutation("Config has no rules!"))
}

fn configured<'a>(rules: &'a mut Map<String, Value>, rule: &str) -> Result<&'a mut Value> {
    rules
        .get_mut(rule)
        .ok_or_else(|| ForgeError::rule_mutation(format!("Rule {rule} is not configured!")))
}

/// Change the severity of a configured rule, keeping its options
pub fn set_rule_severity(
    config: &mut Configuration,
    rule: &str,
    severity: RuleSeverity,
) -> Result<()> {
    let value = configured(rules_mut(config)?, rule)?;
    let mut entry = RuleEntry::parse(rule, value)?;
    entry.severity = severity;
    *value = entry.to_canonical();
    Ok(())
}

pub fn disable_rule(config: &mut Configuration, rule: &str) -> Result<()> {
    let value = configured(rules_mut(config)?, rule)?;
    *value = Value::from(RuleSeverity::Off.as_str());
    Ok(())
}

/// Configure a rule that is not configured yet
pub fn add_rule(
    config: &mut Configuration,
    rule: &str,
    severity: RuleSeverity,
    options: Vec<Value>,
) -> Result<()> {
    let rules = rules_mut(config)?;
    if rules.contains_key(rule) {
        return Err(ForgeError::rule_mutation(format!(
            "Rule {rule} is already configured!"
        )));
    }
    rules.insert(
        rule.to_string(),
        RuleEntry::with_options(severity, options).to_canonical(),
    );
    Ok(())
}
