use std::collections::HashMap;

use crate::rules::RuleKey;

/// Crisp values inferred for each output variable, plus the firing strength of every evaluated rule.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outputs {
    defuzzificated_memberships: HashMap<String, f64>,
    firing_strengths: HashMap<RuleKey, f64>,
}

impl Outputs {
    pub(crate) fn new(defuzzificated_memberships: HashMap<String, f64>, firing_strengths: HashMap<RuleKey, f64>) -> Self {
        Self {
            defuzzificated_memberships,
            firing_strengths,
        }
    }

    pub fn get(&self, variable: &str) -> Option<f64> {
        self.defuzzificated_memberships.get(variable).copied()
    }

    /// Firing strength of a valid rule. Invalid rules are never evaluated and have none.
    pub fn firing_strength(&self, rule: RuleKey) -> Option<f64> {
        self.firing_strengths.get(&rule).copied()
    }

    pub fn len(&self) -> usize {
        self.defuzzificated_memberships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defuzzificated_memberships.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.defuzzificated_memberships
            .iter()
            .map(|(name, val)| (name.as_str(), *val))
    }

    pub fn into_map(self) -> HashMap<String, f64> {
        self.defuzzificated_memberships
    }
}
