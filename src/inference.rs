use std::collections::HashMap;

use log::{debug, trace};

use crate::aggregate::{AggregatedSet, Contribution};
use crate::config::InferenceConfig;
use crate::error::{Error, Result};
use crate::inputs::Inputs;
use crate::ops::DefuzzificationOp;
use crate::outputs::Outputs;
use crate::rules::{FuzzyRule, RuleKey, RuleSet};

/// Evaluates a rule base: fires every valid rule, aggregates the clipped conclusions per output
/// variable with max and defuzzificates each aggregate.
#[derive(Clone, Debug)]
pub struct FuzzyEngine {
    rules: RuleSet,
    defuzz_op: DefuzzificationOp,
    config: InferenceConfig,
}

impl FuzzyEngine {
    pub fn new(defuzz_op: DefuzzificationOp) -> Self {
        Self::with_config(defuzz_op, InferenceConfig::default())
    }

    pub fn with_config(defuzz_op: DefuzzificationOp, config: InferenceConfig) -> Self {
        Self {
            rules: RuleSet::new(),
            defuzz_op,
            config,
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut RuleSet {
        &mut self.rules
    }

    pub fn add_rule(&mut self, rule: FuzzyRule) -> RuleKey {
        self.rules.add(rule)
    }

    pub fn defuzz_op(&self) -> DefuzzificationOp {
        self.defuzz_op
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Crisp value of every output variable concluded on by a valid rule.
    pub fn defuzzify(&self, inputs: &Inputs) -> Result<Outputs> {
        self.defuzz_op.check(&self.rules)?;

        // Fire rules
        let mut firing_strengths = HashMap::with_capacity(self.rules.len());
        let mut aggregated_memberships: HashMap<&str, AggregatedSet> = HashMap::new();

        for (key, rule) in self.rules.iter() {
            let (Some(premise), Some(conclusion)) = (&rule.premise, &rule.conclusion) else {
                debug!("Skipping invalid rule {key:?}");
                continue;
            };
            let strength = premise.evaluate(inputs)?;

            trace!(
                "Rule {key:?} fired at {strength} for {} {:?} {}",
                conclusion.variable(),
                conclusion.operator(),
                conclusion.function().name()
            );

            firing_strengths.insert(key, strength);
            aggregated_memberships
                .entry(conclusion.variable())
                .or_insert_with(|| AggregatedSet::new(conclusion.variable()))
                .push(Contribution::new(conclusion.clone(), strength, self.config.implication));
        }

        // Defuzzificate
        let mut defuzzificated_memberships = HashMap::with_capacity(aggregated_memberships.len());

        for (variable, aggregated_membership) in aggregated_memberships {
            let Some((min, max)) = aggregated_membership.domain() else {
                continue;
            };
            let defuzzed = self
                .defuzz_op
                .call(&aggregated_membership, min, max, self.config.samples)?;

            debug!("{variable} defuzzificated to {defuzzed} over [{min}, {max}] with {:?}", self.defuzz_op);

            defuzzificated_memberships.insert(variable.to_owned(), defuzzed);
        }

        Ok(Outputs::new(defuzzificated_memberships, firing_strengths))
    }

    /// Like [`FuzzyEngine::defuzzify`] for rule bases with exactly one output variable.
    pub fn defuzzify_single(&self, inputs: &Inputs) -> Result<f64> {
        let outputs = self.defuzzify(inputs)?;
        let value = outputs.iter().next().map(|(_, value)| value);

        match (value, outputs.len()) {
            (Some(value), 1) => Ok(value),
            (_, len) => Err(Error::AmbiguousOutput(len)),
        }
    }
}

#[cfg(test)]
use crate::ops::Implication;
#[cfg(test)]
use crate::variable::LinguisticVariable;

#[cfg(test)]
fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_engine_is_shareable() {
    assert_send_sync::<FuzzyEngine>();
}

#[test]
fn test_water_power() {
    let mut water = LinguisticVariable::new("Water");
    let cold = water.add_trapezoid("Cold", 0., 0., 20., 40.).unwrap();
    let warm = water.add_triangle("Warm", 30., 50., 70.).unwrap();
    let hot = water.add_trapezoid("Hot", 50., 80., 100., 100.).unwrap();
    let mut power = LinguisticVariable::new("Power");
    let low = power.add_triangle("Low", 0., 25., 50.).unwrap();
    let high = power.add_triangle("High", 25., 50., 75.).unwrap();
    let rules = [
        FuzzyRule::new()
            .when(water.is(&cold).unwrap().or(water.is(&warm).unwrap()).unwrap())
            .then(power.is(&high).unwrap())
            .unwrap(),
        FuzzyRule::new()
            .when(water.is(&hot).unwrap())
            .then(power.is(&low).unwrap())
            .unwrap(),
    ];
    let inputs: Inputs = [("Water", 60.)].into_iter().collect();

    for (config, expected) in [
        (InferenceConfig::default(), 1550. / 39.),
        (InferenceConfig::default().with_implication(Implication::Prod), 445. / 11.),
    ] {
        for defuzz_op in [DefuzzificationOp::TrapezoidCog, DefuzzificationOp::Cog] {
            let mut engine = FuzzyEngine::with_config(defuzz_op, config);
            let keys: Vec<_> = rules.iter().cloned().map(|rule| engine.add_rule(rule)).collect();
            let outputs = engine.defuzzify(&inputs).unwrap();
            let power = outputs.get("Power").unwrap();

            assert!((power - expected).abs() < 1e-3, "{defuzz_op:?} {config:?}: {power}");
            assert_eq!(outputs.firing_strength(keys[0]), Some(0.5));
            assert_eq!(outputs.firing_strength(keys[1]), Some(1. / 3.));
            assert_eq!(engine.defuzzify_single(&inputs), Ok(power));
        }
    }
}

#[test]
fn test_invalid_rules_are_skipped() {
    let mut water = LinguisticVariable::new("Water");
    let cold = water.add_trapezoid("Cold", 0., 0., 20., 40.).unwrap();
    let mut power = LinguisticVariable::new("Power");
    let high = power.add_triangle("High", 25., 50., 75.).unwrap();
    let mut steam = LinguisticVariable::new("Steam");
    let gauss = steam.add_gaussian("Gauss", 10., 5.).unwrap();
    let mut engine = FuzzyEngine::new(DefuzzificationOp::TrapezoidCog);

    // Neither the missing premise nor the non-trapezoidal conclusion matters once the rule is skipped
    let orphan = engine.add_rule(FuzzyRule::new().then(steam.is(&gauss).unwrap()).unwrap());
    let unfinished = engine.add_rule(FuzzyRule::new().when(water.is(&cold).unwrap()));
    let valid = engine.add_rule(
        FuzzyRule::new()
            .when(water.is(&cold).unwrap())
            .then(power.is(&high).unwrap())
            .unwrap(),
    );
    let mut inputs = Inputs::new();

    inputs.add("Water", 10.);

    let outputs = engine.defuzzify(&inputs).unwrap();

    assert_eq!(outputs.len(), 1);
    assert!(outputs.get("Steam").is_none());
    assert_eq!(outputs.firing_strength(orphan), None);
    assert_eq!(outputs.firing_strength(unfinished), None);
    assert_eq!(outputs.firing_strength(valid), Some(1.));
    assert!((outputs.get("Power").unwrap() - 50.).abs() < 1e-9);
}

#[test]
fn test_outputs_per_variable() {
    let mut water = LinguisticVariable::new("Water");
    let cold = water.add_trapezoid("Cold", 0., 0., 20., 40.).unwrap();
    let hot = water.add_trapezoid("Hot", 50., 80., 100., 100.).unwrap();
    let mut power = LinguisticVariable::new("Power");
    let high = power.add_triangle("High", 25., 50., 75.).unwrap();
    let mut valve = LinguisticVariable::new("Valve");
    let open = valve.add_rectangle("Open", 60., 100.).unwrap();
    let mut engine = FuzzyEngine::new(DefuzzificationOp::Cog);

    engine.add_rule(
        FuzzyRule::new()
            .when(water.is(&cold).unwrap())
            .then(power.is(&high).unwrap())
            .unwrap(),
    );
    engine.add_rule(
        FuzzyRule::new()
            .when(water.is(&hot).unwrap())
            .then(valve.is(&open).unwrap())
            .unwrap(),
    );

    let inputs: Inputs = [("Water", 90.), ("Unused", 1.)].into_iter().collect();
    let outputs = engine.defuzzify(&inputs).unwrap();

    // Nothing fires for Power
    assert_eq!(outputs.get("Power"), Some(0.));
    assert!((outputs.get("Valve").unwrap() - 80.).abs() < 1e-3);
    assert_eq!(engine.defuzzify_single(&inputs), Err(Error::AmbiguousOutput(2)));
    assert_eq!(
        FuzzyEngine::new(DefuzzificationOp::Cog).defuzzify_single(&inputs),
        Err(Error::AmbiguousOutput(0))
    );
}

#[test]
fn test_missing_input_fails() {
    let mut water = LinguisticVariable::new("Water");
    let cold = water.add_trapezoid("Cold", 0., 0., 20., 40.).unwrap();
    let mut power = LinguisticVariable::new("Power");
    let high = power.add_triangle("High", 25., 50., 75.).unwrap();
    let mut engine = FuzzyEngine::new(DefuzzificationOp::Cog);

    engine.add_rule(
        FuzzyRule::new()
            .when(water.is(&cold).unwrap())
            .then(power.is(&high).unwrap())
            .unwrap(),
    );

    assert_eq!(
        engine.defuzzify(&Inputs::new()),
        Err(Error::MissingInput("Water".into()))
    );
}

#[test]
fn test_non_finite_input_fails() {
    let mut water = LinguisticVariable::new("Water");
    let cold = water.add_trapezoid("Cold", 0., 0., 20., 40.).unwrap();
    let mut power = LinguisticVariable::new("Power");
    let high = power.add_triangle("High", 25., 50., 75.).unwrap();
    let mut engine = FuzzyEngine::new(DefuzzificationOp::Cog);

    engine.add_rule(
        FuzzyRule::new()
            .when(water.is_not(&cold).unwrap())
            .then(power.is(&high).unwrap())
            .unwrap(),
    );

    for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let inputs: Inputs = [("Water", value)].into_iter().collect();

        assert_eq!(engine.defuzzify(&inputs), Err(Error::InvalidInput("Water".into())));
    }
}

#[test]
fn test_sample_count_is_clamped() {
    let mut water = LinguisticVariable::new("Water");
    let hot = water.add_trapezoid("Hot", 50., 80., 100., 100.).unwrap();
    let mut power = LinguisticVariable::new("Power");
    let low = power.add_triangle("Low", 0., 25., 50.).unwrap();
    let config = InferenceConfig::default().with_samples(usize::MAX);
    let mut engine = FuzzyEngine::with_config(DefuzzificationOp::Cog, config);

    engine.add_rule(
        FuzzyRule::new()
            .when(water.is(&hot).unwrap())
            .then(power.is(&low).unwrap())
            .unwrap(),
    );

    let inputs: Inputs = [("Water", 60.)].into_iter().collect();
    let power = engine.defuzzify_single(&inputs).unwrap();

    assert!((power - 25.).abs() < 1e-6, "{power}");
}

#[test]
fn test_zero_width_conclusion() {
    let mut water = LinguisticVariable::new("Water");
    let cold = water.add_trapezoid("Cold", 0., 0., 20., 40.).unwrap();
    let mut power = LinguisticVariable::new("Power");
    let point = power.add_triangle("Point", 5., 5., 5.).unwrap();
    let inputs: Inputs = [("Water", 10.)].into_iter().collect();

    // Every segment of the domain [5, 5] has zero width, so there is no area
    for defuzz_op in [DefuzzificationOp::TrapezoidCog, DefuzzificationOp::Cog] {
        let mut engine = FuzzyEngine::new(defuzz_op);

        engine.add_rule(
            FuzzyRule::new()
                .when(water.is(&cold).unwrap())
                .then(power.is(&point).unwrap())
                .unwrap(),
        );

        assert_eq!(engine.defuzzify_single(&inputs), Ok(0.), "{defuzz_op:?}");
    }
}
