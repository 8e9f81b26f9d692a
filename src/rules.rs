use slotmap::{new_key_type, SlotMap};

use crate::dsl::{Condition, Proposition};
use crate::error::{Error, Result};

new_key_type! {
    /// A rule key
    pub struct RuleKey;
}

/// "IF premise THEN conclusion"
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FuzzyRule {
    pub(crate) premise: Option<Condition>,
    pub(crate) conclusion: Option<Proposition>,
}

impl FuzzyRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the premise. `None` leaves the rule without one, which makes it invalid.
    pub fn when(mut self, premise: impl Into<Option<Condition>>) -> Self {
        self.premise = premise.into();
        self
    }

    pub fn then(mut self, conclusion: impl Into<Option<Proposition>>) -> Result<Self> {
        self.conclusion = Some(conclusion.into().ok_or(Error::NullArgument("conclusion"))?);

        Ok(self)
    }

    pub fn premise(&self) -> Option<&Condition> {
        self.premise.as_ref()
    }

    pub fn conclusion(&self) -> Option<&Proposition> {
        self.conclusion.as_ref()
    }

    /// The premise's propositions in order; empty when there is no premise.
    pub fn premise_atoms(&self) -> Vec<&Proposition> {
        self.premise.as_ref().map(Condition::propositions).unwrap_or_default()
    }

    pub fn is_valid(&self) -> bool {
        self.premise.is_some() && self.conclusion.is_some()
    }
}

/// Rules of an engine. Rules are never removed, so iteration follows insertion order.
#[derive(Clone, Debug, Default)]
pub struct RuleSet(pub(crate) SlotMap<RuleKey, FuzzyRule>);

impl RuleSet {
    pub fn new() -> Self {
        RuleSet(SlotMap::with_key())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        RuleSet(SlotMap::with_capacity_and_key(capacity))
    }

    pub fn add(&mut self, rule: FuzzyRule) -> RuleKey {
        self.0.insert(rule)
    }

    pub fn get(&self, key: RuleKey) -> Option<&FuzzyRule> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RuleKey, &FuzzyRule)> {
        self.0.iter()
    }

    /// Valid rules with their premise and conclusion unwrapped.
    pub(crate) fn valid(&self) -> impl Iterator<Item = (RuleKey, &Condition, &Proposition)> {
        self.0.iter().filter_map(|(key, rule)| match (&rule.premise, &rule.conclusion) {
            (Some(premise), Some(conclusion)) => Some((key, premise, conclusion)),
            _ => None,
        })
    }
}

#[cfg(test)]
use crate::dsl::Operator;
#[cfg(test)]
use crate::membership::MembershipFunction;
#[cfg(test)]
use crate::variable::LinguisticVariable;

#[cfg(test)]
struct Fixture {
    water: LinguisticVariable,
    power: LinguisticVariable,
    cold: MembershipFunction,
    warm: MembershipFunction,
    hot: MembershipFunction,
    high: MembershipFunction,
}

#[cfg(test)]
fn fixture() -> Fixture {
    let mut water = LinguisticVariable::new("Water");
    let cold = water.add_trapezoid("Cold", 0., 0., 20., 40.).unwrap();
    let warm = water.add_trapezoid("Warm", 30., 50., 50., 70.).unwrap();
    let hot = water.add_trapezoid("Hot", 50., 80., 100., 100.).unwrap();
    let mut power = LinguisticVariable::new("Power");
    power.add_trapezoid("Low", 0., 25., 25., 50.).unwrap();
    let high = power.add_trapezoid("High", 25., 50., 50., 75.).unwrap();

    Fixture {
        water,
        power,
        cold,
        warm,
        hot,
        high,
    }
}

#[test]
fn test_premise_atoms() {
    let f = fixture();
    let rule = FuzzyRule::new()
        .when(f.water.is(&f.cold).unwrap().or(f.water.is(&f.warm).unwrap()).unwrap())
        .then(f.power.is(&f.high).unwrap())
        .unwrap();
    let atoms = rule.premise_atoms();

    assert_eq!(atoms.len(), 2);
    assert_eq!(atoms[0].variable(), "Water");
    assert_eq!(atoms[0].function().name(), "Cold");
    assert_eq!(atoms[1].variable(), "Water");
    assert_eq!(atoms[1].function().name(), "Warm");

    let single = FuzzyRule::new()
        .when(f.water.is(&f.cold).unwrap())
        .then(f.power.is(&f.high).unwrap())
        .unwrap();

    assert_eq!(single.premise_atoms().len(), 1);
}

#[test]
fn test_conclusion() {
    let f = fixture();
    let rule = FuzzyRule::new()
        .when(f.water.is(&f.cold).unwrap().or(f.water.is(&f.warm).unwrap()).unwrap())
        .then(f.power.is(&f.high).unwrap())
        .unwrap();
    let conclusion = rule.conclusion().unwrap();

    assert_eq!(conclusion.variable(), "Power");
    assert_eq!(conclusion.operator(), Operator::Is);
    assert_eq!(conclusion.function().name(), "High");
}

#[test]
fn test_valid_rules() {
    let f = fixture();
    let (water, cold, warm, hot) = (&f.water, &f.cold, &f.warm, &f.hot);
    let is = |mf: &MembershipFunction| water.is(mf).unwrap();
    let premises = [
        Condition::from(is(cold)),
        Condition::from(water.is_not(cold).unwrap()),
        is(cold).or(is(warm)).unwrap(),
        is(cold).or(is(warm)).unwrap().and(is(hot)).unwrap(),
        is(cold).and(is(warm)).unwrap().and(is(hot)).unwrap(),
        is(cold).or(is(warm)).unwrap().or(is(hot)).unwrap(),
    ];

    for premise in premises {
        let rule = FuzzyRule::new().when(premise).then(f.power.is(&f.high).unwrap()).unwrap();

        assert!(rule.is_valid());
    }
}

#[test]
fn test_invalid_rules() {
    let f = fixture();
    let no_conclusion = FuzzyRule::new().when(f.water.is(&f.cold).unwrap().or(f.water.is(&f.warm).unwrap()).unwrap());
    let no_premise = FuzzyRule::new().then(f.power.is(&f.high).unwrap()).unwrap();
    let empty_premise = FuzzyRule::new().when(None).then(f.power.is(&f.high).unwrap()).unwrap();

    assert!(!no_conclusion.is_valid());
    assert!(!no_premise.is_valid());
    assert!(!empty_premise.is_valid());
    assert!(empty_premise.premise_atoms().is_empty());
}

#[test]
fn test_then_requires_conclusion() {
    let f = fixture();
    let rule = FuzzyRule::new().when(f.water.is(&f.cold).unwrap()).then(None);

    assert_eq!(rule, Err(Error::NullArgument("conclusion")));
}

#[test]
fn test_rule_set_order() {
    let f = fixture();
    let mut rules = RuleSet::with_capacity(3);
    let first = rules.add(FuzzyRule::new().when(f.water.is(&f.cold).unwrap()));
    let second = rules.add(FuzzyRule::new().then(f.power.is(&f.high).unwrap()).unwrap());
    let third = rules.add(
        FuzzyRule::new()
            .when(f.water.is(&f.hot).unwrap())
            .then(f.power.is(&f.high).unwrap())
            .unwrap(),
    );

    assert_eq!(rules.len(), 3);
    assert_eq!(rules.iter().map(|(key, _)| key).collect::<Vec<_>>(), vec![first, second, third]);
    assert_eq!(rules.valid().map(|(key, ..)| key).collect::<Vec<_>>(), vec![third]);
    assert!(rules.get(second).is_some());
}
