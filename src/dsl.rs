use std::ops::Not;

use crate::error::{Error, Result};
use crate::inputs::Inputs;
use crate::membership::MembershipFunction;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Is,
    IsNot,
}

/// "`variable` IS `function`" or "`variable` IS NOT `function`"
#[derive(Clone, Debug, PartialEq)]
pub struct Proposition {
    pub(crate) variable: String,
    pub(crate) operator: Operator,
    pub(crate) function: MembershipFunction,
}

impl Proposition {
    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn function(&self) -> &MembershipFunction {
        &self.function
    }

    /// Membership of `x` in this proposition's fuzzy set, complemented for IS NOT.
    pub fn truth(&self, x: f64) -> f64 {
        let mu = self.function.fuzzify(x);

        match self.operator {
            Operator::Is => mu,
            Operator::IsNot => 1. - mu,
        }
    }

    pub fn or(self, rhs: impl Into<Option<Condition>>) -> Result<Condition> {
        Condition::from(self).or(rhs)
    }

    pub fn and(self, rhs: impl Into<Option<Condition>>) -> Result<Condition> {
        Condition::from(self).and(rhs)
    }
}

/// A premise: propositions combined with the Zadeh operators.
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    Is(Proposition),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    pub fn or(self, rhs: impl Into<Option<Condition>>) -> Result<Self> {
        let rhs = rhs.into().ok_or(Error::NullArgument("rhs"))?;

        Ok(Condition::Or(Box::new(self), Box::new(rhs)))
    }

    pub fn and(self, rhs: impl Into<Option<Condition>>) -> Result<Self> {
        let rhs = rhs.into().ok_or(Error::NullArgument("rhs"))?;

        Ok(Condition::And(Box::new(self), Box::new(rhs)))
    }

    /// Truth value of the condition: AND is min, OR is max and NOT is the complement.
    pub fn evaluate(&self, inputs: &Inputs) -> Result<f64> {
        match self {
            Condition::Is(prop) => {
                let value = inputs
                    .get(&prop.variable)
                    .ok_or_else(|| Error::MissingInput(prop.variable.clone()))?;

                if !value.is_finite() {
                    return Err(Error::InvalidInput(prop.variable.clone()));
                }

                Ok(prop.truth(value))
            },
            Condition::And(lhs, rhs) => Ok(f64::min(lhs.evaluate(inputs)?, rhs.evaluate(inputs)?)),
            Condition::Or(lhs, rhs) => Ok(f64::max(lhs.evaluate(inputs)?, rhs.evaluate(inputs)?)),
            Condition::Not(cond) => Ok(1. - cond.evaluate(inputs)?),
        }
    }

    /// All propositions of the tree, left to right.
    pub fn propositions(&self) -> Vec<&Proposition> {
        let mut props = Vec::new();

        fn parse<'p>(cond: &'p Condition, out: &mut Vec<&'p Proposition>) {
            match cond {
                Condition::Is(prop) => out.push(prop),
                Condition::And(lhs, rhs) | Condition::Or(lhs, rhs) => {
                    parse(lhs, out);
                    parse(rhs, out);
                },
                Condition::Not(cond) => parse(cond, out),
            }
        }

        parse(self, &mut props);

        props
    }
}

impl From<Proposition> for Condition {
    fn from(prop: Proposition) -> Self {
        Condition::Is(prop)
    }
}

impl From<Proposition> for Option<Condition> {
    fn from(prop: Proposition) -> Self {
        Some(Condition::Is(prop))
    }
}

impl Not for Condition {
    type Output = Condition;

    fn not(self) -> Condition {
        Condition::Not(Box::new(self))
    }
}

impl Not for Proposition {
    type Output = Condition;

    fn not(self) -> Condition {
        !Condition::from(self)
    }
}

#[cfg(test)]
fn water() -> (crate::variable::LinguisticVariable, [MembershipFunction; 3]) {
    let mut water = crate::variable::LinguisticVariable::new("Water");
    let cold = water.add_trapezoid("Cold", 0., 0., 20., 40.).unwrap();
    let warm = water.add_triangle("Warm", 30., 50., 70.).unwrap();
    let hot = water.add_trapezoid("Hot", 50., 80., 100., 100.).unwrap();

    (water, [cold, warm, hot])
}

#[test]
fn test_zadeh_operators() {
    let (water, [cold, warm, hot]) = water();
    let mut inputs = Inputs::new();

    inputs.add("Water", 35.);

    // Cold = 0.25, Warm = 0.25, Hot = 0
    let cold_or_warm = water.is(&cold).unwrap().or(water.is(&warm).unwrap()).unwrap();
    let cold_and_hot = water.is(&cold).unwrap().and(water.is(&hot).unwrap()).unwrap();
    let not_hot = water.is_not(&hot).unwrap();
    let negated = !water.is(&cold).unwrap();

    assert_eq!(cold_or_warm.evaluate(&inputs), Ok(0.25));
    assert_eq!(cold_and_hot.evaluate(&inputs), Ok(0.));
    assert_eq!(Condition::from(not_hot).evaluate(&inputs), Ok(1.));
    assert_eq!(negated.evaluate(&inputs), Ok(0.75));

    inputs.add("Water", 60.);

    // Cold = 0, Warm = 0.5, Hot = 1/3
    let nested = water
        .is(&cold)
        .unwrap()
        .or(water.is(&warm).unwrap())
        .unwrap()
        .and(water.is(&hot).unwrap())
        .unwrap();

    assert_eq!(nested.evaluate(&inputs), Ok(1. / 3.));
}

#[test]
fn test_missing_input() {
    let (water, [cold, ..]) = water();
    let cond = Condition::from(water.is(&cold).unwrap());
    let mut inputs = Inputs::new();

    inputs.add("Power", 10.);

    assert_eq!(cond.evaluate(&inputs), Err(Error::MissingInput("Water".into())));
}

#[test]
fn test_non_finite_input() {
    let (water, [cold, warm, _]) = water();
    let cond = !water.is(&cold).unwrap().or(water.is(&warm).unwrap()).unwrap();

    for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let inputs: Inputs = [("Water", value)].into_iter().collect();

        assert_eq!(cond.evaluate(&inputs), Err(Error::InvalidInput("Water".into())));
    }
}

#[test]
fn test_null_operands() {
    let (water, [cold, ..]) = water();

    assert_eq!(water.is(&cold).unwrap().or(None), Err(Error::NullArgument("rhs")));
    assert_eq!(water.is(&cold).unwrap().and(None), Err(Error::NullArgument("rhs")));
    assert_eq!(water.is(None), Err(Error::NullArgument("function")));
    assert_eq!(water.is_not(None), Err(Error::NullArgument("function")));
}

#[test]
fn test_propositions() {
    let (water, [cold, warm, hot]) = water();
    let cond = water
        .is(&cold)
        .unwrap()
        .or(water.is(&warm).unwrap())
        .unwrap()
        .and(!water.is(&hot).unwrap())
        .unwrap();
    let names: Vec<_> = cond.propositions().iter().map(|p| (p.variable(), p.function().name())).collect();

    assert_eq!(names, vec![("Water", "Cold"), ("Water", "Warm"), ("Water", "Hot")]);
}
