//! Mamdani fuzzy inference.
//!
//! Declare [`LinguisticVariable`]s made of overlapping fuzzy sets, write rules over them and let a
//! [`FuzzyEngine`] turn crisp inputs into crisp outputs:
//!
//! ```
//! use fuzzy_mamdani::{DefuzzificationOp, FuzzyEngine, FuzzyRule, Inputs, LinguisticVariable};
//!
//! # fn main() -> fuzzy_mamdani::Result<()> {
//! let mut water = LinguisticVariable::new("Water");
//! let cold = water.add_trapezoid("Cold", 0., 0., 20., 40.)?;
//! let warm = water.add_triangle("Warm", 30., 50., 70.)?;
//! let hot = water.add_trapezoid("Hot", 50., 80., 100., 100.)?;
//!
//! let mut power = LinguisticVariable::new("Power");
//! let low = power.add_triangle("Low", 0., 25., 50.)?;
//! let high = power.add_triangle("High", 25., 50., 75.)?;
//!
//! let mut engine = FuzzyEngine::new(DefuzzificationOp::TrapezoidCog);
//!
//! engine.add_rule(FuzzyRule::new().when(water.is(&cold)?.or(water.is(&warm)?)?).then(power.is(&high)?)?);
//! engine.add_rule(FuzzyRule::new().when(water.is(&hot)?).then(power.is(&low)?)?);
//!
//! let mut inputs = Inputs::new();
//! inputs.add("Water", 60.);
//!
//! let power = engine.defuzzify_single(&inputs)?;
//! assert!((power - 39.74).abs() < 0.01);
//! # Ok(())
//! # }
//! ```
//!
//! Conclusions are clipped at their rule's firing strength by default ([`Implication::Min`]), which
//! settles the example above at 1550/39 ≈ 39.74. Scaling them instead with [`Implication::Prod`]
//! through [`InferenceConfig::with_implication`] gives 445/11 ≈ 40.45.

mod aggregate;
mod config;
mod dsl;
mod error;
mod inference;
mod inputs;
mod linspace;
mod math;
mod membership;
mod ops;
mod outputs;
mod rules;
mod variable;

pub use aggregate::{AggregatedSet, Contribution};
pub use config::{InferenceConfig, DEFAULT_SAMPLES, MAX_SAMPLES};
pub use dsl::{Condition, Operator, Proposition};
pub use error::{Error, Result};
pub use inference::FuzzyEngine;
pub use inputs::Inputs;
pub use linspace::Linspace;
pub use membership::{MembershipFunction, Shape, UNBOUNDED_MAX, UNBOUNDED_MIN};
pub use ops::{DefuzzificationOp, Implication};
pub use outputs::Outputs;
pub use rules::{FuzzyRule, RuleKey, RuleSet};
pub use variable::LinguisticVariable;

#[test]
fn test_heater() {
    let mut temperature = LinguisticVariable::new("Temperature");
    let freezing = temperature.add_z_shaped("Freezing", 0., 10.).unwrap();
    let mild = temperature.add_gaussian("Mild", 18., 4.).unwrap();
    let scorching = temperature.add_s_shaped("Scorching", 25., 35.).unwrap();

    let mut heater = LinguisticVariable::new("Heater");
    let off = heater.add_trapezoid("Off", 0., 0., 10., 30.).unwrap();
    let half = heater.add_triangle("Half", 20., 50., 80.).unwrap();
    let full = heater.add_trapezoid("Full", 70., 90., 100., 100.).unwrap();

    let mut engine = FuzzyEngine::new(DefuzzificationOp::Cog);

    engine.add_rule(
        FuzzyRule::new()
            .when(temperature.is(&freezing).unwrap())
            .then(heater.is(&full).unwrap())
            .unwrap(),
    );
    engine.add_rule(
        FuzzyRule::new()
            .when(temperature.is(&mild).unwrap())
            .then(heater.is(&half).unwrap())
            .unwrap(),
    );
    let neither = temperature
        .is_not(&freezing)
        .unwrap()
        .and(!temperature.is(&mild).unwrap())
        .unwrap();

    engine.add_rule(
        FuzzyRule::new()
            .when(temperature.is(&scorching).unwrap().or(neither).unwrap())
            .then(heater.is(&off).unwrap())
            .unwrap(),
    );

    let level = |degrees: f64| {
        let inputs: Inputs = [("Temperature", degrees)].into_iter().collect();

        engine.defuzzify_single(&inputs).unwrap()
    };

    for degrees in [-5., 0., 5., 10., 15., 18., 22., 30., 40.] {
        assert!((0. ..=100.).contains(&level(degrees)), "{degrees}");
    }

    assert!(level(-5.) > 85.);
    assert!(level(0.) > 85.);
    assert!((level(18.) - 50.).abs() < 1e-6);
    assert!(level(40.) < 15.);
}
