//! Property-based tests for membership functions and defuzzification.

use fuzzy_mamdani::{
    DefuzzificationOp, Error, FuzzyEngine, FuzzyRule, Implication, InferenceConfig, Inputs, LinguisticVariable,
    MembershipFunction,
};
use proptest::prelude::*;

/// A trapezoidal output set as `(a, b - a, c - b, d - c)` plus the strength its rule fires at
type Conclusion = (i32, i32, i32, i32, f64);

fn conclusions(strength: impl Strategy<Value = f64>) -> impl Strategy<Value = Vec<Conclusion>> {
    prop::collection::vec((0i32..=60, 5i32..=25, 0i32..=20, 5i32..=25, strength), 1..=4)
}

fn implication() -> impl Strategy<Value = Implication> {
    prop_oneof![Just(Implication::Min), Just(Implication::Prod)]
}

/// One rule per conclusion, each premise a ramp whose input value is its firing strength.
fn engine(conclusions: &[Conclusion], defuzz_op: DefuzzificationOp, implication: Implication) -> (FuzzyEngine, Inputs) {
    let mut power = LinguisticVariable::new("Power");
    let mut engine = FuzzyEngine::with_config(defuzz_op, InferenceConfig::default().with_implication(implication));
    let mut inputs = Inputs::new();

    for (i, &(a, rise, plateau, fall, strength)) in conclusions.iter().enumerate() {
        let mut level = LinguisticVariable::new(format!("Level{i}"));
        let ramp = level.add_trapezoid("Ramp", 0., 1., 2., 2.).unwrap();
        let a = a as f64;
        let b = a + rise as f64;
        let c = b + plateau as f64;
        let d = c + fall as f64;
        let set = power.add_trapezoid(format!("Set{i}"), a, b, c, d).unwrap();

        engine.add_rule(
            FuzzyRule::new()
                .when(level.is(&ramp).unwrap())
                .then(power.is(&set).unwrap())
                .unwrap(),
        );
        inputs.add(format!("Level{i}"), strength);
    }

    (engine, inputs)
}

// =============================================================================
// Membership Functions
// =============================================================================

proptest! {
    /// A trapezoid is 0 outside [a, d], 1 on [b, c] and within [0, 1] everywhere
    #[test]
    fn prop_trapezoid_shape(
        a in -100f64..100.,
        rise in 0f64..50.,
        plateau in 0f64..50.,
        fall in 0f64..50.,
        x in -200f64..300.,
    ) {
        let (b, c, d) = (a + rise, a + rise + plateau, a + rise + plateau + fall);
        let f = MembershipFunction::trapezoid("T", a, b, c, d).unwrap();
        let mu = f.fuzzify(x);

        prop_assert!((0. ..=1.).contains(&mu), "{mu}");
        prop_assert_eq!((f.min(), f.max()), (a, d));

        if x < a || x > d {
            prop_assert_eq!(mu, 0.);
        }
        if b <= x && x <= c {
            prop_assert_eq!(mu, 1.);
        }
    }

    /// Misordered corners never build
    #[test]
    fn prop_trapezoid_rejects_misordered(a in -100f64..100., gap in 0.001f64..50.) {
        let result = MembershipFunction::trapezoid("T", a, a - gap, a + 1., a + 2.);

        prop_assert!(matches!(result, Err(Error::InvalidArgument { .. })), "{result:?}");
    }

    /// A bell peaks at its center whatever its width
    #[test]
    fn prop_bell_peak(width in 0.1f64..50., negative: bool, slope in 0.1f64..10., center in -100f64..100.) {
        let a = if negative { -width } else { width };
        let f = MembershipFunction::bell("B", a, slope, center).unwrap();

        prop_assert_eq!(f.fuzzify(center), 1.);
        prop_assert!(f.fuzzify(center + width) < 1.);
    }

    /// A bell of zero width never builds
    #[test]
    fn prop_bell_rejects_zero_width(slope in 0.1f64..10., center in -100f64..100.) {
        let result = MembershipFunction::bell("B", 0., slope, center);

        prop_assert!(matches!(result, Err(Error::InvalidArgument { .. })), "{result:?}");
    }

    /// A bell with a flat or inverted slope never builds
    #[test]
    fn prop_bell_rejects_non_positive_slope(width in 0.1f64..50., slope in -10f64..=0., center in -100f64..100.) {
        let result = MembershipFunction::bell("B", width, slope, center);

        prop_assert!(matches!(result, Err(Error::InvalidArgument { .. })), "{result:?}");
    }

    /// Curved shapes stay within [0, 1] and S and Z mirror each other
    #[test]
    fn prop_curves_in_unit_interval(
        start in -100f64..100.,
        spread in 0.1f64..50.,
        x in -200f64..300.,
    ) {
        let s = MembershipFunction::s_shaped("S", start, start + spread).unwrap();
        let z = MembershipFunction::z_shaped("Z", start, start + spread).unwrap();
        let g = MembershipFunction::gaussian("G", start, spread).unwrap();

        for mu in [s.fuzzify(x), z.fuzzify(x), g.fuzzify(x)] {
            prop_assert!((0. ..=1.).contains(&mu), "{mu} at {x}");
        }
        prop_assert!((s.fuzzify(x) + z.fuzzify(x) - 1.).abs() < 1e-12);
    }
}

// =============================================================================
// Defuzzification
// =============================================================================

proptest! {
    /// Sampled and exact centroids agree on trapezoidal rule bases and land inside the domain
    #[test]
    fn prop_centroids_agree(conclusions in conclusions(0.2f64..=1.), implication in implication()) {
        let (exact, inputs) = engine(&conclusions, DefuzzificationOp::TrapezoidCog, implication);
        let (sampled, _) = engine(&conclusions, DefuzzificationOp::Cog, implication);
        let exact = exact.defuzzify_single(&inputs).unwrap();
        let sampled = sampled.defuzzify_single(&inputs).unwrap();
        let min = conclusions.iter().map(|c| c.0).min().unwrap() as f64;
        let max = conclusions.iter().map(|c| c.0 + c.1 + c.2 + c.3).max().unwrap() as f64;

        prop_assert!((exact - sampled).abs() < 1e-3, "{exact} vs {sampled}");
        prop_assert!(min <= exact && exact <= max, "{exact} outside [{min}, {max}]");
    }

    /// Rule bases where nothing fires defuzzificate to exactly zero
    #[test]
    fn prop_no_firing_is_zero(conclusions in conclusions(Just(0.)), implication in implication()) {
        for defuzz_op in [DefuzzificationOp::TrapezoidCog, DefuzzificationOp::Cog, DefuzzificationOp::Mom] {
            let (engine, inputs) = engine(&conclusions, defuzz_op, implication);

            prop_assert_eq!(engine.defuzzify_single(&inputs).unwrap(), 0.);
        }
    }

    /// Non-finite inputs are rejected rather than silently disabling clipping
    #[test]
    fn prop_non_finite_input_fails(
        conclusions in conclusions(0f64..=1.),
        value in prop_oneof![Just(f64::NAN), Just(f64::INFINITY), Just(f64::NEG_INFINITY)],
    ) {
        let (engine, mut inputs) = engine(&conclusions, DefuzzificationOp::Cog, Implication::Min);

        inputs.add("Level0", value);

        prop_assert_eq!(engine.defuzzify(&inputs), Err(Error::InvalidInput("Level0".into())));
    }

    /// Inputs no premise refers to change nothing
    #[test]
    fn prop_extra_inputs_ignored(conclusions in conclusions(0f64..=1.), extra in -100f64..100.) {
        let (engine, inputs) = engine(&conclusions, DefuzzificationOp::Cog, Implication::Min);
        let mut padded = inputs.clone();

        padded.add("Unused", extra);

        prop_assert_eq!(engine.defuzzify(&inputs).unwrap(), engine.defuzzify(&padded).unwrap());
    }
}
