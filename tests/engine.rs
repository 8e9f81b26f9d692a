//! End-to-end inference over the water heater rule bases.

use fuzzy_mamdani::{
    DefuzzificationOp, Error, FuzzyEngine, FuzzyRule, Implication, InferenceConfig, Inputs, LinguisticVariable,
    MembershipFunction, Result,
};

fn water_at(value: f64) -> Inputs {
    let mut inputs = Inputs::new();
    inputs.add("Water", value);
    inputs
}

fn config(implication: Implication) -> InferenceConfig {
    InferenceConfig::default().with_implication(implication)
}

/// Cold / Warm / Hot water driving two triangular power levels
fn two_level_engine(defuzz_op: DefuzzificationOp, implication: Implication) -> Result<FuzzyEngine> {
    let mut water = LinguisticVariable::new("Water");
    let cold = water.add_trapezoid("Cold", 0., 0., 20., 40.)?;
    let warm = water.add_triangle("Warm", 30., 50., 70.)?;
    let hot = water.add_trapezoid("Hot", 50., 80., 100., 100.)?;

    let mut power = LinguisticVariable::new("Power");
    let low = power.add_triangle("Low", 0., 25., 50.)?;
    let high = power.add_triangle("High", 25., 50., 75.)?;

    let mut engine = FuzzyEngine::with_config(defuzz_op, config(implication));

    engine.add_rule(FuzzyRule::new().when(water.is(&cold)?.or(water.is(&warm)?)?).then(power.is(&high)?)?);
    engine.add_rule(FuzzyRule::new().when(water.is(&hot)?).then(power.is(&low)?)?);

    Ok(engine)
}

/// Three water levels driving three power levels, the medium one optionally Gaussian
fn three_level_engine(
    defuzz_op: DefuzzificationOp,
    implication: Implication,
    gaussian_medium: bool,
) -> Result<FuzzyEngine> {
    let mut water = LinguisticVariable::new("Water");
    let cold = water.add_trapezoid("Cold", 0., 0., 40., 70.)?;
    let warm = water.add_triangle("Warm", 40., 70., 100.)?;
    let hot = water.add_trapezoid("Hot", 70., 100., 120., 120.)?;

    let mut power = LinguisticVariable::new("Power");
    let low = power.add_triangle("Low", -50., 20., 50.)?;
    let medium = if gaussian_medium {
        power.add_gaussian("Medium", 60., 20.)?
    } else {
        power.add_triangle("Medium", 20., 50., 100.)?
    };
    let high = power.add_triangle("High", 50., 100., 150.)?;

    let mut engine = FuzzyEngine::with_config(defuzz_op, config(implication));

    engine.add_rule(FuzzyRule::new().when(water.is(&cold)?).then(power.is(&high)?)?);
    engine.add_rule(FuzzyRule::new().when(water.is(&warm)?).then(power.is(&medium)?)?);
    engine.add_rule(FuzzyRule::new().when(water.is(&hot)?).then(power.is(&low)?)?);

    Ok(engine)
}

#[test]
fn test_trapezoid_cog() -> Result<()> {
    let clipped = two_level_engine(DefuzzificationOp::TrapezoidCog, Implication::Min)?;
    let scaled = two_level_engine(DefuzzificationOp::TrapezoidCog, Implication::Prod)?;

    // Cold or Warm fires at 0.5, Hot at 1/3
    let power = clipped.defuzzify_single(&water_at(60.))?;
    assert!((power - 1550. / 39.).abs() < 1e-9, "{power}");

    let power = scaled.defuzzify_single(&water_at(60.))?;
    assert_eq!(power.floor(), 40.);
    assert!((power - 445. / 11.).abs() < 1e-9, "{power}");

    Ok(())
}

#[test]
fn test_trapezoid_cog_three_levels() -> Result<()> {
    // Cold fires at 1/3, Warm at 2/3
    let clipped = three_level_engine(DefuzzificationOp::TrapezoidCog, Implication::Min, false)?;
    let scaled = three_level_engine(DefuzzificationOp::TrapezoidCog, Implication::Prod, false)?;

    let power = clipped.defuzzify_single(&water_at(60.))?;
    assert!((power - 76.193853).abs() < 1e-5, "{power}");

    let power = scaled.defuzzify_single(&water_at(60.))?;
    assert!((power - 72.679739).abs() < 1e-5, "{power}");

    Ok(())
}

#[test]
fn test_trapezoid_cog_rejects_gaussian() -> Result<()> {
    let engine = three_level_engine(DefuzzificationOp::TrapezoidCog, Implication::Min, true)?;

    assert_eq!(engine.defuzzify(&water_at(60.)), Err(Error::NotTrapezoidal("Medium".into())));
    // Rejected before any input is looked at
    assert_eq!(engine.defuzzify(&Inputs::new()), Err(Error::NotTrapezoidal("Medium".into())));

    Ok(())
}

#[test]
fn test_zero_denominator() -> Result<()> {
    let mut water = LinguisticVariable::new("Water");
    let cold = water.add_trapezoid("Cold", 0., 0., 40., 50.)?;
    let hot = water.add_trapezoid("Hot", 70., 80., 100., 100.)?;

    let mut power = LinguisticVariable::new("Power");
    let low = power.add_triangle("Low", 0., 20., 40.)?;
    let high = power.add_triangle("High", 50., 100., 150.)?;

    for defuzz_op in [DefuzzificationOp::TrapezoidCog, DefuzzificationOp::Cog] {
        let mut engine = FuzzyEngine::new(defuzz_op);

        engine.add_rule(FuzzyRule::new().when(water.is(&cold)?).then(power.is(&high)?)?);
        engine.add_rule(FuzzyRule::new().when(water.is(&hot)?).then(power.is(&low)?)?);

        let outputs = engine.defuzzify(&water_at(60.))?;

        assert_eq!(outputs.get("Power"), Some(0.));
    }

    Ok(())
}

#[test]
fn test_sampled_cog_with_gaussian() -> Result<()> {
    let clipped = three_level_engine(DefuzzificationOp::Cog, Implication::Min, true)?;
    let scaled = three_level_engine(DefuzzificationOp::Cog, Implication::Prod, true)?;

    // The Gaussian widens the domain to [-50, 200]
    let power = clipped.defuzzify_single(&water_at(60.))?;
    assert!((power - 74.8345).abs() < 1e-3, "{power}");

    let power = scaled.defuzzify_single(&water_at(60.))?;
    assert_eq!(power.floor(), 71.);

    Ok(())
}

#[test]
fn test_centroids_agree_on_trapezoids() -> Result<()> {
    for implication in [Implication::Min, Implication::Prod] {
        for water in [0., 15., 35., 45., 60., 75., 90.] {
            let exact = three_level_engine(DefuzzificationOp::TrapezoidCog, implication, false)?
                .defuzzify_single(&water_at(water))?;
            let sampled = three_level_engine(DefuzzificationOp::Cog, implication, false)?
                .defuzzify_single(&water_at(water))?;

            assert!((exact - sampled).abs() < 1e-3, "{implication:?} at {water}: {exact} vs {sampled}");
        }
    }

    Ok(())
}

#[test]
fn test_negated_conclusion() -> Result<()> {
    let mut water = LinguisticVariable::new("Water");
    let hot = water.add_trapezoid("Hot", 50., 80., 100., 100.)?;

    let mut power = LinguisticVariable::new("Power");
    let low = power.add_trapezoid("Low", 0., 0., 25., 50.)?;

    let mut exact = FuzzyEngine::new(DefuzzificationOp::TrapezoidCog);
    let mut sampled = FuzzyEngine::new(DefuzzificationOp::Cog);

    for engine in [&mut exact, &mut sampled] {
        engine.add_rule(FuzzyRule::new().when(water.is(&hot)?).then(power.is_not(&low)?)?);
        engine.add_rule(FuzzyRule::new().when(water.is_not(&hot)?).then(power.is(&low)?)?);
    }

    // Hot fires at 1, leaving the ramp of "not Low" over [25, 50]
    let exact_power = exact.defuzzify_single(&water_at(100.))?;
    let sampled_power = sampled.defuzzify_single(&water_at(100.))?;

    assert!((exact_power - 125. / 3.).abs() < 1e-9, "{exact_power}");
    assert!((exact_power - sampled_power).abs() < 1e-3);

    Ok(())
}

#[test]
fn test_inputs_only_needed_for_premises() -> Result<()> {
    let mut water = LinguisticVariable::new("Water");
    let cold = water.add_trapezoid("Cold", 0., 0., 20., 40.)?;
    let mut power = LinguisticVariable::new("Power");
    let high = power.add_triangle("High", 25., 50., 75.)?;

    let mut engine = FuzzyEngine::new(DefuzzificationOp::Cog);

    engine.add_rule(FuzzyRule::new().when(water.is(&cold)?).then(power.is(&high)?)?);

    // Power is an output, so no input is needed for it
    let outputs = engine.defuzzify(&water_at(10.))?;
    assert!((outputs.get("Power").unwrap() - 50.).abs() < 1e-9);

    let mut inputs = Inputs::new();
    inputs.add("Power", 10.);

    assert_eq!(engine.defuzzify(&inputs), Err(Error::MissingInput("Water".into())));

    Ok(())
}

#[test]
fn test_shared_engine() -> Result<()> {
    let engine = two_level_engine(DefuzzificationOp::TrapezoidCog, Implication::Min)?;
    let expected = engine.defuzzify_single(&water_at(60.))?;
    let engine = &engine;

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(move || engine.defuzzify_single(&water_at(60.))))
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(expected));
        }
    });

    Ok(())
}

#[test]
fn test_composite_conclusion() -> Result<()> {
    let mut water = LinguisticVariable::new("Water");
    let cold = water.add_trapezoid("Cold", 0., 0., 20., 40.)?;
    let left = MembershipFunction::triangle("Rise", 0., 50., 100.)?;
    let right = MembershipFunction::gaussian("Tail", 50., 10.)?;

    let mut power = LinguisticVariable::new("Power");
    let shaped = power.add_composite("Shaped", left, right, 50.)?;

    let mut engine = FuzzyEngine::new(DefuzzificationOp::TrapezoidCog);
    engine.add_rule(FuzzyRule::new().when(water.is(&cold)?).then(power.is(&shaped)?)?);

    assert_eq!(engine.defuzzify(&water_at(0.)), Err(Error::NotTrapezoidal("Shaped".into())));

    let mut engine = FuzzyEngine::new(DefuzzificationOp::Cog);
    engine.add_rule(FuzzyRule::new().when(water.is(&cold)?).then(power.is(&shaped)?)?);

    // Linear rise on the left, steeper Gaussian tail on the right
    let power = engine.defuzzify_single(&water_at(0.))?;
    assert!(power < 50., "{power}");

    Ok(())
}
