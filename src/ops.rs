use log::trace;

use crate::aggregate::AggregatedSet;
use crate::error::{Error, Result};
use crate::math::{centroid, interp, segment_areas};
use crate::rules::RuleSet;

/// Implication operator clipping a rule's conclusion by its firing strength.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Implication {
    /// Mamdani: `min(strength, mu)`
    #[default]
    Min,
    /// Larsen: `strength * mu`
    Prod,
}

impl Implication {
    pub fn call(self, strength: f64, membership: f64) -> f64 {
        match self {
            Self::Min => f64::min(strength, membership),
            Self::Prod => strength * membership,
        }
    }
}

/// Method for defuzzificating an aggregated fuzzy set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DefuzzificationOp {
    /// Center of Gravity, integrated over a sampled universe
    Cog,
    /// Center of Gravity computed exactly. Only applicable when every conclusion
    /// is a trapezoid (triangles and rectangles included).
    TrapezoidCog,
    /// Bisector of Area
    Boa,
    /// Mean of the values for which the membership function is maximum
    Mom,
    /// Largest value for which the membership function is maximum
    Lom,
    /// Smallest value for which the membership function is maximum
    Som,
}

impl DefuzzificationOp {
    /// Rejects rule sets this method cannot handle, before any rule is evaluated.
    pub fn check(self, rules: &RuleSet) -> Result<()> {
        if self != Self::TrapezoidCog {
            return Ok(());
        }

        for (_, _, conclusion) in rules.valid() {
            if conclusion.function().trapezoid_corners().is_none() {
                return Err(Error::NotTrapezoidal(conclusion.function().name().to_owned()));
            }
        }

        Ok(())
    }

    /// Reduces `set` over `[min, max]` to one crisp value. Sampled methods use `samples` subdivisions.
    ///
    /// A set that is zero everywhere defuzzificates to zero.
    pub fn call(self, set: &AggregatedSet, min: f64, max: f64, samples: usize) -> Result<f64> {
        if self == Self::TrapezoidCog {
            let (universe, membership) = set.envelope(min, max)?;

            trace!("{}: exact envelope with {} points", set.variable(), universe.len());

            return Ok(centroid(&universe, &membership));
        }

        let (universe, membership) = set.sample(min, max, samples);
        let Some(maximum) = membership.iter().copied().reduce(f64::max) else {
            return Ok(0.);
        };

        if maximum <= 0. {
            return Ok(0.);
        }

        let at_maximum = || {
            universe
                .iter()
                .copied()
                .zip(membership.iter().copied())
                .filter_map(move |(u, m)| if m == maximum { Some(u) } else { None })
        };

        let crisp = match self {
            Self::Cog | Self::TrapezoidCog => centroid(&universe, &membership),
            Self::Boa => {
                let areas = segment_areas(&universe, &membership);
                let target = areas.iter().sum::<f64>() / 2.;
                let mut cum_area = 0.;
                let mut i_area = 0;

                for (i, area) in areas.iter().enumerate() {
                    cum_area += area;
                    i_area = i;
                    if cum_area >= target {
                        break;
                    }
                }

                let fp = [universe[i_area], universe[i_area + 1]];
                let xp = [cum_area - areas[i_area], cum_area];

                interp(Some(target), xp.into_iter().zip(fp)).pop().unwrap_or(0.)
            },
            Self::Mom => {
                let (len, sum) = at_maximum().fold((0usize, 0.), |(len, sum), u| (len + 1, sum + u));

                sum / len as f64
            },
            Self::Lom => at_maximum().reduce(f64::max).unwrap_or(0.),
            Self::Som => at_maximum().reduce(f64::min).unwrap_or(0.),
        };

        Ok(crisp)
    }
}

#[cfg(test)]
use crate::aggregate::Contribution;
#[cfg(test)]
use crate::variable::LinguisticVariable;

#[cfg(test)]
fn power_set(implication: Implication) -> AggregatedSet {
    let mut power = LinguisticVariable::new("Power");
    let low = power.add_triangle("Low", 0., 25., 50.).unwrap();
    let high = power.add_triangle("High", 25., 50., 75.).unwrap();
    let mut set = AggregatedSet::new("Power");

    set.push(Contribution::new(power.is(&low).unwrap(), 1. / 3., implication));
    set.push(Contribution::new(power.is(&high).unwrap(), 0.5, implication));
    set
}

#[test]
fn test_implication() {
    assert_eq!(Implication::Min.call(0.5, 0.8), 0.5);
    assert_eq!(Implication::Min.call(0.5, 0.2), 0.2);
    assert_eq!(Implication::Prod.call(0.5, 0.8), 0.4);
    assert_eq!(Implication::default(), Implication::Min);
}

#[test]
fn test_cog_matches_closed_form() {
    for (implication, expected) in [(Implication::Min, 1550. / 39.), (Implication::Prod, 445. / 11.)] {
        let set = power_set(implication);
        let (min, max) = set.domain().unwrap();
        let exact = DefuzzificationOp::TrapezoidCog.call(&set, min, max, 1000).unwrap();
        let sampled = DefuzzificationOp::Cog.call(&set, min, max, 1000).unwrap();

        assert_eq!((min, max), (0., 75.));
        assert!((exact - expected).abs() < 1e-9, "{implication:?}: {exact}");
        assert!((sampled - expected).abs() < 1e-3, "{implication:?}: {sampled}");
    }
}

#[test]
fn test_maximum_family() {
    let set = power_set(Implication::Min);

    // High is clipped at 0.5 on its plateau [37.5, 62.5]
    let mom = DefuzzificationOp::Mom.call(&set, 0., 75., 1000).unwrap();
    let lom = DefuzzificationOp::Lom.call(&set, 0., 75., 1000).unwrap();
    let som = DefuzzificationOp::Som.call(&set, 0., 75., 1000).unwrap();

    // Within one sampling step
    assert!((mom - 50.).abs() < 0.1, "{mom}");
    assert!((lom - 62.5).abs() < 0.1, "{lom}");
    assert!((som - 37.5).abs() < 0.1, "{som}");
}

#[test]
fn test_bisector() {
    let mut power = LinguisticVariable::new("Power");
    let mid = power.add_trapezoid("Mid", 20., 30., 70., 80.).unwrap();
    let mut set = AggregatedSet::new("Power");

    set.push(Contribution::new(power.is(&mid).unwrap(), 0.8, Implication::Min));

    let boa = DefuzzificationOp::Boa.call(&set, 20., 80., 1000).unwrap();

    assert!((boa - 50.).abs() < 0.1, "{boa}");
}

#[test]
fn test_empty_set_is_zero() {
    let set = power_set(Implication::Min);
    let mut empty = AggregatedSet::new("Power");

    for contribution in set.contributions() {
        empty.push(Contribution::new(contribution.conclusion().clone(), 0., Implication::Min));
    }

    for op in [
        DefuzzificationOp::Cog,
        DefuzzificationOp::TrapezoidCog,
        DefuzzificationOp::Boa,
        DefuzzificationOp::Mom,
        DefuzzificationOp::Lom,
        DefuzzificationOp::Som,
    ] {
        assert_eq!(op.call(&empty, 0., 75., 1000), Ok(0.), "{op:?}");
        assert_eq!(op.call(&AggregatedSet::new("Power"), 0., 75., 1000), Ok(0.), "{op:?}");
    }
}

#[test]
fn test_closed_form_rejects_curves() {
    let mut power = LinguisticVariable::new("Power");
    let low = power.add_gaussian("Low", 20., 20.).unwrap();
    let mut set = AggregatedSet::new("Power");

    set.push(Contribution::new(power.is(&low).unwrap(), 0.5, Implication::Min));

    assert_eq!(
        DefuzzificationOp::TrapezoidCog.call(&set, 0., 200., 1000),
        Err(Error::NotTrapezoidal("Low".into()))
    );
}
