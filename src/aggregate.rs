use crate::config::MAX_SAMPLES;
use crate::dsl::{Operator, Proposition};
use crate::error::{Error, Result};
use crate::linspace::Linspace;
use crate::ops::Implication;

/// One rule's conclusion clipped by its firing strength.
#[derive(Clone, Debug, PartialEq)]
pub struct Contribution {
    conclusion: Proposition,
    strength: f64,
    implication: Implication,
}

impl Contribution {
    pub fn new(conclusion: Proposition, strength: f64, implication: Implication) -> Self {
        Self {
            conclusion,
            strength,
            implication,
        }
    }

    pub fn conclusion(&self) -> &Proposition {
        &self.conclusion
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn membership(&self, x: f64) -> f64 {
        self.implication.call(self.strength, self.conclusion.truth(x))
    }

    /// Corner points of this contribution over `[min, max]`, which must cover the conclusion's
    /// own bounds. Vertical edges show up as two points sharing an x.
    fn polyline(&self, min: f64, max: f64) -> Result<Vec<(f64, f64)>> {
        let function = self.conclusion.function();
        let [a, b, c, d] = function
            .trapezoid_corners()
            .ok_or_else(|| Error::NotTrapezoidal(function.name().to_owned()))?;
        let truth = |mu: f64| match self.conclusion.operator() {
            Operator::Is => mu,
            Operator::IsNot => 1. - mu,
        };
        let corners = [(min, 0.), (a, 0.), (b, 1.), (c, 1.), (d, 0.), (max, 0.)].map(|(x, mu)| (x, truth(mu)));
        let h = self.strength;

        Ok(match self.implication {
            Implication::Prod => corners.iter().map(|&(x, y)| (x, h * y)).collect(),
            Implication::Min => {
                let mut points = Vec::with_capacity(corners.len() * 2);

                for pair in corners.windows(2) {
                    let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);

                    points.push((x0, f64::min(h, y0)));

                    // Crossing the clip level adds a corner
                    if (y0 - h) * (y1 - h) < 0. {
                        points.push((x0 + (h - y0) * (x1 - x0) / (y1 - y0), h));
                    }
                }

                points.push((max, f64::min(h, corners[5].1)));
                points
            },
        })
    }
}

/// Pointwise maximum of every contribution concluding on one output variable.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatedSet {
    variable: String,
    contributions: Vec<Contribution>,
}

impl AggregatedSet {
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            contributions: Vec::new(),
        }
    }

    pub fn push(&mut self, contribution: Contribution) {
        self.contributions.push(contribution);
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn contributions(&self) -> &[Contribution] {
        &self.contributions
    }

    pub fn membership(&self, x: f64) -> f64 {
        self.contributions
            .iter()
            .map(|c| c.membership(x))
            .fold(0., f64::max)
    }

    /// Union of the bounds of every concluded function, or `None` for an empty set.
    pub fn domain(&self) -> Option<(f64, f64)> {
        self.contributions
            .iter()
            .map(|c| (c.conclusion.function().min(), c.conclusion.function().max()))
            .reduce(|(min, max), (lo, hi)| (f64::min(min, lo), f64::max(max, hi)))
    }

    /// Membership sampled at `samples + 1` evenly spaced points of `[min, max]`, with `samples`
    /// clamped to `1..=MAX_SAMPLES`.
    pub fn sample(&self, min: f64, max: f64, samples: usize) -> (Vec<f64>, Vec<f64>) {
        let universe: Vec<f64> = Linspace::new(min, max, samples.clamp(1, MAX_SAMPLES) + 1).collect();
        let membership = universe.iter().map(|x| self.membership(*x)).collect();

        (universe, membership)
    }

    /// The exact outline of the set as corner points, when every contribution is trapezoidal.
    ///
    /// Between two consecutive corners of any contribution each one is linear, so the maximum only
    /// changes slope where two of them cross.
    pub fn envelope(&self, min: f64, max: f64) -> Result<(Vec<f64>, Vec<f64>)> {
        let polylines = self
            .contributions
            .iter()
            .map(|c| c.polyline(min, max))
            .collect::<Result<Vec<_>>>()?;
        let mut knots: Vec<f64> = polylines.iter().flatten().map(|(x, _)| *x).collect();

        knots.sort_unstable_by(f64::total_cmp);
        knots.dedup();

        let mut universe = Vec::new();
        let mut membership = Vec::new();

        for span in knots.windows(2) {
            let (l, r) = (span[0], span[1]);
            let mid = (l + r) / 2.;
            let lines: Vec<Line> = polylines.iter().map(|p| Line::through(p, mid)).collect();
            let mut cuts = vec![l, r];

            for (i, f) in lines.iter().enumerate() {
                for g in &lines[i + 1..] {
                    let (dl, dr) = (f.at(l) - g.at(l), f.at(r) - g.at(r));

                    if dl * dr < 0. {
                        cuts.push(l + (r - l) * dl / (dl - dr));
                    }
                }
            }

            cuts.sort_unstable_by(f64::total_cmp);
            cuts.dedup();

            for cut in cuts.windows(2) {
                let (p, q) = (cut[0], cut[1]);
                let mid = (p + q) / 2.;
                let Some(top) = lines.iter().max_by(|f, g| f.at(mid).total_cmp(&g.at(mid))) else {
                    continue;
                };

                universe.extend([p, q]);
                membership.extend([top.at(p), top.at(q)]);
            }
        }

        Ok((universe, membership))
    }
}

/// `y = slope * x + intercept`
#[derive(Clone, Copy, Debug)]
struct Line {
    slope: f64,
    intercept: f64,
}

impl Line {
    const ZERO: Line = Line {
        slope: 0.,
        intercept: 0.,
    };

    /// The segment of `polyline` passing over `x`, which must not be one of its corners.
    fn through(polyline: &[(f64, f64)], x: f64) -> Self {
        polyline
            .windows(2)
            .find(|pair| pair[0].0 < x && x < pair[1].0)
            .map(|pair| {
                let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
                let slope = (y1 - y0) / (x1 - x0);

                Line {
                    slope,
                    intercept: y0 - slope * x0,
                }
            })
            .unwrap_or(Line::ZERO)
    }

    fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

#[cfg(test)]
use crate::variable::LinguisticVariable;

#[test]
fn test_clipped_polyline() {
    let mut power = LinguisticVariable::new("Power");
    let low = power.add_triangle("Low", 0., 25., 50.).unwrap();
    let clipped = Contribution::new(power.is(&low).unwrap(), 0.4, Implication::Min);
    let scaled = Contribution::new(power.is(&low).unwrap(), 0.4, Implication::Prod);

    assert_eq!(
        clipped.polyline(0., 75.).unwrap(),
        vec![(0., 0.), (0., 0.), (10., 0.4), (25., 0.4), (25., 0.4), (40., 0.4), (50., 0.), (75., 0.)]
    );
    assert_eq!(
        scaled.polyline(0., 75.).unwrap(),
        vec![(0., 0.), (0., 0.), (25., 0.4), (25., 0.4), (50., 0.), (75., 0.)]
    );
}

#[test]
fn test_negated_polyline() {
    let mut power = LinguisticVariable::new("Power");
    let low = power.add_trapezoid("Low", 10., 20., 30., 40.).unwrap();
    let not_low = Contribution::new(power.is_not(&low).unwrap(), 0.5, Implication::Min);
    let (universe, membership) = AggregatedSet {
        variable: "Power".into(),
        contributions: vec![not_low.clone()],
    }
    .envelope(0., 50.)
    .unwrap();

    for (x, mu) in universe.iter().zip(&membership) {
        assert!((not_low.membership(*x) - mu).abs() < 1e-12, "{x}: {mu}");
    }
}

#[test]
fn test_envelope_follows_maximum() {
    let mut power = LinguisticVariable::new("Power");
    let low = power.add_triangle("Low", 0., 25., 50.).unwrap();
    let high = power.add_triangle("High", 25., 50., 75.).unwrap();
    let step = power.add_rectangle("Step", 60., 70.).unwrap();
    let mut set = AggregatedSet::new("Power");

    set.push(Contribution::new(power.is(&low).unwrap(), 1. / 3., Implication::Min));
    set.push(Contribution::new(power.is(&high).unwrap(), 0.5, Implication::Min));
    set.push(Contribution::new(power.is(&step).unwrap(), 0.2, Implication::Min));

    let (min, max) = set.domain().unwrap();
    let (universe, membership) = set.envelope(min, max).unwrap();

    assert_eq!((min, max), (0., 75.));
    assert!(universe.windows(2).all(|x| x[0] <= x[1]));

    // Exact away from the rectangle's vertical edges
    for (x, mu) in universe.iter().zip(&membership) {
        if *x != 60. && *x != 70. {
            assert!((set.membership(*x) - mu).abs() < 1e-12, "{x}: {mu}");
        }
    }

    // Low and High cross at 33.3
    assert!(universe.iter().any(|x| (x - 100. / 3.).abs() < 1e-9));
}

#[test]
fn test_domain() {
    let mut power = LinguisticVariable::new("Power");
    let low = power.add_triangle("Low", -50., 20., 50.).unwrap();
    let med = power.add_gaussian("Medium", 60., 20.).unwrap();
    let mut set = AggregatedSet::new("Power");

    assert_eq!(set.domain(), None);

    set.push(Contribution::new(power.is(&low).unwrap(), 0., Implication::Min));
    set.push(Contribution::new(power.is(&med).unwrap(), 0.5, Implication::Min));

    assert_eq!(set.domain(), Some((-50., 200.)));
    assert_eq!(set.membership(60.), 0.5);
    assert_eq!(set.sample(0., 10., 0).0, vec![0., 10.]);
}
