use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Conventional domain bounds for shapes whose support is the whole real line.
pub const UNBOUNDED_MIN: f64 = 0.;
pub const UNBOUNDED_MAX: f64 = 200.;

/// The parameters of a membership function.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Triangle { a: f64, b: f64, c: f64 },
    Trapezoid { a: f64, b: f64, c: f64, d: f64 },
    Rectangle { a: f64, b: f64 },
    Gaussian { mean: f64, sigma: f64 },
    /// Generalized bell centered on `c`, `a` wide with slope `b`
    Bell { a: f64, b: f64, c: f64 },
    SShaped { a: f64, b: f64 },
    ZShaped { a: f64, b: f64 },
    /// `left` up to and including `midpoint`, `right` beyond it
    Composite {
        left: MembershipFunction,
        right: MembershipFunction,
        midpoint: f64,
    },
}

#[derive(Debug, PartialEq)]
struct Inner {
    name: String,
    shape: Shape,
}

/// A named fuzzy set. Cloning is cheap: clones share the same immutable function.
#[derive(Clone)]
pub struct MembershipFunction(Arc<Inner>);

impl MembershipFunction {
    fn build(name: impl Into<String>, shape: Shape) -> Result<Self> {
        let name = name.into();

        validate(&name, &shape)?;

        Ok(MembershipFunction(Arc::new(Inner { name, shape })))
    }

    pub fn triangle(name: impl Into<String>, a: f64, b: f64, c: f64) -> Result<Self> {
        Self::build(name, Shape::Triangle { a, b, c })
    }

    pub fn trapezoid(name: impl Into<String>, a: f64, b: f64, c: f64, d: f64) -> Result<Self> {
        Self::build(name, Shape::Trapezoid { a, b, c, d })
    }

    pub fn rectangle(name: impl Into<String>, a: f64, b: f64) -> Result<Self> {
        Self::build(name, Shape::Rectangle { a, b })
    }

    pub fn gaussian(name: impl Into<String>, mean: f64, sigma: f64) -> Result<Self> {
        Self::build(name, Shape::Gaussian { mean, sigma })
    }

    pub fn bell(name: impl Into<String>, a: f64, b: f64, c: f64) -> Result<Self> {
        Self::build(name, Shape::Bell { a, b, c })
    }

    pub fn s_shaped(name: impl Into<String>, a: f64, b: f64) -> Result<Self> {
        Self::build(name, Shape::SShaped { a, b })
    }

    pub fn z_shaped(name: impl Into<String>, a: f64, b: f64) -> Result<Self> {
        Self::build(name, Shape::ZShaped { a, b })
    }

    pub fn composite(
        name: impl Into<String>,
        left: MembershipFunction,
        right: MembershipFunction,
        midpoint: f64,
    ) -> Result<Self> {
        Self::build(name, Shape::Composite { left, right, midpoint })
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn shape(&self) -> &Shape {
        &self.0.shape
    }

    /// Degree of membership of `x`, always within [0, 1].
    pub fn fuzzify(&self, x: f64) -> f64 {
        match self.0.shape {
            Shape::Triangle { a, b, c } => trapezoid(x, a, b, b, c),
            Shape::Trapezoid { a, b, c, d } => trapezoid(x, a, b, c, d),
            Shape::Rectangle { a, b } => {
                if a <= x && x <= b {
                    1.
                } else {
                    0.
                }
            },
            Shape::Gaussian { mean, sigma } => (-(x - mean).powi(2) / (2. * sigma.powi(2))).exp(),
            Shape::Bell { a, b, c } => 1. / (1. + ((x - c) / a).abs().powf(2. * b)),
            Shape::SShaped { a, b } => s_curve(x, a, b),
            Shape::ZShaped { a, b } => 1. - s_curve(x, a, b),
            Shape::Composite {
                ref left,
                ref right,
                midpoint,
            } => {
                if x <= midpoint {
                    left.fuzzify(x)
                } else {
                    right.fuzzify(x)
                }
            },
        }
    }

    pub fn min(&self) -> f64 {
        match &self.0.shape {
            Shape::Triangle { a, .. } | Shape::Trapezoid { a, .. } | Shape::Rectangle { a, .. } => *a,
            Shape::Composite { left, right, .. } => f64::min(left.min(), right.min()),
            Shape::Gaussian { .. } | Shape::Bell { .. } | Shape::SShaped { .. } | Shape::ZShaped { .. } => {
                UNBOUNDED_MIN
            },
        }
    }

    pub fn max(&self) -> f64 {
        match &self.0.shape {
            Shape::Triangle { c: end, .. } | Shape::Trapezoid { d: end, .. } | Shape::Rectangle { b: end, .. } => *end,
            Shape::Composite { left, right, .. } => f64::max(left.max(), right.max()),
            Shape::Gaussian { .. } | Shape::Bell { .. } | Shape::SShaped { .. } | Shape::ZShaped { .. } => {
                UNBOUNDED_MAX
            },
        }
    }

    /// The `[a, b, c, d]` corners of this function when it is a trapezoid or one of its degenerate forms.
    pub fn trapezoid_corners(&self) -> Option<[f64; 4]> {
        match self.0.shape {
            Shape::Triangle { a, b, c } => Some([a, b, b, c]),
            Shape::Trapezoid { a, b, c, d } => Some([a, b, c, d]),
            Shape::Rectangle { a, b } => Some([a, a, b, b]),
            _ => None,
        }
    }
}

impl PartialEq for MembershipFunction {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl fmt::Debug for MembershipFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MembershipFunction")
            .field(&self.0.name)
            .field(&self.0.shape)
            .finish()
    }
}

fn trapezoid(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    if x < a || x > d {
        0.
    } else if b <= x && x <= c {
        1.
    } else if x < b {
        (x - a) / (b - a)
    } else {
        (d - x) / (d - c)
    }
}

fn s_curve(x: f64, a: f64, b: f64) -> f64 {
    if x <= a {
        0.
    } else if x >= b {
        1.
    } else if x <= (a + b) / 2. {
        2. * ((x - a) / (b - a)).powi(2)
    } else {
        1. - 2. * ((x - b) / (b - a)).powi(2)
    }
}

fn validate(name: &str, shape: &Shape) -> Result<()> {
    let params = match *shape {
        Shape::Triangle { a, b, c } | Shape::Bell { a, b, c } => vec![("a", a), ("b", b), ("c", c)],
        Shape::Trapezoid { a, b, c, d } => vec![("a", a), ("b", b), ("c", c), ("d", d)],
        Shape::Rectangle { a, b } | Shape::SShaped { a, b } | Shape::ZShaped { a, b } => vec![("a", a), ("b", b)],
        Shape::Gaussian { mean, sigma } => vec![("mean", mean), ("sigma", sigma)],
        Shape::Composite { midpoint, .. } => vec![("midpoint", midpoint)],
    };

    if let Some((param, _)) = params.iter().find(|(_, value)| !value.is_finite()) {
        return Err(Error::invalid(name, format!("`{param}` must be finite")));
    }

    // Corners must be listed in ascending order
    let ordered = |corners: &[f64]| corners.windows(2).all(|pair| pair[0] <= pair[1]);

    match *shape {
        Shape::Triangle { a, b, c } if !ordered(&[a, b, c]) => Err(Error::invalid(name, "expected a <= b <= c")),
        Shape::Trapezoid { a, b, c, d } if !ordered(&[a, b, c, d]) => {
            Err(Error::invalid(name, "expected a <= b <= c <= d"))
        },
        Shape::Rectangle { a, b } if a > b => Err(Error::invalid(name, "expected a <= b")),
        Shape::Gaussian { sigma, .. } if sigma <= 0. => Err(Error::invalid(name, "`sigma` must be positive")),
        Shape::Bell { a, .. } if a == 0. => Err(Error::invalid(name, "`a` must not be zero")),
        Shape::Bell { b, .. } if b <= 0. => Err(Error::invalid(name, "`b` must be positive")),
        Shape::SShaped { a, b } | Shape::ZShaped { a, b } if a >= b => Err(Error::invalid(name, "expected a < b")),
        _ => Ok(()),
    }
}

#[test]
fn test_trapezoid() {
    let trap = MembershipFunction::trapezoid("trap", 10., 20., 30., 50.).unwrap();

    assert_eq!(trap.fuzzify(5.), 0.);
    assert_eq!(trap.fuzzify(10.), 0.);
    assert_eq!(trap.fuzzify(15.), 0.5);
    assert_eq!(trap.fuzzify(20.), 1.);
    assert_eq!(trap.fuzzify(25.), 1.);
    assert_eq!(trap.fuzzify(30.), 1.);
    assert_eq!(trap.fuzzify(45.), 0.25);
    assert_eq!(trap.fuzzify(51.), 0.);
    assert_eq!(trap.min(), 10.);
    assert_eq!(trap.max(), 50.);

    // Vertical left edge
    let cold = MembershipFunction::trapezoid("Cold", 0., 0., 20., 40.).unwrap();

    assert_eq!(cold.fuzzify(0.), 1.);
    assert_eq!(cold.fuzzify(-0.1), 0.);
    assert_eq!(cold.fuzzify(30.), 0.5);
}

#[test]
fn test_triangle_and_rectangle() {
    let warm = MembershipFunction::triangle("Warm", 30., 50., 70.).unwrap();

    assert_eq!(warm.fuzzify(30.), 0.);
    assert_eq!(warm.fuzzify(40.), 0.5);
    assert_eq!(warm.fuzzify(50.), 1.);
    assert_eq!(warm.fuzzify(60.), 0.5);
    assert_eq!(warm.trapezoid_corners(), Some([30., 50., 50., 70.]));

    let rect = MembershipFunction::rectangle("rect", 10., 50.).unwrap();

    assert_eq!(rect.fuzzify(9.99), 0.);
    assert_eq!(rect.fuzzify(10.), 1.);
    assert_eq!(rect.fuzzify(50.), 1.);
    assert_eq!(rect.fuzzify(50.01), 0.);
    assert_eq!(rect.trapezoid_corners(), Some([10., 10., 50., 50.]));
}

#[test]
fn test_bell() {
    let bell = MembershipFunction::bell("test", 15., 3., 50.).unwrap();
    let round = |v: f64| (v * 1000.).round() / 1000.;

    assert_eq!(bell.fuzzify(50.), 1.);
    assert_eq!(round(bell.fuzzify(30.)), 0.151);
    assert_eq!(round(bell.fuzzify(70.)), 0.151);

    let bell = MembershipFunction::bell("test", 10., 50., 20.).unwrap();

    assert_eq!(bell.min(), 0.);
    assert_eq!(bell.max(), 200.);
    assert!(bell.trapezoid_corners().is_none());

    assert!(matches!(
        MembershipFunction::bell("test", 0., 50., 10.),
        Err(Error::InvalidArgument { .. })
    ));

    // A flat or inverted slope would no longer peak at `c`
    for slope in [0., -1.] {
        assert_eq!(
            MembershipFunction::bell("test", 10., slope, 50.),
            Err(Error::invalid("test", "`b` must be positive"))
        );
    }
}

#[test]
fn test_gaussian() {
    let gauss = MembershipFunction::gaussian("gaus", 50., 20.).unwrap();

    assert_eq!(gauss.fuzzify(50.), 1.);
    assert!((gauss.fuzzify(70.) - (-0.5f64).exp()).abs() < 1e-12);
    assert_eq!(gauss.fuzzify(30.), gauss.fuzzify(70.));
    assert!(MembershipFunction::gaussian("gaus", 50., 0.).is_err());
}

#[test]
fn test_s_and_z_shapes() {
    let s = MembershipFunction::s_shaped("s", 10., 50.).unwrap();
    let z = MembershipFunction::z_shaped("z", 10., 50.).unwrap();

    assert_eq!(s.fuzzify(0.), 0.);
    assert_eq!(s.fuzzify(20.), 0.125);
    assert_eq!(s.fuzzify(30.), 0.5);
    assert_eq!(s.fuzzify(40.), 0.875);
    assert_eq!(s.fuzzify(60.), 1.);

    for x in [0., 20., 30., 40., 60.] {
        assert_eq!(z.fuzzify(x), 1. - s.fuzzify(x));
    }

    assert!(MembershipFunction::s_shaped("s", 50., 10.).is_err());
    assert!(MembershipFunction::z_shaped("z", 10., 10.).is_err());
}

#[test]
fn test_composite_dispatches_on_midpoint() {
    let left = MembershipFunction::trapezoid("left", 0., 0., 20., 40.).unwrap();
    let right = MembershipFunction::triangle("right", 20., 40., 60.).unwrap();
    let comp = MembershipFunction::composite("comp", left, right, 30.).unwrap();

    assert_eq!(comp.fuzzify(10.), 1.);
    assert_eq!(comp.fuzzify(30.), 0.5);
    assert_eq!(comp.fuzzify(35.), 0.75);
    assert_eq!(comp.fuzzify(50.), 0.5);
    assert_eq!(comp.min(), 0.);
    assert_eq!(comp.max(), 60.);
}

#[test]
fn test_invalid_parameters() {
    assert!(MembershipFunction::triangle("tri", 30., 20., 40.).is_err());
    assert!(MembershipFunction::trapezoid("trap", 0., 10., 5., 20.).is_err());
    assert!(MembershipFunction::rectangle("rect", 5., 1.).is_err());
    assert!(MembershipFunction::triangle("tri", 0., f64::NAN, 1.).is_err());
    assert!(MembershipFunction::trapezoid("trap", f64::NEG_INFINITY, 0., 1., 2.).is_err());

    // Degenerate but well defined
    let point = MembershipFunction::triangle("point", 5., 5., 5.).unwrap();

    assert_eq!(point.fuzzify(5.), 1.);
    assert_eq!(point.fuzzify(5.5), 0.);
}
