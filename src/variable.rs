use crate::dsl::{Operator, Proposition};
use crate::error::{Error, Result};
use crate::membership::MembershipFunction;

/// A named quantity described by overlapping fuzzy sets.
#[derive(Clone, Debug)]
pub struct LinguisticVariable {
    name: String,
    functions: Vec<MembershipFunction>,
}

impl LinguisticVariable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            functions: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Membership functions in the order they were added.
    pub fn functions(&self) -> &[MembershipFunction] {
        &self.functions
    }

    // REVIEW: Names aren't required to be unique, so this returns the first match
    pub fn function(&self, name: &str) -> Option<&MembershipFunction> {
        self.functions.iter().find(|f| f.name() == name)
    }

    /// Appends an already built function, e.g. one shared with another variable.
    pub fn add(&mut self, function: MembershipFunction) -> MembershipFunction {
        self.functions.push(function.clone());
        function
    }

    pub fn add_triangle(&mut self, name: impl Into<String>, a: f64, b: f64, c: f64) -> Result<MembershipFunction> {
        Ok(self.add(MembershipFunction::triangle(name, a, b, c)?))
    }

    pub fn add_trapezoid(
        &mut self,
        name: impl Into<String>,
        a: f64,
        b: f64,
        c: f64,
        d: f64,
    ) -> Result<MembershipFunction> {
        Ok(self.add(MembershipFunction::trapezoid(name, a, b, c, d)?))
    }

    pub fn add_rectangle(&mut self, name: impl Into<String>, a: f64, b: f64) -> Result<MembershipFunction> {
        Ok(self.add(MembershipFunction::rectangle(name, a, b)?))
    }

    pub fn add_gaussian(&mut self, name: impl Into<String>, mean: f64, sigma: f64) -> Result<MembershipFunction> {
        Ok(self.add(MembershipFunction::gaussian(name, mean, sigma)?))
    }

    pub fn add_bell(&mut self, name: impl Into<String>, a: f64, b: f64, c: f64) -> Result<MembershipFunction> {
        Ok(self.add(MembershipFunction::bell(name, a, b, c)?))
    }

    pub fn add_s_shaped(&mut self, name: impl Into<String>, a: f64, b: f64) -> Result<MembershipFunction> {
        Ok(self.add(MembershipFunction::s_shaped(name, a, b)?))
    }

    pub fn add_z_shaped(&mut self, name: impl Into<String>, a: f64, b: f64) -> Result<MembershipFunction> {
        Ok(self.add(MembershipFunction::z_shaped(name, a, b)?))
    }

    pub fn add_composite(
        &mut self,
        name: impl Into<String>,
        left: MembershipFunction,
        right: MembershipFunction,
        midpoint: f64,
    ) -> Result<MembershipFunction> {
        Ok(self.add(MembershipFunction::composite(name, left, right, midpoint)?))
    }

    pub fn is<'f>(&self, function: impl Into<Option<&'f MembershipFunction>>) -> Result<Proposition> {
        self.proposition(Operator::Is, function.into())
    }

    pub fn is_not<'f>(&self, function: impl Into<Option<&'f MembershipFunction>>) -> Result<Proposition> {
        self.proposition(Operator::IsNot, function.into())
    }

    fn proposition(&self, operator: Operator, function: Option<&MembershipFunction>) -> Result<Proposition> {
        let function = function.ok_or(Error::NullArgument("function"))?;

        Ok(Proposition {
            variable: self.name.clone(),
            operator,
            function: function.clone(),
        })
    }
}

#[test]
fn test_function_collection() {
    use crate::membership::Shape;

    let mut var = LinguisticVariable::new("collection");
    let trap = var.add_trapezoid("trap", 0., 0., 20., 40.).unwrap();
    let tri = var.add_triangle("tri", 20., 40., 60.).unwrap();

    var.add_rectangle("rect", 10., 50.).unwrap();
    var.add_gaussian("gaus", 50., 20.).unwrap();
    var.add_bell("bell", 10., 3., 50.).unwrap();
    var.add_s_shaped("sshaped", 10., 50.).unwrap();
    var.add_z_shaped("zshaped", 10., 50.).unwrap();
    var.add_composite("comp", trap, tri, 20.).unwrap();

    let shapes = var.functions().iter().map(|f| f.shape()).collect::<Vec<_>>();

    assert_eq!(shapes.len(), 8);
    assert!(matches!(shapes[0], Shape::Trapezoid { .. }));
    assert!(matches!(shapes[1], Shape::Triangle { .. }));
    assert!(matches!(shapes[2], Shape::Rectangle { .. }));
    assert!(matches!(shapes[3], Shape::Gaussian { .. }));
    assert!(matches!(shapes[4], Shape::Bell { .. }));
    assert!(matches!(shapes[5], Shape::SShaped { .. }));
    assert!(matches!(shapes[6], Shape::ZShaped { .. }));
    assert!(matches!(shapes[7], Shape::Composite { .. }));

    assert_eq!(var.function("gaus").map(|f| f.max()), Some(200.));
    assert!(var.function("missing").is_none());
}

#[test]
fn test_failed_add_leaves_collection_untouched() {
    let mut var = LinguisticVariable::new("Water");

    assert!(var.add_bell("bell", 0., 3., 50.).is_err());
    assert!(var.functions().is_empty());
}

#[test]
fn test_propositions_reference_variable() {
    let mut water = LinguisticVariable::new("Water");
    let cold = water.add_trapezoid("Cold", 0., 0., 20., 40.).unwrap();
    let prop = water.is_not(&cold).unwrap();

    assert_eq!(prop.variable(), "Water");
    assert_eq!(prop.operator(), Operator::IsNot);
    assert_eq!(prop.function(), &cold);
    assert_eq!(prop.truth(30.), 0.5);
}
