//! Symbolic variables, algebraic expressions, and the constraints built from them.
//!
//! Everything in this module is pure data destined for an external solver.
//! Comparing variables therefore never yields a boolean: the [`Variable::le`],
//! [`Variable::ge`], and [`Variable::eq`] builders record the comparison as a
//! [`Constraint`] without ever inspecting either operand's bound value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

/// A named, unit-tagged symbolic scalar.
///
/// The name is globally unique across one constraint system (a role prefix
/// concatenated with the owning component's instance name, e.g. `massbattery3`)
/// and is assigned exactly once at construction. The numeric value starts out
/// absent for free variables and is written only by solution application.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Variable {
    name: String,
    unit: String,
    value: Option<f64>,
}

impl Variable {
    /// Creates a free (unbound) variable.
    pub fn free(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self::seeded(name, unit, None)
    }

    /// Creates a variable pre-bound to a numeric value.
    pub fn bound(name: impl Into<String>, unit: impl Into<String>, value: f64) -> Self {
        Self::seeded(name, unit, Some(value))
    }

    /// Creates a variable from an optional seed value.
    ///
    /// An absent seed yields a free variable; this is the normal
    /// "to be solved" case, not an error.
    pub fn seeded(name: impl Into<String>, unit: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            value,
        }
    }

    /// The variable's globally-unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The unit tag. Units are labels for the solver boundary, not
    /// dimensionally checked.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// The current numeric value, if any.
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// Overwrites the numeric value. Called by solution application only.
    pub(crate) fn set_value(&mut self, value: f64) {
        self.value = Some(value);
    }

    /// This variable as a leaf expression.
    pub fn expr(&self) -> Expr {
        Expr::Var(self.name.clone())
    }

    /// Records `self <= rhs` as a constraint.
    pub fn le(&self, rhs: impl Into<Expr>) -> Constraint {
        self.expr().le(rhs)
    }

    /// Records `self >= rhs` as a constraint.
    pub fn ge(&self, rhs: impl Into<Expr>) -> Constraint {
        self.expr().ge(rhs)
    }

    /// Records `self == rhs` as a constraint.
    pub fn eq(&self, rhs: impl Into<Expr>) -> Constraint {
        self.expr().eq(rhs)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(v) => write!(f, "{} = {v} [{}]", self.name, self.unit),
            None => write!(f, "{} [{}]", self.name, self.unit),
        }
    }
}

/// An algebraic expression over variables and numeric literals.
///
/// Expressions are built with the ordinary `+ - * /` operators on [`Expr`],
/// `&Variable`, and `f64`, and reduce recursively to variable names and
/// literals, which is the form the external solver consumes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A numeric literal.
    Const(f64),
    /// A variable leaf, referenced by its unique name.
    Var(String),
    /// Sum of two subexpressions.
    Add(Box<Expr>, Box<Expr>),
    /// Difference of two subexpressions.
    Sub(Box<Expr>, Box<Expr>),
    /// Product of two subexpressions.
    Mul(Box<Expr>, Box<Expr>),
    /// Quotient of two subexpressions.
    Div(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Records `self <= rhs` as a constraint.
    pub fn le(self, rhs: impl Into<Expr>) -> Constraint {
        Constraint::new(self, RelOp::Le, rhs.into())
    }

    /// Records `self >= rhs` as a constraint.
    pub fn ge(self, rhs: impl Into<Expr>) -> Constraint {
        Constraint::new(self, RelOp::Ge, rhs.into())
    }

    /// Records `self == rhs` as a constraint.
    pub fn eq(self, rhs: impl Into<Expr>) -> Constraint {
        Constraint::new(self, RelOp::Eq, rhs.into())
    }

    /// Calls `f` with the name of every variable leaf, in left-to-right order.
    pub fn for_each_variable_name<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        match self {
            Self::Const(_) => {}
            Self::Var(name) => f(name),
            Self::Add(a, b) | Self::Sub(a, b) | Self::Mul(a, b) | Self::Div(a, b) => {
                a.for_each_variable_name(f);
                b.for_each_variable_name(f);
            }
        }
    }

    /// Numerically evaluates the expression, resolving each variable leaf
    /// through `resolve`. Returns `None` as soon as any leaf is unresolved.
    pub fn evaluate(&self, resolve: &impl Fn(&str) -> Option<f64>) -> Option<f64> {
        match self {
            Self::Const(c) => Some(*c),
            Self::Var(name) => resolve(name),
            Self::Add(a, b) => Some(a.evaluate(resolve)? + b.evaluate(resolve)?),
            Self::Sub(a, b) => Some(a.evaluate(resolve)? - b.evaluate(resolve)?),
            Self::Mul(a, b) => Some(a.evaluate(resolve)? * b.evaluate(resolve)?),
            Self::Div(a, b) => Some(a.evaluate(resolve)? / b.evaluate(resolve)?),
        }
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Self::Const(value)
    }
}

impl From<&Variable> for Expr {
    fn from(variable: &Variable) -> Self {
        variable.expr()
    }
}

impl From<Variable> for Expr {
    fn from(variable: Variable) -> Self {
        variable.expr()
    }
}

impl<R: Into<Expr>> Add<R> for Expr {
    type Output = Expr;

    fn add(self, rhs: R) -> Expr {
        Expr::Add(Box::new(self), Box::new(rhs.into()))
    }
}

impl<R: Into<Expr>> Sub<R> for Expr {
    type Output = Expr;

    fn sub(self, rhs: R) -> Expr {
        Expr::Sub(Box::new(self), Box::new(rhs.into()))
    }
}

impl<R: Into<Expr>> Mul<R> for Expr {
    type Output = Expr;

    fn mul(self, rhs: R) -> Expr {
        Expr::Mul(Box::new(self), Box::new(rhs.into()))
    }
}

impl<R: Into<Expr>> Div<R> for Expr {
    type Output = Expr;

    fn div(self, rhs: R) -> Expr {
        Expr::Div(Box::new(self), Box::new(rhs.into()))
    }
}

impl<R: Into<Expr>> Add<R> for &Variable {
    type Output = Expr;

    fn add(self, rhs: R) -> Expr {
        self.expr() + rhs
    }
}

impl<R: Into<Expr>> Sub<R> for &Variable {
    type Output = Expr;

    fn sub(self, rhs: R) -> Expr {
        self.expr() - rhs
    }
}

impl<R: Into<Expr>> Mul<R> for &Variable {
    type Output = Expr;

    fn mul(self, rhs: R) -> Expr {
        self.expr() * rhs
    }
}

impl<R: Into<Expr>> Div<R> for &Variable {
    type Output = Expr;

    fn div(self, rhs: R) -> Expr {
        self.expr() / rhs
    }
}

impl Add<Expr> for f64 {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::Const(self) + rhs
    }
}

impl Mul<Expr> for f64 {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::Const(self) * rhs
    }
}

impl Mul<&Variable> for f64 {
    type Output = Expr;

    fn mul(self, rhs: &Variable) -> Expr {
        Expr::Const(self) * rhs.expr()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(c) => write!(f, "{c}"),
            Self::Var(name) => write!(f, "{name}"),
            Self::Add(a, b) => write!(f, "({a} + {b})"),
            Self::Sub(a, b) => write!(f, "({a} - {b})"),
            Self::Mul(a, b) => write!(f, "({a} * {b})"),
            Self::Div(a, b) => write!(f, "({a} / {b})"),
        }
    }
}

/// Relational operator of a [`Constraint`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelOp {
    /// Left-hand side at most right-hand side.
    Le,
    /// Left-hand side at least right-hand side.
    Ge,
    /// Both sides equal.
    Eq,
}

impl fmt::Display for RelOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Le => "<=",
            Self::Ge => ">=",
            Self::Eq => "==",
        })
    }
}

/// An immutable record of a relational expression between two [`Expr`]s.
///
/// No evaluation happens at construction time; the record is queued for the
/// external solver as-is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// Left-hand expression.
    pub left: Expr,
    /// Relational operator.
    pub op: RelOp,
    /// Right-hand expression.
    pub right: Expr,
}

impl Constraint {
    /// Builds a constraint record from its parts.
    pub fn new(left: Expr, op: RelOp, right: Expr) -> Self {
        Self { left, op, right }
    }

    /// The names of every variable referenced on either side, left first.
    pub fn variable_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.left.for_each_variable_name(&mut |n| names.push(n));
        self.right.for_each_variable_name(&mut |n| names.push(n));
        names
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op, self.right)
    }
}

/// Visitor over every [`Variable`] owned by a composite model type.
///
/// Solution application walks the component graph through this trait instead
/// of runtime reflection. [`crate::mate::Mate`] does not implement it: mates
/// reference components by ID and own no variables, so the walk cannot
/// revisit components through them.
pub trait VisitVariables {
    /// Calls `f` once for each variable owned (directly or transitively) by
    /// `self`, in declaration order.
    fn visit_variables(&mut self, f: &mut dyn FnMut(&mut Variable));
}

impl VisitVariables for Variable {
    fn visit_variables(&mut self, f: &mut dyn FnMut(&mut Variable)) {
        f(self);
    }
}
