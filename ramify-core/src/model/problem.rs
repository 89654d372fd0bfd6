//! Problem data structures and validation.
//!
//! A [`Problem`] owns its variables and constraints outright. The
//! branch-and-bound driver value-clones it per search node and tightens one
//! variable's bounds; the original instance is never mutated by a solve.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{MilpError, MilpResult};

/// Direction of optimization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveSense {
    /// Minimize the objective function.
    Minimize,
    /// Maximize the objective function.
    Maximize,
}

/// Mathematical kind of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// Takes any real value within its bounds.
    Continuous,
    /// Must take an integer value.
    Integer,
    /// Must take 0 or 1.
    Binary,
}

/// Relation between a constraint's left-hand side and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintSense {
    /// Less than or equal.
    Le,
    /// Greater than or equal.
    Ge,
    /// Equal.
    Eq,
}

impl ConstraintSense {
    /// Small-integer wire encoding used by the foreign-function surface.
    pub fn code(self) -> i32 {
        match self {
            ConstraintSense::Le => 0,
            ConstraintSense::Ge => 1,
            ConstraintSense::Eq => 2,
        }
    }

    /// Inverse of [`code`](Self::code). Returns `None` for unknown codes.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(ConstraintSense::Le),
            1 => Some(ConstraintSense::Ge),
            2 => Some(ConstraintSense::Eq),
            _ => None,
        }
    }
}

/// A decision variable.
///
/// Identified by its zero-based index in the owning [`Problem`]; the index
/// assigned at insertion is never reused or reassigned.
#[derive(Debug, Clone)]
pub struct Variable {
    name: String,
    kind: VarKind,
    lower: f64,
    upper: f64,
    obj_coeff: f64,
}

impl Variable {
    fn new(name: impl Into<String>, kind: VarKind) -> Self {
        let (lower, upper) = match kind {
            VarKind::Binary => (0.0, 1.0),
            _ => (f64::NEG_INFINITY, f64::INFINITY),
        };
        Self {
            name: name.into(),
            kind,
            lower,
            upper,
            obj_coeff: 0.0,
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Variable kind.
    pub fn kind(&self) -> VarKind {
        self.kind
    }

    /// Lower bound (may be `-inf`).
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Upper bound (may be `+inf`).
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Coefficient in the objective function.
    pub fn obj_coeff(&self) -> f64 {
        self.obj_coeff
    }

    /// True for Integer and Binary variables.
    pub fn is_integer(&self) -> bool {
        matches!(self.kind, VarKind::Integer | VarKind::Binary)
    }
}

/// A linear constraint `sum(coeff_i * x_i) <sense> rhs`.
///
/// Coefficients are stored sparsely, keyed by variable index; the map holds
/// nonzero entries only and iterates in ascending index order.
#[derive(Debug, Clone)]
pub struct Constraint {
    name: String,
    sense: ConstraintSense,
    rhs: f64,
    terms: BTreeMap<usize, f64>,
}

impl Constraint {
    fn new(name: impl Into<String>, sense: ConstraintSense, rhs: f64) -> Self {
        Self {
            name: name.into(),
            sense,
            rhs,
            terms: BTreeMap::new(),
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Constraint sense.
    pub fn sense(&self) -> ConstraintSense {
        self.sense
    }

    /// Right-hand side value.
    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    /// Sparse coefficient map, keyed by variable index.
    pub fn terms(&self) -> &BTreeMap<usize, f64> {
        &self.terms
    }

    /// Evaluate the left-hand side at the given point.
    pub fn lhs_value(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(&idx, &coeff)| coeff * values[idx])
            .sum()
    }

    /// Magnitude of infeasibility at the given point (zero when satisfied).
    pub fn violation(&self, values: &[f64]) -> f64 {
        let lhs = self.lhs_value(values);
        match self.sense {
            ConstraintSense::Le => (lhs - self.rhs).max(0.0),
            ConstraintSense::Ge => (self.rhs - lhs).max(0.0),
            ConstraintSense::Eq => (lhs - self.rhs).abs(),
        }
    }

    /// Whether the point satisfies the constraint within `tol`.
    pub fn is_satisfied(&self, values: &[f64], tol: f64) -> bool {
        self.violation(values) <= tol
    }
}

/// A mixed-integer linear program.
#[derive(Debug, Clone)]
pub struct Problem {
    name: String,
    sense: ObjectiveSense,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
}

impl Problem {
    /// Create an empty problem.
    pub fn new(name: impl Into<String>, sense: ObjectiveSense) -> Self {
        Self {
            name: name.into(),
            sense,
            variables: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Problem name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the problem.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Direction of optimization.
    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    /// Override the direction of optimization.
    ///
    /// MPS does not encode a sense, so parsed problems default to Minimize
    /// and callers wishing to maximize flip it here.
    pub fn set_sense(&mut self, sense: ObjectiveSense) {
        self.sense = sense;
    }

    /// Number of variables.
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Number of constraints.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Append a variable and return its index.
    ///
    /// Continuous and Integer variables start unbounded; Binary variables
    /// start with bounds `[0, 1]`.
    pub fn add_variable(&mut self, name: impl Into<String>, kind: VarKind) -> usize {
        self.variables.push(Variable::new(name, kind));
        self.variables.len() - 1
    }

    /// Look up a variable by index.
    pub fn variable(&self, index: usize) -> Option<&Variable> {
        self.variables.get(index)
    }

    /// All variables in insertion order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Set a variable's bounds.
    ///
    /// Bound ordering (`lower <= upper`) is not enforced here; the solver
    /// screens for crossed bounds. NaN bounds are rejected.
    pub fn set_variable_bounds(&mut self, index: usize, lower: f64, upper: f64) -> MilpResult<()> {
        if lower.is_nan() || upper.is_nan() {
            return Err(MilpError::InvalidValue(format!(
                "NaN bound for variable {index}"
            )));
        }
        let var = self.variable_mut(index)?;
        var.lower = lower;
        var.upper = upper;
        Ok(())
    }

    /// Change a variable's kind.
    ///
    /// Switching to Binary intersects the bounds with `[0, 1]`.
    pub fn set_variable_kind(&mut self, index: usize, kind: VarKind) -> MilpResult<()> {
        let var = self.variable_mut(index)?;
        var.kind = kind;
        if kind == VarKind::Binary {
            var.lower = var.lower.max(0.0);
            var.upper = var.upper.min(1.0);
        }
        Ok(())
    }

    /// Set a variable's coefficient in the objective function.
    pub fn set_objective_coefficient(&mut self, index: usize, coeff: f64) -> MilpResult<()> {
        if coeff.is_nan() {
            return Err(MilpError::InvalidValue(format!(
                "NaN objective coefficient for variable {index}"
            )));
        }
        self.variable_mut(index)?.obj_coeff = coeff;
        Ok(())
    }

    /// Append a constraint and return its index.
    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        sense: ConstraintSense,
        rhs: f64,
    ) -> MilpResult<usize> {
        if rhs.is_nan() {
            return Err(MilpError::InvalidValue(
                "NaN right-hand side for constraint".to_string(),
            ));
        }
        self.constraints.push(Constraint::new(name, sense, rhs));
        Ok(self.constraints.len() - 1)
    }

    /// Look up a constraint by index.
    pub fn constraint(&self, index: usize) -> Option<&Constraint> {
        self.constraints.get(index)
    }

    /// All constraints in insertion order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Replace a constraint's right-hand side.
    pub fn set_constraint_rhs(&mut self, index: usize, rhs: f64) -> MilpResult<()> {
        if rhs.is_nan() {
            return Err(MilpError::InvalidValue(format!(
                "NaN right-hand side for constraint {index}"
            )));
        }
        self.constraint_mut(index)?.rhs = rhs;
        Ok(())
    }

    /// Set the coefficient of a variable within a constraint.
    ///
    /// A coefficient of exactly zero removes the term; the sparse map holds
    /// nonzero entries only.
    pub fn set_coefficient(
        &mut self,
        constraint: usize,
        variable: usize,
        coeff: f64,
    ) -> MilpResult<()> {
        if coeff.is_nan() {
            return Err(MilpError::InvalidValue(format!(
                "NaN coefficient for constraint {constraint}, variable {variable}"
            )));
        }
        if variable >= self.variables.len() {
            return Err(MilpError::InvalidIndex {
                kind: "variable",
                index: variable,
                len: self.variables.len(),
            });
        }
        let c = self.constraint_mut(constraint)?;
        if coeff == 0.0 {
            c.terms.remove(&variable);
        } else {
            c.terms.insert(variable, coeff);
        }
        Ok(())
    }

    /// Evaluate the objective at the given point.
    pub fn evaluate_objective(&self, values: &[f64]) -> f64 {
        self.variables
            .iter()
            .zip(values)
            .map(|(var, &v)| var.obj_coeff * v)
            .sum()
    }

    /// Whether the point satisfies all bounds and constraints within `tol`.
    pub fn is_feasible(&self, values: &[f64], tol: f64) -> bool {
        if values.len() != self.variables.len() {
            return false;
        }
        for (var, &v) in self.variables.iter().zip(values) {
            if v < var.lower - tol || v > var.upper + tol {
                return false;
            }
        }
        self.constraints.iter().all(|c| c.is_satisfied(values, tol))
    }

    /// Indices of Integer and Binary variables, in ascending order.
    pub fn integer_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.variables
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_integer())
            .map(|(i, _)| i)
    }

    /// Whether every Integer/Binary variable is within `tol` of an integer.
    pub fn is_integer_feasible(&self, values: &[f64], tol: f64) -> bool {
        self.integer_indices()
            .all(|i| Self::fractionality(values[i]) <= tol)
    }

    /// Round every Integer/Binary component to the nearest integer.
    pub fn round_integers(&self, values: &mut [f64]) {
        for i in self.integer_indices() {
            values[i] = values[i].round();
        }
    }

    /// Distance of a value to the nearest integer.
    pub fn fractionality(value: f64) -> f64 {
        (value - value.round()).abs()
    }

    /// Intersect a variable's bounds with `[lower, upper]`.
    ///
    /// Used for branching; the caller guarantees a valid index.
    pub(crate) fn intersect_bounds(&mut self, index: usize, lower: f64, upper: f64) {
        let var = &mut self.variables[index];
        var.lower = var.lower.max(lower);
        var.upper = var.upper.min(upper);
    }

    fn variable_mut(&mut self, index: usize) -> MilpResult<&mut Variable> {
        let len = self.variables.len();
        self.variables.get_mut(index).ok_or(MilpError::InvalidIndex {
            kind: "variable",
            index,
            len,
        })
    }

    fn constraint_mut(&mut self, index: usize) -> MilpResult<&mut Constraint> {
        let len = self.constraints.len();
        self.constraints
            .get_mut(index)
            .ok_or(MilpError::InvalidIndex {
                kind: "constraint",
                index,
                len,
            })
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sense = match self.sense {
            ObjectiveSense::Minimize => "Minimize",
            ObjectiveSense::Maximize => "Maximize",
        };
        let (mut cont, mut int, mut bin) = (0usize, 0usize, 0usize);
        for var in &self.variables {
            match var.kind {
                VarKind::Continuous => cont += 1,
                VarKind::Integer => int += 1,
                VarKind::Binary => bin += 1,
            }
        }
        writeln!(f, "Problem '{}' ({})", self.name, sense)?;
        writeln!(
            f,
            "  variables:   {} ({} continuous, {} integer, {} binary)",
            self.variables.len(),
            cont,
            int,
            bin
        )?;
        write!(f, "  constraints: {}", self.constraints.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_problem() -> Problem {
        let mut p = Problem::new("test", ObjectiveSense::Minimize);
        let x = p.add_variable("x", VarKind::Continuous);
        let y = p.add_variable("y", VarKind::Integer);
        p.set_variable_bounds(x, 0.0, 10.0).unwrap();
        p.set_variable_bounds(y, 0.0, 10.0).unwrap();
        p.set_objective_coefficient(x, 1.0).unwrap();
        p.set_objective_coefficient(y, 2.0).unwrap();
        let c = p.add_constraint("c0", ConstraintSense::Le, 8.0).unwrap();
        p.set_coefficient(c, x, 1.0).unwrap();
        p.set_coefficient(c, y, 1.0).unwrap();
        p
    }

    #[test]
    fn indices_assigned_in_order() {
        let p = small_problem();
        assert_eq!(p.num_variables(), 2);
        assert_eq!(p.variable(0).unwrap().name(), "x");
        assert_eq!(p.variable(1).unwrap().name(), "y");
        assert!(p.variable(2).is_none());
    }

    #[test]
    fn binary_starts_with_unit_bounds() {
        let mut p = Problem::new("b", ObjectiveSense::Minimize);
        let b = p.add_variable("b", VarKind::Binary);
        let var = p.variable(b).unwrap();
        assert_eq!(var.lower(), 0.0);
        assert_eq!(var.upper(), 1.0);
    }

    #[test]
    fn switching_to_binary_clamps_bounds() {
        let mut p = Problem::new("b", ObjectiveSense::Minimize);
        let v = p.add_variable("v", VarKind::Continuous);
        p.set_variable_bounds(v, -3.0, 7.0).unwrap();
        p.set_variable_kind(v, VarKind::Binary).unwrap();
        let var = p.variable(v).unwrap();
        assert_eq!(var.lower(), 0.0);
        assert_eq!(var.upper(), 1.0);
    }

    #[test]
    fn nan_inputs_rejected() {
        let mut p = small_problem();
        assert!(matches!(
            p.set_variable_bounds(0, f64::NAN, 1.0),
            Err(MilpError::InvalidValue(_))
        ));
        assert!(matches!(
            p.set_objective_coefficient(0, f64::NAN),
            Err(MilpError::InvalidValue(_))
        ));
        assert!(matches!(
            p.set_coefficient(0, 0, f64::NAN),
            Err(MilpError::InvalidValue(_))
        ));
        assert!(matches!(
            p.add_constraint("bad", ConstraintSense::Eq, f64::NAN),
            Err(MilpError::InvalidValue(_))
        ));
    }

    #[test]
    fn out_of_range_index_rejected() {
        let mut p = small_problem();
        assert!(matches!(
            p.set_variable_bounds(9, 0.0, 1.0),
            Err(MilpError::InvalidIndex { kind: "variable", .. })
        ));
        assert!(matches!(
            p.set_coefficient(9, 0, 1.0),
            Err(MilpError::InvalidIndex { kind: "constraint", .. })
        ));
        assert!(matches!(
            p.set_coefficient(0, 9, 1.0),
            Err(MilpError::InvalidIndex { kind: "variable", .. })
        ));
    }

    #[test]
    fn zero_coefficient_removes_term() {
        let mut p = small_problem();
        p.set_coefficient(0, 0, 0.0).unwrap();
        assert!(!p.constraint(0).unwrap().terms().contains_key(&0));
        assert!(p.constraint(0).unwrap().terms().contains_key(&1));
    }

    #[test]
    fn objective_evaluation() {
        let p = small_problem();
        assert_eq!(p.evaluate_objective(&[3.0, 2.0]), 7.0);
    }

    #[test]
    fn feasibility_checks_bounds_and_constraints() {
        let p = small_problem();
        assert!(p.is_feasible(&[3.0, 2.0], 1e-9));
        // Constraint violated: 5 + 4 > 8.
        assert!(!p.is_feasible(&[5.0, 4.0], 1e-9));
        // Bound violated.
        assert!(!p.is_feasible(&[-1.0, 0.0], 1e-9));
        // Wrong arity.
        assert!(!p.is_feasible(&[0.0], 1e-9));
    }

    #[test]
    fn constraint_violation_by_sense() {
        let mut p = Problem::new("v", ObjectiveSense::Minimize);
        let x = p.add_variable("x", VarKind::Continuous);
        let le = p.add_constraint("le", ConstraintSense::Le, 1.0).unwrap();
        let ge = p.add_constraint("ge", ConstraintSense::Ge, 1.0).unwrap();
        let eq = p.add_constraint("eq", ConstraintSense::Eq, 1.0).unwrap();
        for c in [le, ge, eq] {
            p.set_coefficient(c, x, 1.0).unwrap();
        }
        let at = |v: f64, c: usize| p.constraint(c).unwrap().violation(&[v]);
        assert_eq!(at(2.0, le), 1.0);
        assert_eq!(at(0.5, le), 0.0);
        assert_eq!(at(0.5, ge), 0.5);
        assert_eq!(at(2.0, ge), 0.0);
        assert_eq!(at(3.0, eq), 2.0);
    }

    #[test]
    fn fractionality_measures_distance_to_integer() {
        assert!((Problem::fractionality(2.7) - 0.3).abs() < 1e-12);
        assert!((Problem::fractionality(-2.7) - 0.3).abs() < 1e-12);
        assert!(Problem::fractionality(4.0) < 1e-12);
    }

    #[test]
    fn integer_helpers() {
        let p = small_problem();
        assert_eq!(p.integer_indices().collect::<Vec<_>>(), vec![1]);
        assert!(p.is_integer_feasible(&[0.5, 2.0], 1e-6));
        assert!(!p.is_integer_feasible(&[0.5, 2.5], 1e-6));

        let mut values = vec![0.5, 1.9999997];
        p.round_integers(&mut values);
        assert_eq!(values, vec![0.5, 2.0]);
    }

    #[test]
    fn sense_wire_codes() {
        assert_eq!(ConstraintSense::Le.code(), 0);
        assert_eq!(ConstraintSense::Ge.code(), 1);
        assert_eq!(ConstraintSense::Eq.code(), 2);
        for sense in [ConstraintSense::Le, ConstraintSense::Ge, ConstraintSense::Eq] {
            assert_eq!(ConstraintSense::from_code(sense.code()), Some(sense));
        }
        assert_eq!(ConstraintSense::from_code(3), None);
    }
}
