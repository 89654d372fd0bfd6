//! End-to-end solves of small mixed-integer programs.

use ramify_core::{
    solve, BranchAndBound, ConstraintSense, ObjectiveSense, Problem, RepairSolver, Settings,
    SolveStatus, VarKind,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// max 5 x0 + 8 x1  s.t.  2 x0 + 4 x1 <= 10,  x0, x1 binary.
fn knapsack() -> Problem {
    let mut p = Problem::new("knapsack", ObjectiveSense::Maximize);
    let x0 = p.add_variable("x0", VarKind::Binary);
    let x1 = p.add_variable("x1", VarKind::Binary);
    p.set_objective_coefficient(x0, 5.0).unwrap();
    p.set_objective_coefficient(x1, 8.0).unwrap();
    let cap = p.add_constraint("cap", ConstraintSense::Le, 10.0).unwrap();
    p.set_coefficient(cap, x0, 2.0).unwrap();
    p.set_coefficient(cap, x1, 4.0).unwrap();
    p
}

/// max 3x + 2y  s.t.  x + y <= 4,  x + 3y <= 6,  x, y >= 0 integer.
fn two_constraint_mip() -> Problem {
    let mut p = Problem::new("branchy", ObjectiveSense::Maximize);
    let x = p.add_variable("x", VarKind::Integer);
    let y = p.add_variable("y", VarKind::Integer);
    p.set_variable_bounds(x, 0.0, f64::INFINITY).unwrap();
    p.set_variable_bounds(y, 0.0, f64::INFINITY).unwrap();
    p.set_objective_coefficient(x, 3.0).unwrap();
    p.set_objective_coefficient(y, 2.0).unwrap();
    let c1 = p.add_constraint("c1", ConstraintSense::Le, 4.0).unwrap();
    p.set_coefficient(c1, x, 1.0).unwrap();
    p.set_coefficient(c1, y, 1.0).unwrap();
    let c2 = p.add_constraint("c2", ConstraintSense::Le, 6.0).unwrap();
    p.set_coefficient(c2, x, 1.0).unwrap();
    p.set_coefficient(c2, y, 3.0).unwrap();
    p
}

/// max x + 2y  s.t.  x + y <= 10,  x, y >= 0.
fn capped_sum(kind: VarKind) -> Problem {
    let mut p = Problem::new("capped", ObjectiveSense::Maximize);
    let x = p.add_variable("x", kind);
    let y = p.add_variable("y", kind);
    p.set_variable_bounds(x, 0.0, f64::INFINITY).unwrap();
    p.set_variable_bounds(y, 0.0, f64::INFINITY).unwrap();
    p.set_objective_coefficient(x, 1.0).unwrap();
    p.set_objective_coefficient(y, 2.0).unwrap();
    let c = p.add_constraint("cap", ConstraintSense::Le, 10.0).unwrap();
    p.set_coefficient(c, x, 1.0).unwrap();
    p.set_coefficient(c, y, 1.0).unwrap();
    p
}

#[test]
fn binary_knapsack() {
    init_logging();
    let solution = solve(&knapsack(), &Settings::default());
    assert_eq!(solution.status(), SolveStatus::Optimal);
    assert_eq!(solution.objective_value(), 13.0);
    assert_eq!(solution.values(), &[1.0, 1.0]);
    // Both items fit, so the root relaxation is already integral.
    assert_eq!(solution.iterations(), 1);
}

#[test]
fn crossed_bounds_are_infeasible() {
    init_logging();
    let mut p = Problem::new("crossed", ObjectiveSense::Minimize);
    let x = p.add_variable("x", VarKind::Continuous);
    p.set_variable_bounds(x, 5.0, 3.0).unwrap();
    p.set_objective_coefficient(x, 1.0).unwrap();

    let solution = solve(&p, &Settings::default());
    assert_eq!(solution.status(), SolveStatus::Infeasible);
}

#[test]
fn pure_lp_solves_in_one_node() {
    init_logging();
    let p = capped_sum(VarKind::Continuous);
    let solution = solve(&p, &Settings::default());
    assert_eq!(solution.status(), SolveStatus::Optimal);
    assert_eq!(solution.iterations(), 1);
    assert!(p.is_feasible(solution.values(), 1e-9));
    // The repair procedure pulls both variables back from the sentinel in
    // equal shares, landing on (5, 5). A substituted simplex backend would
    // find 20 at (0, 10) instead.
    assert_eq!(solution.values(), &[5.0, 5.0]);
    assert_eq!(solution.objective_value(), 15.0);
}

#[test]
fn integral_relaxation_needs_no_branching() {
    init_logging();
    let p = capped_sum(VarKind::Integer);
    let solution = solve(&p, &Settings::default());
    assert_eq!(solution.status(), SolveStatus::Optimal);
    // The relaxation lands on an integral point, so the root is the only node.
    assert_eq!(solution.iterations(), 1);
    assert_eq!(solution.values(), &[5.0, 5.0]);
    assert_eq!(solution.objective_value(), 15.0);
}

#[test]
fn branching_reaches_the_optimum() {
    init_logging();
    let p = two_constraint_mip();
    let solution = solve(&p, &Settings::default());
    assert_eq!(solution.status(), SolveStatus::Optimal);
    // (4, 0) satisfies both constraints and attains the integer optimum.
    assert_eq!(solution.objective_value(), 12.0);
    assert_eq!(solution.values(), &[4.0, 0.0]);
    assert!(p.is_feasible(solution.values(), 1e-9));
    assert!(solution.iterations() > 1, "expected actual branching");
}

#[test]
fn node_limit_returns_best_incumbent() {
    init_logging();
    let p = two_constraint_mip();

    // Two nodes: the root branches, the first child yields an incumbent.
    let solution = solve(&p, &Settings::default().with_max_nodes(2));
    assert_eq!(solution.status(), SolveStatus::IterationLimit);
    assert_eq!(solution.iterations(), 2);
    assert!(p.is_feasible(solution.values(), 1e-9));
    assert_eq!(solution.objective_value(), 4.0);

    // One node: the root only branches, so there is no incumbent yet.
    let solution = solve(&p, &Settings::default().with_max_nodes(1));
    assert_eq!(solution.status(), SolveStatus::Infeasible);
    assert_eq!(solution.iterations(), 1);
}

#[test]
fn time_limit_is_polled_between_nodes() {
    init_logging();
    let solution = solve(&two_constraint_mip(), &Settings::default().with_time_limit(0.0));
    assert_eq!(solution.status(), SolveStatus::TimeLimit);
    assert_eq!(solution.iterations(), 0);
}

#[test]
fn unbounded_minimization_is_detected() {
    init_logging();
    let mut p = Problem::new("ray", ObjectiveSense::Minimize);
    let x = p.add_variable("x", VarKind::Continuous);
    p.set_variable_bounds(x, 0.0, f64::INFINITY).unwrap();
    p.set_objective_coefficient(x, -1.0).unwrap();

    let solution = solve(&p, &Settings::default());
    assert_eq!(solution.status(), SolveStatus::Unbounded);
}

#[test]
fn bounds_only_problem() {
    init_logging();
    let mut p = Problem::new("box", ObjectiveSense::Minimize);
    let x = p.add_variable("x", VarKind::Continuous);
    p.set_variable_bounds(x, 2.0, 5.0).unwrap();
    p.set_objective_coefficient(x, 1.0).unwrap();

    let solution = solve(&p, &Settings::default());
    assert_eq!(solution.status(), SolveStatus::Optimal);
    assert_eq!(solution.objective_value(), 2.0);
    assert_eq!(solution.values(), &[2.0]);
}

#[test]
fn fixed_variable_keeps_its_value() {
    init_logging();
    let mut p = Problem::new("fixed", ObjectiveSense::Minimize);
    let x = p.add_variable("x", VarKind::Integer);
    let y = p.add_variable("y", VarKind::Continuous);
    p.set_variable_bounds(x, 3.0, 3.0).unwrap();
    p.set_variable_bounds(y, 0.0, 1.0).unwrap();
    p.set_objective_coefficient(x, 1.0).unwrap();
    p.set_objective_coefficient(y, 1.0).unwrap();

    let solution = solve(&p, &Settings::default());
    assert_eq!(solution.status(), SolveStatus::Optimal);
    assert_eq!(solution.values(), &[3.0, 0.0]);
    assert_eq!(solution.objective_value(), 3.0);
}

#[test]
fn zero_objective_accepts_any_feasible_point() {
    init_logging();
    let mut p = Problem::new("flat", ObjectiveSense::Minimize);
    let x = p.add_variable("x", VarKind::Continuous);
    let y = p.add_variable("y", VarKind::Continuous);
    p.set_variable_bounds(x, 0.0, 1.0).unwrap();
    p.set_variable_bounds(y, 0.0, 1.0).unwrap();
    let c = p.add_constraint("least", ConstraintSense::Ge, 1.0).unwrap();
    p.set_coefficient(c, x, 1.0).unwrap();
    p.set_coefficient(c, y, 1.0).unwrap();

    let solution = solve(&p, &Settings::default());
    assert_eq!(solution.status(), SolveStatus::Optimal);
    assert_eq!(solution.objective_value(), 0.0);
    assert!(p.is_feasible(solution.values(), 1e-9));
}

#[test]
fn constraint_without_variables() {
    init_logging();
    // 0 >= 1 can never hold.
    let mut infeasible = Problem::new("never", ObjectiveSense::Minimize);
    infeasible
        .add_constraint("impossible", ConstraintSense::Ge, 1.0)
        .unwrap();
    let solution = solve(&infeasible, &Settings::default());
    assert_eq!(solution.status(), SolveStatus::Infeasible);

    // 0 <= 1 holds vacuously.
    let mut trivial = Problem::new("always", ObjectiveSense::Minimize);
    trivial
        .add_constraint("vacuous", ConstraintSense::Le, 1.0)
        .unwrap();
    let solution = solve(&trivial, &Settings::default());
    assert_eq!(solution.status(), SolveStatus::Optimal);
}

#[test]
fn repeated_solves_are_identical() {
    init_logging();
    let p = two_constraint_mip();
    let settings = Settings::default();
    let a = solve(&p, &settings);
    let b = solve(&p, &settings);
    assert_eq!(a.status(), b.status());
    assert_eq!(a.objective_value(), b.objective_value());
    assert_eq!(a.values(), b.values());
    assert_eq!(a.iterations(), b.iterations());
}

#[test]
fn substituted_backend_is_honored() {
    init_logging();
    // Plugging the reference solver in explicitly goes through the same
    // trait seam a simplex backend would use.
    let settings = Settings::default();
    let driver = BranchAndBound::with_solver(settings, RepairSolver::new(1e-9));
    let solution = driver.solve(&knapsack());
    assert_eq!(solution.status(), SolveStatus::Optimal);
    assert_eq!(solution.objective_value(), 13.0);
}
