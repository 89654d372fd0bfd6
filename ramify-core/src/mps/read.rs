//! MPS reader.
//!
//! Streaming parser for fixed-column or free-form MPS. Lines are consumed
//! one at a time, so the file never needs to be resident in memory.
//!
//! Recognized sections, in order: NAME, ROWS (required), COLUMNS
//! (required), RHS, RANGES, BOUNDS, ENDATA (required). Comment lines begin
//! with `*`. Section headers start in the first column; data lines are
//! indented. Exactly one `N` row designates the objective; later `N` rows
//! are ignored, along with any coefficients addressed to them. The
//! `'MARKER'` / `'INTORG'` / `'INTEND'` mechanism toggles integer mode in
//! COLUMNS. Only the first RHS set encountered is honored. A non-empty
//! RANGES section is rejected rather than silently misread.
//!
//! MPS does not encode an objective sense; parsed problems are Minimize and
//! callers wishing to maximize override post-parse.

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::GzDecoder;

use crate::error::{MilpError, MilpResult};
use crate::model::{ConstraintSense, ObjectiveSense, Problem, VarKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Rows,
    Columns,
    Rhs,
    Ranges,
    Bounds,
}

/// Read an MPS file, transparently decompressing a `.gz` path.
pub fn read_mps_file<P: AsRef<Path>>(path: P) -> MilpResult<Problem> {
    let path = path.as_ref();
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        parse_mps(BufReader::new(GzDecoder::new(file)))
    } else {
        parse_mps(BufReader::new(file))
    }
}

/// Parse an MPS stream into a [`Problem`].
pub fn parse_mps<R: BufRead>(reader: R) -> MilpResult<Problem> {
    let mut problem = Problem::new("", ObjectiveSense::Minimize);
    let mut section = Section::Preamble;
    let mut objective_row: Option<String> = None;
    let mut ignored_rows: HashSet<String> = HashSet::new();
    let mut rows: HashMap<String, usize> = HashMap::new();
    let mut cols: HashMap<String, usize> = HashMap::new();
    let mut rhs_set: Option<String> = None;
    let mut integer_mode = false;
    let mut saw_rows = false;
    let mut saw_columns = false;
    let mut saw_endata = false;
    let mut line_no = 0usize;

    for line in reader.lines() {
        let line = line?;
        line_no += 1;

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('*') {
            continue;
        }

        // Section headers start in column one.
        if !line.starts_with(' ') && !line.starts_with('\t') {
            let mut fields = trimmed.split_whitespace();
            let keyword = fields.next().unwrap_or("");
            match keyword {
                "NAME" => problem.set_name(fields.next().unwrap_or("")),
                "ROWS" => {
                    section = Section::Rows;
                    saw_rows = true;
                }
                "COLUMNS" => {
                    section = Section::Columns;
                    saw_columns = true;
                }
                "RHS" => section = Section::Rhs,
                "RANGES" => section = Section::Ranges,
                "BOUNDS" => section = Section::Bounds,
                "ENDATA" => {
                    saw_endata = true;
                    break;
                }
                other => {
                    return Err(MilpError::Unsupported(format!("MPS section '{other}'")));
                }
            }
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        match section {
            Section::Preamble => {
                return Err(MilpError::Syntax {
                    line: line_no,
                    message: "data line outside of any section".to_string(),
                });
            }
            Section::Rows => {
                parse_row_entry(
                    &fields,
                    line_no,
                    &mut problem,
                    &mut objective_row,
                    &mut ignored_rows,
                    &mut rows,
                )?;
            }
            Section::Columns => {
                parse_column_entry(
                    &fields,
                    line_no,
                    &mut problem,
                    objective_row.as_deref(),
                    &ignored_rows,
                    &rows,
                    &mut cols,
                    &mut integer_mode,
                )?;
            }
            Section::Rhs => {
                parse_rhs_entry(
                    &fields,
                    line_no,
                    &mut problem,
                    objective_row.as_deref(),
                    &ignored_rows,
                    &rows,
                    &mut rhs_set,
                )?;
            }
            Section::Ranges => {
                return Err(MilpError::Unsupported("RANGES section".to_string()));
            }
            Section::Bounds => {
                parse_bound_entry(&fields, line_no, &mut problem, &cols)?;
            }
        }
    }

    if !saw_endata {
        return Err(MilpError::Syntax {
            line: line_no,
            message: "missing ENDATA".to_string(),
        });
    }
    if !saw_rows || !saw_columns {
        let missing = if saw_rows { "COLUMNS" } else { "ROWS" };
        return Err(MilpError::Syntax {
            line: line_no,
            message: format!("missing required {missing} section"),
        });
    }

    Ok(problem)
}

fn parse_row_entry(
    fields: &[&str],
    line: usize,
    problem: &mut Problem,
    objective_row: &mut Option<String>,
    ignored_rows: &mut HashSet<String>,
    rows: &mut HashMap<String, usize>,
) -> MilpResult<()> {
    let [sense_tok, name] = fields else {
        return Err(MilpError::Syntax {
            line,
            message: "expected a row sense and a row name".to_string(),
        });
    };
    let sense = match *sense_tok {
        "N" => {
            if objective_row.is_none() {
                *objective_row = Some(name.to_string());
            } else {
                // Only the first free row is the objective.
                ignored_rows.insert(name.to_string());
            }
            return Ok(());
        }
        "L" => ConstraintSense::Le,
        "G" => ConstraintSense::Ge,
        "E" => ConstraintSense::Eq,
        other => {
            return Err(MilpError::Syntax {
                line,
                message: format!("unknown row sense '{other}'"),
            });
        }
    };
    let index = problem.add_constraint(*name, sense, 0.0)?;
    rows.insert(name.to_string(), index);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn parse_column_entry(
    fields: &[&str],
    line: usize,
    problem: &mut Problem,
    objective_row: Option<&str>,
    ignored_rows: &HashSet<String>,
    rows: &HashMap<String, usize>,
    cols: &mut HashMap<String, usize>,
    integer_mode: &mut bool,
) -> MilpResult<()> {
    if fields.iter().any(|f| *f == "'MARKER'") {
        if fields.iter().any(|f| *f == "'INTORG'") {
            *integer_mode = true;
        } else if fields.iter().any(|f| *f == "'INTEND'") {
            *integer_mode = false;
        } else {
            return Err(MilpError::Syntax {
                line,
                message: "marker line without 'INTORG' or 'INTEND'".to_string(),
            });
        }
        return Ok(());
    }

    let (col_name, pairs) = split_entry(fields, line)?;

    let var_idx = match cols.get(col_name) {
        Some(&idx) => idx,
        None => {
            let kind = if *integer_mode {
                VarKind::Integer
            } else {
                VarKind::Continuous
            };
            let idx = problem.add_variable(col_name, kind);
            // Classical MPS default bounds.
            problem.set_variable_bounds(idx, 0.0, f64::INFINITY)?;
            cols.insert(col_name.to_string(), idx);
            idx
        }
    };

    for pair in pairs.chunks(2) {
        let row = pair[0];
        let value = parse_value(pair[1], line)?;
        if Some(row) == objective_row {
            problem.set_objective_coefficient(var_idx, value)?;
        } else if let Some(&cidx) = rows.get(row) {
            problem.set_coefficient(cidx, var_idx, value)?;
        } else if !ignored_rows.contains(row) {
            return Err(MilpError::UnknownRow {
                row: row.to_string(),
                line,
            });
        }
    }
    Ok(())
}

fn parse_rhs_entry(
    fields: &[&str],
    line: usize,
    problem: &mut Problem,
    objective_row: Option<&str>,
    ignored_rows: &HashSet<String>,
    rows: &HashMap<String, usize>,
    rhs_set: &mut Option<String>,
) -> MilpResult<()> {
    let (set_name, pairs) = split_entry(fields, line)?;
    match rhs_set {
        None => *rhs_set = Some(set_name.to_string()),
        Some(first) if first != set_name => return Ok(()),
        _ => {}
    }

    for pair in pairs.chunks(2) {
        let row = pair[0];
        let value = parse_value(pair[1], line)?;
        if Some(row) == objective_row || ignored_rows.contains(row) {
            continue;
        }
        let Some(&cidx) = rows.get(row) else {
            return Err(MilpError::UnknownRow {
                row: row.to_string(),
                line,
            });
        };
        problem.set_constraint_rhs(cidx, value)?;
    }
    Ok(())
}

fn parse_bound_entry(
    fields: &[&str],
    line: usize,
    problem: &mut Problem,
    cols: &HashMap<String, usize>,
) -> MilpResult<()> {
    if fields.len() < 3 {
        return Err(MilpError::Syntax {
            line,
            message: "expected bound type, set name, and column".to_string(),
        });
    }
    let btype = fields[0];
    let var_name = fields[2];
    let Some(&idx) = cols.get(var_name) else {
        return Err(MilpError::Syntax {
            line,
            message: format!("unknown column '{var_name}' in BOUNDS"),
        });
    };

    let value = |line: usize| -> MilpResult<f64> {
        let token = fields.get(3).ok_or_else(|| MilpError::Syntax {
            line,
            message: format!("bound type '{btype}' requires a value"),
        })?;
        parse_value(token, line)
    };

    let var = &problem.variables()[idx];
    let (lower, upper) = (var.lower(), var.upper());
    match btype {
        "UP" => problem.set_variable_bounds(idx, lower, value(line)?)?,
        "LO" => problem.set_variable_bounds(idx, value(line)?, upper)?,
        "FX" => {
            let v = value(line)?;
            problem.set_variable_bounds(idx, v, v)?;
        }
        "FR" => problem.set_variable_bounds(idx, f64::NEG_INFINITY, f64::INFINITY)?,
        "MI" => problem.set_variable_bounds(idx, f64::NEG_INFINITY, upper)?,
        "PL" => problem.set_variable_bounds(idx, lower, f64::INFINITY)?,
        "BV" => problem.set_variable_kind(idx, VarKind::Binary)?,
        "LI" => {
            let v = value(line)?;
            problem.set_variable_kind(idx, VarKind::Integer)?;
            problem.set_variable_bounds(idx, v, upper)?;
        }
        "UI" => {
            let v = value(line)?;
            problem.set_variable_kind(idx, VarKind::Integer)?;
            problem.set_variable_bounds(idx, lower, v)?;
        }
        other => {
            return Err(MilpError::Unsupported(format!("bound type '{other}'")));
        }
    }
    Ok(())
}

/// Split a data entry into its leading name and the trailing (key, value)
/// pair list, validating arity.
fn split_entry<'a>(fields: &'a [&'a str], line: usize) -> MilpResult<(&'a str, &'a [&'a str])> {
    let (name, pairs) = fields.split_first().ok_or_else(|| MilpError::Syntax {
        line,
        message: "empty entry".to_string(),
    })?;
    if pairs.is_empty() || pairs.len() % 2 != 0 {
        return Err(MilpError::Syntax {
            line,
            message: "expected (row, value) pairs".to_string(),
        });
    }
    Ok((*name, pairs))
}

fn parse_value(token: &str, line: usize) -> MilpResult<f64> {
    token.parse::<f64>().map_err(|_| MilpError::Syntax {
        line,
        message: format!("invalid numeric value '{token}'"),
    })
}
