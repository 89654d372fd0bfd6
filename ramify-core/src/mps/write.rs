//! MPS writer.
//!
//! Emits the subset of MPS the reader understands, so writing a problem and
//! reparsing it preserves solve behavior. The objective sense is not part
//! of the format; reparsing yields a Minimize problem and callers restore
//! the sense afterwards. Row and column names are emitted verbatim and must
//! be whitespace-free.

use std::io::Write;

use crate::error::MilpResult;
use crate::model::{ConstraintSense, Problem, VarKind};

/// Name given to the objective row.
const OBJECTIVE_ROW: &str = "OBJ";

/// Write `problem` as MPS text.
pub fn write_mps<W: Write>(problem: &Problem, mut out: W) -> MilpResult<()> {
    writeln!(out, "NAME          {}", problem.name())?;

    writeln!(out, "ROWS")?;
    writeln!(out, " N  {OBJECTIVE_ROW}")?;
    for constraint in problem.constraints() {
        let letter = match constraint.sense() {
            ConstraintSense::Le => 'L',
            ConstraintSense::Ge => 'G',
            ConstraintSense::Eq => 'E',
        };
        writeln!(out, " {}  {}", letter, constraint.name())?;
    }

    writeln!(out, "COLUMNS")?;
    let mut integer_open = false;
    let mut marker_seq = 0u32;
    for (j, var) in problem.variables().iter().enumerate() {
        if var.is_integer() != integer_open {
            marker_seq += 1;
            let marker = if integer_open { "'INTEND'" } else { "'INTORG'" };
            writeln!(out, "    MARKER{marker_seq:04}  'MARKER'                 {marker}")?;
            integer_open = !integer_open;
        }

        let mut wrote_entry = false;
        if var.obj_coeff() != 0.0 {
            writeln!(out, "    {:<9} {:<9} {}", var.name(), OBJECTIVE_ROW, var.obj_coeff())?;
            wrote_entry = true;
        }
        for constraint in problem.constraints() {
            if let Some(&coeff) = constraint.terms().get(&j) {
                writeln!(out, "    {:<9} {:<9} {}", var.name(), constraint.name(), coeff)?;
                wrote_entry = true;
            }
        }
        // A column with no entries would vanish on reparse; register it
        // with an explicit zero objective coefficient.
        if !wrote_entry {
            writeln!(out, "    {:<9} {:<9} 0.0", var.name(), OBJECTIVE_ROW)?;
        }
    }
    if integer_open {
        marker_seq += 1;
        writeln!(out, "    MARKER{marker_seq:04}  'MARKER'                 'INTEND'")?;
    }

    writeln!(out, "RHS")?;
    for constraint in problem.constraints() {
        if constraint.rhs() != 0.0 {
            writeln!(
                out,
                "    RHS       {:<9} {}",
                constraint.name(),
                constraint.rhs()
            )?;
        }
    }

    writeln!(out, "BOUNDS")?;
    for var in problem.variables() {
        if var.kind() == VarKind::Binary {
            writeln!(out, " BV BND       {}", var.name())?;
            continue;
        }
        let (lower, upper) = (var.lower(), var.upper());
        if lower == 0.0 && upper == f64::INFINITY {
            continue;
        }
        if lower == upper {
            writeln!(out, " FX BND       {:<9} {}", var.name(), lower)?;
            continue;
        }
        if lower == f64::NEG_INFINITY && upper == f64::INFINITY {
            writeln!(out, " FR BND       {}", var.name())?;
            continue;
        }
        if lower == f64::NEG_INFINITY {
            writeln!(out, " MI BND       {}", var.name())?;
        } else if lower != 0.0 {
            writeln!(out, " LO BND       {:<9} {}", var.name(), lower)?;
        }
        if upper != f64::INFINITY {
            writeln!(out, " UP BND       {:<9} {}", var.name(), upper)?;
        }
    }

    writeln!(out, "ENDATA")?;
    Ok(())
}
