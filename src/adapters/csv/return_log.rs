//! Return log: one record per loan return.
//!
//! `idEmprunt;idUtilisateur;nomUtilisateur;idLivre;titreLivre;dateEmprunt;dateRetourPrevue;dateRetourEffective`
//!
//! Returns carry neither the user name nor a book id, so those two columns
//! are written empty. Files holding only the six known fields per record
//! (no name or book id columns) are still read.
//!
//! Dates are `yyyy-MM-dd`. A missing actual return date is written as `null`;
//! `null` and blank are both read back as "not returned".

use std::path::Path;

use super::{Result, create_writer, field, raw_field, read_records};
use crate::domain::dates::{format_iso, parse_iso, parse_optional_iso};
use crate::domain::{LoanId, LoanReturn, UserId};

pub const HEADER: [&str; 8] = [
    "idEmprunt",
    "idUtilisateur",
    "nomUtilisateur",
    "idLivre",
    "titreLivre",
    "dateEmprunt",
    "dateRetourPrevue",
    "dateRetourEffective",
];

const NOT_RETURNED: &str = "null";

/// Position of the title column; the three date columns follow it
fn title_column(record: &csv::StringRecord) -> usize {
    if record.len() >= HEADER.len() { 4 } else { 2 }
}

fn parse_record(record: &csv::StringRecord) -> Option<LoanReturn> {
    let title = title_column(record);
    Some(LoanReturn {
        loan_id: LoanId::new(field(record, 0)?.parse().ok()?),
        user_id: UserId::new(field(record, 1)?.parse().ok()?),
        title: raw_field(record, title)?.to_string(),
        loan_date: parse_iso(field(record, title + 1)?).ok()?,
        due_date: parse_iso(field(record, title + 2)?).ok()?,
        returned_on: parse_optional_iso(field(record, title + 3)?).ok()?,
    })
}

/// Read the return log, skipping malformed records with a warning
pub fn read(path: &Path) -> Result<Vec<LoanReturn>> {
    let records = read_records(path)?;
    let mut returns = Vec::with_capacity(records.len());

    for record in &records {
        match parse_record(record) {
            Some(loan_return) => returns.push(loan_return),
            None => tracing::warn!(
                "Skipping malformed return record at line {} in {}",
                record
                    .position()
                    .map(|position| position.line())
                    .unwrap_or_default(),
                path.display()
            ),
        }
    }

    Ok(returns)
}

/// Overwrite the return log with `returns`
pub fn write(path: &Path, returns: &[LoanReturn]) -> Result<()> {
    let mut writer = create_writer(path, &HEADER)?;

    for loan_return in returns {
        writer.write_record([
            loan_return.loan_id.to_string(),
            loan_return.user_id.to_string(),
            String::new(),
            String::new(),
            loan_return.title.clone(),
            format_iso(loan_return.loan_date),
            format_iso(loan_return.due_date),
            loan_return
                .returned_on
                .map(format_iso)
                .unwrap_or_else(|| NOT_RETURNED.to_string()),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
