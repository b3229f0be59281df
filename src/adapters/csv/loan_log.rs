//! Loan log: `Id;IdUtilisateur;TitreLivre;DateEmprunt;DateRetour`.
//!
//! Dates are written as `yyyy-MM-dd`.

use chrono::NaiveDate;
use std::path::Path;

use super::{Result, create_writer, field, raw_field, read_records};
use crate::domain::dates::format_iso;
use crate::domain::{Loan, LoanId, MalformedDate, RowError, UserId};

pub const HEADER: [&str; 5] = ["Id", "IdUtilisateur", "TitreLivre", "DateEmprunt", "DateRetour"];

/// A loan record with all five fields present but not yet interpreted
///
/// The loan store, the return import and the reports each interpret the
/// fields with their own date policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanRow {
    pub line: usize,
    pub loan_id: String,
    pub user_id: String,
    pub title: String,
    pub loan_date: String,
    pub due_date: String,
}

impl LoanRow {
    /// Interpret the row, parsing both dates with `parse_date`
    pub fn to_loan(
        &self,
        parse_date: impl Fn(&str) -> std::result::Result<NaiveDate, MalformedDate>,
    ) -> std::result::Result<Loan, RowError> {
        let loan_id = self.parse_integer("Id", &self.loan_id)?;
        let user_id = self.parse_integer("IdUtilisateur", &self.user_id)?;
        let date = |value: &str| {
            parse_date(value).map_err(|source| RowError::Date {
                line: self.line,
                source,
            })
        };

        Ok(Loan {
            loan_id: LoanId::new(loan_id),
            user_id: UserId::new(user_id),
            title: self.title.clone(),
            loan_date: date(&self.loan_date)?,
            due_date: date(&self.due_date)?,
        })
    }

    /// The user identifier, if it is an integer
    pub fn parsed_user_id(&self) -> std::result::Result<UserId, RowError> {
        self.parse_integer("IdUtilisateur", &self.user_id)
            .map(UserId::new)
    }

    fn parse_integer(
        &self,
        column: &'static str,
        value: &str,
    ) -> std::result::Result<u32, RowError> {
        value.parse().map_err(|_| RowError::NotAnInteger {
            line: self.line,
            column,
            value: value.to_string(),
        })
    }
}

/// Read the loan log
///
/// Records with fewer than five fields are skipped with a warning.
/// Line numbers count the header as line 1.
pub fn read(path: &Path) -> Result<Vec<LoanRow>> {
    let records = read_records(path)?;
    let mut rows = Vec::with_capacity(records.len());

    for record in &records {
        let line = record
            .position()
            .map(|position| position.line() as usize)
            .unwrap_or_default();

        match (
            field(record, 0),
            field(record, 1),
            raw_field(record, 2),
            field(record, 3),
            field(record, 4),
        ) {
            (Some(loan_id), Some(user_id), Some(title), Some(loan_date), Some(due_date)) => {
                rows.push(LoanRow {
                    line,
                    loan_id: loan_id.to_string(),
                    user_id: user_id.to_string(),
                    title: title.to_string(),
                    loan_date: loan_date.to_string(),
                    due_date: due_date.to_string(),
                })
            }
            _ => tracing::warn!(
                "Skipping short record at line {} in {} ({} fields)",
                line,
                path.display(),
                record.len()
            ),
        }
    }

    Ok(rows)
}

/// Overwrite the loan log with `loans`
pub fn write(path: &Path, loans: &[Loan]) -> Result<()> {
    let mut writer = create_writer(path, &HEADER)?;

    for loan in loans {
        writer.write_record([
            loan.loan_id.to_string(),
            loan.user_id.to_string(),
            loan.title.clone(),
            format_iso(loan.loan_date),
            format_iso(loan.due_date),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
