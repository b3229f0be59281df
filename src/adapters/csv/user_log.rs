//! User log: `id;nom;email;motDePasse;role`.

use std::path::Path;

use super::{Result, create_writer, field, read_records};
use crate::domain::{Password, Role, User, UserId};

pub const HEADER: [&str; 5] = ["id", "nom", "email", "motDePasse", "role"];

fn parse_record(record: &csv::StringRecord) -> std::result::Result<User, String> {
    let (Some(id), Some(name), Some(email), Some(password), Some(role)) = (
        field(record, 0),
        field(record, 1),
        field(record, 2),
        field(record, 3),
        field(record, 4),
    ) else {
        return Err(format!("expected 5 fields, found {}", record.len()));
    };

    Ok(User {
        user_id: UserId::new(
            id.parse()
                .map_err(|_| format!("id is not an integer: {:?}", id))?,
        ),
        name: name.to_string(),
        email: email.to_string(),
        password: Password::new(password)
            .map_err(|e| format!("password rejected: {:?}", e))?,
        role: role
            .parse::<Role>()
            .map_err(|role| format!("unknown role: {:?}", role))?,
    })
}

/// Read the user log
///
/// Records that are short, carry a non-integer id, an unknown role or a
/// password below the minimum length are skipped with a warning.
pub fn read(path: &Path) -> Result<Vec<User>> {
    let records = read_records(path)?;
    let mut users = Vec::with_capacity(records.len());

    for record in &records {
        match parse_record(record) {
            Ok(user) => users.push(user),
            Err(reason) => tracing::warn!(
                "Skipping user record at line {} in {}: {}",
                record
                    .position()
                    .map(|position| position.line())
                    .unwrap_or_default(),
                path.display(),
                reason
            ),
        }
    }

    Ok(users)
}

/// Overwrite the user log with `users`
pub fn write(path: &Path, users: &[User]) -> Result<()> {
    let mut writer = create_writer(path, &HEADER)?;

    for user in users {
        writer.write_record([
            user.user_id.to_string().as_str(),
            user.name.as_str(),
            user.email.as_str(),
            user.password.as_str(),
            user.role.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
