//! Secret API keys table
//!
//! Pure projection of a project's cached key records into the secret keys
//! table: only secret keys, in their original order, with a fixed empty state.

use std::fmt;

use crate::domain::api_key::{ApiKeyId, ApiKeyRecord};

pub const TITLE: &str = "Secret API keys";
pub const DESCRIPTION: &str = "These API keys allow privileged access to your project's APIs. Use in servers, functions, workers or other backend components of your application. Keep secret and never publish.";
pub const CREATE_LABEL: &str = "Create new";

/// Header cells; the last column holds row actions and has no label
pub const COLUMNS: [&str; 4] = ["API Key", "Postgres Role for RLS", "Description", ""];

/// Two-line message shown instead of rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyState {
    pub title: &'static str,
    pub detail: &'static str,
}

impl EmptyState {
    pub const NO_SECRET_KEYS: Self = Self {
        title: "No secret API keys created yet",
        detail: "Your project can't be accessed from your servers using secret API keys.",
    };
}

/// Answers from the permission and project-status facilities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleGates {
    pub can_manage_keys: bool,
    pub project_active: bool,
}

impl Default for ConsoleGates {
    fn default() -> Self {
        Self {
            can_manage_keys: true,
            project_active: true,
        }
    }
}

/// Availability of the create trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateAction {
    Available,
    /// Shown but inert while the project is not active
    Disabled,
    /// Not shown without permission to manage keys
    Hidden,
}

impl From<ConsoleGates> for CreateAction {
    fn from(gates: ConsoleGates) -> Self {
        match (gates.can_manage_keys, gates.project_active) {
            (false, _) => Self::Hidden,
            (true, false) => Self::Disabled,
            (true, true) => Self::Available,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretKeyRow {
    pub id: ApiKeyId,
    pub api_key: String,
    pub role: Option<String>,
    pub description: Option<String>,
}

impl From<&ApiKeyRecord> for SecretKeyRow {
    fn from(record: &ApiKeyRecord) -> Self {
        Self {
            id: record.id().clone(),
            api_key: record.api_key().to_string(),
            role: record.role().map(String::from),
            description: record.description().map(String::from),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    Rows(Vec<SecretKeyRow>),
    Empty(EmptyState),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretKeysTable {
    body: TableBody,
    create_action: CreateAction,
}

impl SecretKeysTable {
    /// Project `records` into the table
    pub fn project(records: &[ApiKeyRecord], gates: ConsoleGates) -> Self {
        let rows: Vec<SecretKeyRow> = records
            .iter()
            .filter(|r| r.is_secret())
            .map(SecretKeyRow::from)
            .collect();

        let body = if rows.is_empty() {
            TableBody::Empty(EmptyState::NO_SECRET_KEYS)
        } else {
            TableBody::Rows(rows)
        };

        Self {
            body,
            create_action: gates.into(),
        }
    }

    pub fn columns(&self) -> &'static [&'static str; 4] {
        &COLUMNS
    }

    pub fn body(&self) -> &TableBody {
        &self.body
    }

    pub fn rows(&self) -> &[SecretKeyRow] {
        match &self.body {
            TableBody::Rows(rows) => rows,
            TableBody::Empty(_) => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.rows().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows().is_empty()
    }

    pub fn create_action(&self) -> CreateAction {
        self.create_action
    }
}

impl fmt::Display for SecretKeysTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels = &COLUMNS[..3];
        let cells: Vec<[&str; 3]> = self
            .rows()
            .iter()
            .map(|row| {
                [
                    row.api_key.as_str(),
                    row.role.as_deref().unwrap_or(""),
                    row.description.as_deref().unwrap_or(""),
                ]
            })
            .collect();

        let mut widths = [0usize; 3];
        for (i, label) in labels.iter().enumerate() {
            widths[i] = label.chars().count();
        }
        for row in &cells {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        writeln!(f, "{}", TITLE)?;
        if self.create_action == CreateAction::Available {
            writeln!(f, "[{}]", CREATE_LABEL)?;
        }
        writeln!(f)?;

        write_row(f, labels, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_row(f, &rule.iter().map(String::as_str).collect::<Vec<_>>(), &widths)?;

        match &self.body {
            TableBody::Empty(empty) => {
                writeln!(f, "{}", empty.title)?;
                writeln!(f, "{}", empty.detail)?;
            }
            TableBody::Rows(_) => {
                for row in &cells {
                    write_row(f, row, &widths)?;
                }
            }
        }

        Ok(())
    }
}

fn write_row(f: &mut fmt::Formatter<'_>, cells: &[&str], widths: &[usize; 3]) -> fmt::Result {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();

    writeln!(f, "{}", line.join("  ").trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api_key::ApiKeyType;

    fn record(id: &str, key_type: ApiKeyType) -> ApiKeyRecord {
        ApiKeyRecord::new(ApiKeyId::new(id), key_type, format!("key_{id}"))
    }

    #[test]
    fn test_only_secret_keys_in_original_order() {
        let records = vec![
            record("p1", ApiKeyType::Publishable),
            record("s1", ApiKeyType::Secret).with_description("first"),
            record("p2", ApiKeyType::Publishable),
            record("s2", ApiKeyType::Secret).with_role("authenticated"),
            record("s3", ApiKeyType::Secret),
        ];

        let table = SecretKeysTable::project(&records, ConsoleGates::default());

        let ids: Vec<&str> = table.rows().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s2", "s3"]);
        let secret_count = records
            .iter()
            .filter(|r| r.key_type() == ApiKeyType::Secret)
            .count();
        assert_eq!(table.len(), secret_count);
        assert_eq!(table.rows()[0].description.as_deref(), Some("first"));
        assert_eq!(table.rows()[1].role.as_deref(), Some("authenticated"));
    }

    #[test]
    fn test_empty_state_without_secret_keys() {
        let records = vec![record("p1", ApiKeyType::Publishable)];

        let table = SecretKeysTable::project(&records, ConsoleGates::default());

        assert!(table.is_empty());
        assert_eq!(table.body(), &TableBody::Empty(EmptyState::NO_SECRET_KEYS));
        assert_eq!(table.columns().len(), 4);

        let rendered = table.to_string();
        assert!(rendered.contains("API Key"));
        assert!(rendered.contains("No secret API keys created yet"));
        let detail = "Your project can't be accessed from your servers using secret API keys.";
        assert!(rendered.contains(detail));
    }

    #[test]
    fn test_create_trigger_present_regardless_of_size() {
        let empty = SecretKeysTable::project(&[], ConsoleGates::default());
        let full = SecretKeysTable::project(
            &[record("s1", ApiKeyType::Secret)],
            ConsoleGates::default(),
        );

        assert_eq!(empty.create_action(), CreateAction::Available);
        assert_eq!(full.create_action(), CreateAction::Available);
        assert!(empty.to_string().contains("[Create new]"));
        assert!(full.to_string().contains("[Create new]"));
    }

    #[test]
    fn test_gates() {
        let inactive = ConsoleGates {
            project_active: false,
            ..ConsoleGates::default()
        };
        let no_permission = ConsoleGates {
            can_manage_keys: false,
            project_active: true,
        };

        assert_eq!(CreateAction::from(inactive), CreateAction::Disabled);
        assert_eq!(CreateAction::from(no_permission), CreateAction::Hidden);
        assert!(!SecretKeysTable::project(&[], no_permission)
            .to_string()
            .contains("[Create new]"));
    }

    #[test]
    fn test_render_rows() {
        let records = vec![
            record("s1", ApiKeyType::Secret)
                .with_role("service_role")
                .with_description("worker"),
            record("s2", ApiKeyType::Secret),
        ];

        let rendered = SecretKeysTable::project(&records, ConsoleGates::default()).to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        let expected = ["key_s1", "service_role", "worker"];
        assert!(lines
            .iter()
            .any(|l| l.split_whitespace().eq(expected.iter().copied())));
        assert!(lines.iter().any(|l| *l == "key_s2"));
        assert!(!rendered.contains("No secret API keys created yet"));
    }
}
