//! CSV export of the transaction list.

use std::path::Path;

use anyhow::{Context, Result};

use crate::models::Transaction;

/// Default export file name, written to the current directory
pub const EXPORT_FILE: &str = "expense-report.csv";

/// Write the transaction list to `path` as CSV.
///
/// Columns match the on-screen list: description, amount, type, category,
/// added date, and the edited date (blank when the entry was never edited).
pub fn write_csv(transactions: &[Transaction], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    writer.write_record([
        "Description",
        "Amount",
        "Type",
        "Category",
        "Added Date",
        "Edited Date",
    ])?;

    for t in transactions {
        let edited = if t.was_edited() {
            t.updated_at
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        } else {
            String::new()
        };
        let amount = format!("{:.2}", t.amount);
        let kind = t.kind.to_string();
        let added = t.created_at.format("%Y-%m-%d").to_string();

        writer.write_record([
            t.description.as_str(),
            amount.as_str(),
            kind.as_str(),
            t.category.as_str(),
            added.as_str(),
            edited.as_str(),
        ])?;
    }

    writer.flush().context("Failed to write CSV export")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_export_writes_header_and_rows() {
        let created = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let edited = Utc.with_ymd_and_hms(2025, 3, 4, 9, 0, 0).unwrap();
        let transactions = vec![
            Transaction {
                id: 1,
                kind: TransactionKind::Expense,
                amount: 42.5,
                description: "Groceries".to_string(),
                category: "Food".to_string(),
                created_at: created,
                updated_at: Some(created),
            },
            Transaction {
                id: 2,
                kind: TransactionKind::Income,
                amount: 100.0,
                description: "Refund".to_string(),
                category: "General".to_string(),
                created_at: created,
                updated_at: Some(edited),
            },
        ];

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILE);
        write_csv(&transactions, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Description,Amount,Type,Category,Added Date,Edited Date"
        );
        assert_eq!(lines.next().unwrap(), "Groceries,42.50,expense,Food,2025-03-01,");
        assert_eq!(
            lines.next().unwrap(),
            "Refund,100.00,income,General,2025-03-01,2025-03-04"
        );
    }
}
