//! Derived figures over the fetched transaction list.
//!
//! Everything here is a pure function of the transactions and the user's
//! budget; no backend round-trip is involved.

use crate::models::{Transaction, TransactionKind};

/// Transactions shown per page in the dashboard list
pub const PAGE_SIZE: usize = 5;

pub fn income_total(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Income)
        .map(|t| t.amount)
        .sum()
}

pub fn expense_total(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .filter(|t| t.kind == TransactionKind::Expense)
        .map(|t| t.amount)
        .sum()
}

/// What is left of the monthly budget after expenses
pub fn balance(budget: f64, transactions: &[Transaction]) -> f64 {
    budget - expense_total(transactions)
}

pub fn is_overspending(budget: f64, transactions: &[Transaction]) -> bool {
    expense_total(transactions) > budget
}

/// Distinct categories in first-seen order, for the filter menu
pub fn categories(transactions: &[Transaction]) -> Vec<String> {
    let mut seen = Vec::new();
    for t in transactions {
        if !seen.iter().any(|c| c == &t.category) {
            seen.push(t.category.clone());
        }
    }
    seen
}

/// Filter by category; `None` means "all"
pub fn filter_by_category<'a>(
    transactions: &'a [Transaction],
    category: Option<&str>,
) -> Vec<&'a Transaction> {
    transactions
        .iter()
        .filter(|t| category.is_none_or(|c| t.category == c))
        .collect()
}

pub fn page_count(item_count: usize) -> usize {
    item_count.div_ceil(PAGE_SIZE)
}

/// Slice out one page (zero-based). An out-of-range page yields an empty slice.
pub fn page_slice<'a, T>(items: &'a [T], page: usize) -> &'a [T] {
    let start = page.saturating_mul(PAGE_SIZE).min(items.len());
    let end = (start + PAGE_SIZE).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn expense(amount: f64) -> Transaction {
        entry(TransactionKind::Expense, amount, "Food")
    }

    fn entry(kind: TransactionKind, amount: f64, category: &str) -> Transaction {
        Transaction {
            id: 0,
            kind,
            amount,
            description: String::new(),
            category: category.to_string(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_balance_under_budget() {
        let transactions = vec![expense(500.0), expense(300.0)];
        assert_eq!(balance(1500.0, &transactions), 700.0);
        assert!(!is_overspending(1500.0, &transactions));
    }

    #[test]
    fn test_overspending_detected() {
        let transactions = vec![expense(900.0), expense(800.0)];
        assert!(is_overspending(1500.0, &transactions));
        assert_eq!(balance(1500.0, &transactions), -200.0);
    }

    #[test]
    fn test_income_does_not_count_against_budget() {
        let transactions = vec![
            entry(TransactionKind::Income, 2000.0, "Salary"),
            expense(100.0),
        ];
        assert_eq!(income_total(&transactions), 2000.0);
        assert_eq!(expense_total(&transactions), 100.0);
        assert_eq!(balance(1500.0, &transactions), 1400.0);
    }

    #[test]
    fn test_categories_are_distinct_in_order() {
        let transactions = vec![
            entry(TransactionKind::Expense, 1.0, "Food"),
            entry(TransactionKind::Expense, 2.0, "Transport"),
            entry(TransactionKind::Expense, 3.0, "Food"),
        ];
        assert_eq!(categories(&transactions), vec!["Food", "Transport"]);
    }

    #[test]
    fn test_filter_by_category() {
        let transactions = vec![
            entry(TransactionKind::Expense, 1.0, "Food"),
            entry(TransactionKind::Expense, 2.0, "Transport"),
        ];
        assert_eq!(filter_by_category(&transactions, None).len(), 2);

        let food = filter_by_category(&transactions, Some("Food"));
        assert_eq!(food.len(), 1);
        assert_eq!(food[0].category, "Food");
    }

    #[test]
    fn test_pagination() {
        let items: Vec<i32> = (0..12).collect();
        assert_eq!(page_count(items.len()), 3);
        assert_eq!(page_slice(&items, 0), &[0, 1, 2, 3, 4]);
        assert_eq!(page_slice(&items, 2), &[10, 11]);
        assert!(page_slice(&items, 3).is_empty());
        assert_eq!(page_count(0), 0);
    }
}
