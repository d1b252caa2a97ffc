//! Budget calculator: pure arithmetic over a profile and its expense list.
//!
//! Every function takes `today` explicitly so results are reproducible in
//! tests; the `*_today` wrappers plug in the local date for callers.

use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::{ExpenseRecord, UserProfile};

/// Length of a budget cycle in days. The cycle is a fixed 30-day window,
/// not a calendar month.
pub const CYCLE_DAYS: i64 = 30;

/// Derived budget snapshot. Recomputed on every call, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetSummary {
    pub stipend: f64,
    pub expenses_by_category: HashMap<String, f64>,
    pub savings_goal: f64,
    pub remaining_budget: f64,
    pub daily_limit: f64,
    pub total_expenses: f64,
    pub days_elapsed: i64,
    pub days_remaining: i64,
}

/// Per-day spending aggregates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpendingTrends {
    pub average_daily_spending: f64,
    pub total_spending: f64,
    pub expense_count: usize,
    pub daily_spending: HashMap<NaiveDate, f64>,
}

/// Progress against the monthly savings goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavingsProgress {
    pub actual_savings: f64,
    pub savings_rate: f64,
    pub annual_projection: f64,
    pub on_track: bool,
    pub goal_shortfall: f64,
}

/// Summary of expenses inside a trailing window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentSummary {
    pub count: usize,
    pub total_amount: f64,
    pub average_amount: f64,
    pub categories: Vec<String>,
}

/// Compute the budget summary for a user as of `today`.
///
/// `days_elapsed` is signed: a cycle starting in the future yields a
/// negative value, and nothing is clamped. `days_remaining` may likewise be
/// zero or negative once the 30-day window has passed; the daily-limit
/// denominator is floored at 1 so the division is always defined.
pub fn budget_summary(
    user: &UserProfile,
    expenses: &[ExpenseRecord],
    today: NaiveDate,
) -> BudgetSummary {
    let days_elapsed = (today - user.budget_cycle_start).num_days();
    let days_remaining = CYCLE_DAYS - days_elapsed;

    let total_expenses: f64 = expenses.iter().map(|e| e.amount).sum();
    let remaining_budget = user.stipend - total_expenses;
    let daily_limit = remaining_budget / days_remaining.max(1) as f64;

    let mut expenses_by_category: HashMap<String, f64> = HashMap::new();
    for expense in expenses {
        *expenses_by_category
            .entry(expense.category.clone())
            .or_insert(0.0) += expense.amount;
    }

    BudgetSummary {
        stipend: user.stipend,
        expenses_by_category,
        savings_goal: user.savings_goal,
        remaining_budget,
        daily_limit,
        total_expenses,
        days_elapsed,
        days_remaining,
    }
}

/// [`budget_summary`] as of the local date.
pub fn budget_summary_today(user: &UserProfile, expenses: &[ExpenseRecord]) -> BudgetSummary {
    budget_summary(user, expenses, Local::now().date_naive())
}

/// Aggregate spending by date.
///
/// `average_daily_spending` is the mean of the per-day sums, i.e. total
/// divided by the number of distinct days with at least one expense — not
/// the mean of individual expense amounts.
pub fn spending_trends(expenses: &[ExpenseRecord]) -> SpendingTrends {
    if expenses.is_empty() {
        return SpendingTrends {
            average_daily_spending: 0.0,
            total_spending: 0.0,
            expense_count: 0,
            daily_spending: HashMap::new(),
        };
    }

    let total_spending: f64 = expenses.iter().map(|e| e.amount).sum();

    let mut daily_spending: HashMap<NaiveDate, f64> = HashMap::new();
    for expense in expenses {
        *daily_spending.entry(expense.expense_date).or_insert(0.0) += expense.amount;
    }

    let average_daily_spending = total_spending / daily_spending.len() as f64;

    SpendingTrends {
        average_daily_spending,
        total_spending,
        expense_count: expenses.len(),
        daily_spending,
    }
}

/// Compute savings progress against the monthly goal.
///
/// `savings_rate` defaults to 0 when the stipend is 0 rather than dividing
/// by zero.
pub fn savings_progress(user: &UserProfile, expenses: &[ExpenseRecord]) -> SavingsProgress {
    let total_expenses: f64 = expenses.iter().map(|e| e.amount).sum();
    let actual_savings = user.stipend - total_expenses;

    let savings_rate = if user.stipend > 0.0 {
        (actual_savings / user.stipend) * 100.0
    } else {
        0.0
    };

    SavingsProgress {
        actual_savings,
        savings_rate,
        annual_projection: actual_savings * 12.0,
        on_track: actual_savings >= user.savings_goal,
        goal_shortfall: (user.savings_goal - actual_savings).max(0.0),
    }
}

/// Summarize expenses from the trailing `days`-day window ending at `today`.
pub fn recent_summary(expenses: &[ExpenseRecord], days: i64, today: NaiveDate) -> RecentSummary {
    let cutoff = today - Duration::days(days);
    let recent: Vec<&ExpenseRecord> = expenses
        .iter()
        .filter(|e| e.expense_date >= cutoff)
        .collect();

    if recent.is_empty() {
        return RecentSummary {
            count: 0,
            total_amount: 0.0,
            average_amount: 0.0,
            categories: Vec::new(),
        };
    }

    let total_amount: f64 = recent.iter().map(|e| e.amount).sum();
    let average_amount = total_amount / recent.len() as f64;

    // Distinct categories in first-appearance order
    let mut categories: Vec<String> = Vec::new();
    for e in &recent {
        if !categories.contains(&e.category) {
            categories.push(e.category.clone());
        }
    }

    RecentSummary {
        count: recent.len(),
        total_amount,
        average_amount,
        categories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(stipend: f64, goal: f64, cycle_start: NaiveDate) -> UserProfile {
        UserProfile::new(1, stipend, goal, cycle_start)
    }

    fn expense(id: i64, amount: f64, category: &str, date: NaiveDate) -> ExpenseRecord {
        ExpenseRecord::new(id, 1, amount, category, None, date)
    }

    #[test]
    fn test_summary_end_of_cycle() {
        // 30 days in: days_remaining hits 0, the daily-limit denominator
        // floors at 1 and the full remainder becomes the daily limit.
        let today = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        let start = today - Duration::days(30);
        let u = user(2000.0, 300.0, start);
        let expenses = vec![
            expense(1, 25.50, "food", today),
            expense(2, 15.00, "transport", today),
        ];

        let s = budget_summary(&u, &expenses, today);
        assert_eq!(s.total_expenses, 40.50);
        assert_eq!(s.remaining_budget, 1959.50);
        assert_eq!(s.days_elapsed, 30);
        assert_eq!(s.days_remaining, 0);
        assert_eq!(s.daily_limit, 1959.50);
    }

    #[test]
    fn test_summary_future_cycle_start_is_negative() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let start = today + Duration::days(5);
        let s = budget_summary(&user(1000.0, 0.0, start), &[], today);
        assert_eq!(s.days_elapsed, -5);
        assert_eq!(s.days_remaining, 35);
    }

    #[test]
    fn test_category_totals_are_case_sensitive() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();
        let expenses = vec![
            expense(1, 10.0, "food", today),
            expense(2, 5.0, "Food", today),
            expense(3, 2.5, "food", today),
        ];
        let s = budget_summary(&user(500.0, 0.0, today), &expenses, today);
        assert_eq!(s.expenses_by_category["food"], 12.5);
        assert_eq!(s.expenses_by_category["Food"], 5.0);
    }

    #[test]
    fn test_category_totals_sum_to_total() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();
        let expenses = vec![
            expense(1, 12.30, "food", today),
            expense(2, 7.20, "transport", today - Duration::days(1)),
            expense(3, 99.99, "books", today - Duration::days(2)),
        ];
        let s = budget_summary(&user(1500.0, 100.0, today), &expenses, today);
        let cat_sum: f64 = s.expenses_by_category.values().sum();
        assert!((cat_sum - s.total_expenses).abs() < 1e-9);
    }

    #[test]
    fn test_trends_average_is_per_day_not_per_expense() {
        let d1 = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2026, 8, 2).unwrap();
        let expenses = vec![
            expense(1, 10.0, "food", d1),
            expense(2, 20.0, "food", d1),
            expense(3, 30.0, "food", d2),
        ];
        let t = spending_trends(&expenses);
        // 60 over 2 distinct days, not 3 expenses
        assert_eq!(t.average_daily_spending, 30.0);
        assert_eq!(t.expense_count, 3);
        assert_eq!(t.daily_spending[&d1], 30.0);
    }

    #[test]
    fn test_trends_empty() {
        let t = spending_trends(&[]);
        assert_eq!(t.average_daily_spending, 0.0);
        assert_eq!(t.total_spending, 0.0);
        assert!(t.daily_spending.is_empty());
    }

    #[test]
    fn test_savings_progress_on_track() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();
        let u = user(2000.0, 300.0, today);
        let expenses = vec![expense(1, 1500.0, "rent", today)];
        let p = savings_progress(&u, &expenses);
        assert_eq!(p.actual_savings, 500.0);
        assert_eq!(p.savings_rate, 25.0);
        assert_eq!(p.annual_projection, 6000.0);
        assert!(p.on_track);
        assert_eq!(p.goal_shortfall, 0.0);
    }

    #[test]
    fn test_savings_progress_shortfall() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();
        let u = user(1000.0, 400.0, today);
        let expenses = vec![expense(1, 700.0, "food", today)];
        let p = savings_progress(&u, &expenses);
        assert!(!p.on_track);
        assert_eq!(p.goal_shortfall, 100.0);
    }

    #[test]
    fn test_savings_rate_zero_stipend_guard() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();
        let p = savings_progress(&user(0.0, 0.0, today), &[]);
        assert_eq!(p.savings_rate, 0.0);
    }

    #[test]
    fn test_recent_summary_window() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 20).unwrap();
        let expenses = vec![
            expense(1, 10.0, "food", today - Duration::days(2)),
            expense(2, 30.0, "transport", today - Duration::days(6)),
            expense(3, 99.0, "books", today - Duration::days(20)),
        ];
        let r = recent_summary(&expenses, 7, today);
        assert_eq!(r.count, 2);
        assert_eq!(r.total_amount, 40.0);
        assert_eq!(r.average_amount, 20.0);
        assert_eq!(r.categories, vec!["food", "transport"]);
    }
}
