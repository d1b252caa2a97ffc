//! Descriptive expense statistics and spending-pattern analytics.

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::ExpenseRecord;

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Per-category count and total.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CategoryStat {
    pub count: usize,
    pub total: f64,
}

/// Descriptive statistics over an expense list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseStatistics {
    pub total_expenses: usize,
    pub total_amount: f64,
    pub average_amount: f64,
    pub largest_expense: f64,
    pub smallest_expense: f64,
    pub category_breakdown: HashMap<String, CategoryStat>,
    pub monthly_trend: HashMap<String, f64>,
    pub daily_average: f64,
}

/// Spending bucketed by category, weekday and month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpendingPatterns {
    pub top_categories: Vec<(String, f64)>,
    pub spending_trend: String,
    pub peak_spending_day: Option<String>,
    pub peak_spending_month: Option<String>,
    pub day_spending: HashMap<String, f64>,
    pub month_spending: HashMap<String, f64>,
}

/// Weekend vs weekday totals and averages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeekendWeekdayAnalysis {
    pub weekend_total: f64,
    pub weekday_total: f64,
    pub weekend_avg: f64,
    pub weekday_avg: f64,
    pub weekend_count: usize,
    pub weekday_count: usize,
    pub spends_more_on_weekends: bool,
}

/// Category totals in first-appearance order. Shared by patterns and
/// insights so tie-breaking stays deterministic.
pub(crate) fn category_totals_ordered(expenses: &[ExpenseRecord]) -> Vec<(String, f64)> {
    let mut totals: Vec<(String, f64)> = Vec::new();
    for expense in expenses {
        match totals.iter_mut().find(|(c, _)| *c == expense.category) {
            Some((_, t)) => *t += expense.amount,
            None => totals.push((expense.category.clone(), expense.amount)),
        }
    }
    totals
}

/// Compute detailed statistics as of `today`.
///
/// `daily_average` divides the trailing-30-day total by a constant 30, not
/// by the number of days actually observed. That matches the API this
/// replaces and is preserved for compatibility.
pub fn expense_statistics(expenses: &[ExpenseRecord], today: NaiveDate) -> ExpenseStatistics {
    if expenses.is_empty() {
        return ExpenseStatistics {
            total_expenses: 0,
            total_amount: 0.0,
            average_amount: 0.0,
            largest_expense: 0.0,
            smallest_expense: 0.0,
            category_breakdown: HashMap::new(),
            monthly_trend: HashMap::new(),
            daily_average: 0.0,
        };
    }

    let total_expenses = expenses.len();
    let total_amount: f64 = expenses.iter().map(|e| e.amount).sum();
    let average_amount = total_amount / total_expenses as f64;
    let largest_expense = expenses.iter().map(|e| e.amount).fold(f64::MIN, f64::max);
    let smallest_expense = expenses.iter().map(|e| e.amount).fold(f64::MAX, f64::min);

    let mut category_breakdown: HashMap<String, CategoryStat> = HashMap::new();
    for expense in expenses {
        let stat = category_breakdown
            .entry(expense.category.clone())
            .or_default();
        stat.count += 1;
        stat.total += expense.amount;
    }

    let mut monthly_trend: HashMap<String, f64> = HashMap::new();
    for expense in expenses {
        let key = format!(
            "{}-{:02}",
            expense.expense_date.year(),
            expense.expense_date.month()
        );
        *monthly_trend.entry(key).or_insert(0.0) += expense.amount;
    }

    let thirty_days_ago = today - Duration::days(30);
    let recent_total: f64 = expenses
        .iter()
        .filter(|e| e.expense_date >= thirty_days_ago)
        .map(|e| e.amount)
        .sum();
    let has_recent = expenses.iter().any(|e| e.expense_date >= thirty_days_ago);
    let daily_average = if has_recent { recent_total / 30.0 } else { 0.0 };

    ExpenseStatistics {
        total_expenses,
        total_amount,
        average_amount,
        largest_expense,
        smallest_expense,
        category_breakdown,
        monthly_trend,
        daily_average,
    }
}

/// [`expense_statistics`] as of the local date.
pub fn expense_statistics_today(expenses: &[ExpenseRecord]) -> ExpenseStatistics {
    expense_statistics(expenses, Local::now().date_naive())
}

/// Analyze spending patterns: top categories, weekday and month buckets.
///
/// Top categories are sorted by total descending; ties keep the order the
/// categories first appeared in the expense list. Peak day/month pick the
/// first maximum (Monday and January lowest).
pub fn spending_patterns(expenses: &[ExpenseRecord]) -> SpendingPatterns {
    if expenses.is_empty() {
        return SpendingPatterns {
            top_categories: Vec::new(),
            spending_trend: "stable".to_string(),
            peak_spending_day: None,
            peak_spending_month: None,
            day_spending: HashMap::new(),
            month_spending: HashMap::new(),
        };
    }

    let mut top_categories = category_totals_ordered(expenses);
    // Stable sort keeps first-appearance order for equal totals
    top_categories.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    top_categories.truncate(5);

    let mut day_totals = [0.0_f64; 7];
    let mut month_totals = [0.0_f64; 12];
    for expense in expenses {
        let weekday = expense.expense_date.weekday().num_days_from_monday() as usize;
        day_totals[weekday] += expense.amount;
        month_totals[expense.expense_date.month0() as usize] += expense.amount;
    }

    let peak_day = first_max_index(&day_totals);
    let peak_month = first_max_index(&month_totals);

    let day_spending: HashMap<String, f64> = WEEKDAY_NAMES
        .iter()
        .zip(day_totals.iter())
        .map(|(name, total)| (name.to_string(), *total))
        .collect();
    let month_spending: HashMap<String, f64> = MONTH_NAMES
        .iter()
        .zip(month_totals.iter())
        .map(|(name, total)| (name.to_string(), *total))
        .collect();

    SpendingPatterns {
        top_categories,
        spending_trend: "stable".to_string(),
        peak_spending_day: Some(WEEKDAY_NAMES[peak_day].to_string()),
        peak_spending_month: Some(MONTH_NAMES[peak_month].to_string()),
        day_spending,
        month_spending,
    }
}

/// Compare weekend (Saturday/Sunday) spending against weekdays.
pub fn weekend_weekday_analysis(expenses: &[ExpenseRecord]) -> WeekendWeekdayAnalysis {
    let is_weekend =
        |e: &&ExpenseRecord| e.expense_date.weekday().num_days_from_monday() >= 5;

    let weekend: Vec<&ExpenseRecord> = expenses.iter().filter(is_weekend).collect();
    let weekday: Vec<&ExpenseRecord> = expenses.iter().filter(|e| !is_weekend(e)).collect();

    let weekend_total: f64 = weekend.iter().map(|e| e.amount).sum();
    let weekday_total: f64 = weekday.iter().map(|e| e.amount).sum();

    let weekend_avg = if weekend.is_empty() {
        0.0
    } else {
        weekend_total / weekend.len() as f64
    };
    let weekday_avg = if weekday.is_empty() {
        0.0
    } else {
        weekday_total / weekday.len() as f64
    };

    WeekendWeekdayAnalysis {
        weekend_total,
        weekday_total,
        weekend_avg,
        weekday_avg,
        weekend_count: weekend.len(),
        weekday_count: weekday.len(),
        spends_more_on_weekends: weekend_avg > weekday_avg,
    }
}

fn first_max_index(totals: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in totals.iter().enumerate() {
        if *v > totals[best] {
            best = i;
        }
    }
    best
}
