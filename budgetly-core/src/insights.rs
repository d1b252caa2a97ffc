//! Textual spending insights and behavior classification.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::{ExpenseRecord, UserProfile};
use crate::stats::category_totals_ordered;
use crate::summary::{budget_summary, spending_trends};

/// Pattern highlights attached to the insight report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsightPatterns {
    pub most_expensive_category: Option<String>,
    pub average_daily_spending: f64,
    pub total_expenses: usize,
}

/// Insight report: observations, pattern highlights, suggestions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpendingInsights {
    pub insights: Vec<String>,
    pub patterns: InsightPatterns,
    pub suggestions: Vec<String>,
}

/// Spender classification, evaluated in fixed priority order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorType {
    NoData,
    FrequentSpender,
    BigSpender,
    OccasionalSplurger,
    ModerateSpender,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Unknown,
    Low,
    Medium,
    High,
}

/// Result of [`analyze_spending_behavior`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpendingBehavior {
    pub behavior_type: BehaviorType,
    pub risk_level: RiskLevel,
    pub habits: Vec<String>,
    pub frequency: f64,
    pub average_amount: f64,
    pub max_amount: f64,
}

/// Build the textual insight report for a user as of `today`.
pub fn spending_insights(
    user: &UserProfile,
    expenses: &[ExpenseRecord],
    today: NaiveDate,
) -> SpendingInsights {
    if expenses.is_empty() {
        return SpendingInsights {
            insights: vec!["No expenses recorded yet. Start tracking to get insights!".to_string()],
            patterns: InsightPatterns {
                most_expensive_category: None,
                average_daily_spending: 0.0,
                total_expenses: 0,
            },
            suggestions: vec!["Begin by recording your first expense".to_string()],
        };
    }

    let summary = budget_summary(user, expenses, today);
    let trends = spending_trends(expenses);

    let mut insights = Vec::new();
    let mut suggestions = Vec::new();

    // Highest-spending category; ties resolve to first appearance
    let totals = category_totals_ordered(expenses);
    let most_expensive = totals
        .iter()
        .fold(None::<&(String, f64)>, |best, cur| match best {
            Some(b) if b.1 >= cur.1 => Some(b),
            _ => Some(cur),
        });
    if let Some((category, amount)) = most_expensive {
        insights.push(format!(
            "Your highest spending category is {category} (${amount:.2})"
        ));
    }

    // Spread between the busiest and quietest recorded day
    if !trends.daily_spending.is_empty() {
        let max_day = trends.daily_spending.values().fold(f64::MIN, |a, b| a.max(*b));
        let min_day = trends.daily_spending.values().fold(f64::MAX, |a, b| a.min(*b));
        if max_day - min_day > user.stipend * 0.1 {
            insights.push(
                "Your daily spending varies significantly. Consider setting daily spending \
                 limits."
                    .to_string(),
            );
        }
    }

    // Weekend vs weekday comparison needs data on both sides
    let weekend_total: f64 = expenses
        .iter()
        .filter(|e| is_weekend(e.expense_date))
        .map(|e| e.amount)
        .sum();
    let weekday_total: f64 = expenses
        .iter()
        .filter(|e| !is_weekend(e.expense_date))
        .map(|e| e.amount)
        .sum();
    let has_weekend = expenses.iter().any(|e| is_weekend(e.expense_date));
    let has_weekday = expenses.iter().any(|e| !is_weekend(e.expense_date));
    if has_weekend && has_weekday && weekend_total > weekday_total * 1.5 {
        insights.push(
            "You spend more on weekends. Consider planning weekend activities with budgets in \
             mind."
                .to_string(),
        );
    }

    if summary.remaining_budget < user.stipend * 0.2 {
        suggestions.push("Set up automatic transfers to savings account".to_string());
        suggestions.push("Use the 50/30/20 rule: 50% needs, 30% wants, 20% savings".to_string());
    }

    if trends.average_daily_spending > summary.daily_limit {
        suggestions.push("Try the envelope method for discretionary spending".to_string());
        suggestions.push("Use cash for daily expenses to feel the spending impact".to_string());
    }

    SpendingInsights {
        insights,
        patterns: InsightPatterns {
            most_expensive_category: most_expensive.map(|(c, _)| c.clone()),
            average_daily_spending: trends.average_daily_spending,
            total_expenses: expenses.len(),
        },
        suggestions,
    }
}

/// [`spending_insights`] as of the local date.
pub fn spending_insights_today(user: &UserProfile, expenses: &[ExpenseRecord]) -> SpendingInsights {
    spending_insights(user, expenses, Local::now().date_naive())
}

/// Classify spending behavior from frequency and amount thresholds.
///
/// Checks run in fixed priority order, first match wins: more than two
/// expenses per distinct day, then mean amount over 100, then any single
/// amount over 500, else moderate.
pub fn analyze_spending_behavior(expenses: &[ExpenseRecord]) -> SpendingBehavior {
    if expenses.is_empty() {
        return SpendingBehavior {
            behavior_type: BehaviorType::NoData,
            risk_level: RiskLevel::Unknown,
            habits: Vec::new(),
            frequency: 0.0,
            average_amount: 0.0,
            max_amount: 0.0,
        };
    }

    let mut days: Vec<NaiveDate> = expenses.iter().map(|e| e.expense_date).collect();
    days.sort_unstable();
    days.dedup();
    let frequency = expenses.len() as f64 / days.len().max(1) as f64;

    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    let average_amount = total / expenses.len() as f64;
    let max_amount = expenses.iter().map(|e| e.amount).fold(0.0, f64::max);

    let (behavior_type, risk_level, habits): (_, _, &[&str]) = if frequency > 2.0 {
        (
            BehaviorType::FrequentSpender,
            RiskLevel::Medium,
            &[
                "Makes frequent small purchases",
                "May benefit from batch shopping",
            ],
        )
    } else if average_amount > 100.0 {
        (
            BehaviorType::BigSpender,
            RiskLevel::High,
            &[
                "Makes large purchases",
                "Should plan major expenses carefully",
            ],
        )
    } else if max_amount > 500.0 {
        (
            BehaviorType::OccasionalSplurger,
            RiskLevel::Medium,
            &[
                "Occasionally makes large purchases",
                "Consider saving for big purchases",
            ],
        )
    } else {
        (
            BehaviorType::ModerateSpender,
            RiskLevel::Low,
            &[
                "Balanced spending pattern",
                "Good foundation for budgeting",
            ],
        )
    };

    SpendingBehavior {
        behavior_type,
        risk_level,
        habits: habits.iter().map(|h| h.to_string()).collect(),
        frequency,
        average_amount,
        max_amount,
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    chrono::Datelike::weekday(&date).num_days_from_monday() >= 5
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user(stipend: f64, goal: f64, today: NaiveDate) -> UserProfile {
        UserProfile::new(1, stipend, goal, today - Duration::days(10))
    }

    fn expense(id: i64, amount: f64, category: &str, date: NaiveDate) -> ExpenseRecord {
        ExpenseRecord::new(id, 1, amount, category, None, date)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_insights_empty_has_starter_text() {
        let today = day(2026, 8, 24);
        let r = spending_insights(&user(1000.0, 0.0, today), &[], today);
        assert_eq!(r.insights.len(), 1);
        assert_eq!(r.suggestions, vec!["Begin by recording your first expense"]);
        assert!(r.patterns.most_expensive_category.is_none());
    }

    #[test]
    fn test_highest_category_reported() {
        let today = day(2026, 8, 24);
        let expenses = vec![
            expense(1, 40.0, "food", day(2026, 8, 20)),
            expense(2, 90.0, "rent", day(2026, 8, 21)),
        ];
        let r = spending_insights(&user(2000.0, 0.0, today), &expenses, today);
        assert!(r.insights[0].contains("rent"));
        assert!(r.insights[0].contains("$90.00"));
        assert_eq!(r.patterns.most_expensive_category.as_deref(), Some("rent"));
    }

    #[test]
    fn test_variance_insight_fires_on_wide_spread() {
        let today = day(2026, 8, 24);
        // Day spreads: 5 vs 200 on a 1000 stipend => spread 195 > 100
        let expenses = vec![
            expense(1, 5.0, "food", day(2026, 8, 20)),
            expense(2, 200.0, "food", day(2026, 8, 21)),
        ];
        let r = spending_insights(&user(1000.0, 0.0, today), &expenses, today);
        assert!(r
            .insights
            .iter()
            .any(|i| i.contains("varies significantly")));
    }

    #[test]
    fn test_weekend_insight_requires_both_sides() {
        let today = day(2026, 8, 24);
        // Weekend only: no comparison possible
        let weekend_only = vec![expense(1, 300.0, "fun", day(2026, 8, 8))];
        let r = spending_insights(&user(10_000.0, 0.0, today), &weekend_only, today);
        assert!(!r.insights.iter().any(|i| i.contains("weekends")));

        // Weekend 300 vs weekday 100: 300 > 150
        let both = vec![
            expense(1, 300.0, "fun", day(2026, 8, 8)),
            expense(2, 100.0, "food", day(2026, 8, 10)),
        ];
        let r = spending_insights(&user(10_000.0, 0.0, today), &both, today);
        assert!(r.insights.iter().any(|i| i.contains("weekends")));
    }

    #[test]
    fn test_suggestions_on_thin_remaining_budget() {
        let today = day(2026, 8, 24);
        // 850 of 1000 spent: remaining 150 < 200
        let expenses = vec![expense(1, 850.0, "rent", day(2026, 8, 20))];
        let r = spending_insights(&user(1000.0, 0.0, today), &expenses, today);
        assert!(r.suggestions.iter().any(|s| s.contains("50/30/20")));
    }

    #[test]
    fn test_behavior_no_data() {
        let b = analyze_spending_behavior(&[]);
        assert_eq!(b.behavior_type, BehaviorType::NoData);
        assert_eq!(b.risk_level, RiskLevel::Unknown);
        assert!(b.habits.is_empty());
    }

    #[test]
    fn test_behavior_frequent_spender_wins_over_amount() {
        // 3 expenses on one day (frequency 3 > 2) with large amounts:
        // frequency check has priority over the amount checks
        let d = day(2026, 8, 20);
        let expenses = vec![
            expense(1, 200.0, "a", d),
            expense(2, 300.0, "b", d),
            expense(3, 600.0, "c", d),
        ];
        let b = analyze_spending_behavior(&expenses);
        assert_eq!(b.behavior_type, BehaviorType::FrequentSpender);
        assert_eq!(b.risk_level, RiskLevel::Medium);
        assert_eq!(b.frequency, 3.0);
    }

    #[test]
    fn test_behavior_big_spender() {
        let expenses = vec![
            expense(1, 150.0, "a", day(2026, 8, 20)),
            expense(2, 120.0, "b", day(2026, 8, 21)),
        ];
        let b = analyze_spending_behavior(&expenses);
        assert_eq!(b.behavior_type, BehaviorType::BigSpender);
        assert_eq!(b.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_behavior_occasional_splurger() {
        let expenses = vec![
            expense(1, 10.0, "a", day(2026, 8, 18)),
            expense(2, 15.0, "b", day(2026, 8, 19)),
            expense(3, 550.0, "c", day(2026, 8, 20)),
            expense(4, 5.0, "d", day(2026, 8, 21)),
            expense(5, 8.0, "e", day(2026, 8, 22)),
            expense(6, 12.0, "f", day(2026, 8, 23)),
        ];
        let b = analyze_spending_behavior(&expenses);
        assert_eq!(b.behavior_type, BehaviorType::OccasionalSplurger);
    }

    #[test]
    fn test_behavior_moderate() {
        let expenses = vec![
            expense(1, 10.0, "a", day(2026, 8, 20)),
            expense(2, 15.0, "b", day(2026, 8, 21)),
        ];
        let b = analyze_spending_behavior(&expenses);
        assert_eq!(b.behavior_type, BehaviorType::ModerateSpender);
        assert_eq!(b.risk_level, RiskLevel::Low);
    }
}
