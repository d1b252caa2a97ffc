//! Domain records: user profile, expenses, planned purchases, recommendations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A student's budgeting profile.
///
/// `stipend` is strictly positive and `savings_goal` non-negative; the
/// validation layer in front of the core enforces both before records get
/// here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    /// Unique identifier for this user
    pub id: i64,
    /// Monthly stipend amount
    pub stipend: f64,
    /// Monthly savings goal
    pub savings_goal: f64,
    /// Start date of the current budget cycle (YYYY-MM-DD)
    pub budget_cycle_start: NaiveDate,
}

/// A single logged expense, owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseRecord {
    /// Unique identifier for this expense
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Expense amount (positive)
    pub amount: f64,
    /// Free-text category label, 1-50 chars, case-sensitive
    pub category: String,
    /// Optional free-text description, up to 500 chars
    pub description: Option<String>,
    /// Date the expense occurred
    pub expense_date: NaiveDate,
}

/// A purchase the user intends to make, judged by the advisor.
///
/// `priority` is free text in practice; only the exact value `"high"`
/// carries meaning for the fallback heuristic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlannedPurchase {
    pub id: i64,
    pub user_id: i64,
    pub item_name: String,
    pub expected_price: f64,
    pub priority: String,
    pub desired_date: NaiveDate,
}

/// Priority level attached to a recommendation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Type tag identifying which rule produced a recommendation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Welcome,
    OverBudget,
    SavingsGoal,
    FoodSpending,
    TransportSpending,
    EntertainmentSpending,
    DailySpending,
    Positive,
    Tracking,
    LargeExpense,
    Tips,
}

/// A single human-readable recommendation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub message: String,
    pub priority: Priority,
}

impl UserProfile {
    pub fn new(id: i64, stipend: f64, savings_goal: f64, budget_cycle_start: NaiveDate) -> Self {
        Self {
            id,
            stipend,
            savings_goal,
            budget_cycle_start,
        }
    }
}

impl ExpenseRecord {
    pub fn new(
        id: i64,
        user_id: i64,
        amount: f64,
        category: impl Into<String>,
        description: Option<String>,
        expense_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            user_id,
            amount,
            category: category.into(),
            description,
            expense_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommendation_serializes_with_type_field() {
        let rec = Recommendation {
            kind: RecommendationKind::OverBudget,
            message: "You're currently over budget by $12.00.".to_string(),
            priority: Priority::High,
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["type"], "over_budget");
        assert_eq!(json["priority"], "high");
    }

    #[test]
    fn test_expense_record_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        let exp = ExpenseRecord::new(7, 1, 25.50, "food", Some("lunch".to_string()), date);
        let json = serde_json::to_string(&exp).unwrap();
        let back: ExpenseRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, exp);
        assert_eq!(back.expense_date, date);
    }
}
