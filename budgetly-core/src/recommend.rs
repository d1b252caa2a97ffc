//! Rule-based recommendation engine.
//!
//! Rules live in a fixed-order table and are evaluated top to bottom; the
//! output keeps that emission order and is truncated to [`MAX_RECOMMENDATIONS`]
//! afterwards. The cap can therefore drop the trailing filler tip, or even a
//! mid-table rule, when enough earlier rules fired. Nothing is re-sorted by
//! priority.

use chrono::{Local, NaiveDate};

use crate::model::{ExpenseRecord, Priority, Recommendation, RecommendationKind, UserProfile};
use crate::summary::{
    budget_summary, savings_progress, spending_trends, BudgetSummary, SavingsProgress,
    SpendingTrends,
};

/// Recommendations returned per call, at most.
pub const MAX_RECOMMENDATIONS: usize = 5;

/// Metrics shared by every rule, computed once per call.
struct RuleContext<'a> {
    user: &'a UserProfile,
    expenses: &'a [ExpenseRecord],
    summary: BudgetSummary,
    trends: SpendingTrends,
    progress: SavingsProgress,
}

impl RuleContext<'_> {
    /// Combined spending across `categories` as a percentage of the stipend.
    /// Zero-stipend profiles yield 0 rather than dividing by zero.
    fn category_percent(&self, categories: &[&str]) -> f64 {
        if self.user.stipend <= 0.0 {
            return 0.0;
        }
        let spent: f64 = categories
            .iter()
            .filter_map(|c| self.summary.expenses_by_category.get(*c))
            .sum();
        (spent / self.user.stipend) * 100.0
    }

    fn largest_expense(&self) -> f64 {
        self.expenses.iter().map(|e| e.amount).fold(0.0, f64::max)
    }
}

type Rule = fn(&RuleContext) -> Option<Recommendation>;

/// The ordered rule table. Order is part of the contract: the first five
/// recommendations emitted by this sequence are what the caller sees.
const RULES: &[Rule] = &[
    over_budget,
    savings_goal,
    food_spending,
    transport_spending,
    entertainment_spending,
    daily_spending,
    positive,
    tracking,
    large_expense,
    general_tip,
];

/// Generate up to five prioritized recommendations for a user.
///
/// An empty expense list short-circuits to a single welcome message.
pub fn generate_recommendations(
    user: &UserProfile,
    expenses: &[ExpenseRecord],
    today: NaiveDate,
) -> Vec<Recommendation> {
    if expenses.is_empty() {
        return vec![Recommendation {
            kind: RecommendationKind::Welcome,
            message: "Welcome to Budgetly! Start tracking your expenses to get personalized \
                      recommendations."
                .to_string(),
            priority: Priority::Low,
        }];
    }

    let ctx = RuleContext {
        user,
        expenses,
        summary: budget_summary(user, expenses, today),
        trends: spending_trends(expenses),
        progress: savings_progress(user, expenses),
    };

    RULES
        .iter()
        .filter_map(|rule| rule(&ctx))
        .take(MAX_RECOMMENDATIONS)
        .collect()
}

/// [`generate_recommendations`] as of the local date.
pub fn generate_recommendations_today(
    user: &UserProfile,
    expenses: &[ExpenseRecord],
) -> Vec<Recommendation> {
    generate_recommendations(user, expenses, Local::now().date_naive())
}

fn over_budget(ctx: &RuleContext) -> Option<Recommendation> {
    if ctx.summary.remaining_budget >= 0.0 {
        return None;
    }
    Some(Recommendation {
        kind: RecommendationKind::OverBudget,
        message: format!(
            "You're currently over budget by ${:.2}. Consider reducing non-essential expenses.",
            ctx.summary.remaining_budget.abs()
        ),
        priority: Priority::High,
    })
}

fn savings_goal(ctx: &RuleContext) -> Option<Recommendation> {
    if ctx.progress.on_track {
        return None;
    }
    Some(Recommendation {
        kind: RecommendationKind::SavingsGoal,
        message: format!(
            "You need to save ${:.2} more to reach your savings goal. Try cutting back on \
             discretionary spending.",
            ctx.progress.goal_shortfall
        ),
        priority: Priority::High,
    })
}

fn food_spending(ctx: &RuleContext) -> Option<Recommendation> {
    let pct = ctx.category_percent(&["food"]);
    if pct <= 35.0 {
        return None;
    }
    Some(Recommendation {
        kind: RecommendationKind::FoodSpending,
        message: format!(
            "You're spending {pct:.1}% on food. Consider cooking more meals at home to save money."
        ),
        priority: Priority::Medium,
    })
}

fn transport_spending(ctx: &RuleContext) -> Option<Recommendation> {
    let pct = ctx.category_percent(&["transport", "transportation"]);
    if pct <= 20.0 {
        return None;
    }
    Some(Recommendation {
        kind: RecommendationKind::TransportSpending,
        message: format!(
            "Transportation costs are {pct:.1}% of your budget. Consider using public transport \
             or carpooling."
        ),
        priority: Priority::Medium,
    })
}

fn entertainment_spending(ctx: &RuleContext) -> Option<Recommendation> {
    let pct = ctx.category_percent(&["entertainment", "leisure"]);
    if pct <= 15.0 {
        return None;
    }
    Some(Recommendation {
        kind: RecommendationKind::EntertainmentSpending,
        message: format!(
            "Entertainment spending is {pct:.1}% of your budget. Look for free campus activities."
        ),
        priority: Priority::Medium,
    })
}

fn daily_spending(ctx: &RuleContext) -> Option<Recommendation> {
    let average = ctx.trends.average_daily_spending;
    let limit = ctx.summary.daily_limit;
    if average <= limit * 1.2 {
        return None;
    }
    Some(Recommendation {
        kind: RecommendationKind::DailySpending,
        message: format!(
            "Your average daily spending (${average:.2}) is above your daily limit (${limit:.2}). \
             Try to stay within budget."
        ),
        priority: Priority::High,
    })
}

fn positive(ctx: &RuleContext) -> Option<Recommendation> {
    if !(ctx.progress.on_track && ctx.summary.remaining_budget > 0.0) {
        return None;
    }
    Some(Recommendation {
        kind: RecommendationKind::Positive,
        message: "Great job! You're on track with your savings goal and staying within budget. \
                  Keep it up!"
            .to_string(),
        priority: Priority::Low,
    })
}

fn tracking(ctx: &RuleContext) -> Option<Recommendation> {
    if ctx.expenses.len() >= 5 {
        return None;
    }
    Some(Recommendation {
        kind: RecommendationKind::Tracking,
        message: "Start tracking all your expenses, even small ones. It helps identify spending \
                  patterns."
            .to_string(),
        priority: Priority::Low,
    })
}

fn large_expense(ctx: &RuleContext) -> Option<Recommendation> {
    let largest = ctx.largest_expense();
    if largest <= ctx.user.stipend * 0.1 {
        return None;
    }
    Some(Recommendation {
        kind: RecommendationKind::LargeExpense,
        message: format!(
            "Your largest expense (${largest:.2}) is significant. Plan for such expenses in \
             advance."
        ),
        priority: Priority::Medium,
    })
}

fn general_tip(_ctx: &RuleContext) -> Option<Recommendation> {
    Some(Recommendation {
        kind: RecommendationKind::Tips,
        message: "Take advantage of free campus events, gym facilities, and student discounts to \
                  save money."
            .to_string(),
        priority: Priority::Low,
    })
}
