//! budgetly-core: pure budget arithmetic, recommendations and analytics
//! over a student's stipend profile and expense list.

pub mod insights;
pub mod model;
pub mod recommend;
pub mod stats;
pub mod summary;

pub use insights::{
    analyze_spending_behavior, spending_insights, spending_insights_today, BehaviorType,
    InsightPatterns, RiskLevel, SpendingBehavior, SpendingInsights,
};
pub use model::{
    ExpenseRecord, PlannedPurchase, Priority, Recommendation, RecommendationKind, UserProfile,
};
pub use recommend::{generate_recommendations, generate_recommendations_today, MAX_RECOMMENDATIONS};
pub use stats::{
    expense_statistics, expense_statistics_today, spending_patterns, weekend_weekday_analysis,
    CategoryStat, ExpenseStatistics, SpendingPatterns, WeekendWeekdayAnalysis,
};
pub use summary::{
    budget_summary, budget_summary_today, recent_summary, savings_progress, spending_trends,
    BudgetSummary, RecentSummary, SavingsProgress, SpendingTrends, CYCLE_DAYS,
};
