use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use budgetly_core::{ExpenseRecord, PlannedPurchase, UserProfile};

mod config;
mod import;
mod store;

#[derive(Parser, Debug)]
#[command(name = "budgetly", version, about = "Student budgeting CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create or replace the budgeting profile in ~/.budgetly
    Init {
        /// Monthly stipend (must be positive)
        #[arg(long)]
        stipend: f64,

        /// Monthly savings goal
        #[arg(long, default_value_t = 0.0)]
        savings_goal: f64,

        /// Budget cycle start date (YYYY-MM-DD, default: today)
        #[arg(long)]
        cycle_start: Option<NaiveDate>,
    },

    /// Log a single expense
    Log {
        amount: f64,
        category: String,

        #[arg(long)]
        description: Option<String>,

        /// Expense date (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Import expenses from a CSV file (date,amount,category,description)
    Import {
        csv: PathBuf,
    },

    /// Add a planned purchase for the advisor to judge
    Plan {
        item_name: String,
        expected_price: f64,

        /// high / medium / low
        #[arg(long, default_value = "medium")]
        priority: String,

        /// When you'd like to buy it (default: today)
        #[arg(long)]
        desired_date: Option<NaiveDate>,
    },

    /// Budget summary, savings progress and spending trends
    Summary,

    /// Prioritized recommendations (at most five)
    Recommend,

    /// Textual insights and behavior classification
    Insights,

    /// Detailed statistics, patterns and weekend analysis
    Stats,

    /// AI advice on cuts and planned purchases
    Advise,

    /// Find places to buy an item
    Deals {
        item: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Init {
            stipend,
            savings_goal,
            cycle_start,
        } => init_profile(stipend, savings_goal, cycle_start)?,

        Command::Log {
            amount,
            category,
            description,
            date,
        } => log_expense(amount, category, description, date)?,

        Command::Import { csv } => import_expenses(&csv)?,

        Command::Plan {
            item_name,
            expected_price,
            priority,
            desired_date,
        } => add_plan(item_name, expected_price, priority, desired_date)?,

        Command::Summary => {
            let user = store::require_profile()?;
            let expenses = store::read_expenses()?;
            print_json(&serde_json::json!({
                "summary": budgetly_core::budget_summary_today(&user, &expenses),
                "savings": budgetly_core::savings_progress(&user, &expenses),
                "trends": budgetly_core::spending_trends(&expenses),
            }))?;
        }

        Command::Recommend => {
            let user = store::require_profile()?;
            let expenses = store::read_expenses()?;
            print_json(&budgetly_core::generate_recommendations_today(
                &user, &expenses,
            ))?;
        }

        Command::Insights => {
            let user = store::require_profile()?;
            let expenses = store::read_expenses()?;
            print_json(&serde_json::json!({
                "insights": budgetly_core::spending_insights_today(&user, &expenses),
                "behavior": budgetly_core::analyze_spending_behavior(&expenses),
            }))?;
        }

        Command::Stats => {
            let expenses = store::read_expenses()?;
            print_json(&serde_json::json!({
                "statistics": budgetly_core::expense_statistics_today(&expenses),
                "patterns": budgetly_core::spending_patterns(&expenses),
                "weekend_vs_weekday": budgetly_core::weekend_weekday_analysis(&expenses),
            }))?;
        }

        Command::Advise => {
            let user = store::require_profile()?;
            let expenses = store::read_expenses()?;
            let plans = store::read_plans()?;
            let llm = config::load_config()?.llm_config()?;
            let advice =
                budgetly_advisor::generate_advice_today(&llm, &user, &expenses, &plans).await;
            print_json(&advice)?;
        }

        Command::Deals { item } => {
            let llm = config::load_config()?.llm_config()?;
            let deals = budgetly_advisor::find_deals_today(&llm, &item).await;
            print_json(&deals)?;
        }
    }

    Ok(())
}

fn init_profile(stipend: f64, savings_goal: f64, cycle_start: Option<NaiveDate>) -> Result<()> {
    if stipend <= 0.0 {
        bail!("stipend must be positive");
    }
    if savings_goal < 0.0 {
        bail!("savings goal cannot be negative");
    }

    let profile = UserProfile::new(
        1,
        stipend,
        savings_goal,
        cycle_start.unwrap_or_else(|| Local::now().date_naive()),
    );
    store::write_profile(&profile)?;
    println!(
        "Profile saved: stipend ${:.2}, savings goal ${:.2}, cycle starts {}",
        profile.stipend, profile.savings_goal, profile.budget_cycle_start
    );
    Ok(())
}

fn log_expense(
    amount: f64,
    category: String,
    description: Option<String>,
    date: Option<NaiveDate>,
) -> Result<()> {
    validate_expense(amount, &category, description.as_deref())?;

    let user = store::require_profile()?;
    let mut expenses = store::read_expenses()?;
    let id = store::next_id(&expenses, |e| e.id);
    expenses.push(ExpenseRecord::new(
        id,
        user.id,
        amount,
        category,
        description,
        date.unwrap_or_else(|| Local::now().date_naive()),
    ));
    store::write_expenses(&expenses)?;
    println!("Logged expense #{id} (${amount:.2})");
    Ok(())
}

fn import_expenses(csv: &PathBuf) -> Result<()> {
    let user = store::require_profile()?;
    let rows = import::parse_expense_csv(csv)
        .with_context(|| format!("importing {}", csv.display()))?;

    let mut expenses = store::read_expenses()?;
    let mut id = store::next_id(&expenses, |e| e.id);
    let count = rows.len();
    for row in rows {
        expenses.push(ExpenseRecord::new(
            id,
            user.id,
            row.amount,
            row.category,
            row.description,
            row.expense_date,
        ));
        id += 1;
    }
    store::write_expenses(&expenses)?;
    println!("Imported {count} expenses from {}", csv.display());
    Ok(())
}

fn add_plan(
    item_name: String,
    expected_price: f64,
    priority: String,
    desired_date: Option<NaiveDate>,
) -> Result<()> {
    if item_name.trim().is_empty() {
        bail!("item name cannot be empty");
    }
    if expected_price <= 0.0 {
        bail!("expected price must be positive");
    }

    let user = store::require_profile()?;
    let mut plans = store::read_plans()?;
    let id = store::next_id(&plans, |p| p.id);
    plans.push(PlannedPurchase {
        id,
        user_id: user.id,
        item_name,
        expected_price,
        priority,
        desired_date: desired_date.unwrap_or_else(|| Local::now().date_naive()),
    });
    store::write_plans(&plans)?;
    println!("Planned purchase #{id} saved");
    Ok(())
}

/// Input checks the core deliberately does not repeat.
fn validate_expense(amount: f64, category: &str, description: Option<&str>) -> Result<()> {
    if amount <= 0.0 {
        bail!("amount must be positive");
    }
    if category.is_empty() || category.len() > 50 {
        bail!("category must be 1-50 characters");
    }
    if let Some(d) = description {
        if d.len() > 500 {
            bail!("description is limited to 500 characters");
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_expense_bounds() {
        assert!(validate_expense(10.0, "food", None).is_ok());
        assert!(validate_expense(0.0, "food", None).is_err());
        assert!(validate_expense(-5.0, "food", None).is_err());
        assert!(validate_expense(10.0, "", None).is_err());
        assert!(validate_expense(10.0, &"x".repeat(51), None).is_err());
        assert!(validate_expense(10.0, "food", Some(&"d".repeat(501))).is_err());
        assert!(validate_expense(10.0, "food", Some(&"d".repeat(500))).is_ok());
    }
}
