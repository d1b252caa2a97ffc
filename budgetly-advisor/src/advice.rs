//! AI-assisted spending advice: suggested expense cuts plus a verdict on
//! each planned purchase.
//!
//! The model call is the untrusted boundary here. Any failure — transport,
//! non-2xx, unparseable reply — is logged and replaced by a deterministic
//! heuristic, never surfaced to the caller.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

use budgetly_core::{ExpenseRecord, PlannedPurchase, UserProfile};

use crate::cache::DayCache;
use crate::extract::extract_json;
use crate::llm::{chat_complete, ChatTurn, LlmConfig};

const SYSTEM_PROMPT: &str = "You are Budgetly, a frugal financial advisor helping students reach \
their savings goal. You receive the user's monthly stipend, savings goal, recent discretionary \
expenses, and list of planned purchases. Return ONLY valid JSON with two top-level keys: cuts \
(list) and next_purchases (list).\n\n\
cuts: array of objects {expense_id:int, reason:str, amount_saved:float}. Include at most 5 items \
that should be reduced or cut.\n\
next_purchases: array of objects {id:int, verdict:str, suggestion:str, score:int}.\n\
verdict must be one of: 'buy_now', 'postpone', 'cancel'. score is 0-100 where 100 = essential.";

/// How many of the largest expenses get sent to the model.
const PROMPT_EXPENSE_LIMIT: usize = 10;

/// Categorical judgment on a planned purchase.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    BuyNow,
    Postpone,
    Cancel,
}

/// A suggested reduction of an existing expense.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CutSuggestion {
    pub expense_id: i64,
    pub reason: String,
    pub amount_saved: f64,
}

/// The advisor's judgment on one planned purchase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PurchaseVerdict {
    pub id: i64,
    pub verdict: Verdict,
    pub suggestion: String,
    pub score: i64,
}

/// Structured advice: at most five cuts plus one verdict per plan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Advice {
    #[serde(default)]
    pub cuts: Vec<CutSuggestion>,
    #[serde(default)]
    pub next_purchases: Vec<PurchaseVerdict>,
}

#[derive(Serialize)]
struct ExpenseBrief {
    id: i64,
    amount: f64,
    category: String,
    description: String,
    date: String,
}

#[derive(Serialize)]
struct PurchaseBrief {
    id: i64,
    item_name: String,
    expected_price: f64,
    priority: String,
    desired_date: String,
}

#[derive(Serialize)]
struct ProfileBrief {
    stipend: f64,
    savings_goal: f64,
}

static ADVICE_CACHE: OnceLock<DayCache<Advice>> = OnceLock::new();

fn advice_cache() -> &'static DayCache<Advice> {
    ADVICE_CACHE.get_or_init(DayCache::new)
}

/// Generate structured advice for `user`, consulting the model at most once
/// per (user, plan-list signature) per calendar day.
pub async fn generate_advice(
    config: &LlmConfig,
    user: &UserProfile,
    expenses: &[ExpenseRecord],
    plans: &[PlannedPurchase],
    today: NaiveDate,
) -> Advice {
    let briefs = serialise_purchases(plans);
    let cache_key = format!("{}:{}", user.id, purchases_signature(&briefs));

    if let Some(cached) = advice_cache().get(&cache_key, today) {
        return cached;
    }

    match advice_via_model(config, user, expenses, &briefs).await {
        Ok(advice) => {
            advice_cache().insert(cache_key, today, advice.clone());
            advice
        }
        Err(err) => {
            tracing::error!("advice model call failed, using heuristic fallback: {err:#}");
            fallback_advice(plans)
        }
    }
}

/// [`generate_advice`] as of the local date.
pub async fn generate_advice_today(
    config: &LlmConfig,
    user: &UserProfile,
    expenses: &[ExpenseRecord],
    plans: &[PlannedPurchase],
) -> Advice {
    generate_advice(config, user, expenses, plans, Local::now().date_naive()).await
}

async fn advice_via_model(
    config: &LlmConfig,
    user: &UserProfile,
    expenses: &[ExpenseRecord],
    purchases: &[PurchaseBrief],
) -> Result<Advice> {
    let payload = serde_json::json!({
        "user": ProfileBrief {
            stipend: user.stipend,
            savings_goal: user.savings_goal,
        },
        "recent_expenses": summarise_expenses(expenses),
        "planned_purchases": purchases,
    });

    let turns = [ChatTurn::user(payload.to_string())];
    let reply = chat_complete(config, SYSTEM_PROMPT, &turns).await?;

    let value = extract_json(&reply)?;
    let advice: Advice = serde_json::from_value(value).context("advice reply shape")?;
    Ok(advice)
}

/// Deterministic heuristic used whenever the model is unavailable:
/// high-priority plans get buy_now/80, everything else postpone/40, and no
/// cuts are suggested.
pub fn fallback_advice(plans: &[PlannedPurchase]) -> Advice {
    let next_purchases = plans
        .iter()
        .map(|p| {
            let verdict = if p.priority == "high" {
                Verdict::BuyNow
            } else {
                Verdict::Postpone
            };
            PurchaseVerdict {
                id: p.id,
                verdict,
                suggestion: "AI unavailable, simple heuristic applied.".to_string(),
                score: if verdict == Verdict::BuyNow { 80 } else { 40 },
            }
        })
        .collect();

    Advice {
        cuts: Vec::new(),
        next_purchases,
    }
}

/// The top expenses by amount, trimmed for the prompt.
fn summarise_expenses(expenses: &[ExpenseRecord]) -> Vec<ExpenseBrief> {
    let mut sorted: Vec<&ExpenseRecord> = expenses.iter().collect();
    sorted.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(std::cmp::Ordering::Equal));
    sorted
        .into_iter()
        .take(PROMPT_EXPENSE_LIMIT)
        .map(|e| ExpenseBrief {
            id: e.id,
            amount: e.amount,
            category: e.category.clone(),
            description: e.description.clone().unwrap_or_default(),
            date: e.expense_date.to_string(),
        })
        .collect()
}

fn serialise_purchases(plans: &[PlannedPurchase]) -> Vec<PurchaseBrief> {
    plans
        .iter()
        .map(|p| PurchaseBrief {
            id: p.id,
            item_name: p.item_name.clone(),
            expected_price: p.expected_price,
            priority: p.priority.clone(),
            desired_date: p.desired_date.to_string(),
        })
        .collect()
}

/// Content signature of the plan list, so edits invalidate the day's cache.
fn purchases_signature(purchases: &[PurchaseBrief]) -> String {
    let serialized = serde_json::to_string(purchases).unwrap_or_default();
    format!("{:x}", Sha256::digest(serialized.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn plan(id: i64, priority: &str) -> PlannedPurchase {
        PlannedPurchase {
            id,
            user_id: 1,
            item_name: format!("item-{id}"),
            expected_price: 100.0,
            priority: priority.to_string(),
            desired_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        }
    }

    #[test]
    fn test_fallback_high_priority_buys_now() {
        let advice = fallback_advice(&[plan(1, "high")]);
        assert!(advice.cuts.is_empty());
        assert_eq!(advice.next_purchases.len(), 1);
        assert_eq!(advice.next_purchases[0].verdict, Verdict::BuyNow);
        assert_eq!(advice.next_purchases[0].score, 80);
    }

    #[test]
    fn test_fallback_other_priorities_postpone() {
        for p in ["medium", "low", "urgent", "HIGH", ""] {
            let advice = fallback_advice(&[plan(1, p)]);
            assert_eq!(advice.next_purchases[0].verdict, Verdict::Postpone);
            assert_eq!(advice.next_purchases[0].score, 40);
        }
    }

    #[tokio::test]
    async fn test_unreachable_service_falls_back_to_heuristic() {
        let mut config = LlmConfig::gemini("gemini-pro", "test-key");
        // Nothing listens here; the connect error must trigger the fallback
        config.base_url = "http://127.0.0.1:9".to_string();
        let user = UserProfile::new(1, 1000.0, 100.0, NaiveDate::from_ymd_opt(2026, 8, 1).unwrap());
        let today = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();

        let advice =
            generate_advice(&config, &user, &[], &[plan(1, "high"), plan(2, "low")], today).await;
        assert!(advice.cuts.is_empty());
        assert_eq!(advice.next_purchases[0].verdict, Verdict::BuyNow);
        assert_eq!(advice.next_purchases[0].score, 80);
        assert_eq!(advice.next_purchases[1].verdict, Verdict::Postpone);
        assert_eq!(advice.next_purchases[1].score, 40);
    }

    #[test]
    fn test_advice_parses_with_missing_keys() {
        let advice: Advice = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(advice.cuts.is_empty());
        assert!(advice.next_purchases.is_empty());
    }

    #[test]
    fn test_advice_parses_full_reply() {
        let advice: Advice = serde_json::from_value(serde_json::json!({
            "cuts": [{"expense_id": 3, "reason": "eat in more", "amount_saved": 45.0}],
            "next_purchases": [
                {"id": 1, "verdict": "cancel", "suggestion": "not worth it", "score": 10}
            ]
        }))
        .unwrap();
        assert_eq!(advice.cuts[0].expense_id, 3);
        assert_eq!(advice.next_purchases[0].verdict, Verdict::Cancel);
    }

    #[test]
    fn test_signature_changes_with_plan_contents() {
        let a = purchases_signature(&serialise_purchases(&[plan(1, "high")]));
        let b = purchases_signature(&serialise_purchases(&[plan(1, "low")]));
        let c = purchases_signature(&serialise_purchases(&[plan(1, "high")]));
        assert_ne!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_prompt_expense_summary_takes_top_ten() {
        let expenses: Vec<ExpenseRecord> = (0..15)
            .map(|i| {
                ExpenseRecord::new(
                    i,
                    1,
                    i as f64,
                    "misc",
                    None,
                    NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
                )
            })
            .collect();
        let briefs = summarise_expenses(&expenses);
        assert_eq!(briefs.len(), 10);
        assert_eq!(briefs[0].amount, 14.0);
        assert_eq!(briefs[9].amount, 5.0);
    }
}
