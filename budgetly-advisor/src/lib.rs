//! budgetly-advisor: generative-model collaborators for Budgetly — spending
//! advice and deal lookup, with deterministic fallbacks and day-scoped
//! memoization.

pub mod advice;
pub mod cache;
pub mod deals;
pub mod extract;
pub mod llm;

pub use advice::{
    fallback_advice, generate_advice, generate_advice_today, Advice, CutSuggestion,
    PurchaseVerdict, Verdict,
};
pub use cache::DayCache;
pub use deals::{find_deals, find_deals_today, Deal, DealPrice, PRICE_VARIES};
pub use extract::extract_json;
pub use llm::{chat_complete, ChatTurn, LlmConfig, Provider};
