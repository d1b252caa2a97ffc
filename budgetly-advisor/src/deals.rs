//! Deal finder: asks the model where to buy an item cheaply, with a search
//! link as the offline fallback.

use anyhow::{bail, Result};
use chrono::{Local, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

use crate::cache::DayCache;
use crate::extract::extract_json;
use crate::llm::{chat_complete, ChatTurn, LlmConfig};

const SYSTEM_PROMPT: &str = "You are a helpful shopping assistant. Given a product name, return \
the three best places (online or local stores) to buy it cheaply but with good quality. Return \
ONLY valid JSON array of objects, each having merchant, item_name, price, url. For price: use a \
specific number (e.g., 250.0) if you can estimate it reasonably. If the price varies \
significantly or you cannot estimate, use the string 'Price varies - contact merchant' instead \
of a number. Be specific with merchant names and provide real URLs when possible.";

/// Sentinel used whenever a concrete price can't be pinned down.
pub const PRICE_VARIES: &str = "Price varies - contact merchant";

/// A single merchant offer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Deal {
    pub merchant: String,
    pub item_name: String,
    pub price: DealPrice,
    pub url: String,
}

/// Either a concrete price or a descriptive note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum DealPrice {
    Amount(f64),
    Note(String),
}

static DEAL_CACHE: OnceLock<DayCache<Vec<Deal>>> = OnceLock::new();

fn deal_cache() -> &'static DayCache<Vec<Deal>> {
    DEAL_CACHE.get_or_init(DayCache::new)
}

/// Find deals for `item_name`, consulting the model at most once per item
/// per calendar day. Never fails: any model problem degrades to a single
/// generic search link.
pub async fn find_deals(config: &LlmConfig, item_name: &str, today: NaiveDate) -> Vec<Deal> {
    let cache_key = item_name.to_lowercase();
    if let Some(cached) = deal_cache().get(&cache_key, today) {
        return cached;
    }

    match deals_via_model(config, item_name).await {
        Ok(deals) => {
            deal_cache().insert(cache_key, today, deals.clone());
            deals
        }
        Err(err) => {
            tracing::warn!("deal lookup failed for {item_name:?}: {err:#}");
            vec![search_fallback(item_name)]
        }
    }
}

/// [`find_deals`] as of the local date.
pub async fn find_deals_today(config: &LlmConfig, item_name: &str) -> Vec<Deal> {
    find_deals(config, item_name, Local::now().date_naive()).await
}

async fn deals_via_model(config: &LlmConfig, item_name: &str) -> Result<Vec<Deal>> {
    let turns = [ChatTurn::user(format!("Find the best deals for: {item_name}"))];
    let reply = chat_complete(config, SYSTEM_PROMPT, &turns).await?;

    let value = extract_json(&reply)?;
    let Some(items) = value.as_array() else {
        bail!("expected a JSON array of deals");
    };

    let price_re = Regex::new(r"\d+\.?\d*")?;
    let deals: Vec<Deal> = items
        .iter()
        .filter_map(|item| clean_deal(item, &price_re))
        .collect();

    if deals.is_empty() {
        bail!("no valid deals in reply");
    }
    Ok(deals)
}

/// Validate one reply entry, normalizing its price field. Entries missing
/// any of the four required keys are dropped.
fn clean_deal(item: &Value, price_re: &Regex) -> Option<Deal> {
    let obj = item.as_object()?;
    let merchant = obj.get("merchant")?.as_str()?.to_string();
    let item_name = obj.get("item_name")?.as_str()?.to_string();
    let url = obj.get("url")?.as_str()?.to_string();
    let raw_price = obj.get("price")?;

    let price = match raw_price {
        Value::Number(n) => DealPrice::Amount(n.as_f64()?),
        Value::String(s) => clean_price_text(s, price_re),
        _ => DealPrice::Note(PRICE_VARIES.to_string()),
    };

    Some(Deal {
        merchant,
        item_name,
        price,
        url,
    })
}

fn clean_price_text(raw: &str, price_re: &Regex) -> DealPrice {
    let lower = raw.to_lowercase();
    let vague = ["varies", "depending", "contact", "call"]
        .iter()
        .any(|w| lower.contains(w));
    if vague {
        return DealPrice::Note(PRICE_VARIES.to_string());
    }

    let cleaned = raw.replace(',', "");
    match price_re
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
    {
        Some(amount) => DealPrice::Amount(amount),
        None => DealPrice::Note(PRICE_VARIES.to_string()),
    }
}

fn search_fallback(item_name: &str) -> Deal {
    Deal {
        merchant: "Google Shopping".to_string(),
        item_name: item_name.to_string(),
        price: DealPrice::Note(PRICE_VARIES.to_string()),
        url: format!(
            "https://www.google.com/search?tbm=shop&q={}",
            item_name.replace(' ', "+")
        ),
    }
}
