//! JSON file store under ~/.budgetly.
//!
//! Stands in for the relational store of a deployed setup: one profile plus
//! flat lists of expenses and planned purchases, each a pretty-printed JSON
//! file. Individual commands rewrite whole files; there is no concurrent
//! writer to coordinate with.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use budgetly_core::{ExpenseRecord, PlannedPurchase, UserProfile};

pub fn budgetly_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".budgetly"))
}

pub fn ensure_budgetly_home() -> Result<PathBuf> {
    let dir = budgetly_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn profile_path() -> Result<PathBuf> {
    Ok(ensure_budgetly_home()?.join("profile.json"))
}

pub fn expenses_path() -> Result<PathBuf> {
    Ok(ensure_budgetly_home()?.join("expenses.json"))
}

pub fn plans_path() -> Result<PathBuf> {
    Ok(ensure_budgetly_home()?.join("plans.json"))
}

pub fn write_profile(profile: &UserProfile) -> Result<()> {
    let p = profile_path()?;
    let json = serde_json::to_string_pretty(profile)?;
    fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn read_profile() -> Result<Option<UserProfile>> {
    let p = profile_path()?;
    if !p.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(Some(serde_json::from_str(&s)?))
}

/// Load the profile or fail with a setup hint.
pub fn require_profile() -> Result<UserProfile> {
    read_profile()?.context("no profile found; run: budgetly init")
}

pub fn read_expenses() -> Result<Vec<ExpenseRecord>> {
    read_list(expenses_path()?)
}

pub fn write_expenses(expenses: &[ExpenseRecord]) -> Result<()> {
    write_list(expenses_path()?, expenses)
}

pub fn read_plans() -> Result<Vec<PlannedPurchase>> {
    read_list(plans_path()?)
}

pub fn write_plans(plans: &[PlannedPurchase]) -> Result<()> {
    write_list(plans_path()?, plans)
}

pub fn next_id<T>(items: &[T], id_of: impl Fn(&T) -> i64) -> i64 {
    items.iter().map(id_of).max().unwrap_or(0) + 1
}

fn read_list<T: serde::de::DeserializeOwned>(path: PathBuf) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let s = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    Ok(serde_json::from_str(&s)?)
}

fn write_list<T: serde::Serialize>(path: PathBuf, items: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(items)?;
    fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
