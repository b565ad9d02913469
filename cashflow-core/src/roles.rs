//! Column role resolution: which header is the amount, which are debit and
//! credit.
//!
//! Matching is substring-based on lower-cased names. Amount wins over
//! debit/credit so a table is summarized exactly one way.

use serde::{Deserialize, Serialize};

/// Compound headers like "borç/alacak" carry both sides and are never a
/// debit or credit candidate.
pub const COMPOUND_SEPARATOR: char = '/';

/// Keyword sets used to recognise column roles (and header rows).
///
/// Tokens are matched as lower-case substrings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleKeywords {
    pub amount: Vec<String>,
    pub debit: Vec<String>,
    pub credit: Vec<String>,
}

impl Default for RoleKeywords {
    fn default() -> Self {
        Self {
            amount: vec!["tutar".to_string(), "amount".to_string()],
            debit: vec!["borç".to_string(), "debit".to_string()],
            credit: vec!["alacak".to_string(), "credit".to_string()],
        }
    }
}

impl RoleKeywords {
    pub fn is_amount(&self, name: &str) -> bool {
        contains_any(name, &self.amount)
    }

    pub fn is_debit(&self, name: &str) -> bool {
        contains_any(name, &self.debit)
    }

    pub fn is_credit(&self, name: &str) -> bool {
        contains_any(name, &self.credit)
    }
}

fn contains_any(name: &str, tokens: &[String]) -> bool {
    let name = name.to_lowercase();
    tokens.iter().any(|t| name.contains(&t.to_lowercase()))
}

/// How a table's movement is summarized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Strategy {
    Amount { column: String },
    DebitCredit { debit: String, credit: String },
    None,
}

impl Strategy {
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Amount { .. } => "amount",
            Strategy::DebitCredit { .. } => "debit_credit",
            Strategy::None => "none",
        }
    }
}

/// Resolved column indices into a normalized table's headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnRoleSet {
    pub amount: Option<usize>,
    pub debit: Option<usize>,
    pub credit: Option<usize>,
}

impl ColumnRoleSet {
    /// Pick the summarizing strategy. Amount takes precedence; debit/credit
    /// needs both columns.
    pub fn strategy(&self, headers: &[String]) -> Strategy {
        let name = |i: usize| headers.get(i).cloned().unwrap_or_default();

        match (self.amount, self.debit, self.credit) {
            (Some(a), _, _) => Strategy::Amount { column: name(a) },
            (None, Some(d), Some(c)) => Strategy::DebitCredit {
                debit: name(d),
                credit: name(c),
            },
            _ => Strategy::None,
        }
    }
}

pub fn resolve_roles(headers: &[String], keywords: &RoleKeywords) -> ColumnRoleSet {
    let amount = headers.iter().position(|h| keywords.is_amount(h));

    let debit = headers.iter().position(|h| {
        keywords.is_debit(h) && !keywords.is_credit(h) && !h.contains(COMPOUND_SEPARATOR)
    });

    let credit = headers.iter().position(|h| {
        keywords.is_credit(h) && !keywords.is_debit(h) && !h.contains(COMPOUND_SEPARATOR)
    });

    ColumnRoleSet {
        amount,
        debit,
        credit,
    }
}
