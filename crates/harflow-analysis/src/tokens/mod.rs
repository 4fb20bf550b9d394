//! Token flow tracking: detection rules, occurrence accumulation, and
//! definition-site resolution.

pub mod rules;
pub mod tracker;
pub mod types;

pub use rules::{TokenRule, TokenRuleSet};
pub use tracker::TokenFlowTracker;
pub use types::{Area, Side, Token, TokenKind, TokenOccurrence};
