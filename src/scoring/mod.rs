mod rule_engine;
mod rules;

pub use rule_engine::{RuleEngine, RuleOutcome, ScoredBatch};
pub use rules::{
    blacklisted_code, cross_border_high_value, high_amount, odd_hour, repeated_declines, velocity, RuleContext,
    SuspicionRule
};
