use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fmt::{Display, Formatter};

use chrono::{TimeDelta, Timelike};
use rust_decimal::Decimal;

use crate::models::{BatchCapabilities, TransactionRecord};
use crate::stats::{quantile, sorted_amounts};
use crate::types::TransactionStatus;

const HIGH_AMOUNT_QUANTILE: Decimal = Decimal::from_parts(99, 0, 0, false, 2);
const DECLINE_LIMIT: usize = 3;
const BLACKLISTED_CODES: [&str; 2] = ["FRAUD", "BLOCKED"];
const VELOCITY_WINDOW_SECONDS: i64 = 60;
const LAST_ODD_HOUR: u32 = 5;

/// Per-batch inputs shared by every rule.
pub struct RuleContext<'a> {
    pub records: &'a [TransactionRecord],
    /// Batch-local P99 of `amount`; `None` for an empty batch.
    pub high_amount_threshold: Option<Decimal>
}

impl<'a> RuleContext<'a> {
    pub fn new(records: &'a [TransactionRecord]) -> Self {
        Self {
            records,
            high_amount_threshold: quantile(&sorted_amounts(records), HIGH_AMOUNT_QUANTILE)
        }
    }
}

/// The fixed set of fraud heuristics, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuspicionRule {
    HighAmount,
    RepeatedDeclines,
    BlacklistedCode,
    Velocity,
    CrossBorderHighValue,
    OddHour
}

impl SuspicionRule {
    pub const ALL: [SuspicionRule; 6] = [
        SuspicionRule::HighAmount,
        SuspicionRule::RepeatedDeclines,
        SuspicionRule::BlacklistedCode,
        SuspicionRule::Velocity,
        SuspicionRule::CrossBorderHighValue,
        SuspicionRule::OddHour
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SuspicionRule::HighAmount => "high_amount",
            SuspicionRule::RepeatedDeclines => "repeated_declines",
            SuspicionRule::BlacklistedCode => "blacklisted_code",
            SuspicionRule::Velocity => "velocity",
            SuspicionRule::CrossBorderHighValue => "cross_border_high_value",
            SuspicionRule::OddHour => "odd_hour"
        }
    }

    /// Whether the batch carries the optional column this rule depends on.
    pub fn is_supported(&self, capabilities: &BatchCapabilities) -> bool {
        match self {
            SuspicionRule::BlacklistedCode => capabilities.security_code,
            SuspicionRule::CrossBorderHighValue => capabilities.merchant_country,
            _ => true
        }
    }

    /// Indices of the records this rule flags.
    pub fn evaluate(&self, context: &RuleContext<'_>) -> HashSet<usize> {
        match self {
            SuspicionRule::HighAmount => high_amount(context.records, context.high_amount_threshold),
            SuspicionRule::RepeatedDeclines => repeated_declines(context.records),
            SuspicionRule::BlacklistedCode => blacklisted_code(context.records),
            SuspicionRule::Velocity => velocity(context.records),
            SuspicionRule::CrossBorderHighValue => cross_border_high_value(context.records, context.high_amount_threshold),
            SuspicionRule::OddHour => odd_hour(context.records)
        }
    }
}

impl Display for SuspicionRule {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Amount strictly above the batch P99.
pub fn high_amount(records: &[TransactionRecord], threshold: Option<Decimal>) -> HashSet<usize> {
    let Some(threshold) = threshold else {
        return HashSet::new();
    };

    flag_where(records, |record| record.amount > threshold)
}

/// Every record of a user with at least three declines in the batch.
pub fn repeated_declines(records: &[TransactionRecord]) -> HashSet<usize> {
    let mut declines: HashMap<&str, usize> = HashMap::new();

    for record in records.iter().filter(|record| record.status == TransactionStatus::Declined) {
        *declines.entry(record.user_id.as_str()).or_default() += 1;
    }

    flag_where(records, |record| {
        declines.get(record.user_id.as_str()).is_some_and(|count| *count >= DECLINE_LIMIT)
    })
}

pub fn blacklisted_code(records: &[TransactionRecord]) -> HashSet<usize> {
    flag_where(records, |record| {
        record.security_code.as_deref().is_some_and(|code| BLACKLISTED_CODES.contains(&code))
    })
}

/// The later record of each same-user pair that is `0 < gap <= 60s` apart in time order.
pub fn velocity(records: &[TransactionRecord]) -> HashSet<usize> {
    let window = TimeDelta::seconds(VELOCITY_WINDOW_SECONDS);
    let mut by_user: HashMap<&str, Vec<usize>> = HashMap::new();

    for (index, record) in records.iter().enumerate() {
        by_user.entry(record.user_id.as_str()).or_default().push(index);
    }

    let mut flagged = HashSet::new();

    for indices in by_user.values_mut() {
        indices.sort_by_key(|index| records[*index].timestamp);

        for pair in indices.windows(2) {
            let gap = records[pair[1]].timestamp - records[pair[0]].timestamp;

            if gap > TimeDelta::zero() && gap <= window {
                flagged.insert(pair[1]);
            }
        }
    }

    flagged
}

/// Above the batch P99 and paid in a different country than the merchant's.
///
/// A record without a merchant country is never treated as cross-border.
pub fn cross_border_high_value(records: &[TransactionRecord], threshold: Option<Decimal>) -> HashSet<usize> {
    let Some(threshold) = threshold else {
        return HashSet::new();
    };

    flag_where(records, |record| {
        record.amount > threshold
            && record.merchant_country.as_deref().is_some_and(|merchant_country| merchant_country != record.country)
    })
}

/// Hour of day between 00 and 05 inclusive, as encoded in the timestamp.
pub fn odd_hour(records: &[TransactionRecord]) -> HashSet<usize> {
    flag_where(records, |record| record.timestamp.hour() <= LAST_ODD_HOUR)
}

fn flag_where<F>(records: &[TransactionRecord], predicate: F) -> HashSet<usize>
where
    F: Fn(&TransactionRecord) -> bool
{
    records.iter()
        .enumerate()
        .filter(|(_, record)| predicate(record))
        .map(|(index, _)| index)
        .collect()
}
