use tracing::debug;

use crate::models::{BatchCapabilities, CleanedBatch, TransactionRecord};
use crate::scoring::{RuleContext, SuspicionRule};

/// What a single rule did for a batch: flagged some records, or was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    Flagged {
        rule: SuspicionRule,
        count: usize
    },
    Skipped {
        rule: SuspicionRule
    }
}

/// A cleaned batch split into its two disjoint partitions, both in cleaned order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoredBatch {
    pub normal: Vec<TransactionRecord>,
    pub suspicious: Vec<TransactionRecord>,
    pub capabilities: BatchCapabilities,
    pub outcomes: Vec<RuleOutcome>
}

impl ScoredBatch {
    pub fn len(&self) -> usize {
        self.normal.len() + self.suspicious.len()
    }
}

/// Applies every rule to a cleaned batch and ORs the results.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<SuspicionRule>
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleEngine {
    pub fn new() -> Self {
        Self {
            rules: SuspicionRule::ALL.to_vec()
        }
    }

    /// An engine restricted to the given rules, evaluated in the given order.
    pub fn with_rules(rules: impl IntoIterator<Item = SuspicionRule>) -> Self {
        Self {
            rules: rules.into_iter().collect()
        }
    }

    /// Per-record verdicts (`true` = suspicious), aligned with `batch.records`.
    pub fn verdicts(&self, batch: &CleanedBatch) -> (Vec<bool>, Vec<RuleOutcome>) {
        let context = RuleContext::new(&batch.records);
        let mut verdicts = vec![false; batch.len()];
        let mut outcomes = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            if !rule.is_supported(&batch.capabilities) {
                debug!("Rule [{rule}] skipped: batch lacks its optional column");
                outcomes.push(RuleOutcome::Skipped { rule: *rule });
                continue;
            }

            let flagged = rule.evaluate(&context);

            for index in &flagged {
                verdicts[*index] = true;
            }

            debug!("Rule [{rule}] flagged {} records", flagged.len());
            outcomes.push(RuleOutcome::Flagged { rule: *rule, count: flagged.len() });
        }

        (verdicts, outcomes)
    }

    /// Splits the batch into normal and suspicious partitions.
    pub fn score(&self, batch: CleanedBatch) -> ScoredBatch {
        let (verdicts, outcomes) = self.verdicts(&batch);
        let (suspicious, normal): (Vec<_>, Vec<_>) = batch.records.into_iter()
            .zip(verdicts)
            .partition(|(_, is_suspicious)| *is_suspicious);

        ScoredBatch {
            normal: normal.into_iter().map(|(record, _)| record).collect(),
            suspicious: suspicious.into_iter().map(|(record, _)| record).collect(),
            capabilities: batch.capabilities,
            outcomes
        }
    }
}
