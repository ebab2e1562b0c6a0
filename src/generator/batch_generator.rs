use chrono::{NaiveDateTime, TimeDelta};
use rand::rngs::StdRng;
use rand::seq::{IteratorRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::models::RawBatch;
use crate::types::{format_timestamp, TransactionStatus};

const COLUMNS: [&str; 12] = [
    "transaction_id",
    "user_id",
    "merchant_id",
    "amount",
    "currency",
    "status",
    "timestamp",
    "payment_method",
    "payment_provider",
    "country",
    "device_type",
    "attempt_number"
];

const CURRENCY_COLUMN: usize = 4;

const COUNTRIES: [(&str, &str, f64); 6] = [
    ("MX", "MXN", 0.30),
    ("BR", "BRL", 0.25),
    ("CO", "COP", 0.15),
    ("AR", "ARS", 0.15),
    ("CL", "CLP", 0.10),
    ("PE", "PEN", 0.05)
];

const PAYMENT_METHODS: [(&str, f64, &[&str]); 4] = [
    ("credit_card", 0.40, &["Visa", "Mastercard", "American Express", "Diners Club"]),
    ("debit_card", 0.30, &["Visa Debit", "Mastercard Debit", "Maestro"]),
    ("bank_transfer", 0.20, &["SPEI", "TEF", "PIX", "PSE", "Transferencia"]),
    ("ewallet", 0.10, &["PayPal", "MercadoPago", "Rappi Pay", "Clip"])
];

const STATUSES: [(TransactionStatus, f64); 5] = [
    (TransactionStatus::Approved, 0.82),
    (TransactionStatus::Declined, 0.10),
    (TransactionStatus::Pending, 0.03),
    (TransactionStatus::Refunded, 0.03),
    (TransactionStatus::Cancelled, 0.02)
];

const DEVICES: [(&str, f64); 4] = [("mobile", 0.55), ("desktop", 0.30), ("tablet", 0.10), ("api", 0.05)];

const PROBABILITY_USD: f64 = 0.15;
const PROBABILITY_SPIKE: f64 = 0.002;
const NULL_CURRENCY_RATE: f64 = 0.005;
const MEAN_AMOUNT: f64 = 50.0;
const LOOKBACK_SECONDS: i64 = 90 * 24 * 3600;

/// Synthetic source of raw batches, shaped like the upstream payment feed.
///
/// Output depends only on the seed, the call sequence and the `now` passed in.
pub struct BatchGenerator {
    rng: StdRng,
    next_sequence: u64
}

impl BatchGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            next_sequence: 1
        }
    }

    /// Generates `size` rows with timestamps in the 90 days before `now`.
    pub fn generate(&mut self, size: usize, now: NaiveDateTime) -> RawBatch {
        let columns = COLUMNS.iter().map(|column| column.to_string()).collect();
        let rows = (0..size).map(|_| self.generate_row(now)).collect();
        let mut batch = RawBatch::new(columns, rows);

        self.blank_currencies(&mut batch, size);

        batch
    }

    fn generate_row(&mut self, now: NaiveDateTime) -> Vec<String> {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let user_id = self.rng.gen_range(1..=10_000u32);
        let merchant_id = self.rng.gen_range(1..=1_000u32);

        let (country, local_currency) = weighted(&mut self.rng, &COUNTRIES.map(|(country, currency, weight)| ((country, currency), weight)));
        let currency = if self.rng.gen_bool(PROBABILITY_USD) { "USD" } else { local_currency };

        let offset = self.rng.gen_range(0..LOOKBACK_SECONDS);
        let timestamp = now - TimeDelta::seconds(LOOKBACK_SECONDS) + TimeDelta::seconds(offset);

        let (payment_method, providers) = weighted(&mut self.rng, &PAYMENT_METHODS.map(|(method, weight, providers)| ((method, providers), weight)));
        let provider = providers.choose(&mut self.rng).copied().unwrap_or_default();

        let amount = self.generate_amount();
        let status = weighted(&mut self.rng, &STATUSES);
        let device = weighted(&mut self.rng, &DEVICES);
        let attempt_number = match status {
            TransactionStatus::Declined => self.rng.gen_range(1..=3u32),
            _ => 1
        };

        vec![
            format!("TXN{sequence:08}"),
            user_id.to_string(),
            merchant_id.to_string(),
            amount.to_string(),
            currency.to_string(),
            status.feed_code().to_string(),
            format_timestamp(&timestamp),
            payment_method.to_string(),
            provider.to_string(),
            country.to_string(),
            device.to_string(),
            attempt_number.to_string()
        ]
    }

    /// Exponential amounts around the mean, floored into `[1, 10]`, with rare large spikes.
    fn generate_amount(&mut self) -> Decimal {
        let uniform: f64 = self.rng.r#gen();
        let mut amount = -MEAN_AMOUNT * (1.0 - uniform).ln();

        if amount < 1.0 {
            amount = self.rng.gen_range(1.0..10.0);
        }

        if self.rng.gen_bool(PROBABILITY_SPIKE) {
            amount = self.rng.gen_range(15_000.0..50_000.0);
        }

        Decimal::from_f64(amount).unwrap_or(Decimal::ONE).round_dp(2)
    }

    fn blank_currencies(&mut self, batch: &mut RawBatch, size: usize) {
        let nulls = (size as f64 * NULL_CURRENCY_RATE) as usize;
        let chosen = (0..size).choose_multiple(&mut self.rng, nulls);

        for index in chosen {
            batch.set_cell(index, CURRENCY_COLUMN, String::new());
        }
    }
}

fn weighted<T: Copy, R: Rng>(rng: &mut R, choices: &[(T, f64)]) -> T {
    let roll: f64 = rng.r#gen();
    let mut cumulative = 0.0;

    for (value, weight) in choices {
        cumulative += weight;

        if roll < cumulative {
            return *value;
        }
    }

    choices[choices.len() - 1].0
}
