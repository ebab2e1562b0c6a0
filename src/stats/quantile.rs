use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::models::TransactionRecord;

const FENCE_MULTIPLIER: Decimal = Decimal::from_parts(15, 0, 0, false, 1);
const FIRST_QUARTILE: Decimal = Decimal::from_parts(25, 0, 0, false, 2);
const THIRD_QUARTILE: Decimal = Decimal::from_parts(75, 0, 0, false, 2);

/// Ascending amounts of a record slice, ready for [`quantile`].
pub fn sorted_amounts(records: &[TransactionRecord]) -> Vec<Decimal> {
    let mut amounts: Vec<Decimal> = records.iter().map(|record| record.amount).collect();
    amounts.sort();
    amounts
}

/// Linear-interpolation quantile over ascending `sorted` values.
///
/// The estimate sits at position `q * (n - 1)` and interpolates between the two
/// neighbouring values. Returns `None` for an empty slice, a `q` outside `[0, 1]`,
/// or an arithmetic overflow.
pub fn quantile(sorted: &[Decimal], q: Decimal) -> Option<Decimal> {
    if q < Decimal::ZERO || q > Decimal::ONE {
        return None;
    }

    let last = sorted.len().checked_sub(1)?;
    let position = q.checked_mul(Decimal::from(last))?;
    let floor = position.floor();
    let index = floor.to_usize()?;
    let fraction = position - floor;
    let base = *sorted.get(index)?;

    match sorted.get(index + 1) {
        Some(next) if !fraction.is_zero() => next.checked_sub(base)
            .and_then(|span| span.checked_mul(fraction))
            .and_then(|offset| base.checked_add(offset)),
        _ => Some(base)
    }
}

/// The IQR fence `[Q1 - 1.5 * IQR, Q3 + 1.5 * IQR]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IqrBounds {
    pub lower: Decimal,
    pub upper: Decimal
}

impl IqrBounds {
    /// Computes the fence from ascending amounts; `None` when empty or on overflow.
    pub fn from_sorted(sorted: &[Decimal]) -> Option<Self> {
        let q1 = quantile(sorted, FIRST_QUARTILE)?;
        let q3 = quantile(sorted, THIRD_QUARTILE)?;
        let spread = q3.checked_sub(q1)?.checked_mul(FENCE_MULTIPLIER)?;

        Some(Self {
            lower: q1.checked_sub(spread)?,
            upper: q3.checked_add(spread)?
        })
    }

    pub fn contains(&self, amount: Decimal) -> bool {
        self.lower <= amount && amount <= self.upper
    }
}
