use crate::models::analytics::SavingsSummary;
use crate::models::savings::SavingsBucket;
use crate::services::market_change::{finite_or_zero, normalize_chain, ratio};

/// Computes per-bucket totals, the base value, and the market-change chain.
///
/// Pure business logic — no I/O. Same bucket in, same summary out.
pub struct SavingsService;

impl SavingsService {
    pub fn new() -> Self {
        Self
    }

    /// Summarize one bucket.
    ///
    /// Steps:
    /// 1. Deposit, target and withdrawal totals
    /// 2. Base value = deposits - withdrawals - cash stash
    /// 3. Market changes chained in array order from the base value
    /// 4. Market change total, ratio against the base, and the final total
    pub fn summarize(&self, bucket: &SavingsBucket) -> SavingsSummary {
        // 1. Totals
        let regular_total = sum(bucket.regular_deposits.iter().map(|r| r.amount));
        let regular_target_total = sum(bucket.regular_deposits.iter().map(|r| r.target));
        let additional_total = sum(bucket.additional_deposits.iter().map(|r| r.amount));
        let withdrawal_total = sum(bucket.withdrawals.iter().map(|r| r.amount));
        let total_before_withdrawals = regular_total + additional_total;
        let cash_stash = finite_or_zero(bucket.cash_stash);

        // 2. Base value (may be negative when the bucket is in deficit)
        let base_value = total_before_withdrawals - withdrawal_total - cash_stash;

        // 3. Chain
        let normalized_market_changes = normalize_chain(base_value, &bucket.market_changes);

        // 4. Growth
        let market_change_total = sum(normalized_market_changes.iter().map(|r| r.amount));
        let market_change_ratio = ratio(market_change_total, base_value);
        let final_total = base_value + market_change_total;

        SavingsSummary {
            regular_total,
            regular_target_total,
            additional_total,
            withdrawal_total,
            total_before_withdrawals,
            cash_stash,
            base_value,
            normalized_market_changes,
            market_change_total,
            market_change_ratio,
            final_total,
        }
    }
}

impl Default for SavingsService {
    fn default() -> Self {
        Self::new()
    }
}

fn sum(values: impl Iterator<Item = f64>) -> f64 {
    values.map(finite_or_zero).sum()
}
