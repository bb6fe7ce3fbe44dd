//! Mid-cycle upgrade proration.
//!
//! Computes what a subscriber owes when switching plans before the
//! current billing cycle ends. Both plans are valued at a daily rate of
//! `price / 30` over the days left in the cycle; the subscriber pays the
//! difference, offset by their credit balance, and the unspent value of
//! the old plan is folded into the balance that carries forward.
//!
//! The whole computation is pure: four inputs, no clock reads, no I/O.

use crate::domain::foundation::Timestamp;

use super::plan::{Plan, BILLING_CYCLE_DAYS};
use super::Subscription;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Breakdown of a mid-cycle plan upgrade.
///
/// All monetary fields are in minor currency units. The 30-day daily
/// rate leaves fractional remainders, so amounts are not whole cents.
/// Every subtraction is clamped at zero; no field is ever negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpgradeQuote {
    /// Whole days left in the current cycle, rounded up, floored at 0.
    pub days_remaining: i64,

    /// Unspent value of the current plan over the remaining days.
    pub current_remaining_value: f64,

    /// Value of the new plan over the same remaining days.
    pub new_remaining_value: f64,

    /// Raw cost of the upgrade before credits.
    pub upgrade_amount: f64,

    /// What the subscriber pays now.
    pub final_amount: f64,

    /// Portion of the pre-existing balance consumed by the charge.
    pub credit_applied: f64,

    /// Credit balance after the upgrade.
    pub remaining_credits: f64,
}

impl UpgradeQuote {
    /// Computes the proration breakdown for moving from the current
    /// subscription to `new_plan` at `now`.
    ///
    /// A missing current price counts as 0 (no prior paid plan); a
    /// missing cycle end counts as `now`, which yields zero remaining
    /// days and therefore a zero quote.
    pub fn compute(current: &Subscription, new_plan: &Plan, credits: f64, now: Timestamp) -> Self {
        let days_remaining = match current.end_date {
            Some(end) => {
                let millis = end.duration_since(&now).num_milliseconds();
                (millis as f64 / MILLIS_PER_DAY).ceil().max(0.0) as i64
            }
            None => 0,
        };

        let current_price = current.price.unwrap_or(0);
        let current_remaining_value = daily_rate(current_price) * days_remaining as f64;
        let new_remaining_value = daily_rate(new_plan.price) * days_remaining as f64;

        let upgrade_amount = (new_remaining_value - current_remaining_value).max(0.0);

        // The charge is offset only by the balance that existed before
        // this upgrade; the value folded in from the old plan lands in
        // the stored balance instead of reducing today's payment.
        let total_credits = credits + current_remaining_value;
        let final_amount = (upgrade_amount - credits).max(0.0);
        let credit_applied = credits.min(upgrade_amount);
        let remaining_credits = (total_credits - upgrade_amount).max(0.0);

        Self {
            days_remaining,
            current_remaining_value,
            new_remaining_value,
            upgrade_amount,
            final_amount,
            credit_applied,
            remaining_credits,
        }
    }
}

fn daily_rate(price_minor: i64) -> f64 {
    price_minor as f64 / BILLING_CYCLE_DAYS as f64
}
