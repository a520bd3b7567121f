use crate::chain::PhaseChain;
use crate::ledger::ResourceLedger;
use castplan_orders::Order;
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

/// Tentative flask usage scoped to one dry-run. Successive molding days of
/// the same order overlap in flask occupation, so the evaluator has to see
/// the dry-run's own in-progress reservations on top of the ledger. An
/// order uses a single flask size, so a date-keyed count is enough.
#[derive(Debug, Default)]
pub struct FlaskOverlay {
    days: HashMap<NaiveDate, u32>,
}

impl FlaskOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn used(&self, day: NaiveDate) -> u32 {
        self.days.get(&day).copied().unwrap_or(0)
    }

    pub fn add(&mut self, start: NaiveDate, end: NaiveDate, quantity: u32) {
        let mut day = start;
        while day <= end {
            *self.days.entry(day).or_insert(0) += quantity;
            day = day + Duration::days(1);
        }
    }
}

/// Maximum molds admissible on the chain's molding day under every
/// constraint at once. Returns 0 when any resource is exhausted.
pub fn admissible_molds(
    order: &Order,
    chain: &PhaseChain,
    remaining: u32,
    ledger: &ResourceLedger,
    overlay: &FlaskOverlay,
) -> u32 {
    let molds = ledger.available_molds(order, chain.molding);
    let pouring = ledger.available_pouring(order, chain.pouring);
    let staging = ledger.available_staging(chain.staging);
    let mix = ledger.available_mix(order, chain.molding);
    let flasks = available_flasks(order, chain, ledger, overlay);
    molds
        .min(pouring)
        .min(staging)
        .min(mix)
        .min(flasks)
        .min(remaining)
}

/// Minimum flask headroom over the occupation span, reading ledger and
/// overlay summed.
fn available_flasks(
    order: &Order,
    chain: &PhaseChain,
    ledger: &ResourceLedger,
    overlay: &FlaskOverlay,
) -> u32 {
    let limit = ledger.config.flask_limit(order.flask_size);
    let mut available = limit;
    let mut day = chain.molding;
    while day <= chain.flask_release() {
        let used = ledger.flask_used(day, order.flask_size) + overlay.used(day);
        available = available.min(limit.saturating_sub(used));
        day = day + Duration::days(1);
    }
    available
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::BusinessCalendar;
    use crate::config::ResourceConfig;
    use castplan_orders::{FlaskSize, OrderStatus, OrderType, Strategy};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn config() -> ResourceConfig {
        ResourceConfig {
            max_molds_per_day: 10,
            max_same_part_molds_per_day: 10,
            max_pouring_tons_per_day: 100.0,
            max_patterns_per_day: 1,
            max_staging_molds: 50,
            flask_limits: HashMap::from([(FlaskSize::F105, 1)]),
            product_family_max_mix: HashMap::new(),
        }
    }

    fn order() -> Order {
        Order {
            order_id: "ORD-1".to_string(),
            part_number: "P-100".to_string(),
            product_family: "pumps".to_string(),
            alloy: "CM2".to_string(),
            flask_size: FlaskSize::F105,
            parts_total: 3,
            parts_per_mold: 1,
            part_weight_ton: 1.0,
            due_date: date(31),
            cooling_days: 0,
            finishing_days_nominal: 1,
            finishing_days_min: 1,
            strategy: Strategy::Asap,
            order_type: OrderType::Recurrent,
            pattern_days: 0,
            sample_molds: 0,
            produced_molds: 0,
            scraped_molds: 0,
            total_molds: 3,
            status: OrderStatus::Unscheduled,
        }
    }

    #[test]
    fn test_overlay_blocks_the_next_overlapping_day() {
        let calendar = BusinessCalendar::default();
        let ledger = ResourceLedger::new(config());
        let order = order();
        let mut overlay = FlaskOverlay::new();

        // Monday: the single flask is free, span is [Mon, Tue]
        let monday = PhaseChain::derive(&calendar, date(3), 0);
        assert_eq!(admissible_molds(&order, &monday, 3, &ledger, &overlay), 1);
        overlay.add(monday.molding, monday.flask_release(), 1);

        // Tuesday still sees Monday's tentative hold
        let tuesday = PhaseChain::derive(&calendar, date(4), 0);
        assert_eq!(admissible_molds(&order, &tuesday, 2, &ledger, &overlay), 0);

        // Wednesday is clear again
        let wednesday = PhaseChain::derive(&calendar, date(5), 0);
        assert_eq!(admissible_molds(&order, &wednesday, 2, &ledger, &overlay), 1);
    }

    #[test]
    fn test_tightest_constraint_wins() {
        let calendar = BusinessCalendar::default();
        let mut tight = config();
        tight.flask_limits.insert(FlaskSize::F105, 20);
        tight.max_pouring_tons_per_day = 4.0;
        let mut ledger = ResourceLedger::new(tight);
        let order = order();
        let overlay = FlaskOverlay::new();

        let chain = PhaseChain::derive(&calendar, date(3), 0);
        // pouring admits 4 one-ton molds, remaining admits fewer
        assert_eq!(admissible_molds(&order, &chain, 10, &ledger, &overlay), 4);
        assert_eq!(admissible_molds(&order, &chain, 2, &ledger, &overlay), 2);

        ledger.reserve_staging(chain.staging, 47);
        assert_eq!(admissible_molds(&order, &chain, 10, &ledger, &overlay), 3);
    }
}
