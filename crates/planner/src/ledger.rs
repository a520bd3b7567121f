use crate::config::ResourceConfig;
use castplan_orders::{FlaskSize, Order};
use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

/// Day-keyed usage counters for one planning run. Counters only ever grow:
/// commits are final and there is no release path. Callers gate every
/// reservation with the availability queries.
#[derive(Debug)]
pub struct ResourceLedger {
    pub config: ResourceConfig,
    pub daily_molds: HashMap<NaiveDate, u32>,
    pub daily_pouring_tons: HashMap<NaiveDate, f64>,
    pub pattern_slots: HashMap<NaiveDate, u32>,
    pub staging_area: HashMap<NaiveDate, u32>,
    pub flask_pool: HashMap<NaiveDate, HashMap<FlaskSize, u32>>,
    pub same_part_molds: HashMap<NaiveDate, HashMap<String, u32>>,
    pub family_molds: HashMap<NaiveDate, HashMap<String, u32>>,
}

impl ResourceLedger {
    pub fn new(config: ResourceConfig) -> Self {
        Self {
            config,
            daily_molds: HashMap::new(),
            daily_pouring_tons: HashMap::new(),
            pattern_slots: HashMap::new(),
            staging_area: HashMap::new(),
            flask_pool: HashMap::new(),
            same_part_molds: HashMap::new(),
            family_molds: HashMap::new(),
        }
    }

    pub fn reserve_molds(&mut self, day: NaiveDate, quantity: u32) {
        *self.daily_molds.entry(day).or_insert(0) += quantity;
    }

    pub fn reserve_same_part(&mut self, day: NaiveDate, part_number: &str, quantity: u32) {
        *self
            .same_part_molds
            .entry(day)
            .or_default()
            .entry(part_number.to_string())
            .or_insert(0) += quantity;
    }

    pub fn reserve_pouring(&mut self, day: NaiveDate, tons: f64) {
        *self.daily_pouring_tons.entry(day).or_insert(0.0) += tons;
    }

    pub fn reserve_staging(&mut self, day: NaiveDate, quantity: u32) {
        *self.staging_area.entry(day).or_insert(0) += quantity;
    }

    pub fn reserve_pattern(&mut self, day: NaiveDate) {
        *self.pattern_slots.entry(day).or_insert(0) += 1;
    }

    pub fn reserve_mix(&mut self, day: NaiveDate, family: &str, quantity: u32) {
        *self
            .family_molds
            .entry(day)
            .or_default()
            .entry(family.to_string())
            .or_insert(0) += quantity;
    }

    /// Holds `quantity` flasks of `size` on every calendar day in
    /// `[start, end]` inclusive.
    pub fn reserve_flask(&mut self, start: NaiveDate, end: NaiveDate, size: FlaskSize, quantity: u32) {
        let mut day = start;
        while day <= end {
            *self.flask_pool.entry(day).or_default().entry(size).or_insert(0) += quantity;
            day = day + Duration::days(1);
        }
    }

    /// Molds still admissible on `day`, bounded by both the line capacity
    /// and the per-part cap.
    pub fn available_molds(&self, order: &Order, day: NaiveDate) -> u32 {
        let day_headroom = self.config.max_molds_per_day.saturating_sub(self.molds_used(day));
        let part_headroom = self
            .config
            .max_same_part_molds_per_day
            .saturating_sub(self.same_part_used(day, &order.part_number));
        day_headroom.min(part_headroom)
    }

    /// Molds whose metal still fits the pouring line on `day`.
    pub fn available_pouring(&self, order: &Order, day: NaiveDate) -> u32 {
        let headroom = self.config.max_pouring_tons_per_day - self.pouring_used(day);
        if headroom <= 0.0 {
            return 0;
        }
        (headroom / order.tons_per_mold()).floor() as u32
    }

    /// Molds the family mix cap still admits on `day`. Uncapped families
    /// never constrain.
    pub fn available_mix(&self, order: &Order, day: NaiveDate) -> u32 {
        let fraction = match self.config.product_family_max_mix.get(&order.product_family) {
            Some(fraction) => *fraction,
            None => return u32::MAX,
        };
        let cap = (fraction * self.config.max_molds_per_day as f64).floor() as u32;
        cap.saturating_sub(self.family_used(day, &order.product_family))
    }

    pub fn available_staging(&self, day: NaiveDate) -> u32 {
        self.config.max_staging_molds.saturating_sub(self.staging_used(day))
    }

    pub fn can_schedule_pattern(&self, day: NaiveDate) -> bool {
        self.patterns_used(day) < self.config.max_patterns_per_day
    }

    pub fn molds_used(&self, day: NaiveDate) -> u32 {
        self.daily_molds.get(&day).copied().unwrap_or(0)
    }

    pub fn pouring_used(&self, day: NaiveDate) -> f64 {
        self.daily_pouring_tons.get(&day).copied().unwrap_or(0.0)
    }

    pub fn patterns_used(&self, day: NaiveDate) -> u32 {
        self.pattern_slots.get(&day).copied().unwrap_or(0)
    }

    pub fn staging_used(&self, day: NaiveDate) -> u32 {
        self.staging_area.get(&day).copied().unwrap_or(0)
    }

    pub fn flask_used(&self, day: NaiveDate, size: FlaskSize) -> u32 {
        self.flask_pool
            .get(&day)
            .and_then(|sizes| sizes.get(&size))
            .copied()
            .unwrap_or(0)
    }

    pub fn same_part_used(&self, day: NaiveDate, part_number: &str) -> u32 {
        self.same_part_molds
            .get(&day)
            .and_then(|parts| parts.get(part_number))
            .copied()
            .unwrap_or(0)
    }

    pub fn family_used(&self, day: NaiveDate, family: &str) -> u32 {
        self.family_molds
            .get(&day)
            .and_then(|families| families.get(family))
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use castplan_orders::{OrderStatus, OrderType, Strategy};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn config() -> ResourceConfig {
        ResourceConfig {
            max_molds_per_day: 10,
            max_same_part_molds_per_day: 4,
            max_pouring_tons_per_day: 10.0,
            max_patterns_per_day: 1,
            max_staging_molds: 8,
            flask_limits: HashMap::from([(FlaskSize::F105, 6)]),
            product_family_max_mix: HashMap::from([("pumps".to_string(), 0.5)]),
        }
    }

    fn order(part_number: &str, family: &str) -> Order {
        Order {
            order_id: "ORD-1".to_string(),
            part_number: part_number.to_string(),
            product_family: family.to_string(),
            alloy: "CM2".to_string(),
            flask_size: FlaskSize::F105,
            parts_total: 10,
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
            total_molds: 10,
            status: OrderStatus::Unscheduled,
        }
    }

    #[test]
    fn test_available_molds_clamped_by_same_part_cap() {
        let mut ledger = ResourceLedger::new(config());
        ledger.reserve_molds(date(3), 3);
        ledger.reserve_same_part(date(3), "P-100", 2);

        let same_part = order("P-100", "pumps");
        let other_part = order("P-200", "pumps");
        assert_eq!(ledger.available_molds(&same_part, date(3)), 2);
        assert_eq!(ledger.available_molds(&other_part, date(3)), 4);
    }

    #[test]
    fn test_available_pouring_floors_to_whole_molds() {
        let mut ledger = ResourceLedger::new(config());
        ledger.reserve_pouring(date(4), 7.5);

        let one_ton = order("P-100", "pumps");
        assert_eq!(ledger.available_pouring(&one_ton, date(4)), 2);

        ledger.reserve_pouring(date(4), 2.5);
        assert_eq!(ledger.available_pouring(&one_ton, date(4)), 0);
    }

    #[test]
    fn test_available_mix_caps_known_families_only() {
        let mut ledger = ResourceLedger::new(config());
        ledger.reserve_mix(date(5), "pumps", 2);

        let capped = order("P-100", "pumps");
        let uncapped = order("P-100", "turbines");
        // 50% of 10 molds/day leaves 5, minus 2 already reserved
        assert_eq!(ledger.available_mix(&capped, date(5)), 3);
        assert_eq!(ledger.available_mix(&uncapped, date(5)), u32::MAX);
    }

    #[test]
    fn test_reserve_flask_spans_calendar_days_inclusive() {
        let mut ledger = ResourceLedger::new(config());
        ledger.reserve_flask(date(7), date(10), FlaskSize::F105, 2);

        for d in [7, 8, 9, 10] {
            assert_eq!(ledger.flask_used(date(d), FlaskSize::F105), 2);
        }
        assert_eq!(ledger.flask_used(date(6), FlaskSize::F105), 0);
        assert_eq!(ledger.flask_used(date(11), FlaskSize::F105), 0);
    }

    #[test]
    fn test_staging_and_pattern_headroom() {
        let mut ledger = ResourceLedger::new(config());
        ledger.reserve_staging(date(6), 8);
        assert_eq!(ledger.available_staging(date(6)), 0);
        assert_eq!(ledger.available_staging(date(7)), 8);

        assert!(ledger.can_schedule_pattern(date(6)));
        ledger.reserve_pattern(date(6));
        assert!(!ledger.can_schedule_pattern(date(6)));
    }
}
