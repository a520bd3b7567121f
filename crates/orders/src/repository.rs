use crate::data::{FlaskSize, Order, OrderStatus, OrderType, Strategy};
use castplan_core::{CastPlanError, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct FinishingTime {
    nominal: u32,
    minimum: u32,
}

/// One order record as written in the order book YAML.
#[derive(Debug, Deserialize)]
struct RawOrder {
    order_id: String,
    part_number: String,
    product_family: String,
    alloy: String,
    flask_size: FlaskSize,
    quantity: u32,
    parts_per_mold: u32,
    part_weight: f64,
    due_date: NaiveDate,
    cooling_days: u32,
    strategy: Strategy,
    order_type: OrderType,
    finishing_time: FinishingTime,
    #[serde(default)]
    produced_molds: u32,
    #[serde(default)]
    scraped_molds: u32,
    #[serde(default)]
    pattern_time: u32,
    #[serde(default)]
    molds_to_sample: u32,
}

impl RawOrder {
    fn into_order(self) -> Order {
        let mut order = Order {
            order_id: self.order_id,
            part_number: self.part_number,
            product_family: self.product_family,
            alloy: self.alloy,
            flask_size: self.flask_size,
            parts_total: self.quantity,
            parts_per_mold: self.parts_per_mold,
            part_weight_ton: self.part_weight,
            due_date: self.due_date,
            cooling_days: self.cooling_days,
            finishing_days_nominal: self.finishing_time.nominal,
            finishing_days_min: self.finishing_time.minimum,
            strategy: self.strategy,
            order_type: self.order_type,
            pattern_days: self.pattern_time,
            sample_molds: self.molds_to_sample,
            produced_molds: self.produced_molds,
            scraped_molds: self.scraped_molds,
            total_molds: 0,
            status: OrderStatus::Unscheduled,
        };
        order.recompute_total_molds();
        order
    }
}

pub fn load_orders<P: AsRef<Path>>(path: P) -> Result<Vec<Order>> {
    let text = std::fs::read_to_string(path)?;
    parse_orders(&text)
}

pub fn parse_orders(text: &str) -> Result<Vec<Order>> {
    let raw_orders: Vec<RawOrder> = serde_yaml::from_str(text)?;

    let mut seen = HashSet::new();
    let mut orders = Vec::with_capacity(raw_orders.len());
    for raw in raw_orders {
        let order = raw.into_order();
        if !seen.insert(order.order_id.clone()) {
            return Err(CastPlanError::Validation(format!(
                "duplicate order_id: {}",
                order.order_id
            )));
        }
        order.validate()?;
        orders.push(order);
    }
    Ok(orders)
}
