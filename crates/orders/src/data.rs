use castplan_core::{CastPlanError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Flask classes available on the molding line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FlaskSize {
    F105,
    F120,
    F143,
}

impl fmt::Display for FlaskSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlaskSize::F105 => write!(f, "F105"),
            FlaskSize::F120 => write!(f, "F120"),
            FlaskSize::F143 => write!(f, "F143"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Strategy {
    Asap,
    Jit,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Asap => write!(f, "ASAP"),
            Strategy::Jit => write!(f, "JIT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    New,
    Recurrent,
}

/// Planning outcome for an order. The variant order matters: a composite
/// order (sample + main) takes the worst status of its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Ontime,
    Delayed,
    Unscheduled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Ontime => write!(f, "ONTIME"),
            OrderStatus::Delayed => write!(f, "DELAYED"),
            OrderStatus::Unscheduled => write!(f, "UNSCHEDULED"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Order {
    pub order_id: String,
    pub part_number: String,
    pub product_family: String,
    pub alloy: String,
    pub flask_size: FlaskSize,
    pub parts_total: u32,
    pub parts_per_mold: u32,
    pub part_weight_ton: f64,
    pub due_date: NaiveDate,
    pub cooling_days: u32,
    pub finishing_days_nominal: u32,
    pub finishing_days_min: u32,
    pub strategy: Strategy,
    pub order_type: OrderType,
    pub pattern_days: u32,
    pub sample_molds: u32,
    pub produced_molds: u32,
    pub scraped_molds: u32,
    pub total_molds: u32,
    pub status: OrderStatus,
}

impl Order {
    pub fn is_new(&self) -> bool {
        self.order_type == OrderType::New
    }

    pub fn tons_per_mold(&self) -> f64 {
        self.parts_per_mold as f64 * self.part_weight_ton
    }

    pub fn recompute_total_molds(&mut self) {
        self.total_molds = self.parts_total.div_ceil(self.parts_per_mold);
    }

    /// Rough calendar-day duration used for JIT start estimation and slack
    /// sorting. Every 5 molding days pick up 2 extra days of weekend.
    pub fn estimated_duration(&self, max_molds_per_day: u32) -> i64 {
        let total_molds = self.parts_total.div_ceil(self.parts_per_mold);
        let remaining = total_molds.saturating_sub(self.produced_molds + self.scraped_molds);
        let mut molding_days = remaining.div_ceil(max_molds_per_day) as i64;
        molding_days += molding_days / 5 * 2;
        molding_days + self.cooling_days as i64 + self.finishing_days_nominal as i64
    }

    /// Builds the synthetic sample order that proves out a freshly built
    /// pattern before main production starts.
    pub fn sample_order(&self) -> Order {
        let mut sample = self.clone();
        sample.order_id = format!("{}-SAMPLE", self.order_id);
        sample.strategy = Strategy::Asap;
        sample.order_type = OrderType::Recurrent;
        sample.parts_total = self.sample_molds * self.parts_per_mold;
        sample.total_molds = self.sample_molds;
        sample.finishing_days_nominal = self.finishing_days_min;
        sample.finishing_days_min = self.finishing_days_min;
        sample.pattern_days = 0;
        sample.sample_molds = 0;
        sample.produced_molds = 0;
        sample.scraped_molds = 0;
        sample.status = OrderStatus::Unscheduled;
        sample
    }

    pub fn validate(&self) -> Result<()> {
        if self.order_id.trim().is_empty() {
            return Err(CastPlanError::Validation("order_id cannot be empty".to_string()));
        }
        if self.parts_total == 0 {
            return Err(CastPlanError::Validation(format!(
                "{}: quantity must be positive",
                self.order_id
            )));
        }
        if self.parts_per_mold == 0 {
            return Err(CastPlanError::Validation(format!(
                "{}: parts_per_mold must be positive",
                self.order_id
            )));
        }
        if self.part_weight_ton <= 0.0 {
            return Err(CastPlanError::Validation(format!(
                "{}: part_weight must be positive",
                self.order_id
            )));
        }
        if self.finishing_days_min == 0 {
            return Err(CastPlanError::Validation(format!(
                "{}: minimum finishing time must be at least 1 day",
                self.order_id
            )));
        }
        if self.finishing_days_nominal < self.finishing_days_min {
            return Err(CastPlanError::Validation(format!(
                "{}: nominal finishing time is below the minimum",
                self.order_id
            )));
        }
        if self.is_new() {
            if self.pattern_days == 0 {
                return Err(CastPlanError::Validation(format!(
                    "{}: new orders need a pattern_time",
                    self.order_id
                )));
            }
            if self.sample_molds == 0 {
                return Err(CastPlanError::Validation(format!(
                    "{}: new orders need molds_to_sample",
                    self.order_id
                )));
            }
            if self.sample_molds * self.parts_per_mold >= self.parts_total {
                return Err(CastPlanError::Validation(format!(
                    "{}: sampling would consume the whole order",
                    self.order_id
                )));
            }
        }
        Ok(())
    }
}
