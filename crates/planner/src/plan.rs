use castplan_core::Result;
use castplan_orders::OrderStatus;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

pub type ScheduleEntry = (NaiveDate, u32);
pub type PouringEntry = (NaiveDate, f64);

/// Per-phase day/quantity sequences for one order. Pouring quantities are
/// tons; everything else is mold or part counts. Phases without entries
/// stay out of the serialized plan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Schedule {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pattern: Vec<ScheduleEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub molding: Vec<ScheduleEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub staging: Vec<ScheduleEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pouring: Vec<PouringEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shakeout: Vec<ScheduleEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub finishing: Vec<ScheduleEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sample_end: Vec<ScheduleEntry>,
}

impl Schedule {
    /// Appends every production phase of `other` after this schedule's own
    /// entries. The sample_end marker is emitted once by the driver and is
    /// not merged.
    pub fn merge(&mut self, other: &Schedule) {
        self.pattern.extend_from_slice(&other.pattern);
        self.molding.extend_from_slice(&other.molding);
        self.staging.extend_from_slice(&other.staging);
        self.pouring.extend_from_slice(&other.pouring);
        self.shakeout.extend_from_slice(&other.shakeout);
        self.finishing.extend_from_slice(&other.finishing);
    }

    pub fn molded_quantity(&self) -> u32 {
        self.molding.iter().map(|(_, quantity)| quantity).sum()
    }

    pub fn finished_quantity(&self) -> u32 {
        self.finishing.iter().map(|(_, quantity)| quantity).sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanResult {
    pub status: OrderStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub schedule: Schedule,
}

impl PlanResult {
    pub fn unscheduled() -> Self {
        Self {
            status: OrderStatus::Unscheduled,
            start_date: None,
            end_date: None,
            schedule: Schedule::default(),
        }
    }
}

/// The whole run's outcome, keyed by order id in planning order.
pub type FullPlan = IndexMap<String, PlanResult>;

pub fn render_json(full_plan: &FullPlan) -> Result<String> {
    Ok(serde_json::to_string_pretty(full_plan)?)
}

/// One committed molding decision from a dry-run: the quantity and the day
/// its flasks come back.
#[derive(Debug, Clone)]
pub struct MoldingSlot {
    pub day: NaiveDate,
    pub quantity: u32,
    pub flask_release: NaiveDate,
}

/// A feasible daily plan produced by a dry-run. The commit path replays it
/// verbatim; quantities are never re-derived.
#[derive(Debug, Clone)]
pub struct DryRunPlan {
    pub slots: Vec<MoldingSlot>,
    pub schedule: Schedule,
    pub end_date: NaiveDate,
}
