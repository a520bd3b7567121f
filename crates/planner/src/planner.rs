use crate::calendar::BusinessCalendar;
use crate::chain::PhaseChain;
use crate::evaluator::{admissible_molds, FlaskOverlay};
use crate::ledger::ResourceLedger;
use crate::plan::{DryRunPlan, MoldingSlot, PlanResult, Schedule};
use castplan_orders::{Order, OrderStatus, Strategy};
use chrono::NaiveDate;
use log::{debug, info, warn};

/// Search knobs. The defaults mirror production use.
#[derive(Debug, Clone)]
pub struct PlannerSettings {
    pub max_search_days: u32,
    pub safety_days: i64,
    pub days_after_pattern: i64,
    pub days_after_sample: i64,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            max_search_days: 30,
            safety_days: 3,
            days_after_pattern: 3,
            days_after_sample: 3,
        }
    }
}

/// A dry-run gives up once molding has walked this far past its start
/// candidate; a streak of fully booked days must not spin forever.
const MOLDING_HORIZON_DAYS: i64 = 730;

/// Plans a single order. The order's own strategy is tried first; a JIT
/// order whose backward search exhausts gets exactly one forward retry as
/// ASAP from today, with no safety margin.
pub fn plan_order(
    order: &Order,
    calendar: &BusinessCalendar,
    ledger: &mut ResourceLedger,
    today: NaiveDate,
    settings: &PlannerSettings,
    safety_days: i64,
    start_date: Option<NaiveDate>,
) -> PlanResult {
    if let Some(result) = attempt(
        order,
        order.strategy,
        calendar,
        ledger,
        today,
        settings,
        safety_days,
        start_date,
    ) {
        return result;
    }

    if order.strategy == Strategy::Jit {
        warn!(
            "{}: JIT search exhausted, retrying as ASAP from {}",
            order.order_id, today
        );
        if let Some(result) = attempt(
            order,
            Strategy::Asap,
            calendar,
            ledger,
            today,
            settings,
            0,
            None,
        ) {
            return result;
        }
    }

    info!(
        "{}: unschedulable within {} start candidates",
        order.order_id, settings.max_search_days
    );
    PlanResult::unscheduled()
}

/// One bounded slide of the start date under a fixed strategy. Returns None
/// when every candidate within `max_search_days` is infeasible.
#[allow(clippy::too_many_arguments)]
fn attempt(
    order: &Order,
    strategy: Strategy,
    calendar: &BusinessCalendar,
    ledger: &mut ResourceLedger,
    today: NaiveDate,
    settings: &PlannerSettings,
    safety_days: i64,
    start_date: Option<NaiveDate>,
) -> Option<PlanResult> {
    let direction: i64 = match strategy {
        Strategy::Asap => 1,
        Strategy::Jit => -1,
    };
    let mut start = match start_date {
        Some(start) => start,
        None => match strategy {
            Strategy::Jit => {
                let estimated = order.estimated_duration(ledger.config.max_molds_per_day);
                calendar.add_business_days(order.due_date, -(estimated + safety_days))
            }
            Strategy::Asap => today,
        },
    };

    let mut attempts = 0;
    while attempts < settings.max_search_days {
        // molding cannot happen in the past, and only on business days
        if start < today || !calendar.is_business_day(start) {
            start = calendar.add_business_days(start, direction);
            attempts += 1;
            continue;
        }

        if let Some(dry_run) = dry_run(order, start, calendar, ledger) {
            let (schedule, end_date) = commit(order, dry_run, ledger);
            let status = if end_date <= order.due_date {
                OrderStatus::Ontime
            } else {
                OrderStatus::Delayed
            };
            info!(
                "{}: {} from {} to {} ({})",
                order.order_id, strategy, start, end_date, status
            );
            return Some(PlanResult {
                status,
                start_date: Some(start),
                end_date: Some(end_date),
                schedule,
            });
        }

        start = calendar.add_business_days(start, direction);
        attempts += 1;
    }
    None
}

/// Simulates scheduling the whole order from `start` without touching the
/// ledger. Flask spans of successive molding days overlap, so the walk
/// carries a tentative overlay the evaluator reads on top of the ledger.
fn dry_run(
    order: &Order,
    start: NaiveDate,
    calendar: &BusinessCalendar,
    ledger: &ResourceLedger,
) -> Option<DryRunPlan> {
    let horizon = calendar.add_calendar_days(start, MOLDING_HORIZON_DAYS);
    let tons_per_mold = order.tons_per_mold();

    let mut remaining = order.total_molds;
    let mut mold_day = start;
    let mut overlay = FlaskOverlay::new();
    let mut slots: Vec<MoldingSlot> = Vec::new();
    let mut schedule = Schedule::default();

    while remaining > 0 {
        if mold_day > horizon {
            debug!(
                "{}: no molding capacity within {} days of {}",
                order.order_id, MOLDING_HORIZON_DAYS, start
            );
            return None;
        }
        if !calendar.is_business_day(mold_day) {
            mold_day = calendar.add_business_days(mold_day, 1);
            continue;
        }

        let chain = PhaseChain::derive(calendar, mold_day, order.cooling_days);
        let quantity = admissible_molds(order, &chain, remaining, ledger, &overlay);
        debug!(
            "{}: day {} admits {} molds ({} remaining)",
            order.order_id, mold_day, quantity, remaining
        );

        if quantity == 0 {
            mold_day = calendar.add_business_days(mold_day, 1);
            continue;
        }

        overlay.add(mold_day, chain.flask_release(), quantity);
        slots.push(MoldingSlot {
            day: mold_day,
            quantity,
            flask_release: chain.flask_release(),
        });
        schedule.molding.push((mold_day, quantity));
        schedule.staging.push((chain.staging, quantity));
        schedule
            .pouring
            .push((chain.pouring, round_tons(quantity as f64 * tons_per_mold)));
        schedule.shakeout.push((chain.shakeout, quantity));

        remaining -= quantity;
        mold_day = calendar.add_business_days(mold_day, 1);
    }

    let last = slots.last()?;
    let terminal = PhaseChain::derive(calendar, last.day, order.cooling_days);
    let end_date = append_finishing(order, calendar, terminal.finishing_start(calendar), &mut schedule);

    Some(DryRunPlan {
        slots,
        schedule,
        end_date,
    })
}

/// Picks the widest finishing window that still meets the due date and
/// spreads the parts over it. Falls back to the minimum window when even
/// that lands late; the caller classifies the lateness.
fn append_finishing(
    order: &Order,
    calendar: &BusinessCalendar,
    finishing_start: NaiveDate,
    schedule: &mut Schedule,
) -> NaiveDate {
    let mut days = order.finishing_days_min;
    for candidate in (order.finishing_days_min..=order.finishing_days_nominal).rev() {
        let finishing_end = calendar.add_business_days(finishing_start, candidate as i64);
        if finishing_end <= order.due_date {
            days = candidate;
            break;
        }
    }

    let base = order.parts_total / days;
    let extra = order.parts_total % days;
    let mut current = finishing_start;
    let mut last = finishing_start;
    for i in 0..days {
        if !calendar.is_business_day(current) {
            current = calendar.add_business_days(current, 1);
        }
        let parts = base + if i < extra { 1 } else { 0 };
        schedule.finishing.push((current, parts));
        last = current;
        current = calendar.add_business_days(current, 1);
    }
    last
}

/// Reserves resources for the exact daily plan the dry-run produced.
fn commit(order: &Order, plan: DryRunPlan, ledger: &mut ResourceLedger) -> (Schedule, NaiveDate) {
    let planned: u32 = plan.slots.iter().map(|slot| slot.quantity).sum();
    debug_assert_eq!(planned, order.total_molds, "dry-run plan does not cover the order");

    for slot in &plan.slots {
        ledger.reserve_molds(slot.day, slot.quantity);
        ledger.reserve_same_part(slot.day, &order.part_number, slot.quantity);
        ledger.reserve_flask(slot.day, slot.flask_release, order.flask_size, slot.quantity);
        ledger.reserve_mix(slot.day, &order.product_family, slot.quantity);
    }
    for (day, quantity) in &plan.schedule.staging {
        ledger.reserve_staging(*day, *quantity);
    }
    for (day, tons) in &plan.schedule.pouring {
        ledger.reserve_pouring(*day, *tons);
    }

    (plan.schedule, plan.end_date)
}

fn round_tons(tons: f64) -> f64 {
    (tons * 1000.0).round() / 1000.0
}
