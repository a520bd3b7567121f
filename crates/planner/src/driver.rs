use crate::calendar::BusinessCalendar;
use crate::ledger::ResourceLedger;
use crate::plan::{PlanResult, Schedule};
use crate::planner::{plan_order, PlannerSettings};
use castplan_orders::{Order, OrderStatus};
use chrono::NaiveDate;
use log::info;

/// Plans one order end to end. Recurrent orders go straight to the search;
/// new orders first build their pattern, prove it with a sample run, and
/// only then schedule main production.
pub fn plan_full_order(
    order: &mut Order,
    calendar: &BusinessCalendar,
    ledger: &mut ResourceLedger,
    today: NaiveDate,
    settings: &PlannerSettings,
) -> PlanResult {
    if !order.is_new() {
        return plan_order(
            order,
            calendar,
            ledger,
            today,
            settings,
            settings.safety_days,
            None,
        );
    }

    let mut schedule = Schedule::default();

    // pattern manufacturing: one slot per business day with free capacity
    let mut remaining = order.pattern_days;
    let mut day = today;
    while remaining > 0 {
        if calendar.is_business_day(day) && ledger.can_schedule_pattern(day) {
            ledger.reserve_pattern(day);
            schedule.pattern.push((day, 1));
            remaining -= 1;
        }
        day = calendar.next_business_day(day);
    }
    let pattern_end = match schedule.pattern.last() {
        Some((day, _)) => *day,
        None => today,
    };

    // the sample proves out the fresh pattern before committing the rest
    let sample = order.sample_order();
    let sample_start = calendar.add_business_days(pattern_end, settings.days_after_pattern);
    let sample_result = plan_order(
        &sample,
        calendar,
        ledger,
        today,
        settings,
        0,
        Some(sample_start),
    );
    let sample_end = match sample_result.end_date {
        Some(date) if sample_result.status != OrderStatus::Unscheduled => date,
        _ => {
            info!("{}: sample run could not be scheduled", order.order_id);
            return PlanResult {
                status: OrderStatus::Unscheduled,
                start_date: None,
                end_date: None,
                schedule,
            };
        }
    };
    schedule.sample_end.push((sample_end, 1));

    // main production covers whatever the sample did not
    order.parts_total -= sample.parts_total;
    order.recompute_total_molds();
    let main_start = calendar.add_business_days(sample_end, settings.days_after_sample);
    let main_result = plan_order(
        order,
        calendar,
        ledger,
        today,
        settings,
        settings.safety_days,
        Some(main_start),
    );
    if main_result.status == OrderStatus::Unscheduled {
        info!("{}: main production could not be scheduled", order.order_id);
        return PlanResult {
            status: OrderStatus::Unscheduled,
            start_date: None,
            end_date: None,
            schedule,
        };
    }

    let status = sample_result.status.max(main_result.status);
    let start_date = schedule.pattern.first().map(|(day, _)| *day);
    let end_date = sample_result.end_date.max(main_result.end_date);
    schedule.merge(&sample_result.schedule);
    schedule.merge(&main_result.schedule);

    PlanResult {
        status,
        start_date,
        end_date,
        schedule,
    }
}
