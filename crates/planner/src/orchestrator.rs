use crate::calendar::BusinessCalendar;
use crate::driver::plan_full_order;
use crate::ledger::ResourceLedger;
use crate::plan::FullPlan;
use crate::planner::PlannerSettings;
use castplan_orders::Order;
use chrono::NaiveDate;
use log::info;

/// Plans a whole order book against one ledger, least slack first. Orders
/// are reordered in place; planning is greedy and path-dependent, so the
/// sort order is part of the contract.
pub fn plan_orders(
    orders: &mut [Order],
    calendar: &BusinessCalendar,
    ledger: &mut ResourceLedger,
    today: NaiveDate,
    settings: &PlannerSettings,
) -> FullPlan {
    let max_molds_per_day = ledger.config.max_molds_per_day;
    orders.sort_by_key(|order| {
        (order.due_date - today).num_days() - order.estimated_duration(max_molds_per_day)
    });

    let mut full_plan = FullPlan::new();
    for order in orders.iter_mut() {
        info!(
            "planning {} (due {}, {})",
            order.order_id, order.due_date, order.strategy
        );
        let result = plan_full_order(order, calendar, ledger, today, settings);
        order.status = result.status;
        full_plan.insert(order.order_id.clone(), result);
    }
    full_plan
}
