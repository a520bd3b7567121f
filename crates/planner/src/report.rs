use crate::ledger::ResourceLedger;
use crate::plan::FullPlan;
use castplan_orders::{Order, OrderStatus};
use chrono::{Duration, NaiveDate};
use colored::Colorize;
use comfy_table::Table;

/// Post-run console summary: one row per order plus delayed/unscheduled
/// call-outs.
pub fn print_schedule_summary(full_plan: &FullPlan, orders: &[Order]) {
    println!("\n{}", format!("Planning complete for {} orders.", orders.len()).bold());

    let mut table = Table::new();
    table.set_header(vec!["Order", "Status", "Start", "End", "Due"]);
    for order in orders {
        let result = match full_plan.get(&order.order_id) {
            Some(result) => result,
            None => continue,
        };
        table.add_row(vec![
            order.order_id.clone(),
            result.status.to_string(),
            format_date(result.start_date),
            format_date(result.end_date),
            order.due_date.to_string(),
        ]);
    }
    println!("{}", table);

    let delayed: Vec<&Order> = orders
        .iter()
        .filter(|order| order.status == OrderStatus::Delayed)
        .collect();
    if delayed.is_empty() {
        println!("{} none", "Delayed:".yellow());
    } else {
        println!("{}", "Delayed:".yellow());
        for order in delayed {
            let end = full_plan
                .get(&order.order_id)
                .and_then(|result| result.end_date);
            println!(
                "   - {}: finishes {}, due {}",
                order.order_id,
                format_date(end),
                order.due_date
            );
        }
    }

    let unscheduled: Vec<&str> = orders
        .iter()
        .filter(|order| order.status == OrderStatus::Unscheduled)
        .map(|order| order.order_id.as_str())
        .collect();
    if unscheduled.is_empty() {
        println!("{} none", "Unscheduled:".red());
    } else {
        println!("{} {}", "Unscheduled:".red(), unscheduled.join(", "));
    }
}

/// Day-by-day used/limit table for every shared resource, followed by one
/// row per order and phase.
pub fn print_daily_resource_usage(
    full_plan: &FullPlan,
    orders: &[Order],
    ledger: &ResourceLedger,
    start: NaiveDate,
    end: NaiveDate,
) {
    let mut days = Vec::new();
    let mut day = start;
    while day <= end {
        days.push(day);
        day = day + Duration::days(1);
    }

    let mut table = Table::new();
    let mut header = vec!["Resource / Order".to_string()];
    header.extend(days.iter().map(|day| day.format("%m-%d").to_string()));
    table.set_header(header);

    let mut metal = vec!["Metal (t)".to_string()];
    for day in &days {
        metal.push(format!(
            "{:.1}/{:.1}",
            ledger.pouring_used(*day),
            ledger.config.max_pouring_tons_per_day
        ));
    }
    table.add_row(metal);

    let mut molds = vec!["Molds".to_string()];
    for day in &days {
        molds.push(format!("{}/{}", ledger.molds_used(*day), ledger.config.max_molds_per_day));
    }
    table.add_row(molds);

    let mut sizes: Vec<_> = ledger.config.flask_limits.iter().collect();
    sizes.sort_by_key(|(size, _)| **size);
    for (size, limit) in sizes {
        let mut row = vec![format!("Flasks {}", size)];
        for day in &days {
            row.push(format!("{}/{}", ledger.flask_used(*day, *size), limit));
        }
        table.add_row(row);
    }

    let mut patterns = vec!["Pattern".to_string()];
    for day in &days {
        patterns.push(format!(
            "{}/{}",
            ledger.patterns_used(*day),
            ledger.config.max_patterns_per_day
        ));
    }
    table.add_row(patterns);

    let mut staging = vec!["Staging".to_string()];
    for day in &days {
        staging.push(format!(
            "{}/{}",
            ledger.staging_used(*day),
            ledger.config.max_staging_molds
        ));
    }
    table.add_row(staging);

    for (order_id, result) in full_plan {
        let strategy = orders
            .iter()
            .find(|order| &order.order_id == order_id)
            .map(|order| order.strategy.to_string())
            .unwrap_or_default();
        let label = format!("{} ({})", order_id, strategy);

        add_phase_row(&mut table, &days, &label, "Pattern", &counts(&result.schedule.pattern));
        add_phase_row(&mut table, &days, &label, "Molding", &counts(&result.schedule.molding));
        add_phase_row(&mut table, &days, &label, "Pouring", &tons(&result.schedule.pouring));
        add_phase_row(&mut table, &days, &label, "Shakeout", &counts(&result.schedule.shakeout));
        add_phase_row(&mut table, &days, &label, "Sample end", &counts(&result.schedule.sample_end));
    }

    println!("\n{}", "DAILY RESOURCE USAGE".bold());
    println!("{}", table);
}

fn counts(entries: &[(NaiveDate, u32)]) -> Vec<(NaiveDate, String)> {
    entries.iter().map(|(day, quantity)| (*day, quantity.to_string())).collect()
}

fn tons(entries: &[(NaiveDate, f64)]) -> Vec<(NaiveDate, String)> {
    entries.iter().map(|(day, tons)| (*day, tons.to_string())).collect()
}

fn add_phase_row(
    table: &mut Table,
    days: &[NaiveDate],
    label: &str,
    phase: &str,
    entries: &[(NaiveDate, String)],
) {
    if entries.is_empty() {
        return;
    }
    let mut row = vec![format!("{} {}", label, phase)];
    for day in days {
        let cell = entries
            .iter()
            .filter(|(entry_day, _)| entry_day == day)
            .map(|(_, value)| value.clone())
            .collect::<Vec<_>>()
            .join("+");
        row.push(cell);
    }
    table.add_row(row);
}

fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.to_string(),
        None => "-".to_string(),
    }
}
