use crate::models::{DailyReport, PurchaseLine};

/// One-line progress summary printed after each simulated day.
pub fn display_day_summary(report: &DailyReport) {
    println!(
        "[day {:>3}] {} | pop {} (+{}) | {} / {} / {} | occ {:>6.2}% | cart {} item(s)",
        report.day,
        report.scenario,
        report.population_total,
        report.population_plus,
        report.menu.morning.dish_name,
        report.menu.midday.dish_name,
        report.menu.evening.dish_name,
        report.occupancy_pct,
        report.cart.len()
    );
}

fn display_purchase_lines(lines: &[PurchaseLine], title: &str) {
    if lines.is_empty() {
        return;
    }
    println!("  {}:", title);
    for line in lines {
        let extra = match (line.eta_day, line.shelf_life_days) {
            (Some(eta), _) => format!(" (eta day {})", eta),
            (None, Some(life)) => format!(" (shelf life {} d)", life),
            (None, None) => String::new(),
        };
        println!(
            "    {:<20} {:>10.4} {}{}",
            line.name, line.quantity, line.unit, extra
        );
    }
}

/// Full rendering of one day's report.
pub fn display_report(report: &DailyReport) {
    println!();
    println!("=== Day {} ({}) ===", report.day, report.scenario);
    println!(
        "Population: {} total, {} plus class",
        report.population_total, report.population_plus
    );
    println!(
        "Menu: {} / {} / {}",
        report.menu.morning.dish_name, report.menu.midday.dish_name, report.menu.evening.dish_name
    );

    display_purchase_lines(&report.scheduled_purchases, "Scheduled purchases");
    display_purchase_lines(&report.emergency_purchases, "Emergency purchases");

    if !report.cart.is_empty() {
        println!("  Pending cart:");
        for entry in &report.cart {
            println!(
                "    {:<20} {:>10.4} {}",
                entry.name, entry.quantity, entry.unit
            );
        }
    }

    if !report.waste.is_empty() {
        println!("  Waste:");
        for entry in &report.waste {
            println!(
                "    {:<20} {:>10.4} {}",
                entry.name, entry.quantity, entry.unit
            );
        }
    }

    println!(
        "Warehouse: {:.2}% occupied ({:.4} of {:.4} m3, {:.4} m3 free)",
        report.occupancy_pct, report.occupied_m3, report.capacity_m3, report.free_m3
    );
}

/// Render a queried report range.
pub fn display_reports(reports: &[&DailyReport]) {
    if reports.is_empty() {
        println!("No reports found.");
        return;
    }
    for report in reports {
        display_report(report);
    }
    println!();
    println!("{} report(s).", reports.len());
}
