use crate::catalog::RejectedRow;
use crate::models::{NormalizedItem, QuantityPlan, SolveTier, TreatAdjustment};

const RULE_WIDTH: usize = 80;

fn heading(title: &str) {
    println!();
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("{}", title);
    println!("{}", "=".repeat(RULE_WIDTH));
}

fn item_line(number: usize, item: &NormalizedItem) {
    println!("{:>2}. {}", number, item.name());
    println!(
        "    Calories/oz: {:.2}, Protein: {:.2}%, Carbs: {:.2}%, Fat: {:.2}%",
        item.calories_per_unit(),
        item.protein_pct(),
        item.carbs_pct(),
        item.fat_pct()
    );
}

/// Numbered catalog listing. Numbers match the slice order, which the loader
/// keeps as foods first, then treats.
pub fn display_items(items: &[NormalizedItem]) {
    heading("AVAILABLE FOOD ITEMS AND TREATS");

    let food_count = items.iter().filter(|i| !i.is_treat()).count();
    let treat_count = items.len() - food_count;

    if food_count > 0 {
        println!();
        println!("FOOD ITEMS ({} available):", food_count);
        println!("{}", "-".repeat(50));
        for (i, item) in items.iter().enumerate().filter(|(_, item)| !item.is_treat()) {
            item_line(i + 1, item);
        }
    }

    if treat_count > 0 {
        println!();
        println!("TREATS ({} available):", treat_count);
        println!("{}", "-".repeat(50));
        for (i, item) in items.iter().enumerate().filter(|(_, item)| item.is_treat()) {
            item_line(i + 1, item);
        }
    }

    println!();
    println!("{}", "=".repeat(RULE_WIDTH));
}

/// Report rows the loader skipped.
pub fn display_rejected(rejected: &[RejectedRow]) {
    if rejected.is_empty() {
        return;
    }
    println!();
    println!("Skipped {} catalog row(s):", rejected.len());
    for row in rejected {
        let name = if row.name.is_empty() { "?" } else { row.name.as_str() };
        println!("  line {}: {} ({})", row.line, name, row.reason);
    }
}

/// Short summary of what was picked.
pub fn display_selection(selected: &[NormalizedItem]) {
    let (treats, foods): (Vec<&NormalizedItem>, Vec<&NormalizedItem>) =
        selected.iter().partition(|i| i.is_treat());

    println!();
    println!("SELECTED ITEMS:");
    println!("- Food items: {}", foods.len());
    println!("- Treats: {}", treats.len());
    if !foods.is_empty() {
        let names: Vec<&str> = foods.iter().map(|i| i.name()).collect();
        println!("  Food: {}", names.join(", "));
    }
    if !treats.is_empty() {
        let names: Vec<&str> = treats.iter().map(|i| i.name()).collect();
        println!("  Treats: {}", names.join(", "));
    }
}

/// Summary shown before asking to proceed.
pub fn display_calculation_summary(
    target_calories: f64,
    selected: &[NormalizedItem],
    require_treat: bool,
) {
    heading("CALCULATION SUMMARY");
    println!("Target calories: {:.2}", target_calories);
    println!("Selected items: {}", selected.len());
    println!(
        "Treat preference: {}",
        if require_treat {
            "Include at least one treat"
        } else {
            "Optimize for nutrition"
        }
    );
    println!();
    println!("Selected items:");
    for (i, item) in selected.iter().enumerate() {
        println!("{:>2}. {} ({})", i + 1, item.name(), item.kind());
    }
    println!();
    println!("{}", "=".repeat(RULE_WIDTH));
}

/// Display a plan: totals, achieved macros and per-item amounts.
pub fn display_plan(plan: &QuantityPlan) {
    heading("OPTIMAL MEAL PLAN");

    println!("Target calories: {:.2}", plan.target_calories);
    println!("Actual calories: {:.2}", plan.achieved_calories);
    println!("Total quantity: {:.2} oz", plan.total_quantity());
    println!("Solution quality: {}", plan.quality.label());
    println!(
        "Dry-matter macros: protein {:.2}%, fat {:.2}%, carbs {:.2}% (corrected); \
         treats {:.2}% of calories",
        plan.macros.protein_pct,
        plan.macros.fat_pct,
        plan.macros.corrected_carbs_pct,
        plan.macros.treat_calorie_share * 100.0
    );

    match &plan.treat_adjustment {
        Some(TreatAdjustment::Resolved(name)) => {
            println!("Treat '{}' was included by re-solving with it required.", name);
        }
        Some(TreatAdjustment::Substituted(name)) => {
            println!("Treat '{}' was substituted at the full treat allowance.", name);
        }
        None => {}
    }

    if plan.quality == SolveTier::BestEffort {
        println!();
        println!(
            "Note: no mix satisfies every constraint; this is the closest approximation found."
        );
    }

    println!();
    println!("RECOMMENDED AMOUNTS:");
    println!("{}", "-".repeat(50));

    let fed: Vec<_> = plan.fed_entries().collect();
    if fed.is_empty() {
        println!("(nothing to feed)");
    }

    let foods: Vec<_> = fed.iter().filter(|e| !e.kind.is_treat()).collect();
    let treats: Vec<_> = fed.iter().filter(|e| e.kind.is_treat()).collect();

    if !foods.is_empty() {
        println!("Food items:");
        for entry in foods {
            println!(
                "  - {}: {:.2} oz ({:.2} cal)",
                entry.name, entry.quantity, entry.calories
            );
        }
    }
    if !treats.is_empty() {
        println!("Treats:");
        for entry in treats {
            println!(
                "  - {}: {:.2} oz ({:.2} cal)",
                entry.name, entry.quantity, entry.calories
            );
        }
    }

    println!();
    println!("{}", "=".repeat(RULE_WIDTH));
}
