use dialoguer::{Confirm, Input, Select};

use crate::error::{FeedError, Result};
use crate::interface::render::{display_items, display_selection};
use crate::interface::selection::select_items;
use crate::models::{ActivityLevel, NormalizedItem};

/// Prompt for the cat's weight in kilograms.
pub fn prompt_weight_kg() -> Result<f64> {
    let input: String = Input::new()
        .with_prompt("Cat weight in kg")
        .interact_text()?;

    let weight: f64 = input
        .trim()
        .parse()
        .map_err(|_| FeedError::InvalidInput("Invalid number".to_string()))?;

    if weight <= 0.0 {
        return Err(FeedError::InvalidInput(
            "Weight must be greater than zero".to_string(),
        ));
    }

    Ok(weight)
}

/// Prompt for the activity level.
pub fn prompt_activity() -> Result<ActivityLevel> {
    let options = vec![
        "1 - Low (indoor, mostly resting)",
        "2 - Medium",
        "3 - High (very active)",
    ];

    let selection = Select::new()
        .with_prompt("Activity level")
        .items(&options)
        .default(0)
        .interact()?;

    ActivityLevel::try_from(selection as i64 + 1)
}

/// Prompt for the number of meals per day.
pub fn prompt_meal_count() -> Result<u32> {
    let input: String = Input::new()
        .with_prompt("Meals per day")
        .default("2".to_string())
        .interact_text()?;

    match input.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(FeedError::InvalidInput(
            "Meals per day must be a whole number of at least 1".to_string(),
        )),
        Ok(count) => Ok(count),
    }
}

/// Show the catalog and ask which items to plan with.
///
/// Invalid entries are reported and asked again. Returns 0-based indices.
pub fn prompt_item_selection(items: &[NormalizedItem]) -> Result<Vec<usize>> {
    display_items(items);

    println!();
    println!("SELECTION INSTRUCTIONS:");
    println!("- Enter the numbers of items you want to include (e.g., '1,3,5' or '1 3 5')");
    println!("- You can select any combination of food items and treats");
    println!("- Press Enter with no input to select all items");

    loop {
        let input: String = Input::new()
            .with_prompt("Enter item numbers")
            .allow_empty(true)
            .interact_text()?;

        match select_items(&input, items) {
            Ok(indices) if indices.is_empty() => {
                println!("Please enter at least one item number.");
            }
            Ok(indices) => {
                if input.trim().is_empty() {
                    println!("Selected all items.");
                } else {
                    let chosen: Vec<NormalizedItem> =
                        indices.iter().map(|&i| items[i].clone()).collect();
                    display_selection(&chosen);
                }
                return Ok(indices);
            }
            Err(e) => println!("{}", e),
        }
    }
}

/// Ask whether at least one treat must be fed.
pub fn prompt_treat_preference() -> Result<bool> {
    println!();
    println!("TREAT PREFERENCE:");
    println!("- Would you like to ensure at least one treat is included in the meal?");
    println!("- This may trade a little nutritional precision for the treat");

    prompt_yes_no("Include at least one treat?", false)
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
