pub mod prompts;
pub mod render;
pub mod selection;

pub use prompts::{
    prompt_activity, prompt_item_selection, prompt_meal_count, prompt_treat_preference,
    prompt_weight_kg, prompt_yes_no,
};
pub use render::{
    display_calculation_summary, display_items, display_plan, display_rejected, display_selection,
};
pub use selection::{parse_selection, resolve_name, select_items};
