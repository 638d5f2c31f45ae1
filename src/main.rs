use std::path::Path;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cat_feed_calc_rs::catalog::{load_catalog, save_config, LoadedCatalog};
use cat_feed_calc_rs::cli::{Cli, Command, PlanArgs, ProfileArgs, TuningArgs};
use cat_feed_calc_rs::error::{FeedError, Result};
use cat_feed_calc_rs::interface::{
    display_calculation_summary, display_items, display_plan, display_rejected,
    prompt_activity, prompt_item_selection, prompt_meal_count, prompt_treat_preference,
    prompt_weight_kg, prompt_yes_no, select_items,
};
use cat_feed_calc_rs::models::{ActivityLevel, CatProfile, NormalizedItem};
use cat_feed_calc_rs::planner::{calories_per_meal, daily_calories, plan_meal};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or_default() {
        Command::Plan(args) => cmd_plan(&args),
        Command::Calories(profile) => cmd_calories(&profile),
        Command::Items { items, strict } => cmd_items(&items, strict),
        Command::Config { tuning, output } => cmd_config(&tuning, output.as_deref()),
    }
}

/// Fill in profile values not given as flags, prompting when allowed.
fn resolve_profile(args: &ProfileArgs, interactive: bool) -> Result<CatProfile> {
    let missing = |flag: &str| {
        FeedError::InvalidInput(format!("{} is required when prompts are disabled", flag))
    };

    let weight_kg = match args.weight_kg {
        Some(w) => w,
        None if interactive => prompt_weight_kg()?,
        None => return Err(missing("--weight-kg")),
    };
    let activity_level = match args.activity {
        Some(level) => ActivityLevel::try_from(level)?,
        None if interactive => prompt_activity()?,
        None => return Err(missing("--activity")),
    };
    let neutered = match args.neutered {
        Some(n) => n,
        None if interactive => prompt_yes_no("Is the cat neutered?", true)?,
        None => return Err(missing("--neutered")),
    };
    let meal_count = match args.meals {
        Some(m) => m,
        None if interactive => prompt_meal_count()?,
        None => return Err(missing("--meals")),
    };

    CatProfile::new(weight_kg, activity_level, neutered, meal_count)
}

fn load_items(path: &Path, strict: bool) -> Result<LoadedCatalog> {
    let catalog = load_catalog(path)?;
    if strict {
        let items = catalog.into_strict()?;
        return Ok(LoadedCatalog {
            items,
            rejected: Vec::new(),
        });
    }
    Ok(catalog)
}

/// Plan one meal from the catalog.
fn cmd_plan(args: &PlanArgs) -> Result<()> {
    let config = args.tuning.resolve()?;
    let interactive = args.interactive();

    let catalog = load_items(&args.items, args.strict)?;
    if !args.json {
        println!("Loaded {} items from {}", catalog.items.len(), args.items.display());
        display_rejected(&catalog.rejected);
    }
    if catalog.items.is_empty() {
        return Err(FeedError::EmptyItemSet);
    }

    let profile = resolve_profile(&args.profile, interactive)?;
    let target = calories_per_meal(&profile)?;
    info!(target, "per-meal calorie target");

    let indices = match (&args.select, interactive) {
        (Some(selection), _) => select_items(selection, &catalog.items)?,
        (None, true) => prompt_item_selection(&catalog.items)?,
        (None, false) => (0..catalog.items.len()).collect(),
    };
    let selected: Vec<NormalizedItem> =
        indices.iter().map(|&i| catalog.items[i].clone()).collect();

    let require_treat = if args.require_treat || !interactive {
        args.require_treat
    } else {
        prompt_treat_preference()?
    };

    if interactive {
        display_calculation_summary(target, &selected, require_treat);
        println!("Targets: {}", config.display_targets());
        if !prompt_yes_no("Proceed with calculation?", true)? {
            println!("Calculation cancelled.");
            return Ok(());
        }
    }

    let plan = plan_meal(&selected, target, &config, require_treat)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        display_plan(&plan);
    }

    Ok(())
}

/// Print daily and per-meal calorie requirements.
fn cmd_calories(args: &ProfileArgs) -> Result<()> {
    let profile = resolve_profile(args, true)?;
    println!("Daily calories: {:.2}", daily_calories(&profile)?);
    println!(
        "Per meal ({} meals): {:.2}",
        profile.meal_count,
        calories_per_meal(&profile)?
    );
    Ok(())
}

/// List the normalized catalog and any skipped rows.
fn cmd_items(path: &Path, strict: bool) -> Result<()> {
    let catalog = load_items(path, strict)?;
    if catalog.items.is_empty() {
        println!("No items loaded from {}", path.display());
    } else {
        display_items(&catalog.items);
    }
    display_rejected(&catalog.rejected);
    Ok(())
}

/// Print the effective configuration, optionally saving it.
fn cmd_config(tuning: &TuningArgs, output: Option<&Path>) -> Result<()> {
    let config = tuning.resolve()?;
    println!("{}", serde_json::to_string_pretty(&config)?);

    if let Some(path) = output {
        save_config(path, &config)?;
        println!("Configuration written to {}", path.display());
    }
    Ok(())
}
