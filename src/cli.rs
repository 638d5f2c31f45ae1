use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

use crate::catalog::load_config;
use crate::error::Result;
use crate::planner::{MacroBasis, PlannerConfig};

/// cat_feed_calc: per-meal food and treat quantities for a cat.
#[derive(Parser, Debug)]
#[command(name = "cat_feed_calc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v info, -vv debug). RUST_LOG takes over when unset.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute quantities for one meal from a catalog of foods and treats.
    Plan(PlanArgs),

    /// Print the calorie requirement for a cat.
    Calories(ProfileArgs),

    /// List the normalized catalog.
    Items {
        /// Path to the item catalog CSV.
        #[arg(short, long, default_value = "items.csv")]
        items: PathBuf,

        /// Fail if any row cannot be loaded.
        #[arg(long)]
        strict: bool,
    },

    /// Print the effective planner configuration as JSON.
    Config {
        #[command(flatten)]
        tuning: TuningArgs,

        /// Also write the configuration to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Plan(PlanArgs::default())
    }
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Path to the item catalog CSV.
    #[arg(short, long, default_value = "items.csv")]
    pub items: PathBuf,

    #[command(flatten)]
    pub profile: ProfileArgs,

    #[command(flatten)]
    pub tuning: TuningArgs,

    /// Items to plan with, by number or name (e.g. "1,3" or "salmon pate, 2").
    #[arg(short, long)]
    pub select: Option<String>,

    /// Feed at least one treat.
    #[arg(long)]
    pub require_treat: bool,

    /// Skip prompts and confirmation; missing selection means all items.
    #[arg(short, long)]
    pub yes: bool,

    /// Print the plan as JSON. Implies --yes.
    #[arg(long)]
    pub json: bool,

    /// Fail if any catalog row cannot be loaded.
    #[arg(long)]
    pub strict: bool,
}

impl Default for PlanArgs {
    fn default() -> Self {
        Self {
            items: PathBuf::from("items.csv"),
            profile: ProfileArgs::default(),
            tuning: TuningArgs::default(),
            select: None,
            require_treat: false,
            yes: false,
            json: false,
            strict: false,
        }
    }
}

impl PlanArgs {
    pub fn interactive(&self) -> bool {
        !(self.yes || self.json)
    }
}

/// Cat biometrics. Values left out are prompted for.
#[derive(Args, Debug, Default)]
pub struct ProfileArgs {
    /// Body weight in kilograms.
    #[arg(long)]
    pub weight_kg: Option<f64>,

    /// Activity level: 1 (low), 2 (medium) or 3 (high).
    #[arg(long, allow_negative_numbers = true)]
    pub activity: Option<i64>,

    /// Whether the cat is neutered (true/false).
    #[arg(long)]
    pub neutered: Option<bool>,

    /// Meals per day.
    #[arg(long)]
    pub meals: Option<u32>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BasisArg {
    /// Weight macros by calories contributed.
    Calories,
    /// Weight macros by ounces fed.
    Weight,
}

impl From<BasisArg> for MacroBasis {
    fn from(arg: BasisArg) -> Self {
        match arg {
            BasisArg::Calories => MacroBasis::Calories,
            BasisArg::Weight => MacroBasis::Weight,
        }
    }
}

/// Planner knobs. Flags override the config file, which overrides defaults.
#[derive(Args, Debug, Default)]
pub struct TuningArgs {
    /// JSON file with planner settings.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Minimum dry-matter protein, percent.
    #[arg(long)]
    pub protein_min: Option<f64>,

    /// Minimum dry-matter fat, percent.
    #[arg(long)]
    pub fat_min: Option<f64>,

    /// Maximum corrected dry-matter carbs, percent.
    #[arg(long)]
    pub carbs_max: Option<f64>,

    /// Fraction of meal calories treats may supply (0-1).
    #[arg(long)]
    pub treat_cap: Option<f64>,

    /// Relative calorie band for the relaxed tier (e.g. 0.01).
    #[arg(long)]
    pub calorie_band: Option<f64>,

    /// How macro percentages are averaged across a meal.
    #[arg(long, value_enum)]
    pub macro_basis: Option<BasisArg>,

    /// Seed for best-effort restarts.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl TuningArgs {
    /// Build the effective configuration: defaults, then file, then flags.
    pub fn resolve(&self) -> Result<PlannerConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => PlannerConfig::default(),
        };

        if let Some(v) = self.protein_min {
            config.protein_min_pct = v;
        }
        if let Some(v) = self.fat_min {
            config.fat_min_pct = v;
        }
        if let Some(v) = self.carbs_max {
            config.carbs_max_pct = v;
        }
        if let Some(v) = self.treat_cap {
            config.treat_calorie_cap = v;
        }
        if let Some(v) = self.calorie_band {
            config.calorie_band = v;
        }
        if let Some(v) = self.macro_basis {
            config.macro_basis = v.into();
        }
        if let Some(v) = self.seed {
            config.best_effort.seed = v;
        }

        config.validate()?;
        Ok(config)
    }
}
