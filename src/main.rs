use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nutriplan::cli::{parse_args, Command};
use nutriplan::data_loader::load_catalog_csv;
use nutriplan::energy::{DailyEnergyTarget, MealSlot};
use nutriplan::error::Error;
use nutriplan::recommend::Recommender;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nutriplan=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = parse_args();

    match cli.command {
        Command::Recommend {
            catalog,
            profile,
            recent_terms,
            slot,
            top,
        } => {
            let profile = profile.to_profile()?;
            let slot = slot
                .map(|s| {
                    MealSlot::from_label(&s).with_context(|| format!("unknown meal slot '{s}'"))
                })
                .transpose()?;

            let catalog = load_catalog_csv(&catalog)?;
            info!("catalog loaded: {} meals", catalog.len());
            let engine = Recommender::new(catalog);

            match engine.recommend(&profile, &recent_terms, slot, top) {
                Ok(result) => println!("{}", serde_json::to_string_pretty(&result)?),
                Err(Error::NoAdmissibleMeals) => {
                    // Hard constraints are never relaxed on behalf of the
                    // user; report and let them loosen soft preferences.
                    eprintln!("no meals satisfy the given constraints");
                    std::process::exit(1);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Command::Energy { profile } => {
            let profile = profile.to_profile()?;
            let target = DailyEnergyTarget::for_profile(&profile)?;
            let output = serde_json::json!({
                "target": target,
                "per_slot_kcal": {
                    "breakfast": MealSlot::Breakfast.calorie_share(target.target_kcal),
                    "lunch": MealSlot::Lunch.calorie_share(target.target_kcal),
                    "dinner": MealSlot::Dinner.calorie_share(target.target_kcal),
                    "snack": MealSlot::Snack.calorie_share(target.target_kcal),
                },
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::QuickMeals {
            catalog,
            profile,
            max_minutes,
            limit,
        } => {
            let profile = profile.to_profile()?;
            let catalog = load_catalog_csv(&catalog)?;
            let engine = Recommender::new(catalog);
            let quick = engine.quick_meals(&profile, max_minutes, limit)?;
            println!("{}", serde_json::to_string_pretty(&quick)?);
        }
    }

    Ok(())
}
