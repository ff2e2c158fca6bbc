//! Prediction and spending report commands

use clap::Args;
use tracing::debug;

use crate::display::report::{format_prediction, format_spending_classification};
use crate::error::FinanceResult;
use crate::models::Category;
use crate::services::prediction::{predict_with_fallback, PredictionConfig, PredictionStrategy};
use crate::services::BudgetService;
use crate::storage::Storage;

/// Options for `finance predict`
#[derive(Args)]
pub struct PredictArgs {
    /// Forecast strategy (average or linear); defaults to the configured one
    #[arg(short, long)]
    pub strategy: Option<PredictionStrategy>,

    /// Number of recent months the average strategy uses
    #[arg(short, long)]
    pub window: Option<usize>,

    /// Only predict spending in this category
    #[arg(short, long)]
    pub category: Option<String>,
}

/// Forecast next month's spending
pub fn handle_predict_command(storage: &Storage, args: PredictArgs) -> FinanceResult<()> {
    let prefs = &storage.settings.preferences;

    let mut config = PredictionConfig::new(
        args.strategy.unwrap_or(prefs.prediction_strategy),
        args.window.unwrap_or(prefs.average_window),
    );
    if let Some(category) = args.category {
        config = config.category(Category::new(&category)?);
    }
    debug!(strategy = %config.strategy, window = config.window, "predicting");

    let prediction = predict_with_fallback(storage.transactions.records(), &config)?;

    // Category forecasts are compared against that category's own limit
    let limit = match &prediction.category {
        Some(category) => storage
            .settings
            .budget
            .category_limits
            .get(category)
            .copied()
            .unwrap_or_default(),
        None => storage.settings.budget.monthly_limit,
    };
    let outlook = prediction.forecast.against_limit(limit);

    print!("{}", format_prediction(&prediction, outlook, prefs));
    Ok(())
}

/// Print the all-time spending classification
pub fn handle_report_command(storage: &mut Storage) -> FinanceResult<()> {
    let prefs = storage.settings.preferences.clone();
    let shares = BudgetService::new(storage).classify();
    print!("{}", format_spending_classification(&shares, &prefs));
    Ok(())
}
