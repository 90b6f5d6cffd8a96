use clap::Subcommand;
use serde_json::json;
use snoozetax_core::payment::{open_with_fallback, SystemOpener};

use super::{open_app, print_events, print_json, CliResult};

#[derive(Subcommand)]
pub enum DebtAction {
    /// Total unpaid snooze tax across all weeks
    Total,
    /// Charges in the current week
    Week,
    /// Recent charges, newest first
    History {
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Mark the current week as paid
    Settle,
    /// Open a payment to your partner for this week's total
    Pay {
        /// Print the payment links instead of opening them
        #[arg(long)]
        print_only: bool,
    },
}

pub fn run(action: DebtAction) -> CliResult {
    let mut app = open_app()?;

    match action {
        DebtAction::Total => {
            let total = app.ledger().total_unpaid();
            print_json(&json!({
                "total_unpaid": total,
                "formatted": total.to_string(),
            }))?;
        }
        DebtAction::Week => {
            print_json(&app.ledger().current_week())?;
        }
        DebtAction::History { limit } => {
            print_json(&app.ledger().history(limit))?;
        }
        DebtAction::Settle => {
            if app.settle_week()?.is_none() {
                print_json(&json!({ "type": "nothing_to_settle" }))?;
                return Ok(());
            }
            print_events(&mut app)?;
        }
        DebtAction::Pay { print_only } => {
            let Some(partner) = app.partner() else {
                return Err("no partner set; run `snoozetax partner set <USERNAME>`".into());
            };
            tracing::debug!(partner, "building payment intent");
            let Some(intent) = app.payment_intent()? else {
                return Err("nothing to pay this week".into());
            };
            if print_only {
                print_json(&intent)?;
            } else {
                let opened = open_with_fallback(&intent, &SystemOpener)?;
                print_json(&json!({ "intent": intent, "opened": opened }))?;
            }
        }
    }
    Ok(())
}
