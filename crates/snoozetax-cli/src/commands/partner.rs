use clap::Subcommand;
use serde_json::json;

use super::{open_app, print_json, CliResult};

#[derive(Subcommand)]
pub enum PartnerAction {
    /// Show the accountability partner
    Get,
    /// Set the partner's payment username (blank clears it)
    Set { username: String },
}

pub fn run(action: PartnerAction) -> CliResult {
    let mut app = open_app()?;

    match action {
        PartnerAction::Get => {
            print_json(&json!({ "username": app.partner() }))?;
        }
        PartnerAction::Set { username } => {
            let event = app.set_partner(Some(&username))?;
            print_json(&event)?;
        }
    }
    Ok(())
}
