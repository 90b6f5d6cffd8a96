pub mod alarm;
pub mod config;
pub mod debt;
pub mod partner;

use std::sync::Arc;

use snoozetax_core::{
    Config, Database, Event, LoggingScheduler, Services, SnoozeTax, StateRepository, SystemClock,
};

use crate::feedback::TerminalFeedback;

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the database and rebuild the controller from it.
fn open_app() -> Result<SnoozeTax<Database>, Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let calendar = config.week_calendar()?;
    let services = Services {
        scheduler: Box::new(LoggingScheduler),
        feedback: Box::new(TerminalFeedback::new(&config.feedback)),
        clock: Arc::new(SystemClock),
    };
    let repo = StateRepository::new(Database::open()?);
    Ok(SnoozeTax::load(repo, services, calendar, config.payment))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print queued events, or the alarm snapshot when nothing happened.
fn print_events(app: &mut SnoozeTax<Database>) -> CliResult {
    let events: Vec<Event> = app.drain_events();
    if events.is_empty() {
        return print_json(&app.lifecycle().snapshot());
    }
    for event in &events {
        print_json(event)?;
    }
    Ok(())
}
