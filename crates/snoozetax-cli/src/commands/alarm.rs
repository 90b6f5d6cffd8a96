use clap::Subcommand;
use snoozetax_core::alarm::parse_time_of_day;

use super::{open_app, print_events, print_json, CliResult};

#[derive(Subcommand)]
pub enum AlarmAction {
    /// Set the alarm for the next occurrence of a clock time
    Set {
        /// Time of day (e.g. "07:00", "7:00 AM", "19:30")
        time: String,
    },
    /// Print alarm and debt state as JSON, ringing the alarm if it is due
    Status,
    /// Start ringing now
    Ring,
    /// Snooze for 9 minutes and pay the snooze tax
    Snooze,
    /// Stop ringing
    Dismiss,
    /// Remove the alarm
    Delete,
    /// Re-enable a disabled alarm
    Enable,
    /// Keep the alarm but stop it from ringing
    Disable,
}

pub fn run(action: AlarmAction) -> CliResult {
    let mut app = open_app()?;

    match action {
        AlarmAction::Set { time } => {
            let time = parse_time_of_day(&time)?;
            app.set_alarm_at(time)?;
        }
        AlarmAction::Status => {
            app.tick()?;
            print_json(&app.status())?;
            for event in app.drain_events() {
                print_json(&event)?;
            }
            return Ok(());
        }
        AlarmAction::Ring => {
            app.trigger()?;
        }
        AlarmAction::Snooze => {
            app.snooze()?;
        }
        AlarmAction::Dismiss => {
            app.dismiss()?;
        }
        AlarmAction::Delete => {
            app.delete()?;
        }
        AlarmAction::Enable => {
            app.set_enabled(true)?;
        }
        AlarmAction::Disable => {
            app.set_enabled(false)?;
        }
    }

    print_events(&mut app)
}
