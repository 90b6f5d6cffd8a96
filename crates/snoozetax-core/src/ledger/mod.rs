mod money;
mod record;
mod tracker;
mod week;

pub use money::Money;
pub use record::{DebtRecord, WeeklyDebt, SNOOZE_CHARGE};
pub use tracker::DebtLedger;
pub use week::{WeekBounds, WeekCalendar};
