//! Completion analytics: week views, streaks and completion rates.
//!
//! Every calculator is a pure function of a [`CompletionSet`] snapshot, the
//! habit's [`TargetFrequency`] and an explicit reference date. Nothing in
//! here reads the clock or touches storage.
//!
//! Two streak models live side by side and are deliberately kept apart:
//! [`day_streak`] counts consecutive days with one day of grace, while
//! [`week_bucket_streaks`] counts consecutive weeks that met the target.

pub mod day_rate;
pub mod day_streak;
pub mod error;
pub mod types;
pub mod week;
pub mod week_bucket;

pub use day_rate::{day_completion_rate, DateRange, RateWindow};
pub use day_streak::{day_streak, day_streak_from_week};
pub use error::AnalyticsError;
pub use types::{format_date, parse_date, CompletionSet, TargetFrequency};
pub use week::{week_day_statuses, week_window, WeekDayStatus};
pub use week_bucket::{completion_rate, week_bucket_streaks, DEFAULT_TRAILING_WEEKS};
