pub mod habit;
pub mod stats;

pub use habit::{Habit, HabitUpdate, NewHabit};
pub use stats::{HabitOverview, HabitStatistics, StatisticsReport, WeekView};
