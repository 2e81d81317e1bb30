use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analytics::{AnalyticsError, TargetFrequency};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Name is required and cannot be empty")]
    EmptyName,

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub target_frequency: TargetFrequency,
    pub created_at: String,
    pub updated_at: String,
}

/// A habit that has passed validation but has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHabit {
    pub name: String,
    pub description: Option<String>,
    pub target_frequency: TargetFrequency,
}

impl NewHabit {
    pub fn validate(
        name: &str,
        description: Option<&str>,
        target_frequency: Option<i64>,
        default_target: TargetFrequency,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: validate_name(name)?,
            description: description.and_then(validate_description),
            target_frequency: match target_frequency {
                Some(value) => TargetFrequency::new(value)?,
                None => default_target,
            },
        })
    }
}

/// Fields to change on an existing habit; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HabitUpdate {
    pub name: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub target_frequency: Option<TargetFrequency>,
}

impl HabitUpdate {
    pub fn validate(
        name: Option<&str>,
        description: Option<&str>,
        target_frequency: Option<i64>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            name: name.map(validate_name).transpose()?,
            description: description.map(validate_description),
            target_frequency: target_frequency.map(TargetFrequency::new).transpose()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.target_frequency.is_none()
    }

    pub fn apply(self, habit: &mut Habit) {
        if let Some(name) = self.name {
            habit.name = name;
        }
        if let Some(description) = self.description {
            habit.description = description;
        }
        if let Some(target) = self.target_frequency {
            habit.target_frequency = target;
        }
    }
}

pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(trimmed.to_string())
}

/// Blank descriptions are stored as no description at all.
pub fn validate_description(description: &str) -> Option<String> {
    let trimmed = description.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
