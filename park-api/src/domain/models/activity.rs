use super::{ActivityId, ScheduleEntry};

/// A guided activity offered by the park.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub id: ActivityId,
    pub name: String,
    /// Whether every participant must declare a clothing size (harness, helmet, ...).
    pub requires_size: bool,
    pub description: Option<String>,
    pub terms: Option<String>,
}

/// Catalog entry to be created when installing the park's reference data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    pub name: String,
    pub requires_size: bool,
    pub description: Option<String>,
    pub terms: Option<String>,
}

impl NewActivity {
    pub fn new(name: impl Into<String>, requires_size: bool) -> Self {
        Self {
            name: name.into(),
            requires_size,
            description: None,
            terms: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_terms(mut self, terms: impl Into<String>) -> Self {
        self.terms = Some(terms.into());
        self
    }
}

/// An activity together with its aggregated availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivitySummary {
    pub activity: Activity,
    /// Sum of remaining capacity over every date and time slot.
    pub total_capacity: i64,
    /// Number of (date, time slot) rows the activity is offered on.
    pub schedule_count: i64,
}

/// An activity with its full per-date, per-slot availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityDetail {
    pub activity: Activity,
    pub schedule: Vec<ScheduleEntry>,
}
