use serde::Deserialize;

use super::{NationalId, VisitorId};

/// Visitor data as submitted with a booking request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVisitor {
    pub name: String,
    pub national_id: NationalId,
    pub age: i32,
    #[serde(default)]
    pub size: Option<String>,
}

impl NewVisitor {
    pub fn new(name: impl Into<String>, national_id: impl Into<NationalId>, age: i32) -> Self {
        Self {
            name: name.into(),
            national_id: national_id.into(),
            age,
            size: None,
        }
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    /// The declared clothing size, ignoring blank values.
    pub fn size(&self) -> Option<&str> {
        self.size
            .as_deref()
            .map(str::trim)
            .filter(|size| !size.is_empty())
    }

    /// Checks the fields every visitor needs regardless of activity.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("visitor name must not be blank".to_string());
        }
        if self.national_id.is_blank() {
            return Err(format!("national id missing for visitor '{}'", self.name));
        }
        if self.age < 0 {
            return Err(format!(
                "age must not be negative for visitor {}",
                self.national_id
            ));
        }
        Ok(())
    }
}

/// A visitor stored in the park's records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visitor {
    pub id: VisitorId,
    pub name: String,
    pub national_id: NationalId,
    pub age: i32,
    pub size: Option<String>,
}
