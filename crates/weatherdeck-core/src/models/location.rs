use serde::{Deserialize, Serialize};

/// Placeholder the provider uses for unknown location parts
pub const UNKNOWN_PART: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub region: String,
    pub country: String,
}

impl Location {
    /// A location with every part unknown, used before the first query resolves.
    pub fn unknown() -> Self {
        Self {
            name: UNKNOWN_PART.to_string(),
            region: UNKNOWN_PART.to_string(),
            country: UNKNOWN_PART.to_string(),
        }
    }

    /// Join the known parts with ", " for display.
    /// Empty and "-" parts are skipped; all-unknown yields a prompt string.
    pub fn display(&self) -> String {
        let parts: Vec<&str> = [&self.name, &self.region, &self.country]
            .into_iter()
            .map(String::as_str)
            .filter(|p| !p.is_empty() && *p != UNKNOWN_PART)
            .collect();

        if parts.is_empty() {
            "No location selected".to_string()
        } else {
            parts.join(", ")
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::unknown()
    }
}
