use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Network connection error.")]
    Network(#[from] reqwest::Error),

    #[error("Error {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Error ({code}): {info}")]
    Provider { code: i64, info: String },

    #[error("Location \"{0}\" not available.")]
    LocationUnavailable(String),

    #[error("No current weather data available.")]
    MissingCurrent,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 200;

impl WeatherError {
    /// Truncate a response body to avoid dragging whole payloads into messages
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let cut = body
                .char_indices()
                .take_while(|(i, _)| *i < MAX_ERROR_BODY_LENGTH)
                .last()
                .map(|(i, c)| i + c.len_utf8())
                .unwrap_or(0);
            format!("{}... (truncated, {} total bytes)", &body[..cut], body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        WeatherError::Http {
            status: status.as_u16(),
            body: Self::truncate_body(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_carries_code_and_body() {
        let err = WeatherError::from_status(reqwest::StatusCode::NOT_FOUND, "no such page");
        assert_eq!(err.to_string(), "Error 404: no such page");
    }

    #[test]
    fn test_from_status_truncates_long_body() {
        let body = "x".repeat(500);
        let err = WeatherError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, &body);
        let msg = err.to_string();
        assert!(msg.contains("truncated, 500 total bytes"));
        assert!(msg.len() < 300);
    }

    #[test]
    fn test_provider_envelope_display() {
        let err = WeatherError::Provider {
            code: 615,
            info: "Your API request failed.".to_string(),
        };
        assert_eq!(err.to_string(), "Error (615): Your API request failed.");
    }

    #[test]
    fn test_location_unavailable_display() {
        let err = WeatherError::LocationUnavailable("Atlantis".to_string());
        assert_eq!(err.to_string(), "Location \"Atlantis\" not available.");
    }
}
