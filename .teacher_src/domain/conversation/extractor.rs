//! Data extraction and response sanitization.
//!
//! Handles sanitizing AI responses and extracting structured data
//! from conversation transcripts.

use crate::domain::foundation::{ComponentType, Timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum allowed response length (100KB).
pub const MAX_RESPONSE_LENGTH: usize = 100_000;

/// Maximum length for individual string fields in extracted data (10KB).
pub const MAX_FIELD_LENGTH: usize = 10_000;

/// Errors that can occur during sanitization.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SanitizationError {
    #[error("Response too long: {actual} bytes exceeds maximum of {max} bytes")]
    TooLong { max: usize, actual: usize },

    #[error("Invalid UTF-8 encoding at byte position {position}")]
    InvalidUtf8 { position: usize },
}

/// Errors that can occur during data extraction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Sanitization failed: {0}")]
    Sanitization(#[from] SanitizationError),

    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("Schema validation failed: {0}")]
    SchemaValidation(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Sanitizes AI responses before storage or processing.
#[derive(Debug, Clone, Default)]
pub struct ResponseSanitizer {
    /// Additional prompt injection patterns to strip.
    additional_patterns: Vec<String>,
}

impl ResponseSanitizer {
    /// Creates a new sanitizer with default patterns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds additional patterns to strip from responses.
    pub fn with_additional_patterns(mut self, patterns: Vec<String>) -> Self {
        self.additional_patterns = patterns;
        self
    }

    /// Sanitizes an AI response before storage.
    ///
    /// # Steps
    /// 1. Validate length
    /// 2. Remove control characters (except newlines/tabs)
    /// 3. Strip potential prompt injection markers
    /// 4. Validate UTF-8 encoding
    pub fn sanitize(&self, response: &str) -> Result<String, SanitizationError> {
        // 1. Validate length
        self.validate_length(response)?;

        // 2. Remove control characters
        let cleaned = self.remove_control_chars(response);

        // 3. Strip injection markers
        let stripped = self.strip_injection_markers(&cleaned);

        // 4. Validate UTF-8 (should be valid since we started with &str)
        self.validate_utf8(&stripped)?;

        Ok(stripped)
    }

    fn validate_length(&self, s: &str) -> Result<(), SanitizationError> {
        if s.len() > MAX_RESPONSE_LENGTH {
            return Err(SanitizationError::TooLong {
                max: MAX_RESPONSE_LENGTH,
                actual: s.len(),
            });
        }
        Ok(())
    }

    fn remove_control_chars(&self, s: &str) -> String {
        s.chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t' || *c == '\r')
            .collect()
    }

    fn strip_injection_markers(&self, s: &str) -> String {
        // Common prompt injection patterns
        let patterns = [
            "```system",
            "```assistant",
            "[INST]",
            "[/INST]",
            "<|system|>",
            "<|assistant|>",
            "<|user|>",
            "<|im_start|>",
            "<|im_end|>",
            "<<SYS>>",
            "<</SYS>>",
        ];

        let mut result = s.to_string();

        // Strip built-in patterns
        for pattern in patterns {
            result = result.replace(pattern, "");
        }

        // Strip additional patterns
        for pattern in &self.additional_patterns {
            result = result.replace(pattern, "");
        }

        result
    }

    fn validate_utf8(&self, s: &str) -> Result<(), SanitizationError> {
        // Since we're working with &str, it's already valid UTF-8
        // This is a placeholder for additional validation if needed
        for (i, c) in s.chars().enumerate() {
            if c == '\u{FFFD}' {
                // Replacement character indicates invalid UTF-8 was present
                return Err(SanitizationError::InvalidUtf8 { position: i });
            }
        }
        Ok(())
    }
}

/// Extracted structured data from a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedData {
    /// The type of component this data was extracted for.
    pub component_type: ComponentType,
    /// The extracted data as JSON.
    pub data: serde_json::Value,
    /// When the extraction occurred.
    pub extracted_at: Timestamp,
}

impl ExtractedData {
    /// Creates new extracted data.
    pub fn new(component_type: ComponentType, data: serde_json::Value) -> Self {
        Self {
            component_type,
            data,
            extracted_at: Timestamp::now(),
        }
    }
}

/// Extracts and validates structured data from AI responses.
#[derive(Debug, Clone)]
pub struct DataExtractor {
    sanitizer: ResponseSanitizer,
}

impl DataExtractor {
    /// Creates a new extractor with default sanitizer.
    pub fn new() -> Self {
        Self {
            sanitizer: ResponseSanitizer::new(),
        }
    }

    /// Creates an extractor with a custom sanitizer.
    pub fn with_sanitizer(sanitizer: ResponseSanitizer) -> Self {
        Self { sanitizer }
    }

    /// Extracts structured data from an AI response.
    ///
    /// # Steps
    /// 1. Sanitize the raw response
    /// 2. Parse JSON
    /// 3. Recursively sanitize string fields
    pub fn extract(
        &self,
        component_type: ComponentType,
        response: &str,
    ) -> Result<ExtractedData, ExtractionError> {
        // 1. Sanitize the raw response first
        let sanitized = self.sanitizer.sanitize(response)?;

        // 2. Extract JSON from the response (handle markdown code blocks)
        let json_str = self.extract_json_from_response(&sanitized)?;

        // 3. Parse JSON
        let value: serde_json::Value = serde_json::from_str(&json_str)
            .map_err(|e| ExtractionError::ParseError(e.to_string()))?;

        // 4. Recursively sanitize string fields
        let sanitized_value = self.sanitize_json_strings(&value)?;

        Ok(ExtractedData::new(component_type, sanitized_value))
    }

    /// Extracts JSON from a response that may contain markdown code blocks.
    fn extract_json_from_response(&self, response: &str) -> Result<String, ExtractionError> {
        let trimmed = response.trim();

        // Try to find JSON in code blocks first
        if let Some(json) = self.extract_from_code_block(trimmed) {
            return Ok(json);
        }

        // Try to find raw JSON - pick whichever comes first (object or array)
        let obj_start = trimmed.find('{');
        let arr_start = trimmed.find('[');

        // Determine which type of JSON appears first
        let (start, open, close) = match (obj_start, arr_start) {
            (Some(o), Some(a)) if o < a => (o, '{', '}'),
            (Some(o), Some(a)) if a < o => (a, '[', ']'),
            (Some(o), Some(_)) => (o, '{', '}'), // Equal, prefer object
            (Some(o), None) => (o, '{', '}'),
            (None, Some(a)) => (a, '[', ']'),
            (None, None) => return Ok(trimmed.to_string()),
        };

        if let Some(json) = self.extract_balanced_json(trimmed, start, open, close) {
            return Ok(json);
        }

        // Return the whole thing and let JSON parser handle it
        Ok(trimmed.to_string())
    }

    fn extract_from_code_block(&self, s: &str) -> Option<String> {
        // Look for ```json ... ``` or ``` ... ```
        let patterns = ["```json\n", "```json\r\n", "```\n", "```\r\n"];

        for pattern in patterns {
            if let Some(start) = s.find(pattern) {
                let json_start = start + pattern.len();
                if let Some(end) = s[json_start..].find("```") {
                    return Some(s[json_start..json_start + end].trim().to_string());
                }
            }
        }
        None
    }

    fn extract_balanced_json(&self, s: &str, start: usize, open: char, close: char) -> Option<String> {
        let mut depth = 0;
        let mut in_string = false;
        let mut escape_next = false;

        for (i, c) in s[start..].chars().enumerate() {
            if escape_next {
                escape_next = false;
                continue;
            }

            match c {
                '\\' if in_string => escape_next = true,
                '"' => in_string = !in_string,
                _ if in_string => {}
                c if c == open => depth += 1,
                c if c == close => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(s[start..start + i + 1].to_string());
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Recursively sanitizes all string values in JSON.
    fn sanitize_json_strings(
        &self,
        value: &serde_json::Value,
    ) -> Result<serde_json::Value, ExtractionError> {
        match value {
            serde_json::Value::String(s) => {
                // Strip HTML/script-like content (basic sanitization)
                let clean = self.sanitize_string_field(s);
                Ok(serde_json::Value::String(clean))
            }
            serde_json::Value::Array(arr) => {
                let sanitized: Result<Vec<_>, _> = arr
                    .iter()
                    .map(|v| self.sanitize_json_strings(v))
                    .collect();
                Ok(serde_json::Value::Array(sanitized?))
            }
            serde_json::Value::Object(obj) => {
                let sanitized: Result<serde_json::Map<_, _>, _> = obj
                    .iter()
                    .map(|(k, v)| {
                        self.sanitize_json_strings(v).map(|sv| (k.clone(), sv))
                    })
                    .collect();
                Ok(serde_json::Value::Object(sanitized?))
            }
            other => Ok(other.clone()),
        }
    }

    /// Sanitizes a single string field.
    fn sanitize_string_field(&self, s: &str) -> String {
        // Remove HTML tags (basic)
        let no_html = self.strip_html_tags(s);

        // Truncate if too long
        if no_html.len() > MAX_FIELD_LENGTH {
            format!("{}...[truncated]", &no_html[..MAX_FIELD_LENGTH])
        } else {
            no_html
        }
    }

    /// Basic HTML tag stripping.
    fn strip_html_tags(&self, s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        let mut in_tag = false;

        for c in s.chars() {
            match c {
                '<' => in_tag = true,
                '>' => in_tag = false,
                _ if !in_tag => result.push(c),
                _ => {}
            }
        }

        result
    }
}

impl Default for DataExtractor {
    fn default() -> Self {
        Self::new()
    }
}
