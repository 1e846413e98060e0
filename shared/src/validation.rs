//! Input validation functions
//!
//! This module provides validation utilities for user input.

use chrono::NaiveDate;

/// Maximum product title length in characters
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum free-text description length in characters
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Expiration dates further than this many days from today are rejected
pub const MAX_EXPIRATION_DISTANCE_DAYS: i64 = 3650;

/// Valid barcode lengths (EAN-8, UPC-A, EAN-13, GTIN-14)
pub const VALID_BARCODE_LENGTHS: &[usize] = &[8, 12, 13, 14];

/// Maximum number of recipe search results per request
pub const MAX_SEARCH_RESULTS: u32 = 100;

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }
    if !email.contains('@') || !email.contains('.') {
        return Err("Invalid email format".to_string());
    }
    if email.len() > 255 {
        return Err("Email too long".to_string());
    }
    let email_regex = regex_lite::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .map_err(|e| format!("Email pattern error: {}", e))?;
    if !email_regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }
    if password.len() > 128 {
        return Err("Password too long".to_string());
    }
    Ok(())
}

/// Validate a scanned barcode (digits only, GTIN lengths)
pub fn validate_barcode(barcode: &str) -> Result<(), String> {
    if barcode.is_empty() {
        return Err("Barcode cannot be empty".to_string());
    }
    if !barcode.chars().all(|c| c.is_ascii_digit()) {
        return Err("Barcode must contain only digits".to_string());
    }
    if !VALID_BARCODE_LENGTHS.contains(&barcode.len()) {
        return Err(format!(
            "Barcode must be 8, 12, 13 or 14 digits (got {})",
            barcode.len()
        ));
    }
    Ok(())
}

/// Whether the GTIN check digit of a (length-validated) barcode is correct
///
/// Catalogs occasionally store codes with bad check digits, so this is
/// advisory and not part of `validate_barcode`.
pub fn gtin_check_digit_valid(barcode: &str) -> bool {
    let digits: Vec<u32> = barcode.chars().filter_map(|c| c.to_digit(10)).collect();
    let Some((&check, body)) = digits.split_last() else {
        return false;
    };
    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { *d })
        .sum();
    (10 - sum % 10) % 10 == check
}

/// Validate a product title
pub fn validate_title(title: &str) -> Result<(), String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err("Title cannot be empty".to_string());
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(format!("Title cannot exceed {} characters", MAX_TITLE_LENGTH));
    }
    Ok(())
}

/// Validate an optional free-text description
pub fn validate_description(description: &str) -> Result<(), String> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(format!(
            "Description cannot exceed {} characters",
            MAX_DESCRIPTION_LENGTH
        ));
    }
    Ok(())
}

/// Validate an expiration date relative to today
///
/// Past dates are allowed (users log items they find already expired).
pub fn validate_expiration_date(expiration: NaiveDate, today: NaiveDate) -> Result<(), String> {
    let distance = expiration.signed_duration_since(today).num_days().abs();
    if distance > MAX_EXPIRATION_DISTANCE_DAYS {
        return Err("Expiration date must be within 10 years of today".to_string());
    }
    Ok(())
}

/// Validate an image link
pub fn validate_image_url(url: &str) -> Result<(), String> {
    if !(url.starts_with("https://") || url.starts_with("http://")) {
        return Err("Image URL must start with http:// or https://".to_string());
    }
    if url.len() > 2048 {
        return Err("Image URL too long".to_string());
    }
    Ok(())
}

/// Validate the requested number of search results
pub fn validate_search_number(number: u32) -> Result<(), String> {
    if number == 0 || number > MAX_SEARCH_RESULTS {
        return Err(format!(
            "Number of results must be between 1 and {}",
            MAX_SEARCH_RESULTS
        ));
    }
    Ok(())
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "title" => "Product Name",
        "barcode" => "Barcode",
        "expiration_date" => "Expiration Date",
        "description" => "Description",
        "image_url" | "image_urls" => "Image",
        "email" => "Email",
        "password" => "Password",
        "number" => "Number of Results",
        _ => field_name,
    }
}

/// Validation error with field context
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}

/// Run a field validator, attaching the field label on failure
pub fn check_field(field: &str, result: Result<(), String>) -> Result<(), ValidationError> {
    result.map_err(|message| ValidationError::new(field, &message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name@domain.co.uk").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("no@dot").is_err());
        assert!(validate_email("first.last@localhost").is_err());
        assert!(validate_email("spaces in@email.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password123").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"a".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_barcode() {
        assert!(validate_barcode("041631000564").is_ok());
        assert!(validate_barcode("3017620422003").is_ok());
        assert!(validate_barcode("96385074").is_ok());
        assert!(validate_barcode("").is_err());
        assert!(validate_barcode("12345").is_err());
        assert!(validate_barcode("30176204220AB").is_err());
    }

    #[test]
    fn test_gtin_check_digit() {
        // Nutella 400g
        assert!(gtin_check_digit_valid("3017620422003"));
        assert!(gtin_check_digit_valid("96385074"));
        assert!(!gtin_check_digit_valid("3017620422004"));
        assert!(!gtin_check_digit_valid(""));
    }

    #[test]
    fn test_validate_title() {
        assert!(validate_title("Whole milk").is_ok());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_expiration_date() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert!(validate_expiration_date(NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(), today).is_ok());
        assert!(validate_expiration_date(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(), today).is_ok());
        assert!(validate_expiration_date(NaiveDate::from_ymd_opt(2040, 1, 1).unwrap(), today).is_err());
    }

    #[test]
    fn test_validate_image_url() {
        assert!(validate_image_url("https://images.example.com/a.jpg").is_ok());
        assert!(validate_image_url("ftp://example.com/a.jpg").is_err());
    }

    #[test]
    fn test_validation_error() {
        let err = check_field("barcode", validate_barcode("abc")).unwrap_err();
        assert_eq!(err.display_label, "Barcode");
        assert_eq!(err.user_message(), "Barcode: Barcode must contain only digits");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_digit_strings_of_gtin_length_are_valid(
            len in prop::sample::select(VALID_BARCODE_LENGTHS.to_vec()),
            seed in prop::collection::vec(0u8..10, 14)
        ) {
            let barcode: String = seed.iter().take(len).map(|d| char::from(b'0' + d)).collect();
            prop_assert!(validate_barcode(&barcode).is_ok());
        }

        #[test]
        fn prop_search_number_range(n in 1u32..=MAX_SEARCH_RESULTS) {
            prop_assert!(validate_search_number(n).is_ok());
        }

        #[test]
        fn prop_password_length_valid(len in 8usize..=128) {
            let password: String = (0..len).map(|_| 'a').collect();
            prop_assert!(validate_password(&password).is_ok());
        }
    }
}
