use crate::error::{AppError, AppResult};
use regex::Regex;

/// RF-ID tags as printed on the chip ring: 8 to 16 hex characters.
pub fn validate_rf_id(rf_id: &str) -> AppResult<()> {
    let rf_regex = Regex::new(r"^[0-9A-Fa-f]{8,16}$").unwrap();

    if !rf_regex.is_match(rf_id) {
        return Err(AppError::ValidationError(
            "RF-ID must be 8-16 hexadecimal characters".to_string(),
        ));
    }

    Ok(())
}

/// Band number segments: country code, issue year, series, running number.
pub fn validate_band(country: &str, year: i32, series: &str, number: &str) -> AppResult<()> {
    let country_regex = Regex::new(r"^[A-Z]{2,5}$").unwrap();
    if !country_regex.is_match(country) {
        return Err(AppError::ValidationError(
            "Band country must be 2-5 uppercase letters".to_string(),
        ));
    }

    if !(1990..=2100).contains(&year) {
        return Err(AppError::ValidationError(
            "Band year is out of range".to_string(),
        ));
    }

    let series_regex = Regex::new(r"^[0-9A-Za-z-]{1,10}$").unwrap();
    if !series_regex.is_match(series) {
        return Err(AppError::ValidationError(
            "Band series must be 1-10 alphanumeric characters".to_string(),
        ));
    }

    let number_regex = Regex::new(r"^\d{1,8}$").unwrap();
    if !number_regex.is_match(number) {
        return Err(AppError::ValidationError(
            "Band number must be 1-8 digits".to_string(),
        ));
    }

    Ok(())
}
