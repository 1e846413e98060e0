//! Pantry Tracker WASM Module
//!
//! This crate provides WebAssembly bindings for the expiration logic so
//! web clients render exactly the same status the backend computes.

use chrono::NaiveDate;
use pantry_tracker_shared::errors::AppError;
use pantry_tracker_shared::expiration::{self, ExpirationStatus};
use pantry_tracker_shared::validation;
use wasm_bindgen::prelude::*;

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        AppError::Validation(format!("Invalid {} '{}'. Use YYYY-MM-DD", field, value))
    })
}

fn status_for(expiration: &str, today: &str) -> Result<ExpirationStatus, AppError> {
    let expiration = parse_date("expiration date", expiration)?;
    let today = parse_date("today", today)?;
    Ok(expiration::classify(expiration, today))
}

/// Expiration status as a JSON string
///
/// Both dates are `YYYY-MM-DD`.
#[wasm_bindgen(js_name = expirationStatus)]
pub fn expiration_status(expiration: &str, today: &str) -> Result<String, JsValue> {
    let status = status_for(expiration, today).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&status).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Whole days until expiration; negative once expired
#[wasm_bindgen(js_name = daysUntil)]
pub fn days_until(expiration: &str, today: &str) -> Result<i32, JsValue> {
    let status = status_for(expiration, today).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(status.days_remaining as i32)
}

/// Check an email before submitting the registration form
#[wasm_bindgen(js_name = validateEmail)]
pub fn validate_email(email: &str) -> Result<(), JsValue> {
    validation::validate_email(email.trim()).map_err(|e| JsValue::from_str(&e))
}

/// Check a scanned or typed barcode before looking it up
#[wasm_bindgen(js_name = validateBarcode)]
pub fn validate_barcode(barcode: &str) -> Result<(), JsValue> {
    validation::validate_barcode(barcode.trim()).map_err(|e| JsValue::from_str(&e))
}
