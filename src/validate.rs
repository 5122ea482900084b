// Form validation rules
// Shared by the CLI prompts and anything embedding the library

use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("invalid username regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_-]+@[a-zA-Z0-9_-]+(\.[a-zA-Z0-9_-]+)+$").expect("invalid email regex")
});
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^1[3-9]\d{9}$").expect("invalid phone regex"));

/// 3-20 characters, letters/digits/underscore only
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username must not be empty".to_string());
    }
    if username.chars().count() < 3 {
        return Err("Username must be at least 3 characters".to_string());
    }
    if username.chars().count() > 20 {
        return Err("Username must be at most 20 characters".to_string());
    }
    if !USERNAME_RE.is_match(username) {
        return Err("Username may only contain letters, digits and underscores".to_string());
    }
    Ok(())
}

/// 6-20 characters
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password must not be empty".to_string());
    }
    if password.chars().count() < 6 {
        return Err("Password must be at least 6 characters".to_string());
    }
    if password.chars().count() > 20 {
        return Err("Password must be at most 20 characters".to_string());
    }
    Ok(())
}

pub fn validate_password_confirm(password: &str, confirm: &str) -> Result<(), String> {
    if confirm.is_empty() {
        return Err("Please enter the password again".to_string());
    }
    if password != confirm {
        return Err("Passwords do not match".to_string());
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email must not be empty".to_string());
    }
    if !EMAIL_RE.is_match(email) {
        return Err("Email address is not valid".to_string());
    }
    Ok(())
}

/// Mainland mobile number
pub fn validate_phone(phone: &str) -> Result<(), String> {
    if phone.is_empty() {
        return Err("Phone number must not be empty".to_string());
    }
    if !PHONE_RE.is_match(phone) {
        return Err("Phone number is not valid".to_string());
    }
    Ok(())
}

pub fn validate_length(value: &str, min: usize, max: usize, field: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{} must not be empty", field));
    }
    let len = value.chars().count();
    if len < min {
        return Err(format!("{} must be at least {} characters", field, min));
    }
    if len > max {
        return Err(format!("{} must be at most {} characters", field, max));
    }
    Ok(())
}

pub fn validate_range(value: f64, min: f64, max: f64, field: &str) -> Result<(), String> {
    if value.is_nan() {
        return Err(format!("{} must be a number", field));
    }
    if value < min {
        return Err(format!("{} must not be less than {}", field, min));
    }
    if value > max {
        return Err(format!("{} must not be greater than {}", field, max));
    }
    Ok(())
}
