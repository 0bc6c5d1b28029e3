//! Registration input checks.
//!
//! Every field is checked and every violation is recorded; nothing stops at
//! the first failure. An empty [`ValidationErrors`] means the input is valid.

use std::sync::LazyLock;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use regex::Regex;

use super::errors::ValidationErrors;
use super::models::RegisterCommand;

/// Canonical wire format for dates of birth.
pub const DATE_OF_BIRTH_FORMAT: &str = "%Y-%m-%d";

/// Matches the `accounts.username` column width.
pub const USERNAME_MAX_LENGTH: usize = 50;

pub const PASSWORD_MIN_LENGTH: usize = 8;

pub const PASSWORD_SPECIAL_CHARACTERS: &str = "@$!%*?&";

pub const PASSWORD_REQUIREMENTS_MESSAGE: &str = "Password must be at least 8 characters long and contain an uppercase letter, a lowercase letter, a digit, and a special character";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("Invalid regex")
});

/// `+1 (XXX) XXX-XXXX`
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+1 \([0-9]{3}\) [0-9]{3}-[0-9]{4}$").expect("Invalid regex")
});

/// Canadian postal code, `A1A 1A1`.
static POSTAL_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][0-9][A-Z] [0-9][A-Z][0-9]$").expect("Invalid regex")
});

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("Invalid regex"));

/// Wire field names used as keys in [`ValidationErrors`].
pub mod fields {
    pub const USERNAME: &str = "username";
    pub const EMAIL: &str = "email";
    pub const PASSWORD: &str = "password";
    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const PHONE: &str = "phone";
    pub const DATE_OF_BIRTH: &str = "dateOfBirth";
    pub const ADDRESS_LINE1: &str = "addressLine1";
    pub const CITY: &str = "city";
    pub const PROVINCE: &str = "province";
    pub const POSTAL_CODE: &str = "postalCode";
    pub const COUNTRY: &str = "country";
}

/// Validate a registration request as of `now`.
pub fn validate_registration(command: &RegisterCommand, now: DateTime<Utc>) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if require(&mut errors, fields::USERNAME, "Username", &command.username)
        && command.username.chars().count() > USERNAME_MAX_LENGTH
    {
        errors.add(
            fields::USERNAME,
            format!("Username must be at most {} characters", USERNAME_MAX_LENGTH),
        );
    }

    if require(&mut errors, fields::EMAIL, "Email", &command.email)
        && !is_valid_email(&command.email)
    {
        errors.add(fields::EMAIL, "Invalid email format");
    }

    if require(&mut errors, fields::PASSWORD, "Password", &command.password)
        && !PasswordStrength::evaluate(&command.password).is_acceptable()
    {
        errors.add(fields::PASSWORD, PASSWORD_REQUIREMENTS_MESSAGE);
    }

    require(&mut errors, fields::FIRST_NAME, "First name", &command.first_name);
    require(&mut errors, fields::LAST_NAME, "Last name", &command.last_name);

    if require(&mut errors, fields::PHONE, "Phone number", &command.phone)
        && !is_valid_phone(&command.phone)
    {
        errors.add(fields::PHONE, "Invalid phone number format");
    }

    if require(
        &mut errors,
        fields::DATE_OF_BIRTH,
        "Date of birth",
        &command.date_of_birth,
    ) && !is_valid_date_of_birth(&command.date_of_birth, now)
    {
        errors.add(
            fields::DATE_OF_BIRTH,
            "Invalid date of birth or must be in the past",
        );
    }

    require(
        &mut errors,
        fields::ADDRESS_LINE1,
        "Address line 1",
        &command.address_line1,
    );
    require(&mut errors, fields::CITY, "City", &command.city);
    require(&mut errors, fields::PROVINCE, "Province", &command.province);

    if require(
        &mut errors,
        fields::POSTAL_CODE,
        "Postal code",
        &command.postal_code,
    ) && !is_valid_postal_code(&command.postal_code)
    {
        errors.add(fields::POSTAL_CODE, "Invalid postal code format");
    }

    require(&mut errors, fields::COUNTRY, "Country", &command.country);

    errors
}

/// Records a presence violation. Returns whether the value is present, so
/// format checks only run on non-blank input.
fn require(errors: &mut ValidationErrors, field: &str, label: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, format!("{} is required", label));
        false
    } else {
        true
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

pub fn is_valid_postal_code(postal_code: &str) -> bool {
    POSTAL_CODE_RE.is_match(postal_code)
}

/// Parse a `YYYY-MM-DD` date of birth.
pub fn parse_date_of_birth(value: &str) -> Option<NaiveDate> {
    if !DATE_RE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_OF_BIRTH_FORMAT).ok()
}

/// The date must parse and its start of day (UTC) must lie strictly before `now`.
pub fn is_valid_date_of_birth(value: &str, now: DateTime<Utc>) -> bool {
    parse_date_of_birth(value)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map_or(false, |start| start.and_utc() < now)
}

/// Outcome of each password rule, evaluated independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordStrength {
    pub long_enough: bool,
    pub has_uppercase: bool,
    pub has_lowercase: bool,
    pub has_digit: bool,
    pub has_special: bool,
}

impl PasswordStrength {
    pub fn evaluate(password: &str) -> Self {
        Self {
            long_enough: password.chars().count() >= PASSWORD_MIN_LENGTH,
            has_uppercase: password.chars().any(char::is_uppercase),
            has_lowercase: password.chars().any(char::is_lowercase),
            has_digit: password.chars().any(char::is_numeric),
            has_special: password
                .chars()
                .any(|c| PASSWORD_SPECIAL_CHARACTERS.contains(c)),
        }
    }

    pub fn is_acceptable(&self) -> bool {
        self.missing().is_empty()
    }

    /// Names of the rules that failed.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (self.long_enough, "minimum length"),
            (self.has_uppercase, "uppercase letter"),
            (self.has_lowercase, "lowercase letter"),
            (self.has_digit, "digit"),
            (self.has_special, "special character"),
        ]
        .into_iter()
        .filter_map(|(ok, rule)| (!ok).then_some(rule))
        .collect()
    }
}
