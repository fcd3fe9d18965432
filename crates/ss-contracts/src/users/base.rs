//! Field rules shared by every user contract

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use ss_core::error::ValidationErrors;
use ss_models::user::{COUNTRY_MAX_LENGTH, EMAIL_MAX_LENGTH, NAME_MAX_LENGTH};
use ss_models::User;
use std::sync::LazyLock;

use crate::base::{Contract, ValidationResult};

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{9,15}$").expect("phone pattern is valid"));

/// Characters a first or last name may not contain. The hyphen is allowed
/// for double-barrelled names.
const FORBIDDEN_NAME_CHARACTERS: &str = "!@#$%^&*()_+=/\\|\"':;{}[]";

pub const MINIMAL_AGE: i32 = 18;
pub const MAXIMAL_AGE: i32 = 99;

pub struct UserBaseContract<'a> {
    valid_domains: &'a [String],
    today: NaiveDate,
}

impl<'a> UserBaseContract<'a> {
    pub fn new(valid_domains: &'a [String], today: NaiveDate) -> Self {
        Self {
            valid_domains,
            today,
        }
    }

    /// One `@`, a non-blank local part and an allowed domain
    pub fn validate_email(&self, email: &str, errors: &mut ValidationErrors) {
        if email.trim().is_empty() {
            errors.add("email", "The given email must be set");
            return;
        }
        if email.chars().count() as u64 > EMAIL_MAX_LENGTH {
            errors.add(
                "email",
                format!("Ensure this field has no more than {} characters.", EMAIL_MAX_LENGTH),
            );
            return;
        }
        if email.matches('@').count() != 1 {
            errors.add("email", "The given email must contain one \"@\" sign");
            return;
        }
        let (local, domain) = email.split_once('@').unwrap_or_default();
        if local.trim().is_empty() {
            errors.add(
                "email",
                "Invalid first part of email - you cannot use '' or ' ' signs",
            );
            return;
        }
        let domain = domain.to_lowercase();
        if !self.valid_domains.iter().any(|valid| *valid == domain) {
            errors.add(
                "email",
                format!(
                    "Please enter an e-mail address with a valid domain ({})",
                    self.valid_domains.join(", ")
                ),
            );
        }
    }

    pub fn validate_name(&self, field: &str, name: &str, errors: &mut ValidationErrors) {
        if name.chars().count() as u64 > NAME_MAX_LENGTH {
            errors.add(
                field,
                format!("Ensure this field has no more than {} characters.", NAME_MAX_LENGTH),
            );
        }
        if name.chars().any(|c| FORBIDDEN_NAME_CHARACTERS.contains(c)) {
            errors.add(field, "Name can not contain special characters.");
        }
    }

    pub fn validate_phone(&self, phone: Option<&str>, errors: &mut ValidationErrors) {
        if let Some(phone) = phone.filter(|p| !p.is_empty()) {
            if !PHONE_PATTERN.is_match(phone) {
                errors.add(
                    "phone_number",
                    "Phone number must be entered in the format: '999999999'. Up to 15 digits allowed.",
                );
            }
        }
    }

    pub fn validate_age(&self, date_of_birth: Option<NaiveDate>, errors: &mut ValidationErrors) {
        if let Some(date_of_birth) = date_of_birth {
            let age = age_on(date_of_birth, self.today);
            if !(MINIMAL_AGE..=MAXIMAL_AGE).contains(&age) {
                errors.add(
                    "date_of_birth",
                    format!(
                        "Age is not accepted. Users must be between {} and {} years old.",
                        MINIMAL_AGE, MAXIMAL_AGE
                    ),
                );
            }
        }
    }

    pub fn validate_country(&self, country: Option<&str>, errors: &mut ValidationErrors) {
        if let Some(country) = country {
            if country.chars().count() as u64 > COUNTRY_MAX_LENGTH {
                errors.add(
                    "country",
                    format!("Ensure this field has no more than {} characters.", COUNTRY_MAX_LENGTH),
                );
            }
        }
    }
}

/// Completed years between `date_of_birth` and `today`
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// Password and confirmation must match and be long enough
pub fn validate_password(
    password: &str,
    confirmation: Option<&str>,
    min_length: usize,
    errors: &mut ValidationErrors,
) {
    if password.is_empty() {
        errors.add("password", "The given password must be set");
        return;
    }
    if password.chars().count() < min_length {
        errors.add(
            "password",
            format!(
                "This password is too short. It must contain at least {} characters.",
                min_length
            ),
        );
    }
    if let Some(confirmation) = confirmation {
        if confirmation != password {
            errors.add("password_confirmation", "The two password fields didn't match.");
        }
    }
}

impl<'a> Contract<User> for UserBaseContract<'a> {
    fn validate(&self, user: &User) -> ValidationResult {
        let mut errors = ValidationErrors::new();

        self.validate_email(&user.email, &mut errors);
        self.validate_name("first_name", &user.first_name, &mut errors);
        self.validate_name("last_name", &user.last_name, &mut errors);
        self.validate_phone(user.phone_number.as_deref(), &mut errors);
        self.validate_age(user.date_of_birth, &mut errors);
        self.validate_country(user.country.as_deref(), &mut errors);

        errors.into_result()
    }
}
