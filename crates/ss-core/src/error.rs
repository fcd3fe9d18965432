//! Error taxonomy shared by every SheetStorm crate.

use std::collections::BTreeMap;
use thiserror::Error;

/// Top level error for SheetStorm operations
#[derive(Error, Debug)]
pub enum SsError {
    #[error("{entity} with {field}={value} not found")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Contract violation: {0}")]
    Contract(#[from] ContractError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Conflict: {message}")]
    Conflict { message: String },
}

impl SsError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        SsError::NotFound {
            entity,
            field: "id",
            value: id.to_string(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        SsError::Forbidden {
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            SsError::NotFound { .. } => 404,
            SsError::Unauthorized { .. } => 401,
            SsError::Forbidden { .. } => 403,
            SsError::Validation(_) | SsError::Contract(_) => 422,
            SsError::Conflict { .. } => 409,
            SsError::Database(_) | SsError::Export(_) | SsError::Internal(_) | SsError::Config(_) => 500,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            SsError::NotFound { .. } => "not_found",
            SsError::Unauthorized { .. } => "unauthorized",
            SsError::Forbidden { .. } => "forbidden",
            SsError::Validation(_) => "validation_failed",
            SsError::Contract(_) => "contract_violated",
            SsError::Database(_) => "database_error",
            SsError::Export(_) => "export_failed",
            SsError::Internal(_) => "internal_error",
            SsError::Config(_) => "configuration_error",
            SsError::Conflict { .. } => "conflict",
        }
    }
}

/// Field keyed validation messages, the way forms report them back.
///
/// Keys are kept sorted so rendered error bodies are stable.
#[derive(Error, Debug, Default, Clone, PartialEq, Eq)]
#[error("{}", self.full_messages().join("; "))]
pub struct ValidationErrors {
    pub errors: BTreeMap<String, Vec<String>>,
    /// Errors that belong to the record as a whole
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shorthand for a single field error
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
        self.base_errors.extend(other.base_errors);
    }

    /// `Ok(())` when nothing was collected, the errors otherwise
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{}: {}", field, msg));
            }
        }
        messages
    }
}

/// Raised by permission and validation contracts
#[derive(Error, Debug)]
pub enum ContractError {
    #[error("Attribute {attribute} is invalid: {message}")]
    AttributeInvalid { attribute: String, message: String },

    #[error("Attribute {attribute} is not writable")]
    AttributeNotWritable { attribute: String },

    #[error("{message}")]
    Base { message: String },
}

impl From<ContractError> for ValidationErrors {
    fn from(err: ContractError) -> Self {
        let mut errors = ValidationErrors::new();
        match err {
            ContractError::AttributeInvalid { attribute, message } => {
                errors.add(attribute, message);
            }
            ContractError::AttributeNotWritable { attribute } => {
                errors.add(attribute, "is not writable");
            }
            ContractError::Base { message } => {
                errors.add_base(message);
            }
        }
        errors
    }
}
