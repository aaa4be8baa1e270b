use thiserror::Error;

/// A field received a value that cannot be coerced to its wire form, or
/// that breaks a domain constraint.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{attr} must be a valid int")]
    InvalidInt { attr: String },

    #[error("{attr} must be a valid float")]
    InvalidFloat { attr: String },

    #[error("The {attr} parameter should be boolean. Got {got} instead.")]
    InvalidBool { attr: String, got: &'static str },

    #[error("{attr} must be a valid datetime")]
    InvalidDatetime { attr: String },

    #[error("time data '{value}' does not match format '{format}'")]
    DatetimeFormat { value: String, format: String },

    #[error("{attr} must be a valid choice: {choices}")]
    InvalidChoice { attr: String, choices: String },

    #[error("Price data is accepted only in: {choices}")]
    Currency { choices: String },

    #[error("The rate parameter can have the following values: number (int or float), {choices}")]
    Rate { choices: String },

    #[error("The plus parameter only can be int.")]
    Plus,

    #[error("{attr} must be positive int")]
    NotPositive { attr: String },

    #[error("The maximum {attr} length is {max} characters.")]
    MaxLength { attr: String, max: usize },

    #[error("group_id must be an integer, maximum 9 characters.")]
    GroupId,

    #[error("enable_auto_discounts should be True, False or str from available values: {choices}")]
    EnableAutoDiscounts { choices: String },

    #[error("promo gift must reference exactly one of offer_id or gift_id")]
    PromoGiftTarget,

    #[error("{attr} is required")]
    Required { attr: String },
}

impl ValidationError {
    pub(crate) fn invalid_int(attr: &str) -> Self {
        ValidationError::InvalidInt {
            attr: attr.to_string(),
        }
    }

    pub(crate) fn invalid_float(attr: &str) -> Self {
        ValidationError::InvalidFloat {
            attr: attr.to_string(),
        }
    }

    pub(crate) fn required(attr: &str) -> Self {
        ValidationError::Required {
            attr: attr.to_string(),
        }
    }
}

/// The XML structure itself is not something a feed can contain.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Got unexpected offer type: {0}")]
    UnexpectedOfferType(String),

    #[error("<{element}> is missing the {attribute} attribute")]
    MissingAttribute { element: String, attribute: String },

    #[error("<{element}> has no text")]
    MissingText { element: String },

    #[error("<{element}> has no <{child}> child")]
    MissingChild { element: String, child: String },

    #[error("expected <{expected}> root element, got <{got}>")]
    UnexpectedRoot { expected: String, got: String },

    #[error("malformed xml: {0}")]
    Xml(#[from] roxmltree::Error),
}

#[derive(Error, Debug)]
pub enum YmlError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub type Result<T> = std::result::Result<T, YmlError>;
