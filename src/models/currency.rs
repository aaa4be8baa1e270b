use itertools::Itertools;
use serde::Serialize;

use super::base::{coerce_float, validate_int, Scalar, XmlModel};
use crate::error::{Result, ValidationError};
use crate::xml::Element;

pub const CURRENCY_CHOICES: [&str; 7] = ["RUR", "RUB", "UAH", "BYN", "KZT", "USD", "EUR"];
pub const RATE_CHOICES: [&str; 4] = ["CBRF", "NBU", "NBK", "CB"];

/// Currency rate declaration, `<currency id="..." rate="..." plus="..."/>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Currency {
    #[serde(rename = "id")]
    currency: &'static str,
    rate: String,
    plus: Option<String>,
}

impl Currency {
    pub fn new(
        currency: &str,
        rate: impl Into<Scalar>,
        plus: Option<Scalar>,
    ) -> std::result::Result<Self, ValidationError> {
        let currency = CURRENCY_CHOICES
            .iter()
            .find(|c| **c == currency)
            .copied()
            .ok_or_else(|| ValidationError::Currency {
                choices: CURRENCY_CHOICES.iter().join(", "),
            })?;

        let rate = rate.into();
        let is_source = rate.as_str().is_some_and(|r| RATE_CHOICES.contains(&r));
        if !is_source && coerce_float(Some(&rate), "rate", false).is_err() {
            return Err(ValidationError::Rate {
                choices: RATE_CHOICES.iter().join(", "),
            });
        }

        let plus = validate_int(plus.as_ref(), "plus", true).map_err(|_| ValidationError::Plus)?;

        Ok(Currency {
            currency,
            rate: rate.to_string(),
            plus,
        })
    }

    pub fn currency(&self) -> &str {
        self.currency
    }

    /// Either a rate source such as `CBRF` or a number.
    pub fn rate(&self) -> &str {
        &self.rate
    }

    pub fn plus(&self) -> Option<&str> {
        self.plus.as_deref()
    }
}

impl XmlModel for Currency {
    fn create_xml(&self) -> Element {
        let mut el = Element::new("currency")
            .with_attr("id", self.currency)
            .with_attr("rate", self.rate.as_str());
        if let Some(plus) = &self.plus {
            el.set_attr("plus", plus.as_str());
        }
        el
    }

    fn from_xml(el: &Element) -> Result<Self> {
        Ok(Currency::new(
            el.required_attr("id")?,
            el.required_attr("rate")?,
            el.attr("plus").map(Scalar::from),
        )?)
    }
}
