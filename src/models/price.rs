use serde::Serialize;

use super::base::{validate_float, Scalar, XmlModel};
use crate::error::{Result, ValidationError};
use crate::xml::Element;

/// Offer price. `is_starting` marks a "from" price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Price {
    value: String,
    is_starting: bool,
}

impl Price {
    pub fn new(value: impl Into<Scalar>, is_starting: bool) -> std::result::Result<Self, ValidationError> {
        let value = validate_float(Some(&value.into()), "price", false)?
            .ok_or_else(|| ValidationError::required("price"))?;
        Ok(Price { value, is_starting })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_starting(&self) -> bool {
        self.is_starting
    }
}

impl XmlModel for Price {
    fn create_xml(&self) -> Element {
        let mut el = Element::new("price");
        if self.is_starting {
            el.set_attr("from", "true");
        }
        el.with_text(self.value.as_str())
    }

    fn from_xml(el: &Element) -> Result<Self> {
        Ok(Price::new(el.required_text()?, el.attr("from") == Some("true"))?)
    }
}
