use serde::Serialize;

use super::base::{validate_choice, XmlModel};
use crate::error::{Result, ValidationError};
use crate::xml::Element;

pub const CONDITION_CHOICES: [&str; 2] = ["likenew", "used"];

/// State of used goods or goods discounted because of a defect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Condition {
    condition_type: &'static str,
    pub reason: String,
}

impl Condition {
    pub fn new(condition_type: &str, reason: impl Into<String>) -> std::result::Result<Self, ValidationError> {
        let condition_type = validate_choice(condition_type, &CONDITION_CHOICES, "condition_type")?;
        Ok(Condition {
            condition_type,
            reason: reason.into(),
        })
    }

    pub fn condition_type(&self) -> &str {
        self.condition_type
    }
}

impl XmlModel for Condition {
    fn create_xml(&self) -> Element {
        let mut el = Element::new("condition").with_attr("type", self.condition_type);
        el.text_element("reason", self.reason.as_str());
        el
    }

    fn from_xml(el: &Element) -> Result<Self> {
        let reason = el
            .find("reason")
            .or_else(|| el.first_child())
            .and_then(Element::text)
            .unwrap_or_default();
        Ok(Condition::new(el.required_attr("type")?, reason)?)
    }
}
