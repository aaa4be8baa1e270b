use serde::Serialize;

use super::base::{Scalar, XmlModel};
use crate::error::Result;
use crate::xml::Element;

/// Free-form offer characteristic, `<param name="..." unit="...">value</param>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    value: String,
    pub unit: Option<String>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<Scalar>, unit: Option<String>) -> Self {
        Parameter {
            name: name.into(),
            value: value.into().to_string(),
            unit,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl XmlModel for Parameter {
    fn create_xml(&self) -> Element {
        let mut el = Element::new("param").with_attr("name", self.name.as_str());
        if let Some(unit) = &self.unit {
            el.set_attr("unit", unit.as_str());
        }
        el.with_text(self.value.as_str())
    }

    fn from_xml(el: &Element) -> Result<Self> {
        Ok(Parameter::new(
            el.required_attr("name")?,
            el.text().unwrap_or_default(),
            el.attr("unit").map(str::to_string),
        ))
    }
}
