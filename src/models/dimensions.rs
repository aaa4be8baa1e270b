use itertools::Itertools;
use serde::Serialize;

use super::base::{typed, validate_float, Scalar, XmlModel};
use crate::error::{Result, ValidationError};
use crate::xml::Element;

/// Package size in centimeters, written as `length/width/height`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dimensions {
    #[serde(serialize_with = "typed::float_str")]
    length: String,
    #[serde(serialize_with = "typed::float_str")]
    width: String,
    #[serde(serialize_with = "typed::float_str")]
    height: String,
}

fn dimension(value: Scalar, attr: &str) -> std::result::Result<String, ValidationError> {
    validate_float(Some(&value), attr, false)?.ok_or_else(|| ValidationError::invalid_float(attr))
}

impl Dimensions {
    pub fn new(
        length: impl Into<Scalar>,
        width: impl Into<Scalar>,
        height: impl Into<Scalar>,
    ) -> std::result::Result<Self, ValidationError> {
        Ok(Dimensions {
            length: dimension(length.into(), "length")?,
            width: dimension(width.into(), "width")?,
            height: dimension(height.into(), "height")?,
        })
    }

    pub fn length(&self) -> f64 {
        to_f64(&self.length)
    }

    pub fn width(&self) -> f64 {
        to_f64(&self.width)
    }

    pub fn height(&self) -> f64 {
        to_f64(&self.height)
    }
}

// Stored values already went through validate_float.
fn to_f64(canonical: &str) -> f64 {
    canonical.trim().parse().unwrap_or_default()
}

impl XmlModel for Dimensions {
    fn create_xml(&self) -> Element {
        Element::new("dimensions").with_text([&self.length, &self.width, &self.height].iter().join("/"))
    }

    fn from_xml(el: &Element) -> Result<Self> {
        let parts: Vec<&str> = el.required_text()?.split('/').collect();
        let part = |i: usize| Scalar::from(parts.get(i).copied().unwrap_or_default());
        Ok(Dimensions::new(part(0), part(1), part(2))?)
    }
}
