use serde::Serialize;

use super::base::XmlModel;
use crate::error::Result;
use crate::xml::Element;

/// An `<option>` of a delivery or pickup option list, written as
/// attributes only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingOption {
    pub cost: String,
    pub days: String,
    pub order_before: Option<String>,
}

impl ShippingOption {
    pub fn new(cost: impl Into<String>, days: impl Into<String>, order_before: Option<String>) -> Self {
        ShippingOption {
            cost: cost.into(),
            days: days.into(),
            order_before,
        }
    }
}

impl XmlModel for ShippingOption {
    fn create_xml(&self) -> Element {
        let mut el = Element::new("option")
            .with_attr("cost", self.cost.as_str())
            .with_attr("days", self.days.as_str());
        if let Some(order_before) = &self.order_before {
            el.set_attr("order-before", order_before.as_str());
        }
        el
    }

    fn from_xml(el: &Element) -> Result<Self> {
        Ok(ShippingOption::new(
            el.required_attr("cost")?,
            el.required_attr("days")?,
            el.attr("order-before").map(str::to_string),
        ))
    }
}
