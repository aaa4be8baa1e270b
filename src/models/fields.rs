//! Field groups shared by unrelated models. Each keeps its canonical form and
//! knows how to validate, read back and write itself.

use itertools::Itertools;
use serde::{Serialize, Serializer};

use super::base::{validate_int, Scalar, XmlModel};
use super::option::ShippingOption;
use crate::error::{Result, ValidationError};
use crate::xml::Element;

pub const ENABLE_AUTO_DISCOUNTS_CHOICES: [&str; 6] = ["yes", "true", "1", "no", "false", "0"];

/// `enable_auto_discounts` of a shop or an offer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnableAutoDiscounts(Option<String>);

impl EnableAutoDiscounts {
    pub fn new(value: Option<Scalar>) -> std::result::Result<Self, ValidationError> {
        match value {
            None => Ok(EnableAutoDiscounts(None)),
            Some(Scalar::Bool(b)) => Ok(EnableAutoDiscounts(Some(b.to_string()))),
            Some(Scalar::Str(s)) if ENABLE_AUTO_DISCOUNTS_CHOICES.contains(&s.as_str()) => {
                Ok(EnableAutoDiscounts(Some(s)))
            }
            Some(_) => Err(ValidationError::EnableAutoDiscounts {
                choices: ENABLE_AUTO_DISCOUNTS_CHOICES.iter().join(", "),
            }),
        }
    }

    pub fn get(&self) -> Option<bool> {
        match self.0.as_deref() {
            Some("yes" | "true" | "1") => Some(true),
            Some("no" | "false" | "0") => Some(false),
            _ => None,
        }
    }

    pub fn canonical(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn write_xml(&self, parent: &mut Element) {
        if let Some(v) = self.canonical() {
            parent.text_element("enable_auto_discounts", v);
        }
    }
}

// The dict form is the boolean the spelling stands for.
impl Serialize for EnableAutoDiscounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.get().serialize(serializer)
    }
}

/// Container of delivery or pickup options. Unset means empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OptionList(Vec<ShippingOption>);

pub const DELIVERY_OPTIONS_TAG: &str = "delivery-options";
pub const PICKUP_OPTIONS_TAG: &str = "pickup-options";

impl OptionList {
    pub fn new(options: Option<Vec<ShippingOption>>) -> Self {
        OptionList(options.unwrap_or_default())
    }

    pub fn options(&self) -> &[ShippingOption] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Writes `<tag>` with one `<option>` per entry, nothing when empty.
    pub fn write_xml(&self, parent: &mut Element, tag: &str) {
        if self.0.is_empty() {
            return;
        }
        let container = parent.sub_element(tag);
        for option in &self.0 {
            option.to_xml_in(container);
        }
    }

    pub fn from_xml(container: &Element) -> Result<Self> {
        Ok(OptionList(
            container
                .find_all("option")
                .map(ShippingOption::from_xml)
                .collect::<Result<Vec<_>>>()?,
        ))
    }
}

impl From<Vec<ShippingOption>> for OptionList {
    fn from(options: Vec<ShippingOption>) -> Self {
        OptionList(options)
    }
}

/// Optional integer year of a book or a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Year(Option<String>);

impl Year {
    pub fn new(value: Option<Scalar>) -> std::result::Result<Self, ValidationError> {
        Ok(Year(validate_int(value.as_ref(), "year", true)?))
    }

    pub fn get(&self) -> Option<i64> {
        self.0.as_deref().and_then(|y| y.parse().ok())
    }

    pub fn canonical(&self) -> Option<&str> {
        self.0.as_deref()
    }

}

impl Serialize for Year {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.get().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enable_auto_discounts_reads_all_spellings() {
        for v in ["yes", "true", "1"] {
            assert_eq!(EnableAutoDiscounts::new(Some(v.into())).unwrap().get(), Some(true));
        }
        for v in ["no", "false", "0"] {
            assert_eq!(EnableAutoDiscounts::new(Some(v.into())).unwrap().get(), Some(false));
        }
        assert_eq!(EnableAutoDiscounts::new(None).unwrap().get(), None);
        assert_eq!(EnableAutoDiscounts::new(Some(true.into())).unwrap().canonical(), Some("true"));
        assert_eq!(EnableAutoDiscounts::new(Some(false.into())).unwrap().get(), Some(false));
    }

    #[test]
    fn enable_auto_discounts_rejects_other_values() {
        let err = EnableAutoDiscounts::new(Some("err".into())).unwrap_err();
        assert_eq!(
            err.to_string(),
            "enable_auto_discounts should be True, False or str from available values: yes, true, 1, no, false, 0"
        );
        assert!(EnableAutoDiscounts::new(Some(Scalar::Int(1))).is_err());
    }

    #[test]
    fn dict_values_are_native() {
        let discounts = EnableAutoDiscounts::new(Some("no".into())).unwrap();
        assert_eq!(serde_json::to_value(&discounts).unwrap(), serde_json::json!(false));
        let year = Year::new(Some("2004".into())).unwrap();
        assert_eq!(serde_json::to_value(&year).unwrap(), serde_json::json!(2004));
        assert_eq!(serde_json::to_value(Year::default()).unwrap(), serde_json::Value::Null);
        let list = OptionList::from(vec![ShippingOption::new("300", "1", None)]);
        assert_eq!(
            serde_json::to_value(&list).unwrap(),
            serde_json::json!([{"cost": "300", "days": "1", "order_before": null}])
        );
    }

    #[test]
    fn enable_auto_discounts_keeps_spelling_on_the_wire() {
        let mut el = Element::new("shop");
        EnableAutoDiscounts::new(Some("yes".into())).unwrap().write_xml(&mut el);
        assert_eq!(el.find("enable_auto_discounts").unwrap().text(), Some("yes"));
        let mut el = Element::new("shop");
        EnableAutoDiscounts::default().write_xml(&mut el);
        assert!(el.children.is_empty());
    }

    #[test]
    fn option_list_round_trip() {
        let list = OptionList::from(vec![
            ShippingOption::new("300", "1", None),
            ShippingOption::new("0", "3-5", Some("14".into())),
        ]);
        let mut el = Element::new("offer");
        list.write_xml(&mut el, DELIVERY_OPTIONS_TAG);
        let container = el.find(DELIVERY_OPTIONS_TAG).unwrap();
        assert_eq!(container.children.len(), 2);
        assert_eq!(OptionList::from_xml(container).unwrap(), list);
    }

    #[test]
    fn empty_option_list_writes_nothing() {
        let mut el = Element::new("shop");
        OptionList::new(None).write_xml(&mut el, PICKUP_OPTIONS_TAG);
        assert!(el.children.is_empty());
    }

    #[test]
    fn year_is_optional_int() {
        assert_eq!(Year::new(Some("2004".into())).unwrap().get(), Some(2004));
        assert_eq!(Year::new(None).unwrap().get(), None);
        let err = Year::new(Some("MMIV".into())).unwrap_err();
        assert_eq!(err.to_string(), "year must be a valid int");
    }
}
