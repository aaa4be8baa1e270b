use itertools::Itertools;
use serde::Serialize;

use super::base::{coerce_int, validate_choice, Scalar, XmlModel};
use crate::error::{Result, ValidationError};
use crate::xml::Element;

pub const UNIT_CHOICES: [&str; 2] = ["year", "month"];
pub const YEAR_CHOICES: [i64; 4] = [0, 6, 12, 18];
pub const MONTH_CHOICES: [i64; 13] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];

/// Minimum recommended age. Without a unit the value is read as months.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Age {
    unit: Option<&'static str>,
    value: i64,
}

impl Age {
    pub fn new(unit: Option<&str>, value: impl Into<Scalar>) -> std::result::Result<Self, ValidationError> {
        let unit = match unit.filter(|u| !u.is_empty()) {
            Some(u) => Some(validate_choice(u, &UNIT_CHOICES, "unit")?),
            None => None,
        };
        let value = coerce_int(Some(&value.into()), "value", false)?
            .ok_or_else(|| ValidationError::invalid_int("value"))?;

        let (unit_name, choices): (&str, &[i64]) = match unit {
            Some("year") => ("year", &YEAR_CHOICES),
            _ => ("month", &MONTH_CHOICES),
        };
        if !choices.contains(&value) {
            return Err(ValidationError::InvalidChoice {
                attr: format!("value for unit '{unit_name}'"),
                choices: choices.iter().join(", "),
            });
        }
        Ok(Age { unit, value })
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit
    }

    pub fn value(&self) -> i64 {
        self.value
    }
}

impl XmlModel for Age {
    fn create_xml(&self) -> Element {
        let mut el = Element::new("age");
        if let Some(unit) = self.unit {
            el.set_attr("unit", unit);
        }
        el.with_text(self.value.to_string())
    }

    fn from_xml(el: &Element) -> Result<Self> {
        Ok(Age::new(el.attr("unit"), el.required_text()?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_dict() {
        let d = Age::new(Some("year"), 18).unwrap().to_dict(false);
        assert_eq!(d["unit"], "year");
        assert_eq!(d["value"], 18);
    }

    #[test]
    fn to_xml() {
        let el = Age::new(Some("month"), "6").unwrap().to_xml();
        assert_eq!(el, Element::new("age").with_attr("unit", "month").with_text("6"));
        let el = Age::new(None, 3).unwrap().to_xml();
        assert_eq!(el, Element::new("age").with_text("3"));
    }

    #[test]
    fn unit_must_be_a_choice() {
        let err = Age::new(Some("err"), 0).unwrap_err();
        assert_eq!(err.to_string(), "unit must be a valid choice: year, month");
    }

    #[test]
    fn value_must_be_int() {
        let err = Age::new(Some("year"), "err").unwrap_err();
        assert_eq!(err.to_string(), "value must be a valid int");
    }

    #[test]
    fn year_value_must_be_a_choice() {
        let err = Age::new(Some("year"), 3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "value for unit 'year' must be a valid choice: 0, 6, 12, 18"
        );
        for v in YEAR_CHOICES {
            assert!(Age::new(Some("year"), v).is_ok());
        }
    }

    #[test]
    fn month_value_must_be_a_choice() {
        let err = Age::new(Some("month"), 13).unwrap_err();
        assert!(err
            .to_string()
            .starts_with("value for unit 'month' must be a valid choice: 0, 1, 2"));
        assert!(Age::new(Some("month"), 12).is_ok());
    }

    #[test]
    fn from_xml() {
        let a = Age::new(Some("year"), 12).unwrap();
        assert_eq!(Age::from_xml(&a.to_xml()).unwrap(), a);
    }
}
