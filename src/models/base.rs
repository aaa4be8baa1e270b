//! The conversion protocol every model implements and the scalar validators
//! the models use to reach their canonical string form.

use chrono::NaiveDateTime;
use itertools::Itertools;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, ValidationError};
use crate::xml::Element;

pub type Dict = Map<String, Value>;

/// A raw value as handed over by a caller or read from the XML text.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl Scalar {
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Str(_) => "str",
            Scalar::Int(_) => "int",
            Scalar::Float(_) => "float",
            Scalar::Bool(_) => "bool",
            Scalar::DateTime(_) => "datetime",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Str(s) => write!(f, "{s}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(v) => write!(f, "{}", format_float(*v)),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::DateTime(dt) => write!(f, "{dt}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

impl From<&String> for Scalar {
    fn from(v: &String) -> Self {
        Scalar::Str(v.clone())
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(v.into())
    }
}

impl From<u32> for Scalar {
    fn from(v: u32) -> Self {
        Scalar::Int(v.into())
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<NaiveDateTime> for Scalar {
    fn from(v: NaiveDateTime) -> Self {
        Scalar::DateTime(v)
    }
}

/// Floats keep a decimal point so `2.0` stays a float on the wire.
pub fn format_float(v: f64) -> String {
    format!("{v:?}")
}

/// Coerces to an integer and returns it in string form.
pub fn validate_int(
    value: Option<&Scalar>,
    attr: &str,
    allow_none: bool,
) -> std::result::Result<Option<String>, ValidationError> {
    Ok(coerce_int(value, attr, allow_none)?.map(|v| v.to_string()))
}

/// Same as [`validate_int`] but keeps the native integer.
pub fn coerce_int(
    value: Option<&Scalar>,
    attr: &str,
    allow_none: bool,
) -> std::result::Result<Option<i64>, ValidationError> {
    let v = match value {
        None if allow_none => return Ok(None),
        None => return Err(ValidationError::invalid_int(attr)),
        Some(v) => v,
    };
    match v {
        Scalar::Int(i) => Ok(Some(*i)),
        Scalar::Bool(b) => Ok(Some(i64::from(*b))),
        Scalar::Float(f) if f.is_finite() && f.fract() == 0.0 => Ok(Some(*f as i64)),
        Scalar::Str(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ValidationError::invalid_int(attr)),
        _ => Err(ValidationError::invalid_int(attr)),
    }
}

/// Checks the value is a number and returns its string form; strings are
/// kept as given.
pub fn validate_float(
    value: Option<&Scalar>,
    attr: &str,
    allow_none: bool,
) -> std::result::Result<Option<String>, ValidationError> {
    let coerced = coerce_float(value, attr, allow_none)?;
    Ok(match value {
        Some(Scalar::Str(s)) => Some(s.clone()),
        Some(Scalar::Int(i)) => Some(i.to_string()),
        _ => coerced.map(format_float),
    })
}

pub fn coerce_float(
    value: Option<&Scalar>,
    attr: &str,
    allow_none: bool,
) -> std::result::Result<Option<f64>, ValidationError> {
    let v = match value {
        None if allow_none => return Ok(None),
        None => return Err(ValidationError::invalid_float(attr)),
        Some(v) => v,
    };
    match v {
        Scalar::Float(f) => Ok(Some(*f)),
        Scalar::Int(i) => Ok(Some(*i as f64)),
        Scalar::Bool(b) => Ok(Some(f64::from(u8::from(*b)))),
        Scalar::Str(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ValidationError::invalid_float(attr)),
        Scalar::DateTime(_) => Err(ValidationError::invalid_float(attr)),
    }
}

/// Accepts `"true"`, `"false"` or a native bool and returns the string form.
pub fn validate_bool(
    value: Option<&Scalar>,
    attr: &str,
    allow_none: bool,
) -> std::result::Result<Option<String>, ValidationError> {
    match value {
        Some(Scalar::Str(s)) if s == "true" || s == "false" => Ok(Some(s.clone())),
        Some(Scalar::Bool(b)) => Ok(Some(b.to_string())),
        None if allow_none => Ok(None),
        other => Err(ValidationError::InvalidBool {
            attr: attr.to_string(),
            got: other.map(Scalar::type_name).unwrap_or("NoneType"),
        }),
    }
}

pub fn string_to_bool(value: Option<&str>) -> Option<bool> {
    match value {
        Some("true") => Some(true),
        Some("false") => Some(false),
        _ => None,
    }
}

/// Formats a datetime with `format`, or checks that a string already
/// matches it.
pub fn validate_datetime(
    value: Option<&Scalar>,
    format: &str,
    attr: &str,
    allow_none: bool,
) -> std::result::Result<Option<String>, ValidationError> {
    match value {
        Some(Scalar::DateTime(dt)) => Ok(Some(dt.format(format).to_string())),
        Some(Scalar::Str(s)) => match NaiveDateTime::parse_from_str(s, format) {
            Ok(_) => Ok(Some(s.clone())),
            Err(_) => Err(ValidationError::DatetimeFormat {
                value: s.clone(),
                format: format.to_string(),
            }),
        },
        None if allow_none => Ok(None),
        _ => Err(ValidationError::InvalidDatetime {
            attr: attr.to_string(),
        }),
    }
}

pub fn validate_choice<'a>(
    value: &str,
    choices: &[&'a str],
    attr: &str,
) -> std::result::Result<&'a str, ValidationError> {
    choices
        .iter()
        .find(|c| **c == value)
        .copied()
        .ok_or_else(|| ValidationError::InvalidChoice {
            attr: attr.to_string(),
            choices: choices.iter().join(", "),
        })
}

/// Python-style truthiness: what an absent optional XML node looks like
/// in dict form.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

pub fn clean_dict(dict: Dict) -> Dict {
    dict.into_iter().filter(|(_, v)| !is_falsy(v)).collect()
}

/// `serialize_with` helpers that turn canonical wire strings back into
/// typed dict values.
pub mod typed {
    use serde::{Serialize, Serializer};

    use super::string_to_bool;

    pub fn int<S: Serializer>(canonical: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        canonical
            .as_deref()
            .and_then(|v| v.parse::<i64>().ok())
            .serialize(s)
    }

    pub fn float<S: Serializer>(canonical: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        canonical
            .as_deref()
            .and_then(|v| v.trim().parse::<f64>().ok())
            .serialize(s)
    }

    pub fn float_str<S: Serializer>(canonical: &str, s: S) -> Result<S::Ok, S::Error> {
        canonical.trim().parse::<f64>().ok().serialize(s)
    }

    pub fn boolean<S: Serializer>(canonical: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        string_to_bool(canonical.as_deref()).serialize(s)
    }

    /// Unset flags read as `true`.
    pub fn boolean_or_true<S: Serializer>(
        canonical: &Option<String>,
        s: S,
    ) -> Result<S::Ok, S::Error> {
        s.serialize_bool(string_to_bool(canonical.as_deref()).unwrap_or(true))
    }
}

/// Conversion protocol shared by every entity of the feed. The dict form
/// is the entity's `Serialize` output, keyed by constructor field names.
pub trait XmlModel: Serialize + Sized {
    fn create_xml(&self) -> Element;

    fn from_xml(el: &Element) -> Result<Self>;

    fn create_dict(&self) -> Dict {
        match serde_json::to_value(self) {
            Ok(Value::Object(d)) => d,
            // Models serialize to maps with string keys.
            _ => Dict::new(),
        }
    }

    fn to_dict(&self, clean: bool) -> Dict {
        match clean {
            true => clean_dict(self.create_dict()),
            false => self.create_dict(),
        }
    }

    fn to_xml(&self) -> Element {
        self.create_xml()
    }

    /// Appends the element to `parent` and returns the appended child.
    fn to_xml_in<'p>(&self, parent: &'p mut Element) -> &'p mut Element {
        parent.push(self.create_xml())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn s(v: &str) -> Scalar {
        Scalar::from(v)
    }

    #[test]
    fn int_is_canonicalised() {
        assert_eq!(validate_int(Some(&s("007")), "test", false).unwrap(), Some("7".into()));
        assert_eq!(validate_int(Some(&Scalar::Int(42)), "test", false).unwrap(), Some("42".into()));
        assert_eq!(coerce_int(Some(&Scalar::Int(42)), "test", false).unwrap(), Some(42));
        assert_eq!(validate_int(None, "test", true).unwrap(), None);
    }

    #[test]
    fn int_rejects_garbage_and_missing() {
        let err = validate_int(None, "test", false).unwrap_err();
        assert_eq!(err.to_string(), "test must be a valid int");
        assert!(validate_int(Some(&s("1.5")), "test", false).is_err());
        assert!(validate_int(Some(&s("err")), "test", true).is_err());
    }

    #[test]
    fn int_rejects_fractional_floats() {
        assert_eq!(coerce_int(Some(&Scalar::Float(3.0)), "test", false).unwrap(), Some(3));
        let err = coerce_int(Some(&Scalar::Float(2.7)), "test", false).unwrap_err();
        assert_eq!(err.to_string(), "test must be a valid int");
        assert!(coerce_int(Some(&Scalar::Float(f64::NAN)), "test", false).is_err());
    }

    #[test]
    fn float_keeps_string_form() {
        assert_eq!(validate_float(Some(&s("5.60")), "test", false).unwrap(), Some("5.60".into()));
        assert_eq!(validate_float(Some(&Scalar::Float(2.0)), "test", false).unwrap(), Some("2.0".into()));
        assert_eq!(validate_float(Some(&Scalar::Int(3)), "test", false).unwrap(), Some("3".into()));
        assert_eq!(coerce_float(Some(&Scalar::Float(1.25)), "test", false).unwrap(), Some(1.25));
        assert_eq!(validate_float(None, "test", true).unwrap(), None);
        let err = validate_float(None, "test", false).unwrap_err();
        assert_eq!(err.to_string(), "test must be a valid float");
    }

    #[test]
    fn bool_accepts_literals_and_natives() {
        assert_eq!(validate_bool(Some(&Scalar::Bool(true)), "test", false).unwrap(), Some("true".into()));
        assert_eq!(validate_bool(Some(&Scalar::Bool(false)), "test", false).unwrap(), Some("false".into()));
        assert_eq!(validate_bool(Some(&s("true")), "test", false).unwrap(), Some("true".into()));
        assert_eq!(validate_bool(Some(&s("false")), "test", false).unwrap(), Some("false".into()));
        assert_eq!(validate_bool(None, "test", true).unwrap(), None);
    }

    #[test]
    fn bool_error_names_received_type() {
        let err = validate_bool(None, "test", false).unwrap_err();
        assert_eq!(err.to_string(), "The test parameter should be boolean. Got NoneType instead.");
        let err = validate_bool(Some(&Scalar::Int(1)), "test", true).unwrap_err();
        assert_eq!(err.to_string(), "The test parameter should be boolean. Got int instead.");
        assert!(validate_bool(Some(&s("yes")), "test", true).is_err());
    }

    #[test]
    fn str_to_bool() {
        assert_eq!(string_to_bool(Some("true")), Some(true));
        assert_eq!(string_to_bool(Some("false")), Some(false));
        assert_eq!(string_to_bool(Some("none")), None);
        assert_eq!(string_to_bool(None), None);
    }

    #[test]
    fn datetime_formats_and_checks() {
        let fmt = "%Y-%m-%d %H:%M";
        let dt = NaiveDate::from_ymd_opt(2020, 5, 17)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(
            validate_datetime(Some(&Scalar::DateTime(dt)), fmt, "test", false).unwrap(),
            Some("2020-05-17 10:30".into())
        );
        assert_eq!(
            validate_datetime(Some(&s("2020-05-17 10:30")), fmt, "test", false).unwrap(),
            Some("2020-05-17 10:30".into())
        );
        assert_eq!(validate_datetime(None, fmt, "test", true).unwrap(), None);

        let err = validate_datetime(None, fmt, "test", false).unwrap_err();
        assert_eq!(err.to_string(), "test must be a valid datetime");
        let err = validate_datetime(Some(&s("err")), fmt, "test", false).unwrap_err();
        assert_eq!(err.to_string(), "time data 'err' does not match format '%Y-%m-%d %H:%M'");
        assert!(validate_datetime(Some(&Scalar::Int(1)), fmt, "test", true).is_err());
    }

    #[test]
    fn choice_lists_all_options() {
        assert_eq!(validate_choice("used", &["likenew", "used"], "type").unwrap(), "used");
        let err = validate_choice("err", &["likenew", "used"], "type").unwrap_err();
        assert_eq!(err.to_string(), "type must be a valid choice: likenew, used");
    }

    #[test]
    fn clean_dict_drops_falsy_values() {
        let dict = json!({
            "a": 1, "b": "x", "c": null, "d": "", "e": false,
            "f": [], "g": {}, "h": 0, "i": true, "j": [1]
        });
        let cleaned = clean_dict(dict.as_object().unwrap().clone());
        let mut keys: Vec<&String> = cleaned.keys().collect();
        keys.sort();
        assert_eq!(keys, vec!["a", "b", "i", "j"]);
        assert!(cleaned.values().all(|v| !is_falsy(v)));
    }

    #[derive(Serialize)]
    struct Canonical {
        #[serde(serialize_with = "typed::int")]
        bid: Option<String>,
        #[serde(serialize_with = "typed::float")]
        weight: Option<String>,
        #[serde(serialize_with = "typed::float_str")]
        length: String,
        #[serde(serialize_with = "typed::boolean")]
        store: Option<String>,
        #[serde(serialize_with = "typed::boolean_or_true")]
        pickup: Option<String>,
    }

    #[test]
    fn typed_helpers_restore_native_values() {
        let value = serde_json::to_value(Canonical {
            bid: Some("80".into()),
            weight: Some("3.6".into()),
            length: "20.0".into(),
            store: Some("false".into()),
            pickup: None,
        })
        .unwrap();
        assert_eq!(
            value,
            json!({"bid": 80, "weight": 3.6, "length": 20.0, "store": false, "pickup": true})
        );
        let empty = serde_json::to_value(Canonical {
            bid: None,
            weight: None,
            length: "x".into(),
            store: None,
            pickup: Some("false".into()),
        })
        .unwrap();
        assert_eq!(
            empty,
            json!({"bid": null, "weight": null, "length": null, "store": null, "pickup": false})
        );
    }
}
