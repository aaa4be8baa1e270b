//! Offers: a shared [`OfferBase`] plus one payload per offer type.
//!
//! Which payload an `<offer>` carries is decided by its `type` attribute,
//! see [`crate::models::shop::offer_from_xml`].

use std::collections::HashMap;

use serde::{Serialize, Serializer};
use tracing::trace;

use super::base::{Scalar, XmlModel};
use crate::error::{Result, ValidationError};
use crate::xml::Element;

mod common;
mod variants;

pub use common::{OfferBase, OfferBuilder, TextField, EXPIRY_FORMAT};
pub use variants::{
    AlcoholOffer, ArbitraryOffer, AudioBookOffer, BookDetails, BookOffer, EventTicketOffer,
    MedicineOffer, MusicVideoOffer, SimplifiedOffer, EVENT_DATE_FORMAT,
};

/// Text of the children of an `<offer>` that are not base fields, keyed by tag.
#[derive(Debug, Default)]
pub struct SubtypeFields(HashMap<String, String>);

impl SubtypeFields {
    pub fn take(&mut self, tag: &str) -> Option<String> {
        self.0.remove(tag)
    }

    pub fn scalar(&mut self, tag: &str) -> Option<Scalar> {
        self.take(tag).map(Scalar::from)
    }

    pub fn required(&mut self, tag: &str) -> std::result::Result<String, ValidationError> {
        self.take(tag).ok_or_else(|| ValidationError::required(tag))
    }
}

/// The part of an offer that depends on its type.
pub trait OfferVariant: Sized + Into<OfferKind> {
    /// Value of the `type` attribute, `None` for simplified offers.
    const TYPE: Option<&'static str>;

    /// Takes the variant's own elements out of `fields`.
    fn from_fields(fields: &mut SubtypeFields) -> std::result::Result<Self, ValidationError>;

    /// Own text elements as `(xml tag, wire value)`, in output order.
    fn text_fields(&self) -> Vec<(&'static str, Option<String>)>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OfferKind {
    Simplified(SimplifiedOffer),
    Arbitrary(ArbitraryOffer),
    Book(BookOffer),
    AudioBook(AudioBookOffer),
    MusicVideo(MusicVideoOffer),
    Medicine(MedicineOffer),
    EventTicket(EventTicketOffer),
    Alcohol(AlcoholOffer),
}

macro_rules! each_kind {
    ($kind:expr, $o:ident => $body:expr) => {
        match $kind {
            OfferKind::Simplified($o) => $body,
            OfferKind::Arbitrary($o) => $body,
            OfferKind::Book($o) => $body,
            OfferKind::AudioBook($o) => $body,
            OfferKind::MusicVideo($o) => $body,
            OfferKind::Medicine($o) => $body,
            OfferKind::EventTicket($o) => $body,
            OfferKind::Alcohol($o) => $body,
        }
    };
}

impl OfferKind {
    pub fn offer_type(&self) -> Option<&'static str> {
        fn type_of<V: OfferVariant>(_: &V) -> Option<&'static str> {
            V::TYPE
        }
        each_kind!(self, o => type_of(o))
    }

    fn text_fields(&self) -> Vec<(&'static str, Option<String>)> {
        each_kind!(self, o => o.text_fields())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Offer {
    pub base: OfferBase,
    pub kind: OfferKind,
}

impl Offer {
    pub fn new(base: OfferBase, kind: impl Into<OfferKind>) -> Self {
        Offer {
            base,
            kind: kind.into(),
        }
    }

    pub fn offer_type(&self) -> Option<&'static str> {
        self.kind.offer_type()
    }

    /// Reads an `<offer>` as an offer of type `V`, whatever its `type`
    /// attribute says.
    pub fn from_xml_as<V: OfferVariant>(el: &Element) -> Result<Offer> {
        let mut fields = SubtypeFields::default();
        let builder = OfferBuilder::from_xml(el, |child| {
            let text = child.text().unwrap_or_default().to_string();
            fields.0.insert(child.tag.clone(), text);
        })?;
        let variant = V::from_fields(&mut fields)?;
        for tag in fields.0.keys() {
            trace!("Skipping unknown offer element <{tag}>");
        }
        Ok(Offer::new(builder.build()?, variant))
    }
}

// One flat mapping: the type, the base fields, then the payload fields.
impl Serialize for Offer {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Flat<'a> {
            #[serde(rename = "type")]
            offer_type: Option<&'static str>,
            #[serde(flatten)]
            base: &'a OfferBase,
            #[serde(flatten)]
            kind: &'a OfferKind,
        }

        Flat {
            offer_type: self.offer_type(),
            base: &self.base,
            kind: &self.kind,
        }
        .serialize(serializer)
    }
}

impl XmlModel for Offer {
    fn create_xml(&self) -> Element {
        let mut el = self.base.offer_element(self.offer_type());
        self.base.write_children(&mut el);
        match &self.kind {
            // The name of a simplified offer comes first.
            OfferKind::Simplified(o) => el.insert(0, Element::new("name").with_text(o.name.as_str())),
            kind => {
                for (tag, value) in kind.text_fields() {
                    if let Some(value) = value {
                        el.text_element(tag, value);
                    }
                }
            }
        }
        el
    }

    fn from_xml(el: &Element) -> Result<Self> {
        super::shop::offer_from_xml(el)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::price::Price;

    fn base() -> OfferBase {
        OfferBuilder::new("100")
            .url("http://x")
            .price(Price::new(9.99, false).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn simplified_name_goes_first() {
        let offer = Offer::new(base(), SimplifiedOffer::new("Widget"));
        let el = offer.to_xml();
        assert_eq!(el.attr("type"), None);
        assert_eq!(el.children[0].tag, "name");
        assert_eq!(el.children[0].text(), Some("Widget"));
        assert_eq!(offer.to_dict(false)["type"], serde_json::Value::Null);
    }

    #[test]
    fn subtype_elements_are_appended() {
        let mut arbitrary = ArbitraryOffer::new("X1");
        arbitrary.type_prefix = Some("Phone".into());
        let el = Offer::new(base(), arbitrary).to_xml();
        assert_eq!(el.attr("type"), Some("vendor.model"));
        let tags: Vec<&str> = el.children.iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(tags[tags.len() - 2..], ["model", "typePrefix"]);
    }

    #[test]
    fn expiry_none_writes_no_element() {
        let offer = Offer::new(base(), SimplifiedOffer::new("Widget"));
        assert_eq!(offer.base.expiry(), None);
        assert!(offer.to_xml().find("expiry").is_none());
        assert_eq!(offer.to_xml().find("min-quantity").unwrap().text(), Some("1"));
    }

    #[test]
    fn from_xml_as_ignores_unknown_elements() {
        let mut el = Offer::new(base(), MedicineOffer::new("Aspirin")).to_xml();
        el.text_element("rating", "5");
        let parsed = Offer::from_xml_as::<MedicineOffer>(&el).unwrap();
        assert_eq!(parsed.offer_type(), Some("medicine"));
        assert_eq!(parsed.base.url.as_deref(), Some("http://x"));
    }

    #[test]
    fn missing_subtype_field_is_reported() {
        let el = Offer::new(base(), SimplifiedOffer::new("Widget")).to_xml();
        let err = Offer::from_xml_as::<ArbitraryOffer>(&el).unwrap_err();
        assert_eq!(err.to_string(), "model is required");
    }
}
