//! Gift-with-purchase promotions: buy the products of a [`Purchase`], get
//! one of the [`PromoGift`]s.

use serde::Serialize;

use super::base::{typed, validate_int, Scalar, XmlModel};
use crate::error::{Result, ValidationError};
use crate::xml::Element;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub offer_id: Option<String>,
    pub category_id: Option<String>,
}

impl Product {
    pub fn new(offer_id: Option<String>, category_id: Option<String>) -> Self {
        Product {
            offer_id,
            category_id,
        }
    }
}

impl XmlModel for Product {
    fn create_xml(&self) -> Element {
        let mut el = Element::new("product");
        if let Some(offer_id) = &self.offer_id {
            el.set_attr("offer-id", offer_id.as_str());
        }
        if let Some(category_id) = &self.category_id {
            el.set_attr("category-id", category_id.as_str());
        }
        el
    }

    fn from_xml(el: &Element) -> Result<Self> {
        Ok(Product::new(
            el.attr("offer-id").map(str::to_string),
            el.attr("category-id").map(str::to_string),
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Purchase {
    #[serde(serialize_with = "typed::int")]
    required_quantity: Option<String>,
    pub products: Vec<Product>,
}

impl Purchase {
    pub fn new(products: Vec<Product>, required_quantity: Option<Scalar>) -> std::result::Result<Self, ValidationError> {
        Ok(Purchase {
            required_quantity: validate_int(required_quantity.as_ref(), "required_quantity", true)?,
            products,
        })
    }

    pub fn required_quantity(&self) -> Option<i64> {
        self.required_quantity.as_deref().and_then(|q| q.parse().ok())
    }
}

impl XmlModel for Purchase {
    fn create_xml(&self) -> Element {
        let mut el = Element::new("purchase");
        if let Some(quantity) = &self.required_quantity {
            el.text_element("required-quantity", quantity.as_str());
        }
        for product in &self.products {
            product.to_xml_in(&mut el);
        }
        el
    }

    fn from_xml(el: &Element) -> Result<Self> {
        let mut required_quantity = None;
        let mut products = Vec::new();
        for child in &el.children {
            match child.tag.as_str() {
                "required-quantity" => required_quantity = child.text().map(Scalar::from),
                "product" => products.push(Product::from_xml(child)?),
                _ => (),
            }
        }
        Ok(Purchase::new(products, required_quantity)?)
    }
}

/// The gift of a promo: either an offer of the shop or a `<gift>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromoGift {
    offer_id: Option<String>,
    gift_id: Option<String>,
}

impl PromoGift {
    pub fn new(offer_id: Option<String>, gift_id: Option<String>) -> std::result::Result<Self, ValidationError> {
        match (&offer_id, &gift_id) {
            (Some(_), None) | (None, Some(_)) => Ok(PromoGift { offer_id, gift_id }),
            _ => Err(ValidationError::PromoGiftTarget),
        }
    }

    pub fn offer(offer_id: impl Into<String>) -> Self {
        PromoGift {
            offer_id: Some(offer_id.into()),
            gift_id: None,
        }
    }

    pub fn gift(gift_id: impl Into<String>) -> Self {
        PromoGift {
            offer_id: None,
            gift_id: Some(gift_id.into()),
        }
    }

    pub fn offer_id(&self) -> Option<&str> {
        self.offer_id.as_deref()
    }

    pub fn gift_id(&self) -> Option<&str> {
        self.gift_id.as_deref()
    }
}

impl XmlModel for PromoGift {
    fn create_xml(&self) -> Element {
        match (&self.offer_id, &self.gift_id) {
            (Some(offer_id), _) => Element::new("promo-gift").with_attr("offer-id", offer_id.as_str()),
            (None, Some(gift_id)) => Element::new("promo-gift").with_attr("gift-id", gift_id.as_str()),
            (None, None) => Element::new("promo-gift"),
        }
    }

    fn from_xml(el: &Element) -> Result<Self> {
        Ok(PromoGift::new(
            el.attr("offer-id").map(str::to_string),
            el.attr("gift-id").map(str::to_string),
        )?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Promo {
    pub promo_id: String,
    pub promo_type: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub purchase: Purchase,
    pub promo_gifts: Vec<PromoGift>,
}

impl XmlModel for Promo {
    fn create_xml(&self) -> Element {
        let mut el = Element::new("promo")
            .with_attr("id", self.promo_id.as_str())
            .with_attr("type", self.promo_type.as_str());
        for (tag, value) in [
            ("start-date", &self.start_date),
            ("end-date", &self.end_date),
            ("description", &self.description),
            ("url", &self.url),
        ] {
            if let Some(value) = value {
                el.text_element(tag, value.as_str());
            }
        }
        self.purchase.to_xml_in(&mut el);
        if !self.promo_gifts.is_empty() {
            let gifts_el = el.sub_element("promo-gifts");
            for gift in &self.promo_gifts {
                gift.to_xml_in(gifts_el);
            }
        }
        el
    }

    fn from_xml(el: &Element) -> Result<Self> {
        let text = |tag: &str| el.find(tag).and_then(Element::text).map(str::to_string);
        let promo_gifts = match el.find("promo-gifts") {
            Some(gifts) => gifts
                .find_all("promo-gift")
                .map(PromoGift::from_xml)
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };
        Ok(Promo {
            promo_id: el.required_attr("id")?.to_string(),
            promo_type: el.required_attr("type")?.to_string(),
            start_date: text("start-date"),
            end_date: text("end-date"),
            description: text("description"),
            url: text("url"),
            purchase: Purchase::from_xml(el.required_child("purchase")?)?,
            promo_gifts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn promo() -> Promo {
        Promo {
            promo_id: "p1".into(),
            promo_type: "gift with purchase".into(),
            start_date: Some("2020-01-01 00:00:00".into()),
            end_date: Some("2020-02-01 00:00:00".into()),
            description: Some("Buy two phones, get a case".into()),
            url: Some("http://shop/promo".into()),
            purchase: Purchase::new(
                vec![
                    Product::new(Some("100".into()), None),
                    Product::new(None, Some("7".into())),
                ],
                Some(Scalar::from("2")),
            )
            .unwrap(),
            promo_gifts: vec![PromoGift::offer("200"), PromoGift::gift("g1")],
        }
    }

    #[test]
    fn to_dict() {
        let d = promo().to_dict(false);
        assert_eq!(d["promo_id"], "p1");
        assert_eq!(d["purchase"]["required_quantity"], 2);
        assert_eq!(d["purchase"]["products"][1]["category_id"], "7");
        assert_eq!(d["promo_gifts"][1]["gift_id"], "g1");
    }

    #[test]
    fn to_xml() {
        let el = promo().to_xml();
        assert_eq!(el.attr("id"), Some("p1"));
        assert_eq!(el.attr("type"), Some("gift with purchase"));
        let tags: Vec<&str> = el.children.iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(
            tags,
            vec!["start-date", "end-date", "description", "url", "purchase", "promo-gifts"]
        );
        let purchase = el.find("purchase").unwrap();
        assert_eq!(purchase.find("required-quantity").unwrap().text(), Some("2"));
        assert_eq!(purchase.find("product").unwrap().attr("offer-id"), Some("100"));
        let gifts = el.find("promo-gifts").unwrap();
        assert_eq!(gifts.children[0].attr("offer-id"), Some("200"));
        assert_eq!(gifts.children[1].attr("gift-id"), Some("g1"));
    }

    #[test]
    fn from_xml() {
        let p = promo();
        let parsed = Promo::from_xml(&p.to_xml()).unwrap();
        assert_eq!(parsed.to_dict(false), p.to_dict(false));
    }

    #[test]
    fn promo_gift_needs_exactly_one_target() {
        assert!(PromoGift::new(None, None).is_err());
        assert!(PromoGift::new(Some("1".into()), Some("2".into())).is_err());
        assert_eq!(PromoGift::new(None, Some("2".into())).unwrap().gift_id(), Some("2"));
        let el = Element::new("promo-gift");
        assert!(PromoGift::from_xml(&el).is_err());
    }

    #[test]
    fn required_quantity_must_be_int() {
        let err = Purchase::new(vec![], Some(Scalar::from("many"))).unwrap_err();
        assert_eq!(err.to_string(), "required_quantity must be a valid int");
    }
}
