use serde::Serialize;
use tracing::{debug, trace};

use super::base::{Scalar, XmlModel};
use super::category::Category;
use super::currency::Currency;
use super::fields::{EnableAutoDiscounts, OptionList, DELIVERY_OPTIONS_TAG, PICKUP_OPTIONS_TAG};
use super::gift::Gift;
use super::offers::{
    AlcoholOffer, ArbitraryOffer, AudioBookOffer, BookOffer, EventTicketOffer, MedicineOffer,
    MusicVideoOffer, Offer, SimplifiedOffer,
};
use super::promo::Promo;
use crate::error::{ParseError, Result, ValidationError};
use crate::xml::Element;

pub const URL_MAX_LENGTH: usize = 512;

/// Picks the offer type from the `type` attribute and parses the offer as such.
pub fn offer_from_xml(el: &Element) -> Result<Offer> {
    let offer_type = el.attr("type");
    trace!("Parsing offer {:?} of type {:?}", el.attr("id"), offer_type);
    match offer_type {
        None => Offer::from_xml_as::<SimplifiedOffer>(el),
        Some("vendor.model") => Offer::from_xml_as::<ArbitraryOffer>(el),
        Some("book") => Offer::from_xml_as::<BookOffer>(el),
        Some("audiobook") => Offer::from_xml_as::<AudioBookOffer>(el),
        Some("artist.title") => Offer::from_xml_as::<MusicVideoOffer>(el),
        Some("medicine") => Offer::from_xml_as::<MedicineOffer>(el),
        Some("event-ticket") => Offer::from_xml_as::<EventTicketOffer>(el),
        Some("alco") => Offer::from_xml_as::<AlcoholOffer>(el),
        Some(other) => Err(ParseError::UnexpectedOfferType(other.to_string()).into()),
    }
}

fn validate_url(url: String) -> std::result::Result<String, ValidationError> {
    match url.chars().count() > URL_MAX_LENGTH {
        true => Err(ValidationError::MaxLength {
            attr: "url".into(),
            max: URL_MAX_LENGTH,
        }),
        false => Ok(url),
    }
}

/// The whole catalog of a shop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shop {
    pub name: String,
    pub company: String,
    url: String,
    pub platform: Option<String>,
    pub version: Option<String>,
    pub agency: Option<String>,
    pub email: Option<String>,
    pub currencies: Vec<Currency>,
    pub categories: Vec<Category>,
    pub delivery_options: OptionList,
    pub pickup_options: OptionList,
    enable_auto_discounts: EnableAutoDiscounts,
    pub offers: Vec<Offer>,
    pub gifts: Vec<Gift>,
    pub promos: Vec<Promo>,
}

impl Shop {
    pub fn new(
        name: impl Into<String>,
        company: impl Into<String>,
        url: impl Into<String>,
    ) -> std::result::Result<Self, ValidationError> {
        Ok(Shop {
            name: name.into(),
            company: company.into(),
            url: validate_url(url.into())?,
            platform: None,
            version: None,
            agency: None,
            email: None,
            currencies: Vec::new(),
            categories: Vec::new(),
            delivery_options: OptionList::default(),
            pickup_options: OptionList::default(),
            enable_auto_discounts: EnableAutoDiscounts::default(),
            offers: Vec::new(),
            gifts: Vec::new(),
            promos: Vec::new(),
        })
    }

    pub fn with_enable_auto_discounts(
        mut self,
        value: impl Into<Scalar>,
    ) -> std::result::Result<Self, ValidationError> {
        self.enable_auto_discounts = EnableAutoDiscounts::new(Some(value.into()))?;
        Ok(self)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn enable_auto_discounts(&self) -> Option<bool> {
        self.enable_auto_discounts.get()
    }
}

fn parse_all<T: XmlModel>(container: &Element, tag: &str) -> Result<Vec<T>> {
    container.find_all(tag).map(T::from_xml).collect()
}

impl XmlModel for Shop {
    fn create_xml(&self) -> Element {
        let mut el = Element::new("shop");
        el.text_element("name", self.name.as_str());
        el.text_element("company", self.company.as_str());
        el.text_element("url", self.url.as_str());
        for (tag, value) in [
            ("platform", &self.platform),
            ("version", &self.version),
            ("agency", &self.agency),
            ("email", &self.email),
        ] {
            if let Some(value) = value {
                el.text_element(tag, value.as_str());
            }
        }
        self.enable_auto_discounts.write_xml(&mut el);

        let currencies = el.sub_element("currencies");
        for currency in &self.currencies {
            currency.to_xml_in(currencies);
        }

        let categories = el.sub_element("categories");
        for category in &self.categories {
            category.to_xml_in(categories);
        }

        self.delivery_options.write_xml(&mut el, DELIVERY_OPTIONS_TAG);
        self.pickup_options.write_xml(&mut el, PICKUP_OPTIONS_TAG);

        let offers = el.sub_element("offers");
        for offer in &self.offers {
            offer.to_xml_in(offers);
        }

        if !self.gifts.is_empty() {
            let gifts = el.sub_element("gifts");
            for gift in &self.gifts {
                gift.to_xml_in(gifts);
            }
        }

        if !self.promos.is_empty() {
            let promos = el.sub_element("promos");
            for promo in &self.promos {
                promo.to_xml_in(promos);
            }
        }
        el
    }

    fn from_xml(el: &Element) -> Result<Self> {
        let text = |tag: &str| -> Result<String> {
            Ok(el.required_child(tag)?.text().unwrap_or_default().to_string())
        };
        let optional_text = |tag: &str| el.find(tag).and_then(Element::text).map(str::to_string);

        let mut shop = Shop::new(text("name")?, text("company")?, text("url")?)?;
        shop.platform = optional_text("platform");
        shop.version = optional_text("version");
        shop.agency = optional_text("agency");
        shop.email = optional_text("email");

        for child in &el.children {
            match child.tag.as_str() {
                "enable_auto_discounts" => {
                    shop.enable_auto_discounts =
                        EnableAutoDiscounts::new(child.text().map(Scalar::from))?
                }
                "currencies" => shop.currencies = parse_all(child, "currency")?,
                "categories" => shop.categories = parse_all(child, "category")?,
                DELIVERY_OPTIONS_TAG => shop.delivery_options = OptionList::from_xml(child)?,
                PICKUP_OPTIONS_TAG => shop.pickup_options = OptionList::from_xml(child)?,
                "offers" => shop.offers = parse_all(child, "offer")?,
                "gifts" => shop.gifts = parse_all(child, "gift")?,
                "promos" => shop.promos = parse_all(child, "promo")?,
                _ => (),
            }
        }
        debug!(
            "Parsed shop {} with {} offers in {} categories",
            shop.name,
            shop.offers.len(),
            shop.categories.len()
        );
        Ok(shop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::YmlError;
    use crate::models::offers::OfferBuilder;
    use crate::models::option::ShippingOption;
    use crate::models::price::Price;
    use crate::models::promo::{Product, PromoGift, Purchase};

    fn offer(id: &str, name: &str) -> Offer {
        let base = OfferBuilder::new(id)
            .url("http://x")
            .price(Price::new(9.99, false).unwrap())
            .build()
            .unwrap();
        Offer::new(base, SimplifiedOffer::new(name))
    }

    fn shop() -> Shop {
        let mut shop = Shop::new("BestSeller", "Tne Best inc.", "http://best.seller.ru")
            .unwrap()
            .with_enable_auto_discounts("yes")
            .unwrap();
        shop.platform = Some("CMS".into());
        shop.version = Some("2.3".into());
        shop.email = Some("info@best.seller.ru".into());
        shop.currencies = vec![Currency::new("RUB", "CBRF", None).unwrap()];
        shop.categories = vec![
            Category::new("1", "Root", None),
            Category::new("2", "Phones", Some("1".into())),
        ];
        shop.delivery_options = OptionList::from(vec![ShippingOption::new("200", "1", None)]);
        shop.offers = vec![offer("100", "Widget"), offer("101", "Gadget")];
        shop.gifts = vec![Gift::new("g1", "Mug", vec![])];
        shop.promos = vec![Promo {
            promo_id: "p1".into(),
            promo_type: "gift with purchase".into(),
            start_date: None,
            end_date: None,
            description: None,
            url: None,
            purchase: Purchase::new(vec![Product::new(Some("100".into()), None)], None).unwrap(),
            promo_gifts: vec![PromoGift::gift("g1")],
        }];
        shop
    }

    #[test]
    fn to_xml_order() {
        let el = shop().to_xml();
        let tags: Vec<&str> = el.children.iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(
            tags,
            vec![
                "name",
                "company",
                "url",
                "platform",
                "version",
                "email",
                "enable_auto_discounts",
                "currencies",
                "categories",
                "delivery-options",
                "offers",
                "gifts",
                "promos"
            ]
        );
        assert_eq!(el.find("offers").unwrap().children.len(), 2);
    }

    #[test]
    fn empty_collections_still_write_containers() {
        let el = Shop::new("S", "C", "http://s").unwrap().to_xml();
        assert!(el.find("currencies").is_some());
        assert!(el.find("categories").is_some());
        assert!(el.find("offers").is_some());
        assert!(el.find("gifts").is_none());
        assert!(el.find("pickup-options").is_none());
    }

    #[test]
    fn from_xml_round_trip() {
        let s = shop();
        let parsed = Shop::from_xml(&s.to_xml()).unwrap();
        assert_eq!(parsed.to_dict(false), s.to_dict(false));
        assert_eq!(parsed, s);
    }

    #[test]
    fn to_dict_clean() {
        let d = Shop::new("S", "C", "http://s").unwrap().to_dict(true);
        let mut keys: Vec<&String> = d.keys().collect();
        keys.sort();
        assert_eq!(keys, vec!["company", "name", "url"]);
    }

    #[test]
    fn url_max_length() {
        let err = Shop::new("S", "C", "h".repeat(513)).unwrap_err();
        assert_eq!(err.to_string(), "The maximum url length is 512 characters.");
        assert_eq!(Shop::new("S", "C", "h".repeat(512)).unwrap().url().len(), 512);
    }

    #[test]
    fn unknown_offer_type() {
        let mut el = shop().to_xml();
        let offers = el.children.iter_mut().find(|c| c.tag == "offers").unwrap();
        offers.children[0].set_attr("type", "unknownvalue");
        let err = Shop::from_xml(&el).unwrap_err();
        assert!(matches!(
            &err,
            YmlError::Parse(ParseError::UnexpectedOfferType(t)) if t == "unknownvalue"
        ));
        assert_eq!(err.to_string(), "Got unexpected offer type: unknownvalue");
    }

    #[test]
    fn offers_are_dispatched_by_type() {
        let xml = r#"<shop>
            <name>S</name><company>C</company><url>http://s</url>
            <currencies/><categories/>
            <offers>
                <offer id="1"><name>Plain</name><price>1</price></offer>
                <offer id="2" type="vendor.model"><price>2</price><vendor>V</vendor><model>M</model></offer>
                <offer id="3" type="book"><price>3</price><name>B</name><page_extent>10</page_extent></offer>
                <offer id="4" type="alco"><price>4</price><name>Wine</name></offer>
            </offers>
        </shop>"#;
        let shop = Shop::from_xml(&Element::parse(xml).unwrap()).unwrap();
        let types: Vec<Option<&str>> = shop.offers.iter().map(Offer::offer_type).collect();
        assert_eq!(types, vec![None, Some("vendor.model"), Some("book"), Some("alco")]);
        assert_eq!(shop.offers[1].base.vendor.as_deref(), Some("V"));
    }

    #[test]
    fn missing_name_is_a_parse_error() {
        let el = Element::parse("<shop><company>C</company><url>u</url></shop>").unwrap();
        assert!(matches!(
            Shop::from_xml(&el),
            Err(YmlError::Parse(ParseError::MissingChild { .. }))
        ));
    }
}
