use chrono::{Local, NaiveDateTime};
use serde::Serialize;

use super::base::{validate_datetime, Scalar, XmlModel};
use super::shop::Shop;
use crate::error::{ParseError, Result, ValidationError};
use crate::xml::Element;

pub const FEED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";
const ROOT_TAG: &str = "yml_catalog";

/// The `<yml_catalog>` document: one shop and the time it was generated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feed {
    pub shop: Shop,
    date: String,
}

impl Feed {
    /// Without a date the feed is stamped with the current local time.
    pub fn new(shop: Shop, date: Option<Scalar>) -> std::result::Result<Self, ValidationError> {
        let date = match validate_datetime(date.as_ref(), FEED_DATE_FORMAT, "date", true)? {
            Some(date) => date,
            None => Local::now().format(FEED_DATE_FORMAT).to_string(),
        };
        Ok(Feed { shop, date })
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn datetime(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.date, FEED_DATE_FORMAT).ok()
    }
}

impl XmlModel for Feed {
    fn create_xml(&self) -> Element {
        let mut el = Element::new(ROOT_TAG).with_attr("date", self.date.as_str());
        self.shop.to_xml_in(&mut el);
        el
    }

    fn from_xml(el: &Element) -> Result<Self> {
        if el.tag != ROOT_TAG {
            return Err(ParseError::UnexpectedRoot {
                expected: ROOT_TAG.into(),
                got: el.tag.clone(),
            }
            .into());
        }
        let shop = Shop::from_xml(el.required_child("shop")?)?;
        Ok(Feed::new(shop, el.attr("date").map(Scalar::from))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::YmlError;
    use chrono::NaiveDate;

    fn shop() -> Shop {
        Shop::new("BestSeller", "Tne Best inc.", "http://best.seller.ru").unwrap()
    }

    #[test]
    fn date_defaults_to_now() {
        let feed = Feed::new(shop(), None).unwrap();
        assert!(feed.datetime().is_some());
        assert_eq!(feed.date().len(), "2020-01-01 00:00".len());
    }

    #[test]
    fn date_from_datetime_or_string() {
        let dt = NaiveDate::from_ymd_opt(2019, 11, 1)
            .unwrap()
            .and_hms_opt(17, 22, 0)
            .unwrap();
        assert_eq!(Feed::new(shop(), Some(dt.into())).unwrap().date(), "2019-11-01 17:22");
        let feed = Feed::new(shop(), Some("2019-11-01 17:22".into())).unwrap();
        assert_eq!(feed.datetime(), Some(dt));
        assert!(Feed::new(shop(), Some("01.11.2019".into())).is_err());
    }

    #[test]
    fn to_xml() {
        let el = Feed::new(shop(), Some("2020-02-02 10:00".into())).unwrap().to_xml();
        assert_eq!(el.tag, "yml_catalog");
        assert_eq!(el.attr("date"), Some("2020-02-02 10:00"));
        assert_eq!(el.children.len(), 1);
        assert_eq!(el.children[0].tag, "shop");
    }

    #[test]
    fn from_xml_round_trip() {
        let feed = Feed::new(shop(), Some("2020-02-02 10:00".into())).unwrap();
        let parsed = Feed::from_xml(&feed.to_xml()).unwrap();
        assert_eq!(parsed.to_dict(false), feed.to_dict(false));
    }

    #[test]
    fn wrong_root_is_rejected() {
        let el = Element::new("catalog");
        assert!(matches!(
            Feed::from_xml(&el),
            Err(YmlError::Parse(ParseError::UnexpectedRoot { .. }))
        ));
    }
}
