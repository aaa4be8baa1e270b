use serde::Serialize;

use super::base::XmlModel;
use crate::error::Result;
use crate::xml::Element;

/// A gift that is not sold in the shop itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gift {
    pub id: String,
    pub name: String,
    pub pictures: Vec<String>,
}

impl Gift {
    pub fn new(id: impl Into<String>, name: impl Into<String>, pictures: Vec<String>) -> Self {
        Gift {
            id: id.into(),
            name: name.into(),
            pictures,
        }
    }
}

impl XmlModel for Gift {
    fn create_xml(&self) -> Element {
        let mut el = Element::new("gift").with_attr("id", self.id.as_str());
        el.text_element("name", self.name.as_str());
        for url in &self.pictures {
            el.text_element("picture", url.as_str());
        }
        el
    }

    fn from_xml(el: &Element) -> Result<Self> {
        let mut name = String::new();
        let mut pictures = Vec::new();
        for child in &el.children {
            match child.tag.as_str() {
                "name" => name = child.text().unwrap_or_default().to_string(),
                "picture" => pictures.extend(child.text().map(str::to_string)),
                _ => (),
            }
        }
        Ok(Gift::new(el.required_attr("id")?, name, pictures))
    }
}
