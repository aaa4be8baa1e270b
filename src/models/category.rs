use serde::Serialize;

use super::base::XmlModel;
use crate::error::Result;
use crate::xml::Element;

/// Catalog category, `<category id="..." parentId="...">Name</category>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    #[serde(rename = "id")]
    pub category_id: String,
    pub name: String,
    pub parent_id: Option<String>,
}

impl Category {
    pub fn new(category_id: impl Into<String>, name: impl Into<String>, parent_id: Option<String>) -> Self {
        Category {
            category_id: category_id.into(),
            name: name.into(),
            parent_id,
        }
    }
}

impl XmlModel for Category {
    fn create_xml(&self) -> Element {
        let mut el = Element::new("category").with_attr("id", self.category_id.as_str());
        if let Some(parent_id) = &self.parent_id {
            el.set_attr("parentId", parent_id.as_str());
        }
        el.with_text(self.name.as_str())
    }

    fn from_xml(el: &Element) -> Result<Self> {
        Ok(Category::new(
            el.required_attr("id")?,
            el.text().unwrap_or_default(),
            el.attr("parentId").map(str::to_string),
        ))
    }
}
