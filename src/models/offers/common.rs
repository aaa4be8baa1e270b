//! Fields every offer carries, whatever its type.

use std::collections::HashMap;

use itertools::Itertools;
use lazy_static::lazy_static;
use serde::Serialize;

use crate::error::ValidationError;
use crate::models::age::Age;
use crate::models::base::{
    coerce_int, string_to_bool, typed, validate_bool, validate_datetime, validate_float,
    validate_int, Scalar, XmlModel,
};
use crate::models::condition::Condition;
use crate::models::currency::CURRENCY_CHOICES;
use crate::models::dimensions::Dimensions;
use crate::models::fields::{EnableAutoDiscounts, OptionList, DELIVERY_OPTIONS_TAG, PICKUP_OPTIONS_TAG};
use crate::models::option::ShippingOption;
use crate::models::parameter::Parameter;
use crate::models::price::Price;
use crate::xml::Element;

pub const EXPIRY_FORMAT: &str = "%Y-%m-%dT%H:%M";
const GROUP_ID_MAX_DIGITS: usize = 9;

/// Simple text elements of an offer, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Vendor,
    VendorCode,
    Url,
    OldPrice,
    EnableAutoDiscounts,
    Currency,
    CategoryId,
    Delivery,
    Pickup,
    Store,
    Description,
    SalesNotes,
    MinQuantity,
    ManufacturerWarranty,
    CountryOfOrigin,
    Adult,
    Expiry,
    Weight,
    Downloadable,
    GroupId,
}

impl TextField {
    pub const ALL: [TextField; 20] = [
        TextField::Vendor,
        TextField::VendorCode,
        TextField::Url,
        TextField::OldPrice,
        TextField::EnableAutoDiscounts,
        TextField::Currency,
        TextField::CategoryId,
        TextField::Delivery,
        TextField::Pickup,
        TextField::Store,
        TextField::Description,
        TextField::SalesNotes,
        TextField::MinQuantity,
        TextField::ManufacturerWarranty,
        TextField::CountryOfOrigin,
        TextField::Adult,
        TextField::Expiry,
        TextField::Weight,
        TextField::Downloadable,
        TextField::GroupId,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            TextField::Vendor => "vendor",
            TextField::VendorCode => "vendorCode",
            TextField::Url => "url",
            TextField::OldPrice => "oldprice",
            TextField::EnableAutoDiscounts => "enable_auto_discounts",
            TextField::Currency => "currencyId",
            TextField::CategoryId => "categoryId",
            TextField::Delivery => "delivery",
            TextField::Pickup => "pickup",
            TextField::Store => "store",
            TextField::Description => "description",
            TextField::SalesNotes => "sales_notes",
            TextField::MinQuantity => "min-quantity",
            TextField::ManufacturerWarranty => "manufacturer_warranty",
            TextField::CountryOfOrigin => "country_of_origin",
            TextField::Adult => "adult",
            TextField::Expiry => "expiry",
            TextField::Weight => "weight",
            TextField::Downloadable => "downloadable",
            TextField::GroupId => "group_id",
        }
    }

    pub fn from_tag(tag: &str) -> Option<TextField> {
        BASE_TAGS.get(tag).copied()
    }
}

lazy_static! {
    static ref BASE_TAGS: HashMap<&'static str, TextField> =
        TextField::ALL.iter().map(|field| (field.tag(), *field)).collect();
}

macro_rules! text_setters {
    ($($field:ident),* $(,)?) => {$(
        pub fn $field(mut self, value: impl Into<String>) -> Self {
            self.$field = Some(value.into());
            self
        }
    )*};
}

macro_rules! scalar_setters {
    ($($field:ident),* $(,)?) => {$(
        pub fn $field(mut self, value: impl Into<Scalar>) -> Self {
            self.$field = Some(value.into());
            self
        }
    )*};
}

/// Raw offer fields. Nothing is checked until [`OfferBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct OfferBuilder {
    offer_id: String,
    vendor: Option<String>,
    vendor_code: Option<String>,
    bid: Option<Scalar>,
    url: Option<String>,
    price: Option<Price>,
    old_price: Option<Scalar>,
    enable_auto_discounts: Option<Scalar>,
    currency: Option<String>,
    category_id: Option<String>,
    pictures: Vec<String>,
    supplier: Option<String>,
    delivery: Option<Scalar>,
    pickup: Option<Scalar>,
    delivery_options: Vec<ShippingOption>,
    pickup_options: Vec<ShippingOption>,
    store: Option<Scalar>,
    description: Option<String>,
    sales_notes: Option<String>,
    min_quantity: Option<Scalar>,
    manufacturer_warranty: Option<Scalar>,
    country_of_origin: Option<String>,
    adult: Option<Scalar>,
    barcodes: Vec<String>,
    parameters: Vec<Parameter>,
    condition: Option<Condition>,
    credit_template_id: Option<String>,
    expiry: Option<Scalar>,
    weight: Option<Scalar>,
    dimensions: Option<Dimensions>,
    downloadable: Option<Scalar>,
    available: Option<Scalar>,
    age: Option<Age>,
    group_id: Option<Scalar>,
}

impl OfferBuilder {
    pub fn new(offer_id: impl Into<String>) -> Self {
        OfferBuilder {
            offer_id: offer_id.into(),
            ..Default::default()
        }
    }

    text_setters!(
        vendor,
        vendor_code,
        url,
        currency,
        category_id,
        supplier,
        description,
        sales_notes,
        country_of_origin,
        credit_template_id,
    );

    scalar_setters!(
        bid,
        old_price,
        enable_auto_discounts,
        delivery,
        pickup,
        store,
        min_quantity,
        manufacturer_warranty,
        adult,
        expiry,
        weight,
        downloadable,
        available,
        group_id,
    );

    pub fn price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    pub fn picture(mut self, url: impl Into<String>) -> Self {
        self.pictures.push(url.into());
        self
    }

    pub fn barcode(mut self, barcode: impl Into<String>) -> Self {
        self.barcodes.push(barcode.into());
        self
    }

    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn delivery_options(mut self, options: Vec<ShippingOption>) -> Self {
        self.delivery_options = options;
        self
    }

    pub fn pickup_options(mut self, options: Vec<ShippingOption>) -> Self {
        self.pickup_options = options;
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn age(mut self, age: Age) -> Self {
        self.age = Some(age);
        self
    }

    /// Sets a simple text field as read from an `<offer>` child.
    pub(super) fn set_text(&mut self, field: TextField, text: String) {
        let scalar = Some(Scalar::Str(text.clone()));
        match field {
            TextField::Vendor => self.vendor = Some(text),
            TextField::VendorCode => self.vendor_code = Some(text),
            TextField::Url => self.url = Some(text),
            TextField::OldPrice => self.old_price = scalar,
            TextField::EnableAutoDiscounts => self.enable_auto_discounts = scalar,
            TextField::Currency => self.currency = Some(text),
            TextField::CategoryId => self.category_id = Some(text),
            TextField::Delivery => self.delivery = scalar,
            TextField::Pickup => self.pickup = scalar,
            TextField::Store => self.store = scalar,
            TextField::Description => self.description = Some(text),
            TextField::SalesNotes => self.sales_notes = Some(text),
            TextField::MinQuantity => self.min_quantity = scalar,
            TextField::ManufacturerWarranty => self.manufacturer_warranty = scalar,
            TextField::CountryOfOrigin => self.country_of_origin = Some(text),
            TextField::Adult => self.adult = scalar,
            TextField::Expiry => self.expiry = scalar,
            TextField::Weight => self.weight = scalar,
            TextField::Downloadable => self.downloadable = scalar,
            TextField::GroupId => self.group_id = scalar,
        }
    }

    pub fn build(self) -> Result<OfferBase, ValidationError> {
        let currency = match self.currency.as_deref() {
            None => None,
            Some(c) => Some(
                CURRENCY_CHOICES
                    .iter()
                    .find(|choice| **choice == c)
                    .copied()
                    .ok_or_else(|| ValidationError::Currency {
                        choices: CURRENCY_CHOICES.iter().join(", "),
                    })?,
            ),
        };

        Ok(OfferBase {
            offer_id: self.offer_id,
            vendor: self.vendor,
            vendor_code: self.vendor_code,
            bid: validate_int(self.bid.as_ref(), "bid", true)?,
            url: self.url,
            price: self.price.ok_or_else(|| ValidationError::required("price"))?,
            old_price: validate_float(self.old_price.as_ref(), "old_price", true)?,
            enable_auto_discounts: EnableAutoDiscounts::new(self.enable_auto_discounts)?,
            currency,
            category_id: self.category_id,
            pictures: self.pictures,
            supplier: self.supplier,
            delivery: validate_bool(self.delivery.as_ref(), "delivery", true)?,
            pickup: validate_bool(self.pickup.as_ref(), "pickup", true)?,
            delivery_options: OptionList::from(self.delivery_options),
            pickup_options: OptionList::from(self.pickup_options),
            store: validate_bool(self.store.as_ref(), "store", true)?,
            description: self.description,
            sales_notes: self.sales_notes,
            min_quantity: validate_int(self.min_quantity.as_ref(), "min_quantity", true)?
                .or_else(|| Some("1".to_string())),
            manufacturer_warranty: validate_bool(
                self.manufacturer_warranty.as_ref(),
                "manufacturer_warranty",
                true,
            )?,
            country_of_origin: self.country_of_origin,
            adult: validate_bool(self.adult.as_ref(), "adult", true)?,
            barcodes: self.barcodes,
            parameters: self.parameters,
            condition: self.condition,
            credit_template_id: self.credit_template_id,
            expiry: validate_datetime(self.expiry.as_ref(), EXPIRY_FORMAT, "expiry", true)?,
            weight: validate_float(self.weight.as_ref(), "weight", true)?,
            dimensions: self.dimensions,
            downloadable: validate_bool(self.downloadable.as_ref(), "downloadable", true)?,
            available: validate_bool(self.available.as_ref(), "available", true)?,
            age: self.age,
            group_id: validate_group_id(self.group_id.as_ref())?,
        })
    }

    /// Reads every base field of an `<offer>`. Children that are not base
    /// fields are handed to `other`.
    pub(super) fn from_xml(
        el: &Element,
        mut other: impl FnMut(&Element),
    ) -> crate::error::Result<Self> {
        let mut builder = OfferBuilder::new(el.required_attr("id")?);
        builder.bid = el.attr("bid").map(Scalar::from);
        builder.available = el.attr("available").map(Scalar::from);

        for child in &el.children {
            match child.tag.as_str() {
                "price" => builder.price = Some(Price::from_xml(child)?),
                "picture" => builder.pictures.extend(child.text().map(str::to_string)),
                "supplier" => builder.supplier = child.attr("ogrn").map(str::to_string),
                DELIVERY_OPTIONS_TAG => {
                    builder.delivery_options = OptionList::from_xml(child)?.options().to_vec()
                }
                PICKUP_OPTIONS_TAG => {
                    builder.pickup_options = OptionList::from_xml(child)?.options().to_vec()
                }
                "barcode" => builder.barcodes.extend(child.text().map(str::to_string)),
                "param" => builder.parameters.push(Parameter::from_xml(child)?),
                "condition" => builder.condition = Some(Condition::from_xml(child)?),
                "credit-template" => {
                    builder.credit_template_id = child.attr("id").map(str::to_string)
                }
                "dimensions" => builder.dimensions = Some(Dimensions::from_xml(child)?),
                "age" => builder.age = Some(Age::from_xml(child)?),
                tag => match TextField::from_tag(tag) {
                    Some(field) => builder.set_text(field, child.text().unwrap_or_default().to_string()),
                    None => other(child),
                },
            }
        }
        Ok(builder)
    }
}

fn validate_group_id(value: Option<&Scalar>) -> Result<Option<String>, ValidationError> {
    let group_id = coerce_int(value, "group_id", true).map_err(|_| ValidationError::GroupId)?;
    match group_id.map(|g| g.to_string()) {
        Some(g) if g.trim_start_matches('-').len() > GROUP_ID_MAX_DIGITS => Err(ValidationError::GroupId),
        g => Ok(g),
    }
}

/// Validated fields shared by all offer types. Scalar fields are kept in
/// their wire form and exposed through typed getters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferBase {
    pub offer_id: String,
    pub vendor: Option<String>,
    pub vendor_code: Option<String>,
    #[serde(serialize_with = "typed::int")]
    bid: Option<String>,
    pub url: Option<String>,
    pub price: Price,
    #[serde(serialize_with = "typed::float")]
    old_price: Option<String>,
    enable_auto_discounts: EnableAutoDiscounts,
    currency: Option<&'static str>,
    pub category_id: Option<String>,
    pub pictures: Vec<String>,
    pub supplier: Option<String>,
    #[serde(serialize_with = "typed::boolean_or_true")]
    delivery: Option<String>,
    #[serde(serialize_with = "typed::boolean_or_true")]
    pickup: Option<String>,
    pub delivery_options: OptionList,
    pub pickup_options: OptionList,
    #[serde(serialize_with = "typed::boolean")]
    store: Option<String>,
    pub description: Option<String>,
    pub sales_notes: Option<String>,
    #[serde(serialize_with = "typed::int")]
    min_quantity: Option<String>,
    #[serde(serialize_with = "typed::boolean")]
    manufacturer_warranty: Option<String>,
    pub country_of_origin: Option<String>,
    #[serde(serialize_with = "typed::boolean")]
    adult: Option<String>,
    pub barcodes: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub condition: Option<Condition>,
    pub credit_template_id: Option<String>,
    expiry: Option<String>,
    #[serde(serialize_with = "typed::float")]
    weight: Option<String>,
    pub dimensions: Option<Dimensions>,
    #[serde(serialize_with = "typed::boolean")]
    downloadable: Option<String>,
    #[serde(serialize_with = "typed::boolean")]
    available: Option<String>,
    pub age: Option<Age>,
    #[serde(serialize_with = "typed::int")]
    group_id: Option<String>,
}

impl OfferBase {
    pub fn bid(&self) -> Option<i64> {
        self.bid.as_deref().and_then(|b| b.parse().ok())
    }

    pub fn old_price(&self) -> Option<f64> {
        self.old_price.as_deref().and_then(|p| p.trim().parse().ok())
    }

    pub fn enable_auto_discounts(&self) -> Option<bool> {
        self.enable_auto_discounts.get()
    }

    pub fn currency(&self) -> Option<&str> {
        self.currency
    }

    /// Unset means the offer can be delivered.
    pub fn delivery(&self) -> bool {
        string_to_bool(self.delivery.as_deref()).unwrap_or(true)
    }

    /// Unset means the offer can be picked up.
    pub fn pickup(&self) -> bool {
        string_to_bool(self.pickup.as_deref()).unwrap_or(true)
    }

    pub fn store(&self) -> Option<bool> {
        string_to_bool(self.store.as_deref())
    }

    pub fn min_quantity(&self) -> i64 {
        self.min_quantity
            .as_deref()
            .and_then(|q| q.parse().ok())
            .unwrap_or(1)
    }

    pub fn manufacturer_warranty(&self) -> Option<bool> {
        string_to_bool(self.manufacturer_warranty.as_deref())
    }

    pub fn adult(&self) -> Option<bool> {
        string_to_bool(self.adult.as_deref())
    }

    pub fn expiry(&self) -> Option<&str> {
        self.expiry.as_deref()
    }

    pub fn weight(&self) -> Option<f64> {
        self.weight.as_deref().and_then(|w| w.trim().parse().ok())
    }

    pub fn downloadable(&self) -> Option<bool> {
        string_to_bool(self.downloadable.as_deref())
    }

    pub fn available(&self) -> Option<bool> {
        string_to_bool(self.available.as_deref())
    }

    pub fn group_id(&self) -> Option<i64> {
        self.group_id.as_deref().and_then(|g| g.parse().ok())
    }

    /// Wire form of a simple text field.
    pub fn text_value(&self, field: TextField) -> Option<&str> {
        match field {
            TextField::Vendor => self.vendor.as_deref(),
            TextField::VendorCode => self.vendor_code.as_deref(),
            TextField::Url => self.url.as_deref(),
            TextField::OldPrice => self.old_price.as_deref(),
            TextField::EnableAutoDiscounts => self.enable_auto_discounts.canonical(),
            TextField::Currency => self.currency,
            TextField::CategoryId => self.category_id.as_deref(),
            TextField::Delivery => self.delivery.as_deref(),
            TextField::Pickup => self.pickup.as_deref(),
            TextField::Store => self.store.as_deref(),
            TextField::Description => self.description.as_deref(),
            TextField::SalesNotes => self.sales_notes.as_deref(),
            TextField::MinQuantity => self.min_quantity.as_deref(),
            TextField::ManufacturerWarranty => self.manufacturer_warranty.as_deref(),
            TextField::CountryOfOrigin => self.country_of_origin.as_deref(),
            TextField::Adult => self.adult.as_deref(),
            TextField::Expiry => self.expiry.as_deref(),
            TextField::Weight => self.weight.as_deref(),
            TextField::Downloadable => self.downloadable.as_deref(),
            TextField::GroupId => self.group_id.as_deref(),
        }
    }

    /// `<offer>` with the base attributes; `offer_type` goes second.
    pub(super) fn offer_element(&self, offer_type: Option<&str>) -> Element {
        let mut el = Element::new("offer").with_attr("id", self.offer_id.as_str());
        if let Some(offer_type) = offer_type {
            el.set_attr("type", offer_type);
        }
        if let Some(bid) = &self.bid {
            el.set_attr("bid", bid.as_str());
        }
        if let Some(available) = &self.available {
            el.set_attr("available", available.as_str());
        }
        el
    }

    pub(super) fn write_children(&self, el: &mut Element) {
        for field in TextField::ALL {
            if let Some(value) = self.text_value(field) {
                el.text_element(field.tag(), value);
            }
        }

        self.price.to_xml_in(el);

        for url in &self.pictures {
            el.text_element("picture", url.as_str());
        }

        if let Some(supplier) = &self.supplier {
            el.push(Element::new("supplier").with_attr("ogrn", supplier.as_str()));
        }

        self.delivery_options.write_xml(el, DELIVERY_OPTIONS_TAG);
        self.pickup_options.write_xml(el, PICKUP_OPTIONS_TAG);

        for barcode in &self.barcodes {
            el.text_element("barcode", barcode.as_str());
        }

        for parameter in &self.parameters {
            parameter.to_xml_in(el);
        }

        if let Some(condition) = &self.condition {
            condition.to_xml_in(el);
        }

        if let Some(template) = &self.credit_template_id {
            el.push(Element::new("credit-template").with_attr("id", template.as_str()));
        }

        if let Some(dimensions) = &self.dimensions {
            dimensions.to_xml_in(el);
        }

        if let Some(age) = &self.age {
            age.to_xml_in(el);
        }
    }
}
