//! The feed object model. Every entity implements [`XmlModel`].

pub mod age;
pub mod base;
pub mod category;
pub mod condition;
pub mod currency;
pub mod dimensions;
pub mod feed;
pub mod fields;
pub mod gift;
pub mod offers;
pub mod option;
pub mod parameter;
pub mod price;
pub mod promo;
pub mod shop;

pub use age::Age;
pub use base::{Dict, Scalar, XmlModel};
pub use category::Category;
pub use condition::Condition;
pub use currency::Currency;
pub use dimensions::Dimensions;
pub use feed::{Feed, FEED_DATE_FORMAT};
pub use fields::{EnableAutoDiscounts, OptionList, Year};
pub use gift::Gift;
pub use offers::{
    AlcoholOffer, ArbitraryOffer, AudioBookOffer, BookDetails, BookOffer, EventTicketOffer,
    MedicineOffer, MusicVideoOffer, Offer, OfferBase, OfferBuilder, OfferKind, OfferVariant,
    SimplifiedOffer, TextField, EVENT_DATE_FORMAT, EXPIRY_FORMAT,
};
pub use option::ShippingOption;
pub use parameter::Parameter;
pub use price::Price;
pub use promo::{Product, Promo, PromoGift, Purchase};
pub use shop::Shop;
