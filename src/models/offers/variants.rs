use serde::Serialize;

use super::{OfferKind, OfferVariant, SubtypeFields};
use crate::error::ValidationError;
use crate::models::base::{coerce_int, validate_datetime, Scalar};
use crate::models::fields::Year;

pub const EVENT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

macro_rules! into_kind {
    ($($variant:ident => $ty:ty),* $(,)?) => {$(
        impl From<$ty> for OfferKind {
            fn from(offer: $ty) -> Self {
                OfferKind::$variant(offer)
            }
        }
    )*};
}

into_kind!(
    Simplified => SimplifiedOffer,
    Arbitrary => ArbitraryOffer,
    Book => BookOffer,
    AudioBook => AudioBookOffer,
    MusicVideo => MusicVideoOffer,
    Medicine => MedicineOffer,
    EventTicket => EventTicketOffer,
    Alcohol => AlcoholOffer,
);

fn optional_int(fields: &mut SubtypeFields, tag: &str) -> Result<Option<i64>, ValidationError> {
    coerce_int(fields.scalar(tag).as_ref(), tag, true)
}

fn int_text(value: Option<i64>) -> Option<String> {
    value.map(|v| v.to_string())
}

/// Offer with just a name, the default when `type` is absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimplifiedOffer {
    pub name: String,
}

impl SimplifiedOffer {
    pub fn new(name: impl Into<String>) -> Self {
        SimplifiedOffer { name: name.into() }
    }
}

impl OfferVariant for SimplifiedOffer {
    const TYPE: Option<&'static str> = None;

    fn from_fields(fields: &mut SubtypeFields) -> Result<Self, ValidationError> {
        Ok(SimplifiedOffer::new(fields.required("name")?))
    }

    fn text_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![("name", Some(self.name.clone()))]
    }
}

/// `vendor.model` offer: the name is built from type prefix, vendor and model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArbitraryOffer {
    pub model: String,
    pub type_prefix: Option<String>,
}

impl ArbitraryOffer {
    pub fn new(model: impl Into<String>) -> Self {
        ArbitraryOffer {
            model: model.into(),
            type_prefix: None,
        }
    }
}

impl OfferVariant for ArbitraryOffer {
    const TYPE: Option<&'static str> = Some("vendor.model");

    fn from_fields(fields: &mut SubtypeFields) -> Result<Self, ValidationError> {
        Ok(ArbitraryOffer {
            model: fields.required("model")?,
            type_prefix: fields.take("typePrefix"),
        })
    }

    fn text_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("model", Some(self.model.clone())),
            ("typePrefix", self.type_prefix.clone()),
        ]
    }
}

/// Bibliographic fields shared by printed books and audiobooks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookDetails {
    pub name: String,
    pub publisher: Option<String>,
    pub isbn: Option<String>,
    pub author: Option<String>,
    pub series: Option<String>,
    pub year: Year,
    pub volume: Option<i64>,
    pub part: Option<i64>,
    pub language: Option<String>,
    pub table_of_contents: Option<String>,
}

impl BookDetails {
    pub fn new(name: impl Into<String>) -> Self {
        BookDetails {
            name: name.into(),
            ..Default::default()
        }
    }

    fn from_fields(fields: &mut SubtypeFields) -> Result<Self, ValidationError> {
        Ok(BookDetails {
            name: fields.required("name")?,
            publisher: fields.take("publisher"),
            isbn: fields.take("ISBN"),
            author: fields.take("author"),
            series: fields.take("series"),
            year: Year::new(fields.scalar("year"))?,
            volume: optional_int(fields, "volume")?,
            part: optional_int(fields, "part")?,
            language: fields.take("language"),
            table_of_contents: fields.take("table_of_contents"),
        })
    }

    fn text_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("name", Some(self.name.clone())),
            ("publisher", self.publisher.clone()),
            ("ISBN", self.isbn.clone()),
            ("author", self.author.clone()),
            ("series", self.series.clone()),
            ("year", self.year.canonical().map(str::to_string)),
            ("volume", int_text(self.volume)),
            ("part", int_text(self.part)),
            ("language", self.language.clone()),
            ("table_of_contents", self.table_of_contents.clone()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookOffer {
    #[serde(flatten)]
    pub book: BookDetails,
    pub binding: Option<String>,
    page_extent: Option<i64>,
}

impl BookOffer {
    pub fn new(
        book: BookDetails,
        binding: Option<String>,
        page_extent: Option<Scalar>,
    ) -> Result<Self, ValidationError> {
        let page_extent = coerce_int(page_extent.as_ref(), "page_extent", true)?;
        if page_extent.is_some_and(|p| p <= 0) {
            return Err(ValidationError::NotPositive {
                attr: "page_extent".into(),
            });
        }
        Ok(BookOffer {
            book,
            binding,
            page_extent,
        })
    }

    pub fn page_extent(&self) -> Option<i64> {
        self.page_extent
    }
}

impl OfferVariant for BookOffer {
    const TYPE: Option<&'static str> = Some("book");

    fn from_fields(fields: &mut SubtypeFields) -> Result<Self, ValidationError> {
        let book = BookDetails::from_fields(fields)?;
        BookOffer::new(book, fields.take("binding"), fields.scalar("page_extent"))
    }

    fn text_fields(&self) -> Vec<(&'static str, Option<String>)> {
        let mut fields = self.book.text_fields();
        fields.push(("binding", self.binding.clone()));
        fields.push(("page_extent", int_text(self.page_extent)));
        fields
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AudioBookOffer {
    #[serde(flatten)]
    pub book: BookDetails,
    pub performed_by: Option<String>,
    pub performance_type: Option<String>,
    pub storage: Option<String>,
    pub audio_format: Option<String>,
    pub recording_length: Option<String>,
}

impl AudioBookOffer {
    pub fn new(book: BookDetails) -> Self {
        AudioBookOffer {
            book,
            ..Default::default()
        }
    }
}

impl OfferVariant for AudioBookOffer {
    const TYPE: Option<&'static str> = Some("audiobook");

    fn from_fields(fields: &mut SubtypeFields) -> Result<Self, ValidationError> {
        Ok(AudioBookOffer {
            book: BookDetails::from_fields(fields)?,
            performed_by: fields.take("performed_by"),
            performance_type: fields.take("performance_type"),
            storage: fields.take("storage"),
            audio_format: fields.take("format"),
            recording_length: fields.take("recording_length"),
        })
    }

    fn text_fields(&self) -> Vec<(&'static str, Option<String>)> {
        let mut fields = self.book.text_fields();
        fields.extend([
            ("performed_by", self.performed_by.clone()),
            ("performance_type", self.performance_type.clone()),
            ("storage", self.storage.clone()),
            ("format", self.audio_format.clone()),
            ("recording_length", self.recording_length.clone()),
        ]);
        fields
    }
}

/// `artist.title` offer for music and video records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MusicVideoOffer {
    pub artist: Option<String>,
    pub title: String,
    pub year: Year,
    pub media: Option<String>,
    pub starring: Option<String>,
    pub director: Option<String>,
    pub original_name: Option<String>,
    pub country: Option<String>,
}

impl MusicVideoOffer {
    pub fn new(title: impl Into<String>) -> Self {
        MusicVideoOffer {
            title: title.into(),
            ..Default::default()
        }
    }
}

impl OfferVariant for MusicVideoOffer {
    const TYPE: Option<&'static str> = Some("artist.title");

    fn from_fields(fields: &mut SubtypeFields) -> Result<Self, ValidationError> {
        Ok(MusicVideoOffer {
            artist: fields.take("artist"),
            title: fields.required("title")?,
            year: Year::new(fields.scalar("year"))?,
            media: fields.take("media"),
            starring: fields.take("starring"),
            director: fields.take("director"),
            original_name: fields.take("originalName"),
            country: fields.take("country"),
        })
    }

    fn text_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("artist", self.artist.clone()),
            ("title", Some(self.title.clone())),
            ("year", self.year.canonical().map(str::to_string)),
            ("media", self.media.clone()),
            ("starring", self.starring.clone()),
            ("director", self.director.clone()),
            ("originalName", self.original_name.clone()),
            ("country", self.country.clone()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MedicineOffer {
    pub name: String,
}

impl MedicineOffer {
    pub fn new(name: impl Into<String>) -> Self {
        MedicineOffer { name: name.into() }
    }
}

impl OfferVariant for MedicineOffer {
    const TYPE: Option<&'static str> = Some("medicine");

    fn from_fields(fields: &mut SubtypeFields) -> Result<Self, ValidationError> {
        Ok(MedicineOffer::new(fields.required("name")?))
    }

    fn text_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![("name", Some(self.name.clone()))]
    }
}

/// Ticket to a concert, a show or another event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventTicketOffer {
    pub name: String,
    pub place: String,
    date: String,
    pub hall: Option<String>,
    pub hall_part: Option<String>,
    pub is_premiere: Option<bool>,
    pub is_kids: Option<bool>,
}

impl EventTicketOffer {
    pub fn new(
        name: impl Into<String>,
        place: impl Into<String>,
        date: impl Into<Scalar>,
    ) -> Result<Self, ValidationError> {
        let date = validate_datetime(Some(&date.into()), EVENT_DATE_FORMAT, "date", false)?
            .ok_or_else(|| ValidationError::required("date"))?;
        Ok(EventTicketOffer {
            name: name.into(),
            place: place.into(),
            date,
            hall: None,
            hall_part: None,
            is_premiere: None,
            is_kids: None,
        })
    }

    pub fn date(&self) -> &str {
        &self.date
    }
}

// Event flags are written as 1 or 0.
fn flag(fields: &mut SubtypeFields, tag: &str) -> Result<Option<bool>, ValidationError> {
    Ok(optional_int(fields, tag)?.map(|v| v != 0))
}

fn flag_text(value: Option<bool>) -> Option<String> {
    int_text(value.map(i64::from))
}

impl OfferVariant for EventTicketOffer {
    const TYPE: Option<&'static str> = Some("event-ticket");

    fn from_fields(fields: &mut SubtypeFields) -> Result<Self, ValidationError> {
        let mut ticket = EventTicketOffer::new(
            fields.required("name")?,
            fields.required("place")?,
            fields.required("date")?,
        )?;
        ticket.hall = fields.take("hall");
        ticket.hall_part = fields.take("hall_part");
        ticket.is_premiere = flag(fields, "is_premiere")?;
        ticket.is_kids = flag(fields, "is_kids")?;
        Ok(ticket)
    }

    fn text_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("name", Some(self.name.clone())),
            ("place", Some(self.place.clone())),
            ("date", Some(self.date.clone())),
            ("hall", self.hall.clone()),
            ("hall_part", self.hall_part.clone()),
            ("is_premiere", flag_text(self.is_premiere)),
            ("is_kids", flag_text(self.is_kids)),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlcoholOffer {
    pub name: String,
}

impl AlcoholOffer {
    pub fn new(name: impl Into<String>) -> Self {
        AlcoholOffer { name: name.into() }
    }
}

impl OfferVariant for AlcoholOffer {
    const TYPE: Option<&'static str> = Some("alco");

    fn from_fields(fields: &mut SubtypeFields) -> Result<Self, ValidationError> {
        Ok(AlcoholOffer::new(fields.required("name")?))
    }

    fn text_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![("name", Some(self.name.clone()))]
    }
}
