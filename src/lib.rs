//! Typed object model for Yandex Market Language (YML) feeds.
//!
//! ```no_run
//! let feed = yandex_market_language::parse("feed.xml")?;
//! yandex_market_language::convert("copy.xml", &feed, true)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod error;
pub mod models;
pub mod xml;
pub mod yml;

pub use error::{ParseError, Result, ValidationError, YmlError};
pub use models::*;
pub use yml::{convert, parse, parse_reader, parse_str, read_as_utf_8, write_feed};
