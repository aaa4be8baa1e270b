//! Reading feeds from files and writing them back.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use encoding_rs::UTF_16LE;
use tracing::{debug, span, Level};

use crate::models::{Feed, XmlModel};
use crate::xml::Element;

/// Decodes a feed, trying UTF-8 first, then the encoding declared in the
/// XML header, then UTF-16 LE.
pub fn decode(buf: Vec<u8>) -> Result<String> {
    let buf = match String::from_utf8(buf) {
        Ok(s) => {
            debug!("Using encoding utf-8");
            return Ok(s);
        }
        Err(e) => e.into_bytes(),
    };

    let (first_line, _, _) = encoding_rs::UTF_8.decode(&buf[..buf.len().min(80)]);
    if first_line.contains("encoding") {
        debug!("Found encoding in first line of file");
        let encoding = first_line
            .split_whitespace()
            .find(|s| s.starts_with("encoding"))
            .and_then(|s| s.split_once('='))
            .ok_or(anyhow!("Couldn't extract encoding"))?
            .1
            .trim_end_matches("?>")
            .trim_matches(|c| c == '"' || c == '\'');
        let encoding = encoding_rs::Encoding::for_label(encoding.as_bytes())
            .ok_or(anyhow!("Couldn't find encoding for {encoding}"))?;

        debug!("Found encoding {}", encoding.name());
        let (decoded, _, _) = encoding.decode(&buf);
        return Ok(decoded.into_owned());
    }

    debug!("Using encoding utf-16 le");
    let (decoded, _, _) = UTF_16LE.decode(&buf);
    Ok(decoded.into_owned())
}

pub fn read_as_utf_8(path: &Path) -> Result<String> {
    let span = span!(Level::DEBUG, "read_as_utf_8", path = %path.display());
    let _enter = span.enter();
    let mut file = File::open(path).with_context(|| format!("Couldn't open {}", path.display()))?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)?;
    decode(buf)
}

/// Parses a feed held in memory.
pub fn parse_str(contents: &str) -> crate::error::Result<Feed> {
    let current = Instant::now();
    let root = Element::parse(contents)?;
    debug!("It took {} ms to parse the file", current.elapsed().as_millis());

    let feed = Feed::from_xml(&root)?;
    debug!("Parsed {} offers", feed.shop.offers.len());
    Ok(feed)
}

/// Parses a feed from any reader, such as an already opened file.
pub fn parse_reader<R: Read>(mut reader: R) -> Result<Feed> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    Ok(parse_str(&decode(buf)?)?)
}

pub fn parse(path: impl AsRef<Path>) -> Result<Feed> {
    let path = path.as_ref();
    let contents = read_as_utf_8(path)?;
    parse_str(&contents).with_context(|| format!("Couldn't parse feed {}", path.display()))
}

/// Writes the feed as UTF-8 XML, tab-indented when `pretty`.
pub fn write_feed<W: Write>(writer: W, feed: &Feed, pretty: bool) -> Result<()> {
    feed.to_xml().write(writer, pretty)?;
    Ok(())
}

pub fn convert(path: impl AsRef<Path>, feed: &Feed, pretty: bool) -> Result<()> {
    let path = path.as_ref();
    let span = span!(Level::DEBUG, "convert", path = %path.display());
    let _enter = span.enter();
    let file = File::create(path).with_context(|| format!("Couldn't create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_feed(&mut writer, feed, pretty)?;
    writer.flush()?;
    debug!("Wrote {} offers", feed.shop.offers.len());
    Ok(())
}
