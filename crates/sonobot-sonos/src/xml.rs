//! XML helpers: SOAP response fields and DIDL-Lite metadata.

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;

/// Extracts the text content of the first element with the given local name
/// (namespace prefixes ignored), with entities decoded once.
///
/// ```ignore
/// let xml = r#"<u:CurrentVolume>42</u:CurrentVolume>"#;
/// assert_eq!(extract_xml_text(xml, "CurrentVolume"), Some("42".to_string()));
/// ```
pub fn extract_xml_text(xml: &str, element_name: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    let target = element_name.as_bytes();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == target => {
                return Some(read_inner_text(&mut reader));
            }
            Ok(Event::Empty(e)) if e.local_name().as_ref() == target => {
                return Some(String::new());
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}

/// Reads text up to the end tag matching the start tag just consumed.
fn read_inner_text(reader: &mut Reader<&[u8]>) -> String {
    let mut out = String::new();
    let mut depth = 0usize;
    loop {
        match reader.read_event() {
            Ok(Event::Text(t)) => out.push_str(&decode_text(&t)),
            Ok(Event::CData(c)) => out.push_str(&String::from_utf8_lossy(&c)),
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }
    out
}

fn decode_text(t: &BytesText<'_>) -> String {
    let raw = String::from_utf8_lossy(t);
    html_escape::decode_html_entities(&raw).into_owned()
}

fn attr(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == name)
        .map(|a| {
            let raw = String::from_utf8_lossy(&a.value);
            html_escape::decode_html_entities(&raw).into_owned()
        })
}

/// Escapes the five XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// One `<item>` or `<container>` of a DIDL-Lite document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DidlItem {
    pub id: String,
    pub title: String,
    pub creator: String,
    pub album: String,
    pub res: String,
}

/// Parse every item/container of a DIDL-Lite document, in document order.
///
/// Unparseable input yields the items read before the error.
pub fn parse_didl(xml: &str) -> Vec<DidlItem> {
    let mut reader = Reader::from_str(xml);
    let mut items = Vec::new();
    let mut current: Option<DidlItem> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"item" | b"container" => {
                    current = Some(DidlItem {
                        id: attr(&e, b"id").unwrap_or_default(),
                        ..DidlItem::default()
                    });
                }
                field @ (b"title" | b"creator" | b"album" | b"res") => {
                    let field = field.to_vec();
                    let text = read_inner_text(&mut reader).trim().to_string();
                    if let Some(item) = current.as_mut() {
                        match field.as_slice() {
                            b"title" => item.title = text,
                            b"creator" => item.creator = text,
                            b"album" => item.album = text,
                            _ => item.res = text,
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(e)) if matches!(e.local_name().as_ref(), b"item" | b"container") => {
                items.push(DidlItem {
                    id: attr(&e, b"id").unwrap_or_default(),
                    ..DidlItem::default()
                });
            }
            Ok(Event::End(e)) if matches!(e.local_name().as_ref(), b"item" | b"container") => {
                if let Some(item) = current.take() {
                    items.push(item);
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
    }

    items
}

/// Parse a UPnP `H:MM:SS` time (`TrackDuration`, `RelTime`) into seconds.
/// `NOT_IMPLEMENTED` and other junk read as 0.
pub fn parse_hms(value: &str) -> u64 {
    let parts: Vec<&str> = value.trim().split(':').collect();
    if parts.len() != 3 {
        return 0;
    }
    let nums: Option<Vec<u64>> = parts
        .iter()
        .map(|p| p.split('.').next().unwrap_or("").parse().ok())
        .collect();
    match nums.as_deref() {
        Some([h, m, s]) => h * 3600 + m * 60 + s,
        _ => 0,
    }
}
