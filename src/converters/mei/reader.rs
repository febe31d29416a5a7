//! Depth-first markup event stream
//!
//! Pulls the document through quick-xml and reports each element boundary once,
//! in document order. Names are namespace-stripped (`mei:note` → `note`,
//! `xml:id` → `id`). An element's direct text is only complete once its end
//! tag is read, so it is attached to the `End` event.

use std::collections::BTreeMap;

use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::Reader;

use super::errors::{ConversionError, MalformedInput};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    /// Trimmed direct text; only set on `End`
    pub text: Option<String>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn required(&self, name: &str) -> Result<&str, MalformedInput> {
        self.attribute(name).ok_or_else(|| MalformedInput::MissingAttribute {
            element: self.tag.clone(),
            attribute: name.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent {
    Start(Element),
    End(Element),
}

pub struct MarkupReader<'a> {
    reader: Reader<&'a [u8]>,
    open: Vec<Element>,
    /// End half of a self-closing element
    queued: Option<MarkupEvent>,
    done: bool,
}

impl<'a> MarkupReader<'a> {
    pub fn new(xml: &'a str) -> Self {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);
        Self {
            reader,
            open: Vec::new(),
            queued: None,
            done: false,
        }
    }

    fn next_event(&mut self) -> Result<Option<MarkupEvent>, MalformedInput> {
        if let Some(event) = self.queued.take() {
            return Ok(Some(event));
        }

        loop {
            let event = self.reader.read_event().map_err(|e| {
                MalformedInput::Xml(format!("at position {}: {}", self.reader.buffer_position(), e))
            })?;

            match event {
                XmlEvent::Start(start) => {
                    let element = element_from(&start)?;
                    self.open.push(element.clone());
                    return Ok(Some(MarkupEvent::Start(element)));
                }
                XmlEvent::Empty(start) => {
                    let element = element_from(&start)?;
                    self.queued = Some(MarkupEvent::End(element.clone()));
                    return Ok(Some(MarkupEvent::Start(element)));
                }
                XmlEvent::End(_) => {
                    let element = self
                        .open
                        .pop()
                        .ok_or_else(|| MalformedInput::Xml("end tag without start tag".to_string()))?;
                    return Ok(Some(MarkupEvent::End(element)));
                }
                XmlEvent::Text(text) => {
                    let text = text.unescape().map_err(|e| MalformedInput::Xml(e.to_string()))?;
                    self.append_text(&text);
                }
                XmlEvent::CData(data) => {
                    let bytes = data.into_inner();
                    self.append_text(&String::from_utf8_lossy(&bytes));
                }
                XmlEvent::Eof => {
                    if let Some(element) = self.open.last() {
                        return Err(MalformedInput::Xml(format!("unclosed <{}>", element.tag)));
                    }
                    return Ok(None);
                }
                _ => {}
            }
        }
    }

    fn append_text(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        if let Some(element) = self.open.last_mut() {
            match element.text.as_mut() {
                // Chunks split by child elements (`<lb/>`, `<rend>`) read as words
                Some(existing) => {
                    existing.push(' ');
                    existing.push_str(text);
                }
                None => element.text = Some(text.to_string()),
            }
        }
    }
}

impl<'a> Iterator for MarkupReader<'a> {
    type Item = Result<MarkupEvent, ConversionError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_event() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e.into()))
            }
        }
    }
}

fn element_from(start: &BytesStart) -> Result<Element, MalformedInput> {
    let tag = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attributes = BTreeMap::new();

    for attr in start.attributes() {
        let attr = attr.map_err(|e| MalformedInput::Xml(e.to_string()))?;
        let raw_key = attr.key.as_ref();
        if raw_key == b"xmlns" || raw_key.starts_with(b"xmlns:") {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| MalformedInput::Xml(e.to_string()))?
            .into_owned();
        attributes.insert(key, value);
    }

    Ok(Element {
        tag,
        attributes,
        text: None,
    })
}
