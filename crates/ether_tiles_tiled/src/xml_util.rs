//! Small helpers over the xml-rs event stream

use ether_tiles_core::TilesetError;
use std::io::Read;
use std::str::FromStr;
use xml::attribute::OwnedAttribute;
use xml::reader::{EventReader, XmlEvent};

pub(crate) fn next_event<R: Read>(parser: &mut EventReader<R>) -> Result<XmlEvent, TilesetError> {
    parser
        .next()
        .map_err(|e| TilesetError::malformed(format!("XML error: {}", e)))
}

/// Advance to the root element and return its name and attributes
pub(crate) fn root_element<R: Read>(
    parser: &mut EventReader<R>,
) -> Result<(String, Vec<OwnedAttribute>), TilesetError> {
    loop {
        match next_event(parser)? {
            XmlEvent::StartElement {
                name, attributes, ..
            } => return Ok((name.local_name, attributes)),
            XmlEvent::EndDocument => {
                return Err(TilesetError::malformed("document has no root element"))
            }
            _ => {}
        }
    }
}

/// Walk the children of the current element until its closing tag, calling
/// `on_open` for each direct child. The handler must consume the child
/// completely (parse it or [`skip_element`] it).
pub(crate) fn parse_tag<R, F>(
    parser: &mut EventReader<R>,
    close_tag: &str,
    mut on_open: F,
) -> Result<(), TilesetError>
where
    R: Read,
    F: FnMut(&mut EventReader<R>, &str, Vec<OwnedAttribute>) -> Result<(), TilesetError>,
{
    loop {
        match next_event(parser)? {
            XmlEvent::StartElement {
                name, attributes, ..
            } => on_open(parser, &name.local_name, attributes)?,
            XmlEvent::EndElement { name } if name.local_name == close_tag => return Ok(()),
            XmlEvent::EndDocument => {
                return Err(TilesetError::malformed(format!(
                    "document ended inside <{}>",
                    close_tag
                )))
            }
            _ => {}
        }
    }
}

/// Consume an element we do not interpret, including all its descendants
pub(crate) fn skip_element<R: Read>(parser: &mut EventReader<R>) -> Result<(), TilesetError> {
    let mut depth = 1usize;
    while depth > 0 {
        match next_event(parser)? {
            XmlEvent::StartElement { .. } => depth += 1,
            XmlEvent::EndElement { .. } => depth -= 1,
            XmlEvent::EndDocument => {
                return Err(TilesetError::malformed("document ended inside an element"))
            }
            _ => {}
        }
    }
    Ok(())
}

/// Collect the text content of the current element. Child elements are
/// reported through `on_child` which decides whether they are allowed.
pub(crate) fn read_text<R, F>(
    parser: &mut EventReader<R>,
    close_tag: &str,
    mut on_child: F,
) -> Result<String, TilesetError>
where
    R: Read,
    F: FnMut(&mut EventReader<R>, &str) -> Result<(), TilesetError>,
{
    let mut text = String::new();
    loop {
        match next_event(parser)? {
            XmlEvent::Characters(s) | XmlEvent::CData(s) => text.push_str(&s),
            XmlEvent::Whitespace(s) => text.push_str(&s),
            XmlEvent::StartElement { name, .. } => on_child(parser, &name.local_name)?,
            XmlEvent::EndElement { name } if name.local_name == close_tag => return Ok(text),
            XmlEvent::EndDocument => {
                return Err(TilesetError::malformed(format!(
                    "document ended inside <{}>",
                    close_tag
                )))
            }
            _ => {}
        }
    }
}

/// Attributes of one element with typed, error-reporting accessors
pub(crate) struct Attrs {
    element: String,
    attrs: Vec<OwnedAttribute>,
}

impl Attrs {
    pub(crate) fn new(element: &str, attrs: Vec<OwnedAttribute>) -> Self {
        Self {
            element: element.to_string(),
            attrs,
        }
    }

    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.name.local_name == name)
            .map(|attr| attr.value.as_str())
    }

    pub(crate) fn required_str(&self, name: &str) -> Result<&str, TilesetError> {
        self.get(name).ok_or_else(|| {
            TilesetError::malformed(format!(
                "<{}> is missing required attribute '{}'",
                self.element, name
            ))
        })
    }

    pub(crate) fn required<T: FromStr>(&self, name: &str) -> Result<T, TilesetError> {
        let raw = self.required_str(name)?;
        self.parse_value(name, raw)
    }

    pub(crate) fn optional<T: FromStr>(&self, name: &str) -> Result<Option<T>, TilesetError> {
        self.get(name)
            .map(|raw| self.parse_value(name, raw))
            .transpose()
    }

    fn parse_value<T: FromStr>(&self, name: &str, raw: &str) -> Result<T, TilesetError> {
        raw.trim().parse().map_err(|_| {
            TilesetError::malformed(format!(
                "attribute '{}' of <{}> has invalid value '{}'",
                name, self.element, raw
            ))
        })
    }
}
