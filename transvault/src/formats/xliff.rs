//! XLIFF 1.2 translation files (`messages.en.xlf`).
//!
//! Each `<trans-unit>` contributes one message. The key is the `resname` attribute when
//! present, the `<source>` text otherwise; the text is `<target>`, falling back to
//! `<source>` for untranslated units.

use std::io::{BufRead, Write};

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};

use crate::{error::Error, traits::Parser, types::Messages};

const XLIFF_NAMESPACE: &str = "urn:oasis:names:tc:xliff:document:1.2";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Format {
    /// `source-language` of the first `<file>` element.
    pub source_language: Option<String>,
    /// `target-language` of the first `<file>` element.
    pub target_language: Option<String>,
    pub units: Vec<TransUnit>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransUnit {
    pub id: Option<String>,
    pub resname: Option<String>,
    pub source: String,
    pub target: Option<String>,
}

impl TransUnit {
    pub fn key(&self) -> &str {
        self.resname.as_deref().unwrap_or(&self.source)
    }

    pub fn text(&self) -> &str {
        self.target.as_deref().unwrap_or(&self.source)
    }
}

impl Parser for Format {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);
        xml_reader.config_mut().trim_text(true);

        let mut format = Format::default();
        let mut seen_file = false;
        let mut buf = Vec::new();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(ref e) if e.name().as_ref() == b"file" && !seen_file => {
                    seen_file = true;
                    format.source_language = attribute(e, b"source-language")?;
                    format.target_language = attribute(e, b"target-language")?;
                }
                Event::Start(ref e) if e.name().as_ref() == b"trans-unit" => {
                    let mut unit = TransUnit {
                        id: attribute(e, b"id")?,
                        resname: attribute(e, b"resname")?,
                        ..TransUnit::default()
                    };
                    parse_unit_body(&mut xml_reader, &mut unit)?;
                    format.units.push(unit);
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
        Ok(format)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new_with_indent(&mut writer, b' ', 4);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

        let mut xliff = BytesStart::new("xliff");
        xliff.push_attribute(("version", "1.2"));
        xliff.push_attribute(("xmlns", XLIFF_NAMESPACE));
        xml_writer.write_event(Event::Start(xliff))?;

        let mut file = BytesStart::new("file");
        file.push_attribute((
            "source-language",
            self.source_language.as_deref().unwrap_or("en"),
        ));
        if let Some(target) = &self.target_language {
            file.push_attribute(("target-language", target.as_str()));
        }
        file.push_attribute(("datatype", "plaintext"));
        file.push_attribute(("original", "file.ext"));
        xml_writer.write_event(Event::Start(file))?;
        xml_writer.write_event(Event::Start(BytesStart::new("body")))?;

        for (index, unit) in self.units.iter().enumerate() {
            let id = unit
                .id
                .clone()
                .unwrap_or_else(|| (index + 1).to_string());
            let mut elem = BytesStart::new("trans-unit");
            elem.push_attribute(("id", id.as_str()));
            if let Some(resname) = &unit.resname {
                elem.push_attribute(("resname", resname.as_str()));
            }
            xml_writer.write_event(Event::Start(elem))?;
            write_text_element(&mut xml_writer, "source", &unit.source)?;
            if let Some(target) = &unit.target {
                write_text_element(&mut xml_writer, "target", target)?;
            }
            xml_writer.write_event(Event::End(BytesEnd::new("trans-unit")))?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new("body")))?;
        xml_writer.write_event(Event::End(BytesEnd::new("file")))?;
        xml_writer.write_event(Event::End(BytesEnd::new("xliff")))?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

impl From<Format> for Messages {
    fn from(value: Format) -> Self {
        value
            .units
            .iter()
            .map(|unit| (unit.key().to_string(), unit.text().to_string()))
            .collect()
    }
}

impl Format {
    /// Builds a file whose units use the resource key as both `resname` and `source`.
    pub fn from_messages(messages: &Messages, target_language: Option<&str>) -> Self {
        Format {
            source_language: None,
            target_language: target_language.map(str::to_string),
            units: messages
                .iter()
                .map(|(key, text)| TransUnit {
                    id: None,
                    resname: Some(key.clone()),
                    source: key.clone(),
                    target: Some(text.clone()),
                })
                .collect(),
        }
    }
}

fn attribute(e: &BytesStart, name: &[u8]) -> Result<Option<String>, Error> {
    for attr in e.attributes().with_checks(false) {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref() == name {
            return Ok(Some(attr.unescape_value()?.to_string()));
        }
    }
    Ok(None)
}

fn parse_unit_body<R: BufRead>(
    xml_reader: &mut Reader<R>,
    unit: &mut TransUnit,
) -> Result<(), Error> {
    let mut buf = Vec::new();
    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(ref e) if e.name().as_ref() == b"source" => {
                unit.source = read_text(xml_reader, b"source")?;
            }
            Event::Start(ref e) if e.name().as_ref() == b"target" => {
                unit.target = Some(read_text(xml_reader, b"target")?);
            }
            Event::Empty(ref e) if e.name().as_ref() == b"target" => {
                unit.target = Some(String::new());
            }
            Event::End(ref e) if e.name().as_ref() == b"trans-unit" => return Ok(()),
            Event::Eof => {
                return Err(Error::InvalidResource(
                    "Unexpected EOF inside trans-unit".to_string(),
                ));
            }
            _ => {}
        }
        buf.clear();
    }
}

/// Collects the text of an element up to its end tag. Inline markup is dropped, its text
/// kept.
fn read_text<R: BufRead>(xml_reader: &mut Reader<R>, tag: &[u8]) -> Result<String, Error> {
    let mut buf = Vec::new();
    let mut text = String::new();
    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Text(e) => text.push_str(&e.unescape()?),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e.into_inner())),
            Event::End(ref e) if e.name().as_ref() == tag => return Ok(text),
            Event::Eof => {
                return Err(Error::InvalidResource("Unexpected EOF".to_string()));
            }
            _ => {}
        }
        buf.clear();
    }
}

fn write_text_element<W: Write>(
    xml_writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), Error> {
    xml_writer.write_event(Event::Start(BytesStart::new(name)))?;
    xml_writer.write_event(Event::Text(BytesText::new(text)))?;
    xml_writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}
