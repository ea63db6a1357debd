use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rust_decimal::Decimal;
use std::io::Cursor;

use super::charset;
use crate::core::PadnextError;

fn xml_io(e: std::io::Error) -> PadnextError {
    PadnextError::Xml(format!("XML write error: {e}"))
}

/// Latin-9 form of a value, substituted before quick-xml escapes it.
fn latin9(value: &str) -> String {
    charset::sanitize(value).0
}

fn start_tag<'a>(name: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
    let mut elem = BytesStart::new(name);
    for (k, v) in attrs {
        elem.push_attribute((*k, latin9(v).as_str()));
    }
    elem
}

/// Indented XML writer producing ISO-8859-15 output.
pub struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    pub fn new() -> Result<Self, PadnextError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new(
                "1.0",
                Some(charset::XML_ENCODING),
                None,
            )))
            .map_err(xml_io)?;
        Ok(Self { writer })
    }

    /// Finish the document and encode it as ISO-8859-15.
    ///
    /// Every value was substituted on the way in, so this is a plain encode.
    pub fn into_bytes(self) -> Result<Vec<u8>, PadnextError> {
        let buf = self.writer.into_inner().into_inner();
        let text = String::from_utf8(buf)
            .map_err(|e| PadnextError::Xml(format!("XML UTF-8 error: {e}")))?;
        Ok(charset::encode(&text))
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self, PadnextError> {
        self.writer
            .write_event(Event::Start(BytesStart::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, PadnextError> {
        self.writer
            .write_event(Event::Start(start_tag(name, attrs)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn empty_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, PadnextError> {
        self.writer
            .write_event(Event::Empty(start_tag(name, attrs)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, PadnextError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, PadnextError> {
        self.start_element(name)?;
        self.writer
            .write_event(Event::Text(BytesText::new(&latin9(text))))
            .map_err(xml_io)?;
        self.end_element(name)
    }

    pub fn text_element_with_attrs(
        &mut self,
        name: &str,
        text: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, PadnextError> {
        self.start_element_with_attrs(name, attrs)?;
        self.writer
            .write_event(Event::Text(BytesText::new(&latin9(text))))
            .map_err(xml_io)?;
        self.end_element(name)
    }

    /// Write `<name>text</name>` only if a value is present.
    pub fn opt_text_element(
        &mut self,
        name: &str,
        text: Option<&str>,
    ) -> Result<&mut Self, PadnextError> {
        if let Some(text) = text {
            self.text_element(name, text)?;
        }
        Ok(self)
    }

    pub fn decimal_element(&mut self, name: &str, value: Decimal) -> Result<&mut Self, PadnextError> {
        self.text_element(name, &format_decimal(value))
    }

    pub fn opt_decimal_element(
        &mut self,
        name: &str,
        value: Option<Decimal>,
    ) -> Result<&mut Self, PadnextError> {
        if let Some(value) = value {
            self.decimal_element(name, value)?;
        }
        Ok(self)
    }
}

/// Format a Decimal for XML output: at least 2 decimal places,
/// trailing zeros beyond that stripped.
pub fn format_decimal(d: Decimal) -> String {
    let s = d.normalize().to_string();
    if let Some(dot_pos) = s.find('.') {
        let decimals = s.len() - dot_pos - 1;
        if decimals < 2 {
            format!("{s}{}", "0".repeat(2 - decimals))
        } else {
            s
        }
    } else {
        format!("{s}.00")
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn format_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M:%S").to_string()
}

pub fn format_bool(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn format_decimal_cases() {
        assert_eq!(format_decimal(dec!(69)), "69.00");
        assert_eq!(format_decimal(dec!(23.0)), "23.00");
        assert_eq!(format_decimal(dec!(2.3)), "2.30");
        assert_eq!(format_decimal(dec!(0.0582873)), "0.0582873");
        assert_eq!(format_decimal(dec!(19)), "19.00");
    }

    #[test]
    fn declaration_names_latin9() {
        let mut w = XmlWriter::new().unwrap();
        w.text_element("text", "Gebühr – 5 €").unwrap();
        let bytes = w.into_bytes().unwrap();
        assert!(bytes.starts_with(b"<?xml version=\"1.0\" encoding=\"ISO-8859-15\"?>"));
        assert!(bytes.windows(3).any(|w| w == [b'-', b' ', b'5']));
        assert!(bytes.contains(&0xFC));
        assert!(bytes.contains(&0xA4));
    }

    #[test]
    fn typographic_quotes_in_attributes_stay_escaped() {
        let mut w = XmlWriter::new().unwrap();
        w.empty_element_with_attrs("rechnung", &[("id", "R\u{201E}1\u{201C}")]).unwrap();
        let bytes = w.into_bytes().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains(r#"<rechnung id="R&quot;1&quot;"/>"#), "{text}");
    }
}
