use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;

use crate::core::PadnextError;

const MAX_DEPTH: usize = 64;

/// A parsed XML element with resolved namespace and local name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub namespace: Option<String>,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }

    pub fn req_child(&self, name: &str) -> Result<&Element, PadnextError> {
        self.child(name).ok_or_else(|| {
            PadnextError::Xml(format!("<{}> is missing required <{name}>", self.name))
        })
    }

    pub fn req_text(&self, name: &str) -> Result<&str, PadnextError> {
        self.req_child(name).map(|c| c.text.as_str())
    }

    pub fn req_attr(&self, name: &str) -> Result<&str, PadnextError> {
        self.attr(name).ok_or_else(|| {
            PadnextError::Xml(format!("<{}> is missing required attribute '{name}'", self.name))
        })
    }
}

/// Parse a decoded XML document into an element tree.
pub fn parse(xml: &str) -> Result<Element, PadnextError> {
    let mut reader = NsReader::from_str(xml);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let (ns, event) = reader
            .read_resolved_event()
            .map_err(|e| PadnextError::Xml(format!("XML parse error: {e}")))?;
        match event {
            Event::Start(ref e) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(PadnextError::Xml(format!(
                        "document nesting exceeds {MAX_DEPTH} levels"
                    )));
                }
                stack.push(open_element(&ns, e)?);
            }
            Event::Empty(ref e) => {
                let elem = open_element(&ns, e)?;
                attach(&mut stack, &mut root, elem)?;
            }
            Event::Text(ref e) => {
                let text = e
                    .unescape()
                    .map_err(|e| PadnextError::Xml(format!("XML text error: {e}")))?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            Event::CData(e) => {
                let text = String::from_utf8(e.into_inner().into_owned())
                    .map_err(|e| PadnextError::Xml(format!("CDATA is not UTF-8: {e}")))?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            Event::End(_) => {
                let mut elem = stack
                    .pop()
                    .ok_or_else(|| PadnextError::Xml("unbalanced end tag".into()))?;
                // Indentation between child elements is not content.
                if !elem.children.is_empty() && elem.text.trim().is_empty() {
                    elem.text.clear();
                }
                attach(&mut stack, &mut root, elem)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(PadnextError::Xml("document ended inside an element".into()));
    }
    root.ok_or_else(|| PadnextError::Xml("document has no root element".into()))
}

fn open_element(ns: &ResolveResult<'_>, e: &BytesStart<'_>) -> Result<Element, PadnextError> {
    let name = std::str::from_utf8(e.local_name().as_ref())
        .map_err(|e| PadnextError::Xml(format!("element name is not UTF-8: {e}")))?
        .to_string();
    let namespace = match ns {
        ResolveResult::Bound(ns) => Some(String::from_utf8_lossy(ns.as_ref()).into_owned()),
        _ => None,
    };

    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| PadnextError::Xml(format!("attribute error: {e}")))?;
        let key = std::str::from_utf8(attr.key.as_ref()).unwrap_or("");
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        let value = attr
            .unescape_value()
            .map_err(|e| PadnextError::Xml(format!("attribute value error: {e}")))?;
        attrs.push((key.to_string(), value.into_owned()));
    }

    Ok(Element {
        name,
        namespace,
        attrs,
        children: Vec::new(),
        text: String::new(),
    })
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    elem: Element,
) -> Result<(), PadnextError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(elem),
        None if root.is_none() => *root = Some(elem),
        None => {
            return Err(PadnextError::Xml(
                "document has more than one root element".into(),
            ));
        }
    }
    Ok(())
}
