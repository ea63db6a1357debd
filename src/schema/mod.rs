//! Structural validation of PADnext XML documents.
//!
//! Documents are checked against compiled element rules before they are
//! written and right after they are read: namespace, element order,
//! cardinalities, attributes and value facets. All violations are collected.
//!
//! ```
//! use padnext::schema::{self, SchemaId};
//!
//! let issues = schema::validate(b"<auftrag/>", SchemaId::Manifest).unwrap_err();
//! assert!(issues.iter().any(|i| i.rule.as_deref() == Some("namespace")));
//! ```

mod rules;

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::money::{fraction_digits, total_digits};
use crate::core::{DocumentKind, PadnextError, ValidationError, is_sha1_hex};
use crate::xml::tree::Element;
use crate::xml::{PAD_NAMESPACE, charset, parse_datetime, parse_time, tree};
use rules::{Content, ElementRule, Facet, Particle};

/// Which document schema to validate against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaId {
    /// `*_auf.xml`
    Manifest,
    /// `*_padx.xml`
    Payload,
    /// `quittung`
    Receipt,
}

impl SchemaId {
    pub fn root(&self) -> &'static str {
        match self {
            SchemaId::Manifest => "auftrag",
            SchemaId::Payload => "rechnungen",
            SchemaId::Receipt => "quittung",
        }
    }

    pub fn document_kind(&self) -> DocumentKind {
        match self {
            SchemaId::Manifest => DocumentKind::Manifest,
            SchemaId::Payload => DocumentKind::Payload,
            SchemaId::Receipt => DocumentKind::Receipt,
        }
    }

    fn rule(&self) -> &'static ElementRule {
        match self {
            SchemaId::Manifest => &rules::AUFTRAG,
            SchemaId::Payload => &rules::RECHNUNGEN,
            SchemaId::Receipt => &rules::QUITTUNG,
        }
    }
}

/// How payload schema violations are treated. Manifests are always strict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadValidation {
    /// Violations abort processing.
    #[default]
    Strict,
    /// Violations are logged at warn level and processing continues.
    Lenient,
}

/// Validate raw XML bytes against a document schema.
pub fn validate(xml: &[u8], schema: SchemaId) -> Result<(), Vec<ValidationError>> {
    let root = charset::decode(xml)
        .and_then(|text| tree::parse(&text))
        .map_err(|e| vec![ValidationError::with_rule("/", e.to_string(), "well-formed")])?;

    let mut issues = Vec::new();
    if root.name != schema.root() {
        issues.push(ValidationError::with_rule(
            format!("/{}", root.name),
            format!("root element must be <{}>", schema.root()),
            "root",
        ));
        return Err(issues);
    }
    check_element(&root, schema.rule(), &format!("/{}", root.name), &mut issues);

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

/// Validate and turn violations into [`PadnextError::SchemaViolation`].
pub fn check(xml: &[u8], schema: SchemaId) -> Result<(), PadnextError> {
    validate(xml, schema).map_err(|issues| PadnextError::SchemaViolation {
        document: schema.document_kind(),
        issues,
    })
}

/// Validate a payload honouring the configured strictness.
pub fn check_payload(xml: &[u8], mode: PayloadValidation) -> Result<(), PadnextError> {
    match (validate(xml, SchemaId::Payload), mode) {
        (Ok(()), _) => Ok(()),
        (Err(issues), PayloadValidation::Strict) => Err(PadnextError::SchemaViolation {
            document: DocumentKind::Payload,
            issues,
        }),
        (Err(issues), PayloadValidation::Lenient) => {
            for issue in &issues {
                tracing::warn!(field = %issue.field, rule = ?issue.rule, "payload schema violation: {}", issue.message);
            }
            Ok(())
        }
    }
}

fn check_element(
    elem: &Element,
    rule: &ElementRule,
    path: &str,
    issues: &mut Vec<ValidationError>,
) {
    if elem.namespace.as_deref() != Some(PAD_NAMESPACE) {
        issues.push(ValidationError::with_rule(
            path,
            format!(
                "element must be in namespace {PAD_NAMESPACE}, found {}",
                elem.namespace.as_deref().unwrap_or("no namespace")
            ),
            "namespace",
        ));
    }

    for attr in rule.attrs {
        match elem.attr(attr.name) {
            Some(value) => check_facet(value, attr.facet, &format!("{path}/@{}", attr.name), issues),
            None if attr.required => issues.push(ValidationError::with_rule(
                format!("{path}/@{}", attr.name),
                "required attribute is missing",
                "required",
            )),
            None => {}
        }
    }
    for (name, _) in &elem.attrs {
        if name.starts_with("xsi:") {
            continue;
        }
        if !rule.attrs.iter().any(|a| a.name == name.as_str()) {
            issues.push(ValidationError::with_rule(
                format!("{path}/@{name}"),
                "attribute is not allowed here",
                "unexpected-attribute",
            ));
        }
    }

    match &rule.content {
        Content::Empty => {
            if !elem.children.is_empty() || !elem.text.trim().is_empty() {
                issues.push(ValidationError::with_rule(
                    path,
                    "element must be empty",
                    "empty",
                ));
            }
        }
        Content::Simple(facet) => {
            if let Some(child) = elem.children.first() {
                issues.push(ValidationError::with_rule(
                    format!("{path}/{}", child.name),
                    "element has simple content and must not contain elements",
                    "unexpected-element",
                ));
            }
            check_facet(&elem.text, *facet, path, issues);
        }
        Content::Sequence(particles) => {
            // Element-only content may carry whitespace.
            if !elem.text.trim().is_empty() {
                issues.push(ValidationError::with_rule(
                    path,
                    "element must not contain text",
                    "unexpected-text",
                ));
            }
            check_sequence(elem, particles, path, issues);
        }
    }
}

fn check_sequence(
    elem: &Element,
    particles: &[Particle],
    path: &str,
    issues: &mut Vec<ValidationError>,
) {
    let children = &elem.children;
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut idx = 0;

    for particle in particles {
        match particle {
            Particle::Element { name, occurs, rule } => {
                let mut count = 0;
                while idx < children.len() && children[idx].name == *name && count < occurs.max {
                    visit(&children[idx], rule, occurs.max > 1, path, &mut seen, issues);
                    idx += 1;
                    count += 1;
                }
                if count < occurs.min {
                    issues.push(ValidationError::with_rule(
                        format!("{path}/{name}"),
                        if occurs.min == 1 {
                            "required element is missing".to_string()
                        } else {
                            format!("expected at least {} elements, found {count}", occurs.min)
                        },
                        "min-occurs",
                    ));
                }
            }
            Particle::Choice { occurs, options } => {
                let mut count = 0;
                while idx < children.len() && count < occurs.max {
                    let Some((_, rule)) = options.iter().find(|(n, _)| *n == children[idx].name)
                    else {
                        break;
                    };
                    visit(&children[idx], rule, occurs.max > 1, path, &mut seen, issues);
                    idx += 1;
                    count += 1;
                }
                if count < occurs.min {
                    let names: Vec<&str> = options.iter().map(|(n, _)| *n).collect();
                    issues.push(ValidationError::with_rule(
                        path,
                        format!("expected one of <{}>", names.join(">, <")),
                        "min-occurs",
                    ));
                }
            }
        }
    }

    if let Some(extra) = children.get(idx) {
        issues.push(ValidationError::with_rule(
            format!("{path}/{}", extra.name),
            "element is not allowed at this position",
            "unexpected-element",
        ));
    }
}

fn visit<'a>(
    child: &'a Element,
    rule: &ElementRule,
    indexed: bool,
    path: &str,
    seen: &mut HashMap<&'a str, usize>,
    issues: &mut Vec<ValidationError>,
) {
    let n = seen.entry(child.name.as_str()).or_insert(0);
    *n += 1;
    let child_path = if indexed {
        format!("{path}/{}[{n}]", child.name)
    } else {
        format!("{path}/{}", child.name)
    };
    check_element(child, rule, &child_path, issues);
}

fn check_facet(value: &str, facet: Facet, path: &str, issues: &mut Vec<ValidationError>) {
    let mut fail = |message: String, rule: &str| {
        issues.push(ValidationError::with_rule(path, message, rule));
    };
    // Typed values collapse surrounding whitespace; free text keeps it.
    let value = match facet {
        Facet::Text { .. } => value,
        _ => value.trim(),
    };

    match facet {
        Facet::Text { min, max } => {
            let len = value.chars().count();
            if len < min {
                fail(format!("must have at least {min} characters, has {len}"), "min-length");
            } else if len > max {
                fail(format!("must have at most {max} characters, has {len}"), "max-length");
            }
        }
        Facet::Digits { max } => {
            if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
                fail(format!("'{value}' is not an unsigned integer"), "pattern");
            } else if value.len() > max {
                fail(format!("'{value}' exceeds {max} digits"), "total-digits");
            }
        }
        Facet::Decimal { total, fraction } => match value.parse::<Decimal>() {
            Ok(d) => {
                if fraction_digits(d) > fraction {
                    fail(format!("'{value}' has more than {fraction} fraction digits"), "fraction-digits");
                }
                if total_digits(d) > total {
                    fail(format!("'{value}' has more than {total} digits"), "total-digits");
                }
            }
            Err(_) => fail(format!("'{value}' is not a decimal"), "pattern"),
        },
        Facet::Enum(allowed) => {
            if !allowed.contains(&value) {
                fail(
                    format!("'{value}' is not one of {}", allowed.join(", ")),
                    "enumeration",
                );
            }
        }
        Facet::Date => {
            if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
                fail(format!("'{value}' is not a date (YYYY-MM-DD)"), "pattern");
            }
        }
        Facet::DateTime => {
            if parse_datetime(value, path).is_err() {
                fail(format!("'{value}' is not a date-time"), "pattern");
            }
        }
        Facet::Time => {
            if parse_time(value, path).is_err() {
                fail(format!("'{value}' is not a time"), "pattern");
            }
        }
        Facet::Bool => {
            if !matches!(value, "true" | "false" | "1" | "0") {
                fail(format!("'{value}' is not a boolean"), "pattern");
            }
        }
        Facet::Sha1Hex => {
            if !is_sha1_hex(value) {
                fail("checksum must be 40 hexadecimal characters".into(), "checksum-format");
            }
        }
    }
}
