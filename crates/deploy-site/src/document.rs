//! The `<configuration>` document

use std::collections::BTreeMap;
use std::fmt::Display;
use std::path::Path;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};

use crate::{Error, Result};

/// Key/value configuration exposed by a running cluster.
///
/// Ordered by key, so exported documents are identical across runs for the
/// same properties.
pub type RuntimeProperties = BTreeMap<String, String>;

/// Processing instruction pointing browsers at the Hadoop stylesheet.
pub const STYLESHEET: &str = r#"xml-stylesheet type="text/xsl" href="configuration.xsl""#;

const ROOT: &str = "configuration";
const PROPERTY: &str = "property";
const NAME: &str = "name";
const VALUE: &str = "value";

/// An in-memory `<configuration>` document.
///
/// Entries keep the order they were added in; duplicate names are kept as
/// separate `<property>` elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteDocument {
    entries: Vec<(String, String)>,
}

impl SiteDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from key/value pairs in iteration order. Keys and
    /// values are converted with their `Display` form.
    pub fn from_properties<I, K, V>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Display,
        V: Display,
    {
        let mut document = Self::new();
        for (key, value) in properties {
            document.push(key, value);
        }
        document
    }

    /// Append one `<property>` element.
    pub fn push(&mut self, name: impl Display, value: impl Display) {
        self.entries.push((name.to_string(), value.to_string()));
    }

    /// The `(name, value)` pairs in document order.
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collapse into a map. A later duplicate name replaces an earlier one.
    pub fn into_properties(self) -> RuntimeProperties {
        self.entries.into_iter().collect()
    }

    /// Render the document as XML text, newline terminated.
    pub fn render(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(render_error)?;
        writer
            .write_event(Event::PI(BytesPI::new(STYLESHEET)))
            .map_err(render_error)?;
        writer
            .write_event(Event::Start(BytesStart::new(ROOT)))
            .map_err(render_error)?;

        for (name, value) in &self.entries {
            writer
                .write_event(Event::Start(BytesStart::new(PROPERTY)))
                .map_err(render_error)?;
            write_leaf(&mut writer, NAME, name)?;
            write_leaf(&mut writer, VALUE, value)?;
            writer
                .write_event(Event::End(BytesEnd::new(PROPERTY)))
                .map_err(render_error)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new(ROOT)))
            .map_err(render_error)?;

        let mut bytes = writer.into_inner();
        bytes.push(b'\n');
        String::from_utf8(bytes).map_err(render_error)
    }

    /// Render and write the document to `destination`, replacing any
    /// existing file.
    pub fn write(&self, destination: &Path) -> Result<()> {
        let serialization_error = |message: String| Error::Serialization {
            path: destination.to_path_buf(),
            message,
        };

        let xml = self.render().map_err(|e| serialization_error(e.to_string()))?;
        deploy_fs::write_text(destination, &xml).map_err(|e| serialization_error(e.to_string()))?;

        tracing::debug!(
            path = %destination.display(),
            properties = self.entries.len(),
            "Wrote configuration document"
        );
        Ok(())
    }

    /// Parse a `<configuration>` document.
    ///
    /// Only `<name>` and `<value>` children of `<property>` are read; other
    /// elements (such as `<description>` or `<final>`) are ignored. A
    /// property without `<value>` gets an empty value.
    pub fn parse(xml: &str) -> Result<Self> {
        parse_document(xml, "<memory>")
    }
}

fn render_error(e: impl Display) -> Error {
    Error::Render {
        message: e.to_string(),
    }
}

fn write_leaf(writer: &mut Writer<Vec<u8>>, tag: &str, text: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(tag)))
        .map_err(render_error)?;
    writer
        .write_event(Event::Text(BytesText::from_escaped(escape_text(text)?)))
        .map_err(render_error)?;
    writer
        .write_event(Event::End(BytesEnd::new(tag)))
        .map_err(render_error)
}

/// Escape element text so a conforming XML 1.0 parser reads back exactly
/// `text`.
///
/// `\r` becomes `&#13;` because parsers fold a literal carriage return into
/// `\n`. Characters outside the XML 1.0 `Char` production have no
/// representation at all and are rejected.
fn escape_text(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\r' => out.push_str("&#13;"),
            '\t' | '\n' => out.push(c),
            c if is_xml_char(c) => out.push(c),
            c => {
                return Err(Error::Render {
                    message: format!(
                        "character U+{:04X} cannot be represented in XML 1.0",
                        u32::from(c)
                    ),
                });
            }
        }
    }
    Ok(out)
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Which text-bearing element the reader is inside.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Leaf {
    Name,
    Value,
}

fn parse_document(xml: &str, origin: &str) -> Result<SiteDocument> {
    let parse_error = |message: String| Error::Parse {
        origin: origin.to_string(),
        message,
    };

    let mut reader = Reader::from_str(xml);
    let mut document = SiteDocument::new();
    let mut stack: Vec<String> = Vec::new();
    let mut seen_root = false;

    let mut name: Option<String> = None;
    let mut value: Option<String> = None;
    let mut text = String::new();

    let leaf_at = |stack: &[String]| -> Option<Leaf> {
        match stack {
            [root, property, leaf] if root == ROOT && property == PROPERTY => match leaf.as_str() {
                NAME => Some(Leaf::Name),
                VALUE => Some(Leaf::Value),
                _ => None,
            },
            _ => None,
        }
    };

    loop {
        let event = reader.read_event().map_err(|e| {
            parse_error(format!("{} at byte {}", e, reader.buffer_position()))
        })?;

        match event {
            Event::Start(e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if stack.is_empty() {
                    if seen_root || tag != ROOT {
                        return Err(parse_error(format!(
                            "expected a single <{ROOT}> root element, found <{tag}>"
                        )));
                    }
                    seen_root = true;
                }
                stack.push(tag);
                if stack.len() == 2 && stack[1] == PROPERTY {
                    name = None;
                    value = None;
                }
                if leaf_at(&stack).is_some() {
                    text.clear();
                }
            }
            Event::Empty(e) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if stack.is_empty() {
                    if seen_root || tag != ROOT {
                        return Err(parse_error(format!(
                            "expected a single <{ROOT}> root element, found <{tag}/>"
                        )));
                    }
                    seen_root = true;
                    continue;
                }
                stack.push(tag);
                match leaf_at(&stack) {
                    Some(Leaf::Name) => name = Some(String::new()),
                    Some(Leaf::Value) => value = Some(String::new()),
                    None if stack.len() == 2 && stack[1] == PROPERTY => {
                        return Err(parse_error("<property/> has no <name>".into()));
                    }
                    None => {}
                }
                stack.pop();
            }
            Event::Text(t) => {
                if leaf_at(&stack).is_some() {
                    let unescaped = t.unescape().map_err(|e| parse_error(e.to_string()))?;
                    text.push_str(&unescaped);
                }
            }
            Event::CData(c) => {
                if leaf_at(&stack).is_some() {
                    text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(_) => {
                match leaf_at(&stack) {
                    Some(Leaf::Name) => name = Some(std::mem::take(&mut text)),
                    Some(Leaf::Value) => value = Some(std::mem::take(&mut text)),
                    None => {}
                }
                if stack.len() == 2 && stack[1] == PROPERTY {
                    let property_name = name
                        .take()
                        .ok_or_else(|| parse_error("<property> has no <name>".into()))?;
                    document.push(property_name, value.take().unwrap_or_default());
                }
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(parse_error(format!("missing <{ROOT}> root element")));
    }
    if let Some(open) = stack.last() {
        return Err(parse_error(format!("unexpected end of document inside <{open}>")));
    }
    Ok(document)
}

/// Write `properties` to `destination` as a `<configuration>` document.
///
/// Entries are written in the order `properties` yields them. Any existing
/// file at `destination` is replaced.
pub fn export<I, K, V>(properties: I, destination: &Path) -> Result<()>
where
    I: IntoIterator<Item = (K, V)>,
    K: Display,
    V: Display,
{
    SiteDocument::from_properties(properties).write(destination)
}

/// Read a `<configuration>` document from disk into a property map.
pub fn read(path: &Path) -> Result<RuntimeProperties> {
    let xml = deploy_fs::read_text(path)?;
    Ok(parse_document(&xml, &path.display().to_string())?.into_properties())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_single_property() {
        let document = SiteDocument::from_properties([("fs.default.name", "hdfs://10.0.0.1:8020")]);

        insta::assert_snapshot!(document.render().unwrap(), @r#"
        <?xml version="1.0" encoding="UTF-8" standalone="yes"?>
        <?xml-stylesheet type="text/xsl" href="configuration.xsl"?>
        <configuration>
          <property>
            <name>fs.default.name</name>
            <value>hdfs://10.0.0.1:8020</value>
          </property>
        </configuration>
        "#);
    }

    #[test]
    fn test_render_empty_document_has_root_only() {
        let xml = SiteDocument::new().render().unwrap();

        assert!(xml.contains("<configuration>"));
        assert!(xml.contains("</configuration>"));
        assert!(!xml.contains("<property>"));
        assert_eq!(SiteDocument::parse(&xml).unwrap().len(), 0);
    }

    #[test]
    fn test_render_escapes_markup() {
        let document = SiteDocument::from_properties([("a<b", "x & \"y\"")]);
        let xml = document.render().unwrap();

        assert!(xml.contains("<name>a&lt;b</name>"));
        assert!(xml.contains("&amp;"));
        assert!(!xml.contains("x & "));
    }

    #[test]
    fn test_render_escapes_carriage_return_as_reference() {
        let document = SiteDocument::from_properties([("k", "line1\r\nline2\tend")]);
        let xml = document.render().unwrap();

        assert!(xml.contains("<value>line1&#13;\nline2\tend</value>"));
        assert!(!xml.contains('\r'));
        assert_eq!(
            SiteDocument::parse(&xml).unwrap().entries(),
            &[("k".to_string(), "line1\r\nline2\tend".to_string())]
        );
    }

    #[test]
    fn test_render_rejects_characters_outside_xml() {
        for value in ["bell\u{7}", "nul\u{0}", "\u{FFFE}"] {
            let err = SiteDocument::from_properties([("k", value)]).render().unwrap_err();
            assert!(matches!(err, Error::Render { .. }), "{value:?}: {err:?}");
        }

        let err = SiteDocument::from_properties([("esc\u{1b}", "v")]).render().unwrap_err();
        assert!(err.to_string().contains("U+001B"));
    }

    #[test]
    fn test_escaped_key_parses_back() {
        let document = SiteDocument::from_properties([("a<b&\"c\"", "x > 'y'")]);
        let xml = document.render().unwrap();

        assert!(xml.contains("<name>a&lt;b&amp;&quot;c&quot;</name>"));
        assert_eq!(SiteDocument::parse(&xml).unwrap(), document);
    }

    #[test]
    fn test_render_keeps_insertion_order() {
        let document = SiteDocument::from_properties([("z", "1"), ("a", "2")]);
        let xml = document.render().unwrap();

        assert!(xml.find("<name>z</name>").unwrap() < xml.find("<name>a</name>").unwrap());
    }

    #[test]
    fn test_display_values_are_stringified() {
        let document = SiteDocument::from_properties([("dfs.replication", 3)]);
        assert_eq!(document.entries(), &[("dfs.replication".to_string(), "3".to_string())]);
    }

    #[test]
    fn test_parse_ignores_extra_elements() {
        let xml = r#"<?xml version="1.0"?>
<configuration>
  <property>
    <name>mapred.job.tracker</name>
    <value>10.0.0.1:8021</value>
    <description>JobTracker address</description>
    <final>true</final>
  </property>
  <property>
    <name>hadoop.socks.server</name>
    <value/>
  </property>
</configuration>
"#;
        let document = SiteDocument::parse(xml).unwrap();

        assert_eq!(
            document.entries(),
            &[
                ("mapred.job.tracker".to_string(), "10.0.0.1:8021".to_string()),
                ("hadoop.socks.server".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_wrong_root() {
        let err = SiteDocument::parse("<properties></properties>").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_parse_rejects_property_without_name() {
        let err =
            SiteDocument::parse("<configuration><property><value>1</value></property></configuration>")
                .unwrap_err();
        assert!(err.to_string().contains("no <name>"));
    }

    #[test]
    fn test_parse_rejects_empty_input() {
        assert!(SiteDocument::parse("").is_err());
    }

    #[test]
    fn test_parse_rejects_mismatched_tags() {
        assert!(SiteDocument::parse("<configuration><property></configuration>").is_err());
    }
}
