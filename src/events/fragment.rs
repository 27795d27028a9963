//! XML event-fragment parsing.
//!
//! The host runner hands the reporter one XML node per lifecycle event. The
//! node is shallow (finish events carry `failure`/`reason`/`assertion`
//! children, but never nested test nodes), so a small owned tree is enough.
//! Parsed once per call and dropped after dispatch.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::types::{Error, Result};

/// One parsed XML node: tag name, attributes, children, and direct text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragment {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Fragment>,
    pub text: String,
}

impl Fragment {
    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First child element with the given tag name.
    pub fn child(&self, name: &str) -> Option<&Fragment> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Concatenated text content of this node and all descendants.
    pub fn inner_text(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.inner_text());
        }
        out
    }
}

/// Parse a single XML event fragment into a [`Fragment`] tree.
///
/// The first top-level element is the fragment; anything after its close tag
/// is ignored. Returns an error for XML the reader rejects or for input with
/// no element at all.
pub fn parse(xml: &str) -> Result<Fragment> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Fragment> = Vec::new();
    let mut root: Option<Fragment> = None;

    loop {
        match reader.read_event().map_err(quick_xml::Error::from)? {
            Event::Start(start) => {
                stack.push(open_node(&start)?);
            }
            Event::Empty(start) => {
                let node = open_node(&start)?;
                close_node(&mut stack, &mut root, node);
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| Error::malformed_event("unbalanced close tag"))?;
                close_node(&mut stack, &mut root, node);
            }
            Event::Text(text) => {
                if let Some(top) = stack.last_mut() {
                    top.text
                        .push_str(&text.unescape().map_err(quick_xml::Error::from)?);
                }
            }
            Event::CData(cdata) => {
                if let Some(top) = stack.last_mut() {
                    top.text
                        .push_str(&String::from_utf8_lossy(&cdata.into_inner()));
                }
            }
            Event::Eof => break,
            // Declarations, comments and processing instructions carry no
            // event data.
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(Error::malformed_event("unclosed element in fragment"));
    }
    root.ok_or_else(|| Error::malformed_event("no element in fragment"))
}

fn open_node(start: &quick_xml::events::BytesStart<'_>) -> Result<Fragment> {
    let mut node = Fragment {
        name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
        ..Fragment::default()
    };
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(quick_xml::Error::from)?
            .into_owned();
        node.attrs.push((key, value));
    }
    Ok(node)
}

fn close_node(stack: &mut Vec<Fragment>, root: &mut Option<Fragment>, node: Fragment) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if root.is_none() {
                *root = Some(node);
            }
        }
    }
}
