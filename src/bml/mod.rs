//! BML, the bracketed markup used in message and email bodies.
//!
//! A document is a flat run of text, `<ref id=".." type="..">text</ref>`
//! references and `<a href="..">text</a>` anchors. Elements do not nest.

mod parser;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BmlError {
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },

    #[error("{reason} at offset {offset}")]
    Syntax { offset: usize, reason: String },

    #[error("unknown element <{name}> at offset {offset}")]
    UnknownElement { name: String, offset: usize },

    #[error("unknown attribute '{attribute}' on <{element}> at offset {offset}")]
    UnknownAttribute {
        element: String,
        attribute: String,
        offset: usize,
    },

    #[error("<{element}> requires a non-empty {attribute}")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("invalid href '{href}': {reason}")]
    InvalidHref { href: String, reason: String },

    #[error("format string has {verbs} %v verbs but {args} arguments were given")]
    ArgumentCount { verbs: usize, args: usize },

    #[error("unsupported format verb '%{0}'")]
    UnsupportedVerb(char),
}

/// Reference to a directory object, rendered as its display text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ref {
    pub id: String,
    /// Always lower case once parsed
    pub ref_type: String,
    pub text: String,
}

impl Ref {
    pub fn entity(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ref_type: "entity".to_string(),
            text: text.into(),
        }
    }

    fn validate(&self) -> Result<(), BmlError> {
        let missing = |attribute| BmlError::MissingAttribute {
            element: "ref",
            attribute,
        };
        if self.id.is_empty() {
            return Err(missing("id"));
        }
        if self.ref_type.is_empty() {
            return Err(missing("type"));
        }
        if self.text.is_empty() {
            return Err(missing("text"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anchor {
    pub href: String,
    pub text: String,
}

impl Anchor {
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            text: text.into(),
        }
    }

    fn validate(&self) -> Result<(), BmlError> {
        url::Url::parse(&self.href).map_err(|e| BmlError::InvalidHref {
            href: self.href.clone(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Ref(Ref),
    Anchor(Anchor),
}

impl Node {
    pub fn validate(&self) -> Result<(), BmlError> {
        match self {
            Node::Text(_) => Ok(()),
            Node::Ref(r) => r.validate(),
            Node::Anchor(a) => a.validate(),
        }
    }

    /// The text a reader sees
    pub fn plain_text(&self) -> &str {
        match self {
            Node::Text(text) => text,
            Node::Ref(r) => &r.text,
            Node::Anchor(a) => &a.text,
        }
    }

    fn write(&self, out: &mut String) {
        match self {
            Node::Text(text) => escape_into(out, text, false),
            Node::Ref(r) => {
                out.push_str("<ref id=\"");
                escape_into(out, &r.id, true);
                out.push_str("\" type=\"");
                escape_into(out, &r.ref_type.to_lowercase(), true);
                out.push_str("\">");
                escape_into(out, &r.text, false);
                out.push_str("</ref>");
            }
            Node::Anchor(a) => {
                out.push_str("<a href=\"");
                escape_into(out, &a.href, true);
                out.push_str("\">");
                escape_into(out, &a.text, false);
                out.push_str("</a>");
            }
        }
    }
}

impl From<Ref> for Node {
    fn from(r: Ref) -> Self {
        Node::Ref(r)
    }
}

impl From<Anchor> for Node {
    fn from(a: Anchor) -> Self {
        Node::Anchor(a)
    }
}

/// A parsed document. Adjacent text runs are always merged and empty text
/// is never stored, so formatting and reparsing yields an equal value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bml(Vec<Node>);

impl Bml {
    pub fn parse(input: &str) -> Result<Self, BmlError> {
        parser::Parser::new(input).parse()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.0
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        match node.into() {
            Node::Text(text) => self.push_text(&text),
            node => self.0.push(node),
        }
    }

    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Node::Text(last)) = self.0.last_mut() {
            last.push_str(text);
        } else {
            self.0.push(Node::Text(text.to_string()));
        }
    }

    pub fn validate(&self) -> Result<(), BmlError> {
        self.0.iter().try_for_each(Node::validate)
    }

    /// Serialize back to markup with text escaped
    pub fn format(&self) -> String {
        let mut out = String::new();
        for node in &self.0 {
            node.write(&mut out);
        }
        out
    }

    pub fn plain_text(&self) -> String {
        self.0.iter().map(Node::plain_text).collect()
    }
}

impl From<Node> for Bml {
    fn from(node: Node) -> Self {
        let mut bml = Bml::default();
        bml.push(node);
        bml
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

impl FromStr for Bml {
    type Err = BmlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Bml::parse(s)
    }
}

impl fmt::Display for Bml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

/// Argument substituted for a `%v` verb
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// Escaped before substitution
    Text(String),
    Node(Node),
}

impl From<&str> for Arg {
    fn from(text: &str) -> Self {
        Arg::Text(text.to_string())
    }
}

impl From<String> for Arg {
    fn from(text: String) -> Self {
        Arg::Text(text)
    }
}

impl From<Ref> for Arg {
    fn from(r: Ref) -> Self {
        Arg::Node(Node::Ref(r))
    }
}

impl From<Anchor> for Arg {
    fn from(a: Anchor) -> Self {
        Arg::Node(Node::Anchor(a))
    }
}

impl From<Node> for Arg {
    fn from(node: Node) -> Self {
        Arg::Node(node)
    }
}

/// Substitute each `%v` in a markup template with an argument. Text
/// arguments are escaped; element arguments are serialized. `%%` is a
/// literal percent sign and no other verb is accepted.
pub fn sprintf(template: &str, args: &[Arg]) -> Result<String, BmlError> {
    let mut out = String::with_capacity(template.len());
    let mut args_iter = args.iter();
    let mut verbs = 0;
    let mut chars = template.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some('v') => {
                verbs += 1;
                match args_iter.next() {
                    Some(Arg::Text(text)) => escape_into(&mut out, text, false),
                    Some(Arg::Node(node)) => node.write(&mut out),
                    None => {
                        return Err(BmlError::ArgumentCount {
                            verbs: verbs + template_verbs(chars.as_str()),
                            args: args.len(),
                        })
                    }
                }
            }
            Some(other) => return Err(BmlError::UnsupportedVerb(other)),
            None => return Err(BmlError::UnsupportedVerb('\0')),
        }
    }
    if verbs != args.len() {
        return Err(BmlError::ArgumentCount {
            verbs,
            args: args.len(),
        });
    }
    Ok(out)
}

/// `sprintf` followed by parse and validation
pub fn parsef(template: &str, args: &[Arg]) -> Result<Bml, BmlError> {
    let bml = Bml::parse(&sprintf(template, args)?)?;
    bml.validate()?;
    Ok(bml)
}

fn template_verbs(rest: &str) -> usize {
    rest.replace("%%", "").matches("%v").count()
}

fn escape_into(out: &mut String, text: &str, attribute: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}
