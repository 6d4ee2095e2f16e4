use super::{Anchor, Bml, BmlError, Node, Ref};

/// Recursive-descent parser over the markup text. Elements may not nest.
pub(super) struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    pub(super) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub(super) fn parse(mut self) -> Result<Bml, BmlError> {
        let mut bml = Bml::default();
        while !self.at_end() {
            if self.peek() == Some('<') {
                bml.push(self.element()?);
            } else {
                let text = self.text()?;
                bml.push_text(&text);
            }
        }
        Ok(bml)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn syntax(&self, reason: impl Into<String>) -> BmlError {
        BmlError::Syntax {
            offset: self.pos,
            reason: reason.into(),
        }
    }

    fn expect(&mut self, want: char) -> Result<(), BmlError> {
        match self.bump() {
            Some(c) if c == want => Ok(()),
            Some(c) => Err(BmlError::Syntax {
                offset: self.pos - c.len_utf8(),
                reason: format!("expected '{}' but found '{}'", want, c),
            }),
            None => Err(BmlError::UnexpectedEof { offset: self.pos }),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    /// Raw text up to the next '<', with entities decoded
    fn text(&mut self) -> Result<String, BmlError> {
        let start = self.pos;
        let end = self.rest().find('<').map_or(self.input.len(), |i| self.pos + i);
        self.pos = end;
        unescape(&self.input[start..end], start)
    }

    fn name(&mut self) -> Result<&'a str, BmlError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            self.bump();
        }
        if start == self.pos {
            return Err(match self.peek() {
                Some(_) => self.syntax("expected a name"),
                None => BmlError::UnexpectedEof { offset: self.pos },
            });
        }
        Ok(&self.input[start..self.pos])
    }

    fn attribute_value(&mut self) -> Result<String, BmlError> {
        let start = self.pos;
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let value_start = self.pos;
                let len = self
                    .rest()
                    .find(quote)
                    .ok_or(BmlError::UnexpectedEof { offset: self.input.len() })?;
                self.pos += len;
                let raw = &self.input[value_start..self.pos];
                self.bump();
                unescape(raw, value_start)
            }
            Some(_) => {
                while matches!(self.peek(), Some(c) if !c.is_whitespace() && c != '>' && c != '<') {
                    self.bump();
                }
                if start == self.pos {
                    return Err(self.syntax("expected an attribute value"));
                }
                unescape(&self.input[start..self.pos], start)
            }
            None => Err(BmlError::UnexpectedEof { offset: self.pos }),
        }
    }

    fn element(&mut self) -> Result<Node, BmlError> {
        let open = self.pos;
        self.expect('<')?;
        if self.peek() == Some('/') {
            return Err(BmlError::Syntax {
                offset: open,
                reason: "closing tag without a matching opening tag".to_string(),
            });
        }

        let name = self.name()?;
        if name != "ref" && name != "a" {
            return Err(BmlError::UnknownElement {
                name: name.to_string(),
                offset: open,
            });
        }
        let mut attributes: Vec<(&'a str, String)> = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('>') => {
                    self.bump();
                    break;
                }
                Some(_) => {
                    let attr_offset = self.pos;
                    let attr = self.name()?;
                    self.skip_whitespace();
                    self.expect('=')?;
                    self.skip_whitespace();
                    let value = self.attribute_value()?;
                    if attributes.iter().any(|(existing, _)| *existing == attr) {
                        return Err(BmlError::Syntax {
                            offset: attr_offset,
                            reason: format!("duplicate attribute '{}'", attr),
                        });
                    }
                    attributes.push((attr, value));
                }
                None => return Err(BmlError::UnexpectedEof { offset: self.pos }),
            }
        }

        let text = self.text()?;
        if self.at_end() {
            return Err(BmlError::UnexpectedEof { offset: self.pos });
        }
        let close = self.pos;
        self.expect('<')?;
        if self.peek() != Some('/') {
            return Err(BmlError::Syntax {
                offset: close,
                reason: format!("elements may not be nested inside <{}>", name),
            });
        }
        self.bump();
        let closing = self.name()?;
        if closing != name {
            return Err(BmlError::Syntax {
                offset: close,
                reason: format!("expected </{}> but found </{}>", name, closing),
            });
        }
        self.skip_whitespace();
        self.expect('>')?;

        build_element(name, attributes, text, open)
    }
}

fn build_element(
    name: &str,
    attributes: Vec<(&str, String)>,
    text: String,
    offset: usize,
) -> Result<Node, BmlError> {
    match name {
        "ref" => {
            let mut node = Ref {
                text,
                ..Default::default()
            };
            for (attr, value) in attributes {
                match attr {
                    "id" => node.id = value,
                    "type" => node.ref_type = value.to_lowercase(),
                    other => return Err(unknown_attribute(name, other, offset)),
                }
            }
            Ok(Node::Ref(node))
        }
        "a" => {
            let mut node = Anchor {
                text,
                ..Default::default()
            };
            for (attr, value) in attributes {
                match attr {
                    "href" => node.href = value,
                    other => return Err(unknown_attribute(name, other, offset)),
                }
            }
            Ok(Node::Anchor(node))
        }
        other => Err(BmlError::UnknownElement {
            name: other.to_string(),
            offset,
        }),
    }
}

fn unknown_attribute(element: &str, attribute: &str, offset: usize) -> BmlError {
    BmlError::UnknownAttribute {
        element: element.to_string(),
        attribute: attribute.to_string(),
        offset,
    }
}

/// Decode the five XML entities plus numeric character references
fn unescape(raw: &str, offset: usize) -> Result<String, BmlError> {
    if !raw.contains('&') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let at = offset + (raw.len() - rest.len()) + amp;
        let after = &rest[amp + 1..];
        let semi = after.find(';').ok_or_else(|| BmlError::Syntax {
            offset: at,
            reason: "unterminated entity".to_string(),
        })?;
        let entity = &after[..semi];
        let decoded = match entity {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            _ => {
                let hex = entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"));
                let code = if let Some(hex) = hex {
                    u32::from_str_radix(hex, 16).ok()
                } else if let Some(dec) = entity.strip_prefix('#') {
                    dec.parse().ok()
                } else {
                    None
                };
                code.and_then(char::from_u32).ok_or_else(|| BmlError::Syntax {
                    offset: at,
                    reason: format!("unknown entity '&{};'", entity),
                })?
            }
        };
        out.push(decoded);
        rest = &after[semi + 1..];
    }
    out.push_str(rest);
    Ok(out)
}
