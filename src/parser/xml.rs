// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use maybe_xml::token::Ty;
use maybe_xml::Reader as Lexer;
use tracing::trace;

use crate::error::{Error, Result};
use crate::text;

use super::XmlHandler;

/// One open element.
struct Frame {
    /// Length of the path before this element's segment was pushed.
    parent_len: usize,
    has_children: bool,
    text: String,
}

/// Streams the given XML body into the handler as path events.
///
/// Comments, processing instructions and declarations are skipped. Text is only reported for
/// leaf elements, so whitespace between child elements never reaches the handler. A leaf written
/// with both tags and nothing between them, `<x></x>`, reports empty text; a self-closing `<x/>`
/// reports none, the same as a JSON `null`. An element that
/// is left open, an end tag that doesn't match, or trailing bytes that don't form a complete token
/// make the document malformed.
pub fn parse_xml<H: XmlHandler + ?Sized>(input: &[u8], handler: &mut H) -> Result<()> {
    let input = std::str::from_utf8(input)
        .map_err(|e| Error::malformed(format!("response is not UTF-8: {}", e)))?;

    let lexer = Lexer::new(input);
    let mut pos = 0;
    let mut path = String::new();
    let mut stack: Vec<Frame> = Vec::new();

    while let Some(token) = lexer.tokenize(&mut pos) {
        match token.ty() {
            Ty::StartTag(tag) => {
                open(&mut stack, &mut path, tag.name().as_str());
                handler.start_element(&path)?;
            }
            Ty::EmptyElementTag(tag) => {
                open(&mut stack, &mut path, tag.name().as_str());
                handler.start_element(&path)?;
                close(&mut stack, &mut path, tag.name().as_str(), false, handler)?;
            }
            Ty::EndTag(tag) => {
                close(&mut stack, &mut path, tag.name().as_str(), true, handler)?;
            }
            Ty::Characters(chars) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&text::decode_xml_entities(chars.content().as_str()));
                } else if !chars.content().as_str().trim().is_empty() {
                    return Err(Error::malformed("text outside the document element"));
                }
            }
            Ty::Cdata(cdata) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(cdata.content().as_str());
                }
            }
            Ty::ProcessingInstruction(_) | Ty::Declaration(_) | Ty::Comment(_) => (),
        }
    }

    if pos < input.len() {
        return Err(Error::malformed(format!("incomplete markup at byte {}", pos)));
    }

    if !stack.is_empty() {
        return Err(Error::malformed(format!("unclosed element at {}", path)));
    }

    Ok(())
}

fn open(stack: &mut Vec<Frame>, path: &mut String, name: &str) {
    if let Some(parent) = stack.last_mut() {
        parent.has_children = true;
    }

    stack.push(Frame {
        parent_len: path.len(),
        has_children: false,
        text: String::new(),
    });
    path.push('/');
    path.push_str(name);
}

fn close<H: XmlHandler + ?Sized>(
    stack: &mut Vec<Frame>,
    path: &mut String,
    name: &str,
    end_tag: bool,
    handler: &mut H,
) -> Result<()> {
    let frame = stack
        .pop()
        .ok_or_else(|| Error::malformed(format!("unexpected closing tag </{}>", name)))?;

    let open_name = &path[frame.parent_len + 1..];
    if open_name != name {
        return Err(Error::malformed(format!(
            "</{}> closes <{}> at {}",
            name, open_name, path
        )));
    }

    if !frame.has_children && (end_tag || !frame.text.is_empty()) {
        trace!(path = %path, "leaf text");
        handler.text(path, &frame.text)?;
    }

    handler.end_element(path)?;
    path.truncate(frame.parent_len);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Events(Vec<String>);

    impl XmlHandler for Events {
        fn start_element(&mut self, path: &str) -> Result<()> {
            self.0.push(format!("start {}", path));
            Ok(())
        }

        fn end_element(&mut self, path: &str) -> Result<()> {
            self.0.push(format!("end {}", path));
            Ok(())
        }

        fn text(&mut self, path: &str, text: &str) -> Result<()> {
            self.0.push(format!("text {} = {}", path, text));
            Ok(())
        }
    }

    #[test]
    fn path_events() {
        let doc = br#"<?xml version="1.0" encoding="UTF-8"?>
<statuses type="array">
  <!-- one status -->
  <status>
    <id>12</id>
    <source>&lt;a href=&quot;x&quot;&gt;web&lt;/a&gt;</source>
    <in_reply_to_status_id></in_reply_to_status_id>
    <geo/>
    <text><![CDATA[a < b]]></text>
  </status>
</statuses>"#;

        let mut events = Events::default();
        parse_xml(doc, &mut events).unwrap();

        assert_eq!(
            events.0,
            vec![
                "start /statuses",
                "start /statuses/status",
                "start /statuses/status/id",
                "text /statuses/status/id = 12",
                "end /statuses/status/id",
                "start /statuses/status/source",
                "text /statuses/status/source = <a href=\"x\">web</a>",
                "end /statuses/status/source",
                "start /statuses/status/in_reply_to_status_id",
                "text /statuses/status/in_reply_to_status_id = ",
                "end /statuses/status/in_reply_to_status_id",
                "start /statuses/status/geo",
                "end /statuses/status/geo",
                "start /statuses/status/text",
                "text /statuses/status/text = a < b",
                "end /statuses/status/text",
                "end /statuses/status",
                "end /statuses",
            ]
        );
    }

    #[test]
    fn namespaced_tags() {
        let doc = b"<geo><georss:point>-22.9 -43.2</georss:point></geo>";
        let mut events = Events::default();
        parse_xml(doc, &mut events).unwrap();

        assert!(events.0.contains(&"text /geo/georss:point = -22.9 -43.2".to_string()));
    }

    #[test]
    fn malformed_documents() {
        for doc in &[
            &b"<a><b></a>"[..],
            &b"<a><b></b>"[..],
            &b"</a>"[..],
            &b"<a></a><b"[..],
            &b"<a>\xff</a>"[..],
        ] {
            let mut events = Events::default();
            match parse_xml(doc, &mut events) {
                Err(Error::MalformedInput(_)) => (),
                other => panic!("expected MalformedInput for {:?}, got {:?}", doc, other),
            }
        }
    }
}
