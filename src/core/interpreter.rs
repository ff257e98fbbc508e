//! Classifies a device's response body.
//!
//! Devices answer on two slots. `//param/value/string` is the normal return
//! value and `//fault/value/string` is the fault. The return slot is also
//! used for error text, so an empty return value is the only success.

use crate::domain::model::RpcOutcome;
use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

pub const PARSE_FAILURE: &str = "couldn't parse response!";

const PARAM_PATH: &[&str] = &["param", "value", "string"];
const FAULT_PATH: &[&str] = &["fault", "value", "string"];

#[derive(Error, Debug)]
enum DocumentError {
    #[error("malformed xml: {0}")]
    Syntax(String),

    #[error("no root element")]
    Empty,

    #[error("element <{0}> is never closed")]
    Unclosed(String),

    #[error("closing tag without an open element")]
    UnmatchedEnd,
}

pub fn interpret(body: &str) -> RpcOutcome {
    let values = match first_values(body, &[PARAM_PATH, FAULT_PATH]) {
        Ok(values) => values,
        Err(e) => {
            tracing::debug!("Response is not a usable document: {}", e);
            return RpcOutcome::ParseError(PARSE_FAILURE.to_string());
        }
    };

    let mut values = values.into_iter();
    let param = values.next().flatten();
    let fault = values.next().flatten();

    match (param, fault) {
        (Some(msg), _) if msg.is_empty() => RpcOutcome::Success(msg),
        (Some(msg), _) => RpcOutcome::RemoteFault(msg),
        (None, Some(msg)) => RpcOutcome::RemoteFault(msg),
        (None, None) => RpcOutcome::ParseError(PARSE_FAILURE.to_string()),
    }
}

struct PathMatch<'p> {
    path: &'p [&'p str],
    capture_depth: Option<usize>,
    value: Option<String>,
    done: bool,
}

impl<'p> PathMatch<'p> {
    fn new(path: &'p [&'p str]) -> Self {
        Self {
            path,
            capture_depth: None,
            value: None,
            done: false,
        }
    }

    fn is_capturing(&self) -> bool {
        self.capture_depth.is_some() && !self.done
    }

    fn matches(&self, stack: &[String]) -> bool {
        stack.len() >= self.path.len()
            && stack[stack.len() - self.path.len()..]
                .iter()
                .zip(self.path)
                .all(|(open, want)| open == want)
    }
}

/// Parses the whole document and returns, for each path, the string value of
/// the first element (in document order) whose ancestry ends with that path.
fn first_values(body: &str, paths: &[&[&str]]) -> Result<Vec<Option<String>>, DocumentError> {
    let mut reader = Reader::from_str(body);
    let mut matchers: Vec<PathMatch> = paths.iter().map(|p| PathMatch::new(p)).collect();
    let mut stack: Vec<String> = Vec::new();
    let mut seen_root = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| DocumentError::Syntax(e.to_string()))?;

        match event {
            Event::Start(e) => {
                seen_root = true;
                stack.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                for m in matchers.iter_mut() {
                    if m.value.is_none() && m.matches(&stack) {
                        m.capture_depth = Some(stack.len());
                        m.value = Some(String::new());
                    }
                }
            }
            Event::Empty(e) => {
                seen_root = true;
                stack.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                for m in matchers.iter_mut() {
                    if m.value.is_none() && m.matches(&stack) {
                        m.value = Some(String::new());
                        m.done = true;
                    }
                }
                stack.pop();
            }
            Event::End(_) => {
                for m in matchers.iter_mut() {
                    if m.is_capturing() && m.capture_depth == Some(stack.len()) {
                        m.done = true;
                    }
                }
                stack.pop().ok_or(DocumentError::UnmatchedEnd)?;
            }
            Event::Text(e) => {
                let text = e
                    .unescape()
                    .map_err(|err| DocumentError::Syntax(err.to_string()))?;
                append_captured(&mut matchers, &text);
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(&e).into_owned();
                append_captured(&mut matchers, &text);
            }
            Event::Eof => {
                if let Some(open) = stack.last() {
                    return Err(DocumentError::Unclosed(open.clone()));
                }
                if !seen_root {
                    return Err(DocumentError::Empty);
                }
                break;
            }
            _ => {}
        }
    }

    Ok(matchers.into_iter().map(|m| m.value).collect())
}

fn append_captured(matchers: &mut [PathMatch], text: &str) {
    for m in matchers.iter_mut().filter(|m| m.is_capturing()) {
        if let Some(value) = m.value.as_mut() {
            value.push_str(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(inner: &str) -> String {
        format!(
            "<?xml version=\"1.0\"?>\n<methodResponse>\n{}\n</methodResponse>\n",
            inner
        )
    }

    #[test]
    fn test_empty_return_value_is_success() {
        let body = response("<params><param><value><string></string></value></param></params>");
        assert_eq!(interpret(&body), RpcOutcome::Success(String::new()));
    }

    #[test]
    fn test_self_closing_return_value_is_success() {
        let body = response("<params><param><value><string/></value></param></params>");
        assert_eq!(interpret(&body), RpcOutcome::Success(String::new()));
    }

    #[test]
    fn test_empty_return_value_ignores_siblings() {
        let body = response(
            "<params><param><value><string></string></value><note>x</note></param>\
             <param><value><string>second</string></value></param></params>",
        );
        assert!(interpret(&body).is_success());
    }

    #[test]
    fn test_empty_return_value_wins_over_fault_element() {
        let body = response(
            "<fault><value><string>boom</string></value></fault>\
             <params><param><value><string></string></value></param></params>",
        );
        assert_eq!(interpret(&body), RpcOutcome::Success(String::new()));
    }

    #[test]
    fn test_non_empty_return_value_is_fault_even_with_fault_element() {
        let body = response(
            "<params><param><value><string>Value out of range</string></value></param></params>\
             <fault><value><string>Other</string></value></fault>",
        );
        assert_eq!(
            interpret(&body),
            RpcOutcome::RemoteFault("Value out of range".to_string())
        );
    }

    #[test]
    fn test_fault_value_when_no_return_value() {
        let body = response("<fault><value><string>Invalid path</string></value></fault>");
        assert_eq!(
            interpret(&body),
            RpcOutcome::RemoteFault("Invalid path".to_string())
        );
    }

    #[test]
    fn test_whitespace_return_value_is_not_success() {
        let body = response("<params><param><value><string> </string></value></param></params>");
        assert_eq!(interpret(&body), RpcOutcome::RemoteFault(" ".to_string()));
    }

    #[test]
    fn test_entities_are_unescaped() {
        let body = response("<fault><value><string>a &lt; b &amp; c</string></value></fault>");
        assert_eq!(
            interpret(&body),
            RpcOutcome::RemoteFault("a < b & c".to_string())
        );
    }

    #[test]
    fn test_cdata_is_read_as_text() {
        let body = response("<fault><value><string><![CDATA[<locked>]]></string></value></fault>");
        assert_eq!(
            interpret(&body),
            RpcOutcome::RemoteFault("<locked>".to_string())
        );
    }

    #[test]
    fn test_nested_text_is_concatenated() {
        let body = response("<fault><value><string>un<b>lock</b>ed</string></value></fault>");
        assert_eq!(
            interpret(&body),
            RpcOutcome::RemoteFault("unlocked".to_string())
        );
    }

    #[test]
    fn test_path_needs_full_suffix() {
        let body = response("<value><string>stray</string></value>");
        assert_eq!(
            interpret(&body),
            RpcOutcome::ParseError(PARSE_FAILURE.to_string())
        );
    }

    #[test]
    fn test_unparseable_bodies() {
        for body in [
            "",
            "   ",
            "not xml at all",
            "<methodResponse><params>",
            "<html><body>Not Found</body></html>",
            "<a></b>",
        ] {
            assert_eq!(
                interpret(body),
                RpcOutcome::ParseError(PARSE_FAILURE.to_string()),
                "body: {:?}",
                body
            );
        }
    }
}
