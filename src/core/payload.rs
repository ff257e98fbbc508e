use crate::domain::model::MethodCall;
use crate::utils::error::RpcError;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// Builds a method call, trimming each argument. Argument order is kept as
/// given; arity is the caller's business.
pub fn build<I, S>(method_name: &str, args: I) -> MethodCall
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let params = args
        .into_iter()
        .map(|arg| arg.as_ref().trim().to_string())
        .collect();

    MethodCall::from_parts(method_name.to_string(), params)
}

/// Serializes a method call into the indented request document:
///
/// ```text
/// <methodCall>
///   <methodName>NAME</methodName>
///   <params>
///     <param>
///       <value>
///         <string>ARG</string>
///       </value>
///     </param>
///   </params>
/// </methodCall>
/// ```
///
/// A call without arguments has no `<params>` element. Text holding a
/// character XML 1.0 does not allow is an encoding error.
pub fn to_xml(call: &MethodCall) -> Result<String, RpcError> {
    if let Some(c) = call.method_name().chars().find(|c| !is_xml_char(*c)) {
        return Err(RpcError::Encoding(format!(
            "method name contains {:?}, which is not allowed in XML",
            c
        )));
    }
    for (n, param) in call.params().iter().enumerate() {
        if let Some(c) = param.chars().find(|c| !is_xml_char(*c)) {
            return Err(RpcError::Encoding(format!(
                "argument {} contains {:?}, which is not allowed in XML",
                n + 1,
                c
            )));
        }
    }

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    start(&mut writer, "methodCall")?;
    text_element(&mut writer, "methodName", call.method_name())?;
    if !call.params().is_empty() {
        start(&mut writer, "params")?;
        for param in call.params() {
            start(&mut writer, "param")?;
            start(&mut writer, "value")?;
            text_element(&mut writer, "string", param)?;
            end(&mut writer, "value")?;
            end(&mut writer, "param")?;
        }
        end(&mut writer, "params")?;
    }
    end(&mut writer, "methodCall")?;

    String::from_utf8(writer.into_inner()).map_err(|e| RpcError::Encoding(e.to_string()))
}

// Char production of XML 1.0; surrogates cannot occur in a `char`.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || (('\u{20}'..='\u{FFFD}').contains(&c) && c != '\u{FFFE}')
        || c >= '\u{10000}'
}

fn start(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<(), RpcError> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(|e| RpcError::Encoding(e.to_string()))
}

fn end(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<(), RpcError> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(|e| RpcError::Encoding(e.to_string()))
}

fn text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<(), RpcError> {
    start(writer, name)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(|e| RpcError::Encoding(e.to_string()))?;
    end(writer, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_trims_and_keeps_order() {
        let call = build("setParameters", [" /a/b ", "12"]);
        assert_eq!(call.method_name(), "setParameters");
        assert_eq!(call.params(), ["/a/b", "12"]);
    }

    #[test]
    fn test_build_accepts_any_arity() {
        let none = build("ping", Vec::<String>::new());
        assert!(none.params().is_empty());

        let three = build("setModeMediaLevel", ["/viper/x ", "\tOnline", ""]);
        assert_eq!(three.params(), ["/viper/x", "Online", ""]);
    }

    #[test]
    fn test_to_xml_document_shape() {
        let call = build("setBoxParameters", ["/x/y", "5"]);
        let xml = to_xml(&call).unwrap();

        assert!(xml.starts_with("<methodCall>"));
        assert!(xml.trim_end().ends_with("</methodCall>"));
        assert!(xml.contains("\n  <methodName>setBoxParameters</methodName>"));
        assert!(xml.contains("<string>/x/y</string>"));
        assert!(xml.contains("<string>5</string>"));
        assert_eq!(xml.matches("<param>").count(), 2);

        let path_at = xml.find("/x/y").unwrap();
        let value_at = xml.find("<string>5<").unwrap();
        assert!(path_at < value_at);
    }

    #[test]
    fn test_to_xml_rejects_control_characters() {
        let err = to_xml(&build("setBoxParameters", ["/a", "b\u{1}c"])).unwrap_err();
        assert!(matches!(err, RpcError::Encoding(ref msg) if msg.starts_with("argument 2")));

        let err = to_xml(&build("set\u{0}Box", ["/a"])).unwrap_err();
        assert!(matches!(err, RpcError::Encoding(_)));

        let err = to_xml(&build("setBoxParameters", ["/a", "\u{FFFF}"])).unwrap_err();
        assert!(matches!(err, RpcError::Encoding(_)));
    }

    #[test]
    fn test_to_xml_keeps_allowed_whitespace_and_unicode() {
        let call = build("setBoxParameters", ["/a", "line1\nline2\tx é 🎛"]);
        let xml = to_xml(&call).unwrap();
        assert!(xml.contains("line1\nline2\tx é 🎛"));
    }

    #[test]
    fn test_to_xml_without_arguments_has_no_params() {
        let xml = to_xml(&build("ping", Vec::<String>::new())).unwrap();
        assert!(xml.contains("<methodName>ping</methodName>"));
        assert!(!xml.contains("<params>"));
        assert!(!xml.contains("</params>"));
    }

    #[test]
    fn test_to_xml_escapes_markup() {
        let call = build("setBoxParameters", ["/a[@id='1']", "<on & off>"]);
        let xml = to_xml(&call).unwrap();

        assert!(xml.contains("&lt;on &amp; off&gt;"));
        assert!(!xml.contains("<on & off>"));
    }
}
