//! The template text language.
//!
//! ```text
//! entity <<NAME>> is            -- substitution
//! <<generate for PORTS>>
//!   bank_<<pid>> : <<pname>>    -- once per PORTS entry, entry keys in scope
//! <<end generate>>
//! ```
//!
//! A `<<` that does not open one of these tags is copied through unchanged,
//! so HDL shift operators survive rendering.

use serde_json::{Map, Value};

use crate::dictionary::scalar_text;

#[derive(Debug, PartialEq)]
enum Node {
    Text(String),
    Var(String),
    Generate { key: String, body: Vec<Node> },
}

/// Why a template could not be rendered.
#[derive(Debug, PartialEq, Eq)]
pub enum TextError {
    /// A key is not bound in any scope.
    UnknownKey(String),
    /// The template is structurally invalid.
    Syntax(String),
}

/// Renders `template` with `scopes`, innermost scope last.
pub fn render(template: &str, scopes: &[&Map<String, Value>]) -> Result<String, TextError> {
    let nodes = parse(template)?;
    let mut out = String::with_capacity(template.len());
    let mut stack = scopes.to_vec();
    emit(&nodes, &mut stack, &mut out)?;
    Ok(out)
}

enum Tag<'a> {
    Var(&'a str),
    Open(&'a str),
    Close,
}

fn classify_tag(content: &str) -> Option<Tag<'_>> {
    if content == "end generate" {
        return Some(Tag::Close);
    }
    if let Some(key) = content.strip_prefix("generate for ") {
        return is_key(key).then_some(Tag::Open(key));
    }
    is_key(content).then_some(Tag::Var(content))
}

fn is_key(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse(template: &str) -> Result<Vec<Node>, TextError> {
    // Each open generate block pushes (key, nodes emitted before it).
    let mut stack: Vec<(String, Vec<Node>)> = Vec::new();
    let mut nodes = Vec::new();
    let mut text = String::new();
    let mut rest = template;

    while let Some(start) = rest.find("<<") {
        let after = &rest[start + 2..];
        let tag = after
            .find(">>")
            .filter(|end| !after[..*end].contains('\n'))
            .and_then(|end| classify_tag(&after[..end]).map(|tag| (tag, end)));
        let Some((tag, end)) = tag else {
            text.push_str(&rest[..start + 2]);
            rest = after;
            continue;
        };

        text.push_str(&rest[..start]);
        if !text.is_empty() {
            nodes.push(Node::Text(std::mem::take(&mut text)));
        }
        match tag {
            Tag::Var(key) => nodes.push(Node::Var(key.to_string())),
            Tag::Open(key) => stack.push((key.to_string(), std::mem::take(&mut nodes))),
            Tag::Close => {
                let (key, outer) = stack.pop().ok_or_else(|| {
                    TextError::Syntax("`end generate` without `generate for`".into())
                })?;
                let body = std::mem::replace(&mut nodes, outer);
                nodes.push(Node::Generate { key, body });
            }
        }
        rest = &after[end + 2..];
    }
    text.push_str(rest);
    if !text.is_empty() {
        nodes.push(Node::Text(text));
    }

    match stack.pop() {
        Some((key, _)) => Err(TextError::Syntax(format!(
            "unterminated `generate for {key}`"
        ))),
        None => Ok(nodes),
    }
}

fn lookup<'a>(scopes: &[&'a Map<String, Value>], key: &str) -> Option<&'a Value> {
    scopes.iter().rev().find_map(|scope| scope.get(key))
}

fn emit<'a>(
    nodes: &[Node],
    scopes: &mut Vec<&'a Map<String, Value>>,
    out: &mut String,
) -> Result<(), TextError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var(key) => {
                let value = lookup(scopes, key).ok_or_else(|| TextError::UnknownKey(key.clone()))?;
                let text = scalar_text(value)
                    .ok_or_else(|| TextError::Syntax(format!("`{key}` is a list, not a value")))?;
                out.push_str(&text);
            }
            Node::Generate { key, body } => {
                let value = lookup(scopes, key).ok_or_else(|| TextError::UnknownKey(key.clone()))?;
                let entries = value
                    .as_array()
                    .ok_or_else(|| TextError::Syntax(format!("`{key}` is not a list")))?;
                for entry in entries {
                    let entry = entry.as_object().ok_or_else(|| {
                        TextError::Syntax(format!("`{key}` entries must be records"))
                    })?;
                    scopes.push(entry);
                    let result = emit(body, scopes, out);
                    scopes.pop();
                    result?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dict(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn substitutes_scalars() {
        let d = dict(json!({"NAME": "fir", "NUMREGS": 2}));
        assert_eq!(
            render("entity <<NAME>> has <<NUMREGS>> regs", &[&d]).unwrap(),
            "entity fir has 2 regs"
        );
    }

    #[test]
    fn generate_block_repeats_with_entry_scope() {
        let d = dict(json!({
            "NAME": "fir",
            "PORTS": [{"pname": "a", "pid": 0}, {"pname": "b", "pid": 1}]
        }));
        let tpl = "<<generate for PORTS>><<NAME>>.<<pname>>=<<pid>>;<<end generate>>";
        assert_eq!(render(tpl, &[&d]).unwrap(), "fir.a=0;fir.b=1;");
    }

    #[test]
    fn nested_generate() {
        let d = dict(json!({
            "SLOTS": [
                {"id": 0, "K": [{"n": "x"}, {"n": "y"}]},
                {"id": 1, "K": []}
            ]
        }));
        let tpl = "<<generate for SLOTS>>[<<id>>:<<generate for K>><<n>><<end generate>>]<<end generate>>";
        assert_eq!(render(tpl, &[&d]).unwrap(), "[0:xy][1:]");
    }

    #[test]
    fn shift_operators_pass_through() {
        let d = dict(json!({"W": 8}));
        let tpl = "assign y = a << 2; assign z = b >> 1; // <<W>>";
        assert_eq!(
            render(tpl, &[&d]).unwrap(),
            "assign y = a << 2; assign z = b >> 1; // 8"
        );
    }

    #[test]
    fn unknown_key_reported() {
        let d = dict(json!({}));
        assert_eq!(
            render("<<MISSING>>", &[&d]).unwrap_err(),
            TextError::UnknownKey("MISSING".into())
        );
    }

    #[test]
    fn unterminated_generate() {
        let d = dict(json!({"L": []}));
        assert!(matches!(
            render("<<generate for L>>x", &[&d]).unwrap_err(),
            TextError::Syntax(_)
        ));
    }

    #[test]
    fn stray_end_generate() {
        let d = dict(json!({}));
        assert!(matches!(
            render("x<<end generate>>", &[&d]).unwrap_err(),
            TextError::Syntax(_)
        ));
    }

    #[test]
    fn list_in_scalar_position() {
        let d = dict(json!({"L": []}));
        assert!(matches!(
            render("<<L>>", &[&d]).unwrap_err(),
            TextError::Syntax(_)
        ));
    }
}
