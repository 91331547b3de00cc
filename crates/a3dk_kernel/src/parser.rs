//! Extraction of the `A3_KERNEL(...)` port declaration from kernel source.
//!
//! The declaration has the form
//!
//! ```text
//! A3_KERNEL(a3in_t a, a3in_t b, a3reg_t size, a3out_t c)
//! ```
//!
//! Each comma-separated argument must be exactly one role tag followed by one
//! C identifier. The macro must appear exactly once outside comments.

use crate::error::ParseError;
use crate::port::{ParsedPort, PortRole};
use std::collections::HashSet;

/// Name of the port declaration macro.
pub const KERNEL_MACRO: &str = "A3_KERNEL";

/// A parsed port declaration.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PortDeclaration {
    /// Arguments after whitespace normalisation, e.g. `a3in_t a`.
    pub raw_args: Vec<String>,
    /// One port per argument, in declaration order.
    pub ports: Vec<ParsedPort>,
    /// Byte offset of the macro name in the source.
    pub offset: usize,
}

impl PortDeclaration {
    /// `(role tag, identifier)` token pairs, in declaration order.
    pub fn tokens(&self) -> Vec<(&'static str, &str)> {
        self.ports
            .iter()
            .map(|p| (p.role.tag(), p.name.as_str()))
            .collect()
    }

    /// The argument list with role tags removed, e.g. `a, b, size, c`.
    pub fn args(&self) -> String {
        self.ports
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Parses the single `A3_KERNEL(...)` declaration in `source`.
pub fn parse_port_declaration(source: &str) -> Result<PortDeclaration, ParseError> {
    let code = blank_comments(source);
    let sites = find_macro_sites(&code);
    let (offset, open) = match sites.as_slice() {
        [] => return Err(ParseError::MacroNotFound),
        [site] => *site,
        [_, second, ..] => {
            return Err(ParseError::MultipleMacros {
                count: sites.len(),
                offset: second.0,
            })
        }
    };

    let body_start = open + 1;
    let body_len = code[body_start..]
        .find(')')
        .ok_or(ParseError::Unterminated { offset: open })?;
    let body = &code[body_start..body_start + body_len];
    if let Some(nested) = body.find('(') {
        return Err(ParseError::NestedParen {
            offset: body_start + nested,
        });
    }
    if body.trim().is_empty() {
        return Err(ParseError::EmptyPortList { offset: open });
    }

    let mut raw_args = Vec::new();
    let mut ports = Vec::new();
    let mut seen = HashSet::new();
    let mut arg_start = body_start;
    for arg in body.split(',') {
        let arg_offset = arg_start + (arg.len() - arg.trim_start().len());
        arg_start += arg.len() + 1;

        let normalized = normalize(arg);
        let port = parse_argument(&normalized, arg_offset)?;
        if !seen.insert(port.name.clone()) {
            return Err(ParseError::DuplicatePort {
                name: port.name,
                offset: arg_offset,
            });
        }
        raw_args.push(normalized);
        ports.push(port);
    }

    tracing::debug!(ports = ports.len(), "parsed {KERNEL_MACRO} declaration");
    Ok(PortDeclaration {
        raw_args,
        ports,
        offset,
    })
}

/// Splits one normalised argument into its role and identifier.
fn parse_argument(arg: &str, offset: usize) -> Result<ParsedPort, ParseError> {
    let tokens: Vec<&str> = arg.split_whitespace().collect();
    let [tag, ident] = tokens.as_slice() else {
        return Err(ParseError::MalformedArgument {
            arg: arg.to_string(),
            offset,
        });
    };
    let role = PortRole::from_tag(tag).ok_or_else(|| ParseError::UnknownRole {
        tag: tag.to_string(),
        offset,
    })?;
    if !is_identifier(ident) {
        return Err(ParseError::InvalidIdentifier {
            ident: ident.to_string(),
            offset,
        });
    }
    Ok(ParsedPort {
        role,
        name: ident.to_string(),
        offset,
    })
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Drops line breaks, collapses runs of two or more whitespace characters
/// into one space, and trims the result.
fn normalize(arg: &str) -> String {
    fn flush(out: &mut String, run: &mut String) {
        match run.chars().count() {
            0 => {}
            1 => out.push_str(run),
            _ => out.push(' '),
        }
        run.clear();
    }

    let mut out = String::with_capacity(arg.len());
    let mut run = String::new();
    for c in arg.chars().filter(|c| !matches!(c, '\n' | '\r')) {
        if c.is_whitespace() {
            run.push(c);
        } else {
            flush(&mut out, &mut run);
            out.push(c);
        }
    }
    flush(&mut out, &mut run);
    out.trim().to_string()
}

/// Returns `(name offset, open paren offset)` for every macro invocation.
fn find_macro_sites(code: &str) -> Vec<(usize, usize)> {
    let bytes = code.as_bytes();
    code.match_indices(KERNEL_MACRO)
        .filter_map(|(start, _)| {
            if start > 0 && is_ident_byte(bytes[start - 1]) {
                return None;
            }
            let after = start + KERNEL_MACRO.len();
            let rest = &code[after..];
            let trimmed = rest.trim_start();
            trimmed
                .starts_with('(')
                .then(|| (start, after + rest.len() - trimmed.len()))
        })
        .collect()
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Replaces `//` and `/* */` comments and the contents of string and character
/// literals with spaces, keeping byte offsets and line breaks intact. The
/// literal quotes themselves are kept.
fn blank_comments(source: &str) -> String {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        Code,
        Line,
        Block,
        Literal(char),
    }

    let mut out = String::with_capacity(source.len());
    let mut state = State::Code;
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        match state {
            State::Code => match (c, chars.peek()) {
                ('/', Some('/')) => {
                    chars.next();
                    out.push_str("  ");
                    state = State::Line;
                }
                ('/', Some('*')) => {
                    chars.next();
                    out.push_str("  ");
                    state = State::Block;
                }
                ('"' | '\'', _) => {
                    out.push(c);
                    state = State::Literal(c);
                }
                _ => out.push(c),
            },
            State::Line => {
                if c == '\n' {
                    out.push('\n');
                    state = State::Code;
                } else {
                    blank(&mut out, c);
                }
            }
            State::Block => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    state = State::Code;
                } else {
                    blank(&mut out, c);
                }
            }
            State::Literal(quote) => {
                if c == quote || c == '\n' {
                    out.push(c);
                    state = State::Code;
                } else {
                    blank(&mut out, c);
                    if c == '\\' {
                        if let Some(escaped) = chars.next() {
                            blank(&mut out, escaped);
                        }
                    }
                }
            }
        }
    }
    out
}

fn blank(out: &mut String, c: char) {
    if c == '\n' {
        out.push('\n');
    } else {
        out.extend(std::iter::repeat(' ').take(c.len_utf8()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_declaration() {
        let decl = parse_port_declaration("A3_KERNEL(a3in_t x, a3out_t y, a3reg_t r)").unwrap();
        assert_eq!(decl.raw_args, vec!["a3in_t x", "a3out_t y", "a3reg_t r"]);
        assert_eq!(
            decl.tokens(),
            vec![("a3in_t", "x"), ("a3out_t", "y"), ("a3reg_t", "r")]
        );
        assert_eq!(decl.args(), "x, y, r");
        assert_eq!(decl.offset, 0);
    }

    #[test]
    fn all_five_roles() {
        let src = "A3_KERNEL(a3const_t k, a3in_t i, a3out_t o, a3inout_t io, a3reg_t r)";
        let decl = parse_port_declaration(src).unwrap();
        let roles: Vec<_> = decl.ports.iter().map(|p| p.role).collect();
        assert_eq!(roles, PortRole::ALL.to_vec());
    }

    #[test]
    fn multiline_declaration_normalised() {
        let src = concat!(
            "#include \"artico3.h\"\n\n",
            "A3_KERNEL(a3in_t    a,\r\n          a3in_t b,\n\ta3out_t  c) {\n}\n",
        );
        let decl = parse_port_declaration(src).unwrap();
        assert_eq!(decl.raw_args, vec!["a3in_t a", "a3in_t b", "a3out_t c"]);
        assert_eq!(decl.args(), "a, b, c");
        assert_eq!(decl.offset, src.find("A3_KERNEL").unwrap());
    }

    #[test]
    fn space_before_paren_accepted() {
        let decl = parse_port_declaration("A3_KERNEL (a3in_t a)").unwrap();
        assert_eq!(decl.ports.len(), 1);
    }

    #[test]
    fn argument_offsets_point_at_arguments() {
        let src = "A3_KERNEL(a3in_t a,  a3out_t b)";
        let decl = parse_port_declaration(src).unwrap();
        assert_eq!(decl.ports[0].offset, 10);
        assert_eq!(decl.ports[1].offset, src.find("a3out_t").unwrap());
    }

    #[test]
    fn missing_macro() {
        let err = parse_port_declaration("void kernel(int *a) {}").unwrap_err();
        assert_eq!(err, ParseError::MacroNotFound);
    }

    #[test]
    fn longer_identifier_is_not_the_macro() {
        let err = parse_port_declaration("MY_A3_KERNEL(a3in_t a)").unwrap_err();
        assert_eq!(err, ParseError::MacroNotFound);
    }

    #[test]
    fn duplicate_macro() {
        let src = "A3_KERNEL(a3in_t a)\nA3_KERNEL(a3in_t b)\n";
        let err = parse_port_declaration(src).unwrap_err();
        assert_eq!(
            err,
            ParseError::MultipleMacros {
                count: 2,
                offset: 20
            }
        );
    }

    #[test]
    fn commented_declarations_ignored() {
        let src = concat!(
            "// A3_KERNEL(a3in_t old)\n",
            "/* A3_KERNEL(\n a3in_t older) */\n",
            "A3_KERNEL(a3in_t a, a3out_t b)",
        );
        let decl = parse_port_declaration(src).unwrap();
        assert_eq!(decl.args(), "a, b");
    }

    #[test]
    fn comment_marker_inside_string_literal() {
        let src = "const char *u = \"http://x\";\nA3_KERNEL(a3in_t a)";
        let decl = parse_port_declaration(src).unwrap();
        assert_eq!(decl.args(), "a");
    }

    #[test]
    fn macro_inside_string_literal_ignored() {
        let src = "log(\"A3_KERNEL(a3in_t x)\");\nchar q = '\\'';\nA3_KERNEL(a3in_t a)";
        let decl = parse_port_declaration(src).unwrap();
        assert_eq!(decl.args(), "a");
        assert_eq!(decl.offset, src.rfind("A3_KERNEL").unwrap());
    }

    #[test]
    fn blank_literal_preserves_length() {
        let src = "s = \"a\\\"(\u{e9}\";\n";
        let code = blank_comments(src);
        assert_eq!(code.len(), src.len());
        assert!(code.ends_with("\";\n"));
        assert!(!code.contains('('));
    }

    #[test]
    fn unterminated_list() {
        let err = parse_port_declaration("A3_KERNEL(a3in_t a, a3out_t b").unwrap_err();
        assert_eq!(err, ParseError::Unterminated { offset: 9 });
    }

    #[test]
    fn nested_paren() {
        let err = parse_port_declaration("A3_KERNEL(a3in_t (a))").unwrap_err();
        assert_eq!(err, ParseError::NestedParen { offset: 17 });
    }

    #[test]
    fn empty_list() {
        let err = parse_port_declaration("A3_KERNEL(  )").unwrap_err();
        assert!(matches!(err, ParseError::EmptyPortList { .. }));
    }

    #[test]
    fn trailing_comma_is_malformed() {
        let err = parse_port_declaration("A3_KERNEL(a3in_t a, )").unwrap_err();
        assert!(matches!(err, ParseError::MalformedArgument { ref arg, .. } if arg.is_empty()));
    }

    #[test]
    fn three_tokens_is_malformed() {
        let err = parse_port_declaration("A3_KERNEL(a3in_t a3out_t y)").unwrap_err();
        assert!(matches!(err, ParseError::MalformedArgument { .. }));
    }

    #[test]
    fn unknown_tag_rejected() {
        let err = parse_port_declaration("A3_KERNEL(a3in_t a, int b)").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownRole {
                tag: "int".into(),
                offset: 20
            }
        );
    }

    #[test]
    fn tag_must_lead() {
        let err = parse_port_declaration("A3_KERNEL(x a3in_t)").unwrap_err();
        assert!(matches!(err, ParseError::UnknownRole { ref tag, .. } if tag == "x"));
    }

    #[test]
    fn invalid_identifier() {
        let err = parse_port_declaration("A3_KERNEL(a3in_t *a)").unwrap_err();
        assert!(matches!(err, ParseError::InvalidIdentifier { ref ident, .. } if ident == "*a"));
    }

    #[test]
    fn duplicate_port() {
        let err = parse_port_declaration("A3_KERNEL(a3in_t a, a3out_t a)").unwrap_err();
        assert!(matches!(err, ParseError::DuplicatePort { ref name, .. } if name == "a"));
    }

    #[test]
    fn recovers_every_declared_port() {
        let names: Vec<String> = (0..12).map(|i| format!("p{i}")).collect();
        let args: Vec<String> = names
            .iter()
            .enumerate()
            .map(|(i, n)| format!("{} {n}", PortRole::ALL[i % 5].tag()))
            .collect();
        let src = format!("A3_KERNEL({})", args.join(",\n    "));
        let decl = parse_port_declaration(&src).unwrap();
        assert_eq!(decl.ports.len(), 12);
        let parsed: Vec<_> = decl.ports.iter().map(|p| p.name.clone()).collect();
        assert_eq!(parsed, names);
    }

    #[test]
    fn normalize_rules() {
        assert_eq!(normalize("  a3in_t   x  "), "a3in_t x");
        assert_eq!(normalize("a3in_t\tx"), "a3in_t\tx");
        assert_eq!(normalize("a3in_t \r\n x"), "a3in_t x");
    }

    #[test]
    fn blank_comments_preserves_length() {
        let src = "a /* é */ b // c\nd";
        let out = blank_comments(src);
        assert_eq!(out.len(), src.len());
        assert!(out.ends_with("\nd"));
        assert!(!out.contains('c'));
    }
}
