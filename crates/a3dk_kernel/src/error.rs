//! Errors raised while parsing a kernel port declaration.

/// A malformed or missing `A3_KERNEL(...)` declaration.
///
/// Every variant records the byte offset in the kernel source where the
/// problem was detected, so callers can point the user at a line and column.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The source contains no port declaration macro.
    #[error("A3_KERNEL port declaration not found")]
    MacroNotFound,

    /// The macro appears more than once.
    #[error("A3_KERNEL declared {count} times, expected exactly once")]
    MultipleMacros {
        /// Number of declarations found.
        count: usize,
        /// Offset of the second declaration.
        offset: usize,
    },

    /// The argument list has no closing parenthesis.
    #[error("unterminated A3_KERNEL argument list")]
    Unterminated {
        /// Offset of the opening parenthesis.
        offset: usize,
    },

    /// A parenthesis was found inside the argument list.
    #[error("nested parenthesis in A3_KERNEL argument list")]
    NestedParen {
        /// Offset of the nested parenthesis.
        offset: usize,
    },

    /// The argument list declares no ports.
    #[error("A3_KERNEL declares no ports")]
    EmptyPortList {
        /// Offset of the opening parenthesis.
        offset: usize,
    },

    /// An argument is not a `<tag> <identifier>` pair.
    #[error("malformed port argument `{arg}`, expected `<role tag> <identifier>`")]
    MalformedArgument {
        /// The offending argument, whitespace-normalised.
        arg: String,
        /// Offset of the argument.
        offset: usize,
    },

    /// The leading token is not one of the recognised role tags.
    #[error("unknown port role tag `{tag}`")]
    UnknownRole {
        /// The unrecognised tag.
        tag: String,
        /// Offset of the argument.
        offset: usize,
    },

    /// The port name is not a valid C identifier.
    #[error("invalid port identifier `{ident}`")]
    InvalidIdentifier {
        /// The rejected identifier.
        ident: String,
        /// Offset of the argument.
        offset: usize,
    },

    /// Two ports share a name.
    #[error("port `{name}` declared more than once")]
    DuplicatePort {
        /// The repeated name.
        name: String,
        /// Offset of the second declaration.
        offset: usize,
    },
}

impl ParseError {
    /// Byte offset in the kernel source the error points at, if any.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::MacroNotFound => None,
            ParseError::MultipleMacros { offset, .. }
            | ParseError::Unterminated { offset }
            | ParseError::NestedParen { offset }
            | ParseError::EmptyPortList { offset }
            | ParseError::MalformedArgument { offset, .. }
            | ParseError::UnknownRole { offset, .. }
            | ParseError::InvalidIdentifier { offset, .. }
            | ParseError::DuplicatePort { offset, .. } => Some(*offset),
        }
    }
}
