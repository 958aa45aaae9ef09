//! Identifier-or-placeholder policies.
//!
//! The parser consults its policy at every site where an identifier is
//! structurally required. Strict parsing never substitutes; loose parsing
//! substitutes a zero-width placeholder so editing-time input such as
//! `foo.` still yields a complete tree.

/// Text of a placeholder identifier. It cannot be scanned from source.
pub const DUMMY_PLACEHOLDER: &str = "\u{2716}";

/// Where an identifier was expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierSite {
    /// Property name after `.` or `?.`.
    MemberName,
    /// Field name after a shortcut `:`.
    ShortcutMember,
    /// An omitted positional attribute, e.g. `hint , 2`.
    PositionalAttribute,
}

pub trait IdentifierPolicy {
    /// Whether a placeholder may stand in for a missing identifier at `site`.
    fn allows_placeholder(&self, site: IdentifierSite) -> bool;
}

/// Every missing identifier is a syntax error.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictIdentifiers;

impl IdentifierPolicy for StrictIdentifiers {
    fn allows_placeholder(&self, _site: IdentifierSite) -> bool {
        false
    }
}

/// Missing identifiers become placeholders wherever the tooling path needs them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LooseIdentifiers;

impl IdentifierPolicy for LooseIdentifiers {
    fn allows_placeholder(&self, site: IdentifierSite) -> bool {
        matches!(
            site,
            IdentifierSite::MemberName
                | IdentifierSite::ShortcutMember
                | IdentifierSite::PositionalAttribute
        )
    }
}
