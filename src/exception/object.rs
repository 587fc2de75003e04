//! Accessor interface over a host's live error objects.

use std::rc::Rc;

use crate::trace::RawFrame;

/// Shared handle to a live error object. Links between errors may form
/// cycles; the snapshot walk is responsible for breaking them.
pub type ExcRef = Rc<dyn ExceptionLike>;

/// Marker for a value that failed to stringify. The engine never
/// propagates it; it is folded into a placeholder via [`safe_string`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unprintable;

/// Fold a fallible stringification into display text, substituting a
/// placeholder that names the failed operation.
pub fn safe_string(value: Result<String, Unprintable>, what: &str) -> String {
    value.unwrap_or_else(|_| format!("<unprintable {what}>"))
}

/// Syntax-error details as carried by the host error object.
///
/// `offset`/`end_offset` are 1-based byte columns into `text`; an
/// `end_offset` of `0`, `-1`, or equal to `offset` degrades to a
/// single-column caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxInfo {
    pub filename: Option<String>,
    pub lineno: Option<u32>,
    pub end_lineno: Option<u32>,
    pub text: Option<String>,
    pub offset: Option<i64>,
    pub end_offset: Option<i64>,
    pub msg: Option<String>,
}

/// Name pools visible at the failure site of an unresolved-name error.
#[derive(Debug, Clone, Default)]
pub struct ScopeNames {
    pub locals: Vec<String>,
    pub globals: Vec<String>,
    pub builtins: Vec<String>,
    /// Attribute names of the method receiver, when the failure happened
    /// inside a method body. Checked before any fuzzy matching.
    pub receiver_attributes: Option<Vec<String>>,
    /// Importable module names known to the host.
    pub modules: Vec<String>,
}

/// A recorded missing name together with the candidate pool appropriate
/// for its error family.
#[derive(Debug, Clone)]
pub enum MissingName {
    /// Attribute lookup failed; candidates are the object's attributes.
    Attribute { name: String, attributes: Vec<String> },
    /// Import of a member failed; candidates are the module's members.
    Import { name: String, members: Vec<String> },
    /// A bare name did not resolve; candidates come from the scopes in
    /// effect at the failure site.
    Name { name: String, scope: ScopeNames },
}

impl MissingName {
    pub fn name(&self) -> &str {
        match self {
            MissingName::Attribute { name, .. }
            | MissingName::Import { name, .. }
            | MissingName::Name { name, .. } => name,
        }
    }
}

/// Read access to one live error object.
///
/// Everything the snapshot needs is behind this trait so the engine
/// holds no references into host state once the walk completes.
pub trait ExceptionLike {
    fn type_name(&self) -> String;

    /// The error message. A failed stringification is reported as
    /// `Err(Unprintable)` and rendered as a placeholder, never
    /// propagated.
    fn message(&self) -> Result<String, Unprintable>;

    fn notes(&self) -> Vec<Result<String, Unprintable>> {
        Vec::new()
    }

    fn cause(&self) -> Option<ExcRef> {
        None
    }

    fn context(&self) -> Option<ExcRef> {
        None
    }

    fn suppress_context(&self) -> bool {
        false
    }

    /// Child errors when this error is an aggregate group, `None` for
    /// ordinary errors. An empty vector is still a group.
    fn group_children(&self) -> Option<Vec<ExcRef>> {
        None
    }

    /// The captured trace, outermost frame first.
    fn trace(&self) -> Vec<RawFrame> {
        Vec::new()
    }

    fn syntax_info(&self) -> Option<SyntaxInfo> {
        None
    }

    fn missing_name(&self) -> Option<MissingName> {
        None
    }
}

/// Identity of an error object for cycle detection: pointer identity of
/// the shared handle.
pub(crate) fn exc_identity(exc: &ExcRef) -> usize {
    Rc::as_ptr(exc) as *const () as usize
}
