//! Live error graph interface and its owned snapshot form.
//!
//! Hosts expose raised errors through the [`ExceptionLike`] accessor
//! trait; [`snapshot`] walks the (possibly cyclic) graph of cause,
//! context, and group-child links exactly once per error identity and
//! produces an owned, cycle-free [`ExceptionNode`] tree ready for
//! rendering.

mod last;
mod object;
mod snapshot;

pub use last::LastException;
pub use object::{
    ExcRef, ExceptionLike, MissingName, ScopeNames, SyntaxInfo, Unprintable, safe_string,
};
pub use snapshot::{ExceptionNode, SnapshotOptions, SyntaxSnapshot, snapshot};
