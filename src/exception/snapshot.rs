//! Cycle-safe snapshots of error graphs.

use std::collections::HashSet;
use std::rc::Rc;

use serde::Serialize;

use crate::exception::object::{
    ExcRef, MissingName, SyntaxInfo, exc_identity, safe_string,
};
use crate::source::SourceLineCache;
use crate::suggest::suggest;
use crate::trace::StackSummary;

/// Owned syntax-error fields carried by a snapshot node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxSnapshot {
    pub filename: Option<String>,
    pub lineno: Option<u32>,
    pub end_lineno: Option<u32>,
    pub text: Option<String>,
    pub offset: Option<i64>,
    pub end_offset: Option<i64>,
    pub msg: Option<String>,
}

impl SyntaxSnapshot {
    fn from_info(info: SyntaxInfo) -> Self {
        Self {
            filename: info.filename,
            lineno: info.lineno,
            end_lineno: info.end_lineno,
            text: info.text,
            offset: info.offset,
            end_offset: info.end_offset,
            msg: info.msg,
        }
    }
}

/// The cycle-free snapshot of one error instance.
///
/// The root exclusively owns every descendant (cause, context, group
/// children); no two nodes in one tree represent the same underlying
/// error identity. Presence of `children` marks a group, absence a
/// leaf.
#[derive(Debug, Serialize)]
pub struct ExceptionNode {
    pub type_name: String,
    pub message: String,
    pub notes: Vec<String>,
    pub stack: StackSummary,
    pub suppress_context: bool,
    pub cause: Option<Box<ExceptionNode>>,
    pub context: Option<Box<ExceptionNode>>,
    pub children: Option<Vec<ExceptionNode>>,
    pub syntax: Option<SyntaxSnapshot>,
}

impl ExceptionNode {
    pub fn is_group(&self) -> bool {
        self.children.is_some()
    }

    /// Structured JSON view of the snapshot, for host-side inspection.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Controls for the snapshot walk.
#[derive(Debug, Clone)]
pub struct SnapshotOptions {
    /// Frame capture limit; non-negative keeps the first N frames,
    /// negative keeps the last |N|.
    pub limit: Option<i64>,
    /// Resolve every frame's source line during the walk instead of at
    /// render time.
    pub lookup_lines: bool,
    /// In compact mode a context link is only followed when there is no
    /// cause and the context is not suppressed; otherwise every
    /// unvisited context is followed.
    pub compact: bool,
}

impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            limit: None,
            lookup_lines: true,
            compact: false,
        }
    }
}

struct PendingNode {
    type_name: String,
    message: String,
    notes: Vec<String>,
    stack: StackSummary,
    suppress_context: bool,
    syntax: Option<SyntaxSnapshot>,
    cause: Option<usize>,
    context: Option<usize>,
    children: Option<Vec<usize>>,
}

impl PendingNode {
    fn build(exc: &ExcRef, cache: &dyn SourceLineCache, options: &SnapshotOptions) -> Self {
        let stack = StackSummary::capture(exc.trace(), options.limit);
        if options.lookup_lines {
            stack.resolve_lines(cache);
        }

        let mut message = safe_string(exc.message(), "message");
        let syntax = exc.syntax_info().map(SyntaxSnapshot::from_info);
        if syntax.is_none()
            && let Some(missing) = exc.missing_name()
        {
            append_name_hints(&mut message, &missing);
        }

        let notes = exc
            .notes()
            .into_iter()
            .map(|note| safe_string(note, "note"))
            .collect();

        Self {
            type_name: exc.type_name(),
            message,
            notes,
            stack,
            suppress_context: exc.suppress_context(),
            syntax,
            cause: None,
            context: None,
            children: None,
        }
    }
}

/// Walk the error graph rooted at `exc` into an owned tree.
///
/// The walk uses an explicit work queue (no native recursion) and a
/// visited-identity set seeded with the root, so it terminates over
/// arbitrary cyclic cause/context/children graphs: the first occurrence
/// of an identity wins and later edges into it are silently dropped.
pub fn snapshot(
    exc: &ExcRef,
    cache: &dyn SourceLineCache,
    options: &SnapshotOptions,
) -> ExceptionNode {
    let mut seen: HashSet<usize> = HashSet::new();
    seen.insert(exc_identity(exc));

    let mut pending = vec![PendingNode::build(exc, cache, options)];
    let mut queue: Vec<(usize, ExcRef)> = vec![(0, Rc::clone(exc))];

    while let Some((index, exc)) = queue.pop() {
        let cause = exc.cause().and_then(|cause| {
            seen.insert(exc_identity(&cause)).then(|| {
                pending.push(PendingNode::build(&cause, cache, options));
                let child = pending.len() - 1;
                queue.push((child, cause));
                child
            })
        });

        let need_context =
            !options.compact || (cause.is_none() && !exc.suppress_context());
        let context = if need_context {
            exc.context().and_then(|context| {
                seen.insert(exc_identity(&context)).then(|| {
                    pending.push(PendingNode::build(&context, cache, options));
                    let child = pending.len() - 1;
                    queue.push((child, context));
                    child
                })
            })
        } else {
            None
        };

        let children = exc.group_children().map(|kids| {
            kids.into_iter()
                .filter_map(|kid| {
                    seen.insert(exc_identity(&kid)).then(|| {
                        pending.push(PendingNode::build(&kid, cache, options));
                        let child = pending.len() - 1;
                        queue.push((child, kid));
                        child
                    })
                })
                .collect()
        });

        let node = &mut pending[index];
        node.cause = cause;
        node.context = context;
        node.children = children;
    }

    assemble(pending)
}

/// Turn the pending arena into the owned tree. Every edge points from a
/// lower index to a higher one, so walking backwards finishes children
/// before their parents.
fn assemble(mut pending: Vec<PendingNode>) -> ExceptionNode {
    let mut finished: Vec<Option<ExceptionNode>> = Vec::new();
    finished.resize_with(pending.len(), || None);

    while let Some(node) = pending.pop() {
        let index = pending.len();
        let assembled = ExceptionNode {
            type_name: node.type_name,
            message: node.message,
            notes: node.notes,
            stack: node.stack,
            suppress_context: node.suppress_context,
            cause: node
                .cause
                .and_then(|i| finished[i].take())
                .map(Box::new),
            context: node
                .context
                .and_then(|i| finished[i].take())
                .map(Box::new),
            children: node
                .children
                .map(|ids| ids.into_iter().filter_map(|i| finished[i].take()).collect()),
            syntax: node.syntax,
        };
        finished[index] = Some(assembled);
    }

    finished
        .into_iter()
        .next()
        .flatten()
        .expect("snapshot arena always holds a root node")
}

fn append_name_hints(message: &mut String, missing: &MissingName) {
    match missing {
        MissingName::Attribute { name, attributes } => {
            if let Some(found) = suggest(name, attributes) {
                message.push_str(&format!(". Did you mean: '{found}'?"));
            }
        }
        MissingName::Import { name, members } => {
            if let Some(found) = suggest(name, members) {
                message.push_str(&format!(". Did you mean: '{found}'?"));
            }
        }
        MissingName::Name { name, scope } => {
            let receiver_hit = scope
                .receiver_attributes
                .as_ref()
                .is_some_and(|attrs| attrs.iter().any(|attr| attr == name));
            let suggestion = if receiver_hit {
                Some(format!("self.{name}"))
            } else {
                let mut pool = Vec::with_capacity(
                    scope.locals.len() + scope.globals.len() + scope.builtins.len(),
                );
                pool.extend_from_slice(&scope.locals);
                pool.extend_from_slice(&scope.globals);
                pool.extend_from_slice(&scope.builtins);
                suggest(name, &pool)
            };
            if let Some(found) = &suggestion {
                message.push_str(&format!(". Did you mean: '{found}'?"));
            }
            if scope.modules.iter().any(|module| module == name) {
                if suggestion.is_some() {
                    message.push_str(&format!(" Or did you forget to import '{name}'"));
                } else {
                    message.push_str(&format!(". Did you forget to import '{name}'"));
                }
            }
        }
    }
}
