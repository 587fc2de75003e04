#![allow(dead_code)]

use std::rc::Rc;

use traceback::exception::{ExcRef, ExceptionLike, MissingName, SyntaxInfo, Unprintable};
use traceback::{RawFrame, SourcePosition};

/// Minimal host-side error object for exercising the public API.
pub struct HostError {
    type_name: String,
    message: Result<String, Unprintable>,
    notes: Vec<String>,
    cause: Option<ExcRef>,
    context: Option<ExcRef>,
    suppress_context: bool,
    children: Option<Vec<ExcRef>>,
    frames: Vec<(SourcePosition, String)>,
    syntax: Option<SyntaxInfo>,
    missing: Option<MissingName>,
}

impl HostError {
    pub fn new(type_name: &str, message: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            message: Ok(message.to_string()),
            notes: Vec::new(),
            cause: None,
            context: None,
            suppress_context: false,
            children: None,
            frames: Vec::new(),
            syntax: None,
            missing: None,
        }
    }

    pub fn with_frame(mut self, file: &str, line: u32, function: &str) -> Self {
        self.frames
            .push((SourcePosition::line_only(file, line), function.to_string()));
        self
    }

    pub fn with_span_frame(mut self, position: SourcePosition, function: &str) -> Self {
        self.frames.push((position, function.to_string()));
        self
    }

    pub fn with_cause(mut self, cause: ExcRef) -> Self {
        self.cause = Some(cause);
        self
    }

    pub fn with_context(mut self, context: ExcRef) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_suppressed_context(mut self, context: ExcRef) -> Self {
        self.context = Some(context);
        self.suppress_context = true;
        self
    }

    pub fn with_children(mut self, children: Vec<ExcRef>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn with_note(mut self, note: &str) -> Self {
        self.notes.push(note.to_string());
        self
    }

    pub fn with_syntax(mut self, syntax: SyntaxInfo) -> Self {
        self.syntax = Some(syntax);
        self
    }

    pub fn with_missing(mut self, missing: MissingName) -> Self {
        self.missing = Some(missing);
        self
    }

    pub fn build(self) -> ExcRef {
        Rc::new(self) as ExcRef
    }
}

impl ExceptionLike for HostError {
    fn type_name(&self) -> String {
        self.type_name.clone()
    }

    fn message(&self) -> Result<String, Unprintable> {
        self.message.clone()
    }

    fn notes(&self) -> Vec<Result<String, Unprintable>> {
        self.notes.iter().map(|note| Ok(note.clone())).collect()
    }

    fn cause(&self) -> Option<ExcRef> {
        self.cause.clone()
    }

    fn context(&self) -> Option<ExcRef> {
        self.context.clone()
    }

    fn suppress_context(&self) -> bool {
        self.suppress_context
    }

    fn group_children(&self) -> Option<Vec<ExcRef>> {
        self.children.clone()
    }

    fn trace(&self) -> Vec<RawFrame> {
        self.frames
            .iter()
            .map(|(position, name)| RawFrame::new(position.clone(), name.clone()))
            .collect()
    }

    fn syntax_info(&self) -> Option<SyntaxInfo> {
        self.syntax.clone()
    }

    fn missing_name(&self) -> Option<MissingName> {
        self.missing.clone()
    }
}
