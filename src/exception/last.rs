//! Holder for the most recently rendered error.

use crate::exception::object::ExcRef;
use crate::exception::snapshot::{SnapshotOptions, snapshot};
use crate::render::{FormatOptions, format_with_chain};
use crate::source::SourceLineCache;

/// An explicit slot for the last error a host reported, for
/// re-rendering on demand (post-mortem inspection, "print the last
/// error again" commands).
///
/// Hosts own one of these wherever their session state lives; there is
/// no ambient global.
#[derive(Default)]
pub struct LastException {
    slot: Option<ExcRef>,
}

impl LastException {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `exc` as the most recent error, replacing any previous
    /// occupant.
    pub fn record(&mut self, exc: ExcRef) {
        self.slot = Some(exc);
    }

    pub fn get(&self) -> Option<&ExcRef> {
        self.slot.as_ref()
    }

    pub fn take(&mut self) -> Option<ExcRef> {
        self.slot.take()
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    /// Render the held error with a fresh snapshot, or `None` when the
    /// slot is empty.
    pub fn format(
        &self,
        cache: &dyn SourceLineCache,
        options: &FormatOptions,
    ) -> Option<Vec<String>> {
        let exc = self.slot.as_ref()?;
        let snapshot_options = SnapshotOptions {
            limit: options.limit,
            compact: true,
            ..SnapshotOptions::default()
        };
        let node = snapshot(exc, cache, &snapshot_options);
        Some(format_with_chain(&node, cache, options))
    }
}
