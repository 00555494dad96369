//! Two-pass anchor registry.
//!
//! During layout every tagged element writes its bounds into an [`AnchorPass`].
//! Passes from subtrees are merged bottom-up, and the finished pass is
//! committed into the [`AnchorRegistry`], replacing whatever the previous
//! layout produced. The presentation pass then reads the registry.

use super::geometry::{Rect, Size};
use crate::core::{Callout, Edge, StepCatalog, StepId};
use std::collections::HashMap;

/// Bounds and callout registered for one step.
#[derive(Clone, Debug, PartialEq)]
pub struct AnchorEntry {
    pub bounds: Rect,
    pub callout: Callout,
}

/// Registrations collected during one layout pass.
///
/// Later registrations for the same step replace earlier ones.
#[derive(Clone, Debug, Default)]
pub struct AnchorPass {
    entries: HashMap<StepId, AnchorEntry>,
}

impl AnchorPass {
    /// Empty pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register raw bounds and callout under `step`.
    pub fn register(&mut self, step: StepId, bounds: Rect, callout: Callout) {
        tracing::trace!(step = %step, ?bounds, "anchor registered");
        self.entries.insert(step, AnchorEntry { bounds, callout });
    }

    /// Tag an element's bounds with a catalog step.
    pub fn tag<C: StepCatalog>(&mut self, step: &C, bounds: Rect) {
        self.register(step.key(), bounds, step.make_callout());
    }

    /// Tag the band of `size` just outside `element` on `edge`.
    pub fn tag_extension<C: StepCatalog>(&mut self, step: &C, element: Rect, edge: Edge, size: f64) {
        self.tag(step, element.extension(edge, size));
    }

    /// Fold a child's registrations into this pass; the child wins collisions.
    pub fn merge(&mut self, child: AnchorPass) {
        self.entries.extend(child.entries);
    }

    /// Number of registered steps.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Step bounds from the most recently committed layout pass.
///
/// Steps whose elements are not mounted have no entry.
#[derive(Clone, Debug, Default)]
pub struct AnchorRegistry {
    entries: HashMap<StepId, AnchorEntry>,
    passes: u64,
}

impl AnchorRegistry {
    /// Empty registry, as before the first layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start collecting a new layout pass.
    pub fn begin_pass(&self) -> AnchorPass {
        AnchorPass::new()
    }

    /// Replace the registry's contents with a finished pass.
    pub fn commit(&mut self, pass: AnchorPass) {
        self.entries = pass.entries;
        self.passes += 1;
        tracing::trace!(pass = self.passes, anchors = self.entries.len(), "anchor pass committed");
    }

    /// Entry for `step`, `None` when its element is not mounted.
    pub fn lookup(&self, step: &StepId) -> Option<&AnchorEntry> {
        self.entries.get(step)
    }

    /// Bounds for `step`, if mounted.
    pub fn bounds(&self, step: &StepId) -> Option<Rect> {
        self.lookup(step).map(|entry| entry.bounds)
    }

    /// Whether `step` has an anchor.
    pub fn contains(&self, step: &StepId) -> bool {
        self.entries.contains_key(step)
    }

    /// Number of committed passes.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Number of anchored steps.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no step is anchored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered steps whose bounds do not overlap `screen` at all.
    pub fn offscreen(&self, screen: Size) -> Vec<&StepId> {
        let screen = Rect::from_size(screen);
        let mut steps: Vec<&StepId> = self
            .entries
            .iter()
            .filter(|(_, entry)| {
                let b = entry.bounds;
                b.max_x() <= screen.min_x()
                    || b.min_x() >= screen.max_x()
                    || b.max_y() <= screen.min_y()
                    || b.min_y() >= screen.max_y()
            })
            .map(|(step, _)| step)
            .collect();
        steps.sort();
        steps
    }
}
