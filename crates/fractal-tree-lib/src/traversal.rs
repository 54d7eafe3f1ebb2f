//! Deterministic pre-order traversal
//!
//! A segment is always visited before its children, the left child before
//! the right one. The walk uses an explicit stack, so its depth is not
//! limited by the call stack.

use crate::{FractalError, FractalTree, Result, Segment, SegmentId};

/// Callback applied to every segment of a traversal
///
/// Closures of the form `FnMut(SegmentId, &Segment)` implement it directly.
pub trait SegmentVisitor {
    fn visit(&mut self, id: SegmentId, segment: &Segment);
}

impl<F> SegmentVisitor for F
where
    F: FnMut(SegmentId, &Segment),
{
    #[inline]
    fn visit(&mut self, id: SegmentId, segment: &Segment) {
        self(id, segment)
    }
}

/// Pre-order iterator over `(id, segment)` pairs
#[derive(Debug)]
pub struct PreOrder<'a> {
    tree: &'a FractalTree,
    stack: Vec<SegmentId>,
}

impl<'a> PreOrder<'a> {
    fn new(tree: &'a FractalTree, from: SegmentId) -> Self {
        // Stack depth never exceeds tree depth + 1
        let mut stack = Vec::with_capacity(tree.depth() as usize + 1);
        stack.push(from);
        Self { tree, stack }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (SegmentId, &'a Segment);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let segment = self.tree.get(id)?;
        if let Some((left, right)) = self.tree.children(id) {
            self.stack.push(right);
            self.stack.push(left);
        }
        Some((id, segment))
    }
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl FractalTree {
    /// Iterate over every segment from the root, in pre-order
    pub fn segments(&self) -> PreOrder<'_> {
        PreOrder::new(self, self.root_id())
    }

    /// Apply `visitor` to every segment from the root, in pre-order
    pub fn traverse<V: SegmentVisitor + ?Sized>(&self, visitor: &mut V) {
        for (id, segment) in self.segments() {
            visitor.visit(id, segment);
        }
    }

    /// Apply `visitor` to the subtree rooted at `from`, in pre-order
    pub fn traverse_from<V: SegmentVisitor + ?Sized>(
        &self,
        from: SegmentId,
        visitor: &mut V,
    ) -> Result<()> {
        if self.get(from).is_none() {
            return Err(FractalError::InvalidParameter(format!(
                "unknown segment {from}"
            )));
        }
        for (id, segment) in PreOrder::new(self, from) {
            visitor.visit(id, segment);
        }
        Ok(())
    }
}
