use smallvec::SmallVec;
use tracing::debug;

use crate::core::{AxisId, AxisSet};
use crate::error::ChartResult;

/// Maximum number of views kept for undo by default.
pub const DEFAULT_HISTORY_DEPTH: usize = 32;

/// Explicit bounds of one axis at the moment a gesture started.
///
/// Bounds are stored as set by the user, not as effective values, so undoing
/// a zoom on a measured axis makes it follow the data again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSnapshot {
    pub axis: AxisId,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

impl AxisSnapshot {
    #[must_use]
    pub fn capture(axes: &AxisSet, axis: AxisId) -> Option<Self> {
        axes.get(axis).map(|state| Self {
            axis,
            min_value: state.min_value(),
            max_value: state.max_value(),
        })
    }

    pub fn restore(&self, axes: &mut AxisSet) -> ChartResult<()> {
        let axis = axes.require_mut(self.axis)?;
        axis.reset_range();
        axis.set_min_value(self.min_value)?;
        axis.set_max_value(self.max_value)
    }
}

/// Axis bounds and polar angle of a plot, as restored by one undo step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewSnapshot {
    pub axes: SmallVec<[AxisSnapshot; 2]>,
    pub start_angle: Option<f64>,
}

impl ViewSnapshot {
    #[must_use]
    pub fn capture_axes(axes: &AxisSet, ids: impl IntoIterator<Item = AxisId>) -> Self {
        Self {
            axes: ids
                .into_iter()
                .filter_map(|id| AxisSnapshot::capture(axes, id))
                .collect(),
            start_angle: None,
        }
    }

    #[must_use]
    pub fn angle(start_angle: f64) -> Self {
        Self {
            axes: SmallVec::new(),
            start_angle: Some(start_angle),
        }
    }

    /// Restores every captured axis, stopping at the first failure.
    pub fn restore(&self, axes: &mut AxisSet, start_angle: &mut f64) -> ChartResult<()> {
        for snapshot in &self.axes {
            snapshot.restore(axes)?;
        }
        if let Some(angle) = self.start_angle {
            *start_angle = angle;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.axes.is_empty() && self.start_angle.is_none()
    }
}

/// Bounded undo stack of committed views.
///
/// Controllers push the view that was current before a gesture committed.
/// When full, the oldest entry is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomHistory {
    entries: Vec<ViewSnapshot>,
    depth: usize,
}

impl Default for ZoomHistory {
    fn default() -> Self {
        Self::with_depth(DEFAULT_HISTORY_DEPTH)
    }
}

impl ZoomHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A depth of zero is raised to one.
    #[must_use]
    pub fn with_depth(depth: usize) -> Self {
        Self {
            entries: Vec::new(),
            depth: depth.max(1),
        }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn push(&mut self, snapshot: ViewSnapshot) {
        if snapshot.is_empty() {
            return;
        }
        if self.entries.len() == self.depth {
            self.entries.remove(0);
        }
        self.entries.push(snapshot);
        debug!(len = self.entries.len(), "view pushed to zoom history");
    }

    pub fn pop(&mut self) -> Option<ViewSnapshot> {
        self.entries.pop()
    }

    #[must_use]
    pub fn peek(&self) -> Option<&ViewSnapshot> {
        self.entries.last()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Axis;

    #[test]
    fn oldest_entry_is_dropped_when_full() {
        let mut history = ZoomHistory::with_depth(2);
        for angle in [10.0, 20.0, 30.0] {
            history.push(ViewSnapshot::angle(angle));
        }
        assert_eq!(history.len(), 2);
        assert_eq!(history.pop().and_then(|s| s.start_angle), Some(30.0));
        assert_eq!(history.pop().and_then(|s| s.start_angle), Some(20.0));
        assert!(history.pop().is_none());
    }

    #[test]
    fn restore_brings_back_measured_axis() {
        let mut axes = AxisSet::new();
        let id = axes.insert(Axis::new());
        let snapshot = ViewSnapshot::capture_axes(&axes, [id]);

        axes.require_mut(id)
            .and_then(|axis| axis.set_range(2.0, 4.0))
            .expect("zoom");
        let mut angle = 0.0;
        snapshot.restore(&mut axes, &mut angle).expect("restore");

        let axis = axes.get(id).expect("axis");
        assert_eq!(axis.min_value(), None);
        assert_eq!(axis.max_value(), None);
    }

    #[test]
    fn empty_snapshots_are_not_recorded() {
        let mut history = ZoomHistory::new();
        history.push(ViewSnapshot::default());
        assert!(!history.can_undo());
    }
}
