//! Seven-slot pagination control builder.
//!
//! The strip is always `Prev, 1, 2, middle, n-1, n, Next` regardless of how
//! many pages exist. With three pages or fewer the numbered slots overlap
//! (for example `2` appears twice with three pages); the strip is still
//! emitted as-is and marked `overlapping`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::model::PageRequest;

/// Shown in the middle slot when it is not indicating the current page.
pub const SEPARATOR: &str = "…";

/// Slot position in the control strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Prev,
    First,
    Second,
    Middle,
    Penultimate,
    Last,
    Next,
}

impl Slot {
    pub const ALL: [Self; 7] = [
        Self::Prev,
        Self::First,
        Self::Second,
        Self::Middle,
        Self::Penultimate,
        Self::Last,
        Self::Next,
    ];
}

/// Precomputed parameters for the follow-up page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavTarget {
    pub page_size: usize,
    pub page_number: usize,
    pub offset: usize,
}

impl NavTarget {
    /// Request for this target carrying the current search term along.
    #[must_use]
    pub fn to_request(self, search: Option<&str>) -> PageRequest {
        PageRequest::page(self.page_size, self.page_number)
            .with_offset(self.offset)
            .with_search(search)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Control {
    pub slot: Slot,
    pub label: String,
    pub enabled: bool,
    /// Only present on enabled controls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<NavTarget>,
}

impl Control {
    fn link(slot: Slot, label: impl Into<String>, enabled: bool, target: NavTarget) -> Self {
        Self {
            slot,
            label: label.into(),
            enabled,
            target: enabled.then_some(target),
        }
    }

    fn indicator(label: impl Into<String>) -> Self {
        Self {
            slot: Slot::Middle,
            label: label.into(),
            enabled: false,
            target: None,
        }
    }

    /// Whether the middle slot is showing the current page number.
    #[must_use]
    pub fn is_current_indicator(&self) -> bool {
        self.slot == Slot::Middle && self.label != SEPARATOR
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationControls {
    pub controls: Vec<Control>,
    /// Numbered slots repeat or collapse because there are too few pages.
    pub overlapping: bool,
}

impl PaginationControls {
    #[must_use]
    pub fn slot(&self, slot: Slot) -> &Control {
        &self.controls[slot as usize]
    }

    #[must_use]
    pub fn prev(&self) -> &Control {
        self.slot(Slot::Prev)
    }

    #[must_use]
    pub fn next(&self) -> &Control {
        self.slot(Slot::Next)
    }
}

/// Build the control strip for `current` of `total` pages.
///
/// `offset` is the start offset of the current page; Prev and Next move
/// relative to it, numbered links jump to `(page - 1) * page_size`.
#[must_use]
pub fn build(current: usize, total: usize, page_size: usize, offset: usize) -> PaginationControls {
    let nav = |page_number: usize, offset: usize| NavTarget {
        page_size,
        page_number,
        offset,
    };
    let numbered = |page: usize| nav(page, page.saturating_sub(1).saturating_mul(page_size));
    let penultimate = total.saturating_sub(1);

    let middle = if current > 2 && current < total.saturating_sub(1) {
        Control::indicator(current.to_string())
    } else {
        Control::indicator(SEPARATOR)
    };

    let controls = vec![
        Control::link(
            Slot::Prev,
            "Prev",
            current > 1,
            nav(current.saturating_sub(1).max(1), offset.saturating_sub(page_size)),
        ),
        Control::link(Slot::First, "1", current > 1, numbered(1)),
        Control::link(Slot::Second, "2", current != 2, numbered(2)),
        middle,
        Control::link(
            Slot::Penultimate,
            penultimate.to_string(),
            current != penultimate,
            numbered(penultimate),
        ),
        Control::link(Slot::Last, total.to_string(), current != total, numbered(total)),
        Control::link(
            Slot::Next,
            "Next",
            current != total,
            nav(
                if current >= total { current } else { current + 1 },
                offset.saturating_add(page_size),
            ),
        ),
    ];

    let overlapping = total <= 3;
    if overlapping {
        debug!(
            target: "pagination",
            current,
            total,
            "page count too small for distinct control slots"
        );
    }

    PaginationControls {
        controls,
        overlapping,
    }
}
