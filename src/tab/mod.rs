//! Tab management for the terminal activity
//!
//! This module provides the core tab infrastructure including:
//! - `Tab`: one terminal session, owning its widget exclusively
//! - `TabManager`: the ordered registry of open tabs
//! - `TabId`: stable identifier, shared with the tab's `TerminalHandle`

mod manager;

pub use manager::{CloseOutcome, TabManager};

use sugar_term_terminal::{TerminalHandle, TerminalWidget};

/// Unique identifier for a tab, never reused within one registry
pub type TabId = u64;

/// Position of a tab in the registry (0-based)
pub type TabIndex = usize;

/// A single terminal tab
pub struct Tab<W> {
    /// Unique identifier for this tab
    pub id: TabId,
    /// The terminal widget; dropped together with the tab
    pub widget: W,
    /// Label shown for the tab ("Tab N" until the child sets a title)
    pub label_text: String,
    /// Font size in points, independent per tab
    pub font_size: u32,
    /// Whether the label is still the positional default
    pub has_default_title: bool,
}

impl<W: TerminalWidget> Tab<W> {
    pub(crate) fn new(id: TabId, tab_number: usize, widget: W, font_size: u32) -> Self {
        Self {
            id,
            widget,
            label_text: format!("Tab {}", tab_number),
            font_size,
            has_default_title: true,
        }
    }

    /// Handle the terminal collaborator uses to report events for this tab
    pub fn handle(&self) -> TerminalHandle {
        TerminalHandle(self.id)
    }

    /// OS pid of the child, present only while it is alive
    pub fn process_id(&self) -> Option<u32> {
        self.widget.process_id()
    }

    /// Set the tab's default title based on its position
    pub fn set_default_title(&mut self, tab_number: usize) {
        if self.has_default_title {
            self.label_text = format!("Tab {}", tab_number);
        }
    }

    /// Explicitly set the tab title (from the child's window-title escape)
    ///
    /// This overrides any default title and stops positional renumbering.
    pub fn set_title(&mut self, title: &str) {
        self.label_text = title.to_string();
        self.has_default_title = false;
    }

    /// Set the font size on both the record and the widget
    pub fn set_font_size(&mut self, size: u32) {
        self.font_size = size;
        self.widget.set_font_size(size);
    }
}
