//! Tool selection for the board.

use crate::node::ShapeKind;
use serde::{Deserialize, Serialize};

/// Stroke width of new freehand strokes.
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    #[default]
    Select,
    Pan,
    /// Folder node.
    Container,
    Text,
    Rectangle,
    Circle,
    Diamond,
    Line,
    Arrow,
    Freehand,
}

impl ToolKind {
    pub const ALL: [ToolKind; 10] = [
        ToolKind::Select,
        ToolKind::Pan,
        ToolKind::Container,
        ToolKind::Text,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Diamond,
        ToolKind::Line,
        ToolKind::Arrow,
        ToolKind::Freehand,
    ];

    /// Single-key shortcut for the tool.
    pub fn shortcut(self) -> char {
        match self {
            ToolKind::Pan => '1',
            ToolKind::Select => '2',
            ToolKind::Container => '3',
            ToolKind::Text => 't',
            ToolKind::Rectangle => 'r',
            ToolKind::Circle => 'c',
            ToolKind::Diamond => 'd',
            ToolKind::Arrow => 'a',
            ToolKind::Line => 'l',
            ToolKind::Freehand => 'p',
        }
    }

    /// Tool bound to a key, case-insensitive.
    pub fn from_shortcut(key: &str) -> Option<ToolKind> {
        let mut chars = key.chars();
        let c = chars.next()?.to_ascii_lowercase();
        if chars.next().is_some() {
            return None;
        }
        Self::ALL.into_iter().find(|tool| tool.shortcut() == c)
    }

    /// Outline drawn by a box-creation tool.
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            ToolKind::Rectangle => Some(ShapeKind::Rectangle),
            ToolKind::Circle => Some(ShapeKind::Circle),
            ToolKind::Diamond => Some(ShapeKind::Diamond),
            _ => None,
        }
    }

    pub fn is_line_tool(self) -> bool {
        matches!(self, ToolKind::Line | ToolKind::Arrow)
    }

    /// Tools that create a node by dragging out a box or a line.
    pub fn creates_by_drag(self) -> bool {
        self.shape_kind().is_some() || self.is_line_tool()
    }

    /// Tools that create a default-sized node with a single click.
    pub fn creates_by_click(self) -> bool {
        matches!(self, ToolKind::Container | ToolKind::Text)
    }
}
