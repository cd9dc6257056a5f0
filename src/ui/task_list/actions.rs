//! Dispatch table for the task list.
//!
//! Every user-facing control is a [`Control`]. Key presses are mapped to
//! controls through static binding tables, and mouse clicks through the hit
//! regions the view records each frame. Both paths end in
//! `AppState::dispatch`.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;

use crate::task::TaskId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Add,
    Edit,
    ToggleComplete,
    Delete,
    Save,
    Cancel,
}

impl Control {
    /// On-screen button text
    pub fn label(self) -> &'static str {
        match self {
            Control::Add => "[+]",
            Control::Edit => "[e]",
            Control::ToggleComplete => "[x]",
            Control::Delete => "[d]",
            Control::Save => "[s]",
            Control::Cancel => "[c]",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Control::Add => "add task",
            Control::Edit => "edit task",
            Control::ToggleComplete => "toggle complete",
            Control::Delete => "delete task",
            Control::Save => "save edit",
            Control::Cancel => "cancel edit",
        }
    }
}

/// Controls drawn on an idle row
pub const ROW_CONTROLS: [Control; 3] = [Control::Edit, Control::ToggleComplete, Control::Delete];

/// Controls drawn on the row being edited
pub const EDITING_ROW_CONTROLS: [Control; 4] = [
    Control::Save,
    Control::Cancel,
    Control::ToggleComplete,
    Control::Delete,
];

pub fn row_controls(editing: bool) -> &'static [Control] {
    if editing {
        &EDITING_ROW_CONTROLS
    } else {
        &ROW_CONTROLS
    }
}

#[derive(Debug, Clone, Copy)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub control: Control,
    pub keys: &'static str,
}

/// Keys acting on the selected row while the list has focus
pub const LIST_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        code: KeyCode::Char('e'),
        control: Control::Edit,
        keys: "e/enter",
    },
    KeyBinding {
        code: KeyCode::Enter,
        control: Control::Edit,
        keys: "e/enter",
    },
    KeyBinding {
        code: KeyCode::Char(' '),
        control: Control::ToggleComplete,
        keys: "space/x",
    },
    KeyBinding {
        code: KeyCode::Char('x'),
        control: Control::ToggleComplete,
        keys: "space/x",
    },
    KeyBinding {
        code: KeyCode::Char('d'),
        control: Control::Delete,
        keys: "d/del",
    },
    KeyBinding {
        code: KeyCode::Delete,
        control: Control::Delete,
        keys: "d/del",
    },
];

/// Keys acting on the input field
pub const INPUT_BINDINGS: &[KeyBinding] = &[KeyBinding {
    code: KeyCode::Enter,
    control: Control::Add,
    keys: "enter",
}];

/// Keys acting on an open edit session
pub const EDIT_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        code: KeyCode::Enter,
        control: Control::Save,
        keys: "enter",
    },
    KeyBinding {
        code: KeyCode::Esc,
        control: Control::Cancel,
        keys: "esc",
    },
];

pub fn control_for_key(bindings: &[KeyBinding], key: KeyEvent) -> Option<Control> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    bindings
        .iter()
        .find(|binding| binding.code == key.code)
        .map(|binding| binding.control)
}

/// One help line per distinct key group, in table order
pub fn binding_help(bindings: &[KeyBinding]) -> Vec<(&'static str, &'static str)> {
    let mut out: Vec<(&'static str, &'static str)> = Vec::new();
    for binding in bindings {
        if out.iter().any(|(keys, _)| *keys == binding.keys) {
            continue;
        }
        out.push((binding.keys, binding.control.describe()));
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Control(Control, Option<TaskId>),
    Row(TaskId),
    InputField,
}

/// Screen area of something clickable, recorded by the view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitRegion {
    pub area: Rect,
    pub target: HitTarget,
}

/// First region containing the cell; controls are recorded before their row
pub fn hit_test(regions: &[HitRegion], column: u16, row: u16) -> Option<HitTarget> {
    regions
        .iter()
        .find(|region| {
            let area = region.area;
            column >= area.x
                && column < area.x.saturating_add(area.width)
                && row >= area.y
                && row < area.y.saturating_add(area.height)
        })
        .map(|region| region.target)
}

#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub changed: bool,
    pub message: String,
}

impl ActionOutcome {
    pub fn changed(message: impl Into<String>) -> Self {
        Self {
            changed: true,
            message: message.into(),
        }
    }

    pub fn unchanged(message: impl Into<String>) -> Self {
        Self {
            changed: false,
            message: message.into(),
        }
    }
}
