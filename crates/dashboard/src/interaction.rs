//! Interaction kinds observed on the dashboard and the surfaces they hit.

use std::fmt;

use shared::{domain::ClientId, form::FormField};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Click,
    DoubleClick,
    MouseEnter,
    PointerDown,
    Focus,
    Blur,
    Change,
    Input,
    Invalid,
    Copy,
    Cut,
    Paste,
    Select,
    Scroll,
    Wheel,
    Submit,
    Reset,
    KeyDown,
}

impl InteractionKind {
    pub fn event_name(self) -> &'static str {
        match self {
            Self::Click => "onClick",
            Self::DoubleClick => "onDoubleClick",
            Self::MouseEnter => "onMouseEnter",
            Self::PointerDown => "onPointerDown",
            Self::Focus => "onFocus",
            Self::Blur => "onBlur",
            Self::Change => "onChange",
            Self::Input => "onInput",
            Self::Invalid => "onInvalid",
            Self::Copy => "onCopy",
            Self::Cut => "onCut",
            Self::Paste => "onPaste",
            Self::Select => "onSelect",
            Self::Scroll => "onScroll",
            Self::Wheel => "onWheel",
            Self::Submit => "onSubmit",
            Self::Reset => "onReset",
            Self::KeyDown => "onKeyDown",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    AddButton,
    SearchBox,
    ClientList,
    ClientRow(ClientId),
    EditControl(ClientId),
    DeleteControl(ClientId),
    Form,
    FormField(FormField),
    SaveButton,
    CancelButton,
    LogPanel,
    /// Free-text scratch area for clipboard and selection events.
    TestPad,
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddButton => f.write_str("add client"),
            Self::SearchBox => f.write_str("search"),
            Self::ClientList => f.write_str("client list"),
            Self::ClientRow(id) => write!(f, "row {id}"),
            Self::EditControl(id) => write!(f, "edit {id}"),
            Self::DeleteControl(id) => write!(f, "delete {id}"),
            Self::Form => f.write_str("client form"),
            Self::FormField(field) => write!(f, "{field} field"),
            Self::SaveButton => f.write_str("save"),
            Self::CancelButton => f.write_str("cancel"),
            Self::LogPanel => f.write_str("activity log"),
            Self::TestPad => f.write_str("test pad"),
        }
    }
}

/// Text appended to the activity log for any observed interaction.
pub fn describe(kind: InteractionKind, surface: Surface) -> String {
    format!("Event detected: {kind} ({surface})")
}
