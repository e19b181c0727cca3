use crate::msg::ControlEdit;

/// Parameter tab a control belongs to, mirroring the served page's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Main,
    Processing,
    PreProcessing,
    Fetching,
    Mapping,
}

/// One option of a select control. The default-selected flag is captured at
/// construction and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub selected: bool,
    pub default_selected: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, default_selected: bool) -> Self {
        Self {
            value: value.into(),
            selected: default_selected,
            default_selected,
        }
    }
}

/// Concrete input kind of a form control, each carrying its current value
/// next to the immutable default captured at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    Text { value: String, default: String },
    Hidden { value: String, default: String },
    Checkbox { checked: bool, default: bool },
    Select { options: Vec<SelectOption>, multiple: bool },
}

/// A single parameter control of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormControl {
    pub id: String,
    pub section: Section,
    /// Set when the control's parameter group has been toggled off; such
    /// controls are excluded from every param scope regardless of value.
    pub group_disabled: bool,
    pub widget: Widget,
}

impl FormControl {
    pub fn text(id: impl Into<String>, section: Section, default: impl Into<String>) -> Self {
        let default = default.into();
        Self {
            id: id.into(),
            section,
            group_disabled: false,
            widget: Widget::Text {
                value: default.clone(),
                default,
            },
        }
    }

    pub fn hidden(id: impl Into<String>, section: Section, default: impl Into<String>) -> Self {
        let default = default.into();
        Self {
            id: id.into(),
            section,
            group_disabled: false,
            widget: Widget::Hidden {
                value: default.clone(),
                default,
            },
        }
    }

    pub fn checkbox(id: impl Into<String>, section: Section, default: bool) -> Self {
        Self {
            id: id.into(),
            section,
            group_disabled: false,
            widget: Widget::Checkbox {
                checked: default,
                default,
            },
        }
    }

    pub fn select(id: impl Into<String>, section: Section, options: Vec<SelectOption>) -> Self {
        Self {
            id: id.into(),
            section,
            group_disabled: false,
            widget: Widget::Select {
                options,
                multiple: false,
            },
        }
    }

    pub fn multi_select(
        id: impl Into<String>,
        section: Section,
        options: Vec<SelectOption>,
    ) -> Self {
        Self {
            id: id.into(),
            section,
            group_disabled: false,
            widget: Widget::Select {
                options,
                multiple: true,
            },
        }
    }

    /// Current scalar value of a select: the first selected option, or the
    /// empty string when nothing is selected.
    pub(crate) fn select_value(&self) -> &str {
        match &self.widget {
            Widget::Select { options, .. } => options
                .iter()
                .find(|option| option.selected)
                .map(|option| option.value.as_str())
                .unwrap_or(""),
            _ => "",
        }
    }

    fn apply_edit(&mut self, edit: ControlEdit) -> bool {
        match (&mut self.widget, edit) {
            (Widget::Text { value, .. }, ControlEdit::Text(new))
            | (Widget::Hidden { value, .. }, ControlEdit::Text(new)) => {
                *value = new;
                true
            }
            (Widget::Checkbox { checked, .. }, ControlEdit::Checked(new)) => {
                *checked = new;
                true
            }
            (Widget::Select { options, .. }, ControlEdit::Selection(values)) => {
                for option in options.iter_mut() {
                    option.selected = values.iter().any(|value| *value == option.value);
                }
                true
            }
            // Edit kind does not match the control kind; drop it.
            _ => false,
        }
    }
}

/// Ordered set of form controls, in document order.
///
/// This is the injectable form-state model: the controller reads and writes
/// control values here instead of touching a real rendering surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormDocument {
    controls: Vec<FormControl>,
}

impl FormDocument {
    pub fn new(controls: Vec<FormControl>) -> Self {
        Self { controls }
    }

    pub fn controls(&self) -> &[FormControl] {
        &self.controls
    }

    pub fn control(&self, id: &str) -> Option<&FormControl> {
        self.controls.iter().find(|control| control.id == id)
    }

    /// Applies a user edit; returns false for an unknown id or a kind
    /// mismatch, in which case nothing changes.
    pub(crate) fn apply_edit(&mut self, id: &str, edit: ControlEdit) -> bool {
        match self.controls.iter_mut().find(|control| control.id == id) {
            Some(control) => control.apply_edit(edit),
            None => false,
        }
    }

    /// Marks a control's parameter group as toggled on or off.
    pub(crate) fn set_group_disabled(&mut self, id: &str, disabled: bool) -> bool {
        match self.controls.iter_mut().find(|control| control.id == id) {
            Some(control) => {
                control.group_disabled = disabled;
                true
            }
            None => false,
        }
    }
}
