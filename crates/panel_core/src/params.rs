use serde_json::{Map, Value};

use crate::form::{FormControl, FormDocument, Section, SelectOption, Widget};

/// Which controls a param collection covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamScope {
    /// Every section, hidden inputs excluded. Used for URL sync and run
    /// requests.
    Page,
    /// Fetcher-args section only, hidden inputs included. Sent alongside a
    /// per-field check as companion parameters.
    FetcherCompanion,
}

/// Value of one non-default parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Flag(bool),
    Many(Vec<String>),
}

/// Sparse mapping of control id to non-default value, in document order.
///
/// Invariant: never contains an entry whose value equals the control's
/// captured default. The backend relies on this to know which parameters
/// the user explicitly overrode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamSet {
    entries: Vec<(String, ParamValue)>,
}

impl ParamSet {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, id: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == id)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    fn push(&mut self, id: &str, value: ParamValue) {
        self.entries.push((id.to_string(), value));
    }

    /// JSON object with entries in document order, ready to extend into a
    /// request body.
    pub fn into_map(self) -> Map<String, Value> {
        let mut map = Map::new();
        for (key, value) in self.entries {
            let json = match value {
                ParamValue::Text(text) => Value::String(text),
                ParamValue::Flag(flag) => Value::Bool(flag),
                ParamValue::Many(values) => {
                    Value::Array(values.into_iter().map(Value::String).collect())
                }
            };
            map.insert(key, json);
        }
        map
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.clone().into_map())
    }
}

/// Scans the form and returns every control whose current value differs
/// from its captured default, under the given scope.
pub fn collect_params(form: &FormDocument, scope: ParamScope) -> ParamSet {
    let mut params = ParamSet::default();
    for control in form.controls() {
        if control.group_disabled || !in_scope(control, scope) {
            continue;
        }
        match &control.widget {
            Widget::Text { value, default } | Widget::Hidden { value, default } => {
                if value != default {
                    params.push(&control.id, ParamValue::Text(value.clone()));
                }
            }
            Widget::Checkbox { checked, default } => {
                if checked != default {
                    params.push(&control.id, ParamValue::Flag(*checked));
                }
            }
            Widget::Select { options, multiple } => {
                if *multiple {
                    if options.iter().any(option_differs) {
                        let selected = options
                            .iter()
                            .filter(|option| option.selected)
                            .map(|option| option.value.clone())
                            .collect();
                        params.push(&control.id, ParamValue::Many(selected));
                    }
                } else if options.iter().any(option_differs) {
                    // First differing option wins; the scalar sent is the
                    // select's current value, not that option's.
                    params.push(
                        &control.id,
                        ParamValue::Text(control.select_value().to_string()),
                    );
                }
            }
        }
    }
    params
}

fn in_scope(control: &FormControl, scope: ParamScope) -> bool {
    match scope {
        ParamScope::Page => !matches!(control.widget, Widget::Hidden { .. }),
        ParamScope::FetcherCompanion => control.section == Section::Fetching,
    }
}

fn option_differs(option: &SelectOption) -> bool {
    option.selected != option.default_selected
}
