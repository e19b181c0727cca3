use crate::params::{ParamSet, ParamValue};

/// Recomputes the page href from the current non-default params.
///
/// Serialization is deliberately minimal: `key=value` pairs joined with
/// `&`, sequences expanded as repeated keys, no percent-encoding. The form
/// only carries simple identifiers and URIs, so a general URL encoder is
/// not wanted here. The fragment (with its leading `#`, or empty) is
/// appended verbatim; when the set is empty no `?` is emitted.
pub fn page_href(path: &str, params: &ParamSet, fragment: &str) -> String {
    let mut href = String::from(path);
    if !params.is_empty() {
        href.push('?');
    }
    let mut pairs: Vec<String> = Vec::with_capacity(params.len());
    for (key, value) in params.iter() {
        match value {
            ParamValue::Text(text) => pairs.push(format!("{key}={text}")),
            ParamValue::Flag(flag) => pairs.push(format!("{key}={flag}")),
            ParamValue::Many(values) if !values.is_empty() => {
                for value in values {
                    pairs.push(format!("{key}={value}"));
                }
            }
            // A fully deselected multi-select still marks its key.
            ParamValue::Many(_) => pairs.push(format!("{key}=")),
        }
    }
    href.push_str(&pairs.join("&"));
    href.push_str(fragment);
    href
}
