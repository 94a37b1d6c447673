use serde_json::Value;

/// Renders a single option flag carrying a `key=value` assignment, e.g.
/// `-var="instance_count=3"`. The whole assignment is one argv element;
/// double quotes inside rendered lists and mappings are preserved verbatim.
/// Shell quoting is the executor's concern, not this layer's.
pub fn format_option(option: &str, key: &str, value: &Value) -> String {
    format!("{option}=\"{key}={}\"", render(value))
}

fn render(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(boolean) => boolean.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(string) => string.clone(),
        Value::Array(elements) => {
            let rendered: Vec<String> = elements.iter().map(render_nested).collect();
            format!("[{}]", rendered.join(", "))
        }
        Value::Object(entries) => {
            let rendered: Vec<String> = entries
                .iter()
                .map(|(key, value)| format!("\"{key}\": {}", render_nested(value)))
                .collect();
            format!("{{{}}}", rendered.join(", "))
        }
    }
}

// Strings are only quoted below the top level: `foo=bar`, but
// `foo=["bar"]` and `foo={"a": "bar"}`.
fn render_nested(value: &Value) -> String {
    match value {
        Value::String(string) => format!("\"{string}\""),
        other => render(other),
    }
}
