//! Message templates with positional holes.
//!
//! `"User {UserId} did {Action}"` is filled from the argument list in order. A hole
//! written `{@Name}` renders its value as JSON; plain holes render strings without
//! quotes. `{{` and `}}` produce literal braces. Holes without a matching argument
//! are left as written.

use serde_json::Value;

use super::context::Property;

/// Renders `template` and returns the text plus one property per filled hole.
pub fn render(template: &str, args: &[Value]) -> (String, Vec<Property>) {
    let mut out = String::with_capacity(template.len());
    let mut properties = Vec::new();
    let mut next_arg = 0;
    let mut rest = template;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with('}') {
            out.push('}');
            rest = &tail[1..];
            continue;
        }

        let Some(close) = tail.find('}') else {
            out.push_str(tail);
            rest = "";
            break;
        };
        let hole = &tail[1..close];
        rest = &tail[close + 1..];

        let (destructure, name) = match hole.strip_prefix('@') {
            Some(name) => (true, name),
            None => (false, hole.strip_prefix('$').unwrap_or(hole)),
        };
        // Drop any alignment/format suffix: {Duration:0.00} -> Duration
        let name = name.split([':', ',']).next().unwrap_or_default();

        match args.get(next_arg) {
            Some(value) if !name.is_empty() => {
                out.push_str(&render_value(value, destructure));
                properties.push(Property::new(name, value.clone()));
                next_arg += 1;
            }
            _ => {
                out.push('{');
                out.push_str(hole);
                out.push('}');
            }
        }
    }
    out.push_str(rest);

    (out, properties)
}

fn render_value(value: &Value, destructure: bool) -> String {
    match value {
        Value::String(s) if !destructure => s.clone(),
        other => other.to_string(),
    }
}
