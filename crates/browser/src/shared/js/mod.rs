pub mod element;
pub mod wait;

use serde_json::Value;

/// Wraps a JS arrow function source into an immediately invoked call.
pub fn build_js_call(func: &str, args: &[Value]) -> String {
    let args_str = args.iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("({})({})", func, args_str)
}
