use serde_json::{json, Value};
use crate::cli::OutputFormat;

/// Output a result in the appropriate format.
///
/// JSON merges `data` into a `{"success": true}` envelope; text prints
/// `lines` as given.
pub fn output_result(
    output_format: &OutputFormat,
    data: Value,
    lines: &[String],
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({ "success": true });
            if let (Some(envelope), Value::Object(fields)) = (response.as_object_mut(), data) {
                envelope.extend(fields);
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            for line in lines {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

/// Join a set for text output, `-` when empty
pub fn join_or_dash<I, T>(items: I) -> String
where
    I: IntoIterator<Item = T>,
    T: ToString,
{
    let joined: Vec<String> = items.into_iter().map(|i| i.to_string()).collect();
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined.join(", ")
    }
}
