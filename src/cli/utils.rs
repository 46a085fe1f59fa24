use std::io::{BufRead, Write};

use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::forms::{FormState, Severity, ValidationErrors};

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                match data_value {
                    Value::Object(fields) => {
                        if let Some(obj) = response.as_object_mut() {
                            obj.extend(fields);
                        }
                    }
                    other => response["data"] = other,
                }
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(
    output_format: &OutputFormat,
    message: &str,
    error_code: Option<&str>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": false,
                "error": message
            });

            if let Some(code) = error_code {
                response["error_code"] = json!(code);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: []
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Output a collection as JSON, or as text rows built by `row`
pub fn output_collection<T: Serialize>(
    output_format: &OutputFormat,
    collection_name: &str,
    items: &[T],
    header: &str,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: items
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", header);
            println!("{}", "-".repeat(header.len().max(20)));
            for item in items {
                println!("{}", row(item));
            }
        }
    }
    Ok(())
}

/// Output a single record
pub fn output_record<T: Serialize>(output_format: &OutputFormat, record: &T) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(record)?),
        OutputFormat::Text => {
            if let Value::Object(fields) = serde_json::to_value(record)? {
                for (key, value) in fields {
                    let shown = match value {
                        Value::String(s) => s,
                        Value::Null => "-".to_string(),
                        other => other.to_string(),
                    };
                    println!("{:<16} {}", format!("{}:", key), shown);
                }
            }
        }
    }
    Ok(())
}

/// Failure a page reported, keeping its error code for JSON output
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct PageError {
    pub message: String,
    pub code: Option<&'static str>,
}

/// The page's current error, if any, as a typed error
pub fn page_failure(state: &FormState) -> Option<anyhow::Error> {
    state.error().map(|message| {
        PageError {
            message: message.to_string(),
            code: state.error_code(),
        }
        .into()
    })
}

/// Render the outcome a page left in its state.
///
/// An error becomes `Err` so the binary exits non-zero.
pub fn output_page(
    output_format: &OutputFormat,
    state: &FormState,
    data: Option<Value>,
) -> anyhow::Result<()> {
    if let Some(failure) = page_failure(state) {
        return Err(failure);
    }
    match state.notification() {
        Some(n) if n.severity == Severity::Success => output_success(output_format, &n.message, data),
        _ => Ok(()),
    }
}

/// List field-level validation messages on stderr in text mode
pub fn print_field_errors(output_format: &OutputFormat, errors: &ValidationErrors) {
    if let OutputFormat::Text = output_format {
        for (field, message) in errors.iter() {
            eprintln!("  {}: {}", field, message);
        }
    }
}

/// Read a secret from stdin when it was not passed as a flag
pub fn read_secret(provided: Option<String>, prompt: &str) -> anyhow::Result<String> {
    if let Some(value) = provided {
        return Ok(value);
    }

    eprint!("{}: ", prompt);
    std::io::stderr().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Generic function to handle switching between named items
pub fn switch_current_item<F, G>(
    item_name: &str,
    item_type: &str,
    check_exists: F,
    update_current: G,
    output_format: &OutputFormat,
) -> anyhow::Result<()>
where
    F: Fn(&str) -> anyhow::Result<bool>,
    G: Fn(&str) -> anyhow::Result<()>,
{
    if !check_exists(item_name)? {
        return Err(anyhow::anyhow!("{} '{}' not found", capitalize(item_type), item_name));
    }

    update_current(item_name)?;

    output_success(
        output_format,
        &format!("Switched to {} '{}'", item_type, item_name),
        Some(json!({ format!("current_{}", item_type): item_name })),
    )
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
