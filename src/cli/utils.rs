use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::error::ClientError;
use crate::model::{CarCollection, CarFields, Field, SyncStatus};
use crate::notify::Toast;

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

            if let Some(Value::Object(extra)) = data {
                if let Some(object) = response.as_object_mut() {
                    object.extend(extra);
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

/// JSON error body for a failed request
pub fn client_error_json(err: &ClientError) -> Value {
    let mut response = json!({
        "success": false,
        "error": err.to_string(),
        "error_code": err.error_code(),
    });
    if let Some(status) = err.status_code() {
        response["status"] = json!(status);
    }
    response
}

/// Report a failed request. Text mode already surfaced it as a toast, an
/// alert or a log line, so only JSON mode prints anything.
pub fn output_client_error(output_format: &OutputFormat, err: &ClientError) -> anyhow::Result<()> {
    if *output_format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&client_error_json(err))?);
    }
    Ok(())
}

/// Render the car table
pub fn output_cars(output_format: &OutputFormat, collection: &CarCollection) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "cars": collection.cars(),
                    "sync": collection.status(),
                }))?
            );
        }
        OutputFormat::Text => {
            println!("{}", format_status(collection.status()));
            if collection.is_empty() {
                println!("No cars");
                return Ok(());
            }

            println!(
                "{:<4} {:<14} {:<14} {:<10} {:<6} {:<10} {:<10}",
                "#", "BRAND", "MODEL", "COLOR", "YEAR", "FUEL", "PRICE"
            );
            println!("{}", "-".repeat(74));
            for (i, car) in collection.cars().iter().enumerate() {
                let f = &car.fields;
                println!(
                    "{:<4} {:<14} {:<14} {:<10} {:<6} {:<10} {:<10}",
                    i + 1,
                    f.brand,
                    f.model,
                    f.color,
                    f.year,
                    f.fuel,
                    f.price
                );
            }
        }
    }
    Ok(())
}

fn format_status(status: SyncStatus) -> String {
    match status {
        SyncStatus::Empty => "Not loaded yet".to_string(),
        SyncStatus::PendingRefresh => "Refreshing...".to_string(),
        SyncStatus::Synced { at } => format!("Last synced {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
    }
}

/// Render an open editor's draft
pub fn output_draft(output_format: &OutputFormat, title: &str, draft: &CarFields) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({ "editor": title, "draft": draft }))?
            );
        }
        OutputFormat::Text => {
            println!("[{}]", title);
            for field in Field::ALL {
                println!("  {:<6} {}", field.label(), draft.get(field));
            }
        }
    }
    Ok(())
}

/// Render live notifications
pub fn output_toasts(output_format: &OutputFormat, toasts: &[Toast]) -> anyhow::Result<()> {
    for toast in toasts {
        match output_format {
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string(&json!({ "notification": toast.kind, "message": toast.message() }))?
                );
            }
            OutputFormat::Text => println!("» {}", toast.message()),
        }
    }
    Ok(())
}

/// Split a shell line into words. Single or double quotes group words and
/// allow empty values (`set price ""`).
pub fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if let Some(q) = quote {
        return Err(format!("unterminated {} quote", q));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
