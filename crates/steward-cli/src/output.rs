use anyhow::Result;
use colored::Colorize;
use serde_json::Value;
use steward_core::LifecycleError;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;

pub fn print_model(value: &Value, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Table => println!("{}", model_table(value)),
    }
    Ok(())
}

pub fn print_models(values: &[Value], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(values)?),
        OutputFormat::Table => {
            if values.is_empty() {
                println!("No resources found.");
            } else {
                println!("{}", list_table(values));
                println!("Total: {}", values.len());
            }
        }
    }
    Ok(())
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Error line for the terminal; lifecycle failures lead with their code.
pub fn describe_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<LifecycleError>() {
        Some(lifecycle) => format!("[{}] {err:#}", lifecycle.code()),
        None => format!("{err:#}"),
    }
}

/// Display name of a model, whichever family it belongs to.
pub fn model_name(value: &Value) -> &str {
    value
        .get("name")
        .or_else(|| value.get("policyName"))
        .and_then(Value::as_str)
        .unwrap_or("-")
}

fn list_table(values: &[Value]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Name", "ARN"]);
    for value in values {
        let id = value.get("id").and_then(Value::as_str).unwrap_or("-");
        let arn = value.get("arn").and_then(Value::as_str).unwrap_or("-");
        builder.push_record([id, model_name(value), arn]);
    }
    builder.build().with(Style::rounded()).to_string()
}

fn model_table(value: &Value) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    if let Some(fields) = value.as_object() {
        for (field, v) in fields {
            builder.push_record([field.clone(), cell(v)]);
        }
    }
    builder.build().with(Style::rounded()).to_string()
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(cell).collect::<Vec<_>>().join("\n"),
        Value::Object(obj) => match (obj.get("key"), obj.get("value")) {
            (Some(Value::String(k)), Some(Value::String(v))) => format!("{k}={v}"),
            _ => value.to_string(),
        },
        other => other.to_string(),
    }
}
