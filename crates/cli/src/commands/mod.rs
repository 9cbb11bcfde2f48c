pub mod compare;
pub mod config;
pub mod demo;
pub mod history;
pub mod price;

use std::fs;
use std::path::Path;

use mixmart_core::{CatalogSnapshot, Order, Product};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        Self::build(command, "ok", None, message.into(), None, 0)
    }

    pub fn success_with_data(command: &str, message: impl Into<String>, data: Value) -> Self {
        Self::build(command, "ok", None, message.into(), Some(data), 0)
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        Self::build(command, "error", Some(error_class.to_string()), message.into(), None, exit_code)
    }

    fn build(
        command: &str,
        status: &str,
        error_class: Option<String>,
        message: String,
        data: Option<Value>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: status.to_string(),
            error_class,
            message,
            data,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Input failure already classified for the structured envelope.
pub(crate) struct InputFailure {
    pub error_class: &'static str,
    pub message: String,
    pub exit_code: u8,
}

impl InputFailure {
    pub fn into_result(self, command: &str) -> CommandResult {
        CommandResult::failure(command, self.error_class, self.message, self.exit_code)
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T, InputFailure> {
    let raw = fs::read_to_string(path).map_err(|error| InputFailure {
        error_class: "input_read",
        message: format!("could not read {what} file `{}`: {error}", path.display()),
        exit_code: 3,
    })?;

    serde_json::from_str(&raw).map_err(|error| InputFailure {
        error_class: "input_decode",
        message: format!("could not decode {what} file `{}`: {error}", path.display()),
        exit_code: 4,
    })
}

/// A catalog snapshot file is a JSON array of product records.
pub(crate) fn read_catalog(path: &Path) -> Result<CatalogSnapshot, InputFailure> {
    let products: Vec<Product> = read_json(path, "catalog")?;
    Ok(CatalogSnapshot::new(products))
}

/// An order file is a JSON array of order records.
pub(crate) fn read_orders(path: &Path, what: &str) -> Result<Vec<Order>, InputFailure> {
    read_json(path, what)
}
