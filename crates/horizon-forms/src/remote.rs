//! Forms described by a JSON schema.
//!
//! A [`RemoteForm`] builds its sections from a [`RemoteFormSchema`], usually
//! fetched from a server, and records every value the user enters under the
//! row's parameter name. The collected parameters can be turned into a
//! submission request. Fetching and sending are left to the host; a response
//! body that arrives on a background thread is handed over with
//! [`RemoteForm::post_schema`], which applies it on the main loop.
//!
//! ```
//! use horizon_forms::headless;
//! use horizon_forms::remote::RemoteForm;
//!
//! let remote = RemoteForm::new("https://example.com/form", headless::renderer_registry().unwrap());
//! remote
//!     .apply_schema_str(r#"{
//!         "title": "Contact",
//!         "responseUrl": "https://example.com/contact",
//!         "action": "POST",
//!         "sections": [{ "rows": [{ "type": "email", "name": "email", "title": "Email" }] }]
//!     }"#)
//!     .unwrap();
//!
//! let email = &remote.form().rows()[0];
//! email.set_value("otto@example.com");
//! assert_eq!(remote.encoded_parameters(), "email=otto%40example.com");
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use horizon_forms_core::logging::targets;
use horizon_forms_core::{MainLoop, TaskId};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{FormError, Result};
use crate::form::Form;
use crate::kind::{DatePickerMode, RowKind, SliderConfig};
use crate::renderer::RendererRegistry;
use crate::row::Row;
use crate::section::Section;
use crate::value::{PARAMETER_DATE_FORMAT, Value};

/// Content type of a submission body.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// A form document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFormSchema {
    pub title: Option<String>,
    /// Where entered parameters are submitted.
    pub response_url: Option<String>,
    /// HTTP method for the submission, `GET` when absent.
    pub action: Option<String>,
    #[serde(default)]
    pub sections: Vec<RemoteSectionSchema>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteSectionSchema {
    pub title: Option<String>,
    #[serde(default)]
    pub rows: Vec<RemoteRowSchema>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteRowSchema {
    /// Row type, looked up in the [`RemoteRowRegistry`].
    #[serde(rename = "type")]
    pub row_type: String,
    /// Parameter name the row's value is recorded under.
    pub name: Option<String>,
    pub title: Option<String>,
    pub value: Option<serde_json::Value>,
    pub placeholder: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    /// Symbol for `currency` rows.
    pub currency: Option<String>,
    /// Range for `slider` rows.
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

/// Builds a row from its schema entry.
pub type RowBuilder = Arc<dyn Fn(&RemoteRowSchema) -> Row + Send + Sync>;

/// Maps schema row types to row builders.
pub struct RemoteRowRegistry {
    builders: RwLock<HashMap<String, RowBuilder>>,
}

impl Default for RemoteRowRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl RemoteRowRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            builders: RwLock::new(HashMap::new()),
        }
    }

    /// A registry with builders for the built-in row types.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register("label", |schema| Row::label(title_of(schema)));
        registry.register("textField", |schema| {
            placeholder_of(Row::text_field(title_of(schema)), schema)
        });
        registry.register("email", |schema| {
            placeholder_of(Row::email(title_of(schema)), schema)
        });
        registry.register("password", |schema| {
            placeholder_of(Row::password(title_of(schema)), schema)
        });
        registry.register("phone", |schema| {
            placeholder_of(Row::phone(title_of(schema)), schema)
        });
        registry.register("decimal", |schema| {
            placeholder_of(Row::decimal(title_of(schema)), schema)
        });
        registry.register("currency", |schema| {
            let symbol = schema.currency.clone().unwrap_or_else(|| "€".to_string());
            placeholder_of(Row::currency(title_of(schema), symbol), schema)
        });
        registry.register("switch", |schema| Row::switch(title_of(schema)));
        registry.register("slider", |schema| {
            let config = SliderConfig::new(
                schema.minimum.unwrap_or(0.0),
                schema.maximum.unwrap_or(1.0),
            );
            Row::slider(title_of(schema), config)
        });
        registry.register("date", |schema| {
            Row::date(title_of(schema), DatePickerMode::Date)
        });
        registry
    }

    /// Registers (or replaces) the builder for `row_type`.
    pub fn register<F>(&self, row_type: impl Into<String>, builder: F)
    where
        F: Fn(&RemoteRowSchema) -> Row + Send + Sync + 'static,
    {
        self.builders.write().insert(row_type.into(), Arc::new(builder));
    }

    pub fn contains(&self, row_type: &str) -> bool {
        self.builders.read().contains_key(row_type)
    }

    /// Builds the row for a schema entry.
    pub fn build(&self, schema: &RemoteRowSchema) -> Result<Row> {
        let builder = self
            .builders
            .read()
            .get(&schema.row_type)
            .cloned()
            .ok_or_else(|| FormError::unknown_row_type(&schema.row_type))?;
        Ok(builder(schema).with_hidden(schema.hidden))
    }
}

impl fmt::Debug for RemoteRowRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<String> = self.builders.read().keys().cloned().collect();
        types.sort();
        f.debug_struct("RemoteRowRegistry")
            .field("types", &types)
            .finish()
    }
}

fn title_of(schema: &RemoteRowSchema) -> String {
    schema.title.clone().unwrap_or_default()
}

fn placeholder_of(row: Row, schema: &RemoteRowSchema) -> Row {
    match &schema.placeholder {
        Some(placeholder) => row.with_placeholder(placeholder.clone()),
        None => row,
    }
}

/// A request that submits the collected parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest {
    pub method: String,
    pub url: Url,
    pub content_type: Option<&'static str>,
    pub body: Option<String>,
}

/// A form built from a [`RemoteFormSchema`].
pub struct RemoteForm {
    form: Form,
    form_url: RwLock<String>,
    response_url: RwLock<Option<String>>,
    action: RwLock<Option<String>>,
    parameters: Arc<Mutex<BTreeMap<String, String>>>,
    rows: Arc<RemoteRowRegistry>,
}

impl RemoteForm {
    pub fn new(form_url: impl Into<String>, registry: Arc<RendererRegistry>) -> Self {
        Self {
            form: Form::new(registry),
            form_url: RwLock::new(form_url.into()),
            response_url: RwLock::new(None),
            action: RwLock::new(None),
            parameters: Arc::new(Mutex::new(BTreeMap::new())),
            rows: Arc::new(RemoteRowRegistry::with_defaults()),
        }
    }

    /// Use a custom row registry.
    pub fn with_row_registry(mut self, rows: Arc<RemoteRowRegistry>) -> Self {
        self.rows = rows;
        self
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn row_registry(&self) -> &Arc<RemoteRowRegistry> {
        &self.rows
    }

    /// Where the schema is fetched from.
    pub fn form_url(&self) -> String {
        self.form_url.read().clone()
    }

    /// Points the form at a different schema and forgets entered parameters.
    pub fn set_form_url(&self, url: impl Into<String>) {
        *self.form_url.write() = url.into();
        self.parameters.lock().clear();
        tracing::debug!(target: targets::REMOTE, url = %self.form_url(), "form url changed, parameters cleared");
    }

    pub fn response_url(&self) -> Option<String> {
        self.response_url.read().clone()
    }

    pub fn action(&self) -> Option<String> {
        self.action.read().clone()
    }

    /// Decodes a schema document and applies it.
    pub fn apply_schema_str(&self, json: &str) -> Result<()> {
        let schema: RemoteFormSchema = serde_json::from_str(json)?;
        self.apply_schema(schema);
        Ok(())
    }

    /// Rebuilds the form's sections from `schema`.
    ///
    /// Rows whose parameter was entered before keep the entered value.
    /// Rows of unknown type are skipped.
    pub fn apply_schema(&self, schema: RemoteFormSchema) {
        let mut sections = Vec::with_capacity(schema.sections.len());
        for section_schema in &schema.sections {
            let mut rows = Vec::with_capacity(section_schema.rows.len());
            for row_schema in &section_schema.rows {
                match self.build_row(row_schema) {
                    Ok(row) => rows.push(row),
                    Err(err) => {
                        tracing::warn!(target: targets::REMOTE, error = %err, "skipping remote row");
                    }
                }
            }
            let section = Section::new(rows);
            sections.push(match &section_schema.title {
                Some(title) => section.with_title(title.clone()),
                None => section,
            });
        }

        *self.response_url.write() = schema.response_url;
        *self.action.write() = schema.action;
        self.form.set_title(schema.title);
        tracing::debug!(target: targets::REMOTE, sections = sections.len(), "schema applied");
        self.form.set_sections(sections);
    }

    /// Applies a schema document on the main loop.
    ///
    /// Use this from the thread that fetched the document.
    pub fn post_schema(self: &Arc<Self>, main_loop: &MainLoop, body: String) -> TaskId {
        let remote = Arc::clone(self);
        main_loop.post(move || {
            if let Err(err) = remote.apply_schema_str(&body) {
                tracing::warn!(target: targets::REMOTE, error = %err, "discarding remote schema");
            }
        })
    }

    fn build_row(&self, schema: &RemoteRowSchema) -> Result<Row> {
        let mut row = self.rows.build(schema)?;
        let kind = row.kind();

        let restored = schema
            .name
            .as_ref()
            .and_then(|name| self.parameters.lock().get(name).cloned());
        let value = match restored {
            Some(text) => Some(parse_text(&kind, &text)),
            None => schema
                .value
                .as_ref()
                .and_then(|json| schema_value(&kind, json)),
        };
        if let Some(value) = value {
            row = row.with_value(value);
        }

        if let Some(name) = schema.name.clone() {
            let parameters = self.parameters.clone();
            row.signals().value_changed.connect(move |row| {
                let value = row.value();
                let mut parameters = parameters.lock();
                match value {
                    Some(value) => {
                        parameters.insert(name.clone(), value.to_parameter_string());
                    }
                    None => {
                        parameters.remove(&name);
                    }
                }
            });
        }
        Ok(row)
    }

    /// A snapshot of the entered parameters.
    pub fn parameters(&self) -> BTreeMap<String, String> {
        self.parameters.lock().clone()
    }

    pub fn set_parameter(&self, name: impl Into<String>, value: impl Into<String>) {
        self.parameters.lock().insert(name.into(), value.into());
    }

    /// The parameters as an `application/x-www-form-urlencoded` string,
    /// keys in sorted order.
    pub fn encoded_parameters(&self) -> String {
        let parameters = self.parameters.lock();
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(parameters.iter())
            .finish()
    }

    /// The request that submits the parameters, or `None` without a
    /// response URL.
    ///
    /// `GET` requests carry the parameters in the query string; other
    /// methods carry them in a form-encoded body.
    pub fn submit_request(&self) -> Result<Option<SubmitRequest>> {
        let Some(response_url) = self.response_url() else {
            return Ok(None);
        };
        let mut url = Url::parse(&response_url).map_err(|source| FormError::InvalidUrl {
            url: response_url.clone(),
            source,
        })?;
        let method = self
            .action()
            .map(|action| action.to_ascii_uppercase())
            .unwrap_or_else(|| "GET".to_string());

        let request = if method == "GET" {
            let parameters = self.parameters.lock();
            if !parameters.is_empty() {
                url.query_pairs_mut().extend_pairs(parameters.iter());
            }
            SubmitRequest {
                method,
                url,
                content_type: None,
                body: None,
            }
        } else {
            SubmitRequest {
                method,
                url,
                content_type: Some(FORM_URLENCODED),
                body: Some(self.encoded_parameters()),
            }
        };
        tracing::debug!(target: targets::REMOTE, method = %request.method, url = %request.url, "submit request prepared");
        Ok(Some(request))
    }
}

impl fmt::Debug for RemoteForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteForm")
            .field("form_url", &self.form_url())
            .field("response_url", &self.response_url())
            .field("action", &self.action())
            .field("parameters", &self.parameters.lock().len())
            .finish()
    }
}

/// Converts a schema value for a row of `kind`.
fn schema_value(kind: &RowKind, json: &serde_json::Value) -> Option<Value> {
    use serde_json::Value as Json;
    match json {
        Json::Null => None,
        Json::Bool(flag) => Some(Value::Bool(*flag)),
        Json::Number(number) => match kind {
            RowKind::Label | RowKind::Text(_) => Some(Value::Text(number.to_string())),
            _ => number.as_f64().map(Value::Number),
        },
        Json::String(text) => Some(parse_text(kind, text)),
        other => Some(Value::Text(other.to_string())),
    }
}

/// Converts a parameter string for a row of `kind`, falling back to text.
fn parse_text(kind: &RowKind, text: &str) -> Value {
    match kind {
        RowKind::Number(_) | RowKind::Slider(_) => text
            .trim()
            .parse::<f64>()
            .map(Value::Number)
            .unwrap_or_else(|_| Value::Text(text.to_string())),
        RowKind::Switch => Value::Bool(matches!(text, "true" | "1" | "on" | "yes")),
        RowKind::Date(_) => NaiveDateTime::parse_from_str(text, PARAMETER_DATE_FORMAT)
            .or_else(|_| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d").map(|date| date.and_time(NaiveTime::MIN))
            })
            .map(Value::Date)
            .unwrap_or_else(|_| Value::Text(text.to_string())),
        _ => Value::Text(text.to_string()),
    }
}
