//! Secret and template models as exchanged with the REST API.
//!
//! The server speaks camelCase JSON and sends `null` for unset scalars, so
//! every scalar field falls back to its default on `null` or absence.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

/// Filename used when a file field is uploaded without one.
pub const DEFAULT_UPLOAD_FILENAME: &str = "File.txt";

static HAS_EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.]+\.\w+$").expect("extension pattern is valid"));

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A secret record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Secret {
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub folder_id: i64,
    #[serde(deserialize_with = "nullable")]
    pub site_id: i64,
    #[serde(deserialize_with = "nullable")]
    pub secret_template_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_policy_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_type_web_script_id: Option<i64>,
    pub launcher_connect_as_secret_id: Option<i64>,
    pub check_out_interval_minutes: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    pub active: bool,
    #[serde(deserialize_with = "nullable")]
    pub checked_out: bool,
    #[serde(deserialize_with = "nullable")]
    pub check_out_enabled: bool,
    #[serde(deserialize_with = "nullable")]
    pub auto_change_enabled: bool,
    #[serde(deserialize_with = "nullable")]
    pub check_out_change_password_enabled: bool,
    #[serde(deserialize_with = "nullable")]
    pub delay_indexing: bool,
    #[serde(deserialize_with = "nullable")]
    pub enable_inherit_permissions: bool,
    #[serde(deserialize_with = "nullable")]
    pub enable_inherit_secret_policy: bool,
    #[serde(deserialize_with = "nullable")]
    pub proxy_enabled: bool,
    #[serde(deserialize_with = "nullable")]
    pub requires_comment: bool,
    #[serde(deserialize_with = "nullable")]
    pub session_recording_enabled: bool,
    #[serde(deserialize_with = "nullable")]
    pub web_launcher_requires_incognito_mode: bool,
    /// Field values, called `items` on the wire
    #[serde(rename = "items", deserialize_with = "nullable")]
    pub fields: Vec<SecretField>,
}

impl Secret {
    /// Value of the first field whose name or slug equals `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.field_name == name || f.slug == name)
            .map(|f| f.item_value.as_str())
    }

    /// Value of the field with the given slug.
    #[must_use]
    pub fn field_by_slug(&self, slug: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.slug == slug)
            .map(|f| f.item_value.as_str())
    }

    /// Value of the field with the given display name.
    #[must_use]
    pub fn field_by_name(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.field_name == name)
            .map(|f| f.item_value.as_str())
    }

    /// Raw content of the field with the given slug, for binary attachments.
    #[must_use]
    pub fn file_content(&self, slug: &str) -> Option<&[u8]> {
        self.fields
            .iter()
            .find(|f| f.slug == slug)
            .map(SecretField::content)
    }
}

/// A single value of a secret, possibly a file attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecretField {
    #[serde(deserialize_with = "nullable")]
    pub item_id: i64,
    /// Id of the template field this value belongs to
    #[serde(deserialize_with = "nullable")]
    pub field_id: i64,
    #[serde(deserialize_with = "nullable")]
    pub file_attachment_id: i64,
    #[serde(deserialize_with = "nullable")]
    pub field_name: String,
    #[serde(deserialize_with = "nullable")]
    pub slug: String,
    #[serde(deserialize_with = "nullable")]
    pub field_description: String,
    #[serde(deserialize_with = "nullable")]
    pub filename: String,
    /// Text value; for file fields, the attachment when it is valid UTF-8
    #[serde(deserialize_with = "nullable")]
    pub item_value: String,
    /// Attachment bytes of a file field, exactly as stored on the server
    #[serde(skip)]
    pub file_content: Vec<u8>,
    #[serde(deserialize_with = "nullable")]
    pub is_file: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_notes: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_password: bool,
}

impl SecretField {
    /// A file field carrying `content`.
    #[must_use]
    pub fn file(
        slug: impl Into<String>,
        filename: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            slug: slug.into(),
            filename: filename.into(),
            file_content: content.into(),
            is_file: true,
            ..Self::default()
        }
    }

    /// Bytes uploaded for a file field: `file_content`, or the text value
    /// when no bytes were set.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        if self.file_content.is_empty() {
            self.item_value.as_bytes()
        } else {
            &self.file_content
        }
    }

    /// Store a downloaded attachment. The text value is only filled when
    /// the bytes are valid UTF-8.
    pub(crate) fn set_attachment(&mut self, content: Vec<u8>) {
        match String::from_utf8(content) {
            Ok(text) => {
                self.file_content = text.as_bytes().to_vec();
                self.item_value = text;
            }
            Err(e) => {
                self.item_value.clear();
                self.file_content = e.into_bytes();
            }
        }
    }

    /// Filename sent with a multipart upload.
    ///
    /// Empty names become `File.txt`; names without an extension get `.txt`
    /// appended.
    #[must_use]
    pub fn upload_filename(&self) -> String {
        if self.filename.is_empty() {
            DEFAULT_UPLOAD_FILENAME.to_string()
        } else if HAS_EXTENSION.is_match(&self.filename) {
            self.filename.clone()
        } else {
            format!("{}.txt", self.filename)
        }
    }

    /// Whether the server holds an attachment that should be downloaded.
    #[must_use]
    pub fn has_attachment(&self) -> bool {
        self.is_file && self.file_attachment_id != 0 && !self.filename.is_empty()
    }
}

/// A secret template: the schema secrets are created from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecretTemplate {
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub fields: Vec<SecretTemplateField>,
}

impl SecretTemplate {
    /// Template field with the given id.
    #[must_use]
    pub fn field_by_id(&self, id: i64) -> Option<&SecretTemplateField> {
        self.fields.iter().find(|f| f.secret_template_field_id == id)
    }

    /// Template field with the given slug.
    #[must_use]
    pub fn field_by_slug(&self, slug: &str) -> Option<&SecretTemplateField> {
        self.fields.iter().find(|f| f.field_slug_name == slug)
    }
}

/// One field definition of a template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
#[allow(clippy::struct_excessive_bools)]
pub struct SecretTemplateField {
    #[serde(deserialize_with = "nullable")]
    pub secret_template_field_id: i64,
    #[serde(deserialize_with = "nullable")]
    pub field_slug_name: String,
    #[serde(deserialize_with = "nullable")]
    pub display_name: String,
    #[serde(deserialize_with = "nullable")]
    pub description: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub list_type: String,
    #[serde(deserialize_with = "nullable")]
    pub is_file: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_list: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_notes: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_password: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_required: bool,
    #[serde(deserialize_with = "nullable")]
    pub is_url: bool,
}

impl SecretTemplateField {
    /// Fill the descriptive parts of `field` the caller left empty and copy
    /// the id and type flags.
    pub(crate) fn complete(&self, field: &mut SecretField) {
        field.field_id = self.secret_template_field_id;
        if field.field_name.is_empty() {
            field.field_name.clone_from(&self.name);
        }
        if field.slug.is_empty() {
            field.slug.clone_from(&self.field_slug_name);
        }
        if field.field_description.is_empty() {
            field.field_description.clone_from(&self.description);
        }
        field.is_file = self.is_file;
        field.is_notes = self.is_notes;
        field.is_password = self.is_password;
    }
}

/// Page of search hits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecretSearchResult {
    #[serde(deserialize_with = "nullable")]
    pub skip: i64,
    #[serde(deserialize_with = "nullable")]
    pub take: i64,
    #[serde(deserialize_with = "nullable")]
    pub total: i64,
    #[serde(deserialize_with = "nullable")]
    pub has_next: bool,
    #[serde(deserialize_with = "nullable")]
    pub records: Vec<SecretSummary>,
}

/// Search hit, without field values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SecretSummary {
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub folder_id: i64,
    #[serde(deserialize_with = "nullable")]
    pub folder_path: String,
    #[serde(deserialize_with = "nullable")]
    pub secret_template_id: i64,
    #[serde(deserialize_with = "nullable")]
    pub secret_template_name: String,
    #[serde(deserialize_with = "nullable")]
    pub active: bool,
    #[serde(deserialize_with = "nullable")]
    pub checked_out: bool,
}
