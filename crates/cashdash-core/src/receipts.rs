//! Receipt attachment registry
//!
//! Uploaded receipts live only in memory, filed under a tab and a
//! `"{month} {year}"` label. Each record gets a generated id; the name-based
//! delete is kept alongside the id-based one, and removes every record with
//! that name.

use crate::filter::is_match_all;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use cashdash_config::ReceiptsConfig;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ReceiptError {
    #[error("Receipt not found: {id}")]
    NotFound { id: String },

    #[error("Arquivo não disponível para visualização: {name}")]
    NotAvailable { name: String },

    #[error("Preview not supported for {mime_type}")]
    UnsupportedPreview { mime_type: String },

    #[error("File type not accepted: {mime_type}")]
    RejectedType { mime_type: String },

    #[error("File is {size} bytes, the limit is {max}")]
    TooLarge { size: u64, max: u64 },

    #[error("Invalid receipt: {message}")]
    Invalid { message: String },
}

pub type ReceiptResult<T> = Result<T, ReceiptError>;

/// Category tab a receipt is filed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptTab {
    Entradas,
    Saidas,
    Outros,
}

impl std::str::FromStr for ReceiptTab {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "entradas" => Ok(ReceiptTab::Entradas),
            "saidas" | "saídas" => Ok(ReceiptTab::Saidas),
            "outros" => Ok(ReceiptTab::Outros),
            _ => Err(format!("Unknown receipt tab: {}", s)),
        }
    }
}

impl std::fmt::Display for ReceiptTab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReceiptTab::Entradas => write!(f, "entradas"),
            ReceiptTab::Saidas => write!(f, "saidas"),
            ReceiptTab::Outros => write!(f, "outros"),
        }
    }
}

/// An incoming file
#[derive(Debug, Clone)]
pub struct ReceiptUpload {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub content: Option<Vec<u8>>,
    pub month: String,
    pub year: i32,
}

impl ReceiptUpload {
    pub fn new(name: &str, mime_type: &str, content: Vec<u8>, month: &str, year: i32) -> Self {
        Self {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            size: content.len() as u64,
            content: Some(content),
            month: month.to_string(),
            year,
        }
    }
}

/// A stored receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptFile {
    pub id: String,
    pub name: String,
    pub size: u64,
    /// `size` for display, e.g. `1.5 KB`
    pub size_label: String,
    pub mime_type: String,
    pub month: String,
    pub year: i32,
    pub has_content: bool,
    #[serde(skip)]
    pub content: Option<Vec<u8>>,
}

impl ReceiptFile {
    /// Grouping label, e.g. `Março 2025`
    pub fn group_key(&self) -> String {
        format!("{} {}", self.month, self.year)
    }
}

/// What the client should show for a receipt
#[derive(Debug, Clone, PartialEq)]
pub enum ReceiptView {
    /// Image, rendered inline from a `data:` URL
    Inline { data_url: String },
    /// PDF, opened in its own viewer
    Document { name: String, mime_type: String, bytes: Vec<u8> },
}

/// Receipts sharing a month/year label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptGroup {
    pub key: String,
    pub files: Vec<ReceiptFile>,
}

/// Month/year selection for the grouped listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupFilter {
    All,
    Label(String),
}

impl GroupFilter {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some(label) if !is_match_all(label) => GroupFilter::Label(label.trim().to_string()),
            _ => GroupFilter::All,
        }
    }

    fn matches(&self, key: &str) -> bool {
        match self {
            GroupFilter::All => true,
            GroupFilter::Label(label) => label.to_lowercase() == key.to_lowercase(),
        }
    }
}

#[derive(Debug)]
pub struct ReceiptRegistry {
    tabs: HashMap<ReceiptTab, Vec<ReceiptFile>>,
    max_upload_bytes: u64,
    accepted_types: Vec<String>,
}

impl ReceiptRegistry {
    pub fn new(config: &ReceiptsConfig) -> Self {
        Self {
            tabs: HashMap::new(),
            max_upload_bytes: config.max_upload_bytes as u64,
            accepted_types: config.accepted_types.iter().map(|t| t.to_lowercase()).collect(),
        }
    }

    pub fn files(&self, tab: ReceiptTab) -> &[ReceiptFile] {
        self.tabs.get(&tab).map(Vec::as_slice).unwrap_or(&[])
    }

    fn validate(&self, upload: &ReceiptUpload) -> ReceiptResult<()> {
        if upload.name.trim().is_empty() {
            return Err(ReceiptError::Invalid { message: "name is required".to_string() });
        }
        if upload.month.trim().is_empty() {
            return Err(ReceiptError::Invalid { message: "month is required".to_string() });
        }
        let mime_type = upload.mime_type.to_lowercase();
        if !self.accepted_types.contains(&mime_type) {
            return Err(ReceiptError::RejectedType { mime_type: upload.mime_type.clone() });
        }
        if upload.size > self.max_upload_bytes {
            return Err(ReceiptError::TooLarge {
                size: upload.size,
                max: self.max_upload_bytes,
            });
        }
        Ok(())
    }

    /// Append a receipt to `tab`
    pub fn add(&mut self, tab: ReceiptTab, upload: ReceiptUpload) -> ReceiptResult<ReceiptFile> {
        self.validate(&upload)?;
        let file = ReceiptFile {
            id: uuid::Uuid::new_v4().to_string(),
            name: upload.name,
            size: upload.size,
            size_label: cashdash_utils::format_bytes(upload.size),
            mime_type: upload.mime_type,
            month: month_label(&upload.month),
            year: upload.year,
            has_content: upload.content.is_some(),
            content: upload.content,
        };
        log::info!("Receipt '{}' added to {} ({})", file.name, tab, file.size_label);
        self.tabs.entry(tab).or_default().push(file.clone());
        Ok(file)
    }

    /// Remove every receipt in `tab` named `name`; returns how many went
    pub fn delete_by_name(&mut self, tab: ReceiptTab, name: &str) -> usize {
        let files = self.tabs.entry(tab).or_default();
        let before = files.len();
        files.retain(|f| f.name != name);
        before - files.len()
    }

    pub fn delete(&mut self, tab: ReceiptTab, id: &str) -> ReceiptResult<ReceiptFile> {
        let files = self.tabs.entry(tab).or_default();
        match files.iter().position(|f| f.id == id) {
            Some(index) => Ok(files.remove(index)),
            None => Err(ReceiptError::NotFound { id: id.to_string() }),
        }
    }

    pub fn get(&self, tab: ReceiptTab, id: &str) -> ReceiptResult<&ReceiptFile> {
        self.files(tab)
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| ReceiptError::NotFound { id: id.to_string() })
    }

    /// Preview for a receipt. Images come back as a `data:` URL, PDFs as
    /// raw bytes; anything else stays attached but cannot be previewed.
    pub fn view(&self, tab: ReceiptTab, id: &str) -> ReceiptResult<ReceiptView> {
        let file = self.get(tab, id)?;
        let content = file
            .content
            .as_ref()
            .ok_or_else(|| ReceiptError::NotAvailable { name: file.name.clone() })?;

        let mime_type = file.mime_type.to_lowercase();
        if mime_type.starts_with("image/") {
            Ok(ReceiptView::Inline {
                data_url: format!("data:{};base64,{}", mime_type, STANDARD.encode(content)),
            })
        } else if mime_type == "application/pdf" {
            Ok(ReceiptView::Document {
                name: file.name.clone(),
                mime_type,
                bytes: content.clone(),
            })
        } else {
            Err(ReceiptError::UnsupportedPreview { mime_type: file.mime_type.clone() })
        }
    }

    /// Receipts of `tab` grouped by label: labels descending, names
    /// ascending, both ignoring case
    pub fn grouped(&self, tab: ReceiptTab, filter: &GroupFilter) -> Vec<ReceiptGroup> {
        let mut groups: BTreeMap<String, Vec<ReceiptFile>> = BTreeMap::new();
        for file in self.files(tab) {
            let key = file.group_key();
            if filter.matches(&key) {
                groups.entry(key).or_default().push(file.clone());
            }
        }

        let mut groups: Vec<ReceiptGroup> = groups
            .into_iter()
            .map(|(key, mut files)| {
                files.sort_by(|a, b| caseless(&a.name, &b.name));
                ReceiptGroup { key, files }
            })
            .collect();
        groups.sort_by(|a, b| caseless(&b.key, &a.key));
        groups
    }

    /// Distinct labels in `tab`, ascending
    pub fn month_year_options(&self, tab: ReceiptTab) -> Vec<String> {
        self.files(tab)
            .iter()
            .map(ReceiptFile::group_key)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Month as filed: trimmed, first letter upper-cased (`março` -> `Março`)
pub fn month_label(month: &str) -> String {
    let mut chars = month.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Case-insensitive order, byte order between otherwise equal strings
fn caseless(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}
