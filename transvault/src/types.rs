//! Core value types shared by the index, the codecs and the scanner.

use std::{cmp::Ordering, path::PathBuf};

use chrono::{Local, NaiveDateTime};
use indexmap::{Equivalent, IndexMap};
use serde::{Deserialize, Serialize};

/// Resource key → text, in insertion order.
pub type Messages = IndexMap<String, String>;

/// Folder → file names, per bundle.
pub type FileTree = IndexMap<String, IndexMap<String, Vec<String>>>;

/// Bundle → domain → locale → resource → text, the persisted message shape.
pub type MessageTree = IndexMap<String, IndexMap<String, IndexMap<String, Messages>>>;

/// Composite key of one stored translation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageKey {
    pub bundle: String,
    pub domain: String,
    pub locale: String,
    pub resource: String,
}

impl MessageKey {
    pub fn new(
        bundle: impl Into<String>,
        domain: impl Into<String>,
        locale: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            bundle: bundle.into(),
            domain: domain.into(),
            locale: locale.into(),
            resource: resource.into(),
        }
    }

    /// True when the key lives under `bundle`/`domain`/`locale`.
    pub fn is_in(&self, bundle: &str, domain: &str, locale: &str) -> bool {
        self.bundle == bundle && self.domain == domain && self.locale == locale
    }

    pub(crate) fn borrowed(&self) -> MessageKeyRef<'_> {
        MessageKeyRef {
            bundle: &self.bundle,
            domain: &self.domain,
            locale: &self.locale,
            resource: &self.resource,
        }
    }
}

/// Borrowed form of [`MessageKey`], usable for map lookups without allocating.
///
/// The derived `Hash` feeds the four fields in the same order as `MessageKey`, so both
/// forms hash identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct MessageKeyRef<'a> {
    pub bundle: &'a str,
    pub domain: &'a str,
    pub locale: &'a str,
    pub resource: &'a str,
}

impl Equivalent<MessageKey> for MessageKeyRef<'_> {
    fn equivalent(&self, key: &MessageKey) -> bool {
        *self == key.borrowed()
    }
}

/// Case-insensitive ordering used everywhere the index sorts names.
///
/// Ties between spellings that only differ in case fall back to byte order so sorting is
/// deterministic.
pub fn caseless_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// One exportable translation file, as listed by [`crate::Translations::get_files`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub bundle: String,
    pub domain: String,
    pub locale: String,
    /// Source folder the bundle's matching file was scanned from, if any.
    pub folder: Option<String>,
    /// Synthesized `<domain>.<locale>.yml` name.
    pub filename: String,
    pub messages: usize,
}

impl FileRecord {
    /// `bundle|domain|locale`, the key records are listed under.
    pub fn key(&self) -> String {
        [self.bundle.as_str(), self.domain.as_str(), self.locale.as_str()].join("|")
    }

    /// `folder/filename`, or just the file name when no folder is known.
    pub fn path(&self) -> PathBuf {
        match &self.folder {
            Some(folder) => PathBuf::from(folder).join(&self.filename),
            None => PathBuf::from(&self.filename),
        }
    }
}

/// Structured row of [`crate::Translations::as_records`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRow {
    pub bundle: String,
    pub domain: String,
    pub resource: String,
    pub translations: IndexMap<String, Option<String>>,
}

/// Full-fidelity snapshot of an index, in the shape handed to storage.
///
/// Every field is optional on input so that a partial blob can be rejected with a precise
/// error by [`crate::Translations::set_raw_data`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domains: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locales: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<FileTree>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<MessageTree>,
}

impl RawData {
    /// Top-level keys every valid snapshot carries, in validation order.
    pub const REQUIRED_KEYS: [&'static str; 5] =
        ["bundles", "domains", "locales", "files", "messages"];
}

/// A parsed translation file: one locale and domain worth of messages plus provenance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalogue {
    pub locale: String,
    pub domain: String,
    pub messages: Messages,
    /// Physical files the messages were read from.
    pub resources: Vec<PathBuf>,
}

impl Catalogue {
    pub fn new(locale: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            domain: domain.into(),
            ..Self::default()
        }
    }

    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    pub fn with_resource(mut self, path: impl Into<PathBuf>) -> Self {
        self.resources.push(path.into());
        self
    }
}

/// Bundle/domain/locale filter used by listing, export and import.
///
/// An empty list means "every known value" on that axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub bundles: Vec<String>,
    pub domains: Vec<String>,
    pub locales: Vec<String>,
}

impl Selection {
    /// Selects everything.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_bundles<I, S>(mut self, bundles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bundles = bundles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domains = domains.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_locales<I, S>(mut self, locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.locales = locales.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces every empty axis with the index's full set.
    pub fn resolve(&self, translations: &crate::Translations) -> Selection {
        fn or_all<'a>(given: &[String], all: impl Iterator<Item = &'a String>) -> Vec<String> {
            if given.is_empty() {
                all.cloned().collect()
            } else {
                given.to_vec()
            }
        }

        Selection {
            bundles: or_all(&self.bundles, translations.get_bundles().iter()),
            domains: or_all(&self.domains, translations.get_domains(None).iter()),
            locales: or_all(&self.locales, translations.get_locales(None, None).iter()),
        }
    }

    pub fn accepts_bundle(&self, bundle: &str) -> bool {
        self.bundles.is_empty() || self.bundles.iter().any(|b| b == bundle)
    }

    pub fn accepts_domain(&self, domain: &str) -> bool {
        self.domains.is_empty() || self.domains.iter().any(|d| d == domain)
    }

    pub fn accepts_locale(&self, locale: &str) -> bool {
        self.locales.is_empty() || self.locales.iter().any(|l| l == locale)
    }
}

/// Timestamp layout of exported file names.
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// `<prefix>_<YYYY-MM-DD_HH-mm-ss>.<extension>`.
pub fn export_filename(prefix: &str, extension: &str, at: NaiveDateTime) -> String {
    format!("{prefix}_{}.{extension}", at.format(EXPORT_TIMESTAMP_FORMAT))
}

/// [`export_filename`] stamped with the local time.
pub fn timestamped_filename(prefix: &str, extension: &str) -> String {
    export_filename(prefix, extension, Local::now().naive_local())
}
