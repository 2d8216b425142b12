//! The translation index: every known bundle, domain, locale, source file and message.
//!
//! Messages live in one flat map keyed by [`MessageKey`]. The bundle, domain and locale
//! sets are caches of the keys seen, maintained on insert; per-bundle and per-domain
//! queries are filtered scans over the flat map, so they report keys in the map's order
//! (insertion order until [`Translations::sort`] runs).

use indexmap::{IndexMap, IndexSet};

use crate::{
    error::Error,
    types::{
        Catalogue, FileRecord, FileTree, MessageKey, MessageKeyRef, MessageTree, Messages,
        RawData, ResourceRow, Selection, caseless_cmp,
    },
};

/// Extension every listed file is normalized to, whatever format it was scanned from.
pub const EXPORT_EXTENSION: &str = "yml";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translations {
    bundles: IndexSet<String>,
    domains: IndexSet<String>,
    locales: IndexSet<String>,
    files: FileTree,
    messages: IndexMap<MessageKey, String>,
}

fn require(values: &[&str]) -> Result<(), Error> {
    if values.iter().any(|v| v.is_empty()) {
        return Err(Error::missing_arguments());
    }
    Ok(())
}

/// Treats `Some("")` like `None`: an empty filter is no filter.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl Translations {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored (bundle, domain, locale, resource) tuples.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterates every stored tuple in map order.
    pub fn iter(&self) -> impl Iterator<Item = (&MessageKey, &str)> {
        self.messages.iter().map(|(k, v)| (k, v.as_str()))
    }

    /// Inserts or overwrites one translation, registering its bundle, domain and locale.
    pub fn add_translation(
        &mut self,
        bundle: &str,
        domain: &str,
        locale: &str,
        resource: &str,
        text: impl Into<String>,
    ) -> Result<&mut Self, Error> {
        require(&[bundle, domain, locale, resource])?;

        self.add_bundle(bundle);
        self.add_domain(domain);
        self.add_locale(locale);

        let lookup = MessageKeyRef {
            bundle,
            domain,
            locale,
            resource,
        };
        match self.messages.get_mut(&lookup) {
            Some(slot) => *slot = text.into(),
            None => {
                self.messages.insert(
                    MessageKey::new(bundle, domain, locale, resource),
                    text.into(),
                );
            }
        }
        Ok(self)
    }

    /// Records that `filename` was scanned from `folder` for `bundle`. Duplicates are ignored.
    pub fn add_file(
        &mut self,
        bundle: &str,
        folder: &str,
        filename: &str,
    ) -> Result<&mut Self, Error> {
        require(&[bundle, folder, filename])?;

        let names = self
            .files
            .entry(bundle.to_string())
            .or_default()
            .entry(folder.to_string())
            .or_default();
        if !names.iter().any(|n| n == filename) {
            names.push(filename.to_string());
        }
        Ok(self)
    }

    /// Adds every message of a loaded catalogue, plus the files it was read from.
    pub fn add_catalogue(
        &mut self,
        bundle: &str,
        folder: &str,
        catalogue: &Catalogue,
    ) -> Result<&mut Self, Error> {
        for (resource, text) in &catalogue.messages {
            self.add_translation(
                bundle,
                &catalogue.domain,
                &catalogue.locale,
                resource,
                text.as_str(),
            )?;
        }

        for path in &catalogue.resources {
            if let Some(name) = path.file_name() {
                self.add_file(bundle, folder, &name.to_string_lossy())?;
            }
        }
        Ok(self)
    }

    pub fn add_bundle(&mut self, bundle: &str) -> &mut Self {
        if !self.bundles.contains(bundle) {
            self.bundles.insert(bundle.to_string());
        }
        self
    }

    pub fn add_domain(&mut self, domain: &str) -> &mut Self {
        if !self.domains.contains(domain) {
            self.domains.insert(domain.to_string());
        }
        self
    }

    pub fn add_locale(&mut self, locale: &str) -> &mut Self {
        if !self.locales.contains(locale) {
            self.locales.insert(locale.to_string());
        }
        self
    }

    /// Re-inserts every tuple and file of `other` into `self`; `other` wins on conflicts.
    pub fn merge(&mut self, other: &Translations) -> Result<&mut Self, Error> {
        for (key, text) in &other.messages {
            self.add_translation(
                &key.bundle,
                &key.domain,
                &key.locale,
                &key.resource,
                text.as_str(),
            )?;
        }

        for (bundle, folders) in &other.files {
            for (folder, names) in folders {
                for name in names {
                    self.add_file(bundle, folder, name)?;
                }
            }
        }
        Ok(self)
    }

    /// Sorts names case-insensitively: the three sets, the file tree at every level, and
    /// messages by bundle, then domain, then locale. Resource order inside one locale is
    /// left as inserted.
    pub fn sort(&mut self) -> &mut Self {
        self.bundles.sort_by(|a, b| caseless_cmp(a, b));
        self.domains.sort_by(|a, b| caseless_cmp(a, b));
        self.locales.sort_by(|a, b| caseless_cmp(a, b));

        self.files.sort_by(|a, _, b, _| caseless_cmp(a, b));
        for folders in self.files.values_mut() {
            folders.sort_by(|a, _, b, _| caseless_cmp(a, b));
            for names in folders.values_mut() {
                names.sort_by(|a, b| caseless_cmp(a, b));
            }
        }

        self.messages.sort_by(|a, _, b, _| {
            caseless_cmp(&a.bundle, &b.bundle)
                .then_with(|| caseless_cmp(&a.domain, &b.domain))
                .then_with(|| caseless_cmp(&a.locale, &b.locale))
        });
        self
    }

    pub fn get_bundles(&self) -> &IndexSet<String> {
        &self.bundles
    }

    /// All domains, or the domains present under `bundle`.
    pub fn get_domains(&self, bundle: Option<&str>) -> Vec<String> {
        let Some(bundle) = non_empty(bundle) else {
            return self.domains.iter().cloned().collect();
        };

        self.messages
            .keys()
            .filter(|k| k.bundle == bundle)
            .map(|k| k.domain.as_str())
            .collect::<IndexSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// All locales, or the locales present under `bundle`/`domain`.
    ///
    /// A bundle without a domain matches nothing.
    pub fn get_locales(&self, bundle: Option<&str>, domain: Option<&str>) -> Vec<String> {
        let Some(bundle) = non_empty(bundle) else {
            return self.locales.iter().cloned().collect();
        };
        let Some(domain) = non_empty(domain) else {
            return Vec::new();
        };

        self.messages
            .keys()
            .filter(|k| k.bundle == bundle && k.domain == domain)
            .map(|k| k.locale.as_str())
            .collect::<IndexSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Resource keys under `bundle`/`domain`.
    ///
    /// With a locale, the keys of that locale in stored order. Without one, the union over
    /// every locale, deduplicated and sorted case-insensitively.
    pub fn get_resources(
        &self,
        bundle: &str,
        domain: &str,
        locale: Option<&str>,
    ) -> Result<Vec<String>, Error> {
        require(&[bundle, domain])?;

        Ok(match non_empty(locale) {
            Some(locale) => self
                .messages
                .keys()
                .filter(|k| k.is_in(bundle, domain, locale))
                .map(|k| k.resource.clone())
                .collect(),
            None => self.resource_union(bundle, domain),
        })
    }

    fn resource_union(&self, bundle: &str, domain: &str) -> Vec<String> {
        let mut resources = self
            .messages
            .keys()
            .filter(|k| k.bundle == bundle && k.domain == domain)
            .map(|k| k.resource.as_str())
            .collect::<IndexSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        resources.sort_by(|a, b| caseless_cmp(a, b));
        resources
    }

    /// Resource → text for one leaf; empty when the leaf does not exist.
    pub fn get_messages(
        &self,
        bundle: &str,
        domain: &str,
        locale: &str,
    ) -> Result<Messages, Error> {
        require(&[bundle, domain, locale])?;

        Ok(self
            .messages
            .iter()
            .filter(|(k, _)| k.is_in(bundle, domain, locale))
            .map(|(k, v)| (k.resource.clone(), v.clone()))
            .collect())
    }

    pub fn get_translation(
        &self,
        bundle: &str,
        domain: &str,
        locale: &str,
        resource: &str,
    ) -> Result<Option<&str>, Error> {
        require(&[bundle, domain, locale, resource])?;

        let lookup = MessageKeyRef {
            bundle,
            domain,
            locale,
            resource,
        };
        Ok(self.messages.get(&lookup).map(String::as_str))
    }

    /// Lists one exportable file per selected (bundle, domain, locale) that has messages.
    ///
    /// File names are always `<domain>.<locale>.yml`. The folder comes from the first file
    /// scanned for the bundle whose name starts with the domain segment; records without a
    /// matching scanned file keep `folder: None`.
    pub fn get_files(&self, selection: &Selection) -> IndexMap<String, FileRecord> {
        let selection = selection.resolve(self);

        let mut counts: IndexMap<MessageKeyRef<'_>, usize> = IndexMap::new();
        for key in self.messages.keys() {
            let leaf = MessageKeyRef {
                resource: "",
                ..key.borrowed()
            };
            *counts.entry(leaf).or_default() += 1;
        }

        let mut result = IndexMap::new();
        for bundle in &selection.bundles {
            for domain in &selection.domains {
                for locale in &selection.locales {
                    let leaf = MessageKeyRef {
                        bundle,
                        domain,
                        locale,
                        resource: "",
                    };
                    let Some(&messages) = counts.get(&leaf) else {
                        continue;
                    };

                    let record = FileRecord {
                        bundle: bundle.clone(),
                        domain: domain.clone(),
                        locale: locale.clone(),
                        folder: self.source_folder(bundle, domain),
                        filename: format!("{domain}.{locale}.{EXPORT_EXTENSION}"),
                        messages,
                    };
                    result.insert(record.key(), record);
                }
            }
        }
        result
    }

    // TODO: pick a tie-break when one domain was scanned from several folders of a bundle;
    // today the first folder in stored order wins.
    fn source_folder(&self, bundle: &str, domain: &str) -> Option<String> {
        self.files.get(bundle)?.iter().find_map(|(folder, names)| {
            names
                .iter()
                .any(|name| name.split('.').next() == Some(domain))
                .then(|| folder.clone())
        })
    }

    /// One positional row per (bundle, domain, resource):
    /// `[bundle, domain, resource, text_locale1, ..., text_localeN]` over every known
    /// locale, `None` where a translation is missing.
    pub fn as_rows(&self) -> Vec<Vec<Option<String>>> {
        self.as_records()
            .into_iter()
            .map(|row| {
                let mut item = vec![Some(row.bundle), Some(row.domain), Some(row.resource)];
                item.extend(row.translations.into_values());
                item
            })
            .collect()
    }

    /// Same rows as [`Translations::as_rows`], keyed by field and locale.
    pub fn as_records(&self) -> Vec<ResourceRow> {
        let mut result = Vec::new();
        for bundle in &self.bundles {
            for domain in self.get_domains(Some(bundle)) {
                for resource in self.resource_union(bundle, &domain) {
                    let translations = self
                        .locales
                        .iter()
                        .map(|locale| {
                            let lookup = MessageKeyRef {
                                bundle,
                                domain: &domain,
                                locale,
                                resource: &resource,
                            };
                            (locale.clone(), self.messages.get(&lookup).cloned())
                        })
                        .collect();

                    result.push(ResourceRow {
                        bundle: bundle.clone(),
                        domain: domain.clone(),
                        resource,
                        translations,
                    });
                }
            }
        }
        result
    }

    /// Snapshot of all five collections, with messages nested bundle → domain → locale.
    pub fn get_raw_data(&self) -> RawData {
        let mut messages = MessageTree::new();
        for (key, text) in &self.messages {
            messages
                .entry(key.bundle.clone())
                .or_default()
                .entry(key.domain.clone())
                .or_default()
                .entry(key.locale.clone())
                .or_default()
                .insert(key.resource.clone(), text.clone());
        }

        RawData {
            bundles: Some(self.bundles.iter().cloned().collect()),
            domains: Some(self.domains.iter().cloned().collect()),
            locales: Some(self.locales.iter().cloned().collect()),
            files: Some(self.files.clone()),
            messages: Some(messages),
        }
    }

    /// Replaces the whole index with a snapshot.
    ///
    /// Fails on the first missing collection, checked in the order bundles, domains,
    /// locales, files, messages. Names used by messages but absent from the given sets are
    /// appended to them.
    pub fn set_raw_data(&mut self, data: RawData) -> Result<&mut Self, Error> {
        fn take<T>(value: Option<T>, key: &str) -> Result<T, Error> {
            value.ok_or_else(|| {
                Error::InvalidArgument(format!("Key \"{key}\" not found in array."))
            })
        }

        let bundles = take(data.bundles, "bundles")?;
        let domains = take(data.domains, "domains")?;
        let locales = take(data.locales, "locales")?;
        let files = take(data.files, "files")?;
        let tree = take(data.messages, "messages")?;

        let mut bundles: IndexSet<String> = bundles.into_iter().collect();
        let mut domains: IndexSet<String> = domains.into_iter().collect();
        let mut locales: IndexSet<String> = locales.into_iter().collect();

        let mut messages = IndexMap::new();
        for (bundle, by_domain) in tree {
            for (domain, by_locale) in by_domain {
                for (locale, entries) in by_locale {
                    for (resource, text) in entries {
                        let key =
                            MessageKey::new(bundle.as_str(), domain.as_str(), locale.as_str(), resource);
                        messages.insert(key, text);
                    }
                    if !locales.contains(&locale) {
                        locales.insert(locale);
                    }
                }
                if !domains.contains(&domain) {
                    domains.insert(domain);
                }
            }
            if !bundles.contains(&bundle) {
                bundles.insert(bundle);
            }
        }

        *self = Translations {
            bundles,
            domains,
            locales,
            files,
            messages,
        };
        Ok(self)
    }
}

impl TryFrom<RawData> for Translations {
    type Error = Error;

    fn try_from(data: RawData) -> Result<Self, Self::Error> {
        let mut translations = Translations::new();
        translations.set_raw_data(data)?;
        Ok(translations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample() -> Translations {
        let mut t = Translations::new();
        t.add_translation("App", "messages", "en", "app.name", "Hi")
            .unwrap()
            .add_translation("App", "messages", "es", "app.name", "Hola")
            .unwrap();
        t
    }

    #[test]
    fn test_add_then_get_translation() {
        let t = sample();
        assert_eq!(
            t.get_translation("App", "messages", "en", "app.name").unwrap(),
            Some("Hi")
        );
        assert_eq!(
            t.get_translation("App", "messages", "fr", "app.name").unwrap(),
            None
        );
    }

    #[test]
    fn test_overwrite_keeps_other_tuples() {
        let mut t = sample();
        t.add_translation("App", "messages", "en", "app.name", "Hello")
            .unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(
            t.get_translation("App", "messages", "en", "app.name").unwrap(),
            Some("Hello")
        );
        assert_eq!(
            t.get_translation("App", "messages", "es", "app.name").unwrap(),
            Some("Hola")
        );
    }

    #[test]
    fn test_missing_arguments_are_rejected() {
        let mut t = Translations::new();
        assert!(matches!(
            t.add_translation("", "messages", "en", "a", "x"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            t.add_translation("App", "messages", "en", "", "x"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            t.add_file("App", "", "messages.en.yml"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            t.get_resources("App", "", None),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            t.get_messages("App", "messages", ""),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            t.get_translation("App", "messages", "en", ""),
            Err(Error::InvalidArgument(_))
        ));
        assert!(t.is_empty());
    }

    #[test]
    fn test_empty_text_is_allowed() {
        let mut t = Translations::new();
        t.add_translation("App", "messages", "en", "blank", "").unwrap();
        assert_eq!(
            t.get_translation("App", "messages", "en", "blank").unwrap(),
            Some("")
        );
    }

    #[test]
    fn test_sets_have_no_duplicates() {
        let mut t = sample();
        t.add_translation("App", "validators", "en", "x", "y").unwrap();
        assert_eq!(t.get_bundles().len(), 1);
        assert_eq!(t.get_domains(None), vec!["messages", "validators"]);
        assert_eq!(t.get_locales(None, None), vec!["en", "es"]);
    }

    #[test]
    fn test_add_file_deduplicates() {
        let mut t = Translations::new();
        t.add_file("App", "/app/translations", "messages.en.yml")
            .unwrap()
            .add_file("App", "/app/translations", "messages.en.yml")
            .unwrap()
            .add_file("App", "/app/translations", "messages.es.yml")
            .unwrap();
        let files = t.get_raw_data().files.unwrap();
        assert_eq!(
            files["App"]["/app/translations"],
            vec!["messages.en.yml", "messages.es.yml"]
        );
    }

    #[test]
    fn test_add_catalogue_records_messages_and_files() {
        let mut messages = Messages::new();
        messages.insert("app.name".to_string(), "Hi".to_string());
        let catalogue = Catalogue::new("en", "messages")
            .with_messages(messages)
            .with_resource(PathBuf::from("/app/translations/messages.en.yml"));

        let mut t = Translations::new();
        t.add_catalogue("App", "/app/translations", &catalogue)
            .unwrap();

        assert_eq!(
            t.get_translation("App", "messages", "en", "app.name").unwrap(),
            Some("Hi")
        );
        let files = t.get_raw_data().files.unwrap();
        assert_eq!(files["App"]["/app/translations"], vec!["messages.en.yml"]);
    }

    #[test]
    fn test_merge_later_wins() {
        let mut a = sample();
        let mut b = Translations::new();
        b.add_translation("App", "messages", "en", "app.name", "Howdy")
            .unwrap()
            .add_translation("Blog", "messages", "en", "post.title", "Title")
            .unwrap()
            .add_file("Blog", "/blog/translations", "messages.en.xlf")
            .unwrap();

        a.merge(&b).unwrap();

        assert_eq!(a.len(), 3);
        assert_eq!(
            a.get_translation("App", "messages", "en", "app.name").unwrap(),
            Some("Howdy")
        );
        assert_eq!(
            a.get_translation("App", "messages", "es", "app.name").unwrap(),
            Some("Hola")
        );
        assert_eq!(a.get_bundles().len(), 2);
        assert!(a.get_raw_data().files.unwrap().contains_key("Blog"));
    }

    #[test]
    fn test_sort_orders_everything_case_insensitively() {
        let mut t = Translations::new();
        t.add_translation("zeta", "validators", "fr", "b", "1").unwrap();
        t.add_translation("Alpha", "messages", "EN", "z", "2").unwrap();
        t.add_translation("Alpha", "messages", "de", "a", "3").unwrap();
        t.add_translation("beta", "Admin", "fr", "k", "4").unwrap();
        t.add_file("zeta", "/z", "b.fr.yml").unwrap();
        t.add_file("Alpha", "/b", "Z.de.yml").unwrap();
        t.add_file("Alpha", "/b", "a.de.yml").unwrap();
        t.add_file("Alpha", "/a", "m.en.yml").unwrap();

        t.sort();

        let bundles: Vec<_> = t.get_bundles().iter().cloned().collect();
        assert_eq!(bundles, vec!["Alpha", "beta", "zeta"]);
        assert_eq!(t.get_domains(None), vec!["Admin", "messages", "validators"]);
        assert_eq!(t.get_locales(None, None), vec!["de", "EN", "fr"]);
        assert_eq!(t.get_locales(Some("Alpha"), Some("messages")), vec!["de", "EN"]);

        let files = t.get_raw_data().files.unwrap();
        assert_eq!(files.keys().collect::<Vec<_>>(), vec!["Alpha", "zeta"]);
        assert_eq!(files["Alpha"].keys().collect::<Vec<_>>(), vec!["/a", "/b"]);
        assert_eq!(files["Alpha"]["/b"], vec!["a.de.yml", "Z.de.yml"]);

        let order: Vec<_> = t.iter().map(|(k, _)| k.bundle.as_str()).collect();
        assert_eq!(order, vec!["Alpha", "Alpha", "beta", "zeta"]);
    }

    #[test]
    fn test_sort_keeps_resource_order_and_is_idempotent() {
        let mut t = Translations::new();
        t.add_translation("App", "messages", "en", "zebra", "1").unwrap();
        t.add_translation("App", "messages", "en", "apple", "2").unwrap();
        t.sort();
        assert_eq!(
            t.get_resources("App", "messages", Some("en")).unwrap(),
            vec!["zebra", "apple"]
        );

        let once = t.get_raw_data();
        t.sort();
        assert_eq!(once, t.get_raw_data());
    }

    #[test]
    fn test_filtered_queries() {
        let mut t = sample();
        t.add_translation("Blog", "posts", "fr", "title", "Titre").unwrap();

        assert_eq!(t.get_domains(Some("App")), vec!["messages"]);
        assert_eq!(t.get_domains(Some("Missing")), Vec::<String>::new());
        assert_eq!(t.get_locales(Some("App"), Some("messages")), vec!["en", "es"]);
        assert_eq!(t.get_locales(Some("App"), None), Vec::<String>::new());
        assert_eq!(t.get_locales(Some("App"), Some("posts")), Vec::<String>::new());
        assert_eq!(t.get_locales(None, Some("posts")), vec!["en", "es", "fr"]);
    }

    #[test]
    fn test_get_resources_union_is_sorted_and_unique() {
        let mut t = Translations::new();
        t.add_translation("App", "messages", "en", "b.key", "1").unwrap();
        t.add_translation("App", "messages", "en", "A.key", "2").unwrap();
        t.add_translation("App", "messages", "es", "b.key", "3").unwrap();
        t.add_translation("App", "messages", "es", "c.key", "4").unwrap();

        assert_eq!(
            t.get_resources("App", "messages", None).unwrap(),
            vec!["A.key", "b.key", "c.key"]
        );
        assert_eq!(
            t.get_resources("App", "messages", Some("es")).unwrap(),
            vec!["b.key", "c.key"]
        );
        assert!(t.get_resources("App", "other", None).unwrap().is_empty());
    }

    #[test]
    fn test_get_messages_missing_leaf_is_empty() {
        let t = sample();
        let messages = t.get_messages("App", "messages", "es").unwrap();
        assert_eq!(messages.get("app.name").map(String::as_str), Some("Hola"));
        assert!(t.get_messages("App", "messages", "de").unwrap().is_empty());
    }

    #[test]
    fn test_get_files_synthesizes_yml_names_without_source_file() {
        let mut t = Translations::new();
        t.add_translation("App", "messages", "en", "app.name", "Hi").unwrap();

        let files = t.get_files(&Selection::all());
        assert_eq!(files.len(), 1);
        let record = &files["App|messages|en"];
        assert_eq!(record.folder, None);
        assert_eq!(record.filename, "messages.en.yml");
        assert_eq!(record.messages, 1);
    }

    #[test]
    fn test_get_files_uses_first_matching_folder() {
        let mut t = sample();
        t.add_translation("App", "validators", "en", "not_blank", "Required")
            .unwrap();
        t.add_file("App", "/app/a", "validators.en.xlf").unwrap();
        t.add_file("App", "/app/b", "messages.en.php").unwrap();
        t.add_file("App", "/app/c", "messages.es.yml").unwrap();

        let files = t.get_files(&Selection::all().with_locales(["en"]));
        let keys: Vec<_> = files.keys().cloned().collect();
        assert_eq!(keys, vec!["App|messages|en", "App|validators|en"]);
        assert_eq!(files["App|messages|en"].folder.as_deref(), Some("/app/b"));
        assert_eq!(files["App|messages|en"].filename, "messages.en.yml");
        assert_eq!(files["App|validators|en"].folder.as_deref(), Some("/app/a"));
    }

    #[test]
    fn test_as_rows_matches_locale_order() {
        let t = sample();
        assert_eq!(
            t.as_rows(),
            vec![vec![
                Some("App".to_string()),
                Some("messages".to_string()),
                Some("app.name".to_string()),
                Some("Hi".to_string()),
                Some("Hola".to_string()),
            ]]
        );
    }

    #[test]
    fn test_as_records_fill_missing_with_none() {
        let mut t = sample();
        t.add_translation("App", "messages", "fr", "app.other", "Autre")
            .unwrap();

        let records = t.as_records();
        assert_eq!(records.len(), 2);
        let other = records.iter().find(|r| r.resource == "app.other").unwrap();
        assert_eq!(other.translations["en"], None);
        assert_eq!(other.translations["fr"].as_deref(), Some("Autre"));
        assert_eq!(
            other.translations.keys().collect::<Vec<_>>(),
            vec!["en", "es", "fr"]
        );
    }

    #[test]
    fn test_raw_data_round_trip() {
        let mut t = sample();
        t.add_file("App", "/app/translations", "messages.en.yml").unwrap();

        let raw = t.get_raw_data();
        assert_eq!(
            raw.messages.as_ref().unwrap()["App"]["messages"]["es"]["app.name"],
            "Hola"
        );

        let restored = Translations::try_from(raw).unwrap();
        assert_eq!(restored, t);
    }

    #[test]
    fn test_set_raw_data_reports_first_missing_key() {
        let mut raw = sample().get_raw_data();
        raw.locales = None;
        raw.messages = None;

        let err = Translations::new().set_raw_data(raw).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid argument: Key \"locales\" not found in array."
        );

        let err = Translations::new()
            .set_raw_data(RawData::default())
            .unwrap_err();
        assert!(err.to_string().contains("\"bundles\""));
    }

    #[test]
    fn test_set_raw_data_registers_names_used_by_messages() {
        let mut raw = sample().get_raw_data();
        raw.bundles = Some(Vec::new());
        raw.locales = Some(vec!["es".to_string()]);

        let t = Translations::try_from(raw).unwrap();
        assert!(t.get_bundles().contains("App"));
        assert_eq!(t.get_locales(None, None), vec!["es", "en"]);
    }
}
