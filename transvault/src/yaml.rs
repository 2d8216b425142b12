//! Hierarchical YAML output for translation messages.
//!
//! Flat resource keys such as `app.menu.home` are expanded into nested mappings before
//! being written, so one leaf of the index becomes one readable YAML document:
//!
//! ```rust
//! use transvault::{Messages, yaml};
//!
//! let mut messages = Messages::new();
//! messages.insert("app.name".to_string(), "Demo".to_string());
//! messages.insert("app.title".to_string(), "Demo: the app".to_string());
//!
//! let text = yaml::render("App", "messages", "en", &messages)?;
//! assert_eq!(text, "# App/messages.en.yml\napp:\n    name: Demo\n    title: 'Demo: the app'\n\n");
//! # Ok::<(), transvault::Error>(())
//! ```

use std::{fs, path::Path};

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    error::Error,
    translations::Translations,
    types::{Messages, Selection},
};

/// Column budget for one written line.
pub const WRAP_WIDTH: usize = 100;

/// Spaces per nesting level.
pub const INDENT: usize = 4;

lazy_static! {
    static ref RESERVED_WORD: Regex = Regex::new(
        r"^(?:~|null|Null|NULL|true|True|TRUE|false|False|FALSE|y|Y|yes|Yes|YES|n|N|no|No|NO|on|On|ON|off|Off|OFF)$"
    )
    .unwrap();
    static ref NUMBER_LIKE: Regex = Regex::new(
        r"^(?:[-+]?(?:\.[0-9]+|[0-9][0-9_]*(?:\.[0-9_]*)?)(?:[eE][-+]?[0-9]+)?|[-+]?(?:0x[0-9a-fA-F_]+|0o[0-7_]+|0b[01_]+)|[-+]?\.(?:inf|Inf|INF)|\.(?:nan|NaN|NAN))$"
    )
    .unwrap();
    static ref DATE_LIKE: Regex = Regex::new(r"^[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}").unwrap();
}

/// A node of the expanded message tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YamlNode {
    Scalar(String),
    Mapping(YamlTree),
}

/// Top level of an expanded message tree, in first-seen segment order.
pub type YamlTree = IndexMap<String, YamlNode>;

/// Expands dotted resource keys into a nested tree.
///
/// Keys containing a space are kept verbatim at the top level. A key fails with
/// [`Error::InvalidResource`] when one of its parent segments already holds text, as with
/// `one` followed by `one.two`, or when its own segment already holds children, as with
/// `one.two` followed by `one`.
pub fn expand_to_tree(messages: &Messages) -> Result<YamlTree, Error> {
    let mut tree = YamlTree::new();

    for (resource, text) in messages {
        if resource.contains(' ') {
            tree.insert(resource.clone(), YamlNode::Scalar(text.clone()));
            continue;
        }

        let (parents, last) = match resource.rsplit_once('.') {
            Some((parents, last)) => (Some(parents), last),
            None => (None, resource.as_str()),
        };

        let mut level = &mut tree;
        for part in parents.into_iter().flat_map(|p| p.split('.')) {
            let node = level
                .entry(part.to_string())
                .or_insert_with(|| YamlNode::Mapping(YamlTree::new()));
            level = match node {
                YamlNode::Mapping(children) => children,
                YamlNode::Scalar(_) => {
                    return Err(Error::InvalidResource(format!(
                        "Invalid Yaml resource {resource}"
                    )));
                }
            };
        }
        if let Some(YamlNode::Mapping(_)) = level.get(last) {
            return Err(Error::InvalidResource(format!(
                "Invalid Yaml resource {resource}"
            )));
        }
        level.insert(last.to_string(), YamlNode::Scalar(text.clone()));
    }

    Ok(tree)
}

/// Writes a [`YamlTree`] as block-style YAML.
///
/// Output is deterministic and parses back to the same tree. Scalars are quoted only when
/// a plain scalar would be read differently; values that would run past the wrap width are
/// written as double-quoted scalars folded at single spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YamlWriter {
    pub indent: usize,
    pub width: usize,
}

impl Default for YamlWriter {
    fn default() -> Self {
        Self {
            indent: INDENT,
            width: WRAP_WIDTH,
        }
    }
}

impl YamlWriter {
    pub fn serialize(&self, tree: &YamlTree) -> String {
        if tree.is_empty() {
            return "{}\n".to_string();
        }
        let mut out = String::new();
        self.write_mapping(&mut out, tree, 0);
        out
    }

    fn write_mapping(&self, out: &mut String, mapping: &YamlTree, depth: usize) {
        let pad = " ".repeat(depth * self.indent);
        for (key, node) in mapping {
            let key = quote_scalar(key);
            match node {
                YamlNode::Mapping(children) if children.is_empty() => {
                    out.push_str(&format!("{pad}{key}: {{}}\n"));
                }
                YamlNode::Mapping(children) => {
                    out.push_str(&format!("{pad}{key}:\n"));
                    self.write_mapping(out, children, depth + 1);
                }
                YamlNode::Scalar(value) => {
                    let column = pad.len() + key.chars().count() + 2;
                    let value = self.format_value(value, column, depth);
                    out.push_str(&format!("{pad}{key}: {value}\n"));
                }
            }
        }
    }

    fn format_value(&self, value: &str, column: usize, depth: usize) -> String {
        let too_long = column + value.chars().count() > self.width;
        if !too_long || !has_fold_point(value) {
            return quote_scalar(value);
        }

        let continuation = " ".repeat((depth + 1) * self.indent);
        // one column stays free for the closing quote
        let limit = self.width.saturating_sub(1);
        let escaped = escape_double_quoted(value);
        let mut out = String::from("\"");
        let mut line_len = column + 1;
        let words: Vec<&str> = escaped.split(' ').collect();

        for (i, word) in words.iter().enumerate() {
            if i > 0 {
                let foldable = !words[i - 1].is_empty() && !word.is_empty();
                let word_len = word.chars().count();
                if foldable && line_len + 1 + word_len > limit && line_len > continuation.len() {
                    out.push('\n');
                    out.push_str(&continuation);
                    line_len = continuation.len();
                } else {
                    out.push(' ');
                    line_len += 1;
                }
            }
            out.push_str(word);
            line_len += word.chars().count();
        }

        out.push('"');
        out
    }
}

/// True when some space sits between two non-space characters.
fn has_fold_point(value: &str) -> bool {
    let chars: Vec<char> = value.chars().collect();
    chars
        .windows(3)
        .any(|w| w[1] == ' ' && w[0] != ' ' && w[2] != ' ')
}

/// Characters YAML parsers treat as line breaks or byte order marks besides the control
/// characters.
fn needs_escape(c: char) -> bool {
    c.is_control() || matches!(c, '\u{2028}' | '\u{2029}' | '\u{FEFF}')
}

fn quote_scalar(value: &str) -> String {
    if value.chars().any(needs_escape) {
        format!("\"{}\"", escape_double_quoted(value))
    } else if is_plain_safe(value) {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', "''"))
    }
}

fn is_plain_safe(value: &str) -> bool {
    let Some(first) = value.chars().next() else {
        return false;
    };
    if "-?:,[]{}#&*!|>'\"%@`".contains(first) {
        return false;
    }
    if value.starts_with(char::is_whitespace) || value.ends_with(char::is_whitespace) {
        return false;
    }
    if value.contains(": ") || value.contains(" #") || value.ends_with(':') {
        return false;
    }
    !(RESERVED_WORD.is_match(value) || NUMBER_LIKE.is_match(value) || DATE_LIKE.is_match(value))
}

fn escape_double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            '\u{2028}' => out.push_str("\\L"),
            '\u{2029}' => out.push_str("\\P"),
            c if needs_escape(c) => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Renders one bundle/domain/locale block: a comment header, the expanded tree and a
/// blank separator line. Empty message sets render as an empty string.
pub fn render(
    bundle: &str,
    domain: &str,
    locale: &str,
    messages: &Messages,
) -> Result<String, Error> {
    if messages.is_empty() {
        return Ok(String::new());
    }

    let tree = expand_to_tree(messages)?;
    Ok(format!(
        "{}\n{}\n",
        block_header(bundle, domain, locale),
        YamlWriter::default().serialize(&tree)
    ))
}

fn block_header(bundle: &str, domain: &str, locale: &str) -> String {
    format!("# {bundle}/{domain}.{locale}.yml")
}

/// Exports a selection of the index as one concatenated YAML text.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlExporter {
    writer: YamlWriter,
}

impl YamlExporter {
    pub fn new(writer: YamlWriter) -> Self {
        Self { writer }
    }

    /// One block per selected (bundle, domain, locale) with messages, each preceded by a
    /// dashed rule. A block whose keys cannot be expanded carries the error text instead of
    /// YAML, so one bad resource does not abort the export.
    pub fn export(
        &self,
        translations: &Translations,
        selection: &Selection,
    ) -> Result<String, Error> {
        let selection = selection.resolve(translations);
        let mut buffer = String::new();

        for bundle in &selection.bundles {
            for domain in &selection.domains {
                for locale in &selection.locales {
                    let messages = translations.get_messages(bundle, domain, locale)?;
                    if messages.is_empty() {
                        continue;
                    }

                    buffer.push_str(&format!("# {}\n", "-".repeat(80)));
                    buffer.push_str(&block_header(bundle, domain, locale));
                    buffer.push('\n');
                    match expand_to_tree(&messages) {
                        Ok(tree) => buffer.push_str(&self.writer.serialize(&tree)),
                        Err(err) => {
                            buffer.push_str(&err.to_string());
                            buffer.push('\n');
                        }
                    }
                    buffer.push('\n');
                }
            }
        }

        Ok(buffer)
    }
}

/// Writes single translation files, one bundle/domain/locale each.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFileCreator;

impl YamlFileCreator {
    /// Renders the leaf into `path`, creating parent folders. Returns `false` without
    /// touching the disk when the leaf has no messages.
    pub fn create_file<P: AsRef<Path>>(
        &self,
        translations: &Translations,
        bundle: &str,
        domain: &str,
        locale: &str,
        path: P,
    ) -> Result<bool, Error> {
        let messages = translations.get_messages(bundle, domain, locale)?;
        let buffer = render(bundle, domain, locale, &messages)?;
        if buffer.is_empty() {
            return Ok(false);
        }

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, buffer)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn messages(pairs: &[(&str, &str)]) -> Messages {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn scalar(value: &str) -> YamlNode {
        YamlNode::Scalar(value.to_string())
    }

    fn to_value(tree: &YamlTree) -> serde_yaml::Value {
        let mut mapping = serde_yaml::Mapping::new();
        for (key, node) in tree {
            let value = match node {
                YamlNode::Scalar(s) => serde_yaml::Value::String(s.clone()),
                YamlNode::Mapping(children) => to_value(children),
            };
            mapping.insert(serde_yaml::Value::String(key.clone()), value);
        }
        serde_yaml::Value::Mapping(mapping)
    }

    fn assert_reparses(tree: &YamlTree) {
        let text = YamlWriter::default().serialize(tree);
        let parsed: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(parsed, to_value(tree), "output was:\n{text}");
    }

    #[test]
    fn test_expand_simple_pairs() {
        let tree = expand_to_tree(&messages(&[("a.b", "x"), ("a.c", "y")])).unwrap();
        let mut inner = YamlTree::new();
        inner.insert("b".to_string(), scalar("x"));
        inner.insert("c".to_string(), scalar("y"));
        let mut expected = YamlTree::new();
        expected.insert("a".to_string(), YamlNode::Mapping(inner));
        assert_eq!(tree, expected);
    }

    #[test]
    fn test_expand_deep_tree_keeps_first_seen_order() {
        let tree = expand_to_tree(&messages(&[
            ("one.one.one", "111"),
            ("one.one.two", "112"),
            ("one.two", "12"),
            ("two.one", "21"),
            ("two.three.one", "231"),
            ("three", "3"),
        ]))
        .unwrap();

        assert_eq!(tree.keys().collect::<Vec<_>>(), vec!["one", "two", "three"]);
        let YamlNode::Mapping(one) = &tree["one"] else {
            panic!("expected mapping");
        };
        assert_eq!(one.keys().collect::<Vec<_>>(), vec!["one", "two"]);
        assert_eq!(one["two"], scalar("12"));
        assert_eq!(tree["three"], scalar("3"));
    }

    #[test]
    fn test_expand_rejects_leaf_turned_branch() {
        let err = expand_to_tree(&messages(&[("a", "1"), ("a.b", "2")])).unwrap_err();
        assert!(matches!(err, Error::InvalidResource(_)));
        assert!(err.to_string().contains("a.b"));
    }

    #[test]
    fn test_expand_rejects_branch_turned_leaf() {
        let err = expand_to_tree(&messages(&[("a.b", "2"), ("a", "1")])).unwrap_err();
        assert!(matches!(err, Error::InvalidResource(_)));
        assert!(err.to_string().ends_with("resource a"));
    }

    #[test]
    fn test_expand_keeps_keys_with_spaces_flat() {
        let tree = expand_to_tree(&messages(&[("Hello world.", "Hola mundo."), ("a.b", "c")]))
            .unwrap();
        assert_eq!(tree["Hello world."], scalar("Hola mundo."));
        assert!(matches!(tree["a"], YamlNode::Mapping(_)));
    }

    #[test]
    fn test_serialize_block_layout() {
        let tree = expand_to_tree(&messages(&[
            ("app.name", "Demo"),
            ("app.menu.home", "Home"),
            ("footer", "Bye"),
        ]))
        .unwrap();
        let text = YamlWriter::default().serialize(&tree);
        assert_eq!(
            text,
            indoc! {"
                app:
                    name: Demo
                    menu:
                        home: Home
                footer: Bye
            "}
        );
    }

    #[test]
    fn test_serialize_quotes_ambiguous_scalars() {
        let tree = expand_to_tree(&messages(&[
            ("yes", "no"),
            ("count", "42"),
            ("empty", ""),
            ("colon", "Note: read"),
            ("hash", "#tag"),
            ("quote", "it's"),
            ("date", "2024-01-02"),
            ("lead", " padded"),
            ("multi", "line one\nline two"),
            ("plain", "Just text, really"),
            ("separator", "Line one\u{2028}line two"),
            ("paragraph", "One\u{2029}Two"),
            ("bom", "\u{FEFF}start"),
            ("key\u{2028}", "v"),
        ]))
        .unwrap();
        let text = YamlWriter::default().serialize(&tree);
        assert!(text.contains("'yes': 'no'\n"));
        assert!(text.contains("count: '42'\n"));
        assert!(text.contains("empty: ''\n"));
        assert!(text.contains("colon: 'Note: read'\n"));
        assert!(text.contains("hash: '#tag'\n"));
        assert!(text.contains("quote: it's\n"));
        assert!(text.contains("lead: ' padded'\n"));
        assert!(text.contains("multi: \"line one\\nline two\"\n"));
        assert!(text.contains("plain: Just text, really\n"));
        assert!(text.contains("separator: \"Line one\\Lline two\"\n"));
        assert!(text.contains("paragraph: \"One\\PTwo\"\n"));
        assert!(text.contains("bom: \"\\uFEFFstart\"\n"));
        assert!(text.contains("\"key\\L\": v\n"));
        assert_reparses(&tree);
    }

    #[test]
    fn test_serialize_wraps_long_values() {
        let long = "lorem ipsum dolor sit amet ".repeat(10).trim_end().to_string();
        let tree = expand_to_tree(&messages(&[("section.long", long.as_str())])).unwrap();
        let text = YamlWriter::default().serialize(&tree);

        assert!(text.lines().count() > 2);
        for line in text.lines() {
            assert!(line.chars().count() <= WRAP_WIDTH, "line too long: {line}");
        }
        assert_reparses(&tree);
    }

    #[test]
    fn test_long_value_without_spaces_is_not_folded() {
        let long = "x".repeat(150);
        let tree = expand_to_tree(&messages(&[("k", long.as_str())])).unwrap();
        let text = YamlWriter::default().serialize(&tree);
        assert_eq!(text.lines().count(), 1);
        assert_reparses(&tree);
    }

    #[test]
    fn test_long_value_with_double_spaces_round_trips() {
        let long = format!("{}  tail  end", "word ".repeat(30));
        let tree = expand_to_tree(&messages(&[("k", long.as_str())])).unwrap();
        assert_reparses(&tree);
    }

    #[test]
    fn test_render_block() {
        let text = render("App", "messages", "en", &messages(&[("app.name", "Hi")])).unwrap();
        assert_eq!(text, "# App/messages.en.yml\napp:\n    name: Hi\n\n");
    }

    #[test]
    fn test_render_empty_is_nothing() {
        assert_eq!(render("App", "messages", "en", &Messages::new()).unwrap(), "");
    }

    #[test]
    fn test_export_substitutes_error_text() {
        let mut t = Translations::new();
        t.add_translation("App", "messages", "en", "one", "1").unwrap();
        t.add_translation("App", "messages", "en", "one.two", "2").unwrap();
        t.add_translation("App", "messages", "es", "uno", "1").unwrap();

        let text = YamlExporter::default().export(&t, &Selection::all()).unwrap();
        assert!(text.contains("# App/messages.en.yml\ninvalid resource: Invalid Yaml resource one.two\n"));
        assert!(text.contains("# App/messages.es.yml\nuno: '1'\n"));
        assert_eq!(text.matches(&"-".repeat(80)).count(), 2);
    }

    #[test]
    fn test_export_respects_selection() {
        let mut t = Translations::new();
        t.add_translation("App", "messages", "en", "a", "A").unwrap();
        t.add_translation("Blog", "messages", "en", "b", "B").unwrap();

        let text = YamlExporter::default()
            .export(&t, &Selection::all().with_bundles(["Blog"]))
            .unwrap();
        assert!(!text.contains("App/"));
        assert!(text.contains("# Blog/messages.en.yml\nb: B\n"));
    }

    #[test]
    fn test_file_creator_writes_and_skips() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut t = Translations::new();
        t.add_translation("App", "messages", "en", "app.name", "Hi").unwrap();

        let path = dir.path().join("nested/messages.en.yml");
        let creator = YamlFileCreator;
        assert!(creator.create_file(&t, "App", "messages", "en", &path).unwrap());
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "# App/messages.en.yml\napp:\n    name: Hi\n\n"
        );

        let missing = dir.path().join("messages.fr.yml");
        assert!(!creator.create_file(&t, "App", "messages", "fr", &missing).unwrap());
        assert!(!missing.exists());
    }
}
