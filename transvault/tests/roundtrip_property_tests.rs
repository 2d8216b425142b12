use proptest::prelude::*;
use std::collections::BTreeMap;
use transvault::formats::YamlFormat;
use transvault::traits::Parser;
use transvault::types::caseless_cmp;
use transvault::{
    DelimitedEngine, GridEngine, GridExporter, ImportPolicy, Messages, Selection, Translations,
    YamlWriter, expand_to_tree, reconcile,
};

type Tuple = (String, String, String, String, String);
type TupleMap = BTreeMap<(String, String, String, String), String>;

fn name_strategy(names: &'static [&'static str]) -> impl Strategy<Value = String> {
    prop::sample::select(names).prop_map(str::to_string)
}

fn resource_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z][a-z0-9_]{0,7}(\\.[a-z][a-z0-9_]{0,7}){0,2}")
        .expect("valid resource regex")
}

fn text_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 _\\-\\.,!\\?:#'\"]{1,40}").expect("valid text regex")
}

fn tuple_strategy() -> impl Strategy<Value = Tuple> {
    (
        name_strategy(&["App", "BlogBundle", "adminBundle"]),
        name_strategy(&["messages", "validators", "Forms"]),
        name_strategy(&["en", "es", "fr", "DE"]),
        resource_strategy(),
        text_strategy(),
    )
}

fn tuples_strategy() -> impl Strategy<Value = Vec<Tuple>> {
    prop::collection::vec(tuple_strategy(), 1..24)
}

fn build_index(tuples: &[Tuple]) -> Translations {
    let mut translations = Translations::new();
    for (bundle, domain, locale, resource, text) in tuples {
        translations
            .add_translation(bundle, domain, locale, resource, text.as_str())
            .expect("valid tuple");
    }
    translations
}

fn expected_map(tuples: &[Tuple]) -> TupleMap {
    tuples
        .iter()
        .map(|(b, d, l, r, t)| ((b.clone(), d.clone(), l.clone(), r.clone()), t.clone()))
        .collect()
}

fn canonical_map(translations: &Translations) -> TupleMap {
    translations
        .iter()
        .map(|(key, text)| {
            (
                (
                    key.bundle.clone(),
                    key.domain.clone(),
                    key.locale.clone(),
                    key.resource.clone(),
                ),
                text.to_string(),
            )
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn grid_file_roundtrip_preserves_tuples(tuples in tuples_strategy()) {
        let source = build_index(&tuples);
        let tmp = tempfile::tempdir().map_err(|e| TestCaseError::fail(e.to_string()))?;

        for engine in [DelimitedEngine::csv(), DelimitedEngine::tsv()] {
            let path = tmp.path().join(format!("export.{}", engine.extension()));
            let grid = GridExporter
                .export(&source, &Selection::all())
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            engine
                .save(&grid, &path)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;

            let mut imported = Translations::new();
            let report = reconcile(
                &engine,
                &[&path],
                &mut imported,
                &Selection::all(),
                ImportPolicy::Abort,
            )
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

            prop_assert_eq!(report.new_translations, source.len());
            prop_assert_eq!(canonical_map(&imported), expected_map(&tuples));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn reimporting_an_export_changes_nothing(tuples in tuples_strategy()) {
        let mut translations = build_index(&tuples);
        let grid = GridExporter
            .export(&translations, &Selection::all())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let mut importer = transvault::GridImporter::new();
        importer
            .import(&grid, &mut translations, &Selection::all())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        prop_assert_eq!(importer.new_translations(), 0);
        prop_assert_eq!(importer.read_resources(), grid.row_count() - 1);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn sort_is_idempotent_and_ascending(tuples in tuples_strategy()) {
        let mut translations = build_index(&tuples);
        translations.sort();
        let once = translations.clone();
        translations.sort();
        prop_assert_eq!(&translations, &once);

        let bundles: Vec<&String> = translations.get_bundles().iter().collect();
        prop_assert!(bundles.windows(2).all(|w| caseless_cmp(w[0], w[1]).is_lt()));
        let locales = translations.get_locales(None, None);
        prop_assert!(locales.windows(2).all(|w| caseless_cmp(&w[0], &w[1]).is_lt()));
        prop_assert_eq!(canonical_map(&translations), expected_map(&tuples));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn merge_keeps_both_sides_and_later_wins(left in tuples_strategy(), right in tuples_strategy()) {
        let mut merged = build_index(&left);
        merged
            .merge(&build_index(&right))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;

        let mut expected = expected_map(&left);
        expected.extend(expected_map(&right));
        prop_assert_eq!(canonical_map(&merged), expected);
    }
}

fn two_level_key_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z]{1,6}\\.[a-z]{1,6}").expect("valid key regex")
}

fn long_text_strategy() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 _\\-\\.,!\\?:#'\"\\\\\u{2028}]{1,160}")
        .expect("valid text regex")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn yaml_output_parses_back_to_the_same_messages(
        values in prop::collection::btree_map(two_level_key_strategy(), long_text_strategy(), 1..12)
    ) {
        let messages: Messages = values.clone().into_iter().collect();
        let tree = expand_to_tree(&messages).map_err(|e| TestCaseError::fail(e.to_string()))?;
        let text = YamlWriter::default().serialize(&tree);

        let parsed = YamlFormat::from_str(&text)
            .map_err(|e| TestCaseError::fail(format!("{e}\n{text}")))?;
        let parsed: BTreeMap<String, String> = parsed.messages.into_iter().collect();
        prop_assert_eq!(parsed, values);
    }
}
