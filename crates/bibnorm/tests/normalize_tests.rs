//! End-to-end normalization tests

mod common;

use bibnorm::{
    builtin_rules, capitalize_title, load_bibliography, parse, MatchMode, Normalizer, VenueMapper,
};
use common::fixtures::load_bibtex_fixture;
use rstest::rstest;

const ICRA: &str = "In the Proceedings of IEEE International Conference on Robotics and Automation";

fn normalize(input: &str) -> String {
    Normalizer::default().normalize_str(input).unwrap().0
}

// === Title Capitalization ===

#[rstest]
#[case("3d Printing", "{3D Printing}")]
#[case("a study of the {GPU}", "{A Study of the Gpu}")]
#[case("on the difficulty OF training", "{On the Difficulty of Training}")]
#[case("self-supervised depth from monocular video", "{Self-supervised Depth from Monocular Video}")]
#[case("{2d} keypoints to {3d} poses", "{2D Keypoints to 3D Poses}")]
fn test_capitalize_title_cases(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(capitalize_title(input), expected);
}

// === Venue Mapping ===

#[rstest]
#[case("Proc. ICRA 2020", ICRA.to_string())]
#[case("ICRA 2020 Workshop on X", format!("{} Workshops", ICRA))]
#[case("arXiv preprint arXiv:2101.00001 (CVPR)", "In the Proceedings of IEEE/CVF Conference on Computer Vision and Pattern Recognition".to_string())]
#[case("Advances in Neural Information Processing Systems 33", "In the Proceedings of Advances in Neural Information Processing Systems".to_string())]
#[case("{IEEE} Transactions on Robotics", "IEEE Transactions on Robotics".to_string())]
fn test_venue_cases(#[case] input: &str, #[case] expected: String) {
    let mapper = VenueMapper::new();
    assert_eq!(mapper.map_value(input), Some(format!("{{{}}}", expected)));
}

#[test]
fn test_first_matching_rule_wins() {
    // Both the ICRA and the NeurIPS rule match; ICRA is first in the table.
    let mapper = VenueMapper::new();
    assert_eq!(
        mapper.map_value("NeurIPS / ICRA joint session"),
        Some(format!("{{{}}}", ICRA))
    );

    // The SIGGRAPH rule precedes (and shadows) the SIGGRAPH Asia rule.
    assert_eq!(
        mapper.map_value("SIGGRAPH Asia 2021").as_deref(),
        Some("{In the Proceedings of ACM SIGGRAPH Conference on Computer Graphics and Interactive Techniques}")
    );
}

#[test]
fn test_rule_table_order_is_pinned() {
    let order: Vec<&str> = builtin_rules()
        .iter()
        .map(|rule| rule.keywords[0].as_str())
        .collect();
    assert_eq!(
        order,
        vec![
            "icra", "iros", "iccv", "cvpr", "eccv", "icml", "nips", "aaai", "ijcai", "iclr",
            "rss", "pami", "ijcv", "mm", "ral", "corl", "siggraph", "siggraph asia", "tog",
            "tvcg", "tip", "miccai", "ismar", "vr", "3dv", "wacv", "accv", "tro",
        ]
    );
}

#[test]
fn test_every_keyword_maps_idempotently() {
    let mapper = VenueMapper::new();
    for rule in builtin_rules() {
        for keyword in &rule.keywords {
            for value in [keyword.clone(), format!("{} workshop", keyword)] {
                let once = mapper.map_value(&value).expect("keyword must match");
                let twice = mapper.map_value(&once).unwrap_or_else(|| once.clone());
                assert_eq!(once, twice, "mapping {:?} is not idempotent", value);
            }
        }
    }
}

// === Full Pipeline ===

#[test]
fn test_fixture_normalization() {
    let output = normalize(&load_bibtex_fixture("venues.bib"));

    assert!(output.contains("title = {{Learning Robust Grasps from 3D Point Clouds}},"));
    assert!(output.contains(&format!("booktitle = {{{{{}}}}},", ICRA)));
    assert!(output.contains("month = {May},"));

    assert!(output.contains("Title = {{Tactile Sensing for In-hand Manipulation}},"));
    assert!(output.contains(&format!("BookTitle = {{{{{} Workshops}}}},", ICRA)));
    assert!(output.contains("year = 2021,"));

    assert!(output.contains("title = {{A Survey of 2D and 3D Mapping}},"));
    assert!(output.contains("journal = {{IEEE Robotics and Automation Letters}},"));

    assert!(output.contains("howpublished = {\\url{https://example.org}},"));
    assert!(output.contains("@conference{wu2019siggraph,"));
    assert!(output.contains("@string{ral = {IEEE Robotics and Automation Letters}}"));
}

#[test]
fn test_entry_order_and_fields_preserved() {
    let input = load_bibtex_fixture("venues.bib");
    let before = load_bibliography(&input).unwrap();
    let after = parse(&normalize(&input)).unwrap();

    assert!(after.errors.is_empty());
    let keys = |entries: &[bibnorm::BibTeXEntry]| {
        entries
            .iter()
            .map(|e| e.cite_key.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(keys(&before.entries), keys(&after.entries));
    assert_eq!(
        keys(&after.entries),
        vec![
            "zhang2020grasp",
            "lee2021tactile",
            "chen2022mapping",
            "notes2023",
            "wu2019siggraph"
        ]
    );

    for (old, new) in before.entries.iter().zip(&after.entries) {
        let old_keys: Vec<_> = old.fields.iter().map(|f| &f.key).collect();
        let new_keys: Vec<_> = new.fields.iter().map(|f| &f.key).collect();
        assert_eq!(old_keys, new_keys);
        assert_eq!(old.entry_type, new.entry_type);
    }
}

#[test]
fn test_untouched_fields_survive() {
    let input = load_bibtex_fixture("venues.bib");
    let before = load_bibliography(&input).unwrap();
    let after = parse(&normalize(&input)).unwrap();

    for (old, new) in before.entries.iter().zip(&after.entries) {
        for field in &old.fields {
            let key = field.key.to_lowercase();
            if ["title", "booktitle", "journal"].contains(&key.as_str()) {
                continue;
            }
            assert_eq!(new.get_field(&field.key), Some(field.value.as_str()));
        }
    }
}

#[test]
fn test_normalizing_output_again_is_stable() {
    let once = normalize(&load_bibtex_fixture("venues.bib"));
    let bibliography = parse(&once).unwrap();
    let mapper = VenueMapper::new();

    for entry in &bibliography.entries {
        for field in ["booktitle", "journal"] {
            if let Some(value) = entry.get_field(field) {
                assert_eq!(
                    mapper.map_value(value).unwrap_or_else(|| value.to_string()),
                    value
                );
            }
        }
    }
}

#[test]
fn test_malformed_fixture_is_rejected() {
    let result = Normalizer::default().normalize_str(&load_bibtex_fixture("malformed.bib"));
    match result {
        Err(bibnorm::Error::Parse { line, .. }) => assert_eq!(line, 6),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_comment_blocks_round_trip() {
    let output = normalize(&load_bibtex_fixture("comments.bib"));

    assert!(output.starts_with("@comment{jabref-meta: databaseType:bibtex;}\n\n"));
    assert!(output.contains("@comment{jabref-meta: grouping:\n0 AllEntriesGroup:;\n}"));
    assert!(!output.contains("Maintainer"));

    let first_entry = output.find("@inproceedings{Lee2021,").unwrap();
    assert!(output.rfind("@comment").unwrap() < first_entry);
    assert!(output.contains("title = {{Tactile Sensing for In-hand Manipulation}},"));

    let reparsed = parse(&output).unwrap();
    assert_eq!(reparsed.comments.len(), 2);
    assert_eq!(reparsed.entries.len(), 2);
    assert_eq!(normalize(&output), output);
}

#[test]
fn test_stray_at_sign_in_free_text() {
    let (output, stats) = Normalizer::default()
        .normalize_str("Maintainer: someone@example.org\n\n@article{a, title = {x}}\n")
        .unwrap();
    assert_eq!(stats.entries, 1);
    assert!(output.contains("@article{a,"));
}

#[test]
fn test_whole_word_normalizer() {
    let normalizer = Normalizer::new(
        VenueMapper::with_rules(Vec::new(), MatchMode::WholeWord).unwrap(),
        vec!["journal".to_string()],
    );
    let (output, stats) = normalizer
        .normalize_str("@article{a, journal = {Neural Computation}}")
        .unwrap();
    assert_eq!(stats.venues, 0);
    assert!(output.contains("journal = {Neural Computation},"));
}
