//! End-to-end segmentation tests over small synthetic book extractions.

use poemforge_parsing::{
    ParsingConfigBuilder, Poem, Segmenter, parse_file, parse_text, poems_to_json, write_json,
};

fn titles(poems: &[Poem]) -> Vec<&str> {
    poems.iter().map(|p| p.title.as_str()).collect()
}

#[test]
fn fog_end_to_end() {
    let input = "Poem\nFog\nThe fog comes\non little cat feet.\n1920\u{000C}3";
    let outcome = parse_text(input);
    let json = poems_to_json(&outcome.poems, false).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        value,
        serde_json::json!([
            {"title": "Poem", "content": "Fog\nThe fog comes\non little cat feet."}
        ])
    );
    assert_eq!(outcome.pages, 2);
    assert!(outcome.dropped.is_empty());
}

#[test]
fn consecutive_poem_markers_give_separate_records() {
    let input = "Poem\nfirst line\nsecond line\n\u{000C}POEM\nthird line\nfourth line\n";
    let outcome = parse_text(input);
    assert_eq!(outcome.poems.len(), 2);
    assert_eq!(outcome.poems[0].content, "first line\nsecond line");
    assert_eq!(outcome.poems[1].title, "Poem");
    assert_eq!(outcome.poems[1].content, "third line\nfourth line");
}

#[test]
fn trailing_page_numbers_never_reach_content() {
    let input = "Fog\nThe fog comes\n12\n13\u{000C}Fog\non little cat feet.\n14\n15\n";
    let outcome = parse_text(input);
    assert_eq!(outcome.poems.len(), 1);
    assert_eq!(outcome.poems[0].content, "The fog comes\non little cat feet.");
}

#[test]
fn running_header_continues_open_poem() {
    let input = "Fog\nThe fog comes\non little cat feet.\n\u{000C}  FOG \nIt sits looking\nover harbor and city\n";
    let outcome = parse_text(input);
    assert_eq!(titles(&outcome.poems), vec!["Fog"]);
    assert_eq!(
        outcome.poems[0].content,
        "The fog comes\non little cat feet.\nIt sits looking\nover harbor and city"
    );
}

#[test]
fn long_header_is_treated_as_verse() {
    let input = "Fog\nThe fog comes\n\u{000C}on little cat feet and then some\nit sits looking\n";
    let outcome = parse_text(input);
    assert_eq!(outcome.poems.len(), 1);
    assert_eq!(outcome.poems[0].title, "Fog");
    assert_eq!(
        outcome.poems[0].content,
        "The fog comes\non little cat feet and then some\nit sits looking"
    );
}

#[test]
fn new_short_header_starts_new_poem() {
    let input = "Fog\nThe fog comes\n\u{000C}Chicago\nHog Butcher for the World\n";
    let outcome = parse_text(input);
    assert_eq!(titles(&outcome.poems), vec!["Fog", "Chicago"]);
}

#[test]
fn date_range_closes_poem_mid_page() {
    let input = "Song\nI am stuck in traffic\n1959 or 1960\n\u{000C}\nwhich arrives with no poem open\n";
    let outcome = parse_text(input);
    assert_eq!(outcome.poems.len(), 2);
    assert_eq!(outcome.poems[0].title, "Song");
    assert_eq!(outcome.poems[0].content, "I am stuck in traffic");
    assert_eq!(outcome.poems[0].date.as_deref(), Some("1959, 1960"));
    // The next page opens a fresh poem because nothing is open any more.
    assert_eq!(outcome.poems[1].title, "Which Arrives With No Poem Open");
    assert_eq!(outcome.poems[1].content, "");
}

#[test]
fn date_closes_poem_even_when_header_repeats() {
    let input = "Song\nfirst\n\u{000C}Song\nsecond\n1961-1962\n\u{000C}Song\nthird\n";
    let outcome = parse_text(input);
    assert_eq!(outcome.poems.len(), 2);
    assert_eq!(outcome.poems[0].content, "first\nsecond");
    assert_eq!(outcome.poems[0].date.as_deref(), Some("1961, 1962"));
    assert_eq!(outcome.poems[1].content, "third");
}

#[test]
fn leading_blank_pages_are_reported_as_dropped() {
    let input = "\n\n7\u{000C}Fog\nThe fog comes\n";
    let outcome = parse_text(input);
    assert_eq!(outcome.poems.len(), 1);
    assert_eq!(outcome.dropped.len(), 1);
    assert_eq!(outcome.dropped[0].page, 1);
    assert_eq!(outcome.dropped[0].lines, vec!["", ""]);
}

#[test]
fn empty_input_gives_nothing() {
    let outcome = parse_text("");
    assert!(outcome.poems.is_empty());
    assert!(outcome.dropped.is_empty());
    assert_eq!(poems_to_json(&outcome.poems, false).unwrap(), "[]");
}

#[test]
fn parsing_is_deterministic() {
    let input = "Poem\na\nb\n\u{000C}Fog\nc\n1959-1960\n\u{000C}Chicago\nd\n12";
    let first = poems_to_json(&parse_text(input).poems, true).unwrap();
    let second = poems_to_json(&parse_text(input).poems, true).unwrap();
    assert_eq!(first, second);
}

#[test]
fn custom_threshold_changes_classification() {
    let config = ParsingConfigBuilder::new()
        .header_word_threshold(2)
        .build()
        .unwrap();
    let input = "Fog\nThe fog comes\n\u{000C}Little Cat Feet\nit sits\n";
    let outcome = Segmenter::with_config(config).parse(input);
    assert_eq!(outcome.poems.len(), 1);
    assert_eq!(
        outcome.poems[0].content,
        "The fog comes\nLittle Cat Feet\nit sits"
    );
}

#[test]
fn custom_section_marker_splits_repeated_header() {
    let input = "Untitled\nfirst\n\u{000C}UNTITLED\nsecond\n";

    // By default a repeated header is a running header.
    assert_eq!(parse_text(input).poems.len(), 1);

    let config = ParsingConfigBuilder::new()
        .add_section_marker("Untitled".to_string())
        .build()
        .unwrap();
    let outcome = Segmenter::with_config(config).parse(input);
    assert_eq!(titles(&outcome.poems), vec!["Untitled", "Untitled"]);
    assert_eq!(outcome.poems[0].content, "first");
    assert_eq!(outcome.poems[1].content, "second");
}

#[test]
fn custom_date_regex_closes_poem() {
    let config = ParsingConfigBuilder::new()
        .date_regex(r"^\((19|20)[0-9]{2}\)$")
        .build()
        .unwrap();
    let input = "Song\nfirst\n(1959)\n\u{000C}\nnext line\n";
    let outcome = Segmenter::with_config(config).parse(input);
    assert_eq!(titles(&outcome.poems), vec!["Song", "Next Line"]);
    assert_eq!(outcome.poems[0].content, "first");
    assert_eq!(outcome.poems[0].date.as_deref(), Some("(1959)"));
}

#[test]
fn non_ascii_digit_lines_stay_in_the_poem() {
    let input = "Fog\nThe fog comes\n\u{FF11}\u{FF12}\non little cat feet.\n12";
    let outcome = parse_text(input);
    assert_eq!(
        outcome.poems[0].content,
        "The fog comes\n\u{FF11}\u{FF12}\non little cat feet."
    );
}

#[test]
fn file_round_trip() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("extracted.txt");
    let output = dir.path().join("parsed_poems.json");
    std::fs::write(&input, "Ave Maria\nMothers of America\n\u{000C}Ave Maria\nlet your kids go to the movies!\n9")?;

    let outcome = parse_file(&input, Default::default())?;
    write_json(&output, &outcome.poems, false)?;

    let written: Vec<Poem> = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
    assert_eq!(
        written,
        vec![Poem::new(
            "Ave Maria",
            "Mothers of America\nlet your kids go to the movies!"
        )]
    );
    Ok(())
}

#[test]
fn missing_file_is_io_error() {
    let err = parse_file(
        std::path::Path::new("/definitely/not/here.txt"),
        Default::default(),
    )
    .unwrap_err();
    assert!(matches!(err, poemforge_parsing::ParsingError::Io(_)));
}
