use lingdb::construct::Dataset;
use lingdb::datatype::Mode;
use lingdb::error::LingdbError;
use lingdb::load;
use lingdb::query::Evaluation;

fn setup() -> Dataset {
    load::from_str(
        r#"{
        "semester": "S21",
        "schema": {
            "name": "string",
            "num_consonants": "number",
            "consonants": "set-of-string",
            "word_order": "set-of-string"
        },
        "languages": [
            {"name": "Hawaiian", "num_consonants": 8, "consonants": ["p", "k", "m", "n"], "word_order": ["VSO"]},
            {"name": "Quechua", "num_consonants": 25, "consonants": ["p", "t", "k", "q"], "word_order": ["SOV"]},
            {"name": "Swahili", "num_consonants": 33, "consonants": ["b", "d", "g"], "word_order": ["SVO"]}
        ]
    }"#,
    )
    .expect("dataset parses")
}

fn selection(glyphs: &[&str]) -> Vec<String> {
    glyphs.iter().map(|g| (*g).to_owned()).collect()
}

fn names(evaluation: &Evaluation) -> Vec<String> {
    match evaluation {
        Evaluation::Languages(languages) => {
            languages.iter().map(|l| l.name().to_owned()).collect()
        }
        Evaluation::Projections(_) => panic!("expected a narrowed language collection"),
    }
}

#[test]
fn at_least_counts_the_intersection() {
    let dataset = setup();
    // Hawaiian and Quechua both carry {p, k}; Swahili shares nothing.
    let evaluation = dataset
        .query()
        .property("consonants")
        .expect("known property")
        .contains(Mode::AtLeast, 2, selection(&["p", "t", "k"]))
        .expect("set property")
        .evaluate()
        .expect("evaluation ok");
    assert_eq!(names(&evaluation), vec!["Hawaiian", "Quechua"]);
}

#[test]
fn exactly_is_strict_on_the_count() {
    let dataset = setup();
    // Quechua shares {p, t, k}, a count of 3, so exactly 1 drops it.
    let evaluation = dataset
        .query()
        .property("consonants")
        .expect("known property")
        .contains(Mode::Exactly, 1, selection(&["p", "t"]))
        .expect("set property")
        .evaluate()
        .expect("evaluation ok");
    assert_eq!(names(&evaluation), vec!["Hawaiian"]);
}

#[test]
fn more_than_zero_means_any_overlap() {
    let dataset = setup();
    let evaluation = dataset
        .query()
        .property("consonants")
        .expect("known property")
        .contains(Mode::MoreThan, 0, selection(&["p"]))
        .expect("set property")
        .evaluate()
        .expect("evaluation ok");
    assert_eq!(names(&evaluation), vec!["Hawaiian", "Quechua"]);
}

#[test]
fn exactly_one_word_order() {
    let dataset = setup();
    let evaluation = dataset
        .query()
        .property("word_order")
        .expect("known property")
        .contains(Mode::Exactly, 1, selection(&["SOV"]))
        .expect("set property")
        .evaluate()
        .expect("evaluation ok");
    assert_eq!(names(&evaluation), vec!["Quechua"]);
}

#[test]
fn all_six_modes() {
    let dataset = setup();
    let focused = dataset.query().property("consonants").expect("known property");
    // Intersection counts with {p, t, k}: Hawaiian 2, Quechua 3, Swahili 0.
    let expectations = [
        (Mode::AtLeast, 2, vec!["Hawaiian", "Quechua"]),
        (Mode::AtMost, 2, vec!["Hawaiian", "Swahili"]),
        (Mode::Exactly, 3, vec!["Quechua"]),
        (Mode::NotEqual, 0, vec!["Hawaiian", "Quechua"]),
        (Mode::LessThan, 3, vec!["Hawaiian", "Swahili"]),
        (Mode::MoreThan, 2, vec!["Quechua"]),
    ];
    for (mode, k, expected) in expectations {
        let evaluation = focused
            .contains(mode, k, selection(&["p", "t", "k"]))
            .expect("set property")
            .evaluate()
            .expect("evaluation ok");
        assert_eq!(names(&evaluation), expected, "mode {mode} with k {k}");
    }
}

#[test]
fn contains_on_a_number_property_is_type_mismatch() {
    let dataset = setup();
    let err = dataset
        .query()
        .property("num_consonants")
        .expect("known property")
        .contains(Mode::AtLeast, 1, selection(&["p"]))
        .unwrap_err();
    assert!(matches!(err, LingdbError::TypeMismatch { .. }), "unexpected: {err}");
}

#[test]
fn contains_without_a_focused_property_fails() {
    let dataset = setup();
    let err = dataset
        .query()
        .contains(Mode::AtLeast, 1, selection(&["p"]))
        .unwrap_err();
    assert!(matches!(err, LingdbError::NoProperty { .. }), "unexpected: {err}");
}
