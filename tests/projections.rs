use lingdb::construct::Dataset;
use lingdb::datatype::Value;
use lingdb::load;
use lingdb::query::Evaluation;

fn setup() -> Dataset {
    load::from_str(
        r#"{
        "semester": "S23",
        "schema": {
            "name": "string",
            "consonants": "set-of-string",
            "tone": "bool",
            "morphological_type": "categorical"
        },
        "languages": [
            {"name": "Mandarin", "consonants": ["p", "t", "k", "m", "n"], "tone": true, "morphological_type": "isolating"},
            {"name": "Turkish", "consonants": ["p", "t", "k", "b", "d", "g", "s"], "tone": false, "morphological_type": "agglutinative"}
        ]
    }"#,
    )
    .expect("dataset parses")
}

fn projections(evaluation: Evaluation) -> Vec<(String, Value)> {
    match evaluation {
        Evaluation::Projections(projections) => projections
            .into_iter()
            .map(|p| (p.language.name().to_owned(), p.value))
            .collect(),
        Evaluation::Languages(_) => panic!("expected projections"),
    }
}

#[test]
fn unfocused_evaluation_is_the_whole_collection() {
    let dataset = setup();
    let evaluation = dataset.query().evaluate().expect("evaluation ok");
    match evaluation {
        Evaluation::Languages(languages) => assert_eq!(languages.len(), 2),
        Evaluation::Projections(_) => panic!("expected languages"),
    }
}

#[test]
fn projection_pairs_carry_language_identity() {
    let dataset = setup();
    let rows = projections(
        dataset
            .query()
            .property("name")
            .expect("known property")
            .evaluate()
            .expect("evaluation ok"),
    );
    // Every value can be mapped back to the language it came from.
    for (language, value) in &rows {
        assert_eq!(value, &Value::Str(language.clone()));
    }
    assert_eq!(rows.len(), 2);
}

#[test]
fn length_projects_the_set_size() {
    let dataset = setup();
    let rows = projections(
        dataset
            .query()
            .property("consonants")
            .expect("known property")
            .length()
            .expect("set property")
            .evaluate()
            .expect("evaluation ok"),
    );
    assert_eq!(
        rows,
        vec![
            ("Mandarin".to_owned(), Value::Number(5)),
            ("Turkish".to_owned(), Value::Number(7)),
        ]
    );
}

#[test]
fn is_true_keeps_the_tonal_languages() {
    let dataset = setup();
    let evaluation = dataset
        .query()
        .property("tone")
        .expect("known property")
        .is_true()
        .expect("bool property")
        .evaluate()
        .expect("evaluation ok");
    match evaluation {
        Evaluation::Languages(languages) => {
            assert_eq!(languages.len(), 1);
            assert_eq!(languages[0].name(), "Mandarin");
        }
        Evaluation::Projections(_) => panic!("expected languages"),
    }
}

#[test]
fn eq_on_a_categorical_property() {
    let dataset = setup();
    let evaluation = dataset
        .query()
        .property("morphological_type")
        .expect("known property")
        .eq(Value::Categorical("agglutinative".to_owned()))
        .expect("matching kinds")
        .evaluate()
        .expect("evaluation ok");
    match evaluation {
        Evaluation::Languages(languages) => {
            assert_eq!(languages.len(), 1);
            assert_eq!(languages[0].name(), "Turkish");
        }
        Evaluation::Projections(_) => panic!("expected languages"),
    }
}

#[test]
fn neq_on_a_string_property() {
    let dataset = setup();
    let evaluation = dataset
        .query()
        .property("name")
        .expect("known property")
        .neq(Value::Str("Mandarin".to_owned()))
        .expect("matching kinds")
        .evaluate()
        .expect("evaluation ok");
    match evaluation {
        Evaluation::Languages(languages) => {
            assert_eq!(languages.len(), 1);
            assert_eq!(languages[0].name(), "Turkish");
        }
        Evaluation::Projections(_) => panic!("expected languages"),
    }
}
