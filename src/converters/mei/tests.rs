//! Unit tests for the MEI → graph builder and the conversion pipeline

use std::collections::HashSet;

use num_rational::Rational64;

use super::*;
use crate::models::{Kind, Numbering};
use crate::renderers::cypher::{serialize_score, Relationship, Statement};

fn mei(header: &str, staff_defs: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<mei xmlns="http://www.music-encoding.org/ns/mei" meiversion="4.0.1">
  <meiHead><fileDesc><titleStmt><title>Test</title>
    <respStmt>{}</respStmt>
  </titleStmt></fileDesc></meiHead>
  <music><body><mdiv><score>
    <scoreDef><staffGrp xml:id="sg1">{}</staffGrp></scoreDef>
    <section>{}</section>
  </score></mdiv></body></music>
</mei>"#,
        header, staff_defs, body
    )
}

const BACH: &str = r#"<persName role="composer">Bach</persName><persName role="collection">Chorales</persName>"#;

fn one_voice(body: &str) -> String {
    mei(BACH, r#"<staffDef xml:id="S1" n="1"/>"#, body)
}

fn build(xml: &str) -> BuiltGraph {
    build_graph("t.mei", xml, &mut Numbering::new(), false).unwrap()
}

fn build_err(xml: &str) -> ConversionError {
    build_graph("t.mei", xml, &mut Numbering::new(), false).unwrap_err()
}

fn statements(xml: &str) -> Vec<Statement> {
    let BuiltGraph { score, mut warnings } = build(xml);
    serialize_score(&score, &mut warnings).unwrap()
}

fn links(statements: &[Statement], relationship: Relationship) -> Vec<(String, String)> {
    statements
        .iter()
        .filter(|s| s.relationship() == Some(relationship))
        .filter_map(|s| s.referenced_ids())
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
}

fn labels(statements: &[Statement], wanted: &str) -> usize {
    statements
        .iter()
        .filter(|s| matches!(s, Statement::Node { label, .. } if *label == wanted))
        .count()
}

fn pair(a: &str, b: &str) -> (String, String) {
    (a.to_string(), b.to_string())
}

const TWO_NOTES: &str = r#"<measure xml:id="m1" n="1"><staff n="1"><layer n="1">
    <note xml:id="n1" pname="c" oct="4" dur="4"/>
    <note xml:id="n2" pname="e" oct="4" dur="4"/>
  </layer></staff></measure>"#;

#[test]
fn test_one_measure_round_trip() {
    let statements = statements(&one_voice(TWO_NOTES));

    assert_eq!(labels(&statements, "Score"), 1);
    assert_eq!(labels(&statements, "TopRhythmic"), 1);
    assert_eq!(labels(&statements, "Measure"), 1);
    assert_eq!(labels(&statements, "Voice"), 1);
    assert_eq!(labels(&statements, "Event"), 3);
    assert_eq!(labels(&statements, "Fact"), 2);

    assert_eq!(
        links(&statements, Relationship::Next),
        vec![
            pair("n1_event_t_mei", "n2_event_t_mei"),
            pair("n2_event_t_mei", "S1_END_t_mei"),
        ]
    );

    // Every node but the score has exactly one link from its logical parent
    let voices: HashSet<&str> = ["S1_t_mei"].into_iter().collect();
    let parent_links: Vec<(&str, &str)> = statements
        .iter()
        .filter(|s| {
            matches!(
                s.relationship(),
                Some(Relationship::Has | Relationship::Is | Relationship::Voice | Relationship::Rhythmic)
            )
        })
        .filter_map(|s| s.referenced_ids())
        .filter(|(from, _)| !voices.contains(from))
        .collect();
    for created in statements.iter().filter_map(|s| s.created_id()) {
        let inbound = parent_links.iter().filter(|(_, to)| *to == created).count();
        let expected = if created == "sg1_t_mei" { 0 } else { 1 };
        assert_eq!(inbound, expected, "parent links into {}", created);
    }
}

#[test]
fn test_nodes_are_created_before_use() {
    let xml = mei(
        BACH,
        r#"<staffDef xml:id="S1" n="1"/><staffDef xml:id="S2" n="2"/>"#,
        r#"<measure xml:id="m1"><staff n="1"><note xml:id="a" pname="c" oct="4" dur="2"/></staff>
             <staff n="2"><rest xml:id="r" dur="2"/></staff></measure>
           <measure xml:id="m2"><staff n="1"><note xml:id="b" pname="d" oct="4" dur="2"/></staff>
             <staff n="2"><note xml:id="c" pname="f" oct="3" dur="2"/></staff></measure>"#,
    );

    let mut created = HashSet::new();
    for statement in statements(&xml) {
        if let Some(id) = statement.created_id() {
            assert!(created.insert(id.to_string()), "{} created twice", id);
        }
        if let Some((from, to)) = statement.referenced_ids() {
            assert!(created.contains(from), "{} used before creation", from);
            assert!(created.contains(to), "{} used before creation", to);
        }
    }
}

#[test]
fn test_conversion_is_idempotent() {
    let xml = one_voice(TWO_NOTES);
    let first = convert_mei_to_cypher("t.mei", &xml, None).unwrap();
    let second = convert_mei_to_cypher("t.mei", &xml, None).unwrap();
    assert_eq!(first.cypher, second.cypher);
    assert_eq!(first.statement_count, first.cypher.lines().count());
    assert_eq!(first.dump_id, "t_mei");
}

#[test]
fn test_next_link_searches_back_past_empty_measures() {
    let xml = mei(
        BACH,
        r#"<staffDef xml:id="Up" n="1"/><staffDef xml:id="Down" n="2"/>"#,
        r#"<measure xml:id="m1">
             <staff n="1"><note xml:id="u1" pname="c" oct="5" dur="1"/></staff>
             <staff n="2"><note xml:id="d1" pname="c" oct="3" dur="1"/></staff>
           </measure>
           <measure xml:id="m2">
             <staff n="1"><note xml:id="u2" pname="d" oct="5" dur="1"/></staff>
           </measure>
           <measure xml:id="m3">
             <staff n="1"><note xml:id="u3" pname="e" oct="5" dur="1"/></staff>
             <staff n="2"><note xml:id="d3" pname="g" oct="3" dur="1"/></staff>
           </measure>"#,
    );
    let statements = statements(&xml);
    let next = links(&statements, Relationship::Next);

    assert!(next.contains(&pair("d1_event_t_mei", "d3_event_t_mei")));
    assert!(next.contains(&pair("u1_event_t_mei", "u2_event_t_mei")));
    assert!(next.contains(&pair("u2_event_t_mei", "u3_event_t_mei")));
    assert!(next.contains(&pair("d3_event_t_mei", "Down_END_t_mei")));
    assert_eq!(next.len(), 5);

    assert_eq!(
        links(&statements, Relationship::NextMeasure),
        vec![pair("m1_t_mei", "m2_t_mei"), pair("m2_t_mei", "m3_t_mei")]
    );
}

#[test]
fn test_late_voice_starts_its_own_chain() {
    let xml = mei(
        BACH,
        r#"<staffDef xml:id="Up" n="1"/><staffDef xml:id="Down" n="2"/>"#,
        r#"<measure xml:id="m1"><staff n="1"><note xml:id="u1" pname="c" oct="5" dur="1"/></staff></measure>
           <measure xml:id="m2"><staff n="2"><note xml:id="d2" pname="c" oct="3" dur="1"/></staff></measure>"#,
    );
    let statements = statements(&xml);

    assert!(links(&statements, Relationship::Next)
        .iter()
        .all(|(_, to)| to != "d2_event_t_mei"));
    assert!(links(&statements, Relationship::Plays).contains(&pair("Down_t_mei", "d2_event_t_mei")));
    assert!(links(&statements, Relationship::TimeSeries).contains(&pair("Down_t_mei", "d2_event_t_mei")));
}

#[test]
fn test_positions_accumulate_per_voice() {
    let xml = one_voice(
        r#"<measure xml:id="m1"><staff n="1">
             <note xml:id="a" pname="c" oct="4" dur="4" dots="1"/>
             <note xml:id="b" pname="d" oct="4" dur="8"/>
           </staff></measure>
           <measure xml:id="m2"><staff n="1"><rest xml:id="r" dur="2"/></staff></measure>"#,
    );
    let graph = build(&xml);
    let measures = graph.score.measures();

    let m1 = measures[0].events_for(0);
    assert_eq!(m1[0].start, Rational64::from_integer(0));
    assert_eq!(m1[0].end, Some(Rational64::new(3, 8)));
    assert_eq!(m1[1].start, Rational64::new(3, 8));

    let m2 = measures[1].events_for(0);
    assert_eq!(m2[0].kind, Kind::Rest);
    assert_eq!(m2[0].start, Rational64::new(1, 2));
    assert_eq!(m2[1].kind, Kind::End);
    assert_eq!(m2[1].start, Rational64::from_integer(1));
    assert_eq!(m2[1].end, None);
}

#[test]
fn test_chord_takes_max_member_dots() {
    let xml = one_voice(
        r#"<measure xml:id="m1"><staff n="1">
             <chord xml:id="ch1" dur="4" dots="2">
               <note xml:id="c1" pname="c" oct="4" dur="4"/>
               <note xml:id="c2" pname="e" oct="4" dur="4" dots="1"/>
               <note xml:id="c3" pname="g" oct="4"/>
             </chord>
           </staff></measure>"#,
    );
    let graph = build(&xml);
    let events = graph.score.measures()[0].events_for(0);

    assert_eq!(events.len(), 2);
    let chord = &events[0];
    assert_eq!(chord.id, "ch1");
    assert_eq!(chord.value.denominator, 4);
    assert_eq!(chord.value.dots, 1);
    assert_eq!(chord.facts.len(), 3);
    assert_eq!(chord.facts[2].value.denominator, 4);
    assert_eq!(chord.lowest_fact().unwrap().id, "c1");
}

#[test]
fn test_collection_falls_back_to_composer() {
    let xml = mei(
        r#"<persName role="composer">Bach</persName>"#,
        r#"<staffDef xml:id="S1" n="1"/>"#,
        TWO_NOTES,
    );
    let graph = build(&xml);

    assert_eq!(graph.score.composer, "Bach");
    assert_eq!(graph.score.collection, "Bach");
    assert_eq!(graph.score.top_rhythmic.collection, "Bach");
    assert_eq!(graph.warnings.len(), 1);
    assert_eq!(graph.warnings[0].kind, WarningKind::MissingCollection);
}

#[test]
fn test_missing_header_defaults_to_empty() {
    let xml = mei("", r#"<staffDef xml:id="S1" n="1"/>"#, TWO_NOTES);
    let graph = build(&xml);

    assert_eq!(graph.score.composer, "");
    assert_eq!(graph.score.collection, "");
    let kinds: Vec<WarningKind> = graph.warnings.iter().map(|w| w.kind).collect();
    assert_eq!(kinds, vec![WarningKind::MissingComposer, WarningKind::MissingCollection]);
}

#[test]
fn test_first_person_name_wins_and_unknown_roles_warn() {
    let header = r#"<persName role="composer">Bach</persName>
        <persName role="composer">Telemann</persName>
        <persName role="collection">Chorales</persName>
        <persName role="editor">Riemenschneider</persName>"#;
    let graph = build(&mei(header, r#"<staffDef xml:id="S1" n="1"/>"#, TWO_NOTES));

    assert_eq!(graph.score.composer, "Bach");
    assert_eq!(graph.warnings.len(), 1);
    assert_eq!(graph.warnings[0].kind, WarningKind::UnknownRole);
    assert_eq!(graph.warnings[0].element.as_deref(), Some("Riemenschneider"));
}

#[test]
fn test_voice_names() {
    let staff_defs = r#"<staffDef n="1"><label>Soprano 1</label></staffDef>
        <staffDef n="2"/>"#;
    let body = r#"<measure xml:id="m1">
        <staff n="1"><note xml:id="a" pname="c" oct="5" dur="1"/></staff>
        <staff n="2"><note xml:id="b" pname="c" oct="4" dur="1"/></staff>
      </measure>"#;
    let graph = build(&mei(BACH, staff_defs, body));

    let voices: Vec<(&str, u32)> = graph
        .score
        .voices
        .iter()
        .map(|v| (v.id.as_str(), v.staff_number))
        .collect();
    assert_eq!(voices, vec![("Soprano_1", 1), ("Staff2", 2)]);
    assert_eq!(graph.warnings[0].kind, WarningKind::UnlabelledVoice);
}

#[test]
fn test_mid_score_staff_defs_add_no_voice() {
    let body = r#"<measure xml:id="m1"><staff n="1"><note xml:id="a" pname="c" oct="4" dur="1"/></staff></measure>
      <scoreDef><staffDef n="1" key.sig="1s"/></scoreDef>
      <measure xml:id="m2"><staff n="1"><note xml:id="b" pname="d" oct="4" dur="1"/></staff></measure>
      <scoreDef><staffDef n="1" key.sig="2s"/></scoreDef>
      <measure xml:id="m3"><staff n="1"><note xml:id="c" pname="e" oct="4" dur="1"/></staff></measure>"#;
    let xml = mei(BACH, r#"<staffDef xml:id="S" n="1"/>"#, body);

    let graph = build(&xml);
    assert_eq!(graph.score.voices.len(), 1);
    assert_eq!(graph.score.voices[0].id, "S");
    assert!(graph.warnings.is_empty());

    let statements = statements(&xml);
    let mut seen = HashSet::new();
    for created in statements.iter().filter_map(|s| s.created_id()) {
        assert!(seen.insert(created), "{} created twice", created);
    }
    assert_eq!(labels(&statements, "Voice"), 1);
}

#[test]
fn test_repeated_label_is_one_voice() {
    let staff_defs = r#"<staffDef n="1"><label>Alto</label></staffDef>
        <staffDef n="2"><label>Alto</label></staffDef>"#;
    let graph = build(&mei(BACH, staff_defs, TWO_NOTES));
    let ids: Vec<&str> = graph.score.voices.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["Alto"]);
}

#[test]
fn test_label_with_line_break() {
    let staff_defs = r#"<staffDef n="1"><label>Soprano<lb/>I</label></staffDef>"#;
    let graph = build(&mei(BACH, staff_defs, TWO_NOTES));
    assert_eq!(graph.score.voices[0].id, "Soprano_I");
}

#[test]
fn test_nested_staff_group_is_one_score() {
    let staff_defs = r#"<staffGrp xml:id="inner"><staffDef xml:id="S1" n="1"/></staffGrp>"#;
    let graph = build(&mei(BACH, staff_defs, TWO_NOTES));
    assert_eq!(graph.score.id, "sg1");
    assert_eq!(graph.score.voices.len(), 1);
}

#[test]
fn test_lyrics_and_grace_notes() {
    let xml = one_voice(
        r#"<measure xml:id="m1"><staff n="1">
             <note xml:id="g" pname="b" oct="3" dur="8" grace="acc"/>
             <note xml:id="n" pname="c" oct="4" dur="4"><verse><syl>Ky</syl></verse></note>
           </staff></measure>"#,
    );
    let graph = build(&xml);
    let events = graph.score.measures()[0].events_for(0);

    assert_eq!(events[0].facts[0].grace.as_deref(), Some("acc"));
    assert_eq!(events[0].facts[0].syllable, None);
    assert_eq!(events[1].facts[0].syllable.as_deref(), Some("Ky"));
}

#[test]
fn test_malformed_dots_are_recovered() {
    let xml = one_voice(
        r#"<measure xml:id="m1"><staff n="1"><note xml:id="n" pname="c" oct="4" dur="4" dots="one"/></staff></measure>"#,
    );
    let graph = build(&xml);

    let event = &graph.score.measures()[0].events_for(0)[0];
    assert_eq!(event.value.dots, 0);
    assert_eq!(graph.warnings[0].kind, WarningKind::MalformedDots);
    assert_eq!(graph.warnings[0].element.as_deref(), Some("n"));
}

#[test]
fn test_unrepresentable_onsets_are_rejected() {
    let notes: String = (3..60)
        .step_by(2)
        .map(|dur| format!(r#"<note xml:id="n{0}" pname="c" oct="4" dur="{0}"/>"#, dur))
        .collect();
    let xml = one_voice(&format!(r#"<measure xml:id="m1"><staff n="1">{}</staff></measure>"#, notes));

    let err = build_err(&xml);
    assert!(
        matches!(err, ConversionError::Malformed(MalformedInput::InvalidDuration { .. })),
        "{:?}",
        err
    );
    assert!(convert_mei_to_cypher("t.mei", &xml, None).is_err());
}

#[test]
fn test_accidentals() {
    let xml = one_voice(
        r#"<measure xml:id="m1"><staff n="1">
             <note xml:id="n" pname="f" oct="4" dur="4" accid="s"/>
             <note xml:id="m" pname="b" oct="4" dur="4" accid.ges="f"/>
           </staff></measure>"#,
    );
    let graph = build(&xml);
    let events = graph.score.measures()[0].events_for(0);
    assert_eq!(events[0].facts[0].half_tones_from_a4(), Some(-3));
    assert_eq!(events[1].facts[0].half_tones_from_a4(), Some(1));

    let natural = one_voice(
        r#"<measure xml:id="m1"><staff n="1"><note xml:id="n" pname="f" oct="4" dur="4" accid="n"/></staff></measure>"#,
    );
    assert_eq!(
        build_err(&natural),
        ConversionError::from(ValidationError::Accidental("n".to_string()))
    );
}

#[test]
fn test_note_outside_measure() {
    let xml = one_voice(r#"<note xml:id="n" pname="c" oct="4" dur="4"/>"#);
    assert_eq!(
        build_err(&xml),
        ConversionError::from(StructuralError::OutOfMeasure {
            element: "n_event".to_string()
        })
    );
}

#[test]
fn test_staff_number_beyond_declared_voices() {
    let xml = one_voice(
        r#"<measure xml:id="m1"><staff n="2"><note xml:id="n" pname="c" oct="4" dur="4"/></staff></measure>"#,
    );
    assert_eq!(
        build_err(&xml),
        ConversionError::from(StructuralError::VoiceIndex { voice: 2, declared: 1 })
    );
}

#[test]
fn test_core_attributes_are_required() {
    let missing_octave = one_voice(
        r#"<measure xml:id="m1"><staff n="1"><note xml:id="n" pname="c" dur="4"/></staff></measure>"#,
    );
    assert_eq!(
        build_err(&missing_octave),
        ConversionError::from(MalformedInput::MissingAttribute {
            element: "note".to_string(),
            attribute: "oct".to_string(),
        })
    );

    let bad_duration = one_voice(
        r#"<measure xml:id="m1"><staff n="1"><note xml:id="n" pname="c" oct="4" dur="long"/></staff></measure>"#,
    );
    assert!(matches!(
        build_err(&bad_duration),
        ConversionError::Malformed(MalformedInput::InvalidNumber { .. })
    ));

    let negative = one_voice(
        r#"<measure xml:id="m1"><staff n="1"><rest xml:id="r" dur="-4"/></staff></measure>"#,
    );
    assert_eq!(
        build_err(&negative),
        ConversionError::from(ValidationError::NegativeField {
            field: "dur",
            value: -4
        })
    );

    let pitch = one_voice(
        r#"<measure xml:id="m1"><staff n="1"><note xml:id="n" pname="h" oct="4" dur="4"/></staff></measure>"#,
    );
    assert_eq!(
        build_err(&pitch),
        ConversionError::from(ValidationError::PitchClass("h".to_string()))
    );

    let octave = one_voice(
        r#"<measure xml:id="m1"><staff n="1"><note xml:id="n" pname="c" oct="12" dur="4"/></staff></measure>"#,
    );
    assert_eq!(build_err(&octave), ConversionError::from(ValidationError::Octave(12)));
}

#[test]
fn test_staff_def_needs_a_staff_group() {
    let xml = r#"<mei><scoreDef><staffDef xml:id="S1" n="1"/></scoreDef></mei>"#;
    assert_eq!(
        build_err(xml),
        ConversionError::from(StructuralError::MissingScore {
            element: "staffDef".to_string()
        })
    );
    assert_eq!(
        build_err("<mei/>"),
        ConversionError::from(StructuralError::MissingScore {
            element: "staffGrp".to_string()
        })
    );
}

#[test]
fn test_every_voice_ends_with_a_sentinel() {
    let xml = mei(
        BACH,
        r#"<staffDef xml:id="S1" n="1"/><staffDef xml:id="S2" n="2"/>"#,
        TWO_NOTES,
    );
    // The END sentinel gives S2 an event, so the graph is still complete
    assert!(convert_mei_to_cypher("t.mei", &xml, None).is_ok());

    let no_measures = mei(BACH, r#"<staffDef xml:id="S1" n="1"/>"#, "");
    assert_eq!(
        convert_mei_to_cypher("t.mei", &no_measures, None).unwrap_err(),
        ConversionError::from(StructuralError::OutOfMeasure {
            element: "S1_END".to_string()
        })
    );
}

#[test]
fn test_numbering_restarts_only_when_reset() {
    let xml = one_voice(TWO_NOTES);
    let mut numbering = Numbering::new();

    build_graph("a.mei", &xml, &mut numbering, false).unwrap();
    let second = build_graph("b.mei", &xml, &mut numbering, false).unwrap();
    assert_eq!(second.score.measures()[0].number, 2);
    assert_eq!(second.score.voices[0].staff_number, 2);

    numbering.reset();
    let third = build_graph("c.mei", &xml, &mut numbering, false).unwrap();
    assert_eq!(third.score.measures()[0].number, 1);
}

#[test]
fn test_source_name_override() {
    let settings = ConversionSettings {
        source_name: Some("bwv-269.mei".to_string()),
        ..ConversionSettings::default()
    };
    let result = convert_mei_to_cypher("ignored.mei", &one_voice(TWO_NOTES), Some(settings)).unwrap();
    assert_eq!(result.dump_id, "bwv_269_mei");
    assert!(result.cypher.starts_with("CREATE (sg1_bwv_269_mei:Score {id: 'sg1', source: 'bwv-269.mei'"));
}

#[test]
fn test_malformed_xml_is_reported() {
    let err = convert_mei_to_cypher("t.mei", "<mei><staffGrp></mei>", None).unwrap_err();
    assert!(matches!(err, ConversionError::Malformed(MalformedInput::Xml(_))));
}
