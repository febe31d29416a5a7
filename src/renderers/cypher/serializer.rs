//! Deterministic walk of a score graph
//!
//! Emission order: the Score, then the TopRhythmic subtree (each measure
//! followed by its events voice by voice, each event followed by its facts and
//! its NEXT link), then the voices with their links. Every node is created
//! before any relationship names it.

use log::warn;
use num_traits::CheckedDiv;

use crate::converters::mei::errors::StructuralError;
use crate::converters::mei::types::{ConversionWarning, WarningKind};
use crate::models::rhythm::ratio_to_f64;
use crate::models::{semitone_interval, Event, Kind, Properties, PropertyValue, Score};

use super::statements::{Relationship, Statement};

/// Serialize a finished graph into its ordered statements.
///
/// Fails if a voice never produced an event.
pub fn serialize_score(
    score: &Score,
    warnings: &mut Vec<ConversionWarning>,
) -> Result<Vec<Statement>, StructuralError> {
    let first_events = score
        .voices
        .iter()
        .map(|voice| {
            voice
                .first_event()
                .and_then(|location| score.event(location))
                .ok_or_else(|| StructuralError::MissingFirstEvent {
                    voice: voice.id.clone(),
                })
        })
        .collect::<Result<Vec<&Event>, _>>()?;

    let top = &score.top_rhythmic;
    let mut statements = vec![
        Statement::node(score),
        Statement::node(top),
        Statement::link(&score.graph_id, Relationship::Rhythmic, &top.graph_id),
    ];

    for (measure_index, measure) in top.measures.iter().enumerate() {
        statements.push(Statement::node(measure));
        statements.push(Statement::link(&top.graph_id, Relationship::Rhythmic, &measure.graph_id));

        for (voice_index, row) in measure.voices().enumerate() {
            let mut previous = top.last_event_before(measure_index, voice_index);
            for event in row {
                statements.push(Statement::node(event));
                statements.push(Statement::link(&measure.graph_id, Relationship::Has, &event.graph_id));
                for fact in &event.facts {
                    statements.push(Statement::node(fact));
                    statements.push(Statement::link(&event.graph_id, Relationship::Is, &fact.graph_id));
                }
                if let Some(prev) = previous {
                    statements.push(next_link(prev, event, warnings));
                }
                previous = Some(event);
            }
        }

        if let Some(prev_measure) = measure_index.checked_sub(1).map(|i| &top.measures[i]) {
            statements.push(Statement::link(
                &prev_measure.graph_id,
                Relationship::NextMeasure,
                &measure.graph_id,
            ));
        }
    }

    for (voice, first) in score.voices.iter().zip(first_events) {
        statements.push(Statement::node(voice));
        statements.push(Statement::link(&score.graph_id, Relationship::Voice, &voice.graph_id));
        statements.push(Statement::link(&voice.graph_id, Relationship::Rhythmic, &top.graph_id));
        statements.push(Statement::link(&voice.graph_id, Relationship::Plays, &first.graph_id));
        statements.push(Statement::link(&voice.graph_id, Relationship::TimeSeries, &first.graph_id));
    }

    Ok(statements)
}

/// NEXT link between consecutive events of one voice.
///
/// Interval and duration ratio compare the first listed fact of each event,
/// and only when both are notes.
fn next_link(prev: &Event, next: &Event, warnings: &mut Vec<ConversionWarning>) -> Statement {
    let mut properties: Properties = vec![("duration", PropertyValue::optional_ratio(prev.duration))];

    let pair = prev.first_fact().zip(next.first_fact());
    if let Some((from, to)) = pair.filter(|(a, b)| a.kind() == Kind::Note && b.kind() == Kind::Note) {
        if let Some((p, q)) = from.pitch().zip(to.pitch()) {
            properties.push(("interval", PropertyValue::Int(semitone_interval(&p, &q) as i64)));
        }
        match to.duration.checked_div(&from.duration) {
            Some(ratio) => properties.push(("duration_ratio", PropertyValue::Float(ratio_to_f64(ratio)))),
            None => {
                let message = format!(
                    "{} -> {}: duration ratio is undefined or out of range, duration_ratio omitted",
                    prev.id, next.id
                );
                warn!("{}", message);
                warnings.push(ConversionWarning::new(
                    WarningKind::DegenerateDuration,
                    Some(&prev.id),
                    message,
                ));
            }
        }
    }

    Statement::link(&prev.graph_id, Relationship::Next, &next.graph_id).with_properties(properties)
}

/// One statement per line, each terminated by a newline.
pub fn render_dump(statements: &[Statement]) -> String {
    let mut dump = String::new();
    for statement in statements {
        dump.push_str(&statement.to_string());
        dump.push('\n');
    }
    dump
}
