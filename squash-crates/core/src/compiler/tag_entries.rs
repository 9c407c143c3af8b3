//! Settle the labels and annotations which are written along with the constraints.
use log::debug;
use log::warn;

use super::shape::CompiledEntry;
use super::CompilationContext;
use crate::containers::HashSet;

pub(crate) fn run(context: &mut CompilationContext<'_>) {
    let mut tagged = 0;
    for entry in &mut context.compiled {
        tagged += tag(entry, context.options.notes);
    }
    context.statistics.tagged_entries = tagged;

    if let Some(decision) = &mut context.annotations.decision {
        let mut seen: HashSet<_> = HashSet::default();
        let before = decision.len();
        decision.retain(|variable| seen.insert(*variable));

        if decision.len() != before {
            warn!(
                "Dropped {} repeated variables from the decision annotation.",
                before - decision.len()
            );
        }
    }

    debug!("{tagged} entries carry a class or a note");
}

/// Drop the notes if they are not written, and count the labelled entries.
fn tag(entry: &mut CompiledEntry, notes: bool) -> usize {
    let decoration = entry.decoration_mut();
    if !notes {
        decoration.note = None;
    }
    let mut tagged = usize::from(!decoration.is_empty());

    if let CompiledEntry::Block { entries, .. } = entry {
        for entry in entries {
            tagged += tag(entry, notes);
        }
    }

    tagged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::shape::Shape;
    use crate::constraints::all_equal;
    use crate::constraints::ClassTag;
    use crate::model::Decoration;
    use crate::variables::ModelId;
    use crate::variables::VariableId;

    fn constraint(decoration: Decoration) -> CompiledEntry {
        let model = ModelId::fresh();
        let list = [VariableId::new(model, 0), VariableId::new(model, 1)];
        let constraint = all_equal(list).expect("two variables form a valid list");

        CompiledEntry::Constraint {
            shape: Shape::of(&constraint),
            decoration,
        }
    }

    #[test]
    fn notes_are_dropped_when_disabled() {
        let mut entry = constraint(Decoration {
            classes: vec![],
            note: Some("all equal".to_owned()),
        });

        assert_eq!(0, tag(&mut entry, false));
        assert!(entry.decoration_mut().is_empty());
    }

    #[test]
    fn labelled_entries_inside_blocks_are_counted() {
        let mut block = CompiledEntry::Block {
            entries: vec![
                constraint(Decoration::default()),
                constraint(Decoration {
                    classes: vec![ClassTag::Clues],
                    note: None,
                }),
            ],
            decoration: Decoration {
                classes: vec![ClassTag::SymmetryBreaking],
                note: Some("block".to_owned()),
            },
        };

        assert_eq!(2, tag(&mut block, true));
    }
}
