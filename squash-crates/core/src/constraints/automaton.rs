use std::fmt::Display;

use itertools::Itertools;

use crate::AutomatonError;

/// A transition `from --value--> to` of an [`Automaton`] or an [`Mdd`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Transition {
    pub from: String,
    pub value: i64,
    pub to: String,
}

impl Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{},{})", self.from, self.value, self.to)
    }
}

fn transitions<Source, Target>(
    transitions: impl IntoIterator<Item = (Source, i64, Target)>,
) -> Result<Vec<Transition>, AutomatonError>
where
    Source: Into<String>,
    Target: Into<String>,
{
    let transitions = transitions
        .into_iter()
        .map(|(from, value, to)| {
            Ok(Transition {
                from: state(from)?,
                value,
                to: state(to)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if transitions.is_empty() {
        return Err(AutomatonError::NoTransitions);
    }

    Ok(transitions)
}

fn state(name: impl Into<String>) -> Result<String, AutomatonError> {
    let name = name.into();

    if !xcsp_format::is_valid_identifier(&name) {
        return Err(AutomatonError::InvalidState { state: name });
    }

    Ok(name)
}

/// The written form of a list of transitions, e.g. `(a,0,b)(b,1,a)`.
pub(crate) fn transitions_text(transitions: &[Transition]) -> String {
    transitions.iter().join("")
}

/// A deterministic or non-deterministic finite automaton over integer values.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Automaton {
    start: String,
    transitions: Vec<Transition>,
    finals: Vec<String>,
}

impl Automaton {
    /// Create an automaton from its start state, its transitions and its final states.
    ///
    /// State names must be valid identifiers. The final states are sorted and deduplicated.
    ///
    /// ```
    /// # use squash_core::constraints::Automaton;
    /// let automaton = Automaton::new("a", [("a", 0, "a"), ("a", 1, "b")], ["b"]).unwrap();
    /// assert_eq!(vec!["b"], automaton.finals());
    /// ```
    pub fn new<Source, Target>(
        start: impl Into<String>,
        transitions: impl IntoIterator<Item = (Source, i64, Target)>,
        finals: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Automaton, AutomatonError>
    where
        Source: Into<String>,
        Target: Into<String>,
    {
        let start = state(start)?;
        let transitions = self::transitions(transitions)?;
        let finals = finals
            .into_iter()
            .map(state)
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .sorted()
            .dedup()
            .collect::<Vec<_>>();

        if finals.is_empty() {
            return Err(AutomatonError::NoFinalStates);
        }

        Ok(Automaton {
            start,
            transitions,
            finals,
        })
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn finals(&self) -> &[String] {
        &self.finals
    }
}

/// A multi-valued decision diagram, given by its transitions. The source of the first transition
/// is the root.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Mdd {
    transitions: Vec<Transition>,
}

impl Mdd {
    pub fn new<Source, Target>(
        transitions: impl IntoIterator<Item = (Source, i64, Target)>,
    ) -> Result<Mdd, AutomatonError>
    where
        Source: Into<String>,
        Target: Into<String>,
    {
        Ok(Mdd {
            transitions: self::transitions(transitions)?,
        })
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }
}
