//! The [`Model`] accumulates variables, constraints and an objective, and compiles them into an
//! XCSP3 document.
mod constraint_poster;
mod objective;
mod satisfy_item;
mod variable_store;

pub use constraint_poster::ConstraintPoster;
use log::warn;
pub use objective::ObjectiveDirection;
pub use objective::ObjectiveTarget;
pub(crate) use objective::Objective;
pub use satisfy_item::SatisfyItem;
pub(crate) use variable_store::*;

use crate::compiler;
use crate::constraints::ChannelTarget;
use crate::constraints::ClassTag;
use crate::constraints::Constraint;
use crate::values::Domain;
use crate::values::DomainKind;
use crate::variables::ModelId;
use crate::variables::VariableArray;
use crate::variables::VariableId;
use crate::CompileOptions;
use crate::CompiledModel;
use crate::DomainError;
use crate::ModelError;
use crate::ObjectiveError;
use crate::TableTypeError;

/// The advisory labels attached to one `satisfy` call.
#[derive(Clone, Debug, Default)]
pub(crate) struct Decoration {
    pub(crate) classes: Vec<ClassTag>,
    pub(crate) note: Option<String>,
}

impl Decoration {
    pub(crate) fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.note.is_none()
    }
}

/// The constraints of one `satisfy` call. Only the constraints of one gather can be grouped.
#[derive(Clone, Debug)]
pub(crate) enum EntryBody {
    Single(Constraint),
    Gather(Vec<Constraint>),
}

#[derive(Clone, Debug)]
pub(crate) struct Entry {
    pub(crate) body: EntryBody,
    pub(crate) decoration: Decoration,
}

/// Search hints written to the annotations section.
#[derive(Clone, Debug, Default)]
pub(crate) struct Annotations {
    pub(crate) decision: Option<Vec<VariableId>>,
    pub(crate) value_heuristic: Option<(Vec<VariableId>, Vec<i64>)>,
}

impl Annotations {
    pub(crate) fn is_empty(&self) -> bool {
        self.decision.is_none() && self.value_heuristic.is_none()
    }
}

/// The name of the problem instance, from which the name of the written file is derived.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstanceName {
    pub model: String,
    pub variant: Option<String>,
    pub data: Vec<String>,
}

impl InstanceName {
    /// `model[-variant][-data…]`.
    pub fn file_stem(&self) -> String {
        std::iter::once(self.model.as_str())
            .chain(self.variant.as_deref())
            .chain(self.data.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("-")
    }
}

/// A constraint satisfaction or optimisation problem under construction.
///
/// Variables are declared with [`Model::new_variable`] and [`Model::new_array`], constraints are
/// added with [`Model::satisfy`], and at most one objective is set with [`Model::minimize`] or
/// [`Model::maximize`]. [`Model::compile`] freezes the model and produces the XCSP3 document.
///
/// # Example
/// ```
/// # use squash_core::constraints::all_different;
/// # use squash_core::values::Domain;
/// # use squash_core::CompileOptions;
/// # use squash_core::Model;
/// let mut model = Model::new("colouring");
/// let colours = model
///     .new_named_array("c", &[3], |_| Domain::new(0..3).ok())
///     .unwrap();
///
/// model
///     .satisfy(all_different(colours.cells()).unwrap())
///     .post()
///     .unwrap();
///
/// let compiled = model.compile(&CompileOptions::default()).unwrap();
/// assert!(compiled.to_xml().unwrap().contains("<allDifferent> c[] </allDifferent>"));
/// ```
#[derive(Debug)]
pub struct Model {
    instance_name: InstanceName,
    pub(crate) variables: VariableStore,
    pub(crate) entries: Vec<Entry>,
    pub(crate) objective: Option<Objective>,
    pub(crate) annotations: Annotations,
    frozen: bool,
}

impl Default for Model {
    fn default() -> Self {
        Model::new("model")
    }
}

impl Model {
    pub fn new(name: impl Into<String>) -> Model {
        Model {
            instance_name: InstanceName {
                model: name.into(),
                variant: None,
                data: vec![],
            },
            variables: VariableStore::new(ModelId::fresh()),
            entries: vec![],
            objective: None,
            annotations: Annotations::default(),
            frozen: false,
        }
    }

    /// Set the variant and the data labels the instance name is made of.
    pub fn with_instance_name(
        mut self,
        variant: Option<&str>,
        data: impl IntoIterator<Item = impl Into<String>>,
    ) -> Model {
        self.instance_name.variant = variant.map(str::to_owned);
        self.instance_name.data = data.into_iter().map(Into::into).collect();
        self
    }

    pub fn instance_name(&self) -> &InstanceName {
        &self.instance_name
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Declare a variable named `v{k}`.
    pub fn new_variable(&mut self, domain: Domain) -> Result<VariableId, ModelError> {
        self.check_not_frozen()?;
        Ok(self.variables.declare_variable(None, domain)?)
    }

    pub fn new_named_variable(
        &mut self,
        name: &str,
        domain: Domain,
    ) -> Result<VariableId, ModelError> {
        self.check_not_frozen()?;
        Ok(self.variables.declare_variable(Some(name), domain)?)
    }

    /// Declare an array named `a{k}`.
    ///
    /// `domain_of` is called once for every index tuple in row-major order; the cell does not
    /// exist when it returns `None`.
    pub fn new_array(
        &mut self,
        shape: &[usize],
        domain_of: impl FnMut(&[usize]) -> Option<Domain>,
    ) -> Result<VariableArray, ModelError> {
        self.check_not_frozen()?;
        Ok(self.variables.declare_array(None, shape, domain_of)?.clone())
    }

    pub fn new_named_array(
        &mut self,
        name: &str,
        shape: &[usize],
        domain_of: impl FnMut(&[usize]) -> Option<Domain>,
    ) -> Result<VariableArray, ModelError> {
        self.check_not_frozen()?;
        Ok(self
            .variables
            .declare_array(Some(name), shape, domain_of)?
            .clone())
    }

    /// The domain of a variable of this model.
    pub fn domain(&self, variable: VariableId) -> Option<&Domain> {
        self.variables.check(variable).ok()?;
        Some(self.variables.domain_of(variable))
    }

    /// The name a variable of this model is written with.
    pub fn name(&self, variable: VariableId) -> Option<&str> {
        self.variables.check(variable).ok()?;
        Some(&self.variables.info(variable).name)
    }

    /// Add constraints to the model. The constraints are only added once
    /// [`ConstraintPoster::post`] is called.
    pub fn satisfy(&mut self, item: impl Into<SatisfyItem>) -> ConstraintPoster<'_> {
        ConstraintPoster::new(self, item.into())
    }

    pub fn minimize(&mut self, target: impl Into<ObjectiveTarget>) -> Result<(), ModelError> {
        self.set_objective(ObjectiveDirection::Minimize, target.into())
    }

    pub fn maximize(&mut self, target: impl Into<ObjectiveTarget>) -> Result<(), ModelError> {
        self.set_objective(ObjectiveDirection::Maximize, target.into())
    }

    /// Mark the variables the search should branch on. An empty list is ignored.
    pub fn annotate_decision(
        &mut self,
        variables: impl IntoIterator<Item = VariableId>,
    ) -> Result<(), ModelError> {
        self.check_not_frozen()?;
        let variables = self.checked_variables(variables)?;

        if variables.is_empty() {
            warn!("Ignoring a decision annotation without variables.");
            return Ok(());
        }
        if self.annotations.decision.is_some() {
            warn!("Replacing the earlier decision annotation.");
        }

        self.annotations.decision = Some(variables);
        Ok(())
    }

    /// Ask the search to try the values of the variables in the given static order. An empty list
    /// of variables is ignored.
    pub fn annotate_value_heuristic(
        &mut self,
        variables: impl IntoIterator<Item = VariableId>,
        order: impl IntoIterator<Item = i64>,
    ) -> Result<(), ModelError> {
        self.check_not_frozen()?;
        let variables = self.checked_variables(variables)?;

        if variables.is_empty() {
            warn!("Ignoring a value heuristic annotation without variables.");
            return Ok(());
        }
        if self.annotations.value_heuristic.is_some() {
            warn!("Replacing the earlier value heuristic annotation.");
        }

        self.annotations.value_heuristic = Some((variables, order.into_iter().collect()));
        Ok(())
    }

    /// Freeze the model and compile it.
    ///
    /// After this call, the model no longer accepts declarations, constraints or objectives.
    /// Compiling the same model again yields the same document.
    pub fn compile(&mut self, options: &CompileOptions) -> Result<CompiledModel, ModelError> {
        self.frozen = true;
        compiler::compile(self, options)
    }

    pub(crate) fn add_entry(
        &mut self,
        item: SatisfyItem,
        decoration: Decoration,
    ) -> Result<(), ModelError> {
        self.check_not_frozen()?;

        let is_list = item.is_list();
        let mut constraints = vec![];
        item.flatten_into(&mut constraints)?;

        for constraint in &constraints {
            self.validate(constraint)?;
        }

        let body = match constraints.len() {
            0 => {
                warn!("Ignoring a satisfy call without constraints.");
                return Ok(());
            }
            1 if !is_list => EntryBody::Single(constraints.remove(0)),
            _ => EntryBody::Gather(constraints),
        };

        self.entries.push(Entry { body, decoration });
        Ok(())
    }

    fn validate(&self, constraint: &Constraint) -> Result<(), ModelError> {
        for variable in constraint.scope() {
            self.variables.check(variable)?;
        }

        match constraint {
            Constraint::Extension { list, table } => {
                let kinds = table.column_kinds(list.len())?;

                for (column, (expression, kind)) in list.iter().zip(kinds).enumerate() {
                    let (Some(variable), Some(symbolic)) = (expression.as_variable(), kind) else {
                        continue;
                    };

                    let domain_kind = self.variables.domain_of(variable).kind();
                    if symbolic != (domain_kind == DomainKind::Symbolic) {
                        return Err(TableTypeError::ColumnKind { column }.into());
                    }
                }
            }
            Constraint::Channel {
                list,
                target: ChannelTarget::Value(_),
                ..
            } => self.check_binary(list.iter().copied())?,
            Constraint::Clause { literals } => {
                self.check_binary(literals.iter().map(|(variable, _)| *variable))?;
            }
            Constraint::Slide(constraints) => {
                for constraint in constraints {
                    self.validate(constraint)?;
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn check_binary(&self, variables: impl Iterator<Item = VariableId>) -> Result<(), ModelError> {
        for variable in variables {
            if !self.variables.domain_of(variable).is_binary() {
                return Err(DomainError::NotBinary {
                    variable: self.variables.info(variable).name.clone(),
                }
                .into());
            }
        }

        Ok(())
    }

    fn set_objective(
        &mut self,
        direction: ObjectiveDirection,
        target: ObjectiveTarget,
    ) -> Result<(), ModelError> {
        self.check_not_frozen()?;

        if self.objective.is_some() {
            return Err(ObjectiveError::AlreadySet.into());
        }

        if let ObjectiveTarget::Expression(expression) = &target {
            if !expression.is_numeric() {
                return Err(ObjectiveError::NonNumeric.into());
            }
        }

        for variable in target.variables() {
            self.variables.check(variable)?;
            if self.variables.domain_of(variable).kind() == DomainKind::Symbolic {
                return Err(ObjectiveError::NonNumeric.into());
            }
        }

        self.objective = Some(Objective { direction, target });
        Ok(())
    }

    fn checked_variables(
        &self,
        variables: impl IntoIterator<Item = VariableId>,
    ) -> Result<Vec<VariableId>, ModelError> {
        variables
            .into_iter()
            .map(|variable| {
                self.variables.check(variable)?;
                Ok(variable)
            })
            .collect()
    }

    fn check_not_frozen(&self) -> Result<(), ModelError> {
        if self.frozen {
            return Err(ModelError::Frozen);
        }

        Ok(())
    }
}
