use crate::containers::HashMap;
use crate::containers::HashSet;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::expressions::Names;
use crate::values::Domain;
use crate::variables::cell_name;
use crate::variables::index_tuples;
use crate::variables::validate_shape;
use crate::variables::ArrayKey;
use crate::variables::ModelId;
use crate::variables::VariableArray;
use crate::variables::VariableId;
use crate::ModelError;
use crate::NameError;
use crate::ScopeError;

/// The name of the array holding the variables introduced by the compiler.
pub(crate) const AUXILIARY_ARRAY: &str = "aux_gb";

/// Key of an interned [`Domain`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct DomainId(u32);

impl StorageKey for DomainId {
    fn index(&self) -> usize {
        self.0 as usize
    }

    fn create_from_index(index: usize) -> Self {
        DomainId(index as u32)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct VariableInfo {
    pub(crate) name: String,
    pub(crate) domain: DomainId,
    /// The array the variable is a cell of, with its row-major position.
    pub(crate) cell: Option<(ArrayKey, usize)>,
}

/// A top-level entry of the variables section, in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Declaration {
    Variable(VariableId),
    Array(ArrayKey),
}

/// The variables and arrays of a model, with their interned domains.
#[derive(Clone, Debug)]
pub(crate) struct VariableStore {
    model: ModelId,
    domains: KeyedVec<DomainId, Domain>,
    domain_ids: HashMap<Domain, DomainId>,
    variables: KeyedVec<u32, VariableInfo>,
    arrays: KeyedVec<ArrayKey, VariableArray>,
    declarations: Vec<Declaration>,
    names: HashSet<String>,
    unnamed_variables: usize,
    unnamed_arrays: usize,
    auxiliary_array: Option<ArrayKey>,
}

impl VariableStore {
    pub(crate) fn new(model: ModelId) -> VariableStore {
        VariableStore {
            model,
            domains: KeyedVec::default(),
            domain_ids: HashMap::default(),
            variables: KeyedVec::default(),
            arrays: KeyedVec::default(),
            declarations: vec![],
            names: HashSet::default(),
            unnamed_variables: 0,
            unnamed_arrays: 0,
            auxiliary_array: None,
        }
    }

    pub(crate) fn declare_variable(
        &mut self,
        name: Option<&str>,
        domain: Domain,
    ) -> Result<VariableId, NameError> {
        let name = match name {
            Some(name) => self.claim_name(name)?,
            None => self.fresh_name('v'),
        };

        let variable = self.push_variable(name, domain, None);
        self.declarations.push(Declaration::Variable(variable));

        Ok(variable)
    }

    pub(crate) fn declare_array(
        &mut self,
        name: Option<&str>,
        shape: &[usize],
        mut domain_of: impl FnMut(&[usize]) -> Option<Domain>,
    ) -> Result<&VariableArray, ModelError> {
        validate_shape(shape)?;

        let name = match name {
            Some(name) => self.claim_name(name)?,
            None => self.fresh_name('a'),
        };

        let key = ArrayKey::create_from_index(self.arrays.len());
        let cells = index_tuples(shape)
            .enumerate()
            .map(|(position, indices)| {
                domain_of(&indices).map(|domain| {
                    self.push_variable(cell_name(&name, &indices), domain, Some((key, position)))
                })
            })
            .collect();

        let key = self
            .arrays
            .push(VariableArray::new(key, name, shape.to_vec(), cells));
        self.declarations.push(Declaration::Array(key));

        Ok(&self.arrays[key])
    }

    /// Add a cell to the array of auxiliary variables, creating the array when needed.
    pub(crate) fn declare_auxiliary(&mut self, domain: Domain) -> VariableId {
        let key = match self.auxiliary_array {
            Some(key) => key,
            None => {
                let key = self.arrays.push(VariableArray::new(
                    ArrayKey::create_from_index(self.arrays.len()),
                    AUXILIARY_ARRAY.to_owned(),
                    vec![0],
                    vec![],
                ));
                self.declarations.push(Declaration::Array(key));
                self.auxiliary_array = Some(key);
                key
            }
        };

        let position = self.arrays[key].slots().len();
        let variable = self.push_variable(
            cell_name(AUXILIARY_ARRAY, &[position]),
            domain,
            Some((key, position)),
        );
        self.arrays[key].push_cell(variable);

        variable
    }

    /// Check that the variable was declared in this store.
    pub(crate) fn check(&self, variable: VariableId) -> Result<(), ScopeError> {
        if variable.model != self.model {
            return Err(ScopeError::ForeignVariable {
                variable: format!("#{}", variable.index),
            });
        }

        if self.variables.get(variable.index).is_none() {
            return Err(ScopeError::UnknownVariable {
                variable: format!("#{}", variable.index),
            });
        }

        Ok(())
    }

    pub(crate) fn info(&self, variable: VariableId) -> &VariableInfo {
        &self.variables[variable.index]
    }

    pub(crate) fn domain_of(&self, variable: VariableId) -> &Domain {
        &self.domains[self.info(variable).domain]
    }

    pub(crate) fn domain(&self, id: DomainId) -> &Domain {
        &self.domains[id]
    }

    pub(crate) fn array(&self, key: ArrayKey) -> &VariableArray {
        &self.arrays[key]
    }

    pub(crate) fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    pub(crate) fn variable_count(&self) -> usize {
        self.variables.len()
    }

    fn push_variable(
        &mut self,
        name: String,
        domain: Domain,
        cell: Option<(ArrayKey, usize)>,
    ) -> VariableId {
        let domain = self.intern(domain);
        let index = self.variables.push(VariableInfo { name, domain, cell });

        VariableId::new(self.model, index)
    }

    fn intern(&mut self, domain: Domain) -> DomainId {
        if let Some(id) = self.domain_ids.get(&domain) {
            return *id;
        }

        let id = self.domains.push(domain.clone());
        let _ = self.domain_ids.insert(domain, id);
        id
    }

    fn claim_name(&mut self, name: &str) -> Result<String, NameError> {
        if !xcsp_format::is_valid_identifier(name) || name.starts_with(AUXILIARY_ARRAY) {
            return Err(NameError::Invalid {
                name: name.to_owned(),
            });
        }

        if !self.names.insert(name.to_owned()) {
            return Err(NameError::Duplicate {
                name: name.to_owned(),
            });
        }

        Ok(name.to_owned())
    }

    /// The next unused name `{prefix}{k}`, where `k` counts the unnamed entities of that kind.
    fn fresh_name(&mut self, prefix: char) -> String {
        loop {
            let counter = if prefix == 'v' {
                &mut self.unnamed_variables
            } else {
                &mut self.unnamed_arrays
            };
            let name = format!("{prefix}{counter}");
            *counter += 1;

            if self.names.insert(name.clone()) {
                return name;
            }
        }
    }
}

impl Names for VariableStore {
    fn name_of(&self, variable: VariableId) -> &str {
        &self.info(variable).name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> VariableStore {
        VariableStore::new(ModelId::fresh())
    }

    fn domain(values: std::ops::RangeInclusive<i64>) -> Domain {
        Domain::new(values).unwrap()
    }

    #[test]
    fn equal_domains_are_interned_once() {
        let mut store = store();

        let x = store.declare_variable(None, domain(0..=2)).unwrap();
        let y = store.declare_variable(None, domain(0..=2)).unwrap();

        assert_eq!(store.info(x).domain, store.info(y).domain);
        assert_eq!("v0", store.name_of(x));
        assert_eq!("v1", store.name_of(y));
    }

    #[test]
    fn generated_names_skip_used_names() {
        let mut store = store();

        let _ = store.declare_variable(Some("v0"), domain(0..=1)).unwrap();
        let generated = store.declare_variable(None, domain(0..=1)).unwrap();

        assert_eq!("v1", store.name_of(generated));
    }

    #[test]
    fn names_are_validated() {
        let mut store = store();

        assert_eq!(
            Err(NameError::Invalid {
                name: "2x".to_owned()
            }),
            store.declare_variable(Some("2x"), domain(0..=1))
        );
        assert!(store.declare_variable(Some("aux_gb"), domain(0..=1)).is_err());

        let _ = store.declare_variable(Some("x"), domain(0..=1)).unwrap();
        assert_eq!(
            Err(NameError::Duplicate {
                name: "x".to_owned()
            }),
            store.declare_variable(Some("x"), domain(0..=1))
        );
    }

    #[test]
    fn arrays_skip_missing_cells() {
        let mut store = store();

        let array = store
            .declare_array(Some("x"), &[2, 2], |indices| {
                (indices[0] <= indices[1]).then(|| domain(0..=3))
            })
            .unwrap();

        assert_eq!(3, array.len());
        assert!(array.get(&[1, 0]).is_none());
        let cell = array.get(&[0, 1]).unwrap();
        assert_eq!("x[0][1]", store.name_of(cell));
    }

    #[test]
    fn auxiliary_variables_form_one_array() {
        let mut store = store();
        let _ = store.declare_variable(None, domain(0..=1)).unwrap();

        let first = store.declare_auxiliary(domain(0..=2));
        let second = store.declare_auxiliary(domain(0..=4));

        assert_eq!("aux_gb[0]", store.name_of(first));
        assert_eq!("aux_gb[1]", store.name_of(second));
        assert_eq!(2, store.declarations().len());
    }

    #[test]
    fn foreign_variables_are_rejected() {
        let mut first = store();
        let second = store();
        let x = first.declare_variable(None, domain(0..=1)).unwrap();

        assert!(first.check(x).is_ok());
        assert!(matches!(
            second.check(x),
            Err(ScopeError::ForeignVariable { .. })
        ));
    }
}
