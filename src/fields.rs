use std::collections::HashMap;
use crate::element::At;
use crate::error::{Error, Result};




/**
 * Named value arrays, grouped by the kind of element they are centered on.
 * This is how callers turn a field name (e.g. "topographic__elevation")
 * into the plain slice the flux operators accept.
 */
#[derive(Clone, Debug, Default)]
pub struct FieldStore {
    groups: HashMap<At, HashMap<String, Vec<f64>>>,
}




// ============================================================================
impl FieldStore {


    pub fn new() -> Self {
        Self::default()
    }


    /**
     * Insert a new field. Fails if a field of that name already exists at
     * the given centering, or if the values do not have `expected_len`
     * entries.
     */
    pub fn add_field(&mut self, at: At, name: &str, values: Vec<f64>, expected_len: usize) -> Result<&mut [f64]> {
        if values.len() != expected_len {
            return Err(Error::shape_mismatch(format!("field {:?} at {}", name, at), expected_len, values.len()));
        }
        let group = self.groups.entry(at).or_default();

        if group.contains_key(name) {
            return Err(Error::FieldExists { at: at.as_str(), name: name.to_string() });
        }
        Ok(group.entry(name.to_string()).or_insert(values).as_mut_slice())
    }


    /**
     * Insert a new field of zeros.
     */
    pub fn add_zeros(&mut self, at: At, name: &str, len: usize) -> Result<&mut [f64]> {
        self.add_field(at, name, vec![0.0; len], len)
    }


    /**
     * Return the values of a field.
     */
    pub fn field(&self, at: At, name: &str) -> Result<&[f64]> {
        self.groups
            .get(&at)
            .and_then(|group| group.get(name))
            .map(Vec::as_slice)
            .ok_or_else(|| Error::UnknownField { at: at.as_str(), name: name.to_string() })
    }

    pub fn field_mut(&mut self, at: At, name: &str) -> Result<&mut [f64]> {
        self.groups
            .get_mut(&at)
            .and_then(|group| group.get_mut(name))
            .map(Vec::as_mut_slice)
            .ok_or_else(|| Error::UnknownField { at: at.as_str(), name: name.to_string() })
    }

    pub fn contains(&self, at: At, name: &str) -> bool {
        self.groups.get(&at).map_or(false, |group| group.contains_key(name))
    }


    /**
     * Remove a field and return its values, if it exists.
     */
    pub fn remove(&mut self, at: At, name: &str) -> Option<Vec<f64>> {
        self.groups.get_mut(&at).and_then(|group| group.remove(name))
    }


    /**
     * Return the names of the fields at the given centering, sorted.
     */
    pub fn names(&self, at: At) -> Vec<&str> {
        let mut names: Vec<_> = self.groups
            .get(&at)
            .into_iter()
            .flat_map(|group| group.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names
    }
}
