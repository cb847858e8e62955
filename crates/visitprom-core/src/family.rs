//! Metric family state.
//!
//! A family moves from `Unset` to `Configured` exactly once and stays there.
//! The schema (name, help, label names) is fixed by the first configuration.

use crate::error::{Result, VisitPromError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyKind {
    Counter,
    Gauge,
    Timer,
}

impl FamilyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FamilyKind::Counter => "counter",
            FamilyKind::Gauge => "gauge",
            FamilyKind::Timer => "timer",
        }
    }
}

/// Name, help text and ordered label names of a family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilySchema {
    pub kind: FamilyKind,
    pub name: String,
    pub help: String,
    pub label_names: Vec<String>,
}

impl FamilySchema {
    pub fn new(kind: FamilyKind, name: &str, help: &str, label_names: &[&str]) -> Self {
        Self {
            kind,
            name: name.to_string(),
            help: help.to_string(),
            label_names: label_names.iter().map(|l| l.to_string()).collect(),
        }
    }

    /// Number of label values every observation must carry.
    pub fn arity(&self) -> usize {
        self.label_names.len()
    }
}

/// One family slot of a `Prom`, holding the collector handle once configured.
#[derive(Debug, Clone, Default)]
pub enum Family<V> {
    #[default]
    Unset,
    Configured { schema: FamilySchema, vec: V },
}

impl<V> Family<V> {
    /// Configure the slot from `Unset`. Returns `Ok(false)` without calling
    /// `build` when the slot is already configured.
    pub fn configure<F>(&mut self, schema: FamilySchema, build: F) -> Result<bool>
    where
        F: FnOnce(&FamilySchema) -> Result<V>,
    {
        if let Family::Configured { .. } = self {
            return Ok(false);
        }
        let vec = build(&schema)?;
        *self = Family::Configured { schema, vec };
        Ok(true)
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, Family::Configured { .. })
    }

    pub fn schema(&self) -> Option<&FamilySchema> {
        match self {
            Family::Unset => None,
            Family::Configured { schema, .. } => Some(schema),
        }
    }

    pub fn vec(&self) -> Option<&V> {
        match self {
            Family::Unset => None,
            Family::Configured { vec, .. } => Some(vec),
        }
    }
}

/// Build the label tuple `[name] + extra` and check it against the schema arity.
pub fn label_values<'a>(
    schema: &FamilySchema,
    name: &'a str,
    extra: &[&'a str],
) -> Result<Vec<&'a str>> {
    let got = extra.len() + 1;
    if got != schema.arity() {
        return Err(VisitPromError::LabelArity {
            family: schema.name.clone(),
            expected: schema.arity(),
            got,
        });
    }
    let mut values = Vec::with_capacity(got);
    values.push(name);
    values.extend_from_slice(extra);
    Ok(values)
}
