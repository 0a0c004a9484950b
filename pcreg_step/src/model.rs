use crate::error::{Result, StepError};

/// Fieldwork shape model as seen by the step: its geometry is driven by a
/// field-parameter tensor, everything else is the solver's business.
pub trait ShapeModel {
    fn set_field_parameters(&mut self, params: &FieldParameters);
}

/// Statistical shape space; the step only needs its mean.
pub trait PrincipalComponents {
    fn mean(&self) -> &[f64];
}

/// Field parameters in a `(3, nodes, 1)` layout: all x components, then all y,
/// then all z.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldParameters {
    values: Vec<f64>,
    nodes: usize,
}

impl FieldParameters {
    /// Reshapes a flat PC mean. The length must be a positive multiple of 3.
    pub fn from_mean(mean: &[f64]) -> Result<Self> {
        if mean.is_empty() || mean.len() % 3 != 0 {
            return Err(StepError::InvalidMean { len: mean.len() });
        }

        Ok(Self {
            values: mean.to_vec(),
            nodes: mean.len() / 3,
        })
    }

    pub fn nodes(&self) -> usize {
        self.nodes
    }

    /// `(3, nodes, 1)`
    pub fn shape(&self) -> [usize; 3] {
        [3, self.nodes, 1]
    }

    /// `None` when `component` or `node` is out of range.
    pub fn get(&self, component: usize, node: usize) -> Option<f64> {
        if node >= self.nodes {
            return None;
        }
        self.component(component)?.get(node).copied()
    }

    /// Values of one coordinate component across all nodes.
    pub fn component(&self, component: usize) -> Option<&[f64]> {
        if component >= 3 {
            return None;
        }
        self.values
            .get(component * self.nodes..(component + 1) * self.nodes)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}
