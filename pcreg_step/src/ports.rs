//! Port layout shared with the workflow host.
//!
//! Saved workflows connect steps by port index, so the indices below are
//! fixed.

use strum_macros::Display;

use crate::landmarks::LandmarkSet;
use crate::transform::RigidPcModesTransform;

const RDF_SCHEMA: &str = "http://physiomeproject.org/workflow/1.0/rdf-schema";

pub const PORT_URI: &str = "http://physiomeproject.org/workflow/1.0/rdf-schema#port";

pub const LANDMARKS_PORT: usize = 0;
pub const PRINCIPAL_COMPONENTS_PORT: usize = 1;
pub const INPUT_MODEL_PORT: usize = 2;
pub const OUTPUT_MODEL_PORT: usize = 3;
pub const TRANSFORM_PORT: usize = 4;
pub const RMSE_PORT: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortDirection {
    Uses,
    Provides,
}

impl PortDirection {
    pub fn predicate(&self) -> &'static str {
        match self {
            PortDirection::Uses => "http://physiomeproject.org/workflow/1.0/rdf-schema#uses",
            PortDirection::Provides => {
                "http://physiomeproject.org/workflow/1.0/rdf-schema#provides"
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum PortKind {
    #[strum(to_string = "landmarks")]
    Landmarks,
    #[strum(to_string = "principal components")]
    PrincipalComponents,
    #[strum(to_string = "a fieldwork model")]
    FieldworkModel,
    #[strum(to_string = "a geometric transform")]
    GeometricTransform,
    #[strum(to_string = "a float")]
    Float,
}

impl PortKind {
    /// Type URI the host matches when connecting ports.
    pub fn uri(&self) -> String {
        match self {
            PortKind::Landmarks => format!("{RDF_SCHEMA}#landmarks"),
            PortKind::PrincipalComponents => "ju#principalcomponents".to_string(),
            PortKind::FieldworkModel => "ju#fieldworkmodel".to_string(),
            PortKind::GeometricTransform => "ju#geometrictransform".to_string(),
            PortKind::Float => "python#float".to_string(),
        }
    }

    /// Kind accepted by input port `index`; every index past the PC port
    /// binds to the input model.
    pub fn for_input(index: usize) -> PortKind {
        match index {
            LANDMARKS_PORT => PortKind::Landmarks,
            PRINCIPAL_COMPONENTS_PORT => PortKind::PrincipalComponents,
            _ => PortKind::FieldworkModel,
        }
    }

    /// Kind served by output port `index`; unknown indices serve the RMSE.
    pub fn for_output(index: usize) -> PortKind {
        match index {
            OUTPUT_MODEL_PORT => PortKind::FieldworkModel,
            TRANSFORM_PORT => PortKind::GeometricTransform,
            _ => PortKind::Float,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortDescriptor {
    pub direction: PortDirection,
    pub kind: PortKind,
}

impl PortDescriptor {
    const fn new(direction: PortDirection, kind: PortKind) -> Self {
        Self { direction, kind }
    }

    /// `(port, direction predicate, type)` triple as registered with the host.
    pub fn triple(&self) -> (&'static str, &'static str, String) {
        (PORT_URI, self.direction.predicate(), self.kind.uri())
    }
}

pub const STEP_PORTS: [PortDescriptor; 6] = [
    PortDescriptor::new(PortDirection::Uses, PortKind::Landmarks),
    PortDescriptor::new(PortDirection::Uses, PortKind::PrincipalComponents),
    PortDescriptor::new(PortDirection::Uses, PortKind::FieldworkModel),
    PortDescriptor::new(PortDirection::Provides, PortKind::FieldworkModel),
    PortDescriptor::new(PortDirection::Provides, PortKind::GeometricTransform),
    PortDescriptor::new(PortDirection::Provides, PortKind::Float),
];

/// Value delivered to an input port.
#[derive(Clone, Debug)]
pub enum PortData<M, P> {
    Landmarks(LandmarkSet),
    PrincipalComponents(P),
    Model(M),
}

impl<M, P> PortData<M, P> {
    pub fn kind(&self) -> PortKind {
        match self {
            PortData::Landmarks(_) => PortKind::Landmarks,
            PortData::PrincipalComponents(_) => PortKind::PrincipalComponents,
            PortData::Model(_) => PortKind::FieldworkModel,
        }
    }
}

/// Value served by an output port.
#[derive(Debug, PartialEq)]
pub enum PortOutput<'a, M> {
    Model(&'a M),
    Transform(&'a RigidPcModesTransform),
    Rmse(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_triples_match_host_registration() {
        let triples: Vec<_> = STEP_PORTS.iter().map(PortDescriptor::triple).collect();

        assert_eq!(
            triples[0],
            (
                PORT_URI,
                "http://physiomeproject.org/workflow/1.0/rdf-schema#uses",
                "http://physiomeproject.org/workflow/1.0/rdf-schema#landmarks".to_string()
            )
        );
        assert_eq!(triples[1].2, "ju#principalcomponents");
        assert_eq!(triples[2].2, "ju#fieldworkmodel");
        assert_eq!(
            triples[3].1,
            "http://physiomeproject.org/workflow/1.0/rdf-schema#provides"
        );
        assert_eq!(triples[4].2, "ju#geometrictransform");
        assert_eq!(triples[5].2, "python#float");
    }

    #[test]
    fn index_bindings() {
        assert_eq!(PortKind::for_input(0), PortKind::Landmarks);
        assert_eq!(PortKind::for_input(1), PortKind::PrincipalComponents);
        assert_eq!(PortKind::for_input(2), PortKind::FieldworkModel);
        assert_eq!(PortKind::for_input(7), PortKind::FieldworkModel);

        assert_eq!(PortKind::for_output(3), PortKind::FieldworkModel);
        assert_eq!(PortKind::for_output(4), PortKind::GeometricTransform);
        assert_eq!(PortKind::for_output(5), PortKind::Float);
        assert_eq!(PortKind::for_output(0), PortKind::Float);
    }
}
