//! The generator interface shared by all LNOI400 components.

use std::fmt::Debug;
use std::sync::Arc;

use arcstr::ArcStr;
use photonir::{ComponentId, Context, Error, PortSpec, Result, Technology, WarningCause};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// The component library name used in warnings.
pub const LIBRARY_NAME: &str = "Luxtelligence LNOI400";

/// A parametric component.
///
/// Each generator builds one component into the [`Context`]'s library from a
/// parameter struct whose [`Default`] holds the documented defaults. Unnamed
/// components are named after [`Generator::NAME_PREFIX`].
pub trait Generator {
    /// The generator parameters.
    type Params: Debug + Default + Serialize + DeserializeOwned;

    /// The public function name, as used by the command line and UI schema.
    const FUNCTION: &'static str;

    /// The prefix of generated component names.
    const NAME_PREFIX: &'static str;

    /// Describes every user-facing argument.
    ///
    /// Model options are not listed.
    fn arguments() -> Vec<Argument>;

    /// Builds the component and adds it to the context's library.
    fn generate(ctx: &mut Context, params: &Self::Params) -> Result<ComponentId>;
}

/// The widget used to edit an argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArgumentKind {
    /// A number, with an optional unit suffix.
    Number {
        /// The unit displayed after the value.
        suffix: Option<&'static str>,
    },
    /// A boolean.
    Checkbox,
    /// A port specification from the technology.
    PortSpec,
    /// A previously generated component.
    Component {
        /// Text shown while no component is selected.
        placeholder: &'static str,
    },
    /// One value out of a fixed list.
    Select {
        /// The allowed values.
        options: &'static [f64],
        /// The unit displayed after the value.
        suffix: Option<&'static str>,
    },
    /// The component technology.
    Technology,
    /// The component name.
    Name,
    /// An electromagnetic medium.
    Medium,
}

/// A constraint checked by user interfaces before calling a generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Validation {
    /// Any value.
    None,
    /// Values of at least the given bound.
    Min(f64),
    /// Values in the closed range.
    Range(f64, f64),
}

/// Metadata for one generator argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// The parameter name.
    pub name: &'static str,
    /// A one-line description.
    pub description: &'static str,
    /// The editing widget.
    pub kind: ArgumentKind,
    /// The accepted values.
    pub validation: Validation,
}

impl Argument {
    fn new(
        name: &'static str,
        description: &'static str,
        kind: ArgumentKind,
        validation: Validation,
    ) -> Self {
        Self {
            name,
            description,
            kind,
            validation,
        }
    }

    /// A non-negative length in μm.
    pub fn length(name: &'static str, description: &'static str) -> Self {
        Self::new(
            name,
            description,
            ArgumentKind::Number { suffix: Some("μm") },
            Validation::Min(0.),
        )
    }

    /// A signed length in μm.
    pub fn offset(name: &'static str, description: &'static str) -> Self {
        Self::new(
            name,
            description,
            ArgumentKind::Number { suffix: Some("μm") },
            Validation::None,
        )
    }

    /// An angle in degrees between -90 and 90.
    pub fn angle(name: &'static str, description: &'static str) -> Self {
        Self::new(
            name,
            description,
            ArgumentKind::Number { suffix: Some("°") },
            Validation::Range(-90., 90.),
        )
    }

    /// A ratio between 0 and 1.
    pub fn fraction(name: &'static str, description: &'static str) -> Self {
        Self::new(
            name,
            description,
            ArgumentKind::Number { suffix: None },
            Validation::Range(0., 1.),
        )
    }

    /// A boolean switch.
    pub fn flag(name: &'static str, description: &'static str) -> Self {
        Self::new(name, description, ArgumentKind::Checkbox, Validation::None)
    }

    /// A port specification.
    pub fn port_spec(name: &'static str, description: &'static str) -> Self {
        Self::new(name, description, ArgumentKind::PortSpec, Validation::None)
    }

    /// A component generated earlier.
    pub fn component(
        name: &'static str,
        description: &'static str,
        placeholder: &'static str,
    ) -> Self {
        Self::new(
            name,
            description,
            ArgumentKind::Component { placeholder },
            Validation::None,
        )
    }

    /// A chip dimension out of the sizes offered by the foundry.
    pub fn chip_size(name: &'static str, description: &'static str) -> Self {
        Self::new(
            name,
            description,
            ArgumentKind::Select {
                options: &[5000., 5050., 10000., 10100., 20000., 20200.],
                suffix: Some("μm"),
            },
            Validation::None,
        )
    }

    /// A medium.
    pub fn medium(name: &'static str, description: &'static str) -> Self {
        Self::new(name, description, ArgumentKind::Medium, Validation::None)
    }

    /// The component technology, taken from the generation context.
    pub fn technology() -> Self {
        Self::new(
            "technology",
            "Component technology.",
            ArgumentKind::Technology,
            Validation::None,
        )
    }

    /// The component name.
    pub fn name() -> Self {
        Self::new(
            "name",
            "Component name.",
            ArgumentKind::Name,
            Validation::None,
        )
    }

    /// Returns `true` if the argument is a field of the generator parameters.
    ///
    /// The technology comes from the generation context instead.
    pub fn is_parameter(&self) -> bool {
        self.kind != ArgumentKind::Technology
    }
}

/// A port specification given by name or inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortSpecRef {
    /// A port specification registered in the technology.
    Name(ArcStr),
    /// An explicit port specification.
    Spec(Arc<PortSpec>),
}

impl PortSpecRef {
    /// Looks the specification up in `technology` if it is given by name.
    pub fn resolve(&self, technology: &Technology) -> Result<Arc<PortSpec>> {
        match self {
            PortSpecRef::Name(name) => technology.port_spec(name),
            PortSpecRef::Spec(spec) => Ok(spec.clone()),
        }
    }
}

impl From<&str> for PortSpecRef {
    fn from(value: &str) -> Self {
        Self::Name(value.into())
    }
}

impl From<Arc<PortSpec>> for PortSpecRef {
    fn from(value: Arc<PortSpec>) -> Self {
        Self::Spec(value)
    }
}

impl From<PortSpec> for PortSpecRef {
    fn from(value: PortSpec) -> Self {
        Self::Spec(Arc::new(value))
    }
}

/// A type-erased [`Generator`] driven by JSON parameters.
#[derive(Debug, Clone, Copy)]
pub struct GeneratorEntry {
    /// See [`Generator::FUNCTION`].
    pub function: &'static str,
    /// See [`Generator::NAME_PREFIX`].
    pub name_prefix: &'static str,
    arguments: fn() -> Vec<Argument>,
    defaults: fn() -> Result<serde_json::Value>,
    generate: fn(&mut Context, serde_json::Value) -> Result<ComponentId>,
}

fn defaults_json<G: Generator>() -> Result<serde_json::Value> {
    Ok(serde_json::to_value(G::Params::default())?)
}

fn generate_json<G: Generator>(ctx: &mut Context, params: serde_json::Value) -> Result<ComponentId> {
    let params: G::Params = serde_json::from_value(params)?;
    tracing::debug!(function = G::FUNCTION, ?params, "generating component");
    G::generate(ctx, &params)
}

impl GeneratorEntry {
    /// Erases the type of generator `G`.
    pub fn of<G: Generator>() -> Self {
        Self {
            function: G::FUNCTION,
            name_prefix: G::NAME_PREFIX,
            arguments: G::arguments,
            defaults: defaults_json::<G>,
            generate: generate_json::<G>,
        }
    }

    /// See [`Generator::arguments`].
    pub fn arguments(&self) -> Vec<Argument> {
        (self.arguments)()
    }

    /// The default parameters as a JSON object.
    pub fn defaults(&self) -> Result<serde_json::Value> {
        (self.defaults)()
    }

    /// Generates a component from JSON parameters.
    ///
    /// Missing fields take their default values; unknown fields are rejected.
    pub fn generate(&self, ctx: &mut Context, params: serde_json::Value) -> Result<ComponentId> {
        (self.generate)(ctx, params)
    }
}

/// Warns unless the active technology is an LNOI400 variant.
pub(crate) fn check_technology(ctx: &mut Context) {
    if !ctx.technology.name().contains(crate::technology::TECHNOLOGY_NAME) {
        let technology = ctx.technology.name().clone();
        ctx.warn(WarningCause::UnsupportedTechnology {
            technology,
            library: LIBRARY_NAME.into(),
        });
    }
}

/// Records a geometry warning raised by `G`.
pub(crate) fn warn_geometry<G: Generator>(ctx: &mut Context, message: &str) {
    ctx.warn(WarningCause::RiskyGeometry {
        component: G::FUNCTION.into(),
        message: message.into(),
    });
}

/// The name of a component built by `G`.
pub(crate) fn component_name<G: Generator>(name: &Option<ArcStr>) -> ArcStr {
    match name {
        Some(name) if !name.is_empty() => name.clone(),
        _ => ArcStr::from(G::NAME_PREFIX),
    }
}

/// The width of the narrowest strip centered on the port axis.
pub(crate) fn core_width(spec: &PortSpec) -> Result<f64> {
    spec.core()
        .map(|p| p.width)
        .ok_or_else(|| Error::invalid_parameter("port_spec has a path profile with offset 0"))
}
