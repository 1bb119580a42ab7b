//! Mask layers, mask expressions, media and extrusion rules.

use std::fmt::Display;

use arcstr::ArcStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A mask layer, identified by its GDS layer and datatype numbers.
#[derive(
    Debug, Copy, Clone, Default, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize,
)]
pub struct Layer(pub u32, pub u32);

impl Layer {
    /// Creates a new layer from a layer number and datatype.
    #[inline]
    pub const fn new(layer: u32, datatype: u32) -> Self {
        Self(layer, datatype)
    }
}

impl From<(u32, u32)> for Layer {
    fn from(value: (u32, u32)) -> Self {
        Self(value.0, value.1)
    }
}

impl Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// The definition of a named mask layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    /// The layer/datatype pair.
    pub layer: Layer,
    /// A human readable description.
    pub description: ArcStr,
    /// Rendering color, as an `#rrggbbaa` hex string.
    pub color: ArcStr,
    /// Rendering fill pattern.
    pub pattern: ArcStr,
}

impl LayerSpec {
    /// Creates a new layer specification.
    pub fn new(
        layer: impl Into<Layer>,
        description: impl Into<ArcStr>,
        color: impl Into<ArcStr>,
        pattern: impl Into<ArcStr>,
    ) -> Self {
        Self {
            layer: layer.into(),
            description: description.into(),
            color: color.into(),
            pattern: pattern.into(),
        }
    }
}

/// A reference to a layer, either by name or by layer/datatype pair.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayerRef {
    /// A layer name in the technology's layer table.
    Name(ArcStr),
    /// An explicit layer/datatype pair.
    Layer(Layer),
}

impl From<&str> for LayerRef {
    fn from(value: &str) -> Self {
        Self::Name(value.into())
    }
}

impl From<ArcStr> for LayerRef {
    fn from(value: ArcStr) -> Self {
        Self::Name(value)
    }
}

impl From<Layer> for LayerRef {
    fn from(value: Layer) -> Self {
        Self::Layer(value)
    }
}

impl From<(u32, u32)> for LayerRef {
    fn from(value: (u32, u32)) -> Self {
        Self::Layer(value.into())
    }
}

impl Display for LayerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{name}"),
            Self::Layer(layer) => write!(f, "{layer}"),
        }
    }
}

/// A boolean operation combining the two operands of a [`MaskSpec`].
#[derive(Debug, Copy, Clone, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum MaskOperation {
    /// Points in either operand.
    #[default]
    #[serde(rename = "+")]
    Union,
    /// Points in the first operand but not the second.
    #[serde(rename = "-")]
    Difference,
    /// Points in both operands.
    #[serde(rename = "*")]
    Intersection,
    /// Points in exactly one operand.
    #[serde(rename = "^")]
    SymmetricDifference,
}

/// A 2D mask defined as a boolean combination of layers.
///
/// Each operand is the union of its layers. A mask with no layers at all
/// stands for the bounding box of the component being extruded.
#[derive(Debug, Clone, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct MaskSpec {
    /// Layers in the first operand.
    pub operand1: Vec<Layer>,
    /// Layers in the second operand.
    pub operand2: Vec<Layer>,
    /// The operation combining the operands.
    pub operation: MaskOperation,
}

impl MaskSpec {
    /// The mask covering the bounds of the whole component.
    pub fn bounds() -> Self {
        Self::default()
    }

    /// The mask given by a single layer.
    pub fn layer(layer: impl Into<Layer>) -> Self {
        Self {
            operand1: vec![layer.into()],
            ..Default::default()
        }
    }

    /// The union of several layers.
    pub fn union(layers: impl IntoIterator<Item = Layer>) -> Self {
        Self {
            operand1: layers.into_iter().collect(),
            ..Default::default()
        }
    }

    /// The layer `a` with `b` removed.
    pub fn difference(a: impl Into<Layer>, b: impl Into<Layer>) -> Self {
        Self {
            operand1: vec![a.into()],
            operand2: vec![b.into()],
            operation: MaskOperation::Difference,
        }
    }

    /// Returns `true` if this mask covers the component bounds.
    pub fn is_bounds(&self) -> bool {
        self.operand1.is_empty() && self.operand2.is_empty()
    }

    /// Iterates over every layer named by this mask.
    pub fn layers(&self) -> impl Iterator<Item = Layer> + '_ {
        self.operand1.iter().chain(self.operand2.iter()).copied()
    }
}

/// An electromagnetic medium, passed through to simulators unevaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medium {
    /// The medium name.
    pub name: ArcStr,
    /// Relative permittivity.
    pub permittivity: f64,
}

impl Medium {
    /// Creates a new medium.
    pub fn new(name: impl Into<ArcStr>, permittivity: f64) -> Self {
        Self {
            name: name.into(),
            permittivity,
        }
    }
}

/// A rule turning a 2D mask into a 3D slab of material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrusionSpec {
    /// The mask to extrude.
    pub mask: MaskSpec,
    /// The material of the slab.
    pub medium: Medium,
    /// Vertical extent `(lo, hi)`. Either end may be infinite.
    #[serde(with = "limits")]
    pub limits: (f64, f64),
    /// Sidewall angle in degrees; positive values narrow the slab towards the top.
    #[serde(default)]
    pub sidewall_angle: f64,
}

impl ExtrusionSpec {
    /// Creates a new extrusion rule.
    pub fn new(mask: MaskSpec, medium: Medium, limits: (f64, f64), sidewall_angle: f64) -> Self {
        Self {
            mask,
            medium,
            limits,
            sidewall_angle,
        }
    }
}

/// (De)serialization of vertical limits, writing infinities as `"inf"` and `"-inf"`.
pub(crate) mod limits {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Bound {
        Finite(f64),
        Text(ArcStr),
    }

    impl Bound {
        fn from_f64(value: f64) -> Self {
            if value == f64::INFINITY {
                Self::Text(arcstr::literal!("inf"))
            } else if value == f64::NEG_INFINITY {
                Self::Text(arcstr::literal!("-inf"))
            } else {
                Self::Finite(value)
            }
        }

        fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
            match self {
                Self::Finite(value) => Ok(value),
                Self::Text(text) => match text.as_str() {
                    "inf" | "+inf" => Ok(f64::INFINITY),
                    "-inf" => Ok(f64::NEG_INFINITY),
                    other => Err(E::custom(format!("invalid limit `{other}`"))),
                },
            }
        }
    }

    pub fn serialize<S: Serializer>(value: &(f64, f64), serializer: S) -> Result<S::Ok, S::Error> {
        (Bound::from_f64(value.0), Bound::from_f64(value.1)).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<(f64, f64), D::Error> {
        let (lo, hi) = <(Bound, Bound)>::deserialize(deserializer)?;
        Ok((lo.into_f64()?, hi.into_f64()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinite_limits_serialize_as_strings() {
        let spec = ExtrusionSpec::new(
            MaskSpec::bounds(),
            Medium::new("si", 11.7),
            (f64::NEG_INFINITY, -4.7),
            0.,
        );
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["limits"], serde_json::json!(["-inf", -4.7]));
        let back: ExtrusionSpec = serde_json::from_value(json).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn mask_operations_use_symbols() {
        let mask = MaskSpec::difference((3, 1), (3, 0));
        let json = serde_json::to_value(&mask).unwrap();
        assert_eq!(json["operation"], "-");
        assert_eq!(json["operand1"], serde_json::json!([[3, 1]]));
        assert!(!mask.is_bounds());
        assert!(MaskSpec::bounds().is_bounds());
    }

    #[test]
    fn layer_refs_deserialize_untagged() {
        let by_name: LayerRef = serde_json::from_str("\"TL\"").unwrap();
        assert_eq!(by_name, LayerRef::from("TL"));
        let by_layer: LayerRef = serde_json::from_str("[21, 0]").unwrap();
        assert_eq!(by_layer, LayerRef::from((21, 0)));
    }
}
