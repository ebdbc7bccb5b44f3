//! Vertical layout positions for the proximity test

use crate::config::GroupingConfig;
use scraper::ElementRef;

/// Source of a node's vertical on-screen offset
///
/// Without layout information the offset is unknown and nodes are never
/// related by proximity.
pub trait Geometry {
    fn vertical_offset(&self, node: ElementRef<'_>) -> Option<f64>;
}

/// No layout information
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeometry;

impl Geometry for NoGeometry {
    fn vertical_offset(&self, _node: ElementRef<'_>) -> Option<f64> {
        None
    }
}

/// Offsets recorded in an attribute of each node, e.g. by a page snapshot tool
#[derive(Debug, Clone)]
pub struct AttributeGeometry {
    attribute: String,
}

impl AttributeGeometry {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
        }
    }

    /// Geometry from the configured position attribute, if any
    pub fn from_config(config: &GroupingConfig) -> Option<Self> {
        config.position_attribute.as_deref().map(Self::new)
    }
}

impl Geometry for AttributeGeometry {
    fn vertical_offset(&self, node: ElementRef<'_>) -> Option<f64> {
        node.value()
            .attr(&self.attribute)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|offset| offset.is_finite())
    }
}

impl<F> Geometry for F
where
    F: Fn(ElementRef<'_>) -> Option<f64>,
{
    fn vertical_offset(&self, node: ElementRef<'_>) -> Option<f64> {
        self(node)
    }
}

/// Vertical distance between two nodes, when both positions are known
pub fn vertical_distance(
    geometry: &dyn Geometry,
    a: ElementRef<'_>,
    b: ElementRef<'_>,
) -> Option<f64> {
    Some((geometry.vertical_offset(a)? - geometry.vertical_offset(b)?).abs())
}
