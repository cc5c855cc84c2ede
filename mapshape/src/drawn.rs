//! Formes affichées sur la carte (primitives du moteur de rendu)

use crate::backend::{PrimitiveId, RenderBackend};
use crate::bbox::BoundingBox;
use crate::editable::{Editable, EditableShape};
use crate::geometry::GeometryType;
use crate::projection::WGS84_HALF_WORLD_LON_WIDTH;
use crate::shape::{LatLng, ShapeType};

/// Primitives créées pour une forme
#[derive(Debug, Clone, PartialEq)]
pub enum Drawn {
    Marker(PrimitiveId),
    Polyline(PrimitiveId),
    Polygon(PrimitiveId),
    MultiMarker(Vec<PrimitiveId>),
    MultiPolyline(Vec<PrimitiveId>),
    MultiPolygon(Vec<PrimitiveId>),
    Collection(Vec<DrawnShape>),
    Editable(EditableShape),
}

/// Forme affichée, avec le type de la géométrie d'origine
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnShape {
    pub geometry_type: GeometryType,
    pub drawn: Drawn,
}

impl DrawnShape {
    pub fn new(geometry_type: GeometryType, drawn: Drawn) -> Self {
        Self {
            geometry_type,
            drawn,
        }
    }

    pub fn shape_type(&self) -> ShapeType {
        match &self.drawn {
            Drawn::Marker(_) => ShapeType::Marker,
            Drawn::Polyline(_) => ShapeType::Polyline,
            Drawn::Polygon(_) => ShapeType::Polygon,
            Drawn::MultiMarker(_) => ShapeType::MultiLatLng,
            Drawn::MultiPolyline(_) => ShapeType::MultiPolyline,
            Drawn::MultiPolygon(_) => ShapeType::MultiPolygon,
            Drawn::Collection(_) => ShapeType::Collection,
            Drawn::Editable(editable) => editable.shape_type(),
        }
    }

    /// Retire toutes les primitives de la carte
    pub fn remove(&mut self, backend: &mut dyn RenderBackend) {
        match &mut self.drawn {
            Drawn::Editable(editable) => editable.remove(backend),
            Drawn::Collection(shapes) => {
                for shape in shapes {
                    shape.remove(backend);
                }
            }
            other => flat_ids(other).iter().for_each(|id| backend.remove(*id)),
        }
    }

    pub fn set_visible(&self, visible: bool, backend: &mut dyn RenderBackend) {
        match &self.drawn {
            Drawn::Editable(editable) => editable.set_visible(visible, backend),
            Drawn::Collection(shapes) => {
                for shape in shapes {
                    shape.set_visible(visible, backend);
                }
            }
            other => flat_ids(other)
                .iter()
                .for_each(|id| backend.set_visible(*id, visible)),
        }
    }

    pub fn set_z_index(&self, z_index: f32, backend: &mut dyn RenderBackend) {
        match &self.drawn {
            Drawn::Editable(editable) => editable.set_z_index(z_index, backend),
            Drawn::Collection(shapes) => {
                for shape in shapes {
                    shape.set_z_index(z_index, backend);
                }
            }
            other => flat_ids(other)
                .iter()
                .for_each(|id| backend.set_z_index(*id, z_index)),
        }
    }

    /// Étend une emprise WGS84 avec les positions courantes des primitives
    pub fn expand_bounding_box(&self, bbox: &mut BoundingBox, backend: &dyn RenderBackend) {
        match &self.drawn {
            Drawn::Editable(editable) => editable.expand_bounding_box(bbox, backend),
            Drawn::Collection(shapes) => {
                for shape in shapes {
                    shape.expand_bounding_box(bbox, backend);
                }
            }
            other => {
                for id in flat_ids(other) {
                    for p in primitive_points(*id, backend) {
                        bbox.expand_wrapped(p.lng, p.lat, WGS84_HALF_WORLD_LON_WIDTH);
                    }
                }
            }
        }
    }

    /// Emprise WGS84 courante de la forme
    pub fn bounding_box(&self, backend: &dyn RenderBackend) -> BoundingBox {
        let mut bbox = BoundingBox::inverted();
        self.expand_bounding_box(&mut bbox, backend);
        bbox
    }
}

/// Primitives directes (hors collection et forme éditable)
fn flat_ids(drawn: &Drawn) -> &[PrimitiveId] {
    match drawn {
        Drawn::Marker(id) | Drawn::Polyline(id) | Drawn::Polygon(id) => std::slice::from_ref(id),
        Drawn::MultiMarker(ids) | Drawn::MultiPolyline(ids) | Drawn::MultiPolygon(ids) => ids,
        Drawn::Collection(_) | Drawn::Editable(_) => &[],
    }
}

/// Sommets courants d'une primitive, quel que soit son type
fn primitive_points(id: PrimitiveId, backend: &dyn RenderBackend) -> Vec<LatLng> {
    if let Some(position) = backend.marker_position(id) {
        return vec![position];
    }
    if let Some(polyline) = backend.polyline(id) {
        return polyline.points;
    }
    backend
        .polygon(id)
        .map(|polygon| polygon.points)
        .unwrap_or_default()
}
