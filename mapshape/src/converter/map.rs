//! Ajout des formes sur la carte et relecture en géométrie

use tracing::trace;

use super::ShapeConverter;
use crate::backend::{PrimitiveId, RenderBackend};
use crate::drawn::{Drawn, DrawnShape};
use crate::editable::{
    handle_positions, Editable, EditableGroup, EditableNode, EditableShape, GroupKind, MarkerNode,
    PolygonMarkers, PolylineMarkers,
};
use crate::error::{Result, ShapeError};
use crate::geometry::{
    CompoundCurve, Curve, CurvePolygon, Geometry, GeometryCollection, GeometryType, LineString,
    MultiLineString, MultiPoint, MultiPolygon, Polygon,
};
use crate::shape::{LatLng, MapShape, PolygonShape, PolylineShape, Shape};

/// Affiche une forme et retourne les primitives créées
pub fn add_shape_to_map(backend: &mut dyn RenderBackend, shape: &MapShape) -> DrawnShape {
    let drawn = match &shape.shape {
        Shape::LatLng(p) => Drawn::Marker(backend.add_marker(*p)),
        Shape::Polyline(line) => Drawn::Polyline(backend.add_polyline(line)),
        Shape::Polygon(polygon) => Drawn::Polygon(backend.add_polygon(polygon)),
        Shape::MultiLatLng(points) => {
            Drawn::MultiMarker(points.iter().map(|p| backend.add_marker(*p)).collect())
        }
        Shape::MultiPolyline(lines) => {
            Drawn::MultiPolyline(lines.iter().map(|l| backend.add_polyline(l)).collect())
        }
        Shape::MultiPolygon(polygons) => {
            Drawn::MultiPolygon(polygons.iter().map(|p| backend.add_polygon(p)).collect())
        }
        Shape::Collection(shapes) => Drawn::Collection(
            shapes
                .iter()
                .map(|s| add_shape_to_map(backend, s))
                .collect(),
        ),
    };
    DrawnShape::new(shape.geometry_type, drawn)
}

/// Crée une poignée par sommet
///
/// Pour un anneau, le sommet de fermeture (identique au premier) n'a pas de poignée.
fn add_handles(backend: &mut dyn RenderBackend, points: &[LatLng], ring: bool) -> Vec<PrimitiveId> {
    let points = match points {
        [first, .., last] if ring && first == last => &points[..points.len() - 1],
        _ => points,
    };
    points.iter().map(|p| backend.add_marker(*p)).collect()
}

fn add_polyline_markers(backend: &mut dyn RenderBackend, line: &PolylineShape) -> PolylineMarkers {
    let polyline = backend.add_polyline(line);
    let handles = add_handles(backend, &line.points, false);
    PolylineMarkers::new(polyline, handles)
}

fn add_polygon_markers(backend: &mut dyn RenderBackend, shape: &PolygonShape) -> PolygonMarkers {
    let polygon = backend.add_polygon(shape);
    let handles = add_handles(backend, &shape.points, true);
    let holes = shape
        .holes
        .iter()
        .map(|hole| add_handles(backend, hole, true))
        .collect();
    PolygonMarkers::new(polygon, handles, holes)
}

fn add_node(backend: &mut dyn RenderBackend, shape: &Shape) -> EditableNode {
    match shape {
        Shape::LatLng(p) => EditableNode::Marker(MarkerNode::new(backend.add_marker(*p))),
        Shape::Polyline(line) => EditableNode::Polyline(add_polyline_markers(backend, line)),
        Shape::Polygon(polygon) => EditableNode::Polygon(add_polygon_markers(backend, polygon)),
        Shape::MultiLatLng(points) => EditableNode::Group(EditableGroup::new(
            GroupKind::MultiMarker,
            points
                .iter()
                .map(|p| EditableNode::Marker(MarkerNode::new(backend.add_marker(*p))))
                .collect(),
        )),
        Shape::MultiPolyline(lines) => EditableNode::Group(EditableGroup::new(
            GroupKind::MultiPolyline,
            lines
                .iter()
                .map(|l| EditableNode::Polyline(add_polyline_markers(backend, l)))
                .collect(),
        )),
        Shape::MultiPolygon(polygons) => EditableNode::Group(EditableGroup::new(
            GroupKind::MultiPolygon,
            polygons
                .iter()
                .map(|p| EditableNode::Polygon(add_polygon_markers(backend, p)))
                .collect(),
        )),
        Shape::Collection(shapes) => EditableNode::Group(
            EditableGroup::new(
                GroupKind::Collection,
                shapes.iter().map(|s| add_node(backend, &s.shape)).collect(),
            )
            .with_geometry_types(shapes.iter().map(|s| s.geometry_type).collect()),
        ),
    }
}

/// Enfants non supprimés d'un groupe
fn live_children(group: &EditableGroup) -> impl Iterator<Item = &EditableNode> {
    group.children.iter().filter(|c| !c.is_deleted())
}

impl ShapeConverter {
    /// Convertit une géométrie et l'affiche
    pub fn add_to_map(&self, backend: &mut dyn RenderBackend, geometry: &Geometry) -> Result<DrawnShape> {
        let shape = self.to_shape(geometry)?;
        Ok(add_shape_to_map(backend, &shape))
    }

    /// Affiche une forme avec une poignée déplaçable par sommet
    pub fn add_shape_as_markers(&self, backend: &mut dyn RenderBackend, shape: &MapShape) -> EditableShape {
        EditableShape::new(shape.geometry_type, add_node(backend, &shape.shape))
    }

    /// Relit une forme éditable en géométrie
    ///
    /// Une forme invalide est une erreur ; une forme supprimée donne `None`.
    pub fn editable_to_geometry(
        &self,
        editable: &EditableShape,
        backend: &dyn RenderBackend,
    ) -> Result<Option<Geometry>> {
        self.node_to_geometry(editable.geometry_type, &editable.node, backend)
    }

    fn node_to_geometry(
        &self,
        geometry_type: GeometryType,
        node: &EditableNode,
        backend: &dyn RenderBackend,
    ) -> Result<Option<Geometry>> {
        if matches!(
            geometry_type,
            GeometryType::PolyhedralSurface | GeometryType::Tin | GeometryType::Triangle
        ) {
            return Err(ShapeError::UnsupportedGeometryType(geometry_type));
        }
        if !node.is_valid() {
            return Err(ShapeError::invalid_edit_state(
                node.shape_type(),
                format!("not valid to create {}", geometry_type),
            ));
        }
        if node.is_deleted() {
            trace!(%geometry_type, "Editable shape is deleted, no geometry");
            return Ok(None);
        }

        let geometry = match (geometry_type, node) {
            (GeometryType::Point, EditableNode::Marker(marker)) => {
                match marker.marker.and_then(|m| backend.marker_position(m)) {
                    Some(position) => Geometry::Point(self.to_point(position)?),
                    None => return Ok(None),
                }
            }
            (GeometryType::LineString, EditableNode::Polyline(line)) => {
                Geometry::LineString(self.to_line_string(&line.positions(backend))?)
            }
            (GeometryType::CircularString, EditableNode::Polyline(line)) => {
                Geometry::CircularString(self.to_line_string(&line.positions(backend))?)
            }
            (GeometryType::Polygon, EditableNode::Polygon(polygon)) => {
                Geometry::Polygon(self.polygon_from_markers(polygon, backend)?)
            }
            (GeometryType::CurvePolygon, EditableNode::Polygon(polygon)) => {
                let polygon = self.polygon_from_markers(polygon, backend)?;
                let rings = polygon.rings.into_iter().map(Curve::LineString).collect();
                Geometry::CurvePolygon(CurvePolygon::new(rings))
            }
            (GeometryType::MultiPoint, EditableNode::Group(group))
                if group.kind == GroupKind::MultiMarker =>
            {
                let handles: Vec<PrimitiveId> = live_children(group)
                    .filter_map(|c| match c {
                        EditableNode::Marker(m) => m.marker,
                        _ => None,
                    })
                    .collect();
                let points = handle_positions(&handles, backend)
                    .into_iter()
                    .map(|p| self.to_point(p))
                    .collect::<Result<_>>()?;
                Geometry::MultiPoint(MultiPoint::new(points))
            }
            (GeometryType::MultiLineString | GeometryType::CompoundCurve, EditableNode::Group(group))
                if group.kind == GroupKind::MultiPolyline =>
            {
                let lines = live_children(group)
                    .filter_map(|c| match c {
                        EditableNode::Polyline(line) => Some(self.to_line_string(&line.positions(backend))),
                        _ => None,
                    })
                    .collect::<Result<Vec<LineString>>>()?;
                if geometry_type == GeometryType::CompoundCurve {
                    Geometry::CompoundCurve(CompoundCurve::new(lines))
                } else {
                    Geometry::MultiLineString(MultiLineString::new(lines))
                }
            }
            (GeometryType::MultiPolygon, EditableNode::Group(group))
                if group.kind == GroupKind::MultiPolygon =>
            {
                let polygons = live_children(group)
                    .filter_map(|c| match c {
                        EditableNode::Polygon(polygon) => Some(self.polygon_from_markers(polygon, backend)),
                        _ => None,
                    })
                    .collect::<Result<Vec<Polygon>>>()?;
                Geometry::MultiPolygon(MultiPolygon::new(polygons))
            }
            (GeometryType::GeometryCollection, EditableNode::Group(group))
                if group.kind == GroupKind::Collection =>
            {
                let mut geometries = Vec::new();
                for (child_type, child) in group.typed_children() {
                    if let Some(geometry) = self.node_to_geometry(child_type, child, backend)? {
                        geometries.push(geometry);
                    }
                }
                if geometries.is_empty() {
                    return Ok(None);
                }
                Geometry::GeometryCollection(GeometryCollection::new(geometries))
            }
            _ => {
                return Err(ShapeError::IncompatibleShape {
                    shape: node.shape_type(),
                    geometry: geometry_type,
                })
            }
        };

        Ok(Some(geometry))
    }

    fn polygon_from_markers(&self, polygon: &PolygonMarkers, backend: &dyn RenderBackend) -> Result<Polygon> {
        self.to_polygon(&polygon.positions(backend), &polygon.hole_positions(backend))
    }

    /// Relit une forme affichée (positions courantes) en géométrie
    ///
    /// `None` si la forme est supprimée ou si ses primitives ont disparu.
    pub fn drawn_to_geometry(
        &self,
        drawn: &DrawnShape,
        backend: &dyn RenderBackend,
    ) -> Result<Option<Geometry>> {
        match &drawn.drawn {
            Drawn::Editable(editable) => self.editable_to_geometry(editable, backend),
            Drawn::Collection(children) => {
                let mut geometries = Vec::new();
                for child in children {
                    if let Some(geometry) = self.drawn_to_geometry(child, backend)? {
                        geometries.push(geometry);
                    }
                }
                Ok((!geometries.is_empty())
                    .then(|| Geometry::GeometryCollection(GeometryCollection::new(geometries))))
            }
            other => match current_shape(other, backend) {
                Some(shape) => self
                    .to_geometry(&MapShape::new(drawn.geometry_type, shape))
                    .map(Some),
                None => Ok(None),
            },
        }
    }
}

/// Forme correspondant aux positions courantes de primitives simples
fn current_shape(drawn: &Drawn, backend: &dyn RenderBackend) -> Option<Shape> {
    let shape = match drawn {
        Drawn::Marker(id) => Shape::LatLng(backend.marker_position(*id)?),
        Drawn::Polyline(id) => Shape::Polyline(backend.polyline(*id)?),
        Drawn::Polygon(id) => Shape::Polygon(backend.polygon(*id)?),
        Drawn::MultiMarker(ids) => Shape::MultiLatLng(handle_positions(ids, backend)),
        Drawn::MultiPolyline(ids) => {
            Shape::MultiPolyline(ids.iter().filter_map(|id| backend.polyline(*id)).collect())
        }
        Drawn::MultiPolygon(ids) => {
            Shape::MultiPolygon(ids.iter().filter_map(|id| backend.polygon(*id)).collect())
        }
        Drawn::Collection(_) | Drawn::Editable(_) => return None,
    };
    Some(shape)
}
