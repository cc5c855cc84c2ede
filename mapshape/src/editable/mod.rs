//! Formes éditables : primitives associées à des poignées (marqueurs)
//!
//! Chaque modification de poignée (ajout, déplacement, suppression) est
//! répercutée sur la primitive par `update`. Une forme sans poignée est
//! considérée supprimée : `update` retire alors sa primitive, sans erreur.
//!
//! Minimum de poignées : 2 pour une polyligne, 3 pour un anneau de polygone.

mod insert;

pub use insert::{line_insert_index, ring_insert_index};

use tracing::debug;

use crate::backend::{PrimitiveId, RenderBackend};
use crate::bbox::BoundingBox;
use crate::error::{Result, ShapeError};
use crate::geometry::GeometryType;
use crate::projection::WGS84_HALF_WORLD_LON_WIDTH;
use crate::shape::{LatLng, ShapeType};

/// Opérations communes à tous les nœuds éditables
pub trait Editable {
    /// Répercute la position des poignées sur la primitive
    fn update(&mut self, backend: &mut dyn RenderBackend);

    /// Retire la primitive et toutes les poignées
    fn remove(&mut self, backend: &mut dyn RenderBackend);

    /// Vrai si chaque ligne / anneau respecte son minimum de poignées
    fn is_valid(&self) -> bool;

    /// Vrai s'il ne reste aucune poignée
    fn is_deleted(&self) -> bool;

    /// Vrai si la poignée appartient à ce nœud
    fn contains(&self, handle: PrimitiveId) -> bool;

    /// Supprime une poignée puis met à jour ; faux si elle est inconnue
    fn delete(&mut self, handle: PrimitiveId, backend: &mut dyn RenderBackend) -> bool;

    fn set_visible(&self, visible: bool, backend: &mut dyn RenderBackend);

    fn set_z_index(&self, z_index: f32, backend: &mut dyn RenderBackend);

    /// Étend une emprise WGS84 avec la position des poignées
    fn expand_bounding_box(&self, bbox: &mut BoundingBox, backend: &dyn RenderBackend);
}

/// Positions courantes d'une liste de poignées
pub fn handle_positions(handles: &[PrimitiveId], backend: &dyn RenderBackend) -> Vec<LatLng> {
    handles
        .iter()
        .filter_map(|h| backend.marker_position(*h))
        .collect()
}

fn expand_handles(handles: &[PrimitiveId], bbox: &mut BoundingBox, backend: &dyn RenderBackend) {
    for position in handle_positions(handles, backend) {
        bbox.expand_wrapped(position.lng, position.lat, WGS84_HALF_WORLD_LON_WIDTH);
    }
}

fn remove_handle(handles: &mut Vec<PrimitiveId>, handle: PrimitiveId, backend: &mut dyn RenderBackend) -> bool {
    match handles.iter().position(|h| *h == handle) {
        Some(index) => {
            handles.remove(index);
            backend.remove(handle);
            true
        }
        None => false,
    }
}

/// Marqueur seul (point)
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerNode {
    pub marker: Option<PrimitiveId>,
}

impl MarkerNode {
    pub fn new(marker: PrimitiveId) -> Self {
        Self {
            marker: Some(marker),
        }
    }
}

impl Editable for MarkerNode {
    fn update(&mut self, _backend: &mut dyn RenderBackend) {}

    fn remove(&mut self, backend: &mut dyn RenderBackend) {
        if let Some(marker) = self.marker.take() {
            backend.remove(marker);
        }
    }

    fn is_valid(&self) -> bool {
        true
    }

    fn is_deleted(&self) -> bool {
        self.marker.is_none()
    }

    fn contains(&self, handle: PrimitiveId) -> bool {
        self.marker == Some(handle)
    }

    fn delete(&mut self, handle: PrimitiveId, backend: &mut dyn RenderBackend) -> bool {
        if !self.contains(handle) {
            return false;
        }
        self.remove(backend);
        true
    }

    fn set_visible(&self, visible: bool, backend: &mut dyn RenderBackend) {
        if let Some(marker) = self.marker {
            backend.set_visible(marker, visible);
        }
    }

    fn set_z_index(&self, z_index: f32, backend: &mut dyn RenderBackend) {
        if let Some(marker) = self.marker {
            backend.set_z_index(marker, z_index);
        }
    }

    fn expand_bounding_box(&self, bbox: &mut BoundingBox, backend: &dyn RenderBackend) {
        if let Some(marker) = self.marker {
            expand_handles(&[marker], bbox, backend);
        }
    }
}

/// Polyligne et ses poignées
#[derive(Debug, Clone, PartialEq)]
pub struct PolylineMarkers {
    pub polyline: Option<PrimitiveId>,
    pub handles: Vec<PrimitiveId>,
}

impl PolylineMarkers {
    pub fn new(polyline: PrimitiveId, handles: Vec<PrimitiveId>) -> Self {
        Self {
            polyline: Some(polyline),
            handles,
        }
    }

    /// Insère une nouvelle poignée au plus près de la ligne existante
    pub fn add_new(&mut self, handle: PrimitiveId, backend: &mut dyn RenderBackend) {
        let index = match backend.marker_position(handle) {
            Some(position) => line_insert_index(&handle_positions(&self.handles, backend), position),
            None => self.handles.len(),
        };
        self.handles.insert(index, handle);
        self.update(backend);
    }

    pub fn positions(&self, backend: &dyn RenderBackend) -> Vec<LatLng> {
        handle_positions(&self.handles, backend)
    }
}

impl Editable for PolylineMarkers {
    fn update(&mut self, backend: &mut dyn RenderBackend) {
        let Some(polyline) = self.polyline else {
            return;
        };
        if self.is_deleted() {
            debug!(id = polyline.0, "Polyline has no handle left, removing it");
            backend.remove(polyline);
            self.polyline = None;
        } else {
            let points = self.positions(backend);
            backend.set_polyline_points(polyline, points);
        }
    }

    fn remove(&mut self, backend: &mut dyn RenderBackend) {
        if let Some(polyline) = self.polyline.take() {
            backend.remove(polyline);
        }
        for handle in self.handles.drain(..) {
            backend.remove(handle);
        }
    }

    fn is_valid(&self) -> bool {
        self.handles.is_empty() || self.handles.len() >= 2
    }

    fn is_deleted(&self) -> bool {
        self.handles.is_empty()
    }

    fn contains(&self, handle: PrimitiveId) -> bool {
        self.handles.contains(&handle)
    }

    fn delete(&mut self, handle: PrimitiveId, backend: &mut dyn RenderBackend) -> bool {
        let removed = remove_handle(&mut self.handles, handle, backend);
        if removed {
            self.update(backend);
        }
        removed
    }

    fn set_visible(&self, visible: bool, backend: &mut dyn RenderBackend) {
        for id in self.polyline.iter().chain(&self.handles) {
            backend.set_visible(*id, visible);
        }
    }

    fn set_z_index(&self, z_index: f32, backend: &mut dyn RenderBackend) {
        for id in self.polyline.iter().chain(&self.handles) {
            backend.set_z_index(*id, z_index);
        }
    }

    fn expand_bounding_box(&self, bbox: &mut BoundingBox, backend: &dyn RenderBackend) {
        expand_handles(&self.handles, bbox, backend);
    }
}

/// Polygone, poignées de l'anneau extérieur et des trous
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonMarkers {
    pub polygon: Option<PrimitiveId>,
    pub handles: Vec<PrimitiveId>,
    pub holes: Vec<Vec<PrimitiveId>>,
}

fn ring_is_valid(handles: &[PrimitiveId]) -> bool {
    handles.is_empty() || handles.len() >= 3
}

impl PolygonMarkers {
    pub fn new(polygon: PrimitiveId, handles: Vec<PrimitiveId>, holes: Vec<Vec<PrimitiveId>>) -> Self {
        Self {
            polygon: Some(polygon),
            handles,
            holes,
        }
    }

    /// Insère une poignée dans l'anneau extérieur
    pub fn add_new(&mut self, handle: PrimitiveId, backend: &mut dyn RenderBackend) {
        insert_in_ring(&mut self.handles, handle, backend);
        self.update(backend);
    }

    /// Insère une poignée dans un trou existant ; faux si le trou n'existe pas
    pub fn add_new_to_hole(
        &mut self,
        hole: usize,
        handle: PrimitiveId,
        backend: &mut dyn RenderBackend,
    ) -> bool {
        let Some(handles) = self.holes.get_mut(hole) else {
            return false;
        };
        insert_in_ring(handles, handle, backend);
        self.update(backend);
        true
    }

    /// Ajoute un trou complet
    pub fn add_hole(&mut self, handles: Vec<PrimitiveId>, backend: &mut dyn RenderBackend) {
        self.holes.push(handles);
        self.update(backend);
    }

    pub fn positions(&self, backend: &dyn RenderBackend) -> Vec<LatLng> {
        handle_positions(&self.handles, backend)
    }

    /// Positions des trous non supprimés
    pub fn hole_positions(&self, backend: &dyn RenderBackend) -> Vec<Vec<LatLng>> {
        self.holes
            .iter()
            .filter(|h| !h.is_empty())
            .map(|h| handle_positions(h, backend))
            .collect()
    }
}

fn insert_in_ring(handles: &mut Vec<PrimitiveId>, handle: PrimitiveId, backend: &dyn RenderBackend) {
    let index = match backend.marker_position(handle) {
        Some(position) => ring_insert_index(&handle_positions(handles, backend), position),
        None => handles.len(),
    };
    handles.insert(index, handle);
}

impl Editable for PolygonMarkers {
    fn update(&mut self, backend: &mut dyn RenderBackend) {
        let Some(polygon) = self.polygon else {
            return;
        };
        if self.is_deleted() {
            debug!(id = polygon.0, "Polygon has no handle left, removing it");
            self.remove(backend);
        } else {
            let points = self.positions(backend);
            let holes = self.hole_positions(backend);
            backend.set_polygon_points(polygon, points, holes);
        }
    }

    fn remove(&mut self, backend: &mut dyn RenderBackend) {
        if let Some(polygon) = self.polygon.take() {
            backend.remove(polygon);
        }
        for handle in self.handles.drain(..) {
            backend.remove(handle);
        }
        for hole in self.holes.drain(..) {
            for handle in hole {
                backend.remove(handle);
            }
        }
    }

    fn is_valid(&self) -> bool {
        ring_is_valid(&self.handles) && self.holes.iter().all(|h| ring_is_valid(h))
    }

    fn is_deleted(&self) -> bool {
        self.handles.is_empty()
    }

    fn contains(&self, handle: PrimitiveId) -> bool {
        self.handles.contains(&handle) || self.holes.iter().any(|h| h.contains(&handle))
    }

    fn delete(&mut self, handle: PrimitiveId, backend: &mut dyn RenderBackend) -> bool {
        let removed = remove_handle(&mut self.handles, handle, backend)
            || self
                .holes
                .iter_mut()
                .any(|hole| remove_handle(hole, handle, backend));
        if removed {
            self.update(backend);
        }
        removed
    }

    fn set_visible(&self, visible: bool, backend: &mut dyn RenderBackend) {
        let handles = self.handles.iter().chain(self.holes.iter().flatten());
        for id in self.polygon.iter().chain(handles) {
            backend.set_visible(*id, visible);
        }
    }

    fn set_z_index(&self, z_index: f32, backend: &mut dyn RenderBackend) {
        let handles = self.handles.iter().chain(self.holes.iter().flatten());
        for id in self.polygon.iter().chain(handles) {
            backend.set_z_index(*id, z_index);
        }
    }

    fn expand_bounding_box(&self, bbox: &mut BoundingBox, backend: &dyn RenderBackend) {
        expand_handles(&self.handles, bbox, backend);
    }
}

/// Nature d'un groupe de nœuds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    MultiMarker,
    MultiPolyline,
    MultiPolygon,
    Collection,
}

/// Agrégat de nœuds (multi-* ou collection)
///
/// `geometry_types` donne le type de géométrie de chaque enfant d'une
/// collection ; un enfant sans entrée prend le type par défaut de son nœud.
#[derive(Debug, Clone, PartialEq)]
pub struct EditableGroup {
    pub kind: GroupKind,
    pub children: Vec<EditableNode>,
    pub geometry_types: Vec<GeometryType>,
}

impl EditableGroup {
    pub fn new(kind: GroupKind, children: Vec<EditableNode>) -> Self {
        Self {
            kind,
            children,
            geometry_types: Vec::new(),
        }
    }

    pub fn with_geometry_types(mut self, geometry_types: Vec<GeometryType>) -> Self {
        self.geometry_types = geometry_types;
        self
    }

    pub fn shape_type(&self) -> ShapeType {
        match self.kind {
            GroupKind::MultiMarker => ShapeType::MultiMarker,
            GroupKind::MultiPolyline => ShapeType::MultiPolylineMarkers,
            GroupKind::MultiPolygon => ShapeType::MultiPolygonMarkers,
            GroupKind::Collection => ShapeType::CollectionMarkers,
        }
    }

    /// Enfants avec leur type de géométrie
    pub fn typed_children(&self) -> impl Iterator<Item = (GeometryType, &EditableNode)> {
        self.children.iter().enumerate().map(|(i, child)| {
            let geometry_type = self
                .geometry_types
                .get(i)
                .copied()
                .unwrap_or_else(|| child.default_geometry_type());
            (geometry_type, child)
        })
    }

    /// Ajoute un marqueur à un multi-marqueur
    pub fn add_new(&mut self, handle: PrimitiveId, backend: &mut dyn RenderBackend) -> Result<()> {
        if self.kind != GroupKind::MultiMarker {
            return Err(ShapeError::invalid_edit_state(
                self.shape_type(),
                "a new handle can only be added to a multi marker",
            ));
        }
        self.children.push(EditableNode::Marker(MarkerNode::new(handle)));
        self.update(backend);
        Ok(())
    }
}

impl Editable for EditableGroup {
    fn update(&mut self, backend: &mut dyn RenderBackend) {
        for child in &mut self.children {
            child.update(backend);
        }
    }

    fn remove(&mut self, backend: &mut dyn RenderBackend) {
        for child in &mut self.children {
            child.remove(backend);
        }
    }

    fn is_valid(&self) -> bool {
        self.children.iter().all(Editable::is_valid)
    }

    fn is_deleted(&self) -> bool {
        self.children.iter().all(Editable::is_deleted)
    }

    fn contains(&self, handle: PrimitiveId) -> bool {
        self.children.iter().any(|c| c.contains(handle))
    }

    fn delete(&mut self, handle: PrimitiveId, backend: &mut dyn RenderBackend) -> bool {
        self.children
            .iter_mut()
            .find(|c| c.contains(handle))
            .is_some_and(|c| c.delete(handle, backend))
    }

    fn set_visible(&self, visible: bool, backend: &mut dyn RenderBackend) {
        for child in &self.children {
            child.set_visible(visible, backend);
        }
    }

    fn set_z_index(&self, z_index: f32, backend: &mut dyn RenderBackend) {
        for child in &self.children {
            child.set_z_index(z_index, backend);
        }
    }

    fn expand_bounding_box(&self, bbox: &mut BoundingBox, backend: &dyn RenderBackend) {
        for child in &self.children {
            child.expand_bounding_box(bbox, backend);
        }
    }
}

/// Nœud de l'arbre éditable
#[derive(Debug, Clone, PartialEq)]
pub enum EditableNode {
    Marker(MarkerNode),
    Polyline(PolylineMarkers),
    Polygon(PolygonMarkers),
    Group(EditableGroup),
}

impl EditableNode {
    fn as_editable(&self) -> &dyn Editable {
        match self {
            Self::Marker(n) => n,
            Self::Polyline(n) => n,
            Self::Polygon(n) => n,
            Self::Group(n) => n,
        }
    }

    fn as_editable_mut(&mut self) -> &mut dyn Editable {
        match self {
            Self::Marker(n) => n,
            Self::Polyline(n) => n,
            Self::Polygon(n) => n,
            Self::Group(n) => n,
        }
    }

    pub fn shape_type(&self) -> ShapeType {
        match self {
            Self::Marker(_) => ShapeType::Marker,
            Self::Polyline(_) => ShapeType::PolylineMarkers,
            Self::Polygon(_) => ShapeType::PolygonMarkers,
            Self::Group(g) => g.shape_type(),
        }
    }

    /// Type de géométrie déduit de la nature du nœud
    pub fn default_geometry_type(&self) -> GeometryType {
        match self {
            Self::Marker(_) => GeometryType::Point,
            Self::Polyline(_) => GeometryType::LineString,
            Self::Polygon(_) => GeometryType::Polygon,
            Self::Group(group) => match group.kind {
                GroupKind::MultiMarker => GeometryType::MultiPoint,
                GroupKind::MultiPolyline => GeometryType::MultiLineString,
                GroupKind::MultiPolygon => GeometryType::MultiPolygon,
                GroupKind::Collection => GeometryType::GeometryCollection,
            },
        }
    }
}

impl Editable for EditableNode {
    fn update(&mut self, backend: &mut dyn RenderBackend) {
        self.as_editable_mut().update(backend)
    }

    fn remove(&mut self, backend: &mut dyn RenderBackend) {
        self.as_editable_mut().remove(backend)
    }

    fn is_valid(&self) -> bool {
        self.as_editable().is_valid()
    }

    fn is_deleted(&self) -> bool {
        self.as_editable().is_deleted()
    }

    fn contains(&self, handle: PrimitiveId) -> bool {
        self.as_editable().contains(handle)
    }

    fn delete(&mut self, handle: PrimitiveId, backend: &mut dyn RenderBackend) -> bool {
        self.as_editable_mut().delete(handle, backend)
    }

    fn set_visible(&self, visible: bool, backend: &mut dyn RenderBackend) {
        self.as_editable().set_visible(visible, backend)
    }

    fn set_z_index(&self, z_index: f32, backend: &mut dyn RenderBackend) {
        self.as_editable().set_z_index(z_index, backend)
    }

    fn expand_bounding_box(&self, bbox: &mut BoundingBox, backend: &dyn RenderBackend) {
        self.as_editable().expand_bounding_box(bbox, backend)
    }
}

/// Forme éditable, avec le type de la géométrie d'origine
#[derive(Debug, Clone, PartialEq)]
pub struct EditableShape {
    pub geometry_type: GeometryType,
    pub node: EditableNode,
}

impl EditableShape {
    pub fn new(geometry_type: GeometryType, node: EditableNode) -> Self {
        Self {
            geometry_type,
            node,
        }
    }

    pub fn shape_type(&self) -> ShapeType {
        self.node.shape_type()
    }
}

impl Editable for EditableShape {
    fn update(&mut self, backend: &mut dyn RenderBackend) {
        self.node.update(backend)
    }

    fn remove(&mut self, backend: &mut dyn RenderBackend) {
        self.node.remove(backend)
    }

    fn is_valid(&self) -> bool {
        self.node.is_valid()
    }

    fn is_deleted(&self) -> bool {
        self.node.is_deleted()
    }

    fn contains(&self, handle: PrimitiveId) -> bool {
        self.node.contains(handle)
    }

    fn delete(&mut self, handle: PrimitiveId, backend: &mut dyn RenderBackend) -> bool {
        self.node.delete(handle, backend)
    }

    fn set_visible(&self, visible: bool, backend: &mut dyn RenderBackend) {
        self.node.set_visible(visible, backend)
    }

    fn set_z_index(&self, z_index: f32, backend: &mut dyn RenderBackend) {
        self.node.set_z_index(z_index, backend)
    }

    fn expand_bounding_box(&self, bbox: &mut BoundingBox, backend: &dyn RenderBackend) {
        self.node.expand_bounding_box(bbox, backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::shape::{PolygonShape, PolylineShape};

    fn polyline(backend: &mut MemoryBackend, points: &[LatLng]) -> PolylineMarkers {
        let line = backend.add_polyline(&PolylineShape::new(points.to_vec()));
        let handles = points.iter().map(|p| backend.add_marker(*p)).collect();
        PolylineMarkers::new(line, handles)
    }

    fn triangle(backend: &mut MemoryBackend) -> PolygonMarkers {
        let points = vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 2.0),
            LatLng::new(2.0, 1.0),
        ];
        let polygon = backend.add_polygon(&PolygonShape::new(points.clone(), Vec::new()));
        let handles = points.iter().map(|p| backend.add_marker(*p)).collect();
        PolygonMarkers::new(polygon, handles, Vec::new())
    }

    #[test]
    fn test_polyline_minimum_handles() {
        let mut backend = MemoryBackend::new();
        let mut line = polyline(
            &mut backend,
            &[
                LatLng::new(0.0, 0.0),
                LatLng::new(0.0, 1.0),
                LatLng::new(0.0, 2.0),
            ],
        );
        let primitive = line.polyline.unwrap();

        assert!(line.delete(line.handles[0], &mut backend));
        assert!(line.is_valid());
        assert_eq!(backend.polyline(primitive).unwrap().points.len(), 2);

        // Une seule poignée : invalide mais pas supprimée
        assert!(line.delete(line.handles[0], &mut backend));
        assert!(!line.is_valid());
        assert!(!line.is_deleted());

        // Dernière poignée : supprimée, primitive retirée
        assert!(line.delete(line.handles[0], &mut backend));
        assert!(line.is_deleted());
        assert!(line.is_valid());
        assert!(!backend.contains(primitive));
        assert!(backend.is_empty());
    }

    #[test]
    fn test_update_follows_drag() {
        let mut backend = MemoryBackend::new();
        let mut polygon = triangle(&mut backend);
        let id = polygon.polygon.unwrap();

        backend.move_marker(polygon.handles[2], LatLng::new(3.0, 1.0));
        polygon.update(&mut backend);

        assert_eq!(backend.polygon(id).unwrap().points[2], LatLng::new(3.0, 1.0));
    }

    #[test]
    fn test_polygon_hole_deletion_updates_parent() {
        let mut backend = MemoryBackend::new();
        let mut polygon = triangle(&mut backend);
        let hole: Vec<PrimitiveId> = [
            LatLng::new(0.5, 0.8),
            LatLng::new(0.5, 1.2),
            LatLng::new(1.0, 1.0),
        ]
        .iter()
        .map(|p| backend.add_marker(*p))
        .collect();
        polygon.add_hole(hole.clone(), &mut backend);

        let id = polygon.polygon.unwrap();
        assert_eq!(backend.polygon(id).unwrap().holes.len(), 1);

        // Trou à 2 poignées : polygone invalide
        assert!(polygon.delete(hole[0], &mut backend));
        assert!(!polygon.is_valid());

        // Trou vidé : ignoré, le polygone redevient valide
        polygon.delete(hole[1], &mut backend);
        polygon.delete(hole[2], &mut backend);
        assert!(polygon.is_valid());
        assert!(backend.polygon(id).unwrap().holes.is_empty());
    }

    #[test]
    fn test_polygon_outer_deletion_removes_holes() {
        let mut backend = MemoryBackend::new();
        let mut polygon = triangle(&mut backend);
        let hole: Vec<PrimitiveId> = [
            LatLng::new(0.5, 0.8),
            LatLng::new(0.5, 1.2),
            LatLng::new(1.0, 1.0),
        ]
        .iter()
        .map(|p| backend.add_marker(*p))
        .collect();
        polygon.add_hole(hole.clone(), &mut backend);

        for handle in polygon.handles.clone() {
            assert!(polygon.delete(handle, &mut backend));
        }

        assert!(polygon.is_deleted());
        assert!(polygon.polygon.is_none());
        assert!(polygon.holes.is_empty());
        assert!(hole.iter().all(|h| !backend.contains(*h)));
        assert!(backend.is_empty());
    }

    #[test]
    fn test_polygon_add_new_between_neighbours() {
        let mut backend = MemoryBackend::new();
        let mut polygon = triangle(&mut backend);
        let handle = backend.add_marker(LatLng::new(-0.1, 1.0));
        polygon.add_new(handle, &mut backend);

        assert_eq!(polygon.handles.len(), 4);
        assert_eq!(polygon.handles[1], handle);
    }

    #[test]
    fn test_group_uniform_traversal() {
        let mut backend = MemoryBackend::new();
        let a = polyline(&mut backend, &[LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0)]);
        let b = polyline(&mut backend, &[LatLng::new(5.0, 5.0), LatLng::new(6.0, 6.0)]);
        let target = b.handles[1];
        let mut group = EditableGroup::new(
            GroupKind::MultiPolyline,
            vec![EditableNode::Polyline(a), EditableNode::Polyline(b)],
        );

        assert!(group.is_valid());
        assert!(group.delete(target, &mut backend));
        assert!(!group.is_valid());
        assert!(!group.is_deleted());

        let mut bbox = BoundingBox::inverted();
        group.expand_bounding_box(&mut bbox, &backend);
        assert_eq!(bbox, BoundingBox::new(0.0, 0.0, 5.0, 5.0));

        group.remove(&mut backend);
        assert!(group.is_deleted());
        assert!(backend.is_empty());
    }

    #[test]
    fn test_multi_marker_add_new() {
        let mut backend = MemoryBackend::new();
        let first = backend.add_marker(LatLng::new(0.0, 0.0));
        let mut group = EditableGroup::new(
            GroupKind::MultiMarker,
            vec![EditableNode::Marker(MarkerNode::new(first))],
        );

        let handle = backend.add_marker(LatLng::new(1.0, 1.0));
        group.add_new(handle, &mut backend).unwrap();
        assert_eq!(group.children.len(), 2);
        assert!(group.contains(handle));

        let mut lines = EditableGroup::new(GroupKind::MultiPolyline, Vec::new());
        let err = lines.add_new(handle, &mut backend).unwrap_err();
        assert!(matches!(
            err,
            ShapeError::InvalidEditState {
                shape: ShapeType::MultiPolylineMarkers,
                ..
            }
        ));
        assert!(lines.children.is_empty());
    }

    #[test]
    fn test_unknown_handle() {
        let mut backend = MemoryBackend::new();
        let mut node = EditableNode::Marker(MarkerNode::new(backend.add_marker(LatLng::new(0.0, 0.0))));
        assert!(!node.delete(PrimitiveId(999), &mut backend));
        assert!(!node.is_deleted());
        assert_eq!(node.shape_type(), ShapeType::Marker);
    }
}
