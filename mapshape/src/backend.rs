//! Interface avec le moteur de rendu carte
//!
//! Le moteur instancie les primitives (marqueur, polyligne, polygone),
//! rapporte leurs positions courantes et applique visibilité / ordre Z.
//! Il n'est appelé que depuis le thread propriétaire du registre.

use std::collections::BTreeMap;

use crate::shape::{LatLng, PolygonShape, PolylineShape};

/// Identifiant d'une primitive affichée
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveId(pub u64);

/// Moteur de rendu
pub trait RenderBackend {
    fn add_marker(&mut self, position: LatLng) -> PrimitiveId;

    fn add_polyline(&mut self, polyline: &PolylineShape) -> PrimitiveId;

    fn add_polygon(&mut self, polygon: &PolygonShape) -> PrimitiveId;

    /// Position courante d'un marqueur (éventuellement déplacé)
    fn marker_position(&self, id: PrimitiveId) -> Option<LatLng>;

    /// Sommets courants d'une polyligne
    fn polyline(&self, id: PrimitiveId) -> Option<PolylineShape>;

    /// Sommets courants d'un polygone
    fn polygon(&self, id: PrimitiveId) -> Option<PolygonShape>;

    fn set_polyline_points(&mut self, id: PrimitiveId, points: Vec<LatLng>);

    fn set_polygon_points(&mut self, id: PrimitiveId, points: Vec<LatLng>, holes: Vec<Vec<LatLng>>);

    fn set_visible(&mut self, id: PrimitiveId, visible: bool);

    fn set_z_index(&mut self, id: PrimitiveId, z_index: f32);

    fn remove(&mut self, id: PrimitiveId);
}

/// Primitive stockée par [`MemoryBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Marker(LatLng),
    Polyline(PolylineShape),
    Polygon(PolygonShape),
}

/// État d'une primitive en mémoire
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveState {
    pub primitive: Primitive,
    pub visible: bool,
    pub z_index: f32,
}

/// Moteur de rendu en mémoire (sans affichage)
#[derive(Debug, Default)]
pub struct MemoryBackend {
    next_id: u64,
    primitives: BTreeMap<PrimitiveId, PrimitiveState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nombre de primitives vivantes
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn get(&self, id: PrimitiveId) -> Option<&PrimitiveState> {
        self.primitives.get(&id)
    }

    pub fn contains(&self, id: PrimitiveId) -> bool {
        self.primitives.contains_key(&id)
    }

    /// Déplace un marqueur, comme un glisser-déposer
    pub fn move_marker(&mut self, id: PrimitiveId, position: LatLng) {
        if let Some(PrimitiveState {
            primitive: Primitive::Marker(current),
            ..
        }) = self.primitives.get_mut(&id)
        {
            *current = position;
        }
    }

    fn insert(&mut self, primitive: Primitive) -> PrimitiveId {
        self.next_id += 1;
        let id = PrimitiveId(self.next_id);
        self.primitives.insert(
            id,
            PrimitiveState {
                primitive,
                visible: true,
                z_index: 0.0,
            },
        );
        id
    }
}

impl RenderBackend for MemoryBackend {
    fn add_marker(&mut self, position: LatLng) -> PrimitiveId {
        self.insert(Primitive::Marker(position))
    }

    fn add_polyline(&mut self, polyline: &PolylineShape) -> PrimitiveId {
        let id = self.insert(Primitive::Polyline(polyline.clone()));
        if let Some(z) = polyline.elevation {
            self.set_z_index(id, z as f32);
        }
        id
    }

    fn add_polygon(&mut self, polygon: &PolygonShape) -> PrimitiveId {
        let id = self.insert(Primitive::Polygon(polygon.clone()));
        if let Some(z) = polygon.elevation {
            self.set_z_index(id, z as f32);
        }
        id
    }

    fn marker_position(&self, id: PrimitiveId) -> Option<LatLng> {
        match self.primitives.get(&id)?.primitive {
            Primitive::Marker(position) => Some(position),
            _ => None,
        }
    }

    fn polyline(&self, id: PrimitiveId) -> Option<PolylineShape> {
        match &self.primitives.get(&id)?.primitive {
            Primitive::Polyline(polyline) => Some(polyline.clone()),
            _ => None,
        }
    }

    fn polygon(&self, id: PrimitiveId) -> Option<PolygonShape> {
        match &self.primitives.get(&id)?.primitive {
            Primitive::Polygon(polygon) => Some(polygon.clone()),
            _ => None,
        }
    }

    fn set_polyline_points(&mut self, id: PrimitiveId, points: Vec<LatLng>) {
        if let Some(PrimitiveState {
            primitive: Primitive::Polyline(polyline),
            ..
        }) = self.primitives.get_mut(&id)
        {
            polyline.points = points;
        }
    }

    fn set_polygon_points(&mut self, id: PrimitiveId, points: Vec<LatLng>, holes: Vec<Vec<LatLng>>) {
        if let Some(PrimitiveState {
            primitive: Primitive::Polygon(polygon),
            ..
        }) = self.primitives.get_mut(&id)
        {
            polygon.points = points;
            polygon.holes = holes;
        }
    }

    fn set_visible(&mut self, id: PrimitiveId, visible: bool) {
        if let Some(state) = self.primitives.get_mut(&id) {
            state.visible = visible;
        }
    }

    fn set_z_index(&mut self, id: PrimitiveId, z_index: f32) {
        if let Some(state) = self.primitives.get_mut(&id) {
            state.z_index = z_index;
        }
    }

    fn remove(&mut self, id: PrimitiveId) {
        self.primitives.remove(&id);
    }
}
