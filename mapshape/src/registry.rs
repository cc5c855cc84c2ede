//! Registre des formes affichées, par entité
//!
//! Une entrée par clé (source, table, identifiant d'entité). Les suppressions
//! retirent aussi les primitives du moteur de rendu.

use std::collections::HashMap;

use tracing::debug;

use crate::backend::RenderBackend;
use crate::bbox::BoundingBox;
use crate::drawn::DrawnShape;
use crate::geometry::GeometryType;
use crate::projection::WGS84_HALF_WORLD_LON_WIDTH;
use crate::shape::ShapeType;

/// Clé composite d'une entité
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureKey {
    pub source: String,
    pub table: String,
    pub feature_id: i64,
}

impl FeatureKey {
    pub fn new(source: impl Into<String>, table: impl Into<String>, feature_id: i64) -> Self {
        Self {
            source: source.into(),
            table: table.into(),
            feature_id,
        }
    }
}

/// Formes d'une entité
#[derive(Debug, Default)]
pub struct FeatureShapeEntry {
    pub shapes: Vec<DrawnShape>,
    /// Formes annexes (étiquettes, sélection), retirées avec l'entité
    pub metadata_shapes: Vec<DrawnShape>,
}

impl FeatureShapeEntry {
    pub fn has_shapes(&self) -> bool {
        !self.shapes.is_empty()
    }

    pub fn count(&self) -> usize {
        self.shapes.len()
    }

    /// Retire toutes les formes de la carte
    pub fn remove(&mut self, backend: &mut dyn RenderBackend) {
        for mut shape in self.shapes.drain(..) {
            shape.remove(backend);
        }
        self.remove_metadata(backend);
    }

    pub fn remove_metadata(&mut self, backend: &mut dyn RenderBackend) {
        for mut shape in self.metadata_shapes.drain(..) {
            shape.remove(backend);
        }
    }

    /// Vrai si au moins une forme recoupe l'emprise
    fn overlaps(&self, viewport: &BoundingBox, backend: &dyn RenderBackend) -> bool {
        self.shapes.iter().any(|shape| {
            let allow_empty = shape.geometry_type == GeometryType::Point;
            shape
                .bounding_box(backend)
                .overlap_wrapped(viewport, WGS84_HALF_WORLD_LON_WIDTH, allow_empty)
                .is_some()
        })
    }
}

/// Registre des formes par entité
#[derive(Debug, Default)]
pub struct FeatureShapes {
    entries: HashMap<FeatureKey, FeatureShapeEntry>,
}

impl FeatureShapes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nombre d'entités enregistrées
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn add(&mut self, key: FeatureKey, shape: DrawnShape) {
        self.entries.entry(key).or_default().shapes.push(shape);
    }

    pub fn add_metadata(&mut self, key: FeatureKey, shape: DrawnShape) {
        self.entries.entry(key).or_default().metadata_shapes.push(shape);
    }

    /// Vrai si l'entité a au moins une forme
    pub fn exists(&self, key: &FeatureKey) -> bool {
        self.entries.get(key).is_some_and(FeatureShapeEntry::has_shapes)
    }

    pub fn feature_shape(&self, key: &FeatureKey) -> Option<&FeatureShapeEntry> {
        self.entries.get(key)
    }

    pub fn feature_shape_mut(&mut self, key: &FeatureKey) -> Option<&mut FeatureShapeEntry> {
        self.entries.get_mut(key)
    }

    /// Identifiants des entités d'une table
    pub fn feature_ids(&self, source: &str, table: &str) -> Vec<i64> {
        let mut ids: Vec<i64> = self
            .entries
            .keys()
            .filter(|k| k.source == source && k.table == table)
            .map(|k| k.feature_id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Retire les formes dont le type n'est pas exclu, pour les clés retenues
    ///
    /// Une entité sans forme restante est supprimée (avec ses formes annexes)
    /// et comptée.
    fn remove_matching(
        &mut self,
        backend: &mut dyn RenderBackend,
        matches: impl Fn(&FeatureKey) -> bool,
        excluded: &[ShapeType],
    ) -> usize {
        let mut count = 0;
        self.entries.retain(|key, entry| {
            if !matches(key) {
                return true;
            }
            entry.shapes.retain_mut(|shape| {
                if excluded.contains(&shape.shape_type()) {
                    true
                } else {
                    shape.remove(backend);
                    false
                }
            });
            if entry.has_shapes() {
                return true;
            }
            entry.remove_metadata(backend);
            count += 1;
            false
        });
        count
    }

    /// Retire toutes les formes ; retourne le nombre d'entités supprimées
    pub fn remove_all(&mut self, backend: &mut dyn RenderBackend) -> usize {
        let count = self.remove_matching(backend, |_| true, &[]);
        debug!(count, "Removed all feature shapes");
        count
    }

    /// Retire toutes les formes sauf celles des types exclus
    pub fn remove_all_excluding(&mut self, backend: &mut dyn RenderBackend, excluded: &[ShapeType]) -> usize {
        let count = self.remove_matching(backend, |_| true, excluded);
        debug!(count, ?excluded, "Removed feature shapes with exclusions");
        count
    }

    pub fn remove_for_source(&mut self, backend: &mut dyn RenderBackend, source: &str) -> usize {
        let count = self.remove_matching(backend, |k| k.source == source, &[]);
        debug!(count, source, "Removed feature shapes for source");
        count
    }

    pub fn remove_for_table(&mut self, backend: &mut dyn RenderBackend, source: &str, table: &str) -> usize {
        let count = self.remove_matching(backend, |k| k.source == source && k.table == table, &[]);
        debug!(count, source, table, "Removed feature shapes for table");
        count
    }

    /// Retire une entité ; faux si elle n'était pas enregistrée
    pub fn remove_feature(&mut self, backend: &mut dyn RenderBackend, key: &FeatureKey) -> bool {
        match self.entries.remove(key) {
            Some(mut entry) => {
                entry.remove(backend);
                true
            }
            None => false,
        }
    }

    /// Retire les entités dont aucune forme ne recoupe l'emprise WGS84 visible
    ///
    /// `table` à `None` traite toutes les tables de la source.
    pub fn cull_outside_viewport(
        &mut self,
        backend: &mut dyn RenderBackend,
        viewport: &BoundingBox,
        source: &str,
        table: Option<&str>,
    ) -> usize {
        let outside: Vec<FeatureKey> = self
            .entries
            .iter()
            .filter(|(key, _)| key.source == source && table.map_or(true, |t| key.table == t))
            .filter(|(_, entry)| !entry.overlaps(viewport, backend))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &outside {
            if let Some(mut entry) = self.entries.remove(key) {
                entry.remove(backend);
            }
        }

        debug!(count = outside.len(), source, table, "Culled feature shapes outside viewport");
        outside.len()
    }

    /// Oublie toutes les entrées sans toucher aux primitives
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::drawn::Drawn;
    use crate::shape::{LatLng, PolylineShape};

    fn marker(backend: &mut MemoryBackend, lat: f64, lng: f64) -> DrawnShape {
        DrawnShape::new(
            GeometryType::Point,
            Drawn::Marker(backend.add_marker(LatLng::new(lat, lng))),
        )
    }

    #[test]
    fn test_add_exists_remove() {
        let mut backend = MemoryBackend::new();
        let mut registry = FeatureShapes::new();
        let key = FeatureKey::new("db", "roads", 1);

        assert!(!registry.exists(&key));
        let shape = marker(&mut backend, 0.0, 0.0);
        registry.add(key.clone(), shape);
        let label = marker(&mut backend, 0.1, 0.1);
        registry.add_metadata(key.clone(), label);
        assert!(registry.exists(&key));
        assert_eq!(registry.feature_shape(&key).map(FeatureShapeEntry::count), Some(1));

        let other = marker(&mut backend, 5.0, 5.0);
        registry.add(FeatureKey::new("db", "poi", 2), other);

        assert_eq!(registry.remove_for_table(&mut backend, "db", "roads"), 1);
        assert!(!registry.exists(&key));
        assert_eq!(backend.len(), 1);
        assert_eq!(registry.remove_for_source(&mut backend, "db"), 1);
        assert!(backend.is_empty());
    }

    #[test]
    fn test_remove_excluding_keeps_excluded_types() {
        let mut backend = MemoryBackend::new();
        let mut registry = FeatureShapes::new();
        let key = FeatureKey::new("db", "mixed", 7);

        let point = marker(&mut backend, 0.0, 0.0);
        let line = DrawnShape::new(
            GeometryType::LineString,
            Drawn::Polyline(backend.add_polyline(&PolylineShape::new(vec![
                LatLng::new(0.0, 0.0),
                LatLng::new(1.0, 1.0),
            ]))),
        );
        registry.add(key.clone(), point);
        registry.add(key.clone(), line);

        // La ligne est retirée, le marqueur reste : l'entité n'est pas comptée
        assert_eq!(registry.remove_all_excluding(&mut backend, &[ShapeType::Marker]), 0);
        assert_eq!(registry.feature_shape(&key).map(FeatureShapeEntry::count), Some(1));
        assert_eq!(backend.len(), 1);

        assert_eq!(registry.remove_all(&mut backend), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_cull_outside_viewport() {
        let mut backend = MemoryBackend::new();
        let mut registry = FeatureShapes::new();

        let inside = marker(&mut backend, 10.0, 10.0);
        registry.add(FeatureKey::new("db", "poi", 1), inside);
        let outside = marker(&mut backend, 60.0, 100.0);
        registry.add(FeatureKey::new("db", "poi", 2), outside);
        // Sur le bord : conservé pour un point
        let edge = marker(&mut backend, 20.0, 20.0);
        registry.add(FeatureKey::new("db", "poi", 3), edge);
        let other_source = marker(&mut backend, 60.0, 100.0);
        registry.add(FeatureKey::new("other", "poi", 1), other_source);

        let viewport = BoundingBox::new(0.0, 0.0, 20.0, 20.0);
        assert_eq!(registry.cull_outside_viewport(&mut backend, &viewport, "db", None), 1);
        assert_eq!(registry.feature_ids("db", "poi"), vec![1, 3]);
        assert!(registry.exists(&FeatureKey::new("other", "poi", 1)));
        assert_eq!(backend.len(), 3);

        // Idempotent
        assert_eq!(registry.cull_outside_viewport(&mut backend, &viewport, "db", Some("poi")), 0);
    }

    #[test]
    fn test_cull_across_antimeridian() {
        let mut backend = MemoryBackend::new();
        let mut registry = FeatureShapes::new();
        let east = marker(&mut backend, 0.0, -179.5);
        registry.add(FeatureKey::new("db", "poi", 1), east);

        // Emprise visible à cheval sur l'antiméridien (170 → 190)
        let viewport = BoundingBox::from_viewport((170.0, -10.0), (-170.0, 10.0));
        assert_eq!(registry.cull_outside_viewport(&mut backend, &viewport, "db", None), 0);
    }
}
