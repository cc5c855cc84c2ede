//! Emprises (bounding boxes) avec prise en compte de l'antiméridien
//!
//! Une emprise WGS84 qui traverse l'antiméridien est représentée avec
//! `max_x > 180` : c'est à l'appelant de la détecter et de la renormaliser.

use geo::{HaversineDistance, Point as GeoPoint};

use crate::error::Result;
use crate::geometry::Point;
use crate::projection::{ProjectionTransform, WGS84_HALF_WORLD_LON_WIDTH};

/// Emprise (min_x, min_y, max_x, max_y)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Emprise inversée, point de départ d'une expansion
    pub fn inverted() -> Self {
        Self::new(f64::MAX, f64::MAX, -f64::MAX, -f64::MAX)
    }

    /// Monde entier en WGS84
    pub fn world_wgs84() -> Self {
        Self::new(-180.0, -90.0, 180.0, 90.0)
    }

    /// Emprise d'une vue carte à partir de ses coins sud-ouest et nord-est
    ///
    /// Si la vue traverse l'antiméridien, `max_x` dépasse 180.
    pub fn from_viewport(southwest: (f64, f64), northeast: (f64, f64)) -> Self {
        let (min_lon, min_lat) = southwest;
        let (mut max_lon, max_lat) = northeast;
        if max_lon < min_lon {
            max_lon += 2.0 * WGS84_HALF_WORLD_LON_WIDTH;
        }
        Self::new(min_lon, min_lat, max_lon, max_lat)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Vrai si aucun point n'a encore été ajouté
    pub fn is_inverted(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Étend l'emprise pour inclure un point
    pub fn expand(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Étend l'emprise en choisissant, pour la longitude, le côté le moins
    /// coûteux entre l'extension directe et l'extension d'un tour complet.
    ///
    /// Le choix n'est fait que tant que l'emprise reste dans trois demi-mondes,
    /// une emprise déjà plus large s'étend normalement.
    pub fn expand_wrapped(&mut self, x: f64, y: f64, half_world: f64) {
        let world = 2.0 * half_world;
        let mut x = x;

        if self.min_x <= 3.0 * half_world && self.max_x >= -3.0 * half_world {
            if x < self.min_x {
                if self.min_x - x > (x + world) - self.max_x {
                    x += world;
                }
            } else if x > self.max_x && x - self.max_x > self.min_x - (x - world) {
                x -= world;
            }
        }

        self.expand(x, y);
    }

    /// Intersection de deux emprises
    ///
    /// `allow_empty` accepte une intersection de surface nulle (point, bord).
    pub fn overlap(&self, other: &BoundingBox, allow_empty: bool) -> Option<BoundingBox> {
        let min_x = self.min_x.max(other.min_x);
        let max_x = self.max_x.min(other.max_x);
        let min_y = self.min_y.max(other.min_y);
        let max_y = self.max_y.min(other.max_y);

        let valid = if allow_empty {
            min_x <= max_x && min_y <= max_y
        } else {
            min_x < max_x && min_y < max_y
        };

        valid.then(|| BoundingBox::new(min_x, min_y, max_x, max_y))
    }

    /// Intersection en tenant compte de l'antiméridien
    ///
    /// Si les emprises sont disjointes en longitude, `other` est décalée d'un
    /// tour (`2 * max_longitude`) vers `self` avant le calcul.
    pub fn overlap_wrapped(
        &self,
        other: &BoundingBox,
        max_longitude: f64,
        allow_empty: bool,
    ) -> Option<BoundingBox> {
        let adjustment = if self.min_x > other.max_x {
            2.0 * max_longitude
        } else if self.max_x < other.min_x {
            -2.0 * max_longitude
        } else {
            0.0
        };

        let shifted = BoundingBox::new(
            other.min_x + adjustment,
            other.min_y,
            other.max_x + adjustment,
            other.max_y,
        );
        self.overlap(&shifted, allow_empty)
    }

    pub fn intersects(&self, other: &BoundingBox, allow_empty: bool) -> bool {
        self.overlap(other, allow_empty).is_some()
    }

    /// Distance en mètres, d'un bord à l'autre en longitude, à la latitude centrale
    pub fn longitude_distance(&self) -> f64 {
        let (center_x, center_y) = self.center();
        let left = GeoPoint::new(self.min_x, center_y);
        let middle = GeoPoint::new(center_x, center_y);
        let right = GeoPoint::new(self.max_x, center_y);
        left.haversine_distance(&middle) + middle.haversine_distance(&right)
    }

    /// Distance en mètres, d'un bord à l'autre en latitude, à la longitude centrale
    pub fn latitude_distance(&self) -> f64 {
        let (center_x, center_y) = self.center();
        let lower = GeoPoint::new(center_x, self.min_y);
        let middle = GeoPoint::new(center_x, center_y);
        let upper = GeoPoint::new(center_x, self.max_y);
        lower.haversine_distance(&middle) + middle.haversine_distance(&upper)
    }

    /// Transforme l'emprise via ses quatre coins
    pub fn transform(&self, transform: &dyn ProjectionTransform) -> Result<BoundingBox> {
        let corners = transform.transform_points(&[
            Point::new(self.min_x, self.min_y),
            Point::new(self.min_x, self.max_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
        ])?;

        let mut bbox = BoundingBox::inverted();
        for corner in &corners {
            bbox.expand(corner.x, corner.y);
        }
        Ok(bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::{Projection, Transform, WEB_MERCATOR_HALF_WORLD_WIDTH};

    #[test]
    fn test_overlap() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, 5.0, 15.0, 15.0);
        assert_eq!(a.overlap(&b, false), Some(BoundingBox::new(5.0, 5.0, 10.0, 10.0)));

        // Bord commun : vide, accepté seulement si demandé
        let c = BoundingBox::new(10.0, 0.0, 20.0, 10.0);
        assert!(a.overlap(&c, false).is_none());
        assert!(a.overlap(&c, true).is_some());
    }

    #[test]
    fn test_overlap_point_box() {
        let viewport = BoundingBox::new(-10.0, -10.0, 10.0, 10.0);
        let point = BoundingBox::new(10.0, 3.0, 10.0, 3.0);
        assert!(viewport.intersects(&point, true));
        assert!(!viewport.intersects(&point, false));
    }

    #[test]
    fn test_overlap_wrapped_antimeridian() {
        // Vue qui traverse l'antiméridien : 170 → 190
        let viewport = BoundingBox::from_viewport((170.0, -10.0), (-170.0, 10.0));
        assert_eq!(viewport.max_x, 190.0);

        let feature = BoundingBox::new(-179.0, -1.0, -175.0, 1.0);
        assert!(!viewport.intersects(&feature, false));
        let overlap = viewport.overlap_wrapped(&feature, 180.0, false).unwrap();
        assert_eq!(overlap.min_x, 181.0);
        assert_eq!(overlap.max_x, 185.0);
    }

    #[test]
    fn test_expand_wrapped_prefers_short_side() {
        let mut bbox = BoundingBox::inverted();
        bbox.expand_wrapped(179.0, 0.0, 180.0);
        bbox.expand_wrapped(-179.0, 1.0, 180.0);
        assert_eq!(bbox.min_x, 179.0);
        assert_eq!(bbox.max_x, 181.0);

        let mut plain = BoundingBox::inverted();
        plain.expand_wrapped(10.0, 0.0, 180.0);
        plain.expand_wrapped(20.0, 0.0, 180.0);
        assert_eq!((plain.min_x, plain.max_x), (10.0, 20.0));
    }

    #[test]
    fn test_distances() {
        let bbox = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        // Un degré à l'équateur ≈ 111 km
        assert!((bbox.longitude_distance() - 111_195.0).abs() < 200.0);
        assert!((bbox.latitude_distance() - 111_195.0).abs() < 200.0);
    }

    #[test]
    fn test_transform_corners() {
        let t = Transform::new(&Projection::wgs84(), &Projection::web_mercator()).unwrap();
        let bbox = BoundingBox::new(-180.0, 0.0, 180.0, 10.0)
            .transform(&t)
            .unwrap();
        assert!((bbox.max_x - WEB_MERCATOR_HALF_WORLD_WIDTH).abs() < 1e-6);
        assert!(bbox.min_y.abs() < 1e-6);
    }
}
