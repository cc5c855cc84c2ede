//! Distance d'un clic à une forme
//!
//! Le point le plus proche est cherché en Web Mercator ; la distance est
//! ensuite mesurée en géodésique (haversine) ou en planaire (Mercator
//! corrigé du facteur d'échelle à la latitude du clic).

use std::cmp::Ordering;

use geo::{
    Closest, ClosestPoint, Contains, Coord, EuclideanDistance, HaversineDistance,
    LineString as GeoLineString, Point as GeoPoint, Polygon as GeoPolygon,
};

use crate::projection::{web_mercator_to_wgs84, wgs84_to_web_mercator};
use crate::shape::{LatLng, MapShape, PolygonShape, Shape};

/// Résultat du test de proximité d'un clic
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickDistance {
    /// Distance en mètres, dans la tolérance
    Known(f64),
    /// Retenu sans distance calculable (clic à l'intérieur d'un polygone)
    Unknown,
    /// Hors tolérance
    Excluded,
}

impl ClickDistance {
    pub fn is_excluded(&self) -> bool {
        matches!(self, Self::Excluded)
    }

    /// Ordre de classement : distances connues croissantes, puis inconnues, puis exclues
    pub fn rank(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Known(a), Self::Known(b)) => a.total_cmp(b),
            (Self::Known(_), _) => Ordering::Less,
            (_, Self::Known(_)) => Ordering::Greater,
            (Self::Unknown, Self::Unknown) | (Self::Excluded, Self::Excluded) => Ordering::Equal,
            (Self::Unknown, Self::Excluded) => Ordering::Less,
            (Self::Excluded, Self::Unknown) => Ordering::Greater,
        }
    }

    /// Meilleur des deux résultats
    pub fn best(self, other: Self) -> Self {
        if other.rank(&self) == Ordering::Less {
            other
        } else {
            self
        }
    }

    fn within(distance: f64, tolerance: f64) -> Self {
        if distance <= tolerance {
            Self::Known(distance)
        } else {
            Self::Excluded
        }
    }
}

fn mercator(p: LatLng) -> GeoPoint<f64> {
    let (x, y) = wgs84_to_web_mercator(p.lng, p.lat);
    GeoPoint::new(x, y)
}

/// Distance entre le clic et un point exprimé en Web Mercator
fn measure(click: LatLng, target: GeoPoint<f64>, geodesic: bool) -> f64 {
    if geodesic {
        let (lng, lat) = web_mercator_to_wgs84(target.x(), target.y());
        GeoPoint::new(click.lng, click.lat).haversine_distance(&GeoPoint::new(lng, lat))
    } else {
        mercator(click).euclidean_distance(&target) * click.lat.to_radians().cos()
    }
}

/// Distance du clic à la ligne la plus proche parmi `lines`
fn lines_distance<'a>(
    click: LatLng,
    lines: impl IntoIterator<Item = &'a [LatLng]>,
    geodesic: bool,
) -> Option<f64> {
    let origin = mercator(click);
    lines
        .into_iter()
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            if let [single] = line {
                return Some(measure(click, mercator(*single), geodesic));
            }
            let line: GeoLineString<f64> = line.iter().map(|p| Coord::from(mercator(*p))).collect();
            match line.closest_point(&origin) {
                Closest::Intersection(p) | Closest::SinglePoint(p) => Some(measure(click, p, geodesic)),
                Closest::Indeterminate => None,
            }
        })
        .reduce(f64::min)
}

fn closed(ring: &[LatLng]) -> Vec<LatLng> {
    let mut ring = ring.to_vec();
    if let Some(first) = ring.first().copied() {
        if ring.last() != Some(&first) {
            ring.push(first);
        }
    }
    ring
}

fn polygon_distance(click: LatLng, polygon: &PolygonShape, geodesic: bool, tolerance: f64) -> ClickDistance {
    let rings: Vec<Vec<LatLng>> = std::iter::once(&polygon.points)
        .chain(&polygon.holes)
        .map(|r| closed(r))
        .collect();

    if let Some(distance) = lines_distance(click, rings.iter().map(Vec::as_slice), geodesic) {
        if distance <= tolerance {
            return ClickDistance::Known(distance);
        }
    }

    let to_line = |ring: &Vec<LatLng>| -> GeoLineString<f64> {
        ring.iter().map(|p| Coord { x: p.lng, y: p.lat }).collect()
    };
    let Some((exterior, holes)) = rings.split_first() else {
        return ClickDistance::Excluded;
    };
    let geo_polygon = GeoPolygon::new(to_line(exterior), holes.iter().map(to_line).collect());
    if geo_polygon.contains(&GeoPoint::new(click.lng, click.lat)) {
        ClickDistance::Unknown
    } else {
        ClickDistance::Excluded
    }
}

fn best(distances: impl Iterator<Item = ClickDistance>) -> ClickDistance {
    distances.fold(ClickDistance::Excluded, ClickDistance::best)
}

/// Distance d'un clic (WGS84) à une forme, avec une tolérance en mètres
pub fn distance_to_shape(click: LatLng, shape: &MapShape, geodesic: bool, tolerance: f64) -> ClickDistance {
    distance_to(click, &shape.shape, geodesic, tolerance)
}

fn distance_to(click: LatLng, shape: &Shape, geodesic: bool, tolerance: f64) -> ClickDistance {
    match shape {
        Shape::LatLng(point) => ClickDistance::within(measure(click, mercator(*point), geodesic), tolerance),
        Shape::MultiLatLng(points) => best(
            points
                .iter()
                .map(|p| ClickDistance::within(measure(click, mercator(*p), geodesic), tolerance)),
        ),
        Shape::Polyline(line) => match lines_distance(click, [line.points.as_slice()], geodesic) {
            Some(distance) => ClickDistance::within(distance, tolerance),
            None => ClickDistance::Excluded,
        },
        Shape::MultiPolyline(lines) => {
            match lines_distance(click, lines.iter().map(|l| l.points.as_slice()), geodesic) {
                Some(distance) => ClickDistance::within(distance, tolerance),
                None => ClickDistance::Excluded,
            }
        }
        Shape::Polygon(polygon) => polygon_distance(click, polygon, geodesic, tolerance),
        Shape::MultiPolygon(polygons) => best(
            polygons
                .iter()
                .map(|p| polygon_distance(click, p, geodesic, tolerance)),
        ),
        Shape::Collection(shapes) => best(
            shapes
                .iter()
                .map(|s| distance_to(click, &s.shape, geodesic, tolerance)),
        ),
    }
}
