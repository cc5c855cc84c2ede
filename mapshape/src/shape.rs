//! Formes affichables (descripteurs de primitives carte)

use std::fmt;

use crate::bbox::BoundingBox;
use crate::geometry::GeometryType;
use crate::projection::WGS84_HALF_WORLD_LON_WIDTH;

/// Coordonnée géographique (degrés)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Polyligne à afficher
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolylineShape {
    pub points: Vec<LatLng>,
    /// Z maximal des sommets, indication d'élévation
    pub elevation: Option<f64>,
}

impl PolylineShape {
    pub fn new(points: Vec<LatLng>) -> Self {
        Self {
            points,
            elevation: None,
        }
    }
}

/// Polygone à afficher, avec ses trous
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolygonShape {
    pub points: Vec<LatLng>,
    pub holes: Vec<Vec<LatLng>>,
    pub elevation: Option<f64>,
}

impl PolygonShape {
    pub fn new(points: Vec<LatLng>, holes: Vec<Vec<LatLng>>) -> Self {
        Self {
            points,
            holes,
            elevation: None,
        }
    }
}

/// Type de forme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeType {
    LatLng,
    Polyline,
    Polygon,
    MultiLatLng,
    MultiPolyline,
    MultiPolygon,
    Collection,
    Marker,
    PolylineMarkers,
    PolygonMarkers,
    MultiMarker,
    MultiPolylineMarkers,
    MultiPolygonMarkers,
    CollectionMarkers,
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Forme affichable
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    LatLng(LatLng),
    Polyline(PolylineShape),
    Polygon(PolygonShape),
    MultiLatLng(Vec<LatLng>),
    MultiPolyline(Vec<PolylineShape>),
    MultiPolygon(Vec<PolygonShape>),
    Collection(Vec<MapShape>),
}

impl Shape {
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Self::LatLng(_) => ShapeType::LatLng,
            Self::Polyline(_) => ShapeType::Polyline,
            Self::Polygon(_) => ShapeType::Polygon,
            Self::MultiLatLng(_) => ShapeType::MultiLatLng,
            Self::MultiPolyline(_) => ShapeType::MultiPolyline,
            Self::MultiPolygon(_) => ShapeType::MultiPolygon,
            Self::Collection(_) => ShapeType::Collection,
        }
    }
}

/// Forme accompagnée du type de la géométrie d'origine
#[derive(Debug, Clone, PartialEq)]
pub struct MapShape {
    pub geometry_type: GeometryType,
    pub shape: Shape,
}

impl MapShape {
    pub fn new(geometry_type: GeometryType, shape: Shape) -> Self {
        Self {
            geometry_type,
            shape,
        }
    }

    pub fn shape_type(&self) -> ShapeType {
        self.shape.shape_type()
    }

    /// Étend une emprise WGS84 avec tous les sommets de la forme
    pub fn expand_bounding_box(&self, bbox: &mut BoundingBox) {
        fn expand_all(bbox: &mut BoundingBox, points: &[LatLng]) {
            for p in points {
                bbox.expand_wrapped(p.lng, p.lat, WGS84_HALF_WORLD_LON_WIDTH);
            }
        }

        match &self.shape {
            Shape::LatLng(p) => expand_all(bbox, std::slice::from_ref(p)),
            Shape::Polyline(line) => expand_all(bbox, &line.points),
            Shape::Polygon(polygon) => expand_all(bbox, &polygon.points),
            Shape::MultiLatLng(points) => expand_all(bbox, points),
            Shape::MultiPolyline(lines) => {
                for line in lines {
                    expand_all(bbox, &line.points);
                }
            }
            Shape::MultiPolygon(polygons) => {
                for polygon in polygons {
                    expand_all(bbox, &polygon.points);
                }
            }
            Shape::Collection(shapes) => {
                for shape in shapes {
                    shape.expand_bounding_box(bbox);
                }
            }
        }
    }

    /// Emprise WGS84 de la forme
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox::inverted();
        self.expand_bounding_box(&mut bbox);
        bbox
    }
}
