//! # mapshape
//!
//! Conversion entre géométries vectorielles et formes affichables sur une carte.
//!
//! ## Features
//!
//! - Conversion géométrie ↔ forme (points, lignes, polygones, multi-*, courbes, collections)
//! - Fermeture et orientation des anneaux, simplification Douglas-Peucker en mètres
//! - Formes éditables : une poignée déplaçable par sommet
//! - Registre des formes affichées par entité, avec retrait hors de la vue
//! - Emprises tenant compte de l'antiméridien, grille de tuiles XYZ
//! - Reprojection via PROJ (feature `reproject`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mapshape::{MemoryBackend, Projection, Projector, ShapeConverter};
//!
//! let converter = ShapeConverter::new(Projector::new(Some(Projection::web_mercator()))?);
//! let mut backend = MemoryBackend::new();
//!
//! let shape = converter.to_shape(&geometry)?;
//! let editable = converter.add_shape_as_markers(&mut backend, &shape);
//! // ... déplacement des poignées ...
//! let edited = converter.editable_to_geometry(&editable, &backend)?;
//! ```

pub mod backend;
pub mod bbox;
pub mod converter;
pub mod distance;
pub mod drawn;
pub mod editable;
pub mod error;
pub mod geometry;
pub mod projection;
pub mod registry;
pub mod shape;
pub mod tiles;

pub use backend::{MemoryBackend, PrimitiveId, RenderBackend};
pub use bbox::BoundingBox;
pub use converter::{add_shape_to_map, ConverterOptions, PolygonOrientation, ShapeConverter};
pub use distance::{distance_to_shape, ClickDistance};
pub use drawn::{Drawn, DrawnShape};
pub use editable::{Editable, EditableNode, EditableShape};
pub use error::{Result, ShapeError};
pub use geometry::{Geometry, GeometryType, Point};
pub use projection::{Projection, ProjectionTransform, Projector, TransformProvider};
pub use registry::{FeatureKey, FeatureShapeEntry, FeatureShapes};
pub use shape::{LatLng, MapShape, PolygonShape, PolylineShape, Shape, ShapeType};
