//! Projections et transformations de coordonnées
//!
//! Le `Projector` regroupe les transformations utilisées par le convertisseur :
//! - natif ↔ géographique (WGS84, EPSG:4326)
//! - natif ↔ métrique (Web Mercator, EPSG:3857) pour la simplification
//!
//! Une projection absente est une configuration valide : les coordonnées
//! passent alors sans transformation.

mod mercator;
#[cfg(feature = "reproject")]
mod proj;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;
use crate::error::{Result, ShapeError};
use crate::geometry::{Geometry, Point};

pub use mercator::{
    web_mercator_to_wgs84, wgs84_to_web_mercator, EARTH_RADIUS, WEB_MERCATOR_HALF_WORLD_WIDTH,
    WEB_MERCATOR_MAX_LAT,
};
#[cfg(feature = "reproject")]
pub use proj::ProjTransform;

/// Demi-largeur du monde en longitude WGS84
pub const WGS84_HALF_WORLD_LON_WIDTH: f64 = 180.0;

/// Demi-hauteur du monde en latitude WGS84
pub const WGS84_HALF_WORLD_LAT_HEIGHT: f64 = 90.0;

/// Système de coordonnées identifié par une autorité et un code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Projection {
    pub authority: String,
    pub code: String,
}

impl Projection {
    pub fn new(authority: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            code: code.into(),
        }
    }

    pub fn epsg(code: u32) -> Self {
        Self::new("EPSG", code.to_string())
    }

    /// WGS84 (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::epsg(4326)
    }

    /// Web Mercator (EPSG:3857)
    pub fn web_mercator() -> Self {
        Self::epsg(3857)
    }

    /// Code EPSG numérique, si l'autorité est EPSG
    pub fn epsg_code(&self) -> Option<u32> {
        if self.authority.eq_ignore_ascii_case("EPSG") {
            self.code.parse().ok()
        } else {
            None
        }
    }

    pub fn is_wgs84(&self) -> bool {
        self.epsg_code() == Some(4326)
    }

    pub fn is_web_mercator(&self) -> bool {
        matches!(self.epsg_code(), Some(3857 | 900913))
    }

    /// Vrai si les unités sont des degrés
    pub fn is_geographic(&self) -> bool {
        matches!(
            self.epsg_code(),
            Some(4326 | 4258 | 4269 | 4171 | 4979 | 4937)
        )
    }

    /// Vrai si les unités sont des mètres
    pub fn is_metric(&self) -> bool {
        !self.is_geographic()
    }
}

impl fmt::Display for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.authority, self.code)
    }
}

/// Transformation de points d'une projection vers une autre
pub trait ProjectionTransform {
    fn transform(&self, point: &Point) -> Result<Point>;

    fn transform_points(&self, points: &[Point]) -> Result<Vec<Point>> {
        points.iter().map(|p| self.transform(p)).collect()
    }
}

/// Fournisseur de transformations, indexé par paires de projections
pub trait TransformProvider {
    fn transform(&self, from: &Projection, to: &Projection)
        -> Result<Box<dyn ProjectionTransform>>;
}

/// Transformation intégrée
///
/// Web Mercator ↔ WGS84 en Rust pur, PROJ pour le reste si disponible.
pub enum Transform {
    /// Pas de transformation (source == cible)
    Identity,
    /// WGS84 → Web Mercator
    ToWebMercator,
    /// Web Mercator → WGS84
    FromWebMercator,
    /// Transformation via PROJ (si feature activée)
    #[cfg(feature = "reproject")]
    Proj(ProjTransform),
}

impl Transform {
    pub fn new(from: &Projection, to: &Projection) -> Result<Self> {
        if from == to || (from.is_web_mercator() && to.is_web_mercator()) {
            return Ok(Self::Identity);
        }
        if from.is_wgs84() && to.is_web_mercator() {
            return Ok(Self::ToWebMercator);
        }
        if from.is_web_mercator() && to.is_wgs84() {
            return Ok(Self::FromWebMercator);
        }

        #[cfg(feature = "reproject")]
        {
            return Ok(Self::Proj(ProjTransform::new(from, to)?));
        }

        #[cfg(not(feature = "reproject"))]
        Err(ShapeError::transform(format!(
            "Transformation {} -> {} not supported without the `reproject` feature",
            from, to
        )))
    }

    /// Description de la transformation utilisée
    pub fn description(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::ToWebMercator => "wgs84 -> web mercator",
            Self::FromWebMercator => "web mercator -> wgs84",
            #[cfg(feature = "reproject")]
            Self::Proj(_) => "proj",
        }
    }
}

impl ProjectionTransform for Transform {
    fn transform(&self, point: &Point) -> Result<Point> {
        match self {
            Self::Identity => Ok(*point),
            Self::ToWebMercator => {
                let (x, y) = wgs84_to_web_mercator(point.x, point.y);
                Ok(Point { x, y, ..*point })
            }
            Self::FromWebMercator => {
                let (x, y) = web_mercator_to_wgs84(point.x, point.y);
                Ok(Point { x, y, ..*point })
            }
            #[cfg(feature = "reproject")]
            Self::Proj(proj) => proj.transform(point),
        }
    }

    fn transform_points(&self, points: &[Point]) -> Result<Vec<Point>> {
        match self {
            Self::Identity => Ok(points.to_vec()),
            #[cfg(feature = "reproject")]
            Self::Proj(proj) => proj.transform_points(points),
            _ => points.iter().map(|p| self.transform(p)).collect(),
        }
    }
}

/// Fournisseur par défaut, basé sur [`Transform`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTransforms;

impl TransformProvider for DefaultTransforms {
    fn transform(
        &self,
        from: &Projection,
        to: &Projection,
    ) -> Result<Box<dyn ProjectionTransform>> {
        Ok(Box::new(Transform::new(from, to)?))
    }
}

fn identity() -> Box<dyn ProjectionTransform> {
    Box::new(Transform::Identity)
}

/// Transformations d'une projection native fixe
pub struct Projector {
    projection: Option<Projection>,
    to_geographic: Box<dyn ProjectionTransform>,
    from_geographic: Box<dyn ProjectionTransform>,
    to_metric: Box<dyn ProjectionTransform>,
    from_metric: Box<dyn ProjectionTransform>,
}

impl Projector {
    /// Crée un projector avec les transformations intégrées
    pub fn new(projection: Option<Projection>) -> Result<Self> {
        Self::with_provider(projection, &DefaultTransforms)
    }

    /// Projector sans projection : les coordonnées passent telles quelles
    pub fn identity() -> Self {
        Self {
            projection: None,
            to_geographic: identity(),
            from_geographic: identity(),
            to_metric: identity(),
            from_metric: identity(),
        }
    }

    /// Crée un projector avec un fournisseur de transformations externe
    pub fn with_provider(
        projection: Option<Projection>,
        provider: &dyn TransformProvider,
    ) -> Result<Self> {
        let Some(native) = projection else {
            return Ok(Self::identity());
        };

        let geographic = Projection::wgs84();
        let to_geographic = provider.transform(&native, &geographic)?;
        let from_geographic = provider.transform(&geographic, &native)?;

        // Une projection déjà métrique simplifie dans ses propres unités
        let (to_metric, from_metric) = if native.is_metric() {
            (identity(), identity())
        } else {
            let metric = Projection::web_mercator();
            (
                provider.transform(&native, &metric)?,
                provider.transform(&metric, &native)?,
            )
        };

        Ok(Self {
            projection: Some(native),
            to_geographic,
            from_geographic,
            to_metric,
            from_metric,
        })
    }

    pub fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    /// Vrai si la projection native est en mètres
    pub fn is_metric(&self) -> bool {
        self.projection.as_ref().is_some_and(Projection::is_metric)
    }

    /// Natif → géographique
    pub fn to_geographic(&self, point: &Point) -> Result<Point> {
        self.to_geographic.transform(point)
    }

    /// Géographique → natif
    pub fn to_native(&self, point: &Point) -> Result<Point> {
        self.from_geographic.transform(point)
    }

    /// Natif → métrique
    pub fn to_metric(&self, points: &[Point]) -> Result<Vec<Point>> {
        self.to_metric.transform_points(points)
    }

    /// Métrique → natif
    pub fn from_metric(&self, points: &[Point]) -> Result<Vec<Point>> {
        self.from_metric.transform_points(points)
    }

    /// Projette une géométrie native en géographique
    pub fn geometry_to_geographic(&self, geometry: &Geometry) -> Result<Geometry> {
        geometry.try_map_points(&mut |p| self.to_geographic(p))
    }

    fn require_projection(&self) -> Result<()> {
        if self.projection.is_none() {
            return Err(ShapeError::configuration(
                "a projection is required to transform a bounding box",
            ));
        }
        Ok(())
    }

    /// Emprise native → géographique
    pub fn bounding_box_to_geographic(&self, bbox: &BoundingBox) -> Result<BoundingBox> {
        self.require_projection()?;
        bbox.transform(self.to_geographic.as_ref())
    }

    /// Emprise géographique → native
    pub fn bounding_box_from_geographic(&self, bbox: &BoundingBox) -> Result<BoundingBox> {
        self.require_projection()?;
        bbox.transform(self.from_geographic.as_ref())
    }

    /// Emprise native → métrique
    pub fn bounding_box_to_metric(&self, bbox: &BoundingBox) -> Result<BoundingBox> {
        self.require_projection()?;
        bbox.transform(self.to_metric.as_ref())
    }

    /// Emprise métrique → native
    pub fn bounding_box_from_metric(&self, bbox: &BoundingBox) -> Result<BoundingBox> {
        self.require_projection()?;
        bbox.transform(self.from_metric.as_ref())
    }
}

impl fmt::Debug for Projector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Projector")
            .field("projection", &self.projection)
            .finish_non_exhaustive()
    }
}
