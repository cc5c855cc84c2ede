//! Transformations via PROJ
//!
//! Ce module est disponible uniquement avec le feature `reproject`.

use proj::Proj;

use super::{Projection, ProjectionTransform};
use crate::error::{Result, ShapeError};
use crate::geometry::Point;

/// Transformation entre deux systèmes de coordonnées quelconques
pub struct ProjTransform {
    proj: Proj,
    from: Projection,
    to: Projection,
}

impl ProjTransform {
    pub fn new(from: &Projection, to: &Projection) -> Result<Self> {
        let proj = Proj::new_known_crs(&from.to_string(), &to.to_string(), None).map_err(|e| {
            ShapeError::transform(format!(
                "Failed to create projection from {} to {}: {}",
                from, to, e
            ))
        })?;

        Ok(Self {
            proj,
            from: from.clone(),
            to: to.clone(),
        })
    }

    pub fn from(&self) -> &Projection {
        &self.from
    }

    pub fn to(&self) -> &Projection {
        &self.to
    }
}

impl ProjectionTransform for ProjTransform {
    fn transform(&self, point: &Point) -> Result<Point> {
        let (x, y) = self
            .proj
            .convert((point.x, point.y))
            .map_err(|e| ShapeError::transform(format!("{} -> {}: {}", self.from, self.to, e)))?;
        Ok(Point { x, y, ..*point })
    }

    fn transform_points(&self, points: &[Point]) -> Result<Vec<Point>> {
        let mut coords: Vec<(f64, f64)> = points.iter().map(|p| (p.x, p.y)).collect();

        // Transformation batch, plus rapide que point par point
        self.proj
            .convert_array(&mut coords)
            .map_err(|e| ShapeError::transform(format!("{} -> {}: {}", self.from, self.to, e)))?;

        Ok(coords
            .into_iter()
            .zip(points)
            .map(|((x, y), p)| Point { x, y, ..*p })
            .collect())
    }
}
