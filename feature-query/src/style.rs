//! Emprise en pixels du style d'une entité (icône, symbole, trait)

use mapshape::LatLng;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::index::FeatureRow;

/// Étendue en pixels autour de la position de l'entité
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelBounds {
    pub left: f64,
    pub up: f64,
    pub right: f64,
    pub down: f64,
}

impl PixelBounds {
    pub fn new(left: f64, up: f64, right: f64, down: f64) -> Self {
        Self { left, up, right, down }
    }

    /// Étendue centrée de `width` x `height`
    pub fn centered(width: f64, height: f64) -> Self {
        Self::new(width / 2.0, height / 2.0, width / 2.0, height / 2.0)
    }

    /// Icône ancrée en (`anchor_u`, `anchor_v`), fractions de sa taille
    pub fn anchored(width: f64, height: f64, anchor_u: f64, anchor_v: f64) -> Self {
        Self::new(
            width * anchor_u,
            height * anchor_v,
            width * (1.0 - anchor_u),
            height * (1.0 - anchor_v),
        )
    }

    pub fn width(&self) -> f64 {
        self.left + self.right
    }

    pub fn height(&self) -> f64 {
        self.up + self.down
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn is_empty(&self) -> bool {
        self.area() <= 0.0
    }

    /// Plus grande dimension
    pub fn max_extent(&self) -> f64 {
        self.width().max(self.height())
    }

    /// Union, côté par côté
    pub fn union(&self, other: &PixelBounds) -> Self {
        Self::new(
            self.left.max(other.left),
            self.up.max(other.up),
            self.right.max(other.right),
            self.down.max(other.down),
        )
    }

    /// Mise à l'échelle par la densité d'écran
    pub fn scaled(&self, density: f64) -> Self {
        Self::new(
            self.left * density,
            self.up * density,
            self.right * density,
            self.down * density,
        )
    }

    /// Ne garde que les côtés tournés vers le clic, pour un point
    pub fn facing(&self, click: LatLng, point: LatLng) -> Self {
        let mut bounds = *self;
        if click.lng < point.lng {
            bounds.right = 0.0;
        } else {
            bounds.left = 0.0;
        }
        if click.lat < point.lat {
            bounds.up = 0.0;
        } else {
            bounds.down = 0.0;
        }
        bounds
    }
}

/// Recherche du style d'une entité
pub trait StyleLookup {
    /// Emprise en pixels (densité 1) du style de la ligne, si connue
    fn pixel_bounds(&self, row: &FeatureRow) -> Result<Option<PixelBounds>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchored_icon() {
        // Icône 20x40 ancrée en bas au centre
        let bounds = PixelBounds::anchored(20.0, 40.0, 0.5, 1.0);
        assert_eq!(bounds, PixelBounds::new(10.0, 40.0, 10.0, 0.0));
        assert_eq!(bounds.max_extent(), 40.0);
        assert_eq!(bounds.scaled(2.0).width(), 40.0);
    }

    #[test]
    fn test_facing_click() {
        let point = LatLng::new(10.0, 10.0);
        let bounds = PixelBounds::anchored(20.0, 40.0, 0.5, 1.0);

        // Clic au nord-est : gauche et bas retirés
        let north_east = bounds.facing(LatLng::new(10.1, 10.1), point);
        assert_eq!(north_east, PixelBounds::new(0.0, 40.0, 10.0, 0.0));
        assert!(!north_east.is_empty());

        // Clic au sud : l'icône est entièrement au-dessus du point
        let south = bounds.facing(LatLng::new(9.9, 10.1), point);
        assert!(south.is_empty());
    }

    #[test]
    fn test_union() {
        let a = PixelBounds::new(1.0, 5.0, 3.0, 0.0);
        let b = PixelBounds::centered(4.0, 4.0);
        assert_eq!(a.union(&b), PixelBounds::new(2.0, 5.0, 3.0, 2.0));
    }
}
