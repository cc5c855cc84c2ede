//! Fermeture et orientation des anneaux de polygone

use serde::{Deserialize, Serialize};

use crate::shape::LatLng;

/// Sens de parcours d'un anneau
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolygonOrientation {
    CounterClockwise,
    Clockwise,
}

/// Aire signée (formule du lacet), positive pour un anneau anti-horaire
pub fn signed_area(ring: &[LatLng]) -> f64 {
    let sum: f64 = ring
        .iter()
        .zip(ring.iter().cycle().skip(1))
        .map(|(a, b)| a.lng * b.lat - b.lng * a.lat)
        .sum();
    sum / 2.0
}

/// Orientation d'un anneau ; une aire nulle compte comme anti-horaire
pub fn orientation(ring: &[LatLng]) -> PolygonOrientation {
    if signed_area(ring) >= 0.0 {
        PolygonOrientation::CounterClockwise
    } else {
        PolygonOrientation::Clockwise
    }
}

/// Ferme l'anneau en répétant le premier sommet si nécessaire
pub fn close_ring(ring: &mut Vec<LatLng>) {
    if let Some(first) = ring.first().copied() {
        if ring.last() != Some(&first) {
            ring.push(first);
        }
    }
}

/// Ferme l'anneau puis l'inverse si son sens diffère de `target`
///
/// `None` conserve le sens d'origine.
pub fn orient(mut ring: Vec<LatLng>, target: Option<PolygonOrientation>) -> Vec<LatLng> {
    close_ring(&mut ring);
    if let Some(target) = target {
        if orientation(&ring) != target {
            ring.reverse();
        }
    }
    ring
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ccw_square() -> Vec<LatLng> {
        vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 1.0),
            LatLng::new(1.0, 1.0),
            LatLng::new(1.0, 0.0),
        ]
    }

    #[test]
    fn test_signed_area() {
        let ring = ccw_square();
        assert_eq!(signed_area(&ring), 1.0);

        let mut reversed = ring.clone();
        reversed.reverse();
        assert_eq!(signed_area(&reversed), -1.0);
        assert_eq!(orientation(&reversed), PolygonOrientation::Clockwise);
    }

    #[test]
    fn test_close_ring() {
        let mut ring = ccw_square();
        close_ring(&mut ring);
        assert_eq!(ring.len(), 5);
        assert_eq!(ring[4], ring[0]);

        // Déjà fermé : inchangé
        close_ring(&mut ring);
        assert_eq!(ring.len(), 5);

        let mut empty: Vec<LatLng> = Vec::new();
        close_ring(&mut empty);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_orient() {
        let ring = orient(ccw_square(), Some(PolygonOrientation::Clockwise));
        assert_eq!(orientation(&ring), PolygonOrientation::Clockwise);
        assert_eq!(ring.first(), ring.last());

        let preserved = orient(ccw_square(), None);
        assert_eq!(preserved[1], LatLng::new(0.0, 1.0));
    }
}
