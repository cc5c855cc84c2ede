//! Choix de la position d'insertion d'un nouveau sommet

use geo::{HaversineDistance, Point as GeoPoint};

use crate::shape::LatLng;

fn distance(a: LatLng, b: LatLng) -> f64 {
    GeoPoint::new(a.lng, a.lat).haversine_distance(&GeoPoint::new(b.lng, b.lat))
}

/// Distances au nouveau point et indice du sommet le plus proche
fn closest(positions: &[LatLng], new: LatLng) -> (Vec<f64>, usize) {
    let distances: Vec<f64> = positions.iter().map(|p| distance(*p, new)).collect();
    let closest = distances
        .iter()
        .enumerate()
        .fold(0, |best, (i, d)| if *d < distances[best] { i } else { best });
    (distances, closest)
}

/// Indice d'insertion dans un anneau (polygone ou trou)
///
/// Le nouveau sommet est placé entre le sommet le plus proche et celui de
/// ses deux voisins qui est le plus proche, pour éviter l'auto-intersection.
pub fn ring_insert_index(positions: &[LatLng], new: LatLng) -> usize {
    if positions.len() <= 2 {
        return positions.len();
    }

    let (distances, closest) = closest(positions, new);
    let last = positions.len() - 1;
    let before = if closest > 0 { closest - 1 } else { last };
    let after = if closest < last { closest + 1 } else { 0 };

    if distances[before] > distances[after] {
        after
    } else {
        closest
    }
}

/// Indice d'insertion dans une polyligne
///
/// Aux extrémités, le sommet prolonge la ligne s'il est plus loin du voisin
/// que le segment terminal n'est long.
pub fn line_insert_index(positions: &[LatLng], new: LatLng) -> usize {
    if positions.len() <= 1 {
        return positions.len();
    }

    let (distances, closest) = closest(positions, new);
    let last = positions.len() - 1;
    let before = (closest > 0).then(|| closest - 1);
    let after = (closest < last).then(|| closest + 1);

    match (before, after) {
        (Some(before), Some(after)) => {
            if distances[before] > distances[after] {
                after
            } else {
                closest
            }
        }
        (Some(before), None) => {
            if distances[before] >= distance(positions[before], positions[closest]) {
                closest + 1
            } else {
                closest
            }
        }
        (None, Some(after)) => {
            if distances[after] < distance(positions[after], positions[closest]) {
                after
            } else {
                closest
            }
        }
        (None, None) => positions.len(),
    }
}
