//! Interfaces vers l'index spatial et les lignes d'entités
//!
//! L'index lui-même (construction, stockage) est externe. Le curseur de
//! résultats est une ressource à fermer sur tous les chemins de sortie :
//! [`ScopedCursor`] la ferme à la destruction.

use std::fmt;

use mapshape::{BoundingBox, Geometry, GeometryType, Projection};
use serde::{Serialize, Serializer};
use tracing::warn;

use crate::error::Result;

/// Valeur d'une colonne
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Boolean(bool),
    Blob(Vec<u8>),
    Geometry(Geometry),
}

impl ColumnValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for ColumnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Real(v) => write!(f, "{}", v),
            Self::Text(v) => f.write_str(v),
            Self::Boolean(v) => write!(f, "{}", v),
            Self::Blob(v) => write!(f, "[{} bytes]", v.len()),
            Self::Geometry(g) => match g.wkt() {
                Ok(wkt) => f.write_str(&wkt),
                Err(_) => f.write_str(g.geometry_type().name()),
            },
        }
    }
}

impl Serialize for ColumnValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Integer(v) => serializer.serialize_i64(*v),
            Self::Real(v) => serializer.serialize_f64(*v),
            Self::Text(v) => serializer.serialize_str(v),
            Self::Boolean(v) => serializer.serialize_bool(*v),
            Self::Blob(v) => serializer.serialize_bytes(v),
            Self::Geometry(g) => {
                let wkt = g.wkt().map_err(serde::ser::Error::custom)?;
                serializer.serialize_str(&wkt)
            }
        }
    }
}

/// Ligne d'entité retournée par l'index
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub table: String,
    pub columns: Vec<String>,
    pub values: Vec<ColumnValue>,
    /// Index de la colonne clé primaire
    pub id_column: usize,
    /// Index de la colonne géométrie
    pub geometry_column: Option<usize>,
}

impl FeatureRow {
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn value(&self, index: usize) -> Option<&ColumnValue> {
        self.values.get(index)
    }

    /// Identifiant de l'entité, si la clé primaire est entière
    pub fn id(&self) -> Option<i64> {
        match self.values.get(self.id_column) {
            Some(ColumnValue::Integer(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn geometry(&self) -> Option<&Geometry> {
        match self.geometry_column.and_then(|i| self.values.get(i)) {
            Some(ColumnValue::Geometry(geometry)) => Some(geometry),
            _ => None,
        }
    }
}

/// Curseur de résultats de l'index (lecture à la demande)
pub trait FeatureCursor {
    /// Ligne suivante, `None` en fin de résultats
    fn next_row(&mut self) -> Result<Option<FeatureRow>>;

    /// Libère les ressources de l'index
    fn close(&mut self);
}

/// Curseur fermé à la destruction, y compris sur erreur
pub struct ScopedCursor<'a> {
    inner: Box<dyn FeatureCursor + 'a>,
    closed: bool,
}

impl<'a> ScopedCursor<'a> {
    pub fn new(inner: Box<dyn FeatureCursor + 'a>) -> Self {
        Self { inner, closed: false }
    }

    pub fn next_row(&mut self) -> Result<Option<FeatureRow>> {
        if self.closed {
            return Ok(None);
        }
        self.inner.next_row()
    }

    /// Lit toutes les lignes restantes puis ferme le curseur
    pub fn collect_rows(mut self) -> Result<Vec<FeatureRow>> {
        let mut rows = Vec::new();
        while let Some(row) = self.next_row()? {
            rows.push(row);
        }
        self.close();
        Ok(rows)
    }

    pub fn close(&mut self) {
        if !self.closed {
            self.inner.close();
            self.closed = true;
        }
    }
}

impl Drop for ScopedCursor<'_> {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for ScopedCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedCursor")
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

/// Index spatial d'une table d'entités
pub trait SpatialIndex {
    fn database(&self) -> &str;

    fn table_name(&self) -> &str;

    /// Type de géométrie déclaré pour la table
    fn geometry_type(&self) -> GeometryType;

    /// Projection native des géométries, `None` si inconnue
    fn projection(&self) -> Option<&Projection>;

    fn column_names(&self) -> Vec<String>;

    /// Vrai si l'index a été construit
    fn is_indexed(&self) -> bool;

    /// Entités dont l'emprise recoupe `bbox`, exprimée dans `projection`
    fn query(
        &self,
        columns: &[String],
        bbox: &BoundingBox,
        projection: &Projection,
    ) -> Result<Box<dyn FeatureCursor + '_>>;

    /// Nombre total d'entités indexées
    fn count(&self) -> Result<u64>;

    /// Nombre d'entités dont l'emprise recoupe `bbox`
    fn count_in(&self, bbox: &BoundingBox, projection: &Projection) -> Result<u64>;
}

/// Libellés de colonnes (métadonnées de schéma)
pub trait ColumnAliases {
    fn alias(&self, table: &str, column: &str) -> Result<Option<String>>;
}

/// Nom affiché d'une colonne ; une erreur de recherche retombe sur le nom brut
pub fn column_display_name(aliases: Option<&dyn ColumnAliases>, table: &str, column: &str) -> String {
    let Some(aliases) = aliases else {
        return column.to_string();
    };
    match aliases.alias(table, column) {
        Ok(Some(alias)) => alias,
        Ok(None) => column.to_string(),
        Err(e) => {
            warn!(table, column, error = %e, "Failed to look up column alias");
            column.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::error::QueryError;
    use mapshape::Point;

    struct VecCursor {
        rows: std::vec::IntoIter<FeatureRow>,
        fail_after: Option<usize>,
        read: usize,
        closed: Rc<Cell<bool>>,
    }

    impl FeatureCursor for VecCursor {
        fn next_row(&mut self) -> Result<Option<FeatureRow>> {
            if self.fail_after == Some(self.read) {
                return Err(QueryError::index("cursor failure"));
            }
            self.read += 1;
            Ok(self.rows.next())
        }

        fn close(&mut self) {
            self.closed.set(true);
        }
    }

    fn row(id: i64) -> FeatureRow {
        FeatureRow {
            table: "poi".into(),
            columns: vec!["id".into(), "geom".into(), "name".into()],
            values: vec![
                ColumnValue::Integer(id),
                ColumnValue::Geometry(Geometry::Point(Point::new(1.0, 2.0))),
                ColumnValue::Text(format!("poi {}", id)),
            ],
            id_column: 0,
            geometry_column: Some(1),
        }
    }

    fn cursor(fail_after: Option<usize>, closed: &Rc<Cell<bool>>) -> ScopedCursor<'static> {
        ScopedCursor::new(Box::new(VecCursor {
            rows: vec![row(1), row(2)].into_iter(),
            fail_after,
            read: 0,
            closed: Rc::clone(closed),
        }))
    }

    #[test]
    fn test_row_accessors() {
        let row = row(7);
        assert_eq!(row.id(), Some(7));
        assert_eq!(row.geometry().map(Geometry::geometry_type), Some(GeometryType::Point));
        assert_eq!(row.value(2).map(ToString::to_string), Some("poi 7".to_string()));
    }

    #[test]
    fn test_collect_closes_cursor() {
        let closed = Rc::new(Cell::new(false));
        let rows = cursor(None, &closed).collect_rows().unwrap();
        assert_eq!(rows.len(), 2);
        assert!(closed.get());
    }

    #[test]
    fn test_cursor_closed_on_error() {
        let closed = Rc::new(Cell::new(false));
        let result = cursor(Some(1), &closed).collect_rows();
        assert!(matches!(result, Err(QueryError::Index(_))));
        assert!(closed.get());
    }

    struct FailingAliases;

    impl ColumnAliases for FailingAliases {
        fn alias(&self, _table: &str, column: &str) -> Result<Option<String>> {
            if column == "name" {
                Ok(Some("Nom".into()))
            } else {
                Err(QueryError::index("no data columns table"))
            }
        }
    }

    #[test]
    fn test_alias_fallback() {
        assert_eq!(column_display_name(None, "poi", "name"), "name");
        assert_eq!(column_display_name(Some(&FailingAliases), "poi", "name"), "Nom");
        assert_eq!(column_display_name(Some(&FailingAliases), "poi", "type"), "type");
    }

    #[test]
    fn test_column_value_serialize() {
        let values = vec![
            ColumnValue::Null,
            ColumnValue::Integer(3),
            ColumnValue::Text("a".into()),
            ColumnValue::Geometry(Geometry::Point(Point::new(1.0, 2.0))),
        ];
        let json = serde_json::to_value(&values).unwrap();
        assert_eq!(json[0], serde_json::Value::Null);
        assert_eq!(json[1], 3);
        assert_eq!(json[2], "a");
        assert!(json[3].as_str().is_some_and(|wkt| wkt.starts_with("POINT")));
    }
}
