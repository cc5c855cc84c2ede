//! Résultats tabulaires d'une requête au clic

use std::collections::BTreeMap;

use serde::Serialize;

use crate::index::ColumnValue;

/// Ligne de résultat : valeurs non nulles par nom de colonne affiché
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRowData {
    pub values: BTreeMap<String, ColumnValue>,
    pub id_column: Option<String>,
    pub geometry_column: Option<String>,
}

impl FeatureRowData {
    pub fn id(&self) -> Option<&ColumnValue> {
        self.id_column.as_ref().and_then(|c| self.values.get(c))
    }

    pub fn geometry(&self) -> Option<&ColumnValue> {
        self.geometry_column.as_ref().and_then(|c| self.values.get(c))
    }
}

/// Résultats d'une table
///
/// `rows` est vide quand seul le nombre d'entités est rapporté.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureTableData {
    pub name: String,
    pub count: u64,
    pub rows: Vec<FeatureRowData>,
}

impl FeatureTableData {
    /// Résumé sans détail des lignes
    pub fn summary(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(name: impl Into<String>, count: u64, rows: Vec<FeatureRowData>) -> Self {
        Self {
            name: name.into(),
            count,
            rows,
        }
    }

    pub fn is_summary(&self) -> bool {
        self.rows.is_empty()
    }
}
