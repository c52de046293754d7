// ============================================================================
// Structure : SearchQuery
// ============================================================================
// Filtres de recherche du marketplace (GET /items/search)
// ============================================================================

use thiserror::Error;

/// Catégories acceptées par le serveur
pub const CATEGORIES: [&str; 7] = [
    "BOOKS",
    "ELECTRONICS",
    "CLOTHES",
    "FURNITURE",
    "STATIONERY",
    "SPORTS",
    "OTHERS",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

/// Mot-clé et/ou catégorie ; vide = liste des objets actifs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub keyword: Option<String>,
    pub category: Option<String>,
}

impl SearchQuery {
    /// Construit la requête depuis la saisie brute
    ///
    /// Champs vides ignorés, catégorie insensible à la casse.
    pub fn parse(keyword: &str, category: &str) -> Result<Self, SearchError> {
        let keyword = Some(keyword.trim())
            .filter(|k| !k.is_empty())
            .map(str::to_string);

        let category = match category.trim() {
            "" => None,
            raw => {
                let upper = raw.to_uppercase();
                if !CATEGORIES.contains(&upper.as_str()) {
                    return Err(SearchError::UnknownCategory(raw.to_string()));
                }
                Some(upper)
            }
        };

        Ok(Self { keyword, category })
    }

    pub fn is_empty(&self) -> bool {
        self.keyword.is_none() && self.category.is_none()
    }

    /// Paramètres de query string (seulement les filtres présents)
    pub fn params(&self) -> Vec<(&'static str, &str)> {
        let mut params = Vec::new();
        if let Some(keyword) = &self.keyword {
            params.push(("keyword", keyword.as_str()));
        }
        if let Some(category) = &self.category {
            params.push(("category", category.as_str()));
        }
        params
    }

    /// Résumé pour le titre de la liste
    pub fn label(&self) -> String {
        match (&self.keyword, &self.category) {
            (Some(keyword), Some(category)) => format!("\"{}\" in {}", keyword, category),
            (Some(keyword), None) => format!("\"{}\"", keyword),
            (None, Some(category)) => category.clone(),
            (None, None) => "all".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_input() {
        let query = SearchQuery::parse("  calc ", "electronics").unwrap();
        assert_eq!(query.keyword.as_deref(), Some("calc"));
        assert_eq!(query.category.as_deref(), Some("ELECTRONICS"));
        assert_eq!(query.params(), vec![("keyword", "calc"), ("category", "ELECTRONICS")]);
        assert_eq!(query.label(), "\"calc\" in ELECTRONICS");
    }

    #[test]
    fn test_empty_fields_are_dropped() {
        let query = SearchQuery::parse("", "  ").unwrap();
        assert!(query.is_empty());
        assert!(query.params().is_empty());

        let query = SearchQuery::parse("", "books").unwrap();
        assert_eq!(query.params(), vec![("category", "BOOKS")]);
    }

    #[test]
    fn test_unknown_category() {
        assert_eq!(
            SearchQuery::parse("lamp", "toys"),
            Err(SearchError::UnknownCategory("toys".to_string()))
        );
    }
}
