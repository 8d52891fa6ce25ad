// ── PostgREST query builder ──
//
// Renders column selection, equality filters, and ordering into the
// query-string dialect understood by the store:
// `?select=*&program_id=eq.p1&order=name.asc`.

use std::fmt;

use url::Url;

/// Sort direction for an `order=` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

impl Order {
    fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// A select / filter / order specification for one table request.
///
/// Filters are equality-only: the catalog never needs range or pattern
/// filters server-side (text search happens locally).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    select: Option<String>,
    filters: Vec<(String, String)>,
    order: Vec<(String, Order)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Column list, including embedded resources (`*, category:categories(*)`).
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.select = Some(columns.into());
        self
    }

    /// Add a `column=eq.value` filter.
    pub fn eq(mut self, column: impl Into<String>, value: impl fmt::Display) -> Self {
        self.filters.push((column.into(), format!("eq.{value}")));
        self
    }

    /// Append an ordering clause. Multiple clauses sort lexicographically.
    pub fn order(mut self, column: impl Into<String>, direction: Order) -> Self {
        self.order.push((column.into(), direction));
        self
    }

    /// Whether at least one equality filter is present.
    ///
    /// Updates and deletes without a filter would touch every row, so the
    /// client refuses to send them.
    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    /// Write this query into the URL's query string.
    pub(crate) fn apply(&self, url: &mut Url) {
        if self.select.is_none() && self.filters.is_empty() && self.order.is_empty() {
            return;
        }

        let mut pairs = url.query_pairs_mut();
        if let Some(ref columns) = self.select {
            pairs.append_pair("select", columns);
        }
        for (column, value) in &self.filters {
            pairs.append_pair(column, value);
        }
        if !self.order.is_empty() {
            let spec = self
                .order
                .iter()
                .map(|(column, dir)| format!("{column}.{}", dir.as_str()))
                .collect::<Vec<_>>()
                .join(",");
            pairs.append_pair("order", &spec);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn rendered(query: &Query) -> Url {
        let mut url = Url::parse("https://store.example/rest/v1/programs").unwrap();
        query.apply(&mut url);
        url
    }

    fn pairs(url: &Url) -> Vec<(String, String)> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn empty_query_leaves_url_untouched() {
        let url = rendered(&Query::new());
        assert_eq!(url.query(), None);
    }

    #[test]
    fn renders_select_filter_and_order() {
        let query = Query::new()
            .select("*")
            .eq("category_id", "c1")
            .order("name", Order::Ascending);
        let url = rendered(&query);

        assert_eq!(
            pairs(&url),
            vec![
                ("select".to_owned(), "*".to_owned()),
                ("category_id".to_owned(), "eq.c1".to_owned()),
                ("order".to_owned(), "name.asc".to_owned()),
            ]
        );
    }

    #[test]
    fn multiple_orders_join_with_commas() {
        let query = Query::new()
            .order("is_popular", Order::Descending)
            .order("name", Order::Ascending);
        let url = rendered(&query);
        assert_eq!(
            pairs(&url),
            vec![("order".to_owned(), "is_popular.desc,name.asc".to_owned())]
        );
    }

    #[test]
    fn has_filters_tracks_eq_clauses() {
        assert!(!Query::new().select("*").has_filters());
        assert!(Query::new().eq("id", "x").has_filters());
    }
}
