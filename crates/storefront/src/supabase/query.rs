//! PostgREST query construction for the product catalog.
//!
//! Filter, sort, and search expressions are assembled as query-string
//! parameters following PostgREST operator syntax (`stock=gt.0`,
//! `category=eq.hats`, `or=(title.ilike.*wool*,...)`).

/// Sort orders the shop page offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    /// Most recently created first.
    #[default]
    Newest,
    /// Cheapest first.
    PriceLowToHigh,
    /// Most expensive first.
    PriceHighToLow,
}

impl ProductSort {
    /// The PostgREST `order` parameter value.
    #[must_use]
    pub const fn order_param(&self) -> &'static str {
        match self {
            Self::Newest => "created_at.desc",
            Self::PriceLowToHigh => "price.asc",
            Self::PriceHighToLow => "price.desc",
        }
    }

    /// Parse the shop page's `sort` query value. Unknown values fall back
    /// to newest-first rather than erroring.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("price-low") => Self::PriceLowToHigh,
            Some("price-high") => Self::PriceHighToLow,
            _ => Self::Newest,
        }
    }

    /// The shop page's `sort` query value for this sort.
    #[must_use]
    pub const fn query_value(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceLowToHigh => "price-low",
            Self::PriceHighToLow => "price-high",
        }
    }
}

/// A product listing query: stock filter, category, search, sort, limit.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Only rows with `stock > 0` (the storefront default; admin lists all).
    pub in_stock_only: bool,
    /// Exact category match, if set.
    pub category: Option<String>,
    /// Case-insensitive title/description substring search, if set.
    pub search: Option<String>,
    /// Sort order.
    pub sort: ProductSort,
    /// Row limit, if set.
    pub limit: Option<u32>,
}

impl ProductQuery {
    /// The storefront's base listing: in-stock products, newest first.
    #[must_use]
    pub fn storefront() -> Self {
        Self {
            in_stock_only: true,
            ..Self::default()
        }
    }

    /// Assemble the PostgREST query parameters.
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("select", "*".to_owned())];

        if self.in_stock_only {
            params.push(("stock", "gt.0".to_owned()));
        }

        if let Some(category) = &self.category {
            params.push(("category", format!("eq.{}", sanitize_term(category))));
        }

        if let Some(search) = &self.search
            && !search.trim().is_empty()
        {
            let term = sanitize_term(search);
            params.push((
                "or",
                format!("(title.ilike.*{term}*,description.ilike.*{term}*)"),
            ));
        }

        params.push(("order", self.sort.order_param().to_owned()));

        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }

        params
    }

    /// Searches always hit the backend; plain listings may be cached.
    #[must_use]
    pub const fn is_cacheable(&self) -> bool {
        self.search.is_none()
    }

    /// Cache key covering every parameter that changes the result set.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!(
            "products:{}:{}:{}:{}",
            self.in_stock_only,
            self.category.as_deref().unwrap_or(""),
            self.sort.order_param(),
            self.limit.map_or_else(String::new, |l| l.to_string()),
        )
    }
}

/// Strip characters that carry meaning inside PostgREST filter expressions.
///
/// User input is embedded into `or=(...)` and `eq.` expressions; commas,
/// parens, dots and quotes would change the expression structure.
fn sanitize_term(term: &str) -> String {
    term.trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '(' | ')' | '"' | '\\' | '.'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storefront_query_params() {
        let params = ProductQuery::storefront().to_params();
        assert!(params.contains(&("select", "*".to_owned())));
        assert!(params.contains(&("stock", "gt.0".to_owned())));
        assert!(params.contains(&("order", "created_at.desc".to_owned())));
    }

    #[test]
    fn test_category_filter() {
        let query = ProductQuery {
            category: Some("blankets".to_owned()),
            ..ProductQuery::storefront()
        };
        assert!(query.to_params().contains(&("category", "eq.blankets".to_owned())));
    }

    #[test]
    fn test_search_builds_or_expression() {
        let query = ProductQuery {
            search: Some("wool scarf".to_owned()),
            ..ProductQuery::storefront()
        };
        let params = query.to_params();
        assert!(params.contains(&(
            "or",
            "(title.ilike.*wool scarf*,description.ilike.*wool scarf*)".to_owned()
        )));
        assert!(!query.is_cacheable());
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let query = ProductQuery {
            search: Some("   ".to_owned()),
            ..ProductQuery::storefront()
        };
        assert!(query.to_params().iter().all(|(k, _)| *k != "or"));
    }

    #[test]
    fn test_search_term_is_sanitized() {
        let query = ProductQuery {
            search: Some("a,b(c)d.\"e\\".to_owned()),
            ..ProductQuery::storefront()
        };
        let params = query.to_params();
        let or = params
            .iter()
            .find(|(k, _)| *k == "or")
            .map(|(_, v)| v.clone())
            .unwrap_or_default();
        assert_eq!(or, "(title.ilike.*abcde*,description.ilike.*abcde*)");
    }

    #[test]
    fn test_sort_round_trips_query_values() {
        for sort in [
            ProductSort::Newest,
            ProductSort::PriceLowToHigh,
            ProductSort::PriceHighToLow,
        ] {
            assert_eq!(ProductSort::from_query(Some(sort.query_value())), sort);
        }
        assert_eq!(ProductSort::from_query(None), ProductSort::Newest);
        assert_eq!(ProductSort::from_query(Some("bogus")), ProductSort::Newest);
    }

    #[test]
    fn test_cache_key_varies_by_filters() {
        let base = ProductQuery::storefront();
        let with_category = ProductQuery {
            category: Some("hats".to_owned()),
            ..ProductQuery::storefront()
        };
        assert_ne!(base.cache_key(), with_category.cache_key());
    }
}
