//! Query-string parameters of the list endpoints.
//!
//! Every field is optional at this layer; which combinations are valid is
//! decided by the planner.

use serde::Deserialize;

use globalgood_core::catalog::{Collection, ValidationError};
use globalgood_core::query::{FilterValue, Filters, Pagination};
use globalgood_core::serde::{
    deserialize_flag, deserialize_optional_list, deserialize_optional_number,
    deserialize_optional_string,
};

/// `GET /products`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProductsQuery {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub collection: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub max_price: Option<f64>,
    /// `true` restricts to products in stock.
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub availability: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_list")]
    pub countries: Option<Vec<String>>,
    /// Comma-separated `collection:name` pairs; switches to a batch fetch.
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub products: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub cursor: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub limit: Option<u32>,
}

impl ProductsQuery {
    pub fn filters(&self) -> Filters {
        Filters::new()
            .with_opt("collection", self.collection.clone())
            .with_opt("maxPrice", self.max_price)
            .with_opt("availability", self.availability.clone())
            .with_opt(
                "countries",
                self.countries.clone().map(FilterValue::any_of),
            )
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.cursor.clone(), self.limit)
    }

    /// Parses the `products` parameter into unique `(collection, name)` pairs,
    /// keeping first-seen order.
    pub fn product_keys(&self) -> Result<Option<Vec<(Collection, String)>>, ValidationError> {
        let Some(products) = &self.products else {
            return Ok(None);
        };

        let mut keys: Vec<(Collection, String)> = Vec::new();
        for entry in products.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (collection, name) = entry
                .split_once(':')
                .filter(|(_, name)| !name.trim().is_empty())
                .ok_or(ValidationError::Required("products"))?;
            let key = (collection.trim().parse()?, name.trim().to_string());
            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        if keys.is_empty() {
            return Err(ValidationError::Required("products"));
        }
        Ok(Some(keys))
    }
}

/// `GET /products/search`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchQuery {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub q: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub cursor: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub limit: Option<u32>,
}

/// Cursor and page size only.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageQuery {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub cursor: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.cursor.clone(), self.limit)
    }
}

/// `GET /reviews/username`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewsByAuthorQuery {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub cursor: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub limit: Option<u32>,
}

/// `GET /blog`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BlogQuery {
    #[serde(
        default,
        alias = "productName",
        deserialize_with = "deserialize_optional_string"
    )]
    pub theme: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub created_at: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub product_collection: Option<String>,
    /// Include content and comment references in listed posts.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub full_post: bool,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub cursor: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub limit: Option<u32>,
}

impl BlogQuery {
    pub fn filters(&self) -> Filters {
        Filters::new()
            .with_opt("theme", self.theme.clone())
            .with_opt("createdAt", self.created_at)
            .with_opt("productCollection", self.product_collection.clone())
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.cursor.clone(), self.limit)
    }
}

/// `DELETE /blog/admin/delete`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBlogPostQuery {
    #[serde(alias = "theme")]
    pub product_name: String,
    pub created_at: i64,
}

/// `GET /blog/{theme}/{createdAt}/comments`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommentsQuery {
    /// Window size; only honoured for long comment logs.
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub limit: Option<u32>,
    /// Position returned as `nextCursor` by the previous window.
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub cursor: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn products(value: &str) -> ProductsQuery {
        ProductsQuery {
            products: Some(value.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_product_keys_dedupes_in_order() {
        let keys = products("home-living:Woven Basket, food-beverages:Cacao Nibs,home-living:Woven Basket")
            .product_keys()
            .unwrap()
            .unwrap();

        assert_eq!(
            keys,
            vec![
                (Collection::HomeLiving, "Woven Basket".to_string()),
                (Collection::FoodBeverages, "Cacao Nibs".to_string()),
            ]
        );
    }

    #[test]
    fn test_product_keys_rejects_malformed_pair() {
        assert_eq!(
            products("home-living").product_keys(),
            Err(ValidationError::Required("products"))
        );
        assert_eq!(
            products("garden:Rake").product_keys(),
            Err(ValidationError::UnknownCollection("garden".to_string()))
        );
    }

    #[test]
    fn test_product_keys_absent_without_parameter() {
        assert_eq!(ProductsQuery::default().product_keys(), Ok(None));
    }

    #[test]
    fn test_products_query_from_query_string() {
        let query: ProductsQuery = from_query(
            "maxPrice=100&availability=true&countries=Mexico,Brazil",
        );
        let filters = query.filters();

        assert_eq!(filters.get("maxPrice"), Some(&FilterValue::from(100.0)));
        assert_eq!(filters.get("availability"), Some(&FilterValue::from("true")));
        assert_eq!(
            filters.get("countries"),
            Some(&FilterValue::any_of(["Mexico", "Brazil"]))
        );
        assert!(!filters.contains("collection"));
    }

    #[test]
    fn test_blog_query_accepts_product_name_alias() {
        let query: BlogQuery = from_query("productName=Coffee&createdAt=7&fullPost=true");

        assert_eq!(query.theme.as_deref(), Some("Coffee"));
        assert_eq!(query.created_at, Some(7));
        assert!(query.full_post);
    }

    fn from_query<T: serde::de::DeserializeOwned>(query: &str) -> T {
        let uri: axum::http::Uri = format!("/?{query}").parse().unwrap();
        axum::extract::Query::<T>::try_from_uri(&uri).unwrap().0
    }
}
