use serde::{Deserialize, Serialize};

use crate::domain::product::Product;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// Raw list parameters exactly as they arrive on the query string.
///
/// Values are kept as text so malformed numbers fall back to defaults
/// instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    #[serde(rename = "minPrice")]
    pub min_price: Option<String>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<String>,
}

/// Normalized list query handed to the catalog store.
///
/// Matches products where `search` is a substring of `nome`, `descricao` or
/// `codigo` (ASCII case-insensitive) and `preco` lies in
/// `[min_price, max_price]` inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductQuery {
    pub page: u32,
    pub limit: u32,
    pub search: String,
    pub min_price: f64,
    pub max_price: f64,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            search: String::new(),
            min_price: 0.0,
            max_price: f64::MAX,
        }
    }
}

impl ProductQuery {
    pub fn from_params(params: &ProductListParams) -> Self {
        let defaults = Self::default();
        Self {
            page: parse_positive(params.page.as_deref()).unwrap_or(defaults.page),
            limit: parse_positive(params.limit.as_deref())
                .unwrap_or(defaults.limit),
            search: params.search.clone().unwrap_or_default(),
            min_price: parse_finite(params.min_price.as_deref())
                .unwrap_or(defaults.min_price),
            max_price: parse_finite(params.max_price.as_deref())
                .unwrap_or(defaults.max_price),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// `LIKE` pattern for the search term with `\` as the escape character.
    pub fn like_pattern(&self) -> String {
        let mut pattern = String::with_capacity(self.search.len() + 2);
        pattern.push('%');
        for ch in self.search.chars() {
            if matches!(ch, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(ch);
        }
        pattern.push('%');
        pattern
    }
}

/// One page of list results plus the unpaginated match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub total: i64,
    pub products: Vec<Product>,
}

// Leading integer digits are honoured ("3abc" -> 3); zero and negatives are
// treated as absent.
fn parse_positive(raw: Option<&str>) -> Option<u32> {
    let raw = raw?.trim();
    let digits: &str = {
        let end = raw
            .char_indices()
            .find(|(i, c)| !(c.is_ascii_digit() || (*i == 0 && *c == '+')))
            .map(|(i, _)| i)
            .unwrap_or(raw.len());
        &raw[..end]
    };
    digits.parse::<u32>().ok().filter(|v| *v > 0)
}

fn parse_finite(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
