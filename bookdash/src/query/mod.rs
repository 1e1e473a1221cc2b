//! Query construction for the book index
//!
//! Every search is a single `function_score` request: a weighted
//! `multi_match` over the book text fields, boosted by a
//! `field_value_factor` on the average rating.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Default number of results per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Default index holding the book documents
pub const DEFAULT_INDEX: &str = "books_index";

/// Dampening function applied to the rating before scaling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    None,
    Log,
    Log1p,
    Log2p,
    Ln,
    Ln1p,
    Ln2p,
    Square,
    #[default]
    Sqrt,
    Reciprocal,
}

impl Modifier {
    /// Name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Modifier::None => "none",
            Modifier::Log => "log",
            Modifier::Log1p => "log1p",
            Modifier::Log2p => "log2p",
            Modifier::Ln => "ln",
            Modifier::Ln1p => "ln1p",
            Modifier::Ln2p => "ln2p",
            Modifier::Square => "square",
            Modifier::Sqrt => "sqrt",
            Modifier::Reciprocal => "reciprocal",
        }
    }

    /// Apply the modifier to a raw field value
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            Modifier::None => value,
            Modifier::Log => value.log10(),
            Modifier::Log1p => (value + 1.0).log10(),
            Modifier::Log2p => (value + 2.0).log10(),
            Modifier::Ln => value.ln(),
            Modifier::Ln1p => value.ln_1p(),
            Modifier::Ln2p => (value + 2.0).ln(),
            Modifier::Square => value * value,
            Modifier::Sqrt => value.sqrt(),
            Modifier::Reciprocal => 1.0 / value,
        }
    }
}

impl std::fmt::Display for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Modifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Modifier::None),
            "log" => Ok(Modifier::Log),
            "log1p" => Ok(Modifier::Log1p),
            "log2p" => Ok(Modifier::Log2p),
            "ln" => Ok(Modifier::Ln),
            "ln1p" => Ok(Modifier::Ln1p),
            "ln2p" => Ok(Modifier::Ln2p),
            "square" => Ok(Modifier::Square),
            "sqrt" => Ok(Modifier::Sqrt),
            "reciprocal" => Ok(Modifier::Reciprocal),
            _ => Err(Error::InvalidQuery(format!("Unknown modifier: {}", s))),
        }
    }
}

/// How the text relevance score and the rating factor are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoostMode {
    /// text score × rating factor (default)
    #[default]
    Multiply,
    Sum,
    Avg,
    Max,
    Min,
    /// Rating factor only
    Replace,
}

impl BoostMode {
    /// Name used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            BoostMode::Multiply => "multiply",
            BoostMode::Sum => "sum",
            BoostMode::Avg => "avg",
            BoostMode::Max => "max",
            BoostMode::Min => "min",
            BoostMode::Replace => "replace",
        }
    }

    /// Combine a text-match score with a function score
    pub fn combine(&self, text_score: f64, factor_value: f64) -> f64 {
        match self {
            BoostMode::Multiply => text_score * factor_value,
            BoostMode::Sum => text_score + factor_value,
            BoostMode::Avg => (text_score + factor_value) / 2.0,
            BoostMode::Max => text_score.max(factor_value),
            BoostMode::Min => text_score.min(factor_value),
            BoostMode::Replace => factor_value,
        }
    }
}

impl std::fmt::Display for BoostMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BoostMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "multiply" => Ok(BoostMode::Multiply),
            "sum" => Ok(BoostMode::Sum),
            "avg" => Ok(BoostMode::Avg),
            "max" => Ok(BoostMode::Max),
            "min" => Ok(BoostMode::Min),
            "replace" => Ok(BoostMode::Replace),
            _ => Err(Error::InvalidQuery(format!("Unknown boost mode: {}", s))),
        }
    }
}

/// A field searched by the text match, with its boost
#[derive(Debug, Clone, PartialEq)]
pub struct FieldWeight {
    pub field: String,
    pub weight: f64,
}

impl FieldWeight {
    pub fn new(field: impl Into<String>, weight: f64) -> Self {
        FieldWeight {
            field: field.into(),
            weight,
        }
    }

    /// `field^weight`, or the bare field name for a weight of 1
    pub fn to_query_field(&self) -> String {
        if self.weight == 1.0 {
            self.field.clone()
        } else {
            format!("{}^{}", self.field, self.weight)
        }
    }
}

/// Ordered set of weighted fields for the multi-field match
#[derive(Debug, Clone, PartialEq)]
pub struct RelevanceSpec {
    pub fields: Vec<FieldWeight>,
}

impl Default for RelevanceSpec {
    fn default() -> Self {
        RelevanceSpec {
            fields: vec![
                FieldWeight::new("Title", 2.0),
                FieldWeight::new("Author", 1.5),
                FieldWeight::new("Publisher", 1.0),
                FieldWeight::new("Description", 1.0),
                FieldWeight::new("Search_Text", 1.0),
            ],
        }
    }
}

impl RelevanceSpec {
    pub fn query_fields(&self) -> Vec<String> {
        self.fields.iter().map(FieldWeight::to_query_field).collect()
    }
}

/// Score modifier derived from the numeric rating field
#[derive(Debug, Clone, PartialEq)]
pub struct RatingBoost {
    pub field: String,
    pub factor: f64,
    pub modifier: Modifier,
    /// Used when a document has no rating
    pub missing: f64,
}

impl Default for RatingBoost {
    fn default() -> Self {
        RatingBoost {
            field: "Average_Rating".to_string(),
            factor: 0.1,
            modifier: Modifier::Sqrt,
            missing: 1.0,
        }
    }
}

impl RatingBoost {
    /// Rating factor for a document: `1 + factor * modifier(rating)`.
    /// A document without a rating uses `missing` in place of the rating.
    ///
    /// Negative ratings are clamped to zero so the factor never drops
    /// below 1.
    pub fn factor_value(&self, rating: Option<f64>) -> f64 {
        let value = rating.unwrap_or(self.missing).max(0.0);
        1.0 + self.factor * self.modifier.apply(value)
    }

    fn to_json(&self) -> Value {
        json!({
            "field": self.field,
            "factor": self.factor,
            "modifier": self.modifier.as_str(),
            "missing": self.missing,
        })
    }
}

/// One page of a search against a target index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query_text: String,
    pub target_index: String,
    pub page_size: u32,
    pub page_number: u32,
}

impl SearchRequest {
    /// Create a request. The query text is passed through untouched;
    /// page size and page number must both be at least 1.
    pub fn new(
        query_text: impl Into<String>,
        target_index: impl Into<String>,
        page_size: u32,
        page_number: u32,
    ) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::InvalidQuery("page size must be at least 1".to_string()));
        }
        if page_number == 0 {
            return Err(Error::InvalidQuery(
                "page number must be at least 1".to_string(),
            ));
        }

        Ok(SearchRequest {
            query_text: query_text.into(),
            target_index: target_index.into(),
            page_size,
            page_number,
        })
    }

    /// Number of leading matches skipped before this page
    pub fn offset(&self) -> u64 {
        (self.page_number as u64 - 1) * self.page_size as u64
    }

    /// The same request for another page
    pub fn with_page(&self, page_number: u32) -> Result<Self> {
        SearchRequest::new(
            self.query_text.clone(),
            self.target_index.clone(),
            self.page_size,
            page_number,
        )
    }
}

/// Builds `function_score` request bodies
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryBuilder {
    pub relevance: RelevanceSpec,
    pub rating: RatingBoost,
    pub boost_mode: BoostMode,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_boost_mode(mut self, boost_mode: BoostMode) -> Self {
        self.boost_mode = boost_mode;
        self
    }

    /// Request body for one page of results
    pub fn body(&self, request: &SearchRequest) -> Value {
        json!({
            "query": {
                "function_score": {
                    "query": {
                        "multi_match": {
                            "query": request.query_text,
                            "fields": self.relevance.query_fields(),
                        }
                    },
                    "field_value_factor": self.rating.to_json(),
                    "boost_mode": self.boost_mode.as_str(),
                }
            },
            "size": request.page_size,
            "from": request.offset(),
        })
    }

    /// Local model of the engine's final score for a document
    pub fn combined_score(&self, text_score: f64, rating: Option<f64>) -> f64 {
        self.boost_mode
            .combine(text_score, self.rating.factor_value(rating))
    }
}

/// Build the default request body for a query page
pub fn build_query(query_text: &str, page_size: u32, page_number: u32) -> Result<Value> {
    let request = SearchRequest::new(query_text, DEFAULT_INDEX, page_size, page_number)?;
    Ok(QueryBuilder::default().body(&request))
}
