//! Result rendering
//!
//! Projects a [`SearchResult`] into display blocks. Rendering borrows the
//! result and never reorders hits.

use crate::search::{ScoredDocument, SearchResult};
use serde::Serialize;
use serde_json::Value;

/// Placeholder for fields a document does not carry
pub const NOT_AVAILABLE: &str = "N/A";

/// Message shown instead of an empty result list
pub const NO_RESULTS: &str = "No results found for your query.";

/// Source fields shown for every hit, in display order
pub const DISPLAY_FIELDS: [&str; 7] = [
    "Title",
    "Author",
    "Publisher",
    "timestamp",
    "Average_Rating",
    "Description",
    "Format",
];

/// Display block for a single hit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HitBlock {
    /// `"{title} (Score: {score:.2})"`
    pub label: String,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub timestamp: String,
    pub rating: String,
    pub description: String,
    pub format: String,
}

impl HitBlock {
    /// Labelled detail lines shown under the title
    pub fn details(&self) -> [(&'static str, &str); 6] {
        [
            ("Author", self.author.as_str()),
            ("Publisher", self.publisher.as_str()),
            ("Timestamp", self.timestamp.as_str()),
            ("Rating", self.rating.as_str()),
            ("Description", self.description.as_str()),
            ("Format", self.format.as_str()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Hit(HitBlock),
    NoResults,
}

/// Rendered page of results
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rendering {
    pub total_matches: u64,
    pub blocks: Vec<Block>,
}

impl Rendering {
    pub fn hit_blocks(&self) -> impl Iterator<Item = &HitBlock> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Hit(hit) => Some(hit),
            Block::NoResults => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.hit_blocks().next().is_none()
    }
}

/// Display text for a source value; strings lose their quotes
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Field value as display text, or `N/A`
pub fn field_or_default(doc: &ScoredDocument, name: &str) -> String {
    doc.field(name)
        .map(display_value)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn render_hit(doc: &ScoredDocument) -> HitBlock {
    let [title, author, publisher, timestamp, rating, description, format] =
        DISPLAY_FIELDS.map(|name| field_or_default(doc, name));
    HitBlock {
        label: format!("{} (Score: {:.2})", title, doc.score),
        title,
        author,
        publisher,
        timestamp,
        rating,
        description,
        format,
    }
}

/// Render a page of results
pub fn render(result: &SearchResult) -> Rendering {
    let blocks = if result.hits.is_empty() {
        vec![Block::NoResults]
    } else {
        result.hits.iter().map(render_hit).map(Block::Hit).collect()
    };

    Rendering {
        total_matches: result.total_estimated_matches,
        blocks,
    }
}

/// Plain-text form of a rendering for terminal output
pub fn format_text(rendering: &Rendering) -> String {
    let mut out = format!("Total matching documents: {}\n", rendering.total_matches);

    if rendering.is_empty() {
        out.push_str(&format!("\n{}\n", NO_RESULTS));
        return out;
    }

    out.push_str("\nSearch Results\n\n");
    for hit in rendering.hit_blocks() {
        out.push_str(&format!("▸ {}\n", hit.label));
        for (name, value) in hit.details() {
            out.push_str(&format!("    {}: {}\n", name, value));
        }
        out.push('\n');
    }
    out
}
