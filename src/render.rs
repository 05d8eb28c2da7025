use crate::backend::SearchResult;

/// Display form of one result: the name as heading, the price as paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultBlock {
    pub heading: String,
    pub body: String,
    /// Brand, category and EAN joined, when the record has any of them
    pub detail: Option<String>,
}

/// Build one block per result, in response order
pub fn blocks(results: &[SearchResult]) -> Vec<ResultBlock> {
    results.iter().map(block).collect()
}

pub fn block(result: &SearchResult) -> ResultBlock {
    let mut parts = Vec::new();
    if !result.brand.is_empty() {
        parts.push(result.brand.to_string());
    }
    if !result.category.is_empty() {
        parts.push(result.category.to_string());
    }
    if !result.ean.is_empty() {
        parts.push(format!("EAN {}", result.ean));
    }

    ResultBlock {
        heading: result.name.to_string(),
        body: result.price.to_string(),
        detail: if parts.is_empty() {
            None
        } else {
            Some(parts.join(" · "))
        },
    }
}

/// Plain-text form used by the command-line client
pub fn to_text(blocks: &[ResultBlock]) -> String {
    let mut out = String::new();
    for block in blocks {
        out.push_str(&block.heading);
        out.push('\n');
        out.push_str("  ");
        out.push_str(&block.body);
        out.push('\n');
        if let Some(detail) = &block.detail {
            out.push_str("  ");
            out.push_str(detail);
            out.push('\n');
        }
    }
    out
}
