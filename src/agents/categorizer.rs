//! Message categorization step.
//!
//! Maps a user message to one label from a closed set. Always returns some
//! label; transport failures and unrecognized model output both fall back to
//! `GeneralInquiry`.

use crate::core::Completion;
use std::sync::Arc;

const CATEGORIZER_PROMPT: &str = r#"You are a sophisticated AI agent specializing in categorizing user queries into one of the following categories:
[PRODUCT_INFO] - Questions about product information, features, specifications, price, existence, availability, etc.
[PRODUCT_COMPARISON] - Questions comparing multiple products,
[PRODUCT_RECOMMENDATION] - Questions asking for product recommendations
[PRODUCT_REVIEWS] - Questions about product reviews or ratings
[GENERAL_INQUIRY] - General questions not related to specific products
[CUSTOMER_SERVICE] - Questions about customer service, shipping, returns, etc.
[OTHER] - Any other type of question

Return only the category as plain text, without any line breaks, including the "\n" character, HTML elements, special characters, or trailing newline characters. Ensure the output is a continuous string of text."#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageCategory {
    ProductInfo,
    ProductComparison,
    ProductRecommendation,
    ProductReviews,
    GeneralInquiry,
    CustomerService,
    Other,
}

impl MessageCategory {
    pub const ALL: [MessageCategory; 7] = [
        MessageCategory::ProductInfo,
        MessageCategory::ProductComparison,
        MessageCategory::ProductRecommendation,
        MessageCategory::ProductReviews,
        MessageCategory::GeneralInquiry,
        MessageCategory::CustomerService,
        MessageCategory::Other,
    ];

    /// The literal bracketed tag used on the wire and in prompts.
    pub fn as_tag(&self) -> &'static str {
        match self {
            MessageCategory::ProductInfo => "[PRODUCT_INFO]",
            MessageCategory::ProductComparison => "[PRODUCT_COMPARISON]",
            MessageCategory::ProductRecommendation => "[PRODUCT_RECOMMENDATION]",
            MessageCategory::ProductReviews => "[PRODUCT_REVIEWS]",
            MessageCategory::GeneralInquiry => "[GENERAL_INQUIRY]",
            MessageCategory::CustomerService => "[CUSTOMER_SERVICE]",
            MessageCategory::Other => "[OTHER]",
        }
    }

    /// Find the first recognized tag anywhere in the raw model output.
    pub fn from_response(raw: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .filter_map(|category| raw.find(category.as_tag()).map(|pos| (pos, category)))
            .min_by_key(|(pos, _)| *pos)
            .map(|(_, category)| category)
    }
}

impl std::fmt::Display for MessageCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

pub struct Categorizer {
    completion: Arc<dyn Completion>,
}

impl Categorizer {
    pub fn new(completion: Arc<dyn Completion>) -> Self {
        Self { completion }
    }

    pub async fn categorize(&self, message: &str) -> MessageCategory {
        match self.completion.complete(CATEGORIZER_PROMPT, message).await {
            Ok(raw) => MessageCategory::from_response(&raw).unwrap_or_else(|| {
                tracing::warn!(
                    "[Categorizer] Unrecognized category in model output: {:?}",
                    raw
                );
                MessageCategory::GeneralInquiry
            }),
            Err(e) => {
                tracing::warn!("[Categorizer] Completion failed: {}", e);
                MessageCategory::GeneralInquiry
            }
        }
    }
}
