//! Parser for the marker protocol embedded in composed responses.
//!
//! The response model signals post-processing through two literal markers:
//! `[SHOW_PRODUCT_INFO]` requests product-card rendering, and
//! `[PRODUCT_IDS]{"ids":[...]}[/PRODUCT_IDS]` lists which retrieved products
//! the answer referenced. Both are optional and stripped before persistence.

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::OnceLock;

pub const SHOW_PRODUCT_INFO: &str = "[SHOW_PRODUCT_INFO]";

fn product_ids_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\[PRODUCT_IDS\](.*?)\[/PRODUCT_IDS\]").unwrap())
}

#[derive(Debug, Deserialize)]
struct IdPayload {
    ids: Vec<Value>,
}

/// The raw model output decomposed into its machine-readable parts.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMarkers {
    pub show_product_info: bool,
    /// Ids the model claims to have referenced. None means the block was
    /// missing or malformed, in which case every retrieved product is shown.
    pub referenced_ids: Option<Vec<String>>,
    /// The response with every marker removed. Safe to persist and display.
    pub cleaned_text: String,
}

impl ResponseMarkers {
    /// Decompose raw model output. Tolerates repeated or out-of-order
    /// markers; only the first id block is honored.
    pub fn parse(raw: &str) -> Self {
        let show_product_info = raw.contains(SHOW_PRODUCT_INFO);

        let re = product_ids_regex();
        let referenced_ids = re.captures(raw).and_then(|caps| {
            let body = caps.get(1).map(|m| m.as_str())?;
            match serde_json::from_str::<IdPayload>(body) {
                Ok(payload) => Some(
                    payload
                        .ids
                        .iter()
                        .filter_map(|id| match id {
                            Value::String(s) => Some(s.clone()),
                            Value::Number(n) => Some(n.to_string()),
                            _ => None,
                        })
                        .collect(),
                ),
                Err(e) => {
                    tracing::warn!("[ResponseMarkers] Malformed PRODUCT_IDS payload: {}", e);
                    None
                }
            }
        });

        let without_ids = re.replace_all(raw, "");
        let cleaned_text = without_ids.replace(SHOW_PRODUCT_INFO, "").trim().to_string();

        Self {
            show_product_info,
            referenced_ids,
            cleaned_text,
        }
    }
}
