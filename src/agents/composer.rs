//! Response composer: builds the single instruction prompt carrying the
//! product context, category, history, and the marker-protocol contract,
//! then obtains the final natural-language answer.

use crate::agents::categorizer::MessageCategory;
use crate::agents::format_transcript;
use crate::core::Completion;
use crate::storage::Message;
use std::sync::Arc;

pub struct ResponseComposer {
    completion: Arc<dyn Completion>,
}

impl ResponseComposer {
    pub fn new(completion: Arc<dyn Completion>) -> Self {
        Self { completion }
    }

    /// Compose an answer to the *original* (untranslated) user message.
    /// On failure returns an apology string which is still persisted as the
    /// assistant turn.
    pub async fn compose(
        &self,
        message: &str,
        context: &str,
        category: MessageCategory,
        history: &[Message],
    ) -> String {
        let system_prompt = build_prompt(message, context, category, history);

        match self.completion.complete(&system_prompt, message).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("[ResponseComposer] Completion failed: {}", e);
                format!("Sorry, an error occurred while generating a response: {}", e)
            }
        }
    }
}

fn build_prompt(
    message: &str,
    context: &str,
    category: MessageCategory,
    history: &[Message],
) -> String {
    let transcript = format_transcript(history);

    format!(
        r#"You are a helpful shopping assistant that can answer questions about products. Based on the user's question "{message}", analyze the product information in the context: {context} and return information only about the most relevant matching product(s). Answer questions related to the {category} of the product(s). Answer as humanly as possible and in the same language as the {message}, but be careful with special names such as brand, model, etc. - don't translate those.

If the category is [PRODUCT_INFO] or [PRODUCT_RECOMMENDATION] and the question is about general product information (like price, features, specifications etc), include [SHOW_PRODUCT_INFO] at the end of your response so that product information can be formatted and displayed to the user.

If the question is specifically about product reviews, ratings or customer feedback, do not include [SHOW_PRODUCT_INFO]. Instead, focus on providing a summary of the reviews and ratings from the available data.

Also consider follow up questions. If the user asks a follow up question about a product mentioned earlier, your answer should be about the SAME product. Do not switch to a different product unless the user explicitly asks about a new product. Even if there are other matching products in the context, do not switch to a different product unless explicitly asked.

IMPORTANT: Maintain context from previous messages. If the user asks a follow-up question about a product mentioned earlier, your answer should be about the SAME product. Do not switch to a different product unless the user explicitly asks about a new product.

For example:
User: "What Apple products do you have?"
Assistant: "We have MacBook Pro 14 inch..." (about Apple MacBook)
User: "What is the warranty period?"
Assistant: "The warranty period for the MacBook Pro is..." (should continue talking about the MacBook, not switch to a different product)

At the end of your response, after [SHOW_PRODUCT_INFO], include a JSON object with an array of product IDs that you referenced in your answer, in the format: [PRODUCT_IDS]{{"ids":["id1","id2"]}}[/PRODUCT_IDS]

Here is the conversation history so far:
{transcript}

User: {message}
Assistant:"#,
        message = message,
        context = context,
        category = category.as_tag(),
        transcript = transcript,
    )
}
