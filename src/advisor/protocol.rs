use crate::catalog::Catalog;
use crate::session::Message;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const MAX_TOKENS: u32 = 500;
pub const TEMPERATURE: f32 = 0.8;

pub const FALLBACK_REPLY: &str = "I apologize, but I received an unexpected response format. \
                                  Please try asking your question again.";

const SYSTEM_PREAMBLE: &str = "You are a helpful beauty and skincare advisor inside the Shelfie \
desktop app. Help users build personalized routines using the available products. Be friendly, \
knowledgeable, and provide specific product recommendations when appropriate. Format your \
responses using markdown for better readability (use **bold**, *italics*, lists, etc.).";

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub tools: Vec<ToolSpec>,
    pub tool_choice: String,
    pub messages: Vec<WireMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    #[serde(rename = "type")]
    pub kind: String,
}

impl ToolSpec {
    pub fn web_search() -> Self {
        Self {
            kind: "web_search".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

impl From<&Message> for WireMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role.as_str().to_string(),
            content: message.content.clone(),
        }
    }
}

#[derive(Serialize)]
struct ProductContext<'a> {
    id: &'a str,
    brand: &'a str,
    name: &'a str,
    category: &'a str,
    description: &'a str,
}

/// The instructional preamble plus a JSON snapshot of the catalog reduced
/// to the fields the advisor needs.
pub fn system_message(catalog: &Catalog) -> WireMessage {
    let context: Vec<ProductContext<'_>> = catalog
        .products()
        .iter()
        .map(|product| ProductContext {
            id: &product.id,
            brand: &product.brand,
            name: &product.name,
            category: &product.category,
            description: &product.description,
        })
        .collect();
    let listing = serde_json::to_string_pretty(&context).unwrap_or_else(|_| "[]".to_string());

    WireMessage {
        role: "system".to_string(),
        content: format!(
            "{SYSTEM_PREAMBLE}\n\nHere is the complete list of available products you can \
             recommend:\n{listing}\n\nWhen making recommendations, always reference specific \
             products from this list by their exact names and brands. Focus on creating \
             personalized routines based on the user's needs and the products available."
        ),
    }
}

/// The system message followed by the entire transcript. The full history
/// is resent on every call; there is no windowing.
pub fn build_request(model: &str, catalog: &Catalog, transcript: &[Message]) -> ChatRequest {
    let mut messages = Vec::with_capacity(transcript.len() + 1);
    messages.push(system_message(catalog));
    messages.extend(transcript.iter().map(WireMessage::from));

    ChatRequest {
        model: model.to_string(),
        tools: vec![ToolSpec::web_search()],
        tool_choice: "auto".to_string(),
        messages,
        max_tokens: MAX_TOKENS,
        temperature: TEMPERATURE,
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ToolCall {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub web_search: Option<WebSearch>,
    #[serde(default)]
    pub function: Option<FunctionCall>,
}

#[derive(Debug, Deserialize)]
pub struct WebSearch {
    #[serde(default)]
    pub results: Option<Vec<SearchResult>>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<String>,
}

/// Normalizes a response message into display markdown: textual content,
/// then formatted tool output, with the fixed fallback when neither is
/// present. Unparseable function arguments degrade to a blank line.
pub fn extract_reply(message: ResponseMessage) -> String {
    let mut reply = message.content.unwrap_or_default();

    if !message.tool_calls.is_empty() {
        if !reply.is_empty() {
            reply.push_str("\n\n---\n\n");
        }

        for tool_call in &message.tool_calls {
            if tool_call.kind.as_deref() == Some("web_search") {
                if let Some(results) = tool_call
                    .web_search
                    .as_ref()
                    .and_then(|search| search.results.as_ref())
                {
                    append_search_results(&mut reply, results);
                }
            } else if let Some(function) = &tool_call.function {
                append_function_call(&mut reply, function);
            }
        }
    }

    if reply.is_empty() {
        FALLBACK_REPLY.to_string()
    } else {
        reply
    }
}

fn append_search_results(reply: &mut String, results: &[SearchResult]) {
    reply.push_str("**Related Web Search Results:**\n\n");
    for (index, result) in results.iter().enumerate() {
        reply.push_str(&format!(
            "{}. **[{}]({})**\n",
            index + 1,
            result.title,
            result.url
        ));
        if let Some(snippet) = &result.snippet {
            reply.push_str(&format!("   {snippet}\n\n"));
        }
    }
}

fn append_function_call(reply: &mut String, function: &FunctionCall) {
    reply.push_str(&format!("**Tool Used:** {}\n", function.name));
    if let Some(arguments) = &function.arguments {
        match serde_json::from_str::<Value>(arguments) {
            Ok(args) => {
                let query = args
                    .get("query")
                    .and_then(Value::as_str)
                    .unwrap_or("Information search");
                reply.push_str(&format!("**Query:** {query}\n\n"));
            }
            Err(_) => reply.push('\n'),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{build_request, extract_reply, ChatResponse, ResponseMessage, FALLBACK_REPLY};
    use crate::catalog::{Catalog, Product};
    use crate::session::Message;
    use serde_json::{json, Value};

    fn sample_catalog() -> Catalog {
        Catalog::from_products(vec![Product {
            id: "1".to_string(),
            name: "Gentle Oat Cleanser".to_string(),
            brand: "Botaniq".to_string(),
            category: "cleanser".to_string(),
            description: "creamy wash".to_string(),
            image: "assets/images/gentle-oat-cleanser.png".to_string(),
        }])
    }

    fn message_from(payload: Value) -> ResponseMessage {
        let response: ChatResponse =
            serde_json::from_value(json!({ "choices": [{ "message": payload }] }))
                .expect("response fixture should parse");
        response
            .choices
            .into_iter()
            .next()
            .expect("fixture should have one choice")
            .message
    }

    #[test]
    fn request_prepends_system_message_to_the_full_history() {
        let transcript = vec![
            Message::user("hi"),
            Message::assistant("hello"),
            Message::user("what next?"),
        ];
        let request = build_request("gpt-4o", &sample_catalog(), &transcript);

        assert_eq!(request.messages.len(), 4);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[1].role, "user");
        assert_eq!(request.messages[2].role, "assistant");
        assert_eq!(request.messages[3].content, "what next?");
    }

    #[test]
    fn request_serializes_the_expected_wire_shape() {
        let request = build_request("gpt-4o", &sample_catalog(), &[Message::user("hi")]);
        let value = serde_json::to_value(&request).expect("request should serialize");

        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["tools"], json!([{ "type": "web_search" }]));
        assert_eq!(value["tool_choice"], "auto");
        assert_eq!(value["max_tokens"], 500);
    }

    #[test]
    fn system_message_carries_the_reduced_catalog_snapshot() {
        let request = build_request("gpt-4o", &sample_catalog(), &[]);
        let system = &request.messages[0].content;

        assert!(system.contains("\"id\": \"1\""));
        assert!(system.contains("\"brand\": \"Botaniq\""));
        assert!(system.contains("\"category\": \"cleanser\""));
        assert!(!system.contains("gentle-oat-cleanser.png"));
    }

    #[test]
    fn plain_content_passes_through() {
        let message = message_from(json!({ "content": "Use the cleanser first." }));
        assert_eq!(extract_reply(message), "Use the cleanser first.");
    }

    #[test]
    fn empty_response_yields_the_fallback_reply() {
        let message = message_from(json!({ "content": "" }));
        assert_eq!(extract_reply(message), FALLBACK_REPLY);

        let message = message_from(json!({}));
        assert_eq!(extract_reply(message), FALLBACK_REPLY);
    }

    #[test]
    fn web_search_results_format_as_a_titled_link_list() {
        let message = message_from(json!({
            "content": "Here is what I found.",
            "tool_calls": [{
                "type": "web_search",
                "web_search": {
                    "results": [
                        { "title": "SPF guide", "url": "https://example.com/spf", "snippet": "How much to apply" },
                        { "title": "Retinal basics", "url": "https://example.com/retinal" }
                    ]
                }
            }]
        }));

        let reply = extract_reply(message);
        assert!(reply.starts_with("Here is what I found.\n\n---\n\n"));
        assert!(reply.contains("**Related Web Search Results:**"));
        assert!(reply.contains("1. **[SPF guide](https://example.com/spf)**"));
        assert!(reply.contains("   How much to apply"));
        assert!(reply.contains("2. **[Retinal basics](https://example.com/retinal)**"));
    }

    #[test]
    fn function_call_reports_tool_name_and_parsed_query() {
        let message = message_from(json!({
            "tool_calls": [{
                "type": "function",
                "function": { "name": "lookup", "arguments": "{\"query\":\"niacinamide\"}" }
            }]
        }));

        let reply = extract_reply(message);
        assert!(reply.contains("**Tool Used:** lookup"));
        assert!(reply.contains("**Query:** niacinamide"));
    }

    #[test]
    fn function_call_without_query_field_uses_the_generic_label() {
        let message = message_from(json!({
            "tool_calls": [{
                "function": { "name": "lookup", "arguments": "{\"topic\":\"spf\"}" }
            }]
        }));

        let reply = extract_reply(message);
        assert!(reply.contains("**Query:** Information search"));
    }

    #[test]
    fn unparseable_function_arguments_degrade_to_a_blank_line() {
        let message = message_from(json!({
            "tool_calls": [{
                "function": { "name": "lookup", "arguments": "not json" }
            }]
        }));

        let reply = extract_reply(message);
        assert_eq!(reply, "**Tool Used:** lookup\n\n");
    }
}
