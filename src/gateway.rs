//! gateway.rs — Classifier gateway: provider abstraction + prompt + parsing.
//!
//! Turns raw description text into an [`AnalysisResult`] candidate by
//! delegating to a hosted generative model. Collaborator failures never
//! escape this module: a single attempt is made (no retry, no backoff) and
//! any transport/timeout/parse failure degrades to the fixed fallback record
//! with a `warn` log for the operator.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::AppConfig;
use crate::incident::AnalysisResult;

/// System instruction sent verbatim ahead of every description. The JSON
/// shape and the lowercase vocabularies here are the wire contract with the
/// model; see `incident::vocab` for the (differently cased) rule-side
/// literals.
const SYSTEM_INSTRUCTION: &str = r#"ROLE: You are ResiliNet-AI, an autonomous disaster triage engine.
OBJECTIVE: Analyze the help request and return structured JSON.

RULES:
1. OUTPUT FORMAT: strictly JSON. No Markdown.

2. URGENCY LEVELS (Lowercase):
   - "critical": Immediate threat to life (trapped, fire, heavy bleeding).
   - "high": Serious threat (broken bone, stranded, insulin needed).
   - "medium": Property/Quality of life (power out, food low).
   - "low": Info requests, spam, donations.

3. CATEGORIES (Lowercase, Exact Match):
   - "medical", "rescue", "fire", "food_water", "shelter", "infrastructure", "logistics", "other".

4. CONFIDENCE SCORE:
   - 0.0 to 1.0 (Float).
   - 1.0 = Explicit request ("I need an ambulance").
   - 0.5 = Vague request ("It is bad here").

5. MAPPING LOGIC:
   - "Gas leak" -> category: "fire", urgency: "critical"
   - "Insulin needed" -> category: "medical", urgency: "high"
   - "Tree fell on road" -> category: "infrastructure", urgency: "medium"
   - "Trapped in basement" -> category: "rescue", urgency: "critical"
   - "Baby needs milk" -> category: "food_water", urgency: "high"

JSON STRUCTURE:
{
  "urgency": "string",
  "category": "string",
  "summary": "string (max 5 words, active verbs)",
  "resources": ["string", "string"]
}"#;

/// Low-level model client: sends a prompt, returns the raw completion text.
/// Injected through `AppState` so tests can substitute a stub; never a
/// process-wide singleton.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
    /// Provider name for diagnostics.
    fn provider_name(&self) -> &'static str;
}

/// Convenient alias used by callers.
pub type DynModelClient = Arc<dyn ModelClient>;

/// Gemini provider (generateContent API). Requires an API key; an empty key
/// fails at call time, which the gateway absorbs into the fallback record.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(cfg: &AppConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("resilinet-triage/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
        }
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        if self.api_key.is_empty() {
            anyhow::bail!("GEMINI_API_KEY is not set");
        }

        #[derive(Serialize)]
        struct Part<'a> {
            text: &'a str,
        }
        #[derive(Serialize)]
        struct Content<'a> {
            parts: Vec<Part<'a>>,
        }
        #[derive(Serialize)]
        struct Req<'a> {
            contents: Vec<Content<'a>>,
        }
        #[derive(Deserialize)]
        struct Resp {
            candidates: Vec<Candidate>,
        }
        #[derive(Deserialize)]
        struct Candidate {
            content: CandidateContent,
        }
        #[derive(Deserialize)]
        struct CandidateContent {
            parts: Vec<TextPart>,
        }
        #[derive(Deserialize)]
        struct TextPart {
            text: String,
        }

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
            self.model
        );
        let req = Req {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let resp = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&req)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            anyhow::bail!("model endpoint returned {status}");
        }

        let body: Resp = resp.json().await?;
        body.candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| anyhow::anyhow!("model reply carried no text part"))
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}

/// Embed the description into the fixed instruction template.
pub fn build_prompt(description: &str) -> String {
    format!("{SYSTEM_INSTRUCTION}\n\nINPUT:\n\"{description}\"\n\nOUTPUT:\n")
}

/// Strip Markdown code fences the model sometimes wraps around its JSON,
/// language tag included. Removes every occurrence, matching the lenient
/// behavior the frontend relies on.
pub fn strip_code_fences(reply: &str) -> String {
    reply.replace("```json", "").replace("```", "")
}

fn parse_reply(reply: &str) -> serde_json::Result<AnalysisResult> {
    let cleaned = strip_code_fences(reply);
    serde_json::from_str(cleaned.trim())
}

/// Classify one description. Single attempt; every failure path yields the
/// fixed fallback record so the rest of the pipeline always has a complete
/// record to work with.
pub async fn analyze_description(client: &dyn ModelClient, description: &str) -> AnalysisResult {
    let prompt = build_prompt(description);

    let reply = match client.complete(&prompt).await {
        Ok(text) => text,
        Err(err) => {
            warn!(provider = client.provider_name(), error = %err, "classifier call failed, using fallback record");
            metrics::counter!("triage_classifier_fallbacks_total").increment(1);
            return AnalysisResult::fallback();
        }
    };

    match parse_reply(&reply) {
        Ok(result) => result,
        Err(err) => {
            warn!(provider = client.provider_name(), error = %err, "classifier reply was not valid JSON, using fallback record");
            metrics::counter!("triage_classifier_fallbacks_total").increment(1);
            AnalysisResult::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_description_and_instruction() {
        let p = build_prompt("Gas leak reported downtown");
        assert!(p.contains("ResiliNet-AI"));
        assert!(p.contains("INPUT:\n\"Gas leak reported downtown\""));
        assert!(p.ends_with("OUTPUT:\n"));
    }

    #[test]
    fn strips_json_fence() {
        let fenced = "```json\n{\"urgency\": \"high\"}\n```";
        let r: AnalysisResult = parse_reply(fenced).unwrap();
        assert_eq!(r.urgency, "high");
    }

    #[test]
    fn strips_bare_fence() {
        let fenced = "```\n{\"urgency\": \"low\"}\n```";
        let r: AnalysisResult = parse_reply(fenced).unwrap();
        assert_eq!(r.urgency, "low");
    }

    #[test]
    fn unfenced_json_parses_as_is() {
        let r: AnalysisResult =
            parse_reply("  {\"urgency\": \"medium\", \"category\": \"other\"}  ").unwrap();
        assert_eq!(r.category, "other");
    }

    #[test]
    fn prose_reply_is_an_error() {
        assert!(parse_reply("I cannot help with that request.").is_err());
    }
}
