//! Prompt construction for the semantic extraction call.

use crate::model::{ChatMessage, ModelRequest};

/// System instruction sent ahead of every analysis prompt.
pub const SYSTEM_INSTRUCTION: &str =
    "You are an AI search optimization expert. Return only valid JSON, no markdown formatting or additional text.";

/// Cut content to at most `max_chars` characters, dropping whole sentences from the end.
///
/// A sentence ends after a run of `.`, `!` or `?` that is followed by whitespace
/// or the end of the text. When not even the first sentence fits, the text is
/// hard-truncated at the character limit.
pub fn truncate_content(content: &str, max_chars: usize) -> &str {
    if content.chars().count() <= max_chars {
        return content;
    }

    let mut last_boundary = None;
    let mut hard_end = content.len();
    let mut seen = 0;
    let mut chars = content.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if seen == max_chars {
            hard_end = idx;
            break;
        }
        seen += 1;

        if matches!(ch, '.' | '!' | '?') && chars.peek().is_none_or(|(_, next)| next.is_whitespace()) {
            last_boundary = Some(idx + ch.len_utf8());
        }
    }

    content[..last_boundary.unwrap_or(hard_end)].trim_end()
}

const RESPONSE_SCHEMA: &str = r#"{
  "semanticTriples": [
    {"subject": "Lake houses", "predicate": "provide", "object": "rental income", "confidence": 0.9, "isActiveVoice": true}
  ],
  "entities": [
    {"text": "Cloudflare", "type": "ORGANIZATION", "context": "hosting provider for the analyzer", "importance": 0.8}
  ],
  "coherence": {
    "coherent": true,
    "missingContext": ["Who is the target audience?"],
    "selfContained": true
  },
  "relevance": 0.85,
  "structureQuality": {
    "hasAnswerFirst": true,
    "headingHierarchy": "clear | partial | poor",
    "questionsCovered": ["How does GEO work?"]
  },
  "dataPointMetrics": {
    "statisticsCount": 5,
    "numericalClaimsCount": 8,
    "researchCitationsCount": 2,
    "specificExamples": ["527% increase in AI-referred sessions"]
  },
  "originalitySignals": {
    "hasPersonalInsights": true,
    "hasOriginalResearch": false,
    "hasUniqueData": true,
    "hasExpertOpinion": true,
    "originalityScore": 0.7,
    "genericPhrases": ["delve into"],
    "analysis": "2-4 sentences"
  },
  "writingQuality": {
    "passiveVoiceInstances": 3,
    "passiveVoiceExamples": ["Content is being analyzed by AI engines"],
    "activeVoicePercentage": 85,
    "aiSlopIndicators": {
      "detected": false,
      "confidence": 0.2,
      "problematicPhrases": [
        {"phrase": "in today's digital landscape", "context": "sentence containing it", "suggestion": "specific rewrite", "reason": "why it reads as generic"}
      ]
    },
    "explanation": "2-4 sentences"
  },
  "eeatSignals": {
    "hasAuthorAttribution": true,
    "hasCredentials": false,
    "hasExpertiseMarkers": true,
    "authorDetails": {"present": true, "location": "header | byline | footer | missing"},
    "trustSignals": ["External research citations"],
    "analysis": "2-4 sentences"
  },
  "actionability": {
    "hasActionableSteps": true,
    "implementationGuidancePresent": true,
    "clearNextSteps": ["Run the analysis on your own page"],
    "actionabilityScore": 0.8,
    "analysis": "2-4 sentences"
  },
  "entityCoverage": {
    "coreEntityPresent": true,
    "relatedEntitiesFound": ["Perplexity"],
    "missingRelatedEntities": ["Google AI Overviews"],
    "entityDensityScore": 0.7,
    "analysis": "2-4 sentences"
  },
  "overallAssessment": {
    "strengths": ["..."],
    "weaknesses": ["..."],
    "quickWins": ["..."],
    "priorityActions": [
      {"action": "...", "effort": "5 minutes", "impact": "HIGH", "reasoning": "...", "implementation": "...", "expectedImprovement": "..."}
    ]
  }
}"#;

/// Build the single analysis prompt for `content` and `query`.
pub fn build_prompt(content: &str, query: &str) -> String {
    format!(
        r#"You are analyzing content for citation by AI answer engines (Google AI Overviews, Perplexity, ChatGPT).

Target query: "{query}"

Content to analyze:
{content}

Produce a diagnostic GEO report covering:

1. SEMANTIC TRIPLES: extract 5-10 factual subject-predicate-object triples and flag passive voice.
2. DATA POINTS: count statistics, numerical claims and research citations; quote specific examples.
3. ORIGINALITY: detect personal insights, original research, unique data and expert opinion; list
   generic or boilerplate phrases ("delve into", "in today's digital landscape", "game-changer").
4. E-E-A-T: author attribution, credentials, expertise markers, trust signals, author placement.
5. ACTIONABILITY: implementation steps, concrete guidance, clear next actions.
6. ENTITY COVERAGE: the core entity, related entities present, related entities missing.
7. WRITING QUALITY: passive voice instances, active voice percentage, AI-generated phrasing with rewrites
   in the document's own tone.

Return ONE JSON object with exactly this structure. Every field is mandatory. Scores named *Score,
"confidence", "importance" and "relevance" are between 0 and 1; "activeVoicePercentage" is between 0 and 100.
Entity "type" is one of PERSON, ORGANIZATION, LOCATION, PRODUCT, TECHNOLOGY, METRIC.

{RESPONSE_SCHEMA}

Return ONLY the JSON object: no markdown fences, no preamble, no trailing text. Begin with {{ and end with }}."#
    )
}

/// Assemble the model request: system instruction plus the analysis prompt.
pub fn build_request(model: &str, prompt: String, max_tokens: u32, temperature: f32) -> ModelRequest {
    ModelRequest {
        model: model.to_string(),
        messages: vec![ChatMessage::system(SYSTEM_INSTRUCTION), ChatMessage::user(prompt)],
        max_tokens,
        temperature,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_content_untouched() {
        assert_eq!(truncate_content("One. Two.", 100), "One. Two.");
    }

    #[test]
    fn test_truncates_at_sentence_boundary() {
        let text = "First sentence here. Second sentence is longer. Third.";
        assert_eq!(truncate_content(text, 30), "First sentence here.");
    }

    #[test]
    fn test_decimal_points_are_not_boundaries() {
        let text = "Growth hit 3.5 percent. Then it slowed down a lot.";
        assert_eq!(truncate_content(text, 30), "Growth hit 3.5 percent.");
    }

    #[test]
    fn test_hard_truncation_when_no_sentence_fits() {
        let text = "abcdefghijklmnopqrstuvwxyz without any terminal punctuation";
        assert_eq!(truncate_content(text, 10), "abcdefghij");
    }

    #[test]
    fn test_truncation_is_char_boundary_safe() {
        let text = "ééééééééééé";
        assert_eq!(truncate_content(text, 3), "ééé");
    }

    #[test]
    fn test_prompt_embeds_query_and_schema() {
        let prompt = build_prompt("Body text.", "best lake houses");
        assert!(prompt.contains("Target query: \"best lake houses\""));
        assert!(prompt.contains("Body text."));
        assert!(prompt.contains("\"semanticTriples\""));
        assert!(prompt.contains("Begin with { and end with }"));
    }

    #[test]
    fn test_request_carries_limits() {
        let request = build_request("m", "p".to_string(), 4500, 0.1);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.max_tokens, 4500);
    }
}
