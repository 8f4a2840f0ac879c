use super::{Impact, Priority, RecommendationConfig, Rule, RuleFamily, percent};
use crate::semantic::{AUTHOR_LOCATION_MISSING, HeadingHierarchy, SemanticResult};

pub type SemanticRule = Rule<SemanticResult, RecommendationConfig>;

/// Rules over validated model signals, in evaluation order.
pub static SEMANTIC_RULES: &[SemanticRule] = &[
    // structure
    Rule {
        family: RuleFamily::Structure,
        method: "Add Answer-First Summary",
        priority: Priority::High,
        impact: Impact::High,
        location: "Top of page",
        rationale: "Answer engines lift the opening passage when it answers the query on its own",
        trigger: |s, _| !s.structure_quality.has_answer_first,
        details: |_, _| {
            "The page does not open with a direct answer. Add a 2-3 sentence summary that answers the main query before anything else.".to_string()
        },
    },
    Rule {
        family: RuleFamily::Structure,
        method: "Fix Heading Hierarchy",
        priority: Priority::High,
        impact: Impact::High,
        location: "Document structure",
        rationale: "A clean heading outline is one of the strongest structural predictors of citation",
        trigger: |s, _| s.structure_quality.heading_hierarchy == HeadingHierarchy::Poor,
        details: |_, _| {
            "Use a single H1 with a logical H2/H3 structure so the headings read as an outline of the content.".to_string()
        },
    },
    Rule {
        family: RuleFamily::Structure,
        method: "Answer More User Questions",
        priority: Priority::High,
        impact: Impact::High,
        location: "Content body",
        rationale: "Pages that answer the questions users actually ask are retrieved for more prompts",
        trigger: |s, c| s.structure_quality.questions_covered.len() < c.min_questions_covered,
        details: |s, c| {
            format!(
                "Only {} user questions are answered (target {}). Find the questions people ask about this topic and answer each in its own section.",
                s.structure_quality.questions_covered.len(),
                c.min_questions_covered
            )
        },
    },
    Rule {
        family: RuleFamily::Structure,
        method: "Address Content Gaps",
        priority: Priority::Medium,
        impact: Impact::Medium,
        location: "Content body",
        rationale: "Self-contained passages can be quoted without the surrounding page",
        trigger: |s, _| !s.chunk_coherence.missing_context.is_empty(),
        details: |s, c| {
            let gaps: Vec<&str> = s
                .chunk_coherence
                .missing_context
                .iter()
                .take(c.context_gap_examples)
                .map(String::as_str)
                .collect();
            format!("Missing context: {}", gaps.join("; "))
        },
    },
    // data points
    Rule {
        family: RuleFamily::DataPoints,
        method: "Add More Statistical Data",
        priority: Priority::High,
        impact: Impact::High,
        location: "Content body",
        rationale: "Answer engines prefer passages that carry concrete, checkable numbers",
        trigger: |s, c| s.data_point_metrics.statistics_count < c.min_statistics,
        details: |s, _| {
            format!(
                "Content contains only {} statistics. Add 5-8 specific data points such as percentages, measurements or research findings.",
                s.data_point_metrics.statistics_count
            )
        },
    },
    Rule {
        family: RuleFamily::DataPoints,
        method: "Include Research Citations",
        priority: Priority::Medium,
        impact: Impact::High,
        location: "Content body",
        rationale: "Citing credible sources strengthens the trust signals models look for",
        trigger: |s, _| s.data_point_metrics.research_citations_count == 0,
        details: |_, _| {
            "No research citations found. Reference studies, industry reports or academic papers that back the main claims.".to_string()
        },
    },
    Rule {
        family: RuleFamily::DataPoints,
        method: "Add Quantifiable Claims",
        priority: Priority::Medium,
        impact: Impact::Medium,
        location: "Content body",
        rationale: "Specific figures are easier for a model to extract than qualitative statements",
        trigger: |s, c| s.data_point_metrics.numerical_claims_count < c.min_numerical_claims,
        details: |s, _| {
            format!(
                "Only {} numerical claims found. Replace vague statements with measurable ones (\"18% increase\" instead of \"significant growth\").",
                s.data_point_metrics.numerical_claims_count
            )
        },
    },
    // writing quality
    Rule {
        family: RuleFamily::WritingQuality,
        method: "Reduce Passive Voice",
        priority: Priority::High,
        impact: Impact::High,
        location: "Throughout content",
        rationale: "Active sentences map directly onto subject-predicate-object facts",
        trigger: |s, c| s.writing_quality.passive_voice_instances > c.max_passive_instances,
        details: |s, _| {
            let examples: Vec<&str> =
                s.writing_quality.passive_voice_examples.iter().take(2).map(String::as_str).collect();
            format!(
                "Found {} passive voice instances. Rewrite them in active voice. Examples: {}",
                s.writing_quality.passive_voice_instances,
                examples.join("; ")
            )
        },
    },
    Rule {
        family: RuleFamily::WritingQuality,
        method: "Remove AI-Generated Language Patterns",
        priority: Priority::High,
        impact: Impact::High,
        location: "Throughout content",
        rationale: "Boilerplate phrasing lowers perceived originality and citation likelihood",
        trigger: |s, c| {
            let slop = &s.writing_quality.ai_slop_indicators;
            slop.detected && slop.confidence > c.slop_confidence
        },
        details: |s, _| {
            let slop = &s.writing_quality.ai_slop_indicators;
            let suggestions: Vec<String> = slop
                .problematic_phrases
                .iter()
                .take(3)
                .map(|p| format!("\"{}\" → \"{}\"", p.phrase, p.suggestion))
                .collect();
            format!(
                "AI-generated language detected (confidence: {}%). Replace generic phrasing with specific language. Suggestions: {}",
                percent(slop.confidence),
                suggestions.join("; ")
            )
        },
    },
    Rule {
        family: RuleFamily::WritingQuality,
        method: "Increase Active Voice Usage",
        priority: Priority::Medium,
        impact: Impact::High,
        location: "Throughout content",
        rationale: "A higher share of active sentences yields more extractable triples",
        trigger: |s, c| s.writing_quality.active_voice_percentage < c.min_active_voice,
        details: |s, _| {
            format!(
                "Active voice usage is only {}%. Aim for 80% or more by putting the actor first in each sentence.",
                s.writing_quality.active_voice_percentage
            )
        },
    },
    // originality
    Rule {
        family: RuleFamily::Originality,
        method: "Increase Content Originality",
        priority: Priority::High,
        impact: Impact::High,
        location: "Content strategy",
        rationale: "Information the engine cannot find elsewhere is what earns a citation",
        trigger: |s, c| s.originality_signals.originality_score < c.min_originality,
        details: |s, _| {
            format!(
                "Originality score is {}%. Add proprietary data, first-hand experience or original research.",
                percent(s.originality_signals.originality_score)
            )
        },
    },
    Rule {
        family: RuleFamily::Originality,
        method: "Add Original Research or Data",
        priority: Priority::High,
        impact: Impact::High,
        location: "Content body",
        rationale: "Original data is the clearest form of information gain",
        trigger: |s, _| !s.originality_signals.has_original_research && !s.originality_signals.has_unique_data,
        details: |_, _| {
            "No original research or unique data detected. Run a survey, analyze a dataset or share internal numbers.".to_string()
        },
    },
    Rule {
        family: RuleFamily::Originality,
        method: "Include Expert Perspectives",
        priority: Priority::Medium,
        impact: Impact::Medium,
        location: "Content body",
        rationale: "First-hand experience and expert commentary signal experience and expertise",
        trigger: |s, _| !s.originality_signals.has_personal_insights && !s.originality_signals.has_expert_opinion,
        details: |_, _| {
            "No personal insights or expert opinions found. Add first-hand experience or quotes from practitioners.".to_string()
        },
    },
    Rule {
        family: RuleFamily::Originality,
        method: "Replace Generic Phrases",
        priority: Priority::Medium,
        impact: Impact::Medium,
        location: "Throughout content",
        rationale: "Generic language reduces perceived originality and trustworthiness",
        trigger: |s, c| s.originality_signals.generic_phrases.len() > c.max_generic_phrases,
        details: |s, _| {
            let phrases = &s.originality_signals.generic_phrases;
            let examples: Vec<&str> = phrases.iter().take(3).map(String::as_str).collect();
            format!(
                "Found {} generic phrases. Examples: {}. Replace them with specific wording.",
                phrases.len(),
                examples.join(", ")
            )
        },
    },
    // E-E-A-T
    Rule {
        family: RuleFamily::Eeat,
        method: "Add Author Attribution",
        priority: Priority::High,
        impact: Impact::High,
        location: "Header or byline",
        rationale: "Clear authorship is a core experience and expertise signal",
        trigger: |s, _| !s.eeat_signals.has_author_attribution,
        details: |_, _| {
            "No author attribution found. Add a byline with the author's name and role.".to_string()
        },
    },
    Rule {
        family: RuleFamily::Eeat,
        method: "Display Author Credentials",
        priority: Priority::High,
        impact: Impact::High,
        location: "Author bio or inline",
        rationale: "Credentials tell readers and models why the author can be trusted on this topic",
        trigger: |s, _| !s.eeat_signals.has_credentials,
        details: |_, _| {
            "No author credentials found. List relevant qualifications, certifications or years of experience.".to_string()
        },
    },
    Rule {
        family: RuleFamily::Eeat,
        method: "Add Expertise Indicators",
        priority: Priority::Medium,
        impact: Impact::Medium,
        location: "About section or inline",
        rationale: "Expertise markers throughout the text reinforce authority",
        trigger: |s, _| !s.eeat_signals.has_expertise_markers,
        details: |_, _| {
            "No expertise markers detected. Reference hands-on work, projects or background related to the topic.".to_string()
        },
    },
    Rule {
        family: RuleFamily::Eeat,
        method: "Strengthen Trust Signals",
        priority: Priority::Medium,
        impact: Impact::Medium,
        location: "Throughout content",
        rationale: "Several independent trust signals make content safer to cite",
        trigger: |s, c| s.eeat_signals.trust_signals.len() < c.min_trust_signals,
        details: |s, _| {
            format!(
                "Only {} trust signals found. Add source citations, methodology notes or external validation.",
                s.eeat_signals.trust_signals.len()
            )
        },
    },
    Rule {
        family: RuleFamily::Eeat,
        method: "Position Author Information Prominently",
        priority: Priority::Medium,
        impact: Impact::Medium,
        location: "Top of page",
        rationale: "Author details are weighted more when they are visible near the title",
        trigger: |s, _| s.eeat_signals.author_details.location == AUTHOR_LOCATION_MISSING,
        details: |_, _| "Place author information in the header or directly below the title.".to_string(),
    },
    // actionability
    Rule {
        family: RuleFamily::Actionability,
        method: "Increase Content Actionability",
        priority: Priority::High,
        impact: Impact::Medium,
        location: "Content body",
        rationale: "How-to queries are answered from pages that say what to do",
        trigger: |s, c| s.actionability.actionability_score < c.min_actionability,
        details: |s, _| {
            format!(
                "Actionability score is {}%. Add implementation steps, practical examples and concrete next actions.",
                percent(s.actionability.actionability_score)
            )
        },
    },
    Rule {
        family: RuleFamily::Actionability,
        method: "Add Step-by-Step Implementation Guide",
        priority: Priority::High,
        impact: Impact::Medium,
        location: "Content body",
        rationale: "Numbered steps are extracted verbatim for procedural answers",
        trigger: |s, _| !s.actionability.has_actionable_steps,
        details: |_, _| {
            "No implementation steps found. Add a numbered guide that shows exactly how to apply the information.".to_string()
        },
    },
    Rule {
        family: RuleFamily::Actionability,
        method: "Include Practical Examples",
        priority: Priority::Medium,
        impact: Impact::Medium,
        location: "Throughout content",
        rationale: "Worked examples make abstract advice concrete",
        trigger: |s, _| !s.actionability.implementation_guidance_present,
        details: |_, _| {
            "No implementation guidance detected. Add use cases or before/after scenarios.".to_string()
        },
    },
    Rule {
        family: RuleFamily::Actionability,
        method: "Add Clear Next Actions",
        priority: Priority::Medium,
        impact: Impact::Medium,
        location: "Conclusion or action section",
        rationale: "Explicit next steps make the page useful as a final answer",
        trigger: |s, c| s.actionability.clear_next_steps.len() < c.min_next_steps,
        details: |s, _| {
            format!(
                "Only {} clear next steps found. End with 3-5 specific actions for the reader.",
                s.actionability.clear_next_steps.len()
            )
        },
    },
];
