//! Prompt builder for debate-segment evaluation.
//!
//! [`PromptBuilder::build_chat`] returns a `(system_msg, user_msg)` pair for
//! any OpenAI-compatible `/v1/chat/completions` endpoint.  The user message
//! embeds the transcript and asks for a JSON object keyed by [`CRITERIA`].

/// One scored dimension of a debate segment.
#[derive(Debug)]
pub struct Criterion {
    /// JSON key in the score payload.
    pub name: &'static str,
    /// What the judge should look at.
    pub description: &'static str,
    /// Score used by the neutral fallback card.
    pub neutral: f64,
}

/// Criteria requested from the judge, in prompt order.
pub const CRITERIA: &[Criterion] = &[
    Criterion {
        name: "clarity",
        description: "how clear and understandable the argument is",
        neutral: 7.0,
    },
    Criterion {
        name: "logic",
        description: "logical flow and reasoning",
        neutral: 7.0,
    },
    Criterion {
        name: "evidence",
        description: "use of facts, examples, or support",
        neutral: 6.0,
    },
    Criterion {
        name: "persuasiveness",
        description: "convincing power",
        neutral: 7.0,
    },
    Criterion {
        name: "delivery",
        description: "speaking style and confidence",
        neutral: 7.0,
    },
];

const SYSTEM_INSTRUCTION: &str = "You are an expert debate judge. \
Analyze debate performance objectively and provide constructive feedback.";

/// Builds debate-scoring prompts.
///
/// # Example
/// ```rust
/// use live_transcribe::scoring::PromptBuilder;
///
/// let (system, user) = PromptBuilder::new().build_chat("We should ban cars downtown.");
/// assert!(system.contains("debate judge"));
/// assert!(user.contains("We should ban cars downtown."));
/// ```
#[derive(Debug, Default, Clone)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the `(system_msg, user_msg)` pair for `text`.
    pub fn build_chat(&self, text: &str) -> (String, String) {
        (SYSTEM_INSTRUCTION.to_string(), self.evaluation_prompt(text))
    }

    fn evaluation_prompt(&self, text: &str) -> String {
        let mut prompt = String::with_capacity(1024);
        prompt.push_str(
            "Analyze this debate segment and provide scoring on a scale of 1-10 for each category:\n\n",
        );
        prompt.push_str(&format!("Text: \"{text}\"\n\nPlease evaluate:\n"));
        for (i, c) in CRITERIA.iter().enumerate() {
            prompt.push_str(&format!(
                "{}. {} ({})\n",
                i + 1,
                capitalize(c.name),
                c.description
            ));
        }
        prompt.push_str("\nRespond in JSON format:\n{\n");
        for c in CRITERIA {
            prompt.push_str(&format!("    \"{}\": score,\n", c.name));
        }
        prompt.push_str("    \"overall_score\": average,\n");
        prompt.push_str("    \"feedback\": \"brief constructive feedback\"\n}\n");
        prompt
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
