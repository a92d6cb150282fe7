//! Instruction templates appended to the extracted corpus.
//!
//! Every instruction the model sees lives here so a wording change is a
//! one-file diff. The text is a behavioural contract: the page renders the
//! reply unescaped, so the `<ol><li>…</li></ol>` format demanded below is
//! what keeps the result region well-formed. Bump [`PROMPT_VERSION`]
//! whenever a template changes.

use serde::{Deserialize, Serialize};

/// Version tag of the templates below.
pub const PROMPT_VERSION: u32 = 1;

/// Generic instruction: surface similar, repeated and commonly asked questions.
pub const COMMON_QUESTIONS_SUFFIX: &str = "\n\n\nPROMPT : Here are multiple documents with their text content.\n\
compare all different texts, and list Similar types of questions, Repeating or duplicate questions, Commonly asked questions\n\n\
Format only all that questions like this : <ol><li>question</li></ol>\n\n\
Do not add any other text, Only question list is required.\n\n";

/// Narrow instruction: exactly the ten most repeated questions.
pub const TOP_TEN_SUFFIX: &str = "\n\n\nPROMPT : Here are multiple documents with their text content.\n\
compare all different texts, and find exactly 10 questions that are repeated the most across them, most repeated first. \
Treat reworded or twisted versions of a question as the same question.\n\n\
Format only those 10 questions like this : <ol><li>question</li></ol>\n\n\
Do not add any other text, Only question list is required.\n\n";

/// Which instruction template to append to the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PromptVariant {
    /// All similar, repeating and commonly asked questions. (default)
    #[default]
    CommonQuestions,
    /// Exactly the ten most repeated questions.
    TopTen,
}

impl PromptVariant {
    /// The fixed instruction block for this variant.
    pub fn suffix(self) -> &'static str {
        match self {
            PromptVariant::CommonQuestions => COMMON_QUESTIONS_SUFFIX,
            PromptVariant::TopTen => TOP_TEN_SUFFIX,
        }
    }
}

/// Compose the final prompt: the corpus followed by the instruction block.
pub fn build_prompt(corpus: &str, variant: PromptVariant) -> String {
    let suffix = variant.suffix();
    let mut prompt = String::with_capacity(corpus.len() + suffix.len());
    prompt.push_str(corpus);
    prompt.push_str(suffix);
    prompt
}
