//! Prompt templates for chunk transforms and CV rewriting.
//!
//! Every prompt lives here so that changing what the model is asked to do
//! never touches retry or dispatch logic, and so tests can inspect prompts
//! without a live provider.
//!
//! The summarize pipeline picks a template by [`FocusMode`]. Focus modes
//! arrive as free-form labels from the caller; [`FocusMode::from_label`] maps
//! the known ones to their variant and keeps anything else as
//! [`FocusMode::Other`], which uses the generic summary template.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Output-language label used when the caller does not specify one.
pub const DEFAULT_LANGUAGE: &str = "English";

const NO_FENCES: &str =
    "**DO NOT include Markdown code fences (e.g., ```html or ```) around the HTML output.**";

/// A system + user message pair sent as one chat request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// What the summarize pipeline should produce for each chunk.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FocusMode {
    /// "Key Concepts & Definitions": generic structured summary. (default)
    #[default]
    KeyConcepts,
    /// "Exam Practice Questions": questions with worked solutions.
    ExamPractice,
    /// "Formulas and Equations": formula extraction.
    Formulas,
    /// "Historical/Contextual Background"
    HistoricalContext,
    /// "Answer Questions": answer every question found in the text.
    AnswerQuestions,
    /// "Convert courses into flashcards": Q/A flashcard sections.
    Flashcards,
    /// "Check and improve assignment": academic review with rewrites.
    AssignmentReview,
    /// Any other label. Uses the generic summary template with the label
    /// passed through as the focus area.
    Other(String),
}

impl FocusMode {
    /// Map a caller-supplied label to a focus mode. Never fails.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Key Concepts & Definitions" => Self::KeyConcepts,
            "Exam Practice Questions" => Self::ExamPractice,
            "Formulas and Equations" => Self::Formulas,
            "Historical/Contextual Background" => Self::HistoricalContext,
            "Answer Questions" => Self::AnswerQuestions,
            "Convert courses into flashcards" => Self::Flashcards,
            "Check and improve assignment" => Self::AssignmentReview,
            other => Self::Other(other.to_string()),
        }
    }

    /// The caller-facing label for this mode.
    pub fn label(&self) -> &str {
        match self {
            Self::KeyConcepts => "Key Concepts & Definitions",
            Self::ExamPractice => "Exam Practice Questions",
            Self::Formulas => "Formulas and Equations",
            Self::HistoricalContext => "Historical/Contextual Background",
            Self::AnswerQuestions => "Answer Questions",
            Self::Flashcards => "Convert courses into flashcards",
            Self::AssignmentReview => "Check and improve assignment",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for FocusMode {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<FocusMode> for String {
    fn from(mode: FocusMode) -> Self {
        mode.label().to_string()
    }
}

impl fmt::Display for FocusMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Build the chat prompt for one chunk.
pub fn chunk_prompt(focus: &FocusMode, language: &str, chunk: &str) -> Prompt {
    let (system, instructions) = match focus {
        FocusMode::ExamPractice => (
            format!(
                "You are an expert teacher specializing in creating high-quality, varied exam papers. \
Your task is to generate questions and detailed answers/solutions from the provided content chunk. \
**Crucially, prioritize the appropriate question format:**\n\
- For Mathematics, Science, or Engineering topics, generate **step-by-step problems and proofs**. \
Use LaTeX syntax inside `<code>` tags for complex formulas.\n\
- For Humanities or Literature, generate **essay prompts and analysis questions**.\n\
- For foundational material, use a mix of multiple-choice, true/false, and short answer questions.\n\
Maintain a structured HTML output. Do not summarize the original content. {NO_FENCES}"
            ),
            format!(
                "Generate a comprehensive exam or practice set (with solutions/answers) based on the following content.\n\
Output language: {language}\n\
Ensure a variety of question types are used, including mathematical problems, proofs, long-form essays, \
and definitions, as appropriate to the source material.\n\
Provide clear, logical structure using HTML (<section>, <h2>, <h3>, <ul>, <ol>, <li>, <p>)."
            ),
        ),
        FocusMode::Formulas => (
            format!(
                "You are an expert in mathematics and science. Extract formulas and equations from the content. \
Provide clear HTML structure with headings and lists. {NO_FENCES}"
            ),
            format!(
                "Extract all important formulas and equations from the following content.\n\
Output language: {language}\n\
Provide them in structured HTML with sections and bullet points."
            ),
        ),
        FocusMode::HistoricalContext => (
            format!(
                "You are an expert historian. Provide a structured HTML summary of the historical or contextual \
background of the content. Focus on clarity and key points. {NO_FENCES}"
            ),
            format!(
                "Summarize the historical and contextual background of the following content.\n\
Output language: {language}\n\
Use structured HTML (<section>, <h2>, <h3>, <ul>, <li>)."
            ),
        ),
        FocusMode::AnswerQuestions => (
            format!(
                "You are an expert educator and mathematician. Your goal is to extract questions from the content \
and provide thorough, step-by-step solutions and answers. Use structured HTML for clarity:\n\
- <section> for each question-answer block\n\
- <h2> for question titles\n\
- <h3> for solution steps\n\
- <ul>/<li> for listing steps or multiple answers\n\
- <p> for explanations\n\
Include final answers clearly, and handle formulas properly in HTML or LaTeX inside <code> tags. \
Be precise and detailed, especially for mathematical calculations. {NO_FENCES}"
            ),
            format!(
                "Provide detailed answers to all questions mentioned in the following content.\n\
Output language: {language}\n\
For mathematics or technical problems, show step-by-step solutions, explanations, and final answers.\n\
Use HTML structure (<section>, <h2>, <h3>, <ul>, <li>, <p>) for each question and answer.\n\
If formulas are needed, include them in readable HTML or LaTeX syntax inside <code> tags."
            ),
        ),
        FocusMode::Flashcards => (
            format!(
                "You are an expert tutor creating study materials. Generate a list of concise, high-yield flashcards \
from the content. Every key piece of information should be converted into a Q&A format.\n\
**Use the following strict HTML structure for each flashcard:**\n\
<section class=\"flashcard\"><h2>Q: [The Question/Front]</h2><p>A: [The Answer/Back with detail]</p></section>\n\
Ensure the output is clean HTML only. Do not summarize or include explanations outside of the flashcard structure. \
{NO_FENCES}"
            ),
            format!(
                "Convert the following course material into a series of highly effective flashcards \
(Question/Front and Answer/Back pairs).\n\
Output language: {language}\n\
Focus on extracting key terms, definitions, concepts, and relationships.\n\
Present each flashcard pair clearly using structured HTML."
            ),
        ),
        FocusMode::AssignmentReview => (
            format!(
                "You are an expert academic reviewer and senior professor. \
Your task is to analyze the assignment content critically and suggest improvements. Ensure the following:\n\
- Provide constructive feedback on structure, logic, argument strength, and clarity.\n\
- Correct grammar and writing quality where needed.\n\
- If a better version exists, rewrite paragraphs and indicate 'Improved Version'.\n\
- Use HTML formatting only, with sections structured as follows:\n\
<section>\n<h2>[Feedback Category]</h2>\n<h3>Issues</h3>\n<ul><li>List each issue</li></ul>\n\
<h3>Suggestions</h3>\n<ul><li>Provide improvements</li></ul>\n\
<p><b>Improved Version (if applicable):</b> Rewritten content...</p>\n</section>\n\
Be precise, objective, and concise. Avoid general comments or summarizing. \
Focus on improving academic quality and correctness.\n{NO_FENCES}"
            ),
            format!(
                "Review the following assignment content carefully.\n\
Output language: {language}\n\
Your task is to:\n\
- Check for clarity, correctness, coherence, and logical flow.\n\
- Suggest improvements in style, grammar, structure, and argumentation.\n\
- Highlight weak sections and propose stronger alternatives.\n\
- Ensure alignment with academic standards and avoid plagiarism.\n\
- Provide feedback using clear HTML sections: <section>, <h2>, <h3>, <ul>, <li>, <p>.\n\
- If helpful, include improved rewritten versions of paragraphs.\n\
- If formulas or technical concepts exist, verify correctness and suggest improvements."
            ),
        ),
        FocusMode::KeyConcepts | FocusMode::Other(_) => (
            format!(
                "You are an expert summarizer. Your goal is to create a clean, structured HTML summary \
that captures the main ideas, key objectives, important findings or actions, and the meaning \
behind the content. Keep summaries concise (40–70% compression). \
Do NOT output code fences or explanations like 'This HTML code...'. \
No fluff. No restating very long descriptions. \
Produce structured insight, not just lists of headings. {NO_FENCES}"
            ),
            format!(
                "Summarize the following chunk into a clear, structured HTML summary.\n\
Focus area: {focus}\n\
Output language: {language}\n\
Preserve meaning but remove unnecessary or repeated details.\n\
Use sections (<section>, <h2>, <h3>) and bullet points.\n\
Do NOT output code fences or extra explanations."
            ),
        ),
    };

    Prompt {
        system,
        user: format!("{instructions}\n\n{chunk}"),
    }
}

/// System prompt for the CV rewrite.
pub const CV_SYSTEM_PROMPT: &str = "You are a professional CV designer.";

/// HTML/CSS skeleton the model fills in. Braces are literal.
const CV_TEMPLATE: &str = r#"<html>
<head>
<style>
body { font-family: 'Helvetica Neue', Arial, sans-serif; background-color: #f4f4f4; margin:0; padding:0; }
.container { max-width:800px; margin:20px auto; padding:20px; background:#fff; }
h1 { font-size:24px; margin-bottom:5px; text-align:center; color:#2c3e50; }
.contact-info p { font-size:13px; margin:1px 0; text-align:center; }
h2 { font-size:18px; margin:5px 0 3px 0; color:#000; border-bottom:1px solid #ddd; padding-bottom:2px; }
.row { display:flex; justify-content:space-between; align-items:baseline; margin:1px 0; }
h3 { font-size:15px; margin:0; font-weight:bold; color:#000; }
.date { font-size:13px; font-style:italic; flex-shrink:0; text-align:right; margin:0; }
p, li { font-size:13px; margin:1px 0; line-height:1.2; }
ul { margin:2px 0 5px 20px; padding:0; }
li { margin-bottom:1px; }
.skills-list p { margin:0; padding:0; }
</style>
</head>
<body>
<div class="container">
<div class="contact-info">
<h1>{Full Name}</h1>
<p>{Address} | {Phone} | {Email} | {GitHub/LinkedIn}</p>
</div>
<h2>{Summary Heading}</h2>
<p>{Summary}</p>
<h2>{Work Experience Heading}</h2>
<div>{Formatted Work Experience}</div>
<h2>{Education Heading}</h2>
<div>{Formatted Education}</div>
<h2>{Skills & Languages Heading}</h2>
<div class="skills-list">
<p><strong>{Technical Skills Label}:</strong> {Categorized Technical Skills}</p>
<p><strong>{Competencies Label}:</strong> {Soft Skills}</p>
<p><strong>{Languages Label}:</strong> {Languages}</p>
</div>
</div>
</body>
</html>"#;

/// Build the chat prompt that turns raw CV text into a styled HTML page.
///
/// The model is told to keep the CV's original language; only grammar,
/// phrasing and layout change.
pub fn cv_prompt(cv_text: &str) -> Prompt {
    let user = format!(
        r#"You are a world-class CV designer, recruiter, and HTML/CSS expert.
Transform the following raw CV text into a **professional, recruiter-ready CV in HTML format** using the template below.
The final output must be polished, centered, readable, and visually appealing. Use modern fonts, proper spacing, and a compact layout for PDF conversion.

**IMPORTANT:** Do **NOT** translate any content or headings. Keep all text in the **original language** (French, English, or mixed). Only improve grammar, phrasing, and formatting.

**Requirements:**
1. **Layout & Style**
   * Font: Sans-serif (Arial, Roboto, Helvetica), body 12-14px, headings 16-24px.
   * Center content horizontally, max-width 800px.
   * Use subtle colors for headings/dividers.
   * Collapse all vertical spacing; avoid extra gaps from `<p>` or `<div>` tags.
   * All CSS embedded in `<style>` tags.
2. **Sections**
   * Merge "Compétences" and "Autres" into **Skills & Languages**.
   * Group technical skills logically with bold labels.
   * Exclude empty sections (Certifications, Projects).
3. **Formatting**
   * Bold Name, Job Titles, Companies, Degrees.
   * For Work Experience & Education use `<div class="row">` with `<h3>` for title/company and `<span class="date">` right-aligned, and `<ul><li>` for bullet points.
   * Reduce `<p>` margins to 0-2px and line-height 1.2-1.3.

**HTML Template**
{CV_TEMPLATE}

**Instructions:**
- Use the **original headings from the CV** for all `<h2>` section titles.
- Keep all CV text in its **original language**; do **not translate**.
- Improve grammar, phrasing, and formatting only.
- Output only HTML. **Do not include Markdown code fences.**

Raw CV Text:
{cv_text}
"#
    );

    Prompt {
        system: CV_SYSTEM_PROMPT.to_string(),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KNOWN: [&str; 7] = [
        "Key Concepts & Definitions",
        "Exam Practice Questions",
        "Formulas and Equations",
        "Historical/Contextual Background",
        "Answer Questions",
        "Convert courses into flashcards",
        "Check and improve assignment",
    ];

    #[test]
    fn known_labels_round_trip() {
        for label in KNOWN {
            let mode = FocusMode::from_label(label);
            assert!(!matches!(mode, FocusMode::Other(_)), "{label} fell through");
            assert_eq!(mode.label(), label);
        }
    }

    #[test]
    fn unknown_label_falls_back_to_generic_summary() {
        let mode = FocusMode::from_label("Mind map");
        assert_eq!(mode, FocusMode::Other("Mind map".into()));

        let p = chunk_prompt(&mode, "French", "chunk body");
        let generic = chunk_prompt(&FocusMode::KeyConcepts, "French", "chunk body");
        assert_eq!(p.system, generic.system);
        assert!(p.user.contains("Focus area: Mind map"));
        assert!(p.user.contains("<section>"));
    }

    #[test]
    fn every_prompt_carries_language_and_chunk() {
        for label in KNOWN {
            let p = chunk_prompt(&FocusMode::from_label(label), "Deutsch", "THE-CHUNK");
            assert!(p.user.contains("Output language: Deutsch"), "{label}");
            assert!(p.user.ends_with("\n\nTHE-CHUNK"), "{label}");
            assert!(p.system.contains("DO NOT include Markdown code fences"), "{label}");
        }
    }

    #[test]
    fn flashcards_prompt_pins_structure() {
        let p = chunk_prompt(&FocusMode::Flashcards, "English", "x");
        assert!(p.system.contains(r#"<section class="flashcard">"#));
    }

    #[test]
    fn focus_mode_serde_uses_labels() {
        let mode: FocusMode = serde_json::from_str(r#""Answer Questions""#).unwrap();
        assert_eq!(mode, FocusMode::AnswerQuestions);
        assert_eq!(
            serde_json::to_string(&FocusMode::Formulas).unwrap(),
            r#""Formulas and Equations""#
        );
    }

    #[test]
    fn cv_prompt_embeds_template_and_text() {
        let p = cv_prompt("Jane Doe\nRust engineer");
        assert_eq!(p.system, CV_SYSTEM_PROMPT);
        assert!(p.user.contains("<h1>{Full Name}</h1>"));
        assert!(p.user.ends_with("Raw CV Text:\nJane Doe\nRust engineer\n"));
    }
}
