//! Prompt templates and their rendering.
//!
//! Templates are plain strings with named `{placeholder}` slots. They are
//! embedded as indented multi-line literals and dedented before use, so
//! source indentation never leaks into the rendered prompt.

pub const TECHNICAL_PROMPT_TEMPLATE: &str = r#"
    You are an assistant to a qualified aircraft maintenance engineer and about to answer their question.

    Here is the previous conversation history between you and the engineer:

    {history}

    Here are a few search results from aircraft manufacturing and maintenance documentation that you need to consider:

    {search_results}

    Based on these results, answer the following question:

    {question}

    When asked for contact details, be concise.

    Your response must exclusively be formatted using markdown, but do not use ```markdown``` code blocks.
"#;

pub const CASUAL_PROMPT_TEMPLATE: &str = r#"
    You are an assistant to a qualified aircraft maintenance engineer and about to answer their question.

    Here is the previous conversation history between you and the engineer:

    {history}

    Answer the following question:

    {question}
"#;

pub const CLASSIFICATION_PROMPT_TEMPLATE: &str = r#"
    You are an assistant to a qualified aircraft maintenance engineer and about to answer their question.

    You need to classify if a message is either of casual or technical nature.
    If it is a casual message, answer "CASUAL". If it is a technical message, answer "TECHNICAL".

    Here are some examples:

    If the message is related to greetings, thanks, or good-byes, say CASUAL.

    If the message is related to general small talk, say CASUAL.

    If the message is related to aircraft, engines, engineering, mechanics, etc., say TECHNICAL.

    If the message is a question that is asking for specific documentation, say TECHNICAL.

    Your answer to classify the message must be "CASUAL" or "TECHNICAL", do not write any additional text.

    Given the previous chat history: {history}, classify this message: {question}
"#;

/// Strips the longest common leading whitespace from every non-empty line.
pub fn dedent(text: &str) -> String {
    let margin = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    text.lines()
        .map(|line| {
            if line.trim().is_empty() {
                ""
            } else {
                &line[margin..]
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Substitutes `{name}` slots with the supplied values. Unknown slots are
/// left untouched.
pub fn render(template: &str, variables: &[(&str, &str)]) -> String {
    let mut rendered = template.to_string();

    for (name, value) in variables {
        rendered = rendered.replace(&format!("{{{name}}}"), value);
    }

    rendered
}
