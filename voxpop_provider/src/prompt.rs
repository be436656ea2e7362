//! Prompt assembly for the three provider operations.

use crate::types::{trim_snippet, SearchResult};
use voxpop_core::Persona;

/// How many search articles are quoted in the summary prompt.
const MAX_SUMMARY_ARTICLES: usize = 10;

/// How many responses are quoted in the analysis prompt.
const MAX_ANALYSIS_RESPONSES: usize = 100;

/// Character cap applied to each quoted response.
const QUOTED_RESPONSE_CHARS: usize = 200;

/// Builds the prompt for one persona's survey answer.
pub fn persona_prompt(persona: &Persona, question: &str, context: Option<&str>) -> String {
    let mut prompt = String::new();
    prompt.push_str("You are answering a public opinion survey as the person below.\n\n");
    prompt.push_str("[Profile]\n");
    prompt.push_str(&format!("Age: {}\n", persona.age));
    prompt.push_str(&format!("Gender: {}\n", persona.gender));
    prompt.push_str(&format!(
        "Region: {} ({})\n",
        persona.region,
        persona.locale.label()
    ));
    prompt.push_str(&format!("Occupation: {}\n", persona.occupation));
    prompt.push_str(&format!("Education: {}\n", persona.education));
    prompt.push_str(&format!("Household income: {}\n", persona.income_band));
    prompt.push_str(&format!("Household: {}\n", persona.household));
    prompt.push_str(&format!(
        "Political leaning: {}\n",
        persona.political_leaning
    ));
    prompt.push_str(&format!("Generation: {}\n", persona.generation));

    if let Some(context) = context {
        prompt.push_str("\n[Background]\n");
        prompt.push_str(context);
        prompt.push('\n');
    }

    prompt.push_str("\n[Question]\n");
    prompt.push_str(question);
    prompt.push_str("\n\n[Instructions]\n");
    prompt.push_str(
        "Answer in one or two sentences, in your own voice, under 100 characters. \
         Stay consistent with your profile. Do not mention that you are a persona.",
    );
    prompt
}

/// Builds the prompt that condenses search hits into survey context.
pub fn summary_prompt(results: &[SearchResult], question: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str(&format!(
        "Summarize the current situation around this survey topic: {question}\n\n"
    ));
    prompt.push_str("[Articles]\n");
    for (i, result) in results.iter().take(MAX_SUMMARY_ARTICLES).enumerate() {
        prompt.push_str(&format!(
            "{}. {} ({}): {}\n",
            i + 1,
            result.title,
            result.date,
            result.snippet
        ));
    }
    prompt.push_str(
        "\n[Instructions]\n\
         Write a neutral background summary covering:\n\
         1. What is currently happening\n\
         2. The main points of contention\n\
         3. Who is affected\n\
         4. What may change next\n\
         Keep it under 300 characters.",
    );
    prompt
}

/// Builds the prompt for the full corpus analysis.
pub fn analysis_prompt(responses: &[String], question: &str) -> String {
    let mut prompt = String::new();
    prompt.push_str(&format!(
        "The survey question was: {question}\n\n[Responses]\n"
    ));
    for (i, response) in responses.iter().take(MAX_ANALYSIS_RESPONSES).enumerate() {
        prompt.push_str(&format!(
            "{}. {}\n",
            i + 1,
            trim_snippet(response, QUOTED_RESPONSE_CHARS)
        ));
    }
    prompt.push_str(
        "\n[Instructions]\n\
         Analyze these survey responses and report:\n\
         1. Overall opinion landscape\n\
         2. Majority and minority positions\n\
         3. Differences across generations\n\
         4. Differences between urban and rural respondents\n\
         5. Recurring concerns and hopes\n\
         6. One-paragraph conclusion\n\
         Keep the whole report under 2400 characters.",
    );
    prompt
}
