use serde_json::{json, Value};

use crate::domain::branding::{BrandContext, ContentKind};

/// Prepend the brand context block to a prompt. Without a context the
/// prompt is returned unchanged.
pub fn inject_context(base: &str, context: Option<&BrandContext>) -> String {
    let Some(ctx) = context else {
        return base.to_string();
    };

    format!(
        "[BRAND CONTEXT]\n\
         Industry: {}\n\
         Tone: {}\n\
         Audience: {}\n\
         Personality: {}\n\
         Keywords: {}\n\
         [/BRAND CONTEXT]\n\n{}",
        ctx.industry,
        ctx.tone,
        ctx.target_audience,
        ctx.brand_personality,
        ctx.keywords.join(", "),
        base
    )
}

/// Base prompt for a copy generation request.
pub fn content_prompt(kind: ContentKind) -> String {
    let ask = match kind {
        ContentKind::Tagline => "3 catchy, memorable high-impact taglines",
        ContentKind::Mission => "a powerful mission statement (max 2 sentences)",
        ContentKind::Social => "3 engaging social media post ideas with captions",
    };
    format!(
        "Generate {} tailored specifically to the brand context provided.",
        ask
    )
}

pub fn brand_names_prompt() -> &'static str {
    "Generate 5 creative, memorable, and industry-disruptive brand names. \
     Provide a short rationale for each."
}

pub fn sentiment_prompt(text: &str) -> String {
    format!(
        "Analyze the branding sentiment of the following text: \"{}\". \
         Provide a detailed breakdown of scores (0-100).",
        text
    )
}

/// Response schema for [`brand_names_prompt`]: an array of name/meaning pairs.
pub fn brand_names_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING" },
                "meaning": { "type": "STRING" }
            },
            "required": ["name", "meaning"]
        }
    })
}

/// Response schema for [`sentiment_prompt`].
pub fn sentiment_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "sentiment": {
                "type": "STRING",
                "enum": ["positive", "neutral", "negative"]
            },
            "score": { "type": "NUMBER" },
            "breakdown": {
                "type": "OBJECT",
                "properties": {
                    "trust": { "type": "NUMBER" },
                    "excitement": { "type": "NUMBER" },
                    "reliability": { "type": "NUMBER" }
                },
                "required": ["trust", "excitement", "reliability"]
            },
            "summary": { "type": "STRING" }
        },
        "required": ["sentiment", "score", "breakdown", "summary"]
    })
}

pub fn assistant_system_prompt(context: Option<&BrandContext>) -> String {
    let mut prompt = String::from(
        "You are BrandCraft Assistant, an expert branding consultant. \
         You help users build world-class brands. ",
    );
    match context {
        Some(ctx) => prompt.push_str(&format!(
            "The user's current brand context is: {} with a {} tone. \
             Use this context to personalize your advice.",
            ctx.industry, ctx.tone
        )),
        None => prompt.push_str("No context provided yet."),
    }
    prompt
}
