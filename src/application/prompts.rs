//! Canned instructions for the two query kinds.

use crate::application::CompletionRequest;
use crate::domain::SearchRange;

pub const SUGGESTION_SYSTEM_PROMPT: &str = "You return only a concise comma-separated list of \
real city names in Poland that start with or closely match the user input. No explanations, \
no extra text.";

pub const CONDITIONS_SYSTEM_PROMPT: &str = "You are a ski and weather assistant. Respond ONLY \
with a valid raw JSON array, no markdown, no explanation, and do NOT prepend the word \"json\". \
The response must start with \"[\" and end with \"]\". Each array element is an object with keys: \
\"name\", \"status\", \"conditions\", \"snowDepth\", \"url\". \"status\" is a short word like \
\"open\", \"closed\", \"partial\", or \"unknown\". \"snowDepth\" is a short string like \"60 cm\" \
or \"unknown\". \"url\" is a direct link to an official or reliable ski information page if \
known, otherwise an empty string.";

pub const SUGGESTION_TEMPERATURE: f32 = 0.2;
pub const SUGGESTION_MAX_TOKENS: u32 = 64;
pub const CONDITIONS_TEMPERATURE: f32 = 0.4;
pub const CONDITIONS_MAX_TOKENS: u32 = 220;

pub fn suggestion_request(prefix: &str) -> CompletionRequest {
    CompletionRequest {
        system: SUGGESTION_SYSTEM_PROMPT.to_string(),
        user: prefix.to_string(),
        temperature: SUGGESTION_TEMPERATURE,
        max_tokens: SUGGESTION_MAX_TOKENS,
    }
}

pub fn conditions_request(city: &str, range: SearchRange) -> CompletionRequest {
    CompletionRequest {
        system: CONDITIONS_SYSTEM_PROMPT.to_string(),
        user: format!(
            "City: {city}. List ski slopes within about {range} km in Poland and return them \
             as a JSON array with fields: name, status, conditions, snowDepth, url."
        ),
        temperature: CONDITIONS_TEMPERATURE,
        max_tokens: CONDITIONS_MAX_TOKENS,
    }
}
