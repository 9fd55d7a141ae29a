//! Template-based caption synthesis.
//!
//! Captions are theme-driven: only the mood and hashtags reach the text,
//! nothing about the image itself.

use rand::Rng;
use serde::{Deserialize, Serialize};

mod templates;

use templates::{CATALOG, TEMPLATES_PER_STYLE};

const MOOD_SLOT: &str = "{mood}";
const HASHTAGS_SLOT: &str = "{hashtags}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionStyle {
    Storytelling,
    Poetic,
    Philosophical,
    Conversational,
    Emotional,
    Creative,
    Abstract,
    Playful,
    Inspirational,
    Mysterious,
    Romantic,
    Adventure,
    Artistic,
    Energetic,
    Chill,
}

/// Number of templates in the flattened catalog.
pub fn template_count() -> usize {
    CATALOG.len() * TEMPLATES_PER_STYLE
}

/// Template at `index` of the flattened catalog.
fn template_at(index: usize) -> (CaptionStyle, &'static str) {
    let (style, templates) = &CATALOG[index / TEMPLATES_PER_STYLE];
    (*style, templates[index % TEMPLATES_PER_STYLE])
}

/// Substitute both slots in one pass, so a mood containing `{hashtags}`
/// is never expanded twice.
fn render(template: &str, mood: &str, hashtags: &str) -> String {
    let (head, rest) = template.split_once(MOOD_SLOT).unwrap_or((template, ""));
    let (middle, tail) = rest.split_once(HASHTAGS_SLOT).unwrap_or((rest, ""));
    let mut out =
        String::with_capacity(template.len() + mood.len() + hashtags.len());
    out.push_str(head);
    out.push_str(mood);
    out.push_str(middle);
    out.push_str(hashtags);
    out.push_str(tail);
    out
}

/// A caption together with the style it was drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Caption {
    pub style: CaptionStyle,
    pub text: String,
}

/// Pick a template uniformly from the whole catalog and fill it in.
pub fn synthesize_styled<R: Rng>(mood: &str, hashtags: &str, rng: &mut R) -> Caption {
    let (style, template) = template_at(rng.gen_range(0..template_count()));
    Caption {
        style,
        text: render(template, mood, hashtags),
    }
}

pub fn synthesize<R: Rng>(mood: &str, hashtags: &str, rng: &mut R) -> String {
    synthesize_styled(mood, hashtags, rng).text
}
