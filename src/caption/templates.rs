use super::CaptionStyle;

pub(super) const TEMPLATES_PER_STYLE: usize = 3;

/// Every template carries one `{mood}` and ends with `{hashtags}`.
pub(super) const CATALOG: &[(CaptionStyle, [&str; TEMPLATES_PER_STYLE])] = &[
    (
        CaptionStyle::Storytelling,
        [
            "Once upon a time, in a {mood} moment captured forever... ✨ {hashtags}",
            "The whispers of {mood} that only this moment can tell 💫 {hashtags}",
            "In this frame, {mood} becomes more than just a feeling 🌟 {hashtags}",
        ],
    ),
    (
        CaptionStyle::Poetic,
        [
            "Where memories meet {mood}, magic dances in the light 🎭 {hashtags}",
            "The canvas of this moment, painted with {mood} dreams 🎨 {hashtags}",
            "In the symphony of life, {mood} finds its perfect note 🎵 {hashtags}",
        ],
    ),
    (
        CaptionStyle::Philosophical,
        [
            "What if {mood} was a photograph? It would look like this 🤔 {hashtags}",
            "The question: Can {mood} be captured in a single frame? 📸 {hashtags}",
            "If {mood} had a visual story, this would be its opening scene 🌈 {hashtags}",
        ],
    ),
    (
        CaptionStyle::Conversational,
        [
            "POV: You're living your best {mood} life right now 🎬 {hashtags}",
            "Plot twist: This moment is actually pure {mood} energy 🎪 {hashtags}",
            "Hot take: {mood} looks incredible in this light 🔥 {hashtags}",
        ],
    ),
    (
        CaptionStyle::Emotional,
        [
            "This feels like {mood} feels like home 🏠 {hashtags}",
            "When {mood} and this moment collide, magic happens ✨ {hashtags}",
            "This frame? It's pure {mood} energy captured ⚡ {hashtags}",
        ],
    ),
    (
        CaptionStyle::Creative,
        [
            "Imagine if {mood} was a sunset over mountains 🏔️ {hashtags}",
            "The recipe for {mood}: 1 part this moment, 2 parts magic 🧙‍♀️ {hashtags}",
            "In the dictionary of life, {mood} is defined by moments like this 📖 {hashtags}",
        ],
    ),
    (
        CaptionStyle::Abstract,
        [
            "This moment + {mood} = infinite possibilities ∞ {hashtags}",
            "The theory of {mood}: it's all about the vibes in this frame 🌀 {hashtags}",
            "When {mood} meets this moment, the universe smiles 🌌 {hashtags}",
        ],
    ),
    (
        CaptionStyle::Playful,
        [
            "{mood} called, it wants its vibes back from this photo 📞 {hashtags}",
            "Plot twist: This photo is actually a {mood} mood board 🎨 {hashtags}",
            "The challenge: describe this {mood} moment in one word. Go! 🎯 {hashtags}",
        ],
    ),
    (
        CaptionStyle::Inspirational,
        [
            "Today's reminder: {mood} is always in style in moments like this 💪 {hashtags}",
            "The way to do {mood}: with confidence and this energy ✨ {hashtags}",
            "If {mood} was a superpower, it would look exactly like this 🦸‍♀️ {hashtags}",
        ],
    ),
    (
        CaptionStyle::Mysterious,
        [
            "The secret to {mood}: shh, it's hidden in this frame 🤫 {hashtags}",
            "In the shadows of this moment, {mood} finds its true form 🌑 {hashtags}",
            "The mystery of {mood}: solved in this perfect shot 🔍 {hashtags}",
        ],
    ),
    (
        CaptionStyle::Romantic,
        [
            "The way to my heart? Through {mood} and moments like this 💕 {hashtags}",
            "If {mood} was a love language, it would speak in this light 💌 {hashtags}",
            "The romance of {mood}: it's written in this perfect frame ⭐ {hashtags}",
        ],
    ),
    (
        CaptionStyle::Adventure,
        [
            "The adventure begins where {mood} meets this moment 🗺️ {hashtags}",
            "Pack your {mood} dreams in frames like this 🎒 {hashtags}",
            "The expedition to find the perfect {mood} moment ends here 🧭 {hashtags}",
        ],
    ),
    (
        CaptionStyle::Artistic,
        [
            "The masterpiece of {mood}: painted with perfect timing 🖌️ {hashtags}",
            "In the gallery of life, {mood} is the star of this exhibit 🎭 {hashtags}",
            "The art of {mood}: it's all in the details of this shot 🎨 {hashtags}",
        ],
    ),
    (
        CaptionStyle::Energetic,
        [
            "The energy of {mood}: it's electric in this frame! ⚡ {hashtags}",
            "When {mood} meets this moment, the party starts 🎉 {hashtags}",
            "The power of {mood}: it's unstoppable in this shot! 💥 {hashtags}",
        ],
    ),
    (
        CaptionStyle::Chill,
        [
            "The zen of {mood}: peaceful and perfect in this moment 🧘‍♀️ {hashtags}",
            "In the calm of this {mood} frame, everything makes sense 🌸 {hashtags}",
            "The serenity of {mood}: it's pure bliss captured here 🕯️ {hashtags}",
        ],
    ),
];
