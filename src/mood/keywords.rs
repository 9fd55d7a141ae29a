use super::Mood;

/// Keyword sets in priority order. The first set with any matching token wins,
/// so "exciting" resolves to adventurous even though energetic lists it too.
pub(super) const KEYWORD_MOODS: &[(Mood, &[&str])] = &[
    (
        Mood::Romantic,
        &[
            "romantic",
            "love",
            "romance",
            "sweet",
            "tender",
            "passionate",
            "intimate",
            "affectionate",
            "caring",
        ],
    ),
    (
        Mood::Adventurous,
        &[
            "adventure",
            "explore",
            "travel",
            "wander",
            "journey",
            "wild",
            "outdoor",
            "bold",
            "daring",
            "exciting",
        ],
    ),
    (
        Mood::Chill,
        &[
            "casual",
            "chill",
            "relaxed",
            "easy",
            "simple",
            "comfortable",
            "laid",
            "back",
            "mellow",
        ],
    ),
    (
        Mood::Mysterious,
        &[
            "mysterious",
            "mystery",
            "dark",
            "moody",
            "mystical",
            "enigmatic",
            "secretive",
            "hidden",
            "shadowy",
        ],
    ),
    (
        Mood::Playful,
        &[
            "fun",
            "playful",
            "happy",
            "joyful",
            "cheerful",
            "bright",
            "lively",
            "energetic",
            "upbeat",
        ],
    ),
    (
        Mood::Artistic,
        &[
            "poetic",
            "poetry",
            "artistic",
            "creative",
            "elegant",
            "sophisticated",
            "beautiful",
            "graceful",
        ],
    ),
    (
        Mood::Energetic,
        &[
            "exciting",
            "energy",
            "vibrant",
            "dynamic",
            "intense",
            "powerful",
            "electric",
            "thrilling",
        ],
    ),
];

/// Moods drawn uniformly when neither keywords nor color decide.
pub(super) const DEFAULT_MOODS: [Mood; 5] = [
    Mood::Aesthetic,
    Mood::Dreamy,
    Mood::Vintage,
    Mood::Modern,
    Mood::Bold,
];

pub(super) fn hashtags(mood: Mood) -> &'static str {
    match mood {
        Mood::Romantic => "#romantic #love #aesthetic",
        Mood::Adventurous => "#adventure #explore #wanderlust",
        Mood::Chill => "#casual #chill #vibes",
        Mood::Mysterious => "#mysterious #moody #darkaesthetic",
        Mood::Playful => "#fun #playful #happy",
        Mood::Artistic => "#poetic #artistic #creative",
        Mood::Energetic => "#exciting #energy #vibrant",
        Mood::Nature => "#matcha #nature #picnic #fresh",
        Mood::Summer => "#summer #vibes #sunny",
        Mood::Floral => "#flower #bloom #springvibes",
        Mood::Calm => "#fresh #calm #serene",
        Mood::Cozy => "#picnic #cozy #warmvibes",
        Mood::Aesthetic => "#aesthetic #vibes #mood",
        Mood::Dreamy => "#dreamy #vibes #magic",
        Mood::Vintage => "#vintage #retro #classic",
        Mood::Modern => "#modern #minimal #clean",
        Mood::Bold => "#bold #bright #statement",
    }
}

/// Match tokens against the keyword sets in priority order.
pub(super) fn keyword_mood<'a>(tokens: impl Iterator<Item = &'a str> + Clone) -> Option<Mood> {
    KEYWORD_MOODS.iter().find_map(|(mood, words)| {
        tokens
            .clone()
            .any(|token| words.contains(&token))
            .then_some(*mood)
    })
}

/// Classify a dominant color by RGB ranges. Checked in order; first hit wins.
pub(super) fn color_mood((r, g, b): (u8, u8, u8)) -> Option<Mood> {
    if g > 160 && r < 200 && b < 160 {
        Some(Mood::Nature)
    } else if r > 200 && g > 200 && b < 120 {
        Some(Mood::Summer)
    } else if r > 200 && b > 150 && g < 180 {
        Some(Mood::Floral)
    } else if b > 180 && r < 160 && g < 200 {
        Some(Mood::Calm)
    } else if r > 200 && g > 120 && b < 100 {
        Some(Mood::Cozy)
    } else {
        None
    }
}
