/// Story text: intro and outro narration, and the shop's rotating quotes.

pub const INTRO: [&str; 6] = [
    "Norman was never beloved by the villagers.",
    "  Their fear of the unknown led them to violence.",
    "    Death visited often, but Norman greeted it calmly.",
    "  In the face of fate, he found acceptance.",
    "    Each return was not revenge, but a lesson in endurance.",
    "      'The obstacle on my path is my path,' Norman mused.",
];

pub const OUTRO: [&str; 8] = [
    "",
    "The struggle ended, as all things do.",
    "Norman found peace not in victory, but in understanding.",
    "He realized: suffering is inevitable, but misery is a choice.",
    "In solitude, he studied, content with the present moment.",
    "THE END — Amor Fati.",
    "",
    "Press any key to reflect and begin anew.",
];

/// Shown once the intro has run out and nobody has clicked yet.
pub const CLICK_TO_BEGIN: &str = "                (Click to begin)";

pub const SHOP_QUOTES: [&str; 9] = [
    "\"Fate brings both hardship and opportunity.\"",
    "\"Let me choose wisely, unmoved by fortune or loss.\"",
    "\"The obstacle on my path is my path.\"",
    "\"I cannot control what happens, only how I respond.\"",
    "\"To endure is to prevail.\"",
    "\"All things serve to strengthen me.\"",
    "\"Suffering is inevitable, misery is a choice.\"",
    "\"What stands in the way becomes the way.\"",
    "\"Peace comes from acceptance, not victory.\"",
];

/// Quote for the given shop visit; cycles through the list.
pub fn shop_quote(visit: usize) -> &'static str {
    SHOP_QUOTES[visit % SHOP_QUOTES.len()]
}
