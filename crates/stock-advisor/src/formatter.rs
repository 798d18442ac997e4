//! Styling for model responses
//!
//! The model answers in loosely structured plain text. [`format_response`]
//! runs it through an ordered set of regex rewrites that add inline-styled
//! HTML: section headings, labels, highlighted figures and recommendation
//! badges. Every stage is a plain `&str -> String` function so each can be
//! exercised on its own. Order matters: later stages see the markup
//! produced by earlier ones.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Section headings requested by the investor prompts
pub const SECTION_HEADINGS: [&str; 20] = [
    "Initial impression",
    "Business quality analysis",
    "Management assessment",
    "Financial strength",
    "Valuation",
    "Risks and concerns",
    "Conclusion",
    "Stock category",
    "The company's story",
    "Growth analysis and PEG ratio",
    "Competitive position",
    "Potential catalysts",
    "Red flags or concerns",
    "Macroeconomic positioning",
    "Debt and balance sheet analysis",
    "Correlation with economic indicators",
    "Portfolio fit",
    "Innovation category",
    "Addressable market analysis",
    "Growth metrics",
];

const SECTION_STYLE: &str = "color:#1E88E5; font-size:22px; font-weight:bold; border-bottom:2px solid #1E88E5; margin-top:25px; margin-bottom:15px; padding-bottom:5px;";
const SUBSECTION_STYLE: &str =
    "color:#1E88E5; font-size:20px; font-weight:bold; margin-top:20px; margin-bottom:10px;";
const LABEL_STYLE: &str = "color:#0D47A1; font-weight:bold; font-size:18px;";
const FIGURE_STYLE: &str = "color:#FF5722; font-weight:bold;";
const BADGE_STYLE: &str =
    "color:white; padding:3px 8px; border-radius:4px; font-weight:bold; text-transform:uppercase;";
const SPACER: &str = r#"<div style="margin-bottom:15px;"></div>"#;
const CONTAINER_STYLE: &str = "line-height:1.6; font-size:16px; font-family: 'Segoe UI', Arial, sans-serif; padding:15px; border-radius:5px;";

static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = SECTION_HEADINGS
        .iter()
        .map(|h| regex::escape(h))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(
        r"(?i)(^|\n)[ \t]*(?:\*\*)?(({alternatives})(:)?)(?:\*\*)?[ \t]*(\n|$)"
    ))
    .expect("section heading pattern is valid")
});

static SUBSECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|\n)[ \t]*([A-Z][A-Za-z\s]+:)[ \t]*(\n|$)")
        .expect("subsection pattern is valid")
});

static LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*:").expect("label pattern is valid"));

static FIGURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+(\.[0-9]+)?\s*%)|(\$[0-9]+(,[0-9]+)*(\.[0-9]+)?[KMBT]?)")
        .expect("figure pattern is valid")
});

static RECOMMENDATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(buy|hold|sell)\b").expect("recommendation pattern is valid")
});

static PARAGRAPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\n\n|\r\n\r\n)").expect("paragraph pattern is valid"));

/// A known section heading on its own line becomes a large heading.
///
/// Optional `**` emphasis and a trailing colon are accepted; the line break
/// after the heading is consumed.
pub fn style_section_headings(text: &str) -> String {
    SECTION_RE
        .replace_all(text, format!(r#"${{1}}<div style="{SECTION_STYLE}">${{2}}</div>"#))
        .into_owned()
}

/// Any other `Capitalized Words:` line becomes a secondary heading
pub fn style_subsection_headings(text: &str) -> String {
    SUBSECTION_RE
        .replace_all(text, format!(r#"${{1}}<div style="{SUBSECTION_STYLE}">${{2}}</div>"#))
        .into_owned()
}

/// `**Label**:` becomes an inline label
pub fn style_labels(text: &str) -> String {
    LABEL_RE
        .replace_all(text, format!(r#"<span style="{LABEL_STYLE}">${{1}}:</span>"#))
        .into_owned()
}

/// Percentages and dollar amounts are highlighted
pub fn highlight_figures(text: &str) -> String {
    FIGURE_RE
        .replace_all(text, format!(r#"<span style="{FIGURE_STYLE}">${{0}}</span>"#))
        .into_owned()
}

/// Badge colour for a recommendation word
fn badge_color(word: &str) -> Option<&'static str> {
    match word.to_ascii_lowercase().as_str() {
        "buy" => Some("#4CAF50"),
        "sell" => Some("#F44336"),
        "hold" => Some("#FF9800"),
        _ => None,
    }
}

/// Standalone buy, hold and sell words anywhere in the text become badges
pub fn badge_recommendations(text: &str) -> String {
    RECOMMENDATION_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let word = &caps[1];
            match badge_color(word) {
                Some(color) => format!(
                    r#"<span style="background-color:{color}; {BADGE_STYLE}">{}</span>"#,
                    word.to_ascii_uppercase()
                ),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// `"- "` list markers become bullets
pub fn bulletize(text: &str) -> String {
    text.replace("- ", "• ")
}

/// Blank-line paragraph breaks become spacers
pub fn space_paragraphs(text: &str) -> String {
    PARAGRAPH_RE.replace_all(text, SPACER).into_owned()
}

/// Wrap everything in the outer container
pub fn wrap(text: &str) -> String {
    format!("<div style=\"{CONTAINER_STYLE}\">\n{text}\n</div>")
}

/// Formatting stages in the order they are applied
pub const STAGES: [(&str, fn(&str) -> String); 8] = [
    ("section_headings", style_section_headings),
    ("subsection_headings", style_subsection_headings),
    ("labels", style_labels),
    ("figures", highlight_figures),
    ("recommendations", badge_recommendations),
    ("bullets", bulletize),
    ("paragraphs", space_paragraphs),
    ("wrap", wrap),
];

/// Neutralise markup in raw model text
///
/// Only `&`, `<` and `>` are replaced: the text ends up as element content,
/// and quotes or slashes must survive for the heading patterns to match.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Apply every formatting stage to a model response
pub fn format_response(text: &str) -> String {
    STAGES
        .iter()
        .fold(text.to_string(), |acc, (_, stage)| stage(&acc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_markup_keeps_headings_matchable() {
        let escaped = escape_markup("The company's story\n<script>alert('x')</script> & more");
        assert_eq!(
            escaped,
            "The company's story\n&lt;script&gt;alert('x')&lt;/script&gt; &amp; more"
        );

        let out = format_response(&escaped);
        assert!(out.contains(&format!(r#"<div style="{SECTION_STYLE}">The company's story</div>"#)));
        assert!(!out.contains("<script>"));
    }

    #[test]
    fn test_section_heading_on_own_line() {
        let out = style_section_headings("Initial impression\nA solid business.");
        assert_eq!(
            out,
            format!(r#"<div style="{SECTION_STYLE}">Initial impression</div>A solid business."#)
        );
    }

    #[test]
    fn test_section_heading_variants() {
        let out = style_section_headings("Intro\n**Valuation:**\nCheap.");
        assert!(out.contains(&format!(r#"Intro
<div style="{SECTION_STYLE}">Valuation:</div>Cheap."#)));

        let out = style_section_headings("  risks and concerns  \n");
        assert!(out.contains(">risks and concerns</div>"));

        let out = style_section_headings("The company's story:\nIt sells phones.");
        assert!(out.contains(">The company's story:</div>"));
    }

    #[test]
    fn test_heading_inside_sentence_untouched() {
        let text = "The Valuation looks stretched.";
        assert_eq!(style_section_headings(text), text);
    }

    #[test]
    fn test_subsection_heading() {
        let out = style_subsection_headings("Key Takeaways:\nMargins are high.");
        assert_eq!(
            out,
            format!(r#"<div style="{SUBSECTION_STYLE}">Key Takeaways:</div>Margins are high."#)
        );
        assert_eq!(style_subsection_headings("lower case:\n"), "lower case:\n");
    }

    #[test]
    fn test_labels() {
        let out = style_labels("**Moat**: wide and durable");
        assert_eq!(out, format!(r#"<span style="{LABEL_STYLE}">Moat:</span> wide and durable"#));
        assert_eq!(style_labels("**bold** only"), "**bold** only");
    }

    #[test]
    fn test_figures_highlighted() {
        let out = highlight_figures("Revenue $1,234.56 grew 42.00% to $2.5B");
        assert!(out.contains(&format!(r#"<span style="{FIGURE_STYLE}">$1,234.56</span>"#)));
        assert!(out.contains(&format!(r#"<span style="{FIGURE_STYLE}">42.00%</span>"#)));
        assert!(out.contains(&format!(r#"<span style="{FIGURE_STYLE}">$2.5B</span>"#)));
        assert_eq!(highlight_figures("wave 3 of 5"), "wave 3 of 5");
    }

    #[test]
    fn test_recommendation_badges() {
        let out = badge_recommendations("I would buy this. Hold off on peers. SELL the rest.");
        assert!(out.contains("background-color:#4CAF50; color:white; padding:3px 8px; border-radius:4px; font-weight:bold; text-transform:uppercase;\">BUY</span>"));
        assert!(out.contains("background-color:#FF9800;"));
        assert!(out.contains(">HOLD</span> off"));
        assert!(out.contains("background-color:#F44336;"));
    }

    #[test]
    fn test_recommendation_needs_whole_word() {
        let text = "Buyers and sellers were holding firm.";
        assert_eq!(badge_recommendations(text), text);
    }

    #[test]
    fn test_bullets_and_paragraphs() {
        assert_eq!(bulletize("- one\n- two"), "• one\n• two");
        assert_eq!(
            space_paragraphs("first\n\nsecond\r\n\r\nthird"),
            format!("first{SPACER}second{SPACER}third")
        );
    }

    #[test]
    fn test_wrap() {
        let out = wrap("body");
        assert!(out.starts_with("<div style=\"line-height:1.6; font-size:16px;"));
        assert!(out.ends_with("body\n</div>"));
    }

    #[test]
    fn test_stages_in_order() {
        let names: Vec<&str> = STAGES.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            [
                "section_headings",
                "subsection_headings",
                "labels",
                "figures",
                "recommendations",
                "bullets",
                "paragraphs",
                "wrap"
            ]
        );
    }

    #[test]
    fn test_format_response_end_to_end() {
        let text = "Initial impression\nA wonderful business trading at $187.44.\n\n**Verdict**: buy\n- ROE of 147.00%";
        let out = format_response(text);

        assert!(out.starts_with("<div style=\"line-height:1.6;"));
        assert!(out.contains(&format!(r#"<div style="{SECTION_STYLE}">Initial impression</div>"#)));
        assert!(out.contains(&format!(r#"<span style="{FIGURE_STYLE}">$187.44</span>"#)));
        assert!(out.contains(SPACER));
        assert!(out.contains(&format!(r#"<span style="{LABEL_STYLE}">Verdict:</span>"#)));
        assert!(out.contains(">BUY</span>"));
        assert!(out.contains("• ROE of"));
        assert!(out.contains(&format!(r#"<span style="{FIGURE_STYLE}">147.00%</span>"#)));
    }

    #[test]
    fn test_format_response_plain_text() {
        let out = format_response("Nothing special here");
        assert_eq!(out, wrap("Nothing special here"));
    }
}
