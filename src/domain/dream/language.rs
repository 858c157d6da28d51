/// Thai Unicode script block (U+0E00 - U+0E7F).
const THAI_BLOCK: std::ops::RangeInclusive<char> = '\u{0E00}'..='\u{0E7F}';

/// The service interprets Thai only; this is a hard gate, not a heuristic.
pub fn contains_thai(text: &str) -> bool {
    text.chars().any(|c| THAI_BLOCK.contains(&c))
}

/// Input classification. Selects both the similarity threshold used for
/// retrieval and the system-instruction template used for generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    /// A lone symbol word ("งู", "ฟันหัก"), looked up dictionary-style.
    SingleSymbol,
    /// A full dream narrative.
    FullStory,
}

impl AnalysisMode {
    /// Short inputs without whitespace are treated as a single symbol.
    pub fn classify(text: &str) -> Self {
        let is_single_word =
            text.chars().count() < 20 && !text.chars().any(char::is_whitespace);
        if is_single_word {
            AnalysisMode::SingleSymbol
        } else {
            AnalysisMode::FullStory
        }
    }

    /// Minimum similarity for a prior dream to count as context. Symbol
    /// lookups demand a tighter match than narratives.
    pub fn match_threshold(&self) -> f64 {
        match self {
            AnalysisMode::SingleSymbol => 0.85,
            AnalysisMode::FullStory => 0.75,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::SingleSymbol => "single_symbol",
            AnalysisMode::FullStory => "full_story",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thai_text_passes_the_gate() {
        assert!(contains_thai("ฝันเห็นงู"));
        assert!(contains_thai("dreamed of งู last night"));
    }

    #[test]
    fn non_thai_text_fails_the_gate() {
        assert!(!contains_thai("I dreamed of a snake"));
        assert!(!contains_thai("꿈에서 뱀을 봤어요"));
        assert!(!contains_thai(""));
    }

    #[test]
    fn short_single_word_is_single_symbol() {
        assert_eq!(AnalysisMode::classify("งู"), AnalysisMode::SingleSymbol);
        assert_eq!(AnalysisMode::classify("ฟันหัก"), AnalysisMode::SingleSymbol);
    }

    #[test]
    fn narrative_is_full_story() {
        // 20+ characters
        assert_eq!(
            AnalysisMode::classify("ฝันเห็นงูใหญ่สีดำไล่ฉันไปทั่วบ้าน"),
            AnalysisMode::FullStory
        );
        // short but contains whitespace
        assert_eq!(AnalysisMode::classify("งู ใหญ่"), AnalysisMode::FullStory);
    }

    #[test]
    fn mode_selects_the_threshold() {
        assert_eq!(AnalysisMode::SingleSymbol.match_threshold(), 0.85);
        assert_eq!(AnalysisMode::FullStory.match_threshold(), 0.75);
    }
}
