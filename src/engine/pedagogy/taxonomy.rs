// Bloom 动词表: 层级 1..6,每级首个为英文关键动词,其后为法语对应动词
pub const BLOOM_VERBS: [(u8, &[&str]); 6] = [
    (1, &["remember", "mémoriser", "restituer"]),
    (2, &["understand", "comprendre", "expliquer"]),
    (3, &["apply", "appliquer", "utiliser"]),
    (4, &["analyze", "analyse", "comparer"]),
    (5, &["evaluate", "évaluer", "justifier"]),
    (6, &["create", "créer", "concevoir"]),
];

/// 识别文本的 Bloom 层级
///
/// 按层级顺序扫描,返回第一个命中的层级; 无命中返回 None
pub fn detect_level(text: &str) -> Option<u8> {
    let lowered = text.to_lowercase();
    BLOOM_VERBS
        .iter()
        .find(|(_, verbs)| verbs.iter().any(|verb| lowered.contains(verb)))
        .map(|(level, _)| *level)
}

/// 大小写不敏感的子串包含（空 needle 视为命中,与普通子串包含一致）
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_level_first_match_in_level_order() {
        assert_eq!(detect_level("understand fractions"), Some(2));
        assert_eq!(detect_level("Apply division"), Some(3));
        // 同时命中 2 与 6 时取层级顺序中的第一个
        assert_eq!(detect_level("create a poster to understand"), Some(2));
        assert_eq!(detect_level("Concevoir une maquette"), Some(6));
        assert_eq!(detect_level("lecture silencieuse"), None);
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Students UNDERSTAND fractions", "understand fractions"));
        assert!(!contains_ignore_case("students", "understand"));
        assert!(contains_ignore_case("anything", ""));
        assert!(!contains_ignore_case("anything", "   "));
    }
}
