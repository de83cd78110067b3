// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持法语（回退语言）和英语
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// 注意: rust-i18n 的初始语言为 en; 首次翻译前切换到 DEFAULT_LOCALE,
//       显式 set_locale 之后不再覆盖
// ==========================================

use std::sync::Once;

/// 默认语言
pub const DEFAULT_LOCALE: &str = "fr";

static DEFAULT_LOCALE_INIT: Once = Once::new();

fn ensure_default_locale() {
    DEFAULT_LOCALE_INIT.call_once(|| rust_i18n::set_locale(DEFAULT_LOCALE));
}

/// 获取当前语言
pub fn current_locale() -> String {
    ensure_default_locale();
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"fr" 或 "en"）
pub fn set_locale(locale: &str) {
    DEFAULT_LOCALE_INIT.call_once(|| {});
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use fiche_engine::i18n::t;
/// let msg = t("common.validation_error");
/// ```
pub fn t(key: &str) -> String {
    ensure_default_locale();
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use fiche_engine::i18n::t_with_args;
/// let msg = t_with_args("rule.competence_types.suggestion", &[("type", "social")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    ensure_default_locale();
    interpolate(rust_i18n::t!(key).to_string(), args)
}

/// 按指定语言翻译（不修改全局语言）
pub fn t_in(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    interpolate(rust_i18n::t!(key, locale = locale).to_string(), args)
}

fn interpolate(mut message: String, args: &[(&str, &str)]) -> String {
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        message = message.replace(&placeholder, v);
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_in_explicit_locale() {
        assert_eq!(t_in("fr", "common.validation_error", &[]), "Erreur de validation");
        assert_eq!(t_in("en", "common.validation_error", &[]), "Validation error");
    }

    #[test]
    fn test_translate_with_args_in_explicit_locale() {
        let msg = t_in("fr", "rule.competence_types.suggestion", &[("type", "social")]);
        assert!(msg.contains("social"));
        assert!(msg.contains("Ajouter"));

        let msg = t_in("en", "rule.competence_types.suggestion", &[("type", "social")]);
        assert_eq!(msg, "Add a competence of type social.");
    }

    #[test]
    fn test_unknown_locale_falls_back_to_french() {
        let msg = t_in("de", "phase.synthesis", &[]);
        assert_eq!(msg, "Synthèse");
    }

    #[test]
    fn test_default_locale_is_french() {
        assert_eq!(current_locale(), DEFAULT_LOCALE);
        assert_eq!(t("common.validation_error"), "Erreur de validation");
        assert_eq!(
            t_with_args("rule.competence_types.suggestion", &[("type", "social")]),
            t_in("fr", "rule.competence_types.suggestion", &[("type", "social")])
        );
    }

    #[test]
    fn test_interpolate_leaves_unknown_placeholders() {
        let msg = interpolate("a %{x} b %{y}".to_string(), &[("x", "1")]);
        assert_eq!(msg, "a 1 b %{y}");
    }
}
