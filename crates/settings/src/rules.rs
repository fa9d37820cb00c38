use regex::{Regex, RegexBuilder};

use crate::{PackageCategory, Settings, SettingsError};

/// One compiled `pattern -> prefix` rule.
#[derive(Debug, Clone)]
pub struct PrefixRule {
    pattern: Regex,
    prefix: String,
}

impl PrefixRule {
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn matches(&self, relative_path: &str) -> bool {
        self.pattern.is_match(relative_path)
    }
}

/// Prefix rules compiled from [`Settings`], ready for label formatting.
///
/// Rules are held in evaluation order: custom rules first, then the apps, libs
/// and tools categories. Rules with an empty regex or an empty prefix are left
/// out, as they can never produce a prefix.
#[derive(Debug, Clone, Default)]
pub struct LabelRules {
    root_prefix: String,
    fallback_prefix: String,
    rules: Vec<PrefixRule>,
}

impl LabelRules {
    /// Compiles every configured pattern. An invalid pattern fails the whole
    /// compilation and names the offending settings key.
    pub fn compile(settings: &Settings) -> Result<Self, SettingsError> {
        let mut rules = Vec::new();
        for (index, custom) in settings.custom.iter().enumerate() {
            if custom.regex.is_empty() || custom.prefix.is_empty() {
                continue;
            }
            let key = format!("monolithium.folders.custom[{index}].regex");
            rules.push(compile_rule(&key, &custom.regex, &custom.prefix)?);
        }
        for category in PackageCategory::ORDER {
            let regex = settings.category_regex(category);
            let prefix = settings.category_prefix(category);
            if regex.is_empty() || prefix.is_empty() {
                continue;
            }
            let key = format!("monolithium.folders.regex.{}", category.as_str());
            rules.push(compile_rule(&key, regex, prefix)?);
        }
        Ok(Self {
            root_prefix: settings.root_prefix.clone(),
            fallback_prefix: settings.unknown_prefix.clone(),
            rules,
        })
    }

    pub fn root_prefix(&self) -> &str {
        &self.root_prefix
    }

    pub fn rules(&self) -> &[PrefixRule] {
        &self.rules
    }

    /// Prefix of the first rule matching `relative_path`, else the fallback.
    pub fn prefix_for(&self, relative_path: &str) -> &str {
        self.rules
            .iter()
            .find(|rule| rule.matches(relative_path))
            .map(PrefixRule::prefix)
            .unwrap_or(self.fallback_prefix.as_str())
    }
}

fn compile_rule(key: &str, regex: &str, prefix: &str) -> Result<PrefixRule, SettingsError> {
    let pattern = RegexBuilder::new(regex)
        .unicode(true)
        .build()
        .map_err(|source| SettingsError::InvalidPattern {
            key: key.to_string(),
            source,
        })?;
    Ok(PrefixRule {
        pattern,
        prefix: prefix.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CustomPrefix;

    fn categorized() -> Settings {
        Settings {
            apps_regex: "^apps/".into(),
            apps_prefix: "📱 ".into(),
            libs_regex: "^(libs|packages)/".into(),
            libs_prefix: "📚 ".into(),
            tools_regex: "^tools/".into(),
            tools_prefix: "🔧 ".into(),
            unknown_prefix: "❓ ".into(),
            ..Settings::default()
        }
    }

    #[test]
    fn categories_are_tried_in_order() {
        let rules = LabelRules::compile(&categorized()).unwrap();
        let patterns: Vec<_> = rules.rules().iter().map(PrefixRule::pattern).collect();
        assert_eq!(patterns, vec!["^apps/", "^(libs|packages)/", "^tools/"]);
        assert_eq!(rules.prefix_for("packages/ui"), "📚 ");
        assert_eq!(rules.prefix_for("tools/lint"), "🔧 ");
        assert_eq!(rules.prefix_for("docs"), "❓ ");
    }

    #[test]
    fn custom_rule_wins_over_category() {
        let mut settings = categorized();
        settings.custom = vec![
            CustomPrefix::new("", "ignored "),
            CustomPrefix::new("^apps/admin", "🛡 "),
        ];
        let rules = LabelRules::compile(&settings).unwrap();
        assert_eq!(rules.prefix_for("apps/admin"), "🛡 ");
        assert_eq!(rules.prefix_for("apps/site"), "📱 ");
    }

    #[test]
    fn category_without_prefix_is_skipped() {
        let mut settings = categorized();
        settings.apps_prefix.clear();
        let rules = LabelRules::compile(&settings).unwrap();
        assert_eq!(rules.prefix_for("apps/site"), "❓ ");
    }

    #[test]
    fn unicode_patterns_match_code_points() {
        let settings = Settings {
            custom: vec![CustomPrefix::new(r"^\p{Greek}+/", "Ω ")],
            ..Settings::default()
        };
        let rules = LabelRules::compile(&settings).unwrap();
        assert_eq!(rules.prefix_for("λόγος/core"), "Ω ");
        assert_eq!(rules.prefix_for("logos/core"), "");
    }

    #[test]
    fn invalid_pattern_names_its_key() {
        let mut settings = categorized();
        settings.custom = vec![CustomPrefix::new("(unclosed", "x ")];
        let err = LabelRules::compile(&settings).unwrap_err();
        match err {
            SettingsError::InvalidPattern { key, .. } => {
                assert_eq!(key, "monolithium.folders.custom[0].regex");
            }
            other => panic!("unexpected error: {other}"),
        }

        let mut settings = categorized();
        settings.tools_regex = "[".into();
        let err = LabelRules::compile(&settings).unwrap_err();
        assert!(err.to_string().contains("monolithium.folders.regex.tools"));
    }
}
