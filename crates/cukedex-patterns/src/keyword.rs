//! Locale keyword sets used to recognise structural header lines.
//!
//! Every supported locale is an immutable [`LocaleKeywordSet`] bundling the
//! spellings of the four headers the classifier tracks. The bundles live in a
//! static lookup table keyed by the code used in a `# language:` declaration,
//! so supporting another locale only means adding a row to the table.

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::KeywordError;

/// Alternative spellings of one structural keyword.
///
/// A line matches when, after leading whitespace, it starts with one of the
/// spellings immediately followed by a colon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordPattern {
    spellings: &'static [&'static str],
}

impl KeywordPattern {
    /// Create a pattern from its spellings.
    #[must_use]
    pub const fn new(spellings: &'static [&'static str]) -> Self {
        Self { spellings }
    }

    /// Return the spellings recognised by this pattern.
    #[must_use]
    pub const fn spellings(&self) -> &'static [&'static str] {
        self.spellings
    }

    /// Match a header line and return its `keyword: title` text.
    ///
    /// The capture is trimmed. Gherkin has no trailing comments on header
    /// lines, so a `#` in the title is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use cukedex_patterns::KeywordPattern;
    ///
    /// let scenario = KeywordPattern::new(&["Scenario", "Example"]);
    /// assert_eq!(
    ///     scenario.capture("  Scenario: issue #42  "),
    ///     Some("Scenario: issue #42")
    /// );
    /// assert_eq!(scenario.capture("  Scenario Outline: adds up"), None);
    /// ```
    #[must_use]
    pub fn capture<'a>(&self, line: &'a str) -> Option<&'a str> {
        let trimmed = line.trim_start();
        let matched = self.spellings.iter().any(|keyword| {
            trimmed
                .strip_prefix(keyword)
                .is_some_and(|rest| rest.starts_with(':'))
        });
        if !matched {
            return None;
        }
        Some(trimmed.trim_end())
    }
}

/// Immutable keyword bundle for one Gherkin locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleKeywordSet {
    code: &'static str,
    name: &'static str,
    feature: KeywordPattern,
    scenario: KeywordPattern,
    scenario_outline: KeywordPattern,
    examples: KeywordPattern,
}

impl LocaleKeywordSet {
    /// Locale code as written in a `# language:` declaration.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// Native name of the language.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Spellings of the `Feature` keyword.
    #[must_use]
    pub const fn feature(&self) -> &KeywordPattern {
        &self.feature
    }

    /// Spellings of the `Scenario` keyword.
    #[must_use]
    pub const fn scenario(&self) -> &KeywordPattern {
        &self.scenario
    }

    /// Spellings of the `Scenario Outline` keyword.
    #[must_use]
    pub const fn scenario_outline(&self) -> &KeywordPattern {
        &self.scenario_outline
    }

    /// Spellings of the `Examples` keyword, including `Scenarios` aliases.
    #[must_use]
    pub const fn examples(&self) -> &KeywordPattern {
        &self.examples
    }
}

const EN: LocaleKeywordSet = LocaleKeywordSet {
    code: "en",
    name: "English",
    feature: KeywordPattern::new(&["Feature", "Business Need", "Ability"]),
    scenario: KeywordPattern::new(&["Scenario", "Example"]),
    scenario_outline: KeywordPattern::new(&["Scenario Outline", "Scenario Template"]),
    examples: KeywordPattern::new(&["Examples", "Scenarios"]),
};

const FR: LocaleKeywordSet = LocaleKeywordSet {
    code: "fr",
    name: "français",
    feature: KeywordPattern::new(&["Fonctionnalité"]),
    scenario: KeywordPattern::new(&["Scénario", "Exemple"]),
    scenario_outline: KeywordPattern::new(&["Plan du scénario", "Plan du Scénario"]),
    examples: KeywordPattern::new(&["Exemples"]),
};

const DE: LocaleKeywordSet = LocaleKeywordSet {
    code: "de",
    name: "Deutsch",
    feature: KeywordPattern::new(&["Funktionalität", "Funktion"]),
    scenario: KeywordPattern::new(&["Szenario", "Beispiel"]),
    scenario_outline: KeywordPattern::new(&["Szenariogrundriss", "Szenarien"]),
    examples: KeywordPattern::new(&["Beispiele"]),
};

const ES: LocaleKeywordSet = LocaleKeywordSet {
    code: "es",
    name: "español",
    feature: KeywordPattern::new(&["Característica", "Necesidad del negocio", "Requisito"]),
    scenario: KeywordPattern::new(&["Escenario", "Ejemplo"]),
    scenario_outline: KeywordPattern::new(&["Esquema del escenario"]),
    examples: KeywordPattern::new(&["Ejemplos"]),
};

const PT: LocaleKeywordSet = LocaleKeywordSet {
    code: "pt",
    name: "português",
    feature: KeywordPattern::new(&["Funcionalidade", "Característica", "Caracteristica"]),
    scenario: KeywordPattern::new(&["Cenário", "Cenario", "Exemplo"]),
    scenario_outline: KeywordPattern::new(&[
        "Esquema do Cenário",
        "Esquema do Cenario",
        "Delineação do Cenário",
        "Delineacao do Cenario",
    ]),
    examples: KeywordPattern::new(&["Exemplos", "Cenários", "Cenarios"]),
};

const NL: LocaleKeywordSet = LocaleKeywordSet {
    code: "nl",
    name: "Nederlands",
    feature: KeywordPattern::new(&["Functionaliteit"]),
    scenario: KeywordPattern::new(&["Scenario", "Voorbeeld"]),
    scenario_outline: KeywordPattern::new(&["Abstract Scenario"]),
    examples: KeywordPattern::new(&["Voorbeelden"]),
};

const JA: LocaleKeywordSet = LocaleKeywordSet {
    code: "ja",
    name: "日本語",
    feature: KeywordPattern::new(&["フィーチャ", "機能"]),
    scenario: KeywordPattern::new(&["シナリオ"]),
    scenario_outline: KeywordPattern::new(&[
        "シナリオアウトライン",
        "シナリオテンプレート",
        "テンプレ",
        "シナリオテンプレ",
    ]),
    examples: KeywordPattern::new(&["例", "サンプル"]),
};

/// The default keyword set, used when a file declares no language.
pub static ENGLISH: LocaleKeywordSet = EN;

static LOCALES: [LocaleKeywordSet; 7] = [EN, FR, DE, ES, PT, NL, JA];

#[expect(
    clippy::expect_used,
    reason = "the pattern is a literal covered by unit tests"
)]
static LANGUAGE_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*#\s*language\s*:\s*([A-Za-z]{2,3}(?:[-_][A-Za-z0-9]+)*)\s*$")
        .expect("language declaration regex should compile")
});

/// Return every locale with a built-in keyword table.
#[must_use]
pub fn supported_locales() -> &'static [LocaleKeywordSet] {
    &LOCALES
}

/// Find the keyword set for a locale code.
///
/// Codes compare case-insensitively and treat `_` like `-`. A regional code
/// such as `pt-BR` falls back to its primary language when no exact entry
/// exists.
///
/// # Examples
///
/// ```
/// use cukedex_patterns::lookup;
///
/// assert_eq!(lookup("FR").map(|set| set.code()), Some("fr"));
/// assert_eq!(lookup("pt_BR").map(|set| set.code()), Some("pt"));
/// assert!(lookup("tlh").is_none());
/// ```
#[must_use]
pub fn lookup(code: &str) -> Option<&'static LocaleKeywordSet> {
    let normalised = code.trim().to_ascii_lowercase().replace('_', "-");
    let exact = LOCALES.iter().find(|set| set.code == normalised);
    exact.or_else(|| {
        let (primary, _) = normalised.split_once('-')?;
        LOCALES.iter().find(|set| set.code == primary)
    })
}

/// Extract the locale code from a `# language: xx` comment line.
///
/// # Examples
///
/// ```
/// use cukedex_patterns::declared_language;
///
/// assert_eq!(declared_language("# language: fr"), Some("fr"));
/// assert_eq!(declared_language("Feature: plain"), None);
/// ```
#[must_use]
pub fn declared_language(line: &str) -> Option<&str> {
    LANGUAGE_DECLARATION
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|code| code.as_str())
}

/// Choose the keyword set for a file from its first line.
///
/// Files without a declaration use [`ENGLISH`].
///
/// # Errors
///
/// Returns [`KeywordError::UnknownLocale`] when the first line declares a
/// language with no keyword table.
pub fn select_locale(
    first_line: Option<&str>,
) -> Result<&'static LocaleKeywordSet, KeywordError> {
    let Some(code) = first_line.and_then(declared_language) else {
        return Ok(&ENGLISH);
    };
    lookup(code).ok_or_else(|| KeywordError::UnknownLocale(code.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Feature: billing", Some("Feature: billing"))]
    #[case("  Business Need: billing  ", Some("Business Need: billing"))]
    #[case("Feature:", Some("Feature:"))]
    #[case("Feature billing", None)]
    #[case("# Feature: commented", None)]
    #[case("Feature: C# interop", Some("Feature: C# interop"))]
    #[case("Feature: issue #42 ", Some("Feature: issue #42"))]
    fn captures_feature_headers(#[case] line: &str, #[case] expected: Option<&str>) {
        assert_eq!(ENGLISH.feature().capture(line), expected);
    }

    #[test]
    fn scenario_keyword_does_not_swallow_longer_keywords() {
        assert_eq!(ENGLISH.scenario().capture("Scenario Outline: x"), None);
        assert_eq!(ENGLISH.scenario().capture("Scenarios: x"), None);
        assert_eq!(
            ENGLISH.scenario_outline().capture("Scenario Outline: x"),
            Some("Scenario Outline: x")
        );
        assert_eq!(
            ENGLISH.examples().capture("Scenarios: x"),
            Some("Scenarios: x")
        );
    }

    #[rstest]
    #[case("en", "en")]
    #[case("EN", "en")]
    #[case("en-GB", "en")]
    #[case("de_AT", "de")]
    #[case(" ja ", "ja")]
    fn looks_up_locale_codes(#[case] code: &str, #[case] expected: &str) {
        assert_eq!(lookup(code).map(LocaleKeywordSet::code), Some(expected));
    }

    #[rstest]
    #[case("# language: fr", Some("fr"))]
    #[case("#language:de", Some("de"))]
    #[case("  #  language :  pt-BR  ", Some("pt-BR"))]
    #[case("# lang: fr", None)]
    #[case("Feature: x", None)]
    fn parses_language_declarations(#[case] line: &str, #[case] expected: Option<&str>) {
        assert_eq!(declared_language(line), expected);
    }

    #[test]
    fn select_locale_defaults_to_english() {
        assert_eq!(select_locale(None), Ok(&ENGLISH));
        assert_eq!(select_locale(Some("Feature: x")), Ok(&ENGLISH));
    }

    #[test]
    fn select_locale_reports_unknown_codes() {
        assert_eq!(
            select_locale(Some("# language: xx")),
            Err(KeywordError::UnknownLocale("xx".into()))
        );
    }

    #[test]
    fn locale_codes_are_unique() {
        let mut codes: Vec<_> = supported_locales().iter().map(|set| set.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), supported_locales().len());
    }
}
