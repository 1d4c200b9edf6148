//! Built-in dialect definitions.

use std::collections::BTreeMap;

use super::Dialect;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// The built-in dialects, keyed by language tag.
pub(super) fn dialects() -> BTreeMap<String, Dialect> {
    let mut map = BTreeMap::new();

    map.insert(
        "en".to_string(),
        Dialect {
            name: "English".to_string(),
            feature: strings(&["Feature"]),
            background: strings(&["Background"]),
            scenario: strings(&["Scenario"]),
            scenario_outline: strings(&["Scenario Outline", "Scenario Template"]),
            examples: strings(&["Examples", "Scenarios"]),
            given: strings(&["Given "]),
            when_: strings(&["When "]),
            then: strings(&["Then "]),
            and: strings(&["And ", "* "]),
            but: strings(&["But "]),
        },
    );

    map.insert(
        "fr".to_string(),
        Dialect {
            name: "français".to_string(),
            feature: strings(&["Fonctionnalité"]),
            background: strings(&["Contexte"]),
            scenario: strings(&["Scénario"]),
            scenario_outline: strings(&["Plan du scénario", "Plan du Scénario"]),
            examples: strings(&["Exemples"]),
            given: strings(&["Soit ", "Étant donné ", "Etant donné "]),
            when_: strings(&["Quand ", "Lorsque ", "Lorsqu'"]),
            then: strings(&["Alors "]),
            and: strings(&["Et ", "* "]),
            but: strings(&["Mais "]),
        },
    );

    map.insert(
        "de".to_string(),
        Dialect {
            name: "Deutsch".to_string(),
            feature: strings(&["Funktionalität"]),
            background: strings(&["Grundlage"]),
            scenario: strings(&["Szenario"]),
            scenario_outline: strings(&["Szenariogrundriss"]),
            examples: strings(&["Beispiele"]),
            given: strings(&["Angenommen ", "Gegeben sei "]),
            when_: strings(&["Wenn "]),
            then: strings(&["Dann "]),
            and: strings(&["Und ", "* "]),
            but: strings(&["Aber "]),
        },
    );

    map.insert(
        "es".to_string(),
        Dialect {
            name: "español".to_string(),
            feature: strings(&["Característica"]),
            background: strings(&["Antecedentes"]),
            scenario: strings(&["Escenario"]),
            scenario_outline: strings(&["Esquema del escenario"]),
            examples: strings(&["Ejemplos"]),
            given: strings(&["Dado ", "Dada ", "Dados "]),
            when_: strings(&["Cuando "]),
            then: strings(&["Entonces "]),
            and: strings(&["Y ", "* "]),
            but: strings(&["Pero "]),
        },
    );

    map.insert(
        "nl".to_string(),
        Dialect {
            name: "Nederlands".to_string(),
            feature: strings(&["Functionaliteit"]),
            background: strings(&["Achtergrond"]),
            scenario: strings(&["Scenario"]),
            scenario_outline: strings(&["Abstract Scenario"]),
            examples: strings(&["Voorbeelden"]),
            given: strings(&["Gegeven ", "Stel "]),
            when_: strings(&["Als "]),
            then: strings(&["Dan "]),
            and: strings(&["En ", "* "]),
            but: strings(&["Maar "]),
        },
    );

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_dialect_has_all_keyword_kinds() {
        for (tag, dialect) in dialects() {
            assert!(!dialect.feature.is_empty(), "{tag}: feature");
            assert!(!dialect.background.is_empty(), "{tag}: background");
            assert!(!dialect.scenario.is_empty(), "{tag}: scenario");
            assert!(!dialect.scenario_outline.is_empty(), "{tag}: scenario outline");
            assert!(!dialect.examples.is_empty(), "{tag}: examples");
            assert!(dialect.step_keywords().count() >= 5, "{tag}: steps");
        }
    }

    #[test]
    fn test_step_keywords_end_with_separator() {
        // Prefix matching relies on the stored keyword including its
        // trailing space (or apostrophe, e.g. "Lorsqu'").
        for (tag, dialect) in dialects() {
            for keyword in dialect.step_keywords() {
                let last = keyword.chars().last().unwrap();
                assert!(
                    last == ' ' || last == '\'',
                    "{tag}: step keyword {keyword:?} has no separator"
                );
            }
        }
    }
}
