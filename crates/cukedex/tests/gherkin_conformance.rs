//! Cross-checks unfiltered trees against the `gherkin` crate's parser.

use cukedex::{Node, NodeKind, TagFilter, normalise_tag, parse_feature_source};
use gherkin::{Feature, GherkinEnv};
use rstest::rstest;

const CHECKOUT: &str = r#"@shop
Feature: checkout
  Shoppers pay for their basket.

  Background:
    Given an open basket

  Scenario: empty basket
    When I check out
    Then I see "nothing to pay"

  @card
  Scenario Outline: pay by card
    When I pay <amount> with "<card>"
    Then the payment is <result>

    Examples: accepted
      | amount | card | result   |
      | 10     | visa | accepted |
      | 20     | amex | accepted |

    @slow
    Examples: declined
      | amount | card    | result   |
      | 99999  | expired | declined |

  Scenario: receipt
    Given a paid order
    Then the receipt reads:
      """
      Scenario: not a header
      @not_a_tag
      """
"#;

const LOCALISED: &str = "# language: fr
Fonctionnalité: panier

  Scénario: ajout
    Soit un panier vide

  Plan du scénario: remise
    Soit un code <code>

    Exemples:
      | code |
      | A    |
      | B    |
";

const TEMPLATED: &str = "Feature: tracker
  Scenario: issue #42
    Given an open issue

  Scenario: issue #43 reopens
    Given a closed issue <id>

    Examples:
      | id |
      | 1  |
      | 2  |
";

#[expect(clippy::expect_used, reason = "fixtures are valid Gherkin")]
fn reference(text: &str) -> Feature {
    Feature::parse(text, GherkinEnv::default()).expect("gherkin parses fixture")
}

#[expect(clippy::expect_used, reason = "fixtures are valid Gherkin")]
fn ours(text: &str) -> Node {
    parse_feature_source(text, None, &TagFilter::unfiltered()).expect("cukedex parses fixture")
}

fn row_count(node: &Node) -> usize {
    node.children()
        .iter()
        .filter(|child| child.kind() == NodeKind::Examples)
        .map(|examples| examples.children().len())
        .sum()
}

#[rstest]
#[case::english(CHECKOUT)]
#[case::french(LOCALISED)]
#[case::templated_scenario(TEMPLATED)]
fn scenario_and_row_counts_agree(#[case] text: &str) {
    let expected = reference(text);
    let actual = ours(text);

    assert_eq!(actual.children().len(), expected.scenarios.len());
    for (node, scenario) in actual.children().iter().zip(&expected.scenarios) {
        assert!(
            node.display_text().ends_with(scenario.name.as_str()),
            "{} should name {}",
            node.display_text(),
            scenario.name
        );
        let expected_rows: usize = scenario
            .examples
            .iter()
            .filter_map(|examples| examples.table.as_ref())
            .map(|table| table.rows.len())
            .sum();
        assert_eq!(row_count(node), expected_rows);
        let outline = !scenario.examples.is_empty();
        assert_eq!(node.kind() == NodeKind::ScenarioOutline, outline);
    }
}

#[test]
fn tags_agree_with_reference() {
    let expected = reference(CHECKOUT);
    let actual = ours(CHECKOUT);
    for tag in &expected.tags {
        assert!(actual.tags().contains(&normalise_tag(tag)));
    }
    let Some(outline) = actual.find_child(NodeKind::ScenarioOutline) else {
        panic!("outline should be present");
    };
    let Some(reference_outline) = expected
        .scenarios
        .iter()
        .find(|scenario| !scenario.examples.is_empty())
    else {
        panic!("reference outline should be present");
    };
    let pairs = outline.children().iter().zip(&reference_outline.examples);
    for (examples, reference_examples) in pairs {
        for tag in &reference_examples.tags {
            assert!(examples.tags().contains(&normalise_tag(tag)));
        }
    }
}
