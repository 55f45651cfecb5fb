use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;
use thiserror::Error;

use crate::quiz::{Scenario, TriageCategory};

/// Number of answer options every scenario must offer.
pub const OPTIONS_PER_SCENARIO: usize = 3;

const BUILTIN_SCENARIOS: &str = include_str!("../../data/scenarios.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read scenario catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("scenario catalog is empty")]
    Empty,

    #[error("scenario id {0} appears more than once")]
    DuplicateScenarioId(u32),

    #[error("scenario {scenario_id} has {count} options, expected 3")]
    WrongOptionCount { scenario_id: u32, count: usize },

    #[error("scenario {scenario_id} lists option '{option}' more than once")]
    DuplicateOption {
        scenario_id: u32,
        option: TriageCategory,
    },

    #[error("scenario {scenario_id} has {count} correct options, expected exactly one")]
    CorrectOptionCount { scenario_id: u32, count: usize },
}

/// Ordered, immutable list of scenarios in presentation order.
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    scenarios: Vec<Scenario>,
}

impl Catalog {
    /// The four scenarios bundled with the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_SCENARIOS)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        debug!("Loading scenario catalog from {}", path.display());
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, CatalogError> {
        let scenarios: Vec<Scenario> = serde_json::from_reader(reader)?;
        Self::new(scenarios)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let scenarios: Vec<Scenario> = serde_json::from_str(json)?;
        Self::new(scenarios)
    }

    /// Validates the scenarios; a catalog that comes out of here is always playable.
    pub fn new(scenarios: Vec<Scenario>) -> Result<Self, CatalogError> {
        if scenarios.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen_ids = HashSet::new();
        for scenario in &scenarios {
            if !seen_ids.insert(scenario.id) {
                return Err(CatalogError::DuplicateScenarioId(scenario.id));
            }
            validate_options(scenario)?;
        }

        debug!("Scenario catalog holds {} scenarios", scenarios.len());
        Ok(Self { scenarios })
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn get(&self, index: usize) -> Option<&Scenario> {
        self.scenarios.get(index)
    }

    pub fn find(&self, scenario_id: u32) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == scenario_id)
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }
}

fn validate_options(scenario: &Scenario) -> Result<(), CatalogError> {
    let count = scenario.options.len();
    if count != OPTIONS_PER_SCENARIO {
        return Err(CatalogError::WrongOptionCount {
            scenario_id: scenario.id,
            count,
        });
    }

    let mut seen = HashSet::new();
    for option in &scenario.options {
        if !seen.insert(option.id) {
            return Err(CatalogError::DuplicateOption {
                scenario_id: scenario.id,
                option: option.id,
            });
        }
    }

    let correct = scenario.options.iter().filter(|o| o.is_correct).count();
    if correct != 1 {
        return Err(CatalogError::CorrectOptionCount {
            scenario_id: scenario.id,
            count: correct,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_json(id: u32, options: &str) -> String {
        format!(
            r#"{{
                "id": {id},
                "description": "test patient",
                "vitals": {{ "hr": 80, "bp": "120/80", "o2": "98%", "resp": 14, "temp": 36.6 }},
                "options": [{options}],
                "explanation": "because"
            }}"#
        )
    }

    const GOOD_OPTIONS: &str = r#"
        { "id": "red", "text": "RED", "correct": false },
        { "id": "yellow", "text": "YELLOW", "correct": true },
        { "id": "green", "text": "GREEN", "correct": false }"#;

    #[test]
    fn builtin_catalog_has_four_scenarios_in_order() {
        let catalog = Catalog::builtin().unwrap();
        let ids: Vec<u32> = catalog.scenarios().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn builtin_scenarios_have_exactly_one_correct_option() {
        let catalog = Catalog::builtin().unwrap();
        for scenario in catalog.scenarios() {
            assert_eq!(
                scenario.options.iter().filter(|o| o.is_correct).count(),
                1,
                "scenario {}",
                scenario.id
            );
        }
    }

    #[test]
    fn builtin_answer_key_matches_presentations() {
        let catalog = Catalog::builtin().unwrap();
        let key: Vec<TriageCategory> = catalog
            .scenarios()
            .iter()
            .map(|s| s.correct_option().unwrap().id)
            .collect();
        assert_eq!(
            key,
            vec![
                TriageCategory::Red,
                TriageCategory::Green,
                TriageCategory::Red,
                TriageCategory::Red
            ]
        );
        let stroke = catalog.find(4).unwrap();
        assert_eq!(stroke.vitals.blood_pressure, "178/100");
        assert_eq!(stroke.vitals.heart_rate, 92);
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(matches!(Catalog::from_json("[]"), Err(CatalogError::Empty)));
    }

    #[test]
    fn duplicate_scenario_ids_are_rejected() {
        let json = format!(
            "[{}, {}]",
            scenario_json(7, GOOD_OPTIONS),
            scenario_json(7, GOOD_OPTIONS)
        );
        assert!(matches!(
            Catalog::from_json(&json),
            Err(CatalogError::DuplicateScenarioId(7))
        ));
    }

    #[test]
    fn scenario_without_correct_option_is_rejected() {
        let options = r#"
            { "id": "red", "text": "RED", "correct": false },
            { "id": "yellow", "text": "YELLOW", "correct": false },
            { "id": "green", "text": "GREEN", "correct": false }"#;
        let json = format!("[{}]", scenario_json(1, options));
        assert!(matches!(
            Catalog::from_json(&json),
            Err(CatalogError::CorrectOptionCount {
                scenario_id: 1,
                count: 0
            })
        ));
    }

    #[test]
    fn scenario_with_two_correct_options_is_rejected() {
        let options = r#"
            { "id": "red", "text": "RED", "correct": true },
            { "id": "yellow", "text": "YELLOW", "correct": true },
            { "id": "green", "text": "GREEN", "correct": false }"#;
        let json = format!("[{}]", scenario_json(2, options));
        assert!(matches!(
            Catalog::from_json(&json),
            Err(CatalogError::CorrectOptionCount {
                scenario_id: 2,
                count: 2
            })
        ));
    }

    #[test]
    fn wrong_option_count_is_rejected() {
        let options = r#"
            { "id": "red", "text": "RED", "correct": true },
            { "id": "green", "text": "GREEN", "correct": false }"#;
        let json = format!("[{}]", scenario_json(3, options));
        assert!(matches!(
            Catalog::from_json(&json),
            Err(CatalogError::WrongOptionCount {
                scenario_id: 3,
                count: 2
            })
        ));
    }

    #[test]
    fn repeated_option_id_is_rejected() {
        let options = r#"
            { "id": "red", "text": "RED", "correct": true },
            { "id": "red", "text": "RED again", "correct": false },
            { "id": "green", "text": "GREEN", "correct": false }"#;
        let json = format!("[{}]", scenario_json(5, options));
        assert!(matches!(
            Catalog::from_json(&json),
            Err(CatalogError::DuplicateOption {
                scenario_id: 5,
                option: TriageCategory::Red
            })
        ));
    }

    #[test]
    fn unknown_category_in_json_is_a_parse_error() {
        let options = r#"
            { "id": "red", "text": "RED", "correct": true },
            { "id": "blue", "text": "BLUE", "correct": false },
            { "id": "green", "text": "GREEN", "correct": false }"#;
        let json = format!("[{}]", scenario_json(1, options));
        assert!(matches!(
            Catalog::from_json(&json),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn reader_and_missing_file() {
        let json = format!("[{}]", scenario_json(9, GOOD_OPTIONS));
        let catalog = Catalog::from_reader(json.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).unwrap().id, 9);
        assert!(catalog.get(1).is_none());

        assert!(matches!(
            Catalog::load("/nonexistent/scenarios.json"),
            Err(CatalogError::Io(_))
        ));
    }
}
