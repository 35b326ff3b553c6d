use std::collections::HashSet;

use foodvision_core::{
    normalize_nutrients, Category, NutrientRecord, NutrientUnit, RawNutrient, APPROVED_NUTRIENTS,
};
use pretty_assertions::assert_eq;

fn raw(name: &str, value: f64, unit: &str) -> RawNutrient {
    RawNutrient {
        name: name.to_string(),
        value: Some(value),
        unit_name: unit.to_string(),
    }
}

#[test]
fn keeps_approved_names_and_units_in_source_order() {
    let records = normalize_nutrients(vec![
        raw("Water", 60.0, "G"),
        raw("Protein", 25.1, "G"),
        raw("Energy", 1100.0, "kJ"),
        raw("Energy", 263.0, "KCAL"),
        raw("Sodium, Na", 72.0, "MG"),
        raw("Vitamin C, total ascorbic acid", 1.2, "MG"),
        raw("Total lipid (fat)", 14.0, "G"),
    ]);

    assert_eq!(
        records,
        vec![
            NutrientRecord {
                name: "Protein".to_string(),
                value: 25.1,
                unit: NutrientUnit::G,
            },
            NutrientRecord {
                name: "Energy".to_string(),
                value: 263.0,
                unit: NutrientUnit::Kcal,
            },
            NutrientRecord {
                name: "Sodium, Na".to_string(),
                value: 72.0,
                unit: NutrientUnit::Mg,
            },
            NutrientRecord {
                name: "Total lipid (fat)".to_string(),
                value: 14.0,
                unit: NutrientUnit::G,
            },
        ]
    );
}

#[test]
fn first_occurrence_of_a_name_wins() {
    let records = normalize_nutrients(vec![
        raw("Protein", 10.0, "G"),
        raw("Total Sugars", 3.0, "G"),
        raw("Protein", 99.0, "G"),
    ]);
    let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Protein", "Total Sugars"]);
    assert_eq!(records[0].value, 10.0);
}

#[test]
fn output_is_unique_and_whitelisted() {
    let units = ["G", "MG", "KCAL", "UG", "kJ", "g", "IU"];
    let mut input = Vec::new();
    for (i, name) in APPROVED_NUTRIENTS
        .iter()
        .chain(["Iron, Fe", "Cholesterol"].iter())
        .enumerate()
    {
        for (j, unit) in units.iter().enumerate() {
            input.push(raw(name, (i * 10 + j) as f64, unit));
        }
    }

    let records = normalize_nutrients(input);
    let mut seen = HashSet::new();
    for record in &records {
        assert!(seen.insert(record.name.clone()), "duplicate {}", record.name);
        assert!(APPROVED_NUTRIENTS.contains(&record.name.as_str()));
        assert!(matches!(
            record.unit,
            NutrientUnit::Kcal | NutrientUnit::G | NutrientUnit::Mg
        ));
    }
    assert_eq!(records.len(), APPROVED_NUTRIENTS.len());
}

#[test]
fn entries_without_a_value_are_skipped() {
    let records = normalize_nutrients(vec![
        RawNutrient {
            name: "Protein".to_string(),
            value: None,
            unit_name: "G".to_string(),
        },
        raw("Protein", 4.0, "G"),
    ]);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].value, 4.0);
}

#[test]
fn unit_names_are_case_sensitive() {
    assert_eq!(NutrientUnit::parse("KCAL"), Some(NutrientUnit::Kcal));
    assert_eq!(NutrientUnit::parse("kcal"), None);
    assert_eq!(NutrientUnit::parse("MG").map(NutrientUnit::as_str), Some("MG"));
}

#[test]
fn every_category_has_a_search_phrase() {
    assert_eq!(Category::ALL.len(), 11);
    for (index, category) in Category::ALL.iter().enumerate() {
        assert_eq!(category.index(), index);
        assert_eq!(Category::from_index(index as i64), Some(*category));
        assert!(!category.search_phrase().is_empty());
    }
    assert_eq!(Category::from_index(11), None);
    assert_eq!(Category::from_index(-3), None);
    assert_eq!(Category::Meat.search_phrase(), "grilled chicken breast");
    assert_eq!(Category::NoodlesPasta.to_string(), "Noodles-Pasta");
}
