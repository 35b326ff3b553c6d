use std::collections::HashSet;
use std::fmt;

/// Nutrient names kept from the enrichment service, in display priority.
pub const APPROVED_NUTRIENTS: [&str; 7] = [
    "Energy",
    "Protein",
    "Total lipid (fat)",
    "Carbohydrate, by difference",
    "Total Sugars",
    "Fiber, total dietary",
    "Sodium, Na",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NutrientUnit {
    Kcal,
    G,
    Mg,
}

impl NutrientUnit {
    /// Parse the service's `unitName`. Only the exact upper-case spellings count.
    pub fn parse(unit_name: &str) -> Option<Self> {
        match unit_name {
            "KCAL" => Some(NutrientUnit::Kcal),
            "G" => Some(NutrientUnit::G),
            "MG" => Some(NutrientUnit::Mg),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NutrientUnit::Kcal => "KCAL",
            NutrientUnit::G => "G",
            NutrientUnit::Mg => "MG",
        }
    }
}

impl fmt::Display for NutrientUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry as returned by the enrichment service, before filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct RawNutrient {
    pub name: String,
    pub value: Option<f64>,
    pub unit_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NutrientRecord {
    pub name: String,
    pub value: f64,
    pub unit: NutrientUnit,
}

/// Filter raw entries to approved names, then to allowed units, then drop
/// repeated names (first occurrence wins). Source order is preserved and
/// entries without a value are skipped.
pub fn normalize_nutrients<I>(raw: I) -> Vec<NutrientRecord>
where
    I: IntoIterator<Item = RawNutrient>,
{
    let mut seen = HashSet::new();
    raw.into_iter()
        .filter(|entry| APPROVED_NUTRIENTS.contains(&entry.name.as_str()))
        .filter_map(|entry| {
            let unit = NutrientUnit::parse(&entry.unit_name)?;
            let value = entry.value?;
            Some(NutrientRecord {
                name: entry.name,
                value,
                unit,
            })
        })
        .filter(|record| seen.insert(record.name.clone()))
        .collect()
}
