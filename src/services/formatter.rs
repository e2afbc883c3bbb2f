use crate::errors::FormatError;
use crate::models::{FormattedNutrition, NutritionText};

/// Splits nutrition prose into a title and comma-separated items.
///
/// The title is everything before the first ':'; the rest is split on ','.
/// Values with commas of their own ("1,200 mg") come apart into several
/// items, and empty items are kept.
pub fn format(text: &NutritionText) -> Result<FormattedNutrition, FormatError> {
    let (title, remainder) = text
        .as_str()
        .split_once(':')
        .ok_or(FormatError::MissingSeparator)?;

    let items = remainder
        .split(',')
        .map(|item| item.trim().to_string())
        .collect();

    Ok(FormattedNutrition {
        title: title.trim().to_string(),
        items,
    })
}
