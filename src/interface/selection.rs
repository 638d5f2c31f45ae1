use strsim::jaro_winkler;

use crate::error::{FeedError, Result};
use crate::models::NormalizedItem;

/// Minimum Jaro-Winkler similarity for a name to count as a match.
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.85;

/// Parse a list of display numbers such as `"1,3,5"` or `"1 3 5"`.
///
/// Numbers are 1-based and come back as 0-based indices, deduplicated in
/// entry order. Empty input selects every item.
pub fn parse_selection(input: &str, max: usize) -> Result<Vec<usize>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok((0..max).collect());
    }

    let mut indices = Vec::new();
    for token in input.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }
        let number: usize = token.parse().map_err(|_| {
            FeedError::InvalidInput(format!(
                "'{}' is not a number; enter numbers separated by commas or spaces",
                token
            ))
        })?;
        push_unique(&mut indices, number_to_index(number, max)?);
    }
    Ok(indices)
}

/// Resolve a selection given by display numbers, item names, or a mix.
///
/// Names are separated by commas, since they may contain spaces.
pub fn select_items(input: &str, items: &[NormalizedItem]) -> Result<Vec<usize>> {
    if let Ok(indices) = parse_selection(input, items.len()) {
        return Ok(indices);
    }

    let mut indices = Vec::new();
    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let index = match token.parse::<usize>() {
            Ok(number) => number_to_index(number, items.len())?,
            Err(_) => resolve_name(token, items)?,
        };
        push_unique(&mut indices, index);
    }
    Ok(indices)
}

/// Find an item by name: exact (case-insensitive) first, then the closest
/// fuzzy match above [`FUZZY_MATCH_THRESHOLD`].
pub fn resolve_name(name: &str, items: &[NormalizedItem]) -> Result<usize> {
    let wanted = name.trim().to_lowercase();
    if let Some(index) = items.iter().position(|i| i.key() == wanted) {
        return Ok(index);
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| (index, jaro_winkler(&item.key(), &wanted)))
        .filter(|(_, score)| *score >= FUZZY_MATCH_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(index, _)| index)
        .ok_or_else(|| FeedError::ItemNotFound(name.trim().to_string()))
}

fn number_to_index(number: usize, max: usize) -> Result<usize> {
    if number == 0 || number > max {
        return Err(FeedError::InvalidInput(format!(
            "please enter numbers between 1 and {}",
            max
        )));
    }
    Ok(number - 1)
}

fn push_unique(indices: &mut Vec<usize>, index: usize) {
    if !indices.contains(&index) {
        indices.push(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CarbSource, ItemKind};

    fn items() -> Vec<NormalizedItem> {
        ["Salmon Pate", "Chicken Stew", "Tuna Flakes"]
            .into_iter()
            .map(|name| {
                let source = CarbSource::Labeled;
                NormalizedItem::from_dry_matter(name, ItemKind::Food, 30.0, 60.0, 40.0, 1.0, source)
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_commas_and_spaces() {
        assert_eq!(parse_selection("1,3", 3).unwrap(), vec![0, 2]);
        assert_eq!(parse_selection("1 3", 3).unwrap(), vec![0, 2]);
        assert_eq!(parse_selection(" 3, 1 ", 3).unwrap(), vec![2, 0]);
    }

    #[test]
    fn test_empty_selects_all() {
        assert_eq!(parse_selection("", 3).unwrap(), vec![0, 1, 2]);
        assert_eq!(parse_selection("   ", 2).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_duplicates_collapsed() {
        assert_eq!(parse_selection("2,2,1", 3).unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(parse_selection("0", 3), Err(FeedError::InvalidInput(_))));
        assert!(matches!(parse_selection("4", 3), Err(FeedError::InvalidInput(_))));
    }

    #[test]
    fn test_not_a_number() {
        assert!(matches!(parse_selection("1,x", 3), Err(FeedError::InvalidInput(_))));
    }

    #[test]
    fn test_select_by_name() {
        let items = items();
        assert_eq!(select_items("tuna flakes, 1", &items).unwrap(), vec![2, 0]);
        assert_eq!(select_items("Chicken Stew", &items).unwrap(), vec![1]);
    }

    #[test]
    fn test_fuzzy_name() {
        let items = items();
        assert_eq!(resolve_name("salmon pat", &items).unwrap(), 0);
        assert_eq!(resolve_name("chiken stew", &items).unwrap(), 1);
    }

    #[test]
    fn test_unknown_name() {
        let items = items();
        assert!(matches!(
            resolve_name("beef jerky", &items),
            Err(FeedError::ItemNotFound(_))
        ));
    }
}
