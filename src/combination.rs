//! Combination generator for tabql
//!
//! Enumerates the Cartesian product of several sets of discrete values. The
//! pivot engine uses it to list every group key across its dimensions.
//!
//! Output order is canonical: each dimension is visited in sorted order and
//! the last dimension varies fastest (odometer order), so the same input
//! always yields the same sequence of combinations.

use std::collections::BTreeSet;

/// Produce the Cartesian product of `dimensions`
///
/// # Arguments
/// * `dimensions` - One set of distinct values per dimension, in dimension order
///
/// # Returns
/// * One tuple per combination, each holding one value per dimension.
///   No dimensions yields a single empty tuple; any empty dimension yields
///   no tuples at all.
pub fn combinations(dimensions: &[BTreeSet<String>]) -> Vec<Vec<String>> {
    let axes: Vec<Vec<&String>> = dimensions.iter().map(|set| set.iter().collect()).collect();

    if axes.iter().any(|axis| axis.is_empty()) {
        return Vec::new();
    }

    let total: usize = axes.iter().map(|axis| axis.len()).product();
    let mut result = Vec::with_capacity(total);

    // One position per dimension, advanced like an odometer
    let mut positions = vec![0usize; axes.len()];

    loop {
        result.push(
            axes.iter()
                .zip(&positions)
                .map(|(axis, &pos)| axis[pos].clone())
                .collect(),
        );

        // Carry from the last dimension towards the first
        let mut dim = axes.len();
        loop {
            if dim == 0 {
                return result;
            }
            dim -= 1;
            positions[dim] += 1;
            if positions[dim] < axes[dim].len() {
                break;
            }
            positions[dim] = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn tuple(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_two_dimensions_cover_cross_product() {
        let result = combinations(&[set(&["b", "a"]), set(&["y", "x"])]);

        assert_eq!(
            result,
            vec![
                tuple(&["a", "x"]),
                tuple(&["a", "y"]),
                tuple(&["b", "x"]),
                tuple(&["b", "y"]),
            ]
        );
    }

    #[test]
    fn test_each_combination_appears_once() {
        let result = combinations(&[set(&["1", "2", "3"]), set(&["M", "F"]), set(&["yes", "no"])]);

        assert_eq!(result.len(), 12);
        let unique: BTreeSet<_> = result.iter().cloned().collect();
        assert_eq!(unique.len(), 12);
    }

    #[test]
    fn test_single_dimension() {
        let result = combinations(&[set(&["3", "1", "2"])]);
        assert_eq!(result, vec![tuple(&["1"]), tuple(&["2"]), tuple(&["3"])]);
    }

    #[test]
    fn test_no_dimensions_yields_one_empty_tuple() {
        assert_eq!(combinations(&[]), vec![Vec::<String>::new()]);
    }

    #[test]
    fn test_empty_dimension_yields_nothing() {
        assert!(combinations(&[set(&["a"]), set(&[])]).is_empty());
    }
}
