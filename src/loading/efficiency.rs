//! Utility-per-weight ranking.

use crate::model::Item;

/// Items ordered by utility per unit of weight, best first.
///
/// The sort is stable, so equally efficient items keep their input order.
/// Zero-weight items rank first with infinite efficiency.
///
/// # Examples
///
/// ```
/// use u_knapsack::loading::efficiency_ranking;
/// use u_knapsack::model::Item;
///
/// let ranking = efficiency_ranking(&[
///     Item::new("heavy", 10, 5.0, 1),
///     Item::new("light", 2, 4.0, 1),
/// ]);
/// assert_eq!(ranking[0].0, "light");
/// ```
pub fn efficiency_ranking(items: &[Item]) -> Vec<(String, f64)> {
    let mut ranking: Vec<(String, f64)> = items
        .iter()
        .map(|item| (item.name.clone(), item.density()))
        .collect();
    ranking.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranking
}
