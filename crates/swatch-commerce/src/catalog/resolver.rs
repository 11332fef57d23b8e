//! Stock-aware option availability over a [`VariantCatalog`].
//!
//! Every function here is pure: it looks only at the catalog and the ids it
//! is given, never at any live selection state.

use crate::catalog::variant::distinct_by_id;
use crate::catalog::{Color, Combination, Size, VariantCatalog};
use crate::ids::{ColorId, SizeId};
use serde::{Deserialize, Serialize};

/// What the UI should say about the current (color, size) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// At least one axis is not chosen.
    #[default]
    Unselected,
    /// The pair exists and has stock.
    InStock,
    /// The pair exists but its stock is zero ("sold out").
    OutOfStock,
    /// The pair was never part of the catalog ("unavailable").
    NotFound,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Unselected => "unselected",
            StockStatus::InStock => "in_stock",
            StockStatus::OutOfStock => "out_of_stock",
            StockStatus::NotFound => "not_found",
        }
    }

    /// Only an in-stock pair may be added to the cart.
    pub fn can_add_to_cart(&self) -> bool {
        matches!(self, StockStatus::InStock)
    }
}

/// Everything the option pickers need for one partial selection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Availability {
    pub colors: Vec<Color>,
    pub sizes: Vec<Size>,
    pub resolved: Option<Combination>,
    pub status: StockStatus,
}

/// Colors with at least one in-stock combination, restricted to `size` when given.
pub fn available_colors(catalog: &VariantCatalog, size: Option<&SizeId>) -> Vec<Color> {
    distinct_by_id(
        catalog
            .combinations()
            .iter()
            .filter(|c| c.in_stock())
            .filter(|c| size.map_or(true, |s| &c.size.id == s))
            .map(|c| &c.color),
        |c| &c.id,
    )
}

/// Sizes with at least one in-stock combination, restricted to `color` when given.
pub fn available_sizes(catalog: &VariantCatalog, color: Option<&ColorId>) -> Vec<Size> {
    distinct_by_id(
        catalog
            .combinations()
            .iter()
            .filter(|c| c.in_stock())
            .filter(|c| color.map_or(true, |col| &c.color.id == col))
            .map(|c| &c.size),
        |s| &s.id,
    )
}

/// The combination for a complete selection, whatever its stock.
///
/// A zero-stock pair is still returned so callers can report "sold out";
/// `None` means the pair is not in the catalog or the selection is partial.
pub fn resolve<'a>(
    catalog: &'a VariantCatalog,
    color: Option<&ColorId>,
    size: Option<&SizeId>,
) -> Option<&'a Combination> {
    match (color, size) {
        (Some(color), Some(size)) => catalog.find(color, size),
        _ => None,
    }
}

/// Classify a selection against the catalog.
pub fn stock_status(
    catalog: &VariantCatalog,
    color: Option<&ColorId>,
    size: Option<&SizeId>,
) -> StockStatus {
    if color.is_none() || size.is_none() {
        return StockStatus::Unselected;
    }
    match resolve(catalog, color, size) {
        Some(c) if c.in_stock() => StockStatus::InStock,
        Some(_) => StockStatus::OutOfStock,
        None => StockStatus::NotFound,
    }
}

/// Compute all derived picker state in one pass.
pub fn availability(
    catalog: &VariantCatalog,
    color: Option<&ColorId>,
    size: Option<&SizeId>,
) -> Availability {
    Availability {
        colors: available_colors(catalog, size),
        sizes: available_sizes(catalog, color),
        resolved: resolve(catalog, color, size).cloned(),
        status: stock_status(catalog, color, size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::ProductId;

    fn combo(id: &str, color: &str, size: &str, stock: u32) -> Combination {
        Combination::new(id, Color::new(color, color), Size::new(size, size), stock)
    }

    /// [{red,S,0},{red,M,5},{blue,M,3}]
    fn tee_catalog() -> VariantCatalog {
        VariantCatalog::new(
            ProductId::new("tee"),
            vec![
                combo("red-s", "red", "S", 0),
                combo("red-m", "red", "M", 5),
                combo("blue-m", "blue", "M", 3),
            ],
        )
        .unwrap()
    }

    fn color_ids(colors: &[Color]) -> Vec<&str> {
        colors.iter().map(|c| c.id.as_str()).collect()
    }

    fn size_ids(sizes: &[Size]) -> Vec<&str> {
        sizes.iter().map(|s| s.id.as_str()).collect()
    }

    #[test]
    fn test_zero_stock_size_excluded_for_color() {
        let catalog = tee_catalog();
        let red = ColorId::new("red");
        assert_eq!(size_ids(&available_sizes(&catalog, Some(&red))), vec!["M"]);
    }

    #[test]
    fn test_unconstrained_axes_skip_zero_stock_only_options() {
        let catalog = tee_catalog();
        assert_eq!(color_ids(&available_colors(&catalog, None)), vec!["red", "blue"]);
        // S exists only as red/S with zero stock.
        assert_eq!(size_ids(&available_sizes(&catalog, None)), vec!["M"]);
    }

    #[test]
    fn test_colors_filtered_by_size() {
        let catalog = tee_catalog();
        let m = SizeId::new("M");
        let s = SizeId::new("S");
        assert_eq!(color_ids(&available_colors(&catalog, Some(&m))), vec!["red", "blue"]);
        assert!(available_colors(&catalog, Some(&s)).is_empty());
    }

    #[test]
    fn test_resolve_in_stock_pair() {
        let catalog = tee_catalog();
        let resolved = resolve(&catalog, Some(&ColorId::new("red")), Some(&SizeId::new("M")));
        assert_eq!(resolved.map(|c| (c.id.as_str(), c.stock)), Some(("red-m", 5)));
    }

    #[test]
    fn test_zero_stock_pair_still_resolves() {
        let catalog = tee_catalog();
        let red = ColorId::new("red");
        let s = SizeId::new("S");

        assert_eq!(resolve(&catalog, Some(&red), Some(&s)).map(|c| c.stock), Some(0));
        assert_eq!(stock_status(&catalog, Some(&red), Some(&s)), StockStatus::OutOfStock);
    }

    #[test]
    fn test_unknown_pair_is_not_found() {
        let catalog = tee_catalog();
        let blue = ColorId::new("blue");
        let s = SizeId::new("S");

        assert!(resolve(&catalog, Some(&blue), Some(&s)).is_none());
        assert_eq!(stock_status(&catalog, Some(&blue), Some(&s)), StockStatus::NotFound);
    }

    #[test]
    fn test_partial_selection_is_unselected() {
        let catalog = tee_catalog();
        let red = ColorId::new("red");
        assert!(resolve(&catalog, Some(&red), None).is_none());
        assert_eq!(stock_status(&catalog, Some(&red), None), StockStatus::Unselected);
        assert_eq!(stock_status(&catalog, None, None), StockStatus::Unselected);
    }

    #[test]
    fn test_availability_is_deterministic() {
        let catalog = tee_catalog();
        let red = ColorId::new("red");
        let first = availability(&catalog, Some(&red), None);
        let second = availability(&catalog, Some(&red), None);
        assert_eq!(first, second);
    }

    #[test]
    fn test_available_options_always_backed_by_stock() {
        let catalog = VariantCatalog::new(
            ProductId::new("sock"),
            vec![
                combo("a", "green", "S", 0),
                combo("b", "green", "L", 2),
                combo("c", "navy", "S", 0),
                combo("d", "grey", "XL", 1),
                combo("e", "navy", "XL", 0),
            ],
        )
        .unwrap();

        let mut size_filters: Vec<Option<SizeId>> = vec![None];
        size_filters.extend(catalog.sizes().into_iter().map(|s| Some(s.id)));
        for size in &size_filters {
            for color in available_colors(&catalog, size.as_ref()) {
                assert!(catalog.combinations().iter().any(|c| c.color.id == color.id
                    && c.in_stock()
                    && size.as_ref().map_or(true, |s| &c.size.id == s)));
            }
        }

        let mut color_filters: Vec<Option<ColorId>> = vec![None];
        color_filters.extend(catalog.colors().into_iter().map(|c| Some(c.id)));
        for color in &color_filters {
            for size in available_sizes(&catalog, color.as_ref()) {
                assert!(catalog.combinations().iter().any(|c| c.size.id == size.id
                    && c.in_stock()
                    && color.as_ref().map_or(true, |col| &c.color.id == col)));
            }
        }

        assert_eq!(color_ids(&available_colors(&catalog, None)), vec!["green", "grey"]);
    }
}
