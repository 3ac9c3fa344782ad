//! Range expansion.
//!
//! Turns a range expression such as `A1:B3` into the individual cell ids it
//! covers, row-major. Endpoints are normalised per axis, so `B3:A1` covers
//! the same cells in the same order as `A1:B3`.

use regex::Regex;
use std::sync::OnceLock;

use super::cell_ref::CellRef;

const MAX_RANGE_CELLS: usize = 1_000_000;

fn range_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Z]+[0-9]+):([A-Z]+[0-9]+)$").expect("range regex must compile")
    })
}

/// Parse `"<col><row>:<col><row>"` into its top-left and bottom-right corners.
pub fn parse_range(expr: &str) -> Option<(CellRef, CellRef)> {
    let caps = range_re().captures(expr)?;
    let a = CellRef::parse(&caps[1]).ok()?;
    let b = CellRef::parse(&caps[2]).ok()?;
    Some((
        CellRef::new(a.col.min(b.col), a.row.min(b.row)),
        CellRef::new(a.col.max(b.col), a.row.max(b.row)),
    ))
}

/// Iterate the cells of a normalised range, rows outer and columns inner.
pub fn range_cells(top_left: CellRef, bottom_right: CellRef) -> impl Iterator<Item = CellRef> {
    (top_left.row..=bottom_right.row).flat_map(move |row| {
        (top_left.col..=bottom_right.col).map(move |col| CellRef::new(col, row))
    })
}

/// Expand a range expression into ordered cell ids.
///
/// Anything that is not a range (or a range too large to materialise) comes
/// back unchanged as a one-element list, to be treated as a bare reference.
pub fn expand_range(expr: &str) -> Vec<String> {
    let Some((top_left, bottom_right)) = parse_range(expr) else {
        return vec![expr.to_string()];
    };

    let rows = bottom_right.row - top_left.row + 1;
    let cols = bottom_right.col - top_left.col + 1;
    match rows.checked_mul(cols) {
        Some(count) if count <= MAX_RANGE_CELLS => range_cells(top_left, bottom_right)
            .map(|cell| cell.to_string())
            .collect(),
        _ => {
            tracing::debug!(range = expr, "range too large to expand");
            vec![expr.to_string()]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_expand_is_row_major() {
        assert_eq!(
            expand_range("A1:B3"),
            vec!["A1", "B1", "A2", "B2", "A3", "B3"]
        );
    }

    #[test]
    fn test_reversed_endpoints_expand_identically() {
        assert_eq!(expand_range("B3:A1"), expand_range("A1:B3"));
        // Mixed orientation: column reversed, rows ascending.
        assert_eq!(expand_range("B1:A2"), vec!["A1", "B1", "A2", "B2"]);
    }

    #[test]
    fn test_expand_crosses_letter_boundary() {
        assert_eq!(expand_range("Y1:AB1"), vec!["Y1", "Z1", "AA1", "AB1"]);
    }

    #[test]
    fn test_non_range_is_returned_unchanged() {
        assert_eq!(expand_range("A1"), vec!["A1"]);
        assert_eq!(expand_range("a1:b2"), vec!["a1:b2"]);
        assert_eq!(expand_range("A1:B"), vec!["A1:B"]);
        assert_eq!(expand_range("A0:B2"), vec!["A0:B2"]);
    }

    #[test]
    fn test_oversized_range_is_not_materialised() {
        assert_eq!(expand_range("A1:ZZ999999"), vec!["A1:ZZ999999"]);
    }

    proptest! {
        #[test]
        fn endpoint_order_does_not_matter(
            c1 in 0usize..60, r1 in 0usize..60, c2 in 0usize..60, r2 in 0usize..60
        ) {
            let a = CellRef::new(c1, r1).to_string();
            let b = CellRef::new(c2, r2).to_string();
            let forward = expand_range(&format!("{a}:{b}"));
            let backward = expand_range(&format!("{b}:{a}"));
            prop_assert_eq!(&forward, &backward);
            prop_assert_eq!(forward.len(), (c1.abs_diff(c2) + 1) * (r1.abs_diff(r2) + 1));
        }
    }
}
