//! Location notation, the inverse of [`crate::reader::location::parse_location`].
use flatseq_core::location::{CompoundLocation, DEFAULT_UNKNOWN_GAP_LENGTH, JoinKind, Location, Locus};

fn position(position: Option<i64>) -> String {
    position.map(|p| p.to_string()).unwrap_or_default()
}

fn render_segment(location: &Location, left_partial: bool, right_partial: bool) -> String {
    let left = if left_partial { "<" } else { "" };
    let right = if right_partial { ">" } else { "" };

    let body = match location {
        Location::Gap {
            unknown_length: true,
            ..
        } => return format!("gap(unk{})", DEFAULT_UNKNOWN_GAP_LENGTH),
        Location::Gap { length, .. } => return format!("gap({})", length),
        Location::Base { position: p, .. } => {
            let marker = if left_partial { left } else { right };
            format!("{}{}", marker, position(*p))
        }
        Location::Range { begin, end, .. } => {
            format!("{}{}..{}{}", left, position(*begin), right, position(*end))
        }
        Location::Between { begin, end, .. } => format!("{}^{}", position(*begin), position(*end)),
    };

    let body = match location.locus() {
        Some(Locus::Remote {
            accession,
            version: Some(version),
        }) => format!("{}.{}:{}", accession, version, body),
        Some(Locus::Remote { accession, .. }) => format!("{}:{}", accession, body),
        _ => body,
    };

    if location.is_complement() {
        format!("complement({})", body)
    } else {
        body
    }
}

/// A single segment, without partial markers.
pub fn render_location(location: &Location) -> String {
    render_segment(location, false, false)
}

///
/// Render a compound location: one segment bare, several wrapped in
/// `join(...)` / `order(...)`, the whole wrapped in `complement(...)` when
/// the compound is complemented. Partial markers go on the begin of the first
/// and the end of the last segment.
///
pub fn render_compound_location(compound: &CompoundLocation) -> String {
    let locations = compound.locations();
    let last = locations.len().saturating_sub(1);
    let segments: Vec<String> = locations
        .iter()
        .enumerate()
        .map(|(index, location)| {
            render_segment(
                location,
                index == 0 && compound.left_partial,
                index == last && compound.right_partial,
            )
        })
        .collect();

    let body = match (segments.len(), compound.join_kind) {
        (0, _) => return String::new(),
        (1, JoinKind::Join) => segments.join(""),
        (_, JoinKind::Join) => format!("join({})", segments.join(",")),
        (_, JoinKind::Order) => format!("order({})", segments.join(",")),
    };

    if compound.complement {
        format!("complement({})", body)
    } else {
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::reader::location::parse_location;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Location::range(1, 10), "1..10")]
    #[case(Location::base(7), "7")]
    #[case(Location::between(5, 6), "5^6")]
    #[case(Location::gap(24), "gap(24)")]
    #[case(Location::unknown_gap(), "gap(unk100)")]
    #[case(Location::range(3, 9).complemented(), "complement(3..9)")]
    #[case(
        Location::range(1, 500).with_locus(Locus::remote("AC000001", Some(2))),
        "AC000001.2:1..500"
    )]
    #[case(
        Location::range(1, 500).with_locus(Locus::remote("AC000001", None)).complemented(),
        "complement(AC000001:1..500)"
    )]
    fn test_render_location(#[case] location: Location, #[case] expected: &str) {
        assert_eq!(render_location(&location), expected);
    }

    #[rstest]
    #[case("1..10")]
    #[case("<1..>10")]
    #[case("complement(join(<1..35,101..>135))")]
    #[case("join(complement(1..35),complement(101..135))")]
    #[case("order(1..35,101^102,200)")]
    #[case("order(1..35)")]
    #[case("join(AC000001.1:1..100,gap(24),complement(AC000002.3:51..150),gap(unk100))")]
    #[case("complement(<5)")]
    #[case(">5")]
    fn test_parse_render_inverse(#[case] text: &str) {
        let parsed = parse_location(text).unwrap();
        assert_eq!(render_compound_location(&parsed), text);
    }

    #[rstest]
    fn test_empty_compound() {
        assert_eq!(render_compound_location(&CompoundLocation::default()), "");
    }
}
