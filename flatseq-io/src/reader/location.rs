//! Parser for INSDC feature-location notation: `join(1..10,complement(<20..>30))`,
//! `order(...)`, `AB000001.1:5..50`, `10^11`, `gap(24)`, `gap(unk100)`.
use flatseq_core::location::{CompoundLocation, JoinKind, Location, Locus};
use flatseq_core::{LocationError, LocationResult};

/// One parsed segment plus the partial markers seen on its ends.
struct Segment {
    location: Location,
    left_partial: bool,
    right_partial: bool,
}

struct LocationParser<'a> {
    original: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> LocationParser<'a> {
    fn new(original: &'a str) -> Self {
        LocationParser {
            original,
            chars: original.chars().filter(|c| !c.is_whitespace()).collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn lookahead(&self, token: &str) -> bool {
        let mut index = self.pos;
        for expected in token.chars() {
            match self.chars.get(index) {
                Some(c) if c.eq_ignore_ascii_case(&expected) => index += 1,
                _ => return false,
            }
        }
        true
    }

    fn eat(&mut self, token: &str) -> bool {
        if self.lookahead(token) {
            self.pos += token.chars().count();
            true
        } else {
            false
        }
    }

    fn unexpected(&self) -> LocationError {
        match self.peek() {
            Some(found) => LocationError::UnexpectedCharacter {
                found,
                offset: self.pos,
                location: self.original.to_string(),
            },
            None => LocationError::UnexpectedEnd(self.original.to_string()),
        }
    }

    fn expect(&mut self, token: char) -> LocationResult<()> {
        if self.peek() == Some(token) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn number(&mut self) -> LocationResult<i64> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.unexpected());
        }
        let digits: String = self.chars[start..self.pos].iter().collect();
        digits
            .parse()
            .map_err(|_| LocationError::InvalidPosition(digits))
    }

    fn misplaced(&self) -> LocationError {
        LocationError::MisplacedPartial(self.original.to_string())
    }

    fn at_join(&self) -> bool {
        self.lookahead("join(") || self.lookahead("order(")
    }

    fn parse(mut self) -> LocationResult<CompoundLocation> {
        if self.chars.is_empty() {
            return Err(LocationError::Empty);
        }

        let complemented_join =
            self.lookahead("complement(join(") || self.lookahead("complement(order(");
        if complemented_join {
            self.eat("complement(");
        }

        let (join_kind, segments) = if self.at_join() {
            self.parse_join()?
        } else {
            (JoinKind::Join, vec![self.parse_element()?])
        };

        if complemented_join {
            self.expect(')')?;
        }
        if self.pos != self.chars.len() {
            return Err(self.unexpected());
        }

        let mut compound = CompoundLocation::new(join_kind);
        compound.complement = complemented_join;
        let last = segments.len() - 1;
        for (index, segment) in segments.into_iter().enumerate() {
            if (segment.left_partial && index != 0) || (segment.right_partial && index != last) {
                return Err(self.misplaced());
            }
            compound.left_partial |= segment.left_partial;
            compound.right_partial |= segment.right_partial;
            compound.add_location(segment.location);
        }
        Ok(compound)
    }

    fn parse_join(&mut self) -> LocationResult<(JoinKind, Vec<Segment>)> {
        let join_kind = if self.eat("join(") {
            JoinKind::Join
        } else if self.eat("order(") {
            JoinKind::Order
        } else {
            return Err(self.unexpected());
        };

        let mut segments = vec![self.parse_element()?];
        while self.peek() == Some(',') {
            self.pos += 1;
            segments.push(self.parse_element()?);
        }
        self.expect(')')?;
        Ok((join_kind, segments))
    }

    fn parse_element(&mut self) -> LocationResult<Segment> {
        if self.eat("complement(") {
            let mut segment = self.parse_element()?;
            self.expect(')')?;
            let complement = !segment.location.is_complement();
            segment.location.set_complement(complement);
            return Ok(segment);
        }
        if self.at_join() {
            return Err(LocationError::NestedJoin(self.original.to_string()));
        }
        if self.eat("gap(") {
            return self.parse_gap();
        }

        let locus = self.parse_locus()?;

        let left = self.eat("<");
        let right_on_begin = !left && self.eat(">");
        let begin = self.number()?;

        let (location, right) = if self.eat("..") {
            if right_on_begin || self.lookahead("<") {
                return Err(self.misplaced());
            }
            let right = self.eat(">");
            let end = self.number()?;
            (Location::range(begin, end), right)
        } else if self.eat("^") {
            if left || right_on_begin {
                return Err(self.misplaced());
            }
            let end = self.number()?;
            (Location::between(begin, end), false)
        } else {
            (Location::base(begin), right_on_begin)
        };

        Ok(Segment {
            location: location.with_locus(locus),
            left_partial: left,
            right_partial: right,
        })
    }

    fn parse_gap(&mut self) -> LocationResult<Segment> {
        let location = if self.eat("unk") {
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.number()?;
            }
            Location::unknown_gap()
        } else if self.peek() == Some(')') {
            Location::unknown_gap()
        } else {
            let length = self.number()?;
            Location::gap(length.max(0) as u64)
        };
        self.expect(')')?;
        Ok(Segment {
            location,
            left_partial: false,
            right_partial: false,
        })
    }

    ///
    /// An `ACCESSION[.VERSION]:` prefix, recognised by a colon before the next
    /// structural character.
    ///
    fn parse_locus(&mut self) -> LocationResult<Locus> {
        let rest = &self.chars[self.pos..];
        let Some(colon) = rest.iter().position(|c| matches!(c, ':' | '(' | ')' | ',')) else {
            return Ok(Locus::Local);
        };
        if rest[colon] != ':' {
            return Ok(Locus::Local);
        }

        let prefix: String = rest[..colon].iter().collect();
        self.pos += colon + 1;

        let (accession, version) = match prefix.rsplit_once('.') {
            Some((accession, version)) => {
                let version = version
                    .parse::<u32>()
                    .map_err(|_| LocationError::InvalidAccession(prefix.clone()))?;
                (accession.to_string(), Some(version))
            }
            None => (prefix.clone(), None),
        };
        if accession.is_empty() || !accession.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(LocationError::InvalidAccession(prefix));
        }
        Ok(Locus::Remote { accession, version })
    }
}

///
/// Parse a feature, contig or reference location string.
///
/// A bare segment yields a one-segment `Join`. `complement(join(...))` sets
/// the compound complement; `complement(x)` around a single segment
/// complements that segment.
///
pub fn parse_location(text: &str) -> LocationResult<CompoundLocation> {
    LocationParser::new(text).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    fn test_simple_range() {
        let compound = parse_location("467..1000").unwrap();
        assert_eq!(compound.locations(), &[Location::range(467, 1000)]);
        assert_eq!(compound.join_kind, JoinKind::Join);
        assert_eq!(compound.complement, false);
    }

    #[rstest]
    fn test_partial_complemented_join() {
        let compound = parse_location("complement(join(<1..35,\n 101..>135))").unwrap();
        assert_eq!(compound.complement, true);
        assert_eq!(compound.left_partial, true);
        assert_eq!(compound.right_partial, true);
        assert_eq!(
            compound.locations(),
            &[Location::range(1, 35), Location::range(101, 135)]
        );
    }

    #[rstest]
    fn test_segment_complement_and_order() {
        let compound = parse_location("order(complement(5..10),12^13,20)").unwrap();
        assert_eq!(compound.join_kind, JoinKind::Order);
        assert_eq!(
            compound.locations(),
            &[
                Location::range(5, 10).complemented(),
                Location::between(12, 13),
                Location::base(20)
            ]
        );
    }

    #[rstest]
    fn test_single_complement_is_segment_level() {
        let compound = parse_location("complement(<5..35)").unwrap();
        assert_eq!(compound.complement, false);
        assert_eq!(compound.left_partial, true);
        assert_eq!(compound.locations()[0].is_complement(), true);
    }

    #[rstest]
    fn test_remote_and_gaps() {
        let compound =
            parse_location("join(AB000001.1:1..100,gap(24),AB000002:complement(5..10),gap(unk100),gap())")
                .unwrap();
        assert_eq!(
            compound.locations(),
            &[
                Location::range(1, 100).with_locus(Locus::remote("AB000001", Some(1))),
                Location::gap(24),
                Location::range(5, 10)
                    .complemented()
                    .with_locus(Locus::remote("AB000002", None)),
                Location::unknown_gap(),
                Location::unknown_gap(),
            ]
        );
        assert_eq!(compound.length(), 100 + 24 + 6 + 100 + 100);
    }

    #[rstest]
    fn test_remote_complement_outside_prefix() {
        let compound = parse_location("complement(X56734.2:5..10)").unwrap();
        assert_eq!(
            compound.locations(),
            &[Location::range(5, 10)
                .complemented()
                .with_locus(Locus::remote("X56734", Some(2)))]
        );
    }

    #[rstest]
    fn test_single_base_partials() {
        let left = parse_location("<5").unwrap();
        assert_eq!(left.left_partial, true);
        let right = parse_location(">5").unwrap();
        assert_eq!(right.right_partial, true);
        assert_eq!(right.locations(), &[Location::base(5)]);
    }

    #[rstest]
    #[case("", LocationError::Empty)]
    #[case("join(1..10,<20..30)", LocationError::MisplacedPartial("join(1..10,<20..30)".to_string()))]
    #[case("join(1..10,join(2..3))", LocationError::NestedJoin("join(1..10,join(2..3))".to_string()))]
    #[case("1..", LocationError::UnexpectedEnd("1..".to_string()))]
    #[case(".1:1..2", LocationError::InvalidAccession(".1".to_string()))]
    fn test_errors(#[case] text: &str, #[case] expected: LocationError) {
        assert_eq!(parse_location(text), Err(expected));
    }

    #[rstest]
    fn test_trailing_garbage() {
        let result = parse_location("1..10)");
        assert_eq!(
            result,
            Err(LocationError::UnexpectedCharacter {
                found: ')',
                offset: 5,
                location: "1..10)".to_string()
            })
        );
    }
}
