use std::io::Write;

use crate::error::Result;

const GROUP_SIZE: usize = 10;
const GROUPS_PER_LINE: usize = 6;
const BASES_PER_LINE: usize = GROUP_SIZE * GROUPS_PER_LINE;

fn groups(chunk: &[u8]) -> Vec<String> {
    chunk
        .chunks(GROUP_SIZE)
        .map(|group| String::from_utf8_lossy(group).into_owned())
        .collect()
}

///
/// EMBL layout: five spaces, up to six 10-base groups padded to column 70,
/// then the number of the last base on the line right-justified to column 80.
///
pub fn write_embl_sequence(out: &mut dyn Write, bases: &[u8]) -> Result<()> {
    let mut written = 0;
    for chunk in bases.chunks(BASES_PER_LINE) {
        written += chunk.len();
        writeln!(out, "     {:<65}{:>10}", groups(chunk).join(" "), written)?;
    }
    Ok(())
}

///
/// GenBank layout: the number of the first base on the line right-justified
/// in nine columns, then up to six 10-base groups each preceded by a space.
///
pub fn write_genbank_sequence(out: &mut dyn Write, bases: &[u8]) -> Result<()> {
    for (index, chunk) in bases.chunks(BASES_PER_LINE).enumerate() {
        let mut line = format!("{:>9}", index * BASES_PER_LINE + 1);
        for group in groups(chunk) {
            line.push(' ');
            line.push_str(&group);
        }
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn bases() -> Vec<u8> {
        b"acgt".iter().copied().cycle().take(65).collect()
    }

    #[rstest]
    fn test_embl_layout(bases: Vec<u8>) {
        let mut out = Vec::new();
        write_embl_sequence(&mut out, &bases).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 80);
        assert_eq!(
            lines[0],
            "     acgtacgtac gtacgtacgt acgtacgtac gtacgtacgt acgtacgtac gtacgtacgt        60"
        );
        assert_eq!(lines[1], format!("     acgta{}{:>10}", " ".repeat(60), 65));
    }

    #[rstest]
    fn test_genbank_layout(bases: Vec<u8>) {
        let mut out = Vec::new();
        write_genbank_sequence(&mut out, &bases).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "        1 acgtacgtac gtacgtacgt acgtacgtac gtacgtacgt acgtacgtac gtacgtacgt\n       61 acgta\n"
        );
    }
}
