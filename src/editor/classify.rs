/// Decides whether an already trimmed `line`, found at `index` in the raw
/// line split `all_lines`, is a title.
///
/// Only lines starting with a decimal digit are candidates. A candidate is a
/// title when it is set apart by blank lines: blank on both sides, first line
/// followed by a blank, or last line preceded by a blank. A numbered list
/// without blank separators therefore stays a run of paragraphs.
pub fn is_title<S: AsRef<str>>(line: &str, index: usize, all_lines: &[S]) -> bool {
    if !line.starts_with(|ch: char| ch.is_ascii_digit()) {
        return false;
    }
    if index >= all_lines.len() {
        return false;
    }

    let blanks_before = count_blanks(all_lines[..index].iter().rev());
    let blanks_after = count_blanks(all_lines[index + 1..].iter());
    let is_first = index == 0;
    let is_last = index == all_lines.len() - 1;

    (blanks_before >= 1 && blanks_after >= 1)
        || (is_first && blanks_after >= 1)
        || (is_last && blanks_before >= 1)
}

fn count_blanks<'a, S, I>(lines: I) -> usize
where
    S: AsRef<str> + 'a,
    I: Iterator<Item = &'a S>,
{
    lines
        .take_while(|line| line.as_ref().trim().is_empty())
        .count()
}
