use super::*;

fn classify(lines: &[&str]) -> Vec<bool> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| is_title(line.trim(), idx, lines))
        .collect()
}

#[test]
fn blank_separated_numbered_lines_are_titles() {
    let lines = [
        "1. Intro", "", "Body A.", "", "Body B.", "", "2. Next", "", "Body C.",
    ];
    assert_eq!(classify(&lines), vec![true, false, false, true, false]);
}

#[test]
fn numbered_list_without_blanks_is_paragraphs() {
    assert_eq!(classify(&["1. item one", "2. item two"]), vec![false, false]);
}

#[test]
fn lines_without_leading_digit_are_never_titles() {
    let lines = ["", "Chapter 1", "", "", "x"];
    assert!(!is_title("Chapter 1", 1, &lines));
    assert!(!is_title("", 0, &lines));
}

#[test]
fn first_line_needs_a_blank_after() {
    assert!(is_title("1 Start", 0, &["1 Start", "", "text"]));
    assert!(!is_title("1 Start", 0, &["1 Start", "text"]));
}

#[test]
fn last_line_needs_a_blank_before() {
    assert!(is_title("9 End", 2, &["text", "  ", "9 End"]));
    assert!(!is_title("9 End", 1, &["text", "9 End"]));
}

#[test]
fn blank_on_one_side_only_is_not_enough_in_the_middle() {
    let lines = ["a", "", "2. Middle", "b"];
    assert!(!is_title("2. Middle", 2, &lines));
}

#[test]
fn whitespace_only_lines_count_as_blank() {
    let lines = ["a", " \t", "3 Section", "\r", "b"];
    assert!(is_title("3 Section", 2, &lines));
}

// A lone digit-led line is both first and last but has no blank neighbour,
// so none of the isolation rules fire and it stays a paragraph.
#[test]
fn single_numbered_line_document_is_a_paragraph() {
    assert!(!is_title("1. Only", 0, &["1. Only"]));

    let editor = BlockEditor::from_text("1. Only").unwrap();
    assert_eq!(editor.blocks()[0].number(), Some(1));
    assert_eq!(editor.blocks()[0].title_number(), None);
}

#[test]
fn surrounding_blank_lines_make_a_lone_numbered_line_a_title() {
    let editor = BlockEditor::from_text("\n1. Only\n").unwrap();
    assert!(editor.blocks()[0].is_title());
}

#[test]
fn out_of_range_index_is_not_a_title() {
    assert!(!is_title("1", 5, &["1"]));
}
