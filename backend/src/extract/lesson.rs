//! Subject cell interpretation.

/// Split a subject cell into `(subject, teacher)` at the first `separator`.
///
/// Both halves are trimmed. Without a separator the whole cell is the subject
/// and the teacher is empty.
pub fn split_subject_teacher(cell: &str, separator: char) -> (String, String) {
    match cell.split_once(separator) {
        Some((subject, teacher)) => (subject.trim().to_string(), teacher.trim().to_string()),
        None => (cell.trim().to_string(), String::new()),
    }
}
