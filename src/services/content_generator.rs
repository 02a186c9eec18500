//! Mock content generation. Pure string templating, deterministic, no
//! external calls and no failure modes.

#[derive(Debug, Clone)]
pub struct GeneratedContent {
    pub lesson_plan: String,
    pub worksheet: String,
}

pub fn generate_lesson_content(subject: &str, level: &str, topic: &str) -> GeneratedContent {
    let lesson_plan = format!(
        "\n# Lesson Plan: {topic}\n\n## Subject: {subject}\n## Level: {level}\n\n\
         ### 1. Introduction\n- Introduce the topic of {topic}.\n- Discuss the learning objectives.\n\n\
         ### 2. Main Activities\n- Activity 1: ...\n- Activity 2: ...\n\n\
         ### 3. Conclusion\n- Recap of {topic}.\n- Q&A session.\n"
    );

    let worksheet = format!(
        "\n# Worksheet: {topic}\n\n## Subject: {subject}\n## Level: {level}\n\n\
         ### Exercise 1\n...\n\n### Exercise 2\n...\n"
    );

    GeneratedContent {
        lesson_plan,
        worksheet,
    }
}

/// Parses tabular text into one parent update per data row.
///
/// A single line with no recognizable "name" token is treated as one ad-hoc
/// update for a placeholder student. Otherwise the first line is the header
/// and each row is zipped positionally against it; rows shorter than the
/// header simply lack those fields. Missing Name/Score fields default to
/// "Unknown"/"N/A".
pub fn generate_parent_updates(csv_data: &str) -> Vec<String> {
    let mut updates = Vec::new();
    let lines: Vec<&str> = csv_data.trim().split('\n').collect();

    if lines.len() == 1 && !lines[0].to_lowercase().contains("name") {
        updates.push(format!("Update for Student: {}", lines[0]));
        return updates;
    }

    let header: Vec<&str> = lines[0].split(',').map(|h| h.trim()).collect();
    for line in &lines[1..] {
        let values: Vec<&str> = line.split(',').map(|v| v.trim()).collect();

        let student_name = field(&header, &values, "Name").unwrap_or("Unknown").trim();
        let score = field(&header, &values, "Score").unwrap_or("N/A").trim();

        updates.push(format!(
            "Update for {}: Their score was {}.",
            student_name, score
        ));
    }

    updates
}

// Positional zip of header columns to row values; rows shorter than the
// header yield None for the trailing columns. A duplicated header column
// resolves to its last occurrence.
fn field<'a>(header: &[&'a str], values: &[&'a str], name: &str) -> Option<&'a str> {
    header
        .iter()
        .rposition(|h| *h == name)
        .and_then(|i| values.get(i).copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lesson_content_is_deterministic() {
        let a = generate_lesson_content("Math", "Grade 5", "Fractions");
        let b = generate_lesson_content("Math", "Grade 5", "Fractions");
        assert_eq!(a.lesson_plan, b.lesson_plan);
        assert_eq!(a.worksheet, b.worksheet);
    }

    #[test]
    fn test_lesson_content_templating() {
        let content = generate_lesson_content("Science", "KS2", "Photosynthesis");
        assert!(content.lesson_plan.contains("# Lesson Plan: Photosynthesis"));
        assert!(content.lesson_plan.contains("## Subject: Science"));
        assert!(content.lesson_plan.contains("## Level: KS2"));
        assert!(content.lesson_plan.contains("- Recap of Photosynthesis."));
        assert!(content.worksheet.contains("# Worksheet: Photosynthesis"));
        assert!(content.worksheet.contains("### Exercise 2"));
    }

    #[test]
    fn test_parent_updates_from_csv() {
        let updates = generate_parent_updates("Name,Score\nAlice,90\nBob,85");
        assert_eq!(
            updates,
            vec![
                "Update for Alice: Their score was 90.",
                "Update for Bob: Their score was 85.",
            ]
        );
    }

    #[test]
    fn test_single_line_without_header() {
        let updates = generate_parent_updates("just one line");
        assert_eq!(updates, vec!["Update for Student: just one line"]);
    }

    #[test]
    fn test_header_only_yields_nothing() {
        let updates = generate_parent_updates("Name,Score");
        assert!(updates.is_empty());
    }

    #[test]
    fn test_missing_columns_default() {
        // Second row is shorter than the header; Score falls back to N/A.
        let updates = generate_parent_updates("Name,Score\nCara");
        assert_eq!(updates, vec!["Update for Cara: Their score was N/A."]);

        // No Name column at all.
        let updates = generate_parent_updates("Student,Score\nDan,70");
        assert_eq!(updates, vec!["Update for Unknown: Their score was 70."]);
    }

    #[test]
    fn test_duplicate_header_last_occurrence_wins() {
        let updates = generate_parent_updates("Name,Name,Score\nA,B,90");
        assert_eq!(updates, vec!["Update for B: Their score was 90."]);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let updates = generate_parent_updates("Name , Score\n Alice , 90 \n");
        assert_eq!(updates, vec!["Update for Alice: Their score was 90."]);
    }
}
