//! HTML result sheet.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

use quizmaker_core::model::{Question, QuestionId, Test};
use quizmaker_core::report::QuizResult;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate the result sheet for one attempt.
///
/// `test` and `questions` are optional context: when the test or a question
/// has since been removed, the sheet falls back to identifiers.
pub fn generate_html(result: &QuizResult, test: Option<&Test>, questions: &[Question]) -> String {
    let texts: HashMap<&QuestionId, &str> =
        questions.iter().map(|q| (&q.id, q.text.as_str())).collect();
    let title = test.map_or_else(|| result.test_id.to_string(), |t| t.name.clone());

    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>Test result: {}</title>\n",
        html_escape(&title)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&title)));
    let student = result.student_email.as_deref().unwrap_or("anonymous");
    html.push_str(&format!(
        "<p class=\"meta\">Student: <strong>{}</strong> | Submitted {}</p>\n",
        html_escape(student),
        result.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Score
    html.push_str("<section class=\"score\">\n");
    html.push_str(&format!(
        "<h2>Score: {} / {}</h2>\n",
        result.score, result.total
    ));
    html.push_str(&generate_score_bar(result.ratio()));
    html.push_str("</section>\n");

    // Per-question outcome
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Questions</h2>\n");
    html.push_str("<table class=\"results-table\">\n");
    html.push_str(
        "<thead><tr><th>#</th><th>Question</th><th>Your answer</th><th>Result</th></tr></thead>\n",
    );
    html.push_str("<tbody>\n");

    for (i, detail) in result.details.iter().enumerate() {
        let (class, mark) = if detail.was_correct {
            ("pass", "OK")
        } else {
            ("fail", "Wrong")
        };
        let question = texts
            .get(&detail.question_id)
            .copied()
            .unwrap_or(detail.question_id.as_str());

        html.push_str(&format!(
            "<tr class=\"{class}\"><td>{}</td><td>{}</td><td>{}</td><td>{mark}</td></tr>\n",
            i + 1,
            html_escape(question),
            html_escape(&detail.user_answer),
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // The same text the student saw and the email carries
    html.push_str("<section class=\"summary\">\n");
    html.push_str("<details>\n<summary>Plain-text summary</summary>\n");
    html.push_str("<pre>");
    html.push_str(&html_escape(&result.summary()));
    html.push_str("</pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write the result sheet to a file.
pub fn write_html_report(
    result: &QuizResult,
    test: Option<&Test>,
    questions: &[Question],
    path: &Path,
) -> Result<()> {
    let html = generate_html(result, test, questions);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

fn generate_score_bar(ratio: f64) -> String {
    let bar_height = 24;
    let max_width = 400;
    let width = (ratio.clamp(0.0, 1.0) * max_width as f64) as usize;

    let color = if ratio >= 0.8 {
        "#22c55e"
    } else if ratio >= 0.5 {
        "#eab308"
    } else {
        "#ef4444"
    };

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        max_width + 60,
        bar_height
    );
    svg.push_str(&format!(
        "  <rect x=\"0\" y=\"0\" width=\"{max_width}\" height=\"{bar_height}\" fill=\"none\" stroke=\"currentColor\" rx=\"4\"/>\n"
    ));
    svg.push_str(&format!(
        "  <rect x=\"0\" y=\"0\" width=\"{width}\" height=\"{bar_height}\" fill=\"{color}\" rx=\"4\"/>\n"
    ));
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{:.1}%</text>\n",
        max_width + 8,
        bar_height / 2,
        ratio * 100.0
    ));
    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use quizmaker_core::evaluation::ResultDetail;
    use quizmaker_core::model::QuestionType;
    use quizmaker_core::parser::parse_test_bank_str;
    use quizmaker_core::report::package;

    fn make_result() -> QuizResult {
        package(
            Some("ana@example.com"),
            &"geo".into(),
            1.0,
            2,
            vec![
                ResultDetail {
                    question_id: "q1".into(),
                    was_correct: true,
                    user_answer: "Paris".into(),
                },
                ResultDetail {
                    question_id: "q2".into(),
                    was_correct: false,
                    user_answer: "<b>bold</b>".into(),
                },
            ],
        )
    }

    fn capital_question() -> Question {
        Question {
            id: "q1".into(),
            test_id: "geo".into(),
            text: "Capital of France?".into(),
            question_type: QuestionType::TextAnswer,
            options: vec![],
            expected_text: "Paris".into(),
        }
    }

    #[test]
    fn html_report_contains_required_elements() {
        let test = Test {
            id: "geo".into(),
            name: "Geography".into(),
            description: String::new(),
            student_count: 2,
        };
        let html = generate_html(&make_result(), Some(&test), &[capital_question()]);

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("<title>Test result: Geography</title>"));
        assert!(html.contains("Score: 1 / 2"));
        assert!(html.contains("Capital of France?"));
        assert!(html.contains("ana@example.com"));
        assert!(html.contains("50.0%"));
    }

    #[test]
    fn missing_context_falls_back_to_ids_and_escapes() {
        let html = generate_html(&make_result(), None, &[]);
        assert!(html.contains("<h1>geo</h1>"));
        assert!(html.contains("<td>q2</td>"));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
        assert!(!html.contains("<b>bold</b>"));
    }

    #[test]
    fn reimported_bank_keeps_old_result_texts() {
        let v1 = "[test]\nname = \"Geo\"\n\n[[questions]]\ntext = \"Capital of France?\"\ntype = \"text\"\nexpected = \"Paris\"\n";
        let v2 = v1.replacen(
            "[[questions]]",
            "[[questions]]\ntext = \"Capital of Spain?\"\ntype = \"text\"\nexpected = \"Madrid\"\n\n[[questions]]",
            1,
        );

        let before = parse_test_bank_str(v1, Path::new("geo.toml")).unwrap();
        let result = package(
            None,
            &before.test.id,
            1.0,
            1,
            vec![ResultDetail {
                question_id: before.questions[0].id.clone(),
                was_correct: true,
                user_answer: "Paris".into(),
            }],
        );

        let after = parse_test_bank_str(&v2, Path::new("geo.toml")).unwrap();
        let html = generate_html(&result, Some(&after.test), &after.questions);
        assert!(html.contains("Capital of France?"));
        assert!(!html.contains("Capital of Spain?"));
    }

    #[test]
    fn html_report_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/result.html");

        write_html_report(&make_result(), None, &[], &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
