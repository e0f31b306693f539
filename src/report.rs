// src/report.rs

//! Static HTML reports for the two flows.

use chrono::{DateTime, Utc};

use crate::{
    models::{practice_response::PracticeResponse, quiz_response::QuizResponse},
    scoring::{Classification, PracticeSummary, QuizSummary},
    store::response_period,
    utils::html::escape_text,
};

pub const HPO_REPORT_FILENAME: &str = "hpo-report.html";
pub const LEADERSHIP_REPORT_FILENAME: &str = "leadership-report.html";

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; margin: 20px; }
        h1 { color: #2c3e50; font-size: 1.8rem; }
        h2 { color: #34495e; border-bottom: 2px solid #3498db; padding-bottom: 5px; font-size: 1.5rem; }
        table { border-collapse: collapse; width: 100%; margin-bottom: 20px; font-size: 0.9rem; }
        th, td { border: 1px solid #ddd; padding: 10px; text-align: left; }
        th { background-color: #3498db; color: white; }
        tr:nth-child(even) { background-color: #f2f2f2; }
        .summary-item { margin: 10px 0; }
        .good { color: #27ae60; }
        .medium { color: #f39c12; }
        .poor { color: #e74c3c; }
        .info { background-color: #e8f4fc; padding: 15px; border-radius: 5px; margin: 20px 0; }
        .comment { background-color: #f9f9f9; padding: 15px; border-left: 4px solid #3498db; margin: 10px 0; }
        @media (max-width: 768px) {
            body { margin: 10px; }
            h1 { font-size: 1.5rem; }
            h2 { font-size: 1.3rem; }
            table { font-size: 0.8rem; }
            th, td { padding: 8px; }
        }
"#;

fn open_document(out: &mut String, title: &str, generated_at: DateTime<Utc>) {
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n    <meta charset=\"utf-8\">\n");
    out.push_str(&format!("    <title>{}</title>\n", title));
    out.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    out.push_str(&format!("    <style>{}    </style>\n</head>\n<body>\n", STYLE));
    out.push_str(&format!("    <h1>{}</h1>\n", title));
    out.push_str(&format!(
        "    <p><strong>Generated at:</strong> {}</p>\n",
        generated_at.format("%d/%m/%Y %H:%M")
    ));
}

fn close_document(out: &mut String) {
    out.push_str("</body>\n</html>\n");
}

fn format_instant(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn push_period<I>(out: &mut String, timestamps: I)
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    if let Some((first, last)) = response_period(timestamps) {
        out.push_str(&format!(
            "    <p><strong>Response period:</strong> {} to {}</p>\n",
            format_instant(first),
            format_instant(last)
        ));
    }
}

fn summary_marker(classification: Classification) -> &'static str {
    match classification {
        Classification::HighPerformance => "&#9989;",
        Classification::Medium => "&#9888;&#65039;",
        Classification::ImprovementOpportunity => "&#10060;",
    }
}

/// Renders the practices (HPO) report.
pub fn render_practice_report(
    summary: &PracticeSummary,
    rows: &[PracticeResponse],
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    open_document(&mut out, "HPO Report - Performance Analysis", generated_at);

    out.push_str("    <div class=\"info\">\n        <h2>Overall Performance</h2>\n");
    out.push_str(&format!(
        "        <h3 class=\"{}\">{}</h3>\n",
        summary.overall_classification.css_class(),
        summary.overall_classification.label()
    ));
    out.push_str(&format!(
        "        <p>Overall mean: {:.2}/14</p>\n    </div>\n",
        summary.overall_mean
    ));

    out.push_str("    <h2>Results by Dimension</h2>\n    <table>\n");
    out.push_str(
        "        <tr><th>Dimension</th><th>Mean Score</th><th>Performance</th></tr>\n",
    );
    for dimension in &summary.dimensions {
        out.push_str(&format!(
            "        <tr><td>{}</td><td>{:.2}/14</td><td class=\"{}\">{}</td></tr>\n",
            dimension.title,
            dimension.mean,
            dimension.classification.css_class(),
            dimension.classification.label()
        ));
    }
    out.push_str("    </table>\n");

    out.push_str("    <h2>Executive Summary</h2>\n");
    for dimension in &summary.dimensions {
        out.push_str(&format!(
            "    <div class=\"summary-item {}\">{} <strong>{}</strong>: {}</div>\n",
            dimension.classification.css_class(),
            summary_marker(dimension.classification),
            dimension.title,
            dimension.classification.label()
        ));
    }

    let comments: Vec<(&PracticeResponse, &str)> = rows
        .iter()
        .filter_map(|row| row.non_empty_comment().map(|c| (row, c)))
        .collect();

    if !comments.is_empty() {
        out.push_str("    <h2>Participant Comments</h2>\n");
        for (row, comment) in &comments {
            out.push_str(&format!(
                "    <div class=\"comment\"><strong>{}:</strong><br>{}</div>\n",
                format_instant(row.timestamp),
                escape_text(comment)
            ));
        }
    }

    out.push_str("    <h2>Additional Information</h2>\n");
    out.push_str(&format!(
        "    <p><strong>Total responses:</strong> {}</p>\n",
        rows.len()
    ));
    out.push_str(&format!(
        "    <p><strong>Total comments:</strong> {}</p>\n",
        comments.len()
    ));
    push_period(&mut out, rows.iter().map(|row| row.timestamp));

    close_document(&mut out);
    out
}

/// Renders the leadership quiz report.
pub fn render_quiz_report(
    summary: &QuizSummary,
    rows: &[QuizResponse],
    generated_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    open_document(&mut out, "Leadership Report - Performance Analysis", generated_at);

    out.push_str("    <div class=\"info\">\n        <h2>Overall Performance</h2>\n");
    out.push_str(&format!(
        "        <h3>{:.1}% correct</h3>\n    </div>\n",
        summary.overall_accuracy
    ));

    out.push_str("    <h2>Results by Question</h2>\n    <table>\n");
    out.push_str(
        "        <tr><th>Question</th><th>Correct Answers</th><th>Accuracy</th><th>Average Time (seconds)</th></tr>\n",
    );
    for question in &summary.questions {
        let average_time = question
            .average_response_time
            .map(|t| format!("{:.1}", t))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "        <tr><td>{}</td><td>{}/{}</td><td>{:.1}%</td><td>{}</td></tr>\n",
            question.prompt, question.correct, question.total, question.accuracy, average_time
        ));
    }
    out.push_str("    </table>\n");

    out.push_str("    <h2>Additional Information</h2>\n");
    out.push_str(&format!(
        "    <p><strong>Completed sessions:</strong> {}</p>\n",
        summary.completed_sessions
    ));
    out.push_str(&format!(
        "    <p><strong>Total responses:</strong> {}</p>\n",
        rows.len()
    ));
    push_period(&mut out, rows.iter().map(|row| row.timestamp));

    close_document(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog,
        scoring::{practices::tests::row, score_practices, score_quiz},
    };
    use chrono::TimeZone;

    #[test]
    fn practice_report_embeds_scores_and_escaped_comments() {
        let rows = vec![
            row(1, [7; 14], Some("<b>great</b> team")),
            row(2, [7; 14], Some("   ")),
        ];
        let summary = score_practices(&rows).unwrap();
        let generated = Utc.with_ymd_and_hms(2026, 3, 4, 9, 30, 0).unwrap();
        let html = render_practice_report(&summary, &rows, generated);

        assert!(html.contains("04/03/2026 09:30"));
        assert!(html.contains("14.00/14"));
        assert!(html.contains("High performance"));
        assert!(html.contains("G. Leadership"));
        assert!(html.contains("&lt;b&gt;great"));
        assert!(!html.contains("<b>great</b>"));
        assert!(html.contains("<strong>Total responses:</strong> 2"));
        assert!(html.contains("<strong>Total comments:</strong> 1"));
        assert!(html.contains("Response period:"));
    }

    #[test]
    fn report_without_comments_skips_comment_section() {
        let rows = vec![row(1, [4; 14], None)];
        let summary = score_practices(&rows).unwrap();
        let html = render_practice_report(&summary, &rows, Utc::now());
        assert!(!html.contains("Participant Comments"));
        assert!(html.contains("Improvement opportunity"));
    }

    #[test]
    fn quiz_report_lists_every_question() {
        let t = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let rows = vec![QuizResponse {
            id: 1,
            session_id: "s".to_string(),
            timestamp: t,
            question_id: "q1".to_string(),
            response: "b".to_string(),
            response_time: 2.5,
        }];
        let summary = score_quiz(&rows, &catalog::answer_key());
        let html = render_quiz_report(&summary, &rows, t);

        for question in catalog::QUIZ_QUESTIONS.iter() {
            assert!(html.contains(question.prompt));
        }
        assert!(html.contains("<td>1/1</td><td>100.0%</td><td>2.5</td>"));
        assert!(html.contains("<td>0/0</td><td>0.0%</td><td>-</td>"));
        assert!(html.contains("2026-01-02 03:04:05 to 2026-01-02 03:04:05"));
    }
}
