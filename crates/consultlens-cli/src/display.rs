//! Terminal rendering for consultations, statistics and submissions.
//!
//! Sections mirror the analyst dashboard: header card, overview, insights,
//! the filtered submissions list and the word-cloud selection.

use consultlens_core::{
    Comment, ConsultationMeta, FilteredView, Provenance, StanceFilter, Summary, WordCloudAsset,
};

const MAX_SUMMARY_CHARS: usize = 200;
const MAX_TITLE_CHARS: usize = 60;
const BAR_WIDTH: usize = 20;

// ── Public API ──

/// One line per consultation, for `consultlens list`.
pub fn print_consultation_list(metas: &[ConsultationMeta]) {
    if metas.is_empty() {
        println!("No consultations.");
        return;
    }
    println!(
        "{:<6} {:<18} {:>11}  {:<10}  title",
        "id", "status", "submissions", "due"
    );
    for meta in metas {
        println!(
            "{:<6} {:<18} {:>11}  {:<10}  {}",
            meta.id,
            meta.status.as_str(),
            meta.submissions,
            meta.end_date,
            truncate(&meta.title, MAX_TITLE_CHARS)
        );
    }
}

/// Header card: title, counts, due date, status and description.
pub fn print_header(meta: &ConsultationMeta, provenance: &Provenance) {
    println!("=== {} ===", meta.title);
    println!(
        "{} submissions  |  Due: {}  |  {}",
        meta.submissions,
        if meta.end_date.is_empty() {
            "-"
        } else {
            meta.end_date.as_str()
        },
        meta.status
    );
    if !meta.description.is_empty() {
        println!("{}", meta.description);
    }
    if let Provenance::Placeholder { reason } = provenance {
        println!("(live data unavailable: {reason})");
    }
    println!();
}

/// Stance distribution and key statistics.
pub fn print_overview(summary: &Summary) {
    println!("Sentiment Distribution");
    let distribution = summary.stance_distribution();
    if distribution.is_empty() {
        println!("  (no comments)");
    }
    for entry in &distribution {
        println!("  {:<26} {}", entry.stance.as_str(), entry.count);
    }
    println!();

    println!("Key Statistics");
    println!("  {:<26} {}", "Total Comments", summary.total);
    for entry in &summary.stances {
        println!("  {:<26} {}", entry.stance.as_str(), entry.count);
    }
    println!(
        "  {:<26} [{}] {}/5.0",
        "Average Confidence Score",
        bar(summary.mean_confidence / 5.0, BAR_WIDTH),
        format_score(summary.mean_confidence)
    );
    println!();
}

/// Stakeholder breakdown and confidence quality metrics.
pub fn print_insights(summary: &Summary) {
    println!("Stakeholder Analysis");
    if summary.stakeholders.is_empty() {
        println!("  (no comments)");
    }
    for entry in &summary.stakeholders {
        println!(
            "  {:<26} [{}] {}",
            entry.stakeholder_type,
            bar(entry.share / 100.0, BAR_WIDTH / 2),
            entry.count
        );
    }
    println!();

    println!("Quality Metrics");
    println!(
        "  {:<26} {}",
        "Average Confidence Score",
        format_score(summary.mean_confidence)
    );
    println!(
        "  {:<26} {} submissions",
        "High Confidence (4.0+)", summary.confidence.high
    );
    println!(
        "  {:<26} {} submissions",
        "Medium Confidence (3.0-3.9)", summary.confidence.medium
    );
    println!(
        "  {:<26} {} submissions",
        "Low Confidence (< 3.0)", summary.confidence.low
    );
    println!("  {:<26} {}", "Most Active Stakeholder", summary.top_stakeholder);
    println!();
}

/// "N of M submissions" followed by one card per matching comment.
pub fn print_submissions(view: &FilteredView<'_>, stance: StanceFilter, query: &str) {
    print!("Submissions [{stance}]");
    if !query.is_empty() {
        print!(" matching {query:?}");
    }
    println!(": {} of {} submissions", view.len(), view.total);
    println!();

    for comment in &view.comments {
        print_comment(comment);
    }
}

/// The selected word cloud, or the empty-state message.
pub fn print_wordcloud(stance: StanceFilter, asset: Option<&WordCloudAsset>) {
    println!("Word Cloud [{stance}]");
    match asset {
        Some(asset) => {
            println!("  {:<26} {}", "image", asset.image);
            println!("  {:<26} {}", "alt", asset.alt);
        }
        None => {
            println!("  No word cloud available for this filter.");
            println!("  Try selecting a different stance or \"All\".");
        }
    }
    println!();
}

// ── Comment card ──

fn print_comment(comment: &Comment) {
    println!(
        "  {}  [{}]  Score: {}/5",
        comment.submitter,
        comment.stance,
        format_score(comment.confidence_score)
    );

    let mut meta_line = comment.stakeholder_type.clone();
    if !comment.date.is_empty() {
        meta_line.push_str(" | ");
        meta_line.push_str(&comment.date);
    }
    if let Some(model) = &comment.ml_model {
        meta_line.push_str(" | Model: ");
        meta_line.push_str(model);
    }
    println!("    {meta_line}");

    if !comment.summary.is_empty() {
        println!("    {}", truncate(&comment.summary, MAX_SUMMARY_CHARS));
    }
    if !comment.keywords.is_empty() {
        println!("    keywords: {}", comment.keywords.join(", "));
    }
    println!();
}

// ── Helpers ──

/// One decimal place, as the dashboard shows scores.
fn format_score(score: f64) -> String {
    format!("{score:.1}")
}

/// Cut `s` to at most `max` characters, marking the cut with "...".
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Horizontal bar for a fraction in `[0, 1]`.
fn bar(fraction: f64, width: usize) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("{}{}", "#".repeat(filled), "-".repeat(width - filled))
}
