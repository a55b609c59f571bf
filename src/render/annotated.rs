//! Annotated HTML transcript with entities and quality metrics.

use crate::normalize::{Fragment, MetricsTable};
use crate::render::entities::EntityTable;
use crate::render::template::{MediaSource, escape, page_header};
use crate::render::timestamp::{TimestampStyle, format_offset};

/// Label shown when a fragment continues the previous speaker.
const SPEAKER_CONTINUES: &str = "_____";

const ENTITIES_HEAD: &str = "<table id=\"entities\"><thead><tr><th>Entity</th><th>Type</th>\
<th>Max Confidence</th><th>Count</th></tr></thead><tbody>";

const METRICS_HEAD: &str = "<table id=\"metrics\"><thead><tr><th>Index</th>\
<th>Avg. Confidence</th><th>Terms</th><th>Unsure</th></tr></thead><tbody>";

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The transcript body: one marker per fragment followed by its terms.
pub fn render_transcript(fragments: &[Fragment]) -> String {
    let mut out = String::new();
    for fragment in fragments {
        let marker = &fragment.marker;
        let label = match marker.speaker.as_deref() {
            Some(_) if marker.speaker_continues => SPEAKER_CONTINUES.to_string(),
            Some(speaker) => escape(speaker),
            None => String::new(),
        };
        out.push_str(&format!(
            "\n<br><span class=\"ti\" onclick=\"setTimeIndex({})\">[{}] {} </span>",
            marker.start_time.max(0.0).floor(),
            format_offset(marker.start_time, TimestampStyle::Comma),
            label
        ));

        for term in &fragment.terms {
            if term.punctuation && out.ends_with(' ') {
                out.pop();
            }
            let text = escape(&term.text);
            match term.tier.html_color() {
                Some(color) => {
                    out.push_str(&format!("<span style=\"color: {}\">{}</span> ", color, text))
                }
                None => {
                    out.push_str(&text);
                    out.push(' ');
                }
            }
        }
    }
    out
}

/// Entity table rows, sorted by `"type-text"`.
pub fn render_entity_rows(entities: &EntityTable) -> Vec<String> {
    entities
        .rows()
        .map(|row| {
            format!(
                "<tr><td>{}</td><td>{}</td><td class=\"n\">{}</td><td class=\"n\">{}</td></tr>",
                escape(&row.text),
                escape(&row.entity_type),
                round2(row.max_score),
                row.count
            )
        })
        .collect()
}

/// Metrics rows plus the summary footer.
pub fn render_metrics(metrics: &MetricsTable) -> Vec<String> {
    let mut lines: Vec<String> = metrics
        .buckets()
        .map(|bucket| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                format_offset(bucket.first_time, TimestampStyle::Comma),
                round2(bucket.average_confidence()),
                bucket.term_count,
                bucket.unsure_term_count
            )
        })
        .collect();

    let summary = metrics.summary();
    lines.push(format!(
        "</tbody><tfoot><tr><td></td><td>{}% unsure</td><td>{}</td><td>{}</td></tr></tfoot></table>",
        round2(summary.unsure_percent()),
        summary.term_count,
        summary.unsure_term_count
    ));
    lines
}

/// The complete annotated document.
pub fn render_annotated(
    fragments: &[Fragment],
    entities: &EntityTable,
    metrics: &MetricsTable,
    media: &MediaSource,
    caption_languages: &[String],
) -> String {
    let mut lines = vec![
        page_header(media, caption_languages),
        "<div id=\"container\"><div id=\"transcript\">".to_string(),
        render_transcript(fragments),
        "</div><div id=\"nlp\">".to_string(),
        ENTITIES_HEAD.to_string(),
    ];
    lines.extend(render_entity_rows(entities));
    lines.push("</tbody></table>".to_string());
    lines.push(METRICS_HEAD.to_string());
    lines.extend(render_metrics(metrics));
    lines.push("</div></div></body></html>".to_string());

    let mut document = lines.join("\n");
    document.push('\n');
    document
}
