//! HTML fragment writers.
//!
//! Every function here is deterministic: the same view model gives the same
//! bytes, so rendered fragments can be diffed against a reference.

use crate::chart::pie_chart_svg;
use crate::config::*;
use crate::notices::{format_notice_date, DateStyle};
use crate::results::{format_timestamp, format_votes, latest_update, SectionView, TotalFailure};

pub const NO_NOTICES: &str = "No notices available at this time.";

pub fn esc<S: AsRef<str>>(s: S) -> String {
    let mut out = String::with_capacity(s.as_ref().len() + 8);
    for ch in s.as_ref().chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// At most three decimals, without trailing zeros.
pub fn fmt_number(x: f64) -> String {
    let s = format!("{:.3}", x);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

// ===== Notices =====

/// The notices page: one card per notice, in the given order.
pub fn render_notice_cards(notices: &[Notice], opts: &NoticeViewOptions) -> String {
    if notices.is_empty() {
        return no_notices();
    }
    let mut out = String::new();
    for n in notices {
        out.push_str(&format!("<div class=\"notice-card\" id=\"{}\">", esc(&n.id)));
        out.push_str("<div class=\"notice-header\">");
        out.push_str(&format!("<h3 class=\"notice-title\">{}</h3>", esc(&n.title)));
        out.push_str(&format!(
            "<span class=\"notice-date\">{}</span>",
            esc(format_notice_date(&n.date, DateStyle::Long))
        ));
        out.push_str("</div>");
        out.push_str(&format!(
            "<div class=\"notice-content\"><p>{}</p></div>",
            esc(&n.content)
        ));
        if let Some(pdf) = &n.pdf {
            let href = esc(format!("{}{}", opts.attachment_base, pdf));
            out.push_str("<div class=\"notice-actions\">");
            out.push_str(&format!(
                "<a class=\"notice-view\" href=\"{}\" target=\"_blank\" rel=\"noopener\">View</a>",
                href
            ));
            out.push_str(&format!(
                "<a class=\"notice-download\" href=\"{}\" download>Download</a>",
                href
            ));
            out.push_str("</div>");
        }
        out.push_str("</div>");
    }
    out
}

/// The home page list: short dates linking to the full cards, the most
/// recent one flagged with `latest`.
pub fn render_notice_links(notices: &[Notice], opts: &NoticeViewOptions) -> String {
    let shown = match opts.home_limit {
        Some(limit) => &notices[..notices.len().min(limit)],
        None => notices,
    };
    if shown.is_empty() {
        return no_notices();
    }
    let mut out = String::new();
    for (idx, n) in shown.iter().enumerate() {
        let class = if idx == 0 {
            "notice-link-home latest"
        } else {
            "notice-link-home"
        };
        out.push_str(&format!(
            "<a class=\"{}\" href=\"{}#{}\" title=\"{}\">{}</a>",
            class,
            esc(&opts.full_page),
            esc(&n.id),
            esc(&n.title),
            esc(format_notice_date(&n.date, DateStyle::Short))
        ));
    }
    out
}

fn no_notices() -> String {
    format!("<p class=\"no-notices\">{}</p>", NO_NOTICES)
}

pub fn render_notices_error() -> String {
    error_panel(
        "Unable to load notices",
        "<p>Please check your internet connection and try again later.</p>",
    )
}

// ===== Results =====

pub fn render_contest(contest: &ContestResult) -> String {
    let mut out = String::from("<div class=\"school-group\">");
    out.push_str(&format!("<h3>{}</h3>", esc(&contest.title)));
    out.push_str("<table class=\"results-table\">");
    out.push_str(
        "<thead><tr><th>Candidate Name</th><th class=\"votes-header\">Votes</th></tr></thead>",
    );
    out.push_str("<tbody>");
    for c in &contest.candidates {
        out.push_str(&format!(
            "<tr><td>{}</td><td class=\"votes-cell\">{}</td></tr>",
            esc(&c.name),
            format_votes(c.votes)
        ));
    }
    out.push_str("</tbody></table></div>");
    out
}

/// A results container: one group per displayed contest, or a single error
/// panel when nothing could be loaded.
pub fn render_section(view: &SectionView, data_root: &str) -> String {
    match view {
        SectionView::Contests { contests, .. } => contests.iter().map(render_contest).collect(),
        SectionView::Unavailable(tf) => render_results_error(tf, data_root),
    }
}

pub fn render_results_error(tf: &TotalFailure, data_root: &str) -> String {
    let body = if tf.unreachable {
        format!(
            "<p><strong>The result files could not be reached at <code>{}</code>.</strong></p>\
             <p>The data folder must be served over HTTP. Use one of these methods:</p>\
             <ol>\
             <li><strong>Python:</strong> run <code>python -m http.server 8000</code> in the site folder, then use <code>http://localhost:8000/data/</code> as the data root</li>\
             <li><strong>Node.js:</strong> run <code>npx http-server -p 8000</code></li>\
             <li><strong>Local folder:</strong> point the data root at the directory holding the files instead of a URL</li>\
             </ol>",
            esc(data_root)
        )
    } else {
        format!(
            "<p>Please check your internet connection and try again later.</p>\
             <p class=\"error-detail\">Error: {}</p>",
            esc(tf.summary())
        )
    };
    error_panel("Unable to load results", &body)
}

/// The `last updated` label for the contests currently on display.
pub fn render_last_updated(views: &[&SectionView]) -> String {
    let contests = views.iter().flat_map(|v| match v {
        SectionView::Contests { contests, .. } => contests.as_slice(),
        SectionView::Unavailable(_) => &[][..],
    });
    match latest_update(contests) {
        Some(ts) => format!(
            "<span id=\"last-updated\">{}</span>",
            esc(format_timestamp(&ts))
        ),
        None => "<span id=\"last-updated\">-</span>".to_string(),
    }
}

// ===== Statistics =====

pub fn render_chart_card(id: &str, title: &str, ratio: &GenderRatio) -> String {
    format!(
        "<div class=\"chart-card\" id=\"{id}\"><h3>{title}</h3>\
         <div class=\"pie-chart-container\">{svg}</div>\
         <div class=\"legend\">\
         <div class=\"legend-item\"><span class=\"legend-color male\"></span><span>Male: {male}%</span></div>\
         <div class=\"legend-item\"><span class=\"legend-color female\"></span><span>Female: {female}%</span></div>\
         </div></div>",
        id = esc(id),
        title = esc(title),
        svg = pie_chart_svg(ratio),
        male = fmt_number(ratio.male),
        female = fmt_number(ratio.female),
    )
}

fn error_panel(title: &str, body: &str) -> String {
    format!(
        "<div class=\"error-message\"><p class=\"error-title\">{}</p>{}</div>",
        esc(title),
        body
    )
}
