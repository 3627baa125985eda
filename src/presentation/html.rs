//! HTML rendering
//!
//! Server-side page assembly with inline SVG charts. No client-side script.

use std::fmt::Write;

use super::charts::{BarChart, Gauge, Histogram, Pie, Scatter};
use super::views::{AnalysisView, Banner, ComparisonView, Metric, Tone};
use crate::scoring::Availability;

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;display:flex;color:#222}\
aside{width:260px;padding:1.5rem;background:#f4f5f7;min-height:100vh}\
main{flex:1;padding:1.5rem 2rem}\
.metrics{display:flex;gap:1rem;margin:1rem 0}\
.metric{flex:1;border:1px solid #ddd;border-radius:6px;padding:.75rem}\
.metric .label{font-size:.8rem;color:#666}.metric .value{font-size:1.5rem}\
.banner{border-radius:6px;padding:.75rem 1rem;margin:.75rem 0}\
.positive{background:#e6f4ea}.negative{background:#fdecea}.neutral{background:#e8f0fe}\
.charts{display:flex;flex-wrap:wrap;gap:1.5rem}\
label{display:block;margin-top:.5rem;font-size:.85rem}\
input,select,button{width:100%;padding:.35rem;margin-top:.2rem}\
footer{margin-top:2rem;color:#888;font-size:.8rem}";

/// Escape text for HTML bodies and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
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

fn tone_class(tone: Tone) -> &'static str {
    match tone {
        Tone::Positive => "positive",
        Tone::Negative => "negative",
        Tone::Neutral => "neutral",
    }
}

/// Sidebar state shared by every page
pub struct Sidebar<'a> {
    pub client_ids: &'a [i64],
    pub selected: Option<i64>,
    pub view: &'a ComparisonView,
}

pub fn layout(title: &str, sidebar: Option<&Sidebar<'_>>, body: &str) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>{}</title><style>{}</style></head><body>",
        escape(title),
        STYLE
    );
    if let Some(sidebar) = sidebar {
        html.push_str(&render_sidebar(sidebar));
    }
    let _ = write!(
        html,
        "<main><h1>💳 Credit Scoring Dashboard</h1>{}<footer>Generated {} | Test set</footer></main></body></html>",
        body,
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );
    html
}

fn render_sidebar(sidebar: &Sidebar<'_>) -> String {
    let mut html = String::from("<aside><h2>🔍 Client search</h2><form method=\"get\" action=\"/analyze\">");
    html.push_str("<label>Client (SK_ID_CURR)<select name=\"id\">");
    for id in sidebar.client_ids {
        let selected = if Some(*id) == sidebar.selected { " selected" } else { "" };
        let _ = write!(html, "<option value=\"{id}\"{selected}>{id}</option>");
    }
    let _ = write!(
        html,
        "</select></label><button type=\"submit\">📊 Analyze</button></form>\
         <p><strong>{} clients available in the test set</strong></p>",
        sidebar.client_ids.len()
    );

    let filter = &sidebar.view.filter;
    let bound = |v: Option<f64>| v.map(|v| format!("{v}")).unwrap_or_default();
    let action = sidebar.selected.map_or_else(|| "/".to_string(), |id| format!("/clients/{id}"));
    let _ = write!(
        html,
        "<h2>Compare</h2><form method=\"get\" action=\"{}\">\
         <label>Age min<input type=\"number\" name=\"age_min\" value=\"{}\"></label>\
         <label>Age max<input type=\"number\" name=\"age_max\" value=\"{}\"></label>\
         <label>Income min<input type=\"number\" name=\"income_min\" value=\"{}\"></label>\
         <label>Income max<input type=\"number\" name=\"income_max\" value=\"{}\"></label>\
         <button type=\"submit\">Apply</button></form></aside>",
        escape(&action),
        bound(filter.age.map(|r| r.min)),
        bound(filter.age.map(|r| r.max)),
        bound(filter.income.map(|r| r.min)),
        bound(filter.income.map(|r| r.max)),
    );
    html
}

pub fn banner(banner: &Banner) -> String {
    let mut html = format!(
        "<div class=\"banner {}\"><strong>{}</strong>",
        tone_class(banner.tone),
        escape(&banner.title)
    );
    if !banner.lines.is_empty() {
        html.push_str("<ul>");
        for line in &banner.lines {
            let _ = write!(html, "<li>{}</li>", escape(line));
        }
        html.push_str("</ul>");
    }
    html.push_str("</div>");
    html
}

pub fn metrics(metrics: &[Metric]) -> String {
    let mut html = String::from("<div class=\"metrics\">");
    for m in metrics {
        let _ = write!(
            html,
            "<div class=\"metric {}\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>",
            tone_class(m.tone),
            escape(m.label),
            escape(&m.value)
        );
    }
    html.push_str("</div>");
    html
}

/// Status line shown above everything else
pub fn availability_banner(availability: &Availability) -> String {
    match &availability.model {
        Some(model) => banner(&Banner {
            tone: Tone::Positive,
            title: format!("✓ {}", model.summary()),
            lines: Vec::new(),
        }),
        None => banner(&Banner {
            tone: Tone::Neutral,
            title: "Could not load model information".to_string(),
            lines: Vec::new(),
        }),
    }
}

/// Page shown when the scoring API is down; nothing else is rendered
pub fn unavailable_page(availability: &Availability, api_url: &str) -> String {
    let mut lines = vec![format!("API endpoint: {api_url}")];
    if let Some(status) = &availability.status {
        lines.push(format!("Reported status: {status}"));
    }
    if let Some(error) = &availability.error {
        lines.push(error.clone());
    }
    let body = banner(&Banner {
        tone: Tone::Negative,
        title: "⚠️ Scoring API not reachable".to_string(),
        lines,
    });
    layout("Scoring API unavailable", None, &body)
}

pub fn error_block(message: &str) -> String {
    banner(&Banner {
        tone: Tone::Negative,
        title: format!("Error: {message}"),
        lines: Vec::new(),
    })
}

pub fn comparison_section(view: &ComparisonView) -> String {
    let mut html = String::from("<h2>👥 Similar clients</h2>");
    html.push_str(&metrics(&view.metrics()));
    html.push_str("<div class=\"charts\">");
    html.push_str(&histogram_svg(&view.histogram));
    if let Some(scatter) = &view.scatter {
        html.push_str(&scatter_svg(scatter));
    }
    html.push_str(&pie_svg(&view.pie));
    html.push_str("</div>");
    html
}

pub fn analysis_section(view: &AnalysisView) -> String {
    let mut html = format!("<h2>Client SK_ID_CURR: {}</h2>", view.client_id);
    html.push_str(&metrics(&view.metrics));
    html.push_str(&banner(&view.verdict));
    for warning in &view.warnings {
        html.push_str(&banner(&Banner {
            tone: Tone::Neutral,
            title: warning.clone(),
            lines: Vec::new(),
        }));
    }

    html.push_str("<h3>📊 Risk level</h3>");
    html.push_str(&gauge_svg(&view.gauge));

    html.push_str("<h3>🔍 Decision factors (SHAP)</h3>");
    match &view.shap {
        Some(chart) => {
            html.push_str(&bar_chart_svg(chart));
            if let Some(text) = view.shap_interpretation.as_deref().filter(|t| !t.is_empty()) {
                html.push_str(&banner(&Banner {
                    tone: Tone::Neutral,
                    title: format!("💡 {text}"),
                    lines: Vec::new(),
                }));
            }
        }
        None => html.push_str(&banner(&Banner {
            tone: Tone::Neutral,
            title: "SHAP explanation unavailable".to_string(),
            lines: Vec::new(),
        })),
    }

    html.push_str("<h3>💡 Interpretation</h3>");
    html.push_str(&banner(&view.interpretation));
    html
}

/// Half-circle gauge
pub fn gauge_svg(gauge: &Gauge) -> String {
    let (cx, cy, r) = (150.0, 140.0, 110.0);
    let point = |v: f64| {
        let angle = std::f64::consts::PI * (1.0 - (v / gauge.axis_max).clamp(0.0, 1.0));
        (cx + r * angle.cos(), cy - r * angle.sin())
    };
    let arc = |from: f64, to: f64, color: &str, width: f64| {
        let (x1, y1) = point(from);
        let (x2, y2) = point(to);
        format!(
            "<path d=\"M {x1:.1} {y1:.1} A {r} {r} 0 0 1 {x2:.1} {y2:.1}\" stroke=\"{color}\" stroke-width=\"{width}\" fill=\"none\"/>"
        )
    };

    let mut svg = String::from("<svg width=\"300\" height=\"180\" role=\"img\" aria-label=\"Default risk (%)\">");
    for step in &gauge.steps {
        svg.push_str(&arc(step.from, step.to, step.color, 30.0));
    }
    svg.push_str(&arc(0.0, gauge.value, gauge.bar_color, 12.0));
    let (tx, ty) = point(gauge.threshold);
    let _ = write!(
        svg,
        "<line x1=\"{cx}\" y1=\"{cy}\" x2=\"{tx:.1}\" y2=\"{ty:.1}\" stroke=\"red\" stroke-width=\"4\"/>\
         <text x=\"{cx}\" y=\"{}\" text-anchor=\"middle\" font-size=\"28\">{:.1}</text></svg>",
        cy + 35.0,
        gauge.value
    );
    svg
}

pub fn bar_chart_svg(chart: &BarChart) -> String {
    let row = 28.0;
    let (label_w, plot_w) = (220.0, 320.0);
    let height = 40.0 + row * chart.bars.len() as f64;
    let max = chart.bars.iter().map(|b| b.value.abs()).fold(0.0_f64, f64::max).max(f64::EPSILON);
    let zero = label_w + plot_w / 2.0;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{height}\" role=\"img\"><text x=\"0\" y=\"18\" font-weight=\"bold\">{}</text>",
        label_w + plot_w + 60.0,
        escape(&chart.title)
    );
    for (i, bar) in chart.bars.iter().enumerate() {
        let y = 30.0 + row * i as f64;
        let w = bar.value.abs() / max * plot_w / 2.0;
        let x = if bar.value < 0.0 { zero - w } else { zero };
        let _ = write!(
            svg,
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"12\">{}</text>\
             <rect x=\"{x:.1}\" y=\"{y:.1}\" width=\"{w:.1}\" height=\"{:.1}\" fill=\"{}\"/>\
             <text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\">{:+.3}</text>",
            label_w - 6.0,
            y + 15.0,
            escape(&bar.label),
            row - 6.0,
            bar.color,
            label_w + plot_w + 4.0,
            y + 15.0,
            bar.value
        );
    }
    let _ = write!(
        svg,
        "<line x1=\"{zero}\" y1=\"26\" x2=\"{zero}\" y2=\"{height}\" stroke=\"#888\"/></svg>"
    );
    svg
}

pub fn histogram_svg(hist: &Histogram) -> String {
    let (w, h, pad) = (360.0, 200.0, 24.0);
    let max = hist.bins.iter().map(|b| b.count).max().unwrap_or(0).max(1) as f64;
    let bar_w = (w - 2.0 * pad) / hist.bins.len().max(1) as f64;

    let mut svg = format!(
        "<svg width=\"{w}\" height=\"{}\" role=\"img\"><text x=\"0\" y=\"16\" font-weight=\"bold\">{}</text>",
        h + 20.0,
        escape(&hist.title)
    );
    for (i, bin) in hist.bins.iter().enumerate() {
        let bh = bin.count as f64 / max * (h - 2.0 * pad);
        let _ = write!(
            svg,
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{bh:.1}\" fill=\"steelblue\"><title>{:.2}-{:.2}: {}</title></rect>",
            pad + bar_w * i as f64,
            h - pad - bh,
            (bar_w - 1.0).max(1.0),
            bin.start,
            bin.end,
            bin.count
        );
    }
    if let Some(marker) = hist.marker {
        let x = pad + marker.clamp(0.0, 1.0) * (w - 2.0 * pad);
        let _ = write!(
            svg,
            "<line x1=\"{x:.1}\" y1=\"{pad}\" x2=\"{x:.1}\" y2=\"{}\" stroke=\"red\" stroke-width=\"2\" stroke-dasharray=\"4\"/>",
            h - pad
        );
    }
    svg.push_str("</svg>");
    svg
}

pub fn scatter_svg(scatter: &Scatter) -> String {
    let (w, h, pad) = (360.0, 220.0, 30.0);
    let (min_x, max_x) = scatter
        .points
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), p| (lo.min(p.x), hi.max(p.x)));
    let span = if max_x > min_x { max_x - min_x } else { 1.0 };

    let mut svg = format!(
        "<svg width=\"{w}\" height=\"{h}\" role=\"img\"><text x=\"0\" y=\"16\" font-weight=\"bold\">{} vs {}</text>",
        escape(&scatter.y_label),
        escape(&scatter.x_label)
    );
    for p in &scatter.points {
        let x = pad + (p.x - min_x) / span * (w - 2.0 * pad);
        let y = h - pad - p.y.clamp(0.0, 1.0) * (h - 2.0 * pad);
        let _ = write!(
            svg,
            "<circle cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"3\" fill=\"{}\" fill-opacity=\"0.6\"><title>{}</title></circle>",
            p.color,
            p.id
        );
    }
    svg.push_str("</svg>");
    svg
}

pub fn pie_svg(pie: &Pie) -> String {
    let (cx, cy, r) = (110.0, 120.0, 80.0);
    let mut svg = format!(
        "<svg width=\"260\" height=\"240\" role=\"img\"><text x=\"0\" y=\"16\" font-weight=\"bold\">{}</text>",
        escape(&pie.title)
    );

    let mut start = 0.0_f64;
    for (i, slice) in pie.slices.iter().filter(|s| s.count > 0).enumerate() {
        let ly = 200.0 + 16.0 * i as f64;
        if slice.share >= 1.0 {
            let _ = write!(svg, "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{r}\" fill=\"{}\"/>", slice.color);
        } else {
            let end = start + slice.share * std::f64::consts::TAU;
            let (x1, y1) = (cx + r * start.sin(), cy - r * start.cos());
            let (x2, y2) = (cx + r * end.sin(), cy - r * end.cos());
            let large = if slice.share > 0.5 { 1 } else { 0 };
            let _ = write!(
                svg,
                "<path d=\"M {cx} {cy} L {x1:.1} {y1:.1} A {r} {r} 0 {large} 1 {x2:.1} {y2:.1} Z\" fill=\"{}\"/>",
                slice.color
            );
            start = end;
        }
        let _ = write!(
            svg,
            "<text x=\"200\" y=\"{ly}\" font-size=\"12\" fill=\"{}\">{} {:.1}%</text>",
            slice.color,
            slice.label,
            slice.share * 100.0
        );
    }
    if pie.slices.is_empty() {
        svg.push_str("<text x=\"60\" y=\"120\">No clients</text>");
    }
    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::charts;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<a href=\"x\">&'"), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }

    #[test]
    fn test_gauge_svg_uses_bar_color() {
        let svg = gauge_svg(&charts::gauge(0.05, 0.09));
        assert!(svg.contains("stroke=\"green\""));
        assert!(svg.contains(">5.0</text>"));
    }

    #[test]
    fn test_unavailable_page() {
        let availability = Availability {
            operational: false,
            status: Some("maintenance".to_string()),
            model: None,
            error: None,
        };
        let html = unavailable_page(&availability, "http://localhost:8000");
        assert!(html.contains("Scoring API not reachable"));
        assert!(html.contains("Reported status: maintenance"));
        assert!(!html.contains("<aside>"));
    }

    #[test]
    fn test_empty_pie_svg() {
        assert!(pie_svg(&charts::decision_pie(&[])).contains("No clients"));
    }
}
