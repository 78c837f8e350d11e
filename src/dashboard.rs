//! The dashboard: loaded records plus their summary, and the static page
//! rendered from them.

use serde::Serialize;
use tracing::{error, info};

use crate::config::DashboardConfig;
use crate::loader::load_records;
use crate::map::markers;
use crate::record::ParkingRecord;
use crate::summary::{DurationBucket, SummaryView, aggregate_in};

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const SLICE_COLORS: [&str; 4] = ["#4ade80", "#60a5fa", "#facc15", "#f87171"];

/// Records and the summary derived from them. Never mutated after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dashboard {
    pub records: Vec<ParkingRecord>,
    pub summary: Option<SummaryView>,
}

impl Dashboard {
    pub fn from_records(records: Vec<ParkingRecord>, cfg: &DashboardConfig) -> Self {
        let summary = aggregate_in(&records, cfg.zone);
        Self { records, summary }
    }

    /// Runs the single load-then-aggregate cycle for `cfg.source`.
    ///
    /// A load failure is logged once and yields the empty dashboard.
    pub async fn load(cfg: &DashboardConfig) -> Self {
        match load_records(&cfg.source).await {
            Ok(records) => {
                let dashboard = Self::from_records(records, cfg);
                info!(
                    total = dashboard.records.len(),
                    has_summary = dashboard.summary.is_some(),
                    "Dashboard ready"
                );
                dashboard
            }
            Err(e) => {
                error!(source = %cfg.source, error = %e, "Failed to load parking data");
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Escapes text for HTML element and attribute content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Formats a number the way the table shows it: integers without a fraction,
/// NaN as `NaN`.
fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn card(title: &str, value: &str) -> String {
    format!(
        "<div class=\"card\"><div class=\"card-title\">{}</div><div class=\"card-value\">{}</div></div>\n",
        escape_html(title),
        escape_html(value)
    )
}

/// Horizontal bar list; each row is scaled against the largest count.
fn bar_chart(title: &str, rows: &[(String, usize)], color: &str) -> String {
    let max = rows.iter().map(|(_, c)| *c).max().unwrap_or(0).max(1);

    let mut html = format!("<div class=\"panel\"><h2>{}</h2>\n<div class=\"bars\">\n", escape_html(title));
    for (label, count) in rows {
        let width = (*count as f64 / max as f64) * 100.0;
        html.push_str(&format!(
            "<div class=\"bar-row\"><span class=\"bar-label\">{}</span>\
             <span class=\"bar\" style=\"width:{width:.1}%;background:{color}\"></span>\
             <span class=\"bar-count\">{count}</span></div>\n",
            escape_html(label)
        ));
    }
    html.push_str("</div></div>\n");
    html
}

fn records_table(records: &[ParkingRecord]) -> String {
    let mut html = String::from(
        "<div class=\"panel\"><h2>CSV Data</h2>\n<table class=\"data-table\">\n\
         <thead><tr><th>bay_id</th><th>license_plate</th><th>arrival_time</th><th>duration (s)</th></tr></thead>\n<tbody>\n",
    );
    for r in records {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&r.bay_id),
            escape_html(r.license_plate.as_deref().unwrap_or("")),
            escape_html(r.arrival_time.as_deref().unwrap_or("")),
            format_number(r.duration_seconds)
        ));
    }
    html.push_str("</tbody></table></div>\n");
    html
}

fn map_panel(dashboard: &Dashboard, cfg: &DashboardConfig) -> String {
    // serde_json writes NaN coordinates as null; the script skips those
    let markers_json = serde_json::to_string(&markers(&dashboard.records))
        .unwrap_or_else(|_| "[]".to_string())
        .replace('<', "\\u003c");
    let (lat, lon) = cfg.map_center;

    format!(
        r#"<div class="panel"><h2>Parking Lot Map</h2>
<div id="map" style="height:400px"></div></div>
<script src="{LEAFLET_JS}"></script>
<script>
const markers = {markers_json};
const map = L.map("map").setView([{lat}, {lon}], {zoom});
L.tileLayer("{TILE_URL}", {{ maxZoom: 19 }}).addTo(map);
for (const m of markers) {{
  if (m.latitude === null || m.longitude === null) continue;
  const label = document.createElement("div");
  for (const line of [m.bay_id, m.license_plate ?? "", (m.duration_seconds ?? "NaN") + "s"]) {{
    const span = document.createElement("div");
    span.textContent = line;
    label.appendChild(span);
  }}
  L.circleMarker([m.latitude, m.longitude], {{
    radius: 3, fillColor: m.color, color: "none", fillOpacity: 0.8
  }}).bindTooltip(label).addTo(map);
}}
</script>
"#,
        zoom = cfg.map_zoom,
    )
}

const STYLE: &str = "body{font-family:sans-serif;margin:0;background:#f8fafc}\
.container{max-width:1100px;margin:0 auto;padding:1rem}\
.cards{display:flex;gap:1rem}.card{flex:1;background:#fff;border-radius:8px;padding:1rem}\
.card-title{color:#64748b}.card-value{font-size:2rem;font-weight:bold}\
.grid{display:grid;grid-template-columns:1fr 1fr;gap:1rem}\
.panel{background:#fff;border-radius:8px;padding:1rem;margin-top:1rem}\
.bar-row{display:flex;align-items:center;gap:.5rem;margin:2px 0}\
.bar-label{width:9rem;text-align:right;font-size:.85rem}.bar{height:14px;display:inline-block}\
.bar-count{font-size:.8rem;color:#475569}\
.data-table{border-collapse:collapse;width:100%}.data-table td,.data-table th{border:1px solid #e2e8f0;padding:4px}";

/// Renders the whole dashboard as one self-contained HTML page.
pub fn render_html(dashboard: &Dashboard, cfg: &DashboardConfig) -> String {
    let mut html = format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Parking Data Dashboard</title>\n\
         <link rel=\"stylesheet\" href=\"{LEAFLET_CSS}\">\n<style>{STYLE}</style></head>\n\
         <body><div class=\"container\">\n"
    );

    if dashboard.is_empty() {
        html.push_str("<h1>No parking data</h1>\n");
    } else {
        html.push_str("<h1>Parking Data Dashboard</h1>\n");
    }

    let summary = dashboard.summary.as_ref();

    html.push_str("<div class=\"cards\">\n");
    html.push_str(&card("Total Parked Cars", &summary.map_or(0, |s| s.total).to_string()));
    html.push_str(&card(
        "Average Duration (s)",
        &summary.map_or_else(|| "-".to_string(), |s| s.avg.to_string()),
    ));
    html.push_str(&card("Invalid Plates", &summary.map_or(0, |s| s.invalid).to_string()));
    html.push_str("</div>\n");

    let daily: Vec<(String, usize)> = summary
        .map(|s| s.daily.iter().map(|d| (d.day.clone(), d.count)).collect())
        .unwrap_or_default();
    let breakdown: Vec<(String, usize)> = summary
        .map(|s| {
            DurationBucket::ALL
                .iter()
                .map(|b| (b.label().to_string(), s.bucket_count(*b)))
                .collect()
        })
        .unwrap_or_default();
    let hourly: Vec<(String, usize)> = summary
        .map(|s| {
            s.hourly
                .iter()
                .map(|h| (format!("{}:00", h.hour), h.count))
                .collect()
        })
        .unwrap_or_default();
    let bays: Vec<(String, usize)> = summary
        .map(|s| s.bay_usage.iter().map(|b| (b.bay_id.clone(), b.count)).collect())
        .unwrap_or_default();

    html.push_str("<div class=\"grid\">\n");
    html.push_str(&bar_chart("Sessions by Day", &daily, "#75b0eb"));
    html.push_str(&bar_chart("Duration Breakdown", &breakdown, SLICE_COLORS[1]));
    html.push_str("</div>\n");
    html.push_str(&bar_chart("Peak Times (Arrivals by Hour)", &hourly, SLICE_COLORS[3]));
    html.push_str(&bar_chart("Bay Utilisation", &bays, SLICE_COLORS[0]));
    html.push_str(&map_panel(dashboard, cfg));
    html.push_str(&records_table(&dashboard.records));

    html.push_str("</div></body></html>\n");
    html
}
