use crate::html::{el, text, Node};
use crate::models::DatasetInfo;
use crate::plot::{PlotKind, KNOWN_KINDS};
use crate::preview::{PreviewTable, PREVIEW_ROW_CAP};
use crate::session::{Banner, BannerKind, Controls, DashboardView, PanelState, PlotPanel};
use crate::stats::{format_stat, StatsSummary};
use tokio::time::Instant;

pub const SELECT_PLACEHOLDER: &str = "Select column...";

pub fn render_index(view: &DashboardView) -> String {
    INDEX_HTML.replace("{{APP}}", &render_app(view).render())
}

/// Everything inside `#app`; the browser swaps this in after each action.
pub fn render_app(view: &DashboardView) -> Node {
    let phase = view.phase;
    let mut dashboard = el("div")
        .id("dashboard")
        .class("dashboard")
        .attr(
            "style",
            if phase.dashboard_visible() { "display: grid;" } else { "display: none;" },
        );

    if let Some(session) = &view.session {
        dashboard = dashboard
            .child(panel("File Information", "fileInfo", render_file_info(&session.info)))
            .child(panel(
                "Visualization",
                "plotPanel",
                el("div")
                    .child(render_controls(Some(&session.info), &view.controls))
                    .child(el("div").id("plotContainer").class("plot-container").child(render_plot(&view.plot)))
                    .into(),
            ))
            .child(panel("Statistics", "statistics", render_statistics(&view.stats)))
            .child(panel("Data Preview", "dataPreview", render_preview(&view.preview)));
    }

    el("div")
        .child(render_banners(&view.banners, view.taken_at))
        .child(
            el("div")
                .id("loading")
                .class("loading")
                .attr(
                    "style",
                    if phase.loading_visible() { "display: block;" } else { "display: none;" },
                )
                .child(el("div").class("spinner"))
                .child(el("p").text("Processing your file...")),
        )
        .child(dashboard)
        .into()
}

fn panel(title: &str, id: &str, body: Node) -> Node {
    el("section")
        .class("card")
        .child(el("h3").text(title))
        .child(el("div").id(id).child(body))
        .into()
}

/// `now` is when the view was taken; each banner carries its remaining
/// lifetime so the page can remove it on time.
pub fn render_banners(banners: &[Banner], now: Instant) -> Node {
    el("div")
        .id("banners")
        .children(banners.iter().map(|banner| {
            let class = match banner.kind {
                BannerKind::Error => "banner error",
                BannerKind::Success => "banner success",
            };
            el("div")
                .class(class)
                .attr("data-banner-id", banner.id.to_string())
                .attr(
                    "data-expires-ms",
                    banner.expires_at.saturating_duration_since(now).as_millis().to_string(),
                )
                .child(el("span").class("banner-text").text(banner.message.clone()))
                .child(
                    el("button")
                        .class("banner-close")
                        .attr("type", "button")
                        .attr("aria-label", "Dismiss")
                        .text("×"),
                )
                .into()
        }))
        .into()
}

pub fn render_file_info(info: &DatasetInfo) -> Node {
    let item = |label: &str, value: String| -> Node {
        el("div")
            .class("info-item")
            .child(el("h4").text(label))
            .child(el("p").text(value))
            .into()
    };

    el("div")
        .child(
            el("div")
                .class("info-grid")
                .child(item("Filename", info.filename.clone()))
                .child(item("Shape", format!("{} rows × {} columns", info.rows(), info.cols())))
                .child(item("Numeric Columns", info.numeric_columns.len().to_string()))
                .child(item("Categorical Columns", info.categorical_columns.len().to_string())),
        )
        .child(
            el("div")
                .class("all-columns")
                .child(el("h4").text("All Columns"))
                .child(
                    el("div").class("chips").children(
                        info.columns
                            .iter()
                            .map(|column| el("span").class("chip").text(column.clone()).into()),
                    ),
                ),
        )
        .into()
}

/// Placeholder plus one option per column, in dataset order.
pub fn column_select(id: &'static str, info: Option<&DatasetInfo>, selected: Option<&str>) -> Node {
    let columns = info.map(|info| info.columns.as_slice()).unwrap_or_default();
    let selected = selected.filter(|value| columns.iter().any(|column| column.as_str() == *value));

    el("select")
        .id(id)
        .attr("name", if id == "xColumn" { "x_col" } else { "y_col" })
        .child(
            el("option")
                .attr("value", "")
                .flag("selected", selected.is_none())
                .text(SELECT_PLACEHOLDER),
        )
        .children(columns.iter().map(|column| {
            el("option")
                .attr("value", column.clone())
                .flag("selected", selected == Some(column.as_str()))
                .text(column.clone())
                .into()
        }))
        .into()
}

pub fn render_controls(info: Option<&DatasetInfo>, controls: &Controls) -> Node {
    let visibility = controls.kind.visibility();
    let display = |shown: bool| if shown { "display: flex;" } else { "display: none;" };

    let mut kinds: Vec<PlotKind> = KNOWN_KINDS.to_vec();
    if matches!(controls.kind, PlotKind::Other(_)) {
        kinds.push(controls.kind.clone());
    }

    el("div")
        .class("controls")
        .child(
            el("div")
                .class("control-group")
                .child(el("label").attr("for", "plotType").text("Plot Type"))
                .child(el("select").id("plotType").attr("name", "type").children(kinds.iter().map(
                    |kind| {
                        el("option")
                            .attr("value", kind.as_str())
                            .flag("selected", *kind == controls.kind)
                            .text(kind.label())
                            .into()
                    },
                ))),
        )
        .child(
            el("div")
                .class("control-group")
                .id("xColumnGroup")
                .attr("style", display(visibility.x))
                .child(el("label").attr("for", "xColumn").text("X Column"))
                .child(column_select("xColumn", info, controls.x_col.as_deref())),
        )
        .child(
            el("div")
                .class("control-group")
                .id("yColumnGroup")
                .attr("style", display(visibility.y))
                .child(el("label").attr("for", "yColumn").text("Y Column"))
                .child(column_select("yColumn", info, controls.y_col.as_deref())),
        )
        .child(
            el("button")
                .id("generatePlot")
                .class("btn")
                .attr("type", "button")
                .text("Generate Plot"),
        )
        .into()
}

fn loading(message: &str) -> Node {
    el("div")
        .class("loading")
        .child(el("div").class("spinner"))
        .child(el("p").text(message))
        .into()
}

fn placeholder(message: &str) -> Node {
    el("p").class("placeholder").text(message).into()
}

fn stat_line(label: &str, value: String) -> Node {
    el("div")
        .text(format!("{label}: "))
        .child(el("span").class("stat-value").text(value))
        .into()
}

pub fn render_statistics(panel: &PanelState<StatsSummary>) -> Node {
    let summary = match panel {
        PanelState::Idle => return placeholder("Statistics will appear after upload"),
        PanelState::Loading => return loading("Loading statistics..."),
        PanelState::Loaded(summary) => summary,
    };

    let mut grid = el("div").class("stats-grid");
    if let Some(sample) = &summary.sample {
        grid = grid.child(
            el("div")
                .class("stat-card")
                .child(el("h4").text(format!("Sample Statistics ({})", sample.column)))
                .child(stat_line("Mean", format_stat(sample.mean)))
                .child(stat_line("Std", format_stat(sample.std))),
        );
    }
    if let Some(total) = summary.missing_total {
        grid = grid.child(
            el("div")
                .class("stat-card")
                .child(el("h4").text("Data Quality"))
                .child(stat_line("Missing Values", total.to_string())),
        );
    }
    if let Some(types) = &summary.column_types {
        grid = grid.child(
            el("div")
                .class("stat-card")
                .child(el("h4").text("Column Types"))
                .child(stat_line("Numeric", types.numeric.to_string()))
                .child(stat_line("Total", types.total.to_string())),
        );
    }
    grid.into()
}

pub fn render_preview(panel: &PanelState<PreviewTable>) -> Node {
    match panel {
        PanelState::Idle => placeholder("Data preview will appear after upload"),
        PanelState::Loading => loading("Loading data preview..."),
        PanelState::Loaded(table) if table.is_empty() => placeholder("No data to display"),
        PanelState::Loaded(table) => preview_table(table),
    }
}

fn preview_table(table: &PreviewTable) -> Node {
    let header_row = el("tr").children(
        table
            .headers
            .iter()
            .map(|header| el("th").text(header.clone()).into()),
    );
    let body = el("tbody").children(table.rows.iter().map(|row| {
        el("tr")
            .children(row.iter().map(|cell| el("td").text(cell.clone()).into()))
            .into()
    }));

    el("div")
        .child(el("div").class("preview-caption").text(format!(
            "Showing first {PREVIEW_ROW_CAP} rows of {} total rows",
            table.total_rows
        )))
        .child(
            el("div").class("table-scroll").child(
                el("table")
                    .class("data-table")
                    .child(el("thead").child(header_row))
                    .child(body),
            ),
        )
        .into()
}

pub fn render_plot(panel: &PlotPanel) -> Node {
    match panel {
        PlotPanel::Placeholder => placeholder("Choose a plot type and click Generate Plot"),
        PlotPanel::Generating => loading("Generating plot..."),
        PlotPanel::Image(data) => el("img")
            .attr("src", format!("data:image/png;base64,{data}"))
            .attr("alt", "Generated Plot")
            .into(),
        PlotPanel::Error(message) => el("p").class("error").child(text(message.clone())).into(),
        PlotPanel::NoImage => placeholder("Failed to generate plot"),
    }
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Data Dashboard</title>
  <style>
    :root {
      --bg-1: #eef1fb;
      --bg-2: #d9defa;
      --ink: #24263a;
      --accent: #667eea;
      --accent-2: #764ba2;
      --card: rgba(255, 255, 255, 0.92);
      --shadow: 0 18px 48px rgba(54, 61, 120, 0.16);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(135deg, var(--bg-1), var(--bg-2));
      color: var(--ink);
      font-family: "Segoe UI", "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    .container {
      width: min(1200px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    header h1 {
      margin: 0;
      font-size: clamp(1.8rem, 3vw, 2.4rem);
    }

    header p {
      margin: 6px 0 0;
      color: #5f6075;
    }

    .upload-box {
      background: white;
      border: 2px dashed #ddd;
      border-radius: 20px;
      padding: 40px 24px;
      text-align: center;
      cursor: pointer;
      transition: border-color 150ms ease, background-color 150ms ease;
    }

    .upload-box.dragging {
      border-color: var(--accent);
      background-color: #f8f9ff;
    }

    .upload-box input {
      display: none;
    }

    .btn {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 20px;
      font-weight: 600;
      cursor: pointer;
      color: white;
      background: linear-gradient(135deg, var(--accent), var(--accent-2));
    }

    .banner {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
      padding: 12px 16px;
      border-radius: 12px;
      margin-bottom: 10px;
    }

    .banner.error {
      background: #fde8e8;
      color: #9b1c1c;
    }

    .banner.success {
      background: #e3f9e5;
      color: #1f6f2c;
    }

    .banner-close {
      border: none;
      background: transparent;
      font-size: 1.2rem;
      cursor: pointer;
      color: inherit;
    }

    .loading {
      text-align: center;
      padding: 24px;
      color: #5f6075;
    }

    .spinner {
      width: 36px;
      height: 36px;
      margin: 0 auto 12px;
      border: 4px solid #e0e3f5;
      border-top-color: var(--accent);
      border-radius: 50%;
      animation: spin 900ms linear infinite;
    }

    .dashboard {
      grid-template-columns: repeat(auto-fit, minmax(420px, 1fr));
      gap: 24px;
    }

    .card {
      background: var(--card);
      border-radius: 20px;
      box-shadow: var(--shadow);
      padding: 24px;
      overflow: hidden;
    }

    .card h3 {
      margin-top: 0;
    }

    .info-grid,
    .stats-grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 14px;
    }

    .info-item,
    .stat-card {
      background: #f7f8fd;
      border-radius: 14px;
      padding: 14px;
    }

    .info-item h4,
    .stat-card h4 {
      margin: 0 0 8px;
      font-size: 0.9rem;
      color: #6b6e8a;
    }

    .info-item p {
      margin: 0;
      font-weight: 600;
    }

    .stat-value {
      font-weight: 700;
      color: var(--accent-2);
    }

    .all-columns {
      margin-top: 20px;
    }

    .chips {
      display: flex;
      flex-wrap: wrap;
      gap: 8px;
      margin-top: 10px;
    }

    .chip {
      background: #e9ecef;
      padding: 4px 8px;
      border-radius: 4px;
      font-size: 0.9rem;
    }

    .controls {
      display: flex;
      flex-wrap: wrap;
      align-items: flex-end;
      gap: 14px;
      margin-bottom: 18px;
    }

    .control-group {
      flex-direction: column;
      gap: 6px;
    }

    .control-group select {
      padding: 8px 10px;
      border-radius: 8px;
      border: 1px solid #d5d8ea;
      min-width: 160px;
    }

    .plot-container {
      min-height: 240px;
      display: grid;
      place-items: center;
    }

    .plot-container img {
      max-width: 100%;
      border-radius: 12px;
    }

    .placeholder {
      color: #8b8ea5;
    }

    p.error {
      color: #9b1c1c;
    }

    .preview-caption {
      margin-bottom: 10px;
      color: #666;
    }

    .table-scroll {
      overflow: auto;
      max-height: 420px;
    }

    .data-table {
      border-collapse: collapse;
      width: 100%;
      font-size: 0.9rem;
    }

    .data-table th,
    .data-table td {
      border-bottom: 1px solid #eceef6;
      padding: 6px 10px;
      text-align: left;
      white-space: nowrap;
    }

    .data-table th {
      position: sticky;
      top: 0;
      background: #f7f8fd;
    }

    @keyframes spin {
      to {
        transform: rotate(360deg);
      }
    }
  </style>
</head>
<body>
  <main class="container">
    <header>
      <h1>Data Analysis Dashboard</h1>
      <p>Upload a CSV, Excel or JSON file to explore it.</p>
    </header>

    <label class="upload-box" id="uploadBox">
      <input type="file" id="fileInput" accept=".csv,.xlsx,.xls,.json" />
      <strong>Drop a file here or click to choose one</strong>
      <p>CSV, XLSX, XLS or JSON</p>
    </label>

    <div id="app">{{APP}}</div>
  </main>

  <script>
    const app = document.getElementById('app');
    const uploadBox = document.getElementById('uploadBox');
    const fileInput = document.getElementById('fileInput');

    const armBanners = () => {
      app.querySelectorAll('.banner[data-expires-ms]').forEach((banner) => {
        if (banner.dataset.armed) {
          return;
        }
        banner.dataset.armed = '1';
        setTimeout(() => banner.remove(), Number(banner.dataset.expiresMs));
      });
    };

    const swap = async (request) => {
      try {
        const res = await request;
        const body = await res.text();
        if (!res.ok) {
          throw new Error(body || 'Request failed');
        }
        app.innerHTML = body;
        armBanners();
      } catch (err) {
        console.error('Error:', err);
      }
    };

    const showLoading = () => {
      const loading = document.getElementById('loading');
      const dashboard = document.getElementById('dashboard');
      if (loading) loading.style.display = 'block';
      if (dashboard) dashboard.style.display = 'none';
    };

    const upload = (files, source) => {
      if (!files || files.length === 0) {
        return;
      }
      const form = new FormData();
      form.append('source', source);
      Array.from(files).forEach((file) => form.append('file', file));
      showLoading();
      swap(fetch('/ui/upload', { method: 'POST', body: form }));
    };

    const controlQuery = () => {
      const params = new URLSearchParams();
      params.set('type', document.getElementById('plotType').value);
      const x = document.getElementById('xColumn').value;
      const y = document.getElementById('yColumn').value;
      if (x) params.set('x_col', x);
      if (y) params.set('y_col', y);
      return params.toString();
    };

    fileInput.addEventListener('change', (event) => {
      upload(event.target.files, 'picker');
      event.target.value = '';
    });

    uploadBox.addEventListener('dragover', (event) => {
      event.preventDefault();
      uploadBox.classList.add('dragging');
    });

    uploadBox.addEventListener('dragleave', (event) => {
      event.preventDefault();
      uploadBox.classList.remove('dragging');
    });

    uploadBox.addEventListener('drop', (event) => {
      event.preventDefault();
      uploadBox.classList.remove('dragging');
      upload(event.dataTransfer.files, 'drop');
    });

    app.addEventListener('click', (event) => {
      const close = event.target.closest('.banner-close');
      if (close) {
        const id = close.closest('.banner').dataset.bannerId;
        swap(fetch(`/ui/banners/${id}/dismiss`, { method: 'POST' }));
        return;
      }
      if (event.target.closest('#generatePlot')) {
        const container = document.getElementById('plotContainer');
        container.innerHTML = '<div class="loading"><div class="spinner"></div><p>Generating plot...</p></div>';
        swap(fetch(`/ui/plot?${controlQuery()}`));
      }
    });

    app.addEventListener('change', (event) => {
      if (event.target.id === 'plotType') {
        swap(fetch(`/ui/controls?${controlQuery()}`));
      }
    });

    armBanners();
  </script>
</body>
</html>
"#;
