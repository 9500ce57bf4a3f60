use axum::{
    extract::{Multipart, Query},
    routing::{get, post},
    Json, Router,
};
use once_cell::sync::Lazy;
use reqwest::{multipart, Client};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));
static BACKEND_URL: Lazy<String> = Lazy::new(spawn_fake_backend);

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct PlotQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
    x_col: Option<String>,
}

async fn fake_upload(mut multipart: Multipart) -> Json<Value> {
    let mut filename = None;
    while let Some(field) = multipart.next_field().await.unwrap() {
        if field.name() == Some("file") {
            filename = field.file_name().map(str::to_string);
            let _ = field.bytes().await.unwrap();
        }
    }
    let Some(filename) = filename else {
        return Json(json!({"error": "No file selected"}));
    };
    if filename.ends_with(".json") {
        return Json(json!({"error": "Failed to load file"}));
    }
    Json(json!({
        "success": true,
        "info": {
            "filename": filename,
            "shape": [3, 3],
            "columns": ["name", "age", "score"],
            "dtypes": {"name": "object", "age": "int64", "score": "float64"},
            "numeric_columns": ["age", "score"],
            "categorical_columns": ["name"]
        }
    }))
}

async fn fake_stats() -> Json<Value> {
    Json(json!({
        "basic_stats": {
            "age": {"count": 3.0, "mean": 30.0, "std": 5.0},
            "score": {"count": 2.0, "mean": 7.25, "std": 1.0}
        },
        "missing_values": {"name": 0, "age": 0, "score": 1},
        "data_types": {"name": "object", "age": "int64", "score": "float64"}
    }))
}

async fn fake_data() -> Json<Value> {
    Json(json!({
        "data": [
            {"name": "Ann", "age": 25, "score": 7.5},
            {"name": "Bob", "age": 30, "score": null},
            {"name": "<Cy>", "age": 35, "score": 7.0}
        ],
        "total_rows": 3
    }))
}

async fn fake_plot(Query(query): Query<PlotQuery>) -> Json<Value> {
    match (query.kind.as_deref(), query.x_col.as_deref()) {
        (Some("correlation"), _) => Json(json!({"plot": "iVBORw0KGgo"})),
        (_, Some(_)) => Json(json!({"plot": "iVBORhist"})),
        _ => Json(json!({"error": "Failed to generate plot"})),
    }
}

fn spawn_fake_backend() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind backend port");
    let port = listener.local_addr().unwrap().port();
    listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("backend runtime");
        runtime.block_on(async move {
            let app = Router::new()
                .route("/upload", post(fake_upload))
                .route("/stats", get(fake_stats))
                .route("/data", get(fake_data))
                .route("/plot", get(fake_plot));
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    format!("http://127.0.0.1:{port}")
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/healthz")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_data_dashboard"))
        .env("PORT", port.to_string())
        .env("DASHBOARD_BACKEND_URL", BACKEND_URL.as_str())
        .env("DASHBOARD_BANNER_SECS", "60")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

fn file_part(name: &str) -> multipart::Part {
    multipart::Part::bytes(b"name,age,score\nAnn,25,7.5\n".to_vec()).file_name(name.to_string())
}

async fn upload(server: &TestServer, source: &str, names: &[&str]) -> String {
    let mut form = multipart::Form::new().text("source", source.to_string());
    for name in names {
        form = form.part("file", file_part(name));
    }
    let response = Client::new()
        .post(format!("{}/ui/upload", server.base_url))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    response.text().await.unwrap()
}

async fn get_text(server: &TestServer, path: &str) -> String {
    let response = Client::new()
        .get(format!("{}{path}", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    response.text().await.unwrap()
}

fn banner_ids(fragment: &str) -> Vec<u64> {
    fragment
        .split("data-banner-id=\"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next()?.parse().ok())
        .collect()
}

#[tokio::test]
async fn http_index_serves_page() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let page = get_text(&server, "/").await;
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains(r#"id="uploadBox""#));
    assert!(page.contains(r#"<div id="app">"#));
}

#[tokio::test]
async fn http_upload_renders_every_panel() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let fragment = upload(&server, "picker", &["people.csv"]).await;

    assert!(fragment.contains("Loaded people.csv"));
    assert!(fragment.contains(r#"id="dashboard" class="dashboard" style="display: grid;""#));
    assert!(fragment.contains("3 rows × 3 columns"));
    assert_eq!(fragment.matches(r#"<span class="chip">"#).count(), 3);
    assert!(fragment.contains(r#"<option value="age" selected="selected">age</option>"#));
    assert!(fragment.contains(r#"<option value="score" selected="selected">score</option>"#));
    assert!(fragment.contains("Sample Statistics (age)"));
    assert!(fragment.contains(r#"Missing Values: <span class="stat-value">1</span>"#));
    assert!(fragment.contains("<th>name</th><th>age</th><th>score</th>"));
    assert!(fragment.contains("<td>Bob</td><td>30</td><td></td>"));
    assert!(fragment.contains("<td>&lt;Cy&gt;</td>"));
    assert!(fragment.contains("Showing first 100 rows of 3 total rows"));
}

#[tokio::test]
async fn http_drop_uses_first_file() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let fragment = upload(&server, "drop", &["first.csv", "second.csv"]).await;
    assert!(fragment.contains("Loaded first.csv"));
    assert!(!fragment.contains("second.csv"));
}

#[tokio::test]
async fn http_backend_error_hides_dashboard() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let fragment = upload(&server, "picker", &["broken.json"]).await;
    assert!(fragment.contains(r#"<span class="banner-text">Failed to load file</span>"#));
    assert!(fragment.contains(r#"id="dashboard" class="dashboard" style="display: none;""#));
    assert!(fragment.contains(r#"id="loading" class="loading" style="display: none;""#));
}

#[tokio::test]
async fn http_unsupported_extension_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let fragment = upload(&server, "picker", &["notes.txt"]).await;
    assert!(fragment.contains(r#"<span class="banner-text">Invalid file format</span>"#));
}

#[tokio::test]
async fn http_correlation_plot_renders_image() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    upload(&server, "picker", &["people.csv"]).await;

    let fragment = get_text(&server, "/ui/plot?type=correlation").await;
    assert!(fragment.contains(
        r#"<img src="data:image/png;base64,iVBORw0KGgo" alt="Generated Plot">"#
    ));
    assert!(fragment.contains(r#"id="xColumnGroup" style="display: none;""#));
}

#[tokio::test]
async fn http_plot_error_is_inline() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    upload(&server, "picker", &["people.csv"]).await;

    let fragment = get_text(&server, "/ui/plot?type=histogram").await;
    assert!(fragment.contains(r#"<p class="error">Failed to generate plot</p>"#));
}

#[tokio::test]
async fn http_scatter_controls_show_both_selectors() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    upload(&server, "picker", &["people.csv"]).await;

    let fragment = get_text(&server, "/ui/controls?type=scatter&x_col=age&y_col=score").await;
    assert!(fragment.contains(r#"id="xColumnGroup" style="display: flex;""#));
    assert!(fragment.contains(r#"id="yColumnGroup" style="display: flex;""#));
}

#[tokio::test]
async fn http_banner_can_be_dismissed() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let fragment = upload(&server, "picker", &["people.csv"]).await;
    let ids = banner_ids(&fragment);
    let newest = *ids.first().expect("banner present");

    let response = Client::new()
        .post(format!("{}/ui/banners/{newest}/dismiss", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let fragment = response.text().await.unwrap();
    assert!(!banner_ids(&fragment).contains(&newest));
}

#[tokio::test]
async fn http_bad_upload_source_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;

    let form = multipart::Form::new()
        .text("source", "clipboard")
        .part("file", file_part("people.csv"));
    let response = Client::new()
        .post(format!("{}/ui/upload", server.base_url))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}
