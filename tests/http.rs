use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct WaterSummary {
    total_ml: u32,
    percent: u32,
    entries: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct WeightEntry {
    date: String,
    weight: f64,
}

#[derive(Debug, Deserialize)]
struct WeightSummary {
    display_weight: Option<f64>,
    entries: Vec<WeightEntry>,
}

struct TestServer {
    base_url: String,
    data_dir: PathBuf,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        let _ = std::fs::remove_dir_all(&self.data_dir);
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

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

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_dir() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("wellness_http_{}_{}", std::process::id(), nanos));
    path
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/dashboard")).send().await {
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
    let data_dir = unique_data_dir();
    let child = Command::new(env!("CARGO_BIN_EXE_wellness_tracker"))
        .env("PORT", port.to_string())
        .env("WELLNESS_DATA_DIR", &data_dir)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        data_dir,
        child,
    }
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

#[tokio::test]
async fn http_water_totals_and_goal_percent() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    for (time, amount) in [("08:00", 250), ("12:30", 250), ("18:15", 500)] {
        let response = client
            .post(format!("{}/api/water", server.base_url))
            .json(&serde_json::json!({ "amount": amount, "time": format!("2024-02-12T{time}:00") }))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    let summary: WaterSummary = client
        .get(format!("{}/api/water?date=2024-02-12", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(summary.total_ml, 1000);
    assert_eq!(summary.percent, 40);
    assert_eq!(summary.entries.len(), 3);
}

#[tokio::test]
async fn http_sleep_overnight_duration() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let summary: serde_json::Value = client
        .post(format!("{}/api/sleep", server.base_url))
        .json(&serde_json::json!({
            "date": "2024-02-13",
            "bed_time": "23:00",
            "wake_time": "07:00",
            "quality": 4
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(summary["entry"]["duration"], 480);
    assert_eq!(summary["entry_duration"], "8h 0m");
}

#[tokio::test]
async fn http_journal_same_day_save_replaces() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    for content in ["morning pages", "evening reflection"] {
        let response = client
            .post(format!("{}/api/mental", server.base_url))
            .json(&serde_json::json!({
                "date": "2024-02-14",
                "content": content,
                "mood": 4,
                "tags": ["Focus"]
            }))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    let journal: serde_json::Value = client
        .get(format!("{}/api/mental?date=2024-02-14", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(journal["entry"]["content"], "evening reflection");
    assert_eq!(journal["entry"]["tags"][0], "focus");
    let same_day = journal["entries"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|entry| entry["date"] == "2024-02-14")
        .count();
    assert_eq!(same_day, 1);
}

#[tokio::test]
async fn http_weight_round_trip_and_validation() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let rejected = client
        .post(format!("{}/api/weight", server.base_url))
        .json(&serde_json::json!({ "date": "2024-02-15", "weight": -3.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status(), reqwest::StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("{}/api/weight", server.base_url))
        .json(&serde_json::json!({ "date": "2024-02-15", "weight": 72.4 }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let summary: WeightSummary = client
        .get(format!("{}/api/weight?date=2024-02-15", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(summary.display_weight, Some(72.4));
    let stored: Vec<&WeightEntry> = summary.entries.iter().filter(|e| e.date == "2024-02-15").collect();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].weight, 72.4);
}

#[tokio::test]
async fn http_malformed_file_loads_empty() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    std::fs::create_dir_all(&server.data_dir).unwrap();
    std::fs::write(server.data_dir.join("mood.json"), "{not json").unwrap();

    let response = client
        .get(format!("{}/api/mood?date=2024-02-16", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let mood: serde_json::Value = response.json().await.unwrap();
    assert_eq!(mood["entries"].as_array().unwrap().len(), 0);
    assert!(mood["entry"].is_null());
}

#[tokio::test]
async fn http_index_renders_dashboard() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let page = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(page.contains("Wellness Tracker"));
    assert!(!page.contains("{{"));
}
