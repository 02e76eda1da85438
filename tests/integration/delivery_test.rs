//! Delivery client tests against a local stub of the GameSense HTTP API.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

use oledsense::core::frame::Frame;
use oledsense::gamesense::{CorePropsLocator, GameSenseClient};
use tempfile::TempDir;

#[derive(Default)]
struct ServerState {
    /// (path, body) per request, in arrival order.
    requests: Vec<(String, String)>,
    /// Number of upcoming /game_event requests to answer with 500.
    fail_game_event: usize,
}

impl ServerState {
    fn count(&self, path: &str) -> usize {
        self.requests.iter().filter(|(p, _)| p == path).count()
    }
}

async fn handle_conn(mut stream: TcpStream, state: Arc<Mutex<ServerState>>) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let (head_end, content_length) = loop {
        match stream.read(&mut chunk).await {
            Ok(0) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
            Err(_) => return,
        }
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..pos]).to_string();
            let len = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())?
                })
                .unwrap_or(0);
            break (pos + 4, len);
        }
    };
    while buf.len() < head_end + content_length {
        match stream.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
            Err(_) => return,
        }
    }

    let head = String::from_utf8_lossy(&buf[..head_end]);
    let path = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("")
        .to_string();
    let body = String::from_utf8_lossy(&buf[head_end..]).to_string();

    let fail = {
        let mut state = state.lock().unwrap();
        state.requests.push((path.clone(), body));
        if path == "/game_event" && state.fail_game_event > 0 {
            state.fail_game_event -= 1;
            true
        } else {
            false
        }
    };

    let response = if fail {
        "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 2\r\nconnection: close\r\n\r\n{}"
    } else {
        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 2\r\nconnection: close\r\n\r\n{}"
    };
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

async fn spawn_stub(state: Arc<Mutex<ServerState>>) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(handle_conn(stream, state.clone()));
        }
    });
    port
}

fn write_core_props(dir: &TempDir, port: u16) -> PathBuf {
    let path = dir.path().join("coreProps.json");
    std::fs::write(&path, format!(r#"{{"address":"127.0.0.1:{}"}}"#, port)).unwrap();
    path
}

fn test_client(props: PathBuf, retry_ms: i64, heartbeat_ms: i64) -> GameSenseClient {
    let locator = CorePropsLocator::with_candidates(vec![props]);
    let mut client = GameSenseClient::new("OLEDSENSE", "OledSense Hardware Monitor", locator);
    client.set_retry_interval(retry_ms);
    client.set_heartbeat_interval(heartbeat_ms);
    client
}

fn frame(line1: &str, line2: &str) -> Frame {
    Frame {
        line1: line1.to_string(),
        line2: line2.to_string(),
    }
}

#[tokio::test]
async fn test_send_failing_twice_attempts_exactly_three_times() {
    let state = Arc::new(Mutex::new(ServerState {
        fail_game_event: 2,
        ..Default::default()
    }));
    let port = spawn_stub(state.clone()).await;
    let dir = TempDir::new().unwrap();
    let client = test_client(write_core_props(&dir, port), 50, 60_000);

    timeout(
        Duration::from_secs(10),
        client.send_frame("PAGE1", &frame("CPU: 43 °C", " ")),
    )
    .await
    .expect("send_frame should eventually succeed");

    let state = state.lock().unwrap();
    assert_eq!(state.count("/game_event"), 3);
}

#[tokio::test]
async fn test_two_sends_within_interval_issue_at_most_one_heartbeat() {
    let state = Arc::new(Mutex::new(ServerState::default()));
    let port = spawn_stub(state.clone()).await;
    let dir = TempDir::new().unwrap();
    let client = test_client(write_core_props(&dir, port), 50, 60_000);

    timeout(Duration::from_secs(10), async {
        client.send_frame("PAGE1", &frame("a", "b")).await;
        client.send_frame("PAGE1", &frame("c", "d")).await;
    })
    .await
    .unwrap();

    let state = state.lock().unwrap();
    assert_eq!(state.count("/game_event"), 2);
    assert!(state.count("/game_heartbeat") <= 1);
}

#[tokio::test]
async fn test_heartbeat_reissued_after_quiet_period() {
    let state = Arc::new(Mutex::new(ServerState::default()));
    let port = spawn_stub(state.clone()).await;
    let dir = TempDir::new().unwrap();
    let client = test_client(write_core_props(&dir, port), 50, 100);

    timeout(Duration::from_secs(10), async {
        client.send_frame("PAGE1", &frame("a", "b")).await;
        tokio::time::sleep(Duration::from_millis(250)).await;
        client.send_frame("PAGE1", &frame("c", "d")).await;
    })
    .await
    .unwrap();

    let state = state.lock().unwrap();
    assert_eq!(state.count("/game_heartbeat"), 2);
}

#[tokio::test]
async fn test_registration_payloads_reach_the_service() {
    let state = Arc::new(Mutex::new(ServerState::default()));
    let port = spawn_stub(state.clone()).await;
    let dir = TempDir::new().unwrap();
    let client = test_client(write_core_props(&dir, port), 50, 60_000);

    timeout(Duration::from_secs(10), async {
        client.register_game_metadata().await;
        client.register_oled_event("PAGE1", 43).await;
    })
    .await
    .unwrap();

    let state = state.lock().unwrap();
    assert_eq!(state.count("/game_metadata"), 1);
    assert_eq!(state.count("/bind_game_event"), 1);

    let (_, metadata_body) = state
        .requests
        .iter()
        .find(|(p, _)| p == "/game_metadata")
        .unwrap();
    assert!(metadata_body.contains("OLEDSENSE"));
    assert!(metadata_body.contains("game_display_name"));

    let (_, bind_body) = state
        .requests
        .iter()
        .find(|(p, _)| p == "/bind_game_event")
        .unwrap();
    assert!(bind_body.contains("PAGE1"));
    assert!(bind_body.contains("screened"));
    assert!(bind_body.contains("context-frame-key"));
}

#[tokio::test]
async fn test_descriptor_change_picked_up_between_retries() {
    // Reserve a port with no listener so the first attempts are refused.
    let dead = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_port = dead.local_addr().unwrap().port();
    drop(dead);

    let dir = TempDir::new().unwrap();
    let props = write_core_props(&dir, dead_port);
    let client = Arc::new(test_client(props.clone(), 50, 60_000));

    let sender = client.clone();
    let send_task =
        tokio::spawn(async move { sender.send_frame("PAGE1", &frame("a", "b")).await });

    // Let a few attempts fail, then point the descriptor at a live stub,
    // as if the engine restarted on a new port.
    tokio::time::sleep(Duration::from_millis(150)).await;
    let state = Arc::new(Mutex::new(ServerState::default()));
    let live_port = spawn_stub(state.clone()).await;
    std::fs::write(
        &props,
        format!(r#"{{"address":"127.0.0.1:{}"}}"#, live_port),
    )
    .unwrap();

    timeout(Duration::from_secs(10), send_task)
        .await
        .expect("delivery should recover once the service is reachable")
        .unwrap();

    let state = state.lock().unwrap();
    assert_eq!(state.count("/game_event"), 1);
}
