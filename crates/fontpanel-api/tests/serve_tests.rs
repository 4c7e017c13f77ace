//! Serve the panel on a real socket and talk to it over HTTP.

use std::path::PathBuf;

use fontpanel_api::{RouterOptions, serve_with_listener};
use fontpanel_core::{AppState, ConfigProvider, FontEntry, Result};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

#[derive(Clone)]
struct TestConfig {
    root: PathBuf,
}

impl ConfigProvider for TestConfig {
    fn project_name(&self) -> &str {
        "serve-tests"
    }

    fn base_path(&self) -> Result<PathBuf> {
        Ok(self.root.clone())
    }

    fn api_key(&self) -> Option<&str> {
        Some("s3cret")
    }
}

#[tokio::test]
async fn test_serve_lists_fonts_and_shuts_down() {
    let temp = TempDir::new().unwrap();
    let css_dir = temp.path().join("public/css");
    std::fs::create_dir_all(&css_dir).unwrap();
    std::fs::write(
        css_dir.join("user.css"),
        "@font-face { font-family: 'Hand'; src: url('/webfonts/myfonts/hand.ttf'); }\n",
    )
    .unwrap();

    let state = AppState::new(TestConfig {
        root: temp.path().to_path_buf(),
    })
    .unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let server = tokio::spawn(serve_with_listener(
        listener,
        state,
        RouterOptions::default(),
        async move {
            let _ = stop_rx.await;
        },
    ));

    let client = reqwest::Client::new();
    let url = format!("http://{addr}/api/list-fonts");

    let denied = client.get(&url).send().await.unwrap();
    assert_eq!(denied.status(), reqwest::StatusCode::UNAUTHORIZED);

    let fonts: Vec<FontEntry> = client
        .get(&url)
        .bearer_auth("s3cret")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        fonts,
        vec![FontEntry {
            font_family: "Hand".into(),
            file_name: "hand.ttf".into()
        }]
    );

    stop_tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}
