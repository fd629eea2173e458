use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

const PAGE_PREFIX: &str = "/w/rest.php/v1/page/";

/// Serves `{title, source}` JSON for known titles and 404 for the rest.
pub struct WikiStub {
    pub base_url: String,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl WikiStub {
    pub fn spawn(articles: &[(&str, &str)]) -> Self {
        let articles: HashMap<String, String> = articles
            .iter()
            .map(|(title, source)| ((*title).to_owned(), (*source).to_owned()))
            .collect();

        let server = tiny_http::Server::http("127.0.0.1:0").expect("start wiki stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let url = request.url().to_string();
                let article = url
                    .strip_prefix(PAGE_PREFIX)
                    .and_then(|title| urlencoding::decode(title).ok())
                    .and_then(|title| {
                        let source = articles.get(title.as_ref())?;
                        Some((title.into_owned(), source))
                    });

                let Some((title, source)) = article else {
                    let _ = request.respond(
                        tiny_http::Response::from_string(r#"{"httpCode":404}"#)
                            .with_status_code(404),
                    );
                    continue;
                };

                let body = serde_json::json!({ "title": title, "source": source }).to_string();
                let header = tiny_http::Header::from_bytes("Content-Type", "application/json")
                    .expect("content-type header");
                let _ = request.respond(tiny_http::Response::from_string(body).with_header(header));
            }
        });

        Self {
            base_url,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }
}

impl Drop for WikiStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
