use std::fs;
use std::path::Path;
use reqwest::blocking::Client;
use thiserror::Error;

pub const LICHESS_HOST: &str = "lichess.org";

// Ask for everything the converter can turn into columns
const ARCHIVE_QUERY: [(&str, &str); 4] = [
    ("tags", "true"),
    ("clocks", "true"),
    ("evals", "true"),
    ("opening", "true"),
];

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Username '{username}' doesn't exist.")]
    UserNotFound {
        username: String,
    },
    #[error("Request for the game archive failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Failed to write the game archive: {0}")]
    Io(#[from] std::io::Error),
}

pub struct LichessClient {
    client: Client,
    base_url: String,
}

impl LichessClient {
    pub fn new(host: &str) -> Result<Self, FetchError> {
        LichessClient::with_base_url(format!("https://{host}"))
    }

    /// `base_url` is scheme plus host, e.g. `http://127.0.0.1:8080`, without a trailing slash.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn archive_url(&self, username: &str) -> String {
        format!("{}/api/games/user/{}", self.base_url, username)
    }

    /// Downloads the full archive for `username` and writes it to `path`.
    ///
    /// Nothing is written unless the server answers with a success status.
    pub fn fetch_archive(&self, username: &str, path: &Path) -> Result<(), FetchError> {
        let url = self.archive_url(username);
        log::info!("Fetching games of {username} from {url}");

        let response = self.client.get(&url).query(&ARCHIVE_QUERY).send()?;

        if !response.status().is_success() {
            log::debug!("{url} answered {}", response.status());
            return Err(FetchError::UserNotFound {
                username: username.to_string(),
            });
        }

        let body = response.bytes()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &body)?;

        log::info!("Wrote {} bytes to {}", body.len(), path.display());
        Ok(())
    }
}

#[test]
fn check_archive_url() {
    let client = LichessClient::new(LICHESS_HOST).unwrap();
    assert_eq!(client.archive_url("alice"), "https://lichess.org/api/games/user/alice");
}

#[test]
fn check_user_not_found_message() {
    let error = FetchError::UserNotFound { username: "nobody".to_string() };
    assert_eq!(error.to_string(), "Username 'nobody' doesn't exist.");
}

// Answers a single request with `status` and `body`, returns the base URL to reach it
#[cfg(test)]
fn serve_once(status: &'static str, body: &'static str) -> String {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();

    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut line = String::new();
        while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
            line.clear();
        }

        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Type: application/x-chess-pgn\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len(),
        ).unwrap();
    });

    format!("http://{address}")
}

#[test]
fn check_fetch_writes_whole_body() {
    let body = "[Event \"Rated Blitz game\"]\n[White \"alice\"]\n\n1. e4 e5 1-0\n";
    let client = LichessClient::with_base_url(serve_once("200 OK", body)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("alice.pgn");

    client.fetch_archive("alice", &path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), body);
}

#[test]
fn check_fetch_unknown_user_writes_nothing() {
    let client = LichessClient::with_base_url(serve_once("404 Not Found", "")).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nobody.pgn");

    let error = client.fetch_archive("nobody", &path).unwrap_err();
    assert!(matches!(&error, FetchError::UserNotFound { username } if username == "nobody"), "{error}");
    assert!(!path.exists());
}
