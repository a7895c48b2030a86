// src/core/net.rs
// One blocking GET per run; any failure is fatal to the caller.

use std::{io::Read, time::Duration};

use crate::config::consts::MAX_BODY_BYTES;
use crate::error::FetchError;

/// Turns a URL into page text. The runner only sees this trait, so tests
/// can hand it canned HTML.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpFetcher {
    agent: ureq::Agent,
    max_body: u64,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(user_agent)
            .build();
        Self { agent, max_body: MAX_BODY_BYTES }
    }

    /// Bytes of body kept; anything past this is ignored.
    pub fn with_body_limit(mut self, bytes: u64) -> Self {
        self.max_body = bytes;
        self
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let resp = match self.agent.get(url).call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(status, _)) => {
                return Err(FetchError::Status { status, url: s!(url) });
            }
            Err(ureq::Error::Transport(t)) => {
                return Err(FetchError::Transport { url: s!(url), reason: t.to_string() });
            }
        };

        let status = resp.status();
        if !(200..300).contains(&status) {
            return Err(FetchError::Status { status, url: s!(url) });
        }

        // Body is decoded as UTF-8 regardless of the declared charset.
        let mut buf = Vec::new();
        resp.into_reader()
            .take(self.max_body)
            .read_to_end(&mut buf)
            .map_err(|source| FetchError::Body { url: s!(url), source })?;

        logd!("Fetched {} bytes from {}", buf.len(), url);
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one canned response on a loopback port; returns the URL.
    fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            let mut stream = stream;
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
        });
        format!("http://{addr}/list")
    }

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(Duration::from_secs(5), "vpn_scrape-test")
    }

    #[test]
    fn ok_response_returns_body() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 15\r\nConnection: close\r\n\r\n<table></table>",
        );
        assert_eq!(fetcher().fetch(&url).unwrap(), "<table></table>");
    }

    #[test]
    fn non_success_status_is_an_error() {
        let url = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );
        match fetcher().fetch(&url) {
            Err(FetchError::Status { status, url: got }) => {
                assert_eq!(status, 503);
                assert_eq!(got, url);
            }
            other => panic!("expected a status error, got {other:?}"),
        }
    }

    #[test]
    fn body_is_capped() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 10\r\nConnection: close\r\n\r\n0123456789",
        );
        let page = fetcher().with_body_limit(4).fetch(&url).unwrap();
        assert_eq!(page, "0123");
    }

    #[test]
    fn refused_connection_is_a_transport_error() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let err = fetcher().fetch(&format!("http://127.0.0.1:{port}/")).unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }
}
