//! Development server for the webshell demo page
//!
//! Serves `index.html` and the `wasm-pack` output under `pkg/` from a root
//! directory: `serve [port] [root]`.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tiny_http::{Header, Response, Server};

const DEFAULT_PORT: u16 = 8080;

fn main() {
    let mut args = std::env::args().skip(1);
    let port = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let root = PathBuf::from(args.next().unwrap_or_else(|| ".".to_string()));

    let addr = format!("0.0.0.0:{}", port);
    let server = match Server::http(&addr) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("[serve] Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    println!("[serve] webshell demo on http://localhost:{} (root {})", port, root.display());

    for request in server.incoming_requests() {
        let response = match resolve(&root, request.url()) {
            Some(path) => serve_file(&path),
            None => not_found(),
        };
        let _ = request.respond(response);
    }
}

/// Map a request URL to a file under `root`; rejects `..` segments
fn resolve(root: &Path, url: &str) -> Option<PathBuf> {
    let path = url.split(['?', '#']).next().unwrap_or("/");
    let relative = match path.trim_start_matches('/') {
        "" => "index.html",
        rest => rest,
    };
    if relative.split('/').any(|segment| segment == "..") {
        return None;
    }
    Some(root.join(relative))
}

fn serve_file(path: &Path) -> Response<Cursor<Vec<u8>>> {
    match fs::read(path) {
        Ok(contents) => {
            let response = Response::from_data(contents);
            match Header::from_bytes("Content-Type", mime_type(path)) {
                Ok(header) => response.with_header(header),
                Err(_) => response,
            }
        }
        Err(_) => not_found(),
    }
}

fn not_found() -> Response<Cursor<Vec<u8>>> {
    Response::from_string("404 Not Found").with_status_code(404)
}

fn mime_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "application/javascript",
        Some("wasm") => "application/wasm",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_index() {
        let root = Path::new("site");
        assert_eq!(resolve(root, "/"), Some(root.join("index.html")));
        assert_eq!(resolve(root, "/?v=2"), Some(root.join("index.html")));
    }

    #[test]
    fn test_resolve_rejects_parent() {
        assert_eq!(resolve(Path::new("."), "/../secret"), None);
        assert_eq!(resolve(Path::new("."), "/pkg/../../x"), None);
    }

    #[test]
    fn test_mime_type() {
        assert_eq!(mime_type(Path::new("pkg/webshell_bg.wasm")), "application/wasm");
        assert_eq!(mime_type(Path::new("README")), "application/octet-stream");
    }
}
