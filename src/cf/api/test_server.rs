//! A throwaway local Cloud Controller for client tests.

use std::thread::{self, JoinHandle};
use std::time::Duration;
use tiny_http::{Header, Response, Server};

/// Serves one canned `(status, warnings, body)` per request, in order, and hands back what
/// each request looked like as `(url, authorization)`. `{base}` in a body is replaced with
/// the server's own URL, so absolute links can point back at it.
pub(crate) fn serve(
    canned: Vec<(u16, &'static str, &'static str)>,
) -> (String, JoinHandle<Vec<(String, String)>>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let base = format!("http://{}", server.server_addr().to_ip().unwrap());
    let server_base = base.clone();
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for (status, warnings, body) in canned {
            let Ok(Some(request)) = server.recv_timeout(Duration::from_secs(10)) else {
                break;
            };
            let authorization = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("Authorization"))
                .map(|h| h.value.as_str().to_string())
                .unwrap_or_default();
            seen.push((request.url().to_string(), authorization));
            let body = body.replace("{base}", &server_base);
            let mut response = Response::from_string(body).with_status_code(status);
            if !warnings.is_empty() {
                response = response.with_header(
                    Header::from_bytes(&b"X-Cf-Warnings"[..], warnings.as_bytes()).unwrap(),
                );
            }
            request.respond(response).unwrap();
        }
        seen
    });
    (base, handle)
}
