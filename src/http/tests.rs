use super::request::{Request, parse_head};
use super::response::Response;
use crate::ServerError;
use http::header::{CONTENT_TYPE, TRANSFER_ENCODING};
use http::{HeaderValue, Method, StatusCode};
use tokio::io::AsyncWriteExt;

fn split_response(raw: &[u8]) -> (String, Vec<u8>) {
    let raw = raw.to_vec();
    let pos = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("no head/body separator");
    let head = String::from_utf8(raw[..pos].to_vec()).unwrap();
    (head, raw[pos + 4..].to_vec())
}

#[test]
fn parse_head_extracts_method_path_and_headers() {
    let raw = b"GET /index HTTP/1.1\r\nHost: localhost\r\nX-Token: abc\r\n\r\n";
    let (head_len, method, path, headers) = parse_head(raw).unwrap().unwrap();

    assert_eq!(head_len, raw.len());
    assert_eq!(method, Method::GET);
    assert_eq!(path, "/index");
    assert_eq!(headers.get("host").unwrap(), "localhost");
    assert_eq!(headers.get("x-token").unwrap(), "abc");
}

#[test]
fn parse_head_partial_input_needs_more_data() {
    let raw = b"GET / HTTP/1.1\r\nHost: loc";
    assert!(parse_head(raw).unwrap().is_none());
}

#[test]
fn parse_head_rejects_garbage() {
    let raw = b"\xff\xfe not http at all\r\n\r\n";
    match parse_head(raw) {
        Err(ServerError::HttpParse(_)) => {}
        other => panic!("expected HttpParse error, got {other:?}"),
    }
}

#[tokio::test]
async fn read_from_parses_request_without_body() {
    let (mut client, mut server) = tokio::io::duplex(1024);
    client
        .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();

    let request = Request::read_from(&mut server, 1024).await.unwrap().unwrap();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path, "/");
    assert!(request.body.is_empty());
    assert!(request.parsed.is_none());
}

#[tokio::test]
async fn read_from_honors_content_length() {
    let (mut client, mut server) = tokio::io::duplex(1024);
    client
        .write_all(b"POST /submit HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\n\r\nhello")
        .await
        .unwrap();

    let request = Request::read_from(&mut server, 1024).await.unwrap().unwrap();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/submit");
    assert_eq!(&request.body[..], b"hello");
}

#[tokio::test]
async fn read_from_handles_request_split_across_reads() {
    let mut mock = tokio_test::io::Builder::new()
        .read(b"POST / HTTP/1.1\r\nContent-Le")
        .read(b"ngth: 4\r\n\r\nbo")
        .read(b"dy")
        .build();

    let request = Request::read_from(&mut mock, 1024).await.unwrap().unwrap();
    assert_eq!(&request.body[..], b"body");
}

#[tokio::test]
async fn read_from_clean_close_yields_no_request() {
    let (client, mut server) = tokio::io::duplex(1024);
    drop(client);

    assert!(Request::read_from(&mut server, 1024).await.unwrap().is_none());
}

#[tokio::test]
async fn read_from_eof_mid_request_is_incomplete() {
    let (mut client, mut server) = tokio::io::duplex(1024);
    client.write_all(b"GET / HTTP/1.1\r\nHost: loc").await.unwrap();
    drop(client);

    match Request::read_from(&mut server, 1024).await {
        Err(ServerError::IncompleteRequest) => {}
        other => panic!("expected IncompleteRequest, got {other:?}"),
    }
}

#[test]
fn encode_chunked_frames_each_write() {
    let mut response = Response::new();
    response.write_head(StatusCode::OK);
    response.set_header(CONTENT_TYPE, HeaderValue::from_static("text/html"));
    response.set_header(TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
    response.write("test");
    response.write("test");
    response.end();

    let wire = response.encode();
    let (head, body) = split_response(&wire);

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(head.to_lowercase().contains("transfer-encoding: chunked"));
    assert!(head.to_lowercase().contains("content-type: text/html"));
    assert_eq!(body, b"4\r\ntest\r\n4\r\ntest\r\n0\r\n\r\n");
}

#[test]
fn encode_skips_empty_chunks() {
    let mut response = Response::new();
    response.set_header(TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
    response.write("a");
    response.write("");
    response.write("b");
    response.end();

    let (_, body) = split_response(&response.encode());
    assert_eq!(body, b"1\r\na\r\n1\r\nb\r\n0\r\n\r\n");
}

#[test]
fn encode_uses_content_length_when_not_chunked() {
    let mut response = Response::new();
    response.send(StatusCode::INTERNAL_SERVER_ERROR, "Server error");

    let wire = response.encode();
    let (head, body) = split_response(&wire);

    assert!(head.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
    assert!(head.to_lowercase().contains("content-length: 12"));
    assert_eq!(body, b"Server error");
}

#[test]
fn encode_always_closes_the_connection() {
    let response = Response::new();
    let (head, _) = split_response(&response.encode());
    assert!(head.to_lowercase().contains("connection: close"));
}

#[test]
fn send_replaces_earlier_writes() {
    let mut response = Response::new();
    response.write("partial output");
    response.send(StatusCode::INTERNAL_SERVER_ERROR, "Server error");

    assert!(response.is_ended());
    assert_eq!(&response.body()[..], b"Server error");
}
