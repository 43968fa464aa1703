use super::*;
use crate::args::{HttpMethod, PositiveU64};
use crate::domain::RunConfig;
use std::future::Future;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

type Captured = Arc<Mutex<Vec<String>>>;

/// What the test server does after reading a request.
#[derive(Clone, Copy)]
enum Reply {
    /// Write the response and close the connection.
    Close(&'static str),
    /// Write the response, then keep the socket open without sending more.
    Stall(&'static str),
    /// Never answer.
    Silent,
}

/// Serves `response` to every connection and records each raw request.
/// With `response == None` the server reads the request and never answers.
fn spawn_server(response: Option<&'static str>) -> Result<(String, Captured), String> {
    spawn_server_with(response.map_or(Reply::Silent, Reply::Close))
}

fn spawn_server_with(reply: Reply) -> Result<(String, Captured), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&captured);

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { break };
            let sink = Arc::clone(&sink);
            thread::spawn(move || handle_client(stream, reply, &sink));
        }
    });

    Ok((format!("http://{}", addr), captured))
}

fn handle_client(mut stream: TcpStream, reply: Reply, sink: &Captured) {
    let request = read_request(&mut stream);
    if let Ok(mut requests) = sink.lock() {
        requests.push(request);
    }
    let (response, stall) = match reply {
        Reply::Close(response) => (response, false),
        Reply::Stall(response) => (response, true),
        Reply::Silent => {
            thread::sleep(Duration::from_secs(5));
            return;
        }
    };
    if stream.write_all(response.as_bytes()).is_err() {
        return;
    }
    drop(stream.flush());
    if stall {
        thread::sleep(Duration::from_secs(5));
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

fn read_request(stream: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut buffer = [0u8; 1024];
    loop {
        let Ok(read) = stream.read(&mut buffer) else {
            break;
        };
        if read == 0 {
            break;
        }
        data.extend_from_slice(buffer.get(..read).unwrap_or_default());
        let text = String::from_utf8_lossy(&data);
        if let Some((head, body)) = text.split_once("\r\n\r\n") {
            let expected = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if body.len() >= expected {
                break;
            }
        }
    }
    String::from_utf8_lossy(&data).into_owned()
}

fn config_for(url: &str, method: HttpMethod, body: &str) -> Result<RunConfig, String> {
    Ok(RunConfig {
        rps: PositiveU64::try_from(1).map_err(|err| err.to_string())?,
        duration_secs: 1,
        burst: false,
        method,
        url: url::Url::parse(url).map_err(|err| err.to_string())?,
        body: body.to_owned(),
        request_timeout: Some(Duration::from_secs(5)),
    })
}

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

const OK_RESPONSE: &str = "HTTP/1.1 200 OK\r\nContent-Length: 6\r\nConnection: close\r\n\r\nhello!";
const STALLED_BODY_RESPONSE: &str = "HTTP/1.1 200 OK\r\nContent-Length: 100000\r\n\r\npartial";
const NOT_FOUND_RESPONSE: &str =
    "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n";

#[test]
fn get_returns_status_and_sends_user_agent() -> Result<(), String> {
    run_async_test(async {
        let (base, captured) = spawn_server(Some(OK_RESPONSE))?;
        let config = config_for(&format!("{}/hello", base), HttpMethod::Get, "ignored")?;
        let executor = ReqwestExecutor::new(&config).map_err(|err| err.to_string())?;

        let status = executor.execute().await.map_err(|err| err.to_string())?;
        if status != 200 {
            return Err(format!("Unexpected status {}", status));
        }

        let requests = captured.lock().map_err(|err| err.to_string())?.clone();
        let request = requests
            .first()
            .ok_or_else(|| "Server saw no request".to_owned())?;
        if !request.starts_with("GET /hello HTTP/1.1") {
            return Err(format!("Unexpected request line: {}", request));
        }
        if !request.to_ascii_lowercase().contains("user-agent: volley/") {
            return Err(format!("Missing user agent: {}", request));
        }
        if request.contains("ignored") {
            return Err("GET must not carry the body".to_owned());
        }
        Ok(())
    })
}

#[test]
fn post_sends_body() -> Result<(), String> {
    run_async_test(async {
        let (base, captured) = spawn_server(Some(OK_RESPONSE))?;
        let config = config_for(&base, HttpMethod::Post, "payload=1")?;
        let executor = ReqwestExecutor::new(&config).map_err(|err| err.to_string())?;

        executor.execute().await.map_err(|err| err.to_string())?;

        let requests = captured.lock().map_err(|err| err.to_string())?.clone();
        let request = requests
            .first()
            .ok_or_else(|| "Server saw no request".to_owned())?;
        if !request.starts_with("POST / HTTP/1.1") || !request.ends_with("payload=1") {
            return Err(format!("Unexpected request: {}", request));
        }
        Ok(())
    })
}

#[test]
fn non_success_status_is_not_a_failure() -> Result<(), String> {
    run_async_test(async {
        let (base, _captured) = spawn_server(Some(NOT_FOUND_RESPONSE))?;
        let config = config_for(&base, HttpMethod::Delete, "")?;
        let executor = ReqwestExecutor::new(&config).map_err(|err| err.to_string())?;
        match executor.execute().await {
            Ok(404) => Ok(()),
            other => Err(format!("Expected Ok(404), got {:?}", other)),
        }
    })
}

#[test]
fn refused_connection_is_a_failure() -> Result<(), String> {
    run_async_test(async {
        let listener = TcpListener::bind("127.0.0.1:0")
            .map_err(|err| format!("bind failed: {}", err))?;
        let addr = listener
            .local_addr()
            .map_err(|err| format!("addr failed: {}", err))?;
        drop(listener);

        let config = config_for(&format!("http://{}", addr), HttpMethod::Get, "")?;
        let executor = ReqwestExecutor::new(&config).map_err(|err| err.to_string())?;
        match executor.execute().await {
            Err(failure) if !failure.timed_out => Ok(()),
            other => Err(format!("Expected connection failure, got {:?}", other)),
        }
    })
}

#[test]
fn timeout_is_a_failure() -> Result<(), String> {
    run_async_test(async {
        let (base, _captured) = spawn_server(None)?;
        let mut config = config_for(&base, HttpMethod::Get, "")?;
        config.request_timeout = Some(Duration::from_millis(200));
        let executor = ReqwestExecutor::new(&config).map_err(|err| err.to_string())?;
        match executor.execute().await {
            Err(failure) if failure.timed_out => Ok(()),
            other => Err(format!("Expected timeout failure, got {:?}", other)),
        }
    })
}

#[test]
fn status_returns_without_waiting_for_the_body() -> Result<(), String> {
    run_async_test(async {
        let (base, _captured) = spawn_server_with(Reply::Stall(STALLED_BODY_RESPONSE))?;
        let config = config_for(&base, HttpMethod::Get, "")?;
        let executor = ReqwestExecutor::new(&config).map_err(|err| err.to_string())?;

        let status = tokio::time::timeout(Duration::from_secs(2), executor.execute())
            .await
            .map_err(|elapsed| format!("Status held back by a stalled body: {}", elapsed))?
            .map_err(|err| err.to_string())?;
        if status != 200 {
            return Err(format!("Unexpected status {}", status));
        }
        Ok(())
    })
}
