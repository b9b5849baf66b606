use httpfromtcp::{
    Config, Headers, Request, Server, StatusCode, Writer, config::DEFAULT_PORT,
    response::default_headers,
};
use sha2::{Digest, Sha256};
use std::{io, net::IpAddr};
use tokio::{io::AsyncWrite, net::TcpStream, runtime::Runtime};

const VIDEO_PATH: &str = "assets/vim.mp4";

const BAD_REQUEST: &str = "<html>
  <head>
    <title>400 Bad Request</title>
  </head>
  <body>
    <h1>Bad Request</h1>
    <p>Your request honestly kinda sucked.</p>
  </body>
</html>
";

const INTERNAL_SERVER_ERROR: &str = "<html>
  <head>
    <title>500 Internal Server Error</title>
  </head>
  <body>
    <h1>Internal Server Error</h1>
    <p>Okay, you know what? This one is on me.</p>
  </body>
</html>
";

const NOT_FOUND: &str = "<html>
  <head>
    <title>404 Not Found</title>
  </head>
  <body>
    <h1>Not Found</h1>
    <p>Nothing to see here.</p>
  </body>
</html>
";

fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = config_from_env();

    Runtime::new()?.block_on(async {
        let mut server = Server::bind(config, handle).await?;
        log::info!("listening on {}", server.local_addr());

        shutdown_signal().await?;

        log::info!("shutting down");
        server.close();
        server.wait().await;
        Ok::<_, io::Error>(())
    })
}

fn config_from_env() -> Config {
    let port = std::env::var("PORT")
        .ok()
        .and_then(|port| port.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let host = std::env::var("HOST")
        .ok()
        .and_then(|host| host.parse::<IpAddr>().ok());

    match host {
        Some(host) => Config::with_addr((host, port)),
        None => Config::with_port(port),
    }
}

#[cfg(unix)]
async fn shutdown_signal() -> io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> io::Result<()> {
    tokio::signal::ctrl_c().await
}

async fn handle(mut writer: Writer<TcpStream>, request: Request) -> io::Result<()> {
    log::trace!("> {} {}", request.method(), request.target());

    let target = request.target();

    if let Some(lines) = target.strip_prefix("/stream/") {
        return match lines.parse() {
            Ok(lines) => stream(&mut writer, lines).await,
            Err(_) => html(writer, StatusCode::BAD_REQUEST, BAD_REQUEST).await,
        };
    }

    match target {
        "/yourproblem" => html(writer, StatusCode::BAD_REQUEST, BAD_REQUEST).await,
        "/myproblem" => html(writer, StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR).await,
        "/" => html(writer, StatusCode::NOT_FOUND, NOT_FOUND).await,
        "/video" => video(writer).await,
        _ => {
            let body = b"All good, frfr\n";
            writer.write_status_line(StatusCode::OK).await?;
            writer.write_headers(&default_headers(body.len())).await?;
            writer.write_body(body).await?;
            Ok(())
        }
    }
}

async fn html(mut writer: Writer<TcpStream>, status: StatusCode, body: &str) -> io::Result<()> {
    let mut headers = default_headers(body.len());
    headers.overwrite("Content-Type", "text/html");

    writer.write_status_line(status).await?;
    writer.write_headers(&headers).await?;
    writer.write_body(body.as_bytes()).await?;
    Ok(())
}

async fn video(mut writer: Writer<TcpStream>) -> io::Result<()> {
    let video = match tokio::fs::read(VIDEO_PATH).await {
        Ok(ok) => ok,
        Err(err) => {
            log::error!("failed to read {VIDEO_PATH}: {err}");
            return html(writer, StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR).await;
        }
    };

    let mut headers = default_headers(video.len());
    headers.overwrite("Content-Type", "video/mp4");

    writer.write_status_line(StatusCode::OK).await?;
    writer.write_headers(&headers).await?;
    writer.write_body(&video).await?;
    Ok(())
}

/// Stream `lines` generated lines as chunked body, with the total length and checksum as trailers.
async fn stream<IO>(writer: &mut Writer<IO>, lines: usize) -> io::Result<()>
where
    IO: AsyncWrite + Unpin,
{
    let mut headers = default_headers(0);
    headers.remove("Content-Length");
    headers.set("Transfer-Encoding", "chunked");
    headers.set("Trailer", "X-Content-SHA256");
    headers.set("Trailer", "X-Content-Length");

    writer.write_status_line(StatusCode::OK).await?;
    writer.write_headers(&headers).await?;

    let mut hasher = Sha256::new();
    let mut total = 0;
    for i in 0..lines {
        let line = format!("{i}: All good, frfr\n");
        hasher.update(line.as_bytes());
        total += writer.write_chunked_body(line.as_bytes()).await?;
        writer.flush().await?;
    }
    writer.write_chunked_body_done().await?;

    let mut trailers = Headers::new();
    trailers.set("X-Content-SHA256", format!("{:x}", hasher.finalize()));
    trailers.set("X-Content-Length", total.to_string());
    writer.write_trailers(&trailers).await
}
